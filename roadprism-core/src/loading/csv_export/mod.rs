//! Processing road network CSV exports (one file for nodes, one for edges)

mod parser;
mod processor;
mod raw_types;

pub use parser::deserialize_csv_file;
pub(crate) use processor::road_graph_from_csv;
pub use raw_types::{RawEdge, RawNode};
