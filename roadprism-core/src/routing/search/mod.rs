mod bounded_dijkstra;
mod state;

pub(crate) use bounded_dijkstra::dijkstra_search;
pub use bounded_dijkstra::{DistanceMap, SearchDirection, bounded_search};
