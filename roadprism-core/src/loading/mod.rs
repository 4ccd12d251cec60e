//! This module is responsible for loading road network data exported from
//! OpenStreetMap tooling and building the routing graph.

mod builder;
mod config;
pub mod csv_export;

pub use builder::create_road_graph;
pub use config::{DEFAULT_SPEED_BUFFER_KPH, DEFAULT_SPEED_KPH, RoadGraphConfig};
