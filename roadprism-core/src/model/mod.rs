//! Data model for road network prisms
//!
//! Contains the types representing the road graph shared by all computations.

pub mod road;

pub use road::{IndexedPoint, RoadEdge, RoadGraph, RoadNode};
