// Re-export key components
pub use crate::algo::prism::{
    ChainResult, LegStatus, PrismFeature, PrismParams, PrismResult, Waypoint,
    compute_chain_prism, compute_leg_prism,
};
pub use crate::loading::{RoadGraphConfig, create_road_graph};
pub use crate::model::{RoadEdge, RoadGraph, RoadNode};
pub use crate::routing::{
    DistanceMap, RoutePath, SearchDirection, StopFlag, bounded_search, minimum_time,
    shortest_route,
};

pub use crate::DEFAULT_DETOUR_RATIO;
pub use crate::Error;

// Core scalar types
pub use crate::Meters;
pub use crate::OsmNodeId;
pub use crate::Seconds; // seconds

pub use petgraph::graph::NodeIndex;
