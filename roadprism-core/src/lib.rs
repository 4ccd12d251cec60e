//! Space-time prisms over road networks.
//!
//! Given two anchors on a directed road graph and the time that elapsed between them,
//! the crate computes every road segment a traveler could have used on the way, scored
//! by how much of the available slack passing through it consumes. Successive legs of
//! an itinerary are combined into a single overlay.

pub mod algo;
pub mod error;
pub mod loading;
pub mod model;
pub mod prelude;
pub mod routing;

pub use error::Error;

pub use algo::prism::{
    ChainResult, LegStatus, PrismFeature, PrismParams, PrismResult, Waypoint,
    compute_chain_prism, compute_leg_prism,
};
pub use loading::{RoadGraphConfig, create_road_graph};
pub use model::{RoadEdge, RoadGraph, RoadNode};
pub use routing::{RoutePath, StopFlag, minimum_time, shortest_route};

/// Travel time in seconds
pub type Seconds = f64;
/// Physical length in meters
pub type Meters = f64;
/// External (OSM) identifier of a road node
pub type OsmNodeId = u64;

/// Default multiplier applied to the fastest travel time to bound the prism
pub const DEFAULT_DETOUR_RATIO: f64 = 1.3;

/// Slack accepted when comparing accumulated float costs against a cutoff.
/// Sums computed in opposite directions may differ in the last bits.
pub(crate) const COST_EPSILON: Seconds = 1e-9;
