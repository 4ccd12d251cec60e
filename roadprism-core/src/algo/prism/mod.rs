//! Space-time prisms: the road segments a traveler could have used between two
//! timed anchors, scored by how much of the available slack they consume.

mod chain;
mod leg;
mod params;
mod to_geojson;

pub use chain::{ChainResult, Waypoint, compute_chain_prism};
pub use leg::{LegStatus, PrismFeature, PrismResult, compute_leg_prism};
pub use params::PrismParams;
