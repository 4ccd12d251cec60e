//! Shortest path searches over the road graph

mod min_time;
mod route;
pub mod search;
mod stop_flag;

pub use min_time::{minimum_time, minimum_time_with_stop};
pub use route::{RoutePath, shortest_route};
pub use search::{DistanceMap, SearchDirection, bounded_search};
pub use stop_flag::StopFlag;
