use petgraph::graph::NodeIndex;

use super::{SearchDirection, StopFlag, search::dijkstra_search};
use crate::{Error, RoadGraph, Seconds};

/// Fastest possible travel time from `start` to `end`
///
/// # Errors
///
/// `NoPath` when `end` cannot be reached from `start`.
pub fn minimum_time(graph: &RoadGraph, start: NodeIndex, end: NodeIndex) -> Result<Seconds, Error> {
    minimum_time_with_stop(graph, start, end, None)
}

/// [`minimum_time`] that can be interrupted through a [`StopFlag`]
pub fn minimum_time_with_stop(
    graph: &RoadGraph,
    start: NodeIndex,
    end: NodeIndex,
    stop: Option<&StopFlag>,
) -> Result<Seconds, Error> {
    if !graph.contains(end) {
        return Err(Error::InvalidNodeIndex);
    }

    let distances = dijkstra_search(
        graph,
        start,
        SearchDirection::Forward,
        Some(end),
        None,
        stop,
    )?;

    distances.get(&end).copied().ok_or(Error::NoPath)
}
