use std::collections::BinaryHeap;

use hashbrown::{HashMap, hash_map::Entry};
use ordered_float::OrderedFloat;
use petgraph::{Direction, graph::NodeIndex, visit::EdgeRef};

use super::state::State;
use crate::{COST_EPSILON, Error, RoadGraph, Seconds, routing::StopFlag};

/// Minimal travel time per node, scoped to a single search.
/// Nodes beyond the cutoff are absent rather than infinite.
pub type DistanceMap = HashMap<NodeIndex, Seconds>;

/// Which adjacency a search follows
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SearchDirection {
    /// Outgoing edges: time needed to get from the origin to each node
    Forward,
    /// Incoming edges: time needed to get from each node to the origin
    Backward,
}

impl SearchDirection {
    fn adjacency(self) -> Direction {
        match self {
            Self::Forward => Direction::Outgoing,
            Self::Backward => Direction::Incoming,
        }
    }
}

/// Cutoff-bounded single source Dijkstra
///
/// Returns every node whose shortest travel time from (or, backwards, to) `origin`
/// does not exceed `cutoff`.
///
/// # Errors
///
/// `InvalidNodeIndex` when the origin is not part of the graph, `InvalidData` for a
/// negative or NaN cutoff, `Cancelled` once `stop` is raised.
pub fn bounded_search(
    graph: &RoadGraph,
    origin: NodeIndex,
    direction: SearchDirection,
    cutoff: Seconds,
    stop: Option<&StopFlag>,
) -> Result<DistanceMap, Error> {
    if cutoff.is_nan() || cutoff < 0.0 {
        return Err(Error::InvalidData(format!(
            "Search cutoff must be non-negative, got {cutoff}"
        )));
    }
    dijkstra_search(graph, origin, direction, None, Some(cutoff), stop)
}

/// Priority queue search shared by the bounded searches and the minimum time oracle.
///
/// With a `target` the search stops as soon as the target is settled, its entry in
/// the returned map is then final. With `max_cost` relaxations above the bound are
/// dropped, so the map never holds a node beyond it.
pub(crate) fn dijkstra_search(
    graph: &RoadGraph,
    start: NodeIndex,
    direction: SearchDirection,
    target: Option<NodeIndex>,
    max_cost: Option<Seconds>,
    stop: Option<&StopFlag>,
) -> Result<DistanceMap, Error> {
    if !graph.contains(start) {
        return Err(Error::InvalidNodeIndex);
    }

    let adjacency = direction.adjacency();
    let estimated_nodes = graph.node_count().min(1000);
    let mut distances: DistanceMap = HashMap::with_capacity(estimated_nodes);
    let mut heap = BinaryHeap::with_capacity(estimated_nodes / 4);

    // Start node has distance 0
    heap.push(State {
        cost: OrderedFloat(0.0),
        node: start,
    });
    distances.insert(start, 0.0);

    while let Some(State { cost, node }) = heap.pop() {
        if stop.is_some_and(StopFlag::is_raised) {
            return Err(Error::Cancelled);
        }

        // Skip if we've found a better path
        if let Some(&best) = distances.get(&node)
            && cost.0 > best
        {
            continue;
        }

        if target == Some(node) {
            break;
        }

        for edge in graph.edges_directed(node, adjacency) {
            let next = match direction {
                SearchDirection::Forward => edge.target(),
                SearchDirection::Backward => edge.source(),
            };
            let next_cost = cost.0 + edge.weight().travel_time;

            if let Some(max) = max_cost
                && next_cost > max + COST_EPSILON
            {
                continue;
            }

            match distances.entry(next) {
                Entry::Vacant(entry) => {
                    entry.insert(next_cost);
                    heap.push(State {
                        cost: OrderedFloat(next_cost),
                        node: next,
                    });
                }
                Entry::Occupied(mut entry) => {
                    if next_cost < *entry.get() {
                        *entry.get_mut() = next_cost;
                        heap.push(State {
                            cost: OrderedFloat(next_cost),
                            node: next,
                        });
                    }
                }
            }
        }
    }

    Ok(distances)
}
