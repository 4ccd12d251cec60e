use ordered_float::OrderedFloat;
use petgraph::{Direction, algo::astar, graph::NodeIndex, visit::EdgeRef};

use crate::{Error, Meters, RoadEdge, RoadGraph, RoadNode, Seconds};

/// Fastest driving route between two nodes
#[derive(Debug, Clone)]
pub struct RoutePath {
    /// Visited nodes, start and end included
    pub nodes: Vec<RoadNode>,
    pub travel_time: Seconds,
    /// Sum of known edge lengths
    pub length: Meters,
}

/// Plain shortest path query, independent from the prism engine
///
/// # Errors
///
/// `NoPath` when `end` cannot be reached, `InvalidNodeIndex` for nodes outside the graph.
pub fn shortest_route(graph: &RoadGraph, start: NodeIndex, end: NodeIndex) -> Result<RoutePath, Error> {
    if !graph.contains(start) || !graph.contains(end) {
        return Err(Error::InvalidNodeIndex);
    }

    // A* with zero heuristic is Dijkstra that also returns the node sequence
    let (cost, path) = astar(
        graph.graph(),
        start,
        |n| n == end,
        |e| OrderedFloat(e.weight().travel_time),
        |_| OrderedFloat(0.0),
    )
    .ok_or(Error::NoPath)?;

    let length = path
        .windows(2)
        .filter_map(|pair| fastest_edge(graph, pair[0], pair[1]))
        .filter_map(|edge| edge.length)
        .sum();

    let nodes = path
        .iter()
        .filter_map(|&idx| graph.node(idx).cloned())
        .collect();

    Ok(RoutePath {
        nodes,
        travel_time: cost.0,
        length,
    })
}

/// Edge the search would have used between two consecutive route nodes
fn fastest_edge(graph: &RoadGraph, from: NodeIndex, to: NodeIndex) -> Option<&RoadEdge> {
    graph
        .edges_directed(from, Direction::Outgoing)
        .filter(|e| e.target() == to)
        .map(|e| e.weight())
        .min_by(|a, b| {
            a.travel_time
                .total_cmp(&b.travel_time)
                .then_with(|| a.key.cmp(&b.key))
        })
}
