use geo::LineString;
use log::debug;
use ordered_float::OrderedFloat;
use petgraph::{
    Direction,
    graph::{EdgeReference, NodeIndex},
    visit::EdgeRef,
};

use super::PrismParams;
use crate::{
    COST_EPSILON, Error, Meters, RoadEdge, RoadGraph, Seconds,
    routing::{DistanceMap, SearchDirection, bounded_search, minimum_time_with_stop},
};

/// One scored road segment of a prism
#[derive(Debug, Clone)]
pub struct PrismFeature {
    pub geometry: LineString<f64>,
    /// 0 on a fastest path, 1 at the edge of feasibility
    pub score: f64,
    /// Fastest trip from start to end forced through this segment, in seconds
    pub time_cost: Seconds,
}

/// Why a leg produced the features it did
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LegStatus {
    Computed,
    /// End is unreachable from start
    NoPath,
    /// Not even the fastest path fits in the budget
    InfeasibleBudget,
    /// Budget is zero, negative or not a number
    InvalidBudget,
}

/// Prism of a single leg
#[derive(Debug, Clone)]
pub struct PrismResult {
    pub features: Vec<PrismFeature>,
    /// Summed length of the emitted segments, in meters, when requested
    pub total_length: Option<Meters>,
    pub status: LegStatus,
    pub min_time: Option<Seconds>,
    /// Bound actually used by both searches
    pub effective_cutoff: Option<Seconds>,
}

impl PrismResult {
    fn empty(status: LegStatus, params: &PrismParams, min_time: Option<Seconds>) -> Self {
        Self {
            features: Vec::new(),
            total_length: params.include_length.then_some(0.0),
            status,
            min_time,
            effective_cutoff: None,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.features.is_empty()
    }
}

/// Computes the prism of one leg
///
/// Unreachable ends and budgets that are too tight are normal outcomes: they yield
/// an empty result whose `status` tells them apart.
///
/// # Errors
///
/// `MalformedRequest` for an invalid detour ratio, `InvalidNodeIndex` for nodes outside
/// the graph, `Cancelled` when the stop flag is raised mid-computation.
pub fn compute_leg_prism(
    graph: &RoadGraph,
    start: NodeIndex,
    end: NodeIndex,
    budget: Seconds,
    params: &PrismParams,
) -> Result<PrismResult, Error> {
    params.validate()?;

    // Written this way round so that NaN counts as invalid
    if !(budget > 0.0) {
        return Ok(PrismResult::empty(LegStatus::InvalidBudget, params, None));
    }

    let stop = params.stop.as_ref();
    let min_time = match minimum_time_with_stop(graph, start, end, stop) {
        Ok(time) => time,
        Err(Error::NoPath) => {
            debug!("No path from {start:?} to {end:?}, skipping leg");
            return Ok(PrismResult::empty(LegStatus::NoPath, params, None));
        }
        Err(e) => return Err(e),
    };

    if budget < min_time {
        debug!("Budget {budget:.1}s is below the fastest time {min_time:.1}s");
        return Ok(PrismResult::empty(
            LegStatus::InfeasibleBudget,
            params,
            Some(min_time),
        ));
    }

    let capped_budget = min_time * params.detour_ratio;
    let effective_cutoff = budget.min(capped_budget);

    let from_start = bounded_search(
        graph,
        start,
        SearchDirection::Forward,
        effective_cutoff,
        stop,
    )?;
    let to_end = bounded_search(
        graph,
        end,
        SearchDirection::Backward,
        effective_cutoff,
        stop,
    )?;

    let mut features = Vec::new();
    let mut total_length: Meters = 0.0;

    let reachable = reachable_nodes(&from_start, &to_end);
    for &u in &reachable {
        let t_start = from_start[&u];

        for edge in representative_edges(graph, u, &to_end) {
            let v = edge.target();
            let road = edge.weight();
            let total_trip_time = t_start + road.travel_time + to_end[&v];

            if total_trip_time > effective_cutoff + COST_EPSILON {
                continue;
            }

            if params.include_length {
                total_length += road.length.unwrap_or(0.0);
            }

            features.push(PrismFeature {
                geometry: road.geometry_or_segment(&graph.graph[u], &graph.graph[v]),
                score: slack_score(total_trip_time, min_time, effective_cutoff),
                time_cost: total_trip_time,
            });
        }
    }

    debug!(
        "Leg {start:?} -> {end:?}: fastest {min_time:.1}s, cutoff {effective_cutoff:.1}s, \
        {} of {} forward nodes usable, {} segments",
        reachable.len(),
        from_start.len(),
        features.len()
    );

    Ok(PrismResult {
        features,
        total_length: params.include_length.then_some(total_length),
        status: LegStatus::Computed,
        min_time: Some(min_time),
        effective_cutoff: Some(effective_cutoff),
    })
}

/// Nodes reachable from the start that can still reach the end, in index order
fn reachable_nodes(from_start: &DistanceMap, to_end: &DistanceMap) -> Vec<NodeIndex> {
    let mut nodes: Vec<NodeIndex> = from_start
        .keys()
        .filter(|node| to_end.contains_key(*node))
        .copied()
        .collect();
    nodes.sort_unstable();
    nodes
}

/// Outgoing edges of `u` towards nodes that can reach the end, one per target node.
/// Among parallel edges the fastest wins, then the lowest key, then the lowest edge index.
fn representative_edges<'a>(
    graph: &'a RoadGraph,
    u: NodeIndex,
    to_end: &DistanceMap,
) -> Vec<EdgeReference<'a, RoadEdge>> {
    let mut edges: Vec<_> = graph
        .edges_directed(u, Direction::Outgoing)
        .filter(|e| to_end.contains_key(&e.target()))
        .collect();
    edges.sort_unstable_by_key(|e| {
        (
            e.target(),
            OrderedFloat(e.weight().travel_time),
            e.weight().key,
            e.id(),
        )
    });
    edges.dedup_by_key(|e| e.target());
    edges
}

/// Share of the available slack used by a trip of `total_trip_time`, within `[0, 1]`
#[allow(clippy::float_cmp)]
fn slack_score(total_trip_time: Seconds, min_time: Seconds, effective_cutoff: Seconds) -> f64 {
    let slack = effective_cutoff - min_time;
    if effective_cutoff == min_time || slack <= 0.0 {
        return 0.0;
    }
    ((total_trip_time - min_time) / slack).clamp(0.0, 1.0)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{RoadNode, routing::StopFlag};

    // A -> B -> C -> D, 100 s per edge
    fn chain_graph() -> RoadGraph {
        let nodes = vec![
            RoadNode::new(1, 0.0, 0.0),
            RoadNode::new(2, 1.0, 0.0),
            RoadNode::new(3, 2.0, 0.0),
            RoadNode::new(4, 3.0, 0.0),
        ];
        let edges = vec![
            (1, 2, RoadEdge::new(100.0).with_length(1000.0)),
            (2, 3, RoadEdge::new(100.0).with_length(1000.0)),
            (3, 4, RoadEdge::new(100.0).with_length(1000.0)),
        ];
        RoadGraph::from_parts(nodes, edges).unwrap()
    }

    fn ends(graph: &RoadGraph) -> (NodeIndex, NodeIndex) {
        (graph.node_index(1).unwrap(), graph.node_index(4).unwrap())
    }

    #[test]
    fn slack_score_is_normalized_and_clamped() {
        assert_eq!(slack_score(300.0, 300.0, 350.0), 0.0);
        assert_eq!(slack_score(325.0, 300.0, 350.0), 0.5);
        assert_eq!(slack_score(350.0, 300.0, 350.0), 1.0);
        assert_eq!(slack_score(360.0, 300.0, 350.0), 1.0);
        assert_eq!(slack_score(290.0, 300.0, 350.0), 0.0);
    }

    #[test]
    fn slack_score_without_slack_is_zero() {
        assert_eq!(slack_score(300.0, 300.0, 300.0), 0.0);
        assert_eq!(slack_score(0.0, 0.0, 0.0), 0.0);
    }

    #[test]
    fn chain_with_budget_below_cap() {
        let graph = chain_graph();
        let (a, d) = ends(&graph);

        let result = compute_leg_prism(&graph, a, d, 350.0, &PrismParams::default()).unwrap();

        assert_eq!(result.status, LegStatus::Computed);
        assert_eq!(result.min_time, Some(300.0));
        assert_eq!(result.effective_cutoff, Some(350.0));
        assert_eq!(result.features.len(), 3);
        for feature in &result.features {
            assert_eq!(feature.time_cost, 300.0);
            assert_eq!(feature.score, (feature.time_cost - 300.0) / 50.0);
        }
    }

    #[test]
    fn generous_budget_is_capped_by_detour_ratio() {
        let graph = chain_graph();
        let (a, d) = ends(&graph);

        let result = compute_leg_prism(&graph, a, d, 10_000.0, &PrismParams::default()).unwrap();
        let cutoff = result.effective_cutoff.unwrap();

        assert!((cutoff - 390.0).abs() < 1e-9);
    }

    #[test]
    fn exact_budget_scores_everything_zero() {
        let graph = chain_graph();
        let (a, d) = ends(&graph);

        let result = compute_leg_prism(&graph, a, d, 300.0, &PrismParams::default()).unwrap();

        assert_eq!(result.features.len(), 3);
        assert!(result.features.iter().all(|f| f.score == 0.0));
    }

    #[test]
    fn tight_budget_yields_nothing() {
        let graph = chain_graph();
        let (a, d) = ends(&graph);

        let result = compute_leg_prism(&graph, a, d, 299.0, &PrismParams::default()).unwrap();

        assert!(result.is_empty());
        assert_eq!(result.status, LegStatus::InfeasibleBudget);
    }

    #[test]
    fn reversed_leg_has_no_path() {
        let graph = chain_graph();
        let (a, d) = ends(&graph);

        let result = compute_leg_prism(&graph, d, a, 1_000.0, &PrismParams::default()).unwrap();

        assert!(result.is_empty());
        assert_eq!(result.status, LegStatus::NoPath);
    }

    #[test]
    fn non_positive_budget_is_invalid() {
        let graph = chain_graph();
        let (a, d) = ends(&graph);

        for budget in [0.0, -5.0, f64::NAN] {
            let result = compute_leg_prism(&graph, a, d, budget, &PrismParams::default()).unwrap();
            assert_eq!(result.status, LegStatus::InvalidBudget);
            assert!(result.is_empty());
        }
    }

    #[test]
    fn length_is_summed_on_request() {
        let graph = chain_graph();
        let (a, d) = ends(&graph);
        let params = PrismParams::default().with_length(true);

        let result = compute_leg_prism(&graph, a, d, 350.0, &params).unwrap();

        assert_eq!(result.total_length, Some(3000.0));
    }

    #[test]
    fn length_is_absent_unless_requested() {
        let graph = chain_graph();
        let (a, d) = ends(&graph);

        let result = compute_leg_prism(&graph, a, d, 350.0, &PrismParams::default()).unwrap();

        assert_eq!(result.total_length, None);
    }

    #[test]
    fn fastest_parallel_edge_represents_the_pair() {
        let nodes = vec![RoadNode::new(1, 0.0, 0.0), RoadNode::new(2, 1.0, 0.0)];
        let edges = vec![
            (1, 2, RoadEdge::new(12.0).with_length(200.0).with_key(3)),
            (1, 2, RoadEdge::new(10.0).with_length(100.0).with_key(0)),
            (1, 2, RoadEdge::new(11.0).with_length(150.0).with_key(1)),
        ];
        let graph = RoadGraph::from_parts(nodes, edges).unwrap();
        let params = PrismParams::default().with_length(true);

        let result = compute_leg_prism(
            &graph,
            graph.node_index(1).unwrap(),
            graph.node_index(2).unwrap(),
            13.0,
            &params,
        )
        .unwrap();

        assert_eq!(result.features.len(), 1);
        assert_eq!(result.features[0].time_cost, 10.0);
        assert_eq!(result.total_length, Some(100.0));
    }

    #[test]
    fn faster_way_with_higher_key_keeps_fastest_path_covered() {
        let nodes = vec![
            RoadNode::new(1, 0.0, 0.0),
            RoadNode::new(2, 1.0, 0.0),
            RoadNode::new(3, 2.0, 0.0),
        ];
        let edges = vec![
            (1, 2, RoadEdge::new(30.0).with_key(0)),
            (1, 2, RoadEdge::new(12.5).with_key(1)),
            (2, 3, RoadEdge::new(30.0)),
        ];
        let graph = RoadGraph::from_parts(nodes, edges).unwrap();

        let result = compute_leg_prism(
            &graph,
            graph.node_index(1).unwrap(),
            graph.node_index(3).unwrap(),
            50.0,
            &PrismParams::default(),
        )
        .unwrap();

        assert_eq!(result.min_time, Some(42.5));
        assert_eq!(result.features.len(), 2);
        let starts: Vec<f64> = result.features.iter().map(|f| f.geometry.0[0].x).collect();
        assert_eq!(starts, vec![0.0, 1.0]);
        assert!(result.features.iter().all(|f| f.time_cost == 42.5));
    }

    #[test]
    fn equally_fast_parallel_edges_fall_back_to_lowest_key() {
        let nodes = vec![RoadNode::new(1, 0.0, 0.0), RoadNode::new(2, 1.0, 0.0)];
        let edges = vec![
            (1, 2, RoadEdge::new(10.0).with_length(300.0).with_key(2)),
            (1, 2, RoadEdge::new(10.0).with_length(100.0).with_key(0)),
        ];
        let graph = RoadGraph::from_parts(nodes, edges).unwrap();
        let params = PrismParams::default().with_length(true);

        let result = compute_leg_prism(
            &graph,
            graph.node_index(1).unwrap(),
            graph.node_index(2).unwrap(),
            10.0,
            &params,
        )
        .unwrap();

        assert_eq!(result.features.len(), 1);
        assert_eq!(result.total_length, Some(100.0));
    }

    #[test]
    fn detour_branch_is_scored_by_slack() {
        // 1 -> 2 -> 4 takes 100 s, 1 -> 3 -> 4 takes 120 s
        let nodes = vec![
            RoadNode::new(1, 0.0, 0.0),
            RoadNode::new(2, 1.0, 1.0),
            RoadNode::new(3, 1.0, -1.0),
            RoadNode::new(4, 2.0, 0.0),
        ];
        let edges = vec![
            (1, 2, RoadEdge::new(50.0)),
            (2, 4, RoadEdge::new(50.0)),
            (1, 3, RoadEdge::new(60.0)),
            (3, 4, RoadEdge::new(60.0)),
        ];
        let graph = RoadGraph::from_parts(nodes, edges).unwrap();
        let start = graph.node_index(1).unwrap();
        let end = graph.node_index(4).unwrap();

        let result = compute_leg_prism(&graph, start, end, 125.0, &PrismParams::default()).unwrap();

        assert_eq!(result.features.len(), 4);
        let detour: Vec<_> = result
            .features
            .iter()
            .filter(|f| f.time_cost == 120.0)
            .collect();
        assert_eq!(detour.len(), 2);
        assert!(detour.iter().all(|f| (f.score - 0.8).abs() < 1e-12));

        let tight = compute_leg_prism(&graph, start, end, 110.0, &PrismParams::default()).unwrap();
        assert_eq!(tight.features.len(), 2);
    }

    #[test]
    fn rejects_detour_ratio_below_one() {
        let graph = chain_graph();
        let (a, d) = ends(&graph);
        let params = PrismParams::default().with_detour_ratio(0.5);

        let result = compute_leg_prism(&graph, a, d, 350.0, &params);

        assert!(matches!(result, Err(Error::MalformedRequest(_))));
    }

    #[test]
    fn raised_flag_aborts_leg() {
        let graph = chain_graph();
        let (a, d) = ends(&graph);
        let stop = StopFlag::new();
        stop.raise();
        let params = PrismParams::default().with_stop(stop);

        let result = compute_leg_prism(&graph, a, d, 350.0, &params);

        assert!(matches!(result, Err(Error::Cancelled)));
    }
}
