use std::{io::Write, thread, time::Duration};

use roadprism_core::prelude::*;

const SIDE: u64 = 6;

fn grid_graph() -> RoadGraph {
    square_grid(SIDE)
}

// Bidirectional grid with uneven but integral travel times, 100 m per edge
fn square_grid(side: u64) -> RoadGraph {
    let id = |row: u64, col: u64| row * side + col;

    let mut nodes = Vec::new();
    let mut edges = Vec::new();
    for row in 0..side {
        for col in 0..side {
            nodes.push(RoadNode::new(id(row, col), col as f64, row as f64));

            let seconds = 10.0 + ((row * 3 + col * 5) % 4) as f64;
            let mut link = |from: u64, to: u64| {
                edges.push((from, to, RoadEdge::new(seconds).with_length(100.0)));
            };
            if col + 1 < side {
                link(id(row, col), id(row, col + 1));
                link(id(row, col + 1), id(row, col));
            }
            if row + 1 < side {
                link(id(row, col), id(row + 1, col));
                link(id(row + 1, col), id(row, col));
            }
        }
    }

    RoadGraph::from_parts(nodes, edges).unwrap()
}

fn corners(graph: &RoadGraph) -> (NodeIndex, NodeIndex) {
    (
        graph.node_index(0).unwrap(),
        graph.node_index(SIDE * SIDE - 1).unwrap(),
    )
}

#[test]
fn cutoff_lies_between_min_time_and_budget() {
    let graph = grid_graph();
    let (start, end) = corners(&graph);
    let min_time = minimum_time(&graph, start, end).unwrap();

    for factor in [1.0, 1.1, 1.25, 1.5, 3.0] {
        let budget = min_time * factor;
        let result = compute_leg_prism(&graph, start, end, budget, &PrismParams::default()).unwrap();

        assert_eq!(result.status, LegStatus::Computed);
        let cutoff = result.effective_cutoff.unwrap();
        assert!(min_time <= cutoff && cutoff <= budget, "cutoff {cutoff} for budget {budget}");
        assert!(!result.features.is_empty());
    }
}

#[test]
fn features_respect_cutoff_and_score_range() {
    let graph = grid_graph();
    let (start, end) = corners(&graph);
    let min_time = minimum_time(&graph, start, end).unwrap();

    let result =
        compute_leg_prism(&graph, start, end, min_time * 1.25, &PrismParams::default()).unwrap();
    let cutoff = result.effective_cutoff.unwrap();

    for feature in &result.features {
        assert!((0.0..=1.0).contains(&feature.score));
        assert!(feature.time_cost >= min_time - 1e-9);
        assert!(feature.time_cost <= cutoff + 1e-9);
    }
    assert!(result.features.iter().any(|f| f.score == 0.0));
}

#[test]
fn larger_budget_never_loses_segments() {
    let graph = grid_graph();
    let (start, end) = corners(&graph);
    let min_time = minimum_time(&graph, start, end).unwrap();
    let params = PrismParams::default();

    let narrow = compute_leg_prism(&graph, start, end, min_time * 1.05, &params).unwrap();
    let wide = compute_leg_prism(&graph, start, end, min_time * 1.25, &params).unwrap();

    assert!(narrow.features.len() <= wide.features.len());
    for feature in &narrow.features {
        assert!(
            wide.features.iter().any(|f| f.geometry == feature.geometry),
            "segment {:?} disappeared with a larger budget",
            feature.geometry
        );
    }
}

#[test]
fn budget_beyond_cap_is_clamped() {
    let graph = grid_graph();
    let (start, end) = corners(&graph);
    let min_time = minimum_time(&graph, start, end).unwrap();
    let params = PrismParams::default();

    let capped = compute_leg_prism(&graph, start, end, min_time * 1.3, &params).unwrap();
    let generous = compute_leg_prism(&graph, start, end, min_time * 10.0, &params).unwrap();

    assert_eq!(capped.features.len(), generous.features.len());
    assert_eq!(capped.effective_cutoff, generous.effective_cutoff);
}

#[test]
fn chain_length_is_sum_of_leg_lengths() {
    let graph = grid_graph();
    let ids = [0, SIDE - 1, SIDE * SIDE - 1, 2 * SIDE];
    let times = [0.0, 70.0, 140.0, 100.0];
    let params = PrismParams::default().with_length(true);

    let waypoints: Vec<Waypoint> = ids
        .iter()
        .zip(times)
        .map(|(&id, t)| Waypoint::new(graph.node_index(id).unwrap(), t))
        .collect();

    let chain = compute_chain_prism(&graph, &waypoints, &params).unwrap();

    let mut meters = 0.0;
    let mut features = 0;
    for pair in waypoints.windows(2) {
        let budget = pair[1].timestamp - pair[0].timestamp;
        if budget <= 0.0 {
            continue;
        }
        let leg = compute_leg_prism(&graph, pair[0].node, pair[1].node, budget, &params).unwrap();
        meters += leg.total_length.unwrap_or(0.0);
        features += leg.features.len();
    }

    assert_eq!(chain.features.len(), features);
    assert_eq!(chain.total_length_km, Some((meters / 1000.0 * 1000.0).round() / 1000.0));
}

#[test]
fn raised_stop_flag_cancels_the_chain() {
    let graph = grid_graph();
    let (start, end) = corners(&graph);
    let stop = StopFlag::new();
    stop.raise();

    let result = compute_chain_prism(
        &graph,
        &[Waypoint::new(start, 0.0), Waypoint::new(end, 500.0)],
        &PrismParams::default().with_stop(stop),
    );

    assert!(matches!(result, Err(Error::Cancelled)));
}

#[test]
fn stop_flag_raised_during_search_cancels_it() {
    let graph = square_grid(400);
    let origin = graph.node_index(0).unwrap();
    let stop = StopFlag::new();

    let result = thread::scope(|scope| {
        let search = scope.spawn(|| {
            bounded_search(
                &graph,
                origin,
                SearchDirection::Forward,
                f64::MAX,
                Some(&stop),
            )
        });
        thread::sleep(Duration::from_millis(2));
        stop.raise();
        search.join().unwrap()
    });

    assert!(matches!(result, Err(Error::Cancelled)));
}

#[test]
fn unraised_stop_flag_lets_search_finish() {
    let graph = grid_graph();
    let origin = graph.node_index(0).unwrap();
    let stop = StopFlag::new();

    let distances = bounded_search(
        &graph,
        origin,
        SearchDirection::Forward,
        f64::MAX,
        Some(&stop),
    )
    .unwrap();

    assert_eq!(distances.len(), graph.node_count());
}

#[test]
fn prism_over_csv_network() {
    let dir = tempfile::tempdir().unwrap();
    let nodes_path = dir.path().join("nodes.csv");
    let edges_path = dir.path().join("edges.csv");

    let mut nodes = std::fs::File::create(&nodes_path).unwrap();
    writeln!(nodes, "osmid,x,y").unwrap();
    for (id, x) in [(10, 0.0), (20, 0.001), (30, 0.002), (40, 0.003)] {
        writeln!(nodes, "{id},{x},51.5").unwrap();
    }

    let mut edges = std::fs::File::create(&edges_path).unwrap();
    writeln!(edges, "u,v,key,travel_time,length,speed_kph,geometry").unwrap();
    writeln!(edges, "10,20,0,100,70,,").unwrap();
    writeln!(edges, "20,30,0,100,70,,").unwrap();
    writeln!(edges, "30,40,0,100,70,,\"LINESTRING (0.002 51.5, 0.0025 51.5001, 0.003 51.5)\"").unwrap();
    drop((nodes, edges));

    let graph = create_road_graph(&RoadGraphConfig::new(&nodes_path, &edges_path)).unwrap();
    let start = graph.node_index(10).unwrap();
    let end = graph.node_index(40).unwrap();

    let result = compute_leg_prism(
        &graph,
        start,
        end,
        350.0,
        &PrismParams::default().with_length(true),
    )
    .unwrap();

    assert_eq!(result.min_time, Some(300.0));
    assert_eq!(result.features.len(), 3);
    assert_eq!(result.total_length, Some(210.0));
    assert_eq!(result.features[2].geometry.0.len(), 3);
}
