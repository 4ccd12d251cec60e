use log::{debug, info};
use petgraph::graph::NodeIndex;
use rayon::prelude::*;

use super::{PrismFeature, PrismParams, PrismResult, compute_leg_prism};
use crate::{Error, Meters, RoadGraph, Seconds};

/// Timed anchor of an itinerary
#[derive(Debug, Clone, Copy)]
pub struct Waypoint {
    pub node: NodeIndex,
    /// Seconds, relative or since epoch, as long as all waypoints agree
    pub timestamp: Seconds,
}

impl Waypoint {
    pub fn new(node: NodeIndex, timestamp: Seconds) -> Self {
        Self { node, timestamp }
    }
}

/// Union of the prisms of every leg of an itinerary
#[derive(Debug, Clone, Default)]
pub struct ChainResult {
    /// Features of all legs, in leg order
    pub features: Vec<PrismFeature>,
    /// Summed length of all legs in kilometers, rounded to 3 decimals, when requested
    pub total_length_km: Option<f64>,
}

/// Computes the prism of every consecutive pair of waypoints and merges them
///
/// Legs whose budget is not positive are skipped without error, as are legs with
/// no path or an infeasible budget. Legs are computed in parallel and combined in
/// leg order.
///
/// # Errors
///
/// `MalformedRequest` with fewer than two waypoints or an invalid detour ratio,
/// `Cancelled` when the stop flag is raised, `InvalidNodeIndex` for nodes outside the graph.
pub fn compute_chain_prism(
    graph: &RoadGraph,
    waypoints: &[Waypoint],
    params: &PrismParams,
) -> Result<ChainResult, Error> {
    if waypoints.len() < 2 {
        return Err(Error::MalformedRequest(format!(
            "At least two waypoints are required, got {}",
            waypoints.len()
        )));
    }
    params.validate()?;

    let legs: Vec<Option<PrismResult>> = waypoints
        .par_windows(2)
        .enumerate()
        .map(|(leg_idx, pair)| {
            let (from, to) = (pair[0], pair[1]);
            let budget = to.timestamp - from.timestamp;

            if !(budget > 0.0) {
                debug!("Leg {leg_idx} has a budget of {budget}s, skipping");
                return Ok(None);
            }

            compute_leg_prism(graph, from.node, to.node, budget, params).map(Some)
        })
        .collect::<Result<_, Error>>()?;

    let mut result = ChainResult::default();
    let mut total_length: Meters = 0.0;

    for leg in legs.into_iter().flatten() {
        total_length += leg.total_length.unwrap_or(0.0);
        result.features.extend(leg.features);
    }

    if params.include_length {
        result.total_length_km = Some(round_km(total_length));
    }

    info!(
        "Computed prism over {} legs: {} segments",
        waypoints.len() - 1,
        result.features.len()
    );

    Ok(result)
}

fn round_km(meters: Meters) -> f64 {
    let km = meters / 1000.0;
    (km * 1000.0).round() / 1000.0
}
