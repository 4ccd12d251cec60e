use pyo3::prelude::*;
use pyo3_stub_gen::derive::gen_stub_pyfunction;
use roadprism_core::prelude::*;

use crate::graph::{PyRoadGraph, to_py_err};

/// Fastest travel time in seconds between two nodes, None when no path exists
#[pyfunction]
#[gen_stub_pyfunction]
pub fn minimum_time(
    py: Python<'_>,
    graph: &PyRoadGraph,
    start: OsmNodeId,
    end: OsmNodeId,
) -> PyResult<Option<f64>> {
    let start = graph.index_of(start)?;
    let end = graph.index_of(end)?;

    py.detach(
        || match roadprism_core::minimum_time(&graph.inner, start, end) {
            Ok(seconds) => Ok(Some(seconds)),
            Err(Error::NoPath) => Ok(None),
            Err(e) => Err(to_py_err(e)),
        },
    )
}

/// Space-time prism of a single leg
///
/// Every road segment that can be traversed on the way from ``start`` to ``end``
/// within ``budget`` seconds, capped at ``detour_ratio`` times the fastest time.
///
/// Parameters
/// ----------
/// graph : RoadGraph
/// start : int
///     OSM id of the origin node
/// end : int
///     OSM id of the destination node
/// budget : float
///     Available time in seconds
/// detour_ratio : float, default=1.3
///     Upper bound on the prism relative to the fastest travel time
/// include_length : bool, default=False
///     Report the summed segment length as ``properties.total_length_m``
///
/// Returns
/// -------
/// str
///     GeoJSON FeatureCollection of LineStrings with ``score`` and ``time_cost``
///     properties. Empty when the budget is not positive, below the fastest
///     time, or when no path exists.
#[pyfunction]
#[gen_stub_pyfunction]
#[pyo3(signature = (graph, start, end, budget, detour_ratio = 1.3, include_length = false))]
pub fn compute_leg_prism(
    py: Python<'_>,
    graph: &PyRoadGraph,
    start: OsmNodeId,
    end: OsmNodeId,
    budget: f64,
    detour_ratio: f64,
    include_length: bool,
) -> PyResult<String> {
    let start = graph.index_of(start)?;
    let end = graph.index_of(end)?;
    let params = PrismParams::default()
        .with_detour_ratio(detour_ratio)
        .with_length(include_length);

    py.detach(|| {
        roadprism_core::compute_leg_prism(&graph.inner, start, end, budget, &params)
            .and_then(|result| result.to_geojson_string())
            .map_err(to_py_err)
    })
}

/// Union of the prisms of consecutive waypoints
///
/// Parameters
/// ----------
/// graph : RoadGraph
/// node_ids : list[int]
///     OSM ids of the waypoints, in visiting order
/// timestamps : list[float]
///     Time of each waypoint in seconds, relative or since epoch
/// include_length : bool, default=False
///     Report the summed length of all legs as ``properties.total_length_km``
/// detour_ratio : float, default=1.3
///
/// Returns
/// -------
/// str
///     GeoJSON FeatureCollection. Legs with a non-positive time difference are skipped.
///
/// Raises
/// ------
/// ValueError
///     With fewer than two waypoints or mismatched list lengths
/// LookupError
///     For node ids missing from the graph
#[pyfunction]
#[gen_stub_pyfunction]
#[pyo3(signature = (graph, node_ids, timestamps, include_length = false, detour_ratio = 1.3))]
pub fn compute_chain_prism(
    py: Python<'_>,
    graph: &PyRoadGraph,
    node_ids: Vec<OsmNodeId>,
    timestamps: Vec<f64>,
    include_length: bool,
    detour_ratio: f64,
) -> PyResult<String> {
    if node_ids.len() != timestamps.len() {
        return Err(PyErr::new::<pyo3::exceptions::PyValueError, _>(format!(
            "Got {} node ids but {} timestamps",
            node_ids.len(),
            timestamps.len()
        )));
    }

    let waypoints = node_ids
        .iter()
        .zip(timestamps)
        .map(|(&id, timestamp)| graph.index_of(id).map(|node| Waypoint::new(node, timestamp)))
        .collect::<PyResult<Vec<_>>>()?;
    let params = PrismParams::default()
        .with_detour_ratio(detour_ratio)
        .with_length(include_length);

    py.detach(|| {
        roadprism_core::compute_chain_prism(&graph.inner, &waypoints, &params)
            .and_then(|chain| chain.to_geojson_string())
            .map_err(to_py_err)
    })
}
