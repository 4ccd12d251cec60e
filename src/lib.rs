use pyo3::prelude::*;
use pyo3_stub_gen::define_stub_info_gatherer;

use graph::{PyRoadGraph, PyRoute, py_create_road_graph, shortest_route};
use prism::{compute_chain_prism, compute_leg_prism, minimum_time};

pub mod graph;
pub mod prism;

/// Space-time prisms over road networks, implemented in Rust.
#[pymodule]
fn roadprism(m: &Bound<'_, PyModule>) -> PyResult<()> {
    pyo3_log::init();

    m.add_class::<PyRoadGraph>()?;
    m.add_class::<PyRoute>()?;
    m.add_function(wrap_pyfunction!(py_create_road_graph, m)?)?;
    m.add_function(wrap_pyfunction!(shortest_route, m)?)?;

    m.add_function(wrap_pyfunction!(minimum_time, m)?)?;
    m.add_function(wrap_pyfunction!(compute_leg_prism, m)?)?;
    m.add_function(wrap_pyfunction!(compute_chain_prism, m)?)?;
    Ok(())
}

define_stub_info_gatherer!(stub_info);
