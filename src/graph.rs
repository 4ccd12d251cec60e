use geo::Point;
use pyo3::prelude::*;
use pyo3_stub_gen::derive::{gen_stub_pyclass, gen_stub_pyfunction, gen_stub_pymethods};
use roadprism_core::prelude::*;

/// Maps core errors onto the closest Python exception
pub(crate) fn to_py_err(err: Error) -> PyErr {
    match err {
        Error::UnknownNode(_) => PyErr::new::<pyo3::exceptions::PyLookupError, _>(err.to_string()),
        Error::MalformedRequest(_) | Error::InvalidNodeIndex | Error::InvalidData(_) => {
            PyErr::new::<pyo3::exceptions::PyValueError, _>(err.to_string())
        }
        _ => PyErr::new::<pyo3::exceptions::PyRuntimeError, _>(err.to_string()),
    }
}

/// RoadGraph
///
/// Directed road network weighted by travel time. Nodes are addressed by their
/// OpenStreetMap ids.
///
/// Example:
///
/// .. code-block:: python
///
///     graph = create_road_graph("nodes.csv", "edges.csv")
///     start = graph.nearest_node(37.77, -122.41)
#[gen_stub_pyclass]
#[pyclass(name = "RoadGraph")]
pub struct PyRoadGraph {
    pub(crate) inner: RoadGraph,
}

impl PyRoadGraph {
    pub(crate) fn index_of(&self, node_id: OsmNodeId) -> PyResult<NodeIndex> {
        self.inner.node_index(node_id).map_err(to_py_err)
    }
}

#[gen_stub_pymethods]
#[pymethods]
impl PyRoadGraph {
    pub fn node_count(&self) -> usize {
        self.inner.node_count()
    }

    pub fn edge_count(&self) -> usize {
        self.inner.edge_count()
    }

    /// OSM id of the node closest to the coordinates, None for an empty graph
    pub fn nearest_node(&self, lat: f64, lon: f64) -> Option<OsmNodeId> {
        self.inner
            .nearest_node(&Point::new(lon, lat))
            .and_then(|node| self.inner.osm_id(node))
    }

    fn __repr__(&self) -> String {
        format!(
            "RoadGraph with {} nodes and {} edges",
            self.inner.node_count(),
            self.inner.edge_count()
        )
    }

    fn __str__(&self) -> String {
        self.__repr__()
    }
}

/// Load a road graph from CSV exports of an OSM network
///
/// Parameters
/// ----------
/// nodes_path : str
///     CSV with ``osmid,x,y`` columns
/// edges_path : str
///     CSV with ``u,v,key,travel_time,length,speed_kph,geometry`` columns,
///     geometry as WKT ``LINESTRING``
/// speed_buffer_kph : float, default=12.07
///     Added to road speeds when travel times are derived from lengths
/// default_speed_kph : float, default=40.0
///     Speed of roads without one
///
/// Returns
/// -------
/// RoadGraph
///
/// Raises
/// ------
/// RuntimeError
///     If a file cannot be read
/// ValueError
///     If the files hold no usable network
///
/// Notes
/// -----
/// The function releases the GIL while loading.
#[gen_stub_pyfunction]
#[pyfunction(name = "create_road_graph")]
#[pyo3(signature = (nodes_path, edges_path, speed_buffer_kph = 12.07, default_speed_kph = 40.0))]
pub fn py_create_road_graph(
    py: Python<'_>,
    nodes_path: &str,
    edges_path: &str,
    speed_buffer_kph: f64,
    default_speed_kph: f64,
) -> PyResult<PyRoadGraph> {
    let mut config = RoadGraphConfig::new(nodes_path, edges_path);
    config.speed_buffer_kph = speed_buffer_kph;
    config.default_speed_kph = default_speed_kph;

    py.detach(|| {
        let graph = create_road_graph(&config).map_err(to_py_err)?;
        Ok(PyRoadGraph { inner: graph })
    })
}

/// Fastest route between two nodes
#[gen_stub_pyclass]
#[pyclass(name = "Route")]
pub struct PyRoute {
    inner: RoutePath,
}

#[gen_stub_pymethods]
#[pymethods]
impl PyRoute {
    /// OSM ids of the visited nodes, in travel order
    #[getter]
    fn node_ids(&self) -> Vec<OsmNodeId> {
        self.inner.nodes.iter().map(|node| node.id).collect()
    }

    /// Visited coordinates as (lat, lon) pairs
    #[getter]
    fn coordinates(&self) -> Vec<(f64, f64)> {
        self.inner
            .nodes
            .iter()
            .map(|node| (node.geometry.y(), node.geometry.x()))
            .collect()
    }

    #[getter]
    fn travel_time(&self) -> f64 {
        self.inner.travel_time
    }

    #[getter]
    fn length(&self) -> f64 {
        self.inner.length
    }

    fn __repr__(&self) -> String {
        format!(
            "Route({} nodes, {:.1} s, {:.1} m)",
            self.inner.nodes.len(),
            self.inner.travel_time,
            self.inner.length
        )
    }
}

/// Fastest route between two nodes by travel time, None when no path exists
#[pyfunction]
#[gen_stub_pyfunction]
pub fn shortest_route(
    py: Python<'_>,
    graph: &PyRoadGraph,
    start: OsmNodeId,
    end: OsmNodeId,
) -> PyResult<Option<PyRoute>> {
    let start = graph.index_of(start)?;
    let end = graph.index_of(end)?;

    py.detach(|| match roadprism_core::shortest_route(&graph.inner, start, end) {
        Ok(route) => Ok(Some(PyRoute { inner: route })),
        Err(Error::NoPath) => Ok(None),
        Err(e) => Err(to_py_err(e)),
    })
}
