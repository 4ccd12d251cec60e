//! Road network graph with spatial index

use geo::Point;
use hashbrown::HashMap;
use petgraph::{
    Direction,
    graph::{DiGraph, EdgeReference, NodeIndex},
};
use rstar::{RTree, primitives::GeomWithData};

use super::components::{RoadEdge, RoadNode};
use crate::{Error, OsmNodeId};

/// R-tree entry: node coordinates as `[x, y]` with the node index attached
pub type IndexedPoint = GeomWithData<[f64; 2], NodeIndex>;

/// Immutable directed road multigraph
///
/// Outgoing edges give the forward adjacency, incoming edges the reverse view
/// used by backward searches. Built once and shared read-only between requests.
#[derive(Debug, Clone)]
pub struct RoadGraph {
    pub(crate) graph: DiGraph<RoadNode, RoadEdge>,
    rtree: RTree<IndexedPoint>,
    id_index: HashMap<OsmNodeId, NodeIndex>,
}

impl RoadGraph {
    /// Builds a graph from nodes and `(from, to, edge)` triples keyed by OSM id
    ///
    /// # Errors
    ///
    /// Returns an error on duplicate node ids, edges referencing unknown nodes,
    /// or travel times that are negative or not finite.
    pub fn from_parts(
        nodes: Vec<RoadNode>,
        edges: Vec<(OsmNodeId, OsmNodeId, RoadEdge)>,
    ) -> Result<Self, Error> {
        let mut graph = DiGraph::with_capacity(nodes.len(), edges.len());
        let mut id_index = HashMap::with_capacity(nodes.len());

        for node in nodes {
            let id = node.id;
            let idx = graph.add_node(node);
            if id_index.insert(id, idx).is_some() {
                return Err(Error::InvalidData(format!("Duplicate road node {id}")));
            }
        }

        for (from, to, edge) in edges {
            if !edge.travel_time.is_finite() || edge.travel_time < 0.0 {
                return Err(Error::InvalidData(format!(
                    "Edge {from} -> {to} has invalid travel time {}",
                    edge.travel_time
                )));
            }
            let source = *id_index.get(&from).ok_or(Error::UnknownNode(from))?;
            let target = *id_index.get(&to).ok_or(Error::UnknownNode(to))?;
            graph.add_edge(source, target, edge);
        }

        Ok(Self::new(graph, id_index))
    }

    fn new(graph: DiGraph<RoadNode, RoadEdge>, id_index: HashMap<OsmNodeId, NodeIndex>) -> Self {
        let points = graph
            .node_indices()
            .map(|idx| {
                let point = graph[idx].geometry;
                GeomWithData::new([point.x(), point.y()], idx)
            })
            .collect();

        Self {
            graph,
            rtree: RTree::bulk_load(points),
            id_index,
        }
    }

    pub fn node_count(&self) -> usize {
        self.graph.node_count()
    }

    pub fn edge_count(&self) -> usize {
        self.graph.edge_count()
    }

    pub fn graph(&self) -> &DiGraph<RoadNode, RoadEdge> {
        &self.graph
    }

    pub fn node(&self, node: NodeIndex) -> Option<&RoadNode> {
        self.graph.node_weight(node)
    }

    /// Resolves an OSM node id into a graph index
    pub fn node_index(&self, id: OsmNodeId) -> Result<NodeIndex, Error> {
        self.id_index
            .get(&id)
            .copied()
            .ok_or(Error::UnknownNode(id))
    }

    pub fn osm_id(&self, node: NodeIndex) -> Option<OsmNodeId> {
        self.node(node).map(|n| n.id)
    }

    pub fn contains(&self, node: NodeIndex) -> bool {
        node.index() < self.graph.node_count()
    }

    /// Edges leaving `node` for [`Direction::Outgoing`], entering it for [`Direction::Incoming`]
    pub fn edges_directed(
        &self,
        node: NodeIndex,
        direction: Direction,
    ) -> impl Iterator<Item = EdgeReference<'_, RoadEdge>> {
        self.graph.edges_directed(node, direction)
    }

    /// Closest node to a point, by planar distance in coordinate units
    pub fn nearest_node(&self, point: &Point<f64>) -> Option<NodeIndex> {
        self.rtree
            .nearest_neighbor(&[point.x(), point.y()])
            .map(|entry| entry.data)
    }
}

#[cfg(test)]
mod tests {
    use petgraph::visit::EdgeRef;

    use super::*;

    fn triangle() -> RoadGraph {
        let nodes = vec![
            RoadNode::new(10, 0.0, 0.0),
            RoadNode::new(20, 1.0, 0.0),
            RoadNode::new(30, 0.0, 1.0),
        ];
        let edges = vec![
            (10, 20, RoadEdge::new(5.0)),
            (20, 30, RoadEdge::new(5.0)),
            (30, 10, RoadEdge::new(5.0)),
        ];
        RoadGraph::from_parts(nodes, edges).unwrap()
    }

    #[test]
    fn resolves_osm_ids() {
        let graph = triangle();
        let idx = graph.node_index(20).unwrap();

        assert_eq!(graph.osm_id(idx), Some(20));
        assert!(matches!(graph.node_index(99), Err(Error::UnknownNode(99))));
    }

    #[test]
    fn reverse_view_lists_incoming_edges() {
        let graph = triangle();
        let idx = graph.node_index(10).unwrap();

        let incoming: Vec<_> = graph
            .edges_directed(idx, Direction::Incoming)
            .map(|e| graph.osm_id(e.source()))
            .collect();

        assert_eq!(incoming, vec![Some(30)]);
    }

    #[test]
    fn nearest_node_uses_spatial_index() {
        let graph = triangle();
        let nearest = graph.nearest_node(&Point::new(0.9, 0.1)).unwrap();

        assert_eq!(graph.osm_id(nearest), Some(20));
    }

    #[test]
    fn rejects_edges_to_unknown_nodes() {
        let nodes = vec![RoadNode::new(1, 0.0, 0.0)];
        let edges = vec![(1, 2, RoadEdge::new(1.0))];

        assert!(matches!(
            RoadGraph::from_parts(nodes, edges),
            Err(Error::UnknownNode(2))
        ));
    }

    #[test]
    fn rejects_negative_travel_time() {
        let nodes = vec![RoadNode::new(1, 0.0, 0.0), RoadNode::new(2, 0.0, 1.0)];
        let edges = vec![(1, 2, RoadEdge::new(-1.0))];

        assert!(matches!(
            RoadGraph::from_parts(nodes, edges),
            Err(Error::InvalidData(_))
        ));
    }
}
