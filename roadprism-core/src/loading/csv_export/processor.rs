use geo::LineString;
use hashbrown::HashSet;
use log::{debug, info, warn};
use wkt::TryFromWkt;

use super::{
    parser::{deserialize_csv_file, parse_non_negative, parse_speed},
    raw_types::{RawEdge, RawNode},
};
use crate::{Error, OsmNodeId, RoadEdge, RoadGraph, RoadNode, Seconds, loading::RoadGraphConfig};

/// Builds the road graph from a node CSV and an edge CSV
pub(crate) fn road_graph_from_csv(config: &RoadGraphConfig) -> Result<RoadGraph, Error> {
    let raw_nodes: Vec<RawNode> = deserialize_csv_file(&config.nodes_path)?;
    let raw_edges: Vec<RawEdge> = deserialize_csv_file(&config.edges_path)?;

    let nodes = raw_nodes
        .iter()
        .filter_map(convert_node)
        .collect::<Vec<_>>();
    if nodes.len() < raw_nodes.len() {
        warn!(
            "{} of {} nodes have no usable id or coordinates and were dropped",
            raw_nodes.len() - nodes.len(),
            raw_nodes.len()
        );
    }
    if nodes.is_empty() {
        return Err(Error::InvalidData(format!(
            "No road nodes found in '{}'",
            config.nodes_path.display()
        )));
    }

    let known: HashSet<OsmNodeId> = nodes.iter().map(|node| node.id).collect();
    let mut dangling = 0usize;
    let edges = raw_edges
        .iter()
        .filter_map(|raw| {
            let edge = convert_edge(raw, config)?;
            if known.contains(&edge.0) && known.contains(&edge.1) {
                Some(edge)
            } else {
                dangling += 1;
                None
            }
        })
        .collect::<Vec<_>>();
    if dangling > 0 {
        warn!("Skipped {dangling} edges referencing unknown nodes");
    }

    info!("Read {} road nodes and {} road edges", nodes.len(), edges.len());
    RoadGraph::from_parts(nodes, edges)
}

fn convert_node(raw: &RawNode) -> Option<RoadNode> {
    let id = raw.osmid.trim().parse::<OsmNodeId>().ok()?;
    let x = raw.x.trim().parse::<f64>().ok().filter(|x| x.is_finite())?;
    let y = raw.y.trim().parse::<f64>().ok().filter(|y| y.is_finite())?;
    Some(RoadNode::new(id, x, y))
}

fn convert_edge(raw: &RawEdge, config: &RoadGraphConfig) -> Option<(OsmNodeId, OsmNodeId, RoadEdge)> {
    let from = raw.u.trim().parse::<OsmNodeId>().ok()?;
    let to = raw.v.trim().parse::<OsmNodeId>().ok()?;

    let length = parse_non_negative(&raw.length);
    let mut edge = RoadEdge::new(travel_time(raw, length, config))
        .with_key(raw.key.trim().parse().unwrap_or(0));

    if let Some(length) = length {
        edge = edge.with_length(length);
    }
    if !raw.geometry.trim().is_empty() {
        match LineString::<f64>::try_from_wkt_str(&raw.geometry) {
            Ok(geometry) => edge = edge.with_geometry(geometry),
            Err(e) => debug!("Ignoring geometry of edge {from} -> {to}: {e}"),
        }
    }

    Some((from, to, edge))
}

/// Stored travel time, else length over the buffered speed, else 0
fn travel_time(raw: &RawEdge, length: Option<f64>, config: &RoadGraphConfig) -> Seconds {
    if let Some(seconds) = parse_non_negative(&raw.travel_time) {
        return seconds;
    }

    let Some(length) = length else {
        return 0.0;
    };

    let speed_kph = parse_speed(&raw.speed_kph).unwrap_or(config.default_speed_kph)
        + config.speed_buffer_kph;
    if speed_kph > 0.0 {
        length / (speed_kph / 3.6)
    } else {
        0.0
    }
}
