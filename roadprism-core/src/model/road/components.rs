//! Road network components - nodes and edges

use geo::{LineString, Point, line_string};

use crate::{Meters, OsmNodeId, Seconds};

/// Road graph node (intersection or shape point)
#[derive(Debug, Clone)]
pub struct RoadNode {
    /// OSM ID of the node
    pub id: OsmNodeId,
    /// Node coordinates, x is longitude and y is latitude
    pub geometry: Point<f64>,
}

impl RoadNode {
    pub fn new(id: OsmNodeId, x: f64, y: f64) -> Self {
        Self {
            id,
            geometry: Point::new(x, y),
        }
    }
}

/// Directed road segment
///
/// Parallel segments between the same pair of nodes are told apart by `key`;
/// the lowest key is the one used when a single representative is needed.
#[derive(Debug, Clone, Default)]
pub struct RoadEdge {
    /// Driving time in seconds, never negative
    pub travel_time: Seconds,
    /// Physical length in meters
    pub length: Option<Meters>,
    /// Road shape, when the source data has one
    pub geometry: Option<LineString<f64>>,
    /// Disambiguates parallel edges
    pub key: u32,
}

impl RoadEdge {
    pub fn new(travel_time: Seconds) -> Self {
        Self {
            travel_time,
            ..Self::default()
        }
    }

    #[must_use]
    pub fn with_length(mut self, length: Meters) -> Self {
        self.length = Some(length);
        self
    }

    #[must_use]
    pub fn with_geometry(mut self, geometry: LineString<f64>) -> Self {
        self.geometry = Some(geometry);
        self
    }

    #[must_use]
    pub fn with_key(mut self, key: u32) -> Self {
        self.key = key;
        self
    }

    /// Stored shape, or a straight segment between the two endpoints
    pub fn geometry_or_segment(&self, from: &RoadNode, to: &RoadNode) -> LineString<f64> {
        match &self.geometry {
            Some(geometry) if geometry.0.len() > 1 => geometry.clone(),
            _ => line_string![
                (x: from.geometry.x(), y: from.geometry.y()),
                (x: to.geometry.x(), y: to.geometry.y()),
            ],
        }
    }
}
