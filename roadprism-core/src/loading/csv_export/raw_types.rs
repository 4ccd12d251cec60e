use serde::Deserialize;

#[derive(Debug, Clone, Deserialize, Default)]
#[serde(default)]
pub struct RawNode {
    pub osmid: String,
    pub x: String,
    pub y: String,
}

#[derive(Debug, Clone, Deserialize, Default)]
#[serde(default)]
pub struct RawEdge {
    pub u: String,
    pub v: String,
    pub key: String,
    /// Seconds
    pub travel_time: String,
    /// Meters
    pub length: String,
    /// Either a number or a list such as `[30, 50]` for merged ways
    pub speed_kph: String,
    /// WKT `LINESTRING`
    pub geometry: String,
}
