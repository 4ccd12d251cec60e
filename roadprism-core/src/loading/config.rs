use std::path::PathBuf;

/// Speed added to every road when travel times are derived from lengths, in km/h
pub const DEFAULT_SPEED_BUFFER_KPH: f64 = 12.07;
/// Speed assumed for roads without a known speed, in km/h
pub const DEFAULT_SPEED_KPH: f64 = 40.0;

/// Where to read the road network from and how to derive missing travel times
#[derive(Debug, Clone)]
pub struct RoadGraphConfig {
    /// CSV with `osmid,x,y` columns
    pub nodes_path: PathBuf,
    /// CSV with `u,v,key,travel_time,length,speed_kph,geometry` columns
    pub edges_path: PathBuf,
    pub speed_buffer_kph: f64,
    pub default_speed_kph: f64,
}

impl RoadGraphConfig {
    pub fn new(nodes_path: impl Into<PathBuf>, edges_path: impl Into<PathBuf>) -> Self {
        Self {
            nodes_path: nodes_path.into(),
            edges_path: edges_path.into(),
            speed_buffer_kph: DEFAULT_SPEED_BUFFER_KPH,
            default_speed_kph: DEFAULT_SPEED_KPH,
        }
    }
}
