use std::{
    net::{Ipv4Addr, SocketAddr},
    path::{Path, PathBuf},
};

use clap::Parser;
use roadprism_core::{
    DEFAULT_DETOUR_RATIO, RoadGraphConfig,
    loading::{DEFAULT_SPEED_BUFFER_KPH, DEFAULT_SPEED_KPH},
};
use serde::Deserialize;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read config file '{path}': {source}")]
    Read {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("Failed to parse config file '{path}': {source}")]
    Parse {
        path: PathBuf,
        source: toml::de::Error,
    },
    #[error("Invalid configuration: {0}")]
    Invalid(String),
}

/// Command line of the prism service. Flags override the config file.
#[derive(Debug, Parser)]
#[command(version, about = "Space-time prism HTTP service")]
pub struct Args {
    /// TOML config file
    #[arg(short, long)]
    pub config: Option<PathBuf>,
    #[arg(long)]
    pub bind: Option<SocketAddr>,
    /// Road node CSV (`osmid,x,y`)
    #[arg(long)]
    pub nodes: Option<PathBuf>,
    /// Road edge CSV (`u,v,key,travel_time,length,speed_kph,geometry`)
    #[arg(long)]
    pub edges: Option<PathBuf>,
    #[arg(long)]
    pub detour_ratio: Option<f64>,
    #[arg(long)]
    pub request_timeout_secs: Option<u64>,
    #[arg(long)]
    pub concurrency_limit: Option<usize>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ServerConfig {
    pub bind: SocketAddr,
    pub nodes_path: PathBuf,
    pub edges_path: PathBuf,
    pub detour_ratio: f64,
    pub speed_buffer_kph: f64,
    pub default_speed_kph: f64,
    pub request_timeout_secs: u64,
    pub concurrency_limit: usize,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            bind: SocketAddr::from((Ipv4Addr::LOCALHOST, 8000)),
            nodes_path: PathBuf::from("data/nodes.csv"),
            edges_path: PathBuf::from("data/edges.csv"),
            detour_ratio: DEFAULT_DETOUR_RATIO,
            speed_buffer_kph: DEFAULT_SPEED_BUFFER_KPH,
            default_speed_kph: DEFAULT_SPEED_KPH,
            request_timeout_secs: 30,
            concurrency_limit: 64,
        }
    }
}

impl ServerConfig {
    pub fn from_file(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        toml::from_str(&content).map_err(|source| ConfigError::Parse {
            path: path.to_path_buf(),
            source,
        })
    }

    /// Config file (or defaults) with command line overrides applied
    pub fn from_args(args: Args) -> Result<Self, ConfigError> {
        let mut config = match &args.config {
            Some(path) => Self::from_file(path)?,
            None => Self::default(),
        };

        if let Some(bind) = args.bind {
            config.bind = bind;
        }
        if let Some(nodes) = args.nodes {
            config.nodes_path = nodes;
        }
        if let Some(edges) = args.edges {
            config.edges_path = edges;
        }
        if let Some(ratio) = args.detour_ratio {
            config.detour_ratio = ratio;
        }
        if let Some(timeout) = args.request_timeout_secs {
            config.request_timeout_secs = timeout;
        }
        if let Some(limit) = args.concurrency_limit {
            config.concurrency_limit = limit;
        }

        config.validate()?;
        Ok(config)
    }

    fn validate(&self) -> Result<(), ConfigError> {
        if !(self.detour_ratio.is_finite() && self.detour_ratio >= 1.0) {
            return Err(ConfigError::Invalid(format!(
                "detour_ratio must be at least 1, got {}",
                self.detour_ratio
            )));
        }
        if self.request_timeout_secs == 0 || self.concurrency_limit == 0 {
            return Err(ConfigError::Invalid(
                "request_timeout_secs and concurrency_limit must be positive".to_string(),
            ));
        }
        Ok(())
    }

    pub fn graph_config(&self) -> RoadGraphConfig {
        let mut graph = RoadGraphConfig::new(&self.nodes_path, &self.edges_path);
        graph.speed_buffer_kph = self.speed_buffer_kph;
        graph.default_speed_kph = self.default_speed_kph;
        graph
    }
}
