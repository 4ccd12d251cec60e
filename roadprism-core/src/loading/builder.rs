use log::info;

use super::config::RoadGraphConfig;
use super::csv_export::road_graph_from_csv;
use crate::{Error, RoadGraph};

/// Creates the road graph described by the configuration
///
/// # Errors
///
/// Returns an error if the input files are missing, unreadable or contain no nodes
pub fn create_road_graph(config: &RoadGraphConfig) -> Result<RoadGraph, Error> {
    validate_config(config)?;

    info!(
        "Processing road network: {} / {}",
        config.nodes_path.display(),
        config.edges_path.display()
    );
    let graph = road_graph_from_csv(config)?;

    info!(
        "Road graph created successfully: {} nodes, {} edges",
        graph.node_count(),
        graph.edge_count()
    );
    // CSV deserialization allocates a lot of short lived strings. This call
    // returns free memory from the tail of the heap back to the system.
    //
    // # Safety
    //
    // This call is safe to use on linux with glibc implementation
    // which is checked by the cfg attribute in compile time.
    #[cfg(all(target_os = "linux", target_env = "gnu"))]
    unsafe {
        if libc::malloc_trim(0) == 0 {
            log::warn!("Memory trimming failed - continuing anyway");
        } else {
            log::debug!("Successfully trimmed unused heap memory");
        }
    }
    Ok(graph)
}

fn validate_config(config: &RoadGraphConfig) -> Result<(), Error> {
    for path in [&config.nodes_path, &config.edges_path] {
        if !path.exists() {
            return Err(Error::IoError(std::io::Error::new(
                std::io::ErrorKind::NotFound,
                format!("Road network file not found: {}", path.display()),
            )));
        }
    }

    if !config.speed_buffer_kph.is_finite() || !config.default_speed_kph.is_finite() {
        return Err(Error::InvalidData(
            "Speed settings must be finite numbers".to_string(),
        ));
    }

    Ok(())
}
