use std::{sync::Arc, time::Duration};

use axum::{
    BoxError, Json, Router,
    error_handling::HandleErrorLayer,
    extract::{Query, State},
    http::StatusCode,
    routing::{get, post},
};
use geo::Point;
use geojson::FeatureCollection;
use roadprism_core::{
    Error, OsmNodeId, PrismParams, Seconds, StopFlag, Waypoint, compute_chain_prism,
    shortest_route,
};
use serde::{Deserialize, Serialize};
use tokio::task;
use tower::{ServiceBuilder, timeout::error::Elapsed};
use tower_http::{cors::CorsLayer, trace::TraceLayer};
use tracing::debug;

use crate::{config::ServerConfig, error::ApiError, state::AppState};

pub fn create_router(state: AppState, config: &ServerConfig) -> Router {
    Router::new()
        .route("/health", get(health))
        .route("/nearest-node", get(nearest_node))
        .route("/route", get(route))
        .route("/analyze/chain", post(analyze_chain))
        .layer(
            ServiceBuilder::new()
                .layer(HandleErrorLayer::new(handle_middleware_error))
                .concurrency_limit(config.concurrency_limit)
                .timeout(Duration::from_secs(config.request_timeout_secs)),
        )
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
        .with_state(state)
}

async fn handle_middleware_error(err: BoxError) -> (StatusCode, String) {
    if err.is::<Elapsed>() {
        (StatusCode::REQUEST_TIMEOUT, "Request timed out".to_string())
    } else {
        (
            StatusCode::INTERNAL_SERVER_ERROR,
            format!("Unhandled internal error: {err}"),
        )
    }
}

async fn health() -> &'static str {
    "ok"
}

#[derive(Debug, Deserialize)]
struct NearestNodeQuery {
    lat: f64,
    lng: f64,
}

#[derive(Debug, Serialize)]
struct NearestNodeResponse {
    node_id: OsmNodeId,
}

async fn nearest_node(
    State(state): State<AppState>,
    Query(query): Query<NearestNodeQuery>,
) -> Result<Json<NearestNodeResponse>, ApiError> {
    if !(query.lat.is_finite() && query.lng.is_finite()) {
        return Err(ApiError::BadRequest(
            "lat and lng must be finite".to_string(),
        ));
    }

    state
        .graph
        .nearest_node(&Point::new(query.lng, query.lat))
        .and_then(|node| state.graph.osm_id(node))
        .map(|node_id| Json(NearestNodeResponse { node_id }))
        .ok_or_else(|| ApiError::NotFound("Road graph has no nodes".to_string()))
}

#[derive(Debug, Deserialize)]
struct RouteQuery {
    start_node: OsmNodeId,
    end_node: OsmNodeId,
}

#[derive(Debug, Serialize)]
struct PathPoint {
    #[serde(rename = "nodeId")]
    node_id: OsmNodeId,
    lat: f64,
    lng: f64,
}

#[derive(Debug, Serialize)]
struct RouteResponse {
    path: Vec<PathPoint>,
    travel_time: Seconds,
    length: f64,
}

async fn route(
    State(state): State<AppState>,
    Query(query): Query<RouteQuery>,
) -> Result<Json<RouteResponse>, ApiError> {
    let start = state.graph.node_index(query.start_node)?;
    let end = state.graph.node_index(query.end_node)?;

    let graph = Arc::clone(&state.graph);
    let route = task::spawn_blocking(move || shortest_route(&graph, start, end))
        .await
        .map_err(|e| ApiError::Internal(e.to_string()))??;

    let path = route
        .nodes
        .iter()
        .map(|node| PathPoint {
            node_id: node.id,
            lat: node.geometry.y(),
            lng: node.geometry.x(),
        })
        .collect();

    Ok(Json(RouteResponse {
        path,
        travel_time: route.travel_time,
        length: route.length,
    }))
}

#[derive(Debug, Deserialize)]
struct ChainPoint {
    node_id: OsmNodeId,
    /// Seconds, relative or since epoch
    time: Seconds,
}

#[derive(Debug, Deserialize)]
struct ChainRequest {
    #[serde(default)]
    points: Vec<ChainPoint>,
    #[serde(default)]
    include_metrics: bool,
    detour_ratio: Option<f64>,
}

/// Raises the stop flag when the request future is dropped, so a timed out or
/// abandoned request does not keep its searches running
struct RaiseOnDrop(StopFlag);

impl Drop for RaiseOnDrop {
    fn drop(&mut self) {
        self.0.raise();
    }
}

async fn analyze_chain(
    State(state): State<AppState>,
    Json(request): Json<ChainRequest>,
) -> Result<Json<FeatureCollection>, ApiError> {
    if request.points.len() < 2 {
        return Err(ApiError::BadRequest("Need at least 2 points".to_string()));
    }

    let waypoints = request
        .points
        .iter()
        .map(|point| {
            state
                .graph
                .node_index(point.node_id)
                .map(|node| Waypoint::new(node, point.time))
        })
        .collect::<Result<Vec<_>, Error>>()?;

    let stop = StopFlag::new();
    let _guard = RaiseOnDrop(stop.clone());
    let params = PrismParams::default()
        .with_detour_ratio(request.detour_ratio.unwrap_or(state.detour_ratio))
        .with_length(request.include_metrics)
        .with_stop(stop);

    debug!("Analyzing chain of {} waypoints", waypoints.len());

    let graph = Arc::clone(&state.graph);
    let collection = task::spawn_blocking(move || {
        compute_chain_prism(&graph, &waypoints, &params)?.to_geojson()
    })
    .await
    .map_err(|e| ApiError::Internal(e.to_string()))??;

    Ok(Json(collection))
}
