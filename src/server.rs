//! HTTP Server - serves the device map UI and figure API
//!
//! Endpoints:
//! - GET  /              → Checklist + map page
//! - GET  /api/devices   → Device ids with colors and sample counts
//! - GET  /api/figure    → Figure for all devices (initial state)
//! - POST /api/figure    → Figure for the posted selection
//! - GET  /api/config    → Effective map configuration

use axum::{
    extract::State,
    response::{Html, IntoResponse},
    routing::get,
    Json, Router,
};
use serde::Deserialize;
use tower_http::cors::{Any, CorsLayer};

use crate::filter::FilterSelection;
use crate::log_request;
use crate::page;
use crate::state::AppState;

/// Build the router for the given state
pub fn router(state: AppState) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);
    tracing::debug!("CORS layer configured: allow_origin=Any");

    let api = Router::new()
        .route("/devices", get(list_devices))
        .route("/figure", get(initial_figure).post(update_figure))
        .route("/config", get(get_config))
        .with_state(state);
    tracing::debug!("API routes registered");

    Router::new()
        .route("/", get(index))
        .nest("/api", api)
        .layer(cors)
}

/// Start the HTTP server
pub async fn serve(state: AppState, port: u16) -> anyhow::Result<()> {
    tracing::info!("Initializing HTTP server on port {}", port);
    tracing::info!(
        "  Serving {} records across {} devices",
        state.dataset.len(),
        state.dataset.device_count()
    );

    let app = router(state);

    let addr = format!("0.0.0.0:{}", port);
    tracing::info!("Starting server on http://localhost:{}", port);

    let listener = tokio::net::TcpListener::bind(&addr).await?;
    tracing::info!("Server bound to {}", addr);
    axum::serve(listener, app).await?;

    Ok(())
}

/// GET / - Single page UI
async fn index() -> Html<&'static str> {
    log_request!("GET", "/");
    Html(page::INDEX_HTML)
}

/// GET /api/devices - Checklist entries
async fn list_devices(State(state): State<AppState>) -> impl IntoResponse {
    log_request!("GET", "/api/devices");
    let devices = state.devices();
    tracing::debug!("Returning {} devices", devices.len());
    Json(devices)
}

/// Body of a checklist change: the complete new selection
#[derive(Debug, Deserialize)]
pub struct FigureRequest {
    #[serde(default)]
    pub selection: FilterSelection,
}

/// GET /api/figure - Figure with every device selected
async fn initial_figure(State(state): State<AppState>) -> impl IntoResponse {
    log_request!("GET", "/api/figure");
    let selection = FilterSelection::all(&state.dataset);
    let figure = state.render(&selection);
    tracing::info!("Rendered initial figure: {} points", figure.point_count());
    Json(figure)
}

/// POST /api/figure - Re-render for a new selection
async fn update_figure(
    State(state): State<AppState>,
    Json(request): Json<FigureRequest>,
) -> impl IntoResponse {
    log_request!("POST", "/api/figure", devices = request.selection.len());
    let figure = state.render(&request.selection);
    tracing::info!(
        "Rendered figure for {} devices: {} points",
        request.selection.len(),
        figure.point_count()
    );
    Json(figure)
}

/// GET /api/config - Map configuration (token excluded)
async fn get_config(State(state): State<AppState>) -> impl IntoResponse {
    log_request!("GET", "/api/config");
    Json((*state.map).clone())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::MapConfig;
    use crate::dataset::tests::sample_dataset;

    fn state() -> AppState {
        AppState::new(sample_dataset(), MapConfig::default(), Some("pk.test".into()))
    }

    async fn body_json(resp: axum::response::Response) -> serde_json::Value {
        let body = axum::body::to_bytes(resp.into_body(), usize::MAX).await.unwrap();
        serde_json::from_slice(&body).unwrap()
    }

    #[tokio::test]
    async fn test_initial_figure_has_all_points() {
        let resp = initial_figure(State(state())).await.into_response();
        let json = body_json(resp).await;
        assert_eq!(json["data"][0]["lat"].as_array().unwrap().len(), 3);
        assert_eq!(json["layout"]["mapbox"]["accesstoken"], "pk.test");
    }

    #[tokio::test]
    async fn test_update_figure_filters() {
        let request = FigureRequest {
            selection: FilterSelection::from_ids(["CC:DD"]),
        };
        let resp = update_figure(State(state()), Json(request)).await.into_response();
        let json = body_json(resp).await;

        let custom = json["data"][0]["customdata"].as_array().unwrap();
        assert_eq!(custom.len(), 1);
        assert_eq!(custom[0][2], "CC:DD");
    }

    #[tokio::test]
    async fn test_empty_selection_body() {
        let request: FigureRequest = serde_json::from_str(r#"{"selection": []}"#).unwrap();
        let resp = update_figure(State(state()), Json(request)).await.into_response();
        let json = body_json(resp).await;
        assert!(json["data"][0]["lat"].as_array().unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_list_devices() {
        let json = body_json(list_devices(State(state())).await.into_response()).await;
        assert_eq!(json[0]["id"], "AA:BB");
        assert_eq!(json[1]["id"], "CC:DD");
        assert_eq!(json[0]["count"], 2);
    }

    #[tokio::test]
    async fn test_config_excludes_token() {
        let resp = get_config(State(state())).await.into_response();
        let body = axum::body::to_bytes(resp.into_body(), usize::MAX).await.unwrap();
        let text = String::from_utf8(body.to_vec()).unwrap();
        assert!(!text.contains("pk.test"));
        assert!(text.contains("Mapping of devices"));
    }

    #[tokio::test]
    async fn test_index_page() {
        let Html(html) = index().await;
        assert!(html.contains("MAC_address_checklist"));
        assert!(html.contains("/api/figure"));
    }
}
