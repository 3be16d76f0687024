//! HTTP API routes
//!
//! JSON endpoints backing the presentation shell. Every mutating endpoint
//! returns the resulting application state.

use crate::app::state::{Action, AppState as ViewState, Preset};
use crate::coord::{CoordinateSystem, Coordinates};
use crate::error::Error;
use crate::geo::{GeocodeProvider, SearchResult};
use crate::history::Location;
use crate::server::state::AppState;
use crate::storage::KeyValueStore;

use axum::{
    extract::{rejection::JsonRejection, Path, State},
    http::StatusCode,
    response::IntoResponse,
    routing::{get, post, put},
    Json, Router,
};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tower_http::services::ServeDir;

/// Create the API router
pub fn create_router<P, S>(state: Arc<AppState<P, S>>) -> Router
where
    P: GeocodeProvider + 'static,
    S: KeyValueStore + 'static,
{
    // Static shell assets: ./static, then next to the executable
    let static_path = if std::path::Path::new("static").exists() {
        "static".to_string()
    } else {
        std::env::current_exe()
            .ok()
            .and_then(|exe| exe.parent().map(|dir| dir.join("static")))
            .filter(|path| path.exists())
            .map(|path| path.to_string_lossy().to_string())
            .unwrap_or_else(|| "static".to_string())
    };

    Router::new()
        .route("/api/status", get(status_handler::<P, S>))
        .route("/api/state", get(state_handler::<P, S>))
        .route("/api/search", post(search_handler::<P, S>))
        .route("/api/select", post(select_handler::<P, S>))
        .route("/api/pick", post(pick_handler::<P, S>))
        .route("/api/teleport", post(teleport_handler::<P, S>))
        .route(
            "/api/history",
            get(history_handler::<P, S>).delete(history_clear_handler::<P, S>),
        )
        .route("/api/history/:id/select", post(history_select_handler::<P, S>))
        .route("/api/preset", put(preset_handler::<P, S>))
        .route("/api/view-mode/toggle", post(view_mode_handler::<P, S>))
        .route("/api/map-style/toggle", post(map_style_handler::<P, S>))
        .fallback_service(ServeDir::new(&static_path).append_index_html_on_directories(true))
        .with_state(state)
}

/// API error response
#[derive(Debug, Serialize, Deserialize)]
pub struct ApiError {
    pub error: String,
    pub code: String,
}

impl IntoResponse for ApiError {
    fn into_response(self) -> axum::response::Response {
        let status = if self.code == "NOT_FOUND" {
            StatusCode::NOT_FOUND
        } else {
            StatusCode::BAD_REQUEST
        };
        (status, Json(self)).into_response()
    }
}

impl From<Error> for ApiError {
    fn from(err: Error) -> Self {
        let code = match &err {
            Error::InvalidCoordinates(_) => "INVALID_COORDINATES",
            Error::Config(_) => "CONFIG_ERROR",
            Error::Storage(_) => "STORAGE_ERROR",
            _ => "INTERNAL_ERROR",
        };
        ApiError {
            error: err.to_string(),
            code: code.to_string(),
        }
    }
}

impl From<JsonRejection> for ApiError {
    fn from(rejection: JsonRejection) -> Self {
        ApiError {
            error: rejection.body_text(),
            code: "INVALID_REQUEST".to_string(),
        }
    }
}

/// Status response
#[derive(Debug, Serialize, Deserialize)]
pub struct StatusResponse {
    /// Server is running
    pub running: bool,
    /// Server version
    pub version: String,
    /// Geocoding provider name
    pub provider: String,
    /// Configured model
    pub model: String,
}

/// Server status endpoint
///
/// GET /api/status
async fn status_handler<P, S>(State(state): State<Arc<AppState<P, S>>>) -> Json<StatusResponse>
where
    P: GeocodeProvider + 'static,
    S: KeyValueStore + 'static,
{
    Json(StatusResponse {
        running: true,
        version: env!("CARGO_PKG_VERSION").to_string(),
        provider: state.search().provider().name().to_string(),
        model: state.config.search.model.clone(),
    })
}

/// Current application state
///
/// GET /api/state
async fn state_handler<P, S>(State(state): State<Arc<AppState<P, S>>>) -> Json<ViewState>
where
    P: GeocodeProvider + 'static,
    S: KeyValueStore + 'static,
{
    Json(state.app.lock().await.state().clone())
}

/// Search request body
#[derive(Debug, Deserialize)]
pub struct SearchRequest {
    pub query: String,
}

/// Search response
#[derive(Debug, Serialize, Deserialize)]
pub struct SearchResponse {
    pub results: Vec<SearchResult>,
}

/// Search for a place
///
/// POST /api/search
async fn search_handler<P, S>(
    State(state): State<Arc<AppState<P, S>>>,
    payload: Result<Json<SearchRequest>, JsonRejection>,
) -> Result<Json<SearchResponse>, ApiError>
where
    P: GeocodeProvider + 'static,
    S: KeyValueStore + 'static,
{
    let Json(req) = payload?;
    let results = state.run_search(&req.query).await;
    Ok(Json(SearchResponse { results }))
}

/// Select a candidate
///
/// POST /api/select
async fn select_handler<P, S>(
    State(state): State<Arc<AppState<P, S>>>,
    payload: Result<Json<SearchResult>, JsonRejection>,
) -> Result<Json<ViewState>, ApiError>
where
    P: GeocodeProvider + 'static,
    S: KeyValueStore + 'static,
{
    let Json(result) = payload?;
    result.coords().validate()?;
    let mut app = state.app.lock().await;
    Ok(Json(app.select_result(result).clone()))
}

/// Map click request body
#[derive(Debug, Deserialize)]
pub struct PickRequest {
    pub lat: f64,
    pub lng: f64,
    /// Coordinate system of the pair (default gcj02)
    #[serde(default)]
    pub system: CoordinateSystem,
}

/// Select the point under a map click
///
/// POST /api/pick
async fn pick_handler<P, S>(
    State(state): State<Arc<AppState<P, S>>>,
    payload: Result<Json<PickRequest>, JsonRejection>,
) -> Result<Json<ViewState>, ApiError>
where
    P: GeocodeProvider + 'static,
    S: KeyValueStore + 'static,
{
    let Json(req) = payload?;
    let mut app = state.app.lock().await;
    let view = app.pick(Coordinates::new(req.lat, req.lng), req.system)?;
    Ok(Json(view.clone()))
}

/// Confirm the current selection
///
/// POST /api/teleport
async fn teleport_handler<P, S>(State(state): State<Arc<AppState<P, S>>>) -> Json<ViewState>
where
    P: GeocodeProvider + 'static,
    S: KeyValueStore + 'static,
{
    let mut app = state.app.lock().await;
    let before = app.state().teleport.clone();
    let view = app.teleport().clone();

    // A new lifecycle started; the old timer must not tick it
    if view.teleport != before {
        state.restart_timer();
    }

    Json(view)
}

/// History list response
#[derive(Debug, Serialize, Deserialize)]
pub struct HistoryResponse {
    pub entries: Vec<Location>,
    pub count: usize,
}

/// Get history list
///
/// GET /api/history
async fn history_handler<P, S>(State(state): State<Arc<AppState<P, S>>>) -> Json<HistoryResponse>
where
    P: GeocodeProvider + 'static,
    S: KeyValueStore + 'static,
{
    let app = state.app.lock().await;
    let entries = app.history().entries().to_vec();
    let count = entries.len();
    Json(HistoryResponse { entries, count })
}

/// Clear all history
///
/// DELETE /api/history
async fn history_clear_handler<P, S>(State(state): State<Arc<AppState<P, S>>>) -> StatusCode
where
    P: GeocodeProvider + 'static,
    S: KeyValueStore + 'static,
{
    state.app.lock().await.clear_history();
    StatusCode::NO_CONTENT
}

/// Select a history entry
///
/// POST /api/history/:id/select
async fn history_select_handler<P, S>(
    State(state): State<Arc<AppState<P, S>>>,
    Path(id): Path<String>,
) -> Result<Json<ViewState>, ApiError>
where
    P: GeocodeProvider + 'static,
    S: KeyValueStore + 'static,
{
    let mut app = state.app.lock().await;
    let view = app.select_history(&id).cloned();
    view.map(Json).ok_or_else(|| ApiError {
        error: format!("History entry not found: {}", id),
        code: "NOT_FOUND".to_string(),
    })
}

/// Preset request body
#[derive(Debug, Deserialize)]
pub struct PresetRequest {
    /// Label or name, e.g. "钉钉", "wechat"
    #[serde(deserialize_with = "preset_from_str")]
    pub preset: Preset,
}

/// Accept the same preset spellings as the CLI and config
fn preset_from_str<'de, D>(deserializer: D) -> Result<Preset, D::Error>
where
    D: serde::Deserializer<'de>,
{
    let name = String::deserialize(deserializer)?;
    name.parse().map_err(serde::de::Error::custom)
}

/// Set the target app preset
///
/// PUT /api/preset
async fn preset_handler<P, S>(
    State(state): State<Arc<AppState<P, S>>>,
    payload: Result<Json<PresetRequest>, JsonRejection>,
) -> Result<Json<ViewState>, ApiError>
where
    P: GeocodeProvider + 'static,
    S: KeyValueStore + 'static,
{
    let Json(req) = payload?;
    let mut app = state.app.lock().await;
    Ok(Json(app.dispatch(Action::SetPreset(req.preset)).clone()))
}

/// Flip between 2D and 3D
///
/// POST /api/view-mode/toggle
async fn view_mode_handler<P, S>(State(state): State<Arc<AppState<P, S>>>) -> Json<ViewState>
where
    P: GeocodeProvider + 'static,
    S: KeyValueStore + 'static,
{
    let mut app = state.app.lock().await;
    Json(app.dispatch(Action::ToggleViewMode).clone())
}

/// Flip between normal and satellite tiles
///
/// POST /api/map-style/toggle
async fn map_style_handler<P, S>(State(state): State<Arc<AppState<P, S>>>) -> Json<ViewState>
where
    P: GeocodeProvider + 'static,
    S: KeyValueStore + 'static,
{
    let mut app = state.app.lock().await;
    Json(app.dispatch(Action::ToggleMapStyle).clone())
}
