use axum::extract::{Query, State};
use axum::http::header;
use axum::response::{Html, IntoResponse};
use axum::routing::get;
use axum::{Json, Router};
use chrono::Utc;
use serde::Deserialize;
use std::sync::Arc;

use crypto_tracker_core::models::snapshot::ViewMode;

use crate::error::DashboardError;
use crate::render;
use crate::state::AppState;

pub fn router(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/", get(index))
        .route("/download", get(download))
        .route("/health", get(health))
        .with_state(state)
}

#[derive(Debug, Deserialize)]
pub struct PageQuery {
    /// "live" or a `YYYY-MM-DD` snapshot date.
    pub snapshot: Option<String>,
}

/// Run the pipeline for the selected mode and render the dashboard.
async fn index(
    State(state): State<Arc<AppState>>,
    Query(query): Query<PageQuery>,
) -> Result<Html<String>, DashboardError> {
    let selector = query.snapshot.unwrap_or_default();
    let mode = ViewMode::parse(&selector)
        .ok_or_else(|| DashboardError::BadRequest(format!("invalid snapshot date {selector:?}")))?;

    let report = {
        let _guard = state.run_lock.lock().await;
        state.tracker.run(mode).await?
    };
    let dates = state.tracker.available_snapshot_dates()?;

    let page = render::dashboard_page(state.tracker.config(), &report, &dates)
        .map_err(DashboardError::Render)?;
    Ok(Html(page))
}

/// Today's summary log as a CSV attachment.
async fn download(
    State(state): State<Arc<AppState>>,
) -> Result<impl IntoResponse, DashboardError> {
    let today = Utc::now().date_naive();
    let bytes = {
        let _guard = state.run_lock.lock().await;
        state.tracker.log_bytes(today)?
    }
    .ok_or_else(|| DashboardError::NotFound(format!("no log written on {today} yet")))?;

    let disposition = format!(
        "attachment; filename=\"{}\"",
        state.tracker.log_file_name(today)
    );
    Ok((
        [
            (header::CONTENT_TYPE, "text/csv".to_string()),
            (header::CONTENT_DISPOSITION, disposition),
        ],
        bytes,
    ))
}

async fn health() -> Json<serde_json::Value> {
    Json(serde_json::json!({ "status": "ok" }))
}
