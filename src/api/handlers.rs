//! HTTP handlers for TraitCal
//!
//! The calendar feeds are served straight from the store; the update
//! endpoints persist the replacement document and trigger a regeneration
//! run. A failed regeneration reports its error to the caller and leaves
//! the previously generated feeds untouched.

use std::sync::Arc;

use axum::{
    extract::State,
    http::{header, StatusCode},
    response::{IntoResponse, Response},
    Json,
};
use chrono::Utc;

use crate::error::Result;
use crate::generator;
use crate::models::{Day, TraitTemplate};
use crate::store::CalendarFile;

use super::{AppState, HealthResponse, UpdateResponse};

/// Content type of the calendar feeds
const CALENDAR_CONTENT_TYPE: &str = "text/calendar; charset=utf-8";

/// Serve the main-events feed
///
/// # Example
/// ```text
/// GET /main.ics
/// ```
pub async fn get_main_calendar(State(state): State<Arc<AppState>>) -> Result<Response> {
    serve_calendar(&state, CalendarFile::Main).await
}

/// Serve the satellite-events feed
///
/// # Example
/// ```text
/// GET /other.ics
/// ```
pub async fn get_other_calendar(State(state): State<Arc<AppState>>) -> Result<Response> {
    serve_calendar(&state, CalendarFile::Other).await
}

async fn serve_calendar(state: &AppState, file: CalendarFile) -> Result<Response> {
    let ics = state.store.read_calendar(file).await?;
    Ok((
        StatusCode::OK,
        [(header::CONTENT_TYPE, CALENDAR_CONTENT_TYPE)],
        ics,
    )
        .into_response())
}

/// Replace the trait templates and regenerate both feeds
///
/// # Example
/// ```text
/// POST /update_traits
/// ```
pub async fn update_traits(
    State(state): State<Arc<AppState>>,
    Json(templates): Json<Vec<TraitTemplate>>,
) -> Result<Json<UpdateResponse>> {
    let _guard = state.generation_lock.lock().await;

    state.store.persist_templates(&templates).await?;
    tracing::info!(templates = templates.len(), "Trait templates replaced");

    let report = generator::generate(state.store.as_ref(), &state.config.generator).await?;
    Ok(Json(UpdateResponse {
        message: "Traits updated".to_string(),
        report,
    }))
}

/// Replace the day schedule and regenerate both feeds
///
/// # Example
/// ```text
/// POST /update_calendar
/// ```
pub async fn update_calendar(
    State(state): State<Arc<AppState>>,
    Json(days): Json<Vec<Day>>,
) -> Result<Json<UpdateResponse>> {
    let _guard = state.generation_lock.lock().await;

    state.store.persist_days(&days).await?;
    tracing::info!(days = days.len(), "Day schedule replaced");

    let report = generator::generate(state.store.as_ref(), &state.config.generator).await?;
    Ok(Json(UpdateResponse {
        message: "Calendar updated".to_string(),
        report,
    }))
}

/// Basic liveness check endpoint
///
/// # Example
/// ```text
/// GET /healthz
/// ```
pub async fn health_check() -> Response {
    let response = HealthResponse {
        status: "healthy".to_string(),
        timestamp: Utc::now(),
    };

    (StatusCode::OK, Json(response)).into_response()
}
