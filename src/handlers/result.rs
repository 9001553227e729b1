//! Latest result handler - polled by the hub

use axum::{extract::State, Json};

use crate::models::ResultBody;
use crate::{AppError, AppResult, AppState};

pub async fn latest(State(state): State<AppState>) -> AppResult<Json<ResultBody>> {
    let entry = state
        .pipeline
        .latest()
        .ok_or_else(|| AppError::NotFound("No analysis available yet".to_string()))?;

    Ok(Json(ResultBody::from(entry.as_ref())))
}
