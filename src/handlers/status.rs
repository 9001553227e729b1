//! Engine status handler

use axum::{extract::State, Json};

use crate::logic::PipelineStatus;
use crate::AppState;

/// Model state, label/metadata provenance and inference counters.
pub async fn get(State(state): State<AppState>) -> Json<PipelineStatus> {
    Json(state.pipeline.status())
}
