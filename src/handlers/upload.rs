//! Upload handler - raw image body from the hub

use std::sync::Arc;

use axum::{body::Bytes, extract::State, Json};

use crate::logic::CacheEntry;
use crate::models::{ResultBody, UploadResponse};
use crate::{AppError, AppResult, AppState};

/// Store, analyze, publish, and optionally forward one image.
pub async fn upload(State(state): State<AppState>, body: Bytes) -> AppResult<Json<UploadResponse>> {
    if body.is_empty() {
        return Err(AppError::EmptyPayload);
    }

    let stored = state.store.save(&body).await?;

    let pipeline = Arc::clone(&state.pipeline);
    let bytes = body.clone();
    let result = tokio::task::spawn_blocking(move || pipeline.analyze(&bytes)).await??;

    tracing::info!(
        "Analyzed {} ({} bytes, {}): {} / {}",
        stored.filename,
        body.len(),
        result.source().unwrap_or("none"),
        result.leaf_name,
        result.disease
    );

    let entry = CacheEntry {
        timestamp: stored.timestamp,
        filename: stored.filename,
        path: stored.path.display().to_string(),
        recorded_at: stored.recorded_at,
        result,
    };
    let payload = ResultBody::from(&entry);
    state.pipeline.publish(entry);

    if let Some(forwarder) = &state.forwarder {
        forwarder.spawn(payload.clone());
    }

    Ok(Json(UploadResponse {
        status: "success",
        message: format!("Image saved as {}", payload.filename),
        size_bytes: body.len(),
        result: payload,
    }))
}
