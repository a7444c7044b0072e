//! Selection endpoints: size estimates and LAZ job submission.

use ahn_laz_core::{SelectionRequest, SizeEstimate};
use axum::extract::rejection::JsonRejection;
use axum::extract::State;
use axum::http::StatusCode;
use axum::Json;
use serde::Serialize;
use tower::ServiceExt;
use tracing::error;

use super::AppState;
use crate::network::error::ApiError;

/// Body of an accepted submission.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SubmitResponse {
    pub job_id: String,
}

/// `POST /laz`: admits the selection and submits its slicer job.
///
/// Answers `202 Accepted` with the job id; the file itself is delivered
/// out of band once the job finishes.
///
/// The pipeline call runs in its own task holding the in-flight guard, so a
/// request timeout or client disconnect never cancels a started submission
/// and shutdown drains it.
///
/// # Errors
///
/// Invalid bodies, refused selections, and backend failures are returned as
/// [`ApiError`] responses.
pub async fn submit_laz_handler(
    State(state): State<AppState>,
    payload: Result<Json<SelectionRequest>, JsonRejection>,
) -> Result<(StatusCode, Json<SubmitResponse>), ApiError> {
    let Json(request) = payload?;
    if !state.shutdown.is_accepting() {
        return Err(ApiError::draining());
    }
    let guard = state.shutdown.in_flight_guard();
    let pipeline = state.pipeline.clone();

    let handle = tokio::spawn(async move {
        let _guard = guard;
        pipeline.oneshot(request).await
    })
    .await
    .map_err(|e| {
        error!(error = %e, "selection task ended abnormally");
        ApiError::new(
            StatusCode::INTERNAL_SERVER_ERROR,
            "internal",
            "selection task ended abnormally",
        )
    })??;

    Ok((
        StatusCode::ACCEPTED,
        Json(SubmitResponse {
            job_id: handle.id().to_string(),
        }),
    ))
}

/// `POST /size`: estimates the selection without submitting anything.
///
/// # Errors
///
/// Invalid bodies and estimator failures are returned as [`ApiError`] responses.
pub async fn size_handler(
    State(state): State<AppState>,
    payload: Result<Json<SelectionRequest>, JsonRejection>,
) -> Result<Json<SizeEstimate>, ApiError> {
    let Json(request) = payload?;
    if !state.shutdown.is_accepting() {
        return Err(ApiError::draining());
    }
    let _guard = state.shutdown.in_flight_guard();
    let estimate = state.selections.estimate(&request).await?;
    Ok(Json(estimate))
}
