//! Axum route handlers for the review pipeline. Marshaling only — all
//! pipeline behavior lives in the orchestrator.

use axum::{extract::State, Json};
use serde::{Deserialize, Serialize};

use crate::errors::AppError;
use crate::pipeline::models::{RefinedBullet, ReviewedBullet};
use crate::pipeline::orchestrator::{refine_one, run_pipeline, RefineRequest};
use crate::state::AppState;

// ────────────────────────────────────────────────────────────────────────────
// Request / Response types
// ────────────────────────────────────────────────────────────────────────────

#[derive(Debug, Deserialize)]
pub struct AnalyzeRequest {
    pub resume_text: String,
    pub job_description: String,
}

#[derive(Debug, Serialize)]
pub struct AnalyzeResponse {
    pub bullets: Vec<ReviewedBullet>,
    pub notes: String,
}

// ────────────────────────────────────────────────────────────────────────────
// Handlers
// ────────────────────────────────────────────────────────────────────────────

/// POST /analyze
///
/// Runs the full extract → map → improve → critique pipeline and returns
/// one reviewed bullet per extracted statement, in extraction order.
pub async fn handle_analyze(
    State(state): State<AppState>,
    Json(request): Json<AnalyzeRequest>,
) -> Result<Json<AnalyzeResponse>, AppError> {
    if request.resume_text.trim().is_empty() {
        return Err(AppError::Validation(
            "resume_text cannot be empty".to_string(),
        ));
    }
    if request.job_description.trim().is_empty() {
        return Err(AppError::Validation(
            "job_description cannot be empty".to_string(),
        ));
    }

    let bullets = run_pipeline(
        state.gateway.as_ref(),
        &request.resume_text,
        &request.job_description,
    )
    .await;

    let notes = format!(
        "Processed {} bullets through extract → map → improve → self-critique pipeline.",
        bullets.len()
    );

    Ok(Json(AnalyzeResponse { bullets, notes }))
}

/// POST /improve-bullet
///
/// Iterative refinement: pushes one bullet toward a target relevance and
/// fact-checks the result. Returns the refined bullet with a freshly
/// recomputed relevance score.
pub async fn handle_improve_bullet(
    State(state): State<AppState>,
    Json(request): Json<RefineRequest>,
) -> Result<Json<RefinedBullet>, AppError> {
    if request.current_bullet.trim().is_empty() {
        return Err(AppError::Validation(
            "current_bullet cannot be empty".to_string(),
        ));
    }
    if request.original_bullet.trim().is_empty() {
        return Err(AppError::Validation(
            "original_bullet cannot be empty".to_string(),
        ));
    }
    if request.resume_text.trim().is_empty() {
        return Err(AppError::Validation(
            "resume_text cannot be empty".to_string(),
        ));
    }
    if request.job_description.trim().is_empty() {
        return Err(AppError::Validation(
            "job_description cannot be empty".to_string(),
        ));
    }

    let refined = refine_one(state.gateway.as_ref(), &request).await;

    Ok(Json(refined))
}
