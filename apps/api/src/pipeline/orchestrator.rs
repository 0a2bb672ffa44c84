//! Pipeline Orchestrator — the fixed four-stage review pipeline.
//!
//! Flow: extract → map → improve → critique → done. Strictly linear, no
//! branching, no retry edges, no error-terminal state: every gateway
//! failure is absorbed into payload fields by the degradation fallbacks, so
//! a run always returns one payload per extracted bullet, in extraction
//! order. All working state is owned by the run and dropped when it
//! completes; nothing is shared across concurrent runs.

use serde::Deserialize;
use tracing::info;

use crate::pipeline::extractor::{extract_bullets, ExtractorLexicon};
use crate::pipeline::gateway::{CoachGateway, Degradation, DegradationReason};
use crate::pipeline::models::{MappedBullet, RefinedBullet, ReviewedBullet, RewrittenBullet};
use crate::pipeline::relevance::{map_bullets, relevance_score, ScorerLexicon};

/// Request for the single-bullet refinement operation.
#[derive(Debug, Clone, Deserialize)]
pub struct RefineRequest {
    /// The current (possibly already improved) version of the bullet.
    pub current_bullet: String,
    /// The original bullet as extracted from the resume.
    pub original_bullet: String,
    pub resume_text: String,
    pub job_description: String,
    #[serde(default)]
    pub current_relevance: f64,
    #[serde(default = "default_target_relevance")]
    pub target_relevance: f64,
}

fn default_target_relevance() -> f64 {
    0.8
}

/// Runs the full review pipeline for one (resume, job description) pair.
///
/// Stages:
/// 1. extract — resume text → ordered bullets (never empty on non-empty input)
/// 2. map — one best-span mapping per bullet, bullet order preserved
/// 3. improve — one rewrite call per mapping, degradations absorbed
/// 4. critique — one fact-check call per rewrite, enriching each payload
pub async fn run_pipeline(
    gateway: &dyn CoachGateway,
    resume_text: &str,
    job_description: &str,
) -> Vec<ReviewedBullet> {
    // Stage 1: extract
    let bullets = extract_bullets(resume_text, &ExtractorLexicon::default());
    info!("Extracted {} bullets from resume", bullets.len());

    // Stage 2: map (an empty bullet list propagates as empty everything)
    let mapped = map_bullets(&bullets, job_description, &ScorerLexicon::default());

    // Stage 3: improve
    let rewritten = improve_stage(gateway, mapped, resume_text, job_description).await;

    // Stage 4: critique
    let reviewed = critique_stage(gateway, rewritten, resume_text, job_description).await;
    info!("Pipeline complete: {} reviewed bullets", reviewed.len());

    reviewed
}

/// Refines one bullet toward a target relevance, then fact-checks the
/// result, so every externally visible rewrite has been validated.
/// `new_relevance_score` is recomputed from the returned text — never the
/// caller-supplied value.
pub async fn refine_one(gateway: &dyn CoachGateway, request: &RefineRequest) -> RefinedBullet {
    let mut refined = match gateway
        .refine(
            &request.current_bullet,
            &request.original_bullet,
            &request.resume_text,
            &request.job_description,
            request.current_relevance,
            request.target_relevance,
        )
        .await
    {
        Ok(draft) => {
            let critique = gateway
                .critique(
                    &request.original_bullet,
                    &draft.improved,
                    &request.resume_text,
                    &request.job_description,
                )
                .await;
            let (self_critique, is_supported, issues, evidence) = match critique {
                Ok(report) => (
                    report.self_critique,
                    report.is_supported_by_resume,
                    report.issues,
                    report.evidence_snippets,
                ),
                Err(degradation) => critique_fallback_fields(&degradation),
            };
            RefinedBullet {
                improved: draft.improved,
                explanation: draft.explanation,
                why_it_works: draft.why_it_works,
                relevance_improvements: draft.relevance_improvements,
                self_critique,
                is_supported_by_resume: is_supported,
                issues,
                evidence_snippets: evidence,
                new_relevance_score: 0.0,
            }
        }
        Err(degradation) => refine_fallback(&request.current_bullet, &degradation),
    };

    refined.new_relevance_score = relevance_score(
        &refined.improved,
        &request.job_description,
        &ScorerLexicon::default(),
    );
    refined
}

// ────────────────────────────────────────────────────────────────────────────
// Improve stage
// ────────────────────────────────────────────────────────────────────────────

/// Rewrites each mapped bullet in order. The matched span is appended to the
/// job description as extra context for the rewrite call.
async fn improve_stage(
    gateway: &dyn CoachGateway,
    mapped: Vec<MappedBullet>,
    resume_text: &str,
    job_description: &str,
) -> Vec<RewrittenBullet> {
    let mut rewritten = Vec::with_capacity(mapped.len());

    for bullet in mapped {
        let annotated_jd = format!(
            "{job_description}\n\n[Most Relevant Section]: {}",
            bullet.matched_snippet
        );

        let result = gateway
            .rewrite(&bullet.text, resume_text, &annotated_jd)
            .await;

        rewritten.push(match result {
            Ok(draft) => RewrittenBullet {
                original: bullet.text,
                improved: draft.improved,
                explanation: draft.explanation,
                why_it_works: draft.why_it_works,
                draft_self_critique: draft.self_critique,
                issues: vec![],
                relevance_score: bullet.relevance_score,
                matched_snippet: bullet.matched_snippet,
            },
            Err(degradation) => rewrite_fallback(bullet, &degradation),
        });
    }

    rewritten
}

/// Deterministic rewrite-stage fallback: the original bullet is returned
/// unchanged and the degradation detail is surfaced in the payload text.
fn rewrite_fallback(bullet: MappedBullet, degradation: &Degradation) -> RewrittenBullet {
    let original = bullet.text.trim().to_string();
    let (explanation, why_it_works, draft_self_critique, issues) = match degradation.reason {
        DegradationReason::Unconfigured => (
            "No Groq API key configured; returned the original bullet.".to_string(),
            "Acts as a placeholder until live generation is enabled.".to_string(),
            "Cannot evaluate hallucinations without model access.".to_string(),
            vec![],
        ),
        DegradationReason::ServiceError => (
            format!(
                "Groq API call failed: {}; returned original bullet.",
                degradation.detail
            ),
            "Acts as a safe fallback when the model is unavailable.".to_string(),
            "Unable to run self-critique due to model error.".to_string(),
            vec!["groq_api_error".to_string()],
        ),
        DegradationReason::MalformedResponse => (
            "Model returned non-JSON output; keeping original bullet.".to_string(),
            "N/A due to parsing error.".to_string(),
            degradation.detail.clone(),
            vec!["model_output_not_json".to_string()],
        ),
    };

    RewrittenBullet {
        improved: original.clone(),
        original,
        explanation,
        why_it_works,
        draft_self_critique,
        issues,
        relevance_score: bullet.relevance_score,
        matched_snippet: bullet.matched_snippet,
    }
}

// ────────────────────────────────────────────────────────────────────────────
// Critique stage
// ────────────────────────────────────────────────────────────────────────────

/// Fact-checks each rewritten bullet in order. Critique-stage issue tags are
/// appended to rewrite-stage tags — tags accumulate, never retract.
async fn critique_stage(
    gateway: &dyn CoachGateway,
    rewritten: Vec<RewrittenBullet>,
    resume_text: &str,
    job_description: &str,
) -> Vec<ReviewedBullet> {
    let mut reviewed = Vec::with_capacity(rewritten.len());

    for bullet in rewritten {
        let result = gateway
            .critique(&bullet.original, &bullet.improved, resume_text, job_description)
            .await;

        let (self_critique, is_supported, critique_issues, evidence) = match result {
            Ok(report) => (
                report.self_critique,
                report.is_supported_by_resume,
                report.issues,
                report.evidence_snippets,
            ),
            Err(degradation) => critique_fallback_fields(&degradation),
        };

        let mut issues = bullet.issues;
        issues.extend(critique_issues);

        reviewed.push(ReviewedBullet {
            original: bullet.original,
            improved: bullet.improved,
            explanation: bullet.explanation,
            why_it_works: bullet.why_it_works,
            self_critique,
            is_supported_by_resume: is_supported,
            issues,
            evidence_snippets: evidence,
            relevance_score: bullet.relevance_score,
            matched_snippet: bullet.matched_snippet,
        });
    }

    reviewed
}

/// Critique fallback fields: (narrative, supported, issues, evidence).
/// Support always defaults to true — absence of evidence is not treated as
/// evidence of unsupported claims.
fn critique_fallback_fields(
    degradation: &Degradation,
) -> (String, bool, Vec<String>, Vec<String>) {
    match degradation.reason {
        DegradationReason::Unconfigured => (
            "No Groq API key configured; skipping critique.".to_string(),
            true,
            vec![],
            vec![],
        ),
        DegradationReason::ServiceError => (
            format!("Critique API call failed: {}", degradation.detail),
            true,
            vec!["critique_api_error".to_string()],
            vec![],
        ),
        DegradationReason::MalformedResponse => (
            degradation.detail.clone(),
            true,
            vec!["critique_output_not_json".to_string()],
            vec![],
        ),
    }
}

/// Deterministic refine fallback: the current bullet is returned unchanged.
fn refine_fallback(current_bullet: &str, degradation: &Degradation) -> RefinedBullet {
    let (explanation, why_it_works, self_critique, issues) = match degradation.reason {
        DegradationReason::Unconfigured => (
            "No Groq API key configured; returned current bullet.".to_string(),
            "Cannot improve without API access.".to_string(),
            String::new(),
            vec![],
        ),
        DegradationReason::ServiceError => (
            format!(
                "API call failed: {}; returned current bullet.",
                degradation.detail
            ),
            "Acts as a safe fallback when the model is unavailable.".to_string(),
            "Unable to run critique due to model error.".to_string(),
            vec!["improve_relevance_api_error".to_string()],
        ),
        DegradationReason::MalformedResponse => (
            "Model returned non-JSON output; keeping current bullet.".to_string(),
            "N/A due to parsing error.".to_string(),
            "Unable to parse model response.".to_string(),
            vec!["model_output_not_json".to_string()],
        ),
    };

    RefinedBullet {
        improved: current_bullet.trim().to_string(),
        explanation,
        why_it_works,
        relevance_improvements: String::new(),
        self_critique,
        is_supported_by_resume: true,
        issues,
        evidence_snippets: vec![],
        new_relevance_score: 0.0,
    }
}
