//! Coach Gateway — the capability boundary to the external text-generation
//! service.
//!
//! One async method per prompt intent (`rewrite`, `refine`, `critique`),
//! each returning `Result<Draft, Degradation>`. Callers pattern-match on the
//! closed `DegradationReason` enum instead of probing optional fields, and
//! build deterministic fallback payloads from the carried detail. A
//! degradation is data, not an error: it never propagates past the pipeline.

use async_trait::async_trait;
use serde::Deserialize;
use thiserror::Error;
use tracing::warn;

use crate::llm_client::{strip_json_fences, GroqClient, LlmError};
use crate::pipeline::prompts;

const REWRITE_TEMPERATURE: f32 = 0.4;
const REWRITE_MAX_TOKENS: u32 = 800;
const REFINE_TEMPERATURE: f32 = 0.5;
const REFINE_MAX_TOKENS: u32 = 800;
const CRITIQUE_TEMPERATURE: f32 = 0.2;
const CRITIQUE_MAX_TOKENS: u32 = 600;

/// Why a gateway call could not produce a live rewrite. Closed set so tests
/// can assert on the variant.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DegradationReason {
    /// No service credential configured; no call was attempted.
    Unconfigured,
    /// The service call itself failed (network or API error).
    ServiceError,
    /// The service replied, but the body was not the expected JSON object.
    MalformedResponse,
}

/// A non-fatal gateway outcome. `detail` carries the error string for
/// `ServiceError` and the raw response body for `MalformedResponse`, so the
/// fallback payload can surface them verbatim.
#[derive(Debug, Clone, Error)]
#[error("{reason:?}: {detail}")]
pub struct Degradation {
    pub reason: DegradationReason,
    pub detail: String,
}

impl Degradation {
    pub fn unconfigured() -> Self {
        Self {
            reason: DegradationReason::Unconfigured,
            detail: String::new(),
        }
    }

    pub fn service_error(error: LlmError) -> Self {
        Self {
            reason: DegradationReason::ServiceError,
            detail: error.to_string(),
        }
    }

    pub fn malformed(raw: String) -> Self {
        Self {
            reason: DegradationReason::MalformedResponse,
            detail: raw,
        }
    }
}

/// Successful rewrite response shape.
#[derive(Debug, Clone, Deserialize)]
pub struct RewriteDraft {
    pub improved: String,
    #[serde(default)]
    pub explanation: String,
    #[serde(default)]
    pub why_it_works: String,
    #[serde(default)]
    pub self_critique: String,
}

/// Successful refinement response shape.
#[derive(Debug, Clone, Deserialize)]
pub struct RefineDraft {
    pub improved: String,
    #[serde(default)]
    pub explanation: String,
    #[serde(default)]
    pub why_it_works: String,
    #[serde(default)]
    pub relevance_improvements: String,
}

/// Successful fact-check response shape. Support defaults to true when the
/// field is absent: absence of evidence is not evidence of unsupported
/// claims.
#[derive(Debug, Clone, Deserialize)]
pub struct CritiqueReport {
    #[serde(default)]
    pub self_critique: String,
    #[serde(default = "default_supported")]
    pub is_supported_by_resume: bool,
    #[serde(default)]
    pub issues: Vec<String>,
    #[serde(default)]
    pub evidence_snippets: Vec<String>,
}

fn default_supported() -> bool {
    true
}

/// The text-generation capability consumed by the pipeline. One method per
/// prompt intent; implementations make exactly one best-effort call per
/// invocation (no retries).
#[async_trait]
pub trait CoachGateway: Send + Sync {
    /// Rewrites one bullet against the (span-annotated) job description.
    async fn rewrite(
        &self,
        bullet: &str,
        resume_text: &str,
        job_description: &str,
    ) -> Result<RewriteDraft, Degradation>;

    /// Pushes a previously rewritten bullet toward a target relevance,
    /// foregrounding already-true resume facts and JD terminology.
    async fn refine(
        &self,
        current_bullet: &str,
        original_bullet: &str,
        resume_text: &str,
        job_description: &str,
        current_relevance: f64,
        target_relevance: f64,
    ) -> Result<RefineDraft, Degradation>;

    /// Fact-checks an improved bullet against the resume.
    async fn critique(
        &self,
        original_bullet: &str,
        improved_bullet: &str,
        resume_text: &str,
        job_description: &str,
    ) -> Result<CritiqueReport, Degradation>;
}

/// Production gateway backed by the Groq chat-completions client.
/// Built without a credential it holds no client and degrades every call
/// up front, which keeps offline runs fully deterministic.
pub struct GroqCoach {
    client: Option<GroqClient>,
}

impl GroqCoach {
    pub fn new(api_key: Option<String>, model: String) -> Result<Self, LlmError> {
        let client = match api_key {
            Some(key) => Some(GroqClient::new(key, model)?),
            None => None,
        };
        Ok(Self { client })
    }

    pub fn is_configured(&self) -> bool {
        self.client.is_some()
    }

    fn client(&self) -> Result<&GroqClient, Degradation> {
        self.client.as_ref().ok_or_else(Degradation::unconfigured)
    }
}

#[async_trait]
impl CoachGateway for GroqCoach {
    async fn rewrite(
        &self,
        bullet: &str,
        resume_text: &str,
        job_description: &str,
    ) -> Result<RewriteDraft, Degradation> {
        let client = self.client()?;
        let prompt = prompts::build_rewrite_prompt(bullet, resume_text, job_description);
        let raw = client
            .call_text(
                &prompt,
                prompts::REWRITE_SYSTEM,
                REWRITE_TEMPERATURE,
                REWRITE_MAX_TOKENS,
            )
            .await
            .map_err(log_service_error)?;
        parse_draft(raw)
    }

    async fn refine(
        &self,
        current_bullet: &str,
        original_bullet: &str,
        resume_text: &str,
        job_description: &str,
        current_relevance: f64,
        target_relevance: f64,
    ) -> Result<RefineDraft, Degradation> {
        let client = self.client()?;
        let prompt = prompts::build_refine_prompt(
            current_bullet,
            original_bullet,
            resume_text,
            job_description,
            current_relevance,
            target_relevance,
        );
        let raw = client
            .call_text(
                &prompt,
                prompts::REFINE_SYSTEM,
                REFINE_TEMPERATURE,
                REFINE_MAX_TOKENS,
            )
            .await
            .map_err(log_service_error)?;
        parse_draft(raw)
    }

    async fn critique(
        &self,
        original_bullet: &str,
        improved_bullet: &str,
        resume_text: &str,
        job_description: &str,
    ) -> Result<CritiqueReport, Degradation> {
        let client = self.client()?;
        let prompt = prompts::build_critique_prompt(
            original_bullet,
            improved_bullet,
            resume_text,
            job_description,
        );
        let raw = client
            .call_text(
                &prompt,
                prompts::CRITIQUE_SYSTEM,
                CRITIQUE_TEMPERATURE,
                CRITIQUE_MAX_TOKENS,
            )
            .await
            .map_err(log_service_error)?;
        parse_draft(raw)
    }
}

fn log_service_error(error: LlmError) -> Degradation {
    warn!("Gateway call failed, degrading: {error}");
    Degradation::service_error(error)
}

/// Parses a gateway response body into its typed draft. A parse failure is
/// `MalformedResponse` carrying the raw body so callers can surface it.
fn parse_draft<T: serde::de::DeserializeOwned>(raw: String) -> Result<T, Degradation> {
    match serde_json::from_str(strip_json_fences(&raw)) {
        Ok(draft) => Ok(draft),
        Err(e) => {
            warn!("Gateway returned non-JSON output: {e}");
            Err(Degradation::malformed(raw))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn offline_coach() -> GroqCoach {
        GroqCoach::new(None, "llama-3.3-70b-versatile".to_string()).unwrap()
    }

    #[tokio::test]
    async fn test_unconfigured_rewrite_degrades_without_calling() {
        let coach = offline_coach();
        let err = coach
            .rewrite("Built X", "resume", "jd")
            .await
            .expect_err("must degrade");
        assert_eq!(err.reason, DegradationReason::Unconfigured);
    }

    #[tokio::test]
    async fn test_unconfigured_refine_degrades() {
        let coach = offline_coach();
        let err = coach
            .refine("cur", "orig", "resume", "jd", 0.2, 0.8)
            .await
            .expect_err("must degrade");
        assert_eq!(err.reason, DegradationReason::Unconfigured);
    }

    #[tokio::test]
    async fn test_unconfigured_critique_degrades() {
        let coach = offline_coach();
        let err = coach
            .critique("orig", "improved", "resume", "jd")
            .await
            .expect_err("must degrade");
        assert_eq!(err.reason, DegradationReason::Unconfigured);
    }

    #[test]
    fn test_is_configured_reflects_credential() {
        assert!(!offline_coach().is_configured());
        let coach = GroqCoach::new(
            Some("gsk_test".to_string()),
            "llama-3.3-70b-versatile".to_string(),
        )
        .unwrap();
        assert!(coach.is_configured());
    }

    #[test]
    fn test_parse_draft_accepts_fenced_json() {
        let raw = "```json\n{\"improved\": \"Better bullet\"}\n```".to_string();
        let draft: RewriteDraft = parse_draft(raw).unwrap();
        assert_eq!(draft.improved, "Better bullet");
        assert!(draft.explanation.is_empty());
    }

    #[test]
    fn test_parse_draft_malformed_keeps_raw_body() {
        let raw = "Sorry, I cannot respond in JSON today.".to_string();
        let err = parse_draft::<RewriteDraft>(raw.clone()).expect_err("must degrade");
        assert_eq!(err.reason, DegradationReason::MalformedResponse);
        assert_eq!(err.detail, raw);
    }

    #[test]
    fn test_critique_report_support_defaults_true() {
        let report: CritiqueReport = serde_json::from_str(r#"{"self_critique": "fine"}"#).unwrap();
        assert!(report.is_supported_by_resume);
        assert!(report.issues.is_empty());
        assert!(report.evidence_snippets.is_empty());
    }

    #[test]
    fn test_critique_report_explicit_false_respected() {
        let report: CritiqueReport =
            serde_json::from_str(r#"{"is_supported_by_resume": false, "issues": ["overclaimed metric"]}"#)
                .unwrap();
        assert!(!report.is_supported_by_resume);
        assert_eq!(report.issues, vec!["overclaimed metric"]);
    }
}
