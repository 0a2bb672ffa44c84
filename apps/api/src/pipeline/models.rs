//! Staged data model for the review pipeline.
//!
//! Each stage produces a new immutable value that is a superset of the
//! previous stage's fields: `MappedBullet` → `RewrittenBullet` →
//! `ReviewedBullet`. Fields are only added as a bullet moves forward, never
//! retracted — in particular `issues` accumulates tags across stages.

use serde::{Deserialize, Serialize};

/// A bullet paired with its best-matching job-description span and a
/// relevance score in [0.0, 1.0]. Produced by the mapper, consumed by the
/// rewrite stage, never mutated afterward.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MappedBullet {
    pub text: String,
    pub relevance_score: f64,
    pub matched_snippet: String,
}

/// A mapped bullet after the rewrite stage.
///
/// `original` is set exactly once here. When the rewrite degraded,
/// `improved` equals `original` and `issues` carries the rewrite-stage tag.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RewrittenBullet {
    pub original: String,
    pub improved: String,
    pub explanation: String,
    pub why_it_works: String,
    /// The rewrite model's own critique of its output. The dedicated
    /// critique stage produces the final narrative; this one is kept so no
    /// stage retracts information.
    pub draft_self_critique: String,
    pub issues: Vec<String>,
    pub relevance_score: f64,
    pub matched_snippet: String,
}

/// Terminal payload after the critique stage — the wire shape returned to
/// callers. Field names match the public response schema.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReviewedBullet {
    pub original: String,
    pub improved: String,
    pub explanation: String,
    pub why_it_works: String,
    pub self_critique: String,
    pub is_supported_by_resume: bool,
    pub issues: Vec<String>,
    pub evidence_snippets: Vec<String>,
    pub relevance_score: f64,
    #[serde(rename = "matched_jd_snippet")]
    pub matched_snippet: String,
}

/// Output of the single-bullet refinement operation.
/// `new_relevance_score` is always recomputed by the scorer against the
/// supplied job description, never carried over from the request.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RefinedBullet {
    pub improved: String,
    pub explanation: String,
    pub why_it_works: String,
    pub relevance_improvements: String,
    pub self_critique: String,
    pub is_supported_by_resume: bool,
    pub issues: Vec<String>,
    pub evidence_snippets: Vec<String>,
    pub new_relevance_score: f64,
}
