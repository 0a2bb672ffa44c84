//! The review pipeline: extract resume bullets, map them to job-description
//! spans, rewrite each through the coach gateway, then fact-check every
//! rewrite against the resume.
//!
//! Stage data flows through immutable values (`MappedBullet` →
//! `RewrittenBullet` → `ReviewedBullet`); the gateway absorbs every
//! external-service failure into a deterministic fallback payload, so a run
//! always completes for valid input.

pub mod extractor;
pub mod gateway;
pub mod handlers;
pub mod models;
pub mod orchestrator;
pub mod prompts;
pub mod relevance;
