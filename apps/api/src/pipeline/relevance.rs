//! Relevance Scorer and Mapper — lexical-overlap scoring between resume
//! bullets and job-description spans.
//!
//! Scoring is a pure function of its two string inputs: tokenize to
//! lowercase alphanumeric words, drop stop words, then scaled Jaccard
//! similarity. The doubling of raw Jaccard and the 0.5 default on empty
//! token sets are deliberate heuristic constants; tests pin them exactly.

use std::collections::HashSet;

use crate::pipeline::models::MappedBullet;

/// Score returned when either side has no meaningful tokens left.
const DEFAULT_RELEVANCE: f64 = 0.5;
/// Sentences shorter than this (chars) are not usable spans.
const SENTENCE_MIN_LEN: usize = 20;
/// Blank-line-delimited sections shorter than this are not usable spans.
const SECTION_MIN_LEN: usize = 30;
/// Hard cap on spans per run to bound scoring cost.
const MAX_SPANS: usize = 50;
/// Length of the job-description prefix reported when no spans exist.
const FALLBACK_SNIPPET_LEN: usize = 200;

/// Stop words removed before overlap scoring, hoisted into an explicit
/// struct so tests can run with custom lexicons.
#[derive(Debug, Clone)]
pub struct ScorerLexicon {
    pub stop_words: HashSet<String>,
}

impl Default for ScorerLexicon {
    fn default() -> Self {
        let stop_words = [
            "the", "a", "an", "and", "or", "but", "in", "on", "at", "to", "for", "of", "with",
            "by", "from", "as", "is", "was", "are", "were", "been", "be", "have", "has", "had",
            "do", "does", "did", "will", "would", "should", "could", "may", "might", "must",
            "can",
        ]
        .iter()
        .map(|w| w.to_string())
        .collect();
        Self { stop_words }
    }
}

/// Computes the keyword-overlap relevance of a bullet against a text span.
/// Returns `min(jaccard * 2, 1.0)`, or 0.5 when either token set is empty
/// after stop-word removal ("can't evaluate, assume moderate relevance").
pub fn relevance_score(bullet: &str, span: &str, lexicon: &ScorerLexicon) -> f64 {
    let bullet_words = tokenize(bullet, lexicon);
    let span_words = tokenize(span, lexicon);

    if bullet_words.is_empty() || span_words.is_empty() {
        return DEFAULT_RELEVANCE;
    }

    let intersection = bullet_words.intersection(&span_words).count();
    let union = bullet_words.union(&span_words).count();

    let jaccard = intersection as f64 / union as f64;
    // Raw Jaccard on short strings is tiny; doubling stretches the usable
    // range without exceeding 1.0.
    (jaccard * 2.0).min(1.0)
}

/// Lowercase alphanumeric word tokens, minus stop words.
fn tokenize(text: &str, lexicon: &ScorerLexicon) -> HashSet<String> {
    text.to_lowercase()
        .split(|c: char| !c.is_alphanumeric())
        .filter(|w| !w.is_empty() && !lexicon.stop_words.contains(*w))
        .map(str::to_string)
        .collect()
}

/// Splits a job description into scorable spans: sentences first (period
/// split, len > 20), then blank-line sections (len > 30), capped at 50.
pub fn extract_jd_spans(job_description: &str) -> Vec<String> {
    let mut spans: Vec<String> = Vec::new();

    let flattened = job_description.replace('\n', " ");
    for sentence in flattened.split('.') {
        let sentence = sentence.trim();
        if sentence.chars().count() > SENTENCE_MIN_LEN {
            spans.push(sentence.to_string());
        }
    }

    for section in job_description.split("\n\n") {
        let section = section.trim();
        if section.chars().count() > SECTION_MIN_LEN {
            spans.push(section.to_string());
        }
    }

    spans.truncate(MAX_SPANS);
    spans
}

/// Maps every bullet to its best-matching span, preserving bullet order.
///
/// Ties keep the first span encountered (sentences before sections). With
/// no span scoring above zero, the first span is kept. With no spans at
/// all, every bullet is scored against the full job description and the
/// 200-char prefix is reported as the matched snippet.
pub fn map_bullets(
    bullets: &[String],
    job_description: &str,
    lexicon: &ScorerLexicon,
) -> Vec<MappedBullet> {
    if bullets.is_empty() {
        return Vec::new();
    }

    let spans = extract_jd_spans(job_description);

    if spans.is_empty() {
        let snippet: String = job_description.chars().take(FALLBACK_SNIPPET_LEN).collect();
        return bullets
            .iter()
            .map(|bullet| MappedBullet {
                text: bullet.clone(),
                relevance_score: relevance_score(bullet, job_description, lexicon),
                matched_snippet: snippet.clone(),
            })
            .collect();
    }

    bullets
        .iter()
        .map(|bullet| {
            let mut best_score = 0.0_f64;
            let mut best_span = spans[0].as_str();

            for span in &spans {
                let score = relevance_score(bullet, span, lexicon);
                if score > best_score {
                    best_score = score;
                    best_span = span;
                }
            }

            MappedBullet {
                text: bullet.clone(),
                relevance_score: best_score,
                matched_snippet: best_span.to_string(),
            }
        })
        .collect()
}

/// Ranks mappings by relevance (descending) and keeps the top `k`.
/// The stable sort keeps earlier bullets first on equal scores. The primary
/// pipeline keeps all bullets in source order and never calls this; it
/// serves callers that want only the most relevant few.
pub fn rank_top_k(mut mappings: Vec<MappedBullet>, k: Option<usize>) -> Vec<MappedBullet> {
    mappings.sort_by(|a, b| {
        b.relevance_score
            .partial_cmp(&a.relevance_score)
            .unwrap_or(std::cmp::Ordering::Equal)
    });
    if let Some(k) = k {
        mappings.truncate(k);
    }
    mappings
}

#[cfg(test)]
mod tests {
    use super::*;

    fn score(bullet: &str, span: &str) -> f64 {
        relevance_score(bullet, span, &ScorerLexicon::default())
    }

    #[test]
    fn test_score_is_exactly_scaled_jaccard() {
        // Tokens after stop-word removal:
        //   bullet: {built, rest, api}   span: {rest, api, testing}
        //   intersection = 2, union = 4 → jaccard 0.5 → score 1.0
        let s = score("built the rest api", "rest api testing");
        assert!((s - 1.0).abs() < f64::EPSILON, "score was {s}");
    }

    #[test]
    fn test_partial_overlap_score_value() {
        // bullet: {built, cache}  span: {cache, invalidation, layer}
        // intersection = 1, union = 4 → 0.25 * 2 = 0.5
        let s = score("built a cache", "cache invalidation layer");
        assert!((s - 0.5).abs() < f64::EPSILON, "score was {s}");
    }

    #[test]
    fn test_identical_inputs_score_one() {
        let s = score("optimized query latency", "optimized query latency");
        assert!((s - 1.0).abs() < f64::EPSILON);
    }

    #[test]
    fn test_disjoint_inputs_score_zero() {
        let s = score("painted fences", "kubernetes clusters");
        assert!(s.abs() < f64::EPSILON);
    }

    #[test]
    fn test_stop_words_only_yields_default() {
        // "the and of" tokenizes to nothing → 0.5 default
        assert!((score("the and of", "rust engineer") - 0.5).abs() < f64::EPSILON);
        assert!((score("rust engineer", "was were been") - 0.5).abs() < f64::EPSILON);
    }

    #[test]
    fn test_score_always_in_unit_range() {
        let pairs = [
            ("built rest api", "rest api"),
            ("a", "b"),
            ("x y z", "x y z w"),
            ("", ""),
        ];
        for (b, s) in pairs {
            let v = score(b, s);
            assert!((0.0..=1.0).contains(&v), "{b:?} vs {s:?} gave {v}");
        }
    }

    #[test]
    fn test_scoring_is_deterministic() {
        let a = score("shipped observability tooling", "monitoring and observability stack");
        let b = score("shipped observability tooling", "monitoring and observability stack");
        assert_eq!(a, b);
    }

    #[test]
    fn test_custom_stop_words() {
        let lexicon = ScorerLexicon {
            stop_words: ["rust"].iter().map(|w| w.to_string()).collect(),
        };
        // "rust" removed from both sides → only {engineer} vs {engineer}
        let s = relevance_score("rust engineer", "rust engineer", &lexicon);
        assert!((s - 1.0).abs() < f64::EPSILON);
    }

    #[test]
    fn test_span_extraction_sentences_then_sections() {
        let jd = "We need engineers experienced in REST APIs. Must enjoy testing.\n\nOur team ships a large Rust platform every week.";
        let spans = extract_jd_spans(jd);
        // First sentence qualifies (> 20 chars); "Must enjoy testing" is 18
        // chars → dropped; the section (> 30 chars) is appended after.
        assert!(spans[0].starts_with("We need engineers"));
        assert!(spans.iter().any(|s| s.starts_with("Our team ships")));
    }

    #[test]
    fn test_span_extraction_caps_at_fifty() {
        let jd = (0..80)
            .map(|i| format!("This is qualifying sentence number {i:03} right here"))
            .collect::<Vec<_>>()
            .join(". ");
        let spans = extract_jd_spans(&jd);
        assert_eq!(spans.len(), 50);
    }

    #[test]
    fn test_runon_jd_yields_no_spans() {
        // No periods, no blank lines, 10 chars → nothing qualifies
        assert!(extract_jd_spans("short text").is_empty());
    }

    #[test]
    fn test_mapper_falls_back_to_jd_prefix_without_spans() {
        let bullets = vec!["Built a REST API".to_string()];
        let mapped = map_bullets(&bullets, "short text", &ScorerLexicon::default());
        assert_eq!(mapped.len(), 1);
        assert_eq!(mapped[0].matched_snippet, "short text");
    }

    #[test]
    fn test_long_runon_line_is_its_own_section() {
        // A long line with no periods still qualifies as a single section,
        // so the prefix fallback only ever fires for very short JDs.
        let jd = "x".repeat(500);
        assert!(!extract_jd_spans(&jd).is_empty());
    }

    #[test]
    fn test_mapper_preserves_bullet_order() {
        let bullets = vec![
            "Wrote integration tests for the billing service".to_string(),
            "Built a REST API for partner onboarding".to_string(),
        ];
        let jd = "Looking for engineers experienced in REST APIs. Testing discipline is essential to us.";
        let mapped = map_bullets(&bullets, jd, &ScorerLexicon::default());
        assert_eq!(mapped[0].text, bullets[0]);
        assert_eq!(mapped[1].text, bullets[1]);
    }

    #[test]
    fn test_mapper_picks_highest_scoring_span() {
        let bullets = vec!["Built a REST API".to_string()];
        let jd = "We value strong communication across the company. Deep experience building a REST API matters most.";
        let mapped = map_bullets(&bullets, jd, &ScorerLexicon::default());
        assert!(mapped[0].matched_snippet.contains("REST API"));
    }

    #[test]
    fn test_mapper_zero_scores_keep_first_span() {
        let bullets = vec!["Painted garden fences".to_string()];
        let jd = "Kubernetes platform engineering role. Distributed systems background required here.";
        let mapped = map_bullets(&bullets, jd, &ScorerLexicon::default());
        assert!(mapped[0].matched_snippet.starts_with("Kubernetes platform"));
        assert!(mapped[0].relevance_score.abs() < f64::EPSILON);
    }

    #[test]
    fn test_mapper_is_deterministic() {
        let bullets = vec!["Built a REST API".to_string(), "Wrote unit tests".to_string()];
        let jd = "Looking for engineers experienced in REST APIs and testing.";
        let lexicon = ScorerLexicon::default();
        let first = map_bullets(&bullets, jd, &lexicon);
        let second = map_bullets(&bullets, jd, &lexicon);
        assert_eq!(first, second);
    }

    #[test]
    fn test_rank_top_k_sorts_descending_and_truncates() {
        let mappings = vec![
            MappedBullet {
                text: "low".to_string(),
                relevance_score: 0.2,
                matched_snippet: String::new(),
            },
            MappedBullet {
                text: "high".to_string(),
                relevance_score: 0.9,
                matched_snippet: String::new(),
            },
            MappedBullet {
                text: "mid".to_string(),
                relevance_score: 0.5,
                matched_snippet: String::new(),
            },
        ];
        let ranked = rank_top_k(mappings, Some(2));
        assert_eq!(ranked.len(), 2);
        assert_eq!(ranked[0].text, "high");
        assert_eq!(ranked[1].text, "mid");
    }

    #[test]
    fn test_rank_top_k_none_keeps_everything() {
        let mappings = vec![
            MappedBullet {
                text: "a".to_string(),
                relevance_score: 0.1,
                matched_snippet: String::new(),
            },
            MappedBullet {
                text: "b".to_string(),
                relevance_score: 0.3,
                matched_snippet: String::new(),
            },
        ];
        assert_eq!(rank_top_k(mappings, None).len(), 2);
    }
}
