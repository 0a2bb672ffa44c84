//! Statement Extractor — turns raw resume text into an ordered sequence of
//! candidate achievement bullets.
//!
//! Two admission rules are tried per non-blank line, in order: marked list
//! lines (bullet character or leading digit) and action-verb lines. If
//! neither rule admits anything for the whole document, every non-blank line
//! is admitted verbatim so non-empty input never yields zero bullets.

/// Minimum length (chars) for a bullet admitted after marker stripping.
const MARKED_LINE_MIN_LEN: usize = 3;
/// Minimum length (chars) for a line admitted by the action-verb rule.
const VERB_LINE_MIN_LEN: usize = 5;
/// How many leading characters the action-verb rule inspects.
const VERB_WINDOW: usize = 20;

/// List markers and action verbs used by the extractor, hoisted into an
/// explicit struct so tests can run with custom lexicons.
#[derive(Debug, Clone)]
pub struct ExtractorLexicon {
    pub markers: Vec<char>,
    pub action_verbs: Vec<String>,
}

impl Default for ExtractorLexicon {
    fn default() -> Self {
        Self {
            markers: vec!['-', '•', '*', '·'],
            action_verbs: [
                "developed",
                "created",
                "built",
                "implemented",
                "designed",
                "managed",
                "led",
                "improved",
                "optimized",
                "reduced",
                "increased",
                "used",
                "worked",
                "wrote",
                "tested",
            ]
            .iter()
            .map(|v| v.to_string())
            .collect(),
        }
    }
}

/// Extracts achievement bullets from resume text, preserving line order.
/// Duplicate lines produce duplicate bullets; no deduplication happens here.
pub fn extract_bullets(resume_text: &str, lexicon: &ExtractorLexicon) -> Vec<String> {
    let mut bullets: Vec<String> = Vec::new();

    for line in resume_text.lines() {
        let stripped = line.trim();
        if stripped.is_empty() {
            continue;
        }

        if is_marked_line(stripped, lexicon) {
            let bullet = strip_markers(stripped, lexicon);
            if bullet.chars().count() >= MARKED_LINE_MIN_LEN {
                bullets.push(bullet.to_string());
            }
        } else if starts_with_action_verb(stripped, lexicon)
            && stripped.chars().count() >= VERB_LINE_MIN_LEN
        {
            bullets.push(stripped.to_string());
        }
    }

    // Fallback: admit every non-blank line so the pipeline never starts
    // from zero bullets on non-empty input.
    if bullets.is_empty() {
        bullets = resume_text
            .lines()
            .map(str::trim)
            .filter(|l| !l.is_empty() && l.chars().count() >= MARKED_LINE_MIN_LEN)
            .map(str::to_string)
            .collect();
    }

    bullets
}

fn is_marked_line(stripped: &str, lexicon: &ExtractorLexicon) -> bool {
    match stripped.chars().next() {
        Some(c) => lexicon.markers.contains(&c) || c.is_ascii_digit(),
        None => false,
    }
}

/// Strips leading marker, digit, period, and space characters from a marked
/// list line, e.g. `"1. Built X"` → `"Built X"`.
fn strip_markers<'a>(stripped: &'a str, lexicon: &ExtractorLexicon) -> &'a str {
    stripped
        .trim_start_matches(|c: char| {
            lexicon.markers.contains(&c) || c.is_ascii_digit() || c == '.' || c == ' '
        })
        .trim()
}

fn starts_with_action_verb(stripped: &str, lexicon: &ExtractorLexicon) -> bool {
    let head: String = stripped.to_lowercase().chars().take(VERB_WINDOW).collect();
    lexicon.action_verbs.iter().any(|verb| head.contains(verb.as_str()))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn extract(text: &str) -> Vec<String> {
        extract_bullets(text, &ExtractorLexicon::default())
    }

    #[test]
    fn test_dash_bullets_are_stripped() {
        let bullets = extract("- Built a REST API\n- Wrote unit tests");
        assert_eq!(bullets, vec!["Built a REST API", "Wrote unit tests"]);
    }

    #[test]
    fn test_all_marker_styles_admitted() {
        let bullets = extract("• Shipped feature A\n* Shipped feature B\n· Shipped feature C");
        assert_eq!(bullets.len(), 3);
        assert!(bullets.iter().all(|b| b.starts_with("Shipped")));
    }

    #[test]
    fn test_enumerated_lines_are_list_items() {
        let bullets = extract("1. Migrated billing to Kafka\n2. Cut deploy time in half");
        assert_eq!(
            bullets,
            vec!["Migrated billing to Kafka", "Cut deploy time in half"]
        );
    }

    #[test]
    fn test_marked_line_shorter_than_three_chars_rejected() {
        // After stripping "- " only "ab" remains → below minimum
        let bullets = extract("- ab\n- Built a cache layer");
        assert_eq!(bullets, vec!["Built a cache layer"]);
    }

    #[test]
    fn test_action_verb_line_admitted_in_full() {
        let bullets = extract("Developed a distributed task queue in Rust");
        assert_eq!(bullets, vec!["Developed a distributed task queue in Rust"]);
    }

    #[test]
    fn test_action_verb_is_case_insensitive() {
        let bullets = extract("LED a team of four engineers");
        assert_eq!(bullets.len(), 1);
    }

    #[test]
    fn test_verb_outside_first_twenty_chars_not_matched() {
        // "built" appears past the inspection window; with no other rule
        // firing, the whole-document fallback admits every non-blank line.
        let text = "A very long preamble sentence where built appears late";
        let bullets = extract(text);
        assert_eq!(bullets, vec![text]);
    }

    #[test]
    fn test_fallback_admits_every_nonblank_line() {
        let bullets = extract("Software Engineer\nAcme Corp\n\nJan 2020 to Dec 2022");
        assert_eq!(
            bullets,
            vec!["Software Engineer", "Acme Corp", "Jan 2020 to Dec 2022"]
        );
    }

    #[test]
    fn test_fallback_not_used_when_any_rule_fires() {
        // One bullet line means header lines are NOT admitted
        let bullets = extract("Software Engineer\n- Built a REST API");
        assert_eq!(bullets, vec!["Built a REST API"]);
    }

    #[test]
    fn test_empty_and_whitespace_input_yield_nothing() {
        assert!(extract("").is_empty());
        assert!(extract("   \n\t\n  ").is_empty());
    }

    #[test]
    fn test_duplicates_are_preserved() {
        let bullets = extract("- Built a REST API\n- Built a REST API");
        assert_eq!(bullets.len(), 2);
        assert_eq!(bullets[0], bullets[1]);
    }

    #[test]
    fn test_order_follows_source_position() {
        let bullets = extract("- First\n- Second\n- Third");
        assert_eq!(bullets, vec!["First", "Second", "Third"]);
    }

    #[test]
    fn test_custom_lexicon_verbs() {
        let lexicon = ExtractorLexicon {
            markers: vec!['-'],
            action_verbs: vec!["orchestrated".to_string()],
        };
        let bullets = extract_bullets("Orchestrated a zero-downtime migration", &lexicon);
        assert_eq!(bullets.len(), 1);
    }
}
