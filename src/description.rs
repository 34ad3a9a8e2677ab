// ABOUTME: Description segmenter that isolates and reflows the "About the job" body.
// ABOUTME: Rebuilds paragraph, bullet, and header structure from flattened tag soup.

//! Description segmentation.
//!
//! Key behaviors:
//! - The body starts at a literal "About the job" marker and ends at the
//!   how-you-match widget container, or after a bounded lookahead when no
//!   explicit end marker exists (unbounded scanning would swallow unrelated
//!   trailing page content).
//! - Emphasis tags become plain text; a bold run immediately followed by `:`
//!   or `!` keeps the punctuation attached as an inline label.
//! - List items turn into a bullet sentinel that survives newline
//!   normalization, then into a literal "• " prefix.
//! - Short single-sentence lines are treated as implicit headers and isolated
//!   with blank lines so the section classifier can see the boundary.
//! - A missing marker yields an empty result; the caller falls back to
//!   another strategy.

use std::collections::HashMap;

use aho_corasick::AhoCorasick;
use once_cell::sync::Lazy;
use regex::Regex;

use crate::sections::classify_sections_text;
use crate::taxonomy::SectionTaxonomy;
use crate::text::{decode_entities, floor_char_boundary};

/// Default end-boundary lookahead when no explicit end marker is present.
pub const DEFAULT_LOOKAHEAD: usize = 5000;

// Matched from the opening '<' so the truncated tag itself is excluded.
const END_MARKER: &str = "<div class=\"job-details-how-you-match-card__container";
const BULLET_SENTINEL: &str = "BULLETPOINT";

static ABOUT_MARKER: Lazy<AhoCorasick> = Lazy::new(|| {
    AhoCorasick::builder()
        .ascii_case_insensitive(true)
        .build(["About the job"])
        .unwrap()
});

static LEADING_HEADER_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?i)^\s*About the job\s*").unwrap());
static BOLD_LABEL_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?is)<\s*(?:strong|b)[^>]*>([^<]+)</\s*(?:strong|b)\s*>\s*([:!])").unwrap()
});
static BOLD_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?is)<\s*(?:strong|b)[^>]*>([^<]+)</\s*(?:strong|b)\s*>").unwrap());
static LI_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"(?is)<li[^>]*>(.*?)</li>").unwrap());
static LIST_TAG_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"(?i)</?[uo]l[^>]*>").unwrap());
static BR_RUN_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"(?i)(<br\s*/?>\s*){2,}").unwrap());
static BR_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"(?i)<br\s*/?>").unwrap());
static PARAGRAPH_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"(?is)<p[^>]*>(.*?)</p>").unwrap());
static TAG_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"<[^>]+>").unwrap());
static EXCESS_NEWLINES_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"\n{3,}").unwrap());
static HORIZONTAL_WS_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"[ \t]+").unwrap());

/// The segmenter output: reflowed description text plus classified sections.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Segmented {
    pub text: String,
    pub sections: HashMap<String, String>,
}

impl Segmented {
    pub fn is_empty(&self) -> bool {
        self.text.is_empty() && self.sections.is_empty()
    }
}

/// Locates the "About the job" body inside a page and segments it.
///
/// Returns an empty `Segmented` when the marker is absent.
pub fn segment_description(
    html: &str,
    taxonomy: &SectionTaxonomy,
    lookahead: usize,
) -> Segmented {
    let Some(m) = ABOUT_MARKER.find(html) else {
        return Segmented::default();
    };
    let start = m.start();
    let after = &html[start..];

    // End at the how-you-match widget when present. Otherwise take the next
    // closing div past the lookahead window, and failing that truncate at the
    // window itself; lossy truncation beats capturing footer content.
    let end = match after.find(END_MARKER) {
        Some(pos) => pos,
        None => {
            let window = floor_char_boundary(after, lookahead);
            match after[window..].find("</div>") {
                Some(rel) => window + rel,
                None => window.min(after.len()),
            }
        }
    };
    let end = floor_char_boundary(after, end.min(after.len()));
    let raw = &after[..end];

    let text = format_fragment(raw);
    let sections = classify_sections_text(&text, taxonomy);
    Segmented { text, sections }
}

/// Reflows an HTML fragment into readable plain text.
///
/// Applies the full tag-to-text pipeline: emphasis unwrapping, bullet
/// sentinels, break/paragraph conversion, tag stripping, implicit header
/// isolation, and whitespace normalization.
pub fn format_fragment(fragment: &str) -> String {
    if fragment.trim().is_empty() {
        return String::new();
    }

    let stripped_header = LEADING_HEADER_RE.replace(fragment, "");

    // Bold immediately followed by ':' or '!' is an inline label.
    let labeled = BOLD_LABEL_RE.replace_all(&stripped_header, |caps: &regex::Captures| {
        format!("{}{}", caps[1].trim(), &caps[2])
    });
    let unbolded = BOLD_RE.replace_all(&labeled, |caps: &regex::Captures| {
        caps[1].trim().to_string()
    });

    // Bullets become a sentinel so they survive newline normalization.
    let with_bullets = LI_RE.replace_all(&unbolded, format!("{BULLET_SENTINEL}$1"));
    let without_lists = LIST_TAG_RE.replace_all(&with_bullets, "");

    let with_paragraph_breaks = BR_RUN_RE.replace_all(&without_lists, "\n\n");
    let with_line_breaks = BR_RE.replace_all(&with_paragraph_breaks, "\n");
    let with_paragraphs = PARAGRAPH_RE.replace_all(&with_line_breaks, "$1\n\n");

    let tagless = TAG_RE.replace_all(&with_paragraphs, "");
    let decoded = decode_entities(&tagless);

    let isolated = isolate_implicit_headers(&decoded);
    let with_bullet_chars = isolated.replace(BULLET_SENTINEL, "\n• ");

    let collapsed = EXCESS_NEWLINES_RE.replace_all(&with_bullet_chars, "\n\n");
    let spaced = HORIZONTAL_WS_RE.replace_all(&collapsed, " ");
    spaced.trim().to_string()
}

/// Inserts blank lines around lines that read like section headers.
///
/// A line qualifies when it is non-empty, under 100 characters, does not end
/// with a period, and contains at most one period.
fn isolate_implicit_headers(text: &str) -> String {
    let mut lines: Vec<String> = Vec::new();
    for line in text.lines() {
        let stripped = line.trim();
        if stripped.is_empty() {
            lines.push(String::new());
            continue;
        }
        if stripped.chars().count() < 100
            && !stripped.ends_with('.')
            && stripped.matches('.').count() <= 1
        {
            if lines.last().is_some_and(|l| !l.is_empty()) {
                lines.push(String::new());
            }
            lines.push(stripped.to_string());
            lines.push(String::new());
        } else {
            lines.push(stripped.to_string());
        }
    }
    lines.join("\n")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::taxonomy::load_builtin_taxonomy;

    fn segment(html: &str) -> Segmented {
        segment_description(html, &load_builtin_taxonomy(), DEFAULT_LOOKAHEAD)
    }

    #[test]
    fn missing_marker_returns_empty() {
        let result = segment("<div>no description here</div>");
        assert!(result.is_empty());
    }

    #[test]
    fn strips_duplicated_leading_header() {
        let result = segment("About the job Build great things.");
        assert_eq!(result.text, "Build great things.");
        assert!(!result.text.contains("About the job"));
    }

    #[test]
    fn bold_label_keeps_punctuation_attached() {
        let html = "About the job <strong>Note</strong>: bring your own laptop to the office daily.";
        let result = segment(html);
        assert!(
            result.text.contains("Note: bring your own laptop"),
            "got: {}",
            result.text
        );
    }

    #[test]
    fn plain_bold_is_unwrapped() {
        let html = "About the job We value <b>ownership</b> in every engineer we hire here.";
        let result = segment(html);
        assert!(result.text.contains("We value ownership in every"));
        assert!(!result.text.contains('<'));
    }

    #[test]
    fn list_items_become_bullets() {
        let html = "About the job Responsibilities<ul><li>Ship code to production.</li><li>Review designs with the team.</li></ul>";
        let result = segment(html);
        assert!(
            result.text.contains("• Ship code to production."),
            "got: {}",
            result.text
        );
        assert!(result.text.contains("• Review designs with the team."));
    }

    #[test]
    fn br_runs_become_paragraph_breaks() {
        let html = "About the job First paragraph of role details here.<br><br>Second paragraph of role details here.";
        let result = segment(html);
        assert!(
            result.text.contains("here.\n\nSecond"),
            "got: {:?}",
            result.text
        );
    }

    #[test]
    fn implicit_headers_are_isolated() {
        let html = "About the job We build resilient data infrastructure for hospitals.<br>What you will do<br>Design and operate ingestion pipelines every day.";
        let result = segment(html);
        assert!(
            result.text.contains("hospitals.\n\nWhat you will do\n\nDesign"),
            "got: {:?}",
            result.text
        );
        assert!(result.sections.contains_key("Responsibilities"));
    }

    #[test]
    fn implicit_header_limit_counts_chars_not_bytes() {
        // 60 two-byte characters: over 100 bytes, under the 100-char limit.
        let header = "ü".repeat(60);
        let isolated = isolate_implicit_headers(&format!(
            "We build resilient infrastructure for hospitals.\n{header}\nDesign pipelines."
        ));
        assert!(
            isolated.contains(&format!("hospitals.\n\n{header}\n\nDesign")),
            "got: {:?}",
            isolated
        );
    }

    #[test]
    fn stops_at_how_you_match_widget() {
        let html = "About the job Great role for builders with grit.<div class=\"job-details-how-you-match-card__container\">Premium nonsense</div>";
        let result = segment(html);
        assert!(result.text.contains("Great role"));
        assert!(!result.text.contains("Premium nonsense"));
    }

    #[test]
    fn truncates_at_lookahead_without_end_marker() {
        let filler = "word ".repeat(3000);
        let html = format!("About the job {}", filler);
        let result = segment_description(&html, &load_builtin_taxonomy(), 200);
        assert!(result.text.len() < 300, "got len {}", result.text.len());
    }

    #[test]
    fn marker_match_is_case_insensitive() {
        let result = segment("ABOUT THE JOB Build rockets that land themselves safely.");
        assert!(result.text.contains("Build rockets"));
    }

    #[test]
    fn sections_values_are_substrings_of_text() {
        let html = "About the job Requirements<br><ul><li>Five years of backend experience.</li></ul>Benefits<br>Full healthcare coverage and annual bonus.";
        let result = segment(html);
        for body in result.sections.values() {
            assert!(
                result.text.contains(body.trim()),
                "section body {:?} not in text {:?}",
                body,
                result.text
            );
        }
    }

    #[test]
    fn format_fragment_empty_input() {
        assert_eq!(format_fragment(""), "");
        assert_eq!(format_fragment("   "), "");
    }
}
