// ABOUTME: Section classifier mapping free-text description headers to canonical categories.
// ABOUTME: Supports a line-scanning text strategy and a heading-element DOM strategy.

//! Section classification.
//!
//! Key behaviors:
//! - Header text is matched against the taxonomy by synonym keyword first,
//!   then by fuzzy similarity (ratio >= 0.7) against canonical names; an
//!   unmatched header is kept verbatim as the section key, never dropped.
//! - In the text strategy a section body is the contiguous block of lines
//!   between one header and the next, so every body is a substring of the
//!   source text modulo edge trimming.
//! - Short lines (< 10 chars) are treated as noise at block edges unless they
//!   carry a signal substring (years, experience, degree, salary).
//! - The final buffered section is always flushed.

use std::collections::HashMap;

use aho_corasick::AhoCorasick;
use once_cell::sync::Lazy;
use scraper::{ElementRef, Html, Selector};
use tracing::debug;

use crate::taxonomy::SectionTaxonomy;
use crate::text::normalize;

/// Minimum similarity ratio for a fuzzy header-to-category match.
const FUZZY_THRESHOLD: f64 = 0.7;

/// Content lines shorter than this are noise unless they carry a signal.
const MIN_CONTENT_LINE: usize = 10;

/// Substrings that mark a short line as meaningful rather than noise.
static SIGNAL_MATCHER: Lazy<AhoCorasick> = Lazy::new(|| {
    AhoCorasick::builder()
        .ascii_case_insensitive(true)
        .build(["year", "experience", "degree", "salary"])
        .unwrap()
});

/// Similarity ratio between two strings in `[0.0, 1.0]`.
///
/// Levenshtein distance normalized by the longer length, compared
/// case-insensitively. Equal strings score 1.0; totally disjoint strings
/// approach 0.0.
pub fn similarity_ratio(a: &str, b: &str) -> f64 {
    let a = a.to_lowercase();
    let b = b.to_lowercase();
    if a.is_empty() && b.is_empty() {
        return 1.0;
    }
    let a_chars: Vec<char> = a.chars().collect();
    let b_chars: Vec<char> = b.chars().collect();
    let longest = a_chars.len().max(b_chars.len());
    if longest == 0 {
        return 1.0;
    }
    let distance = levenshtein(&a_chars, &b_chars);
    1.0 - (distance as f64 / longest as f64)
}

fn levenshtein(a: &[char], b: &[char]) -> usize {
    if a.is_empty() {
        return b.len();
    }
    if b.is_empty() {
        return a.len();
    }
    let mut prev: Vec<usize> = (0..=b.len()).collect();
    let mut curr = vec![0usize; b.len() + 1];
    for (i, ca) in a.iter().enumerate() {
        curr[0] = i + 1;
        for (j, cb) in b.iter().enumerate() {
            let substitution = prev[j] + usize::from(ca != cb);
            curr[j + 1] = substitution.min(prev[j + 1] + 1).min(curr[j] + 1);
        }
        std::mem::swap(&mut prev, &mut curr);
    }
    prev[b.len()]
}

fn fuzzy_match(cleaned: &str, taxonomy: &SectionTaxonomy) -> Option<String> {
    let mut best: Option<(&str, f64)> = None;
    for name in taxonomy.canonical_names() {
        let ratio = similarity_ratio(cleaned, name);
        if ratio >= FUZZY_THRESHOLD && best.map_or(true, |(_, b)| ratio > b) {
            best = Some((name, ratio));
        }
    }
    best.map(|(name, ratio)| {
        debug!(header = %cleaned, canonical = name, ratio, "fuzzy header match");
        name.to_string()
    })
}

/// Resolves a raw header line to a section key.
///
/// Keyword synonym match wins; otherwise the closest canonical name with
/// similarity >= 0.7; otherwise the normalized header text itself.
pub fn classify_header(header: &str, taxonomy: &SectionTaxonomy) -> String {
    let cleaned = normalize(header);
    if let Some(canonical) = taxonomy.classify_keyword(&cleaned) {
        return canonical.to_string();
    }
    fuzzy_match(&cleaned, taxonomy).unwrap_or(cleaned)
}

/// Returns true for lines shaped like a section header.
///
/// Short, single-sentence, not ending with a period, and not a bullet.
fn is_header_line(line: &str) -> bool {
    let trimmed = line.trim();
    !trimmed.is_empty()
        && trimmed.chars().count() < 100
        && !trimmed.ends_with('.')
        && trimmed.matches('.').count() <= 1
        && !trimmed.starts_with('•')
}

/// Decides whether a line opens a new section and returns its key.
///
/// Taxonomy-matched lines always qualify. An unmatched line qualifies as a
/// literal header only when it reads like one: a short run of words without
/// digits. Requirement fragments ("5+ years") stay in the content stream.
fn header_candidate(line: &str, taxonomy: &SectionTaxonomy) -> Option<String> {
    if !is_header_line(line) {
        return None;
    }
    let cleaned = normalize(line);
    if let Some(canonical) = taxonomy.classify_keyword(&cleaned) {
        return Some(canonical.to_string());
    }
    if let Some(canonical) = fuzzy_match(&cleaned, taxonomy) {
        return Some(canonical);
    }
    let word_count = cleaned.split_whitespace().count();
    if cleaned.len() >= 3 && word_count <= 6 && !cleaned.chars().any(|c| c.is_ascii_digit()) {
        return Some(cleaned);
    }
    None
}

/// Returns true for a short line that still carries meaning.
fn is_signal_line(line: &str) -> bool {
    SIGNAL_MATCHER.is_match(line)
}

fn is_noise_line(line: &str) -> bool {
    let trimmed = line.trim();
    trimmed.is_empty() || (trimmed.len() < MIN_CONTENT_LINE && !is_signal_line(trimmed))
}

/// Joins a contiguous run of lines into a section body, trimming noise at
/// the edges only so the body stays a substring of the source text.
fn assemble_body(lines: &[&str]) -> Option<String> {
    let start = lines.iter().position(|l| !is_noise_line(l))?;
    let end = lines.iter().rposition(|l| !is_noise_line(l))?;
    let body = lines[start..=end].join("\n").trim().to_string();
    if body.is_empty() {
        None
    } else {
        Some(body)
    }
}

/// Classifies an already-formatted description text into sections.
///
/// Scans line by line: header-shaped lines open a new section; everything
/// else accumulates into the current one. Content before the first header
/// lands under "Job Description". Later sections overwrite earlier ones with
/// the same key.
pub fn classify_sections_text(text: &str, taxonomy: &SectionTaxonomy) -> HashMap<String, String> {
    let mut sections = HashMap::new();
    if text.trim().is_empty() {
        return sections;
    }

    let lines: Vec<&str> = text.lines().collect();
    let mut current_key = "Job Description".to_string();
    let mut block_start = 0usize;

    for (i, line) in lines.iter().enumerate() {
        if let Some(key) = header_candidate(line, taxonomy) {
            if let Some(body) = assemble_body(&lines[block_start..i]) {
                sections.insert(current_key.clone(), body);
            }
            current_key = key;
            block_start = i + 1;
        }
    }
    // Flush the trailing block even with no header after it.
    if let Some(body) = assemble_body(&lines[block_start..]) {
        sections.insert(current_key, body);
    }
    sections
}

static HEADING_SELECTOR: Lazy<Selector> =
    Lazy::new(|| Selector::parse("h2, h3, h4, strong, b").unwrap());

fn is_heading_element(el: &ElementRef) -> bool {
    matches!(el.value().name(), "h2" | "h3" | "h4" | "strong" | "b")
}

/// Classifies sections from an HTML fragment using heading elements.
///
/// Iterates h2/h3/h4/strong/b elements; for each, collects following-sibling
/// text until the next heading-like element and files it under the
/// classified header.
pub fn classify_sections_dom(
    html_fragment: &str,
    taxonomy: &SectionTaxonomy,
) -> HashMap<String, String> {
    let mut sections = HashMap::new();
    let doc = Html::parse_fragment(html_fragment);

    for heading in doc.select(&HEADING_SELECTOR) {
        let header_text = normalize(&heading.text().collect::<Vec<_>>().join(" "));
        if header_text.is_empty() || header_text.chars().count() >= 100 {
            continue;
        }

        let mut parts: Vec<String> = Vec::new();
        for sibling in heading.next_siblings() {
            if let Some(el) = ElementRef::wrap(sibling) {
                if is_heading_element(&el) {
                    break;
                }
                let text = normalize(&el.text().collect::<Vec<_>>().join(" "));
                if !text.is_empty() {
                    parts.push(text);
                }
            } else if let Some(text_node) = sibling.value().as_text() {
                let text = normalize(text_node);
                if !text.is_empty() {
                    parts.push(text);
                }
            }
        }

        let body = parts.join("\n");
        if !body.trim().is_empty() {
            sections.insert(classify_header(&header_text, taxonomy), body);
        }
    }
    sections
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::taxonomy::load_builtin_taxonomy;

    #[test]
    fn similarity_ratio_bounds() {
        assert_eq!(similarity_ratio("Benefits", "benefits"), 1.0);
        assert_eq!(similarity_ratio("", ""), 1.0);
        assert!(similarity_ratio("abc", "xyz") < 0.1);
    }

    #[test]
    fn similarity_ratio_near_threshold() {
        // One edit over a ten-char word stays comfortably above 0.7.
        assert!(similarity_ratio("Qualifications", "Qualification") >= FUZZY_THRESHOLD);
        assert!(similarity_ratio("Benefits", "Responsibilities") < FUZZY_THRESHOLD);
    }

    #[test]
    fn classify_header_prefers_keyword_match() {
        let taxonomy = load_builtin_taxonomy();
        assert_eq!(
            classify_header("What You'll Bring", &taxonomy),
            "Qualifications"
        );
    }

    #[test]
    fn classify_header_falls_back_to_fuzzy() {
        let taxonomy = load_builtin_taxonomy();
        // Misspelled, no synonym contains it, but close to the canonical name.
        assert_eq!(
            classify_header("Qualifictions", &taxonomy),
            "Qualifications"
        );
    }

    #[test]
    fn classify_header_keeps_literal_when_unmatched() {
        let taxonomy = load_builtin_taxonomy();
        assert_eq!(
            classify_header("Moonshot Initiatives", &taxonomy),
            "Moonshot Initiatives"
        );
    }

    #[test]
    fn text_sections_split_on_headers_and_flush_trailing() {
        let taxonomy = load_builtin_taxonomy();
        let text = "Intro paragraph about the position in general terms.\n\nRequirements\n\nFive years of systems experience.\nRust expertise is a must-have skill.\n\nWhat we offer\n\nCompetitive salary and remote-friendly culture.";
        let sections = classify_sections_text(text, &taxonomy);
        assert_eq!(
            sections.get("Qualifications").map(String::as_str),
            Some("Five years of systems experience.\nRust expertise is a must-have skill.")
        );
        assert!(sections.contains_key("Benefits"));
        assert!(
            sections.contains_key("Job Description"),
            "preamble should land under Job Description: {:?}",
            sections.keys().collect::<Vec<_>>()
        );
    }

    #[test]
    fn text_sections_bodies_are_substrings() {
        let taxonomy = load_builtin_taxonomy();
        let text = "Responsibilities\n\n• Ship code every single day.\n• Review pull requests carefully.\n\nBenefits\n\nUnlimited vacation policy plus equity.";
        let sections = classify_sections_text(text, &taxonomy);
        for body in sections.values() {
            assert!(text.contains(body.trim()), "not a substring: {:?}", body);
        }
    }

    #[test]
    fn short_noise_lines_dropped_but_signal_lines_kept() {
        let taxonomy = load_builtin_taxonomy();
        let text = "Qualifications\n\n5+ years\nDeep familiarity with distributed systems required.\nok\n";
        let sections = classify_sections_text(text, &taxonomy);
        let body = sections.get("Qualifications").expect("section missing");
        assert!(body.contains("5+ years"), "signal line dropped: {}", body);
        assert!(!body.contains("ok"), "noise line kept: {}", body);
    }

    #[test]
    fn header_length_limit_counts_chars_not_bytes() {
        let taxonomy = load_builtin_taxonomy();
        // 60 two-byte characters: over 100 bytes, under the 100-char limit.
        let header = "é".repeat(60);
        assert!(is_header_line(&header));
        let text = format!("{header}\n\nA body line long enough to be kept as section content.");
        let sections = classify_sections_text(&text, &taxonomy);
        assert!(
            sections.contains_key(header.as_str()),
            "multi-byte header treated as content: {:?}",
            sections.keys().collect::<Vec<_>>()
        );
    }

    #[test]
    fn empty_text_yields_no_sections() {
        let taxonomy = load_builtin_taxonomy();
        assert!(classify_sections_text("", &taxonomy).is_empty());
        assert!(classify_sections_text("  \n \n", &taxonomy).is_empty());
    }

    #[test]
    fn dom_sections_collect_until_next_heading() {
        let taxonomy = load_builtin_taxonomy();
        let html = "<div><h3>Responsibilities</h3><p>Build and operate services.</p><p>Mentor junior engineers.</p><h3>Benefits</h3><p>Healthcare and equity.</p></div>";
        let sections = classify_sections_dom(html, &taxonomy);
        assert_eq!(
            sections.get("Responsibilities").map(String::as_str),
            Some("Build and operate services.\nMentor junior engineers.")
        );
        assert_eq!(
            sections.get("Benefits").map(String::as_str),
            Some("Healthcare and equity.")
        );
    }

    #[test]
    fn dom_sections_handle_bold_headers() {
        let taxonomy = load_builtin_taxonomy();
        let html =
            "<div><b>What we offer</b> Competitive compensation and good coffee.</div>";
        let sections = classify_sections_dom(html, &taxonomy);
        assert_eq!(
            sections.get("Benefits").map(String::as_str),
            Some("Competitive compensation and good coffee.")
        );
    }

    #[test]
    fn dom_sections_empty_fragment() {
        let taxonomy = load_builtin_taxonomy();
        assert!(classify_sections_dom("", &taxonomy).is_empty());
        assert!(classify_sections_dom("<p>no headings here</p>", &taxonomy).is_empty());
    }
}
