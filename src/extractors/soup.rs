// ABOUTME: Tag-soup extraction strategy: positional regex scans over raw markup.
// ABOUTME: Survives malformed or truncated pages that a DOM parser would mangle.

//! Tag-soup extraction.
//!
//! Key behaviors:
//! - Never parses the page. Fields come from ordered regex scans over the
//!   raw markup and over a tag-stripped copy of it.
//! - The company link anchors a positional cursor: the title scan runs in a
//!   bounded window after it, which keeps navigation chrome out of reach.
//! - Every capture still has to pass the same plausibility filters the
//!   structural strategy uses.
//! - Plain text input works too: the tag-anchored scans miss and the
//!   text-based fallbacks carry the extraction.

use once_cell::sync::Lazy;
use regex::Regex;
use tracing::debug;

use crate::description::segment_description;
use crate::extractors::rules::{
    self, APPLICANT_TEXT_RES, COMPANY_SLUG_RE, SALARY_TAG_RE, SALARY_TEXT_RE, TIME_AGO_RE,
};
use crate::posting::JobPosting;
use crate::strategy::ExtractOptions;
use crate::text::{decode_entities, floor_char_boundary, normalize, strip_markup};

/// How far past the company link the title scan reaches.
const TITLE_WINDOW: usize = 5000;

/// Title text butting up against a styled span, the shape the top card renders.
static TITLE_SPAN_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r#">([^<>]+)<span class=""#).unwrap());

/// Page-title fallback when the top card is missing entirely.
static PAGE_TITLE_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?is)<title[^>]*>([^<]+)</title>").unwrap());

/// Any span-delimited text run, fodder for the location filter.
static SPAN_TEXT_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r">([^<>]+)</span>").unwrap());

/// A relative-time phrase between tags.
static POSTED_SPAN_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r">([^<>]*ago[^<>]*)<").unwrap());

/// The logo image is the one tagged with this view name.
const LOGO_MARKER: &str = r#"data-view-name="image""#;

static SRC_ATTR_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r#"src="([^"]+)""#).unwrap());

/// Anchor text directly after the company link.
static LINK_TEXT_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r">\s*([^<>]+?)\s*<").unwrap());

/// Extracts a posting by scanning the raw markup positionally.
pub fn extract(html: &str, opts: &ExtractOptions) -> JobPosting {
    let stripped = normalize(&strip_markup(html));

    let mut posting = JobPosting::default();

    // Company link first: it doubles as the cursor for the title window.
    let mut cursor = 0;
    if let Some(m) = COMPANY_SLUG_RE.captures(html) {
        let slug = m[1].to_string();
        cursor = m.get(0).map(|g| g.end()).unwrap_or(0);
        debug!(%slug, "company link anchored the scan");
        posting.company = Some(
            anchor_text(&html[cursor..])
                .unwrap_or_else(|| rules::company_name_from_slug(&slug)),
        );
        posting.company_slug = Some(slug);
    }

    posting.title = scan_title(html, cursor);

    posting.location = SPAN_TEXT_RE
        .captures_iter(html)
        .map(|caps| normalize(&decode_entities(&caps[1])))
        .find(|text| rules::looks_like_place(text, &opts.state_codes));

    posting.posted = POSTED_SPAN_RE
        .captures_iter(html)
        .map(|caps| normalize(&caps[1]))
        .find(|text| rules::plausible_posted(text))
        .or_else(|| TIME_AGO_RE.find(&stripped).map(|m| m.as_str().to_string()));

    posting.applicants = APPLICANT_TEXT_RES
        .iter()
        .find_map(|(name, re)| {
            re.find(&stripped).map(|m| {
                debug!(rule = *name, "applicants matched");
                m.as_str().to_string()
            })
        })
        .filter(|text| rules::plausible_applicants(text));

    posting.salary = SALARY_TAG_RE
        .captures_iter(html)
        .map(|caps| normalize(&decode_entities(&caps[1])))
        .find(|text| rules::plausible_salary(text))
        .or_else(|| {
            SALARY_TEXT_RE
                .find(&stripped)
                .map(|m| m.as_str().trim().to_string())
                .filter(|text| rules::plausible_salary(text))
        });

    posting.work_type = rules::detect_work_type(&stripped).map(str::to_string);
    posting.employment_type = rules::detect_employment_type(&stripped).map(str::to_string);

    posting.logo_url = scan_logo(html);

    let segmented = segment_description(html, &opts.taxonomy, opts.description_lookahead);
    posting.description = segmented.text;
    posting.sections = segmented.sections;

    posting
}

/// Title scan: span-boundary candidates in the post-company window, then the
/// page-title fallback.
fn scan_title(html: &str, cursor: usize) -> Option<String> {
    let start = floor_char_boundary(html, cursor);
    let end = floor_char_boundary(html, cursor.saturating_add(TITLE_WINDOW));
    let window = &html[start..end.max(start)];

    let hit = TITLE_SPAN_RE
        .captures_iter(window)
        .map(|caps| normalize(&decode_entities(&caps[1])))
        .find(|text| rules::plausible_title(text));
    if let Some(title) = hit {
        debug!(rule = "span-class-boundary", "title candidate matched");
        return Some(title);
    }

    PAGE_TITLE_RE
        .captures(html)
        .map(|caps| {
            let raw = normalize(&decode_entities(&caps[1]));
            raw.split(" | ").next().unwrap_or(&raw).trim().to_string()
        })
        .filter(|text| rules::plausible_title(text))
        .inspect(|_| debug!(rule = "page-title", "title candidate matched"))
}

/// Non-empty anchor text in the run right after the company href.
fn anchor_text(after: &str) -> Option<String> {
    let window = &after[..floor_char_boundary(after, 300)];
    LINK_TEXT_RE
        .captures_iter(window)
        .map(|caps| normalize(&decode_entities(&caps[1])))
        .find(|text| !text.is_empty() && text.chars().count() < 100)
}

fn scan_logo(html: &str) -> Option<String> {
    let pos = html.find(LOGO_MARKER)?;
    let after = &html[pos..];
    let window = &after[..floor_char_boundary(after, 1000)];
    SRC_ATTR_RE
        .captures(window)
        .map(|caps| caps[1].to_string())
        .filter(|src| !src.is_empty())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::strategy::ExtractOptions;

    fn opts() -> ExtractOptions {
        ExtractOptions::default()
    }

    const SOUP_PAGE: &str = r#"
        <div data-view-name="image"><img src="https://media.example.com/logo.png"></div>
        <a href="https://www.linkedin.com/company/initech/">Initech</a>
        <div>Staff Software Engineer<span class="visually-hidden">with verification</span></div>
        <span>Portland, OR</span>
        <span>2 weeks ago</span>
        <div>Over 200 people clicked apply</div>
        <span> $140,000/yr - $170,000/yr</span>
        <p>This is a Contract role, fully remote.</p>
        About the job
        We automate TPS reports.
        Requirements
        3 years of experience with printers.
    "#;

    #[test]
    fn scans_fields_positionally() {
        let posting = extract(SOUP_PAGE, &opts());
        assert_eq!(posting.company.as_deref(), Some("Initech"));
        assert_eq!(posting.company_slug.as_deref(), Some("initech"));
        assert_eq!(posting.title.as_deref(), Some("Staff Software Engineer"));
        assert_eq!(posting.location.as_deref(), Some("Portland, OR"));
        assert_eq!(posting.posted.as_deref(), Some("2 weeks ago"));
        assert_eq!(
            posting.applicants.as_deref(),
            Some("Over 200 people clicked apply")
        );
        assert_eq!(posting.salary.as_deref(), Some("$140,000/yr - $170,000/yr"));
        assert_eq!(posting.work_type.as_deref(), Some("Contract"));
        assert_eq!(posting.employment_type.as_deref(), Some("Remote"));
        assert_eq!(
            posting.logo_url.as_deref(),
            Some("https://media.example.com/logo.png")
        );
    }

    #[test]
    fn description_and_sections_from_about_marker() {
        let posting = extract(SOUP_PAGE, &opts());
        assert!(posting.description.contains("We automate TPS reports."));
        let qualifications = posting.sections.get("Qualifications").unwrap();
        assert!(qualifications.contains("3 years of experience with printers."));
    }

    #[test]
    fn plain_text_input_uses_text_fallbacks() {
        let text = "Posted 3 days ago. 45 applicants. Pay is $95,000 annually. \
                    Full-time, hybrid. About the job We fix boilers.";
        let posting = extract(text, &opts());
        assert_eq!(posting.posted.as_deref(), Some("3 days ago"));
        assert_eq!(posting.applicants.as_deref(), Some("45 applicants"));
        assert_eq!(posting.salary.as_deref(), Some("$95,000 annually"));
        assert_eq!(posting.work_type.as_deref(), Some("Full-Time"));
        assert_eq!(posting.employment_type.as_deref(), Some("Hybrid"));
        assert!(posting.description.contains("We fix boilers."));
    }

    #[test]
    fn title_window_excludes_far_away_spans() {
        let padding = "x".repeat(TITLE_WINDOW + 100);
        let html = format!(
            r#"<a href="https://linkedin.com/company/acme/">Acme</a>{padding}
               <div>Distant Job Title Here<span class="x">.</span></div>"#
        );
        let posting = extract(&html, &opts());
        assert!(posting.title.is_none());
    }

    #[test]
    fn company_falls_back_to_slug_casing() {
        let html = r#"<a href="https://linkedin.com/company/hooli-xyz/"><img src="l.png"></a>"#;
        let posting = extract(html, &opts());
        assert_eq!(posting.company.as_deref(), Some("Hooli Xyz"));
    }

    #[test]
    fn page_title_fallback_strips_site_suffix() {
        let html = "<html><head><title>Platform Engineer | LinkedIn</title></head><body></body></html>";
        let posting = extract(html, &opts());
        assert_eq!(posting.title.as_deref(), Some("Platform Engineer"));
    }
}
