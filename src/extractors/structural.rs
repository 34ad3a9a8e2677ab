// ABOUTME: DOM-tree extraction strategy: parses the page and walks selector candidate tables.
// ABOUTME: Works best on well-formed logged-in or guest-API markup.

//! Structural extraction.
//!
//! Key behaviors:
//! - Parses the page into a DOM and tries each field's selector candidates
//!   in table order, keeping the first hit that passes the field's
//!   plausibility filter.
//! - Company falls back to scanning `linkedin.com/company/` links, which
//!   also yields the company slug.
//! - Posted, applicants, salary, and the work/employment categories fall
//!   back to regex scans over the stripped page text.
//! - Description prefers the "About the job" segmenter over the whole page,
//!   then falls back to reflowing a known description container.

use scraper::{Html, Selector};
use tracing::debug;

use crate::description::{format_fragment, segment_description};
use crate::extractors::rules::{
    self, SelectorRule, APPLICANT_RULES, APPLICANT_TEXT_RES, COMPANY_RULES, COMPANY_SLUG_RE,
    DESCRIPTION_RULES, LOCATION_RULES, LOGO_RULES, POSTED_RULES, SALARY_TEXT_RE, TIME_AGO_RE,
    TITLE_RULES,
};
use crate::posting::JobPosting;
use crate::sections::classify_sections_text;
use crate::strategy::ExtractOptions;
use crate::text::{normalize, strip_markup};

/// Extracts a posting by walking the parsed DOM.
pub fn extract(html: &str, opts: &ExtractOptions) -> JobPosting {
    let doc = Html::parse_document(html);
    let page_text = normalize(&strip_markup(html));

    let mut posting = JobPosting::default();

    posting.title = select_first(&doc, TITLE_RULES, rules::plausible_title);
    posting.location = select_first(&doc, LOCATION_RULES, rules::plausible_location);
    posting.posted = select_first(&doc, POSTED_RULES, rules::plausible_posted)
        .or_else(|| TIME_AGO_RE.find(&page_text).map(|m| m.as_str().to_string()));
    posting.applicants =
        select_first(&doc, APPLICANT_RULES, rules::plausible_applicants).or_else(|| {
            APPLICANT_TEXT_RES.iter().find_map(|(name, re)| {
                re.find(&page_text).map(|m| {
                    debug!(rule = *name, "applicants matched from page text");
                    m.as_str().to_string()
                })
            })
        });
    posting.salary = SALARY_TEXT_RE
        .find(&page_text)
        .map(|m| m.as_str().trim().to_string())
        .filter(|s| rules::plausible_salary(s));
    posting.work_type = rules::detect_work_type(&page_text).map(str::to_string);
    posting.employment_type = rules::detect_employment_type(&page_text).map(str::to_string);
    posting.logo_url = first_attr(&doc, LOGO_RULES, "src");

    let (company, slug) = extract_company(&doc);
    posting.company = company;
    posting.company_slug = slug;

    if posting.location.is_none() {
        posting.location = loose_location_scan(&doc, &opts.state_codes);
    }

    let mut segmented = segment_description(html, &opts.taxonomy, opts.description_lookahead);
    if segmented.text.is_empty() {
        if let Some(fragment) = description_container(&doc) {
            let text = format_fragment(&fragment);
            let sections = classify_sections_text(&text, &opts.taxonomy);
            segmented.text = text;
            segmented.sections = sections;
        }
    }
    posting.description = segmented.text;
    posting.sections = segmented.sections;

    posting
}

/// First candidate whose normalized text passes the filter.
fn select_first(
    doc: &Html,
    table: &[SelectorRule],
    accept: impl Fn(&str) -> bool,
) -> Option<String> {
    for rule in table {
        let Ok(selector) = Selector::parse(rule.css) else {
            continue;
        };
        for element in doc.select(&selector) {
            let text = normalize(&element.text().collect::<Vec<_>>().join(" "));
            if !text.is_empty() && accept(&text) {
                debug!(rule = rule.name, "selector candidate matched");
                return Some(text);
            }
        }
    }
    None
}

/// First candidate with a non-empty attribute value.
fn first_attr(doc: &Html, table: &[SelectorRule], attr: &str) -> Option<String> {
    for rule in table {
        let Ok(selector) = Selector::parse(rule.css) else {
            continue;
        };
        if let Some(value) = doc
            .select(&selector)
            .find_map(|el| el.value().attr(attr))
            .map(str::trim)
            .filter(|v| !v.is_empty())
        {
            debug!(rule = rule.name, "logo candidate matched");
            return Some(value.to_string());
        }
    }
    None
}

/// Company name and slug: named selectors first, then the company-link scan.
///
/// The link scan always runs for the slug; the link's own text (or a
/// title-cased slug) fills the name only when the selectors found nothing.
fn extract_company(doc: &Html) -> (Option<String>, Option<String>) {
    let mut name = select_first(doc, COMPANY_RULES, |t| !t.is_empty());
    let mut slug = None;

    if let Ok(selector) = Selector::parse("a[href*=\"linkedin.com/company/\"]") {
        for link in doc.select(&selector) {
            let Some(href) = link.value().attr("href") else {
                continue;
            };
            let Some(caps) = COMPANY_SLUG_RE.captures(href) else {
                continue;
            };
            let found = caps[1].to_string();
            if name.is_none() {
                let text = normalize(&link.text().collect::<Vec<_>>().join(" "));
                name = Some(if text.is_empty() {
                    rules::company_name_from_slug(&found)
                } else {
                    text
                });
            }
            slug = Some(found);
            break;
        }
    }
    (name, slug)
}

/// Scans every span for something shaped like a place name.
fn loose_location_scan(doc: &Html, state_codes: &[String]) -> Option<String> {
    let selector = Selector::parse("span").ok()?;
    for span in doc.select(&selector) {
        let text = normalize(&span.text().collect::<Vec<_>>().join(" "));
        if rules::looks_like_place(&text, state_codes) {
            return Some(text);
        }
    }
    None
}

/// Inner HTML of the first known description container.
fn description_container(doc: &Html) -> Option<String> {
    for rule in DESCRIPTION_RULES {
        let Ok(selector) = Selector::parse(rule.css) else {
            continue;
        };
        if let Some(el) = doc.select(&selector).next() {
            debug!(rule = rule.name, "description container matched");
            return Some(el.inner_html());
        }
    }
    None
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::strategy::ExtractOptions;

    fn opts() -> ExtractOptions {
        ExtractOptions::default()
    }

    const GUEST_PAGE: &str = r#"
        <html><body>
          <h2 class="top-card-layout__title">Senior Rust Engineer</h2>
          <a class="topcard__org-name-link" href="https://www.linkedin.com/company/acme-corp/">Acme Corp</a>
          <span class="topcard__flavor--bullet">Seattle, WA</span>
          <span class="posted-time-ago__text">3 days ago</span>
          <span class="num-applicants__caption">Over 150 people clicked apply</span>
          <img class="artdeco-entity-image" src="https://media.example.com/company-logo.png">
          <div class="description__text">
            <strong>About the job</strong>
            <p>We build distributed systems. This is a Full-Time hybrid role.</p>
            <p>Salary: $150,000 - $180,000 per year.</p>
            <strong>Requirements</strong>
            <ul><li>5 years experience</li><li>Rust expertise</li></ul>
          </div>
        </body></html>"#;

    #[test]
    fn extracts_top_card_fields() {
        let posting = extract(GUEST_PAGE, &opts());
        assert_eq!(posting.title.as_deref(), Some("Senior Rust Engineer"));
        assert_eq!(posting.company.as_deref(), Some("Acme Corp"));
        assert_eq!(posting.company_slug.as_deref(), Some("acme-corp"));
        assert_eq!(posting.location.as_deref(), Some("Seattle, WA"));
        assert_eq!(posting.posted.as_deref(), Some("3 days ago"));
        assert_eq!(
            posting.applicants.as_deref(),
            Some("Over 150 people clicked apply")
        );
        assert_eq!(
            posting.logo_url.as_deref(),
            Some("https://media.example.com/company-logo.png")
        );
    }

    #[test]
    fn extracts_categories_and_salary_from_text() {
        let posting = extract(GUEST_PAGE, &opts());
        assert_eq!(posting.work_type.as_deref(), Some("Full-Time"));
        assert_eq!(posting.employment_type.as_deref(), Some("Hybrid"));
        assert_eq!(posting.salary.as_deref(), Some("$150,000 - $180,000 per year"));
    }

    #[test]
    fn description_comes_from_about_marker() {
        let posting = extract(GUEST_PAGE, &opts());
        assert!(posting.description.contains("We build distributed systems."));
        assert!(posting.description.contains("• 5 years experience"));
        assert!(!posting.description.to_lowercase().starts_with("about the job"));
    }

    #[test]
    fn company_name_derived_from_slug_when_link_has_no_text() {
        let html = r#"<html><body>
            <a href="https://www.linkedin.com/company/globex-industries/"><img src="x.png"></a>
        </body></html>"#;
        let posting = extract(html, &opts());
        assert_eq!(posting.company_slug.as_deref(), Some("globex-industries"));
        assert_eq!(posting.company.as_deref(), Some("Globex Industries"));
    }

    #[test]
    fn implausible_title_falls_through_to_next_candidate() {
        let html = r#"<html><body>
            <h1 class="job-title">Hi!</h1>
            <h1>Backend Engineer</h1>
        </body></html>"#;
        let posting = extract(html, &opts());
        assert_eq!(posting.title.as_deref(), Some("Backend Engineer"));
    }

    #[test]
    fn loose_span_scan_finds_location() {
        let html = r#"<html><body>
            <h1>Data Engineer</h1>
            <span>Apply now</span>
            <span>Austin, TX</span>
        </body></html>"#;
        let posting = extract(html, &opts());
        assert_eq!(posting.location.as_deref(), Some("Austin, TX"));
    }

    #[test]
    fn empty_page_yields_empty_posting() {
        let posting = extract("<html><body></body></html>", &opts());
        assert!(posting.is_empty());
    }
}
