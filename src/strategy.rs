// ABOUTME: Strategy selection and merging: structural, soup, hybrid overlay, default fallback.
// ABOUTME: Extractor is the single entry point callers use; extract_job wraps the common case.

//! Extraction strategies.
//!
//! Key behaviors:
//! - `Structural` and `Soup` run one strategy alone.
//! - `Hybrid` runs both and overlays structural results on the soup
//!   baseline: a non-empty structural field always wins.
//! - `Default` runs structural first and falls back to soup only when
//!   structural misses both title and company.
//! - Extraction never fails; an empty result carries an error message in
//!   the posting itself.

use std::fmt;
use std::str::FromStr;

use crate::description::DEFAULT_LOOKAHEAD;
use crate::extractors::rules::US_STATE_CODES;
use crate::extractors::{soup, structural};
use crate::posting::JobPosting;
use crate::taxonomy::SectionTaxonomy;
use tracing::debug;

/// How a page gets turned into a posting.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Strategy {
    Structural,
    Soup,
    Hybrid,
    #[default]
    Default,
}

impl Strategy {
    pub const ALL: &'static [Strategy] = &[
        Strategy::Structural,
        Strategy::Soup,
        Strategy::Hybrid,
        Strategy::Default,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Strategy::Structural => "structural",
            Strategy::Soup => "soup",
            Strategy::Hybrid => "hybrid",
            Strategy::Default => "default",
        }
    }
}

impl fmt::Display for Strategy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Strategy {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "structural" => Ok(Strategy::Structural),
            "soup" => Ok(Strategy::Soup),
            "hybrid" => Ok(Strategy::Hybrid),
            "default" | "" => Ok(Strategy::Default),
            other => Err(format!(
                "unknown strategy '{other}' (expected structural, soup, hybrid, or default)"
            )),
        }
    }
}

/// Tunables shared by every strategy.
#[derive(Debug, Clone)]
pub struct ExtractOptions {
    pub strategy: Strategy,
    pub taxonomy: SectionTaxonomy,
    pub state_codes: Vec<String>,
    pub description_lookahead: usize,
}

impl Default for ExtractOptions {
    fn default() -> Self {
        Self {
            strategy: Strategy::Default,
            taxonomy: SectionTaxonomy::default(),
            state_codes: US_STATE_CODES.iter().map(|s| s.to_string()).collect(),
            description_lookahead: DEFAULT_LOOKAHEAD,
        }
    }
}

impl ExtractOptions {
    pub fn with_strategy(strategy: Strategy) -> Self {
        Self {
            strategy,
            ..Self::default()
        }
    }
}

/// Runs the configured strategy over job pages.
#[derive(Debug, Clone, Default)]
pub struct Extractor {
    opts: ExtractOptions,
}

impl Extractor {
    pub fn new(opts: ExtractOptions) -> Self {
        Self { opts }
    }

    /// Extracts a posting. Never fails: an empty page yields a posting whose
    /// `error` field explains that nothing was found.
    pub fn extract(&self, html: &str) -> JobPosting {
        let posting = match self.opts.strategy {
            Strategy::Structural => structural::extract(html, &self.opts),
            Strategy::Soup => soup::extract(html, &self.opts),
            Strategy::Hybrid => {
                let base = soup::extract(html, &self.opts);
                let overlay = structural::extract(html, &self.opts);
                merge_overlay(base, overlay)
            }
            Strategy::Default => {
                let first = structural::extract(html, &self.opts);
                if first.has_core_fields() {
                    first
                } else {
                    debug!("structural pass missed title and company, retrying with soup");
                    soup::extract(html, &self.opts)
                }
            }
        };

        if posting.is_empty() {
            return JobPosting::failed("no recognizable job fields in input");
        }
        posting
    }
}

/// Overlays `overlay` on `base`: non-empty overlay fields win.
///
/// Description and sections move together so every section stays a substring
/// of the description it was classified from.
fn merge_overlay(base: JobPosting, overlay: JobPosting) -> JobPosting {
    let (description, sections) = if overlay.description.is_empty() {
        (base.description, base.sections)
    } else {
        (overlay.description, overlay.sections)
    };
    JobPosting {
        company: pick(overlay.company, base.company),
        company_slug: pick(overlay.company_slug, base.company_slug),
        title: pick(overlay.title, base.title),
        location: pick(overlay.location, base.location),
        posted: pick(overlay.posted, base.posted),
        applicants: pick(overlay.applicants, base.applicants),
        salary: pick(overlay.salary, base.salary),
        work_type: pick(overlay.work_type, base.work_type),
        employment_type: pick(overlay.employment_type, base.employment_type),
        logo_url: pick(overlay.logo_url, base.logo_url),
        description,
        sections,
        error: None,
    }
}

fn pick(primary: Option<String>, fallback: Option<String>) -> Option<String> {
    match primary {
        Some(v) if !v.trim().is_empty() => Some(v),
        _ => fallback,
    }
}

/// One-shot extraction with default options.
pub fn extract_job(html: &str, strategy: Strategy) -> JobPosting {
    Extractor::new(ExtractOptions::with_strategy(strategy)).extract(html)
}
