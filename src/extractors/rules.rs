// ABOUTME: Declarative candidate tables and plausibility filters for every extracted field.
// ABOUTME: Precedence lives in these tables, not in code order, so rules stay auditable.

//! Field extraction rules.
//!
//! Each field has an ordered table of named candidate locators (CSS selectors
//! for the structural strategy, regex patterns for the tag-soup strategy).
//! Candidates are tried in order; the first match that passes the field's
//! plausibility filter wins. Plausibility filters reject syntactically valid
//! but semantically implausible matches (a 300-character "title", a salary
//! with no currency symbol).

use once_cell::sync::Lazy;
use regex::Regex;

/// A named CSS selector candidate for one field.
#[derive(Debug, Clone, Copy)]
pub struct SelectorRule {
    pub name: &'static str,
    pub css: &'static str,
}

/// Title selector candidates, most specific first.
pub const TITLE_RULES: &[SelectorRule] = &[
    SelectorRule {
        name: "unified-top-card-title",
        css: ".jobs-unified-top-card__job-title",
    },
    SelectorRule {
        name: "top-card-layout-title",
        css: "h1.top-card-layout__title, h2.top-card-layout__title",
    },
    SelectorRule {
        name: "topcard-title",
        css: ".topcard__title",
    },
    SelectorRule {
        name: "h1-class-title",
        css: "h1[class*=\"title\"]",
    },
    SelectorRule {
        name: "p-class-title",
        css: "p[class*=\"title\"]",
    },
    SelectorRule {
        name: "bare-h1",
        css: "h1",
    },
];

/// Location selector candidates.
pub const LOCATION_RULES: &[SelectorRule] = &[
    SelectorRule {
        name: "unified-top-card-bullet",
        css: ".jobs-unified-top-card__bullet",
    },
    SelectorRule {
        name: "topcard-flavor-bullet",
        css: ".topcard__flavor--bullet",
    },
    SelectorRule {
        name: "span-class-location",
        css: "span[class*=\"location\"]",
    },
];

/// Company-name selector candidates (checked before the company-link scan).
pub const COMPANY_RULES: &[SelectorRule] = &[
    SelectorRule {
        name: "topcard-org-name-link",
        css: "a.topcard__org-name-link",
    },
    SelectorRule {
        name: "topcard-flavor-black-link",
        css: "span.topcard__flavor--black-link",
    },
];

/// Description container candidates.
pub const DESCRIPTION_RULES: &[SelectorRule] = &[
    SelectorRule {
        name: "jobs-description-content-text",
        css: "div.jobs-description-content__text",
    },
    SelectorRule {
        name: "jobs-description-content",
        css: "div.jobs-description__content",
    },
    SelectorRule {
        name: "show-more-less-markup",
        css: "div.show-more-less-html__markup",
    },
    SelectorRule {
        name: "description-text",
        css: "div.description__text",
    },
    SelectorRule {
        name: "jobs-description-section",
        css: "section.jobs-description",
    },
    SelectorRule {
        name: "description-section",
        css: "section.description",
    },
];

/// Logo image candidates.
pub const LOGO_RULES: &[SelectorRule] = &[
    SelectorRule {
        name: "company-logo-src",
        css: "img[src*=\"company-logo\"]",
    },
    SelectorRule {
        name: "artdeco-entity-image",
        css: "img.artdeco-entity-image",
    },
    SelectorRule {
        name: "data-view-name-image",
        css: "img[data-view-name=\"image\"]",
    },
];

/// Posted-time selector candidates.
pub const POSTED_RULES: &[SelectorRule] = &[SelectorRule {
    name: "posted-time-ago-text",
    css: "span.posted-time-ago__text",
}];

/// Applicant-count selector candidates.
pub const APPLICANT_RULES: &[SelectorRule] = &[SelectorRule {
    name: "num-applicants-caption",
    css: "span.num-applicants__caption",
}];

pub static COMPANY_SLUG_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r##"linkedin\.com/company/([^/?"#\s]+)"##).unwrap());

pub static TIME_AGO_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?i)(?:Reposted\s+)?\d+\s+(?:hour|day|week|month)s?\s+ago").unwrap()
});

/// Applicant-count text patterns, most specific first.
pub static APPLICANT_TEXT_RES: Lazy<Vec<(&'static str, Regex)>> = Lazy::new(|| {
    vec![
        (
            "people-clicked-apply",
            Regex::new(r"(?i)(?:over\s+)?\d+\s+people\s+clicked\s+apply").unwrap(),
        ),
        (
            "n-applicants",
            Regex::new(r"(?i)\d+\s+applicants?").unwrap(),
        ),
        (
            "n-candidates",
            Regex::new(r"(?i)\d+\s+candidates?").unwrap(),
        ),
    ]
});

/// Salary range or amount in plain text, with an optional period suffix.
pub static SALARY_TEXT_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(
        r"[$£€]\s?\d[\d,]*(?:\.\d+)?[Kk]?(?:\s*[-–]\s*[$£€]\s?\d[\d,]*(?:\.\d+)?[Kk]?)?(?:\s*(?:per\s+year|per\s+hour|annually|/yr|/hr))?",
    )
    .unwrap()
});

/// Salary span anchored between tags, as the guest-API markup renders it.
pub static SALARY_TAG_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r">\s*([$£€]\s*[^<]+)<").unwrap());

static WORK_TYPE_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?i)\b(full[\s-]?time|part[\s-]?time|contract|temporary|internship|freelance|seasonal)\b")
        .unwrap()
});

/// Location-arrangement keywords in precedence order: when several match,
/// the first entry here wins, not the first occurrence in the text.
static EMPLOYMENT_RULES: Lazy<Vec<(Regex, &'static str)>> = Lazy::new(|| {
    vec![
        (Regex::new(r"(?i)\bhybrid\b").unwrap(), "Hybrid"),
        (Regex::new(r"(?i)\bremote\b").unwrap(), "Remote"),
        (Regex::new(r"(?i)\bon[\s-]?site\b").unwrap(), "On-Site"),
        (Regex::new(r"(?i)\bin[\s-]?office\b").unwrap(), "In Office"),
        (
            Regex::new(r"(?i)\bwork\s*from\s*home\b").unwrap(),
            "Work From Home",
        ),
    ]
});

/// Characters that never appear in a real job title.
const TITLE_DENYLIST: &str = "!@#$%^&*()_+=[]{}|\\;:'\",<>/?`~";

/// Two-letter US state codes (plus DC) for the loose location scan.
pub const US_STATE_CODES: &[&str] = &[
    "AL", "AK", "AZ", "AR", "CA", "CO", "CT", "DE", "DC", "FL", "GA", "HI", "ID", "IL", "IN",
    "IA", "KS", "KY", "LA", "ME", "MD", "MA", "MI", "MN", "MS", "MO", "MT", "NE", "NV", "NH",
    "NJ", "NM", "NY", "NC", "ND", "OH", "OK", "OR", "PA", "RI", "SC", "SD", "TN", "TX", "UT",
    "VT", "VA", "WA", "WV", "WI", "WY",
];

/// Title filter: plausible length, no special characters.
pub fn plausible_title(text: &str) -> bool {
    let len = text.chars().count();
    len > 5 && len < 200 && !text.chars().any(|c| TITLE_DENYLIST.contains(c))
}

/// Location filter for selector-based hits: short and contains a letter.
pub fn plausible_location(text: &str) -> bool {
    !text.is_empty() && text.chars().count() <= 50 && text.chars().any(|c| c.is_alphabetic())
}

/// Location filter for the loose scan over all spans.
///
/// Requires a known place token: a trailing two-letter state code after a
/// comma, or a Remote/Hybrid qualifier.
pub fn looks_like_place(text: &str, state_codes: &[String]) -> bool {
    if !plausible_location(text) {
        return false;
    }
    let lowered = text.to_lowercase();
    if lowered.contains("remote") || lowered.contains("hybrid") {
        return true;
    }
    state_codes
        .iter()
        .any(|code| text.contains(&format!(", {}", code)))
}

/// Salary filter: a currency symbol and a bounded span.
pub fn plausible_salary(text: &str) -> bool {
    text.chars().count() <= 100 && text.chars().any(|c| matches!(c, '$' | '£' | '€'))
}

/// Applicants filter: bounded, names applicants, and contains a digit.
pub fn plausible_applicants(text: &str) -> bool {
    let lowered = text.to_lowercase();
    text.chars().count() < 50
        && text.chars().any(|c| c.is_ascii_digit())
        && (lowered.contains("applicant")
            || lowered.contains("clicked apply")
            || lowered.contains("candidate"))
}

/// Posted filter: a relative time phrase ending in "ago".
pub fn plausible_posted(text: &str) -> bool {
    TIME_AGO_RE.is_match(text)
}

/// Extracts the canonical employment category from free text.
pub fn detect_work_type(text: &str) -> Option<&'static str> {
    let matched = WORK_TYPE_RE.find(text)?.as_str().to_lowercase();
    let canonical = if matched.starts_with("full") {
        "Full-Time"
    } else if matched.starts_with("part") {
        "Part-Time"
    } else if matched.starts_with("contract") {
        "Contract"
    } else if matched.starts_with("temp") {
        "Temporary"
    } else if matched.starts_with("intern") {
        "Internship"
    } else if matched.starts_with("free") {
        "Freelance"
    } else {
        "Seasonal"
    };
    Some(canonical)
}

/// Extracts the location arrangement, honoring keyword precedence.
pub fn detect_employment_type(text: &str) -> Option<&'static str> {
    EMPLOYMENT_RULES
        .iter()
        .find(|(re, _)| re.is_match(text))
        .map(|(_, canonical)| *canonical)
}

/// Derives a display company name from a URL slug ("acme-corp" -> "Acme Corp").
pub fn company_name_from_slug(slug: &str) -> String {
    slug.split('-')
        .filter(|part| !part.is_empty())
        .map(|part| {
            let mut chars = part.chars();
            match chars.next() {
                Some(first) => first.to_uppercase().collect::<String>() + chars.as_str(),
                None => String::new(),
            }
        })
        .collect::<Vec<_>>()
        .join(" ")
}
