// ABOUTME: JobPosting struct holding the structured fields extracted from one job page.
// ABOUTME: Includes the display assembler and convenience predicates over the record.

//! The extraction output record.
//!
//! A `JobPosting` is constructed fresh per extraction call, never mutated
//! after assembly, and is JSON-serializable for hand-off to callers. Every
//! field is independent: a missing value is `None` (or empty for
//! `description`/`sections`), never an error.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

/// Structured fields extracted from one LinkedIn job posting.
///
/// `work_type` is the employment category (Full-Time, Contract, ...);
/// `employment_type` is the location arrangement (Hybrid, Remote, ...).
/// `error` is set only on total extraction failure.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
pub struct JobPosting {
    pub company: Option<String>,
    pub company_slug: Option<String>,
    pub title: Option<String>,
    pub location: Option<String>,
    pub posted: Option<String>,
    pub applicants: Option<String>,
    pub salary: Option<String>,
    pub work_type: Option<String>,
    pub employment_type: Option<String>,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub sections: HashMap<String, String>,
    pub logo_url: Option<String>,
    pub error: Option<String>,
}

fn non_empty(v: &Option<String>) -> Option<&str> {
    v.as_deref().map(str::trim).filter(|s| !s.is_empty())
}

impl JobPosting {
    /// Returns true when at least one of the core identity fields is present.
    ///
    /// A strategy that produces neither title nor company is treated as a
    /// strategy-level failure by the parser selector.
    pub fn has_core_fields(&self) -> bool {
        non_empty(&self.title).is_some() || non_empty(&self.company).is_some()
    }

    /// Returns true if no field at all was extracted.
    pub fn is_empty(&self) -> bool {
        !self.has_core_fields()
            && non_empty(&self.location).is_none()
            && non_empty(&self.posted).is_none()
            && non_empty(&self.applicants).is_none()
            && non_empty(&self.salary).is_none()
            && non_empty(&self.work_type).is_none()
            && non_empty(&self.employment_type).is_none()
            && non_empty(&self.logo_url).is_none()
            && self.description.trim().is_empty()
            && self.sections.is_empty()
    }

    /// Builds the empty record carrying a total-failure message.
    pub fn failed(message: impl Into<String>) -> Self {
        Self {
            error: Some(message.into()),
            ..Default::default()
        }
    }

    /// Renders a human-readable summary of the record.
    ///
    /// Emits company, title, a location/posted/applicants line, a
    /// salary/work-type/arrangement line, then the "About the job" body.
    /// Only parts with content are emitted, with exactly one blank line
    /// between consecutive emitted parts.
    pub fn format_display(&self) -> String {
        let mut parts: Vec<String> = Vec::new();

        if let Some(company) = non_empty(&self.company) {
            parts.push(company.to_string());
        }
        if let Some(title) = non_empty(&self.title) {
            parts.push(title.to_string());
        }

        let details: Vec<&str> = [&self.location, &self.posted, &self.applicants]
            .iter()
            .filter_map(|v| non_empty(v))
            .collect();
        if !details.is_empty() {
            parts.push(details.join(" · "));
        }

        let extras: Vec<&str> = [&self.salary, &self.work_type, &self.employment_type]
            .iter()
            .filter_map(|v| non_empty(v))
            .collect();
        if !extras.is_empty() {
            parts.push(extras.join(" · "));
        }

        let description = self.description.trim();
        if !description.is_empty() {
            parts.push(format!("About the job\n\n{}", description));
        }

        parts.join("\n\n")
    }
}
