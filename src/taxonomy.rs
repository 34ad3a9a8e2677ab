// ABOUTME: Canonical section taxonomy mapping free-text headers to fixed categories.
// ABOUTME: Loads from embedded JSON with a hardcoded fallback table; injectable per extraction.

//! The canonical section taxonomy.
//!
//! Job descriptions use wildly varying headers ("What You'll Bring",
//! "Why Join Us") for a small set of recurring concerns. The taxonomy maps
//! synonym phrases onto canonical category names. The builtin table ships as
//! embedded JSON; a hand-written fallback covers the case where that JSON is
//! ever malformed, and callers may inject their own taxonomy through
//! `ExtractOptions`.

use serde::{Deserialize, Serialize};
use tracing::warn;

/// Embedded JSON with the builtin categories and their synonym phrases.
const BUILTIN_TAXONOMY_JSON: &str = include_str!("../data/section_taxonomy.json");

/// One canonical category plus the synonym phrases that map into it.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Category {
    pub name: String,
    #[serde(default)]
    pub synonyms: Vec<String>,
}

/// A set of canonical categories used to classify section headers.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SectionTaxonomy {
    categories: Vec<Category>,
}

impl SectionTaxonomy {
    /// Builds a taxonomy from an explicit category list.
    pub fn new(categories: Vec<Category>) -> Self {
        Self { categories }
    }

    /// Parses a taxonomy from a JSON array of `{name, synonyms}` objects.
    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        let categories: Vec<Category> = serde_json::from_str(json)?;
        Ok(Self { categories })
    }

    /// The minimal hardcoded table used when no configuration is available.
    pub fn fallback() -> Self {
        let table: &[(&str, &[&str])] = &[
            (
                "Job Description",
                &["job description", "about the job", "role description"],
            ),
            (
                "Company Description",
                &["company description", "about us", "who we are"],
            ),
            (
                "Qualifications",
                &["qualifications", "requirements", "what you bring"],
            ),
            (
                "Responsibilities",
                &["responsibilities", "what you'll do", "duties"],
            ),
            ("Benefits", &["benefits", "what we offer", "perks"]),
            (
                "Additional Information",
                &["additional information", "equal opportunity"],
            ),
            ("Application Process", &["how to apply", "next steps"]),
        ];
        Self {
            categories: table
                .iter()
                .map(|(name, synonyms)| Category {
                    name: name.to_string(),
                    synonyms: synonyms.iter().map(|s| s.to_string()).collect(),
                })
                .collect(),
        }
    }

    /// Classifies a header by synonym keyword match.
    ///
    /// Returns the canonical category whose synonym list contains the header
    /// text (case-insensitive substring in either direction), or `None`.
    pub fn classify_keyword(&self, header: &str) -> Option<&str> {
        let header_lower = header.trim().to_lowercase();
        if header_lower.is_empty() {
            return None;
        }
        for category in &self.categories {
            for synonym in &category.synonyms {
                let synonym_lower = synonym.to_lowercase();
                if header_lower.contains(&synonym_lower) {
                    return Some(&category.name);
                }
                // The reverse direction (truncated header inside a longer
                // synonym) needs a length floor or one-letter lines match.
                if header_lower.len() >= 4 && synonym_lower.contains(&header_lower) {
                    return Some(&category.name);
                }
            }
        }
        None
    }

    /// Iterates over the canonical category names.
    pub fn canonical_names(&self) -> impl Iterator<Item = &str> {
        self.categories.iter().map(|c| c.name.as_str())
    }

    pub fn len(&self) -> usize {
        self.categories.len()
    }

    pub fn is_empty(&self) -> bool {
        self.categories.is_empty()
    }
}

impl Default for SectionTaxonomy {
    fn default() -> Self {
        load_builtin_taxonomy()
    }
}

/// Loads the builtin taxonomy from embedded JSON.
///
/// Falls back to the hardcoded table if the embedded JSON fails to parse;
/// classification must keep working even with a broken data file.
pub fn load_builtin_taxonomy() -> SectionTaxonomy {
    match SectionTaxonomy::from_json(BUILTIN_TAXONOMY_JSON) {
        Ok(taxonomy) => taxonomy,
        Err(e) => {
            warn!("builtin section taxonomy failed to parse, using fallback: {e}");
            SectionTaxonomy::fallback()
        }
    }
}
