// ABOUTME: Main library entry point for the joblens LinkedIn job-posting extractor.
// ABOUTME: Re-exports the public API: Extractor, Strategy, JobPosting, Fetcher, FetchError.

//! joblens - extracts structured job postings from LinkedIn pages.
//!
//! This crate turns raw LinkedIn job-page markup (or plain text) into a
//! structured [`JobPosting`]: top-card fields, a reflowed description, and
//! named description sections. Pages can come from anywhere; a small guest-API
//! client is included for fetching by URL or in bulk from search results.
//!
//! # Example
//!
//! ```no_run
//! use joblens::{extract_job, Fetcher, Strategy};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), joblens::FetchError> {
//!     let fetcher = Fetcher::new();
//!     let html = fetcher
//!         .fetch_job_url("https://www.linkedin.com/jobs/view/3912345678/")
//!         .await?;
//!     let posting = extract_job(&html, Strategy::Default);
//!     println!("{}", posting.format_display());
//!     Ok(())
//! }
//! ```

pub mod bulk;
pub mod description;
pub mod error;
pub mod extractors;
pub mod posting;
pub mod resource;
pub mod sections;
pub mod strategy;
pub mod taxonomy;
pub mod text;

pub use crate::bulk::{collect, parse_search_cards, BulkOptions, JobCard};
pub use crate::description::{format_fragment, segment_description, Segmented};
pub use crate::error::FetchError;
pub use crate::posting::JobPosting;
pub use crate::resource::{extract_job_id, Fetcher};
pub use crate::sections::{classify_header, classify_sections_dom, classify_sections_text};
pub use crate::strategy::{extract_job, ExtractOptions, Extractor, Strategy};
pub use crate::taxonomy::{load_builtin_taxonomy, SectionTaxonomy};
