// ABOUTME: Guest-API fetching: job-id recognition, posting fetches, and search pagination.
// ABOUTME: Fetcher takes a base URL override so tests can point it at a mock server.

//! Network resource handling.
//!
//! Key behaviors:
//! - Job IDs are recognized from several URL shapes, tried in order from
//!   most to least specific.
//! - Postings come from the unauthenticated guest API endpoint, which
//!   serves rendered markup without a login.
//! - HTTP 429 maps to a dedicated error variant; no retries happen here.

use once_cell::sync::Lazy;
use regex::Regex;
use tracing::debug;
use url::Url;

use crate::error::FetchError;

/// Production guest-API host.
pub const GUEST_BASE: &str = "https://www.linkedin.com";

/// A desktop browser user agent; the guest API serves bot UAs a login wall.
const USER_AGENT: &str = "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36 \
                          (KHTML, like Gecko) Chrome/126.0.0.0 Safari/537.36";

/// Job-id URL patterns, most specific first.
static JOB_ID_PATTERNS: Lazy<Vec<(&'static str, Regex)>> = Lazy::new(|| {
    vec![
        ("jobs-view-path", Regex::new(r"/jobs/view/(\d+)").unwrap()),
        (
            "current-job-id-param",
            Regex::new(r"currentJobId=(\d+)").unwrap(),
        ),
        ("job-posting-path", Regex::new(r"/jobPosting/(\d+)").unwrap()),
        (
            "slug-trailing-id",
            Regex::new(r"-(\d{8,})(?:[/?#]|$)").unwrap(),
        ),
        (
            "bare-numeric-path",
            Regex::new(r"/(\d{10,})(?:[/?#]|$)").unwrap(),
        ),
    ]
});

/// Pulls a numeric job ID out of any supported LinkedIn URL shape.
pub fn extract_job_id(url: &str) -> Option<String> {
    JOB_ID_PATTERNS.iter().find_map(|(name, re)| {
        re.captures(url).map(|caps| {
            debug!(pattern = *name, "job id recognized");
            caps[1].to_string()
        })
    })
}

/// Fetches job pages from the guest API.
#[derive(Debug, Clone)]
pub struct Fetcher {
    client: reqwest::Client,
    base: String,
}

impl Default for Fetcher {
    fn default() -> Self {
        Self::new()
    }
}

impl Fetcher {
    pub fn new() -> Self {
        Self::with_base_url(GUEST_BASE)
    }

    /// Points the fetcher at a different host, for tests against a mock server.
    pub fn with_base_url(base: impl Into<String>) -> Self {
        let client = reqwest::Client::builder()
            .user_agent(USER_AGENT)
            .build()
            .unwrap_or_default();
        Self {
            client,
            base: base.into().trim_end_matches('/').to_string(),
        }
    }

    /// Fetches the rendered markup for one posting by job ID.
    pub async fn fetch_job(&self, job_id: &str) -> Result<String, FetchError> {
        if job_id.is_empty() || !job_id.chars().all(|c| c.is_ascii_digit()) {
            return Err(FetchError::InvalidUrl(job_id.to_string()));
        }
        let url = format!("{}/jobs-guest/jobs/api/jobPosting/{}", self.base, job_id);
        self.get_html(&url).await
    }

    /// Resolves a job URL to its ID and fetches the posting.
    pub async fn fetch_job_url(&self, url: &str) -> Result<String, FetchError> {
        let job_id =
            extract_job_id(url).ok_or_else(|| FetchError::InvalidUrl(url.to_string()))?;
        self.fetch_job(&job_id).await
    }

    /// Fetches one page of guest search results. `start` pages in increments
    /// the caller chooses; the API itself expects multiples of 10 or 25.
    pub async fn fetch_search_page(
        &self,
        keywords: &str,
        location: &str,
        start: usize,
    ) -> Result<String, FetchError> {
        let mut url = Url::parse(&format!(
            "{}/jobs-guest/jobs/api/seeMoreJobPostings/search",
            self.base
        ))
        .map_err(|e| FetchError::InvalidUrl(e.to_string()))?;
        url.query_pairs_mut()
            .append_pair("keywords", keywords)
            .append_pair("location", location)
            .append_pair("start", &start.to_string());
        self.get_html(url.as_str()).await
    }

    async fn get_html(&self, url: &str) -> Result<String, FetchError> {
        debug!(%url, "fetching");
        let response = self.client.get(url).send().await?;
        match response.status().as_u16() {
            200 => Ok(response.text().await?),
            429 => Err(FetchError::RateLimited),
            status => Err(FetchError::Status(status)),
        }
    }
}
