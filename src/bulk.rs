// ABOUTME: Bulk collection: parses guest search result cards and fetches each posting.
// ABOUTME: Paces fetches with a delay and skips failed cards instead of aborting the run.

//! Bulk search collection.
//!
//! Key behaviors:
//! - Search result pages are parsed into lightweight cards (title, company,
//!   URL, job ID) without fetching the postings themselves.
//! - `collect` pages through search results and fetches each card's posting,
//!   sleeping between fetches to stay under the guest API's rate limits.
//! - A failed card is logged and skipped; rate limiting ends the run early
//!   with whatever was gathered so far.

use std::time::Duration;

use scraper::{Html, Selector};
use tracing::{debug, warn};

use crate::posting::JobPosting;
use crate::resource::{extract_job_id, Fetcher};
use crate::strategy::Extractor;
use crate::text::normalize;

/// One search result card, parsed from the listing page alone.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct JobCard {
    pub title: String,
    pub company: String,
    pub url: String,
    pub job_id: Option<String>,
}

/// Paging and pacing for a bulk run.
#[derive(Debug, Clone)]
pub struct BulkOptions {
    pub keywords: String,
    pub location: String,
    pub pages: usize,
    pub page_size: usize,
    pub delay: Duration,
}

impl Default for BulkOptions {
    fn default() -> Self {
        Self {
            keywords: String::new(),
            location: String::new(),
            pages: 1,
            page_size: 25,
            delay: Duration::from_secs(2),
        }
    }
}

/// Parses guest search result markup into job cards.
pub fn parse_search_cards(html: &str) -> Vec<JobCard> {
    let doc = Html::parse_document(html);
    let Ok(item_sel) = Selector::parse("li") else {
        return Vec::new();
    };
    let link_sel = Selector::parse("a.base-card__full-link, a[href*=\"/jobs/view/\"]").ok();
    let title_sel = Selector::parse("h3.base-search-card__title").ok();
    let company_sel = Selector::parse("h4.base-search-card__subtitle").ok();

    let mut cards = Vec::new();
    for item in doc.select(&item_sel) {
        let Some(link) = link_sel
            .as_ref()
            .and_then(|sel| item.select(sel).next())
        else {
            continue;
        };
        let Some(url) = link.value().attr("href").map(str::to_string) else {
            continue;
        };
        let title = title_sel
            .as_ref()
            .and_then(|sel| item.select(sel).next())
            .map(|el| normalize(&el.text().collect::<Vec<_>>().join(" ")))
            .unwrap_or_default();
        let company = company_sel
            .as_ref()
            .and_then(|sel| item.select(sel).next())
            .map(|el| normalize(&el.text().collect::<Vec<_>>().join(" ")))
            .unwrap_or_default();
        let job_id = extract_job_id(&url);
        cards.push(JobCard {
            title,
            company,
            url,
            job_id,
        });
    }
    cards
}

/// Pages through search results and extracts every reachable posting.
pub async fn collect(
    fetcher: &Fetcher,
    extractor: &Extractor,
    opts: &BulkOptions,
) -> Vec<JobPosting> {
    let mut postings = Vec::new();

    'pages: for page in 0..opts.pages {
        let start = page * opts.page_size;
        let listing = match fetcher
            .fetch_search_page(&opts.keywords, &opts.location, start)
            .await
        {
            Ok(html) => html,
            Err(err) => {
                warn!(page, %err, "search page fetch failed, stopping");
                break;
            }
        };

        let cards = parse_search_cards(&listing);
        debug!(page, cards = cards.len(), "parsed search page");
        if cards.is_empty() {
            break;
        }

        for card in cards {
            let Some(job_id) = card.job_id.as_deref() else {
                warn!(url = %card.url, "card has no recognizable job id, skipping");
                continue;
            };
            tokio::time::sleep(opts.delay).await;
            let html = match fetcher.fetch_job(job_id).await {
                Ok(html) => html,
                Err(crate::error::FetchError::RateLimited) => {
                    warn!(job_id, "rate limited, ending bulk run early");
                    break 'pages;
                }
                Err(err) => {
                    warn!(job_id, %err, "posting fetch failed, skipping");
                    continue;
                }
            };
            let mut posting = extractor.extract(&html);
            // The listing card can backfill what the posting page missed.
            if posting.title.is_none() && !card.title.is_empty() {
                posting.title = Some(card.title);
            }
            if posting.company.is_none() && !card.company.is_empty() {
                posting.company = Some(card.company);
            }
            postings.push(posting);
        }
    }
    postings
}
