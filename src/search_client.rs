use std::time::Duration;

use log::debug;
use reqwest::blocking::Client;
use serde::Deserialize;
use thiserror::Error;

use crate::models::{PageResponse, StoryItem};

const SEARCH_URL: &str = "https://hn.algolia.com/api/v1/search";

/// How many hits we ask for per page.
pub const PAGE_SIZE: u32 = 20;

/// Why a page fetch failed. Both variants surface to the user the same
/// way (the error banner); the distinction only matters for the log.
#[derive(Debug, Error)]
pub enum FetchError {
    #[error("search request failed: {0}")]
    Network(#[from] reqwest::Error),
    #[error("malformed search response: {0}")]
    Malformed(#[from] serde_json::Error),
}

/// Raw hit as Algolia returns it. Story hits carry all fields; comment
/// hits come back with most of them null.
#[derive(Debug, Deserialize)]
struct RawHit {
    #[serde(rename = "objectID")]
    object_id: String,
    title: Option<String>,
    url: Option<String>,
    author: Option<String>,
    num_comments: Option<i32>,
    points: Option<i32>,
}

#[derive(Debug, Deserialize)]
struct RawPage {
    hits: Vec<RawHit>,
    page: i32,
}

/// Blocking client for the HN Algolia search API. Cheap to share behind
/// an Arc; every fetch runs on its own thread.
pub struct SearchClient {
    client: Client,
}

impl SearchClient {
    pub fn new() -> Self {
        let client = Client::builder()
            .timeout(Duration::from_secs(60))
            .user_agent("hn-search/0.1")
            .build()
            .expect("Failed to create HTTP client");

        Self { client }
    }

    /// Fetch one page of search results for `term`.
    pub fn fetch_page(&self, term: &str, page: u32) -> Result<PageResponse, FetchError> {
        let page_param = page.to_string();
        let per_page = PAGE_SIZE.to_string();
        let response = self
            .client
            .get(SEARCH_URL)
            .query(&[
                ("query", term),
                ("page", page_param.as_str()),
                ("hitsPerPage", per_page.as_str()),
            ])
            .send()?
            .error_for_status()?;

        let body = response.text()?;
        let page = parse_page(&body)?;
        debug!(
            "fetched {} hits for '{}' page {}",
            page.hits.len(),
            term,
            page.page
        );
        Ok(page)
    }
}

/// Decode an Algolia search payload. Split out from the transport so the
/// decoding can be tested without a network.
pub fn parse_page(body: &str) -> Result<PageResponse, FetchError> {
    let raw: RawPage = serde_json::from_str(body)?;

    let hits = raw
        .hits
        .into_iter()
        // Comment-only matches have neither a title nor a url; they are
        // useless in a story table, so drop them here.
        .filter(|hit| hit.title.is_some() || hit.url.is_some())
        .map(|hit| StoryItem {
            id: hit.object_id,
            title: hit.title.unwrap_or_default(),
            url: hit.url.unwrap_or_default(),
            author: hit.author.unwrap_or_default(),
            num_comments: hit.num_comments.unwrap_or(0).max(0),
            points: hit.points.unwrap_or(0),
        })
        .collect();

    Ok(PageResponse {
        hits,
        page: raw.page,
    })
}
