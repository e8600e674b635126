//! Search state: parameters, input debouncing and the paginated result set
//!
//! The session tags every request with a token. Only the response for the
//! most recently issued token is applied; anything older is dropped.

use serde::Serialize;
use std::collections::HashSet;
use std::fmt;
use std::str::FromStr;
use std::time::{Duration, Instant};

use crate::feed::{sort_items, SortKey};
use crate::models::{CatalogItem, SearchPage};

/// Quiet period before a typed query is sent
pub const DEFAULT_DEBOUNCE: Duration = Duration::from_millis(300);

// =============================================================================
// Parameters
// =============================================================================

/// Which catalog to search
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum SearchFilter {
    #[default]
    All,
    Movie,
    Tv,
}

impl SearchFilter {
    /// Next filter in the UI cycle
    pub fn next(self) -> Self {
        match self {
            SearchFilter::All => SearchFilter::Movie,
            SearchFilter::Movie => SearchFilter::Tv,
            SearchFilter::Tv => SearchFilter::All,
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            SearchFilter::All => "All",
            SearchFilter::Movie => "Movies",
            SearchFilter::Tv => "TV Shows",
        }
    }
}

impl fmt::Display for SearchFilter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            SearchFilter::All => "all",
            SearchFilter::Movie => "movie",
            SearchFilter::Tv => "tv",
        };
        f.write_str(s)
    }
}

impl FromStr for SearchFilter {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "" | "all" => Ok(SearchFilter::All),
            "movie" | "movies" => Ok(SearchFilter::Movie),
            "tv" | "show" | "shows" => Ok(SearchFilter::Tv),
            other => Err(format!("unknown filter '{}' (expected all, movie or tv)", other)),
        }
    }
}

/// Order applied to each page of results
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum SearchSort {
    #[default]
    Relevance,
    Rating,
    Date,
    Popularity,
}

impl SearchSort {
    pub fn next(self) -> Self {
        match self {
            SearchSort::Relevance => SearchSort::Rating,
            SearchSort::Rating => SearchSort::Date,
            SearchSort::Date => SearchSort::Popularity,
            SearchSort::Popularity => SearchSort::Relevance,
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            SearchSort::Relevance => "Relevance",
            SearchSort::Rating => "Rating",
            SearchSort::Date => "Newest",
            SearchSort::Popularity => "Popularity",
        }
    }

    /// Popularity is approximated by vote count
    pub fn key(&self) -> SortKey {
        match self {
            SearchSort::Relevance => SortKey::Relevance,
            SearchSort::Rating => SortKey::Rating,
            SearchSort::Date => SortKey::Date,
            SearchSort::Popularity => SortKey::Votes,
        }
    }
}

impl fmt::Display for SearchSort {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            SearchSort::Relevance => "relevance",
            SearchSort::Rating => "rating",
            SearchSort::Date => "date",
            SearchSort::Popularity => "popularity",
        };
        f.write_str(s)
    }
}

impl FromStr for SearchSort {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "" | "relevance" => Ok(SearchSort::Relevance),
            "rating" => Ok(SearchSort::Rating),
            "date" | "newest" => Ok(SearchSort::Date),
            "popularity" | "popular" => Ok(SearchSort::Popularity),
            other => Err(format!(
                "unknown sort '{}' (expected relevance, rating, date or popularity)",
                other
            )),
        }
    }
}

/// Query, filter and sort as one value
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct SearchParams {
    pub query: String,
    pub filter: SearchFilter,
    pub sort: SearchSort,
}

impl SearchParams {
    pub fn new(query: impl Into<String>) -> Self {
        Self {
            query: query.into(),
            ..Self::default()
        }
    }

    pub fn with_filter(mut self, filter: SearchFilter) -> Self {
        self.filter = filter;
        self
    }

    pub fn with_sort(mut self, sort: SearchSort) -> Self {
        self.sort = sort;
        self
    }

    /// Nothing to search for
    pub fn is_blank(&self) -> bool {
        self.query.trim().is_empty()
    }
}

impl fmt::Display for SearchParams {
    /// Route-style rendering: `q=matrix&filter=movie&sort=rating`
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "q={}&filter={}&sort={}",
            urlencoding::encode(self.query.trim()),
            self.filter,
            self.sort
        )
    }
}

// =============================================================================
// Debouncer
// =============================================================================

/// Fires once after input has been quiet for `delay`
#[derive(Debug, Clone)]
pub struct Debouncer {
    delay: Duration,
    deadline: Option<Instant>,
}

impl Default for Debouncer {
    fn default() -> Self {
        Self::new(DEFAULT_DEBOUNCE)
    }
}

impl Debouncer {
    pub fn new(delay: Duration) -> Self {
        Self {
            delay,
            deadline: None,
        }
    }

    /// Register an edit, restarting the quiet period
    pub fn touch(&mut self, now: Instant) {
        self.deadline = Some(now + self.delay);
    }

    /// True exactly once when the quiet period has elapsed
    pub fn fire(&mut self, now: Instant) -> bool {
        match self.deadline {
            Some(deadline) if now >= deadline => {
                self.deadline = None;
                true
            }
            _ => false,
        }
    }

    pub fn cancel(&mut self) {
        self.deadline = None;
    }

    pub fn is_pending(&self) -> bool {
        self.deadline.is_some()
    }
}

// =============================================================================
// Session
// =============================================================================

/// Identifies one issued request
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct RequestToken(u64);

impl RequestToken {
    /// Token following this one
    pub fn next(self) -> Self {
        RequestToken(self.0 + 1)
    }
}

/// Accumulated results for the current search
#[derive(Debug, Clone, Default)]
pub struct SearchSession {
    params: SearchParams,
    results: Vec<CatalogItem>,
    seen: HashSet<u64>,
    page: u32,
    total_pages: u32,
    total_results: u32,
    latest: RequestToken,
    in_flight: Option<u32>,
}

impl SearchSession {
    pub fn new() -> Self {
        Self::default()
    }

    /// Start a fresh search; previous results are discarded
    pub fn begin(&mut self, params: SearchParams) -> RequestToken {
        self.params = params;
        self.results.clear();
        self.seen.clear();
        self.page = 0;
        self.total_pages = 0;
        self.total_results = 0;
        self.latest = self.latest.next();
        self.in_flight = Some(1);
        self.latest
    }

    /// Request the following page when one exists and nothing is pending
    pub fn begin_next_page(&mut self) -> Option<(RequestToken, u32)> {
        if self.in_flight.is_some() || !self.has_more() {
            return None;
        }
        let page = self.page + 1;
        self.latest = self.latest.next();
        self.in_flight = Some(page);
        Some((self.latest, page))
    }

    /// Apply a response. Returns false (and changes nothing) for stale tokens.
    pub fn apply(&mut self, token: RequestToken, response: SearchPage) -> bool {
        if token != self.latest {
            return false;
        }

        let requested = self.in_flight.take().unwrap_or(self.page + 1);
        let mut items = response.results;
        sort_items(&mut items, self.params.sort.key());

        for item in items {
            if self.seen.insert(item.id) {
                self.results.push(item);
            }
        }

        self.page = if response.page > 0 { response.page } else { requested };
        self.total_pages = response.total_pages;
        self.total_results = response.total_results;
        true
    }

    /// Mark a request as failed so another can be issued
    pub fn fail(&mut self, token: RequestToken) -> bool {
        if token != self.latest {
            return false;
        }
        self.in_flight = None;
        true
    }

    /// Drop everything, e.g. when the query is cleared
    pub fn reset(&mut self, params: SearchParams) {
        self.params = params;
        self.results.clear();
        self.seen.clear();
        self.page = 0;
        self.total_pages = 0;
        self.total_results = 0;
        // Invalidate anything still in flight
        self.latest = self.latest.next();
        self.in_flight = None;
    }

    pub fn params(&self) -> &SearchParams {
        &self.params
    }

    pub fn results(&self) -> &[CatalogItem] {
        &self.results
    }

    pub fn page(&self) -> u32 {
        self.page
    }

    pub fn total_pages(&self) -> u32 {
        self.total_pages
    }

    pub fn total_results(&self) -> u32 {
        self.total_results
    }

    pub fn has_more(&self) -> bool {
        self.page < self.total_pages
    }

    pub fn is_loading(&self) -> bool {
        self.in_flight.is_some()
    }
}
