//! Infinite-scroll style feeds.
//!
//! A feed owns the pages loaded so far for one [`FeedQuery`]. Asking for the
//! next page while a request for the same query is still running is refused,
//! and a response that arrives after the query changed is dropped instead of
//! being appended to the new listing.

use anyhow::Result;
use futures_util::future::try_join;
use parking_lot::Mutex;
use std::sync::Arc;

use super::filters::Filters;
use super::source::CatalogSource;
use crate::tmdb::{CatalogItem, MediaType, Page};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FeedQuery {
    /// Popular movies and series interleaved page by page.
    Home,
    Movies(Filters),
    Series(Filters),
    Trending,
    Search(String),
}

impl FeedQuery {
    /// Search is not subject to the listing cap.
    fn page_cap(&self, listing_cap: u32) -> Option<u32> {
        match self {
            FeedQuery::Search(_) => None,
            _ => Some(listing_cap),
        }
    }
}

/// Page number to request after `page`, if any.
pub fn next_page(page: u32, total_pages: u32, cap: Option<u32>) -> Option<u32> {
    let under_cap = cap.is_none_or(|cap| page < cap);
    (page < total_pages && under_cap).then_some(page + 1)
}

/// Loads one page of `query` from `source`, shaping results the same way for
/// every caller.
pub async fn fetch_page(
    source: &dyn CatalogSource,
    query: &FeedQuery,
    page: u32,
) -> Result<Page<CatalogItem>> {
    match query {
        FeedQuery::Home => {
            let defaults = Filters::default();
            let (movies, series) = try_join(
                source.discover(MediaType::Movie, page, &defaults),
                source.discover(MediaType::Tv, page, &defaults),
            )
            .await?;

            let results = tag(movies.results, MediaType::Movie)
                .chain(tag(series.results, MediaType::Tv))
                .collect();

            Ok(Page {
                page,
                total_pages: movies.total_pages.max(series.total_pages),
                total_results: movies.total_results.saturating_add(series.total_results),
                results,
            })
        }
        FeedQuery::Movies(filters) => {
            let mut listing = source.discover(MediaType::Movie, page, filters).await?;
            listing.results = tag(listing.results, MediaType::Movie).collect();
            Ok(listing)
        }
        FeedQuery::Series(filters) => {
            let mut listing = source.discover(MediaType::Tv, page, filters).await?;
            listing.results = tag(listing.results, MediaType::Tv).collect();
            Ok(listing)
        }
        FeedQuery::Trending => source.trending(page).await,
        FeedQuery::Search(term) => {
            let term = term.trim();
            if term.is_empty() {
                return Ok(Page::empty());
            }
            let mut found = source.search(term, page).await?;
            found.results.retain(|item| !item.is_person());
            Ok(found)
        }
    }
}

fn tag(items: Vec<CatalogItem>, media: MediaType) -> impl Iterator<Item = CatalogItem> {
    items.into_iter().map(move |item| item.with_media(media))
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FetchOutcome {
    Loaded { page: u32, added: usize },
    /// A request for this query is already running.
    Busy,
    /// No further pages.
    Exhausted,
    /// The query changed while the request was running; the response was dropped.
    Stale,
}

struct FeedState {
    query: FeedQuery,
    generation: u64,
    pages: Vec<Page<CatalogItem>>,
    in_flight: Option<u64>,
}

/// Clears the in-flight mark if a fetch is dropped before it resolves.
struct InFlight<'a> {
    state: &'a Mutex<FeedState>,
    generation: u64,
    armed: bool,
}

impl InFlight<'_> {
    /// For callers that already hold the lock and clear the mark themselves.
    fn disarm(mut self) {
        self.armed = false;
    }
}

impl Drop for InFlight<'_> {
    fn drop(&mut self) {
        if !self.armed {
            return;
        }
        let mut state = self.state.lock();
        if state.in_flight == Some(self.generation) {
            log::debug!("Fetch for generation {} was abandoned", self.generation);
            state.in_flight = None;
        }
    }
}

pub struct InfiniteFeed {
    source: Arc<dyn CatalogSource>,
    listing_cap: u32,
    state: Mutex<FeedState>,
}

impl InfiniteFeed {
    pub fn new(source: Arc<dyn CatalogSource>, query: FeedQuery, listing_cap: u32) -> Self {
        Self {
            source,
            listing_cap,
            state: Mutex::new(FeedState {
                query,
                generation: 0,
                pages: Vec::new(),
                in_flight: None,
            }),
        }
    }

    pub fn query(&self) -> FeedQuery {
        self.state.lock().query.clone()
    }

    /// Switches to a new query. Loaded pages are discarded and any request
    /// still running for the old query becomes stale.
    pub fn set_query(&self, query: FeedQuery) {
        let mut state = self.state.lock();
        if state.query == query {
            return;
        }
        state.generation += 1;
        state.query = query;
        state.pages.clear();
        state.in_flight = None;
        log::debug!("Feed query changed (generation {})", state.generation);
    }

    pub fn has_next(&self) -> bool {
        let state = self.state.lock();
        Self::next_page_for(&state, self.listing_cap).is_some()
    }

    pub fn is_fetching(&self) -> bool {
        let state = self.state.lock();
        state.in_flight == Some(state.generation)
    }

    pub fn pages_loaded(&self) -> usize {
        self.state.lock().pages.len()
    }

    pub fn items(&self) -> Vec<CatalogItem> {
        self.state
            .lock()
            .pages
            .iter()
            .flat_map(|p| p.results.iter().cloned())
            .collect()
    }

    /// First item of the first page, used for the listing banner.
    pub fn headline(&self) -> Option<CatalogItem> {
        self.state
            .lock()
            .pages
            .first()
            .and_then(|p| p.results.first().cloned())
    }

    fn next_page_for(state: &FeedState, listing_cap: u32) -> Option<u32> {
        match state.pages.last() {
            None => Some(1),
            Some(last) => next_page(
                last.page,
                last.total_pages,
                state.query.page_cap(listing_cap),
            ),
        }
    }

    pub async fn fetch_next(&self) -> Result<FetchOutcome> {
        let (generation, query, page) = {
            let mut state = self.state.lock();
            if state.in_flight == Some(state.generation) {
                return Ok(FetchOutcome::Busy);
            }
            let Some(page) = Self::next_page_for(&state, self.listing_cap) else {
                return Ok(FetchOutcome::Exhausted);
            };
            state.in_flight = Some(state.generation);
            (state.generation, state.query.clone(), page)
        };
        let in_flight = InFlight {
            state: &self.state,
            generation,
            armed: true,
        };

        let result = fetch_page(self.source.as_ref(), &query, page).await;

        let mut state = self.state.lock();
        in_flight.disarm();
        if state.in_flight == Some(generation) {
            state.in_flight = None;
        }
        if state.generation != generation {
            log::debug!(
                "Dropping page {} for stale generation {} (now {})",
                page,
                generation,
                state.generation
            );
            return Ok(FetchOutcome::Stale);
        }

        let loaded = result?;
        let added = loaded.results.len();
        log::debug!(
            "Loaded page {}/{} ({} items)",
            loaded.page,
            loaded.total_pages,
            added
        );
        state.pages.push(loaded);
        Ok(FetchOutcome::Loaded { page, added })
    }
}
