use std::sync::mpsc::{self, Receiver, TryRecvError};
use std::sync::Arc;
use std::thread;

use log::{error, info, warn};

use crate::models::{PageResponse, ResultCache, SortKey, StoryItem};
use crate::projector::project;
use crate::search_client::{FetchError, SearchClient};
use crate::session::{FetchToken, SessionAction, SessionState};

type FetchResult = (FetchToken, Result<PageResponse, FetchError>);

/// Owns the session state, the result cache and the fetch lifecycle.
/// Fetches run on background threads and report back over an mpsc channel
/// that `poll_fetch` drains once per frame; everything else happens on the
/// UI thread.
pub struct QueryController {
    client: Arc<SearchClient>,
    state: SessionState,
    cache: ResultCache,
    fetch_rx: Option<Receiver<FetchResult>>,
    /// Sequence number of the most recently issued fetch. Responses with
    /// an older sequence (or a term that is no longer active) are stale
    /// and never merged.
    fetch_seq: u64,
}

impl QueryController {
    pub fn new(client: Arc<SearchClient>) -> Self {
        Self {
            client,
            state: SessionState::default(),
            cache: ResultCache::new(),
            fetch_rx: None,
            fetch_seq: 0,
        }
    }

    // --- callback surface exposed to the UI ---

    pub fn set_draft_term(&mut self, text: String) {
        self.apply(SessionAction::SetDraftTerm(text));
    }

    /// Start a brand-new search for the draft term: any cached pages for
    /// it are discarded and page 0 is fetched fresh. Re-submitting the
    /// same text is a deliberate restart, not a cache hit.
    pub fn submit_search(&mut self) {
        self.apply(SessionAction::SubmitSearch);

        let term = self.state.active_term.clone();
        if term.trim().is_empty() {
            // Nothing to fetch; the projector shows the seed list instead.
            // Any fetch still out for the previous term is dead to us now,
            // and the loading flag must not keep claiming it.
            self.abandon_fetch();
            return;
        }

        self.cache.reset_entry(&term);
        self.start_fetch(term, 0);
    }

    /// Fetch the page after the last one merged for the active term.
    /// Ignored while a fetch is already in flight.
    pub fn load_next_page(&mut self) {
        if self.state.is_loading {
            return;
        }

        let term = self.state.active_term.clone();
        if term.trim().is_empty() {
            return;
        }

        let next_page = (self.cache.entry(&term).last_page + 1).max(0) as u32;
        self.start_fetch(term, next_page);
    }

    pub fn on_sort(&mut self, key: SortKey) {
        self.apply(SessionAction::ToggleSort(key));
    }

    /// Drop one story from the active term's cached results. Local only,
    /// no re-fetch.
    pub fn on_dismiss(&mut self, id: &str) {
        let term = self.state.active_term.clone();
        self.cache.remove_item(&term, id);
    }

    // --- read side for the display ---

    /// The stories to show right now, sorted per the current sort state.
    pub fn visible_stories(&self) -> Vec<StoryItem> {
        project(
            &self.cache,
            &self.state.active_term,
            self.state.sort_key,
            self.state.sort_reversed,
        )
    }

    pub fn draft_term(&self) -> &str {
        &self.state.draft_term
    }

    pub fn active_term(&self) -> &str {
        &self.state.active_term
    }

    pub fn is_loading(&self) -> bool {
        self.state.is_loading
    }

    pub fn has_error(&self) -> bool {
        self.state.has_error
    }

    pub fn sort_key(&self) -> SortKey {
        self.state.sort_key
    }

    pub fn sort_reversed(&self) -> bool {
        self.state.sort_reversed
    }

    // --- fetch lifecycle ---

    /// Check whether a background fetch has finished and fold its result
    /// in. Returns true when state changed and the UI should repaint.
    pub fn poll_fetch(&mut self) -> bool {
        let Some(rx) = &self.fetch_rx else {
            return false;
        };

        match rx.try_recv() {
            Ok((token, result)) => {
                self.fetch_rx = None;
                self.apply_fetch_result(token, result);
                true
            }
            Err(TryRecvError::Empty) => false,
            Err(TryRecvError::Disconnected) => {
                // The worker died without reporting. Treat it like any
                // other failed fetch.
                warn!("fetch worker disappeared without a result");
                self.fetch_rx = None;
                self.apply(SessionAction::FetchFailed);
                true
            }
        }
    }

    fn start_fetch(&mut self, term: String, page: u32) {
        self.fetch_seq += 1;
        let token = FetchToken {
            term,
            page,
            seq: self.fetch_seq,
        };

        self.apply(SessionAction::FetchStarted);

        let client = Arc::clone(&self.client);
        let (tx, rx) = mpsc::channel();
        thread::spawn(move || {
            let result = client.fetch_page(&token.term, token.page);
            // The receiver may be gone if a newer search superseded us;
            // that just means nobody cares about this page anymore.
            let _ = tx.send((token, result));
        });

        // Replacing the receiver abandons any fetch still in flight.
        self.fetch_rx = Some(rx);
    }

    /// Drop interest in the outstanding fetch, if any, and return the
    /// loading lifecycle to idle. Bumping the sequence number keeps a
    /// buffered late reply from ever matching again.
    fn abandon_fetch(&mut self) {
        if self.fetch_rx.is_none() && !self.state.is_loading {
            return;
        }
        self.fetch_rx = None;
        self.fetch_seq += 1;
        if self.state.is_loading {
            self.apply(SessionAction::FetchAbandoned);
        }
    }

    /// The merge boundary. A response is applied only when its token still
    /// matches the latest issued fetch for the currently active term; a
    /// stale reply is logged and dropped without touching any state.
    fn apply_fetch_result(&mut self, token: FetchToken, result: Result<PageResponse, FetchError>) {
        if token.seq != self.fetch_seq || token.term != self.state.active_term {
            warn!(
                "discarding stale response for '{}' page {} (seq {})",
                token.term, token.page, token.seq
            );
            return;
        }

        match result {
            Ok(page) => {
                info!(
                    "merging {} hits for '{}' page {}",
                    page.hits.len(),
                    token.term,
                    page.page
                );
                self.cache.merge_page(&token.term, page.page, page.hits);
                self.apply(SessionAction::FetchSucceeded);
            }
            Err(err) => {
                // A failed page must not touch previously merged results.
                error!("fetch for '{}' page {} failed: {}", token.term, token.page, err);
                self.apply(SessionAction::FetchFailed);
            }
        }
    }

    fn apply(&mut self, action: SessionAction) {
        self.state = self.state.clone().apply(action);
    }
}
