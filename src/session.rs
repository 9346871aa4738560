use crate::models::SortKey;

/// Identifies one issued fetch: the term and page it was sent for, plus a
/// sequence number bumped every time a fetch is started. A response is only
/// merged when its token still matches; anything else is a stale reply for
/// an abandoned search and gets dropped at the merge boundary.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FetchToken {
    pub term: String,
    pub page: u32,
    pub seq: u64,
}

/// Everything the UI needs that isn't the cache itself. Mutated only
/// through `apply`, one action at a time.
#[derive(Debug, Clone)]
pub struct SessionState {
    /// What's in the search box. May diverge from `active_term` until the
    /// user hits Search.
    pub draft_term: String,
    /// The term currently driving the display and the next fetch.
    pub active_term: String,
    pub is_loading: bool,
    /// Sticky: set on a failed fetch, cleared only when a later fetch
    /// succeeds.
    pub has_error: bool,
    pub sort_key: SortKey,
    pub sort_reversed: bool,
}

pub const DEFAULT_TERM: &str = "react";

impl Default for SessionState {
    fn default() -> Self {
        Self {
            draft_term: DEFAULT_TERM.to_string(),
            active_term: DEFAULT_TERM.to_string(),
            is_loading: false,
            has_error: false,
            sort_key: SortKey::None,
            sort_reversed: false,
        }
    }
}

#[derive(Debug, Clone)]
pub enum SessionAction {
    SetDraftTerm(String),
    /// The draft becomes the active term.
    SubmitSearch,
    FetchStarted,
    FetchSucceeded,
    FetchFailed,
    /// Interest in the outstanding fetch was dropped (the user moved on
    /// before it resolved). Loading ends; the error flag is untouched.
    FetchAbandoned,
    /// Sort by `key`. Reversal toggles on every call, even when switching
    /// to a key for the first time; see the note on `apply`.
    ToggleSort(SortKey),
}

impl SessionState {
    /// Pure state transition. Cache mutations live elsewhere; this only
    /// covers terms, the loading/error lifecycle, and sort affordances.
    pub fn apply(mut self, action: SessionAction) -> SessionState {
        match action {
            SessionAction::SetDraftTerm(text) => {
                self.draft_term = text;
            }
            SessionAction::SubmitSearch => {
                self.active_term = self.draft_term.clone();
            }
            SessionAction::FetchStarted => {
                self.is_loading = true;
            }
            SessionAction::FetchSucceeded => {
                self.is_loading = false;
                self.has_error = false;
            }
            SessionAction::FetchFailed => {
                self.is_loading = false;
                self.has_error = true;
            }
            SessionAction::FetchAbandoned => {
                self.is_loading = false;
            }
            SessionAction::ToggleSort(key) => {
                // Deliberately toggles even on the first selection of a new
                // key, matching the behavior users already see. Looks like a
                // missing same-key check, but it stays until product says
                // otherwise.
                self.sort_reversed = !self.sort_reversed;
                self.sort_key = key;
            }
        }
        self
    }
}
