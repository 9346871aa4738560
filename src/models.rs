use std::collections::HashMap;

/// One search hit from the Algolia API. Never mutated after arrival,
/// only removed when the user dismisses it.
#[derive(Debug, Clone, PartialEq)]
pub struct StoryItem {
    pub id: String,
    pub title: String,
    pub url: String,
    pub author: String,
    pub num_comments: i32,
    pub points: i32,
}

/// One fetched page of results. Consumed immediately into the cache.
#[derive(Debug, Clone)]
pub struct PageResponse {
    pub hits: Vec<StoryItem>,
    pub page: i32,
}

/// Accumulated results for a single search term. `last_page` is the
/// highest page index merged so far; -1 means nothing merged yet.
#[derive(Debug, Clone)]
pub struct CacheEntry {
    pub items: Vec<StoryItem>,
    pub last_page: i32,
}

impl CacheEntry {
    pub fn empty() -> Self {
        Self {
            items: Vec::new(),
            last_page: -1,
        }
    }
}

/// Per-term result cache. Keys are exact search terms (case-sensitive).
/// Grows only; entries are never evicted within a session.
pub struct ResultCache {
    entries: HashMap<String, CacheEntry>,
}

impl ResultCache {
    pub fn new() -> Self {
        Self {
            entries: HashMap::new(),
        }
    }

    /// Entry for `term`, or a fresh empty entry if we have never merged
    /// anything for it. Pure read.
    pub fn entry(&self, term: &str) -> CacheEntry {
        self.entries
            .get(term)
            .cloned()
            .unwrap_or_else(CacheEntry::empty)
    }

    /// Append hits for `term` that aren't already cached (by id), keeping
    /// arrival order. Re-merging an already-merged page is a no-op for the
    /// items; `last_page` never moves backwards.
    pub fn merge_page(&mut self, term: &str, page: i32, hits: Vec<StoryItem>) {
        let entry = self
            .entries
            .entry(term.to_string())
            .or_insert_with(CacheEntry::empty);

        for hit in hits {
            if !entry.items.iter().any(|item| item.id == hit.id) {
                entry.items.push(hit);
            }
        }
        entry.last_page = entry.last_page.max(page);
    }

    /// Throw away everything cached for `term`. Only used when the user
    /// starts a new search for it.
    pub fn reset_entry(&mut self, term: &str) {
        self.entries.insert(term.to_string(), CacheEntry::empty());
    }

    /// Dismiss one story from `term`'s results. Dismissing an unknown or
    /// already-dismissed id is fine. No fetch, `last_page` untouched.
    pub fn remove_item(&mut self, term: &str, id: &str) {
        if let Some(entry) = self.entries.get_mut(term) {
            entry.items.retain(|item| item.id != id);
        }
    }
}

/// Column the result table is sorted by.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SortKey {
    None,
    Title,
    Author,
    Comments,
    Points,
}

/// Built-in stories shown when there is no active search term. Display
/// only; never merged into the cache.
pub fn seed_stories() -> Vec<StoryItem> {
    vec![
        StoryItem {
            id: "0".to_string(),
            title: "React".to_string(),
            url: "https://reactjs.org/".to_string(),
            author: "Jordan Walke".to_string(),
            num_comments: 3,
            points: 4,
        },
        StoryItem {
            id: "1".to_string(),
            title: "Redux".to_string(),
            url: "https://redux.js.org/".to_string(),
            author: "Dan Abramov, Andrew Clark".to_string(),
            num_comments: 2,
            points: 5,
        },
    ]
}

#[cfg(test)]
mod tests {
    use super::*;

    fn story(id: &str, title: &str) -> StoryItem {
        StoryItem {
            id: id.to_string(),
            title: title.to_string(),
            url: format!("https://example.com/{}", id),
            author: "someone".to_string(),
            num_comments: 0,
            points: 0,
        }
    }

    #[test]
    fn entry_for_unknown_term_is_empty() {
        let cache = ResultCache::new();
        let entry = cache.entry("rust");
        assert!(entry.items.is_empty());
        assert_eq!(entry.last_page, -1);
    }

    #[test]
    fn merge_preserves_arrival_order() {
        let mut cache = ResultCache::new();
        cache.merge_page("rust", 0, vec![story("a", "A"), story("b", "B")]);

        let entry = cache.entry("rust");
        assert_eq!(entry.last_page, 0);
        let ids: Vec<&str> = entry.items.iter().map(|s| s.id.as_str()).collect();
        assert_eq!(ids, ["a", "b"]);
    }

    #[test]
    fn merging_same_page_twice_is_idempotent() {
        let mut cache = ResultCache::new();
        let hits = vec![story("a", "A"), story("b", "B")];
        cache.merge_page("rust", 0, hits.clone());
        cache.merge_page("rust", 0, hits);

        let entry = cache.entry("rust");
        assert_eq!(entry.items.len(), 2);
        assert_eq!(entry.last_page, 0);
    }

    #[test]
    fn overlapping_pages_dedup_by_id() {
        // The redux scenario: page 0 = [A,B], page 1 = [B,C].
        let mut cache = ResultCache::new();
        cache.merge_page("redux", 0, vec![story("a", "A"), story("b", "B")]);
        cache.merge_page("redux", 1, vec![story("b", "B"), story("c", "C")]);

        let entry = cache.entry("redux");
        let ids: Vec<&str> = entry.items.iter().map(|s| s.id.as_str()).collect();
        assert_eq!(ids, ["a", "b", "c"]);
        assert_eq!(entry.last_page, 1);
    }

    #[test]
    fn last_page_never_moves_backwards() {
        let mut cache = ResultCache::new();
        cache.merge_page("rust", 2, vec![story("a", "A")]);
        cache.merge_page("rust", 0, vec![story("b", "B")]);

        let entry = cache.entry("rust");
        assert_eq!(entry.last_page, 2);
        assert_eq!(entry.items.len(), 2);
    }

    #[test]
    fn reset_then_merge_starts_fresh() {
        let mut cache = ResultCache::new();
        cache.merge_page("go", 3, vec![story("old", "Old")]);
        cache.reset_entry("go");

        let entry = cache.entry("go");
        assert!(entry.items.is_empty());
        assert_eq!(entry.last_page, -1);

        cache.merge_page("go", 0, vec![story("x", "X"), story("y", "Y")]);
        let entry = cache.entry("go");
        let ids: Vec<&str> = entry.items.iter().map(|s| s.id.as_str()).collect();
        assert_eq!(ids, ["x", "y"]);
        assert_eq!(entry.last_page, 0);
    }

    #[test]
    fn remove_item_keeps_relative_order() {
        let mut cache = ResultCache::new();
        cache.merge_page(
            "rust",
            0,
            vec![story("a", "A"), story("b", "B"), story("c", "C")],
        );
        cache.remove_item("rust", "b");

        let entry = cache.entry("rust");
        let ids: Vec<&str> = entry.items.iter().map(|s| s.id.as_str()).collect();
        assert_eq!(ids, ["a", "c"]);
        assert_eq!(entry.last_page, 0);
    }

    #[test]
    fn remove_unknown_id_is_a_noop() {
        let mut cache = ResultCache::new();
        cache.merge_page("rust", 0, vec![story("a", "A")]);
        cache.remove_item("rust", "nope");
        cache.remove_item("other-term", "a");

        assert_eq!(cache.entry("rust").items.len(), 1);
    }

    #[test]
    fn terms_are_case_sensitive() {
        let mut cache = ResultCache::new();
        cache.merge_page("Rust", 0, vec![story("a", "A")]);

        assert!(cache.entry("rust").items.is_empty());
        assert_eq!(cache.entry("Rust").items.len(), 1);
    }
}
