use crate::models::{seed_stories, ResultCache, SortKey, StoryItem};

/// Project the cache entry for `active_term` into the sequence the table
/// shows. Pure: sorting is stable, reversal happens after sorting, and a
/// blank term falls back to the built-in seed list instead of an empty
/// table.
pub fn project(
    cache: &ResultCache,
    active_term: &str,
    sort_key: SortKey,
    sort_reversed: bool,
) -> Vec<StoryItem> {
    let mut items = if active_term.trim().is_empty() {
        seed_stories()
    } else {
        cache.entry(active_term).items
    };

    match sort_key {
        SortKey::None => {}
        SortKey::Title => items.sort_by(|a, b| a.title.cmp(&b.title)),
        SortKey::Author => items.sort_by(|a, b| a.author.cmp(&b.author)),
        // Numeric columns sort highest-first; that is part of the sort
        // definition, not of `sort_reversed`.
        SortKey::Comments => items.sort_by(|a, b| b.num_comments.cmp(&a.num_comments)),
        SortKey::Points => items.sort_by(|a, b| b.points.cmp(&a.points)),
    }

    if sort_reversed {
        items.reverse();
    }

    items
}

#[cfg(test)]
mod tests {
    use super::*;

    fn story(id: &str, title: &str, author: &str, comments: i32, points: i32) -> StoryItem {
        StoryItem {
            id: id.to_string(),
            title: title.to_string(),
            url: format!("https://example.com/{}", id),
            author: author.to_string(),
            num_comments: comments,
            points,
        }
    }

    fn seeded_cache() -> ResultCache {
        let mut cache = ResultCache::new();
        cache.merge_page(
            "rust",
            0,
            vec![
                story("1", "tokio", "alice", 10, 50),
                story("2", "axum", "carol", 30, 20),
                story("3", "serde", "bob", 20, 80),
            ],
        );
        cache
    }

    #[test]
    fn none_keeps_insertion_order() {
        let cache = seeded_cache();
        let items = project(&cache, "rust", SortKey::None, false);
        let ids: Vec<&str> = items.iter().map(|s| s.id.as_str()).collect();
        assert_eq!(ids, ["1", "2", "3"]);
    }

    #[test]
    fn title_sorts_ascending() {
        let cache = seeded_cache();
        let items = project(&cache, "rust", SortKey::Title, false);
        let titles: Vec<&str> = items.iter().map(|s| s.title.as_str()).collect();
        assert_eq!(titles, ["axum", "serde", "tokio"]);
    }

    #[test]
    fn author_sorts_ascending() {
        let cache = seeded_cache();
        let items = project(&cache, "rust", SortKey::Author, false);
        let authors: Vec<&str> = items.iter().map(|s| s.author.as_str()).collect();
        assert_eq!(authors, ["alice", "bob", "carol"]);
    }

    #[test]
    fn numeric_keys_sort_descending() {
        let cache = seeded_cache();

        let items = project(&cache, "rust", SortKey::Comments, false);
        let counts: Vec<i32> = items.iter().map(|s| s.num_comments).collect();
        assert_eq!(counts, [30, 20, 10]);

        let items = project(&cache, "rust", SortKey::Points, false);
        let points: Vec<i32> = items.iter().map(|s| s.points).collect();
        assert_eq!(points, [80, 50, 20]);
    }

    #[test]
    fn reversed_is_the_exact_mirror() {
        let cache = seeded_cache();
        let forward = project(&cache, "rust", SortKey::Points, false);
        let mut backward = project(&cache, "rust", SortKey::Points, true);
        backward.reverse();
        assert_eq!(forward, backward);
    }

    #[test]
    fn equal_keys_keep_prior_relative_order() {
        let mut cache = ResultCache::new();
        cache.merge_page(
            "rust",
            0,
            vec![
                story("a", "same", "x", 5, 1),
                story("b", "same", "x", 5, 2),
                story("c", "same", "x", 5, 3),
            ],
        );

        let items = project(&cache, "rust", SortKey::Title, false);
        let ids: Vec<&str> = items.iter().map(|s| s.id.as_str()).collect();
        assert_eq!(ids, ["a", "b", "c"]);

        let items = project(&cache, "rust", SortKey::Comments, false);
        let ids: Vec<&str> = items.iter().map(|s| s.id.as_str()).collect();
        assert_eq!(ids, ["a", "b", "c"]);
    }

    #[test]
    fn blank_term_falls_back_to_seed_list() {
        let cache = ResultCache::new();

        let items = project(&cache, "", SortKey::None, false);
        assert_eq!(items.len(), 2);
        assert_eq!(items[0].title, "React");
        assert_eq!(items[1].title, "Redux");

        let items = project(&cache, "   ", SortKey::Points, false);
        assert_eq!(items[0].title, "Redux"); // 5 points beats 4
    }
}
