//! Search filter over the entry cache.

use crate::entry::Entry;

/// Entries whose text contains `term`, ignoring case.
///
/// Returns a subsequence of `cache` in the same relative order; an empty term
/// returns every entry. The cache itself is never touched.
pub fn visible_entries<'a>(cache: &'a [Entry], term: &str) -> Vec<&'a Entry> {
    let needle = term.to_lowercase();
    if needle.is_empty() {
        return cache.iter().collect();
    }

    cache
        .iter()
        .filter(|entry| entry.text.to_lowercase().contains(&needle))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;

    fn entries(texts: &[&str]) -> Vec<Entry> {
        texts
            .iter()
            .enumerate()
            .map(|(i, text)| Entry {
                id: format!("e{i}"),
                owner: "u1".to_string(),
                date: format!("2024-01-{:02}", 28 - i),
                text: text.to_string(),
                created_at: Utc::now(),
            })
            .collect()
    }

    fn texts<'a>(entries: &[&'a Entry]) -> Vec<&'a str> {
        entries.iter().map(|e| e.text.as_str()).collect()
    }

    #[test]
    fn test_empty_term_returns_whole_cache() {
        let cache = entries(&["one", "two", "three"]);
        let visible = visible_entries(&cache, "");

        assert_eq!(visible.len(), cache.len());
        assert!(visible.iter().zip(&cache).all(|(v, c)| *v == c));
    }

    #[test]
    fn test_search_matches_substring() {
        let cache = entries(&["Started project X", "Went for a walk"]);
        let visible = visible_entries(&cache, "proj");

        assert_eq!(texts(&visible), vec!["Started project X"]);
    }

    #[test]
    fn test_search_ignores_case() {
        let cache = entries(&["Met ALICE for lunch", "quiet day", "alice called"]);
        let visible = visible_entries(&cache, "Alice");

        assert_eq!(texts(&visible), vec!["Met ALICE for lunch", "alice called"]);
    }

    #[test]
    fn test_result_preserves_cache_order() {
        let cache = entries(&["a walk", "b", "another walk", "c", "walk again"]);
        let visible = visible_entries(&cache, "walk");

        let positions: Vec<usize> = visible
            .iter()
            .map(|v| cache.iter().position(|c| c.id == v.id).unwrap())
            .collect();
        assert!(positions.windows(2).all(|w| w[0] < w[1]));
        assert_eq!(positions.len(), 3);
    }

    #[test]
    fn test_no_match_is_empty() {
        let cache = entries(&["one", "two"]);
        assert!(visible_entries(&cache, "zebra").is_empty());
    }
}
