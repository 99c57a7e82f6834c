//! Glob matching for cache keys.
//!
//! `*` is the only wildcard and matches any run of characters, including
//! none. Every other character, `?` and `[` included, matches itself.

/// Checks if a cache key matches a glob pattern.
///
/// # Examples
///
/// ```
/// use ignite_core::cache::pattern_matches;
///
/// assert!(pattern_matches("item:*", "item:42"));
/// assert!(pattern_matches("cache:*:get_item:*", "cache:repo:get_item:ab12"));
/// assert!(!pattern_matches("item:*", "items:true:0:100"));
/// ```
pub fn pattern_matches(pattern: &str, key: &str) -> bool {
    if pattern.is_empty() {
        return key.is_empty();
    }

    if pattern == "*" {
        return true;
    }

    let segments: Vec<&str> = pattern.split('*').collect();

    if segments.len() == 1 {
        return pattern == key;
    }

    let last = segments.len() - 1;
    let mut remaining = key;

    // The first segment is anchored at the start, the last at the end.
    // Everything between is matched greedily left to right.
    let head = segments[0];
    if !remaining.starts_with(head) {
        return false;
    }
    remaining = &remaining[head.len()..];

    for segment in &segments[1..last] {
        if segment.is_empty() {
            continue;
        }
        match remaining.find(segment) {
            Some(pos) => remaining = &remaining[pos + segment.len()..],
            None => return false,
        }
    }

    remaining.ends_with(segments[last])
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_exact_match() {
        assert!(pattern_matches("item:1", "item:1"));
        assert!(!pattern_matches("item:1", "item:2"));
    }

    #[test]
    fn test_trailing_wildcard() {
        assert!(pattern_matches("user:*", "user:1"));
        assert!(pattern_matches("user:*", "user:"));
        assert!(!pattern_matches("user:*", "item:1"));
    }

    #[test]
    fn test_leading_wildcard() {
        assert!(pattern_matches("*:get_item", "cache:get_item"));
        assert!(!pattern_matches("*:get_item", "cache:get_item:abc"));
    }

    #[test]
    fn test_middle_wildcard() {
        assert!(pattern_matches("cache:*:abc", "cache:name:abc"));
        assert!(pattern_matches("cache:*:abc", "cache::abc"));
        assert!(!pattern_matches("cache:*:abc", "cache:name:abd"));
    }

    #[test]
    fn test_multiple_wildcards() {
        assert!(pattern_matches("*:*:*", "a:b:c"));
        assert!(pattern_matches("items:*:0:*", "items:true:0:100"));
        assert!(!pattern_matches("items:*:5:*", "items:true:0:100"));
    }

    #[test]
    fn test_wildcard_only() {
        assert!(pattern_matches("*", "anything"));
        assert!(pattern_matches("*", ""));
        assert!(pattern_matches("**", "anything"));
    }

    #[test]
    fn test_empty_pattern() {
        assert!(pattern_matches("", ""));
        assert!(!pattern_matches("", "non-empty"));
    }

    #[test]
    fn test_overlapping_head_and_tail() {
        // Head and tail may not share characters of the key.
        assert!(!pattern_matches("ab*ba", "aba"));
        assert!(pattern_matches("ab*ba", "abba"));
    }

    #[test]
    fn test_other_glob_characters_are_literal() {
        assert!(pattern_matches("item:?", "item:?"));
        assert!(!pattern_matches("item:?", "item:1"));
        assert!(pattern_matches("item:[1]", "item:[1]"));
    }

    #[test]
    fn test_item_and_items_patterns_are_disjoint() {
        assert!(pattern_matches("item:*", "item:00000000-0000-0000-0000-000000000000"));
        assert!(!pattern_matches("item:*", "items:false:0:100"));
        assert!(pattern_matches("items:*", "items:false:0:100"));
        assert!(!pattern_matches("items:*", "item:abc"));
    }
}
