use dom::contains_ignore_case;

/// Whether a list item labelled `label` stays visible for `query`.
///
/// Queries shorter than `threshold` characters match everything. Matching is
/// a case-insensitive substring test.
pub fn item_matches(label: &str, query: &str, threshold: usize) -> bool {
    if query.chars().count() < threshold {
        return true;
    }
    contains_ignore_case(label, query)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn short_queries_match_everything() {
        assert!(item_matches("Blue", "re", 3));
        assert!(item_matches("Blue", "", 3));
    }

    #[test]
    fn substring_case_insensitive() {
        assert!(item_matches("Red-Orange", "ORA", 3));
        assert!(item_matches("Red", "red", 3));
        assert!(!item_matches("Blue", "red", 3));
    }

    #[test]
    fn threshold_counts_characters_not_bytes() {
        // two characters, four bytes
        assert!(item_matches("Blue", "éé", 3));
    }

    #[test]
    fn zero_threshold_filters_on_empty_query() {
        assert!(item_matches("Blue", "", 0));
        assert!(!item_matches("Blue", "x", 0));
    }
}
