//! Highlight terms for the context view.

use std::collections::HashSet;

use crate::matches::Match;

/// Returns the highlight term of a match.
///
/// Only the first range of the match is used; further ranges in the same group do not
/// contribute terms.
pub fn extract_highlight(m: &Match<'_>) -> String {
    m.text().to_lowercase().replace("[[", "").replace("]]", "")
}

/// Removes repeated terms, keeping the first occurrence of each.
pub fn dedupe_highlights(highlights: impl IntoIterator<Item = String>) -> Vec<String> {
    let mut highlights: Vec<String> = highlights.into_iter().collect();
    let mut seen = HashSet::new();
    highlights.retain(|h| seen.insert(h.clone()));
    highlights
}

#[cfg(test)]
mod tests {
    use super::*;

    fn body(content: &str) -> Match<'_> {
        Match {
            content,
            range: (0, content.len()),
            is_property_match: false,
            structure: None,
        }
    }

    #[test]
    fn test_extract_lowercases_and_strips_links() {
        assert_eq!(extract_highlight(&body("[[Rust Tips]]")), "rust tips");
        assert_eq!(extract_highlight(&body("Foo")), "foo");
    }

    #[test]
    fn test_extract_first_range_only() {
        let m = Match {
            content: "Alpha beta",
            range: (6, 10),
            is_property_match: false,
            structure: None,
        };
        assert_eq!(extract_highlight(&m), "beta");
    }

    #[test]
    fn test_dedupe_collapses_case_and_link_variants() {
        let terms = ["Foo", "foo", "[[Foo]]"]
            .into_iter()
            .map(|t| extract_highlight(&body(t)));
        assert_eq!(dedupe_highlights(terms), vec!["foo"]);
    }

    #[test]
    fn test_dedupe_preserves_first_order() {
        let terms = ["b", "a", "b", "c", "a"].map(String::from);
        assert_eq!(dedupe_highlights(terms), vec!["b", "a", "c"]);
    }
}
