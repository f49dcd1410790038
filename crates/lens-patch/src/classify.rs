//! Match classification and the per-item augmentation plan.

use lens_document::{SectionKind, section_containing};

use crate::matches::Match;

/// What kind of match a match group is.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MatchKind {
    /// Inside a code block; the host's own rendering is kept.
    Code,
    /// Inside front-matter properties.
    Property,
    /// Anything else.
    Normal,
}

/// Classifies a match.
///
/// Missing structural metadata never makes a match code: without sections the match is
/// treated as normal.
pub fn classify(m: &Match<'_>) -> MatchKind {
    if m.is_property_match {
        return MatchKind::Property;
    }
    let Some(sections) = m.structure.and_then(|s| s.sections.as_deref()) else {
        return MatchKind::Normal;
    };
    match section_containing(&m.position(), sections) {
        Some(section) if section.kind == SectionKind::Code => MatchKind::Code,
        _ => MatchKind::Normal,
    }
}

/// Why an item is left to the host.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DeferReason {
    /// The item has no matches.
    NoMatches,
    /// Every match is inside a code block.
    AllCode,
    /// A non-code match is a property match.
    PropertyMatch,
}

/// What to do with one result item.
#[derive(Debug, PartialEq, Eq)]
pub enum ItemPlan<T> {
    /// Leave the item exactly as the host rendered it.
    Defer(DeferReason),
    /// Mount a context view over the eligible matches.
    Augment {
        /// Normal matches, in their original order. Never empty.
        eligible: Vec<T>,
        /// Code matches, in their original order; the host keeps rendering these.
        code: Vec<T>,
    },
}

/// Splits classified matches into a plan.
pub fn plan_item<T>(classified: impl IntoIterator<Item = (T, MatchKind)>) -> ItemPlan<T> {
    let mut eligible = Vec::new();
    let mut code = Vec::new();
    let mut property = false;
    let mut any = false;

    for (item, kind) in classified {
        any = true;
        match kind {
            MatchKind::Code => code.push(item),
            MatchKind::Property => property = true,
            MatchKind::Normal => eligible.push(item),
        }
    }

    if !any {
        ItemPlan::Defer(DeferReason::NoMatches)
    } else if property {
        ItemPlan::Defer(DeferReason::PropertyMatch)
    } else if eligible.is_empty() {
        ItemPlan::Defer(DeferReason::AllCode)
    } else {
        ItemPlan::Augment { eligible, code }
    }
}

#[cfg(test)]
mod tests {
    use lens_document::{StructureCache, build_structure};

    use super::*;

    const DOC: &str = "Intro about rust.\n\n```rust\nlet rust = 1;\n```\n\nMore rust here.\n";

    fn body<'a>(
        content: &'a str,
        needle: &str,
        nth: usize,
        structure: Option<&'a StructureCache>,
    ) -> Match<'a> {
        let (start, _) = content.match_indices(needle).nth(nth).unwrap();
        Match {
            content,
            range: (start, start + needle.len()),
            is_property_match: false,
            structure,
        }
    }

    #[test]
    fn test_classify_code_and_normal() {
        let structure = build_structure(DOC);
        assert_eq!(classify(&body(DOC, "rust", 0, Some(&structure))), MatchKind::Normal);
        // the fence info string is part of the code block
        assert_eq!(classify(&body(DOC, "rust", 1, Some(&structure))), MatchKind::Code);
        assert_eq!(classify(&body(DOC, "rust", 2, Some(&structure))), MatchKind::Code);
        assert_eq!(classify(&body(DOC, "rust", 3, Some(&structure))), MatchKind::Normal);
    }

    #[test]
    fn test_classify_without_structure_is_normal() {
        assert_eq!(classify(&body(DOC, "rust", 2, None)), MatchKind::Normal);

        let mut structure = build_structure(DOC);
        structure.sections = None;
        assert_eq!(classify(&body(DOC, "rust", 2, Some(&structure))), MatchKind::Normal);
    }

    #[test]
    fn test_classify_property() {
        let m = Match {
            content: "draft",
            range: (0, 5),
            is_property_match: true,
            structure: None,
        };
        assert_eq!(classify(&m), MatchKind::Property);
    }

    #[test]
    fn test_plan_all_code() {
        let plan = plan_item([(1, MatchKind::Code), (2, MatchKind::Code)]);
        assert_eq!(plan, ItemPlan::Defer(DeferReason::AllCode));
    }

    #[test]
    fn test_plan_any_property() {
        let plan = plan_item([(1, MatchKind::Normal), (2, MatchKind::Property)]);
        assert_eq!(plan, ItemPlan::Defer(DeferReason::PropertyMatch));
    }

    #[test]
    fn test_plan_empty() {
        let plan = plan_item(Vec::<(u8, MatchKind)>::new());
        assert_eq!(plan, ItemPlan::Defer(DeferReason::NoMatches));
    }

    #[test]
    fn test_plan_mixed_keeps_order() {
        let plan = plan_item([
            ('a', MatchKind::Code),
            ('b', MatchKind::Normal),
            ('c', MatchKind::Code),
            ('d', MatchKind::Normal),
        ]);
        assert_eq!(
            plan,
            ItemPlan::Augment {
                eligible: vec!['b', 'd'],
                code: vec!['a', 'c'],
            }
        );
    }
}
