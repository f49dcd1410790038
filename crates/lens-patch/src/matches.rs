//! Typed view of a host match child.
//!
//! Host match children are validated once, here, and everything downstream works with
//! a [`Match`] whose first range is known to slice its content.

use lens_document::{Position, StructureCache, position_from_offsets};
use lens_host::MatchChild;

use crate::error::ShapeError;

/// One match group, as the classifier and highlight extractor see it.
#[derive(Debug, Clone, Copy)]
pub struct Match<'a> {
    /// Text the range refers to.
    pub content: &'a str,
    /// Byte offsets of the first match.
    pub range: (usize, usize),
    /// True when the match is inside front-matter properties.
    pub is_property_match: bool,
    /// Structural metadata of the owning file.
    pub structure: Option<&'a StructureCache>,
}

impl<'a> Match<'a> {
    /// Adapts a host match child.
    pub fn from_child(child: &'a MatchChild) -> Result<Self, ShapeError> {
        let first = child.matches().first().ok_or(ShapeError::NoRanges)?;
        let is_property_match = first.key.is_some();
        let content = child.content();
        let (start, end) = (first.start, first.end);

        // Property offsets refer to the property value, not the file text.
        if !is_property_match {
            if start > end || end > content.len() {
                return Err(ShapeError::RangeOutOfBounds {
                    start,
                    end,
                    len: content.len(),
                });
            }
            if !content.is_char_boundary(start) || !content.is_char_boundary(end) {
                return Err(ShapeError::NotCharBoundary { start, end });
            }
        }

        Ok(Self {
            content,
            range: (start, end),
            is_property_match,
            structure: child.cache(),
        })
    }

    /// The matched text of the first range. Empty for property matches whose range
    /// does not slice the content.
    pub fn text(&self) -> &'a str {
        self.content.get(self.range.0..self.range.1).unwrap_or_default()
    }

    /// Line/column position of the first range.
    pub fn position(&self) -> Position {
        position_from_offsets(self.content, self.range.0, self.range.1)
    }
}

#[cfg(test)]
mod tests {
    use std::rc::Rc;

    use lens_host::{MatchActions, RawMatch};

    use super::*;

    fn child(content: &str, matches: Vec<RawMatch>) -> MatchChild {
        MatchChild::new(Rc::from(content), matches, None, MatchActions::default())
    }

    #[test]
    fn test_from_child() {
        let c = child("one two\nthree", vec![RawMatch::body(8, 13), RawMatch::body(0, 3)]);
        let m = Match::from_child(&c).unwrap();

        assert_eq!(m.range, (8, 13));
        assert_eq!(m.text(), "three");
        assert!(!m.is_property_match);
        assert_eq!(m.position().start.line, 1);
    }

    #[test]
    fn test_no_ranges() {
        let c = child("text", vec![]);
        assert_eq!(Match::from_child(&c).unwrap_err(), ShapeError::NoRanges);
    }

    #[test]
    fn test_out_of_bounds() {
        let c = child("short", vec![RawMatch::body(2, 40)]);
        assert_eq!(
            Match::from_child(&c).unwrap_err(),
            ShapeError::RangeOutOfBounds {
                start: 2,
                end: 40,
                len: 5
            }
        );
    }

    #[test]
    fn test_char_boundary() {
        let c = child("héllo", vec![RawMatch::body(0, 2)]);
        assert!(matches!(
            Match::from_child(&c),
            Err(ShapeError::NotCharBoundary { .. })
        ));
    }

    #[test]
    fn test_property_match_skips_bounds() {
        let c = child("draft", vec![RawMatch::property("status", 0, 99)]);
        let m = Match::from_child(&c).unwrap();
        assert!(m.is_property_match);
        assert_eq!(m.text(), "");
    }
}
