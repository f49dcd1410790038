//! Structural metadata for markdown documents.
//!
//! A [`StructureCache`] describes a document as a flat list of top-level block
//! [`Section`]s (paragraphs, code blocks, lists, ...), the headings it contains and its
//! front matter. It is computed once per document and shared by everything that needs
//! to answer "what kind of block is this offset in?".

use pulldown_cmark::{Event, HeadingLevel, Options, Parser, Tag, TagEnd};
use serde::Serialize;

use crate::{
    frontmatter::{Frontmatter, parse_frontmatter},
    position::{Position, position_from_offsets},
};

/// The kind of a top-level block.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "camelCase")]
pub enum SectionKind {
    /// The front matter block.
    Yaml,
    /// An ATX or setext heading.
    Heading,
    /// A paragraph.
    Paragraph,
    /// A fenced or indented code block.
    Code,
    /// An ordered or unordered list.
    List,
    /// A block quote or callout.
    Blockquote,
    /// A table.
    Table,
    /// A horizontal rule.
    ThematicBreak,
    /// A raw HTML block.
    Html,
    /// A footnote definition.
    FootnoteDefinition,
}

impl SectionKind {
    /// Returns the lower-case name used in diagnostics.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Yaml => "yaml",
            Self::Heading => "heading",
            Self::Paragraph => "paragraph",
            Self::Code => "code",
            Self::List => "list",
            Self::Blockquote => "blockquote",
            Self::Table => "table",
            Self::ThematicBreak => "thematicBreak",
            Self::Html => "html",
            Self::FootnoteDefinition => "footnoteDefinition",
        }
    }
}

/// A top-level block of a document.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Section {
    /// What kind of block this is.
    #[serde(rename = "type")]
    pub kind: SectionKind,
    /// Where the block is (trailing newlines excluded).
    pub position: Position,
}

/// A heading with its location.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct HeadingCache {
    /// The heading text (including inline code).
    pub heading: String,
    /// The heading level (1-6 for h1-h6).
    pub level: u8,
    /// Where the heading line is.
    pub position: Position,
}

/// Structural metadata for one document.
///
/// `sections` is `None` when the document was never structured (plain text, canvas
/// files, or a host that has not finished indexing). Consumers must treat that as
/// "structure unknown", not as "no blocks".
#[derive(Debug, Clone, Default, PartialEq)]
pub struct StructureCache {
    /// Top-level blocks in document order.
    pub sections: Option<Vec<Section>>,
    /// Headings in document order.
    pub headings: Vec<HeadingCache>,
    /// Parsed front matter, if any.
    pub frontmatter: Option<Frontmatter>,
    /// Location of the front matter block, if any.
    pub frontmatter_position: Option<Position>,
}

impl StructureCache {
    /// Returns the headings that precede `position`, in document order.
    pub fn headings_before(&self, position: &Position) -> impl Iterator<Item = &HeadingCache> {
        let line = position.start.line;
        self.headings.iter().filter(move |h| h.position.start.line <= line)
    }
}

/// Builds the structure cache for markdown content.
pub fn build_structure(content: &str) -> StructureCache {
    let mut options = Options::empty();
    options.insert(Options::ENABLE_TABLES);
    options.insert(Options::ENABLE_FOOTNOTES);
    options.insert(Options::ENABLE_STRIKETHROUGH);
    options.insert(Options::ENABLE_YAML_STYLE_METADATA_BLOCKS);

    let parser = Parser::new_ext(content, options);
    let mut sections = Vec::new();
    let mut headings = Vec::new();
    let mut depth = 0usize;
    let mut current_heading: Option<(HeadingLevel, usize, String)> = None;

    for (event, range) in parser.into_offset_iter() {
        match event {
            Event::Start(tag) => {
                if depth == 0 {
                    sections.push(Section {
                        kind: section_kind(&tag),
                        position: trimmed_position(content, range.start, range.end),
                    });
                }
                if let Tag::Heading { level, .. } = tag {
                    current_heading = Some((level, range.start, String::new()));
                }
                depth += 1;
            }
            Event::End(end) => {
                depth = depth.saturating_sub(1);
                if let TagEnd::Heading(_) = end
                    && let Some((level, start, text)) = current_heading.take()
                {
                    headings.push(HeadingCache {
                        heading: text,
                        level: heading_level_to_u8(level),
                        position: trimmed_position(content, start, range.end),
                    });
                }
            }
            Event::Text(text) | Event::Code(text) => {
                if let Some((_, _, ref mut heading_text)) = current_heading {
                    heading_text.push_str(&text);
                }
            }
            Event::Rule if depth == 0 => {
                sections.push(Section {
                    kind: SectionKind::ThematicBreak,
                    position: trimmed_position(content, range.start, range.end),
                });
            }
            Event::Html(_) if depth == 0 => {
                sections.push(Section {
                    kind: SectionKind::Html,
                    position: trimmed_position(content, range.start, range.end),
                });
            }
            _ => {}
        }
    }

    let block = parse_frontmatter(content);
    StructureCache {
        sections: Some(sections),
        headings,
        frontmatter_position: block
            .as_ref()
            .map(|b| position_from_offsets(content, b.span.start, b.span.end)),
        frontmatter: block.map(|b| b.frontmatter),
    }
}

/// Returns the section whose lines contain `position`.
///
/// Returns `None` when no section contains it, including when `sections` is empty.
pub fn section_containing<'a>(position: &Position, sections: &'a [Section]) -> Option<&'a Section> {
    sections.iter().find(|s| s.position.contains_lines(position))
}

/// Maps a block-level start tag to its section kind.
fn section_kind(tag: &Tag<'_>) -> SectionKind {
    match tag {
        Tag::Heading { .. } => SectionKind::Heading,
        Tag::CodeBlock(_) => SectionKind::Code,
        Tag::List(_) | Tag::DefinitionList => SectionKind::List,
        Tag::BlockQuote(_) => SectionKind::Blockquote,
        Tag::Table(_) => SectionKind::Table,
        Tag::HtmlBlock => SectionKind::Html,
        Tag::FootnoteDefinition(_) => SectionKind::FootnoteDefinition,
        Tag::MetadataBlock(_) => SectionKind::Yaml,
        _ => SectionKind::Paragraph,
    }
}

/// Builds a position for a byte range with trailing line breaks removed.
fn trimmed_position(content: &str, start: usize, end: usize) -> Position {
    let end = start + content[start..end].trim_end_matches(['\n', '\r']).len();
    position_from_offsets(content, start, end)
}

/// Converts a pulldown_cmark HeadingLevel to a u8 (1-6).
fn heading_level_to_u8(level: HeadingLevel) -> u8 {
    match level {
        HeadingLevel::H1 => 1,
        HeadingLevel::H2 => 2,
        HeadingLevel::H3 => 3,
        HeadingLevel::H4 => 4,
        HeadingLevel::H5 => 5,
        HeadingLevel::H6 => 6,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const DOC: &str = "---\nstatus: draft\n---\n\n# Intro\n\nSome prose here.\n\n```rust\nfn main() {}\n```\n\n## Details\n\n- one\n- two\n\n> quoted\n";

    fn kinds(cache: &StructureCache) -> Vec<SectionKind> {
        cache
            .sections
            .as_ref()
            .unwrap()
            .iter()
            .map(|s| s.kind)
            .collect()
    }

    #[test]
    fn test_section_kinds_in_order() {
        let cache = build_structure(DOC);
        assert_eq!(
            kinds(&cache),
            vec![
                SectionKind::Yaml,
                SectionKind::Heading,
                SectionKind::Paragraph,
                SectionKind::Code,
                SectionKind::Heading,
                SectionKind::List,
                SectionKind::Blockquote,
            ]
        );
    }

    #[test]
    fn test_headings_extracted() {
        let cache = build_structure(DOC);
        let titles: Vec<(&str, u8)> = cache
            .headings
            .iter()
            .map(|h| (h.heading.as_str(), h.level))
            .collect();
        assert_eq!(titles, vec![("Intro", 1), ("Details", 2)]);
    }

    #[test]
    fn test_frontmatter_recorded() {
        let cache = build_structure(DOC);
        assert_eq!(cache.frontmatter.unwrap().values("status"), vec!["draft"]);
        assert_eq!(cache.frontmatter_position.unwrap().start.line, 0);
    }

    #[test]
    fn test_section_containing_code() {
        let cache = build_structure(DOC);
        let sections = cache.sections.as_ref().unwrap();
        let start = DOC.find("main").unwrap();
        let pos = position_from_offsets(DOC, start, start + 4);
        let section = section_containing(&pos, sections).unwrap();
        assert_eq!(section.kind, SectionKind::Code);
    }

    #[test]
    fn test_section_containing_paragraph() {
        let cache = build_structure(DOC);
        let sections = cache.sections.as_ref().unwrap();
        let start = DOC.find("prose").unwrap();
        let pos = position_from_offsets(DOC, start, start + 5);
        let section = section_containing(&pos, sections).unwrap();
        assert_eq!(section.kind, SectionKind::Paragraph);
    }

    #[test]
    fn test_section_containing_blank_line_is_none() {
        let cache = build_structure(DOC);
        let sections = cache.sections.as_ref().unwrap();
        let blank = DOC.find("\n\nSome").unwrap() + 1;
        let pos = position_from_offsets(DOC, blank, blank);
        assert!(section_containing(&pos, sections).is_none());
        assert!(section_containing(&pos, &[]).is_none());
    }

    #[test]
    fn test_section_positions_exclude_trailing_newline() {
        let cache = build_structure("para one\n\npara two\n");
        let sections = cache.sections.unwrap();
        assert_eq!(sections.len(), 2);
        assert_eq!(sections[0].position.end.offset, 8);
        assert_eq!(sections[1].position.start.line, 2);
        assert_eq!(sections[1].position.end.line, 2);
    }

    #[test]
    fn test_headings_before() {
        let cache = build_structure(DOC);
        let start = DOC.find("one").unwrap();
        let pos = position_from_offsets(DOC, start, start + 3);
        let before: Vec<&str> = cache
            .headings_before(&pos)
            .map(|h| h.heading.as_str())
            .collect();
        assert_eq!(before, vec!["Intro", "Details"]);
    }
}
