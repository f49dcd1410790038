//! YAML front matter (document properties).
//!
//! Front matter is optional metadata at the start of a markdown file, delimited by `---`:
//!
//! ```markdown
//! ---
//! aliases: [Getting started]
//! status: draft
//! ---
//!
//! # Content starts here
//! ```
//!
//! Every key becomes a property. Property values are searchable on their own, which is
//! why the block's byte span is reported alongside the parsed values.

use std::{collections::BTreeMap, ops::Range};

use serde_yaml::Value;

/// Parsed document properties.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Frontmatter {
    /// Property values by key, in key order.
    pub properties: BTreeMap<String, Value>,
}

impl Frontmatter {
    /// Returns the textual values of a property.
    ///
    /// Scalars produce one value, sequences produce one value per scalar element.
    /// Mappings and nulls produce nothing.
    pub fn values(&self, key: &str) -> Vec<String> {
        self.properties
            .get(key)
            .map(value_texts)
            .unwrap_or_default()
    }

    /// Iterates over `(key, value)` pairs for every textual property value.
    pub fn texts(&self) -> impl Iterator<Item = (&str, String)> + '_ {
        self.properties
            .iter()
            .flat_map(|(key, value)| value_texts(value).into_iter().map(move |t| (key.as_str(), t)))
    }
}

/// Flattens a YAML value into its scalar texts.
fn value_texts(value: &Value) -> Vec<String> {
    match value {
        Value::String(s) => vec![s.clone()],
        Value::Bool(b) => vec![b.to_string()],
        Value::Number(n) => vec![n.to_string()],
        Value::Sequence(items) => items.iter().flat_map(value_texts).collect(),
        Value::Tagged(tagged) => value_texts(&tagged.value),
        Value::Null | Value::Mapping(_) => Vec::new(),
    }
}

/// A front matter block located in its document.
#[derive(Debug, Clone, PartialEq)]
pub struct FrontmatterBlock {
    /// The parsed properties.
    pub frontmatter: Frontmatter,
    /// Byte span of the whole block, from the opening `---` to the end of the closing `---`.
    pub span: Range<usize>,
}

/// Parses YAML front matter from markdown content.
///
/// Returns `None` when the content does not start with a `---` line, when the block is
/// never closed, or when the YAML inside is malformed. A leading BOM is skipped and
/// accounted for in the reported span.
pub fn parse_frontmatter(content: &str) -> Option<FrontmatterBlock> {
    let bom = if content.starts_with('\u{feff}') {
        '\u{feff}'.len_utf8()
    } else {
        0
    };
    let body = &content[bom..];

    let mut lines = body.split_inclusive('\n');
    let opening = lines.next()?;
    if opening.trim_end_matches(['\r', '\n']) != "---" {
        return None;
    }

    let yaml_start = bom + opening.len();
    let mut offset = yaml_start;
    for line in lines {
        if line.trim_end_matches(['\r', '\n']) == "---" {
            let yaml = &content[yaml_start..offset];
            let span_end = offset + line.trim_end_matches(['\r', '\n']).len();
            let frontmatter = parse_properties(yaml)?;
            return Some(FrontmatterBlock {
                frontmatter,
                span: bom..span_end,
            });
        }
        offset += line.len();
    }

    None
}

/// Parses the YAML between the delimiters into properties.
fn parse_properties(yaml: &str) -> Option<Frontmatter> {
    if yaml.trim().is_empty() {
        return Some(Frontmatter::default());
    }
    let properties: BTreeMap<String, Value> = serde_yaml::from_str(yaml).ok()?;
    Some(Frontmatter { properties })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_standard_frontmatter() {
        let content = r#"---
title: Rust Error Handling
tags: [rust, errors, patterns]
---

# Content starts here"#;

        let block = parse_frontmatter(content).expect("should parse frontmatter");
        assert_eq!(block.frontmatter.values("title"), vec!["Rust Error Handling"]);
        assert_eq!(block.frontmatter.values("tags"), vec!["rust", "errors", "patterns"]);
        assert_eq!(&content[block.span.clone()], &content[..content.find("\n\n").unwrap()]);
    }

    #[test]
    fn test_span_ends_at_closing_delimiter() {
        let content = "---\nstatus: draft\n---\nBody";
        let block = parse_frontmatter(content).unwrap();
        assert_eq!(block.span, 0..21);
        assert!(content[block.span.end..].starts_with("\nBody"));
    }

    #[test]
    fn test_no_frontmatter() {
        assert!(parse_frontmatter("# Just a heading\n\nSome content").is_none());
    }

    #[test]
    fn test_empty_frontmatter() {
        let block = parse_frontmatter("---\n---\n\nContent").expect("should parse empty block");
        assert!(block.frontmatter.properties.is_empty());
    }

    #[test]
    fn test_malformed_yaml() {
        let content = "---\ntitle: [unclosed bracket\ntags: not: valid: yaml:\n---\n\nContent";
        assert!(parse_frontmatter(content).is_none());
    }

    #[test]
    fn test_missing_closing_delimiter() {
        let content = "---\ntitle: No closing delimiter\n\n# Heading";
        assert!(parse_frontmatter(content).is_none());
    }

    #[test]
    fn test_delimiter_not_at_start() {
        let content = "Some text before\n---\ntitle: Not frontmatter\n---";
        assert!(parse_frontmatter(content).is_none());
    }

    #[test]
    fn test_texts_flatten_scalars() {
        let content = "---\naliases:\n  - Alpha\n  - Beta\ncount: 3\ndraft: true\nempty:\n---\n";
        let block = parse_frontmatter(content).unwrap();
        let texts: Vec<(&str, String)> = block.frontmatter.texts().collect();
        assert_eq!(
            texts,
            vec![
                ("aliases", "Alpha".to_string()),
                ("aliases", "Beta".to_string()),
                ("count", "3".to_string()),
                ("draft", "true".to_string()),
            ]
        );
    }

    #[test]
    fn test_bom_and_crlf() {
        let content = "\u{feff}---\r\nstatus: done\r\n---\r\n\r\nContent";
        let block = parse_frontmatter(content).expect("should handle BOM and CRLF");
        assert_eq!(block.frontmatter.values("status"), vec!["done"]);
        assert_eq!(block.span.start, 3);
        assert_eq!(&content[block.span.end - 3..block.span.end], "---");
    }
}
