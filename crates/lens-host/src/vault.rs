//! The host's document store and its plain substring search.

use std::{path::Path, rc::Rc};

use lens_document::{DocumentError, FileStat, StructureCache, build_structure, load_document};

use crate::result::{FileInfo, MatchGroup, NewResult, RawMatch};

/// A document known to the vault.
#[derive(Debug, Clone)]
pub struct VaultDocument {
    /// File information.
    pub file: FileInfo,
    /// Full contents.
    pub content: Rc<str>,
    /// Structural metadata.
    pub structure: Rc<StructureCache>,
}

/// A set of documents that can be searched.
#[derive(Debug, Clone, Default)]
pub struct Vault {
    /// Documents in insertion order.
    documents: Vec<VaultDocument>,
}

impl Vault {
    /// Creates an empty vault.
    pub fn new() -> Self {
        Self::default()
    }

    /// Loads every file into a new vault.
    ///
    /// Fails on the first file that cannot be loaded.
    pub fn load<P: AsRef<Path>>(paths: &[P]) -> Result<Self, DocumentError> {
        let mut vault = Self::new();
        for path in paths {
            let doc = load_document(path.as_ref())?;
            vault.documents.push(VaultDocument {
                file: FileInfo {
                    path: doc.path.to_string_lossy().replace('\\', "/"),
                    extension: doc.extension,
                    stat: doc.stat,
                },
                content: Rc::from(doc.content),
                structure: Rc::new(doc.structure),
            });
        }
        Ok(vault)
    }

    /// Adds an in-memory markdown document.
    pub fn add_markdown(&mut self, path: &str, content: &str) {
        self.add(path, content, build_structure(content));
    }

    /// Adds an in-memory document with the given structure.
    pub fn add(&mut self, path: &str, content: &str, structure: StructureCache) {
        let extension = path
            .rsplit_once('.')
            .map(|(_, ext)| ext.to_ascii_lowercase())
            .unwrap_or_default();
        self.documents.push(VaultDocument {
            file: FileInfo {
                path: path.to_string(),
                extension,
                stat: FileStat {
                    size: content.len() as u64,
                    ..FileStat::default()
                },
            },
            content: Rc::from(content),
            structure: Rc::new(structure),
        });
    }

    /// Returns the documents.
    pub fn documents(&self) -> &[VaultDocument] {
        &self.documents
    }

    /// Searches every document for `query`, ignoring ASCII case.
    ///
    /// Property matches come first, one group per property value. Body matches are
    /// grouped by line. A document whose name matches but whose content does not yields a
    /// single empty group, the way a file-name-only hit is shown.
    pub fn search(&self, query: &str) -> Vec<NewResult> {
        let needle = query.trim().to_ascii_lowercase();
        if needle.is_empty() {
            return Vec::new();
        }

        self.documents
            .iter()
            .filter_map(|doc| {
                let mut groups = property_groups(doc, &needle);
                groups.extend(body_groups(doc, &needle));
                if groups.is_empty() && doc.file.basename().to_ascii_lowercase().contains(&needle)
                {
                    groups.push(MatchGroup {
                        content: Rc::from(""),
                        matches: vec![RawMatch::body(0, 0)],
                    });
                }
                (!groups.is_empty()).then(|| NewResult {
                    file: doc.file.clone(),
                    structure: Some(Rc::clone(&doc.structure)),
                    groups,
                })
            })
            .collect()
    }
}

/// Byte offsets of every non-overlapping occurrence of `needle` in `haystack`.
///
/// ASCII lower-casing keeps byte offsets aligned with the original text.
fn occurrences(haystack: &str, needle: &str) -> Vec<usize> {
    haystack
        .to_ascii_lowercase()
        .match_indices(needle)
        .map(|(idx, _)| idx)
        .collect()
}

/// One group per front matter value containing the needle.
fn property_groups(doc: &VaultDocument, needle: &str) -> Vec<MatchGroup> {
    let Some(frontmatter) = &doc.structure.frontmatter else {
        return Vec::new();
    };
    frontmatter
        .texts()
        .filter_map(|(key, value)| {
            let matches: Vec<RawMatch> = occurrences(&value, needle)
                .into_iter()
                .map(|start| RawMatch::property(key, start, start + needle.len()))
                .collect();
            (!matches.is_empty()).then(|| MatchGroup {
                content: Rc::from(value),
                matches,
            })
        })
        .collect()
}

/// Body occurrences outside the front matter, grouped by line.
fn body_groups(doc: &VaultDocument, needle: &str) -> Vec<MatchGroup> {
    let skip_until = doc
        .structure
        .frontmatter_position
        .map_or(0, |p| p.end.offset);

    let mut groups: Vec<(usize, MatchGroup)> = Vec::new();
    for start in occurrences(&doc.content, needle) {
        if start < skip_until {
            continue;
        }
        let line = doc.content[..start].matches('\n').count();
        let m = RawMatch::body(start, start + needle.len());
        match groups.last_mut() {
            Some((last_line, group)) if *last_line == line => group.matches.push(m),
            _ => groups.push((
                line,
                MatchGroup {
                    content: Rc::clone(&doc.content),
                    matches: vec![m],
                },
            )),
        }
    }
    groups.into_iter().map(|(_, g)| g).collect()
}
