//! Structural metadata for lens documents.
//!
//! This crate answers the structural questions the search-result augmentation asks about a
//! document:
//! - where a byte range sits in line/column terms ([`position_from_offsets`])
//! - which top-level block contains a position ([`section_containing`])
//! - which headings precede it and what the front matter holds ([`StructureCache`])

#![warn(missing_docs)]

mod error;
mod frontmatter;
mod load;
mod position;
mod structure;

pub use error::DocumentError;
pub use frontmatter::{Frontmatter, FrontmatterBlock, parse_frontmatter};
pub use load::{FileStat, LoadedDocument, load_document};
pub use position::{Loc, Position, loc_from_offset, position_from_offsets};
pub use structure::{
    HeadingCache, Section, SectionKind, StructureCache, build_structure, section_containing,
};
