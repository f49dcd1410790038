//! Error types for the augmentation layer.

use std::error::Error;

use thiserror::Error;

use crate::tracker::ExtensionPoint;

/// A boxed error from a collaborator (context engine, disposer).
pub type BoxError = Box<dyn Error + Send + Sync + 'static>;

/// Errors raised while intercepting and augmenting host results.
///
/// None of these reach the host: every one is routed to the
/// [`ErrorReporter`](crate::ErrorReporter).
#[derive(Debug, Error)]
pub enum PatchError {
    /// The host did not have the shape needed to wrap an extension point.
    #[error("cannot patch {point}: {reason}")]
    Installation {
        /// The extension point that stays unwrapped.
        point: ExtensionPoint,
        /// What was missing.
        reason: String,
    },

    /// Augmenting one result item failed.
    #[error("failed to augment {file_path}: {source}")]
    Augmentation {
        /// Path of the file the item shows.
        file_path: String,
        /// Underlying failure.
        source: BoxError,
    },

    /// A disposer failed while a result set was emptied.
    #[error("disposer #{index} failed: {source}")]
    Disposal {
        /// Position of the disposer in its batch.
        index: usize,
        /// Underlying failure.
        source: BoxError,
    },

    /// A host match did not have the expected shape.
    #[error(transparent)]
    Shape(#[from] ShapeError),
}

/// A host match failed validation at the adapter boundary.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ShapeError {
    /// The match has no ranges at all.
    #[error("match has no ranges")]
    NoRanges,

    /// The first range does not lie within the match content.
    #[error("range {start}..{end} is out of bounds for content of length {len}")]
    RangeOutOfBounds {
        /// Range start offset.
        start: usize,
        /// Range end offset.
        end: usize,
        /// Content length in bytes.
        len: usize,
    },

    /// The first range splits a character.
    #[error("range {start}..{end} does not fall on character boundaries")]
    NotCharBoundary {
        /// Range start offset.
        start: usize,
        /// Range end offset.
        end: usize,
    },
}
