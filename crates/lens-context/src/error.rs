//! Error types for context-tree building and rendering.

use thiserror::Error;

/// Errors raised while laying out or painting a context tree.
#[derive(Debug, Error)]
pub enum ContextError {
    /// The document has no structural metadata to lay matches out against.
    #[error("no structure available for {file_path}")]
    MissingStructure {
        /// File the tree was requested for.
        file_path: String,
    },

    /// A match position does not fit the file contents.
    #[error("match {start}..{end} is outside {file_path} ({len} bytes)")]
    PositionOutOfBounds {
        /// File the tree was requested for.
        file_path: String,
        /// Start offset of the match.
        start: usize,
        /// End offset of the match.
        end: usize,
        /// Length of the file contents.
        len: usize,
    },

    /// The element to render into already has content.
    #[error("mount for {file_path} is not empty ({children} children)")]
    MountNotEmpty {
        /// File the tree was built for.
        file_path: String,
        /// Children found in the mount.
        children: usize,
    },
}
