//! Search-result augmentation for lens.
//!
//! This crate intercepts a host's search-result rendering and replaces each matched
//! document's flat snippet with a hierarchical context view, leaving code-block matches,
//! property matches and host-injected actions alone.
//!
//! - [`Patcher`]: wraps the host extension points once each and orchestrates augmentation
//! - [`DisposerRegistry`]: releases mounted views when their result list is emptied
//! - [`classify`] / [`plan_item`]: decide which matches are eligible
//! - [`extract_highlight`] / [`dedupe_highlights`]: terms for the view to highlight
//! - [`ErrorReporter`]: turns internal failures into a single transient notice
//! - [`ContextEngine`]: the seam to the tree builder, deduper and renderer

#![warn(missing_docs)]

mod classify;
mod disposer;
mod dom;
mod engine;
mod error;
mod highlight;
mod matches;
mod patcher;
mod report;
mod tracker;

pub use classify::{DeferReason, ItemPlan, MatchKind, classify, plan_item};
pub use disposer::{Disposer, DisposerRegistry};
pub use dom::{ActionClasses, mount_preserving_actions};
pub use engine::{ContextEngine, ContextTreeInput, RenderInput};
pub use error::{BoxError, PatchError, ShapeError};
pub use highlight::{dedupe_highlights, extract_highlight};
pub use matches::Match;
pub use patcher::{MOUNT_CLASS, PatchStats, Patcher};
pub use report::{ErrorReporter, NOTICE_PREFIX, notice_message};
pub use tracker::{ExtensionPoint, IdentitySet, PatchFlags, WeakMap};
