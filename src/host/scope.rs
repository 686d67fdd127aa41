//! # Discovery scopes.
//!
//! A [`Scope`] is one enumerable region of the document tree: the top document,
//! a shadow root, or a same-origin nested document. Scopes form a tree; the
//! scheduler walks it from a root [`ScopeRef`] (see `core::discovery`).
//!
//! Enumeration is fallible per scope: a cross-origin frame or a closed shadow
//! root reports a [`DiscoveryError`] and only that subtree is skipped.

use std::sync::Arc;

use crate::error::DiscoveryError;
use crate::host::ItemRef;

/// Shared handle to a scope.
pub type ScopeRef = Arc<dyn Scope>;

/// One enumerable region of the document tree.
pub trait Scope: Send + Sync + 'static {
    /// Human-readable label (for logs/events).
    fn label(&self) -> &str;

    /// Media items directly inside this scope.
    fn items(&self) -> Result<Vec<ItemRef>, DiscoveryError>;

    /// Nested scopes reachable from this one (shadow roots, same-origin frames).
    fn children(&self) -> Result<Vec<ScopeRef>, DiscoveryError>;
}
