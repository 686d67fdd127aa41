//! # Host collaborators.
//!
//! The scheduler never touches a document directly. Everything it needs from the
//! host environment goes through the narrow traits defined here:
//!
//! - [`MediaItem`] - one media-element-like unit of work ([`ItemRef`] = `Arc<dyn MediaItem>`)
//! - [`Scope`] - one enumerable region of the document tree (document, shadow root, frame)
//! - [`MutationSource`] - "descendant nodes appeared" signal
//! - [`Release`] - frees resources of finished items ([`SourceRelease`] is the stock impl)
//! - [`Notify`] - best-effort on-screen notification

mod item;
mod mutation;
mod notify;
mod release;
mod scope;

pub use item::{ItemId, ItemRef, LiveStream, MediaItem, Signal, Source, TransientUrl};
pub(crate) use item::known_duration;
pub use mutation::{MutationSink, MutationSource};
pub use notify::Notify;
pub use release::{Release, SourceRelease};
pub use scope::{Scope, ScopeRef};
