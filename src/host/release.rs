//! # Resource release for finished items.
//!
//! [`Release`] frees whatever an item still holds after the scheduler is done with
//! it. [`SourceRelease`] is the stock implementation:
//!
//! ```text
//! policy.applies_to(source)?  ── no ──► keep
//!          │ yes
//!          ├─ Transient(url) → url.revoke()
//!          ├─ Stream(s)      → s.stop_tracks()
//!          ├─ Remote(_)      → (nothing to revoke)
//!          └─► item.clear_source() → item.reload()
//! ```

use crate::error::ItemError;
use crate::host::{MediaItem, Source};
use crate::policies::CleanupPolicy;

/// Releases resources held by a finished item.
pub trait Release: Send + Sync + 'static {
    /// Releases `item` according to `policy`.
    ///
    /// Returns `Ok(false)` when the policy skipped the item.
    fn release(&self, item: &dyn MediaItem, policy: CleanupPolicy) -> Result<bool, ItemError>;
}

/// Stock [`Release`]: revoke transient URLs, stop stream tracks, clear and reload.
#[derive(Clone, Copy, Debug, Default)]
pub struct SourceRelease;

impl Release for SourceRelease {
    fn release(&self, item: &dyn MediaItem, policy: CleanupPolicy) -> Result<bool, ItemError> {
        let source = item.source();
        if !policy.applies_to(&source) {
            return Ok(false);
        }

        match &source {
            Source::Transient(url) => url.revoke(),
            Source::Stream(stream) => stream.stop_tracks(),
            Source::Remote(_) | Source::None => {}
        }

        item.clear_source()?;
        item.reload()?;
        Ok(true)
    }
}
