//! Cleanup and pacing policies.
//!
//! ## Contents
//! - [`CleanupPolicy`] whether finished items get their resources released
//! - [`JitterPolicy`]  randomization of the discovery poll period
//!
//! ## Defaults
//! - `CleanupPolicy::TransientOnly` (object URLs and live streams only).
//! - `JitterPolicy::None`.

mod cleanup;
mod jitter;

pub use cleanup::CleanupPolicy;
pub use jitter::JitterPolicy;
