//! # Cleanup policy for finished items.
//!
//! [`CleanupPolicy`] decides whether the [`Release`](crate::Release) collaborator
//! is asked to free an item's resources once the item is marked done.
//!
//! - [`CleanupPolicy::Never`] resources are left alone.
//! - [`CleanupPolicy::TransientOnly`] only transient sources (object URLs, live streams) are released (default).
//! - [`CleanupPolicy::Always`] every source is released, including remote URLs.
//!
//! The policy is derived from the two config flags:
//! ```text
//! cleanup_after_finish = false                                  → Never
//! cleanup_after_finish = true, cleanup_only_transient_source    → TransientOnly
//! cleanup_after_finish = true, !cleanup_only_transient_source   → Always
//! ```

use crate::host::Source;

/// Policy controlling resource release after an item is finished.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Default)]
pub enum CleanupPolicy {
    /// Never release.
    Never,
    /// Release only transient sources (default).
    #[default]
    TransientOnly,
    /// Release every source unconditionally.
    Always,
}

impl CleanupPolicy {
    /// Builds the policy from the two config flags.
    pub fn from_flags(after_finish: bool, only_transient: bool) -> Self {
        match (after_finish, only_transient) {
            (false, _) => CleanupPolicy::Never,
            (true, true) => CleanupPolicy::TransientOnly,
            (true, false) => CleanupPolicy::Always,
        }
    }

    /// Returns true if a source of this shape should be released.
    pub fn applies_to(&self, source: &Source) -> bool {
        match self {
            CleanupPolicy::Never => false,
            CleanupPolicy::TransientOnly => source.is_transient(),
            CleanupPolicy::Always => !matches!(source, Source::None),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn flags_map_to_policy() {
        assert_eq!(CleanupPolicy::from_flags(false, true), CleanupPolicy::Never);
        assert_eq!(CleanupPolicy::from_flags(false, false), CleanupPolicy::Never);
        assert_eq!(
            CleanupPolicy::from_flags(true, true),
            CleanupPolicy::TransientOnly
        );
        assert_eq!(CleanupPolicy::from_flags(true, false), CleanupPolicy::Always);
    }

    #[test]
    fn transient_only_skips_remote_sources() {
        let remote = Source::Remote("https://cdn.example/a.mp4".into());
        assert!(!CleanupPolicy::TransientOnly.applies_to(&remote));
        assert!(CleanupPolicy::Always.applies_to(&remote));
        assert!(!CleanupPolicy::Always.applies_to(&Source::None));
        assert!(!CleanupPolicy::Never.applies_to(&remote));
    }
}
