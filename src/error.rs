//! Error types used by the drainvisor scheduler and its host collaborators.
//!
//! - [`ItemError`]: raised by a [`MediaItem`](crate::MediaItem) operation.
//! - [`DiscoveryError`]: raised while enumerating one [`Scope`](crate::Scope).
//! - [`ObserveError`]: raised when the mutation observer cannot be installed.
//! - [`ConfigError`]: raised by [`Config::validate`](crate::Config::validate).
//!
//! None of these are fatal to the scheduler: they are isolated to the item or
//! subsystem involved and published as events. All types provide `as_label`
//! (stable snake_case, for logs/metrics) and `as_message` helpers.

use thiserror::Error;

/// # Errors produced by a media item operation.
///
/// Returned by the host adapter when reading or driving an item fails
/// (the element was detached, the host refused a seek, ...).
#[non_exhaustive]
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ItemError {
    /// A single operation (`set_position`, `pause`, ...) failed.
    #[error("{op} failed: {reason}")]
    Operation {
        /// Name of the failed operation.
        op: &'static str,
        /// Host-provided failure message.
        reason: String,
    },

    /// The item is no longer attached to its document.
    #[error("item detached from document")]
    Detached,
}

impl ItemError {
    /// Shorthand for [`ItemError::Operation`].
    pub fn op(op: &'static str, reason: impl Into<String>) -> Self {
        ItemError::Operation {
            op,
            reason: reason.into(),
        }
    }

    /// Returns a short stable label (snake_case) for use in logs/metrics.
    ///
    /// # Example
    /// ```
    /// use drainvisor::ItemError;
    ///
    /// let err = ItemError::op("set_position", "not seekable");
    /// assert_eq!(err.as_label(), "item_operation_failed");
    /// ```
    pub fn as_label(&self) -> &'static str {
        match self {
            ItemError::Operation { .. } => "item_operation_failed",
            ItemError::Detached => "item_detached",
        }
    }

    /// Returns a human-readable message with details about the error.
    pub fn as_message(&self) -> String {
        match self {
            ItemError::Operation { op, reason } => format!("{op}: {reason}"),
            ItemError::Detached => "detached".to_string(),
        }
    }
}

/// # Errors produced while enumerating a discovery scope.
#[non_exhaustive]
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum DiscoveryError {
    /// The scope (document, shadow root, frame) could not be enumerated.
    #[error("scope '{scope}' not enumerable: {reason}")]
    Scope {
        /// Label of the failing scope.
        scope: String,
        /// Host-provided failure message.
        reason: String,
    },
}

impl DiscoveryError {
    /// Shorthand for [`DiscoveryError::Scope`].
    pub fn scope(scope: impl Into<String>, reason: impl Into<String>) -> Self {
        DiscoveryError::Scope {
            scope: scope.into(),
            reason: reason.into(),
        }
    }

    /// Returns a short stable label (snake_case) for use in logs/metrics.
    pub fn as_label(&self) -> &'static str {
        match self {
            DiscoveryError::Scope { .. } => "discovery_scope_failed",
        }
    }

    /// Returns a human-readable message with details about the error.
    pub fn as_message(&self) -> String {
        match self {
            DiscoveryError::Scope { scope, reason } => format!("scope={scope}: {reason}"),
        }
    }
}

/// # Errors produced when installing the mutation observer.
#[non_exhaustive]
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ObserveError {
    /// The host has no observable root right now (e.g. document not ready).
    #[error("mutation observer unavailable: {reason}")]
    Unavailable {
        /// Host-provided failure message.
        reason: String,
    },
}

impl ObserveError {
    /// Returns a short stable label (snake_case) for use in logs/metrics.
    pub fn as_label(&self) -> &'static str {
        match self {
            ObserveError::Unavailable { .. } => "observer_unavailable",
        }
    }

    /// Returns a human-readable message with details about the error.
    pub fn as_message(&self) -> String {
        match self {
            ObserveError::Unavailable { reason } => format!("unavailable: {reason}"),
        }
    }
}

/// # Errors produced by configuration validation.
#[non_exhaustive]
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ConfigError {
    /// A `*_min` bound is greater than its `*_max` counterpart, or an `*_init`
    /// value lies outside its bounds.
    #[error("invalid bounds for {field}")]
    InvalidBounds {
        /// Name of the offending field group (e.g. `concurrency`).
        field: &'static str,
    },

    /// A single value is out of its domain.
    #[error("invalid value for {field}: {reason}")]
    InvalidValue {
        /// Name of the offending field.
        field: &'static str,
        /// Why the value was rejected.
        reason: &'static str,
    },
}

impl ConfigError {
    /// Returns a short stable label (snake_case) for use in logs/metrics.
    ///
    /// # Example
    /// ```
    /// use drainvisor::ConfigError;
    ///
    /// let err = ConfigError::InvalidBounds { field: "concurrency" };
    /// assert_eq!(err.as_label(), "config_invalid_bounds");
    /// ```
    pub fn as_label(&self) -> &'static str {
        match self {
            ConfigError::InvalidBounds { .. } => "config_invalid_bounds",
            ConfigError::InvalidValue { .. } => "config_invalid_value",
        }
    }

    /// Returns a human-readable message with details about the error.
    pub fn as_message(&self) -> String {
        match self {
            ConfigError::InvalidBounds { field } => format!("bounds: {field}"),
            ConfigError::InvalidValue { field, reason } => format!("{field}: {reason}"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn labels_are_stable() {
        assert_eq!(ItemError::Detached.as_label(), "item_detached");
        assert_eq!(
            DiscoveryError::scope("frame#1", "cross-origin").as_label(),
            "discovery_scope_failed"
        );
        assert_eq!(
            ObserveError::Unavailable {
                reason: "no body".into()
            }
            .as_label(),
            "observer_unavailable"
        );
    }

    #[test]
    fn display_includes_operation() {
        let err = ItemError::op("pause", "not allowed");
        assert_eq!(err.to_string(), "pause failed: not allowed");
        assert_eq!(err.as_message(), "pause: not allowed");
    }
}
