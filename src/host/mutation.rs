//! # Mutation signal.
//!
//! [`MutationSource`] is the host facility that reports "descendant nodes were
//! added somewhere under the document". The scheduler hands it a
//! [`MutationSink`]; the source calls [`MutationSink::signal`] from its callback.
//!
//! ## Rules
//! - Signals are **coalesced**: many signals before the listener wakes up
//!   produce one scan.
//! - `is_observing()` is polled by the heal cycle; returning `false` makes the
//!   scheduler call `observe()` again.

use std::sync::Arc;

use tokio::sync::Notify;

use crate::error::ObserveError;

/// Sending half of the mutation signal.
///
/// Cheap to clone. Signalling never blocks and never fails.
#[derive(Clone, Debug, Default)]
pub struct MutationSink {
    wake: Arc<Notify>,
}

impl MutationSink {
    /// Creates a sink with no pending signal.
    pub fn new() -> Self {
        Self::default()
    }

    /// Signals that new nodes appeared.
    pub fn signal(&self) {
        self.wake.notify_one();
    }

    /// Waits for the next (coalesced) signal.
    pub(crate) async fn changed(&self) {
        self.wake.notified().await;
    }
}

/// Host facility reporting added descendant nodes.
pub trait MutationSource: Send + Sync + 'static {
    /// Installs the observer; every mutation must end in `sink.signal()`.
    ///
    /// Calling `observe` while already observing replaces the previous sink.
    fn observe(&self, sink: MutationSink) -> Result<(), ObserveError>;

    /// Stops observing.
    fn disconnect(&self);

    /// True while the observer is installed and alive.
    fn is_observing(&self) -> bool;
}
