//! # On-screen notification.

/// Best-effort, fire-and-forget notification (auto-dismissing on the host).
pub trait Notify: Send + Sync + 'static {
    /// Shows `message` to the user.
    fn notify(&self, message: &str);
}
