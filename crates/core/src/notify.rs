//! User-facing notification collaborator.
//!
//! Notifications are fire-and-forget: nothing observes a return value, and a
//! failed operation is reported exactly once.

/// Severity of a user-visible notification.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Notice {
    Info,
    Warning,
    Error,
}

/// Sink for one-shot user feedback.
pub trait Notifier {
    fn notify(&self, message: &str, severity: Notice);
}

/// Notifier backed by the tracing subscriber; the default for the CLI,
/// where log lines are the user-visible surface.
#[derive(Clone, Debug, Default)]
pub struct TracingNotifier;

impl Notifier for TracingNotifier {
    fn notify(&self, message: &str, severity: Notice) {
        match severity {
            Notice::Info => tracing::info!("{message}"),
            Notice::Warning => tracing::warn!("{message}"),
            Notice::Error => tracing::error!("{message}"),
        }
    }
}
