//! Transient user-facing notifications.
//!
//! Recognition failures surface as a bottom-of-screen toast with fixed copy;
//! the underlying platform cause goes to the log only, never to the user.

use std::fmt;

/// Fixed user-facing copy for recognition failures.
pub const COULD_NOT_UNDERSTAND: &str = "Sorry! We could not make sense of that.";

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ToastKind {
    Error,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ToastPosition {
    Bottom,
}

/// A transient notification for the host to display.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Toast {
    pub kind: ToastKind,
    pub message: String,
    pub position: ToastPosition,
}

impl Toast {
    /// The toast shown whenever recognition fails.
    pub fn could_not_understand() -> Self {
        Self {
            kind: ToastKind::Error,
            message: COULD_NOT_UNDERSTAND.to_string(),
            position: ToastPosition::Bottom,
        }
    }
}

impl fmt::Display for Toast {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.message)
    }
}

/// Channel through which the widget surfaces toasts to the host UI.
pub trait Notifier: Send + Sync {
    fn show(&self, toast: Toast);
}

/// Default notifier that logs the toast instead of rendering it.
pub struct TracingNotifier;

impl Notifier for TracingNotifier {
    fn show(&self, toast: Toast) {
        tracing::warn!(message = %toast.message, "Toast");
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_could_not_understand_toast() {
        let toast = Toast::could_not_understand();
        assert_eq!(toast.kind, ToastKind::Error);
        assert_eq!(toast.position, ToastPosition::Bottom);
        assert_eq!(toast.message, COULD_NOT_UNDERSTAND);
        assert_eq!(toast.to_string(), COULD_NOT_UNDERSTAND);
    }

    #[test]
    fn test_tracing_notifier_does_not_panic() {
        TracingNotifier.show(Toast::could_not_understand());
    }
}
