//! Voxfield widget crate - the dictation widget state machine.
//!
//! Wraps exactly one text input, drives a per-widget recognition hook, and
//! turns recognition results into UI state: the input's value, an
//! alternatives dropdown, a debounced auto-stop timer, and error toasts.
//! Rendering is left to the host: [`DictationWidget::view`] returns a plain
//! snapshot plus layout instructions for the renderer to apply.

pub mod layout;
pub mod notify;
pub mod widget;

pub use layout::{DropdownGeometry, LayoutSpec, MicButtonPlacement};
pub use notify::{Notifier, Toast, ToastKind, ToastPosition, TracingNotifier};
pub use widget::{DictationWidget, TextInput, WidgetView};
