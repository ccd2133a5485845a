//! Dictation widget state machine.
//!
//! Composes a wrapped text input, the floating microphone toggle, and the
//! alternatives dropdown around a [`RecognitionHook`]. A result with one
//! candidate is written straight into the input; a result with several
//! writes the top candidate and opens the dropdown so the user can pick a
//! different one within the same utterance. Each result also debounces a
//! 1-second auto-stop timer that ends the session once results go quiet.

use std::sync::{Arc, Mutex, OnceLock};
use std::time::Duration;

use tokio::task::JoinHandle;

use voxfield_core::config::VoxfieldConfig;
use voxfield_core::types::{Alternatives, LocaleCode, MicState};
use voxfield_recog::{
    HookCallbacks, RecognitionHook, RecognizerOptions, SessionRegistry, SpeechRecognizer,
    WeakRecognitionHook,
};

use crate::layout::LayoutSpec;
use crate::notify::{Notifier, Toast};

/// The wrapped child input.
///
/// The widget touches exactly two things on its child: the current value and
/// the change-text callback (`set_value`). Nothing else is inspected.
pub trait TextInput: Send + Sync {
    fn value(&self) -> String;
    fn set_value(&self, value: &str);
}

/// Render snapshot of the widget.
#[derive(Clone, Debug)]
pub struct WidgetView {
    pub mic: MicState,
    /// Full-screen transparent overlay shown behind the dropdown; tapping it
    /// dismisses the dropdown without altering the input.
    pub overlay_visible: bool,
    pub dropdown_visible: bool,
    /// Dropdown entries, most-likely first. Empty when the dropdown is hidden.
    pub alternatives: Vec<String>,
    pub layout: LayoutSpec,
}

#[derive(Debug, Default)]
struct DropdownState {
    visible: bool,
    alternatives: Vec<String>,
}

struct WidgetShared {
    input: Arc<dyn TextInput>,
    notifier: Arc<dyn Notifier>,
    dropdown: Mutex<DropdownState>,
}

impl WidgetShared {
    fn apply_success(&self, alternatives: &Alternatives) {
        // An empty result carries nothing to apply; the auto-stop timer is
        // still rescheduled by the caller.
        let Some(top) = alternatives.top() else {
            return;
        };
        self.input.set_value(top);

        let mut dropdown = self.dropdown.lock().expect("dropdown mutex poisoned");
        if alternatives.len() > 1 {
            dropdown.alternatives = alternatives.as_slice().to_vec();
            dropdown.visible = true;
        } else {
            dropdown.alternatives.clear();
            dropdown.visible = false;
        }
    }

    fn reset_dropdown(&self) {
        let mut dropdown = self.dropdown.lock().expect("dropdown mutex poisoned");
        dropdown.alternatives.clear();
        dropdown.visible = false;
    }
}

/// Debounced idle timeout that ends a listening session.
///
/// At most one timer is pending per widget: rescheduling cancels the pending
/// timer before arming a fresh one, never letting two fire.
struct AutoStopTimer {
    delay: Duration,
    pending: Mutex<Option<JoinHandle<()>>>,
}

impl AutoStopTimer {
    fn new(delay: Duration) -> Self {
        Self {
            delay,
            pending: Mutex::new(None),
        }
    }

    fn restart(&self, hook: RecognitionHook) {
        let mut pending = self.pending.lock().expect("timer mutex poisoned");
        // Cancel-then-reschedule.
        if let Some(previous) = pending.take() {
            previous.abort();
        }
        // Capture the deadline now, not when the spawned task is first
        // polled, so the debounce window starts at the reschedule.
        let sleep = tokio::time::sleep(self.delay);
        *pending = Some(tokio::spawn(async move {
            sleep.await;
            tracing::debug!("Auto-stop timer fired");
            hook.stop_recording();
        }));
    }

    fn cancel(&self) {
        if let Some(previous) = self
            .pending
            .lock()
            .expect("timer mutex poisoned")
            .take()
        {
            previous.abort();
        }
    }

    #[cfg(test)]
    fn is_pending(&self) -> bool {
        self.pending
            .lock()
            .expect("timer mutex poisoned")
            .as_ref()
            .is_some_and(|handle| !handle.is_finished())
    }
}

/// Voice dictation wrapper around a single text input.
///
/// Construction takes exactly one input binding; the single-child contract
/// is enforced by the type signature. Methods must be called from within a
/// tokio runtime (the auto-stop timer is a spawned task).
pub struct DictationWidget {
    hook: RecognitionHook,
    shared: Arc<WidgetShared>,
    timer: Arc<AutoStopTimer>,
    layout: LayoutSpec,
}

impl DictationWidget {
    /// Build a widget using the locale from `config`.
    pub fn new(
        input: Arc<dyn TextInput>,
        registry: SessionRegistry,
        recognizer: Arc<dyn SpeechRecognizer>,
        notifier: Arc<dyn Notifier>,
        config: &VoxfieldConfig,
    ) -> Self {
        let locale = config.recognizer.locale.clone();
        Self::with_locale(input, registry, recognizer, notifier, config, locale)
    }

    /// Build a widget with an explicit locale override.
    pub fn with_locale(
        input: Arc<dyn TextInput>,
        registry: SessionRegistry,
        recognizer: Arc<dyn SpeechRecognizer>,
        notifier: Arc<dyn Notifier>,
        config: &VoxfieldConfig,
        locale: LocaleCode,
    ) -> Self {
        let shared = Arc::new(WidgetShared {
            input,
            notifier,
            dropdown: Mutex::new(DropdownState::default()),
        });
        let timer = Arc::new(AutoStopTimer::new(Duration::from_millis(
            config.widget.auto_stop_ms,
        )));

        // The success callback debounces the auto-stop through the hook, and
        // the hook needs the callbacks at construction; the slot breaks the
        // cycle. It must hold a weak handle: a strong one would pin the
        // registry subscription forever and a dropped widget would keep
        // writing into its input.
        let hook_slot: Arc<OnceLock<WeakRecognitionHook>> = Arc::new(OnceLock::new());

        let on_success = {
            let shared = Arc::clone(&shared);
            let timer = Arc::clone(&timer);
            let hook_slot = Arc::clone(&hook_slot);
            move |alternatives: &Alternatives| {
                shared.apply_success(alternatives);
                if let Some(hook) = hook_slot.get().and_then(WeakRecognitionHook::upgrade) {
                    timer.restart(hook);
                }
            }
        };
        let on_error = {
            let shared = Arc::clone(&shared);
            move |cause: &str| {
                tracing::error!(%cause, "Speech recognition error");
                shared.notifier.show(Toast::could_not_understand());
            }
        };

        let hook = RecognitionHook::new(
            registry,
            recognizer,
            locale,
            RecognizerOptions::from(&config.recognizer),
            HookCallbacks::new(on_success, on_error),
        );
        let _ = hook_slot.set(hook.downgrade());

        Self {
            hook,
            shared,
            timer,
            layout: LayoutSpec::from_config(&config.widget),
        }
    }

    /// Whether this widget is currently listening.
    pub fn listening(&self) -> bool {
        self.hook.listening()
    }

    /// Toggle the microphone: start a session when idle, stop it when
    /// listening.
    pub fn toggle_microphone(&self) {
        if self.hook.listening() {
            self.timer.cancel();
            self.hook.stop_recording();
        } else {
            self.hook.start_recording();
        }
    }

    /// The user picked an alternative from the dropdown: overwrite the input
    /// and close the dropdown.
    pub fn select_alternative(&self, value: &str) {
        self.shared.input.set_value(value);
        self.shared.reset_dropdown();
    }

    /// The user tapped outside the dropdown: close it without altering the
    /// input.
    pub fn dismiss_dropdown(&self) {
        self.shared.reset_dropdown();
    }

    /// The host changed the bound input's value outside of recognition
    /// (e.g. the form was cleared): force-close the dropdown and clear its
    /// alternatives, regardless of recognition state.
    pub fn input_value_changed(&self) {
        self.shared.reset_dropdown();
    }

    /// Snapshot of everything the renderer needs.
    pub fn view(&self) -> WidgetView {
        let dropdown = self
            .shared
            .dropdown
            .lock()
            .expect("dropdown mutex poisoned");
        WidgetView {
            mic: if self.hook.listening() {
                MicState::Listening
            } else {
                MicState::Idle
            },
            overlay_visible: dropdown.visible,
            dropdown_visible: dropdown.visible,
            alternatives: dropdown.alternatives.clone(),
            layout: self.layout.clone(),
        }
    }

    pub fn layout(&self) -> &LayoutSpec {
        &self.layout
    }

    #[cfg(test)]
    fn auto_stop_pending(&self) -> bool {
        self.timer.is_pending()
    }
}

impl Drop for DictationWidget {
    fn drop(&mut self) {
        // A timer must not fire after the widget is torn down.
        self.timer.cancel();
    }
}

// =============================================================================
// Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use std::sync::atomic::{AtomicUsize, Ordering};

    use voxfield_core::types::Alternatives;

    use super::*;

    struct MemoryInput {
        value: Mutex<String>,
    }

    impl MemoryInput {
        fn new() -> Arc<Self> {
            Arc::new(Self {
                value: Mutex::new(String::new()),
            })
        }
    }

    impl TextInput for MemoryInput {
        fn value(&self) -> String {
            self.value.lock().unwrap().clone()
        }

        fn set_value(&self, value: &str) {
            *self.value.lock().unwrap() = value.to_string();
        }
    }

    #[derive(Default)]
    struct RecordingNotifier {
        toasts: Mutex<Vec<Toast>>,
    }

    impl Notifier for RecordingNotifier {
        fn show(&self, toast: Toast) {
            self.toasts.lock().unwrap().push(toast);
        }
    }

    #[derive(Default)]
    struct FakeRecognizer {
        starts: AtomicUsize,
        destroys: AtomicUsize,
    }

    impl SpeechRecognizer for FakeRecognizer {
        fn start(&self, _locale: &LocaleCode, _options: &RecognizerOptions) {
            self.starts.fetch_add(1, Ordering::SeqCst);
        }

        fn destroy(&self) {
            self.destroys.fetch_add(1, Ordering::SeqCst);
        }
    }

    struct Harness {
        input: Arc<MemoryInput>,
        notifier: Arc<RecordingNotifier>,
        recognizer: Arc<FakeRecognizer>,
        widget: DictationWidget,
    }

    fn harness(registry: &SessionRegistry) -> Harness {
        let input = MemoryInput::new();
        let notifier = Arc::new(RecordingNotifier::default());
        let recognizer = Arc::new(FakeRecognizer::default());
        let widget = DictationWidget::new(
            Arc::clone(&input) as Arc<dyn TextInput>,
            registry.clone(),
            Arc::clone(&recognizer) as Arc<dyn SpeechRecognizer>,
            Arc::clone(&notifier) as Arc<dyn Notifier>,
            &VoxfieldConfig::default(),
        );
        Harness {
            input,
            notifier,
            recognizer,
            widget,
        }
    }

    #[tokio::test]
    async fn test_single_alternative_fills_input_without_dropdown() {
        let registry = SessionRegistry::new();
        let h = harness(&registry);

        h.widget.toggle_microphone();
        registry.broadcast_success(Alternatives::from(vec!["cat"]));

        assert_eq!(h.input.value(), "cat");
        let view = h.widget.view();
        assert!(!view.dropdown_visible);
        assert!(view.alternatives.is_empty());
    }

    #[tokio::test]
    async fn test_multiple_alternatives_open_dropdown() {
        let registry = SessionRegistry::new();
        let h = harness(&registry);

        h.widget.toggle_microphone();
        registry.broadcast_success(Alternatives::from(vec!["cat", "hat", "bat"]));

        assert_eq!(h.input.value(), "cat");
        let view = h.widget.view();
        assert!(view.dropdown_visible);
        assert!(view.overlay_visible);
        assert_eq!(view.alternatives, vec!["cat", "hat", "bat"]);
    }

    #[tokio::test]
    async fn test_select_alternative_overwrites_and_closes() {
        let registry = SessionRegistry::new();
        let h = harness(&registry);

        h.widget.toggle_microphone();
        registry.broadcast_success(Alternatives::from(vec!["cat", "hat", "bat"]));

        h.widget.select_alternative("bat");
        assert_eq!(h.input.value(), "bat");
        let view = h.widget.view();
        assert!(!view.dropdown_visible);
        assert!(view.alternatives.is_empty());
    }

    #[tokio::test]
    async fn test_dismiss_keeps_input_value() {
        let registry = SessionRegistry::new();
        let h = harness(&registry);

        h.widget.toggle_microphone();
        registry.broadcast_success(Alternatives::from(vec!["cat", "hat"]));

        h.widget.dismiss_dropdown();
        assert_eq!(h.input.value(), "cat");
        assert!(!h.widget.view().dropdown_visible);
    }

    #[tokio::test]
    async fn test_external_value_change_resets_dropdown() {
        let registry = SessionRegistry::new();
        let h = harness(&registry);

        h.widget.toggle_microphone();
        registry.broadcast_success(Alternatives::from(vec!["cat", "hat"]));
        assert!(h.widget.view().dropdown_visible);

        // Host form cleared the input.
        h.input.set_value("");
        h.widget.input_value_changed();

        let view = h.widget.view();
        assert!(!view.dropdown_visible);
        assert!(view.alternatives.is_empty());
    }

    #[tokio::test]
    async fn test_stale_result_leaves_widget_untouched() {
        let registry = SessionRegistry::new();
        let a = harness(&registry);
        let b = harness(&registry);

        a.widget.toggle_microphone();
        b.widget.toggle_microphone();
        registry.broadcast_success(Alternatives::from(vec!["cat", "hat"]));

        // A lost ownership before the result arrived.
        assert_eq!(a.input.value(), "");
        assert!(!a.widget.view().dropdown_visible);
        assert_eq!(b.input.value(), "cat");
        assert!(b.widget.view().dropdown_visible);
    }

    #[tokio::test]
    async fn test_second_toggle_forces_first_widget_idle() {
        let registry = SessionRegistry::new();
        let a = harness(&registry);
        let b = harness(&registry);

        a.widget.toggle_microphone();
        assert_eq!(a.widget.view().mic, MicState::Listening);

        b.widget.toggle_microphone();
        assert_eq!(a.widget.view().mic, MicState::Idle);
        assert_eq!(b.widget.view().mic, MicState::Listening);
    }

    #[tokio::test]
    async fn test_error_shows_toast_and_keeps_input() {
        let registry = SessionRegistry::new();
        let h = harness(&registry);

        h.widget.toggle_microphone();
        assert!(h.widget.listening());
        registry.broadcast_error("code 7");

        assert!(!h.widget.listening());
        assert_eq!(h.input.value(), "");
        let toasts = h.notifier.toasts.lock().unwrap();
        assert_eq!(toasts.len(), 1);
        assert_eq!(toasts[0], Toast::could_not_understand());
        // Platform session torn down.
        assert_eq!(h.recognizer.destroys.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn test_error_on_non_owner_shows_no_toast() {
        let registry = SessionRegistry::new();
        let a = harness(&registry);
        let b = harness(&registry);

        b.widget.toggle_microphone();
        registry.broadcast_error("code 7");

        assert!(a.notifier.toasts.lock().unwrap().is_empty());
        assert_eq!(b.notifier.toasts.lock().unwrap().len(), 1);
    }

    #[tokio::test]
    async fn test_manual_toggle_stops_recording() {
        let registry = SessionRegistry::new();
        let h = harness(&registry);

        h.widget.toggle_microphone();
        assert!(h.widget.listening());
        h.widget.toggle_microphone();
        assert!(!h.widget.listening());
        assert_eq!(h.recognizer.destroys.load(Ordering::SeqCst), 1);
    }

    #[tokio::test(start_paused = true)]
    async fn test_auto_stop_after_quiet_period() {
        let registry = SessionRegistry::new();
        let h = harness(&registry);

        h.widget.toggle_microphone();
        registry.broadcast_success(Alternatives::from(vec!["cat"]));
        assert!(h.widget.auto_stop_pending());

        tokio::time::advance(Duration::from_millis(1001)).await;
        tokio::task::yield_now().await;

        assert!(!h.widget.auto_stop_pending());
        assert!(!h.widget.listening());
        assert_eq!(h.recognizer.destroys.load(Ordering::SeqCst), 1);
    }

    #[tokio::test(start_paused = true)]
    async fn test_consecutive_results_debounce_auto_stop() {
        let registry = SessionRegistry::new();
        let h = harness(&registry);

        h.widget.toggle_microphone();
        registry.broadcast_success(Alternatives::from(vec!["cat"]));
        tokio::time::advance(Duration::from_millis(500)).await;
        registry.broadcast_success(Alternatives::from(vec!["cat two"]));

        // The first timer was cancelled, not left to fire at t=1000.
        tokio::time::advance(Duration::from_millis(999)).await;
        tokio::task::yield_now().await;
        assert_eq!(h.recognizer.destroys.load(Ordering::SeqCst), 0);
        assert!(h.widget.auto_stop_pending());

        tokio::time::advance(Duration::from_millis(2)).await;
        tokio::task::yield_now().await;
        assert_eq!(h.recognizer.destroys.load(Ordering::SeqCst), 1);
        assert!(!h.widget.auto_stop_pending());
    }

    #[tokio::test(start_paused = true)]
    async fn test_empty_result_still_reschedules_auto_stop() {
        let registry = SessionRegistry::new();
        let h = harness(&registry);

        h.widget.toggle_microphone();
        registry.broadcast_success(Alternatives::default());

        assert_eq!(h.input.value(), "");
        assert!(h.widget.auto_stop_pending());

        tokio::time::advance(Duration::from_millis(1001)).await;
        tokio::task::yield_now().await;
        assert_eq!(h.recognizer.destroys.load(Ordering::SeqCst), 1);
    }

    #[tokio::test(start_paused = true)]
    async fn test_stale_auto_stop_spares_new_owner() {
        let registry = SessionRegistry::new();
        let a = harness(&registry);
        let b = harness(&registry);

        a.widget.toggle_microphone();
        registry.broadcast_success(Alternatives::from(vec!["cat"]));

        // B claims the session before A's timer fires.
        b.widget.toggle_microphone();
        tokio::time::advance(Duration::from_millis(1001)).await;
        tokio::task::yield_now().await;

        // A's stale stop was ignored; B is still listening.
        assert!(b.widget.listening());
        assert_eq!(b.recognizer.destroys.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn test_dropped_widget_ignores_later_events() {
        let registry = SessionRegistry::new();
        let h = harness(&registry);

        h.widget.toggle_microphone();
        drop(h.widget);

        // Teardown must sever the registry subscription; a dropped widget
        // must never write into its input or raise toasts.
        registry.broadcast_success(Alternatives::from(vec!["cat"]));
        registry.broadcast_error("code 7");

        assert_eq!(h.input.value(), "");
        assert!(h.notifier.toasts.lock().unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_view_layout_defaults() {
        let registry = SessionRegistry::new();
        let h = harness(&registry);
        let view = h.widget.view();
        assert_eq!(view.layout.trailing_inset, 40.0);
        assert_eq!(view.mic, MicState::Idle);
    }
}
