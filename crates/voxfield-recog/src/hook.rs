//! Per-widget recognition hook.
//!
//! Adapts the shared [`SessionRegistry`] and the platform recognizer into a
//! per-widget `{listening, start_recording, stop_recording}` contract. Each
//! hook owns a fresh [`OwnerToken`] and filters incoming events by ownership:
//! ownership may change between a start call and the arrival of a platform
//! callback, and stale callbacks are dropped silently rather than erroring.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex, Weak};

use voxfield_core::events::RecognitionEvent;
use voxfield_core::types::{Alternatives, LocaleCode, OwnerToken};

use crate::recognizer::{RecognizerOptions, SpeechRecognizer};
use crate::registry::{SessionRegistry, Subscription};

/// Caller-supplied reactions to filtered recognition events.
pub struct HookCallbacks {
    /// Fired when another widget claims the session, with the new owner.
    pub on_owner_lost: Option<Box<dyn Fn(OwnerToken) + Send + Sync>>,
    /// Fired with the alternatives of a result addressed to this widget.
    pub on_success: Box<dyn Fn(&Alternatives) + Send + Sync>,
    /// Fired with the platform cause of a failure addressed to this widget.
    pub on_error: Box<dyn Fn(&str) + Send + Sync>,
}

impl HookCallbacks {
    pub fn new(
        on_success: impl Fn(&Alternatives) + Send + Sync + 'static,
        on_error: impl Fn(&str) + Send + Sync + 'static,
    ) -> Self {
        Self {
            on_owner_lost: None,
            on_success: Box::new(on_success),
            on_error: Box::new(on_error),
        }
    }

    pub fn with_owner_lost(
        mut self,
        on_owner_lost: impl Fn(OwnerToken) + Send + Sync + 'static,
    ) -> Self {
        self.on_owner_lost = Some(Box::new(on_owner_lost));
        self
    }
}

struct HookShared {
    token: OwnerToken,
    listening: AtomicBool,
    registry: SessionRegistry,
    recognizer: Arc<dyn SpeechRecognizer>,
    locale: LocaleCode,
    options: RecognizerOptions,
    // Held for the hook's lifetime; dropping the last hook clone
    // unsubscribes from the registry.
    subscription: Mutex<Option<Subscription>>,
}

/// Binds one widget instance to a registry and a platform recognizer.
///
/// Cheaply cloneable handle; all clones share listening state and the single
/// registry subscription.
#[derive(Clone)]
pub struct RecognitionHook {
    shared: Arc<HookShared>,
}

impl RecognitionHook {
    /// Create a hook with a fresh owner token and subscribe it to `registry`.
    pub fn new(
        registry: SessionRegistry,
        recognizer: Arc<dyn SpeechRecognizer>,
        locale: LocaleCode,
        options: RecognizerOptions,
        callbacks: HookCallbacks,
    ) -> Self {
        let shared = Arc::new(HookShared {
            token: OwnerToken::new(),
            listening: AtomicBool::new(false),
            registry: registry.clone(),
            recognizer,
            locale,
            options,
            subscription: Mutex::new(None),
        });

        let weak = Arc::downgrade(&shared);
        let subscription = registry.subscribe(move |event| {
            // The weak upgrade guards against a callback racing hook teardown.
            let Some(shared) = weak.upgrade() else {
                return;
            };
            handle_event(&shared, &callbacks, event);
        });
        *shared
            .subscription
            .lock()
            .expect("subscription mutex poisoned") = Some(subscription);

        Self { shared }
    }

    /// Downgrade to a weak handle that holds no ownership.
    ///
    /// A callback that needs to reach back into its own hook (the widget's
    /// auto-stop timer does) must hold a weak handle: a strong clone inside
    /// a registry subscriber would keep the subscription alive forever.
    pub fn downgrade(&self) -> WeakRecognitionHook {
        WeakRecognitionHook {
            shared: Arc::downgrade(&self.shared),
        }
    }

    /// This hook's owner token.
    pub fn token(&self) -> OwnerToken {
        self.shared.token
    }

    /// Whether this widget is currently in the listening state.
    pub fn listening(&self) -> bool {
        self.shared.listening.load(Ordering::SeqCst)
    }

    /// Claim the session for this widget and start the platform recognizer.
    ///
    /// Never fails: permission denials and engine failures surface later as
    /// an Error event through the registry.
    pub fn start_recording(&self) {
        let s = &self.shared;
        s.registry.claim(s.token);
        s.listening.store(true, Ordering::SeqCst);
        s.recognizer.start(&s.locale, &s.options);
        tracing::info!(owner = %s.token, locale = %s.locale, "Recording started");
    }

    /// Stop the session, but only if this widget still owns it.
    ///
    /// A stale or delayed stop from a widget that has since lost ownership
    /// must not tear down another widget's session.
    pub fn stop_recording(&self) {
        let s = &self.shared;
        if !s.registry.is_current_owner(s.token) {
            tracing::debug!(owner = %s.token, "Stop ignored: not the current owner");
            return;
        }
        s.listening.store(false, Ordering::SeqCst);
        s.recognizer.destroy();
        tracing::info!(owner = %s.token, "Recording stopped");
    }
}

/// Non-owning counterpart of [`RecognitionHook`].
pub struct WeakRecognitionHook {
    shared: Weak<HookShared>,
}

impl WeakRecognitionHook {
    /// Upgrade to a full hook handle, if any strong handle is still alive.
    pub fn upgrade(&self) -> Option<RecognitionHook> {
        self.shared
            .upgrade()
            .map(|shared| RecognitionHook { shared })
    }
}

fn handle_event(shared: &HookShared, callbacks: &HookCallbacks, event: &RecognitionEvent) {
    match event {
        RecognitionEvent::OwnerChanged { owner, .. } => {
            // Own claim: no self-notification side effect.
            if *owner != shared.token {
                shared.listening.store(false, Ordering::SeqCst);
                if let Some(ref on_owner_lost) = callbacks.on_owner_lost {
                    on_owner_lost(*owner);
                }
            }
        }
        RecognitionEvent::Success { alternatives, .. } => {
            if shared.registry.is_current_owner(shared.token) {
                shared.listening.store(false, Ordering::SeqCst);
                (callbacks.on_success)(alternatives);
            } else {
                tracing::trace!(owner = %shared.token, "Stale recognition result dropped");
            }
        }
        RecognitionEvent::Error { cause, .. } => {
            if shared.registry.is_current_owner(shared.token) {
                shared.listening.store(false, Ordering::SeqCst);
                (callbacks.on_error)(cause);
            }
            // Torn down regardless of ownership to prevent a wedged
            // recognizer service.
            shared.recognizer.destroy();
        }
    }
}

// =============================================================================
// Tests
// =============================================================================
