//! Recognition session owner registry - the arbitration core.
//!
//! At most one widget may be in the listening state at any time, process-wide.
//! The registry records the current owner token and is the dispatch point
//! through which platform recognizer callbacks reach every interested widget.
//! All operations are pure in-memory coordination and cannot fail; the
//! platform recognizer is the only failure source.

use std::sync::{Arc, Mutex, Weak};

use voxfield_core::events::RecognitionEvent;
use voxfield_core::types::{Alternatives, OwnerToken};

type EventFn = Arc<dyn Fn(&RecognitionEvent) + Send + Sync>;

struct Inner {
    current_owner: Option<OwnerToken>,
    next_subscriber_id: u64,
    subscribers: Vec<(u64, EventFn)>,
}

/// Shared registry of "who may currently listen".
///
/// Cheaply cloneable handle; all clones share the same owner field and
/// subscriber list. A registry is an explicit instance handed to each hook,
/// never a module-level singleton, so tests can build isolated registries.
///
/// Events are dispatched synchronously, in subscription order, in the order
/// they are broadcast; there is no reordering or buffering. Subscriber
/// callbacks run outside the registry lock and may call back into it.
#[derive(Clone)]
pub struct SessionRegistry {
    inner: Arc<Mutex<Inner>>,
}

impl Default for SessionRegistry {
    fn default() -> Self {
        Self::new()
    }
}

impl SessionRegistry {
    /// Create a registry with no current owner and no subscribers.
    pub fn new() -> Self {
        Self {
            inner: Arc::new(Mutex::new(Inner {
                current_owner: None,
                next_subscriber_id: 0,
                subscribers: Vec::new(),
            })),
        }
    }

    /// Record `token` as the current owner and broadcast `OwnerChanged`.
    ///
    /// Every other hook, on receiving the event, forces its local state to
    /// idle. The claiming hook sees its own token and ignores the event.
    pub fn claim(&self, token: OwnerToken) {
        {
            let mut inner = self.inner.lock().expect("registry mutex poisoned");
            inner.current_owner = Some(token);
        }
        tracing::debug!(owner = %token, "Recognition session claimed");
        self.dispatch(&RecognitionEvent::owner_changed(token));
    }

    /// Whether `token` is the current owner.
    pub fn is_current_owner(&self, token: OwnerToken) -> bool {
        let inner = self.inner.lock().expect("registry mutex poisoned");
        inner.current_owner == Some(token)
    }

    /// The current owner, or `None` if nobody is listening.
    pub fn current_owner(&self) -> Option<OwnerToken> {
        let inner = self.inner.lock().expect("registry mutex poisoned");
        inner.current_owner
    }

    /// Fan a recognition result out to all subscribers.
    ///
    /// Entry point for the platform's `onSpeechResults` callback. Each
    /// subscriber independently decides, via ownership, whether to act.
    pub fn broadcast_success(&self, alternatives: Alternatives) {
        tracing::debug!(
            candidates = alternatives.len(),
            "Broadcasting recognition result"
        );
        self.dispatch(&RecognitionEvent::success(alternatives));
    }

    /// Fan a recognition failure out to all subscribers.
    ///
    /// Entry point for the platform's `onSpeechError` callback.
    pub fn broadcast_error(&self, cause: impl Into<String>) {
        let cause = cause.into();
        tracing::debug!(%cause, "Broadcasting recognition error");
        self.dispatch(&RecognitionEvent::error(cause));
    }

    /// Subscribe to all recognition events.
    ///
    /// The returned guard unsubscribes on drop, tying the subscription to the
    /// widget's mount lifetime so no callback runs after disposal.
    pub fn subscribe(
        &self,
        callback: impl Fn(&RecognitionEvent) + Send + Sync + 'static,
    ) -> Subscription {
        let mut inner = self.inner.lock().expect("registry mutex poisoned");
        let id = inner.next_subscriber_id;
        inner.next_subscriber_id += 1;
        inner.subscribers.push((id, Arc::new(callback)));
        Subscription {
            registry: Arc::downgrade(&self.inner),
            id,
        }
    }

    #[cfg(test)]
    fn subscriber_count(&self) -> usize {
        let inner = self.inner.lock().expect("registry mutex poisoned");
        inner.subscribers.len()
    }

    fn dispatch(&self, event: &RecognitionEvent) {
        // Snapshot the callbacks so they run outside the lock; a subscriber
        // checking `is_current_owner` from inside its callback must not
        // deadlock.
        let callbacks: Vec<EventFn> = {
            let inner = self.inner.lock().expect("registry mutex poisoned");
            inner
                .subscribers
                .iter()
                .map(|(_, cb)| Arc::clone(cb))
                .collect()
        };
        for callback in callbacks {
            (*callback)(event);
        }
    }
}

/// RAII subscription guard; dropping it removes the subscriber.
pub struct Subscription {
    registry: Weak<Mutex<Inner>>,
    id: u64,
}

impl Drop for Subscription {
    fn drop(&mut self) {
        if let Some(inner) = self.registry.upgrade() {
            let mut inner = inner.lock().expect("registry mutex poisoned");
            inner.subscribers.retain(|(id, _)| *id != self.id);
        }
    }
}

// =============================================================================
// Tests
// =============================================================================
