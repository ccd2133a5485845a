use serde::{Deserialize, Serialize};

use crate::types::{Alternatives, OwnerToken, Timestamp};

/// Recognition events fanned out by the session registry.
///
/// Events are emitted in platform delivery order and consumed by every
/// subscribed widget hook, which decides independently (by comparing the
/// current owner against its own token) whether to act.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub enum RecognitionEvent {
    /// A widget claimed the recognition session. Every *other* hook must
    /// treat this as "I am no longer the owner" and force itself idle.
    OwnerChanged {
        owner: OwnerToken,
        timestamp: Timestamp,
    },

    /// The platform recognizer produced candidate transcriptions for the
    /// current utterance.
    Success {
        alternatives: Alternatives,
        timestamp: Timestamp,
    },

    /// The platform recognizer failed, carrying an opaque platform cause.
    Error { cause: String, timestamp: Timestamp },
}

impl RecognitionEvent {
    /// Build an `OwnerChanged` event stamped with the current time.
    pub fn owner_changed(owner: OwnerToken) -> Self {
        RecognitionEvent::OwnerChanged {
            owner,
            timestamp: Timestamp::now(),
        }
    }

    /// Build a `Success` event stamped with the current time.
    pub fn success(alternatives: Alternatives) -> Self {
        RecognitionEvent::Success {
            alternatives,
            timestamp: Timestamp::now(),
        }
    }

    /// Build an `Error` event stamped with the current time.
    pub fn error(cause: impl Into<String>) -> Self {
        RecognitionEvent::Error {
            cause: cause.into(),
            timestamp: Timestamp::now(),
        }
    }

    /// Returns the timestamp of the event.
    pub fn timestamp(&self) -> Timestamp {
        match self {
            RecognitionEvent::OwnerChanged { timestamp, .. }
            | RecognitionEvent::Success { timestamp, .. }
            | RecognitionEvent::Error { timestamp, .. } => *timestamp,
        }
    }

    /// Returns a human-readable event name for logging.
    pub fn event_name(&self) -> &'static str {
        match self {
            RecognitionEvent::OwnerChanged { .. } => "owner_changed",
            RecognitionEvent::Success { .. } => "success",
            RecognitionEvent::Error { .. } => "error",
        }
    }
}
