//! Voxfield recognition crate - session arbitration and the per-widget hook.
//!
//! The [`SessionRegistry`] is the single source of truth for which widget may
//! currently listen; it records the current owner token and fans recognition
//! events out to every subscriber. A [`RecognitionHook`] binds one widget to
//! a registry and a platform recognizer, exposing the
//! `{listening, start_recording, stop_recording}` contract and filtering
//! incoming events by ownership.

pub mod hook;
pub mod recognizer;
pub mod registry;

pub use hook::{HookCallbacks, RecognitionHook, WeakRecognitionHook};
pub use recognizer::{NullRecognizer, RecognizerOptions, SpeechRecognizer};
pub use registry::{SessionRegistry, Subscription};
