use std::fmt;

use chrono::Utc;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

// =============================================================================
// Identity
// =============================================================================

/// Opaque per-widget identifier used to arbitrate recognition sessions.
///
/// Generated once per hook instantiation and used only for equality
/// comparison against the registry's current owner. Never dereferenced.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct OwnerToken(Uuid);

impl OwnerToken {
    /// Generate a fresh, unique token.
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }
}

impl Default for OwnerToken {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for OwnerToken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

// =============================================================================
// Locale
// =============================================================================

/// BCP 47 locale tag handed to the platform recognizer, e.g. `en-US`.
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct LocaleCode(String);

impl LocaleCode {
    pub fn new(code: impl Into<String>) -> Self {
        Self(code.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl Default for LocaleCode {
    fn default() -> Self {
        Self("en-US".to_string())
    }
}

impl fmt::Display for LocaleCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<&str> for LocaleCode {
    fn from(code: &str) -> Self {
        Self::new(code)
    }
}

// =============================================================================
// Alternatives
// =============================================================================

/// Ranked candidate transcriptions for one recognized utterance,
/// most-likely first.
///
/// The list is replaced wholesale on every recognition result; ordering is
/// exactly what the platform delivered.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Alternatives(Vec<String>);

impl Alternatives {
    pub fn new(candidates: Vec<String>) -> Self {
        Self(candidates)
    }

    /// The most likely transcription, if any candidate was returned.
    pub fn top(&self) -> Option<&str> {
        self.0.first().map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.0.iter().map(String::as_str)
    }

    pub fn as_slice(&self) -> &[String] {
        &self.0
    }

    pub fn into_vec(self) -> Vec<String> {
        self.0
    }
}

impl From<Vec<String>> for Alternatives {
    fn from(candidates: Vec<String>) -> Self {
        Self::new(candidates)
    }
}

impl From<Vec<&str>> for Alternatives {
    fn from(candidates: Vec<&str>) -> Self {
        Self::new(candidates.into_iter().map(str::to_owned).collect())
    }
}

// =============================================================================
// Time
// =============================================================================

/// Unix timestamp in milliseconds.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct Timestamp(pub i64);

impl Timestamp {
    pub fn now() -> Self {
        Self(Utc::now().timestamp_millis())
    }
}

// =============================================================================
// Microphone
// =============================================================================

/// Visual state of the microphone affordance.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MicState {
    /// Not listening; tapping the button starts a session.
    #[default]
    Idle,
    /// Actively listening; tapping the button stops the session.
    Listening,
}

impl fmt::Display for MicState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            MicState::Idle => write!(f, "Idle"),
            MicState::Listening => write!(f, "Listening"),
        }
    }
}

// =============================================================================
// Tests
// =============================================================================
