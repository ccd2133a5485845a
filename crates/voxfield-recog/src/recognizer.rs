//! Platform recognizer abstraction.
//!
//! The actual speech-recognition engine lives outside this process; all the
//! core needs is a way to start a session with a locale and options, and to
//! tear the session down. Results and failures come back asynchronously as
//! registry events, never as return values of these calls.

use tracing::warn;

use voxfield_core::config::RecognizerConfig;
use voxfield_core::types::LocaleCode;

/// Options handed to the platform recognizer when a session starts.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct RecognizerOptions {
    /// Deliver partial results while the utterance is still in progress.
    pub partial_results: bool,
    /// Maximum number of candidate transcriptions per utterance.
    pub max_alternatives: u32,
    /// Prompt for microphone permission automatically on first start.
    pub auto_request_permissions: bool,
}

impl Default for RecognizerOptions {
    fn default() -> Self {
        Self {
            partial_results: true,
            max_alternatives: 5,
            auto_request_permissions: true,
        }
    }
}

impl From<&RecognizerConfig> for RecognizerOptions {
    fn from(config: &RecognizerConfig) -> Self {
        Self {
            partial_results: config.partial_results,
            max_alternatives: config.max_alternatives,
            auto_request_permissions: config.auto_request_permissions,
        }
    }
}

/// Outbound interface to the platform speech-recognition service.
///
/// `start` never fails synchronously: permission denials and engine failures
/// surface later as an Error event through the session registry. `destroy`
/// tears down the platform session and must be safe to call at any time,
/// including when no session is active.
pub trait SpeechRecognizer: Send + Sync {
    fn start(&self, locale: &LocaleCode, options: &RecognizerOptions);
    fn destroy(&self);
}

/// Stub recognizer for platforms without a speech service.
///
/// Logs the start request and does nothing; no events are ever delivered.
pub struct NullRecognizer;

impl SpeechRecognizer for NullRecognizer {
    fn start(&self, locale: &LocaleCode, _options: &RecognizerOptions) {
        warn!(%locale, "No platform recognizer available; start ignored");
    }

    fn destroy(&self) {}
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_options() {
        let options = RecognizerOptions::default();
        assert!(options.partial_results);
        assert_eq!(options.max_alternatives, 5);
        assert!(options.auto_request_permissions);
    }

    #[test]
    fn test_options_from_config() {
        let config = RecognizerConfig {
            partial_results: false,
            max_alternatives: 3,
            ..RecognizerConfig::default()
        };
        let options = RecognizerOptions::from(&config);
        assert!(!options.partial_results);
        assert_eq!(options.max_alternatives, 3);
        assert!(options.auto_request_permissions);
    }

    #[test]
    fn test_null_recognizer_is_inert() {
        let recognizer = NullRecognizer;
        recognizer.start(&LocaleCode::default(), &RecognizerOptions::default());
        recognizer.destroy();
    }
}
