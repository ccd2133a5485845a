//! Voxfield demo binary - composition root.
//!
//! Wires two dictation widgets to one shared session registry and walks
//! through the interesting scenarios on stdout:
//! 1. A single-candidate result filling the wrapped input
//! 2. A multi-candidate result opening the alternatives dropdown
//! 3. A second widget claiming the session away from the first
//! 4. A recognition error surfacing as a toast
//! 5. The 1-second auto-stop timer ending a quiet session
//!
//! There is no real platform recognizer here; the demo broadcasts canned
//! events through the registry exactly where the platform's result and error
//! callbacks would.

use std::sync::{Arc, Mutex};
use std::time::Duration;

use clap::Parser;
use tracing_subscriber::EnvFilter;

use voxfield_core::config::VoxfieldConfig;
use voxfield_core::types::{Alternatives, LocaleCode};
use voxfield_recog::{RecognizerOptions, SessionRegistry, SpeechRecognizer};
use voxfield_widget::{DictationWidget, Notifier, TextInput, Toast};

mod cli;
use cli::CliArgs;

/// Stand-in for the platform speech service; logs the outbound calls.
struct DemoRecognizer;

impl SpeechRecognizer for DemoRecognizer {
    fn start(&self, locale: &LocaleCode, options: &RecognizerOptions) {
        tracing::info!(
            %locale,
            max_alternatives = options.max_alternatives,
            partial_results = options.partial_results,
            "Platform recognizer start"
        );
    }

    fn destroy(&self) {
        tracing::info!("Platform recognizer destroyed");
    }
}

/// A labeled text field printing every value change.
struct DemoInput {
    label: &'static str,
    value: Mutex<String>,
}

impl DemoInput {
    fn new(label: &'static str) -> Arc<Self> {
        Arc::new(Self {
            label,
            value: Mutex::new(String::new()),
        })
    }
}

impl TextInput for DemoInput {
    fn value(&self) -> String {
        self.value.lock().expect("input mutex poisoned").clone()
    }

    fn set_value(&self, value: &str) {
        *self.value.lock().expect("input mutex poisoned") = value.to_string();
        println!("[{}] value = {:?}", self.label, value);
    }
}

/// Prints toasts the way a host UI would render them.
struct StdoutNotifier;

impl Notifier for StdoutNotifier {
    fn show(&self, toast: Toast) {
        println!("[toast] {}", toast);
    }
}

fn print_view(label: &str, widget: &DictationWidget) {
    let view = widget.view();
    println!("[{}] mic = {}", label, view.mic);
    if view.dropdown_visible {
        println!("[{}] dropdown: {:?}", label, view.alternatives);
    }
}

#[tokio::main]
async fn main() {
    let args = CliArgs::parse();

    let config_path = args.resolve_config_path();
    let mut config = VoxfieldConfig::load_or_default(&config_path);
    if let Some(ref locale) = args.locale {
        config.recognizer.locale = LocaleCode::new(locale.clone());
    }

    let log_level = args
        .resolve_log_level()
        .unwrap_or_else(|| config.general.log_level.clone());
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(log_level)),
        )
        .init();

    let registry = SessionRegistry::new();
    let recognizer: Arc<dyn SpeechRecognizer> = Arc::new(DemoRecognizer);
    let notifier: Arc<dyn Notifier> = Arc::new(StdoutNotifier);

    let name_input = DemoInput::new("name");
    let notes_input = DemoInput::new("notes");

    let name_widget = DictationWidget::new(
        Arc::clone(&name_input) as Arc<dyn TextInput>,
        registry.clone(),
        Arc::clone(&recognizer),
        Arc::clone(&notifier),
        &config,
    );
    let notes_widget = DictationWidget::new(
        Arc::clone(&notes_input) as Arc<dyn TextInput>,
        registry.clone(),
        Arc::clone(&recognizer),
        Arc::clone(&notifier),
        &config,
    );

    println!("-- tap the name field's microphone");
    name_widget.toggle_microphone();
    print_view("name", &name_widget);

    println!("-- single-candidate result");
    registry.broadcast_success(Alternatives::from(vec!["ada lovelace"]));
    print_view("name", &name_widget);

    println!("-- multi-candidate result opens the dropdown");
    name_widget.toggle_microphone();
    registry.broadcast_success(Alternatives::from(vec![
        "ada lovelace",
        "ada loveless",
        "ava lovelace",
    ]));
    print_view("name", &name_widget);

    println!("-- pick an alternative");
    name_widget.select_alternative("ava lovelace");
    print_view("name", &name_widget);

    println!("-- notes field claims the session");
    notes_widget.toggle_microphone();
    print_view("name", &name_widget);
    print_view("notes", &notes_widget);

    println!("-- stale result for the old owner is dropped; new owner gets it");
    registry.broadcast_success(Alternatives::from(vec!["remember the milk"]));
    print_view("notes", &notes_widget);

    println!("-- recognition error surfaces as a toast");
    notes_widget.toggle_microphone();
    registry.broadcast_error("error code 7: no match");
    print_view("notes", &notes_widget);

    println!("-- auto-stop ends a quiet session");
    notes_widget.toggle_microphone();
    registry.broadcast_success(Alternatives::from(vec!["last utterance"]));
    tokio::time::sleep(Duration::from_millis(config.widget.auto_stop_ms + 200)).await;
    print_view("notes", &notes_widget);
}
