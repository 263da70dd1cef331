//! Console and JSON reporting for the CLI.
//!
//! Unicode markers are only used when stderr is a terminal; piped output and
//! CI logs get plain ASCII. In `--json` mode everything becomes line-oriented
//! JSON events on stdout.

use is_terminal::IsTerminal;
use std::path::Path;

use stagehand::{ConfigWarning, LogSink};

pub fn ok_marker() -> &'static str {
    if std::io::stderr().is_terminal() {
        "✓"
    } else {
        "OK"
    }
}

pub fn warn_marker() -> &'static str {
    if std::io::stderr().is_terminal() {
        "⚠"
    } else {
        "WARN"
    }
}

pub fn fail_marker() -> &'static str {
    if std::io::stderr().is_terminal() {
        "✗"
    } else {
        "ERROR"
    }
}

/// Log sink for the deploy operations: plain lines, or JSON events in CI mode
pub struct ConsoleLog {
    json: bool,
}

impl ConsoleLog {
    pub fn new(json: bool) -> Self {
        Self { json }
    }
}

impl LogSink for ConsoleLog {
    fn log(&self, message: &str) {
        if self.json {
            println!(
                "{}",
                serde_json::json!({"event": "log", "message": message})
            );
        } else {
            println!("{}", message);
        }
    }
}

pub fn print_config_warnings(path: &Path, warnings: &[ConfigWarning]) {
    for w in warnings {
        if let Some(line) = w.line {
            eprintln!(
                "{} Unknown config key '{}' in {}:{}",
                warn_marker(),
                w.key,
                path.display(),
                line
            );
        } else {
            eprintln!(
                "{} Unknown config key '{}' in {}",
                warn_marker(),
                w.key,
                path.display()
            );
        }

        if let Some(suggestion) = &w.suggestion {
            eprintln!("   Did you mean '{}'?", suggestion);
        }
    }
}

pub fn print_error(err: &anyhow::Error, json: bool) {
    if json {
        println!(
            "{}",
            serde_json::json!({"event": "error", "message": err.to_string()})
        );
        return;
    }

    eprintln!("{} {}", fail_marker(), err);
}
