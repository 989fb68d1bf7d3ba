//! File logging for the terminal UI.
//!
//! The TUI owns stdout, so events go through a non-blocking file appender. Keep the
//! returned guard alive for the life of the process or buffered lines are lost.
//!
//! Text typed by the user is never logged verbatim at `info` and above; use
//! [`redact_user_text_for_log`] there and [`sanitize_for_log`] for `trace` output.

use std::fmt::Write as _;
use std::path::Path;
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::EnvFilter;

pub const LOG_FILE_NAME: &str = "dueline.log";

/// Installs the global subscriber. `RUST_LOG` takes precedence over `level`.
///
/// Returns `None` when a subscriber is already installed (tests, embedding).
pub fn init(log_dir: &Path, level: &str) -> Option<WorkerGuard> {
    if std::fs::create_dir_all(log_dir).is_err() {
        return None;
    }
    let file_appender = tracing_appender::rolling::never(log_dir, LOG_FILE_NAME);
    let (writer, guard) = tracing_appender::non_blocking(file_appender);
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(writer)
        .with_ansi(false)
        .try_init()
        .ok()
        .map(|_| guard)
}

/// Escapes control characters so a value cannot forge log lines or terminal codes.
pub fn sanitize_for_log(value: &str) -> String {
    let mut out = String::with_capacity(value.len());
    for c in value.chars() {
        if c.is_control() {
            let _ = write!(out, "\\u{{{:04X}}}", c as u32);
        } else {
            out.push(c);
        }
    }
    out
}

pub fn redact_user_text_for_log(value: &str) -> String {
    format!("[redacted len={}]", value.chars().count())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn sanitize_escapes_control_characters() {
        let value = "line1\nline2\t\u{001b}[31m";
        assert_eq!(
            sanitize_for_log(value),
            "line1\\u{000A}line2\\u{0009}\\u{001B}[31m"
        );
        assert_eq!(sanitize_for_log("next friday"), "next friday");
    }

    #[test]
    fn redaction_reports_length_only() {
        assert_eq!(redact_user_text_for_log("do taxes tomorrow"), "[redacted len=17]");
    }
}
