//! Document translation progress reporting.
//!
//! The reuse engine reports integer percent progress after each segment of
//! a document. Progress is emitted on **stderr** so stdout remains the
//! translated text for scripts and pipes. Absence of a reporter is the
//! default, not a special case: pass [`NoProgress`].

use std::io::Write;

/// Observes document translation progress.
///
/// Called after each segment with the cumulative integer percentage,
/// 1-based and monotonic, ending at 100.
pub trait ProgressReporter: Send + Sync {
    fn on_progress(&self, percent: u32);
}

/// No-op reporter when progress is disabled.
pub struct NoProgress;

impl ProgressReporter for NoProgress {
    fn on_progress(&self, _percent: u32) {}
}

/// Human-friendly progress on stderr: "translating  42%".
pub struct StderrProgress;

impl ProgressReporter for StderrProgress {
    fn on_progress(&self, percent: u32) {
        let line = format!("translating  {}%\n", percent);
        let _ = std::io::stderr().lock().write_all(line.as_bytes());
        let _ = std::io::stderr().lock().flush();
    }
}

/// Machine-readable progress: one JSON object per line on stderr.
pub struct JsonProgress;

impl ProgressReporter for JsonProgress {
    fn on_progress(&self, percent: u32) {
        let obj = serde_json::json!({
            "event": "progress",
            "percent": percent,
        });
        if let Ok(line) = serde_json::to_string(&obj) {
            let _ = writeln!(std::io::stderr().lock(), "{}", line);
            let _ = std::io::stderr().lock().flush();
        }
    }
}

/// Progress mode for the CLI: off, human (stderr), or JSON (stderr).
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum ProgressMode {
    Off,
    Human,
    Json,
}

impl ProgressMode {
    /// Default: human progress when stderr is a TTY, otherwise off.
    pub fn default_for_tty() -> Self {
        if atty::is(atty::Stream::Stderr) {
            ProgressMode::Human
        } else {
            ProgressMode::Off
        }
    }

    /// Build a reporter for this mode.
    pub fn reporter(&self) -> Box<dyn ProgressReporter> {
        match self {
            ProgressMode::Off => Box::new(NoProgress),
            ProgressMode::Human => Box::new(StderrProgress),
            ProgressMode::Json => Box::new(JsonProgress),
        }
    }
}
