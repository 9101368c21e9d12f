//! Per-step records for the end-of-run summary.

use std::fmt;
use std::time::Duration;

/// Outcome of a single provisioning command.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StepStatus {
    /// Command ran and succeeded.
    Completed,

    /// Command ran and failed.
    Failed,

    /// Command was not needed.
    Skipped,
}

impl StepStatus {
    /// Get a display character for this status.
    pub fn display_char(&self) -> char {
        match self {
            StepStatus::Completed => '✓',
            StepStatus::Failed => '✗',
            StepStatus::Skipped => '⊘',
        }
    }
}

impl fmt::Display for StepStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            StepStatus::Completed => "completed",
            StepStatus::Failed => "failed",
            StepStatus::Skipped => "skipped",
        };
        write!(f, "{}", s)
    }
}

/// What happened to one named step.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StepRecord {
    pub name: String,
    pub status: StepStatus,
    pub duration: Duration,
    pub note: Option<String>,
}

impl StepRecord {
    pub fn completed(name: &str, duration: Duration) -> Self {
        Self {
            name: name.to_string(),
            status: StepStatus::Completed,
            duration,
            note: None,
        }
    }

    pub fn failed(name: &str, duration: Duration, note: impl Into<String>) -> Self {
        Self {
            name: name.to_string(),
            status: StepStatus::Failed,
            duration,
            note: Some(note.into()),
        }
    }

    pub fn skipped(name: &str, note: impl Into<String>) -> Self {
        Self {
            name: name.to_string(),
            status: StepStatus::Skipped,
            duration: Duration::ZERO,
            note: Some(note.into()),
        }
    }

    /// Generate a summary line for logging.
    pub fn summary_line(&self) -> String {
        let c = self.status.display_char();
        match (self.status, &self.note) {
            (StepStatus::Completed, _) => {
                format!("{} {} ({})", c, self.name, format_duration(self.duration))
            }
            (_, Some(note)) => format!("{} {} - {}", c, self.name, note),
            (_, None) => format!("{} {}", c, self.name),
        }
    }
}

pub fn format_duration(duration: Duration) -> String {
    let secs = duration.as_secs();
    let millis = duration.subsec_millis();

    if secs == 0 {
        format!("{}ms", millis)
    } else if secs < 60 {
        format!("{}.{}s", secs, millis / 100)
    } else {
        format!("{}m {}s", secs / 60, secs % 60)
    }
}
