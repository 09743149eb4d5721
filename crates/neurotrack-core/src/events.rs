use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::timer::{Phase, TimerSettings, TimerState};

/// Every timer state change produces an Event.
/// Callers print them, log them, or react to `TimerCompleted`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum Event {
    TimerStarted {
        task_id: String,
        duration_secs: u64,
        at: DateTime<Utc>,
    },
    TimerPaused {
        remaining_secs: u64,
        at: DateTime<Utc>,
    },
    TimerResumed {
        remaining_secs: u64,
        at: DateTime<Utc>,
    },
    /// Countdown abandoned; the phase is kept so the next start knows
    /// which duration was on screen.
    TimerStopped {
        phase: Phase,
        remaining_secs: u64,
        at: DateTime<Utc>,
    },
    BreakStarted {
        duration_secs: u64,
        at: DateTime<Utc>,
    },
    TimerReset {
        at: DateTime<Utc>,
    },
    /// The active countdown is at zero. The engine stays in its phase
    /// until the caller acts on this.
    TimerCompleted {
        phase: Phase,
        task_id: Option<String>,
        at: DateTime<Utc>,
    },
    SettingsUpdated {
        settings: TimerSettings,
        /// Seconds of an in-progress countdown that were overwritten.
        discarded_secs: u64,
        at: DateTime<Utc>,
    },
    StateSnapshot {
        state: TimerState,
        phase: Phase,
        task_id: Option<String>,
        remaining_secs: u64,
        total_secs: u64,
        progress_pct: f64,
        at: DateTime<Utc>,
    },
}

impl Event {
    /// True for the completion notification returned by `tick()`.
    pub fn is_completion(&self) -> bool {
        matches!(self, Event::TimerCompleted { .. })
    }
}
