//! Focus/break timer engine.
//!
//! The engine is a pure state machine. It has no clock and no thread: the
//! caller drives the countdown by calling `tick()` once per second while
//! [`TimerEngine::is_ticking`] is true.
//!
//! ## State Transitions
//!
//! ```text
//! Idle --start--> Focusing --(tick to 0, caller)--> start_break --> Break
//!   ^                |  ^                                             |
//!   |              pause resume                                       |
//!   |                v  |                                             |
//!   +---reset/stop-- Paused <---------------pause/resume--------------+
//! ```
//!
//! ## Usage
//!
//! ```ignore
//! let mut engine = TimerEngine::new(TimerSettings::default());
//! engine.start("task-1", None);
//! // Once per second while engine.is_ticking():
//! if let Some(event) = engine.tick() {
//!     // countdown reached zero; decide what happens next
//! }
//! ```

use chrono::Utc;
use serde::{Deserialize, Serialize};

use super::settings::{Phase, TimerSettings, TimerSettingsPatch};
use crate::events::Event;

/// Observable timer state.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TimerState {
    Idle,
    Focusing,
    Paused,
    Break,
}

/// Core timer engine.
///
/// Timer state is never persisted; a new process always starts `Idle`.
#[derive(Debug, Clone)]
pub struct TimerEngine {
    settings: TimerSettings,
    phase: Phase,
    running: bool,
    paused: bool,
    active_task_id: Option<String>,
    remaining_secs: u64,
    /// Length of the current countdown. Differs from the settings when
    /// `start` was given an explicit duration.
    total_secs: u64,
}

impl Default for TimerEngine {
    fn default() -> Self {
        Self::new(TimerSettings::default())
    }
}

impl TimerEngine {
    /// Create an idle engine with a full focus countdown ready.
    pub fn new(settings: TimerSettings) -> Self {
        let total_secs = settings.focus_secs();
        Self {
            settings,
            phase: Phase::Focus,
            running: false,
            paused: false,
            active_task_id: None,
            remaining_secs: total_secs,
            total_secs,
        }
    }

    // ── Queries ──────────────────────────────────────────────────────

    pub fn state(&self) -> TimerState {
        match (self.running, self.paused, self.phase) {
            (false, _, _) => TimerState::Idle,
            (true, true, _) => TimerState::Paused,
            (true, false, Phase::Focus) => TimerState::Focusing,
            (true, false, Phase::Break) => TimerState::Break,
        }
    }

    pub fn phase(&self) -> Phase {
        self.phase
    }

    pub fn is_paused(&self) -> bool {
        self.paused
    }

    /// Whether the caller's periodic trigger should be running.
    pub fn is_ticking(&self) -> bool {
        self.running && !self.paused
    }

    pub fn remaining_secs(&self) -> u64 {
        self.remaining_secs
    }

    pub fn total_secs(&self) -> u64 {
        self.total_secs
    }

    pub fn active_task_id(&self) -> Option<&str> {
        self.active_task_id.as_deref()
    }

    pub fn settings(&self) -> TimerSettings {
        self.settings
    }

    /// 0.0 .. 1.0 progress within the current countdown.
    pub fn progress(&self) -> f64 {
        if self.total_secs == 0 {
            return 0.0;
        }
        1.0 - (self.remaining_secs as f64 / self.total_secs as f64)
    }

    /// Build a full state snapshot event.
    pub fn snapshot(&self) -> Event {
        Event::StateSnapshot {
            state: self.state(),
            phase: self.phase,
            task_id: self.active_task_id.clone(),
            remaining_secs: self.remaining_secs,
            total_secs: self.total_secs,
            progress_pct: (self.progress() * 100.0).clamp(0.0, 100.0),
            at: Utc::now(),
        }
    }

    // ── Commands ─────────────────────────────────────────────────────

    /// Start a focus countdown for `task_id`. Valid from any state; a
    /// running countdown is restarted. `Some(0)` falls back to the
    /// configured focus length.
    pub fn start(&mut self, task_id: impl Into<String>, explicit_minutes: Option<u32>) -> Event {
        let task_id = task_id.into();
        let duration_secs = match explicit_minutes {
            Some(min) if min > 0 => u64::from(min).saturating_mul(60),
            _ => self.settings.focus_secs(),
        };
        self.phase = Phase::Focus;
        self.running = true;
        self.paused = false;
        self.active_task_id = Some(task_id.clone());
        self.set_countdown(duration_secs);
        tracing::debug!(task_id = %task_id, duration_secs, "focus started");
        Event::TimerStarted {
            task_id,
            duration_secs,
            at: Utc::now(),
        }
    }

    pub fn pause(&mut self) -> Option<Event> {
        if !self.running || self.paused {
            return None;
        }
        self.paused = true;
        Some(Event::TimerPaused {
            remaining_secs: self.remaining_secs,
            at: Utc::now(),
        })
    }

    pub fn resume(&mut self) -> Option<Event> {
        if !self.paused {
            return None;
        }
        self.paused = false;
        Some(Event::TimerResumed {
            remaining_secs: self.remaining_secs,
            at: Utc::now(),
        })
    }

    /// Advance the countdown by one second.
    ///
    /// Ignored while idle or paused. Returns `Some(Event::TimerCompleted)`
    /// whenever the active countdown sits at zero after the tick; the
    /// engine does not change phase on its own.
    pub fn tick(&mut self) -> Option<Event> {
        if !self.is_ticking() {
            tracing::trace!(state = ?self.state(), "tick ignored");
            return None;
        }
        self.remaining_secs = self.remaining_secs.saturating_sub(1);
        if self.remaining_secs > 0 {
            return None;
        }
        Some(Event::TimerCompleted {
            phase: self.phase,
            task_id: self.active_task_id.clone(),
            at: Utc::now(),
        })
    }

    /// Abandon the countdown. The remaining time is refilled for the
    /// phase that was running, so stopping a break shows a full break.
    pub fn stop(&mut self) -> Event {
        self.running = false;
        self.paused = false;
        self.active_task_id = None;
        self.set_countdown(self.settings.duration_secs(self.phase));
        Event::TimerStopped {
            phase: self.phase,
            remaining_secs: self.remaining_secs,
            at: Utc::now(),
        }
    }

    pub fn start_break(&mut self) -> Event {
        self.phase = Phase::Break;
        self.running = true;
        self.paused = false;
        self.active_task_id = None;
        self.set_countdown(self.settings.break_secs());
        tracing::debug!(duration_secs = self.total_secs, "break started");
        Event::BreakStarted {
            duration_secs: self.total_secs,
            at: Utc::now(),
        }
    }

    pub fn reset(&mut self) -> Event {
        self.phase = Phase::Focus;
        self.running = false;
        self.paused = false;
        self.active_task_id = None;
        self.set_countdown(self.settings.focus_secs());
        Event::TimerReset { at: Utc::now() }
    }

    /// Merge new durations. The countdown is refilled from the new
    /// duration of the current phase, even mid-session.
    pub fn update_settings(&mut self, patch: TimerSettingsPatch) -> Event {
        self.settings = self.settings.merged(patch);
        let discarded_secs = if self.running { self.remaining_secs } else { 0 };
        self.set_countdown(self.settings.duration_secs(self.phase));
        if discarded_secs > 0 {
            tracing::info!(discarded_secs, "settings change overwrote running countdown");
        }
        Event::SettingsUpdated {
            settings: self.settings,
            discarded_secs,
            at: Utc::now(),
        }
    }

    // ── Internal ─────────────────────────────────────────────────────

    fn set_countdown(&mut self, secs: u64) {
        self.total_secs = secs;
        self.remaining_secs = secs;
    }
}
