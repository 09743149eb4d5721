//! Focus session coordinator.
//!
//! [`TimerEngine`] only counts down and reports when it reaches zero.
//! `FocusSession` is the caller-side policy on top of it: a finished focus
//! block completes its task and starts a break, a finished break resets
//! the timer. Everything audible or interactive is handed back as
//! [`SideEffect`]s for the front end to perform.

use crate::events::Event;
use crate::storage::TaskStore;
use crate::task::Task;
use crate::timer::{Phase, TimerEngine, TimerSettings};

/// Work the front end should do after a step.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SideEffect {
    /// Play the completion chime.
    Chime,
    /// Speak this text (only produced when voice reminders are on).
    Announce(String),
    /// Ask the user how the focus session went.
    PromptMood { task_id: String },
}

/// Events produced by a step and the side effects they call for.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Outcome {
    pub events: Vec<Event>,
    pub effects: Vec<SideEffect>,
}

impl Outcome {
    pub fn is_empty(&self) -> bool {
        self.events.is_empty() && self.effects.is_empty()
    }
}

#[derive(Debug, Clone, Default)]
pub struct FocusSession {
    engine: TimerEngine,
}

impl FocusSession {
    pub fn new(settings: TimerSettings) -> Self {
        Self {
            engine: TimerEngine::new(settings),
        }
    }

    pub fn engine(&self) -> &TimerEngine {
        &self.engine
    }

    pub fn engine_mut(&mut self) -> &mut TimerEngine {
        &mut self.engine
    }

    /// Start focusing on `task` for its planned duration.
    pub fn begin(&mut self, task: &Task, voice: bool) -> Outcome {
        let mut outcome = Outcome::default();
        outcome
            .events
            .push(self.engine.start(task.id.clone(), Some(task.duration_min)));
        if voice {
            outcome.effects.push(SideEffect::Announce(format!(
                "Starting focus on {} for {} minutes",
                task.name,
                self.engine.total_secs() / 60
            )));
        }
        outcome
    }

    /// Tick once and apply the completion policy if the countdown ended.
    pub fn advance(&mut self, tasks: &mut TaskStore, voice: bool) -> Outcome {
        let mut outcome = Outcome::default();
        let Some(completed) = self.engine.tick() else {
            return outcome;
        };
        let (phase, task_id) = match &completed {
            Event::TimerCompleted { phase, task_id, .. } => (*phase, task_id.clone()),
            _ => return outcome,
        };
        outcome.events.push(completed);

        match phase {
            Phase::Focus => {
                let finished = task_id.as_deref().and_then(|id| match tasks.complete(id) {
                    Ok(task) => Some(task.name.clone()),
                    Err(e) => {
                        tracing::warn!(error = %e, "completed focus for unknown task");
                        None
                    }
                });
                outcome.events.push(self.engine.start_break());
                outcome.effects.push(SideEffect::Chime);
                if voice && finished.is_some() {
                    outcome.effects.push(SideEffect::Announce(format!(
                        "Focus session complete. Time for a {} minute break.",
                        self.engine.settings().break_duration_min
                    )));
                }
                if let Some(task_id) = task_id {
                    outcome.effects.push(SideEffect::PromptMood { task_id });
                }
                tracing::info!(task = ?finished, "focus session complete");
            }
            Phase::Break => {
                outcome.events.push(self.engine.reset());
                outcome.effects.push(SideEffect::Chime);
                tracing::info!("break complete");
            }
        }
        outcome
    }
}
