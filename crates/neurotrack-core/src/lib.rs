//! # NeuroTrack Core Library
//!
//! Business logic for the NeuroTrack focus planner: a focus/break timer,
//! task planning, mood journaling and templated routines. Front ends
//! (the `neurotrack` CLI) are thin layers over this crate.
//!
//! ## Architecture
//!
//! - **Timer Engine**: a pure countdown state machine; the caller ticks it
//!   once per second and reacts to the completion it reports
//! - **Focus Session**: the completion policy (complete the task, start a
//!   break, reset after the break) and the side effects it asks for
//! - **Ordering**: dense `0..n` ranks for routine task lists
//! - **Storage**: SQLite key-value snapshots and TOML configuration
//! - **Speech**: remote text-to-speech with a local fallback
//!
//! ## Key Components
//!
//! - [`TimerEngine`]: Core timer state machine
//! - [`FocusSession`]: Timer plus completion policy
//! - [`order`]: Insert/remove/move that keep ranks dense
//! - [`Database`]: Key-value persistence for the stores
//! - [`Config`]: Application configuration management

pub mod error;
pub mod events;
pub mod focus;
pub mod format;
pub mod mood;
pub mod order;
pub mod routine;
pub mod settings;
pub mod speech;
pub mod storage;
pub mod task;
pub mod timer;

pub use error::{ConfigError, CoreError, DatabaseError, OrderError, SpeechError, StoreError};
pub use events::Event;
pub use focus::{FocusSession, Outcome, SideEffect};
pub use mood::{FocusLevel, MoodDraft, MoodEntry, MoodPatch, MoodRange, MoodSort};
pub use order::OrderedItem;
pub use routine::{Routine, RoutineDraft, RoutinePatch};
pub use settings::{OnboardingAnswers, Theme, UserSettings, UserSettingsPatch};
pub use storage::{
    Config, Database, MoodStore, Persisted, RoutineStore, SettingsStore, TaskStore,
};
pub use task::{Task, TaskDraft, TaskPatch};
pub use timer::{Phase, TimerEngine, TimerSettings, TimerSettingsPatch, TimerState};
