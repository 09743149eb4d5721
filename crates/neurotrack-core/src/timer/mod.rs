mod engine;
mod settings;

pub use engine::{TimerEngine, TimerState};
pub use settings::{Phase, TimerSettings, TimerSettingsPatch};
