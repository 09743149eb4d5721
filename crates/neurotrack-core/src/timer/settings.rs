use serde::{Deserialize, Serialize};

/// Which countdown the timer is (or was last) running.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Phase {
    Focus,
    Break,
}

/// Focus and break lengths in minutes.
///
/// The engine accepts any value here; bounds are applied by the
/// configuration layer (see [`crate::storage::TimerConfig`]).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct TimerSettings {
    pub focus_duration_min: u32,
    pub break_duration_min: u32,
}

/// Partial update for [`TimerSettings`]. `None` keeps the current value.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TimerSettingsPatch {
    #[serde(default)]
    pub focus_duration_min: Option<u32>,
    #[serde(default)]
    pub break_duration_min: Option<u32>,
}

impl Default for TimerSettings {
    fn default() -> Self {
        Self {
            focus_duration_min: 25,
            break_duration_min: 5,
        }
    }
}

impl TimerSettings {
    pub fn focus_secs(&self) -> u64 {
        u64::from(self.focus_duration_min).saturating_mul(60)
    }

    pub fn break_secs(&self) -> u64 {
        u64::from(self.break_duration_min).saturating_mul(60)
    }

    /// Countdown length for the given phase, in seconds.
    pub fn duration_secs(&self, phase: Phase) -> u64 {
        match phase {
            Phase::Focus => self.focus_secs(),
            Phase::Break => self.break_secs(),
        }
    }

    /// Merge a patch, returning the updated settings.
    pub fn merged(self, patch: TimerSettingsPatch) -> Self {
        Self {
            focus_duration_min: patch.focus_duration_min.unwrap_or(self.focus_duration_min),
            break_duration_min: patch.break_duration_min.unwrap_or(self.break_duration_min),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn merge_keeps_unset_fields() {
        let s = TimerSettings::default().merged(TimerSettingsPatch {
            focus_duration_min: Some(50),
            break_duration_min: None,
        });
        assert_eq!(s.focus_duration_min, 50);
        assert_eq!(s.break_duration_min, 5);
    }

    #[test]
    fn duration_per_phase() {
        let s = TimerSettings::default();
        assert_eq!(s.duration_secs(Phase::Focus), 1500);
        assert_eq!(s.duration_secs(Phase::Break), 300);
    }
}
