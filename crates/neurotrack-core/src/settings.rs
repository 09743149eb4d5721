//! User-level preferences: theme, voice reminders, premium flag and
//! onboarding answers. Rendering collaborators read these as plain data.

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Theme {
    #[default]
    Light,
    Dark,
    LowStimulation,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ReminderPreference {
    Voice,
    Visual,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PrimaryGoal {
    Focus,
    Routines,
    Distractions,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RoutineStyle {
    Rigid,
    Flexible,
    Mix,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct OnboardingAnswers {
    pub reminder_preference: ReminderPreference,
    pub primary_goal: PrimaryGoal,
    pub routine_style: RoutineStyle,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserSettings {
    #[serde(default)]
    pub theme: Theme,
    #[serde(default)]
    pub voice_reminders: bool,
    #[serde(default)]
    pub is_premium: bool,
    #[serde(default)]
    pub onboarding_completed: bool,
    #[serde(default)]
    pub onboarding_answers: Option<OnboardingAnswers>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserSettingsPatch {
    pub theme: Option<Theme>,
    pub voice_reminders: Option<bool>,
    pub is_premium: Option<bool>,
}

impl UserSettings {
    pub fn apply(&mut self, patch: UserSettingsPatch) {
        if let Some(theme) = patch.theme {
            self.theme = theme;
        }
        if let Some(voice) = patch.voice_reminders {
            self.voice_reminders = voice;
        }
        if let Some(premium) = patch.is_premium {
            self.is_premium = premium;
        }
    }
}

impl std::str::FromStr for Theme {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "light" => Ok(Theme::Light),
            "dark" => Ok(Theme::Dark),
            "low-stimulation" => Ok(Theme::LowStimulation),
            other => Err(format!("unknown theme '{other}' (light, dark, low-stimulation)")),
        }
    }
}
