use clap::{Subcommand, ValueEnum};
use neurotrack_core::settings::{PrimaryGoal, ReminderPreference, RoutineStyle};
use neurotrack_core::storage::{Database, Persisted, SettingsStore};
use neurotrack_core::{OnboardingAnswers, Theme, UserSettingsPatch};

use super::print_json;

#[derive(Clone, Copy, ValueEnum)]
pub enum ReminderArg {
    Voice,
    Visual,
}

#[derive(Clone, Copy, ValueEnum)]
pub enum GoalArg {
    Focus,
    Routines,
    Distractions,
}

#[derive(Clone, Copy, ValueEnum)]
pub enum StyleArg {
    Rigid,
    Flexible,
    Mix,
}

#[derive(Subcommand)]
pub enum SettingsAction {
    /// Print the current settings
    Show,
    /// Switch color theme (light, dark, low-stimulation)
    Theme {
        theme: Theme,
    },
    /// Toggle spoken reminders, or set them with --enabled
    Voice {
        #[arg(long)]
        enabled: Option<bool>,
    },
    /// Save onboarding answers
    Onboard {
        #[arg(long, value_enum)]
        reminder: ReminderArg,
        #[arg(long, value_enum)]
        goal: GoalArg,
        #[arg(long, value_enum)]
        style: StyleArg,
    },
    /// Unlock premium routines
    Upgrade,
    /// Restore default settings
    Reset,
}

fn answers(reminder: ReminderArg, goal: GoalArg, style: StyleArg) -> OnboardingAnswers {
    OnboardingAnswers {
        reminder_preference: match reminder {
            ReminderArg::Voice => ReminderPreference::Voice,
            ReminderArg::Visual => ReminderPreference::Visual,
        },
        primary_goal: match goal {
            GoalArg::Focus => PrimaryGoal::Focus,
            GoalArg::Routines => PrimaryGoal::Routines,
            GoalArg::Distractions => PrimaryGoal::Distractions,
        },
        routine_style: match style {
            StyleArg::Rigid => RoutineStyle::Rigid,
            StyleArg::Flexible => RoutineStyle::Flexible,
            StyleArg::Mix => RoutineStyle::Mix,
        },
    }
}

pub fn run(action: SettingsAction) -> Result<(), Box<dyn std::error::Error>> {
    let db = Database::open()?;
    let mut store = SettingsStore::load(&db)?;

    match action {
        SettingsAction::Show => {
            print_json(&store.settings)?;
            return Ok(());
        }
        SettingsAction::Theme { theme } => {
            store.set_theme(theme);
            println!("ok");
        }
        SettingsAction::Voice { enabled } => {
            let on = match enabled {
                Some(on) => {
                    store.update(UserSettingsPatch {
                        voice_reminders: Some(on),
                        ..Default::default()
                    });
                    on
                }
                None => store.toggle_voice_reminders(),
            };
            println!("voice reminders {}", if on { "on" } else { "off" });
        }
        SettingsAction::Onboard {
            reminder,
            goal,
            style,
        } => {
            store.complete_onboarding(answers(reminder, goal, style));
            println!("onboarding complete");
        }
        SettingsAction::Upgrade => {
            store.upgrade_account();
            println!("premium routines unlocked");
        }
        SettingsAction::Reset => {
            store.reset();
            println!("settings reset to defaults");
        }
    }
    store.save(&db)?;
    Ok(())
}
