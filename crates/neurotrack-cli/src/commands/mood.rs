//! Mood journal commands.

use chrono::{Local, NaiveDate, Utc};
use clap::{Subcommand, ValueEnum};
use neurotrack_core::mood::{self, DISTRACTIONS};
use neurotrack_core::storage::{Database, MoodStore, Persisted};
use neurotrack_core::{FocusLevel, MoodDraft, MoodEntry, MoodPatch, MoodRange, MoodSort};

use super::{local_clock, print_json};

#[derive(Clone, Copy, ValueEnum)]
pub enum RangeArg {
    All,
    Week,
    Today,
}

impl From<RangeArg> for MoodRange {
    fn from(arg: RangeArg) -> Self {
        match arg {
            RangeArg::All => MoodRange::All,
            RangeArg::Week => MoodRange::Week,
            RangeArg::Today => MoodRange::Today,
        }
    }
}

#[derive(Clone, Copy, ValueEnum)]
pub enum SortArg {
    Newest,
    Oldest,
    Focus,
}

impl From<SortArg> for MoodSort {
    fn from(arg: SortArg) -> Self {
        match arg {
            SortArg::Newest => MoodSort::Newest,
            SortArg::Oldest => MoodSort::Oldest,
            SortArg::Focus => MoodSort::Focus,
        }
    }
}

#[derive(Subcommand)]
pub enum MoodAction {
    /// Record how a session went
    Add {
        /// Focus level 1-5 (out-of-range values are clamped)
        #[arg(long)]
        focus: u8,
        /// Task the entry belongs to
        #[arg(long, default_value = "")]
        task: String,
        /// Distraction (repeatable)
        #[arg(long = "distraction")]
        distractions: Vec<String>,
        #[arg(long, default_value = "")]
        notes: String,
    },
    /// List journal entries with a summary
    List {
        #[arg(long, value_enum, default_value = "all")]
        range: RangeArg,
        #[arg(long, value_enum, default_value = "newest")]
        sort: SortArg,
        /// Only entries for this task
        #[arg(long)]
        task: Option<String>,
        /// Only entries from this local date (YYYY-MM-DD)
        #[arg(long, conflicts_with = "task")]
        date: Option<NaiveDate>,
        /// Output JSON
        #[arg(long)]
        json: bool,
    },
    /// Delete an entry
    Delete {
        /// Entry ID
        id: String,
    },
    /// Update an entry
    Update {
        /// Entry ID
        id: String,
        #[arg(long)]
        focus: Option<u8>,
        /// Replaces the distraction list when given (repeatable)
        #[arg(long = "distraction")]
        distractions: Vec<String>,
        #[arg(long)]
        notes: Option<String>,
    },
    /// Print the suggested distraction labels
    Distractions,
}

pub fn run(action: MoodAction) -> Result<(), Box<dyn std::error::Error>> {
    let db = Database::open()?;
    let mut store = MoodStore::load(&db)?;

    match action {
        MoodAction::Add {
            focus,
            task,
            distractions,
            notes,
        } => {
            let entry = store
                .add(MoodDraft {
                    timestamp: Utc::now(),
                    focus_level: FocusLevel::new(focus),
                    distractions,
                    notes,
                    task_id: task,
                })
                .clone();
            store.save(&db)?;
            println!("Entry recorded: {}", entry.id);
            print_json(&entry)?;
        }
        MoodAction::List {
            range,
            sort,
            task,
            date,
            json,
        } => {
            let scoped = match (date, task.as_deref()) {
                (Some(date), _) => Some(store.entries_by_date(date)),
                (None, Some(task)) => Some(store.entries_by_task(task)),
                (None, None) => None,
            };
            let entries: Vec<MoodEntry> = match scoped {
                Some(scoped) => {
                    let scoped: Vec<MoodEntry> = scoped.into_iter().cloned().collect();
                    let today = Local::now().date_naive();
                    mood::select(&scoped, range.into(), sort.into(), today)
                        .into_iter()
                        .cloned()
                        .collect()
                }
                None => store
                    .select(range.into(), sort.into())
                    .into_iter()
                    .cloned()
                    .collect(),
            };
            if json {
                print_json(&entries)?;
                return Ok(());
            }
            if entries.is_empty() {
                println!("No entries.");
                return Ok(());
            }
            for entry in &entries {
                println!(
                    "{} {}  focus {}/5  {}  {}",
                    entry.local_date(),
                    local_clock(entry.timestamp),
                    entry.focus_level.get(),
                    entry.distractions.join(", "),
                    entry.id
                );
                if !entry.notes.is_empty() {
                    println!("    {}", entry.notes);
                }
            }
            println!();
            println!("Average focus: {:.1}", mood::average_focus(&entries));
            let common = mood::common_distractions(&entries, 3);
            if !common.is_empty() {
                let summary: Vec<String> = common
                    .iter()
                    .map(|(name, count)| format!("{name} ({count})"))
                    .collect();
                println!("Common distractions: {}", summary.join(", "));
            }
        }
        MoodAction::Delete { id } => {
            let entry = store.delete(&id)?;
            store.save(&db)?;
            println!("Entry deleted: {}", entry.id);
        }
        MoodAction::Update {
            id,
            focus,
            distractions,
            notes,
        } => {
            let patch = MoodPatch {
                focus_level: focus.map(FocusLevel::new),
                distractions: (!distractions.is_empty()).then_some(distractions),
                notes,
            };
            let entry = store.update(&id, patch)?.clone();
            store.save(&db)?;
            print_json(&entry)?;
        }
        MoodAction::Distractions => {
            for name in DISTRACTIONS {
                println!("{name}");
            }
        }
    }
    Ok(())
}
