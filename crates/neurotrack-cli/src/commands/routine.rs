//! Routine commands. Task positions are 0-based ranks.

use chrono::Utc;
use clap::Subcommand;
use neurotrack_core::format::format_duration;
use neurotrack_core::storage::{Database, Persisted, RoutineStore, SettingsStore};
use neurotrack_core::task::{DEFAULT_COLOR, DEFAULT_ICON};
use neurotrack_core::{Routine, RoutineDraft, RoutinePatch, StoreError, TaskDraft, TaskPatch};

use super::print_json;

#[derive(Subcommand)]
pub enum RoutineAction {
    /// Replace all routines with the built-in set
    Init,
    /// List routines, including the premium catalogue
    List {
        /// Output JSON
        #[arg(long)]
        json: bool,
    },
    /// Show a routine and its tasks in order
    Show {
        /// Routine ID
        id: String,
        /// Output JSON
        #[arg(long)]
        json: bool,
    },
    /// Create an empty routine
    Add {
        /// Routine name
        name: String,
        #[arg(long, default_value = "")]
        description: String,
    },
    /// Update routine details
    Update {
        /// Routine ID
        id: String,
        #[arg(long)]
        name: Option<String>,
        #[arg(long)]
        description: Option<String>,
    },
    /// Delete a routine
    Delete {
        /// Routine ID
        id: String,
    },
    /// Copy a routine with fresh task ids
    Duplicate {
        /// Routine ID
        id: String,
    },
    /// Add a task to a routine
    AddTask {
        /// Routine ID
        routine_id: String,
        /// Task name
        name: String,
        /// Length in minutes
        #[arg(long, default_value = "10")]
        duration: u32,
        /// Rank to insert at; appends when omitted
        #[arg(long)]
        position: Option<usize>,
        #[arg(long, default_value = DEFAULT_COLOR)]
        color: String,
        #[arg(long, default_value = DEFAULT_ICON)]
        icon: String,
    },
    /// Update a routine task
    UpdateTask {
        /// Routine ID
        routine_id: String,
        /// Task ID
        task_id: String,
        #[arg(long)]
        name: Option<String>,
        #[arg(long)]
        duration: Option<u32>,
        #[arg(long)]
        color: Option<String>,
        #[arg(long)]
        icon: Option<String>,
        #[arg(long)]
        completed: Option<bool>,
    },
    /// Remove a task from a routine
    RemoveTask {
        /// Routine ID
        routine_id: String,
        /// Task ID
        task_id: String,
    },
    /// Move a task to a new rank
    MoveTask {
        /// Routine ID
        routine_id: String,
        /// Task ID
        task_id: String,
        /// Target rank (clamped to the last position)
        position: usize,
    },
}

fn print_routine(routine: &Routine) {
    let premium = if routine.is_premium { " [premium]" } else { "" };
    println!(
        "{}{premium}  ({}, {})",
        routine.name,
        routine.id,
        format_duration(routine.total_duration_min())
    );
    if !routine.description.is_empty() {
        println!("  {}", routine.description);
    }
    for task in routine.ordered_tasks() {
        let mark = if task.completed { "x" } else { " " };
        println!(
            "  {}. [{mark}] {:<28} {:>7}  {}",
            task.order,
            task.name,
            format_duration(task.duration_min),
            task.id
        );
    }
}

pub fn run(action: RoutineAction) -> Result<(), Box<dyn std::error::Error>> {
    let db = Database::open()?;
    let mut store = RoutineStore::load(&db)?;

    match action {
        RoutineAction::Init => {
            store.initialize();
            store.save(&db)?;
            println!("Loaded {} built-in routines", store.routines.len());
        }
        RoutineAction::List { json } => {
            let premium = SettingsStore::load(&db)?.settings.is_premium;
            let routines = store.all_routines(premium);
            if json {
                print_json(&routines)?;
            } else {
                for routine in &routines {
                    let lock = if routine.is_premium && !premium {
                        "  (upgrade to unlock)"
                    } else {
                        ""
                    };
                    println!(
                        "{:<40} {:>2} tasks  {:>7}  {}{lock}",
                        routine.name,
                        routine.tasks.len(),
                        format_duration(routine.total_duration_min()),
                        routine.id
                    );
                }
            }
        }
        RoutineAction::Show { id, json } => {
            let premium = SettingsStore::load(&db)?.settings.is_premium;
            let routine = store
                .all_routines(premium)
                .into_iter()
                .find(|r| r.id == id)
                .ok_or(StoreError::RoutineNotFound(id))?;
            if json {
                print_json(&routine)?;
            } else {
                print_routine(&routine);
            }
        }
        RoutineAction::Add { name, description } => {
            let routine = store
                .add(RoutineDraft {
                    name,
                    description,
                    ..Default::default()
                })
                .clone();
            store.save(&db)?;
            println!("Routine created: {}", routine.id);
        }
        RoutineAction::Update {
            id,
            name,
            description,
        } => {
            let routine = store
                .update(
                    &id,
                    RoutinePatch {
                        name,
                        description,
                        is_premium: None,
                    },
                )?
                .clone();
            store.save(&db)?;
            print_routine(&routine);
        }
        RoutineAction::Delete { id } => {
            let routine = store.delete(&id)?;
            store.save(&db)?;
            println!("Routine deleted: {}", routine.name);
        }
        RoutineAction::Duplicate { id } => {
            let copy = store.duplicate(&id)?.clone();
            store.save(&db)?;
            println!("Routine created: {}", copy.id);
            print_routine(&copy);
        }
        RoutineAction::AddTask {
            routine_id,
            name,
            duration,
            position,
            color,
            icon,
        } => {
            let draft = TaskDraft {
                color_code: color,
                icon,
                ..TaskDraft::new(name, duration, Utc::now())
            };
            let task = store.add_task(&routine_id, draft, position)?.clone();
            store.save(&db)?;
            println!("Task added at position {}: {}", task.order, task.id);
        }
        RoutineAction::UpdateTask {
            routine_id,
            task_id,
            name,
            duration,
            color,
            icon,
            completed,
        } => {
            let patch = TaskPatch {
                name,
                duration_min: duration,
                color_code: color,
                icon,
                completed,
                scheduled_time: None,
            };
            let task = store.update_task(&routine_id, &task_id, patch)?.clone();
            store.save(&db)?;
            print_json(&task)?;
        }
        RoutineAction::RemoveTask {
            routine_id,
            task_id,
        } => {
            let task = store.remove_task(&routine_id, &task_id)?;
            store.save(&db)?;
            println!("Task removed: {}", task.name);
        }
        RoutineAction::MoveTask {
            routine_id,
            task_id,
            position,
        } => {
            let moved = store.move_task(&routine_id, &task_id, position)?;
            store.save(&db)?;
            println!("Moved {task_id} from {} to {}", moved.from, moved.to);
        }
    }
    Ok(())
}
