//! Planner task commands.

use chrono::{DateTime, NaiveDate, Utc};
use clap::Subcommand;
use neurotrack_core::format::format_duration;
use neurotrack_core::storage::{Database, Persisted, TaskStore};
use neurotrack_core::task::{DEFAULT_COLOR, DEFAULT_ICON};
use neurotrack_core::{StoreError, Task, TaskDraft, TaskPatch};

use super::{local_clock, parse_time, print_json};

#[derive(Subcommand)]
pub enum TaskAction {
    /// Plan a new task
    Add {
        /// Task name
        name: String,
        /// Planned length in minutes
        #[arg(long, default_value = "25")]
        duration: u32,
        /// Start time (HH:MM today, or RFC 3339); defaults to now
        #[arg(long, value_parser = parse_time)]
        at: Option<DateTime<Utc>>,
        /// Hex color
        #[arg(long, default_value = DEFAULT_COLOR)]
        color: String,
        /// Icon name
        #[arg(long, default_value = DEFAULT_ICON)]
        icon: String,
    },
    /// List tasks by start time
    List {
        /// Only tasks on this local date (YYYY-MM-DD)
        #[arg(long)]
        date: Option<NaiveDate>,
        /// Output JSON
        #[arg(long)]
        json: bool,
    },
    /// Show task details
    Show {
        /// Task ID
        id: String,
    },
    /// Update a task
    Update {
        /// Task ID
        id: String,
        #[arg(long)]
        name: Option<String>,
        #[arg(long)]
        duration: Option<u32>,
        #[arg(long, value_parser = parse_time)]
        at: Option<DateTime<Utc>>,
        #[arg(long)]
        color: Option<String>,
        #[arg(long)]
        icon: Option<String>,
        #[arg(long)]
        completed: Option<bool>,
    },
    /// Delete a task
    Delete {
        /// Task ID
        id: String,
    },
    /// Mark a task complete
    Complete {
        /// Task ID
        id: String,
    },
    /// Move a task to a new start time
    Reschedule {
        /// Task ID
        id: String,
        /// New start time (HH:MM today, or RFC 3339)
        #[arg(value_parser = parse_time)]
        at: DateTime<Utc>,
    },
    /// Remove all completed tasks
    ClearCompleted,
}

fn print_line(task: &Task) {
    let mark = if task.completed { "x" } else { " " };
    println!(
        "[{mark}] {}-{}  {:<28} {:>7}  {}",
        local_clock(task.scheduled_time),
        local_clock(task.end_time()),
        task.name,
        format_duration(task.duration_min),
        task.id
    );
}

pub fn run(action: TaskAction) -> Result<(), Box<dyn std::error::Error>> {
    let db = Database::open()?;
    let mut store = TaskStore::load(&db)?;

    match action {
        TaskAction::Add {
            name,
            duration,
            at,
            color,
            icon,
        } => {
            let draft = TaskDraft {
                color_code: color,
                icon,
                ..TaskDraft::new(name, duration, at.unwrap_or_else(Utc::now))
            };
            let task = store.add(draft).clone();
            store.save(&db)?;
            println!("Task created: {}", task.id);
            print_json(&task)?;
        }
        TaskAction::List { date, json } => {
            let tasks = match date {
                Some(date) => store.for_day(date),
                None => store.list(),
            };
            if json {
                print_json(&tasks)?;
            } else if tasks.is_empty() {
                println!("No tasks planned.");
            } else {
                for task in tasks {
                    print_line(task);
                }
            }
        }
        TaskAction::Show { id } => {
            let task = store
                .get(&id)
                .ok_or_else(|| StoreError::TaskNotFound(id.clone()))?;
            print_json(task)?;
        }
        TaskAction::Update {
            id,
            name,
            duration,
            at,
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
                scheduled_time: at,
            };
            let task = store.update(&id, patch)?.clone();
            store.save(&db)?;
            print_json(&task)?;
        }
        TaskAction::Delete { id } => {
            let task = store.delete(&id)?;
            store.save(&db)?;
            println!("Task deleted: {}", task.id);
        }
        TaskAction::Complete { id } => {
            let task = store.complete(&id)?.clone();
            store.save(&db)?;
            println!("Task completed: {}", task.name);
        }
        TaskAction::Reschedule { id, at } => {
            let task = store.reschedule(&id, at)?.clone();
            store.save(&db)?;
            println!(
                "Task rescheduled: {} at {}",
                task.name,
                local_clock(task.scheduled_time)
            );
        }
        TaskAction::ClearCompleted => {
            let removed = store.clear_completed();
            store.save(&db)?;
            println!("Removed {removed} completed task(s)");
        }
    }
    Ok(())
}
