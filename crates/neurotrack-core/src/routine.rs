//! Routines: named, reusable ordered lists of task templates.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::task::{Task, TaskDraft};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Routine {
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub is_premium: bool,
    #[serde(default)]
    pub tasks: Vec<Task>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RoutineDraft {
    pub name: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub is_premium: bool,
    #[serde(default)]
    pub tasks: Vec<TaskDraft>,
}

/// Partial update for a routine's own fields; tasks have their own
/// operations.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RoutinePatch {
    pub name: Option<String>,
    pub description: Option<String>,
    pub is_premium: Option<bool>,
}

impl Routine {
    pub fn apply(&mut self, patch: RoutinePatch) {
        if let Some(name) = patch.name {
            self.name = name;
        }
        if let Some(description) = patch.description {
            self.description = description;
        }
        if let Some(premium) = patch.is_premium {
            self.is_premium = premium;
        }
    }

    /// Tasks in execution order.
    pub fn ordered_tasks(&self) -> Vec<&Task> {
        crate::order::sorted(&self.tasks)
    }

    pub fn total_duration_min(&self) -> u32 {
        self.tasks.iter().map(|t| t.duration_min).sum()
    }

    /// Copy with a new id, " (Copy)" appended to the name, and fresh
    /// task ids of the form `{new_id}-{order}`. Completion is cleared.
    pub fn duplicate(&self, new_id: &str) -> Routine {
        Routine {
            id: new_id.to_string(),
            name: format!("{} (Copy)", self.name),
            description: self.description.clone(),
            is_premium: self.is_premium,
            tasks: self
                .tasks
                .iter()
                .map(|task| Task {
                    id: format!("{new_id}-{}", task.order),
                    completed: false,
                    ..task.clone()
                })
                .collect(),
        }
    }

    /// Same routine with its task list emptied.
    pub fn without_tasks(&self) -> Routine {
        Routine {
            tasks: Vec::new(),
            ..self.clone()
        }
    }
}

type Template = (&'static str, u32, &'static str, &'static str);

fn build(
    id: &str,
    name: &str,
    description: &str,
    is_premium: bool,
    tasks: &[Template],
    at: DateTime<Utc>,
) -> Routine {
    Routine {
        id: id.to_string(),
        name: name.to_string(),
        description: description.to_string(),
        is_premium,
        tasks: tasks
            .iter()
            .enumerate()
            .map(|(order, (task_name, duration, color, icon))| Task {
                id: format!("{id}-{}", order + 1),
                name: (*task_name).to_string(),
                duration_min: *duration,
                color_code: (*color).to_string(),
                icon: (*icon).to_string(),
                completed: false,
                scheduled_time: at,
                order,
            })
            .collect(),
    }
}

/// Routines every user starts with.
pub fn default_routines() -> Vec<Routine> {
    let now = Utc::now();
    vec![
        build(
            "1",
            "Morning Routine",
            "Start your day right with these steps",
            false,
            &[
                ("Wake up & hydrate", 5, "#10b981", "coffee"),
                ("Quick stretch", 10, "#8b5cf6", "activity"),
                ("Breakfast", 15, "#f59e0b", "utensils"),
                ("Plan your day", 10, "#0d9488", "list-checks"),
            ],
            now,
        ),
        build(
            "2",
            "Work Day",
            "Structured workflow for productive days",
            false,
            &[
                ("Email check", 15, "#0d9488", "mail"),
                ("Deep work session", 90, "#8b5cf6", "brain"),
                ("Lunch break", 30, "#f59e0b", "utensils"),
                ("Meeting prep", 15, "#ef4444", "clipboard-list"),
            ],
            now,
        ),
        build(
            "3",
            "Wind-down",
            "Evening routine to relax and prepare for tomorrow",
            false,
            &[
                ("Digital sunset", 10, "#8b5cf6", "sunset"),
                ("Light stretching", 15, "#10b981", "activity"),
                ("Journal", 10, "#0d9488", "book"),
                ("Set priorities for tomorrow", 5, "#f59e0b", "list-checks"),
            ],
            now,
        ),
    ]
}

/// Routines unlocked by a premium account.
pub fn premium_routines() -> Vec<Routine> {
    let now = Utc::now();
    vec![
        build(
            "4",
            "Study Session",
            "Optimized for focus and retention",
            true,
            &[
                ("Environment setup", 5, "#0d9488", "layout"),
                ("Quick review", 10, "#8b5cf6", "repeat"),
                ("Deep learning", 25, "#ef4444", "brain"),
                ("Take notes", 15, "#f59e0b", "pencil"),
            ],
            now,
        ),
        build(
            "5",
            "Sensory Reset",
            "For when you feel overwhelmed",
            true,
            &[
                ("Breathing exercise", 5, "#10b981", "wind"),
                ("Sensory break", 10, "#8b5cf6", "eye"),
                ("Hydrate", 5, "#0d9488", "droplets"),
                ("Gentle movement", 10, "#f59e0b", "activity"),
            ],
            now,
        ),
    ]
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::order::is_dense;

    #[test]
    fn builtin_routines_are_dense() {
        for routine in default_routines().iter().chain(premium_routines().iter()) {
            assert_eq!(routine.tasks.len(), 4, "{}", routine.name);
            assert!(is_dense(&routine.tasks), "{}", routine.name);
        }
        assert!(premium_routines().iter().all(|r| r.is_premium));
        assert!(default_routines().iter().all(|r| !r.is_premium));
    }

    #[test]
    fn duplicate_renames_and_reids() {
        let mut original = default_routines().remove(0);
        original.tasks[1].completed = true;
        let copy = original.duplicate("99");
        assert_eq!(copy.name, "Morning Routine (Copy)");
        assert_eq!(copy.tasks[1].id, "99-1");
        assert!(copy.tasks.iter().all(|t| !t.completed));
        assert_eq!(copy.total_duration_min(), original.total_duration_min());
    }
}
