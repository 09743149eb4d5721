//! Task type shared by the daily planner and routine templates.
//!
//! Planner tasks are placed by `scheduled_time`. Routine tasks are placed
//! by `order` and go through [`crate::order`].

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::order::OrderedItem;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Task {
    pub id: String,
    pub name: String,
    /// Planned length in minutes; also the focus length when the task is
    /// started from the timer.
    pub duration_min: u32,
    pub color_code: String,
    pub icon: String,
    #[serde(default)]
    pub completed: bool,
    pub scheduled_time: DateTime<Utc>,
    #[serde(default)]
    pub order: usize,
}

/// Fields supplied when creating a task. The id and completion flag are
/// assigned by the store.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TaskDraft {
    pub name: String,
    pub duration_min: u32,
    pub color_code: String,
    pub icon: String,
    pub scheduled_time: DateTime<Utc>,
    #[serde(default)]
    pub order: usize,
}

/// Partial update for a task. Rank changes go through the reorder
/// operations, never through a patch.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct TaskPatch {
    pub name: Option<String>,
    pub duration_min: Option<u32>,
    pub color_code: Option<String>,
    pub icon: Option<String>,
    pub completed: Option<bool>,
    pub scheduled_time: Option<DateTime<Utc>>,
}

pub const DEFAULT_COLOR: &str = "#7c3aed";
pub const DEFAULT_ICON: &str = "check-circle";

impl TaskDraft {
    pub fn new(name: impl Into<String>, duration_min: u32, scheduled_time: DateTime<Utc>) -> Self {
        Self {
            name: name.into(),
            duration_min,
            color_code: DEFAULT_COLOR.to_string(),
            icon: DEFAULT_ICON.to_string(),
            scheduled_time,
            order: 0,
        }
    }
}

impl Task {
    pub fn from_draft(id: impl Into<String>, draft: TaskDraft) -> Self {
        Self {
            id: id.into(),
            name: draft.name,
            duration_min: draft.duration_min,
            color_code: draft.color_code,
            icon: draft.icon,
            completed: false,
            scheduled_time: draft.scheduled_time,
            order: draft.order,
        }
    }

    pub fn apply(&mut self, patch: TaskPatch) {
        if let Some(name) = patch.name {
            self.name = name;
        }
        if let Some(duration) = patch.duration_min {
            self.duration_min = duration;
        }
        if let Some(color) = patch.color_code {
            self.color_code = color;
        }
        if let Some(icon) = patch.icon {
            self.icon = icon;
        }
        if let Some(completed) = patch.completed {
            self.completed = completed;
        }
        if let Some(time) = patch.scheduled_time {
            self.scheduled_time = time;
        }
    }

    /// When the task is planned to finish.
    pub fn end_time(&self) -> DateTime<Utc> {
        self.scheduled_time + chrono::Duration::minutes(i64::from(self.duration_min))
    }
}

impl OrderedItem for Task {
    fn id(&self) -> &str {
        &self.id
    }

    fn order(&self) -> usize {
        self.order
    }

    fn set_order(&mut self, order: usize) {
        self.order = order;
    }
}
