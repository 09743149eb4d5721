//! In-memory state containers with an explicit load/save boundary.
//!
//! A store is loaded as a snapshot from the kv table, mutated in memory,
//! and saved back wholesale. There is no merging: the last save wins.

use chrono::{DateTime, Local, NaiveDate, Utc};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::Database;
use crate::error::{CoreError, StoreError};
use crate::mood::{self, MoodDraft, MoodEntry, MoodPatch, MoodRange, MoodSort};
use crate::order::{self, Moved};
use crate::routine::{self, Routine, RoutineDraft, RoutinePatch};
use crate::settings::{OnboardingAnswers, Theme, UserSettings, UserSettingsPatch};
use crate::task::{Task, TaskDraft, TaskPatch};

fn new_id(prefix: &str) -> String {
    format!("{prefix}-{}", Uuid::new_v4())
}

/// A store persisted as one JSON blob under [`Persisted::KEY`].
pub trait Persisted: Serialize + DeserializeOwned + Default {
    const KEY: &'static str;

    /// Repair hook run after every load.
    fn after_load(&mut self) {}

    /// Load the snapshot, or the default when nothing was saved yet.
    fn load(db: &Database) -> Result<Self, CoreError> {
        match db.kv_get(Self::KEY)? {
            Some(json) => {
                let mut store: Self = serde_json::from_str(&json)?;
                store.after_load();
                Ok(store)
            }
            None => Ok(Self::default()),
        }
    }

    fn save(&self, db: &Database) -> Result<(), CoreError> {
        let json = serde_json::to_string(self)?;
        db.kv_set(Self::KEY, &json)?;
        tracing::debug!(key = Self::KEY, bytes = json.len(), "store saved");
        Ok(())
    }
}

// ── Tasks ────────────────────────────────────────────────────────────

/// Daily planner tasks, placed by scheduled time.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct TaskStore {
    #[serde(default)]
    pub tasks: Vec<Task>,
}

impl Persisted for TaskStore {
    const KEY: &'static str = "neurotrack-tasks";
}

impl TaskStore {
    pub fn add(&mut self, draft: TaskDraft) -> &Task {
        let task = Task::from_draft(new_id("task"), draft);
        tracing::debug!(id = %task.id, name = %task.name, "task added");
        self.tasks.push(task);
        &self.tasks[self.tasks.len() - 1]
    }

    pub fn get(&self, id: &str) -> Option<&Task> {
        self.tasks.iter().find(|t| t.id == id)
    }

    fn get_mut(&mut self, id: &str) -> Result<&mut Task, StoreError> {
        self.tasks
            .iter_mut()
            .find(|t| t.id == id)
            .ok_or_else(|| StoreError::TaskNotFound(id.to_string()))
    }

    pub fn update(&mut self, id: &str, patch: TaskPatch) -> Result<&Task, StoreError> {
        let task = self.get_mut(id)?;
        task.apply(patch);
        Ok(task)
    }

    pub fn delete(&mut self, id: &str) -> Result<Task, StoreError> {
        let idx = self
            .tasks
            .iter()
            .position(|t| t.id == id)
            .ok_or_else(|| StoreError::TaskNotFound(id.to_string()))?;
        Ok(self.tasks.remove(idx))
    }

    pub fn complete(&mut self, id: &str) -> Result<&Task, StoreError> {
        let task = self.get_mut(id)?;
        task.completed = true;
        Ok(task)
    }

    pub fn reschedule(&mut self, id: &str, at: DateTime<Utc>) -> Result<&Task, StoreError> {
        let task = self.get_mut(id)?;
        task.scheduled_time = at;
        Ok(task)
    }

    /// Drop completed tasks. Returns how many were removed.
    pub fn clear_completed(&mut self) -> usize {
        let before = self.tasks.len();
        self.tasks.retain(|t| !t.completed);
        before - self.tasks.len()
    }

    /// All tasks by scheduled time.
    pub fn list(&self) -> Vec<&Task> {
        let mut out: Vec<&Task> = self.tasks.iter().collect();
        out.sort_by_key(|t| t.scheduled_time);
        out
    }

    /// Tasks scheduled on a local calendar day, by time.
    pub fn for_day(&self, date: NaiveDate) -> Vec<&Task> {
        self.list()
            .into_iter()
            .filter(|t| t.scheduled_time.with_timezone(&Local).date_naive() == date)
            .collect()
    }
}

// ── Routines ─────────────────────────────────────────────────────────

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct RoutineStore {
    #[serde(default)]
    pub routines: Vec<Routine>,
}

impl Persisted for RoutineStore {
    const KEY: &'static str = "neurotrack-routines";

    fn after_load(&mut self) {
        for routine in &mut self.routines {
            if order::normalize(&mut routine.tasks) {
                tracing::warn!(routine = %routine.id, "repaired task order");
            }
        }
    }
}

impl RoutineStore {
    /// Replace everything with the built-in routines.
    pub fn initialize(&mut self) {
        self.routines = routine::default_routines();
    }

    pub fn get(&self, id: &str) -> Option<&Routine> {
        self.routines.iter().find(|r| r.id == id)
    }

    fn get_mut(&mut self, id: &str) -> Result<&mut Routine, StoreError> {
        self.routines
            .iter_mut()
            .find(|r| r.id == id)
            .ok_or_else(|| StoreError::RoutineNotFound(id.to_string()))
    }

    pub fn add(&mut self, draft: RoutineDraft) -> &Routine {
        let id = new_id("routine");
        let mut tasks: Vec<Task> = draft
            .tasks
            .into_iter()
            .map(|t| Task::from_draft(new_id("task"), t))
            .collect();
        order::normalize(&mut tasks);
        self.routines.push(Routine {
            id,
            name: draft.name,
            description: draft.description,
            is_premium: draft.is_premium,
            tasks,
        });
        &self.routines[self.routines.len() - 1]
    }

    pub fn update(&mut self, id: &str, patch: RoutinePatch) -> Result<&Routine, StoreError> {
        let routine = self.get_mut(id)?;
        routine.apply(patch);
        Ok(routine)
    }

    pub fn delete(&mut self, id: &str) -> Result<Routine, StoreError> {
        let idx = self
            .routines
            .iter()
            .position(|r| r.id == id)
            .ok_or_else(|| StoreError::RoutineNotFound(id.to_string()))?;
        Ok(self.routines.remove(idx))
    }

    pub fn duplicate(&mut self, id: &str) -> Result<&Routine, StoreError> {
        let source = self
            .get(id)
            .ok_or_else(|| StoreError::RoutineNotFound(id.to_string()))?;
        let copy = source.duplicate(&Uuid::new_v4().to_string());
        self.routines.push(copy);
        Ok(&self.routines[self.routines.len() - 1])
    }

    /// Add a task at `position` (or the end). Later tasks shift down.
    pub fn add_task(
        &mut self,
        routine_id: &str,
        draft: TaskDraft,
        position: Option<usize>,
    ) -> Result<&Task, StoreError> {
        let routine = self.get_mut(routine_id)?;
        let task = Task::from_draft(new_id("task"), draft);
        let id = task.id.clone();
        order::insert(&mut routine.tasks, task, position);
        routine
            .tasks
            .iter()
            .find(|t| t.id == id)
            .ok_or(StoreError::TaskNotFound(id))
    }

    pub fn update_task(
        &mut self,
        routine_id: &str,
        task_id: &str,
        patch: TaskPatch,
    ) -> Result<&Task, StoreError> {
        let routine = self.get_mut(routine_id)?;
        let task = routine
            .tasks
            .iter_mut()
            .find(|t| t.id == task_id)
            .ok_or_else(|| StoreError::TaskNotFound(task_id.to_string()))?;
        task.apply(patch);
        Ok(task)
    }

    pub fn remove_task(&mut self, routine_id: &str, task_id: &str) -> Result<Task, StoreError> {
        let routine = self.get_mut(routine_id)?;
        Ok(order::remove(&mut routine.tasks, task_id)?)
    }

    pub fn move_task(
        &mut self,
        routine_id: &str,
        task_id: &str,
        new_order: usize,
    ) -> Result<Moved, StoreError> {
        let routine = self.get_mut(routine_id)?;
        let moved = order::move_to(&mut routine.tasks, task_id, new_order)?;
        tracing::debug!(routine = routine_id, task = task_id, from = moved.from, to = moved.to, "task moved");
        Ok(moved)
    }

    /// User routines followed by the premium catalogue. Without premium
    /// access the premium routines are listed with no tasks.
    pub fn all_routines(&self, include_premium: bool) -> Vec<Routine> {
        let premium = routine::premium_routines().into_iter().map(|r| {
            if include_premium {
                r
            } else {
                r.without_tasks()
            }
        });
        self.routines.iter().cloned().chain(premium).collect()
    }
}

// ── Mood ─────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct MoodStore {
    #[serde(default)]
    pub entries: Vec<MoodEntry>,
}

impl Persisted for MoodStore {
    const KEY: &'static str = "neurotrack-mood";
}

impl MoodStore {
    pub fn add(&mut self, draft: MoodDraft) -> &MoodEntry {
        self.entries.push(MoodEntry::from_draft(new_id("mood"), draft));
        &self.entries[self.entries.len() - 1]
    }

    pub fn delete(&mut self, id: &str) -> Result<MoodEntry, StoreError> {
        let idx = self
            .entries
            .iter()
            .position(|e| e.id == id)
            .ok_or_else(|| StoreError::EntryNotFound(id.to_string()))?;
        Ok(self.entries.remove(idx))
    }

    pub fn update(&mut self, id: &str, patch: MoodPatch) -> Result<&MoodEntry, StoreError> {
        let entry = self
            .entries
            .iter_mut()
            .find(|e| e.id == id)
            .ok_or_else(|| StoreError::EntryNotFound(id.to_string()))?;
        entry.apply(patch);
        Ok(entry)
    }

    /// Entries recorded on a local calendar day.
    pub fn entries_by_date(&self, date: NaiveDate) -> Vec<&MoodEntry> {
        self.entries.iter().filter(|e| e.local_date() == date).collect()
    }

    pub fn entries_by_task(&self, task_id: &str) -> Vec<&MoodEntry> {
        self.entries.iter().filter(|e| e.task_id == task_id).collect()
    }

    pub fn select(&self, range: MoodRange, sort: MoodSort) -> Vec<&MoodEntry> {
        mood::select(&self.entries, range, sort, Local::now().date_naive())
    }
}

// ── Settings ─────────────────────────────────────────────────────────

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SettingsStore {
    #[serde(default)]
    pub settings: UserSettings,
}

impl Persisted for SettingsStore {
    const KEY: &'static str = "neurotrack-settings";
}

impl SettingsStore {
    pub fn update(&mut self, patch: UserSettingsPatch) {
        self.settings.apply(patch);
    }

    pub fn set_theme(&mut self, theme: Theme) {
        self.settings.theme = theme;
    }

    /// Flip voice reminders, returning the new value.
    pub fn toggle_voice_reminders(&mut self) -> bool {
        self.settings.voice_reminders = !self.settings.voice_reminders;
        self.settings.voice_reminders
    }

    pub fn complete_onboarding(&mut self, answers: OnboardingAnswers) {
        self.settings.onboarding_completed = true;
        self.settings.onboarding_answers = Some(answers);
    }

    pub fn upgrade_account(&mut self) {
        self.settings.is_premium = true;
    }

    pub fn reset(&mut self) {
        self.settings = UserSettings::default();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::mood::FocusLevel;
    use crate::order::is_dense;
    use chrono::TimeZone;

    fn at(hour: u32) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2026, 4, 2, hour, 0, 0).unwrap()
    }

    #[test]
    fn task_store_crud() {
        let mut store = TaskStore::default();
        let late = store.add(TaskDraft::new("Late", 30, at(15))).id.clone();
        let early = store.add(TaskDraft::new("Early", 15, at(8))).id.clone();

        let names: Vec<_> = store.list().iter().map(|t| t.name.clone()).collect();
        assert_eq!(names, ["Early", "Late"]);

        store.complete(&early).unwrap();
        store.reschedule(&late, at(7)).unwrap();
        assert_eq!(store.list()[0].id, late);

        assert_eq!(store.clear_completed(), 1);
        assert!(store.get(&early).is_none());
        assert_eq!(
            store.delete("missing").unwrap_err(),
            StoreError::TaskNotFound("missing".into())
        );
    }

    #[test]
    fn routine_task_operations_keep_order_dense() {
        let mut store = RoutineStore::default();
        store.initialize();
        let routine_id = store.routines[0].id.clone();

        let added = store
            .add_task(&routine_id, TaskDraft::new("Meditate", 5, at(6)), Some(1))
            .unwrap()
            .id
            .clone();
        let routine = store.get(&routine_id).unwrap();
        assert_eq!(routine.tasks.len(), 5);
        assert_eq!(routine.ordered_tasks()[1].id, added);
        assert!(is_dense(&routine.tasks));

        store.move_task(&routine_id, &added, 4).unwrap();
        store.remove_task(&routine_id, "1-1").unwrap();
        let routine = store.get(&routine_id).unwrap();
        assert!(is_dense(&routine.tasks));
        assert_eq!(routine.ordered_tasks().last().unwrap().id, added);
    }

    #[test]
    fn routine_not_found_is_reported() {
        let mut store = RoutineStore::default();
        assert_eq!(
            store.move_task("nope", "t", 0).unwrap_err(),
            StoreError::RoutineNotFound("nope".into())
        );
        store.initialize();
        let err = store.move_task("1", "ghost", 0).unwrap_err();
        assert!(matches!(err, StoreError::Order(_)));
    }

    #[test]
    fn update_task_cannot_change_order() {
        let mut store = RoutineStore::default();
        store.initialize();
        let task = store
            .update_task("2", "2-2", TaskPatch {
                duration_min: Some(60),
                ..Default::default()
            })
            .unwrap();
        assert_eq!(task.duration_min, 60);
        assert_eq!(task.order, 1);
    }

    #[test]
    fn premium_routines_hidden_without_access() {
        let mut store = RoutineStore::default();
        store.initialize();
        let free = store.all_routines(false);
        assert_eq!(free.len(), 5);
        assert!(free.iter().filter(|r| r.is_premium).all(|r| r.tasks.is_empty()));
        let paid = store.all_routines(true);
        assert!(paid.iter().all(|r| r.tasks.len() == 4));
    }

    #[test]
    fn duplicate_routine_appends_copy() {
        let mut store = RoutineStore::default();
        store.initialize();
        let copy = store.duplicate("3").unwrap().clone();
        assert_eq!(copy.name, "Wind-down (Copy)");
        assert_eq!(store.routines.len(), 4);
        assert!(copy.tasks[0].id.starts_with(&copy.id));
    }

    #[test]
    fn mood_store_queries() {
        let mut store = MoodStore::default();
        let id = store
            .add(MoodDraft {
                timestamp: Utc::now(),
                focus_level: FocusLevel::new(4),
                distractions: vec!["Phone".into()],
                notes: String::new(),
                task_id: "task-1".into(),
            })
            .id
            .clone();
        assert_eq!(store.entries_by_task("task-1").len(), 1);
        assert_eq!(store.entries_by_date(Local::now().date_naive()).len(), 1);

        store
            .update(&id, MoodPatch {
                notes: Some("good session".into()),
                ..Default::default()
            })
            .unwrap();
        assert_eq!(store.entries[0].notes, "good session");
        store.delete(&id).unwrap();
        assert!(store.entries.is_empty());
    }

    #[test]
    fn settings_store_mutations() {
        let mut store = SettingsStore::default();
        assert!(store.toggle_voice_reminders());
        store.set_theme(Theme::Dark);
        store.upgrade_account();
        assert!(store.settings.is_premium);
        store.reset();
        assert_eq!(store.settings, UserSettings::default());
    }

    #[test]
    fn stores_roundtrip_through_database() {
        let db = Database::open_memory().unwrap();
        let mut tasks = TaskStore::load(&db).unwrap();
        assert!(tasks.tasks.is_empty());
        tasks.add(TaskDraft::new("Write", 45, at(10)));
        tasks.save(&db).unwrap();
        assert_eq!(TaskStore::load(&db).unwrap().tasks.len(), 1);
    }

    #[test]
    fn loading_repairs_gapped_routine_order() {
        let db = Database::open_memory().unwrap();
        let mut store = RoutineStore::default();
        store.initialize();
        store.routines[0].tasks[0].order = 10;
        store.save(&db).unwrap();
        let loaded = RoutineStore::load(&db).unwrap();
        assert!(is_dense(&loaded.routines[0].tasks));
        assert_eq!(loaded.routines[0].ordered_tasks()[3].id, "1-1");
    }
}
