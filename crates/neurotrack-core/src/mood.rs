//! Mood and focus journal entries, plus the summaries the journal view
//! shows (average focus, most common distractions).

use std::collections::HashMap;

use chrono::{DateTime, Duration, Local, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

/// Self-reported focus, 1 (scattered) to 5 (locked in).
///
/// Out-of-range values are clamped rather than rejected.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(from = "u8", into = "u8")]
pub struct FocusLevel(u8);

impl FocusLevel {
    pub const MIN: u8 = 1;
    pub const MAX: u8 = 5;

    pub fn new(level: u8) -> Self {
        Self(level.clamp(Self::MIN, Self::MAX))
    }

    pub fn get(self) -> u8 {
        self.0
    }
}

impl From<u8> for FocusLevel {
    fn from(level: u8) -> Self {
        Self::new(level)
    }
}

impl From<FocusLevel> for u8 {
    fn from(level: FocusLevel) -> Self {
        level.0
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MoodEntry {
    pub id: String,
    pub timestamp: DateTime<Utc>,
    pub focus_level: FocusLevel,
    #[serde(default)]
    pub distractions: Vec<String>,
    #[serde(default)]
    pub notes: String,
    pub task_id: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MoodDraft {
    pub timestamp: DateTime<Utc>,
    pub focus_level: FocusLevel,
    #[serde(default)]
    pub distractions: Vec<String>,
    #[serde(default)]
    pub notes: String,
    pub task_id: String,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct MoodPatch {
    pub focus_level: Option<FocusLevel>,
    pub distractions: Option<Vec<String>>,
    pub notes: Option<String>,
}

/// Distraction choices offered after a focus session.
pub const DISTRACTIONS: &[&str] = &[
    "Phone",
    "Social media",
    "Noise",
    "Hunger",
    "Fatigue",
    "Racing thoughts",
    "Other people",
    "Email",
];

impl MoodEntry {
    pub fn from_draft(id: impl Into<String>, draft: MoodDraft) -> Self {
        Self {
            id: id.into(),
            timestamp: draft.timestamp,
            focus_level: draft.focus_level,
            distractions: draft.distractions,
            notes: draft.notes,
            task_id: draft.task_id,
        }
    }

    pub fn apply(&mut self, patch: MoodPatch) {
        if let Some(level) = patch.focus_level {
            self.focus_level = level;
        }
        if let Some(distractions) = patch.distractions {
            self.distractions = distractions;
        }
        if let Some(notes) = patch.notes {
            self.notes = notes;
        }
    }

    /// Calendar day of the entry in the local timezone.
    pub fn local_date(&self) -> NaiveDate {
        self.timestamp.with_timezone(&Local).date_naive()
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum MoodRange {
    #[default]
    All,
    /// Entries from the last seven local days.
    Week,
    Today,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum MoodSort {
    #[default]
    Newest,
    Oldest,
    /// Highest focus first.
    Focus,
}

/// Filter and sort entries the way the journal lists them.
pub fn select<'a>(
    entries: &'a [MoodEntry],
    range: MoodRange,
    sort: MoodSort,
    today: NaiveDate,
) -> Vec<&'a MoodEntry> {
    let week_start = today - Duration::days(7);
    let mut out: Vec<&MoodEntry> = entries
        .iter()
        .filter(|entry| match range {
            MoodRange::All => true,
            MoodRange::Week => entry.local_date() >= week_start,
            MoodRange::Today => entry.local_date() == today,
        })
        .collect();
    match sort {
        MoodSort::Newest => out.sort_by(|a, b| b.timestamp.cmp(&a.timestamp)),
        MoodSort::Oldest => out.sort_by(|a, b| a.timestamp.cmp(&b.timestamp)),
        MoodSort::Focus => out.sort_by(|a, b| b.focus_level.cmp(&a.focus_level)),
    }
    out
}

/// Mean focus level rounded to one decimal; 0.0 with no entries.
pub fn average_focus(entries: &[MoodEntry]) -> f64 {
    if entries.is_empty() {
        return 0.0;
    }
    let sum: u32 = entries.iter().map(|e| u32::from(e.focus_level.get())).sum();
    (f64::from(sum) / entries.len() as f64 * 10.0).round() / 10.0
}

/// Most frequent distractions, highest count first. Ties are broken by
/// name so the output is stable.
pub fn common_distractions(entries: &[MoodEntry], limit: usize) -> Vec<(String, usize)> {
    let mut counts: HashMap<&str, usize> = HashMap::new();
    for entry in entries {
        for d in &entry.distractions {
            *counts.entry(d.as_str()).or_default() += 1;
        }
    }
    let mut ranked: Vec<(String, usize)> = counts
        .into_iter()
        .map(|(name, count)| (name.to_string(), count))
        .collect();
    ranked.sort_by(|a, b| b.1.cmp(&a.1).then_with(|| a.0.cmp(&b.0)));
    ranked.truncate(limit);
    ranked
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn entry(id: &str, hours_ago: i64, level: u8, distractions: &[&str]) -> MoodEntry {
        MoodEntry {
            id: id.into(),
            timestamp: Utc::now() - Duration::hours(hours_ago),
            focus_level: FocusLevel::new(level),
            distractions: distractions.iter().map(|s| s.to_string()).collect(),
            notes: String::new(),
            task_id: "task-1".into(),
        }
    }

    #[test]
    fn focus_level_is_clamped() {
        assert_eq!(FocusLevel::new(0).get(), 1);
        assert_eq!(FocusLevel::new(9).get(), 5);
        let parsed: FocusLevel = serde_json::from_str("42").unwrap();
        assert_eq!(parsed.get(), 5);
    }

    #[test]
    fn average_rounds_to_one_decimal() {
        let entries = vec![entry("a", 1, 4, &[]), entry("b", 2, 5, &[]), entry("c", 3, 5, &[])];
        assert_eq!(average_focus(&entries), 4.7);
        assert_eq!(average_focus(&[]), 0.0);
    }

    #[test]
    fn distractions_ranked_by_count() {
        let entries = vec![
            entry("a", 1, 3, &["Phone", "Noise"]),
            entry("b", 2, 3, &["Phone"]),
            entry("c", 3, 3, &["Email", "Noise", "Phone"]),
            entry("d", 4, 3, &["Hunger"]),
        ];
        let top = common_distractions(&entries, 3);
        assert_eq!(
            top,
            vec![
                ("Phone".to_string(), 3),
                ("Noise".to_string(), 2),
                ("Email".to_string(), 1)
            ]
        );
    }

    #[test]
    fn select_filters_by_range_and_sorts() {
        let today = Local.with_ymd_and_hms(2026, 5, 10, 12, 0, 0).unwrap();
        let at = |days: i64| (today - Duration::days(days)).with_timezone(&Utc);
        let mk = |id: &str, ts: DateTime<Utc>, level: u8| MoodEntry {
            timestamp: ts,
            ..entry(id, 0, level, &[])
        };
        let entries = vec![mk("old", at(30), 5), mk("week", at(3), 2), mk("now", at(0), 4)];
        let day = today.date_naive();

        let all = select(&entries, MoodRange::All, MoodSort::Oldest, day);
        assert_eq!(all.iter().map(|e| e.id.as_str()).collect::<Vec<_>>(), ["old", "week", "now"]);

        let week = select(&entries, MoodRange::Week, MoodSort::Newest, day);
        assert_eq!(week.iter().map(|e| e.id.as_str()).collect::<Vec<_>>(), ["now", "week"]);

        let today_only = select(&entries, MoodRange::Today, MoodSort::Newest, day);
        assert_eq!(today_only.len(), 1);

        let by_focus = select(&entries, MoodRange::All, MoodSort::Focus, day);
        assert_eq!(by_focus[0].id, "old");
    }
}
