//! Integration tests for the timer engine and focus session policy.

use chrono::Utc;
use neurotrack_core::{
    Event, FocusSession, Phase, SideEffect, TaskDraft, TaskStore, TimerEngine, TimerSettings,
    TimerSettingsPatch, TimerState,
};

fn standard() -> TimerSettings {
    TimerSettings {
        focus_duration_min: 25,
        break_duration_min: 5,
    }
}

#[test]
fn test_focus_countdown_then_caller_starts_break() {
    let mut engine = TimerEngine::new(standard());
    engine.start("task-1", None);
    assert_eq!(engine.state(), TimerState::Focusing);
    assert_eq!(engine.remaining_secs(), 1500);

    let mut previous = engine.remaining_secs();
    let mut completions = 0;
    for _ in 0..1500 {
        if engine.tick().is_some() {
            completions += 1;
        }
        assert!(engine.remaining_secs() < previous);
        previous = engine.remaining_secs();
    }
    assert_eq!(engine.remaining_secs(), 0);
    assert_eq!(completions, 1);
    assert_eq!(engine.state(), TimerState::Focusing);

    engine.start_break();
    assert_eq!(engine.state(), TimerState::Break);
    assert_eq!(engine.remaining_secs(), 300);
}

#[test]
fn test_any_duration_reaches_exactly_zero() {
    for minutes in [1u32, 5, 17, 90] {
        let mut engine = TimerEngine::new(standard());
        engine.start("t", Some(minutes));
        for _ in 0..minutes * 60 {
            engine.tick();
        }
        assert_eq!(engine.remaining_secs(), 0, "{minutes} minutes");
        engine.tick();
        assert_eq!(engine.remaining_secs(), 0);
    }
}

#[test]
fn test_ticks_while_paused_are_ignored() {
    let mut engine = TimerEngine::new(standard());
    engine.start("t", None);
    for _ in 0..10 {
        engine.tick();
    }
    engine.pause();
    for _ in 0..500 {
        assert!(engine.tick().is_none());
    }
    engine.resume();
    assert_eq!(engine.remaining_secs(), 1490);
}

#[test]
fn test_pause_during_break_keeps_break_phase() {
    let mut engine = TimerEngine::new(standard());
    engine.start_break();
    engine.pause();
    assert_eq!(engine.state(), TimerState::Paused);
    assert_eq!(engine.phase(), Phase::Break);
    engine.resume();
    assert_eq!(engine.state(), TimerState::Break);
}

#[test]
fn test_settings_change_mid_break() {
    let mut engine = TimerEngine::new(standard());
    engine.start_break();
    engine.tick();
    let event = engine.update_settings(TimerSettingsPatch {
        break_duration_min: Some(15),
        ..Default::default()
    });
    assert_eq!(engine.remaining_secs(), 900);
    assert!(matches!(event, Event::SettingsUpdated { discarded_secs: 299, .. }));
}

#[test]
fn test_full_cycle_through_focus_session() {
    let mut tasks = TaskStore::default();
    let task = tasks.add(TaskDraft::new("Deep work", 2, Utc::now())).clone();
    let mut session = FocusSession::new(TimerSettings {
        focus_duration_min: 25,
        break_duration_min: 1,
    });

    session.begin(&task, false);
    assert_eq!(session.engine().remaining_secs(), 120);

    let mut effects = Vec::new();
    let mut ticks = 0;
    while session.engine().state() != TimerState::Idle {
        effects.extend(session.advance(&mut tasks, false).effects);
        ticks += 1;
        assert!(ticks <= 180, "session never finished");
    }

    assert_eq!(ticks, 180);
    assert!(tasks.get(&task.id).unwrap().completed);
    assert_eq!(
        effects,
        [
            SideEffect::Chime,
            SideEffect::PromptMood {
                task_id: task.id.clone()
            },
            SideEffect::Chime,
        ]
    );
    assert_eq!(session.engine().remaining_secs(), 1500);
}
