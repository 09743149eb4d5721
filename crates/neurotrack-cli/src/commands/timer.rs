//! Timer commands.
//!
//! `timer run` owns the once-per-second trigger. Timer state lives only
//! for the lifetime of the process.

use std::io::{BufRead, Write};
use std::thread;
use std::time::Duration;

use clap::Subcommand;
use neurotrack_core::format::format_clock;
use neurotrack_core::speech::{Announcer, LocalSpeech, RemoteSpeech};
use neurotrack_core::storage::{
    Database, NotificationsConfig, Persisted, SettingsStore, TaskStore, BREAK_RANGE, FOCUS_RANGE,
};
use neurotrack_core::{
    Config, Event, FocusSession, Outcome, SideEffect, StoreError, Task, TimerEngine,
    TimerSettingsPatch, TimerState,
};
use tokio::sync::mpsc;
use tokio::time::MissedTickBehavior;

use super::print_json;

#[derive(Subcommand)]
pub enum TimerAction {
    /// Focus on a planned task, then take a break
    ///
    /// While running, type a command and press enter:
    /// p = pause, r = resume, s = stop, b = skip to break, q = quit
    Run {
        /// Task ID
        task_id: String,
        /// Override the task's planned minutes
        #[arg(long)]
        minutes: Option<u32>,
        /// Print events as JSON lines instead of a countdown
        #[arg(long)]
        json: bool,
    },
    /// Print the idle timer state for the configured durations
    Preview,
    /// Show or change focus and break lengths
    Settings {
        /// Focus length in minutes (5-90)
        #[arg(long)]
        focus: Option<u32>,
        /// Break length in minutes (1-30)
        #[arg(long = "break")]
        break_len: Option<u32>,
    },
}

pub fn run(action: TimerAction) -> Result<(), Box<dyn std::error::Error>> {
    match action {
        TimerAction::Run {
            task_id,
            minutes,
            json,
        } => run_session(task_id, minutes, json),
        TimerAction::Preview => {
            let config = Config::load_or_default();
            let engine = TimerEngine::new(config.timer.settings());
            print_json(&engine.snapshot())?;
            Ok(())
        }
        TimerAction::Settings { focus, break_len } => update_settings(focus, break_len),
    }
}

fn check_range(name: &str, value: u32, range: (u32, u32)) -> Result<u32, String> {
    if value < range.0 || value > range.1 {
        return Err(format!(
            "{name} must be between {} and {} minutes",
            range.0, range.1
        ));
    }
    Ok(value)
}

fn update_settings(
    focus: Option<u32>,
    break_len: Option<u32>,
) -> Result<(), Box<dyn std::error::Error>> {
    let mut config = Config::load()?;
    let patch = TimerSettingsPatch {
        focus_duration_min: focus
            .map(|v| check_range("focus", v, FOCUS_RANGE))
            .transpose()?,
        break_duration_min: break_len
            .map(|v| check_range("break", v, BREAK_RANGE))
            .transpose()?,
    };
    if let Some(v) = patch.focus_duration_min {
        config.timer.focus_duration = v;
    }
    if let Some(v) = patch.break_duration_min {
        config.timer.break_duration = v;
    }
    if focus.is_some() || break_len.is_some() {
        config.save()?;
    }
    print_json(&config.timer.settings())?;
    Ok(())
}

/// Forward stdin lines from a plain thread. A blocked read there does not
/// hold up runtime shutdown; the thread dies with the process.
fn spawn_stdin_reader() -> mpsc::UnboundedReceiver<String> {
    let (tx, rx) = mpsc::unbounded_channel();
    thread::spawn(move || {
        for line in std::io::stdin().lock().lines() {
            let Ok(line) = line else {
                break;
            };
            if tx.send(line).is_err() {
                break;
            }
        }
    });
    rx
}

struct Runner {
    session: FocusSession,
    tasks: TaskStore,
    db: Database,
    announcer: Announcer<RemoteSpeech, LocalSpeech>,
    notifications: NotificationsConfig,
    voice: bool,
    json: bool,
}

fn run_session(
    task_id: String,
    minutes: Option<u32>,
    json: bool,
) -> Result<(), Box<dyn std::error::Error>> {
    let db = Database::open()?;
    let config = Config::load_or_default();
    let tasks = TaskStore::load(&db)?;
    let voice = SettingsStore::load(&db)?.settings.voice_reminders;

    let mut task = tasks
        .get(&task_id)
        .cloned()
        .ok_or_else(|| StoreError::TaskNotFound(task_id.clone()))?;
    if let Some(minutes) = minutes {
        task.duration_min = minutes;
    }

    let mut runner = Runner {
        session: FocusSession::new(config.timer.settings()),
        tasks,
        db,
        announcer: super::speech::announcer(&config, voice)?,
        notifications: config.notifications,
        voice,
        json,
    };

    let rt = tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()?;
    rt.block_on(runner.focus_on(&task))
}

impl Runner {
    async fn focus_on(&mut self, task: &Task) -> Result<(), Box<dyn std::error::Error>> {
        let outcome = self.session.begin(task, self.voice);
        self.perform(outcome).await?;
        self.drive().await
    }

    async fn drive(&mut self) -> Result<(), Box<dyn std::error::Error>> {
        let mut ticker = tokio::time::interval(Duration::from_secs(1));
        ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);
        ticker.tick().await;

        let mut lines = spawn_stdin_reader();
        let mut stdin_open = true;

        loop {
            tokio::select! {
                _ = ticker.tick(), if self.session.engine().is_ticking() => {
                    let outcome = self.session.advance(&mut self.tasks, self.voice);
                    if outcome.effects.iter().any(|e| matches!(e, SideEffect::PromptMood { .. })) {
                        self.tasks.save(&self.db)?;
                    }
                    self.perform(outcome).await?;
                    self.render()?;
                }
                line = lines.recv(), if stdin_open => {
                    match line {
                        Some(cmd) => {
                            if !self.command(cmd.trim())? {
                                break;
                            }
                            if self.session.engine().is_ticking() {
                                ticker.reset();
                            }
                        }
                        None => stdin_open = false,
                    }
                }
                _ = tokio::signal::ctrl_c() => {
                    let event = self.session.engine_mut().stop();
                    self.emit(&event)?;
                    break;
                }
            }

            if self.session.engine().state() == TimerState::Idle {
                break;
            }
        }

        if !self.json {
            println!();
        }
        Ok(())
    }

    /// Apply one stdin command. Returns false to quit.
    fn command(&mut self, cmd: &str) -> Result<bool, Box<dyn std::error::Error>> {
        let engine = self.session.engine_mut();
        let event = match cmd {
            "p" | "pause" => engine.pause(),
            "r" | "resume" => engine.resume(),
            "s" | "stop" => Some(engine.stop()),
            "b" | "break" => Some(engine.start_break()),
            "q" | "quit" => {
                let event = engine.stop();
                self.emit(&event)?;
                return Ok(false);
            }
            "" => None,
            other => {
                eprintln!("unknown command '{other}' (p, r, s, b, q)");
                None
            }
        };
        if let Some(event) = event {
            self.emit(&event)?;
        }
        Ok(true)
    }

    async fn perform(&mut self, outcome: Outcome) -> Result<(), Box<dyn std::error::Error>> {
        for event in &outcome.events {
            self.emit(event)?;
        }
        for effect in outcome.effects {
            match effect {
                SideEffect::Chime => self.chime().await,
                SideEffect::Announce(text) => {
                    if let Err(e) = self.announcer.announce(&text).await {
                        tracing::warn!(error = %e, "announcement failed");
                    }
                }
                SideEffect::PromptMood { task_id } => {
                    if !self.json {
                        println!(
                            "\nHow did it go? neurotrack mood add --task {task_id} --focus <1-5>"
                        );
                    }
                }
            }
        }
        Ok(())
    }

    async fn chime(&self) {
        if !self.notifications.chime {
            return;
        }
        let Some(command) = self.notifications.chime_command.as_deref() else {
            eprint!("\x07");
            return;
        };
        let mut parts = command.split_whitespace();
        let Some(program) = parts.next() else {
            return;
        };
        let status = tokio::process::Command::new(program)
            .args(parts)
            .status()
            .await;
        if let Err(e) = status {
            tracing::warn!(command, error = %e, "chime command failed");
        }
    }

    fn emit(&self, event: &Event) -> Result<(), Box<dyn std::error::Error>> {
        if self.json {
            println!("{}", serde_json::to_string(event)?);
            return Ok(());
        }
        match event {
            Event::TimerStarted { duration_secs, .. } => {
                println!("Focus started ({})", format_clock(*duration_secs));
            }
            Event::TimerPaused { .. } => println!("\nPaused"),
            Event::TimerResumed { .. } => println!("Resumed"),
            Event::TimerStopped { .. } => println!("\nStopped"),
            Event::BreakStarted { duration_secs, .. } => {
                println!("\nBreak started ({})", format_clock(*duration_secs));
            }
            Event::TimerCompleted { phase, .. } => println!("\n{phase:?} complete"),
            Event::TimerReset { .. } => println!("Ready for the next session"),
            Event::SettingsUpdated { .. } | Event::StateSnapshot { .. } => {}
        }
        Ok(())
    }

    fn render(&self) -> Result<(), Box<dyn std::error::Error>> {
        if self.json {
            return Ok(());
        }
        let engine = self.session.engine();
        let label = match engine.state() {
            TimerState::Focusing => "Focus",
            TimerState::Break => "Break",
            TimerState::Paused => "Paused",
            TimerState::Idle => return Ok(()),
        };
        let mut out = std::io::stdout().lock();
        write!(out, "\r{label:<6} {}", format_clock(engine.remaining_secs()))?;
        out.flush()?;
        Ok(())
    }
}
