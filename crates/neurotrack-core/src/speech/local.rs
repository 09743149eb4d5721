//! Local text-to-speech through a system command.

use super::SpeechBackend;
use crate::error::SpeechError;
use crate::storage::SpeechConfig;

/// Words per minute both `say` and `espeak` treat as normal speed.
const NORMAL_WPM: f64 = 175.0;

pub struct LocalSpeech {
    command: String,
    rate: f64,
}

fn default_command() -> &'static str {
    if cfg!(target_os = "macos") {
        "say"
    } else {
        "espeak"
    }
}

impl LocalSpeech {
    pub fn new(command: Option<String>, rate: f64) -> Self {
        Self {
            command: command.unwrap_or_else(|| default_command().to_string()),
            rate,
        }
    }

    pub fn from_config(config: &SpeechConfig) -> Self {
        Self::new(config.local_command.clone(), config.local_rate)
    }

    /// Program and arguments for speaking `text`.
    fn invocation(&self, text: &str) -> (String, Vec<String>) {
        let mut parts = self.command.split_whitespace().map(String::from);
        let program = parts.next().unwrap_or_else(|| default_command().to_string());
        let mut args: Vec<String> = parts.collect();
        let wpm = (NORMAL_WPM * self.rate).round().max(1.0) as u32;
        match program.as_str() {
            "say" => args.extend(["-r".to_string(), wpm.to_string()]),
            "espeak" | "espeak-ng" => args.extend(["-s".to_string(), wpm.to_string()]),
            _ => {}
        }
        args.push(text.to_string());
        (program, args)
    }
}

impl SpeechBackend for LocalSpeech {
    fn name(&self) -> &str {
        "local"
    }

    async fn speak(&self, text: &str) -> Result<(), SpeechError> {
        let (program, args) = self.invocation(text);
        let status = tokio::process::Command::new(&program)
            .args(&args)
            .status()
            .await
            .map_err(|e| SpeechError::Player {
                command: program.clone(),
                message: e.to_string(),
            })?;
        if !status.success() {
            return Err(SpeechError::Player {
                command: program,
                message: format!("exited with {status}"),
            });
        }
        Ok(())
    }
}
