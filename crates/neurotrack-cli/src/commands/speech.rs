use clap::Subcommand;
use neurotrack_core::speech::{credentials, Announcer, LocalSpeech, RemoteSpeech, Spoken};
use neurotrack_core::storage::data_dir;
use neurotrack_core::Config;

#[derive(Subcommand)]
pub enum SpeechAction {
    /// Speak a line through the configured backends
    Say {
        /// Text to speak
        text: String,
    },
    /// Store the remote speech API key in the OS keyring
    SetKey {
        /// API key
        key: String,
    },
    /// Remove the stored API key
    ClearKey,
}

/// Remote speech when an API key is available, local TTS as the fallback.
/// The keyring is not consulted while voice reminders are off.
pub fn announcer(
    config: &Config,
    enabled: bool,
) -> Result<Announcer<RemoteSpeech, LocalSpeech>, Box<dyn std::error::Error>> {
    let fallback = LocalSpeech::from_config(&config.speech);
    if !enabled {
        return Ok(Announcer::new(None, fallback, false));
    }
    let primary = match credentials::api_key() {
        Some(key) => match RemoteSpeech::from_config(&config.speech, key, data_dir()?) {
            Ok(remote) => Some(remote),
            Err(e) => {
                tracing::warn!(error = %e, "remote speech disabled");
                None
            }
        },
        None => None,
    };
    Ok(Announcer::new(primary, fallback, true))
}

pub fn run(action: SpeechAction) -> Result<(), Box<dyn std::error::Error>> {
    match action {
        SpeechAction::Say { text } => {
            let config = Config::load_or_default();
            let announcer = announcer(&config, true)?;
            let rt = tokio::runtime::Builder::new_current_thread()
                .enable_all()
                .build()?;
            let spoken = rt.block_on(announcer.announce(&text))?;
            match spoken {
                Spoken::Primary => println!("spoken (remote)"),
                Spoken::Fallback => println!("spoken (local)"),
                Spoken::Skipped => println!("skipped"),
            }
        }
        SpeechAction::SetKey { key } => {
            credentials::set(&key)?;
            println!("API key stored");
        }
        SpeechAction::ClearKey => {
            credentials::delete()?;
            println!("API key removed");
        }
    }
    Ok(())
}
