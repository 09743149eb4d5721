//! Spoken reminders.
//!
//! A remote text-to-speech service is tried first; on any failure the
//! local TTS command is tried before an error is reported. Speech never
//! touches timer or ordering state.

mod local;
mod remote;

pub use local::LocalSpeech;
pub use remote::RemoteSpeech;

use std::future::Future;

use crate::error::SpeechError;

/// Something that can say a line of text out loud.
pub trait SpeechBackend {
    fn name(&self) -> &str;

    fn speak(&self, text: &str) -> impl Future<Output = Result<(), SpeechError>> + Send;
}

/// Which path produced the audio.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Spoken {
    Primary,
    Fallback,
    /// Voice reminders are off.
    Skipped,
}

/// Applies the fallback policy over two backends.
pub struct Announcer<P, F> {
    primary: Option<P>,
    fallback: F,
    enabled: bool,
}

impl<P: SpeechBackend + Sync, F: SpeechBackend + Sync> Announcer<P, F> {
    /// `primary` is `None` when the remote service is not configured.
    pub fn new(primary: Option<P>, fallback: F, enabled: bool) -> Self {
        Self {
            primary,
            fallback,
            enabled,
        }
    }

    /// Speak `text`, falling back silently. Errors only when both paths fail.
    pub async fn announce(&self, text: &str) -> Result<Spoken, SpeechError> {
        if !self.enabled {
            return Ok(Spoken::Skipped);
        }

        let primary_error = match &self.primary {
            Some(primary) => match primary.speak(text).await {
                Ok(()) => return Ok(Spoken::Primary),
                Err(e) => {
                    tracing::debug!(backend = primary.name(), error = %e, "primary speech failed");
                    e.to_string()
                }
            },
            None => "not configured".to_string(),
        };

        match self.fallback.speak(text).await {
            Ok(()) => Ok(Spoken::Fallback),
            Err(e) => Err(SpeechError::AllBackendsFailed {
                primary: primary_error,
                fallback: e.to_string(),
            }),
        }
    }
}

/// Credential lookup for the remote speech service.
pub mod credentials {
    const SERVICE: &str = "neurotrack";
    const KEY: &str = "elevenlabs_api_key";
    pub const ENV_VAR: &str = "NEUROTRACK_ELEVENLABS_API_KEY";

    /// API key from the environment, then the OS keyring.
    pub fn api_key() -> Option<String> {
        if let Ok(key) = std::env::var(ENV_VAR) {
            if !key.is_empty() {
                return Some(key);
            }
        }
        match get() {
            Ok(key) => key,
            Err(e) => {
                tracing::warn!(error = %e, "keyring lookup failed");
                None
            }
        }
    }

    pub fn get() -> Result<Option<String>, keyring::Error> {
        let entry = keyring::Entry::new(SERVICE, KEY)?;
        match entry.get_password() {
            Ok(pw) => Ok(Some(pw)),
            Err(keyring::Error::NoEntry) => Ok(None),
            Err(e) => Err(e),
        }
    }

    pub fn set(value: &str) -> Result<(), keyring::Error> {
        let entry = keyring::Entry::new(SERVICE, KEY)?;
        entry.set_password(value)
    }

    pub fn delete() -> Result<(), keyring::Error> {
        let entry = keyring::Entry::new(SERVICE, KEY)?;
        match entry.delete_credential() {
            Ok(()) | Err(keyring::Error::NoEntry) => Ok(()),
            Err(e) => Err(e),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};

    struct Stub {
        ok: bool,
        calls: AtomicUsize,
    }

    impl Stub {
        fn new(ok: bool) -> Self {
            Self {
                ok,
                calls: AtomicUsize::new(0),
            }
        }
    }

    impl SpeechBackend for Stub {
        fn name(&self) -> &str {
            "stub"
        }

        async fn speak(&self, _text: &str) -> Result<(), SpeechError> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            if self.ok {
                Ok(())
            } else {
                Err(SpeechError::Status {
                    status: 500,
                    body: "boom".into(),
                })
            }
        }
    }

    #[tokio::test]
    async fn primary_success_skips_fallback() {
        let announcer = Announcer::new(Some(Stub::new(true)), Stub::new(true), true);
        assert_eq!(announcer.announce("hi").await.unwrap(), Spoken::Primary);
        assert_eq!(announcer.fallback.calls.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn primary_failure_falls_back() {
        let announcer = Announcer::new(Some(Stub::new(false)), Stub::new(true), true);
        assert_eq!(announcer.announce("hi").await.unwrap(), Spoken::Fallback);
    }

    #[tokio::test]
    async fn missing_primary_goes_straight_to_fallback() {
        let announcer: Announcer<Stub, Stub> = Announcer::new(None, Stub::new(true), true);
        assert_eq!(announcer.announce("hi").await.unwrap(), Spoken::Fallback);
    }

    #[tokio::test]
    async fn both_failing_is_reported() {
        let announcer = Announcer::new(Some(Stub::new(false)), Stub::new(false), true);
        let err = announcer.announce("hi").await.unwrap_err();
        assert!(matches!(err, SpeechError::AllBackendsFailed { .. }));
    }

    #[tokio::test]
    async fn disabled_does_nothing() {
        let announcer = Announcer::new(Some(Stub::new(true)), Stub::new(true), false);
        assert_eq!(announcer.announce("hi").await.unwrap(), Spoken::Skipped);
        assert_eq!(announcer.fallback.calls.load(Ordering::SeqCst), 0);
    }
}
