//! Remote text-to-speech over HTTP (ElevenLabs-compatible API).

use std::path::PathBuf;

use reqwest::Client;
use serde_json::json;
use url::Url;

use super::SpeechBackend;
use crate::error::SpeechError;
use crate::storage::SpeechConfig;

const CLIP_NAME: &str = "announcement.mp3";

pub struct RemoteSpeech {
    client: Client,
    endpoint: Url,
    voice_id: String,
    model_id: String,
    stability: f64,
    similarity_boost: f64,
    api_key: String,
    player: Option<String>,
    clip_dir: PathBuf,
}

impl RemoteSpeech {
    /// Build a client from config. Clips are written into `clip_dir`.
    pub fn from_config(
        config: &SpeechConfig,
        api_key: String,
        clip_dir: PathBuf,
    ) -> Result<Self, SpeechError> {
        let mut endpoint =
            Url::parse(&config.endpoint).map_err(|e| SpeechError::NotConfigured {
                backend: "remote speech".into(),
                message: format!("invalid endpoint '{}': {e}", config.endpoint),
            })?;
        // Relative joins replace the last segment unless the base ends in '/'.
        if !endpoint.path().ends_with('/') {
            let path = format!("{}/", endpoint.path());
            endpoint.set_path(&path);
        }
        Ok(Self {
            client: Client::new(),
            endpoint,
            voice_id: config.voice_id.clone(),
            model_id: config.model_id.clone(),
            stability: config.stability,
            similarity_boost: config.similarity_boost,
            api_key,
            player: config.player.clone(),
            clip_dir,
        })
    }

    fn synthesis_url(&self) -> Result<Url, SpeechError> {
        self.endpoint
            .join(&format!("v1/text-to-speech/{}", self.voice_id))
            .map_err(|e| SpeechError::NotConfigured {
                backend: "remote speech".into(),
                message: e.to_string(),
            })
    }

    /// Request audio for `text`. Returns the encoded clip bytes.
    pub async fn synthesize(&self, text: &str) -> Result<Vec<u8>, SpeechError> {
        let body = json!({
            "text": text,
            "model_id": self.model_id,
            "voice_settings": {
                "stability": self.stability,
                "similarity_boost": self.similarity_boost,
            },
        });

        let resp = self
            .client
            .post(self.synthesis_url()?)
            .header("xi-api-key", &self.api_key)
            .json(&body)
            .send()
            .await?;

        let status = resp.status();
        if !status.is_success() {
            let body = resp.text().await.unwrap_or_default();
            return Err(SpeechError::Status {
                status: status.as_u16(),
                body,
            });
        }
        Ok(resp.bytes().await?.to_vec())
    }
}

impl SpeechBackend for RemoteSpeech {
    fn name(&self) -> &str {
        "remote"
    }

    async fn speak(&self, text: &str) -> Result<(), SpeechError> {
        let player = self
            .player
            .as_deref()
            .ok_or_else(|| SpeechError::NotConfigured {
                backend: "remote speech".into(),
                message: "no audio player set (speech.player)".into(),
            })?;

        let audio = self.synthesize(text).await?;
        tokio::fs::create_dir_all(&self.clip_dir).await?;
        let clip = self.clip_dir.join(CLIP_NAME);
        tokio::fs::write(&clip, &audio).await?;

        let mut parts = player.split_whitespace();
        let program = parts.next().unwrap_or(player);
        let status = tokio::process::Command::new(program)
            .args(parts)
            .arg(&clip)
            .status()
            .await
            .map_err(|e| SpeechError::Player {
                command: player.to_string(),
                message: e.to_string(),
            })?;
        if !status.success() {
            return Err(SpeechError::Player {
                command: player.to_string(),
                message: format!("exited with {status}"),
            });
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn client(server: &mockito::Server, player: Option<&str>) -> RemoteSpeech {
        let config = SpeechConfig {
            endpoint: server.url(),
            player: player.map(String::from),
            ..SpeechConfig::default()
        };
        RemoteSpeech::from_config(&config, "secret".into(), std::env::temp_dir()).unwrap()
    }

    #[tokio::test]
    async fn synthesize_posts_text_and_returns_audio() {
        let mut server = mockito::Server::new_async().await;
        let mock = server
            .mock("POST", "/v1/text-to-speech/EXAVITQu4vr4xnSDxMaL")
            .match_header("xi-api-key", "secret")
            .match_body(mockito::Matcher::PartialJson(json!({
                "text": "Time for a break",
                "model_id": "eleven_monolingual_v1",
            })))
            .with_status(200)
            .with_body(vec![1u8, 2, 3])
            .create_async()
            .await;

        let audio = client(&server, None).synthesize("Time for a break").await.unwrap();
        assert_eq!(audio, vec![1, 2, 3]);
        mock.assert_async().await;
    }

    #[tokio::test]
    async fn endpoint_path_prefix_is_kept() {
        let mut server = mockito::Server::new_async().await;
        let mock = server
            .mock("POST", "/tts/v1/text-to-speech/EXAVITQu4vr4xnSDxMaL")
            .with_status(200)
            .with_body(vec![7u8])
            .create_async()
            .await;

        let config = SpeechConfig {
            endpoint: format!("{}/tts", server.url()),
            ..SpeechConfig::default()
        };
        let remote =
            RemoteSpeech::from_config(&config, "secret".into(), std::env::temp_dir()).unwrap();
        assert_eq!(remote.synthesize("hi").await.unwrap(), vec![7]);
        mock.assert_async().await;
    }

    #[tokio::test]
    async fn error_status_is_reported() {
        let mut server = mockito::Server::new_async().await;
        let _mock = server
            .mock("POST", mockito::Matcher::Any)
            .with_status(401)
            .with_body("bad key")
            .create_async()
            .await;

        let err = client(&server, None).synthesize("hi").await.unwrap_err();
        match err {
            SpeechError::Status { status, body } => {
                assert_eq!(status, 401);
                assert_eq!(body, "bad key");
            }
            other => panic!("unexpected error {other:?}"),
        }
    }

    #[tokio::test]
    async fn speak_without_player_fails_before_request() {
        let mut server = mockito::Server::new_async().await;
        let mock = server
            .mock("POST", mockito::Matcher::Any)
            .expect(0)
            .create_async()
            .await;

        let err = client(&server, None).speak("hi").await.unwrap_err();
        assert!(matches!(err, SpeechError::NotConfigured { .. }));
        mock.assert_async().await;
    }

    #[test]
    fn invalid_endpoint_is_rejected() {
        let config = SpeechConfig {
            endpoint: "not a url".into(),
            ..SpeechConfig::default()
        };
        assert!(RemoteSpeech::from_config(&config, "k".into(), PathBuf::from(".")).is_err());
    }
}
