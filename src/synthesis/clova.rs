use std::time::Duration;

use async_trait::async_trait;
use log::{debug, error};
use rand::Rng;
use reqwest::Client;

use crate::app_config::SynthesisConfig;
use crate::errors::SynthesisError;

use super::{SpeechSynthesizer, SynthesisRequest, SynthesizedAudio, wav_duration_secs};

/// CLOVA Voice client for the premium TTS endpoint
///
/// The service takes a form-encoded POST with the speaker and prosody
/// parameters and answers with encoded audio bytes. Retry with
/// exponential backoff and optional request pacing live here; callers
/// treat the client as an opaque synthesis function.
#[derive(Debug)]
pub struct ClovaClient {
    /// HTTP client for API requests
    client: Client,
    /// Endpoint URL
    endpoint: String,
    /// API gateway key id
    client_id: String,
    /// API gateway key secret
    client_secret: String,
    /// Maximum number of retry attempts
    max_retries: u32,
    /// Base backoff time in milliseconds for exponential backoff
    backoff_base_ms: u64,
    /// Requests per minute pacing (optional)
    rate_limit: Option<u32>,
}

impl ClovaClient {
    /// Create a new CLOVA client
    pub fn new(
        endpoint: impl Into<String>,
        client_id: impl Into<String>,
        client_secret: impl Into<String>,
    ) -> Self {
        Self {
            client: Client::builder()
                .timeout(Duration::from_secs(30))
                .build()
                .unwrap_or_default(),
            endpoint: endpoint.into(),
            client_id: client_id.into(),
            client_secret: client_secret.into(),
            max_retries: 3,
            backoff_base_ms: 1000,
            rate_limit: None,
        }
    }

    /// Create a new CLOVA client from the synthesis configuration
    pub fn from_config(config: &SynthesisConfig) -> Self {
        Self {
            client: Client::builder()
                .timeout(Duration::from_secs(config.timeout_secs))
                .pool_idle_timeout(Duration::from_secs(90))
                .tcp_keepalive(Duration::from_secs(60))
                .build()
                .unwrap_or_default(),
            endpoint: config.endpoint.clone(),
            client_id: config.client_id.clone(),
            client_secret: config.client_secret.clone(),
            max_retries: config.retry_count,
            backoff_base_ms: config.retry_backoff_ms,
            rate_limit: config.rate_limit,
        }
    }

    /// Issue one request attempt and classify the outcome
    async fn request_once(&self, request: &SynthesisRequest) -> Result<SynthesizedAudio, SynthesisError> {
        let form = [
            ("speaker", request.voice.speaker.clone()),
            ("text", request.text.clone()),
            ("volume", request.voice.volume.to_string()),
            ("speed", request.voice.speed.to_string()),
            ("pitch", request.voice.pitch.to_string()),
            ("format", "wav".to_string()),
        ];

        let response = self
            .client
            .post(&self.endpoint)
            .header("X-NCP-APIGW-API-KEY-ID", &self.client_id)
            .header("X-NCP-APIGW-API-KEY", &self.client_secret)
            .form(&form)
            .send()
            .await
            .map_err(|e| SynthesisError::Transport(e.to_string()))?;

        let status = response.status();
        if status.is_success() {
            let audio = response
                .bytes()
                .await
                .map_err(|e| SynthesisError::Transport(e.to_string()))?;
            let duration_secs = wav_duration_secs(&audio)?;
            return Ok(SynthesizedAudio { audio, duration_secs });
        }

        let body = response
            .text()
            .await
            .unwrap_or_else(|_| "Failed to get error response text".to_string());

        match status.as_u16() {
            401 | 403 => Err(SynthesisError::Auth(format!("{}: {}", status, body))),
            429 => Err(SynthesisError::Quota(format!("{}: {}", status, body))),
            code if status.is_server_error() => {
                Err(SynthesisError::Transport(format!("{}: {}", code, body)))
            },
            code => Err(SynthesisError::InvalidRequest(format!("{}: {}", code, body))),
        }
    }

    /// Pacing delay derived from the configured requests-per-minute budget
    fn pacing_delay(&self) -> Option<Duration> {
        self.rate_limit
            .filter(|limit| *limit > 0)
            .map(|limit| Duration::from_millis(60_000 / limit as u64))
    }
}

#[async_trait]
impl SpeechSynthesizer for ClovaClient {
    async fn synthesize(&self, request: &SynthesisRequest) -> Result<SynthesizedAudio, SynthesisError> {
        if self.client_id.is_empty() || self.client_secret.is_empty() {
            return Err(SynthesisError::Auth("API credentials are not configured".to_string()));
        }

        if let Some(delay) = self.pacing_delay() {
            tokio::time::sleep(delay).await;
        }

        let mut attempt = 0;
        let mut last_error: Option<SynthesisError> = None;

        while attempt <= self.max_retries {
            match self.request_once(request).await {
                Ok(audio) => {
                    debug!(
                        "Synthesized {} chars into {:.2}s of audio",
                        request.text.chars().count(),
                        audio.duration_secs
                    );
                    return Ok(audio);
                },
                Err(e) if e.is_retryable() => {
                    error!(
                        "Synthesis attempt {}/{} failed: {}",
                        attempt + 1,
                        self.max_retries + 1,
                        e
                    );
                    last_error = Some(e);
                },
                Err(e) => return Err(e),
            }

            attempt += 1;

            // Exponential backoff with jitter before the next attempt
            if attempt <= self.max_retries {
                let backoff_ms = self.backoff_base_ms * (1u64 << (attempt - 1));
                let jitter_ms = rand::rng().random_range(0..=250);
                tokio::time::sleep(Duration::from_millis(backoff_ms + jitter_ms)).await;
            }
        }

        Err(last_error.unwrap_or_else(|| {
            SynthesisError::Transport(format!(
                "synthesis failed after {} attempts",
                self.max_retries + 1
            ))
        }))
    }

    async fn test_connection(&self) -> Result<(), SynthesisError> {
        let probe = SynthesisRequest {
            text: "test".to_string(),
            voice: super::VoiceSettings::new("nara", 0, 0, 0),
        };

        self.request_once(&probe).await.map(|_| ())
    }
}
