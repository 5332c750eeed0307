/*!
 * Mock synthesis engine for testing.
 *
 * This module provides a deterministic fake engine that simulates
 * different behaviors:
 * - `MockSynthesizer::working()` - Always succeeds with duration derived from text length
 * - `MockSynthesizer::failing()` - Always fails with a transport error
 * - `MockSynthesizer::intermittent(n)` - Fails every nth request
 * - `MockSynthesizer::fail_on_text(t)` - Fails only for a specific narration
 */

// Allow dead code - the mock engine is for test consumers
#![allow(dead_code)]

use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};

use async_trait::async_trait;
use bytes::Bytes;

use crate::errors::SynthesisError;

use super::{SpeechSynthesizer, SynthesisRequest, SynthesizedAudio};

/// Behavior mode for the mock synthesizer
#[derive(Debug, Clone, PartialEq)]
pub enum MockBehavior {
    /// Always succeeds with a deterministic duration
    Working,
    /// Fails intermittently (every Nth request)
    Intermittent { fail_every: usize },
    /// Fails only when the narration text matches exactly
    FailOnText { text: String },
    /// Always fails with a transport error
    Failing,
    /// Always fails with a quota error
    QuotaExhausted,
    /// Simulates a slow service (for cancellation testing)
    Slow { delay_ms: u64 },
}

/// Mock synthesis engine for testing batch behavior
///
/// Durations are derived from the character count at a fixed speaking
/// rate, so tests can predict overlap results exactly. The returned
/// payload is a real silent WAV of the advertised duration.
#[derive(Debug)]
pub struct MockSynthesizer {
    /// Behavior mode
    behavior: MockBehavior,
    /// Simulated speaking rate in characters per second
    chars_per_second: f64,
    /// Request counter for intermittent failures
    request_count: Arc<AtomicUsize>,
}

const MOCK_SAMPLE_RATE: u32 = 8_000;

impl MockSynthesizer {
    /// Create a new mock synthesizer with the specified behavior
    pub fn new(behavior: MockBehavior) -> Self {
        Self {
            behavior,
            chars_per_second: 10.0,
            request_count: Arc::new(AtomicUsize::new(0)),
        }
    }

    /// Create a working mock that always succeeds
    pub fn working() -> Self {
        Self::new(MockBehavior::Working)
    }

    /// Create a failing mock that always errors
    pub fn failing() -> Self {
        Self::new(MockBehavior::Failing)
    }

    /// Create an intermittently failing mock
    pub fn intermittent(fail_every: usize) -> Self {
        Self::new(MockBehavior::Intermittent { fail_every })
    }

    /// Create a mock that fails only for one specific narration text
    pub fn fail_on_text(text: impl Into<String>) -> Self {
        Self::new(MockBehavior::FailOnText { text: text.into() })
    }

    /// Override the simulated speaking rate
    pub fn with_chars_per_second(mut self, chars_per_second: f64) -> Self {
        self.chars_per_second = chars_per_second;
        self
    }

    /// Number of synthesize calls served so far
    pub fn call_count(&self) -> usize {
        self.request_count.load(Ordering::SeqCst)
    }

    /// Deterministic duration for a narration text
    pub fn expected_duration_secs(&self, text: &str) -> f64 {
        text.chars().count() as f64 / self.chars_per_second
    }

    /// Encode a silent WAV of the given duration
    fn silent_wav(duration_secs: f64) -> Bytes {
        let mut buffer = std::io::Cursor::new(Vec::new());
        let spec = hound::WavSpec {
            channels: 1,
            sample_rate: MOCK_SAMPLE_RATE,
            bits_per_sample: 16,
            sample_format: hound::SampleFormat::Int,
        };

        {
            let mut writer =
                hound::WavWriter::new(&mut buffer, spec).expect("in-memory WAV writer");
            let samples = (duration_secs * MOCK_SAMPLE_RATE as f64).round() as u64;
            for _ in 0..samples {
                writer.write_sample(0i16).expect("in-memory WAV sample");
            }
            writer.finalize().expect("in-memory WAV finalize");
        }

        Bytes::from(buffer.into_inner())
    }
}

#[async_trait]
impl SpeechSynthesizer for MockSynthesizer {
    async fn synthesize(&self, request: &SynthesisRequest) -> Result<SynthesizedAudio, SynthesisError> {
        let count = self.request_count.fetch_add(1, Ordering::SeqCst) + 1;

        match &self.behavior {
            MockBehavior::Working => {},
            MockBehavior::Failing => {
                return Err(SynthesisError::Transport("mock transport failure".to_string()));
            },
            MockBehavior::QuotaExhausted => {
                return Err(SynthesisError::Quota("mock quota exhausted".to_string()));
            },
            MockBehavior::Intermittent { fail_every } => {
                if *fail_every > 0 && count % fail_every == 0 {
                    return Err(SynthesisError::Transport(format!(
                        "mock intermittent failure on request {}",
                        count
                    )));
                }
            },
            MockBehavior::FailOnText { text } => {
                if request.text == *text {
                    return Err(SynthesisError::Transport(format!(
                        "mock failure for text: {}",
                        text
                    )));
                }
            },
            MockBehavior::Slow { delay_ms } => {
                tokio::time::sleep(std::time::Duration::from_millis(*delay_ms)).await;
            },
        }

        let duration_secs = self.expected_duration_secs(&request.text);
        Ok(SynthesizedAudio {
            audio: Self::silent_wav(duration_secs),
            duration_secs,
        })
    }

    async fn test_connection(&self) -> Result<(), SynthesisError> {
        match self.behavior {
            MockBehavior::Failing => {
                Err(SynthesisError::Transport("mock connection failure".to_string()))
            },
            _ => Ok(()),
        }
    }
}
