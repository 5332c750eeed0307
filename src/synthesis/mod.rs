/*!
 * Speech synthesis for script narration.
 *
 * This module contains the synthesis service boundary and its
 * implementations:
 *
 * - `clova`: CLOVA Voice premium API client
 * - `mock`: deterministic fake engine for tests
 * - `batch`: bounded-concurrency fan-out over script entries
 * - `cache`: reuse of already synthesized narration
 */

// Re-export main types for easier usage
pub use self::batch::{BatchOutcome, BatchOutput, BatchSynthesizer, EntryOutcome};
pub use self::cache::SynthesisCache;
pub use self::clova::ClovaClient;
pub use self::mock::{MockBehavior, MockSynthesizer};

// Submodules
pub mod batch;
pub mod cache;
pub mod clova;
pub mod mock;

use std::fmt::Debug;

use async_trait::async_trait;
use bytes::Bytes;

use crate::app_config::VoiceConfig;
use crate::errors::SynthesisError;

/// Voice parameters sent with every synthesis request.
///
/// Speed, pitch and volume are clamped to the service's documented
/// -5..=5 range on construction.
#[derive(Debug, Clone, PartialEq)]
pub struct VoiceSettings {
    /// Speaker voice identifier
    pub speaker: String,
    /// Speech speed (-5 slowest .. 5 fastest)
    pub speed: i8,
    /// Voice pitch (-5 .. 5)
    pub pitch: i8,
    /// Output volume (-5 .. 5)
    pub volume: i8,
}

impl VoiceSettings {
    pub fn new(speaker: impl Into<String>, speed: i8, pitch: i8, volume: i8) -> Self {
        Self {
            speaker: speaker.into(),
            speed: speed.clamp(-5, 5),
            pitch: pitch.clamp(-5, 5),
            volume: volume.clamp(-5, 5),
        }
    }
}

impl From<&VoiceConfig> for VoiceSettings {
    fn from(config: &VoiceConfig) -> Self {
        Self::new(config.speaker.clone(), config.speed, config.pitch, config.volume)
    }
}

/// A synthesis request: the narration text plus voice parameters
#[derive(Debug, Clone)]
pub struct SynthesisRequest {
    /// Text to speak
    pub text: String,
    /// Voice parameters
    pub voice: VoiceSettings,
}

/// Synthesized audio returned by an engine
#[derive(Debug, Clone)]
pub struct SynthesizedAudio {
    /// Encoded audio payload (WAV)
    pub audio: Bytes,
    /// Playback duration in seconds
    pub duration_secs: f64,
}

/// Common trait for all speech synthesis engines
///
/// The batch layer and the verifier only ever see this boundary, so the
/// whole pipeline can run against a deterministic fake.
#[async_trait]
pub trait SpeechSynthesizer: Send + Sync + Debug {
    /// Synthesize one narration text into audio
    ///
    /// # Arguments
    /// * `request` - The text and voice parameters to synthesize
    ///
    /// # Returns
    /// * `Result<SynthesizedAudio, SynthesisError>` - Audio plus duration, or a typed error
    async fn synthesize(&self, request: &SynthesisRequest) -> Result<SynthesizedAudio, SynthesisError>;

    /// Test the connection to the synthesis service
    ///
    /// # Returns
    /// * `Result<(), SynthesisError>` - Ok if the service is reachable and credentials work
    async fn test_connection(&self) -> Result<(), SynthesisError>;
}

/// Decode the duration of a WAV payload in seconds
pub fn wav_duration_secs(audio: &[u8]) -> Result<f64, SynthesisError> {
    let reader = hound::WavReader::new(std::io::Cursor::new(audio))
        .map_err(|e| SynthesisError::Decode(e.to_string()))?;
    let spec = reader.spec();
    if spec.sample_rate == 0 {
        return Err(SynthesisError::Decode("WAV reports zero sample rate".to_string()));
    }
    Ok(reader.duration() as f64 / spec.sample_rate as f64)
}
