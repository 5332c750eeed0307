use anyhow::{anyhow, Result};
use serde::{Deserialize, Serialize};
use std::default::Default;
use std::path::PathBuf;

/// Application configuration module
/// This module handles the application configuration including loading,
/// validating and saving configuration settings.
/// Represents the application configuration
#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct Config {
    /// Video frame rate used for timecode display and frame-count reporting
    #[serde(default = "default_frame_rate")]
    pub frame_rate: f64,

    /// Script extraction config
    #[serde(default)]
    pub extraction: ExtractionConfig,

    /// Speech synthesis config
    #[serde(default)]
    pub synthesis: SynthesisConfig,

    /// Duration verification config
    #[serde(default)]
    pub verify: VerifyConfig,

    /// SRT output config
    #[serde(default)]
    pub srt: SrtConfig,

    /// Log level
    #[serde(default)]
    pub log_level: LogLevel,
}

/// Configuration for the PDF layout extraction stage
///
/// All geometric thresholds are passed down explicitly so the extraction
/// components stay deterministic and unit-testable with varied values.
#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct ExtractionConfig {
    /// Maximum vertical distance between fragment tops that still joins
    /// them into one visual line. Clustering is transitive, so a chain of
    /// fragments each within the threshold forms a single line.
    #[serde(default = "default_y_line_threshold")]
    pub y_line_threshold: f64,

    /// Horizontal gap above which a space separator is inserted when
    /// concatenating fragments of one line
    #[serde(default = "default_x_gap_epsilon")]
    pub x_gap_epsilon: f64,

    /// Pattern a whole trimmed line must match to count as a timecode anchor
    #[serde(default = "default_anchor_pattern")]
    pub anchor_pattern: String,

    /// Opening delimiter of instruction spans
    #[serde(default = "default_bracket_open")]
    pub bracket_open: char,

    /// Closing delimiter of instruction spans
    #[serde(default = "default_bracket_close")]
    pub bracket_close: char,

    /// Replace '/' phrase separators with spaces in narration text
    #[serde(default = "default_true")]
    pub remove_slashes: bool,

    /// Replace '.' with spaces in narration text
    #[serde(default)]
    pub remove_periods: bool,

    /// Instruction keywords that are dropped from the instruction string
    /// (e.g. sound-effect cues that are not directorial notes)
    #[serde(default)]
    pub instruction_stop_words: Vec<String>,
}

impl Default for ExtractionConfig {
    fn default() -> Self {
        Self {
            y_line_threshold: default_y_line_threshold(),
            x_gap_epsilon: default_x_gap_epsilon(),
            anchor_pattern: default_anchor_pattern(),
            bracket_open: default_bracket_open(),
            bracket_close: default_bracket_close(),
            remove_slashes: default_true(),
            remove_periods: false,
            instruction_stop_words: Vec::new(),
        }
    }
}

/// Voice parameters for the synthesis service
///
/// Speed, pitch and volume are bounded to the service's documented
/// -5..=5 range; out-of-range values are clamped at use.
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct VoiceConfig {
    /// Speaker voice identifier
    #[serde(default = "default_speaker")]
    pub speaker: String,

    /// Speech speed (-5 slowest .. 5 fastest)
    #[serde(default)]
    pub speed: i8,

    /// Voice pitch (-5 .. 5)
    #[serde(default)]
    pub pitch: i8,

    /// Output volume (-5 .. 5)
    #[serde(default)]
    pub volume: i8,
}

impl Default for VoiceConfig {
    fn default() -> Self {
        Self {
            speaker: default_speaker(),
            speed: 0,
            pitch: 0,
            volume: 0,
        }
    }
}

/// Speech synthesis service configuration
#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct SynthesisConfig {
    /// Service endpoint URL
    #[serde(default = "default_synthesis_endpoint")]
    pub endpoint: String,

    // @field: API key id
    #[serde(default = "String::new")]
    pub client_id: String,

    // @field: API key secret
    #[serde(default = "String::new")]
    pub client_secret: String,

    /// Voice parameters
    #[serde(default)]
    pub voice: VoiceConfig,

    /// Request timeout in seconds
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,

    /// Retry count for failed requests
    #[serde(default = "default_retry_count")]
    pub retry_count: u32,

    /// Backoff multiplier for retries (in milliseconds)
    #[serde(default = "default_retry_backoff_ms")]
    pub retry_backoff_ms: u64,

    /// Rate limit in requests per minute (optional)
    ///
    /// Client-side pacing of requests to the synthesis service. None
    /// disables pacing and relies on the service's own limiter responses.
    #[serde(default = "default_rate_limit")]
    pub rate_limit: Option<u32>,

    /// Maximum number of concurrent requests
    #[serde(default = "default_concurrent_requests")]
    pub concurrent_requests: usize,

    /// Reuse an existing non-empty WAV file instead of calling the service
    #[serde(default = "default_true")]
    pub skip_existing: bool,
}

impl Default for SynthesisConfig {
    fn default() -> Self {
        Self {
            endpoint: default_synthesis_endpoint(),
            client_id: String::new(),
            client_secret: String::new(),
            voice: VoiceConfig::default(),
            timeout_secs: default_timeout_secs(),
            retry_count: default_retry_count(),
            retry_backoff_ms: default_retry_backoff_ms(),
            rate_limit: default_rate_limit(),
            concurrent_requests: default_concurrent_requests(),
            skip_existing: default_true(),
        }
    }
}

/// Thresholds for overlap severity classification
#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct VerifyConfig {
    /// Overlaps up to this many milliseconds are classified MINOR;
    /// anything beyond is SEVERE
    #[serde(default = "default_minor_threshold_ms")]
    pub minor_threshold_ms: u64,
}

impl Default for VerifyConfig {
    fn default() -> Self {
        Self {
            minor_threshold_ms: default_minor_threshold_ms(),
        }
    }
}

/// Configuration for SRT output
#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct SrtConfig {
    /// Maximum characters per rendered subtitle line
    #[serde(default = "default_max_chars_per_line")]
    pub max_chars_per_line: usize,

    /// Insert a line break after sentence-ending periods
    #[serde(default = "default_true")]
    pub break_on_period: bool,

    /// Display duration of the final entry, which has no successor to
    /// bound it
    #[serde(default = "default_tail_duration_ms")]
    pub default_tail_ms: u64,

    /// Prefix narration with the bracketed instruction text
    #[serde(default)]
    pub include_instructions: bool,
}

impl Default for SrtConfig {
    fn default() -> Self {
        Self {
            max_chars_per_line: default_max_chars_per_line(),
            break_on_period: default_true(),
            default_tail_ms: default_tail_duration_ms(),
            include_instructions: false,
        }
    }
}

/// Log verbosity level
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Default)]
#[serde(rename_all = "lowercase")]
pub enum LogLevel {
    Error,
    Warn,
    #[default]
    Info,
    Debug,
    Trace,
}

fn default_frame_rate() -> f64 {
    24.0
}

fn default_y_line_threshold() -> f64 {
    // Vertical clustering threshold in PDF user-space units. Changing this
    // changes which fragments merge into one line; 8.0 matches the printed
    // script layouts this tool is built for.
    8.0
}

fn default_x_gap_epsilon() -> f64 {
    1.0
}

fn default_anchor_pattern() -> String {
    // A line must be exactly four digits to anchor a region; embedded
    // digit runs (page numbers, codes) never qualify.
    r"^\d{4}$".to_string()
}

fn default_bracket_open() -> char {
    '('
}

fn default_bracket_close() -> char {
    ')'
}

fn default_speaker() -> String {
    "vdain".to_string()
}

fn default_synthesis_endpoint() -> String {
    "https://naveropenapi.apigw.ntruss.com/tts-premium/v1/tts".to_string()
}

fn default_timeout_secs() -> u64 {
    30
}

fn default_retry_count() -> u32 {
    3 // Default to 3 retries
}

fn default_retry_backoff_ms() -> u64 {
    1000 // 1 second base backoff time, doubled on each retry
}

fn default_rate_limit() -> Option<u32> {
    // The premium voice endpoint throttles aggressively; 200 requests per
    // minute keeps a safety margin below the observed limit.
    Some(200)
}

fn default_concurrent_requests() -> usize {
    4
}

fn default_minor_threshold_ms() -> u64 {
    500
}

fn default_max_chars_per_line() -> usize {
    40
}

fn default_tail_duration_ms() -> u64 {
    5000
}

fn default_true() -> bool {
    true
}

impl Config {
    /// Validate the configuration for consistency and required values
    pub fn validate(&self) -> Result<()> {
        if self.frame_rate <= 0.0 {
            return Err(anyhow!("Frame rate must be positive, got {}", self.frame_rate));
        }

        if self.extraction.y_line_threshold <= 0.0 {
            return Err(anyhow!(
                "Line clustering threshold must be positive, got {}",
                self.extraction.y_line_threshold
            ));
        }

        // The anchor pattern comes from user configuration; fail early on a
        // pattern the scanner could not compile
        regex::Regex::new(&self.extraction.anchor_pattern)
            .map_err(|e| anyhow!("Invalid anchor pattern '{}': {}", self.extraction.anchor_pattern, e))?;

        if !(-5..=5).contains(&self.synthesis.voice.speed)
            || !(-5..=5).contains(&self.synthesis.voice.pitch)
            || !(-5..=5).contains(&self.synthesis.voice.volume)
        {
            return Err(anyhow!("Voice speed/pitch/volume must be within -5..=5"));
        }

        if self.synthesis.concurrent_requests == 0 {
            return Err(anyhow!("Concurrent request count must be at least 1"));
        }

        Ok(())
    }

    /// Default location of the configuration file inside the user config dir
    pub fn default_path() -> PathBuf {
        dirs::config_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join("advox")
            .join("conf.json")
    }
}

/// Default implementation for Config
impl Default for Config {
    fn default() -> Self {
        Config {
            frame_rate: default_frame_rate(),
            extraction: ExtractionConfig::default(),
            synthesis: SynthesisConfig::default(),
            verify: VerifyConfig::default(),
            srt: SrtConfig::default(),
            log_level: LogLevel::default(),
        }
    }
}
