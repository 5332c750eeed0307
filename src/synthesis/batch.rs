/*!
 * Batch synthesis processing.
 *
 * Fans the script entries out to the synthesis engine with bounded
 * concurrency. A single failing entry never aborts the batch: its
 * outcome is recorded and the remaining entries proceed. The batch also
 * honors cooperative cancellation - no new requests are issued once the
 * cancel flag is set, while in-flight requests finish normally and keep
 * their results.
 */

use std::path::PathBuf;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};

use anyhow::Result;
use futures::stream::{self, StreamExt};
use log::{debug, warn};
use tokio::sync::Semaphore;

use crate::errors::SynthesisError;
use crate::file_utils::FileManager;
use crate::script_processor::ScriptEntry;
use crate::timecode;

use super::cache::SynthesisCache;
use super::{SpeechSynthesizer, SynthesisRequest, VoiceSettings};

/// Where to place synthesized WAV files
#[derive(Debug, Clone)]
pub struct BatchOutput {
    /// Target directory
    pub dir: PathBuf,
    /// Frame rate used to derive timecode filenames
    pub frame_rate: f64,
}

impl BatchOutput {
    /// Timecode-derived WAV path for one entry
    pub fn wav_path(&self, entry: &ScriptEntry) -> PathBuf {
        self.dir
            .join(format!("{}.wav", timecode::ms_to_filename_tc(entry.start_ms, self.frame_rate)))
    }
}

/// Outcome of synthesizing one entry
#[derive(Debug)]
pub enum EntryOutcome {
    /// Fresh audio from the engine
    Synthesized {
        duration_secs: f64,
        wav_path: Option<PathBuf>,
    },

    /// A non-empty WAV already existed for this entry and was reused
    ReusedExisting {
        duration_secs: f64,
        wav_path: PathBuf,
    },

    /// The entry has no narration, so there is nothing to speak
    NoNarration,

    /// The engine failed for this entry after retries
    Failed { error: SynthesisError },

    /// The batch was cancelled before this entry was issued
    Cancelled,
}

impl EntryOutcome {
    /// Actual audio duration, when one is known.
    ///
    /// Entries without narration report zero seconds: no audio exists, so
    /// nothing can overlap the next entry.
    pub fn duration_secs(&self) -> Option<f64> {
        match self {
            EntryOutcome::Synthesized { duration_secs, .. } => Some(*duration_secs),
            EntryOutcome::ReusedExisting { duration_secs, .. } => Some(*duration_secs),
            EntryOutcome::NoNarration => Some(0.0),
            EntryOutcome::Failed { .. } | EntryOutcome::Cancelled => None,
        }
    }

    pub fn is_success(&self) -> bool {
        !matches!(self, EntryOutcome::Failed { .. } | EntryOutcome::Cancelled)
    }
}

/// Result of a whole batch, in entry order
#[derive(Debug)]
pub struct BatchOutcome {
    /// Per-entry outcomes aligned with the input entry order
    pub outcomes: Vec<EntryOutcome>,

    /// Whether cancellation was requested during the run
    pub cancelled: bool,
}

impl BatchOutcome {
    /// Actual durations aligned with the input entries, for the verifier
    pub fn durations(&self) -> Vec<Option<f64>> {
        self.outcomes.iter().map(|outcome| outcome.duration_secs()).collect()
    }

    pub fn success_count(&self) -> usize {
        self.outcomes.iter().filter(|o| o.is_success()).count()
    }

    pub fn failure_count(&self) -> usize {
        self.outcomes
            .iter()
            .filter(|o| matches!(o, EntryOutcome::Failed { .. }))
            .count()
    }
}

/// Batch synthesizer for processing script entries concurrently
pub struct BatchSynthesizer {
    /// The synthesis engine to use
    synthesizer: Arc<dyn SpeechSynthesizer>,

    /// Reuse of identical narration within the batch
    cache: SynthesisCache,

    /// Maximum number of concurrent requests
    max_concurrent_requests: usize,

    /// Reuse existing non-empty WAV files instead of re-synthesizing
    skip_existing: bool,

    /// Cooperative cancellation flag shared with the caller
    cancel: Arc<AtomicBool>,
}

impl BatchSynthesizer {
    /// Create a new batch synthesizer
    pub fn new(synthesizer: Arc<dyn SpeechSynthesizer>, max_concurrent_requests: usize) -> Self {
        Self {
            synthesizer,
            cache: SynthesisCache::default(),
            max_concurrent_requests: max_concurrent_requests.max(1),
            skip_existing: true,
            cancel: Arc::new(AtomicBool::new(false)),
        }
    }

    /// Control reuse of WAV files already present in the output directory
    pub fn with_skip_existing(mut self, skip_existing: bool) -> Self {
        self.skip_existing = skip_existing;
        self
    }

    /// Handle the caller can set from another task to stop the batch
    pub fn cancel_handle(&self) -> Arc<AtomicBool> {
        self.cancel.clone()
    }

    /// Request cooperative cancellation
    pub fn request_cancel(&self) {
        self.cancel.store(true, Ordering::SeqCst);
    }

    /// Synthesize a batch of entries, returning per-entry outcomes in
    /// entry order.
    ///
    /// The progress callback receives (completed, total) after each entry
    /// settles.
    pub async fn synthesize_entries(
        &self,
        entries: &[ScriptEntry],
        voice: &VoiceSettings,
        output: Option<&BatchOutput>,
        progress_callback: impl Fn(usize, usize) + Clone + Send + 'static,
    ) -> Result<BatchOutcome> {
        if let Some(output) = output {
            FileManager::ensure_dir(&output.dir)?;
        }

        let semaphore = Arc::new(Semaphore::new(self.max_concurrent_requests));
        let total = entries.len();
        let completed = Arc::new(AtomicUsize::new(0));

        let results = stream::iter(entries.iter().enumerate())
            .map(|(index, entry)| {
                let synthesizer = self.synthesizer.clone();
                let cache = self.cache.clone();
                let semaphore = semaphore.clone();
                let cancel = self.cancel.clone();
                let completed = completed.clone();
                let progress_callback = progress_callback.clone();
                let voice = voice.clone();
                let wav_path = output.map(|o| o.wav_path(entry));
                let skip_existing = self.skip_existing;

                async move {
                    // Bound concurrency; the semaphore lives for the whole batch
                    let _permit = semaphore.acquire().await.expect("semaphore never closed");

                    let outcome = if cancel.load(Ordering::SeqCst) {
                        EntryOutcome::Cancelled
                    } else {
                        synthesize_one(
                            synthesizer.as_ref(),
                            &cache,
                            entry,
                            &voice,
                            wav_path,
                            skip_existing,
                        )
                        .await
                    };

                    let current = completed.fetch_add(1, Ordering::SeqCst) + 1;
                    progress_callback(current, total);

                    (index, outcome)
                }
            })
            .buffer_unordered(self.max_concurrent_requests)
            .collect::<Vec<_>>()
            .await;

        // Restore original entry order
        let mut sorted_results = results;
        sorted_results.sort_by_key(|(index, _)| *index);

        let outcomes: Vec<EntryOutcome> =
            sorted_results.into_iter().map(|(_, outcome)| outcome).collect();

        let failures = outcomes
            .iter()
            .filter(|o| matches!(o, EntryOutcome::Failed { .. }))
            .count();
        if failures > 0 {
            warn!("{} of {} entries failed to synthesize", failures, total);
        }

        Ok(BatchOutcome {
            outcomes,
            cancelled: self.cancel.load(Ordering::SeqCst),
        })
    }
}

/// Synthesize a single entry, preferring existing files and cached audio
/// over fresh API calls.
async fn synthesize_one(
    synthesizer: &dyn SpeechSynthesizer,
    cache: &SynthesisCache,
    entry: &ScriptEntry,
    voice: &VoiceSettings,
    wav_path: Option<PathBuf>,
    skip_existing: bool,
) -> EntryOutcome {
    if entry.is_instruction_only() {
        debug!("Entry {} has no narration, skipping synthesis", entry.seq_num);
        return EntryOutcome::NoNarration;
    }

    // Reuse a WAV from an earlier run when permitted
    if skip_existing {
        if let Some(path) = &wav_path {
            if let Ok(duration_secs) = FileManager::wav_duration_secs(path) {
                debug!("Entry {} reuses existing file {:?}", entry.seq_num, path);
                return EntryOutcome::ReusedExisting {
                    duration_secs,
                    wav_path: path.clone(),
                };
            }
        }
    }

    let audio = match cache.get(&entry.narration, voice) {
        Some(cached) => cached,
        None => {
            let request = SynthesisRequest {
                text: entry.narration.clone(),
                voice: voice.clone(),
            };

            match synthesizer.synthesize(&request).await {
                Ok(audio) => {
                    cache.store(&entry.narration, voice, &audio);
                    audio
                },
                Err(error) => return EntryOutcome::Failed { error },
            }
        },
    };

    if let Some(path) = &wav_path {
        if let Err(e) = FileManager::write_bytes_atomic(path, &audio.audio) {
            return EntryOutcome::Failed {
                error: SynthesisError::Transport(format!(
                    "failed to write audio file {:?}: {}",
                    path, e
                )),
            };
        }
    }

    EntryOutcome::Synthesized {
        duration_secs: audio.duration_secs,
        wav_path,
    }
}
