use anyhow::{Result, Context, anyhow};
use log::{error, warn, info, debug};
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::sync::atomic::Ordering;
use indicatif::{ProgressBar, ProgressStyle};

use crate::app_config::Config;
use crate::extraction::{self, PageSource, PdfTextSource};
use crate::file_utils::{FileManager, FileType};
use crate::script_processor::{self, ScriptCollection, ScriptEntry};
use crate::synthesis::{BatchOutput, BatchSynthesizer, ClovaClient, EntryOutcome, VoiceSettings};
use crate::timecode;
use crate::verify::SyncReport;

// @module: Application controller for the script pipeline

/// Main application controller for script conversion, synthesis and
/// timing verification
pub struct Controller {
    // @field: App configuration
    config: Config,
}

impl Controller {
    /// Create a new controller for test purposes with default configuration
    pub fn new_for_test() -> Result<Self> {
        Self::with_config(Config::default())
    }

    // @method: Create a new controller with the given configuration
    pub fn with_config(config: Config) -> Result<Self> {
        config.validate()?;
        Ok(Self { config })
    }

    /// Convert a printed script PDF into timed entries and write the
    /// script and SRT files next to it.
    pub async fn run_convert(
        &self,
        input_file: PathBuf,
        output_dir: PathBuf,
        force_overwrite: bool,
    ) -> Result<()> {
        let start_time = std::time::Instant::now();

        if !input_file.exists() {
            return Err(anyhow!("Input file does not exist: {:?}", input_file));
        }
        FileManager::ensure_dir(&output_dir)?;

        let script_path = FileManager::generate_output_path(&input_file, &output_dir, "txt");
        let srt_path = FileManager::generate_output_path(&input_file, &output_dir, "srt");
        if script_path.exists() && !force_overwrite {
            warn!("Skipping file, output already exists (use -f to force overwrite)");
            return Ok(());
        }

        let source = PdfTextSource::new(&input_file)?;
        let page_count = source.page_count().await.unwrap_or(0);
        info!("Reading {:?} ({} pages)", input_file, page_count);

        let fragments = source.read_fragments().await?;
        debug!("Page source delivered {} fragments", fragments.len());

        let fps = self.config.frame_rate;
        let report = extraction::extract_document(&fragments, &self.config.extraction, |raw| {
            timecode::convert_raw_timecode(raw, fps)
        })
        .context("Script extraction failed")?;

        for diagnostic in &report.diagnostics {
            warn!("{}", diagnostic);
        }
        info!(
            "Extracted {} entries with {} diagnostics in {:.1}s",
            report.entries.len(),
            report.diagnostics.len(),
            start_time.elapsed().as_secs_f64()
        );

        let collection = ScriptCollection::new(input_file, report.entries);
        collection.write_to_script(&script_path)?;
        collection.write_to_srt(&srt_path, &self.config.srt)?;
        info!("Wrote {:?} and {:?}", script_path, srt_path);

        Ok(())
    }

    /// Synthesize narration audio for every entry of a script or SRT
    /// file, then verify the synthesized durations against the timeline.
    pub async fn run_synthesize(&self, input_file: PathBuf, output_dir: PathBuf) -> Result<()> {
        let entries = self.load_entries(&input_file)?;
        info!("Loaded {} entries from {:?}", entries.len(), input_file);

        let synthesizer = Arc::new(ClovaClient::from_config(&self.config.synthesis));
        let batch = BatchSynthesizer::new(synthesizer, self.config.synthesis.concurrent_requests)
            .with_skip_existing(self.config.synthesis.skip_existing);

        // Ctrl-C stops issuing new requests; in-flight ones finish and the
        // partial report stays valid
        let cancel = batch.cancel_handle();
        tokio::spawn(async move {
            if tokio::signal::ctrl_c().await.is_ok() {
                warn!("Cancellation requested, letting in-flight requests finish");
                cancel.store(true, Ordering::SeqCst);
            }
        });

        let progress = ProgressBar::new(entries.len() as u64);
        progress.set_style(
            ProgressStyle::default_bar()
                .template("{spinner:.green} [{bar:40.cyan/blue}] {pos}/{len} {msg}")
                .unwrap_or_else(|_| ProgressStyle::default_bar())
                .progress_chars("#>-"),
        );

        let output = BatchOutput {
            dir: output_dir.clone(),
            frame_rate: self.config.frame_rate,
        };
        let voice = VoiceSettings::from(&self.config.synthesis.voice);

        let progress_for_callback = progress.clone();
        let outcome = batch
            .synthesize_entries(&entries, &voice, Some(&output), move |current, _total| {
                progress_for_callback.set_position(current as u64);
            })
            .await?;
        progress.finish_and_clear();

        for (entry, result) in entries.iter().zip(outcome.outcomes.iter()) {
            if let EntryOutcome::Failed { error } = result {
                error!("Entry {} [{}] failed: {}", entry.seq_num, entry.timecode, error);
            }
        }
        info!(
            "Synthesis finished: {} succeeded, {} failed{}",
            outcome.success_count(),
            outcome.failure_count(),
            if outcome.cancelled { " (cancelled)" } else { "" }
        );

        // Verification runs once every entry has a result or an explicit
        // failure marker
        let report = SyncReport::build(
            &entries,
            &outcome.durations(),
            self.config.frame_rate,
            &self.config.verify,
        );
        self.write_report(&report, &input_file, &output_dir)?;

        Ok(())
    }

    /// Verify previously synthesized WAV files against a script timeline
    pub async fn run_check(&self, input_file: PathBuf, wav_dir: PathBuf) -> Result<()> {
        let entries = self.load_entries(&input_file)?;
        if !FileManager::dir_exists(&wav_dir) {
            return Err(anyhow!("WAV directory does not exist: {:?}", wav_dir));
        }

        let wav_count = FileManager::find_files(&wav_dir, "wav")?.len();
        info!(
            "Checking {} entries against {} WAV files in {:?}",
            entries.len(),
            wav_count,
            wav_dir
        );

        let durations: Vec<Option<f64>> = entries
            .iter()
            .map(|entry| {
                let filename =
                    format!("{}.wav", timecode::ms_to_filename_tc(entry.start_ms, self.config.frame_rate));
                match FileManager::wav_duration_secs(wav_dir.join(&filename)) {
                    Ok(duration) => Some(duration),
                    Err(e) => {
                        debug!("Entry {}: {}", entry.seq_num, e);
                        None
                    },
                }
            })
            .collect();

        let report = SyncReport::build(
            &entries,
            &durations,
            self.config.frame_rate,
            &self.config.verify,
        );
        self.write_report(&report, &input_file, &wav_dir)?;

        Ok(())
    }

    /// Load entries from a script text file or an SRT file
    fn load_entries(&self, input_file: &Path) -> Result<Vec<ScriptEntry>> {
        let content = FileManager::read_to_string(input_file)?;

        match FileManager::detect_file_type(input_file)? {
            FileType::Script => {
                ScriptCollection::parse_script_string(&content, self.config.frame_rate)
                    .context("Failed to parse script file")
            },
            FileType::Subtitle => {
                let cues = script_processor::parse_srt_string(&content)
                    .context("Failed to parse subtitle file")?;
                Ok(cues
                    .into_iter()
                    .map(|cue| {
                        ScriptEntry::new(
                            cue.seq_num,
                            timecode::ms_to_timecode(cue.start_ms, self.config.frame_rate),
                            cue.start_ms,
                            "",
                            cue.text,
                        )
                    })
                    .collect())
            },
            FileType::Pdf => Err(anyhow!(
                "Expected a script or subtitle file; run convert on the PDF first: {:?}",
                input_file
            )),
            FileType::Unknown => Err(anyhow!("Unrecognized input file type: {:?}", input_file)),
        }
    }

    /// Render the timing report, log its summary and write it next to the
    /// audio output
    fn write_report(&self, report: &SyncReport, input_file: &Path, dir: &Path) -> Result<()> {
        let summary = report.summary();
        if summary.has_issues() {
            warn!(
                "Timing check: {} OK, {} minor, {} severe, {} unverified",
                summary.ok, summary.minor, summary.severe, summary.unverified
            );
        } else {
            info!("Timing check: all {} entries fit their windows", summary.total);
        }

        let report_path = FileManager::generate_output_path(input_file, dir, "report.txt");
        FileManager::write_to_file(&report_path, &report.render_text())?;
        info!("Wrote timing report to {:?}", report_path);

        Ok(())
    }
}
