/*!
 * Duration and overlap verification.
 *
 * After synthesis, every entry's actual audio duration is checked against
 * the window the script timeline gives it: an entry's window ends where
 * the next entry begins. Audio running past that boundary is an overlap,
 * classified by configurable severity thresholds. Every overlap value is
 * reported in milliseconds, seconds and frames at once - editors work in
 * frames while engineers read milliseconds, and the report serves both.
 *
 * Verification consumes entries plus externally supplied durations and
 * produces a derived report; it never mutates the entries themselves.
 */

use std::fmt;

use chrono::Local;

use crate::app_config::VerifyConfig;
use crate::script_processor::ScriptEntry;
use crate::timecode;

/// One overlap value expressed in all reported units
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct OverlapMeasure {
    /// Signed overlap in milliseconds; negative means margin remains
    pub ms: i64,
    /// The same value in seconds
    pub seconds: f64,
    /// The same value as a rounded frame count at the report frame rate
    pub frames: i64,
}

impl OverlapMeasure {
    pub fn from_ms(ms: i64, frame_rate: f64) -> Self {
        Self {
            ms,
            seconds: ms as f64 / 1000.0,
            frames: timecode::ms_to_frames(ms, frame_rate),
        }
    }
}

impl fmt::Display for OverlapMeasure {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(
            f,
            "{} ms / {:.2} s / {} frames",
            self.ms, self.seconds, self.frames
        )
    }
}

/// Severity classification of one entry's timing
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SyncStatus {
    /// Audio fits inside its window
    Ok,
    /// Overlap within the configured minor threshold
    Minor,
    /// Overlap beyond the minor threshold
    Severe,
    /// No actual duration was available for this entry
    Unverified,
}

impl fmt::Display for SyncStatus {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        let label = match self {
            SyncStatus::Ok => "OK",
            SyncStatus::Minor => "MINOR",
            SyncStatus::Severe => "SEVERE",
            SyncStatus::Unverified => "UNVERIFIED",
        };
        write!(f, "{}", label)
    }
}

/// One report row per entry
#[derive(Debug, Clone)]
pub struct SyncRow {
    /// Entry sequence number
    pub seq_num: usize,
    /// Entry timecode for display
    pub timecode: String,
    /// Truncated narration for display
    pub narration_preview: String,
    /// Nominal start from the entry timecode
    pub nominal_start_ms: u64,
    /// Time until the next entry starts; None for the open-ended last entry
    pub nominal_duration_ms: Option<u64>,
    /// Synthesized audio duration; None when synthesis failed or is missing
    pub actual_duration_ms: Option<u64>,
    /// nominal start + actual duration
    pub actual_end_ms: Option<u64>,
    /// Overlap against the next entry's start, in all units
    pub overlap: Option<OverlapMeasure>,
    /// Severity classification
    pub status: SyncStatus,
}

/// Aggregated counts over a report
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SyncSummary {
    pub total: usize,
    pub ok: usize,
    pub minor: usize,
    pub severe: usize,
    pub unverified: usize,
    /// Sum of positive overlaps in milliseconds
    pub total_overrun_ms: i64,
}

impl SyncSummary {
    pub fn has_issues(&self) -> bool {
        self.minor > 0 || self.severe > 0 || self.unverified > 0
    }
}

/// Verification report over one ordered entry sequence
///
/// Rows are immutable once built; a new verification run produces a new
/// report.
#[derive(Debug)]
pub struct SyncReport {
    /// One row per entry, in entry order
    pub rows: Vec<SyncRow>,
    /// Frame rate the frame counts were computed at
    pub frame_rate: f64,
}

impl SyncReport {
    /// Build a report from ordered entries and their actual durations.
    ///
    /// `actual_durations` aligns with `entries` by index; a missing or
    /// absent value marks that entry UNVERIFIED without affecting its
    /// neighbors.
    pub fn build(
        entries: &[ScriptEntry],
        actual_durations: &[Option<f64>],
        frame_rate: f64,
        config: &VerifyConfig,
    ) -> Self {
        let mut rows = Vec::with_capacity(entries.len());

        for (index, entry) in entries.iter().enumerate() {
            let next_start_ms = entries.get(index + 1).map(|next| next.start_ms);
            let nominal_duration_ms =
                next_start_ms.map(|next| next.saturating_sub(entry.start_ms));

            let actual_secs = actual_durations.get(index).copied().flatten();
            let actual_duration_ms = actual_secs.map(|secs| (secs * 1000.0).round() as u64);
            let actual_end_ms = actual_duration_ms.map(|duration| entry.start_ms + duration);

            // Overlap exists only where a next entry bounds this one; the
            // last entry is open-ended and cannot overlap by definition
            let overlap = match (actual_end_ms, next_start_ms) {
                (Some(end), Some(next)) => {
                    Some(OverlapMeasure::from_ms(end as i64 - next as i64, frame_rate))
                },
                _ => None,
            };

            let status = match (actual_duration_ms, overlap) {
                (None, _) => SyncStatus::Unverified,
                (Some(_), None) => SyncStatus::Ok,
                (Some(_), Some(measure)) => classify_overlap(measure.ms, config),
            };

            rows.push(SyncRow {
                seq_num: entry.seq_num,
                timecode: entry.timecode.clone(),
                narration_preview: preview(&entry.narration),
                nominal_start_ms: entry.start_ms,
                nominal_duration_ms,
                actual_duration_ms,
                actual_end_ms,
                overlap,
                status,
            });
        }

        Self { rows, frame_rate }
    }

    /// Aggregate counts over the rows
    pub fn summary(&self) -> SyncSummary {
        let mut summary = SyncSummary {
            total: self.rows.len(),
            ok: 0,
            minor: 0,
            severe: 0,
            unverified: 0,
            total_overrun_ms: 0,
        };

        for row in &self.rows {
            match row.status {
                SyncStatus::Ok => summary.ok += 1,
                SyncStatus::Minor => summary.minor += 1,
                SyncStatus::Severe => summary.severe += 1,
                SyncStatus::Unverified => summary.unverified += 1,
            }
            if let Some(overlap) = row.overlap {
                if overlap.ms > 0 {
                    summary.total_overrun_ms += overlap.ms;
                }
            }
        }

        summary
    }

    /// Rows that need editorial attention
    pub fn issues(&self) -> Vec<&SyncRow> {
        self.rows
            .iter()
            .filter(|row| row.status != SyncStatus::Ok)
            .collect()
    }

    /// Render the human-readable report text
    pub fn render_text(&self) -> String {
        let summary = self.summary();
        let mut lines = vec![
            "=".repeat(50),
            "Narration timing report".to_string(),
            "=".repeat(50),
            String::new(),
            format!("Generated: {}", Local::now().format("%Y-%m-%d %H:%M:%S")),
            format!("Frame rate: {}", self.frame_rate),
            String::new(),
        ];

        let issues = self.issues();
        if issues.is_empty() {
            lines.push("All entries fit their windows".to_string());
            lines.push(String::new());
        } else {
            lines.push(format!("Entries needing attention: {}", issues.len()));
            lines.push(String::new());

            for row in issues {
                lines.push(format!("[{}] #{} {}", row.timecode, row.seq_num, row.status));
                lines.push(format!("  text: {}", row.narration_preview));
                match row.actual_duration_ms {
                    Some(actual) => {
                        lines.push(format!("  audio: {:.1}s", actual as f64 / 1000.0));
                        if let Some(window) = row.nominal_duration_ms {
                            lines.push(format!("  window: {:.1}s", window as f64 / 1000.0));
                        }
                        if let Some(overlap) = row.overlap {
                            if overlap.ms > 0 {
                                lines.push(format!("  overrun: {}", overlap));
                            } else {
                                lines.push(format!("  margin: {}", OverlapMeasure::from_ms(-overlap.ms, self.frame_rate)));
                            }
                        }
                    },
                    None => lines.push("  audio: missing".to_string()),
                }
                lines.push(String::new());
            }
        }

        lines.push("-".repeat(50));
        lines.push(format!("Total entries: {}", summary.total));
        lines.push(format!(
            "  OK: {}, minor: {}, severe: {}, unverified: {}",
            summary.ok, summary.minor, summary.severe, summary.unverified
        ));
        if summary.total_overrun_ms > 0 {
            lines.push(format!(
                "  Total overrun: {}",
                OverlapMeasure::from_ms(summary.total_overrun_ms, self.frame_rate)
            ));
        }
        lines.push("=".repeat(50));

        lines.join("\n")
    }
}

/// Classify a signed overlap value against the configured thresholds
fn classify_overlap(overlap_ms: i64, config: &VerifyConfig) -> SyncStatus {
    if overlap_ms <= 0 {
        SyncStatus::Ok
    } else if overlap_ms <= config.minor_threshold_ms as i64 {
        SyncStatus::Minor
    } else {
        SyncStatus::Severe
    }
}

/// Truncate narration for report display
fn preview(narration: &str) -> String {
    const MAX: usize = 50;
    if narration.chars().count() <= MAX {
        narration.to_string()
    } else {
        format!("{}...", narration.chars().take(MAX).collect::<String>())
    }
}
