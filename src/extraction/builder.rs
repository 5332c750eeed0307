/*!
 * Entry construction.
 *
 * Pairs each anchor with its region's classified content and emits the
 * final ordered entries. Timecode normalization is injected so the
 * builder carries no frame-rate knowledge of its own.
 */

use anyhow::Result;

use crate::app_config::ExtractionConfig;
use crate::script_processor::ScriptEntry;
use crate::timecode::NormalizedTimecode;

use super::classify::{classify_region, collapse_whitespace};
use super::model::{Anchor, Diagnostic, Region};

/// Build one entry per anchor, in anchor sequence order.
///
/// Entries are never reordered or merged afterwards. An anchor whose raw
/// timecode the injected converter rejects is excluded with an explicit
/// diagnostic rather than dropped silently.
pub fn build_entries<F>(
    anchors: &[Anchor],
    regions: &[Region],
    config: &ExtractionConfig,
    convert: F,
) -> (Vec<ScriptEntry>, Vec<Diagnostic>)
where
    F: Fn(&str) -> Result<NormalizedTimecode>,
{
    let mut entries = Vec::with_capacity(anchors.len());
    let mut diagnostics = Vec::new();

    for anchor in anchors {
        let normalized = match convert(&anchor.raw) {
            Ok(normalized) => normalized,
            Err(_) => {
                diagnostics.push(Diagnostic::InvalidTimecode {
                    page_index: anchor.page_index,
                    y: anchor.y,
                    raw: anchor.raw.clone(),
                });
                continue;
            },
        };

        let content = classify_region(&regions[anchor.sequence].lines, config);

        entries.push(ScriptEntry {
            seq_num: entries.len() + 1,
            raw_timecode: anchor.raw.clone(),
            timecode: normalized.formatted,
            start_ms: normalized.start_ms,
            instruction: content.instruction,
            narration: cleanup_narration(&content.narration, config),
        });
    }

    (entries, diagnostics)
}

/// Apply the configured narration cleanup passes
fn cleanup_narration(narration: &str, config: &ExtractionConfig) -> String {
    let mut text = narration.to_string();

    if config.remove_slashes {
        text = text.replace('/', " ");
    }
    if config.remove_periods {
        text = text.replace('.', " ");
    }

    collapse_whitespace(&text)
}
