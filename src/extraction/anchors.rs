/*!
 * Timecode anchor scanning.
 *
 * Promotes lines whose entire trimmed text matches the anchor pattern to
 * timecode anchors and assigns them their document-wide sequence order.
 */

use std::collections::HashSet;

use regex::Regex;

use crate::app_config::ExtractionConfig;
use crate::errors::ExtractionError;
use crate::timecode;

use super::model::{Anchor, Diagnostic, Line};

/// Outcome of scanning the document line sequence for anchors
#[derive(Debug)]
pub struct AnchorScan {
    /// Anchors in scan order; sequence index equals position here
    pub anchors: Vec<Anchor>,

    /// Line indices that were consumed as anchors
    pub anchor_line_indices: HashSet<usize>,

    /// Invalid timecode values and ordering anomalies
    pub diagnostics: Vec<Diagnostic>,
}

/// Scan the whole-document line sequence for timecode anchors.
///
/// The pattern must cover the entire trimmed line text; a digit run
/// embedded in other text never qualifies. A document without a single
/// anchor has no valid region partition and fails outright.
pub fn scan_anchors(
    lines: &[Line],
    config: &ExtractionConfig,
) -> Result<AnchorScan, ExtractionError> {
    let pattern = Regex::new(&config.anchor_pattern).map_err(|e| {
        ExtractionError::InvalidAnchorPattern {
            pattern: config.anchor_pattern.clone(),
            message: e.to_string(),
        }
    })?;

    let mut anchors: Vec<Anchor> = Vec::new();
    let mut anchor_line_indices = HashSet::new();
    let mut diagnostics = Vec::new();

    for (line_index, line) in lines.iter().enumerate() {
        let trimmed = line.text.trim();
        if !pattern.is_match(trimmed) {
            continue;
        }

        match timecode::parse_raw_timecode(trimmed) {
            Ok(start_ms) => {
                if let Some(previous) = anchors.last() {
                    if start_ms <= previous.start_ms {
                        diagnostics.push(Diagnostic::DuplicateOrOutOfOrderAnchor {
                            sequence: anchors.len(),
                            raw: trimmed.to_string(),
                            previous_raw: previous.raw.clone(),
                        });
                    }
                }

                anchor_line_indices.insert(line_index);
                anchors.push(Anchor {
                    sequence: anchors.len(),
                    line_index,
                    raw: trimmed.to_string(),
                    start_ms,
                    y: line.y,
                    page_index: line.page_index,
                });
            },
            Err(_) => {
                // Matches the shape but not the value; the line stays
                // ordinary content
                diagnostics.push(Diagnostic::InvalidTimecode {
                    page_index: line.page_index,
                    y: line.y,
                    raw: trimmed.to_string(),
                });
            },
        }
    }

    if anchors.is_empty() {
        return Err(ExtractionError::NoAnchorsFound);
    }

    Ok(AnchorScan {
        anchors,
        anchor_line_indices,
        diagnostics,
    })
}
