use std::fmt;

use crate::script_processor::ScriptEntry;

// @module: Data model for PDF layout extraction

/// A positioned piece of text delivered by the page source
///
/// Fragments are immutable; everything downstream works on copies or
/// references. Coordinates are PDF user-space units with y growing
/// downward, as poppler reports them.
#[derive(Debug, Clone, PartialEq)]
pub struct TextFragment {
    // @field: Text content
    pub text: String,

    // @field: Left edge
    pub x_left: f64,

    // @field: Right edge
    pub x_right: f64,

    // @field: Top edge
    pub y_top: f64,

    // @field: Bottom edge
    pub y_bottom: f64,

    // @field: Zero-based page index
    pub page_index: usize,
}

impl TextFragment {
    pub fn new(
        text: impl Into<String>,
        x_left: f64,
        x_right: f64,
        y_top: f64,
        y_bottom: f64,
        page_index: usize,
    ) -> Self {
        TextFragment {
            text: text.into(),
            x_left,
            x_right,
            y_top,
            y_bottom,
            page_index,
        }
    }
}

/// One visual row of text, built by clustering fragments vertically
#[derive(Debug, Clone, PartialEq)]
pub struct Line {
    /// Concatenated fragment text, left to right
    pub text: String,

    /// Representative y position (top of the topmost fragment)
    pub y: f64,

    /// Zero-based page index
    pub page_index: usize,
}

/// A line recognized as a timecode marker
#[derive(Debug, Clone, PartialEq)]
pub struct Anchor {
    /// Order of appearance across the document
    pub sequence: usize,

    /// Index of the anchor's line in the document line sequence
    pub line_index: usize,

    /// Raw timecode token as printed (e.g. "0036")
    pub raw: String,

    /// Parsed start time in milliseconds
    pub start_ms: u64,

    /// y position of the anchor line
    pub y: f64,

    /// Zero-based page index
    pub page_index: usize,
}

/// The vertical slice of a page owned by one anchor
///
/// Spans from the anchor's y down to the next anchor on the same page, or
/// to the end of the page for the last anchor. Holds the non-anchor lines
/// that fall inside that interval.
#[derive(Debug, Clone)]
pub struct Region {
    /// Sequence index of the owning anchor
    pub anchor_sequence: usize,

    /// Content lines in top-to-bottom order
    pub lines: Vec<Line>,
}

/// Recoverable per-line / per-anchor anomalies collected during extraction
///
/// These are data, not errors: extraction continues and the caller decides
/// how to surface them.
#[derive(Debug, Clone, PartialEq)]
pub enum Diagnostic {
    /// A content line with no preceding anchor on its page; excluded from
    /// every entry rather than merged into a neighboring page's region
    OrphanedLine {
        page_index: usize,
        y: f64,
        text: String,
    },

    /// An anchor whose timecode does not increase over its predecessor
    DuplicateOrOutOfOrderAnchor {
        sequence: usize,
        raw: String,
        previous_raw: String,
    },

    /// A line that matched the anchor shape but carries an impossible
    /// timecode value (e.g. seconds component >= 60)
    InvalidTimecode {
        page_index: usize,
        y: f64,
        raw: String,
    },
}

impl fmt::Display for Diagnostic {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            Diagnostic::OrphanedLine { page_index, y, text } => {
                write!(
                    f,
                    "orphaned line on page {} (y={:.1}) excluded from output: \"{}\"",
                    page_index + 1,
                    y,
                    text
                )
            },
            Diagnostic::DuplicateOrOutOfOrderAnchor { sequence, raw, previous_raw } => {
                write!(
                    f,
                    "anchor #{} ({}) does not advance past its predecessor ({})",
                    sequence + 1,
                    raw,
                    previous_raw
                )
            },
            Diagnostic::InvalidTimecode { page_index, y, raw } => {
                write!(
                    f,
                    "line on page {} (y={:.1}) looks like a timecode but is invalid: {}",
                    page_index + 1,
                    y,
                    raw
                )
            },
        }
    }
}

/// Result of a full document extraction: the ordered entries plus every
/// anomaly encountered on the way
#[derive(Debug)]
pub struct ExtractionReport {
    /// Entries in anchor order
    pub entries: Vec<ScriptEntry>,

    /// Accumulated anomalies, in encounter order
    pub diagnostics: Vec<Diagnostic>,
}

impl ExtractionReport {
    /// True when extraction finished without a single anomaly
    pub fn is_clean(&self) -> bool {
        self.diagnostics.is_empty()
    }
}
