use std::fmt;
use std::fs;
use std::fs::File;
use std::io::Write;
use std::path::{Path, PathBuf};

use anyhow::{Result, anyhow};
use log::warn;
use once_cell::sync::Lazy;
use regex::Regex;

use crate::app_config::SrtConfig;
use crate::timecode;

// @module: Script entry handling and serialization

// @const: HH:MM:SS:FF timecode line
static TIMECODE_LINE_REGEX: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^(\d{2}):(\d{2}):(\d{2}):(\d{2})$").unwrap());

// @const: SRT timestamp pair
static SRT_TIMESTAMP_REGEX: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(\d{2}):(\d{2}):(\d{2})[,.](\d{3})\s*-->\s*(\d{2}):(\d{2}):(\d{2})[,.](\d{3})")
        .unwrap()
});

// @struct: Single timed script entry
#[derive(Debug, Clone, PartialEq)]
pub struct ScriptEntry {
    // @field: Sequence number
    pub seq_num: usize,

    // @field: Timecode token as printed in the source script
    pub raw_timecode: String,

    // @field: Normalized timecode (HH:MM:SS:FF)
    pub timecode: String,

    // @field: Start time in ms
    pub start_ms: u64,

    // @field: Bracketed directorial note, not spoken
    pub instruction: String,

    // @field: Spoken narration text
    pub narration: String,
}

impl ScriptEntry {
    /// Creates a new script entry - used by tests and external consumers
    #[allow(dead_code)]
    pub fn new(
        seq_num: usize,
        timecode: impl Into<String>,
        start_ms: u64,
        instruction: impl Into<String>,
        narration: impl Into<String>,
    ) -> Self {
        let timecode = timecode.into();
        ScriptEntry {
            seq_num,
            raw_timecode: timecode.replace(':', ""),
            timecode,
            start_ms,
            instruction: instruction.into(),
            narration: narration.into(),
        }
    }

    /// True when the entry has nothing for the synthesis service to speak
    pub fn is_instruction_only(&self) -> bool {
        self.narration.trim().is_empty()
    }
}

impl fmt::Display for ScriptEntry {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        writeln!(f, "{}", self.seq_num)?;
        writeln!(f, "{}", self.timecode)?;
        if !self.instruction.is_empty() {
            writeln!(f, "({})", self.instruction)?;
        }
        writeln!(f, "{}", self.narration)?;
        writeln!(f)
    }
}

/// Ordered collection of script entries with their source document
#[derive(Debug)]
pub struct ScriptCollection {
    /// Source filename
    pub source_file: PathBuf,

    /// List of script entries
    pub entries: Vec<ScriptEntry>,
}

impl ScriptCollection {
    /// Create a new script collection
    pub fn new(source_file: PathBuf, entries: Vec<ScriptEntry>) -> Self {
        ScriptCollection {
            source_file,
            entries,
        }
    }

    /// Serialize the collection to the script text format.
    ///
    /// One block per entry: sequence number, timecode, optional
    /// parenthesized instruction, narration. Re-parsing the output yields
    /// the same ordered (timecode, instruction, narration) tuples.
    pub fn to_script_string(&self) -> String {
        let mut output = String::new();
        for entry in &self.entries {
            output.push_str(&entry.to_string());
        }
        output
    }

    /// Write the script text format to a file
    pub fn write_to_script<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        let path = path.as_ref();
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }

        let mut file = File::create(path)
            .map_err(|e| anyhow!("Failed to create script file {:?}: {}", path, e))?;
        write!(file, "{}", self.to_script_string())?;
        Ok(())
    }

    /// Parse the script text format back into entries.
    ///
    /// The frame rate is needed to rebuild millisecond start times from
    /// the serialized timecodes.
    pub fn parse_script_string(content: &str, fps: f64) -> Result<Vec<ScriptEntry>> {
        let mut entries: Vec<ScriptEntry> = Vec::new();

        // State for the block currently being assembled
        let mut seq_num: Option<usize> = None;
        let mut timecode: Option<String> = None;
        let mut instruction = String::new();
        let mut narration_lines: Vec<String> = Vec::new();

        let flush = |seq_num: &mut Option<usize>,
                     timecode: &mut Option<String>,
                     instruction: &mut String,
                     narration_lines: &mut Vec<String>,
                     entries: &mut Vec<ScriptEntry>|
         -> Result<()> {
            if let (Some(seq), Some(tc)) = (seq_num.take(), timecode.take()) {
                let start_ms = timecode::timecode_to_ms(&tc, fps)?;
                entries.push(ScriptEntry {
                    seq_num: seq,
                    raw_timecode: tc.replace(':', ""),
                    timecode: tc,
                    start_ms,
                    instruction: std::mem::take(instruction),
                    narration: narration_lines.join(" ").trim().to_string(),
                });
                narration_lines.clear();
            }
            Ok(())
        };

        for line in content.lines() {
            let trimmed = line.trim();

            if trimmed.is_empty() {
                flush(&mut seq_num, &mut timecode, &mut instruction, &mut narration_lines, &mut entries)?;
                continue;
            }

            // A bare number opens a new block
            if seq_num.is_none() && timecode.is_none() {
                if let Ok(num) = trimmed.parse::<usize>() {
                    seq_num = Some(num);
                    continue;
                }
                warn!("Unexpected text before sequence number: {}", trimmed);
                continue;
            }

            if timecode.is_none() {
                if TIMECODE_LINE_REGEX.is_match(trimmed) {
                    timecode = Some(trimmed.to_string());
                    continue;
                }
                return Err(anyhow!("Expected timecode line, found: {}", trimmed));
            }

            // First parenthesized line after the timecode is the instruction
            if instruction.is_empty()
                && narration_lines.is_empty()
                && trimmed.starts_with('(')
                && trimmed.ends_with(')')
            {
                instruction = trimmed[1..trimmed.len() - 1].to_string();
                continue;
            }

            narration_lines.push(trimmed.to_string());
        }

        flush(&mut seq_num, &mut timecode, &mut instruction, &mut narration_lines, &mut entries)?;

        if entries.is_empty() {
            return Err(anyhow!("No valid script entries were found in the content"));
        }

        Ok(entries)
    }

    /// Render the collection as SRT.
    ///
    /// Each cue ends where the next one begins; the final cue gets the
    /// configured tail duration.
    pub fn to_srt_string(&self, config: &SrtConfig) -> String {
        let mut output = Vec::new();

        for (index, entry) in self.entries.iter().enumerate() {
            let start_ms = entry.start_ms;
            let end_ms = match self.entries.get(index + 1) {
                Some(next) => next.start_ms,
                None => start_ms + config.default_tail_ms,
            };

            let mut text = entry.narration.clone();
            if config.include_instructions && !entry.instruction.is_empty() {
                text = format!("({}) {}", entry.instruction, text).trim().to_string();
            }
            let text = format_cue_text(&text, config.max_chars_per_line, config.break_on_period);

            output.push(format!(
                "{}\n{} --> {}\n{}\n",
                entry.seq_num,
                timecode::ms_to_srt_time(start_ms),
                timecode::ms_to_srt_time(end_ms),
                text
            ));
        }

        output.join("\n")
    }

    /// Write the SRT rendering to a file
    pub fn write_to_srt<P: AsRef<Path>>(&self, path: P, config: &SrtConfig) -> Result<()> {
        let path = path.as_ref();
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }

        let mut file = File::create(path)
            .map_err(|e| anyhow!("Failed to create subtitle file {:?}: {}", path, e))?;
        write!(file, "{}", self.to_srt_string(config))?;
        Ok(())
    }
}

/// A cue parsed from an existing SRT file
#[derive(Debug, Clone, PartialEq)]
pub struct SrtCue {
    pub seq_num: usize,
    pub start_ms: u64,
    pub end_ms: u64,
    pub text: String,
}

impl SrtCue {
    pub fn duration_ms(&self) -> u64 {
        self.end_ms.saturating_sub(self.start_ms)
    }
}

/// Parse SRT content into cues.
///
/// Tolerates comma or period millisecond separators and re-numbers cues
/// sequentially after sorting by start time.
pub fn parse_srt_string(content: &str) -> Result<Vec<SrtCue>> {
    let mut cues = Vec::new();

    let mut seq_num: Option<usize> = None;
    let mut times: Option<(u64, u64)> = None;
    let mut text = String::new();

    let flush = |seq_num: &mut Option<usize>,
                 times: &mut Option<(u64, u64)>,
                 text: &mut String,
                 cues: &mut Vec<SrtCue>| {
        if let (Some(seq), Some((start_ms, end_ms))) = (seq_num.take(), times.take()) {
            let body = text.trim().replace('\n', " ");
            if body.is_empty() {
                warn!("Skipping empty subtitle cue {}", seq);
            } else {
                cues.push(SrtCue {
                    seq_num: seq,
                    start_ms,
                    end_ms,
                    text: body,
                });
            }
        }
        text.clear();
    };

    for line in content.lines() {
        let trimmed = line.trim();

        if trimmed.is_empty() {
            flush(&mut seq_num, &mut times, &mut text, &mut cues);
            continue;
        }

        if seq_num.is_none() && text.is_empty() {
            if let Ok(num) = trimmed.parse::<usize>() {
                seq_num = Some(num);
                continue;
            }
        }

        if seq_num.is_some() && times.is_none() {
            if let Some(caps) = SRT_TIMESTAMP_REGEX.captures(trimmed) {
                let start_ms = srt_caps_to_ms(&caps, 1);
                let end_ms = srt_caps_to_ms(&caps, 5);
                times = Some((start_ms, end_ms));
                continue;
            }
        }

        if times.is_some() {
            if !text.is_empty() {
                text.push('\n');
            }
            text.push_str(trimmed);
        } else {
            warn!("Unexpected text before timestamp: {}", trimmed);
        }
    }

    flush(&mut seq_num, &mut times, &mut text, &mut cues);

    if cues.is_empty() {
        return Err(anyhow!("No valid subtitle cues were found in the SRT content"));
    }

    // Sort by start time and renumber to ensure sequential order
    cues.sort_by_key(|cue| cue.start_ms);
    for (index, cue) in cues.iter_mut().enumerate() {
        cue.seq_num = index + 1;
    }

    Ok(cues)
}

fn srt_caps_to_ms(caps: &regex::Captures, start_index: usize) -> u64 {
    let field = |offset: usize| -> u64 {
        caps.get(start_index + offset)
            .map_or(0, |m| m.as_str().parse().unwrap_or(0))
    };
    (field(0) * 3600 + field(1) * 60 + field(2)) * 1000 + field(3)
}

/// Wrap cue text for display: optional break after sentence ends, then a
/// hard wrap at the character budget on spaces and commas.
fn format_cue_text(text: &str, max_chars: usize, break_on_period: bool) -> String {
    let mut text = text.to_string();
    if break_on_period {
        static PERIOD_BREAK: Lazy<Regex> = Lazy::new(|| Regex::new(r"\.\s+").unwrap());
        text = PERIOD_BREAK.replace_all(&text, ".\n").to_string();
    }

    let mut lines = Vec::new();
    for line in text.split('\n') {
        let line = line.trim();
        if line.is_empty() {
            continue;
        }

        if line.chars().count() <= max_chars {
            lines.push(line.to_string());
            continue;
        }

        let mut current = String::new();
        for c in line.chars() {
            current.push(c);
            if current.chars().count() >= max_chars && (c == ' ' || c == ',') {
                lines.push(current.trim().to_string());
                current = String::new();
            }
        }
        if !current.trim().is_empty() {
            lines.push(current.trim().to_string());
        }
    }

    lines.join("\n")
}

impl fmt::Display for ScriptCollection {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        writeln!(f, "Script Collection")?;
        writeln!(f, "Source: {:?}", self.source_file)?;
        writeln!(f, "Entries: {}", self.entries.len())?;
        Ok(())
    }
}
