use anyhow::{Result, anyhow};

// @module: Timecode conversion utilities

/// A raw script timecode normalized into display and millisecond form
#[derive(Debug, Clone, PartialEq)]
pub struct NormalizedTimecode {
    // @field: Formatted timecode (HH:MM:SS:FF)
    pub formatted: String,

    // @field: Start time in ms
    pub start_ms: u64,
}

/// Parse a raw numeric timecode token into milliseconds.
///
/// Accepted forms, matching the printed script conventions:
/// - 4 digits, MMSS: minutes 00-99 (minutes >= 60 roll into hours), seconds 00-59
/// - 5 digits, HMMSS: hours 0-9, minutes 00-59, seconds 00-59
/// - 6 digits, HHMMSS: hours 00-99, minutes 00-59, seconds 00-59
pub fn parse_raw_timecode(raw: &str) -> Result<u64> {
    let raw = raw.trim();
    if !raw.chars().all(|c| c.is_ascii_digit()) {
        return Err(anyhow!("Timecode is not numeric: {}", raw));
    }

    let (hours, minutes, seconds) = match raw.len() {
        4 => {
            let minutes: u64 = raw[..2].parse()?;
            let seconds: u64 = raw[2..].parse()?;
            (minutes / 60, minutes % 60, seconds)
        },
        5 => {
            let hours: u64 = raw[..1].parse()?;
            let minutes: u64 = raw[1..3].parse()?;
            let seconds: u64 = raw[3..].parse()?;
            (hours, minutes, seconds)
        },
        6 => {
            let hours: u64 = raw[..2].parse()?;
            let minutes: u64 = raw[2..4].parse()?;
            let seconds: u64 = raw[4..].parse()?;
            (hours, minutes, seconds)
        },
        len => return Err(anyhow!("Unsupported timecode length {}: {}", len, raw)),
    };

    if seconds >= 60 {
        return Err(anyhow!("Invalid seconds component in timecode: {}", raw));
    }
    if raw.len() > 4 && minutes >= 60 {
        return Err(anyhow!("Invalid minutes component in timecode: {}", raw));
    }

    Ok((hours * 3600 + minutes * 60 + seconds) * 1000)
}

/// Normalize a raw timecode token at the given frame rate
pub fn convert_raw_timecode(raw: &str, fps: f64) -> Result<NormalizedTimecode> {
    let start_ms = parse_raw_timecode(raw)?;
    Ok(NormalizedTimecode {
        formatted: ms_to_timecode(start_ms, fps),
        start_ms,
    })
}

/// Format milliseconds as HH:MM:SS:FF at the given frame rate
pub fn ms_to_timecode(ms: u64, fps: f64) -> String {
    let total_seconds = ms / 1000;
    let h = total_seconds / 3600;
    let m = (total_seconds % 3600) / 60;
    let s = total_seconds % 60;
    let f = ((ms % 1000) as f64 / 1000.0 * fps) as u64;
    format!("{:02}:{:02}:{:02}:{:02}", h, m, s, f)
}

/// Format milliseconds as a filename-safe timecode (colons replaced with underscores)
pub fn ms_to_filename_tc(ms: u64, fps: f64) -> String {
    ms_to_timecode(ms, fps).replace(':', "_")
}

/// Convert milliseconds to a rounded frame count
pub fn ms_to_frames(ms: i64, fps: f64) -> i64 {
    (ms as f64 / 1000.0 * fps).round() as i64
}

/// Parse an HH:MM:SS:FF timecode into milliseconds
pub fn timecode_to_ms(tc: &str, fps: f64) -> Result<u64> {
    let normalized = tc.replace(';', ":");
    let parts: Vec<&str> = normalized.split(':').collect();
    if parts.len() != 4 {
        return Err(anyhow!("Invalid timecode format: {}", tc));
    }

    let h: u64 = parts[0].parse()?;
    let m: u64 = parts[1].parse()?;
    let s: u64 = parts[2].parse()?;
    let f: u64 = parts[3].parse()?;

    if m >= 60 || s >= 60 {
        return Err(anyhow!("Invalid time components in timecode: {}", tc));
    }

    Ok((h * 3600 + m * 60 + s) * 1000 + ((f as f64 / fps) * 1000.0) as u64)
}

/// Format milliseconds as an SRT timestamp (HH:MM:SS,mmm)
pub fn ms_to_srt_time(ms: u64) -> String {
    let hours = ms / 3_600_000;
    let minutes = (ms % 3_600_000) / 60_000;
    let seconds = (ms % 60_000) / 1_000;
    let millis = ms % 1_000;
    format!("{:02}:{:02}:{:02},{:03}", hours, minutes, seconds, millis)
}
