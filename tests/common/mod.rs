/*!
 * Common test utilities for the advox test suite
 */

use std::fs;
use std::path::PathBuf;

use anyhow::Result;
use tempfile::TempDir;

use advox::extraction::TextFragment;
use advox::script_processor::ScriptEntry;
use advox::timecode;

/// Creates a temporary directory for test files
pub fn create_temp_dir() -> Result<TempDir> {
    Ok(TempDir::new()?)
}

/// Creates a test file with the given content in the specified directory
pub fn create_test_file(dir: &PathBuf, filename: &str, content: &str) -> Result<PathBuf> {
    let file_path = dir.join(filename);
    fs::write(&file_path, content)?;
    Ok(file_path)
}

/// Build a fragment on one visual row; width is derived from the text
pub fn fragment(text: &str, x: f64, y: f64, page: usize) -> TextFragment {
    let width = text.chars().count() as f64 * 6.0;
    TextFragment::new(text, x, x + width, y, y + 10.0, page)
}

/// Fragments of a small two-entry script page:
///
/// ```text
/// 0036
/// (calm) Rain falls over the harbor
/// 0102
/// She turns away
/// ```
pub fn sample_page_fragments() -> Vec<TextFragment> {
    vec![
        fragment("0036", 71.0, 80.0, 0),
        fragment("(calm)", 71.0, 100.0, 0),
        fragment("Rain", 115.0, 100.5, 0),
        fragment("falls", 145.0, 99.8, 0),
        fragment("over", 180.0, 100.2, 0),
        fragment("the", 212.0, 100.0, 0),
        fragment("harbor", 236.0, 100.4, 0),
        fragment("0102", 71.0, 140.0, 0),
        fragment("She", 71.0, 160.0, 0),
        fragment("turns", 98.0, 160.3, 0),
        fragment("away", 135.0, 159.9, 0),
    ]
}

/// Build a script entry at the given start time with narration only
pub fn entry_at(seq_num: usize, start_ms: u64, narration: &str) -> ScriptEntry {
    ScriptEntry::new(
        seq_num,
        timecode::ms_to_timecode(start_ms, 24.0),
        start_ms,
        "",
        narration,
    )
}

/// Creates a sample SRT file content for parsing tests
pub fn sample_srt_content() -> &'static str {
    r#"1
00:00:01,000 --> 00:00:04,000
This is a test subtitle.

2
00:00:05,000 --> 00:00:09,000
It contains multiple entries.

3
00:00:10,000 --> 00:00:14,000
For testing purposes.
"#
}
