/*!
 * Tests for script entry handling and serialization
 */

use std::fmt::Write;
use std::path::PathBuf;

use advox::app_config::SrtConfig;
use advox::script_processor::{ScriptCollection, ScriptEntry, parse_srt_string};

use crate::common;

/// Test script entry display formatting
#[test]
fn test_script_entry_display_withInstruction_shouldRenderBlock() {
    let entry = ScriptEntry::new(1, "00:00:36:00", 36_000, "calm", "Rain falls");
    let mut output = String::new();
    write!(output, "{}", entry).unwrap();

    assert!(output.contains("1\n"));
    assert!(output.contains("00:00:36:00"));
    assert!(output.contains("(calm)"));
    assert!(output.contains("Rain falls"));
}

#[test]
fn test_script_roundtrip_withInstructionAndNarration_shouldPreserveTuples() {
    let entries = vec![
        ScriptEntry::new(1, "00:00:36:00", 36_000, "calm", "Rain falls over the harbor"),
        ScriptEntry::new(2, "00:01:02:00", 62_000, "", "She turns away"),
        ScriptEntry::new(3, "00:01:45:00", 105_000, "urgent", "Footsteps echo"),
    ];
    let collection = ScriptCollection::new(PathBuf::from("episode.pdf"), entries.clone());

    let serialized = collection.to_script_string();
    let reparsed = ScriptCollection::parse_script_string(&serialized, 24.0).unwrap();

    assert_eq!(reparsed.len(), entries.len());
    for (original, rebuilt) in entries.iter().zip(reparsed.iter()) {
        assert_eq!(rebuilt.timecode, original.timecode);
        assert_eq!(rebuilt.instruction, original.instruction);
        assert_eq!(rebuilt.narration, original.narration);
        assert_eq!(rebuilt.start_ms, original.start_ms);
    }
}

#[test]
fn test_script_roundtrip_withParenthesesInsideNarration_shouldNotEatNarration() {
    // Only the first line directly after the timecode may be an
    // instruction; later parenthesized text stays narration
    let entries = vec![ScriptEntry::new(
        1,
        "00:00:10:00",
        10_000,
        "soft",
        "He smiles (almost)",
    )];
    let collection = ScriptCollection::new(PathBuf::from("s.pdf"), entries);

    let reparsed =
        ScriptCollection::parse_script_string(&collection.to_script_string(), 24.0).unwrap();

    assert_eq!(reparsed[0].instruction, "soft");
    assert_eq!(reparsed[0].narration, "He smiles (almost)");
}

#[test]
fn test_srt_generation_withThreeEntries_shouldEndCuesAtNextStart() {
    let entries = vec![
        common::entry_at(1, 10_000, "first"),
        common::entry_at(2, 15_000, "second"),
        common::entry_at(3, 21_000, "third"),
    ];
    let collection = ScriptCollection::new(PathBuf::from("s.pdf"), entries);
    let config = SrtConfig::default();

    let srt = collection.to_srt_string(&config);

    assert!(srt.contains("00:00:10,000 --> 00:00:15,000"));
    assert!(srt.contains("00:00:15,000 --> 00:00:21,000"));
    // Last cue gets the configured tail duration
    assert!(srt.contains(&format!(
        "00:00:21,000 --> {}",
        advox::timecode::ms_to_srt_time(21_000 + config.default_tail_ms)
    )));
}

#[test]
fn test_srt_parse_withSampleContent_shouldExtractCues() {
    let cues = parse_srt_string(common::sample_srt_content()).unwrap();

    assert_eq!(cues.len(), 3);
    assert_eq!(cues[0].start_ms, 1_000);
    assert_eq!(cues[0].end_ms, 4_000);
    assert_eq!(cues[0].duration_ms(), 3_000);
    assert_eq!(cues[0].text, "This is a test subtitle.");
}

#[test]
fn test_srt_parse_withUnorderedCues_shouldSortAndRenumber() {
    let content = "2\n00:00:10,000 --> 00:00:12,000\nlater\n\n1\n00:00:01,000 --> 00:00:03,000\nearlier\n";
    let cues = parse_srt_string(content).unwrap();

    assert_eq!(cues[0].text, "earlier");
    assert_eq!(cues[0].seq_num, 1);
    assert_eq!(cues[1].text, "later");
    assert_eq!(cues[1].seq_num, 2);
}

#[test]
fn test_srt_parse_withEmptyContent_shouldFail() {
    assert!(parse_srt_string("").is_err());
    assert!(parse_srt_string("no cues here").is_err());
}

#[test]
fn test_srt_generation_withLongNarration_shouldWrapLines() {
    let long_text = "word ".repeat(30);
    let entries = vec![common::entry_at(1, 0, long_text.trim())];
    let collection = ScriptCollection::new(PathBuf::from("s.pdf"), entries);
    let config = SrtConfig::default();

    let srt = collection.to_srt_string(&config);
    let longest = srt.lines().map(|l| l.chars().count()).max().unwrap();

    // Wrapping breaks at the budget on space/comma boundaries, so lines
    // stay close to the configured width
    assert!(longest <= config.max_chars_per_line + 1);
}
