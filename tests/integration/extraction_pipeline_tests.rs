/*!
 * End-to-end extraction tests: fragments through entries, file round
 * trips and the bbox document parser feeding the pipeline.
 */

use std::path::PathBuf;

use advox::app_config::ExtractionConfig;
use advox::extraction::{extract_document, parse_bbox_document};
use advox::script_processor::ScriptCollection;
use advox::timecode::convert_raw_timecode;

use crate::common;

fn convert(raw: &str) -> anyhow::Result<advox::timecode::NormalizedTimecode> {
    convert_raw_timecode(raw, 24.0)
}

#[test]
fn test_pipeline_withSamplePage_shouldProduceClassifiedEntries() {
    let config = ExtractionConfig::default();
    let fragments = common::sample_page_fragments();

    let report = extract_document(&fragments, &config, convert).unwrap();

    assert!(report.is_clean());
    assert_eq!(report.entries.len(), 2);

    let first = &report.entries[0];
    assert_eq!(first.timecode, "00:00:36:00");
    assert_eq!(first.start_ms, 36_000);
    assert_eq!(first.instruction, "calm");
    assert_eq!(first.narration, "Rain falls over the harbor");

    let second = &report.entries[1];
    assert_eq!(second.timecode, "00:01:02:00");
    assert_eq!(second.instruction, "");
    assert_eq!(second.narration, "She turns away");
}

#[test]
fn test_pipeline_withShuffledFragments_shouldBeOrderIndependent() {
    let config = ExtractionConfig::default();
    let mut fragments = common::sample_page_fragments();
    fragments.reverse();

    let report = extract_document(&fragments, &config, convert).unwrap();

    assert_eq!(report.entries.len(), 2);
    assert_eq!(report.entries[0].narration, "Rain falls over the harbor");
    assert_eq!(report.entries[1].narration, "She turns away");
}

#[test]
fn test_pipeline_entriesRoundTrip_throughScriptFileOnDisk() {
    let config = ExtractionConfig::default();
    let report = extract_document(&common::sample_page_fragments(), &config, convert).unwrap();

    let temp_dir = common::create_temp_dir().unwrap();
    let script_path = temp_dir.path().join("episode.txt");

    let collection = ScriptCollection::new(PathBuf::from("episode.pdf"), report.entries);
    collection.write_to_script(&script_path).unwrap();

    let content = std::fs::read_to_string(&script_path).unwrap();
    let reparsed = ScriptCollection::parse_script_string(&content, 24.0).unwrap();

    assert_eq!(reparsed.len(), collection.entries.len());
    for (original, rebuilt) in collection.entries.iter().zip(reparsed.iter()) {
        assert_eq!(
            (&rebuilt.timecode, &rebuilt.instruction, &rebuilt.narration),
            (&original.timecode, &original.instruction, &original.narration)
        );
    }
}

#[test]
fn test_pipeline_fromBboxXml_shouldFeedExtraction() {
    let xml = r#"<?xml version="1.0"?>
<html xmlns="http://www.w3.org/1999/xhtml">
<body>
<doc>
  <page width="612.000000" height="792.000000">
    <word xMin="71.0" yMin="80.0" xMax="100.0" yMax="92.0">0036</word>
    <word xMin="71.0" yMin="104.0" xMax="110.0" yMax="116.0">(calm)</word>
    <word xMin="114.0" yMin="104.4" xMax="140.0" yMax="116.4">Rain</word>
    <word xMin="144.0" yMin="103.8" xMax="170.0" yMax="115.8">falls</word>
  </page>
</doc>
</body>
</html>
"#;

    let config = ExtractionConfig::default();
    let fragments = parse_bbox_document(xml);
    let report = extract_document(&fragments, &config, convert).unwrap();

    assert_eq!(report.entries.len(), 1);
    assert_eq!(report.entries[0].instruction, "calm");
    assert_eq!(report.entries[0].narration, "Rain falls");
}

#[test]
fn test_pipeline_withMultiPageDocument_shouldKeepAnchorOrderAcrossPages() {
    let config = ExtractionConfig::default();
    let fragments = vec![
        common::fragment("0036", 71.0, 80.0, 0),
        common::fragment("first page line", 71.0, 120.0, 0),
        common::fragment("0102", 71.0, 80.0, 1),
        common::fragment("second page line", 71.0, 120.0, 1),
        common::fragment("0150", 71.0, 200.0, 1),
    ];

    let report = extract_document(&fragments, &config, convert).unwrap();

    assert_eq!(report.entries.len(), 3);
    let timecodes: Vec<&str> = report.entries.iter().map(|e| e.timecode.as_str()).collect();
    assert_eq!(timecodes, vec!["00:00:36:00", "00:01:02:00", "00:01:50:00"]);
    assert_eq!(report.entries[1].narration, "second page line");
}
