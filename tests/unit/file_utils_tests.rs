/*!
 * Tests for file and folder utilities
 */

use advox::file_utils::{FileManager, FileType};

use crate::common;

#[test]
fn test_ensure_dir_withNestedPath_shouldCreateAll() {
    let temp_dir = common::create_temp_dir().unwrap();
    let nested = temp_dir.path().join("a").join("b").join("c");

    FileManager::ensure_dir(&nested).unwrap();
    assert!(FileManager::dir_exists(&nested));
}

#[test]
fn test_find_files_withMixedExtensions_shouldFilterAndSort() {
    let temp_dir = common::create_temp_dir().unwrap();
    let dir = temp_dir.path().to_path_buf();
    common::create_test_file(&dir, "b.wav", "x").unwrap();
    common::create_test_file(&dir, "a.WAV", "x").unwrap();
    common::create_test_file(&dir, "c.txt", "x").unwrap();

    let found = FileManager::find_files(&dir, "wav").unwrap();

    assert_eq!(found.len(), 2);
    assert!(found[0].file_name().unwrap().to_string_lossy().starts_with("a"));
}

#[test]
fn test_write_bytes_atomic_shouldCreateParentAndWrite() {
    let temp_dir = common::create_temp_dir().unwrap();
    let target = temp_dir.path().join("audio").join("clip.wav");

    FileManager::write_bytes_atomic(&target, b"RIFF").unwrap();

    assert!(FileManager::file_exists(&target));
    assert_eq!(std::fs::read(&target).unwrap(), b"RIFF");
}

#[test]
fn test_wav_duration_withGeneratedFile_shouldMatchSampleCount() {
    let temp_dir = common::create_temp_dir().unwrap();
    let path = temp_dir.path().join("tone.wav");

    let spec = hound::WavSpec {
        channels: 1,
        sample_rate: 48_000,
        bits_per_sample: 16,
        sample_format: hound::SampleFormat::Int,
    };
    let mut writer = hound::WavWriter::create(&path, spec).unwrap();
    for _ in 0..24_000 {
        writer.write_sample(0i16).unwrap();
    }
    writer.finalize().unwrap();

    let duration = FileManager::wav_duration_secs(&path).unwrap();
    assert!((duration - 0.5).abs() < 1e-9);
}

#[test]
fn test_wav_duration_withMissingOrEmptyFile_shouldFail() {
    let temp_dir = common::create_temp_dir().unwrap();
    let dir = temp_dir.path().to_path_buf();

    assert!(FileManager::wav_duration_secs(dir.join("absent.wav")).is_err());

    let empty = common::create_test_file(&dir, "empty.wav", "").unwrap();
    assert!(FileManager::wav_duration_secs(&empty).is_err());
}

#[test]
fn test_detect_file_type_withKnownExtensions_shouldClassify() {
    let temp_dir = common::create_temp_dir().unwrap();
    let dir = temp_dir.path().to_path_buf();

    let srt = common::create_test_file(&dir, "s.srt", common::sample_srt_content()).unwrap();
    let script = common::create_test_file(&dir, "s.txt", "1\n00:00:01:00\ntext\n").unwrap();
    let pdf = common::create_test_file(&dir, "s.pdf", "%PDF-1.4").unwrap();

    assert_eq!(FileManager::detect_file_type(&srt).unwrap(), FileType::Subtitle);
    assert_eq!(FileManager::detect_file_type(&script).unwrap(), FileType::Script);
    assert_eq!(FileManager::detect_file_type(&pdf).unwrap(), FileType::Pdf);
}

#[test]
fn test_detect_file_type_withoutExtension_shouldSniffContent() {
    let temp_dir = common::create_temp_dir().unwrap();
    let dir = temp_dir.path().to_path_buf();

    let pdf = common::create_test_file(&dir, "document", "%PDF-1.7 rest").unwrap();
    let srt = common::create_test_file(&dir, "subs", common::sample_srt_content()).unwrap();

    assert_eq!(FileManager::detect_file_type(&pdf).unwrap(), FileType::Pdf);
    assert_eq!(FileManager::detect_file_type(&srt).unwrap(), FileType::Subtitle);
}

#[test]
fn test_generate_output_path_shouldSwapExtension() {
    let path = FileManager::generate_output_path("in/episode01.pdf", "out", "srt");
    assert_eq!(path, std::path::PathBuf::from("out/episode01.srt"));
}
