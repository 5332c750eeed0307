use anyhow::{Result, Context};
use std::fs;
use std::path::{Path, PathBuf};
use walkdir::WalkDir;
use std::io::Write;
use tempfile::NamedTempFile;

// @module: File and directory utilities

// @struct: File operations utility
pub struct FileManager;

impl FileManager {
    // @checks: File existence
    pub fn file_exists<P: AsRef<Path>>(path: P) -> bool {
        path.as_ref().exists() && path.as_ref().is_file()
    }

    // @checks: Directory existence
    pub fn dir_exists<P: AsRef<Path>>(path: P) -> bool {
        path.as_ref().exists() && path.as_ref().is_dir()
    }

    // @creates: Directory and parents if needed
    pub fn ensure_dir<P: AsRef<Path>>(path: P) -> Result<()> {
        let path = path.as_ref();
        if !path.exists() {
            fs::create_dir_all(path)?;
        }
        Ok(())
    }

    // @generates: Output path next to the input with a new extension
    // @params: input_file, output_dir, extension
    pub fn generate_output_path<P1: AsRef<Path>, P2: AsRef<Path>>(
        input_file: P1,
        output_dir: P2,
        extension: &str,
    ) -> PathBuf {
        let input_file = input_file.as_ref();
        let output_dir = output_dir.as_ref();

        let stem = input_file.file_stem().unwrap_or_default();

        let mut output_filename = stem.to_string_lossy().to_string();
        output_filename.push('.');
        output_filename.push_str(extension);

        output_dir.join(output_filename)
    }

    /// Find files with a specific extension in a directory
    pub fn find_files<P: AsRef<Path>>(dir: P, extension: &str) -> Result<Vec<PathBuf>> {
        let mut result = Vec::new();
        let normalized_ext = extension.trim_start_matches('.');

        for entry in WalkDir::new(dir.as_ref()).follow_links(true) {
            let entry = entry.context("Failed to read directory entry")?;
            let path = entry.path();

            if path.is_file() {
                if let Some(ext) = path.extension() {
                    if ext.to_string_lossy().eq_ignore_ascii_case(normalized_ext) {
                        result.push(path.to_path_buf());
                    }
                }
            }
        }

        result.sort();
        Ok(result)
    }

    /// Read a file to a string
    pub fn read_to_string<P: AsRef<Path>>(path: P) -> Result<String> {
        fs::read_to_string(&path)
            .with_context(|| format!("Failed to read file: {:?}", path.as_ref()))
    }

    /// Write a string to a file
    pub fn write_to_file<P: AsRef<Path>>(path: P, content: &str) -> Result<()> {
        // Ensure the parent directory exists
        if let Some(parent) = path.as_ref().parent() {
            Self::ensure_dir(parent)?;
        }

        fs::write(&path, content)
            .with_context(|| format!("Failed to write to file: {:?}", path.as_ref()))?;

        Ok(())
    }

    /// Write bytes to a file atomically.
    ///
    /// The payload lands in a temp file first and is renamed into place,
    /// so a crash mid-write never leaves a truncated WAV that a later
    /// run would mistake for a finished one.
    pub fn write_bytes_atomic<P: AsRef<Path>>(path: P, bytes: &[u8]) -> Result<()> {
        let path = path.as_ref();
        let parent = path.parent().unwrap_or_else(|| Path::new("."));
        Self::ensure_dir(parent)?;

        let mut temp = NamedTempFile::new_in(parent)
            .with_context(|| format!("Failed to create temp file in {:?}", parent))?;
        temp.write_all(bytes)
            .with_context(|| format!("Failed to write temp file for {:?}", path))?;
        temp.persist(path)
            .with_context(|| format!("Failed to move temp file into place at {:?}", path))?;

        Ok(())
    }

    /// Duration of a WAV file in seconds.
    ///
    /// Fails on missing, empty or undecodable files; callers treat that
    /// as "no usable audio" rather than an abort.
    pub fn wav_duration_secs<P: AsRef<Path>>(path: P) -> Result<f64> {
        let path = path.as_ref();
        let metadata = fs::metadata(path)
            .with_context(|| format!("Audio file not found: {:?}", path))?;
        if metadata.len() == 0 {
            return Err(anyhow::anyhow!("Audio file is empty: {:?}", path));
        }

        let reader = hound::WavReader::open(path)
            .with_context(|| format!("Failed to decode WAV file: {:?}", path))?;
        let spec = reader.spec();
        if spec.sample_rate == 0 {
            return Err(anyhow::anyhow!("WAV reports zero sample rate: {:?}", path));
        }

        Ok(reader.duration() as f64 / spec.sample_rate as f64)
    }

    /// Detect whether a path is a script PDF, an SRT subtitle file, or
    /// something else
    pub fn detect_file_type<P: AsRef<Path>>(path: P) -> Result<FileType> {
        let path = path.as_ref();

        if !path.exists() {
            return Err(anyhow::anyhow!("File does not exist: {:?}", path));
        }

        if let Some(ext) = path.extension() {
            let ext_str = ext.to_string_lossy().to_lowercase();
            match ext_str.as_str() {
                "pdf" => return Ok(FileType::Pdf),
                "srt" => return Ok(FileType::Subtitle),
                "txt" => return Ok(FileType::Script),
                _ => {},
            }
        }

        // Fall back to examining file contents: PDFs carry a magic prefix,
        // SRT files carry timestamp arrows
        if let Ok(prefix) = fs::read(path).map(|bytes| bytes.into_iter().take(5).collect::<Vec<_>>()) {
            if prefix.starts_with(b"%PDF-") {
                return Ok(FileType::Pdf);
            }
        }

        if let Ok(content) = fs::read_to_string(path) {
            if content.contains("-->") {
                return Ok(FileType::Subtitle);
            }
        }

        Ok(FileType::Unknown)
    }
}

/// Enum representing different file types
#[derive(Debug, PartialEq, Eq)]
pub enum FileType {
    /// Printed script document
    Pdf,
    /// SRT subtitle file
    Subtitle,
    /// Plain-text script file produced by this tool
    Script,
    /// Unknown file type
    Unknown,
}
