/*!
 * Page sources: suppliers of positioned text fragments.
 *
 * The extraction pipeline only consumes `TextFragment` records and does
 * not care how PDF decoding happens. The production implementation shells
 * out to poppler's `pdftotext` in bounding-box mode, the same way the
 * rest of the toolchain drives external decoders.
 */

use std::path::{Path, PathBuf};

use anyhow::{Result, anyhow};
use async_trait::async_trait;
use log::{debug, error};
use once_cell::sync::Lazy;
use regex::Regex;
use tokio::process::Command;

use super::model::TextFragment;

// @const: word element of pdftotext bbox output
static WORD_REGEX: Lazy<Regex> = Lazy::new(|| {
    Regex::new(
        r#"<word xMin="(-?[0-9.]+)" yMin="(-?[0-9.]+)" xMax="(-?[0-9.]+)" yMax="(-?[0-9.]+)">(.*?)</word>"#,
    )
    .unwrap()
});

// @const: page element opening tag
static PAGE_REGEX: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r#"<page width="([0-9.]+)" height="([0-9.]+)""#).unwrap()
});

/// Supplier of positioned text fragments for a whole document
#[async_trait]
pub trait PageSource: Send + Sync {
    /// All fragments of the document, tagged with their page index
    async fn read_fragments(&self) -> Result<Vec<TextFragment>>;

    /// Number of pages in the document
    async fn page_count(&self) -> Result<usize>;
}

/// Production page source backed by poppler's `pdftotext -bbox`
#[derive(Debug, Clone)]
pub struct PdfTextSource {
    pdf_path: PathBuf,
}

impl PdfTextSource {
    pub fn new<P: AsRef<Path>>(pdf_path: P) -> Result<Self> {
        let pdf_path = pdf_path.as_ref();
        if !pdf_path.exists() {
            return Err(anyhow!("PDF file does not exist: {:?}", pdf_path));
        }
        Ok(Self {
            pdf_path: pdf_path.to_path_buf(),
        })
    }
}

#[async_trait]
impl PageSource for PdfTextSource {
    async fn read_fragments(&self) -> Result<Vec<TextFragment>> {
        // Use pdftotext to dump every word with its bounding box
        // Add timeout to prevent hanging on problematic files
        let pdftotext_future = Command::new("pdftotext")
            .args([
                "-bbox",
                self.pdf_path.to_str().unwrap_or_default(),
                "-", // bbox XML to stdout
            ])
            .output();

        let timeout_duration = std::time::Duration::from_secs(60);
        let output = tokio::select! {
            result = pdftotext_future => {
                result.map_err(|e| anyhow!("Failed to execute pdftotext command: {}", e))?
            },
            _ = tokio::time::sleep(timeout_duration) => {
                return Err(anyhow!("pdftotext command timed out after 60 seconds"));
            }
        };

        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            let filtered = filter_poppler_stderr(&stderr);
            error!("PDF text extraction failed: {}", filtered);
            return Err(anyhow!("pdftotext failed: {}", filtered));
        }

        let xml = String::from_utf8_lossy(&output.stdout);
        let fragments = parse_bbox_document(&xml);
        debug!(
            "pdftotext produced {} fragments from {:?}",
            fragments.len(),
            self.pdf_path
        );

        Ok(fragments)
    }

    async fn page_count(&self) -> Result<usize> {
        let pdfinfo_future = Command::new("pdfinfo").arg(&self.pdf_path).output();

        let timeout_duration = std::time::Duration::from_secs(30);
        let output = tokio::select! {
            result = pdfinfo_future => {
                result.map_err(|e| anyhow!("Failed to execute pdfinfo command: {}", e))?
            },
            _ = tokio::time::sleep(timeout_duration) => {
                return Err(anyhow!("pdfinfo command timed out after 30 seconds"));
            }
        };

        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            return Err(anyhow!("pdfinfo failed: {}", filter_poppler_stderr(&stderr)));
        }

        let stdout = String::from_utf8_lossy(&output.stdout);
        for line in stdout.lines() {
            if let Some(rest) = line.strip_prefix("Pages:") {
                return rest
                    .trim()
                    .parse()
                    .map_err(|e| anyhow!("Failed to parse page count '{}': {}", rest.trim(), e));
            }
        }

        Err(anyhow!("pdfinfo output did not contain a page count"))
    }
}

/// Parse the XHTML document emitted by `pdftotext -bbox` into fragments.
///
/// Words keep their reading order within the output; page membership is
/// tracked by counting page elements.
pub fn parse_bbox_document(xml: &str) -> Vec<TextFragment> {
    let mut fragments = Vec::new();
    let mut page_index: Option<usize> = None;

    for line in xml.lines() {
        if PAGE_REGEX.is_match(line) {
            page_index = Some(page_index.map_or(0, |index| index + 1));
            continue;
        }

        let Some(page) = page_index else { continue };

        for captures in WORD_REGEX.captures_iter(line) {
            let (Ok(x_left), Ok(y_top), Ok(x_right), Ok(y_bottom)) = (
                captures[1].parse::<f64>(),
                captures[2].parse::<f64>(),
                captures[3].parse::<f64>(),
                captures[4].parse::<f64>(),
            ) else {
                continue;
            };

            fragments.push(TextFragment {
                text: unescape_xml(&captures[5]),
                x_left,
                x_right,
                y_top,
                y_bottom,
                page_index: page,
            });
        }
    }

    fragments
}

/// Decode the entity escapes pdftotext applies to word content
fn unescape_xml(text: &str) -> String {
    text.replace("&lt;", "<")
        .replace("&gt;", ">")
        .replace("&quot;", "\"")
        .replace("&apos;", "'")
        .replace("&#39;", "'")
        .replace("&amp;", "&")
}

/// Filter poppler stderr to meaningful error lines, dropping the syntax
/// warning noise emitted for slightly malformed but readable files.
fn filter_poppler_stderr(stderr: &str) -> String {
    let meaningful: Vec<&str> = stderr
        .lines()
        .filter(|line| {
            let trimmed = line.trim();
            !trimmed.is_empty() && !trimmed.starts_with("Syntax Warning")
        })
        .collect();

    if meaningful.is_empty() {
        "unknown pdftotext error (stderr was empty after filtering)".to_string()
    } else {
        meaningful.join("\n")
    }
}
