/*!
 * Error types for the advox application.
 *
 * This module contains custom error types for different parts of the application,
 * using the thiserror crate for ergonomic error definitions.
 */

// Allow dead code - error types are for library consumers
#![allow(dead_code)]

use thiserror::Error;

/// Errors that invalidate a whole document during extraction
///
/// Per-line anomalies (orphaned lines, duplicate anchors, invalid timecode
/// values) are not errors; they are collected as `Diagnostic` values and
/// returned alongside the extracted entries.
#[derive(Error, Debug)]
pub enum ExtractionError {
    /// No line in the document matched the timecode anchor pattern,
    /// so there is no valid region partition
    #[error("no timecode anchors found in document")]
    NoAnchorsFound,

    /// The page source failed to deliver text fragments
    #[error("page source error: {0}")]
    PageSource(String),

    /// The configured anchor pattern is not a valid regular expression
    #[error("invalid anchor pattern '{pattern}': {message}")]
    InvalidAnchorPattern {
        /// The offending pattern from configuration
        pattern: String,
        /// Error message from the regex compiler
        message: String,
    },
}

/// Errors that can occur when calling the speech synthesis service
#[derive(Error, Debug, Clone)]
pub enum SynthesisError {
    /// Network or server-side failure; retryable
    #[error("synthesis transport error: {0}")]
    Transport(String),

    /// Request quota or rate limit exhausted (HTTP 429); retryable after backoff
    #[error("synthesis quota exceeded: {0}")]
    Quota(String),

    /// Authentication failure (HTTP 401/403); not retryable
    #[error("synthesis authentication error: {0}")]
    Auth(String),

    /// The service rejected the request itself; not retryable
    #[error("synthesis request rejected: {0}")]
    InvalidRequest(String),

    /// The returned audio payload could not be decoded
    #[error("failed to decode synthesized audio: {0}")]
    Decode(String),

    /// The batch was cancelled before this entry was issued
    #[error("synthesis cancelled")]
    Cancelled,
}

impl SynthesisError {
    /// Whether the batch layer should retry this error with backoff
    pub fn is_retryable(&self) -> bool {
        matches!(self, Self::Transport(_) | Self::Quota(_))
    }
}

/// Main application error type that wraps all other errors
#[derive(Error, Debug)]
pub enum AppError {
    /// Error from a file operation
    #[error("File error: {0}")]
    File(String),

    /// Error from document extraction
    #[error("Extraction error: {0}")]
    Extraction(#[from] ExtractionError),

    /// Error from speech synthesis
    #[error("Synthesis error: {0}")]
    Synthesis(#[from] SynthesisError),

    /// Any other error
    #[error("Unknown error: {0}")]
    Unknown(String),
}

// Utility functions for error conversion
impl From<anyhow::Error> for AppError {
    fn from(error: anyhow::Error) -> Self {
        Self::Unknown(error.to_string())
    }
}

impl From<std::io::Error> for AppError {
    fn from(error: std::io::Error) -> Self {
        Self::File(error.to_string())
    }
}
