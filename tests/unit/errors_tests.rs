/*!
 * Tests for error types and conversions
 */

use advox::errors::{AppError, ExtractionError, SynthesisError};

#[test]
fn test_extraction_error_display_shouldDescribeCondition() {
    let error = ExtractionError::NoAnchorsFound;
    assert_eq!(error.to_string(), "no timecode anchors found in document");
}

#[test]
fn test_synthesis_error_retryability_shouldFollowTaxonomy() {
    assert!(SynthesisError::Transport("timeout".into()).is_retryable());
    assert!(SynthesisError::Quota("429".into()).is_retryable());

    assert!(!SynthesisError::Auth("401".into()).is_retryable());
    assert!(!SynthesisError::InvalidRequest("400".into()).is_retryable());
    assert!(!SynthesisError::Decode("bad wav".into()).is_retryable());
    assert!(!SynthesisError::Cancelled.is_retryable());
}

#[test]
fn test_app_error_fromExtraction_shouldWrap() {
    let app_error: AppError = ExtractionError::NoAnchorsFound.into();
    assert!(matches!(app_error, AppError::Extraction(_)));
    assert!(app_error.to_string().contains("no timecode anchors"));
}

#[test]
fn test_app_error_fromIo_shouldBecomeFileError() {
    let io_error = std::io::Error::new(std::io::ErrorKind::NotFound, "missing");
    let app_error: AppError = io_error.into();
    assert!(matches!(app_error, AppError::File(_)));
}

#[test]
fn test_app_error_fromAnyhow_shouldBecomeUnknown() {
    let app_error: AppError = anyhow::anyhow!("something else").into();
    assert!(matches!(app_error, AppError::Unknown(_)));
}
