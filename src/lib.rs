/*!
 * # advox - Audio Description Voiceover Pipeline
 *
 * A Rust library for turning printed audio-description scripts into
 * synthesized, timing-verified narration.
 *
 * ## Features
 *
 * - Extract timed entries from script PDFs by geometric layout analysis
 * - Recognize 4-digit timecode anchors and partition pages into regions
 * - Separate bracketed directorial instructions from spoken narration
 * - Synthesize narration audio through a TTS service with bounded
 *   concurrency, retry and cooperative cancellation
 * - Verify synthesized audio durations against the script timeline and
 *   report overlaps in milliseconds, seconds and frames
 *
 * ## Architecture
 *
 * The library is organized in these main modules:
 * - `app_config`: Configuration management
 * - `extraction`: PDF layout-to-timeline extraction:
 *   - `extraction::layout`: vertical clustering of fragments into lines
 *   - `extraction::anchors`: timecode anchor scanning
 *   - `extraction::regions`: region assignment per anchor
 *   - `extraction::classify`: instruction vs narration classification
 *   - `extraction::builder`: final entry construction
 *   - `extraction::page_source`: pluggable fragment suppliers
 * - `script_processor`: Script entry model and file round-trips
 * - `synthesis`: Speech synthesis services:
 *   - `synthesis::clova`: CLOVA Voice API client
 *   - `synthesis::mock`: deterministic fake engine for tests
 *   - `synthesis::batch`: bounded-concurrency batch processing
 * - `verify`: Duration and overlap verification
 * - `timecode`: Timecode parsing and formatting utilities
 * - `file_utils`: File system operations
 * - `app_controller`: Main application controller
 * - `errors`: Custom error types for the application
 *
 * ## License
 *
 * This project is licensed under the MIT License
 */

// Global lints configuration
// These lints will be allowed but not auto-fixed
#![allow(clippy::uninlined_format_args)]
#![allow(clippy::redundant_closure_for_method_calls)]
// Add other lints you want to allow but not auto-fix

// Public modules
pub mod app_config;
pub mod app_controller;
pub mod errors;
pub mod extraction;
pub mod file_utils;
pub mod script_processor;
pub mod synthesis;
pub mod timecode;
pub mod verify;

// Re-export main types for easier usage
pub use app_config::Config;
pub use errors::{AppError, ExtractionError, SynthesisError};
pub use extraction::{ExtractionReport, TextFragment, extract_document};
pub use script_processor::{ScriptCollection, ScriptEntry};
pub use synthesis::{BatchSynthesizer, SpeechSynthesizer};
pub use verify::{SyncReport, SyncStatus};
