/*!
 * PDF layout-to-timeline extraction.
 *
 * Turns a document's positioned text fragments into ordered, timecode-
 * anchored script entries. The pipeline is pure and synchronous; data
 * flows strictly forward:
 *
 * - `layout`: vertical clustering of fragments into visual lines
 * - `anchors`: whole-line timecode anchor scanning
 * - `regions`: attaching content lines to their anchors
 * - `classify`: instruction vs narration split per region
 * - `builder`: final entry emission
 * - `page_source`: fragment suppliers (poppler-backed in production)
 * - `model`: shared data types and diagnostics
 */

// Re-export main types for easier usage
pub use self::anchors::{AnchorScan, scan_anchors};
pub use self::builder::build_entries;
pub use self::classify::{RegionContent, classify_region};
pub use self::layout::group_fragments_into_lines;
pub use self::model::{
    Anchor, Diagnostic, ExtractionReport, Line, Region, TextFragment,
};
pub use self::page_source::{PageSource, PdfTextSource, parse_bbox_document};
pub use self::regions::assign_regions;

// Submodules
pub mod anchors;
pub mod builder;
pub mod classify;
pub mod layout;
pub mod model;
pub mod page_source;
pub mod regions;

use anyhow::Result;

use crate::app_config::ExtractionConfig;
use crate::errors::ExtractionError;
use crate::timecode::NormalizedTimecode;

/// Run the full extraction pipeline over a document's fragments.
///
/// Returns every entry the document yields plus the accumulated
/// diagnostics, or a single fatal error when the document has no usable
/// structure. The pipeline holds no state between invocations.
pub fn extract_document<F>(
    fragments: &[TextFragment],
    config: &ExtractionConfig,
    convert: F,
) -> Result<ExtractionReport, ExtractionError>
where
    F: Fn(&str) -> Result<NormalizedTimecode>,
{
    let lines = group_fragments_into_lines(fragments, config);

    let scan = scan_anchors(&lines, config)?;
    let (regions, orphan_diagnostics) = assign_regions(&lines, &scan);
    let (entries, builder_diagnostics) = build_entries(&scan.anchors, &regions, config, convert);

    let mut diagnostics = scan.diagnostics;
    diagnostics.extend(orphan_diagnostics);
    diagnostics.extend(builder_diagnostics);

    Ok(ExtractionReport {
        entries,
        diagnostics,
    })
}
