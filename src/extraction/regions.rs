/*!
 * Region assignment: attaching content lines to their timecode anchors.
 *
 * Each anchor owns the vertical interval from its own y down to the next
 * anchor on the same page (or the end of the page for the last one).
 * Content lines join the region of the nearest preceding anchor on their
 * page; lines above every anchor of their page are orphans and are
 * reported instead of being folded into a neighboring page.
 */

use std::collections::HashMap;

use super::anchors::AnchorScan;
use super::model::{Diagnostic, Line, Region};

/// Assign every non-anchor line to a region, collecting orphans as
/// diagnostics.
///
/// Invariant: the returned regions are in anchor sequence order, one per
/// anchor, possibly empty.
pub fn assign_regions(lines: &[Line], scan: &AnchorScan) -> (Vec<Region>, Vec<Diagnostic>) {
    let mut regions: Vec<Region> = scan
        .anchors
        .iter()
        .map(|anchor| Region {
            anchor_sequence: anchor.sequence,
            lines: Vec::new(),
        })
        .collect();

    // Per-page anchor positions, ascending in y. Line and anchor order both
    // derive from the same sorted line sequence, so each page list is
    // already sorted.
    let mut anchors_by_page: HashMap<usize, Vec<(f64, usize)>> = HashMap::new();
    for anchor in &scan.anchors {
        anchors_by_page
            .entry(anchor.page_index)
            .or_default()
            .push((anchor.y, anchor.sequence));
    }

    let mut diagnostics = Vec::new();

    for (line_index, line) in lines.iter().enumerate() {
        if scan.anchor_line_indices.contains(&line_index) {
            // The anchor line itself is never region content
            continue;
        }

        let owner = anchors_by_page
            .get(&line.page_index)
            .and_then(|page_anchors| nearest_preceding(page_anchors, line.y));

        match owner {
            Some(sequence) => regions[sequence].lines.push(line.clone()),
            None => diagnostics.push(Diagnostic::OrphanedLine {
                page_index: line.page_index,
                y: line.y,
                text: line.text.clone(),
            }),
        }
    }

    (regions, diagnostics)
}

/// Find the anchor with the greatest y not exceeding the line's y.
///
/// A line sitting exactly on an anchor's y belongs to that anchor's own
/// region.
fn nearest_preceding(page_anchors: &[(f64, usize)], line_y: f64) -> Option<usize> {
    page_anchors
        .iter()
        .take_while(|(anchor_y, _)| *anchor_y <= line_y)
        .last()
        .map(|(_, sequence)| *sequence)
}
