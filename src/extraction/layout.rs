/*!
 * Geometric text extraction: grouping raw page fragments into visual lines.
 *
 * Fragments are clustered by vertical proximity with single-linkage
 * semantics: two fragments share a line when their top edges are closer
 * than the configured threshold, and membership chains transitively
 * through intermediate fragments. Sorting by y first and merging
 * consecutive fragments is equivalent to a union-find over the proximity
 * relation in one dimension, so the chaining holds regardless of the
 * order the page source delivered the fragments in.
 */

use std::cmp::Ordering;

use crate::app_config::ExtractionConfig;

use super::model::{Line, TextFragment};

/// Group page fragments into visual lines, ordered by page then top edge.
///
/// A page with zero fragments simply contributes zero lines.
pub fn group_fragments_into_lines(
    fragments: &[TextFragment],
    config: &ExtractionConfig,
) -> Vec<Line> {
    if fragments.is_empty() {
        return Vec::new();
    }

    let mut sorted: Vec<&TextFragment> = fragments.iter().collect();
    sorted.sort_by(|a, b| {
        a.page_index
            .cmp(&b.page_index)
            .then(a.y_top.partial_cmp(&b.y_top).unwrap_or(Ordering::Equal))
            .then(a.x_left.partial_cmp(&b.x_left).unwrap_or(Ordering::Equal))
    });

    let mut lines = Vec::new();
    let mut current: Vec<&TextFragment> = vec![sorted[0]];

    for &fragment in &sorted[1..] {
        let previous = current[current.len() - 1];

        // Single linkage: compare against the previous fragment in y order,
        // not the line's first member, so chains of near fragments merge
        // even when their extremes exceed the threshold
        let same_page = fragment.page_index == previous.page_index;
        let within_threshold =
            (fragment.y_top - previous.y_top).abs() < config.y_line_threshold;

        if same_page && within_threshold {
            current.push(fragment);
        } else {
            lines.push(merge_line_fragments(&current, config));
            current = vec![fragment];
        }
    }

    if !current.is_empty() {
        lines.push(merge_line_fragments(&current, config));
    }

    lines
}

/// Merge the fragments of one line into its text, left to right.
///
/// A space separator is only inserted across gaps wider than the
/// configured epsilon; adjacent glyph runs of a single word concatenate
/// directly.
fn merge_line_fragments(fragments: &[&TextFragment], config: &ExtractionConfig) -> Line {
    let mut ordered: Vec<&TextFragment> = fragments.to_vec();
    ordered.sort_by(|a, b| a.x_left.partial_cmp(&b.x_left).unwrap_or(Ordering::Equal));

    let mut text = String::new();
    let mut previous_right: Option<f64> = None;

    for fragment in &ordered {
        if let Some(right) = previous_right {
            if fragment.x_left - right > config.x_gap_epsilon {
                text.push(' ');
            }
        }
        text.push_str(&fragment.text);
        previous_right = Some(fragment.x_right);
    }

    Line {
        text,
        // Fragments arrive in y order, so the first one holds the topmost edge
        y: fragments[0].y_top,
        page_index: fragments[0].page_index,
    }
}
