/*!
 * Region content classification.
 *
 * Splits each region's lines into bracketed instruction spans and spoken
 * narration text. Instructions are directorial notes that must not reach
 * the synthesis service; narration is everything else, concatenated in
 * reading order.
 */

use regex::Regex;

use crate::app_config::ExtractionConfig;

use super::model::Line;

/// Classified content of one region
#[derive(Debug, Clone, PartialEq, Default)]
pub struct RegionContent {
    /// Bracketed spans, space-joined in encounter order
    pub instruction: String,

    /// Non-bracketed text, space-joined in line order
    pub narration: String,
}

/// Split a region's lines into instruction and narration strings.
///
/// A region whose lines are entirely bracketed yields an empty narration
/// and a non-empty instruction; such regions stay valid entries.
pub fn classify_region(lines: &[Line], config: &ExtractionConfig) -> RegionContent {
    let bracket_pattern = bracket_regex(config);

    let mut instruction_parts: Vec<String> = Vec::new();
    let mut narration_parts: Vec<String> = Vec::new();

    for line in lines {
        for captures in bracket_pattern.captures_iter(&line.text) {
            let span = captures[1].trim().to_string();
            if span.is_empty() {
                continue;
            }
            let filtered = config
                .instruction_stop_words
                .iter()
                .any(|stop| span.contains(stop.as_str()));
            if !filtered {
                instruction_parts.push(span);
            }
        }

        let remainder = bracket_pattern.replace_all(&line.text, " ");
        let remainder = collapse_whitespace(&remainder);
        if !remainder.is_empty() {
            narration_parts.push(remainder);
        }
    }

    RegionContent {
        instruction: instruction_parts.join(" "),
        narration: collapse_whitespace(&narration_parts.join(" ")),
    }
}

/// Build the instruction span pattern from the configured bracket pair
fn bracket_regex(config: &ExtractionConfig) -> Regex {
    let open = regex::escape(&config.bracket_open.to_string());
    let close = regex::escape(&config.bracket_close.to_string());
    let pattern = format!("{open}([^{close}]*){close}");
    // The pieces are escaped literals around a negated class, so the
    // pattern always compiles
    Regex::new(&pattern).expect("bracket pattern is built from escaped literals")
}

/// Collapse runs of whitespace to single spaces and trim the ends
pub fn collapse_whitespace(text: &str) -> String {
    text.split_whitespace().collect::<Vec<_>>().join(" ")
}
