//! Accessibility checks: small text and low-contrast paint pairs.
//!
//! # Overview
//!
//! Font sizes are read loosely: the first run of digits in `font-size` is the
//! size (`"9.5px"` reads as 9), and text without a readable size counts as
//! [`DEFAULT_FONT_SIZE`]. Contrast is a heuristic over each shape's own `fill`
//! and `stroke`, not a luminance computation.

use log::debug;
use serde::Serialize;

use svg_critic_core::{
    color,
    document::{Document, ShapeKind},
};
use svg_critic_parser::attribute::leading_integer;

/// Font size assumed when none can be read.
pub const DEFAULT_FONT_SIZE: u32 = 12;

/// Text below this size counts as small.
pub const SMALL_FONT_SIZE: u32 = 10;

/// Score penalty per contrast issue.
const CONTRAST_PENALTY: f64 = 10.0;

const WHITE_FILLS: [&str; 2] = ["#ffffff", "white"];
const LIGHT_GRAY_STROKES: [&str; 2] = ["#f0f0f0", "#f8f9fa"];
const BLACK_FILLS: [&str; 2] = ["#000000", "black"];
const DARK_GRAY_STROKES: [&str; 2] = ["#333333", "#444444"];

/// Result of the accessibility analysis.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Accessibility {
    score: f64,
    font_size_score: f64,
    small_text_count: usize,
    contrast_issues: Vec<String>,
    suggestions: Vec<String>,
}

impl Accessibility {
    /// Returns the combined score in `[0, 100]`.
    pub fn score(&self) -> f64 {
        self.score
    }

    /// Returns the share of text shapes that are not small, in percent.
    /// `100` when there is no text.
    pub fn font_size_score(&self) -> f64 {
        self.font_size_score
    }

    pub fn small_text_count(&self) -> usize {
        self.small_text_count
    }

    /// Returns one message per shape with a low-contrast fill/stroke pair.
    pub fn contrast_issues(&self) -> &[String] {
        &self.contrast_issues
    }

    pub fn suggestions(&self) -> &[String] {
        &self.suggestions
    }
}

/// Returns the font size of a text shape's `font-size` value.
pub fn font_size(value: Option<&str>) -> u32 {
    value.and_then(leading_integer).unwrap_or(DEFAULT_FONT_SIZE)
}

/// Checks text sizes and paint contrast.
pub fn analyze(document: &Document) -> Accessibility {
    let text_sizes: Vec<u32> = document
        .shapes()
        .iter()
        .filter(|shape| shape.kind() == ShapeKind::Text)
        .map(|shape| font_size(shape.attribute("font-size")))
        .collect();
    let small_text_count = text_sizes
        .iter()
        .filter(|size| **size < SMALL_FONT_SIZE)
        .count();
    let font_size_score = if text_sizes.is_empty() {
        100.0
    } else {
        100.0 - small_text_count as f64 / text_sizes.len() as f64 * 100.0
    };

    let contrast_issues: Vec<String> = document
        .shapes()
        .iter()
        .enumerate()
        .filter_map(|(index, shape)| {
            let fill = color::normalize(shape.attribute("fill").unwrap_or_default());
            let stroke = color::normalize(shape.attribute("stroke").unwrap_or_default());
            let label = document.shape_label(index);
            if WHITE_FILLS.contains(&fill.as_str())
                && LIGHT_GRAY_STROKES.contains(&stroke.as_str())
            {
                Some(format!("Low contrast white on light gray in element {label}"))
            } else if BLACK_FILLS.contains(&fill.as_str())
                && DARK_GRAY_STROKES.contains(&stroke.as_str())
            {
                Some(format!("Low contrast black on dark gray in element {label}"))
            } else {
                None
            }
        })
        .collect();

    let contrast_score = 100.0 - contrast_issues.len() as f64 * CONTRAST_PENALTY;
    let score = ((font_size_score + contrast_score) / 2.0).clamp(0.0, 100.0);

    let mut suggestions = Vec::new();
    if small_text_count > 0 {
        suggestions.push(format!(
            "Increase font size for {small_text_count} text elements that are smaller than {SMALL_FONT_SIZE}px"
        ));
    }
    if !contrast_issues.is_empty() {
        suggestions.push("Improve color contrast for better readability".to_string());
    }

    debug!(
        texts = text_sizes.len(),
        small_text_count,
        contrast_issues = contrast_issues.len(),
        score;
        "Accessibility analyzed"
    );

    Accessibility {
        score,
        font_size_score,
        small_text_count,
        contrast_issues,
        suggestions,
    }
}
