//! Visual hierarchy from the size ratio of the largest to the smallest shape.

use log::debug;
use serde::Serialize;

use svg_critic_core::document::Document;

/// Ratios below this mean too little size contrast.
pub const MIN_GOOD_RATIO: f64 = 5.0;

/// Ratios above this mean extreme size differences.
pub const MAX_GOOD_RATIO: f64 = 25.0;

/// Result of the hierarchy analysis.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct VisualHierarchy {
    score: u8,
    #[serde(skip_serializing_if = "Option::is_none")]
    size_ratio: Option<f64>,
    suggestions: Vec<String>,
}

impl VisualHierarchy {
    /// Returns the hierarchy score: 0, 60, 75 or 100.
    pub fn score(&self) -> u8 {
        self.score
    }

    /// Returns largest area / smallest area, if any shape has an area.
    pub fn size_ratio(&self) -> Option<f64> {
        self.size_ratio
    }

    /// Returns the single suggestion for the score band.
    pub fn suggestions(&self) -> &[String] {
        &self.suggestions
    }
}

/// Scores the spread of shape sizes.
pub fn analyze(document: &Document) -> VisualHierarchy {
    let areas = document
        .shapes()
        .iter()
        .map(|shape| shape.bounds())
        .filter(|bounds| !bounds.is_degenerate())
        .map(|bounds| bounds.area());

    let mut range: Option<(f64, f64)> = None;
    for area in areas {
        range = Some(match range {
            None => (area, area),
            Some((smallest, largest)) => (smallest.min(area), largest.max(area)),
        });
    }

    let Some((smallest, largest)) = range else {
        debug!("No measurable shapes for hierarchy");
        return VisualHierarchy {
            score: 0,
            size_ratio: None,
            suggestions: vec!["Not enough measurable elements to analyze hierarchy".to_string()],
        };
    };

    let ratio = largest / smallest;
    let (score, suggestion) = if ratio < MIN_GOOD_RATIO {
        (
            60,
            "Increase size contrast between primary and secondary elements",
        )
    } else if ratio <= MAX_GOOD_RATIO {
        (100, "Current size hierarchy is appropriate")
    } else {
        (
            75,
            "Reduce extreme size differences that may overwhelm smaller elements",
        )
    };
    debug!(ratio, score; "Hierarchy analyzed");

    VisualHierarchy {
        score,
        size_ratio: Some(ratio),
        suggestions: vec![suggestion.to_string()],
    }
}
