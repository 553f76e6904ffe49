//! Layout balance across the four canvas quadrants.
//!
//! # Overview
//!
//! The canvas is split at its horizontal and vertical midlines. Quadrants are
//! half-open towards the midlines: a center with `x < width / 2` is on the
//! left, anything from the midline up to `width` inclusive is on the right,
//! and likewise for `y`. Centers outside `[0, width] × [0, height]` are not
//! counted.

use std::fmt;

use indexmap::IndexMap;
use log::debug;
use serde::Serialize;

use svg_critic_core::{document::Document, geometry::Point};

/// Balance scores below this trigger a redistribution hint.
pub const REDISTRIBUTE_BELOW: f64 = 70.0;

/// One quarter of the canvas.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Quadrant {
    /// Top-left.
    Q1,
    /// Top-right.
    Q2,
    /// Bottom-right.
    Q3,
    /// Bottom-left.
    Q4,
}

impl Quadrant {
    /// All quadrants in enumeration order.
    pub const ALL: [Quadrant; 4] = [Quadrant::Q1, Quadrant::Q2, Quadrant::Q3, Quadrant::Q4];

    /// Returns the quadrant containing `point` on a `width` × `height` canvas.
    pub fn containing(point: Point, width: f64, height: f64) -> Option<Self> {
        let (x, y) = (point.x(), point.y());
        let inside = (0.0..=width).contains(&x) && (0.0..=height).contains(&y);
        if !inside {
            return None;
        }

        let left = x < width / 2.0;
        let top = y < height / 2.0;
        Some(match (left, top) {
            (true, true) => Quadrant::Q1,
            (false, true) => Quadrant::Q2,
            (false, false) => Quadrant::Q3,
            (true, false) => Quadrant::Q4,
        })
    }

    pub fn label(self) -> &'static str {
        match self {
            Quadrant::Q1 => "q1",
            Quadrant::Q2 => "q2",
            Quadrant::Q3 => "q3",
            Quadrant::Q4 => "q4",
        }
    }
}

impl fmt::Display for Quadrant {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Result of the layout analysis.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct LayoutAssessment {
    quadrant_distribution: IndexMap<Quadrant, usize>,
    balance_score: f64,
    suggestions: Vec<String>,
}

impl LayoutAssessment {
    /// Returns the shape count per quadrant, in [`Quadrant::ALL`] order.
    pub fn quadrant_distribution(&self) -> &IndexMap<Quadrant, usize> {
        &self.quadrant_distribution
    }

    /// Returns the balance score.
    ///
    /// 100 means an even spread. Layouts concentrated in a single quadrant
    /// score below zero.
    pub fn balance_score(&self) -> f64 {
        self.balance_score
    }

    pub fn suggestions(&self) -> &[String] {
        &self.suggestions
    }
}

/// Scores how evenly shape centers are spread over the quadrants.
pub fn analyze(document: &Document) -> LayoutAssessment {
    let mut distribution: IndexMap<Quadrant, usize> =
        Quadrant::ALL.iter().map(|q| (*q, 0)).collect();

    for shape in document.shapes() {
        let bounds = shape.bounds();
        if bounds.is_degenerate() {
            continue;
        }
        if let Some(quadrant) =
            Quadrant::containing(bounds.center(), document.width(), document.height())
        {
            *distribution.entry(quadrant).or_default() += 1;
        }
    }

    let balance_score = balance_score(&distribution);
    let suggestions = suggestions(&distribution, balance_score);
    debug!(distribution:?, balance_score; "Layout analyzed");

    LayoutAssessment {
        quadrant_distribution: distribution,
        balance_score,
        suggestions,
    }
}

fn balance_score(distribution: &IndexMap<Quadrant, usize>) -> f64 {
    let total: usize = distribution.values().sum();
    if total == 0 {
        return 100.0;
    }

    let total = total as f64;
    let mean = total / Quadrant::ALL.len() as f64;
    let deviation: f64 = distribution
        .values()
        .map(|count| (*count as f64 - mean).abs())
        .sum();
    100.0 - deviation / total * 100.0
}

fn suggestions(distribution: &IndexMap<Quadrant, usize>, balance_score: f64) -> Vec<String> {
    let mut suggestions = Vec::new();

    let empty: Vec<_> = distribution
        .iter()
        .filter(|(_, count)| **count == 0)
        .map(|(quadrant, _)| quadrant.label())
        .collect();
    if !empty.is_empty() {
        suggestions.push(format!(
            "Add content to empty quadrant(s): {}",
            empty.join(", ")
        ));
    }

    if balance_score < REDISTRIBUTE_BELOW {
        // First quadrant wins ties in both directions.
        let mut most = (Quadrant::Q1, 0);
        let mut least = (Quadrant::Q1, usize::MAX);
        for (quadrant, count) in distribution {
            if *count > most.1 {
                most = (*quadrant, *count);
            }
            if *count < least.1 {
                least = (*quadrant, *count);
            }
        }
        suggestions.push(format!(
            "Redistribute elements from {} to {} for better balance",
            most.0, least.0
        ));
    }

    suggestions
}
