//! Pairwise overlap detection.
//!
//! Every unordered pair of non-degenerate shapes is compared, which is
//! quadratic in the shape count. Shapes sharing a parent identifier are
//! assumed to be composed on purpose and are never compared.

use log::debug;
use serde::Serialize;

use svg_critic_core::{document::Document, geometry::Bounds};

/// Overlaps covering this share of the smaller shape or less are ignored.
pub const REPORT_THRESHOLD_PERCENT: f64 = 10.0;

/// Overlaps covering more than this share of the smaller shape are high severity.
pub const HIGH_SEVERITY_PERCENT: f64 = 50.0;

/// How serious an overlap is.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    Medium,
    High,
}

impl Severity {
    fn from_percentage(percentage: f64) -> Self {
        if percentage > HIGH_SEVERITY_PERCENT {
            Self::High
        } else {
            Self::Medium
        }
    }

    /// Returns the lowercase name used in reports.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Medium => "medium",
            Self::High => "high",
        }
    }
}

/// A reported overlap between two shapes.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Overlap {
    #[serde(skip)]
    shapes: (usize, usize),
    element1: String,
    element2: String,
    overlap_percentage: f64,
    severity: Severity,
}

impl Overlap {
    /// Returns the document indices of the two shapes, lower index first.
    pub fn shapes(&self) -> (usize, usize) {
        self.shapes
    }

    /// Returns the labels of the two shapes.
    pub fn elements(&self) -> (&str, &str) {
        (&self.element1, &self.element2)
    }

    /// Returns the overlap area as a percentage of the smaller shape's area.
    pub fn percentage(&self) -> f64 {
        self.overlap_percentage
    }

    pub fn severity(&self) -> Severity {
        self.severity
    }
}

/// Finds significant overlaps, in pair order `(0,1), (0,2), ..., (1,2), ...`.
pub fn detect(document: &Document) -> Vec<Overlap> {
    let shapes = document.shapes();
    let mut overlaps = Vec::new();

    for (i, first) in shapes.iter().enumerate() {
        if first.bounds().is_degenerate() {
            continue;
        }
        for (j, second) in shapes.iter().enumerate().skip(i + 1) {
            if second.bounds().is_degenerate() || first.parent() == second.parent() {
                continue;
            }
            let Some(percentage) = overlap_percentage(first.bounds(), second.bounds()) else {
                continue;
            };
            if percentage <= REPORT_THRESHOLD_PERCENT {
                continue;
            }
            overlaps.push(Overlap {
                shapes: (i, j),
                element1: document.shape_label(i),
                element2: document.shape_label(j),
                overlap_percentage: percentage,
                severity: Severity::from_percentage(percentage),
            });
        }
    }

    debug!(count = overlaps.len(); "Overlaps detected");
    overlaps
}

/// Returns the shared area of two boxes as a percentage of the smaller box,
/// or `None` when they do not intersect.
///
/// The percentage is `0` when the smaller box has no area.
pub fn overlap_percentage(a: Bounds, b: Bounds) -> Option<f64> {
    let shared = a.intersection(&b)?;
    let smaller = a.area().min(b.area());
    if smaller > 0.0 {
        Some(shared.area() * 100.0 / smaller)
    } else {
        Some(0.0)
    }
}


#[cfg(test)]
mod proptest_tests {
    use float_cmp::approx_eq;
    use proptest::prelude::*;

    use super::*;
    use svg_critic_core::geometry::Point;

    // ===================
    // Strategies
    // ===================

    fn bounds_strategy() -> impl Strategy<Value = Bounds> {
        (0.0f64..500.0, 0.0f64..500.0, 1.0f64..200.0, 1.0f64..200.0)
            .prop_map(|(x, y, w, h)| Bounds::new_from_top_left(Point::new(x, y), w, h))
    }

    // ===================
    // Property Test Functions
    // ===================

    fn check_overlap_is_symmetric(a: Bounds, b: Bounds) -> Result<(), TestCaseError> {
        let ab = overlap_percentage(a, b);
        let ba = overlap_percentage(b, a);
        prop_assert_eq!(ab.is_some(), ba.is_some());
        if let (Some(ab), Some(ba)) = (ab, ba) {
            prop_assert!(approx_eq!(f64, ab, ba, ulps = 4));
        }
        Ok(())
    }

    fn check_percentage_is_bounded(a: Bounds, b: Bounds) -> Result<(), TestCaseError> {
        if let Some(percentage) = overlap_percentage(a, b) {
            prop_assert!(percentage > 0.0);
            prop_assert!(percentage <= 100.0 + 1e-9);
        }
        Ok(())
    }

    proptest! {
        #[test]
        fn overlap_is_symmetric(a in bounds_strategy(), b in bounds_strategy()) {
            check_overlap_is_symmetric(a, b)?;
        }

        #[test]
        fn percentage_is_bounded(a in bounds_strategy(), b in bounds_strategy()) {
            check_percentage_is_bounded(a, b)?;
        }
    }
}
