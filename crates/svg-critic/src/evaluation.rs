//! Score aggregation.
//!
//! [`evaluate`] runs every analyzer over a document and folds the results
//! into an [`Evaluation`]: one weighted overall score, the overlap findings
//! as critical issues, the per-aspect results and a list of suggested code
//! changes.
//!
//! # Weights
//!
//! | Aspect        | Weight |
//! |---------------|--------|
//! | Overlaps      | 0.25   |
//! | Layout        | 0.20   |
//! | Color         | 0.15   |
//! | Hierarchy     | 0.20   |
//! | Accessibility | 0.20   |

use log::{debug, info};
use serde::Serialize;

use svg_critic_core::document::Document;

use crate::analysis::{
    accessibility::{self, Accessibility},
    color::{self, ColorHarmony},
    hierarchy::{self, VisualHierarchy},
    layout::{self, LayoutAssessment},
    overlap::{self, Overlap, Severity},
};

pub const OVERLAP_WEIGHT: f64 = 0.25;
pub const LAYOUT_WEIGHT: f64 = 0.20;
pub const COLOR_WEIGHT: f64 = 0.15;
pub const HIERARCHY_WEIGHT: f64 = 0.20;
pub const ACCESSIBILITY_WEIGHT: f64 = 0.20;

/// Points deducted from the overlap sub-score per reported overlap.
const OVERLAP_PENALTY: usize = 20;

/// Shapes closer than this to a canvas edge get a position suggestion.
pub const EDGE_BUFFER: f64 = 20.0;

/// The five aspect scores, before weighting.
///
/// Every aspect scores at most 100. The layout score is the raw balance
/// score and drops to -50 when all shapes share one quadrant.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct SubScores {
    overlaps: f64,
    layout: f64,
    color: f64,
    hierarchy: f64,
    accessibility: f64,
}

impl SubScores {
    pub fn new(overlaps: f64, layout: f64, color: f64, hierarchy: f64, accessibility: f64) -> Self {
        Self {
            overlaps,
            layout,
            color,
            hierarchy,
            accessibility,
        }
    }

    pub fn overlaps(&self) -> f64 {
        self.overlaps
    }

    pub fn layout(&self) -> f64 {
        self.layout
    }

    pub fn color(&self) -> f64 {
        self.color
    }

    pub fn hierarchy(&self) -> f64 {
        self.hierarchy
    }

    pub fn accessibility(&self) -> f64 {
        self.accessibility
    }

    /// Returns the weighted sum of the sub-scores.
    pub fn weighted_total(&self) -> f64 {
        OVERLAP_WEIGHT * self.overlaps
            + LAYOUT_WEIGHT * self.layout
            + COLOR_WEIGHT * self.color
            + HIERARCHY_WEIGHT * self.hierarchy
            + ACCESSIBILITY_WEIGHT * self.accessibility
    }

    /// Returns the weighted total rounded to the nearest integer, ties to
    /// even, and bounded to `0..=100`.
    pub fn overall(&self) -> u8 {
        self.weighted_total().round_ties_even().clamp(0.0, 100.0) as u8
    }
}

/// Kind of a critical issue. Overlaps are the only critical findings.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum IssueKind {
    Overlap,
}

/// A finding serious enough to list separately.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CriticalIssue {
    #[serde(rename = "type")]
    kind: IssueKind,
    elements: [String; 2],
    severity: Severity,
    #[serde(skip)]
    shapes: (usize, usize),
}

impl CriticalIssue {
    fn from_overlap(overlap: &Overlap) -> Self {
        let (first, second) = overlap.elements();
        Self {
            kind: IssueKind::Overlap,
            elements: [first.to_string(), second.to_string()],
            severity: overlap.severity(),
            shapes: overlap.shapes(),
        }
    }

    pub fn kind(&self) -> IssueKind {
        self.kind
    }

    /// Returns the labels of the two shapes involved.
    pub fn elements(&self) -> &[String; 2] {
        &self.elements
    }

    pub fn severity(&self) -> Severity {
        self.severity
    }

    /// Returns the document indices of the two shapes involved.
    pub fn shapes(&self) -> (usize, usize) {
        self.shapes
    }
}

/// Category of a suggested code change.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ChangeKind {
    General,
    Position,
}

impl ChangeKind {
    pub fn title(self) -> &'static str {
        match self {
            Self::General => "General",
            Self::Position => "Position",
        }
    }
}

/// A concrete edit a designer could make to the markup.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CodeChange {
    #[serde(rename = "type")]
    kind: ChangeKind,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    elements: Vec<String>,
    issue: String,
    suggestion: String,
}

impl CodeChange {
    pub fn kind(&self) -> ChangeKind {
        self.kind
    }

    /// Returns the labels of the shapes the change refers to, if any.
    pub fn elements(&self) -> &[String] {
        &self.elements
    }

    pub fn issue(&self) -> &str {
        &self.issue
    }

    pub fn suggestion(&self) -> &str {
        &self.suggestion
    }
}

/// The complete critique of one document.
///
/// An evaluation is a value: produced once, never edited afterwards.
/// Serializing the same evaluation twice gives identical JSON.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Evaluation {
    overall_score: u8,
    critical_issues: Vec<CriticalIssue>,
    sub_scores: SubScores,
    layout_assessment: LayoutAssessment,
    color_harmony: ColorHarmony,
    visual_hierarchy: VisualHierarchy,
    accessibility: Accessibility,
    suggested_code_changes: Vec<CodeChange>,
}

impl Evaluation {
    /// Replaces the overall score with one assigned by an external judge,
    /// clamped to 100. Sub-results are kept.
    pub fn with_overall_score(mut self, score: u8) -> Self {
        self.overall_score = score.min(100);
        self
    }

    pub fn overall_score(&self) -> u8 {
        self.overall_score
    }

    pub fn critical_issues(&self) -> &[CriticalIssue] {
        &self.critical_issues
    }

    pub fn sub_scores(&self) -> &SubScores {
        &self.sub_scores
    }

    pub fn layout_assessment(&self) -> &LayoutAssessment {
        &self.layout_assessment
    }

    pub fn color_harmony(&self) -> &ColorHarmony {
        &self.color_harmony
    }

    pub fn visual_hierarchy(&self) -> &VisualHierarchy {
        &self.visual_hierarchy
    }

    pub fn accessibility(&self) -> &Accessibility {
        &self.accessibility
    }

    pub fn suggested_code_changes(&self) -> &[CodeChange] {
        &self.suggested_code_changes
    }

    /// Serializes the evaluation as pretty-printed JSON.
    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string_pretty(self)
    }
}

/// Evaluates a document with the local analyzers.
pub fn evaluate(document: &Document) -> Evaluation {
    info!(shapes = document.shapes().len(); "Evaluating document");

    let overlaps = overlap::detect(document);
    let layout_assessment = layout::analyze(document);
    let color_harmony = color::analyze(document);
    let visual_hierarchy = hierarchy::analyze(document);
    let accessibility = accessibility::analyze(document);

    let overlap_score = 100 - (overlaps.len() * OVERLAP_PENALTY).min(100);
    let sub_scores = SubScores::new(
        overlap_score as f64,
        layout_assessment.balance_score(),
        color_harmony.palette_adherence(),
        f64::from(visual_hierarchy.score()),
        accessibility.score(),
    );
    let overall_score = sub_scores.overall();

    let suggested_code_changes = suggest_code_changes(document, &overlaps);
    let critical_issues = overlaps.iter().map(CriticalIssue::from_overlap).collect();

    debug!(sub_scores:?; "Sub-scores computed");
    info!(overall_score; "Evaluation complete");

    Evaluation {
        overall_score,
        critical_issues,
        sub_scores,
        layout_assessment,
        color_harmony,
        visual_hierarchy,
        accessibility,
        suggested_code_changes,
    }
}

fn suggest_code_changes(document: &Document, overlaps: &[Overlap]) -> Vec<CodeChange> {
    let mut changes = Vec::new();

    let missing_ids = document
        .shapes()
        .iter()
        .filter(|shape| shape.id().is_empty())
        .count();
    if missing_ids > 0 {
        changes.push(CodeChange {
            kind: ChangeKind::General,
            elements: Vec::new(),
            issue: "Missing element IDs".to_string(),
            suggestion: format!(
                "Add ID attributes to {missing_ids} elements for better maintainability"
            ),
        });
    }

    for overlap in overlaps {
        let (first, second) = overlap.elements();
        changes.push(CodeChange {
            kind: ChangeKind::Position,
            elements: vec![first.to_string(), second.to_string()],
            issue: format!("Elements overlap by {:.1}%", overlap.percentage()),
            suggestion: format!("Adjust position of {first} or {second} to prevent overlap"),
        });
    }

    let canvas = document.canvas();
    for (index, shape) in document.shapes().iter().enumerate() {
        let bounds = shape.bounds();
        if bounds.is_degenerate() {
            continue;
        }
        let (left, top, right, bottom) = bounds.margins_within(&canvas);
        if [left, top, right, bottom].iter().any(|m| *m < EDGE_BUFFER) {
            let label = document.shape_label(index);
            changes.push(CodeChange {
                kind: ChangeKind::Position,
                elements: vec![label.clone()],
                issue: format!("Element {label} is too close to SVG edge"),
                suggestion: format!("Move {label} inward to maintain proper margin"),
            });
        }
    }

    changes
}


#[cfg(test)]
mod proptest_tests {
    use proptest::prelude::*;

    use super::*;
    use svg_critic_parser::parse;

    // ===================
    // Strategies
    // ===================

    fn shape_strategy() -> impl Strategy<Value = String> {
        let colors = prop::sample::select(vec![
            "#19aeff", "#ff4141", "#333333", "red", "white", "none", "#abcdef",
        ]);
        (
            0u32..600,
            0u32..600,
            0u32..300,
            0u32..300,
            colors,
            prop::option::of("[a-c]"),
        )
            .prop_map(|(x, y, w, h, fill, parent)| {
                let rect = format!(
                    r#"<rect x="{x}" y="{y}" width="{w}" height="{h}" fill="{fill}"/>"#
                );
                match parent {
                    Some(id) => format!(r#"<g id="{id}">{rect}</g>"#),
                    None => rect,
                }
            })
    }

    fn document_strategy() -> impl Strategy<Value = String> {
        (
            prop::collection::vec(shape_strategy(), 0..12),
            prop::collection::vec(1u32..30, 0..4),
        )
            .prop_map(|(shapes, font_sizes)| {
                let texts: String = font_sizes
                    .iter()
                    .map(|size| format!(r#"<text font-size="{size}">t</text>"#))
                    .collect();
                format!(
                    r#"<svg width="600" height="600">{}{texts}</svg>"#,
                    shapes.concat()
                )
            })
    }

    // ===================
    // Property Test Functions
    // ===================

    fn check_overall_score_is_rounded_weighted_sum(source: &str) -> Result<(), TestCaseError> {
        let result = evaluate(&parse(source).expect("generated markup is valid"));
        let expected = result
            .sub_scores()
            .weighted_total()
            .round_ties_even()
            .clamp(0.0, 100.0);
        prop_assert!(result.overall_score() <= 100);
        prop_assert_eq!(f64::from(result.overall_score()), expected);
        Ok(())
    }

    fn check_evaluation_is_deterministic(source: &str) -> Result<(), TestCaseError> {
        let document = parse(source).expect("generated markup is valid");
        let first = evaluate(&document).to_json().expect("serializable");
        let second = evaluate(&document).to_json().expect("serializable");
        prop_assert_eq!(first, second);
        Ok(())
    }

    proptest! {
        #[test]
        fn overall_score_is_rounded_weighted_sum(source in document_strategy()) {
            check_overall_score_is_rounded_weighted_sum(&source)?;
        }

        #[test]
        fn evaluation_is_deterministic(source in document_strategy()) {
            check_evaluation_is_deterministic(&source)?;
        }
    }
}
