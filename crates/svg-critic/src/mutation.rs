//! Rule-based document mutation.
//!
//! [`MutationEngine`] edits a copy of a document's element tree in response
//! to an [`Evaluation`], then extracts a fresh [`Document`] from the result.
//! The source document is never touched.
//!
//! # Rules
//!
//! Applied in this order, each independent of the others:
//!
//! 1. **Overlaps** - the first shape of every critical issue gets
//!    `translate(-10,-10)` appended to its own `transform` attribute.
//! 2. **Title** - without any text larger than 18 units, a centered
//!    "Diagram Title" text is appended to the root.
//! 3. **Palette** - below 70% palette adherence, every `fill` outside the
//!    palette (other than `none` and `transparent`) is replaced by a stable
//!    palette pick.
//! 4. **Font size** - below a font-size score of 80, every text whose
//!    `font-size` is a plain integer under 10 is set to 12.
//!
//! Re-applying the rules to their own output is always safe; overlaps keep
//! accumulating translations while they persist.

use indexmap::IndexMap;
use log::{debug, info};

use svg_critic_core::{
    color,
    document::{Document, ShapeKind},
    tree::{NodeId, SvgTree},
};
use svg_critic_parser::{
    attribute::{parse_length, plain_integer},
    extract,
};

use crate::{
    design_loop::{CollaboratorError, Improver},
    evaluation::Evaluation,
};

/// Transform appended to the first shape of an overlapping pair.
pub const OVERLAP_NUDGE: &str = "translate(-10,-10)";

/// Text larger than this counts as a title.
pub const TITLE_FONT_SIZE: f64 = 18.0;

const TITLE_TEXT: &str = "Diagram Title";
const TITLE_Y: &str = "30";

const REMAP_PALETTE_BELOW: f64 = 70.0;
const CLAMP_FONTS_BELOW: f64 = 80.0;
const MIN_FONT_SIZE: u32 = 10;
const CLAMPED_FONT_SIZE: &str = "12";

/// Counts of the edits made by one [`MutationEngine::apply`] call.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct MutationSummary {
    pub nudged: usize,
    pub title_added: bool,
    pub recolored: usize,
    pub resized: usize,
}

/// The local, deterministic improver.
#[derive(Debug, Clone, Copy, Default)]
pub struct MutationEngine;

impl MutationEngine {
    pub fn new() -> Self {
        Self
    }

    /// Applies every rule to a copy of `document` and returns the result.
    pub fn apply(&self, document: &Document, evaluation: &Evaluation) -> Document {
        self.apply_with_summary(document, evaluation).0
    }

    /// Like [`apply`](Self::apply), also reporting what was changed.
    pub fn apply_with_summary(
        &self,
        document: &Document,
        evaluation: &Evaluation,
    ) -> (Document, MutationSummary) {
        let mut tree = document.tree().clone();

        let summary = MutationSummary {
            nudged: nudge_overlaps(&mut tree, document, evaluation),
            title_added: add_title(&mut tree, document),
            recolored: if evaluation.color_harmony().palette_adherence() < REMAP_PALETTE_BELOW {
                remap_fills(&mut tree)
            } else {
                0
            },
            resized: if evaluation.accessibility().font_size_score() < CLAMP_FONTS_BELOW {
                clamp_font_sizes(&mut tree)
            } else {
                0
            },
        };
        info!(
            nudged = summary.nudged,
            title_added = summary.title_added,
            recolored = summary.recolored,
            resized = summary.resized;
            "Mutation rules applied"
        );

        (extract(tree), summary)
    }
}

impl Improver for MutationEngine {
    fn name(&self) -> &str {
        "local"
    }

    fn improve(
        &mut self,
        document: &Document,
        evaluation: &Evaluation,
    ) -> Result<Document, CollaboratorError> {
        Ok(self.apply(document, evaluation))
    }
}

fn nudge_overlaps(tree: &mut SvgTree, document: &Document, evaluation: &Evaluation) -> usize {
    let mut nudged = 0;
    for issue in evaluation.critical_issues() {
        let (first, _) = issue.shapes();
        let Some(shape) = document.shapes().get(first) else {
            debug!(index = first; "Critical issue refers to an unknown shape");
            continue;
        };

        let node = tree.node_mut(shape.node());
        let transform = match node.attribute("transform") {
            Some(existing) if !existing.is_empty() => format!("{existing} {OVERLAP_NUDGE}"),
            _ => OVERLAP_NUDGE.to_string(),
        };
        node.set_attribute("transform", transform);
        nudged += 1;
    }
    nudged
}

fn add_title(tree: &mut SvgTree, document: &Document) -> bool {
    let has_title = document
        .shapes()
        .iter()
        .filter(|shape| shape.kind() == ShapeKind::Text)
        .filter_map(|shape| shape.attribute("font-size").and_then(parse_length))
        .any(|size| size > TITLE_FONT_SIZE);
    if has_title {
        return false;
    }

    let attributes: IndexMap<String, String> = [
        ("x", (document.width() / 2.0).to_string()),
        ("y", TITLE_Y.to_string()),
        ("font-family", "Arial, sans-serif".to_string()),
        ("font-size", "24".to_string()),
        ("text-anchor", "middle".to_string()),
        ("fill", "#333".to_string()),
    ]
    .into_iter()
    .map(|(name, value)| (name.to_string(), value))
    .collect();

    let title = tree.append_element(NodeId::ROOT, "text", attributes);
    tree.append_text(title, TITLE_TEXT);
    true
}

fn remap_fills(tree: &mut SvgTree) -> usize {
    let mut recolored = 0;
    for id in tree.ids() {
        let node = tree.node_mut(id);
        let replacement = node
            .attribute("fill")
            .filter(|fill| is_remappable(fill))
            .map(color::palette_substitute);
        if let Some(replacement) = replacement {
            node.set_attribute("fill", replacement);
            recolored += 1;
        }
    }
    recolored
}

fn is_remappable(fill: &str) -> bool {
    let key = color::normalize(fill);
    !key.is_empty() && !color::is_palette(&key) && key != "none" && key != "transparent"
}

fn clamp_font_sizes(tree: &mut SvgTree) -> usize {
    let mut resized = 0;
    for id in tree.ids() {
        let node = tree.node_mut(id);
        if node.name() != ShapeKind::Text.tag() {
            continue;
        }
        let too_small = node
            .attribute("font-size")
            .and_then(plain_integer)
            .is_some_and(|size| size < MIN_FONT_SIZE);
        if too_small {
            node.set_attribute("font-size", CLAMPED_FONT_SIZE);
            resized += 1;
        }
    }
    resized
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::evaluation::evaluate;
    use svg_critic_parser::parse;

    fn mutate(source: &str) -> (Document, MutationSummary) {
        let document = parse(source).expect("valid document");
        let evaluation = evaluate(&document);
        MutationEngine::new().apply_with_summary(&document, &evaluation)
    }

    fn shape_attr<'a>(document: &'a Document, id: &str, name: &str) -> Option<&'a str> {
        document
            .shapes()
            .iter()
            .find(|shape| shape.id() == id)
            .and_then(|shape| shape.attribute(name))
    }

    #[test]
    fn test_overlap_nudges_first_shape() {
        let (document, summary) = mutate(
            r#"<svg width="400" height="400">
                <text font-size="30">Heading</text>
                <g id="one"><rect id="a" x="100" y="100" width="100" height="100" transform="scale(1)"/></g>
                <g id="two"><rect id="b" x="150" y="150" width="100" height="100"/></g>
                <g id="three"><rect id="c" x="160" y="160" width="100" height="100"/></g>
            </svg>"#,
        );
        assert_eq!(summary.nudged, 3);
        assert_eq!(
            shape_attr(&document, "a", "transform"),
            Some("scale(1) translate(-10,-10) translate(-10,-10)")
        );
        assert_eq!(
            shape_attr(&document, "b", "transform"),
            Some("translate(-10,-10)")
        );
        assert_eq!(shape_attr(&document, "c", "transform"), None);
    }

    #[test]
    fn test_nudge_targets_element_not_ancestor() {
        let (document, _) = mutate(
            r#"<svg width="400" height="400">
                <text font-size="30">Heading</text>
                <g id="one" transform="translate(5,5)"><rect id="a" width="100" height="100"/></g>
                <g id="two"><rect id="b" width="100" height="100"/></g>
            </svg>"#,
        );
        let root = document.tree().root();
        assert_eq!(root.attribute("transform"), None);
        assert_eq!(
            shape_attr(&document, "a", "transform"),
            Some("translate(-10,-10)")
        );
        let group = document
            .tree()
            .element_children(NodeId::ROOT)
            .nth(1)
            .expect("group");
        assert_eq!(
            document.tree().node(group).attribute("transform"),
            Some("translate(5,5)")
        );
    }

    #[test]
    fn test_title_added_when_missing() {
        let (document, summary) = mutate(
            r##"<svg width="640" height="480">
                <rect id="a" x="100" y="100" width="50" height="50" fill="#19aeff"/>
                <text font-size="18">Not a title</text>
            </svg>"##,
        );
        assert!(summary.title_added);

        let title = document.shapes().last().expect("title shape");
        assert_eq!(title.kind(), ShapeKind::Text);
        assert_eq!(title.attribute("x"), Some("320"));
        assert_eq!(title.attribute("y"), Some("30"));
        assert_eq!(title.attribute("font-size"), Some("24"));
        assert_eq!(title.attribute("text-anchor"), Some("middle"));
        assert_eq!(document.tree().node(title.node()).text(), "Diagram Title");
        assert_eq!(title.parent(), None);
    }

    #[test]
    fn test_title_not_added_when_present() {
        let (_, summary) = mutate(r#"<svg><text font-size="24px">Title</text></svg>"#);
        assert!(!summary.title_added);
    }

    #[test]
    fn test_palette_remap_below_threshold() {
        let (document, summary) = mutate(
            r##"<svg>
                <text font-size="20">Title</text>
                <rect id="red" fill="red"/>
                <rect id="blue" fill="Blue"/>
                <rect id="palette" fill="#19AEFF"/>
                <rect id="none" fill="none"/>
                <g id="group" fill="purple"/>
            </svg>"##,
        );
        assert_eq!(summary.recolored, 3);
        assert_eq!(
            shape_attr(&document, "red", "fill"),
            Some(color::palette_substitute("red"))
        );
        assert_eq!(
            shape_attr(&document, "blue", "fill"),
            Some(color::palette_substitute("blue"))
        );
        assert_eq!(shape_attr(&document, "palette", "fill"), Some("#19AEFF"));
        assert_eq!(shape_attr(&document, "none", "fill"), Some("none"));
    }

    #[test]
    fn test_palette_kept_at_or_above_threshold() {
        let (document, summary) = mutate(
            r##"<svg>
                <text font-size="20">Title</text>
                <rect fill="#19aeff"/>
                <rect fill="#19aeff"/>
                <rect id="odd" fill="#19aeff" stroke="red"/>
            </svg>"##,
        );
        assert_eq!(summary.recolored, 0);
        assert_eq!(shape_attr(&document, "odd", "stroke"), Some("red"));
    }

    #[test]
    fn test_small_integer_fonts_are_clamped() {
        let (document, summary) = mutate(
            r#"<svg>
                <text id="title" font-size="20">Title</text>
                <text id="tiny" font-size="8">a</text>
                <text id="unit" font-size="8px">b</text>
                <text id="fine" font-size="11">c</text>
            </svg>"#,
        );
        assert_eq!(summary.resized, 1);
        assert_eq!(shape_attr(&document, "tiny", "font-size"), Some("12"));
        assert_eq!(shape_attr(&document, "unit", "font-size"), Some("8px"));
        assert_eq!(shape_attr(&document, "fine", "font-size"), Some("11"));
    }

    #[test]
    fn test_fonts_untouched_when_score_is_high() {
        let texts: String = (0..5)
            .map(|i| format!(r#"<text id="t{i}" font-size="20">x</text>"#))
            .collect();
        let (document, summary) =
            mutate(&format!(r#"<svg>{texts}<text id="small" font-size="9">y</text></svg>"#));
        assert_eq!(summary.resized, 0);
        assert_eq!(shape_attr(&document, "small", "font-size"), Some("9"));
    }

    #[test]
    fn test_repeated_application_is_safe() {
        let engine = MutationEngine::new();
        let mut document = parse(
            r#"<svg>
                <g id="one"><rect id="a" width="100" height="100" fill="red"/></g>
                <g id="two"><rect id="b" width="100" height="100" fill="green"/></g>
                <text font-size="5">x</text>
            </svg>"#,
        )
        .expect("valid document");

        for _ in 0..4 {
            let evaluation = evaluate(&document);
            document = engine.apply(&document, &evaluation);
        }

        let titles = document
            .shapes()
            .iter()
            .filter(|shape| shape.attribute("font-size") == Some("24"))
            .count();
        assert_eq!(titles, 1);
    }

    #[test]
    fn test_source_document_is_unchanged() {
        let document = parse(r#"<svg><rect id="a" fill="red"/></svg>"#).expect("valid document");
        let before = document.clone();
        let evaluation = evaluate(&document);
        let _ = MutationEngine::new().apply(&document, &evaluation);
        assert_eq!(document, before);
    }
}
