//! Geometry extraction: element tree into a [`Document`].
//!
//! The walk is depth-first in document order, starting from the root's
//! children, driven by an explicit stack of [`Frame`]s. Each frame carries
//! the transform propagated from ancestors and the identifier of the
//! enclosing element, so no recursion is needed however deep the groups nest.

use log::{debug, warn};

use svg_critic_core::{
    document::{DEFAULT_CANVAS_HEIGHT, DEFAULT_CANVAS_WIDTH, Document, ShapeElement, ShapeKind},
    geometry::{Bounds, Point},
    tree::{Node, NodeId, SvgTree},
};

use crate::attribute::{length_or_zero, parse_length};

/// A pending element together with the context inherited from its ancestors.
struct Frame {
    id: NodeId,
    inherited_transform: Option<String>,
    parent: Option<String>,
}

/// Builds a [`Document`] from an element tree.
///
/// Canvas width and height come from the root's `width`/`height`
/// attributes (plain or `px` lengths); anything else falls back to 800×600.
/// Every `rect`, `circle`, `ellipse`, `line`, `polyline`, `polygon`, `path`
/// and `text` element becomes a [`ShapeElement`]; all other elements are
/// walked but not recorded.
pub fn extract(tree: SvgTree) -> Document {
    let width = canvas_dimension(tree.root(), "width", DEFAULT_CANVAS_WIDTH);
    let height = canvas_dimension(tree.root(), "height", DEFAULT_CANVAS_HEIGHT);

    let mut shapes = Vec::new();
    let mut stack: Vec<Frame> = tree
        .element_children(NodeId::ROOT)
        .rev()
        .map(|id| Frame {
            id,
            inherited_transform: None,
            parent: None,
        })
        .collect();

    while let Some(frame) = stack.pop() {
        let node = tree.node(frame.id);
        let transform = node
            .attribute("transform")
            .map(str::to_string)
            .or_else(|| frame.inherited_transform.clone());

        if let Ok(kind) = node.name().parse::<ShapeKind>() {
            let shape = ShapeElement::new(
                frame.id,
                kind,
                node.attributes().clone(),
                bounding_box(kind, node),
            )
            .with_inherited_transform(frame.inherited_transform)
            .with_parent(frame.parent);
            shapes.push(shape);
        }

        let parent_id = node.attribute("id").unwrap_or_default().to_string();
        stack.extend(tree.element_children(frame.id).rev().map(|id| Frame {
            id,
            inherited_transform: transform.clone(),
            parent: Some(parent_id.clone()),
        }));
    }

    debug!(width, height, shapes = shapes.len(); "Geometry extracted");
    Document::new(tree, width, height, shapes)
}

/// Computes the bounding box of a shape element from its own attributes.
///
/// Missing or unparsable numbers count as `0`. Lines, polylines, polygons,
/// paths and text get the degenerate zero box.
pub fn bounding_box(kind: ShapeKind, node: &Node) -> Bounds {
    let number = |name: &str| length_or_zero(node.attribute(name));

    match kind {
        ShapeKind::Rect => Bounds::new_from_top_left(
            Point::new(number("x"), number("y")),
            number("width"),
            number("height"),
        ),
        ShapeKind::Circle => {
            let r = number("r");
            Bounds::new_from_center(Point::new(number("cx"), number("cy")), r, r)
        }
        ShapeKind::Ellipse => Bounds::new_from_center(
            Point::new(number("cx"), number("cy")),
            number("rx"),
            number("ry"),
        ),
        ShapeKind::Line
        | ShapeKind::Polyline
        | ShapeKind::Polygon
        | ShapeKind::Path
        | ShapeKind::Text => Bounds::default(),
    }
}

fn canvas_dimension(root: &Node, name: &str, default: f64) -> f64 {
    match root.attribute(name) {
        None => default,
        Some(raw) => parse_length(raw).unwrap_or_else(|| {
            warn!(attribute = name, value = raw, default; "Unsupported canvas size, using default");
            default
        }),
    }
}
