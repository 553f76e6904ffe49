//! The analyzed document model.
//!
//! A [`Document`] is an immutable snapshot: the owned element tree, the canvas
//! size, the flat list of [`ShapeElement`]s in document order and the derived
//! color-usage table. Every analysis reads a `Document`; every mutation
//! produces a new one.

use std::{fmt, str::FromStr};

use indexmap::IndexMap;
use log::trace;
use serde::Serialize;

use crate::{
    color,
    geometry::{Bounds, Point},
    tree::{NodeId, SvgTree},
};

/// Canvas width used when the root element does not declare one.
pub const DEFAULT_CANVAS_WIDTH: f64 = 800.0;

/// Canvas height used when the root element does not declare one.
pub const DEFAULT_CANVAS_HEIGHT: f64 = 600.0;

/// The element kinds captured as shapes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ShapeKind {
    Rect,
    Circle,
    Ellipse,
    Line,
    Polyline,
    Polygon,
    Path,
    Text,
}

impl ShapeKind {
    /// Returns the SVG tag name for this kind.
    pub fn tag(self) -> &'static str {
        match self {
            Self::Rect => "rect",
            Self::Circle => "circle",
            Self::Ellipse => "ellipse",
            Self::Line => "line",
            Self::Polyline => "polyline",
            Self::Polygon => "polygon",
            Self::Path => "path",
            Self::Text => "text",
        }
    }
}

impl FromStr for ShapeKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "rect" => Ok(Self::Rect),
            "circle" => Ok(Self::Circle),
            "ellipse" => Ok(Self::Ellipse),
            "line" => Ok(Self::Line),
            "polyline" => Ok(Self::Polyline),
            "polygon" => Ok(Self::Polygon),
            "path" => Ok(Self::Path),
            "text" => Ok(Self::Text),
            _ => Err(format!("`{s}` is not a shape element")),
        }
    }
}

impl fmt::Display for ShapeKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.tag())
    }
}

/// A shape element with resolved geometry.
///
/// `transform` is the element's own `transform` attribute if present,
/// otherwise the nearest ancestor's. `parent` is the `id` attribute of the
/// enclosing element (empty if that element has no id), or `None` for
/// children of the root.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ShapeElement {
    #[serde(skip)]
    node: NodeId,
    id: String,
    kind: ShapeKind,
    attributes: IndexMap<String, String>,
    transform: Option<String>,
    #[serde(skip)]
    inherited_transform: Option<String>,
    parent: Option<String>,
    bounds: Bounds,
}

impl ShapeElement {
    /// Creates a shape for the element at `node`.
    ///
    /// The id is taken from the `id` attribute and the resolved transform
    /// from the `transform` attribute; use
    /// [`with_inherited_transform`](Self::with_inherited_transform) and
    /// [`with_parent`](Self::with_parent) to fill in tree context.
    pub fn new(
        node: NodeId,
        kind: ShapeKind,
        attributes: IndexMap<String, String>,
        bounds: Bounds,
    ) -> Self {
        let id = attributes.get("id").cloned().unwrap_or_default();
        let transform = attributes.get("transform").cloned();
        Self {
            node,
            id,
            kind,
            attributes,
            transform,
            inherited_transform: None,
            parent: None,
            bounds,
        }
    }

    /// Sets the transform propagated from ancestors. It becomes the resolved
    /// transform unless the element sets its own.
    pub fn with_inherited_transform(mut self, inherited: Option<String>) -> Self {
        if self.transform.is_none() {
            self.transform = inherited.clone();
        }
        self.inherited_transform = inherited;
        self
    }

    /// Sets the parent identifier.
    pub fn with_parent(mut self, parent: Option<String>) -> Self {
        self.parent = parent;
        self
    }

    /// Returns the tree element this shape was extracted from.
    pub fn node(&self) -> NodeId {
        self.node
    }

    /// Returns the `id` attribute, or an empty string.
    pub fn id(&self) -> &str {
        &self.id
    }

    /// Returns the shape kind.
    pub fn kind(&self) -> ShapeKind {
        self.kind
    }

    /// Returns the raw attributes.
    pub fn attributes(&self) -> &IndexMap<String, String> {
        &self.attributes
    }

    /// Returns a raw attribute value.
    pub fn attribute(&self, name: &str) -> Option<&str> {
        self.attributes.get(name).map(String::as_str)
    }

    /// Returns the resolved transform.
    pub fn transform(&self) -> Option<&str> {
        self.transform.as_deref()
    }

    /// Returns the transform propagated from ancestors, ignoring the
    /// element's own.
    pub fn inherited_transform(&self) -> Option<&str> {
        self.inherited_transform.as_deref()
    }

    /// Returns the parent identifier.
    pub fn parent(&self) -> Option<&str> {
        self.parent.as_deref()
    }

    /// Returns the bounding box.
    pub fn bounds(&self) -> Bounds {
        self.bounds
    }
}

/// An immutable snapshot of a parsed document.
#[derive(Debug, Clone, PartialEq)]
pub struct Document {
    tree: SvgTree,
    width: f64,
    height: f64,
    shapes: Vec<ShapeElement>,
    colors: IndexMap<String, usize>,
}

impl Document {
    /// Assembles a document and derives its color-usage table.
    ///
    /// Colors are counted over every shape's `fill` and `stroke`, keyed by
    /// [`color::normalize`], skipping empty values and
    /// [`color::EXCLUDED_KEYWORDS`]. Keys appear in first-use order.
    pub fn new(tree: SvgTree, width: f64, height: f64, shapes: Vec<ShapeElement>) -> Self {
        let mut colors: IndexMap<String, usize> = IndexMap::new();
        for shape in &shapes {
            for paint in ["fill", "stroke"] {
                let Some(value) = shape.attribute(paint) else {
                    continue;
                };
                let key = color::normalize(value);
                if key.is_empty() || color::is_excluded(&key) {
                    continue;
                }
                *colors.entry(key).or_default() += 1;
            }
        }
        trace!(colors:?; "Derived color usage");

        Self {
            tree,
            width,
            height,
            shapes,
            colors,
        }
    }

    /// Returns the owned element tree.
    pub fn tree(&self) -> &SvgTree {
        &self.tree
    }

    /// Returns the canvas width.
    pub fn width(&self) -> f64 {
        self.width
    }

    /// Returns the canvas height.
    pub fn height(&self) -> f64 {
        self.height
    }

    /// Returns the canvas as bounds anchored at the origin.
    pub fn canvas(&self) -> Bounds {
        Bounds::new_from_top_left(Point::new(0.0, 0.0), self.width, self.height)
    }

    /// Returns the shapes in document order.
    pub fn shapes(&self) -> &[ShapeElement] {
        &self.shapes
    }

    /// Returns the color-usage table.
    pub fn colors(&self) -> &IndexMap<String, usize> {
        &self.colors
    }

    /// Returns the identifier used for the shape at `index` in reports: its
    /// `id`, or `element-<index>` when the id is empty.
    pub fn shape_label(&self, index: usize) -> String {
        match self.shapes.get(index) {
            Some(shape) if !shape.id().is_empty() => shape.id().to_string(),
            _ => format!("element-{index}"),
        }
    }
}
