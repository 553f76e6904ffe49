//! Geometric primitives for shape analysis.
//!
//! This module provides the geometric types used throughout the critic for
//! locating shapes on the canvas and measuring how they relate to each other.
//!
//! # Overview
//!
//! - [`Point`] - A 2D coordinate in canvas space
//! - [`Bounds`] - An axis-aligned bounding box defined by minimum and maximum coordinates
//!
//! # Coordinate System
//!
//! Coordinates follow SVG user space:
//!
//! ```text
//!   (0,0) ────────► +X
//!     │
//!     │
//!     │
//!     ▼
//!    +Y
//! ```
//!
//! - **Origin**: Top-left corner at `(0, 0)`
//! - **X-axis**: Increases rightward
//! - **Y-axis**: Increases downward
//!
//! Transforms are not applied to bounding boxes; a box is computed from the
//! element's own geometry attributes only.

use serde::Serialize;

/// A 2D point in canvas coordinate space.
///
/// # Examples
///
/// ```
/// # use svg_critic_core::geometry::Point;
/// let p1 = Point::new(10.0, 20.0);
/// let p2 = Point::new(30.0, 40.0);
///
/// let mid = p1.midpoint(p2);
/// assert_eq!(mid.x(), 20.0);
/// assert_eq!(mid.y(), 30.0);
/// ```
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize)]
pub struct Point {
    x: f64,
    y: f64,
}

impl Point {
    /// Creates a new point with the given coordinates
    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    /// Returns the x-coordinate
    pub fn x(self) -> f64 {
        self.x
    }

    /// Returns the y-coordinate
    pub fn y(self) -> f64 {
        self.y
    }

    /// Returns the point halfway between `self` and `other`
    pub fn midpoint(self, other: Point) -> Self {
        Self {
            x: (self.x + other.x) / 2.0,
            y: (self.y + other.y) / 2.0,
        }
    }
}

/// An axis-aligned bounding box with minimum and maximum coordinates.
///
/// A box whose width or height is not strictly positive is *degenerate*.
/// Shapes the extractor cannot measure (paths, lines, text) carry the
/// all-zero degenerate box, and every area-based analysis skips degenerate
/// boxes.
///
/// Serializes as `{x1, y1, x2, y2}`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize)]
pub struct Bounds {
    #[serde(rename = "x1")]
    min_x: f64,
    #[serde(rename = "y1")]
    min_y: f64,
    #[serde(rename = "x2")]
    max_x: f64,
    #[serde(rename = "y2")]
    max_y: f64,
}

impl Bounds {
    /// Creates bounds from its two corners.
    ///
    /// The coordinates are stored as given; no normalisation is applied, so a
    /// rectangle with negative width yields a degenerate box.
    pub fn new(min_x: f64, min_y: f64, max_x: f64, max_y: f64) -> Self {
        Self {
            min_x,
            min_y,
            max_x,
            max_y,
        }
    }

    /// Creates bounds from a top-left corner and a width and height
    pub fn new_from_top_left(top_left: Point, width: f64, height: f64) -> Self {
        Self {
            min_x: top_left.x,
            min_y: top_left.y,
            max_x: top_left.x + width,
            max_y: top_left.y + height,
        }
    }

    /// Creates bounds centered on `center` extending `radius_x` and `radius_y`
    /// in each direction
    pub fn new_from_center(center: Point, radius_x: f64, radius_y: f64) -> Self {
        Self {
            min_x: center.x - radius_x,
            min_y: center.y - radius_y,
            max_x: center.x + radius_x,
            max_y: center.y + radius_y,
        }
    }

    /// Returns the minimum x-coordinate of the bounds
    pub fn min_x(self) -> f64 {
        self.min_x
    }

    /// Returns the minimum y-coordinate of the bounds
    pub fn min_y(self) -> f64 {
        self.min_y
    }

    /// Returns the maximum x-coordinate of the bounds
    pub fn max_x(self) -> f64 {
        self.max_x
    }

    /// Returns the maximum y-coordinate of the bounds
    pub fn max_y(self) -> f64 {
        self.max_y
    }

    /// Returns the width of the bounds
    pub fn width(self) -> f64 {
        self.max_x - self.min_x
    }

    /// Returns the height of the bounds
    pub fn height(self) -> f64 {
        self.max_y - self.min_y
    }

    /// Returns `width * height`
    pub fn area(self) -> f64 {
        self.width() * self.height()
    }

    /// Returns the center point of the bounds
    pub fn center(self) -> Point {
        Point::new(
            (self.min_x + self.max_x) / 2.0,
            (self.min_y + self.max_y) / 2.0,
        )
    }

    /// Returns true unless both width and height are strictly positive.
    ///
    /// NaN extents count as degenerate.
    pub fn is_degenerate(self) -> bool {
        !(self.width() > 0.0 && self.height() > 0.0)
    }

    /// Returns the shared region of two boxes, if they overlap.
    ///
    /// Overlap requires both ranges to intersect with strict inequalities, so
    /// boxes that merely touch along an edge do not overlap.
    ///
    /// # Examples
    ///
    /// ```
    /// # use svg_critic_core::geometry::{Bounds, Point};
    /// let a = Bounds::new_from_top_left(Point::new(0.0, 0.0), 100.0, 100.0);
    /// let b = Bounds::new_from_top_left(Point::new(90.0, 0.0), 100.0, 100.0);
    /// let shared = a.intersection(&b).unwrap();
    /// assert_eq!(shared.area(), 1000.0);
    ///
    /// let c = Bounds::new_from_top_left(Point::new(100.0, 0.0), 10.0, 10.0);
    /// assert!(a.intersection(&c).is_none());
    /// ```
    pub fn intersection(&self, other: &Self) -> Option<Self> {
        let overlaps = self.min_x < other.max_x
            && self.max_x > other.min_x
            && self.min_y < other.max_y
            && self.max_y > other.min_y;
        if !overlaps {
            return None;
        }

        Some(Self {
            min_x: self.min_x.max(other.min_x),
            min_y: self.min_y.max(other.min_y),
            max_x: self.max_x.min(other.max_x),
            max_y: self.max_y.min(other.max_y),
        })
    }

    /// Returns the distance from each edge of `self` to the corresponding
    /// edge of `container`, as `(left, top, right, bottom)`.
    ///
    /// Negative values mean the box pokes out of the container on that side.
    pub fn margins_within(&self, container: &Self) -> (f64, f64, f64, f64) {
        (
            self.min_x - container.min_x,
            self.min_y - container.min_y,
            container.max_x - self.max_x,
            container.max_y - self.max_y,
        )
    }
}
