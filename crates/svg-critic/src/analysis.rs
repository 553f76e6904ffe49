//! Design analyzers.
//!
//! Each analyzer is a pure function of a [`Document`](svg_critic_core::document::Document)
//! and returns its own result type. None of them mutate the document or depend
//! on one another, so they can run in any order.
//!
//! # Overview
//!
//! - [`overlap`] - Significant intersections between shapes from different parents.
//! - [`layout`] - Quadrant distribution and balance score.
//! - [`color`] - Reference palette adherence.
//! - [`hierarchy`] - Size contrast between the largest and smallest shapes.
//! - [`accessibility`] - Text legibility and low-contrast paint pairs.
//!
//! Shapes with degenerate bounding boxes (zero or negative width or height)
//! never take part in area-based analysis.

pub mod accessibility;
pub mod color;
pub mod hierarchy;
pub mod layout;
pub mod overlap;
