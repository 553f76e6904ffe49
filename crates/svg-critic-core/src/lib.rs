//! SVG Critic Core Types and Definitions
//!
//! This crate provides the foundational types shared by the parser and the
//! critique engine. It includes:
//!
//! - **Geometry**: Points and axis-aligned bounding boxes ([`geometry`] module)
//! - **Tree**: The owned element arena of a document ([`tree`] module)
//! - **Document**: Shapes, canvas and color usage ([`document`] module)
//! - **Colors**: The reference palette and color keywords ([`color`] module)

pub mod color;
pub mod document;
pub mod geometry;
pub mod tree;
