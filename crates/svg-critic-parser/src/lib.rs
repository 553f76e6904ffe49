//! # SVG Critic Parser
//!
//! Turns SVG markup into a [`Document`]: an owned element tree plus the flat
//! list of shape elements with resolved geometry that the analyzers read.
//!
//! ## Usage
//!
//! ```
//! # use svg_critic_parser::{parse, ParseError};
//!
//! fn main() -> Result<(), ParseError> {
//!     let source = r##"<svg width="400" height="300">
//!         <rect id="box" x="10" y="10" width="100" height="50" fill="#19aeff"/>
//!     </svg>"##;
//!
//!     let document = parse(source)?;
//!     assert_eq!(document.shapes().len(), 1);
//!     assert_eq!(document.width(), 400.0);
//!     Ok(())
//! }
//! ```

pub mod attribute;
pub mod error;

mod extract;
mod markup;

pub use error::ParseError;
pub use extract::{bounding_box, extract};
pub use markup::read_tree;

use log::info;

use svg_critic_core::document::Document;

/// Parse SVG markup into a [`Document`].
///
/// This runs the two parsing stages:
///
/// 1. **Read** - Build the owned element tree from the XML text
/// 2. **Extract** - Walk the tree and collect shape geometry
///
/// # Errors
///
/// Returns [`ParseError`] if the markup is not well-formed. No partial
/// document is produced.
pub fn parse(source: &str) -> Result<Document, ParseError> {
    info!(bytes = source.len(); "Parsing document");

    let tree = read_tree(source)?;
    let document = extract(tree);

    info!(
        width = document.width(),
        height = document.height(),
        shapes = document.shapes().len();
        "Document parsed"
    );
    Ok(document)
}
