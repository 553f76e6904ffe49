//! Export of documents back to markup.
//!
//! The critic works on an owned element tree, so every document, including
//! the ones produced by the design loop, can be written out again and
//! re-parsed with the same analysis result.
//!
//! # Available Backends
//!
//! - [`svg`] - SVG markup via the `svg` crate
//!
//! # Error Handling
//!
//! Export operations return [`Error`], covering rendering failures and I/O
//! errors. [`Error`] converts into [`CriticError::Export`] at the crate
//! boundary.
//!
//! [`CriticError::Export`]: crate::CriticError::Export

/// SVG export backend.
pub mod svg;

/// Errors that can occur during document export.
#[derive(Debug)]
pub enum Error {
    /// A rendering failure described by `message`.
    Render(String),
    /// An I/O error encountered while writing output.
    Io(std::io::Error),
}

impl std::fmt::Display for Error {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Render(msg) => write!(f, "Render error: {msg}"),
            Self::Io(err) => write!(f, "I/O error: {err}"),
        }
    }
}

impl std::error::Error for Error {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Render(_) => None,
            Self::Io(err) => Some(err),
        }
    }
}
