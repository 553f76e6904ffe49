//! Error types for critic operations.
//!
//! [`CriticError`] wraps the failures that can reach a caller of the
//! [`Critic`](crate::Critic) façade: unreadable input, invalid configuration,
//! and export or serialization failures. Collaborator failures inside the
//! design loop are not errors at this level; the loop recovers from them.

use std::io;

use thiserror::Error;

use svg_critic_parser::ParseError;

use crate::design_loop::LoopConfigError;

/// The main error type for critic operations.
///
/// # Diagnostic Variants
///
/// The `Parse` variant keeps the source text next to the error so that a
/// front end can point at the failing byte offset.
#[derive(Debug, Error)]
pub enum CriticError {
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    #[error("{err}")]
    Parse { err: ParseError, src: String },

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Export error: {0}")]
    Export(Box<dyn std::error::Error>),

    #[error("Serialization error: {0}")]
    Serialize(#[from] serde_json::Error),
}

impl From<crate::export::Error> for CriticError {
    fn from(error: crate::export::Error) -> Self {
        Self::Export(Box::new(error))
    }
}

impl From<LoopConfigError> for CriticError {
    fn from(error: LoopConfigError) -> Self {
        Self::Config(error.to_string())
    }
}

impl CriticError {
    /// Create a new `Parse` error with the associated source code.
    pub fn new_parse_error(err: ParseError, src: impl Into<String>) -> Self {
        Self::Parse {
            err,
            src: src.into(),
        }
    }
}
