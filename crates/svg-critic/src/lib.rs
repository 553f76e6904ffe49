//! SVG Critic - deterministic design critique for SVG diagrams.
//!
//! Evaluates a diagram for overlapping elements, layout balance, color
//! harmony, visual hierarchy and accessibility, then iteratively applies
//! automatic fixes until the score is good enough or the iteration budget is
//! spent.
//!
//! # Pipeline
//!
//! ```text
//! SVG markup
//!     ↓ parse (svg-critic-parser)
//! Document
//!     ↓ evaluate (analysis + evaluation)
//! Evaluation
//!     ↓ improve (mutation or an injected Improver)
//! Document
//!     ↓ ...repeat in DesignLoop
//! ```

pub mod analysis;
pub mod config;
pub mod design_loop;
pub mod evaluation;
pub mod export;
pub mod mutation;
pub mod report;

mod error;

pub use svg_critic_core::{color, document, geometry, tree};

pub use error::CriticError;

use log::{debug, info, trace};

use svg_critic_core::document::Document;

use config::AppConfig;
use design_loop::DesignLoop;
use evaluation::Evaluation;

/// Entry point for parsing, evaluating and improving SVG documents.
///
/// # Examples
///
/// ```
/// use svg_critic::{Critic, config::AppConfig};
///
/// let source = r##"<svg width="200" height="200">
///     <rect id="card" x="40" y="40" width="120" height="120" fill="#19aeff"/>
/// </svg>"##;
///
/// let critic = Critic::new(AppConfig::default());
/// let document = critic.parse(source).expect("valid markup");
/// let evaluation = critic.evaluate(&document);
/// assert!(evaluation.overall_score() <= 100);
///
/// let mut design_loop = critic.design_loop().expect("valid configuration");
/// let outcome = design_loop.run(document);
/// assert!(!outcome.history().is_empty());
/// ```
#[derive(Debug, Default)]
pub struct Critic {
    config: AppConfig,
}

impl Critic {
    /// Create a new critic with the given configuration.
    pub fn new(config: AppConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &AppConfig {
        &self.config
    }

    /// Parse SVG markup into a [`Document`].
    ///
    /// # Errors
    ///
    /// Returns [`CriticError::Parse`] carrying the source text if the markup
    /// is not well-formed.
    pub fn parse(&self, source: &str) -> Result<Document, CriticError> {
        let document = svg_critic_parser::parse(source)
            .map_err(|err| CriticError::new_parse_error(err, source))?;

        trace!(shapes:? = document.shapes(); "Parsed shapes");
        Ok(document)
    }

    /// Evaluate a document with the local analyzers.
    pub fn evaluate(&self, document: &Document) -> Evaluation {
        evaluation::evaluate(document)
    }

    /// Build a [`DesignLoop`] from the configured iteration budget,
    /// satisfaction threshold and improvement mode.
    ///
    /// External collaborators can be attached to the returned loop with
    /// [`DesignLoop::with_evaluator`] and [`DesignLoop::with_improver`].
    ///
    /// # Errors
    ///
    /// Returns [`CriticError::Config`] if the loop settings are invalid.
    pub fn design_loop(&self) -> Result<DesignLoop, CriticError> {
        let loop_config = self.config.loop_config()?;
        debug!(loop_config:?; "Design loop configured");
        Ok(DesignLoop::new(loop_config).with_mode(self.config.improvement().mode()))
    }

    /// Render a document back to SVG markup.
    ///
    /// # Errors
    ///
    /// Returns [`CriticError::Export`] if the document cannot be rendered.
    pub fn render_svg(&self, document: &Document) -> Result<String, CriticError> {
        info!(shapes = document.shapes().len(); "Rendering SVG");
        Ok(export::svg::render(document)?)
    }

    /// Render an evaluation as a markdown report.
    pub fn report(&self, evaluation: &Evaluation) -> String {
        report::markdown(evaluation)
    }
}
