//! The iteration controller.
//!
//! [`DesignLoop`] alternates between evaluating a document and improving it
//! until the score reaches the satisfaction threshold or the iteration budget
//! runs out. Each pass is a step of a small state machine:
//!
//! ```text
//! Evaluating ──▶ Deciding ──▶ Done
//!     ▲              │
//!     └─ Improving ◀─┘
//! ```
//!
//! Every Evaluating step appends exactly one [`IterationRecord`] to the
//! history, so the history never holds more than `max_iterations` entries.
//!
//! # Collaborators
//!
//! An external [`Evaluator`] or [`Improver`] can be injected. Each is called
//! once per step with no retry. When it fails, the loop logs a warning and
//! uses the local path instead: [`evaluate`] for evaluation and
//! [`MutationEngine`] for improvement. A collaborator failure never ends the
//! loop.

use chrono::{DateTime, Utc};
use log::{info, warn};
use serde::Serialize;
use thiserror::Error;

use svg_critic_core::document::Document;
use svg_critic_parser::ParseError;

use crate::{
    config::ImprovementMode,
    evaluation::{Evaluation, evaluate},
    mutation::MutationEngine,
};

/// Default iteration budget.
pub const DEFAULT_MAX_ITERATIONS: u32 = 3;

/// Default score at which the loop stops.
pub const DEFAULT_SATISFACTION_THRESHOLD: u8 = 85;

/// Name recorded for evaluations made by the built-in analyzers.
pub const LOCAL_EVALUATOR: &str = "local";

/// Invalid [`LoopConfig`] values.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum LoopConfigError {
    #[error("max_iterations must be at least 1")]
    NoIterations,

    #[error("satisfaction_threshold must be between 0 and 100, got {0}")]
    ThresholdOutOfRange(u32),
}

/// Iteration budget and stopping threshold for one loop run.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LoopConfig {
    max_iterations: u32,
    satisfaction_threshold: u8,
}

impl LoopConfig {
    /// Creates a validated loop configuration.
    ///
    /// # Errors
    ///
    /// Returns [`LoopConfigError`] if `max_iterations` is zero or
    /// `satisfaction_threshold` exceeds 100.
    pub fn new(max_iterations: u32, satisfaction_threshold: u32) -> Result<Self, LoopConfigError> {
        if max_iterations == 0 {
            return Err(LoopConfigError::NoIterations);
        }
        let satisfaction_threshold = u8::try_from(satisfaction_threshold)
            .ok()
            .filter(|threshold| *threshold <= 100)
            .ok_or(LoopConfigError::ThresholdOutOfRange(satisfaction_threshold))?;

        Ok(Self {
            max_iterations,
            satisfaction_threshold,
        })
    }

    pub fn max_iterations(&self) -> u32 {
        self.max_iterations
    }

    pub fn satisfaction_threshold(&self) -> u8 {
        self.satisfaction_threshold
    }
}

impl Default for LoopConfig {
    fn default() -> Self {
        Self {
            max_iterations: DEFAULT_MAX_ITERATIONS,
            satisfaction_threshold: DEFAULT_SATISFACTION_THRESHOLD,
        }
    }
}

/// Failure of an external collaborator. Never escapes the loop.
#[derive(Debug, Error)]
pub enum CollaboratorError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("returned an unparsable document: {0}")]
    InvalidDocument(#[from] ParseError),

    #[error("{0}")]
    Failed(String),
}

/// Produces an [`Evaluation`] for a document, for example by asking a
/// vision model to score a rendering.
pub trait Evaluator {
    /// Returns a short name recorded in the history.
    fn name(&self) -> &str;

    /// Evaluates `document`.
    ///
    /// # Errors
    ///
    /// Any error makes the loop fall back to the local analyzers for this
    /// iteration.
    fn evaluate(&mut self, document: &Document) -> Result<Evaluation, CollaboratorError>;
}

/// Produces an improved document from a document and its evaluation.
pub trait Improver {
    /// Returns a short name recorded in the history.
    fn name(&self) -> &str;

    /// Returns a new document addressing `evaluation`.
    ///
    /// # Errors
    ///
    /// Any error makes the loop fall back to the [`MutationEngine`] for this
    /// iteration.
    fn improve(
        &mut self,
        document: &Document,
        evaluation: &Evaluation,
    ) -> Result<Document, CollaboratorError>;
}

/// Where an iteration's document came from.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", content = "name", rename_all = "snake_case")]
pub enum Origin {
    /// The document the loop started with.
    Input,
    /// The built-in mutation engine.
    LocalEngine,
    /// An injected improver, by name.
    External(String),
}

/// Why the loop stopped.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum StopReason {
    ThresholdReached,
    BudgetExhausted,
}

/// One evaluated iteration.
#[derive(Debug, Clone, Serialize)]
pub struct IterationRecord {
    iteration: u32,
    #[serde(skip)]
    document: Document,
    evaluation: Evaluation,
    evaluated_by: String,
    origin: Origin,
    timestamp: DateTime<Utc>,
}

impl IterationRecord {
    /// Returns the 1-based iteration index.
    pub fn iteration(&self) -> u32 {
        self.iteration
    }

    /// Returns the document evaluated in this iteration.
    pub fn document(&self) -> &Document {
        &self.document
    }

    pub fn evaluation(&self) -> &Evaluation {
        &self.evaluation
    }

    /// Returns the name of the evaluator that produced the evaluation.
    pub fn evaluated_by(&self) -> &str {
        &self.evaluated_by
    }

    pub fn origin(&self) -> &Origin {
        &self.origin
    }

    /// Returns when the evaluation finished.
    pub fn timestamp(&self) -> DateTime<Utc> {
        self.timestamp
    }
}

/// Result of a loop run: the full history and why it stopped.
#[derive(Debug, Clone)]
pub struct LoopOutcome {
    history: Vec<IterationRecord>,
    stop_reason: StopReason,
}

impl LoopOutcome {
    /// Returns the history in iteration order.
    pub fn history(&self) -> &[IterationRecord] {
        &self.history
    }

    pub fn stop_reason(&self) -> StopReason {
        self.stop_reason
    }

    /// Returns the last evaluated iteration.
    pub fn final_record(&self) -> Option<&IterationRecord> {
        self.history.last()
    }

    pub fn into_history(self) -> Vec<IterationRecord> {
        self.history
    }
}

enum State {
    Evaluating {
        iteration: u32,
        document: Document,
        origin: Origin,
    },
    Deciding {
        iteration: u32,
        document: Document,
        evaluation: Evaluation,
    },
    Improving {
        iteration: u32,
        document: Document,
        evaluation: Evaluation,
    },
    Done(StopReason),
}

/// Drives the evaluate → decide → improve cycle.
///
/// # Examples
///
/// ```
/// use svg_critic::design_loop::{DesignLoop, LoopConfig, StopReason};
///
/// let document = svg_critic_parser::parse(r#"<svg><rect width="10" height="10"/></svg>"#)
///     .expect("valid document");
///
/// let config = LoopConfig::new(2, 100).expect("valid config");
/// let outcome = DesignLoop::new(config).run(document);
///
/// assert_eq!(outcome.history().len(), 2);
/// assert_eq!(outcome.stop_reason(), StopReason::BudgetExhausted);
/// ```
pub struct DesignLoop {
    config: LoopConfig,
    mode: ImprovementMode,
    engine: MutationEngine,
    evaluator: Option<Box<dyn Evaluator>>,
    improver: Option<Box<dyn Improver>>,
}

impl DesignLoop {
    /// Creates a loop that evaluates and improves locally.
    pub fn new(config: LoopConfig) -> Self {
        Self {
            config,
            mode: ImprovementMode::Local,
            engine: MutationEngine::new(),
            evaluator: None,
            improver: None,
        }
    }

    /// Sets which improver runs in the Improving step.
    pub fn with_mode(mut self, mode: ImprovementMode) -> Self {
        self.mode = mode;
        self
    }

    /// Injects an external evaluator, tried before the local analyzers.
    pub fn with_evaluator(mut self, evaluator: impl Evaluator + 'static) -> Self {
        self.evaluator = Some(Box::new(evaluator));
        self
    }

    /// Injects an external improver, used in [`ImprovementMode::External`].
    pub fn with_improver(mut self, improver: impl Improver + 'static) -> Self {
        self.improver = Some(Box::new(improver));
        self
    }

    pub fn config(&self) -> &LoopConfig {
        &self.config
    }

    /// Runs the loop on `document` until it stops.
    pub fn run(&mut self, document: Document) -> LoopOutcome {
        info!(
            max_iterations = self.config.max_iterations(),
            threshold = self.config.satisfaction_threshold(),
            mode:? = self.mode;
            "Starting design loop"
        );

        let mut history: Vec<IterationRecord> = Vec::new();
        let mut state = State::Evaluating {
            iteration: 1,
            document,
            origin: Origin::Input,
        };

        loop {
            state = match state {
                State::Evaluating {
                    iteration,
                    document,
                    origin,
                } => {
                    let (evaluation, evaluated_by) = self.evaluate(&document);
                    info!(
                        iteration,
                        score = evaluation.overall_score(),
                        evaluated_by;
                        "Iteration evaluated"
                    );
                    history.push(IterationRecord {
                        iteration,
                        document: document.clone(),
                        evaluation: evaluation.clone(),
                        evaluated_by,
                        origin,
                        timestamp: Utc::now(),
                    });
                    State::Deciding {
                        iteration,
                        document,
                        evaluation,
                    }
                }
                State::Deciding {
                    iteration,
                    document,
                    evaluation,
                } => {
                    let score = evaluation.overall_score();
                    if score >= self.config.satisfaction_threshold() {
                        info!(
                            score,
                            threshold = self.config.satisfaction_threshold();
                            "Satisfaction threshold reached"
                        );
                        State::Done(StopReason::ThresholdReached)
                    } else if iteration >= self.config.max_iterations() {
                        info!(iteration; "Reached maximum iterations");
                        State::Done(StopReason::BudgetExhausted)
                    } else {
                        State::Improving {
                            iteration,
                            document,
                            evaluation,
                        }
                    }
                }
                State::Improving {
                    iteration,
                    document,
                    evaluation,
                } => {
                    let (document, origin) = self.improve(&document, &evaluation);
                    State::Evaluating {
                        iteration: iteration + 1,
                        document,
                        origin,
                    }
                }
                State::Done(stop_reason) => {
                    return LoopOutcome {
                        history,
                        stop_reason,
                    };
                }
            };
        }
    }

    fn evaluate(&mut self, document: &Document) -> (Evaluation, String) {
        if let Some(evaluator) = self.evaluator.as_mut() {
            match evaluator.evaluate(document) {
                Ok(evaluation) => return (evaluation, evaluator.name().to_string()),
                Err(err) => {
                    warn!(
                        evaluator = evaluator.name(),
                        err:%;
                        "External evaluation failed, using local analyzers"
                    );
                }
            }
        }
        (evaluate(document), LOCAL_EVALUATOR.to_string())
    }

    fn improve(&mut self, document: &Document, evaluation: &Evaluation) -> (Document, Origin) {
        if self.mode == ImprovementMode::External {
            match self.improver.as_mut() {
                Some(improver) => match improver.improve(document, evaluation) {
                    Ok(improved) => {
                        info!(improver = improver.name(); "Document improved externally");
                        return (improved, Origin::External(improver.name().to_string()));
                    }
                    Err(err) => {
                        warn!(
                            improver = improver.name(),
                            err:%;
                            "External improvement failed, using local mutation engine"
                        );
                    }
                },
                None => warn!("External improvement requested but no improver configured"),
            }
        }
        (self.engine.apply(document, evaluation), Origin::LocalEngine)
    }
}
