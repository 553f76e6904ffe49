//! Configuration types for the design loop.
//!
//! All types implement [`serde::Deserialize`] so they can be loaded from
//! external sources such as a TOML file.
//!
//! # Overview
//!
//! - [`AppConfig`] - Top-level configuration combining the loop and improvement sections.
//! - [`IterationConfig`] - Iteration budget and satisfaction threshold (the `[loop]` table).
//! - [`ImprovementConfig`] - Which improver drives the Improving step.
//!
//! # Example
//!
//! ```
//! # use svg_critic::config::{AppConfig, ImprovementMode};
//! let config = AppConfig::default();
//! let loop_config = config.loop_config().expect("defaults are valid");
//! assert_eq!(loop_config.max_iterations(), 3);
//! assert_eq!(loop_config.satisfaction_threshold(), 85);
//! assert_eq!(config.improvement().mode(), ImprovementMode::Local);
//! ```

use serde::Deserialize;

use crate::design_loop::{
    DEFAULT_MAX_ITERATIONS, DEFAULT_SATISFACTION_THRESHOLD, LoopConfig, LoopConfigError,
};

/// Top-level application configuration.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct AppConfig {
    /// Loop configuration section, `[loop]` in TOML.
    #[serde(default, rename = "loop")]
    iteration: IterationConfig,

    /// Improvement configuration section.
    #[serde(default)]
    improvement: ImprovementConfig,
}

impl AppConfig {
    /// Creates a new [`AppConfig`] from its sections.
    pub fn new(iteration: IterationConfig, improvement: ImprovementConfig) -> Self {
        Self {
            iteration,
            improvement,
        }
    }

    /// Returns the `[loop]` section as written.
    pub fn iteration(&self) -> &IterationConfig {
        &self.iteration
    }

    /// Returns the improvement section.
    pub fn improvement(&self) -> &ImprovementConfig {
        &self.improvement
    }

    /// Overrides the iteration budget.
    pub fn with_max_iterations(mut self, max_iterations: u32) -> Self {
        self.iteration.max_iterations = max_iterations;
        self
    }

    /// Overrides the satisfaction threshold.
    pub fn with_satisfaction_threshold(mut self, threshold: u32) -> Self {
        self.iteration.satisfaction_threshold = threshold;
        self
    }

    /// Overrides the improvement mode.
    pub fn with_improvement_mode(mut self, mode: ImprovementMode) -> Self {
        self.improvement.mode = mode;
        self
    }

    /// Validates the `[loop]` section into a [`LoopConfig`].
    ///
    /// # Errors
    ///
    /// Returns [`LoopConfigError`] if `max_iterations` is zero or
    /// `satisfaction_threshold` exceeds 100.
    pub fn loop_config(&self) -> Result<LoopConfig, LoopConfigError> {
        LoopConfig::new(
            self.iteration.max_iterations,
            self.iteration.satisfaction_threshold,
        )
    }
}

/// Raw loop settings, validated by [`AppConfig::loop_config`].
#[derive(Debug, Clone, Deserialize)]
pub struct IterationConfig {
    #[serde(default = "default_max_iterations")]
    max_iterations: u32,

    #[serde(default = "default_satisfaction_threshold")]
    satisfaction_threshold: u32,
}

impl IterationConfig {
    pub fn max_iterations(&self) -> u32 {
        self.max_iterations
    }

    pub fn satisfaction_threshold(&self) -> u32 {
        self.satisfaction_threshold
    }
}

impl Default for IterationConfig {
    fn default() -> Self {
        Self {
            max_iterations: default_max_iterations(),
            satisfaction_threshold: default_satisfaction_threshold(),
        }
    }
}

fn default_max_iterations() -> u32 {
    DEFAULT_MAX_ITERATIONS
}

fn default_satisfaction_threshold() -> u32 {
    u32::from(DEFAULT_SATISFACTION_THRESHOLD)
}

/// Which improver runs in the Improving step.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ImprovementMode {
    /// Always use the built-in [`MutationEngine`](crate::mutation::MutationEngine).
    #[default]
    Local,
    /// Try the injected external improver first, falling back to the local
    /// engine when it fails or none is configured.
    External,
}

/// Improvement configuration section.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ImprovementConfig {
    #[serde(default)]
    mode: ImprovementMode,
}

impl ImprovementConfig {
    pub fn mode(&self) -> ImprovementMode {
        self.mode
    }
}
