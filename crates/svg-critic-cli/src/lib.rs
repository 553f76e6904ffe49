//! CLI logic for the SVG critic.
//!
//! This module contains the core CLI logic: load configuration, parse the
//! input SVG, then either print the evaluation report or run the design loop
//! and persist every iteration.
//!
//! # Output directory
//!
//! A loop run writes, for iteration `n`:
//!
//! - the evaluated SVG: `<stem>.svg` for iteration 1, `<stem>_iter<n-1>.svg`
//!   afterwards
//! - `evaluation_<n>.json` and `evaluation_<n>.md`
//!
//! followed by `summary.json` describing the whole run and
//! `progress_report.html`, a page showing every iteration side by side.

pub mod command;
pub mod error_adapter;

mod args;
mod config;

pub use args::Args;

use std::{
    fs,
    path::{Path, PathBuf},
};

use chrono::{DateTime, Utc};
use log::{info, warn};
use serde::Serialize;

use svg_critic::{
    Critic, CriticError,
    config::ImprovementMode,
    design_loop::{IterationRecord, LoopOutcome, Origin, StopReason},
    export, report,
};

use command::CommandImprover;

/// Summary of one iteration in `summary.json`.
#[derive(Debug, Serialize)]
pub struct IterationSummary {
    iteration: u32,
    score: u8,
    svg: PathBuf,
    evaluated_by: String,
    origin: Origin,
    timestamp: DateTime<Utc>,
}

/// Contents of `summary.json`.
#[derive(Debug, Serialize)]
pub struct RunSummary {
    input: PathBuf,
    output_dir: PathBuf,
    iterations: usize,
    final_score: Option<u8>,
    final_svg: Option<PathBuf>,
    stop_reason: StopReason,
    history: Vec<IterationSummary>,
}

/// Run the SVG critic CLI application
///
/// # Errors
///
/// Returns `CriticError` for:
/// - File I/O errors
/// - Configuration loading errors
/// - Parsing errors
/// - Export and serialization errors
pub fn run(args: &Args) -> Result<(), CriticError> {
    info!(input_path = args.input; "Critiquing SVG");

    let mut app_config = config::load_config(args.config.as_ref())?;
    if let Some(iterations) = args.iterations {
        app_config = app_config.with_max_iterations(iterations);
    }
    if let Some(threshold) = args.threshold {
        app_config = app_config.with_satisfaction_threshold(threshold);
    }
    if args.improver_command.is_some() {
        app_config = app_config.with_improvement_mode(ImprovementMode::External);
    }

    let source = fs::read_to_string(&args.input)?;
    let critic = Critic::new(app_config);
    let document = critic.parse(&source)?;

    if args.analyze_only {
        let evaluation = critic.evaluate(&document);
        println!("{}", critic.report(&evaluation));
        return Ok(());
    }

    let mut design_loop = critic.design_loop()?;
    if let Some(command) = &args.improver_command {
        match CommandImprover::new(command) {
            Some(improver) => design_loop = design_loop.with_improver(improver),
            None => warn!("Empty improver command, using local mutation engine"),
        }
    }
    let outcome = design_loop.run(document);

    let input = PathBuf::from(&args.input);
    let output_dir = args
        .output_dir
        .as_ref()
        .map(PathBuf::from)
        .unwrap_or_else(|| default_output_dir(&input));
    fs::create_dir_all(&output_dir)?;

    let summary = write_outcome(&critic, &input, &output_dir, &outcome)?;
    info!(
        output_dir = output_dir.display().to_string(),
        iterations = summary.iterations,
        final_score:? = summary.final_score,
        stop_reason:? = summary.stop_reason;
        "Design loop finished"
    );

    Ok(())
}

/// `<input without extension>_iterations`, next to the input file.
fn default_output_dir(input: &Path) -> PathBuf {
    let mut name = input.with_extension("").into_os_string();
    name.push("_iterations");
    PathBuf::from(name)
}

fn iteration_file_name(input: &Path, iteration: u32) -> String {
    let stem = input
        .file_stem()
        .map(|stem| stem.to_string_lossy().into_owned())
        .unwrap_or_else(|| "diagram".to_string());
    match iteration {
        0 | 1 => format!("{stem}.svg"),
        n => format!("{stem}_iter{}.svg", n - 1),
    }
}

fn write_outcome(
    critic: &Critic,
    input: &Path,
    output_dir: &Path,
    outcome: &LoopOutcome,
) -> Result<RunSummary, CriticError> {
    let mut history = Vec::with_capacity(outcome.history().len());
    for record in outcome.history() {
        history.push(write_iteration(critic, input, output_dir, record)?);
    }

    let summary = RunSummary {
        input: input.to_path_buf(),
        output_dir: output_dir.to_path_buf(),
        iterations: history.len(),
        final_score: history.last().map(|entry| entry.score),
        final_svg: history.last().map(|entry| entry.svg.clone()),
        stop_reason: outcome.stop_reason(),
        history,
    };
    fs::write(
        output_dir.join("summary.json"),
        serde_json::to_string_pretty(&summary)?,
    )?;

    let input_name = input
        .file_name()
        .map(|name| name.to_string_lossy().into_owned())
        .unwrap_or_default();
    let page = report::html(&input_name, outcome.history(), |record| {
        iteration_file_name(input, record.iteration())
    });
    fs::write(output_dir.join("progress_report.html"), page)?;
    Ok(summary)
}

fn write_iteration(
    critic: &Critic,
    input: &Path,
    output_dir: &Path,
    record: &IterationRecord,
) -> Result<IterationSummary, CriticError> {
    let n = record.iteration();
    let svg = output_dir.join(iteration_file_name(input, n));
    export::svg::write_file(record.document(), &svg)?;

    let evaluation = record.evaluation();
    fs::write(
        output_dir.join(format!("evaluation_{n}.json")),
        evaluation.to_json()?,
    )?;
    fs::write(
        output_dir.join(format!("evaluation_{n}.md")),
        critic.report(evaluation),
    )?;

    info!(iteration = n, score = evaluation.overall_score(); "Iteration written");
    Ok(IterationSummary {
        iteration: n,
        score: evaluation.overall_score(),
        svg,
        evaluated_by: record.evaluated_by().to_string(),
        origin: record.origin().clone(),
        timestamp: record.timestamp(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_output_dir() {
        assert_eq!(
            default_output_dir(Path::new("diagrams/flow.svg")),
            PathBuf::from("diagrams/flow_iterations")
        );
        assert_eq!(
            default_output_dir(Path::new("flow")),
            PathBuf::from("flow_iterations")
        );
    }

    #[test]
    fn test_iteration_file_names() {
        let input = Path::new("diagrams/flow.svg");
        assert_eq!(iteration_file_name(input, 1), "flow.svg");
        assert_eq!(iteration_file_name(input, 2), "flow_iter1.svg");
        assert_eq!(iteration_file_name(input, 3), "flow_iter2.svg");
    }
}
