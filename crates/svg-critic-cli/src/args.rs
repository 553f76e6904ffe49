//! Command-line argument definitions for the SVG critic CLI.
//!
//! This module defines the [`Args`] structure parsed from the command line
//! using [`clap`]. Arguments control the input file, the output directory,
//! the design loop overrides, configuration file selection, and logging
//! verbosity.

use clap::Parser;

/// Command-line arguments for the SVG critic
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
pub struct Args {
    /// Path to the input SVG file
    #[arg(help = "Path to the input SVG file")]
    pub input: String,

    /// Directory for iteration files (default: `<input stem>_iterations`)
    #[arg(short, long)]
    pub output_dir: Option<String>,

    /// Maximum number of design loop iterations
    #[arg(short, long)]
    pub iterations: Option<u32>,

    /// Score (0-100) at which the design loop stops
    #[arg(short, long)]
    pub threshold: Option<u32>,

    /// Print the evaluation report and exit without improving
    #[arg(long)]
    pub analyze_only: bool,

    /// External improver command; receives the SVG on stdin and prints the
    /// improved SVG on stdout
    #[arg(long)]
    pub improver_command: Option<String>,

    /// Path to configuration file (TOML)
    #[arg(short, long)]
    pub config: Option<String>,

    /// Log level (off, error, warn, info, debug, trace)
    #[arg(long, default_value = "info")]
    pub log_level: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let args = Args::try_parse_from(["svg-critic", "diagram.svg"]).expect("valid args");
        assert_eq!(args.input, "diagram.svg");
        assert_eq!(args.output_dir, None);
        assert_eq!(args.iterations, None);
        assert!(!args.analyze_only);
        assert_eq!(args.log_level, "info");
    }

    #[test]
    fn test_short_flags() {
        let args = Args::try_parse_from([
            "svg-critic",
            "diagram.svg",
            "-o",
            "out",
            "-i",
            "5",
            "-t",
            "90",
            "-c",
            "critic.toml",
        ])
        .expect("valid args");
        assert_eq!(args.output_dir.as_deref(), Some("out"));
        assert_eq!(args.iterations, Some(5));
        assert_eq!(args.threshold, Some(90));
        assert_eq!(args.config.as_deref(), Some("critic.toml"));
    }

    #[test]
    fn test_missing_input_is_rejected() {
        assert!(Args::try_parse_from(["svg-critic"]).is_err());
    }
}
