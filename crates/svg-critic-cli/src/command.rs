//! External improver backed by a child process.
//!
//! The command receives the current SVG on stdin and the evaluation as JSON in
//! the [`EVALUATION_ENV`] environment variable. It must print the improved
//! SVG on stdout and exit successfully. Anything else is reported to the
//! design loop as a [`CollaboratorError`], which then falls back to the local
//! mutation engine.

use std::{
    io::Write,
    process::{Command, Stdio},
    thread,
};

use log::debug;

use svg_critic::{
    design_loop::{CollaboratorError, Improver},
    document::Document,
    evaluation::Evaluation,
    export,
};

/// Environment variable carrying the evaluation JSON.
pub const EVALUATION_ENV: &str = "SVG_CRITIC_EVALUATION";

/// Runs a program to improve documents.
#[derive(Debug, Clone)]
pub struct CommandImprover {
    program: String,
    args: Vec<String>,
}

impl CommandImprover {
    /// Creates an improver from a command line. The first whitespace
    /// separated word is the program, the rest are its arguments.
    ///
    /// Returns `None` if `command` is blank.
    pub fn new(command: &str) -> Option<Self> {
        let mut words = command.split_whitespace().map(str::to_string);
        let program = words.next()?;
        Some(Self {
            program,
            args: words.collect(),
        })
    }
}

impl Improver for CommandImprover {
    fn name(&self) -> &str {
        &self.program
    }

    fn improve(
        &mut self,
        document: &Document,
        evaluation: &Evaluation,
    ) -> Result<Document, CollaboratorError> {
        let markup = export::svg::render(document)
            .map_err(|err| CollaboratorError::Failed(err.to_string()))?;
        let json = evaluation
            .to_json()
            .map_err(|err| CollaboratorError::Failed(err.to_string()))?;

        debug!(program = self.program, args:? = self.args; "Running improver command");
        let mut child = Command::new(&self.program)
            .args(&self.args)
            .env(EVALUATION_ENV, json)
            .stdin(Stdio::piped())
            .stdout(Stdio::piped())
            .stderr(Stdio::inherit())
            .spawn()?;

        // Written from a separate thread so a child that streams its output
        // cannot block on a full stdout pipe.
        let writer = child.stdin.take().map(|mut stdin| {
            thread::spawn(move || stdin.write_all(markup.as_bytes()))
        });

        let output = child.wait_with_output()?;
        let written = match writer.map(thread::JoinHandle::join) {
            Some(Ok(result)) => result,
            Some(Err(_)) => {
                return Err(CollaboratorError::Failed(
                    "stdin writer panicked".to_string(),
                ));
            }
            None => Ok(()),
        };

        if !output.status.success() {
            return Err(CollaboratorError::Failed(format!(
                "{} exited with {}",
                self.program, output.status
            )));
        }
        // A command may exit without reading all of its input.
        match written {
            Err(err) if err.kind() != std::io::ErrorKind::BrokenPipe => return Err(err.into()),
            _ => {}
        }

        let improved = String::from_utf8(output.stdout)
            .map_err(|err| CollaboratorError::Failed(format!("output is not UTF-8: {err}")))?;
        Ok(svg_critic_parser::parse(&improved)?)
    }
}

#[cfg(test)]
mod tests {
    use svg_critic::evaluation::evaluate;

    use super::*;

    const SOURCE: &str =
        r#"<svg width="100" height="100"><rect id="a" width="10" height="10"/></svg>"#;

    fn document() -> Document {
        svg_critic_parser::parse(SOURCE).expect("valid document")
    }

    #[test]
    fn test_blank_command() {
        assert!(CommandImprover::new("   ").is_none());
    }

    #[test]
    fn test_command_splits_arguments() {
        let improver = CommandImprover::new("python3 improve.py --fast").expect("command");
        assert_eq!(improver.name(), "python3");
        assert_eq!(improver.args, vec!["improve.py", "--fast"]);
    }

    #[test]
    fn test_missing_program_is_io_error() {
        let document = document();
        let mut improver =
            CommandImprover::new("svg-critic-test-no-such-program").expect("command");
        let result = improver.improve(&document, &evaluate(&document));
        assert!(matches!(result, Err(CollaboratorError::Io(_))));
    }

    #[cfg(unix)]
    #[test]
    fn test_echoing_command_returns_same_shapes() {
        let document = document();
        let mut improver = CommandImprover::new("cat").expect("command");
        let improved = improver
            .improve(&document, &evaluate(&document))
            .expect("cat echoes the document");
        assert_eq!(improved.shapes(), document.shapes());
    }

    #[cfg(unix)]
    #[test]
    fn test_failing_command() {
        let document = document();
        let mut improver = CommandImprover::new("false").expect("command");
        let result = improver.improve(&document, &evaluate(&document));
        assert!(matches!(result, Err(CollaboratorError::Failed(_))));
    }

    #[cfg(unix)]
    #[test]
    fn test_evaluation_is_passed_in_environment() {
        let document = document();
        let mut improver =
            CommandImprover::new("printenv SVG_CRITIC_EVALUATION").expect("command");
        // printenv fails when the variable is unset; the JSON it prints
        // otherwise is not SVG.
        let result = improver.improve(&document, &evaluate(&document));
        assert!(matches!(result, Err(CollaboratorError::InvalidDocument(_))));
    }
}
