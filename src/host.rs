//! The end-to-end pipeline used by the `condmatrix` binary.

use std::fs::OpenOptions;
use std::io::{self, Write};
use std::path::Path;

use log::{debug, info};

use crate::matrix::Matrix;
use crate::source::ConditionsInput;
use crate::{ConditionEvaluator, Context, CondmatrixError, EvaluatorOptions};

/// Load the configuration, evaluate it against `context` and build the
/// matrix from the merged outputs.
///
/// # Errors
///
/// Returns [`CondmatrixError`] if loading or compiling the configuration
/// fails.
pub fn run(
    input: &ConditionsInput,
    context: Context,
    options: &EvaluatorOptions,
) -> Result<Matrix, CondmatrixError> {
    let config = input.load()?;
    debug!("loaded conditions: {config}");

    let evaluator = ConditionEvaluator::with_options(context, *options);
    let result = evaluator.evaluate(&config)?;
    info!(
        "matched {} condition(s): {:?}",
        result.matched_conditions().len(),
        result.matched_conditions()
    );

    let matrix = Matrix::from_result(&result);
    debug!("matrix: {matrix}");
    Ok(matrix)
}

/// Write a step output. With a path the `name=value` pair is appended to the
/// file, using a heredoc block for multi-line values; otherwise it goes to
/// stdout.
///
/// # Errors
///
/// Returns any I/O error from opening or writing the file.
pub fn write_output(path: Option<&Path>, name: &str, value: &str) -> io::Result<()> {
    let line = output_line(name, value);
    match path {
        Some(path) => {
            let mut file = OpenOptions::new().create(true).append(true).open(path)?;
            file.write_all(line.as_bytes())
        }
        None => io::stdout().lock().write_all(line.as_bytes()),
    }
}

fn output_line(name: &str, value: &str) -> String {
    if !value.contains('\n') {
        return format!("{name}={value}\n");
    }
    let mut delimiter = String::from("ghadelimiter");
    while value.contains(&delimiter) {
        delimiter.push('_');
    }
    format!("{name}<<{delimiter}\n{value}\n{delimiter}\n")
}
