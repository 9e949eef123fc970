use std::path::PathBuf;
use std::process::ExitCode;

use anyhow::Context as _;
use clap::Parser;
use log::info;

use condmatrix::host::{self, write_output};
use condmatrix::matrix::format_output;
use condmatrix::{context_source, ConditionsInput, EvaluatorOptions, DEFAULT_MAX_DEPTH};

/// Evaluate condition rules against the workflow environment and emit a
/// job matrix.
#[derive(Debug, Parser)]
#[command(name = "condmatrix", version, about)]
struct Args {
    /// Path to a JSON file holding the conditions
    #[arg(long, env = "INPUT_CONDITIONS-FILE")]
    conditions_file: Option<String>,

    /// Inline JSON object holding the conditions
    #[arg(long, env = "INPUT_CONDITIONS-JSON")]
    conditions_json: Option<String>,

    /// Maximum nesting depth of condition groups
    #[arg(long, env = "INPUT_MAX-DEPTH", default_value_t = DEFAULT_MAX_DEPTH)]
    max_depth: usize,

    /// File to append step outputs to; stdout when unset
    #[arg(long, env = "GITHUB_OUTPUT")]
    output_file: Option<PathBuf>,
}

fn main() -> ExitCode {
    env_logger::init();
    let args = Args::parse();

    match run(&args) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            println!("Action failed: {err}");
            ExitCode::FAILURE
        }
    }
}

fn run(args: &Args) -> anyhow::Result<()> {
    let input = ConditionsInput::new(args.conditions_file.clone(), args.conditions_json.clone());
    let options = EvaluatorOptions::default().with_max_depth(args.max_depth);
    let context = context_source::from_env();

    let matrix = host::run(&input, context, &options)?;
    info!("generated matrix with {} entries", matrix.len());

    let output_file = args.output_file.as_deref().filter(|p| !p.as_os_str().is_empty());
    write_output(output_file, "matrix", &format_output(&matrix.to_value()))
        .context("failed to write the matrix output")?;
    Ok(())
}
