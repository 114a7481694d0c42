//! SymNMF command-line front end.
//!
//! ## Usage
//!
//! ```bash
//! symnmf sym   points.txt
//! symnmf ddg   points.txt
//! symnmf norm  points.txt
//! symnmf symnmf points.txt --k 3 --seed 1234
//! symnmf analysis points.txt --k 3
//! ```
//!
//! Prints the requested matrix as comma-separated rows with four decimals.
//! `analysis` prints the silhouette scores of the SymNMF and k-means
//! clusterings instead.
//! Any failure, including bad arguments, prints `An Error Has Occurred` on
//! stdout and exits with status 1. Diagnostics go to stderr through
//! `RUST_LOG`.

use std::io;
use std::path::PathBuf;
use std::process::ExitCode;

use clap::Parser;
use log::error;

use symnmf_core::analysis::compare;
use symnmf_core::init::DEFAULT_SEED;
use symnmf_core::{read_points_file, run_goal, write_matrix, Error, Goal, RunOptions};

const ERROR_MESSAGE: &str = "An Error Has Occurred";
const ANALYSIS: &str = "analysis";

/// Similarity, degree, normalized affinity or SymNMF factor of a points file.
#[derive(Parser, Debug)]
#[command(name = "symnmf", version)]
struct Args {
    /// One of: sym, ddg, norm, symnmf, analysis.
    goal: String,

    /// Comma-separated points file, one point per line.
    file: PathBuf,

    /// Rank of the factor (symnmf and analysis goals).
    #[arg(long)]
    k: Option<usize>,

    /// Seed for the initial factor (symnmf and analysis goals).
    #[arg(long, default_value_t = DEFAULT_SEED)]
    seed: u64,
}

fn analyze(args: &Args) -> symnmf_core::Result<()> {
    let k = args.k.ok_or_else(|| Error::InvalidArgument {
        arg: "k",
        reason: "the analysis goal needs a rank".into(),
    })?;
    let points = read_points_file(&args.file)?;
    let options = RunOptions::default();
    let report = compare(&points, k, args.seed, &options.solver)?;
    print!("{report}");
    Ok(())
}

fn run(args: &Args) -> symnmf_core::Result<()> {
    if args.goal == ANALYSIS {
        return analyze(args);
    }
    let goal: Goal = args.goal.parse()?;
    let points = read_points_file(&args.file)?;
    let options = RunOptions {
        k: args.k,
        seed: args.seed,
        ..RunOptions::default()
    };
    let result = run_goal(goal, &points, &options)?;
    write_matrix(io::stdout().lock(), &result)
}

fn main() -> ExitCode {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("warn")).init();

    let outcome = match Args::try_parse() {
        Ok(args) => run(&args).map_err(|e| e.to_string()),
        Err(e) if !e.use_stderr() => e.exit(),
        Err(e) => Err(e.to_string()),
    };

    match outcome {
        Ok(()) => ExitCode::SUCCESS,
        Err(reason) => {
            error!("{}", reason);
            println!("{ERROR_MESSAGE}");
            ExitCode::FAILURE
        }
    }
}
