//! Simulate placement of a synthetic object population.

use std::process::ExitCode;

use clap::error::ErrorKind;
use clap::{CommandFactory, Parser};
use placebench::cli::BenchmarkArgs;

fn main() -> ExitCode {
    let args = BenchmarkArgs::parse();
    if let Err(err) = args.validate() {
        BenchmarkArgs::command().error(ErrorKind::ValueValidation, err).exit();
    }

    match placebench::run::run_benchmark(&args) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            eprintln!("Error: {err:#}");
            ExitCode::FAILURE
        }
    }
}
