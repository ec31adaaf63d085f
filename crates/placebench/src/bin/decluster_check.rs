//! Report where replicas go when one server fails.

use std::process::ExitCode;

use clap::error::ErrorKind;
use clap::{CommandFactory, Parser};
use placebench::cli::DeclusterArgs;

fn main() -> ExitCode {
    let args = DeclusterArgs::parse();
    if let Err(err) = args.validate() {
        DeclusterArgs::command().error(ErrorKind::ValueValidation, err).exit();
    }

    match placebench::run::run_decluster(&args) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            eprintln!("Error: {err:#}");
            ExitCode::FAILURE
        }
    }
}
