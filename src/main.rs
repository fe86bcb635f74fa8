//! chopy - interactive remover of same-named duplicate files.
//!
//! Entry point for the chopy CLI application.

use chopy::{cli::Cli, error::ExitCode, logging::init_logging};
use clap::Parser;

fn main() {
    // clap prints usage and exits with 2 when PATH is missing
    let cli = Cli::parse();
    init_logging(cli.verbose, cli.quiet);

    match chopy::run_app(cli) {
        Ok(code) => std::process::exit(code.as_i32()),
        Err(err) => {
            let exit_code = ExitCode::GeneralError;
            eprintln!("[{}] Error: {:#}", exit_code.code_prefix(), err);
            std::process::exit(exit_code.as_i32());
        }
    }
}
