use mimport_core::logging;

mod cli;

use crate::cli::Cli;

fn main() {
    // Initialize logging as early as possible; a read-only home falls back to stderr.
    if logging::init_logging().is_err() {
        logging::init_logging_stderr();
    }

    // Parse CLI and run. Missing arguments exit with status 2 inside clap.
    if let Err(err) = Cli::run_from_args() {
        eprintln!("mimport error: {:#}", err);
        std::process::exit(1);
    }
}
