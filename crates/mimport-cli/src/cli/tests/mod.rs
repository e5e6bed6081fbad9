//! CLI parse, reporter, and end-to-end run tests.

use super::Cli;
use clap::Parser;

pub(super) fn parse(args: &[&str]) -> Cli {
    Cli::try_parse_from(args).unwrap()
}
