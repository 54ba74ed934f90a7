//! The `filterplan` command line, which compiles filter expressions against
//! a collection schema and prints the resulting plans.

#[macro_use]
extern crate tracing;

mod cli;
mod telemetry;

use std::process::ExitCode;

fn main() -> ExitCode {
	cli::init() // Initiate the command line
}
