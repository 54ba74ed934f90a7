mod abstraction;
mod check;
mod plan;

use std::process::ExitCode;

use clap::{Parser, Subcommand};

use crate::cli::check::CheckCommandArguments;
use crate::cli::plan::{
	RequeryCommandArguments, RetrieveCommandArguments, SearchCommandArguments,
};

const INFO: &str = "
Filterplan compiles filter expressions against a collection schema into
the query and vector search plans an execution engine consumes.
";

#[derive(Parser, Debug)]
#[command(name = "filterplan", bin_name = "filterplan")]
#[command(about = INFO, version)]
#[command(arg_required_else_help = true)]
struct Cli {
	#[arg(help = "The logging level or filter directives")]
	#[arg(env = "FILTERPLAN_LOG", short, long, global = true)]
	#[arg(default_value = "warn")]
	log: String,
	#[command(subcommand)]
	command: Commands,
}

#[derive(Debug, Subcommand)]
enum Commands {
	#[command(about = "Check that filter expressions compile against a schema")]
	Check(CheckCommandArguments),
	#[command(about = "Print the query plan for a filter expression")]
	Retrieve(RetrieveCommandArguments),
	#[command(about = "Print the vector search plan for a filter expression")]
	Search(SearchCommandArguments),
	#[command(about = "Print the plan fetching rows again by primary key")]
	Requery(RequeryCommandArguments),
}

pub fn init() -> ExitCode {
	let args = Cli::parse();
	// Initialize logging
	if let Err(e) = crate::telemetry::builder().with_log_level(&args.log).init() {
		eprintln!("{e:#}");
		return ExitCode::FAILURE;
	}
	let output = match args.command {
		Commands::Check(args) => check::init(args),
		Commands::Retrieve(args) => plan::retrieve(args),
		Commands::Search(args) => plan::search(args),
		Commands::Requery(args) => plan::requery(args),
	};
	if let Err(e) = output {
		error!("{e:#}");
		eprintln!("{e:#}");
		ExitCode::FAILURE
	} else {
		ExitCode::SUCCESS
	}
}

#[cfg(test)]
mod tests {
	use clap::CommandFactory;

	use super::*;

	#[test]
	fn verify_cli() {
		Cli::command().debug_assert();
	}

	#[test]
	fn parses_search_arguments() {
		let cli = Cli::try_parse_from([
			"filterplan",
			"--log",
			"debug",
			"search",
			"--schema",
			"schema.json",
			"--field",
			"vec",
			"--topk",
			"5",
			"--param",
			"min=1",
			"age > {min}",
		])
		.unwrap();
		assert_eq!(cli.log, "debug");
		assert!(matches!(cli.command, Commands::Search(_)));
	}

	#[test]
	fn check_requires_an_expression() {
		assert!(Cli::try_parse_from(["filterplan", "check", "--schema", "s.json"]).is_err());
	}
}
