use anyhow::{Result, bail};
use clap::Args;
use filterplan_core::catalog::DataType;
use filterplan_core::{Compiler, Error};

use crate::cli::abstraction::SchemaArguments;

#[derive(Args, Debug)]
pub struct CheckCommandArguments {
	#[command(flatten)]
	schema: SchemaArguments,
	#[arg(help = "The filter expressions to check", required = true)]
	exprs: Vec<String>,
}

pub fn init(
	CheckCommandArguments {
		schema,
		exprs,
	}: CheckCommandArguments,
) -> Result<()> {
	let schema = schema.load()?;
	let compiler = Compiler::global();
	let mut failed = 0;
	for expr in &exprs {
		// Placeholders stay unfilled, so expressions with templates check too
		let outcome = match compiler.handle_expr(&schema, expr).as_ref() {
			Ok(typed) if typed.data_type != DataType::Bool => Err(Error::NotBoolean {
				expr: expr.clone(),
				data_type: typed.data_type,
			}),
			Ok(_) => Ok(()),
			Err(e) => Err(e.clone()),
		};
		match outcome {
			Ok(()) => println!("{expr}: OK"),
			Err(error) => {
				println!("{expr}: KO");
				eprintln!("{error}");
				failed += 1;
			}
		}
	}
	if failed > 0 {
		bail!("{failed} of {} expressions are invalid", exprs.len());
	}
	Ok(())
}
