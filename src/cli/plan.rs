use anyhow::{Context, Result};
use clap::Args;
use filterplan_core::plan::{Ids, PlanNode, QueryInfo};
use filterplan_core::{Compiler, create_requery_plan};

use crate::cli::abstraction::{SchemaArguments, TemplateArguments};

#[derive(Args, Debug)]
pub struct RetrieveCommandArguments {
	#[command(flatten)]
	schema: SchemaArguments,
	#[command(flatten)]
	templates: TemplateArguments,
	#[arg(help = "The filter expression, an empty expression matches every row")]
	expr: String,
}

#[derive(Args, Debug)]
pub struct SearchCommandArguments {
	#[command(flatten)]
	schema: SchemaArguments,
	#[command(flatten)]
	templates: TemplateArguments,
	#[arg(help = "The name of the vector field to search")]
	#[arg(short, long)]
	field: String,
	#[arg(help = "The number of nearest neighbours to return")]
	#[arg(long, default_value_t = 10)]
	topk: i64,
	#[arg(help = "The distance metric of the search")]
	#[arg(long, default_value = "L2")]
	metric: String,
	#[arg(help = "Index specific search parameters, as JSON")]
	#[arg(long, default_value = "{}", value_parser = parse_search_params)]
	search_params: String,
	#[arg(help = "The number of decimals to round distances to, -1 to keep them")]
	#[arg(long, default_value_t = -1, allow_negative_numbers = true)]
	round_decimal: i64,
	#[arg(help = "The filter expression, none to search every row")]
	#[arg(default_value = "")]
	expr: String,
}

#[derive(Args, Debug)]
pub struct RequeryCommandArguments {
	#[command(flatten)]
	schema: SchemaArguments,
	#[arg(help = "The primary keys of the rows to fetch")]
	ids: Vec<String>,
}

pub fn retrieve(
	RetrieveCommandArguments {
		schema,
		templates,
		expr,
	}: RetrieveCommandArguments,
) -> Result<()> {
	let schema = schema.load()?;
	let plan = Compiler::global()
		.create_retrieve_plan(&schema, &expr, &templates.values())
		.with_context(|| format!("failed to create a retrieve plan for '{expr}'"))?;
	print(&plan)
}

pub fn search(
	SearchCommandArguments {
		schema,
		templates,
		field,
		topk,
		metric,
		search_params,
		round_decimal,
		expr,
	}: SearchCommandArguments,
) -> Result<()> {
	let schema = schema.load()?;
	let query_info = QueryInfo {
		topk,
		metric_type: metric,
		search_params,
		round_decimal,
		group_by_field_id: None,
	};
	let plan = Compiler::global()
		.create_search_plan(&schema, &expr, &field, query_info, &templates.values())
		.with_context(|| format!("failed to create a search plan over '{field}'"))?;
	print(&plan)
}

pub fn requery(
	RequeryCommandArguments {
		schema,
		ids,
	}: RequeryCommandArguments,
) -> Result<()> {
	let schema = schema.load()?;
	let pk = schema.primary_key_field()?;
	let ids = if pk.data_type.is_integer() {
		let ids = ids
			.iter()
			.map(|id| id.parse::<i64>().with_context(|| format!("'{id}' is not an integer key")))
			.collect::<Result<Vec<_>>>()?;
		Ids::int(ids)
	} else {
		Ids::str(ids)
	};
	print(&create_requery_plan(pk, &ids))
}

fn parse_search_params(arg: &str) -> Result<String> {
	let params: serde_json::Value =
		serde_json::from_str(arg).context("search parameters must be valid JSON")?;
	Ok(params.to_string())
}

fn print(plan: &PlanNode) -> Result<()> {
	let json = serde_json::to_string_pretty(plan).context("failed to serialize the plan")?;
	println!("{json}");
	Ok(())
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn search_params_are_normalized() {
		assert_eq!(parse_search_params(r#"{ "nprobe" : 10 }"#).unwrap(), r#"{"nprobe":10}"#);
		assert!(parse_search_params("{nprobe: 10}").is_err());
	}
}
