//! Arguments shared between the commands

use std::collections::HashMap;
use std::fs;
use std::path::PathBuf;

use anyhow::{Context, Result, anyhow};
use clap::Args;
use filterplan_core::TemplateValue;
use filterplan_core::catalog::{CollectionSchema, SchemaHelper};
use serde::Deserialize;

/// The contents of a schema file.
#[derive(Debug, Deserialize)]
struct SchemaFile {
	#[serde(flatten)]
	schema: CollectionSchema,
	/// The ids of the fields resident in memory, all fields when absent
	#[serde(default)]
	loaded_fields: Option<Vec<i64>>,
}

#[derive(Args, Debug)]
pub struct SchemaArguments {
	#[arg(help = "Path to the JSON file describing the collection schema")]
	#[arg(env = "FILTERPLAN_SCHEMA", short, long)]
	schema: PathBuf,
}

impl SchemaArguments {
	pub fn load(&self) -> Result<SchemaHelper> {
		let path = self.schema.display();
		let text = fs::read_to_string(&self.schema)
			.with_context(|| format!("failed to read schema file '{path}'"))?;
		let SchemaFile {
			schema,
			loaded_fields,
		} = serde_json::from_str(&text)
			.with_context(|| format!("failed to parse schema file '{path}'"))?;
		let name = schema.name.clone();
		let helper = SchemaHelper::new(schema)
			.with_context(|| format!("invalid schema for collection '{name}'"))?;
		debug!("loaded schema for collection '{name}' from '{path}'");
		Ok(match loaded_fields {
			Some(ids) => helper.with_loaded_fields(ids),
			None => helper,
		})
	}
}

#[derive(Args, Debug)]
pub struct TemplateArguments {
	#[arg(help = "A template value, given as NAME=JSON")]
	#[arg(long = "param", value_name = "NAME=JSON", value_parser = parse_param)]
	params: Vec<(String, TemplateValue)>,
}

impl TemplateArguments {
	pub fn values(&self) -> HashMap<String, TemplateValue> {
		self.params.iter().cloned().collect()
	}
}

fn parse_param(arg: &str) -> Result<(String, TemplateValue)> {
	let (name, json) =
		arg.split_once('=').ok_or_else(|| anyhow!("expected NAME=JSON, found '{arg}'"))?;
	let name = name.trim();
	if name.is_empty() {
		return Err(anyhow!("the template name in '{arg}' is empty"));
	}
	let json: serde_json::Value = serde_json::from_str(json)
		.with_context(|| format!("the value of '{name}' is not valid JSON"))?;
	let value = TemplateValue::from_json(&json)
		.ok_or_else(|| anyhow!("the value of '{name}' must be a scalar or an array"))?;
	Ok((name.to_owned(), value))
}
