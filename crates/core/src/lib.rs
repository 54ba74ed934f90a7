//! # Filterplan Core
//!
//! This crate compiles filter expressions, such as `age > 18 and name like
//! "a%"`, against a collection schema into typed plan expressions, and
//! assembles those into the scan, vector search and requery plans an
//! execution engine consumes.
//!
//! The free functions of this crate use the process wide [`Compiler`], whose
//! expression cache and parser pool are configured from the environment, see
//! [`cnf`]. Embedders wanting isolated state construct their own [`Compiler`].
//!
//! ```
//! use std::collections::HashMap;
//!
//! use filterplan_core::catalog::{CollectionSchema, DataType, FieldSchema, SchemaHelper};
//!
//! let schema = SchemaHelper::new(
//! 	CollectionSchema::new("books")
//! 		.with_field(FieldSchema::new(100, "id", DataType::Int64).with_primary_key(true))
//! 		.with_field(FieldSchema::new(101, "year", DataType::Int64)),
//! )
//! .unwrap();
//! let plan = filterplan_core::create_retrieve_plan(&schema, "year >= 1990", &HashMap::new());
//! assert!(plan.is_ok());
//! ```

#[macro_use]
extern crate tracing;

#[macro_use]
mod mac;

pub mod catalog;
pub mod cnf;
pub mod err;
pub mod expr;
pub mod plan;
pub mod planner;
pub mod syn;

use std::collections::HashMap;

pub use err::{Error, ErrorKind};
pub use expr::{Compiler, ExprWithType, TemplateArray, TemplateValue};
pub use planner::create_requery_plan;

use catalog::SchemaHelper;
use plan::{Expr, PlanNode, QueryInfo};

/// Compile `expr` into a predicate and fill in its placeholders.
pub fn parse_expr(
	schema: &SchemaHelper,
	expr: &str,
	values: &HashMap<String, TemplateValue>,
) -> Result<Expr, Error> {
	Compiler::global().parse_expr(schema, expr, values)
}

/// Check that `identifier` names a single field and pass it to `check`.
pub fn parse_identifier<F>(schema: &SchemaHelper, identifier: &str, check: F) -> Result<(), Error>
where
	F: FnOnce(&Expr) -> Result<(), Error>,
{
	Compiler::global().parse_identifier(schema, identifier, check)
}

/// Build a scan plan filtered by `expr`.
pub fn create_retrieve_plan(
	schema: &SchemaHelper,
	expr: &str,
	values: &HashMap<String, TemplateValue>,
) -> Result<PlanNode, Error> {
	Compiler::global().create_retrieve_plan(schema, expr, values)
}

/// Build a vector search over `vector_field`, filtered by `expr` unless it is empty.
pub fn create_search_plan(
	schema: &SchemaHelper,
	expr: &str,
	vector_field: &str,
	query_info: QueryInfo,
	values: &HashMap<String, TemplateValue>,
) -> Result<PlanNode, Error> {
	Compiler::global().create_search_plan(schema, expr, vector_field, query_info, values)
}
