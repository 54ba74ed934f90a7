//! Tests of the public compile and planning surface

#![allow(clippy::unwrap_used)]

use std::collections::HashMap;
use std::sync::Arc;
use std::thread;
use std::time::Duration;

use anyhow::Result;
use filterplan_core::catalog::{CollectionSchema, DataType, FieldSchema, SchemaHelper};
use filterplan_core::plan::{
	ColumnInfo, Expr, GenericValue, Ids, OpType, PlanNode, QueryInfo, Slot, UnaryRangeExpr,
};
use filterplan_core::syn::convert_han_to_ascii;
use filterplan_core::{Compiler, Error, ErrorKind, ExprWithType, TemplateValue};
use rstest::rstest;

fn schema() -> Result<SchemaHelper> {
	let schema = CollectionSchema::new("movies")
		.with_field(FieldSchema::new(100, "id", DataType::Int64).with_primary_key(true))
		.with_field(FieldSchema::new(101, "age", DataType::Int64))
		.with_field(FieldSchema::new(102, "title", DataType::VarChar))
		.with_field(FieldSchema::new(103, "embedding", DataType::FloatVector))
		.with_field(FieldSchema::new(104, "sparse", DataType::SparseFloatVector))
		.with_field(FieldSchema::new(105, "$meta", DataType::Json).with_dynamic())
		.with_dynamic_field(true);
	Ok(SchemaHelper::new(schema)?)
}

fn compiler() -> Compiler {
	Compiler::new(64, Duration::from_secs(600))
}

#[rstest]
#[case::plain("age > 1 and title == \"x\"")]
#[case::escapes(r#"title like "a\%b" or title == "\u4e2d""#)]
#[case::empty("")]
fn ascii_input_is_not_normalized(#[case] input: &str) {
	assert_eq!(convert_han_to_ascii(input), input);
}

#[rstest]
#[case::unknown_escape(r#"title == "中\q""#)]
#[case::unknown_escape_at_start(r#"\k中"#)]
fn unknown_escapes_leave_input_unchanged(#[case] input: &str) {
	assert_eq!(convert_han_to_ascii(input), input);
}

#[test]
fn normalization_is_idempotent() {
	let once = convert_han_to_ascii(r#"title == "中文""#).into_owned();
	assert_eq!(convert_han_to_ascii(&once), once);
}

#[test]
fn empty_expression_ignores_the_schema() -> Result<()> {
	let compiler = compiler();
	let empty = SchemaHelper::new(CollectionSchema::new("empty"))?;
	for schema in [&schema()?, &empty] {
		let outcome = compiler.handle_expr(schema, "");
		assert_eq!(outcome.as_ref(), &Ok(ExprWithType::always_true()));
		assert_eq!(compiler.parse_expr(schema, "", &HashMap::new())?, Expr::AlwaysTrue);
	}
	Ok(())
}

#[test]
fn repeated_compiles_hit_the_cache() -> Result<()> {
	let compiler = compiler();
	let schema = schema()?;
	for expr in ["age > 1", "age >", "unknown_fn(age)"] {
		let first = compiler.handle_expr(&schema, expr);
		let idle = compiler.pool().idle_parsers();
		let misses = compiler.cache().stats().misses;
		let second = compiler.handle_expr(&schema, expr);
		assert_eq!(first, second, "{expr}");
		assert!(Arc::ptr_eq(&first, &second), "{expr}");
		// A hit never reaches the parser.
		assert_eq!(compiler.pool().idle_parsers(), idle);
		assert_eq!(compiler.cache().stats().misses, misses);
	}
	Ok(())
}

#[test]
fn search_plan_schema_errors() -> Result<()> {
	let compiler = compiler();
	let info = QueryInfo::default();
	let none = HashMap::new();

	let missing = compiler.create_search_plan(&schema()?, "", "nope", info.clone(), &none).unwrap_err();
	assert_eq!(missing.kind(), ErrorKind::Schema);

	let unloaded = schema()?.with_loaded_fields([100, 101, 102]);
	let err = compiler.create_search_plan(&unloaded, "", "embedding", info.clone(), &none).unwrap_err();
	assert_eq!(err.kind(), ErrorKind::Schema);
	assert_ne!(err, missing);
	assert_eq!(err.to_string(), "ann field \"embedding\" not loaded");

	let err = compiler.create_search_plan(&schema()?, "", "title", info.clone(), &none).unwrap_err();
	assert!(matches!(err, Error::NotVectorField { .. }));

	let plan = compiler.create_search_plan(&schema()?, "age < 3", "sparse", info, &none)?;
	let PlanNode::VectorAnns(anns) = plan else {
		panic!("expected a vector search");
	};
	assert_eq!(anns.field_id, 104);
	assert!(anns.predicates.is_some());
	Ok(())
}

#[test]
fn retrieve_plan_requires_a_boolean() -> Result<()> {
	let err = compiler().create_retrieve_plan(&schema()?, "1 + 2", &HashMap::new()).unwrap_err();
	assert_eq!(err.kind(), ErrorKind::Semantic);
	assert_eq!(err.to_string(), "predicate is not a boolean expression: 1 + 2, data type: Int64");
	Ok(())
}

#[test]
fn retrieve_plan_with_templates() -> Result<()> {
	let schema = schema()?;
	let values = HashMap::from([("min".to_owned(), TemplateValue::Int64(30))]);
	let plan = compiler().create_retrieve_plan(&schema, "age >= {min}", &values)?;
	assert_eq!(
		plan.predicates(),
		Some(&Expr::UnaryRange(UnaryRangeExpr {
			column: ColumnInfo::from_field(schema.field_by_name("age")?),
			op: OpType::GreaterEqual,
			value: Slot::Value(GenericValue::Int64(30)),
		}))
	);
	Ok(())
}

#[test]
fn requery_plan() -> Result<()> {
	let schema = schema()?;
	let plan = filterplan_core::create_requery_plan(schema.primary_key_field()?, &Ids::int([1, 2, 3]));
	let PlanNode::Query(query) = plan else {
		panic!("expected a query");
	};
	assert_eq!(query.limit, 3);
	assert!(!query.is_count);
	let Some(Expr::Term(term)) = query.predicates else {
		panic!("expected a term expression");
	};
	assert_eq!(
		term.values,
		Slot::Value(vec![GenericValue::Int64(1), GenericValue::Int64(2), GenericValue::Int64(3)])
	);
	Ok(())
}

#[test]
fn identifier_validation() -> Result<()> {
	let schema = schema()?;
	let mut checked = Vec::new();
	filterplan_core::parse_identifier(&schema, "age", |expr| {
		checked.push(expr.clone());
		Ok(())
	})?;
	assert_eq!(
		checked,
		vec![Expr::column(ColumnInfo::from_field(schema.field_by_name("age")?))]
	);
	let err = filterplan_core::parse_identifier(&schema, "age + 1", |_| Ok(())).unwrap_err();
	assert!(err.to_string().starts_with("cannot parse identifier"));
	Ok(())
}

#[test]
fn global_functions_share_a_compiler() -> Result<()> {
	let schema = schema()?;
	let before = Compiler::global().cache().stats();
	filterplan_core::parse_expr(&schema, "age > 1234567", &HashMap::new())?;
	filterplan_core::parse_expr(&schema, "age > 1234567", &HashMap::new())?;
	let after = Compiler::global().cache().stats();
	assert!(after.hits > before.hits);
	Ok(())
}

#[test_log::test]
fn concurrent_compiles() -> Result<()> {
	let compiler = Arc::new(compiler());
	let schema = Arc::new(schema()?);
	let handles: Vec<_> = (0..8)
		.map(|worker| {
			let compiler = compiler.clone();
			let schema = schema.clone();
			thread::spawn(move || {
				for i in 0..50 {
					let expr = format!("age > {} and title like \"t{}%\"", i % 10, worker % 2);
					let predicate = compiler.parse_expr(&schema, &expr, &HashMap::new()).unwrap();
					assert!(matches!(predicate, Expr::Binary(_)));
				}
			})
		})
		.collect();
	for handle in handles {
		handle.join().unwrap();
	}
	assert_eq!(compiler.cache().len(), 20);
	let stats = compiler.cache().stats();
	assert_eq!(stats.hits + stats.misses, 400);
	assert!(compiler.pool().idle_parsers() >= 1);
	assert!(compiler.pool().idle_parsers() <= 8);
	Ok(())
}

#[test]
fn long_disjunctions_compile() -> Result<()> {
	let schema = schema()?;
	let expr = (0..12_000).map(|i| format!("id == {i}")).collect::<Vec<_>>().join(" or ");
	let plan = compiler().create_retrieve_plan(&schema, &expr, &HashMap::new())?;
	assert!(matches!(plan.predicates(), Some(Expr::Binary(_))));

	let expr = vec!["age > 1"; 12_000].join(" and ");
	compiler().parse_expr(&schema, &expr, &HashMap::new())?;
	Ok(())
}

#[test]
fn long_arithmetic_chains_are_syntax_errors() -> Result<()> {
	let schema = schema()?;
	let expr = format!("age{} == 3", " + 1".repeat(12_000));
	let err = compiler().parse_expr(&schema, &expr, &HashMap::new()).unwrap_err();
	assert_eq!(err.kind(), ErrorKind::Syntax);
	assert!(err.to_string().contains("Exceeded the maximum expression depth"), "{err}");
	Ok(())
}
