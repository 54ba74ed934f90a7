//! Assembly of the plans handed to the execution engine.

use std::collections::HashMap;

use crate::catalog::{DataType, FieldSchema, SchemaHelper};
use crate::cnf::VECTOR_PLACEHOLDER_TAG;
use crate::err::Error;
use crate::expr::{Compiler, TemplateValue};
use crate::plan::{
	ColumnInfo, Expr, GenericValue, IdField, Ids, PlanNode, QueryInfo, QueryPlanNode, Slot,
	TermExpr, VectorAnns, VectorType,
};

impl Compiler {
	/// Build a scan plan filtered by `expr`.
	#[instrument(level = "debug", skip_all, fields(collection = schema.collection_name()))]
	pub fn create_retrieve_plan(
		&self,
		schema: &SchemaHelper,
		expr: &str,
		values: &HashMap<String, TemplateValue>,
	) -> Result<PlanNode, Error> {
		let predicate = self.parse_expr(schema, expr, values).inspect_err(|e| {
			debug!("failed to create retrieve plan for `{expr}`: {e}");
		})?;
		Ok(PlanNode::Query(QueryPlanNode {
			predicates: Some(predicate),
			is_count: false,
			limit: 0,
		}))
	}

	/// Build a vector search over `vector_field`, filtered by `expr` unless it is empty.
	#[instrument(level = "debug", skip_all, fields(collection = schema.collection_name(), field = vector_field))]
	pub fn create_search_plan(
		&self,
		schema: &SchemaHelper,
		expr: &str,
		vector_field: &str,
		query_info: QueryInfo,
		values: &HashMap<String, TemplateValue>,
	) -> Result<PlanNode, Error> {
		let predicates = if expr.is_empty() {
			None
		} else {
			let predicate = self.parse_expr(schema, expr, values).inspect_err(|e| {
				debug!("failed to create search plan for `{expr}`: {e}");
			})?;
			Some(predicate)
		};

		let field = schema.field_by_name(vector_field)?;
		if !schema.is_field_loaded(field.field_id) {
			warn!("search on field {vector_field} which is not loaded");
			return Err(Error::FieldNotLoaded {
				name: vector_field.to_owned(),
			});
		}
		if !field.data_type.is_vector() {
			return Err(Error::NotVectorField {
				name: vector_field.to_owned(),
			});
		}
		let vector_type = match field.data_type {
			DataType::BinaryVector => VectorType::BinaryVector,
			DataType::FloatVector => VectorType::FloatVector,
			DataType::Float16Vector => VectorType::Float16Vector,
			DataType::BFloat16Vector => VectorType::BFloat16Vector,
			DataType::SparseFloatVector => VectorType::SparseFloatVector,
			data_type => fail!("vector data type {data_type} has no vector kind"),
		};

		Ok(PlanNode::VectorAnns(VectorAnns {
			vector_type,
			predicates,
			query_info,
			placeholder_tag: VECTOR_PLACEHOLDER_TAG.to_owned(),
			field_id: field.field_id,
		}))
	}
}

/// Build a plan fetching the rows with the given primary keys again.
///
/// An id list holding neither integers nor strings yields a plan matching
/// nothing, with a limit of zero.
pub fn create_requery_plan(pk_field: &FieldSchema, ids: &Ids) -> PlanNode {
	let values: Vec<GenericValue> = match &ids.id_field {
		Some(IdField::IntId(ids)) => ids.iter().copied().map(GenericValue::Int64).collect(),
		Some(IdField::StrId(ids)) => ids.iter().cloned().map(GenericValue::String).collect(),
		None => Vec::new(),
	};
	let limit = values.len() as i64;
	let column = ColumnInfo {
		field_id: pk_field.field_id,
		data_type: pk_field.data_type,
		is_primary_key: true,
		is_auto_id: pk_field.auto_id,
		is_partition_key: pk_field.is_partition_key,
		..Default::default()
	};
	PlanNode::Query(QueryPlanNode {
		predicates: Some(Expr::Term(TermExpr {
			column,
			values: Slot::Value(values),
		})),
		is_count: false,
		limit,
	})
}

#[cfg(test)]
mod tests {
	use std::time::Duration;

	use rstest::rstest;

	use super::*;
	use crate::catalog::CollectionSchema;
	use crate::err::ErrorKind;
	use crate::plan::{OpType, UnaryRangeExpr};

	fn schema(vector_type: DataType) -> SchemaHelper {
		SchemaHelper::new(
			CollectionSchema::new("c")
				.with_field(FieldSchema::new(100, "id", DataType::Int64).with_primary_key(true))
				.with_field(FieldSchema::new(101, "age", DataType::Int64))
				.with_field(FieldSchema::new(102, "vec", vector_type)),
		)
		.unwrap()
	}

	fn compiler() -> Compiler {
		Compiler::new(16, Duration::from_secs(60))
	}

	fn query_info() -> QueryInfo {
		QueryInfo {
			topk: 10,
			metric_type: "L2".to_owned(),
			search_params: r#"{"nprobe": 10}"#.to_owned(),
			round_decimal: -1,
			group_by_field_id: None,
		}
	}

	#[rstest]
	#[case::binary(DataType::BinaryVector, VectorType::BinaryVector)]
	#[case::float(DataType::FloatVector, VectorType::FloatVector)]
	#[case::float16(DataType::Float16Vector, VectorType::Float16Vector)]
	#[case::bfloat16(DataType::BFloat16Vector, VectorType::BFloat16Vector)]
	#[case::sparse(DataType::SparseFloatVector, VectorType::SparseFloatVector)]
	fn search_plan_vector_kinds(#[case] data_type: DataType, #[case] expected: VectorType) {
		let plan = compiler()
			.create_search_plan(&schema(data_type), "", "vec", query_info(), &HashMap::new())
			.unwrap();
		let PlanNode::VectorAnns(anns) = plan else {
			panic!("expected a vector search");
		};
		assert_eq!(anns.vector_type, expected);
		assert_eq!(anns.field_id, 102);
		assert_eq!(anns.placeholder_tag, "$0");
		assert_eq!(anns.predicates, None);
		assert_eq!(anns.query_info, query_info());
	}

	#[test]
	fn search_plan_with_predicate() {
		let helper = schema(DataType::FloatVector);
		let plan = compiler()
			.create_search_plan(&helper, "age > 1", "vec", query_info(), &HashMap::new())
			.unwrap();
		assert_eq!(
			plan.predicates(),
			Some(&Expr::UnaryRange(UnaryRangeExpr {
				column: ColumnInfo::from_field(helper.field_by_name("age").unwrap()),
				op: OpType::GreaterThan,
				value: Slot::Value(GenericValue::Int64(1)),
			}))
		);
	}

	#[test]
	fn search_plan_field_errors() {
		let compiler = compiler();
		let helper = schema(DataType::FloatVector);
		let none = HashMap::new();

		let missing = compiler.create_search_plan(&helper, "", "nope", query_info(), &none).unwrap_err();
		assert_eq!(
			missing,
			Error::FieldNotFound {
				name: "nope".to_owned()
			}
		);

		let unloaded = helper.clone().with_loaded_fields([100, 101]);
		let err = compiler.create_search_plan(&unloaded, "", "vec", query_info(), &none).unwrap_err();
		assert_eq!(
			err,
			Error::FieldNotLoaded {
				name: "vec".to_owned()
			}
		);
		assert_eq!(err.kind(), ErrorKind::Schema);
		assert_ne!(err, missing);

		let err = compiler.create_search_plan(&helper, "", "age", query_info(), &none).unwrap_err();
		assert_eq!(
			err,
			Error::NotVectorField {
				name: "age".to_owned()
			}
		);

		// The expression is compiled before the field is looked at.
		let err = compiler.create_search_plan(&helper, "age +", "nope", query_info(), &none).unwrap_err();
		assert_eq!(err.kind(), ErrorKind::Syntax);
	}

	#[test]
	fn retrieve_plan() {
		let compiler = compiler();
		let helper = schema(DataType::FloatVector);
		let plan = compiler.create_retrieve_plan(&helper, "", &HashMap::new()).unwrap();
		assert_eq!(
			plan,
			PlanNode::Query(QueryPlanNode {
				predicates: Some(Expr::AlwaysTrue),
				is_count: false,
				limit: 0,
			})
		);
		let err = compiler.create_retrieve_plan(&helper, "1 + 2", &HashMap::new()).unwrap_err();
		assert!(matches!(err, Error::NotBoolean { data_type: DataType::Int64, .. }));
		assert_eq!(err.kind(), ErrorKind::Semantic);
	}

	#[test]
	fn requery_plan_with_int_ids() {
		let pk = FieldSchema::new(100, "id", DataType::Int64).with_primary_key(true).with_partition_key();
		let plan = create_requery_plan(&pk, &Ids::int([1, 2, 3]));
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
		assert_eq!(term.column.field_id, 100);
		assert!(term.column.is_primary_key);
		assert!(term.column.is_auto_id);
		assert!(term.column.is_partition_key);
	}

	#[test]
	fn requery_plan_with_string_ids() {
		let pk = FieldSchema::new(7, "pk", DataType::VarChar).with_primary_key(false);
		let plan = create_requery_plan(&pk, &Ids::str(["a", "b"]));
		let PlanNode::Query(query) = plan else {
			panic!("expected a query");
		};
		assert_eq!(query.limit, 2);
		let Some(Expr::Term(term)) = query.predicates else {
			panic!("expected a term expression");
		};
		assert_eq!(term.column.data_type, DataType::VarChar);
		assert!(!term.column.is_auto_id);
		assert_eq!(
			term.values,
			Slot::Value(vec![GenericValue::String("a".to_owned()), GenericValue::String("b".to_owned())])
		);
	}

	#[test]
	fn requery_plan_without_ids() {
		let pk = FieldSchema::new(100, "id", DataType::Int64).with_primary_key(true);
		let PlanNode::Query(query) = create_requery_plan(&pk, &Ids::default()) else {
			panic!("expected a query");
		};
		assert_eq!(query.limit, 0);
		let Some(Expr::Term(term)) = query.predicates else {
			panic!("expected a term expression");
		};
		assert_eq!(term.values, Slot::Value(Vec::new()));
	}
}
