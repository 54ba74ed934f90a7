use serde::Serialize;

use crate::plan::expr::Expr;

/// The vector element kinds a search can run over.
#[derive(Clone, Copy, Debug, Eq, PartialEq, Hash, Serialize)]
pub enum VectorType {
	BinaryVector,
	FloatVector,
	Float16Vector,
	BFloat16Vector,
	SparseFloatVector,
}

/// Search parameters supplied by the caller and passed through to the engine.
#[derive(Clone, Debug, Default, Eq, PartialEq, Serialize)]
pub struct QueryInfo {
	pub topk: i64,
	pub metric_type: String,
	/// Index specific parameters, encoded as JSON.
	pub search_params: String,
	pub round_decimal: i64,
	pub group_by_field_id: Option<i64>,
}

/// A scan with a predicate.
#[derive(Clone, Debug, Default, PartialEq, Serialize)]
pub struct QueryPlanNode {
	pub predicates: Option<Expr>,
	pub is_count: bool,
	/// The maximum number of rows to return, zero when unlimited.
	pub limit: i64,
}

/// An approximate nearest neighbour search.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct VectorAnns {
	pub vector_type: VectorType,
	pub predicates: Option<Expr>,
	pub query_info: QueryInfo,
	/// Identifies the slot of the request holding the query vectors.
	pub placeholder_tag: String,
	pub field_id: i64,
}

/// A plan handed to the execution engine.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub enum PlanNode {
	Query(QueryPlanNode),
	VectorAnns(VectorAnns),
}

impl PlanNode {
	pub fn predicates(&self) -> Option<&Expr> {
		match self {
			Self::Query(q) => q.predicates.as_ref(),
			Self::VectorAnns(v) => v.predicates.as_ref(),
		}
	}
}

/// Primary key values of the rows to fetch again.
#[derive(Clone, Debug, Default, Eq, PartialEq, Serialize)]
pub struct Ids {
	pub id_field: Option<IdField>,
}

#[derive(Clone, Debug, Eq, PartialEq, Serialize)]
pub enum IdField {
	IntId(Vec<i64>),
	StrId(Vec<String>),
}

impl Ids {
	pub fn int(ids: impl IntoIterator<Item = i64>) -> Self {
		Self {
			id_field: Some(IdField::IntId(ids.into_iter().collect())),
		}
	}

	pub fn str<S: Into<String>>(ids: impl IntoIterator<Item = S>) -> Self {
		Self {
			id_field: Some(IdField::StrId(ids.into_iter().map(Into::into).collect())),
		}
	}
}
