//! The typed plan representation consumed by the execution engine.

mod expr;
mod node;
mod value;

pub use expr::{
	ArithOpType, BinaryArithExpr, BinaryArithOpEvalRangeExpr, BinaryExpr, BinaryRangeExpr,
	ColumnExpr, ColumnInfo, CompareExpr, ExistsExpr, Expr, JsonContainsExpr, JsonContainsOp,
	LogicalOp, NullExpr, NullOp, OpType, TermExpr, UnaryExpr, UnaryOp, UnaryRangeExpr, ValueExpr,
};
pub use node::{IdField, Ids, PlanNode, QueryInfo, QueryPlanNode, VectorAnns, VectorType};
pub use value::{Array, GenericValue, Slot};
