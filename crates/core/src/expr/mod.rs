//! Compilation of filter expressions into typed plan expressions.
//!
//! An expression goes through the following stages:
//!
//! 1. The [`ExprCache`] is looked up by the collection name and the raw text.
//! 2. Han characters are escaped, see [`convert_han_to_ascii`](crate::syn::convert_han_to_ascii).
//! 3. A pooled lexer and parser turn the text into an [`Ast`](crate::syn::ast::Ast).
//! 4. The [`ExprVisitor`] checks the tree against the schema and lowers it
//!    into an [`ExprWithType`].
//!
//! The outcome of these stages, failures included, is cached. Template values
//! are filled into a private copy of the cached expression afterwards.

use serde::Serialize;

use crate::catalog::DataType;
use crate::err::Error;
use crate::plan::{ColumnInfo, Expr, GenericValue, OpType, Slot, UnaryRangeExpr, ValueExpr};

pub mod cache;
mod cast;
mod compiler;
pub mod template;
mod visitor;

pub use cache::{CacheStats, ExprCache, Outcome, ParseKey};
pub(crate) use cast::cast_value;
pub use compiler::Compiler;
pub use template::{
	TemplateArray, TemplateValue, fill_expression_value, unmarshal_expression_values,
};
pub use visitor::ExprVisitor;

/// A plan expression together with the type of the value it produces.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct ExprWithType {
	pub data_type: DataType,
	pub expr: Expr,
	/// Whether this is a constant or a bare column reference, whose meaning
	/// depends on the node it ends up in.
	pub node_dependent: bool,
}

impl ExprWithType {
	/// The predicate of an empty expression.
	pub fn always_true() -> Self {
		Self {
			data_type: DataType::Bool,
			expr: Expr::AlwaysTrue,
			node_dependent: false,
		}
	}

	pub(crate) fn constant(value: GenericValue) -> Self {
		Self {
			data_type: value.data_type(),
			expr: Expr::value(value),
			node_dependent: true,
		}
	}

	pub(crate) fn template(name: String) -> Self {
		Self {
			data_type: DataType::None,
			expr: Expr::Value(ValueExpr {
				value: Slot::Template(name),
			}),
			node_dependent: true,
		}
	}

	pub(crate) fn column(info: ColumnInfo) -> Self {
		Self {
			data_type: info.value_type(),
			expr: Expr::column(info),
			node_dependent: true,
		}
	}

	pub(crate) fn predicate(expr: Expr) -> Self {
		Self {
			data_type: DataType::Bool,
			expr,
			node_dependent: false,
		}
	}

	/// The literal slot of a constant or template.
	pub(crate) fn literal(&self) -> Option<&Slot<GenericValue>> {
		match &self.expr {
			Expr::Value(v) => Some(&v.value),
			_ => None,
		}
	}

	/// Turn a boolean typed expression into a predicate the engine can execute.
	///
	/// A bare boolean column `flag` becomes `flag == true`, the constants
	/// `true` and `false` become an always true node and its negation.
	pub fn into_predicate(self) -> Result<Expr, Error> {
		if !self.data_type.is_bool() {
			semantic!("expression of type {} is not a boolean predicate", self.data_type);
		}
		match self.expr {
			Expr::Value(ValueExpr {
				value: Slot::Value(GenericValue::Bool(b)),
			}) => Ok(if b {
				Expr::AlwaysTrue
			} else {
				Expr::not(Expr::AlwaysTrue)
			}),
			Expr::Column(c) => Ok(Expr::UnaryRange(UnaryRangeExpr {
				column: c.info,
				op: OpType::Equal,
				value: Slot::Value(GenericValue::Bool(true)),
			})),
			expr => Ok(expr),
		}
	}
}
