use std::fmt::{self, Display};

use serde::Serialize;

use crate::catalog::{DataType, FieldSchema};
use crate::plan::value::{GenericValue, Slot};

/// The column an expression reads, and the path inside it for JSON and array columns.
#[derive(Clone, Debug, Default, Eq, PartialEq, Serialize)]
pub struct ColumnInfo {
	pub field_id: i64,
	pub data_type: DataType,
	pub is_primary_key: bool,
	pub is_auto_id: bool,
	pub nested_path: Vec<String>,
	pub is_partition_key: bool,
	pub element_type: DataType,
	pub nullable: bool,
}

impl ColumnInfo {
	pub fn from_field(field: &FieldSchema) -> Self {
		Self {
			field_id: field.field_id,
			data_type: field.data_type,
			is_primary_key: field.is_primary_key,
			is_auto_id: field.auto_id,
			nested_path: Vec::new(),
			is_partition_key: field.is_partition_key,
			element_type: field.element_type,
			nullable: field.nullable,
		}
	}

	/// The type of the values this column reference yields.
	///
	/// Indexing into an array column yields its elements.
	pub fn value_type(&self) -> DataType {
		if self.data_type.is_array() && !self.nested_path.is_empty() {
			self.element_type
		} else {
			self.data_type
		}
	}
}

#[derive(Clone, Copy, Debug, Eq, PartialEq, Hash, Serialize)]
pub enum OpType {
	GreaterThan,
	GreaterEqual,
	LessThan,
	LessEqual,
	Equal,
	NotEqual,
	PrefixMatch,
	PostfixMatch,
	InnerMatch,
	Match,
}

impl OpType {
	/// The operator to use once the operands of a comparison swap sides.
	pub fn reverse(self) -> Self {
		match self {
			Self::GreaterThan => Self::LessThan,
			Self::GreaterEqual => Self::LessEqual,
			Self::LessThan => Self::GreaterThan,
			Self::LessEqual => Self::GreaterEqual,
			op => op,
		}
	}

	pub fn is_equality(self) -> bool {
		matches!(self, Self::Equal | Self::NotEqual)
	}
}

impl Display for OpType {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.write_str(match self {
			Self::GreaterThan => ">",
			Self::GreaterEqual => ">=",
			Self::LessThan => "<",
			Self::LessEqual => "<=",
			Self::Equal => "==",
			Self::NotEqual => "!=",
			Self::PrefixMatch => "prefix match",
			Self::PostfixMatch => "postfix match",
			Self::InnerMatch => "inner match",
			Self::Match => "match",
		})
	}
}

#[derive(Clone, Copy, Debug, Eq, PartialEq, Hash, Serialize)]
pub enum ArithOpType {
	Add,
	Sub,
	Mul,
	Div,
	Mod,
	ArrayLength,
}

impl Display for ArithOpType {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.write_str(match self {
			Self::Add => "+",
			Self::Sub => "-",
			Self::Mul => "*",
			Self::Div => "/",
			Self::Mod => "%",
			Self::ArrayLength => "array_length",
		})
	}
}

#[derive(Clone, Copy, Debug, Eq, PartialEq, Hash, Serialize)]
pub enum JsonContainsOp {
	Contains,
	ContainsAll,
	ContainsAny,
}

#[derive(Clone, Copy, Debug, Eq, PartialEq, Hash, Serialize)]
pub enum NullOp {
	IsNull,
	IsNotNull,
}

#[derive(Clone, Copy, Debug, Eq, PartialEq, Hash, Serialize)]
pub enum LogicalOp {
	And,
	Or,
}

#[derive(Clone, Copy, Debug, Eq, PartialEq, Hash, Serialize)]
pub enum UnaryOp {
	Not,
}

/// `column in [values]`
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct TermExpr {
	pub column: ColumnInfo,
	pub values: Slot<Vec<GenericValue>>,
}

/// `column op value`
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct UnaryRangeExpr {
	pub column: ColumnInfo,
	pub op: OpType,
	pub value: Slot<GenericValue>,
}

/// `lower < column < upper`
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct BinaryRangeExpr {
	pub column: ColumnInfo,
	pub lower_inclusive: bool,
	pub upper_inclusive: bool,
	pub lower: Slot<GenericValue>,
	pub upper: Slot<GenericValue>,
}

/// `left op right` between two columns
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct CompareExpr {
	pub left: ColumnInfo,
	pub right: ColumnInfo,
	pub op: OpType,
}

#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct UnaryExpr {
	pub op: UnaryOp,
	pub child: Box<Expr>,
}

#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct BinaryExpr {
	pub op: LogicalOp,
	pub left: Box<Expr>,
	pub right: Box<Expr>,
}

/// `(column arith_op right_operand) op value`
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct BinaryArithOpEvalRangeExpr {
	pub column: ColumnInfo,
	pub arith_op: ArithOpType,
	/// Absent for unary arithmetic such as `array_length`.
	pub right_operand: Option<Slot<GenericValue>>,
	pub op: OpType,
	pub value: Slot<GenericValue>,
}

/// An arithmetic expression which is not compared against anything (yet).
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct BinaryArithExpr {
	pub left: Box<Expr>,
	pub right: Option<Box<Expr>>,
	pub op: ArithOpType,
}

#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct ValueExpr {
	pub value: Slot<GenericValue>,
}

#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct ColumnExpr {
	pub info: ColumnInfo,
}

#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct ExistsExpr {
	pub info: ColumnInfo,
}

#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct JsonContainsExpr {
	pub column: ColumnInfo,
	pub elements: Slot<Vec<GenericValue>>,
	pub op: JsonContainsOp,
	pub elements_same_type: bool,
}

#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct NullExpr {
	pub column: ColumnInfo,
	pub op: NullOp,
}

/// A node of the typed plan-expression tree.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub enum Expr {
	Term(TermExpr),
	UnaryRange(UnaryRangeExpr),
	BinaryRange(BinaryRangeExpr),
	Compare(CompareExpr),
	Unary(UnaryExpr),
	Binary(BinaryExpr),
	BinaryArithOpEvalRange(BinaryArithOpEvalRangeExpr),
	BinaryArith(BinaryArithExpr),
	Value(ValueExpr),
	Column(ColumnExpr),
	Exists(ExistsExpr),
	AlwaysTrue,
	JsonContains(JsonContainsExpr),
	Null(NullExpr),
}

impl Expr {
	pub fn value(value: GenericValue) -> Self {
		Self::Value(ValueExpr {
			value: Slot::Value(value),
		})
	}

	pub fn column(info: ColumnInfo) -> Self {
		Self::Column(ColumnExpr {
			info,
		})
	}

	pub fn not(child: Expr) -> Self {
		Self::Unary(UnaryExpr {
			op: UnaryOp::Not,
			child: Box::new(child),
		})
	}

	pub fn logical(op: LogicalOp, left: Expr, right: Expr) -> Self {
		Self::Binary(BinaryExpr {
			op,
			left: Box::new(left),
			right: Box::new(right),
		})
	}

	/// The column of a bare column reference.
	pub fn as_column(&self) -> Option<&ColumnInfo> {
		match self {
			Self::Column(c) => Some(&c.info),
			_ => None,
		}
	}

	/// The value of a concrete literal.
	pub fn as_value(&self) -> Option<&GenericValue> {
		match self {
			Self::Value(v) => v.value.value(),
			_ => None,
		}
	}

	/// The placeholder name of a template literal.
	pub fn as_template(&self) -> Option<&str> {
		match self {
			Self::Value(v) => v.value.template(),
			_ => None,
		}
	}

	/// Whether any literal in this tree still waits for a template value.
	pub fn has_template(&self) -> bool {
		match self {
			Self::Term(e) => e.values.is_template(),
			Self::UnaryRange(e) => e.value.is_template(),
			Self::BinaryRange(e) => e.lower.is_template() || e.upper.is_template(),
			Self::BinaryArithOpEvalRange(e) => {
				e.value.is_template() || e.right_operand.as_ref().is_some_and(Slot::is_template)
			}
			Self::Value(e) => e.value.is_template(),
			Self::JsonContains(e) => e.elements.is_template(),
			Self::Unary(e) => e.child.has_template(),
			Self::Binary(e) => e.left.has_template() || e.right.has_template(),
			Self::BinaryArith(e) => {
				e.left.has_template() || e.right.as_ref().is_some_and(|r| r.has_template())
			}
			Self::Compare(_) | Self::Column(_) | Self::Exists(_) | Self::AlwaysTrue | Self::Null(_) => {
				false
			}
		}
	}
}
