use std::cmp::Ordering;

use super::ExprVisitor;
use crate::catalog::DataType;
use crate::err::Error;
use crate::expr::ExprWithType;
use crate::expr::cast::cast_value;
use crate::plan::{
	ArithOpType, BinaryArithExpr, BinaryArithOpEvalRangeExpr, ColumnInfo, CompareExpr, Expr,
	GenericValue, OpType, Slot, UnaryRangeExpr,
};
use crate::syn::ast::{Ast, AstVisitor, BinaryOperator};

fn comparison_op(op: BinaryOperator) -> Result<OpType, Error> {
	Ok(match op {
		BinaryOperator::Equal => OpType::Equal,
		BinaryOperator::NotEqual => OpType::NotEqual,
		BinaryOperator::LessThan => OpType::LessThan,
		BinaryOperator::LessThanEqual => OpType::LessEqual,
		BinaryOperator::MoreThan => OpType::GreaterThan,
		BinaryOperator::MoreThanEqual => OpType::GreaterEqual,
		op => fail!("{op} is not a comparison operator"),
	})
}

/// Evaluate a comparison between two constants.
fn fold_comparison(left: &GenericValue, op: OpType, right: &GenericValue) -> Result<bool, Error> {
	let ordering = match (left, right) {
		(GenericValue::Int64(a), GenericValue::Int64(b)) => Some(a.cmp(b)),
		(GenericValue::Int64(_) | GenericValue::Float(_), GenericValue::Int64(_) | GenericValue::Float(_)) => {
			match (left.as_number(), right.as_number()) {
				(Some(a), Some(b)) => a.partial_cmp(&b),
				_ => None,
			}
		}
		(GenericValue::String(a), GenericValue::String(b)) => Some(a.cmp(b)),
		(GenericValue::Bool(a), GenericValue::Bool(b)) if op.is_equality() => Some(a.cmp(b)),
		(GenericValue::Array(a), GenericValue::Array(b)) if op.is_equality() => {
			return Ok((a.values == b.values) == (op == OpType::Equal));
		}
		_ => semantic!(
			"comparison {op} between {} and {} is not supported",
			left.data_type(),
			right.data_type()
		),
	};
	let Some(ordering) = ordering else {
		// Only NaN compares unordered, and NaN equals nothing.
		return Ok(op == OpType::NotEqual);
	};
	Ok(match op {
		OpType::Equal => ordering == Ordering::Equal,
		OpType::NotEqual => ordering != Ordering::Equal,
		OpType::LessThan => ordering == Ordering::Less,
		OpType::LessEqual => ordering != Ordering::Greater,
		OpType::GreaterThan => ordering == Ordering::Greater,
		OpType::GreaterEqual => ordering != Ordering::Less,
		op => fail!("{op} can not be evaluated between constants"),
	})
}

impl ExprVisitor<'_> {
	pub(super) fn visit_comparison(
		&mut self,
		left: &Ast,
		op: BinaryOperator,
		right: &Ast,
	) -> Result<ExprWithType, Error> {
		let op = comparison_op(op)?;
		let left = self.visit(left)?;
		let right = self.visit(right)?;

		if let (Some(a), Some(b)) = (left.expr.as_value(), right.expr.as_value()) {
			return fold_comparison(a, op, b).map(|r| ExprWithType::constant(GenericValue::Bool(r)));
		}

		match (&left.expr, &right.expr) {
			(Expr::Column(c), Expr::Value(v)) => self.column_vs_literal(&c.info, op, &v.value),
			(Expr::Value(v), Expr::Column(c)) => self.column_vs_literal(&c.info, op.reverse(), &v.value),
			(Expr::Column(a), Expr::Column(b)) => self.column_vs_column(&a.info, op, &b.info),
			(Expr::BinaryArith(a), Expr::Value(v)) => self.arith_vs_literal(a, op, &v.value),
			(Expr::Value(v), Expr::BinaryArith(a)) => self.arith_vs_literal(a, op.reverse(), &v.value),
			_ => semantic!(
				"comparison {op} between {} and {} is not supported",
				left.data_type,
				right.data_type
			),
		}
	}

	fn column_vs_literal(
		&self,
		column: &ColumnInfo,
		op: OpType,
		value: &Slot<GenericValue>,
	) -> Result<ExprWithType, Error> {
		let data_type = column.value_type();
		if (data_type.is_bool() || data_type.is_array()) && !op.is_equality() {
			semantic!(
				"comparison {op} is not supported on field {} of type {data_type}",
				self.describe(column)
			);
		}
		let value = match value {
			Slot::Template(name) => Slot::Template(name.clone()),
			Slot::Value(v) => {
				if matches!(v, GenericValue::Bool(_) | GenericValue::Array(_)) && !op.is_equality() {
					semantic!("comparison {op} is not supported for value {v}");
				}
				Slot::Value(cast_value(data_type, v.clone()).map_err(Error::Semantic)?)
			}
		};
		Ok(ExprWithType::predicate(Expr::UnaryRange(UnaryRangeExpr {
			column: column.clone(),
			op,
			value,
		})))
	}

	fn column_vs_column(
		&self,
		left: &ColumnInfo,
		op: OpType,
		right: &ColumnInfo,
	) -> Result<ExprWithType, Error> {
		let (l, r) = (left.value_type(), right.value_type());
		let comparable = (l.is_arithmetic() && r.is_arithmetic())
			|| (l.is_string() && r.is_string())
			|| (l.is_bool() && r.is_bool() && op.is_equality());
		if !comparable {
			semantic!(
				"comparison {op} between field {} of type {l} and field {} of type {r} is not supported",
				self.describe(left),
				self.describe(right)
			);
		}
		Ok(ExprWithType::predicate(Expr::Compare(CompareExpr {
			left: left.clone(),
			right: right.clone(),
			op,
		})))
	}

	/// `(column arith operand) op value`
	fn arith_vs_literal(
		&self,
		arith: &BinaryArithExpr,
		op: OpType,
		value: &Slot<GenericValue>,
	) -> Result<ExprWithType, Error> {
		let Expr::Column(column) = arith.left.as_ref() else {
			fail!("arithmetic expression without a field operand");
		};
		let right_operand = match arith.right.as_deref() {
			None => None,
			Some(Expr::Value(v)) => Some(v.value.clone()),
			Some(_) => fail!("arithmetic expression with a non constant operand"),
		};
		let data_type = match arith.op {
			ArithOpType::ArrayLength => DataType::Int64,
			_ => column.info.value_type(),
		};
		let value = match value {
			Slot::Template(name) => Slot::Template(name.clone()),
			Slot::Value(v) => {
				if v.as_number().is_none() {
					semantic!("the result of {} can not be compared with {v}", arith.op);
				}
				if arith.op == ArithOpType::ArrayLength && v.as_int().is_none() {
					semantic!("array_length can only be compared with integers, not {v}");
				}
				Slot::Value(cast_value(data_type, v.clone()).map_err(Error::Semantic)?)
			}
		};
		Ok(ExprWithType::predicate(Expr::BinaryArithOpEvalRange(BinaryArithOpEvalRangeExpr {
			column: column.info.clone(),
			arith_op: arith.op,
			right_operand,
			op,
			value,
		})))
	}
}
