use super::ExprVisitor;
use crate::err::Error;
use crate::expr::ExprWithType;
use crate::expr::cast::cast_value;
use crate::plan::{ArithOpType, BinaryArithExpr, ColumnInfo, Expr, GenericValue, Slot, ValueExpr};
use crate::syn::ast::{Ast, AstVisitor, BinaryOperator};

/// Evaluate an arithmetic operation between two constants.
fn fold_arith(left: &GenericValue, op: BinaryOperator, right: &GenericValue) -> Result<GenericValue, Error> {
	if let (GenericValue::Int64(a), GenericValue::Int64(b)) = (left, right) {
		let (a, b) = (*a, *b);
		let result = match op {
			BinaryOperator::Add => a.checked_add(b),
			BinaryOperator::Subtract => a.checked_sub(b),
			BinaryOperator::Multiply => a.checked_mul(b),
			BinaryOperator::Divide if b == 0 => semantic!("division by zero"),
			BinaryOperator::Divide => a.checked_div(b),
			BinaryOperator::Modulo if b == 0 => semantic!("modulo by zero"),
			BinaryOperator::Modulo => a.checked_rem(b),
			BinaryOperator::Power => return fold_float(a as f64, op, b as f64),
			op => fail!("{op} is not an arithmetic operator"),
		};
		return match result {
			Some(v) => Ok(GenericValue::Int64(v)),
			None => semantic!("integer overflow evaluating {a} {op} {b}"),
		};
	}
	let (Some(a), Some(b)) = (left.as_number(), right.as_number()) else {
		semantic!(
			"arithmetic {op} between {} and {} is not supported",
			left.data_type(),
			right.data_type()
		);
	};
	fold_float(a, op, b)
}

fn fold_float(a: f64, op: BinaryOperator, b: f64) -> Result<GenericValue, Error> {
	let result = match op {
		BinaryOperator::Add => a + b,
		BinaryOperator::Subtract => a - b,
		BinaryOperator::Multiply => a * b,
		BinaryOperator::Divide if b == 0.0 => semantic!("division by zero"),
		BinaryOperator::Divide => a / b,
		BinaryOperator::Modulo if b == 0.0 => semantic!("modulo by zero"),
		BinaryOperator::Modulo => a % b,
		BinaryOperator::Power => a.powf(b),
		op => fail!("{op} is not an arithmetic operator"),
	};
	if !result.is_finite() {
		semantic!("{a} {op} {b} does not evaluate to a finite number");
	}
	Ok(GenericValue::Float(result))
}

impl ExprVisitor<'_> {
	pub(super) fn visit_arith(
		&mut self,
		left: &Ast,
		op: BinaryOperator,
		right: &Ast,
	) -> Result<ExprWithType, Error> {
		let left = self.visit(left)?;
		let right = self.visit(right)?;

		if let (Some(a), Some(b)) = (left.expr.as_value(), right.expr.as_value()) {
			return fold_arith(a, op, b).map(ExprWithType::constant);
		}

		let arith_op = match op {
			BinaryOperator::Add => ArithOpType::Add,
			BinaryOperator::Subtract => ArithOpType::Sub,
			BinaryOperator::Multiply => ArithOpType::Mul,
			BinaryOperator::Divide => ArithOpType::Div,
			BinaryOperator::Modulo => ArithOpType::Mod,
			BinaryOperator::Power => semantic!("power operation is only supported between constants"),
			op => fail!("{op} is not an arithmetic operator"),
		};

		match (&left.expr, &right.expr) {
			(Expr::Column(c), Expr::Value(v)) => self.column_arith(&c.info, arith_op, &v.value),
			// Only commutative operations may keep the field on the right.
			(Expr::Value(v), Expr::Column(c)) => match arith_op {
				ArithOpType::Add | ArithOpType::Mul => self.column_arith(&c.info, arith_op, &v.value),
				_ => semantic!(
					"constant {arith_op} field is not supported, move the field {} to the left hand side",
					self.describe(&c.info)
				),
			},
			_ => semantic!(
				"arithmetic {arith_op} between {} and {} is not supported",
				left.data_type,
				right.data_type
			),
		}
	}

	/// `column op operand`
	fn column_arith(
		&self,
		column: &ColumnInfo,
		op: ArithOpType,
		operand: &Slot<GenericValue>,
	) -> Result<ExprWithType, Error> {
		let data_type = column.value_type();
		if !(data_type.is_arithmetic() || data_type.is_json()) {
			semantic!(
				"arithmetic is not supported on field {} of type {data_type}",
				self.describe(column)
			);
		}
		if op == ArithOpType::Mod && data_type.is_floating() {
			semantic!("modulo is not supported on floating point field {}", self.describe(column));
		}
		let operand = match operand {
			Slot::Template(name) => Slot::Template(name.clone()),
			Slot::Value(v) => {
				let Some(number) = v.as_number() else {
					semantic!("arithmetic operand {v} is not a number");
				};
				if matches!(op, ArithOpType::Div | ArithOpType::Mod) && number == 0.0 {
					semantic!("division by zero");
				}
				Slot::Value(cast_value(data_type, v.clone()).map_err(Error::Semantic)?)
			}
		};
		Ok(ExprWithType {
			data_type,
			expr: Expr::BinaryArith(BinaryArithExpr {
				left: Box::new(Expr::column(column.clone())),
				right: Some(Box::new(Expr::Value(ValueExpr {
					value: operand,
				}))),
				op,
			}),
			node_dependent: false,
		})
	}
}
