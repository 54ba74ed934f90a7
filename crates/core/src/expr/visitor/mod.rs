//! Lowering of syntax trees into typed plan expressions.
//!
//! The visitor resolves names against a [`SchemaHelper`], checks that every
//! operation makes sense for the types involved, folds operations between
//! constants, and builds the plan expression the execution engine runs.

use crate::catalog::{DataType, SchemaHelper};
use crate::cnf::DYNAMIC_FIELD_NAME;
use crate::err::Error;
use crate::expr::ExprWithType;
use crate::expr::cast::cast_value;
use crate::plan::{
	Array, BinaryRangeExpr, ColumnInfo, ExistsExpr, Expr, GenericValue, LogicalOp, NullExpr, NullOp, Slot,
	TermExpr,
};
use crate::syn::ast::{Ast, AstVisitor, BinaryOperator, PrefixOperator};

mod arith;
mod compare;
mod function;
mod pattern;

/// Checks a syntax tree against a collection schema.
pub struct ExprVisitor<'a> {
	schema: &'a SchemaHelper,
}

impl AstVisitor for ExprVisitor<'_> {
	type Output = Result<ExprWithType, Error>;

	fn visit(&mut self, ast: &Ast) -> Self::Output {
		match ast {
			Ast::Identifier(name) => self.visit_identifier(name),
			Ast::Index {
				base,
				index,
			} => self.visit_index(base, index),
			Ast::Bool(v) => Ok(ExprWithType::constant(GenericValue::Bool(*v))),
			Ast::Integer(v) => Ok(ExprWithType::constant(GenericValue::Int64(*v))),
			Ast::Float(v) => Ok(ExprWithType::constant(GenericValue::Float(*v))),
			Ast::Strand(v) => Ok(ExprWithType::constant(GenericValue::String(v.clone()))),
			Ast::Array(values) => self.visit_array(values),
			Ast::Template(name) => Ok(ExprWithType::template(name.clone())),
			Ast::Prefix {
				op,
				expr,
			} => self.visit_prefix(*op, expr),
			Ast::Binary {
				left,
				op,
				right,
			} => match op {
				BinaryOperator::Or | BinaryOperator::And => self.visit_logical(left, *op, right),
				BinaryOperator::In => self.visit_term(left, right, false),
				BinaryOperator::NotIn => self.visit_term(left, right, true),
				BinaryOperator::Like => self.visit_like(left, right),
				op if op.is_comparison() => self.visit_comparison(left, *op, right),
				op => self.visit_arith(left, *op, right),
			},
			Ast::Range {
				lower,
				lower_op,
				column,
				upper_op,
				upper,
			} => self.visit_range(lower, *lower_op, column, *upper_op, upper),
			Ast::Null {
				expr,
				negated,
			} => self.visit_null(expr, *negated),
			Ast::Exists(expr) => self.visit_exists(expr),
			Ast::Call {
				name,
				args,
				..
			} => self.visit_call(name, args),
		}
	}
}

impl<'a> ExprVisitor<'a> {
	pub fn new(schema: &'a SchemaHelper) -> Self {
		Self {
			schema,
		}
	}

	/// A readable name for a column, including its nested path.
	fn describe(&self, column: &ColumnInfo) -> String {
		let mut name = match self.schema.field_by_id(column.field_id) {
			Some(field) => field.name.clone(),
			None => format!("field {}", column.field_id),
		};
		for key in &column.nested_path {
			name.push_str(&format!("[{key:?}]"));
		}
		name
	}

	/// Visit an operand which has to be a column reference.
	fn visit_column(&mut self, ast: &Ast, context: &str) -> Result<ColumnInfo, Error> {
		let operand = self.visit(ast)?;
		match operand.expr {
			Expr::Column(c) => Ok(c.info),
			_ => semantic!("{context} requires a field, found an expression of type {}", operand.data_type),
		}
	}

	fn visit_identifier(&self, name: &str) -> Result<ExprWithType, Error> {
		if name == DYNAMIC_FIELD_NAME {
			let Some(field) = self.schema.dynamic_field() else {
				semantic!(
					"dynamic field is not enabled in collection {}",
					self.schema.collection_name()
				);
			};
			return Ok(ExprWithType::column(ColumnInfo::from_field(field)));
		}
		let field = match self.schema.field_by_name(name) {
			Ok(field) => field,
			// Unknown names are keys of the dynamic field, when there is one.
			Err(e) => match self.schema.dynamic_field() {
				Some(dynamic) => {
					let mut info = ColumnInfo::from_field(dynamic);
					info.nested_path.push(name.to_owned());
					return Ok(ExprWithType::column(info));
				}
				None => return Err(e),
			},
		};
		if field.data_type.is_vector() {
			semantic!("vector field {name} can not be used in a filter expression");
		}
		Ok(ExprWithType::column(ColumnInfo::from_field(field)))
	}

	fn visit_index(&mut self, base: &Ast, index: &Ast) -> Result<ExprWithType, Error> {
		let mut column = self.visit_column(base, "indexing")?;
		let index = self.visit(index)?;
		let Some(key) = index.expr.as_value() else {
			semantic!("the index of {} must be a constant", self.describe(&column));
		};
		if column.data_type.is_json() {
			match key {
				GenericValue::String(s) => column.nested_path.push(s.clone()),
				GenericValue::Int64(i) => column.nested_path.push(i.to_string()),
				_ => semantic!("json key of {} must be a string or an integer", self.describe(&column)),
			}
		} else if column.data_type.is_array() {
			if !column.nested_path.is_empty() {
				semantic!("only one index is allowed on array field {}", self.describe(&column));
			}
			match key {
				GenericValue::Int64(i) if *i >= 0 => column.nested_path.push(i.to_string()),
				_ => semantic!(
					"the index of array field {} must be a non-negative integer",
					self.describe(&column)
				),
			}
		} else {
			semantic!("field {} of type {} can not be indexed", self.describe(&column), column.data_type);
		}
		Ok(ExprWithType::column(column))
	}

	fn visit_array(&mut self, values: &[Ast]) -> Result<ExprWithType, Error> {
		let mut out = Vec::with_capacity(values.len());
		for value in values {
			let value = self.visit(value)?;
			match value.expr.as_value() {
				Some(v) => out.push(v.clone()),
				None => semantic!("array elements must be constants"),
			}
		}
		Ok(ExprWithType::constant(GenericValue::Array(Array::new(out))))
	}

	fn visit_prefix(&mut self, op: PrefixOperator, expr: &Ast) -> Result<ExprWithType, Error> {
		let operand = self.visit(expr)?;
		match op {
			PrefixOperator::Not => match operand.expr.as_value() {
				Some(GenericValue::Bool(b)) => Ok(ExprWithType::constant(GenericValue::Bool(!b))),
				_ => Ok(ExprWithType::predicate(Expr::not(operand.into_predicate()?))),
			},
			PrefixOperator::Negate => match operand.expr.as_value() {
				Some(GenericValue::Int64(i)) => match i.checked_neg() {
					Some(i) => Ok(ExprWithType::constant(GenericValue::Int64(i))),
					None => semantic!("integer overflow negating {i}"),
				},
				Some(GenericValue::Float(f)) => Ok(ExprWithType::constant(GenericValue::Float(-f))),
				_ => semantic!("operator - can only be applied to numeric constants"),
			},
			PrefixOperator::Positive => match operand.expr.as_value() {
				Some(GenericValue::Int64(_) | GenericValue::Float(_)) => Ok(operand),
				_ => semantic!("operator + can only be applied to numeric constants"),
			},
		}
	}

	fn visit_logical(
		&mut self,
		left: &Ast,
		op: BinaryOperator,
		right: &Ast,
	) -> Result<ExprWithType, Error> {
		let left = self.visit(left)?;
		let right = self.visit(right)?;
		let op = match op {
			BinaryOperator::And => LogicalOp::And,
			BinaryOperator::Or => LogicalOp::Or,
			op => fail!("{op} is not a logical operator"),
		};
		if let (Some(GenericValue::Bool(a)), Some(GenericValue::Bool(b))) =
			(left.expr.as_value(), right.expr.as_value())
		{
			let folded = match op {
				LogicalOp::And => *a && *b,
				LogicalOp::Or => *a || *b,
			};
			return Ok(ExprWithType::constant(GenericValue::Bool(folded)));
		}
		Ok(ExprWithType::predicate(Expr::logical(
			op,
			left.into_predicate()?,
			right.into_predicate()?,
		)))
	}

	fn visit_term(&mut self, left: &Ast, right: &Ast, negated: bool) -> Result<ExprWithType, Error> {
		let column = self.visit_column(left, "term expression")?;
		let data_type = column.value_type();
		if data_type.is_array() {
			semantic!("term expression on array field {} is not supported", self.describe(&column));
		}
		let right = self.visit(right)?;
		let values = match right.literal() {
			Some(Slot::Template(name)) => Slot::Template(name.clone()),
			Some(Slot::Value(GenericValue::Array(array))) => Slot::Value(
				array
					.values
					.iter()
					.map(|v| cast_value(data_type, v.clone()).map_err(Error::Semantic))
					.collect::<Result<_, _>>()?,
			),
			_ => semantic!("the right operand of in must be an array"),
		};
		let term = Expr::Term(TermExpr {
			column,
			values,
		});
		Ok(ExprWithType::predicate(if negated {
			Expr::not(term)
		} else {
			term
		}))
	}

	fn visit_range(
		&mut self,
		lower: &Ast,
		lower_op: BinaryOperator,
		column: &Ast,
		upper_op: BinaryOperator,
		upper: &Ast,
	) -> Result<ExprWithType, Error> {
		let column = self.visit_column(column, "range comparison")?;
		let data_type = column.value_type();
		if !(data_type.is_arithmetic() || data_type.is_string() || data_type.is_json()) {
			semantic!(
				"range comparison is not supported on field {} of type {data_type}",
				self.describe(&column)
			);
		}
		let lower = self.range_bound(lower, data_type)?;
		let upper = self.range_bound(upper, data_type)?;
		let inclusive = |op: BinaryOperator| matches!(op, BinaryOperator::LessThanEqual | BinaryOperator::MoreThanEqual);
		// `a > col > b` runs downwards, so the bounds swap places.
		let expr = match lower_op {
			BinaryOperator::LessThan | BinaryOperator::LessThanEqual => BinaryRangeExpr {
				column,
				lower_inclusive: inclusive(lower_op),
				upper_inclusive: inclusive(upper_op),
				lower,
				upper,
			},
			_ => BinaryRangeExpr {
				column,
				lower_inclusive: inclusive(upper_op),
				upper_inclusive: inclusive(lower_op),
				lower: upper,
				upper: lower,
			},
		};
		Ok(ExprWithType::predicate(Expr::BinaryRange(expr)))
	}

	fn range_bound(&mut self, ast: &Ast, data_type: DataType) -> Result<Slot<GenericValue>, Error> {
		let bound = self.visit(ast)?;
		match bound.literal() {
			Some(Slot::Template(name)) => Ok(Slot::Template(name.clone())),
			Some(Slot::Value(v @ (GenericValue::Int64(_) | GenericValue::Float(_) | GenericValue::String(_)))) => {
				cast_value(data_type, v.clone()).map(Slot::Value).map_err(Error::Semantic)
			}
			_ => semantic!("the bounds of a range comparison must be numbers or strings"),
		}
	}

	fn visit_null(&mut self, expr: &Ast, negated: bool) -> Result<ExprWithType, Error> {
		let column = self.visit_column(expr, "null check")?;
		Ok(ExprWithType::predicate(Expr::Null(NullExpr {
			column,
			op: if negated {
				NullOp::IsNotNull
			} else {
				NullOp::IsNull
			},
		})))
	}

	fn visit_exists(&mut self, expr: &Ast) -> Result<ExprWithType, Error> {
		let info = self.visit_column(expr, "exists")?;
		if !info.data_type.is_json() {
			semantic!("exists operation is only supported on json fields, not {}", self.describe(&info));
		}
		Ok(ExprWithType::predicate(Expr::Exists(ExistsExpr {
			info,
		})))
	}
}
