use super::ExprVisitor;
use crate::catalog::DataType;
use crate::err::Error;
use crate::expr::ExprWithType;
use crate::expr::cast::{cast_value, element_type_of};
use crate::plan::{
	ArithOpType, BinaryArithExpr, Expr, GenericValue, JsonContainsExpr, JsonContainsOp, Slot,
};
use crate::syn::ast::{Ast, AstVisitor};

impl ExprVisitor<'_> {
	pub(super) fn visit_call(&mut self, name: &str, args: &[Ast]) -> Result<ExprWithType, Error> {
		match name {
			"json_contains" | "array_contains" => self.visit_contains(name, args, JsonContainsOp::Contains),
			"json_contains_all" | "array_contains_all" => {
				self.visit_contains(name, args, JsonContainsOp::ContainsAll)
			}
			"json_contains_any" | "array_contains_any" => {
				self.visit_contains(name, args, JsonContainsOp::ContainsAny)
			}
			"array_length" => self.visit_array_length(args),
			_ => semantic!("function {name} is not supported"),
		}
	}

	fn visit_contains(
		&mut self,
		name: &str,
		args: &[Ast],
		op: JsonContainsOp,
	) -> Result<ExprWithType, Error> {
		let [column, value] = args else {
			semantic!("function {name} takes 2 arguments, {} given", args.len());
		};
		let column = self.visit_column(column, name)?;
		let data_type = column.value_type();
		if !(data_type.is_json() || data_type.is_array()) {
			semantic!(
				"{name} can only be used on json or array fields, {} is of type {data_type}",
				self.describe(&column)
			);
		}
		let element_type = element_type_of(&column);
		let cast = |v: &GenericValue| cast_value(element_type, v.clone()).map_err(Error::Semantic);

		let value = self.visit(value)?;
		let (elements, elements_same_type) = match (op, value.literal()) {
			(_, Some(Slot::Template(t))) => (Slot::Template(t.clone()), false),
			(JsonContainsOp::Contains, Some(Slot::Value(v))) => (Slot::Value(vec![cast(v)?]), true),
			(_, Some(Slot::Value(GenericValue::Array(array)))) => (
				Slot::Value(array.values.iter().map(cast).collect::<Result<_, _>>()?),
				array.same_type,
			),
			(JsonContainsOp::Contains, None) => {
				semantic!("the second argument of {name} must be a constant")
			}
			_ => semantic!("the second argument of {name} must be an array"),
		};
		Ok(ExprWithType::predicate(Expr::JsonContains(JsonContainsExpr {
			column,
			elements,
			op,
			elements_same_type,
		})))
	}

	fn visit_array_length(&mut self, args: &[Ast]) -> Result<ExprWithType, Error> {
		let [column] = args else {
			semantic!("function array_length takes 1 argument, {} given", args.len());
		};
		let column = self.visit_column(column, "array_length")?;
		let data_type = column.value_type();
		if !(data_type.is_array() || data_type.is_json()) {
			semantic!(
				"array_length can only be used on array or json fields, {} is of type {data_type}",
				self.describe(&column)
			);
		}
		Ok(ExprWithType {
			data_type: DataType::Int64,
			expr: Expr::BinaryArith(BinaryArithExpr {
				left: Box::new(Expr::column(column)),
				right: None,
				op: ArithOpType::ArrayLength,
			}),
			node_dependent: false,
		})
	}
}
