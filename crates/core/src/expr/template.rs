//! Values for the `{name}` placeholders of an expression.
//!
//! Callers supply a [`TemplateValue`] per placeholder. These are first
//! converted into plan values with [`unmarshal_expression_values`], then
//! written into a compiled expression with [`fill_expression_value`].

use std::collections::HashMap;

use crate::catalog::DataType;
use crate::err::Error;
use crate::expr::cast::{cast_value, element_type_of};
use crate::plan::{ArithOpType, Array, Expr, GenericValue, JsonContainsOp, Slot};

/// A placeholder value as supplied by a caller.
#[derive(Clone, Debug, Default, PartialEq)]
pub enum TemplateValue {
	/// A value without a payload.
	#[default]
	Unset,
	Bool(bool),
	Int64(i64),
	Float(f64),
	String(String),
	Array(TemplateArray),
}

/// An array placeholder value.
#[derive(Clone, Debug, PartialEq)]
pub enum TemplateArray {
	Bool(Vec<bool>),
	Long(Vec<i64>),
	Double(Vec<f64>),
	String(Vec<String>),
	Array(Vec<TemplateArray>),
	/// Elements of mixed types, each encoded as JSON.
	Json(Vec<Vec<u8>>),
}

impl TemplateValue {
	/// Build a placeholder value from a JSON literal.
	///
	/// Arrays whose elements share a scalar type become typed arrays, arrays of
	/// arrays nest, anything else is kept as JSON encoded elements. Returns
	/// `None` for `null` and objects, which have no placeholder form.
	pub fn from_json(value: &serde_json::Value) -> Option<Self> {
		use serde_json::Value;
		match value {
			Value::Bool(b) => Some(Self::Bool(*b)),
			Value::Number(n) => match n.as_i64() {
				Some(i) => Some(Self::Int64(i)),
				None => n.as_f64().map(Self::Float),
			},
			Value::String(s) => Some(Self::String(s.clone())),
			Value::Array(values) => Some(Self::Array(TemplateArray::from_json(values))),
			Value::Null | Value::Object(_) => None,
		}
	}
}

impl TemplateArray {
	fn from_json(values: &[serde_json::Value]) -> Self {
		use serde_json::Value;
		if let Some(v) = values.iter().map(Value::as_bool).collect::<Option<Vec<_>>>() {
			return Self::Bool(v);
		}
		if let Some(v) = values.iter().map(Value::as_i64).collect::<Option<Vec<_>>>() {
			return Self::Long(v);
		}
		if let Some(v) = values.iter().map(Value::as_f64).collect::<Option<Vec<_>>>() {
			return Self::Double(v);
		}
		if let Some(v) = values
			.iter()
			.map(|v| v.as_str().map(str::to_owned))
			.collect::<Option<Vec<_>>>()
		{
			return Self::String(v);
		}
		if let Some(v) = values
			.iter()
			.map(|v| v.as_array().map(|inner| Self::from_json(inner)))
			.collect::<Option<Vec<_>>>()
		{
			return Self::Array(v);
		}
		Self::Json(values.iter().map(|v| v.to_string().into_bytes()).collect())
	}
}

/// Convert caller supplied placeholder values into plan values.
pub fn unmarshal_expression_values(
	values: &HashMap<String, TemplateValue>,
) -> Result<HashMap<String, GenericValue>, Error> {
	values
		.iter()
		.map(|(name, value)| {
			let value = convert_value(value).map_err(|reason| Error::InvalidTemplateValue {
				name: name.clone(),
				reason,
			})?;
			Ok((name.clone(), value))
		})
		.collect()
}

fn convert_value(value: &TemplateValue) -> Result<GenericValue, String> {
	match value {
		TemplateValue::Unset => Err("the value is not set".to_owned()),
		TemplateValue::Bool(v) => Ok(GenericValue::Bool(*v)),
		TemplateValue::Int64(v) => Ok(GenericValue::Int64(*v)),
		TemplateValue::Float(v) => Ok(GenericValue::Float(*v)),
		TemplateValue::String(v) => Ok(GenericValue::String(v.clone())),
		TemplateValue::Array(v) => convert_array(v).map(|a| GenericValue::Array(Array::new(a))),
	}
}

fn convert_array(array: &TemplateArray) -> Result<Vec<GenericValue>, String> {
	Ok(match array {
		TemplateArray::Bool(v) => v.iter().copied().map(GenericValue::Bool).collect(),
		TemplateArray::Long(v) => v.iter().copied().map(GenericValue::Int64).collect(),
		TemplateArray::Double(v) => v.iter().copied().map(GenericValue::Float).collect(),
		TemplateArray::String(v) => v.iter().cloned().map(GenericValue::String).collect(),
		TemplateArray::Array(v) => v
			.iter()
			.map(|inner| convert_array(inner).map(|a| GenericValue::Array(Array::new(a))))
			.collect::<Result<_, _>>()?,
		TemplateArray::Json(v) => v
			.iter()
			.map(|bytes| {
				let value = serde_json::from_slice::<serde_json::Value>(bytes)
					.map_err(|e| format!("invalid JSON element: {e}"))?;
				convert_json(&value)
			})
			.collect::<Result<_, _>>()?,
	})
}

fn convert_json(value: &serde_json::Value) -> Result<GenericValue, String> {
	use serde_json::Value;
	match value {
		Value::Bool(b) => Ok(GenericValue::Bool(*b)),
		Value::Number(n) => match (n.as_i64(), n.as_f64()) {
			(Some(i), _) => Ok(GenericValue::Int64(i)),
			(None, Some(f)) => Ok(GenericValue::Float(f)),
			(None, None) => Err(format!("number {n} is out of range")),
		},
		Value::String(s) => Ok(GenericValue::String(s.clone())),
		Value::Array(values) => values
			.iter()
			.map(convert_json)
			.collect::<Result<Vec<_>, _>>()
			.map(|v| GenericValue::Array(Array::new(v))),
		Value::Null => Err("null is not a valid element".to_owned()),
		Value::Object(_) => Err("objects are not valid elements".to_owned()),
	}
}

/// Replace every placeholder of `expr` with its value.
///
/// Values are cast to the type of the column they are compared with, list
/// positions require array values.
pub fn fill_expression_value(
	expr: &mut Expr,
	values: &HashMap<String, GenericValue>,
) -> Result<(), Error> {
	match expr {
		Expr::Term(e) => {
			if let Slot::Template(name) = &e.values {
				let list = resolve_list(values, name, element_type_of(&e.column))?;
				e.values = Slot::Value(list);
			}
		}
		Expr::UnaryRange(e) => fill_slot(&mut e.value, values, e.column.value_type())?,
		Expr::BinaryRange(e) => {
			let data_type = e.column.value_type();
			fill_slot(&mut e.lower, values, data_type)?;
			fill_slot(&mut e.upper, values, data_type)?;
		}
		Expr::BinaryArithOpEvalRange(e) => {
			let data_type = match e.arith_op {
				ArithOpType::ArrayLength => DataType::Int64,
				_ => e.column.value_type(),
			};
			if let Some(operand) = &mut e.right_operand {
				fill_number(operand, values, data_type)?;
			}
			fill_number(&mut e.value, values, data_type)?;
		}
		Expr::JsonContains(e) => {
			if let Slot::Template(name) = &e.elements {
				let element_type = element_type_of(&e.column);
				let elements = match e.op {
					JsonContainsOp::Contains => vec![resolve(values, name, element_type)?],
					JsonContainsOp::ContainsAll | JsonContainsOp::ContainsAny => {
						resolve_list(values, name, element_type)?
					}
				};
				e.elements_same_type = Array::new(elements.clone()).same_type;
				e.elements = Slot::Value(elements);
			}
		}
		Expr::Value(e) => {
			if let Slot::Template(name) = &e.value {
				let value = lookup(values, name)?.clone();
				e.value = Slot::Value(value);
			}
		}
		Expr::Unary(e) => fill_expression_value(&mut e.child, values)?,
		Expr::Binary(e) => {
			fill_expression_value(&mut e.left, values)?;
			fill_expression_value(&mut e.right, values)?;
		}
		Expr::BinaryArith(e) => {
			fill_expression_value(&mut e.left, values)?;
			if let Some(right) = &mut e.right {
				fill_expression_value(right, values)?;
			}
		}
		Expr::Compare(_) | Expr::Column(_) | Expr::Exists(_) | Expr::AlwaysTrue | Expr::Null(_) => {}
	}
	Ok(())
}

fn lookup<'a>(values: &'a HashMap<String, GenericValue>, name: &str) -> Result<&'a GenericValue, Error> {
	values.get(name).ok_or_else(|| Error::TemplateNotFound {
		name: name.to_owned(),
	})
}

fn resolve(
	values: &HashMap<String, GenericValue>,
	name: &str,
	data_type: DataType,
) -> Result<GenericValue, Error> {
	cast_value(data_type, lookup(values, name)?.clone()).map_err(|reason| {
		Error::TemplateTypeMismatch {
			name: name.to_owned(),
			reason,
		}
	})
}

fn resolve_list(
	values: &HashMap<String, GenericValue>,
	name: &str,
	element_type: DataType,
) -> Result<Vec<GenericValue>, Error> {
	let Some(array) = lookup(values, name)?.as_array() else {
		return Err(Error::TemplateTypeMismatch {
			name: name.to_owned(),
			reason: "an array value is required".to_owned(),
		});
	};
	array
		.values
		.iter()
		.map(|v| {
			cast_value(element_type, v.clone()).map_err(|reason| Error::TemplateTypeMismatch {
				name: name.to_owned(),
				reason,
			})
		})
		.collect()
}

fn fill_slot(
	slot: &mut Slot<GenericValue>,
	values: &HashMap<String, GenericValue>,
	data_type: DataType,
) -> Result<(), Error> {
	if let Slot::Template(name) = slot {
		let value = resolve(values, name, data_type)?;
		*slot = Slot::Value(value);
	}
	Ok(())
}

/// Like [`fill_slot`], but only numbers are accepted.
fn fill_number(
	slot: &mut Slot<GenericValue>,
	values: &HashMap<String, GenericValue>,
	data_type: DataType,
) -> Result<(), Error> {
	if let Slot::Template(name) = slot {
		if lookup(values, name)?.as_number().is_none() {
			return Err(Error::TemplateTypeMismatch {
				name: name.clone(),
				reason: "arithmetic requires a numeric value".to_owned(),
			});
		}
	}
	fill_slot(slot, values, data_type)
}
