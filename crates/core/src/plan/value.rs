use std::fmt::{self, Display};

use serde::Serialize;

use crate::catalog::DataType;

/// A literal value carried by a plan expression.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub enum GenericValue {
	Bool(bool),
	Int64(i64),
	Float(f64),
	String(String),
	Array(Array),
}

/// An array literal.
#[derive(Clone, Debug, Default, PartialEq, Serialize)]
pub struct Array {
	pub values: Vec<GenericValue>,
	/// Whether every element has the same data type.
	pub same_type: bool,
	/// The shared element type, `None` when the elements are mixed.
	pub element_type: DataType,
}

impl Array {
	/// Build an array, working out whether the elements share a type.
	pub fn new(values: Vec<GenericValue>) -> Self {
		let mut types = values.iter().map(GenericValue::data_type);
		let first = types.next().unwrap_or_default();
		let same_type = types.all(|t| t == first);
		Self {
			values,
			same_type,
			element_type: if same_type {
				first
			} else {
				DataType::None
			},
		}
	}
}

impl GenericValue {
	/// The data type of this value as seen by the type checker.
	pub fn data_type(&self) -> DataType {
		match self {
			Self::Bool(_) => DataType::Bool,
			Self::Int64(_) => DataType::Int64,
			Self::Float(_) => DataType::Double,
			Self::String(_) => DataType::VarChar,
			Self::Array(_) => DataType::Array,
		}
	}

	pub fn as_bool(&self) -> Option<bool> {
		match self {
			Self::Bool(v) => Some(*v),
			_ => None,
		}
	}

	pub fn as_int(&self) -> Option<i64> {
		match self {
			Self::Int64(v) => Some(*v),
			_ => None,
		}
	}

	/// The value as a float, integers included.
	pub fn as_number(&self) -> Option<f64> {
		match self {
			Self::Int64(v) => Some(*v as f64),
			Self::Float(v) => Some(*v),
			_ => None,
		}
	}

	pub fn as_str(&self) -> Option<&str> {
		match self {
			Self::String(v) => Some(v),
			_ => None,
		}
	}

	pub fn as_array(&self) -> Option<&Array> {
		match self {
			Self::Array(v) => Some(v),
			_ => None,
		}
	}
}

impl Display for GenericValue {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		match self {
			Self::Bool(v) => write!(f, "{v}"),
			Self::Int64(v) => write!(f, "{v}"),
			Self::Float(v) => write!(f, "{v:?}"),
			Self::String(v) => write!(f, "{v:?}"),
			Self::Array(v) => {
				f.write_str("[")?;
				for (i, value) in v.values.iter().enumerate() {
					if i > 0 {
						f.write_str(", ")?;
					}
					write!(f, "{value}")?;
				}
				f.write_str("]")
			}
		}
	}
}

/// A literal position in an expression.
///
/// Holds either a concrete value or the name of a template placeholder which
/// is resolved from caller-supplied values before the plan is handed out.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub enum Slot<T> {
	Value(T),
	Template(String),
}

impl<T> Slot<T> {
	pub fn value(&self) -> Option<&T> {
		match self {
			Self::Value(v) => Some(v),
			Self::Template(_) => None,
		}
	}

	pub fn template(&self) -> Option<&str> {
		match self {
			Self::Value(_) => None,
			Self::Template(name) => Some(name),
		}
	}

	pub fn is_template(&self) -> bool {
		matches!(self, Self::Template(_))
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn array_tracks_element_types() {
		let same = Array::new(vec![GenericValue::Int64(1), GenericValue::Int64(2)]);
		assert!(same.same_type);
		assert_eq!(same.element_type, DataType::Int64);

		let mixed = Array::new(vec![GenericValue::Int64(1), GenericValue::String("a".into())]);
		assert!(!mixed.same_type);
		assert_eq!(mixed.element_type, DataType::None);
	}

	#[test]
	fn display() {
		let v = GenericValue::Array(Array::new(vec![
			GenericValue::Int64(1),
			GenericValue::Float(2.5),
			GenericValue::String("x".into()),
		]));
		assert_eq!(v.to_string(), "[1, 2.5, \"x\"]");
	}
}
