use std::fmt::{self, Display};

use serde::{Deserialize, Serialize};

/// The storage type of a collection field, or of an expression value.
#[derive(Clone, Copy, Debug, Default, Eq, PartialEq, Hash, Serialize, Deserialize)]
pub enum DataType {
	#[default]
	None,
	Bool,
	Int8,
	Int16,
	Int32,
	Int64,
	Float,
	Double,
	String,
	VarChar,
	Array,
	#[serde(rename = "JSON")]
	Json,
	BinaryVector,
	FloatVector,
	Float16Vector,
	BFloat16Vector,
	SparseFloatVector,
}

impl DataType {
	pub fn is_bool(self) -> bool {
		matches!(self, Self::Bool)
	}

	pub fn is_integer(self) -> bool {
		matches!(self, Self::Int8 | Self::Int16 | Self::Int32 | Self::Int64)
	}

	pub fn is_floating(self) -> bool {
		matches!(self, Self::Float | Self::Double)
	}

	/// Integer and floating point types.
	pub fn is_arithmetic(self) -> bool {
		self.is_integer() || self.is_floating()
	}

	pub fn is_string(self) -> bool {
		matches!(self, Self::String | Self::VarChar)
	}

	pub fn is_json(self) -> bool {
		matches!(self, Self::Json)
	}

	pub fn is_array(self) -> bool {
		matches!(self, Self::Array)
	}

	/// The data types a vector search can target.
	pub fn is_vector(self) -> bool {
		matches!(
			self,
			Self::BinaryVector
				| Self::FloatVector
				| Self::Float16Vector
				| Self::BFloat16Vector
				| Self::SparseFloatVector
		)
	}
}

impl Display for DataType {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.write_str(match self {
			Self::None => "None",
			Self::Bool => "Bool",
			Self::Int8 => "Int8",
			Self::Int16 => "Int16",
			Self::Int32 => "Int32",
			Self::Int64 => "Int64",
			Self::Float => "Float",
			Self::Double => "Double",
			Self::String => "String",
			Self::VarChar => "VarChar",
			Self::Array => "Array",
			Self::Json => "JSON",
			Self::BinaryVector => "BinaryVector",
			Self::FloatVector => "FloatVector",
			Self::Float16Vector => "Float16Vector",
			Self::BFloat16Vector => "BFloat16Vector",
			Self::SparseFloatVector => "SparseFloatVector",
		})
	}
}

/// The definition of a single collection field.
#[derive(Clone, Debug, Default, Eq, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FieldSchema {
	pub field_id: i64,
	pub name: String,
	pub data_type: DataType,
	/// The type of the elements when `data_type` is an array.
	pub element_type: DataType,
	pub is_primary_key: bool,
	pub auto_id: bool,
	pub is_partition_key: bool,
	/// Whether this is the hidden field holding dynamic (schemaless) values.
	pub is_dynamic: bool,
	pub nullable: bool,
}

impl FieldSchema {
	pub fn new(field_id: i64, name: impl Into<String>, data_type: DataType) -> Self {
		Self {
			field_id,
			name: name.into(),
			data_type,
			..Default::default()
		}
	}

	pub fn with_element_type(mut self, element_type: DataType) -> Self {
		self.element_type = element_type;
		self
	}

	pub fn with_primary_key(mut self, auto_id: bool) -> Self {
		self.is_primary_key = true;
		self.auto_id = auto_id;
		self
	}

	pub fn with_partition_key(mut self) -> Self {
		self.is_partition_key = true;
		self
	}

	pub fn with_dynamic(mut self) -> Self {
		self.is_dynamic = true;
		self
	}

	pub fn with_nullable(mut self) -> Self {
		self.nullable = true;
		self
	}
}

#[cfg(test)]
mod tests {
	use rstest::rstest;

	use super::DataType;

	#[rstest]
	#[case::bool(DataType::Bool, false)]
	#[case::int64(DataType::Int64, false)]
	#[case::varchar(DataType::VarChar, false)]
	#[case::json(DataType::Json, false)]
	#[case::array(DataType::Array, false)]
	#[case::binary(DataType::BinaryVector, true)]
	#[case::float(DataType::FloatVector, true)]
	#[case::float16(DataType::Float16Vector, true)]
	#[case::bfloat16(DataType::BFloat16Vector, true)]
	#[case::sparse(DataType::SparseFloatVector, true)]
	fn vector_types(#[case] data_type: DataType, #[case] expected: bool) {
		assert_eq!(data_type.is_vector(), expected);
	}

	#[test]
	fn json_serializes_with_upper_case_name() {
		assert_eq!(serde_json::to_string(&DataType::Json).unwrap(), "\"JSON\"");
		assert_eq!(DataType::Json.to_string(), "JSON");
	}
}
