use crate::catalog::DataType;
use crate::plan::{ColumnInfo, GenericValue};

/// Check that `value` can be compared with, or stored into, values of `data_type`.
///
/// Integers used with floating point columns are converted, everything else
/// is returned as it is. JSON accepts any value.
pub(crate) fn cast_value(data_type: DataType, value: GenericValue) -> Result<GenericValue, String> {
	let compatible = data_type.is_json()
		|| match &value {
			GenericValue::Bool(_) => data_type.is_bool(),
			GenericValue::Int64(_) | GenericValue::Float(_) => data_type.is_arithmetic(),
			GenericValue::String(_) => data_type.is_string(),
			GenericValue::Array(_) => data_type.is_array(),
		};
	if !compatible {
		return Err(format!("cannot cast value {value} to {data_type}"));
	}
	match value {
		GenericValue::Int64(x) if data_type.is_floating() => Ok(GenericValue::Float(x as f64)),
		value => Ok(value),
	}
}

/// The type of the elements a column holds, as used by membership and containment tests.
pub(crate) fn element_type_of(column: &ColumnInfo) -> DataType {
	if column.data_type.is_array() {
		column.element_type
	} else {
		column.data_type
	}
}
