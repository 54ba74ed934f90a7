use std::fmt::{self, Display};

use thiserror::Error;

use crate::catalog::DataType;
use crate::syn::error::RenderedError;

/// The broad class of an [`Error`].
///
/// Every error returned by this crate is terminal for the request which
/// produced it, the kind only tells the caller where the fault lies.
#[derive(Clone, Copy, Debug, Eq, PartialEq, Hash)]
pub enum ErrorKind {
	/// The expression text is malformed.
	Syntax,
	/// The expression is well formed but meaningless against the schema.
	Semantic,
	/// The schema does not allow the requested plan.
	Schema,
	/// A contract between components was violated.
	Internal,
}

impl Display for ErrorKind {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		match self {
			Self::Syntax => f.write_str("syntax error"),
			Self::Semantic => f.write_str("semantic error"),
			Self::Schema => f.write_str("schema error"),
			Self::Internal => f.write_str("internal error"),
		}
	}
}

/// An error originating from the expression compiler or the planner.
#[derive(Error, Debug, Clone, PartialEq)]
#[non_exhaustive]
pub enum Error {
	/// The planner encountered unreachable logic
	#[error("The planner encountered unreachable logic: {0}")]
	Unreachable(String),

	/// The expression could not be tokenized or parsed
	#[error("Parse error: {0}")]
	InvalidSyntax(RenderedError),

	/// The expression was not consumed fully by the parser
	#[error("invalid expression: {expr}")]
	QueryRemaining {
		expr: String,
	},

	/// The expression is not valid for the schema it was compiled against
	#[error("{0}")]
	Semantic(String),

	/// The compiled predicate does not evaluate to a boolean
	#[error("predicate is not a boolean expression: {expr}, data type: {data_type}")]
	NotBoolean {
		expr: String,
		data_type: DataType,
	},

	/// A template placeholder has no supplied value
	#[error("the value of expression template variable name {name} is not found")]
	TemplateNotFound {
		name: String,
	},

	/// A supplied template value does not fit the place it is used in
	#[error("the value of expression template variable {name} cannot be used here: {reason}")]
	TemplateTypeMismatch {
		name: String,
		reason: String,
	},

	/// A supplied template value is malformed
	#[error("invalid value for expression template variable {name}: {reason}")]
	InvalidTemplateValue {
		name: String,
		reason: String,
	},

	/// An expression failed to compile
	#[error("cannot parse expression: {expr}, error: {source}")]
	InvalidExpression {
		expr: String,
		source: Box<Error>,
	},

	/// An identifier compiled into something other than a column reference
	#[error("cannot parse identifier: {identifier}")]
	InvalidIdentifier {
		identifier: String,
	},

	/// An identifier failed to compile
	#[error("cannot parse identifier: {identifier}, error: {source}")]
	IdentifierParse {
		identifier: String,
		source: Box<Error>,
	},

	/// The named field does not exist in the schema
	#[error("field {name} not exist")]
	FieldNotFound {
		name: String,
	},

	/// The named field exists but its data is not resident
	#[error("ann field \"{name}\" not loaded")]
	FieldNotLoaded {
		name: String,
	},

	/// The named field can not be used for a vector search
	#[error("field ({name}) to search is not of vector data type")]
	NotVectorField {
		name: String,
	},

	/// Two fields of a schema share a name
	#[error("duplicated field name: {name}")]
	DuplicateFieldName {
		name: String,
	},

	/// Two fields of a schema share an id
	#[error("duplicated field id: {id}")]
	DuplicateFieldId {
		id: i64,
	},

	/// More than one field of a schema is marked as primary key
	#[error("primary key is not unique: {first} and {second}")]
	MultiplePrimaryKeys {
		first: String,
		second: String,
	},

	/// No field of a schema is marked as primary key
	#[error("primary key field not found in collection {collection}")]
	PrimaryKeyNotFound {
		collection: String,
	},
}

impl Error {
	/// Construct an unreachable error from the given message
	pub(crate) fn unreachable<T: Display>(message: T) -> Self {
		Self::Unreachable(message.to_string())
	}

	/// Classify this error, looking through wrapping variants.
	pub fn kind(&self) -> ErrorKind {
		match self {
			Self::Unreachable(_) => ErrorKind::Internal,
			Self::InvalidSyntax(_)
			| Self::QueryRemaining {
				..
			} => ErrorKind::Syntax,
			Self::Semantic(_)
			| Self::NotBoolean {
				..
			}
			| Self::TemplateNotFound {
				..
			}
			| Self::TemplateTypeMismatch {
				..
			}
			| Self::InvalidTemplateValue {
				..
			}
			| Self::InvalidIdentifier {
				..
			} => ErrorKind::Semantic,
			Self::InvalidExpression {
				source,
				..
			}
			| Self::IdentifierParse {
				source,
				..
			} => source.kind(),
			Self::FieldNotFound {
				..
			}
			| Self::FieldNotLoaded {
				..
			}
			| Self::NotVectorField {
				..
			}
			| Self::DuplicateFieldName {
				..
			}
			| Self::DuplicateFieldId {
				..
			}
			| Self::MultiplePrimaryKeys {
				..
			}
			| Self::PrimaryKeyNotFound {
				..
			} => ErrorKind::Schema,
		}
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn wrapped_errors_report_the_inner_kind() {
		let err = Error::InvalidExpression {
			expr: "a >".to_owned(),
			source: Box::new(Error::QueryRemaining {
				expr: "a >".to_owned(),
			}),
		};
		assert_eq!(err.kind(), ErrorKind::Syntax);
		assert_eq!(err.to_string(), "cannot parse expression: a >, error: invalid expression: a >");

		let err = Error::IdentifierParse {
			identifier: "age".to_owned(),
			source: Box::new(Error::Semantic("field age not exist".to_owned())),
		};
		assert_eq!(err.kind(), ErrorKind::Semantic);
	}

	#[test]
	fn schema_errors_are_distinct() {
		let missing = Error::FieldNotFound {
			name: "vec".to_owned(),
		};
		let unloaded = Error::FieldNotLoaded {
			name: "vec".to_owned(),
		};
		assert_eq!(missing.kind(), ErrorKind::Schema);
		assert_eq!(unloaded.kind(), ErrorKind::Schema);
		assert_ne!(missing, unloaded);
		assert_eq!(unloaded.to_string(), "ann field \"vec\" not loaded");
	}
}
