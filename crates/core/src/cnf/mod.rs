use std::sync::LazyLock;

/// The placeholder tag identifying the vector values of a search request.
pub const VECTOR_PLACEHOLDER_TAG: &str = "$0";

/// The name under which the dynamic field is addressed in expressions.
pub const DYNAMIC_FIELD_NAME: &str = "$meta";

/// Specifies how many compiled expressions are kept in the expression cache.
pub static EXPRESSION_CACHE_SIZE: LazyLock<usize> =
	lazy_env_parse!("FILTERPLAN_EXPRESSION_CACHE_SIZE", usize, 256);

/// Specifies how long, in seconds, a compiled expression stays in the expression cache.
pub static EXPRESSION_CACHE_TTL: LazyLock<u64> =
	lazy_env_parse!("FILTERPLAN_EXPRESSION_CACHE_TTL", u64, 600);

/// Specifies how deep the syntax tree of an expression may grow before the parser rejects it.
pub static MAX_EXPRESSION_DEPTH: LazyLock<u32> =
	lazy_env_parse!("FILTERPLAN_MAX_EXPRESSION_DEPTH", u32, 256);
