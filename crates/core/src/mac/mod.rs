/// A macro that allows lazily parsing a value from the environment variable,
/// with a fallback default value if the variable is not set or parsing fails.
///
/// # Parameters
///
/// - `$key`: An expression representing the name of the environment variable.
/// - `$t`: The type of the value to be parsed.
/// - `$default`: The default value to fall back to if the environment variable is not set or
///   parsing fails.
///
/// # Return Value
///
/// A lazy static variable of type `std::sync::LazyLock`, which holds the parsed
/// value from the environment variable or the default value.
#[macro_export]
macro_rules! lazy_env_parse {
	($key:expr_2021, $t:ty, $default:expr_2021) => {
		std::sync::LazyLock::new(|| {
			std::env::var($key).ok().and_then(|s| s.parse::<$t>().ok()).unwrap_or($default)
		})
	};
}

/// Throws an unreachable error with location details
macro_rules! fail {
	($($arg:tt)+) => {
		return Err($crate::err::Error::unreachable(format_args!($($arg)*)))
	};
}

/// Returns a semantic error built from a format string
macro_rules! semantic {
	($($arg:tt)+) => {
		return Err($crate::err::Error::Semantic(format!($($arg)+)))
	};
}

#[cfg(test)]
mod test {
	use std::sync::LazyLock;

	#[test]
	fn lazy_env_parse_falls_back_to_default() {
		static VALUE: LazyLock<usize> = lazy_env_parse!("FILTERPLAN_TEST_UNSET_VARIABLE", usize, 42);
		assert_eq!(*VALUE, 42);
	}

	#[test]
	fn fail_returns_unreachable() {
		fn check(ok: bool) -> Result<(), crate::err::Error> {
			if !ok {
				fail!("check failed for {}", "input");
			}
			Ok(())
		}
		let err = check(false).unwrap_err();
		assert!(matches!(err, crate::err::Error::Unreachable(_)));
		assert!(err.to_string().contains("check failed for input"));
		check(true).unwrap();
	}

	#[test]
	fn semantic_returns_semantic() {
		fn check(name: &str) -> Result<(), crate::err::Error> {
			semantic!("field {name} can not be used here");
		}
		let err = check("vec").unwrap_err();
		assert_eq!(err, crate::err::Error::Semantic("field vec can not be used here".to_owned()));
	}
}
