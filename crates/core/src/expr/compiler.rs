use std::collections::HashMap;
use std::sync::{Arc, LazyLock};
use std::time::Duration;

use crate::catalog::SchemaHelper;
use crate::cnf::{EXPRESSION_CACHE_SIZE, EXPRESSION_CACHE_TTL};
use crate::err::Error;
use crate::expr::cache::{ExprCache, Outcome, ParseKey};
use crate::expr::template::{TemplateValue, fill_expression_value, unmarshal_expression_values};
use crate::expr::visitor::ExprVisitor;
use crate::expr::ExprWithType;
use crate::plan::Expr;
use crate::syn::ParserPool;
use crate::syn::convert_han_to_ascii;
use crate::syn::error::ErrorListener;
use crate::syn::token::TokenKind;

static GLOBAL: LazyLock<Compiler> = LazyLock::new(|| {
	Compiler::new(*EXPRESSION_CACHE_SIZE, Duration::from_secs(*EXPRESSION_CACHE_TTL))
});

/// Compiles filter expressions against collection schemas.
///
/// A compiler owns the cache of compiled expressions and the pool of idle
/// lexers and parsers. Both are internally synchronised, so one compiler is
/// shared by every thread of a process, see [`Compiler::global`].
pub struct Compiler {
	cache: ExprCache,
	pool: ParserPool,
}

impl Compiler {
	pub fn new(capacity: usize, ttl: Duration) -> Self {
		Self {
			cache: ExprCache::new(capacity, ttl),
			pool: ParserPool::new(),
		}
	}

	/// The process wide compiler, configured from the environment.
	pub fn global() -> &'static Compiler {
		&GLOBAL
	}

	pub fn cache(&self) -> &ExprCache {
		&self.cache
	}

	pub fn pool(&self) -> &ParserPool {
		&self.pool
	}

	/// Compile an expression, or return the cached outcome of an earlier compilation.
	///
	/// Failures are cached just like successes, so a broken expression keeps
	/// failing with the same error until its entry expires or is evicted.
	#[instrument(level = "debug", name = "compile", skip_all, fields(collection = schema.collection_name()))]
	pub fn handle_expr(&self, schema: &SchemaHelper, expr: &str) -> Outcome {
		let key = ParseKey::new(schema.collection_name(), expr);
		if let Some(outcome) = self.cache.get(&key) {
			debug!("expression cache hit");
			return outcome;
		}
		let outcome = Arc::new(self.compile(schema, expr));
		if let Err(e) = outcome.as_ref() {
			debug!("rejected expression `{expr}`: {e}");
		}
		self.cache.insert(key, outcome.clone());
		outcome
	}

	fn compile(&self, schema: &SchemaHelper, expr: &str) -> Result<ExprWithType, Error> {
		if expr.is_empty() {
			return Ok(ExprWithType::always_true());
		}
		let normalized = convert_han_to_ascii(expr);
		let mut errors = ErrorListener::new();

		let mut lexer = self.pool.lexer(&normalized, &mut errors);
		if let Some(e) = errors.take() {
			return Err(Error::InvalidSyntax(e.render_on(&normalized)));
		}
		let mut parser = self.pool.parser(&mut lexer, &mut errors);
		if let Some(e) = errors.take() {
			return Err(Error::InvalidSyntax(e.render_on(&normalized)));
		}
		let Some(ast) = parser.parse(&mut errors) else {
			return Err(match errors.take() {
				Some(e) => Error::InvalidSyntax(e.render_on(&normalized)),
				None => Error::unreachable("the parser failed without reporting an error"),
			});
		};
		if parser.peek_kind() != TokenKind::Eof {
			return Err(Error::QueryRemaining {
				expr: expr.to_owned(),
			});
		}
		self.pool.put_lexer(lexer);
		self.pool.put_parser(parser);

		ast.accept(&mut ExprVisitor::new(schema))
	}

	/// Compile an expression into a predicate, with its placeholders filled in.
	pub fn parse_expr(
		&self,
		schema: &SchemaHelper,
		expr: &str,
		values: &HashMap<String, TemplateValue>,
	) -> Result<Expr, Error> {
		let outcome = self.handle_expr(schema, expr);
		let compiled = match outcome.as_ref() {
			Ok(compiled) => compiled,
			Err(e) => {
				return Err(Error::InvalidExpression {
					expr: expr.to_owned(),
					source: Box::new(e.clone()),
				});
			}
		};
		if !compiled.data_type.is_bool() {
			return Err(Error::NotBoolean {
				expr: expr.to_owned(),
				data_type: compiled.data_type,
			});
		}
		// The cached expression is shared, placeholders are filled into a copy.
		let mut predicate = compiled.clone().into_predicate()?;
		let values = unmarshal_expression_values(values)?;
		fill_expression_value(&mut predicate, &values)?;
		Ok(predicate)
	}

	/// Compile an identifier and hand the column it names to `check`.
	pub fn parse_identifier<F>(&self, schema: &SchemaHelper, identifier: &str, check: F) -> Result<(), Error>
	where
		F: FnOnce(&Expr) -> Result<(), Error>,
	{
		let compiled = match self.handle_expr(schema, identifier).as_ref() {
			Ok(compiled) => compiled.expr.clone(),
			Err(e) => {
				return Err(Error::IdentifierParse {
					identifier: identifier.to_owned(),
					source: Box::new(e.clone()),
				});
			}
		};
		if compiled.as_column().is_none() {
			return Err(Error::InvalidIdentifier {
				identifier: identifier.to_owned(),
			});
		}
		check(&compiled)
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use crate::catalog::{CollectionSchema, DataType, FieldSchema};
	use crate::err::ErrorKind;
	use crate::expr::TemplateArray;
	use crate::plan::{GenericValue, OpType, Slot, TermExpr, UnaryRangeExpr};

	fn schema(name: &str) -> SchemaHelper {
		SchemaHelper::new(
			CollectionSchema::new(name)
				.with_field(FieldSchema::new(100, "id", DataType::Int64).with_primary_key(false))
				.with_field(FieldSchema::new(101, "age", DataType::Int64))
				.with_field(FieldSchema::new(102, "name", DataType::VarChar)),
		)
		.unwrap()
	}

	fn compiler() -> Compiler {
		Compiler::new(16, Duration::from_secs(60))
	}

	#[test]
	fn global_compiler_follows_the_settings() {
		let cache = Compiler::global().cache();
		assert_eq!(cache.capacity(), (*EXPRESSION_CACHE_SIZE).max(1));
		assert_eq!(cache.ttl(), Duration::from_secs(*EXPRESSION_CACHE_TTL));
	}

	#[test_log::test]
	fn empty_expression_is_always_true() {
		let compiler = compiler();
		let outcome = compiler.handle_expr(&schema("c"), "");
		assert_eq!(outcome.as_ref(), &Ok(ExprWithType::always_true()));
		assert_eq!(compiler.pool().idle_lexers(), 0);
		let expr = compiler.parse_expr(&schema("c"), "", &HashMap::new()).unwrap();
		assert_eq!(expr, Expr::AlwaysTrue);
	}

	#[test_log::test]
	fn outcomes_are_cached() {
		let compiler = compiler();
		let schema = schema("c");
		let first = compiler.handle_expr(&schema, "age > 1");
		assert_eq!(compiler.pool().idle_parsers(), 1);
		let second = compiler.handle_expr(&schema, "age > 1");
		assert!(Arc::ptr_eq(&first, &second));
		assert_eq!(compiler.cache().stats().hits, 1);
		// A different collection is a different key.
		compiler.handle_expr(&self::schema("d"), "age > 1");
		assert_eq!(compiler.cache().len(), 2);
	}

	#[test_log::test]
	fn failures_are_cached_and_not_pooled() {
		let compiler = compiler();
		let schema = schema("c");
		let first = compiler.handle_expr(&schema, "age >");
		assert_eq!(first.as_ref().as_ref().unwrap_err().kind(), ErrorKind::Syntax);
		assert_eq!(compiler.pool().idle_lexers(), 0);
		assert_eq!(compiler.pool().idle_parsers(), 0);
		let second = compiler.handle_expr(&schema, "age >");
		assert!(Arc::ptr_eq(&first, &second));
	}

	#[test]
	fn lexer_errors_are_syntax_errors() {
		let compiler = compiler();
		let outcome = compiler.handle_expr(&schema("c"), "age > 1 # 2");
		let err = outcome.as_ref().as_ref().unwrap_err();
		assert!(matches!(err, Error::InvalidSyntax(_)), "{err}");
		let outcome = compiler.handle_expr(&schema("c"), "   ");
		assert!(matches!(outcome.as_ref(), Err(Error::InvalidSyntax(_))));
	}

	#[test]
	fn trailing_input_is_rejected() {
		let compiler = compiler();
		let outcome = compiler.handle_expr(&schema("c"), "age > 1 2");
		assert_eq!(
			outcome.as_ref(),
			&Err(Error::QueryRemaining {
				expr: "age > 1 2".to_owned()
			})
		);
	}

	#[test]
	fn predicates_must_be_boolean() {
		let compiler = compiler();
		let err = compiler.parse_expr(&schema("c"), "1 + 2", &HashMap::new()).unwrap_err();
		assert_eq!(
			err,
			Error::NotBoolean {
				expr: "1 + 2".to_owned(),
				data_type: DataType::Int64,
			}
		);
		assert_eq!(err.kind(), ErrorKind::Semantic);
	}

	#[test]
	fn compile_errors_name_the_expression() {
		let compiler = compiler();
		let err = compiler.parse_expr(&schema("c"), "missing > 1", &HashMap::new()).unwrap_err();
		assert!(matches!(err, Error::InvalidExpression { ref expr, .. } if expr == "missing > 1"));
		assert_eq!(err.kind(), ErrorKind::Schema);
		assert!(err.to_string().contains("field missing not exist"), "{err}");
	}

	#[test]
	fn templates_fill_a_copy() {
		let compiler = compiler();
		let schema = schema("c");
		let values = HashMap::from([(
			"ids".to_owned(),
			TemplateValue::Array(TemplateArray::Long(vec![1, 2])),
		)]);
		let expr = compiler.parse_expr(&schema, "age in {ids}", &values).unwrap();
		let column = crate::plan::ColumnInfo::from_field(schema.field_by_name("age").unwrap());
		assert_eq!(
			expr,
			Expr::Term(TermExpr {
				column: column.clone(),
				values: Slot::Value(vec![GenericValue::Int64(1), GenericValue::Int64(2)]),
			})
		);
		// The cached expression still holds the placeholder.
		let cached = compiler.handle_expr(&schema, "age in {ids}");
		assert!(cached.as_ref().as_ref().unwrap().expr.has_template());

		let err = compiler.parse_expr(&schema, "age in {ids}", &HashMap::new()).unwrap_err();
		assert_eq!(
			err,
			Error::TemplateNotFound {
				name: "ids".to_owned()
			}
		);

		let expr = compiler
			.parse_expr(
				&schema,
				"name == {n}",
				&HashMap::from([("n".to_owned(), TemplateValue::String("x".to_owned()))]),
			)
			.unwrap();
		assert_eq!(
			expr,
			Expr::UnaryRange(UnaryRangeExpr {
				column: crate::plan::ColumnInfo::from_field(schema.field_by_name("name").unwrap()),
				op: OpType::Equal,
				value: Slot::Value(GenericValue::String("x".to_owned())),
			})
		);
	}

	#[test]
	fn han_characters_are_normalized() {
		let compiler = compiler();
		let expr = compiler.parse_expr(&schema("c"), r#"name == "中文""#, &HashMap::new()).unwrap();
		let Expr::UnaryRange(range) = expr else {
			panic!("expected a comparison");
		};
		assert_eq!(range.value, Slot::Value(GenericValue::String("中文".to_owned())));
	}

	#[test]
	fn identifiers() {
		let compiler = compiler();
		let schema = schema("c");
		let mut seen = None;
		compiler
			.parse_identifier(&schema, "age", |expr| {
				seen = expr.as_column().map(|c| c.field_id);
				Ok(())
			})
			.unwrap();
		assert_eq!(seen, Some(101));

		let err = compiler.parse_identifier(&schema, "age + 1", |_| Ok(())).unwrap_err();
		assert_eq!(
			err,
			Error::InvalidIdentifier {
				identifier: "age + 1".to_owned()
			}
		);
		let err = compiler.parse_identifier(&schema, "nope", |_| Ok(())).unwrap_err();
		assert!(matches!(err, Error::IdentifierParse { .. }));

		let err = compiler
			.parse_identifier(&schema, "name", |_| Err(Error::Semantic("rejected".to_owned())))
			.unwrap_err();
		assert_eq!(err, Error::Semantic("rejected".to_owned()));
	}
}
