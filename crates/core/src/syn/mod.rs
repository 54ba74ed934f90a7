//! Module containing the tokens, lexer, parser and normalization of filter expressions.

use crate::err::Error;

pub mod ast;
pub mod error;
pub mod lexer;
pub mod parser;
pub mod pool;
pub mod token;
mod unicode;

pub use pool::ParserPool;
pub use unicode::{convert_han_to_ascii, is_han};

use ast::Ast;
use error::ErrorListener;
use lexer::Lexer;
use parser::Parser;
use token::TokenKind;

/// Parses a filter expression into its syntax tree, without looking at any schema.
///
/// The whole input must form one expression. During parsing the nesting depth
/// of the expression counts against a depth limit, see
/// [`MAX_EXPRESSION_DEPTH`](crate::cnf::MAX_EXPRESSION_DEPTH).
#[instrument(level = "trace", name = "parser", skip_all, fields(length = input.len()))]
pub fn parse(input: &str) -> Result<Ast, Error> {
	trace!("parsing expression, input = {input}");
	let mut errors = ErrorListener::new();
	let mut lexer = Lexer::new();
	lexer.lex(input, &mut errors);
	let mut parser = Parser::new();
	parser.load(&mut lexer);
	let ast = match errors.take() {
		Some(e) => Err(e),
		None => parser.parse_expr(),
	}
	.map_err(|e| Error::InvalidSyntax(e.render_on(input)))?;
	if parser.peek_kind() != TokenKind::Eof {
		return Err(Error::QueryRemaining {
			expr: input.to_owned(),
		});
	}
	Ok(ast)
}

#[cfg(test)]
mod test {
	use super::*;
	use crate::err::ErrorKind;

	#[test]
	fn parse_whole_input() {
		assert!(parse("a > 1 and b < 2").is_ok());
		let err = parse("a > 1 )").unwrap_err();
		assert!(matches!(err, Error::QueryRemaining { .. }));
		assert_eq!(err.to_string(), "invalid expression: a > 1 )");
		let err = parse("a >").unwrap_err();
		assert_eq!(err.kind(), ErrorKind::Syntax);
		assert!(err.to_string().starts_with("Parse error: Unexpected end of expression"));
	}
}
