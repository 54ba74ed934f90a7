use crate::syn::ast::{Ast, BinaryOperator};
use crate::syn::error::ErrorListener;
use crate::syn::lexer::Lexer;
use crate::syn::parser::Parser;
use crate::syn::token::TokenKind;

mod limit;

/// Parse all of `source`, returning the rendered error on failure.
fn parse_with(mut parser: Parser, source: &str) -> Result<Ast, String> {
	let mut lexer = Lexer::new();
	let mut errors = ErrorListener::new();
	lexer.lex(source, &mut errors);
	if let Some(e) = errors.take() {
		return Err(e.render_on(source).to_string());
	}
	parser.load(&mut lexer);
	let ast = parser.parse_expr().map_err(|e| e.render_on(source).to_string())?;
	if parser.peek_kind() != TokenKind::Eof {
		return Err(format!("input left after the expression: `{}`", parser.slice(parser.peek().span)));
	}
	Ok(ast)
}

fn parse(source: &str) -> Result<Ast, String> {
	parse_with(Parser::new(), source)
}

fn ident(name: &str) -> Ast {
	Ast::Identifier(name.to_owned())
}

fn binary(left: Ast, op: BinaryOperator, right: Ast) -> Ast {
	Ast::Binary {
		left: Box::new(left),
		op,
		right: Box::new(right),
	}
}
