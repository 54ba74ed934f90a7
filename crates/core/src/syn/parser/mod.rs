//! Module implementing the filter expression parser.
//!
//! The parser is a straight forward recursive descent parser with a pratt
//! parser for operators. It does not lex on its own but takes over the
//! buffers of a [`Lexer`] which already tokenized the whole expression, so
//! that once parsing finished [`Parser::peek_kind`] tells whether any input
//! was left behind.
//!
//! The height of the syntax tree is bounded by a depth limit, see
//! [`MAX_EXPRESSION_DEPTH`](crate::cnf::MAX_EXPRESSION_DEPTH). Nested
//! expressions and chained operators both count against it, and expressions
//! exceeding it are rejected with a syntax error instead of overflowing the
//! stack. Runs of `and` or `or` are joined into balanced trees, so long
//! disjunctions like `id == 1 or id == 2 or ...` stay shallow.

use crate::cnf::MAX_EXPRESSION_DEPTH;
use crate::syn::ast::Ast;
use crate::syn::error::{ErrorListener, SyntaxError};
use crate::syn::lexer::Lexer;
use crate::syn::token::{Span, Token, TokenKind};

mod expression;
mod mac;
mod prime;
#[cfg(test)]
mod test;

pub type ParseResult<T> = Result<T, SyntaxError>;

/// The filter expression parser.
#[derive(Debug)]
pub struct Parser {
	source: String,
	tokens: Vec<Token>,
	index: usize,
	depth_limit: u32,
	depth_remaining: u32,
}

impl Default for Parser {
	fn default() -> Self {
		Self::new()
	}
}

impl Parser {
	pub fn new() -> Self {
		Self::with_depth_limit(*MAX_EXPRESSION_DEPTH)
	}

	pub fn with_depth_limit(limit: u32) -> Self {
		Parser {
			source: String::new(),
			tokens: Vec::new(),
			index: 0,
			depth_limit: limit,
			depth_remaining: limit,
		}
	}

	/// Take over the source and tokens of `lexer`.
	///
	/// The lexer is left with the (cleared) buffers this parser held before.
	pub fn load(&mut self, lexer: &mut Lexer) {
		self.reset();
		lexer.swap_buffers(&mut self.source, &mut self.tokens);
	}

	/// Reset the parser so it can be used for another expression.
	pub fn reset(&mut self) {
		self.source.clear();
		self.tokens.clear();
		self.index = 0;
		self.depth_remaining = self.depth_limit;
	}

	/// Whether there are no tokens to parse at all.
	pub fn is_empty(&self) -> bool {
		self.tokens.is_empty()
	}

	pub fn source(&self) -> &str {
		&self.source
	}

	/// Returns the next token without consuming it.
	pub fn peek(&self) -> Token {
		self.tokens.get(self.index).or_else(|| self.tokens.last()).copied().unwrap_or(Token {
			kind: TokenKind::Eof,
			span: Span::empty(),
		})
	}

	pub fn peek_kind(&self) -> TokenKind {
		self.peek().kind
	}

	/// Returns the token after the next token without consuming anything.
	pub fn peek1(&self) -> Token {
		match self.tokens.get(self.index + 1) {
			Some(x) => *x,
			None => self.peek(),
		}
	}

	/// Consume and return the next token, the end of the input is never consumed.
	pub fn next(&mut self) -> Token {
		let token = self.peek();
		if token.kind != TokenKind::Eof {
			self.index += 1;
		}
		token
	}

	/// Consume the next token if it is of the given kind.
	pub fn eat(&mut self, kind: TokenKind) -> bool {
		if self.peek_kind() == kind {
			self.next();
			true
		} else {
			false
		}
	}

	/// The span of the most recently consumed token.
	pub fn last_span(&self) -> Span {
		match self.index.checked_sub(1).and_then(|i| self.tokens.get(i)) {
			Some(x) => x.span,
			None => Span::empty(),
		}
	}

	/// The source text covered by a span.
	pub fn slice(&self, span: Span) -> &str {
		self.source.get(span.range()).unwrap_or_default()
	}

	/// Parse a full expression, leaving whatever follows it unconsumed.
	pub fn parse_expr(&mut self) -> ParseResult<Ast> {
		self.pratt_parse_expr(crate::syn::ast::BindingPower::Base)
	}

	/// Parse a full expression, reporting a failure to `errors`.
	pub fn parse(&mut self, errors: &mut ErrorListener) -> Option<Ast> {
		match self.parse_expr() {
			Ok(ast) => Some(ast),
			Err(e) => {
				errors.report(e);
				None
			}
		}
	}
}
