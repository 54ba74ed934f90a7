//! The lexer turning an expression into a buffer of tokens.
//!
//! The lexer owns its source and token buffers so that a pooled lexer can be
//! reused without allocating for every expression.

use logos::Logos;

use crate::syn::error::{ErrorListener, syntax_error};
use crate::syn::token::{Span, Token, TokenKind};

mod unescape;

pub use unescape::unescape;

#[derive(Debug, Default)]
pub struct Lexer {
	source: String,
	tokens: Vec<Token>,
}

impl Lexer {
	pub fn new() -> Self {
		Self::default()
	}

	/// Tokenize `source`, replacing any tokens of a previous run.
	///
	/// On success the buffer ends with a single [`TokenKind::Eof`] token. The
	/// first invalid token is reported to `errors` and ends lexing.
	pub fn lex(&mut self, source: &str, errors: &mut ErrorListener) {
		self.tokens.clear();
		self.source.clear();
		self.source.push_str(source);
		let Ok(end) = u32::try_from(source.len()) else {
			errors.report(syntax_error!("Expression is too long to be parsed"));
			return;
		};
		let mut lexer = TokenKind::lexer(source);
		while let Some(next) = lexer.next() {
			let span = Span::from_range(lexer.span());
			match next {
				Ok(kind) => self.tokens.push(Token {
					kind,
					span,
				}),
				Err(()) => {
					let found = lexer.slice();
					let error = if found.starts_with(['"', '\'']) {
						syntax_error!("Unterminated string literal", @span => "string starts here")
					} else {
						syntax_error!("Invalid token `{}`", found, @span)
					};
					errors.report(error);
					self.tokens.clear();
					return;
				}
			}
		}
		self.tokens.push(Token {
			kind: TokenKind::Eof,
			span: Span {
				offset: end,
				len: 0,
			},
		});
	}

	pub fn source(&self) -> &str {
		&self.source
	}

	pub fn tokens(&self) -> &[Token] {
		&self.tokens
	}

	/// Exchange the source and token buffers with the given ones.
	pub(crate) fn swap_buffers(&mut self, source: &mut String, tokens: &mut Vec<Token>) {
		std::mem::swap(&mut self.source, source);
		std::mem::swap(&mut self.tokens, tokens);
	}

	pub fn reset(&mut self) {
		self.source.clear();
		self.tokens.clear();
	}
}
