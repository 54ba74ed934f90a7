//! Reuse of lexers and parsers across compilations.

use parking_lot::Mutex;

use crate::syn::error::{ErrorListener, syntax_error};
use crate::syn::lexer::Lexer;
use crate::syn::parser::Parser;

/// Idle lexers and parsers waiting to be reused.
///
/// Both hold buffers which grow to fit the expressions they handle. Handing
/// them back after a successful compilation lets the next compilation skip
/// those allocations. Instances involved in a failure are simply dropped. The
/// pool grows to the highest number of concurrent compilations seen.
#[derive(Debug, Default)]
pub struct ParserPool {
	lexers: Mutex<Vec<Lexer>>,
	parsers: Mutex<Vec<Parser>>,
}

impl ParserPool {
	pub fn new() -> Self {
		Self::default()
	}

	/// Acquire a lexer and tokenize `source` with it.
	pub fn lexer(&self, source: &str, errors: &mut ErrorListener) -> Lexer {
		let mut lexer = match self.lexers.lock().pop() {
			Some(x) => {
				trace!("reusing a pooled lexer");
				x
			}
			None => Lexer::new(),
		};
		lexer.lex(source, errors);
		lexer
	}

	/// Acquire a parser over the tokens of `lexer`.
	///
	/// An empty token stream is reported to `errors`, unless an error was
	/// reported already.
	pub fn parser(&self, lexer: &mut Lexer, errors: &mut ErrorListener) -> Parser {
		let mut parser = match self.parsers.lock().pop() {
			Some(x) => {
				trace!("reusing a pooled parser");
				x
			}
			None => Parser::new(),
		};
		parser.load(lexer);
		if parser.is_empty() && !errors.has_error() {
			errors.report(syntax_error!("The expression produced no tokens"));
		}
		parser
	}

	/// Return a lexer to the pool.
	pub fn put_lexer(&self, mut lexer: Lexer) {
		lexer.reset();
		self.lexers.lock().push(lexer);
	}

	/// Return a parser to the pool.
	pub fn put_parser(&self, mut parser: Parser) {
		parser.reset();
		self.parsers.lock().push(parser);
	}

	pub fn idle_lexers(&self) -> usize {
		self.lexers.lock().len()
	}

	pub fn idle_parsers(&self) -> usize {
		self.parsers.lock().len()
	}
}

#[cfg(test)]
mod test {
	use super::*;
	use crate::syn::token::TokenKind;

	#[test]
	fn instances_are_reused() {
		let pool = ParserPool::new();
		let mut errors = ErrorListener::new();

		let mut lexer = pool.lexer("a > 1", &mut errors);
		let mut parser = pool.parser(&mut lexer, &mut errors);
		assert!(lexer.tokens().is_empty());
		assert!(parser.parse(&mut errors).is_some());
		assert_eq!(parser.peek_kind(), TokenKind::Eof);
		pool.put_lexer(lexer);
		pool.put_parser(parser);
		assert_eq!(pool.idle_lexers(), 1);
		assert_eq!(pool.idle_parsers(), 1);

		let mut lexer = pool.lexer("b", &mut errors);
		assert_eq!(pool.idle_lexers(), 0);
		let mut parser = pool.parser(&mut lexer, &mut errors);
		assert_eq!(pool.idle_parsers(), 0);
		assert_eq!(parser.source(), "b");
		assert!(parser.parse(&mut errors).is_some());
		assert!(!errors.has_error());
	}

	#[test]
	fn lexing_errors_are_reported() {
		let pool = ParserPool::new();
		let mut errors = ErrorListener::new();
		let mut lexer = pool.lexer("a # b", &mut errors);
		assert!(errors.has_error());
		let parser = pool.parser(&mut lexer, &mut errors);
		assert!(parser.is_empty());
	}
}
