//! Tokens of the filter expression language.

use std::fmt::{self, Display};
use std::ops::Range;

use logos::Logos;

/// A location in the source passed to the lexer.
#[derive(Clone, Copy, Debug, Default, Eq, PartialEq, Hash)]
pub struct Span {
	pub offset: u32,
	pub len: u32,
}

impl Span {
	pub const fn empty() -> Self {
		Span {
			offset: 0,
			len: 0,
		}
	}

	pub fn from_range(range: Range<usize>) -> Self {
		let offset = u32::try_from(range.start).unwrap_or(u32::MAX);
		let end = u32::try_from(range.end).unwrap_or(u32::MAX);
		Span {
			offset,
			len: end.saturating_sub(offset),
		}
	}

	/// A span covering both this span and `other`.
	pub fn covers(self, other: Span) -> Span {
		let start = self.offset.min(other.offset);
		let end = (self.offset + self.len).max(other.offset + other.len);
		Span {
			offset: start,
			len: end - start,
		}
	}

	pub fn range(self) -> Range<usize> {
		let start = self.offset as usize;
		start..start + self.len as usize
	}
}

#[derive(Logos, Clone, Copy, Debug, Eq, PartialEq, Hash)]
#[logos(skip r"[ \t\r\n\f]+")]
pub enum TokenKind {
	#[token("(")]
	OpenParen,
	#[token(")")]
	CloseParen,
	#[token("[")]
	OpenBracket,
	#[token("]")]
	CloseBracket,
	#[token("{")]
	OpenBrace,
	#[token("}")]
	CloseBrace,
	#[token(",")]
	Comma,

	#[token("+")]
	Plus,
	#[token("-")]
	Minus,
	#[token("*")]
	Star,
	#[token("/")]
	Slash,
	#[token("%")]
	Percent,
	#[token("**")]
	Power,

	#[token("==")]
	Equal,
	#[token("!=")]
	NotEqual,
	#[token("<")]
	LessThan,
	#[token("<=")]
	LessThanEqual,
	#[token(">")]
	GreaterThan,
	#[token(">=")]
	GreaterThanEqual,

	#[token("&&")]
	#[token("and", ignore(case))]
	And,
	#[token("||")]
	#[token("or", ignore(case))]
	Or,
	#[token("!")]
	#[token("not", ignore(case))]
	Not,
	#[token("in", ignore(case))]
	In,
	#[token("like", ignore(case))]
	Like,
	#[token("exists", ignore(case))]
	Exists,
	#[token("is", ignore(case))]
	Is,
	#[token("null", ignore(case))]
	Null,
	#[token("true", ignore(case))]
	True,
	#[token("false", ignore(case))]
	False,

	#[token("$meta")]
	Meta,
	#[regex(r"[a-zA-Z_][a-zA-Z0-9_]*")]
	Identifier,
	#[regex(r"[0-9]+")]
	Integer,
	#[regex(r"0[xX][0-9a-fA-F]+")]
	HexInteger,
	#[regex(r"[0-9]+\.[0-9]*([eE][+-]?[0-9]+)?")]
	#[regex(r"\.[0-9]+([eE][+-]?[0-9]+)?")]
	#[regex(r"[0-9]+[eE][+-]?[0-9]+")]
	Float,
	#[regex(r#""([^"\\]|\\.)*""#)]
	#[regex(r#"'([^'\\]|\\.)*'"#)]
	Strand,

	/// Produced once the source is exhausted, never by the logos lexer itself.
	Eof,
}

impl TokenKind {
	pub fn as_str(&self) -> &'static str {
		match self {
			Self::OpenParen => "(",
			Self::CloseParen => ")",
			Self::OpenBracket => "[",
			Self::CloseBracket => "]",
			Self::OpenBrace => "{",
			Self::CloseBrace => "}",
			Self::Comma => ",",
			Self::Plus => "+",
			Self::Minus => "-",
			Self::Star => "*",
			Self::Slash => "/",
			Self::Percent => "%",
			Self::Power => "**",
			Self::Equal => "==",
			Self::NotEqual => "!=",
			Self::LessThan => "<",
			Self::LessThanEqual => "<=",
			Self::GreaterThan => ">",
			Self::GreaterThanEqual => ">=",
			Self::And => "and",
			Self::Or => "or",
			Self::Not => "not",
			Self::In => "in",
			Self::Like => "like",
			Self::Exists => "exists",
			Self::Is => "is",
			Self::Null => "null",
			Self::True => "true",
			Self::False => "false",
			Self::Meta => "$meta",
			Self::Identifier => "an identifier",
			Self::Integer | Self::HexInteger => "an integer",
			Self::Float => "a number",
			Self::Strand => "a string",
			Self::Eof => "the end of the expression",
		}
	}

	pub fn is_relation(&self) -> bool {
		matches!(
			self,
			Self::LessThan | Self::LessThanEqual | Self::GreaterThan | Self::GreaterThanEqual
		)
	}
}

impl Display for TokenKind {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.write_str(self.as_str())
	}
}

/// A token and where it was found.
#[derive(Clone, Copy, Debug, Eq, PartialEq, Hash)]
pub struct Token {
	pub kind: TokenKind,
	pub span: Span,
}

/// A shorthand for token kinds.
macro_rules! t {
	("(") => {
		$crate::syn::token::TokenKind::OpenParen
	};
	(")") => {
		$crate::syn::token::TokenKind::CloseParen
	};
	("[") => {
		$crate::syn::token::TokenKind::OpenBracket
	};
	("]") => {
		$crate::syn::token::TokenKind::CloseBracket
	};
	("{") => {
		$crate::syn::token::TokenKind::OpenBrace
	};
	("}") => {
		$crate::syn::token::TokenKind::CloseBrace
	};
	(",") => {
		$crate::syn::token::TokenKind::Comma
	};
	("+") => {
		$crate::syn::token::TokenKind::Plus
	};
	("-") => {
		$crate::syn::token::TokenKind::Minus
	};
	("*") => {
		$crate::syn::token::TokenKind::Star
	};
	("/") => {
		$crate::syn::token::TokenKind::Slash
	};
	("%") => {
		$crate::syn::token::TokenKind::Percent
	};
	("**") => {
		$crate::syn::token::TokenKind::Power
	};
	("==") => {
		$crate::syn::token::TokenKind::Equal
	};
	("!=") => {
		$crate::syn::token::TokenKind::NotEqual
	};
	("<") => {
		$crate::syn::token::TokenKind::LessThan
	};
	("<=") => {
		$crate::syn::token::TokenKind::LessThanEqual
	};
	(">") => {
		$crate::syn::token::TokenKind::GreaterThan
	};
	(">=") => {
		$crate::syn::token::TokenKind::GreaterThanEqual
	};
}

pub(crate) use t;
