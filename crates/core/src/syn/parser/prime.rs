use super::mac::{expected, unexpected};
use crate::syn::ast::{Ast, BindingPower};
use crate::syn::error::bail;
use crate::syn::lexer::unescape;
use crate::syn::parser::{ParseResult, Parser};
use crate::syn::token::{Token, TokenKind, t};

impl Parser {
	/// Parse an operand: a literal, a name, a call or a parenthesized expression.
	pub(super) fn parse_prime_expr(&mut self) -> ParseResult<Ast> {
		let token = self.next();
		match token.kind {
			t!("(") => {
				let expr = self.pratt_parse_expr(BindingPower::Base)?;
				self.expect_closing_delimiter(t!(")"), token)?;
				Ok(expr)
			}
			t!("[") => self.parse_array(token),
			t!("{") => {
				let name = expected!(self, TokenKind::Identifier);
				let name = self.slice(name.span).to_owned();
				self.expect_closing_delimiter(t!("}"), token)?;
				Ok(Ast::Template(name))
			}
			TokenKind::True => Ok(Ast::Bool(true)),
			TokenKind::False => Ok(Ast::Bool(false)),
			TokenKind::Integer | TokenKind::HexInteger | TokenKind::Float => {
				self.parse_number(token, false)
			}
			TokenKind::Strand => self.parse_strand(token),
			TokenKind::Meta => Ok(Ast::Identifier(self.slice(token.span).to_owned())),
			TokenKind::Identifier => {
				let name = self.slice(token.span).to_owned();
				if self.peek_kind() == t!("(") {
					return self.parse_call(name, token);
				}
				Ok(Ast::Identifier(name))
			}
			TokenKind::Exists => {
				let expr = self.pratt_parse_expr(BindingPower::Prefix)?;
				Ok(Ast::Exists(Box::new(expr)))
			}
			_ => unexpected!(self, token, "an expression"),
		}
	}

	fn expect_closing_delimiter(&mut self, kind: TokenKind, open: Token) -> ParseResult<()> {
		if self.eat(kind) {
			return Ok(());
		}
		let token = self.peek();
		match token.kind {
			TokenKind::Eof => bail!("Unexpected end of expression, expected `{}`", kind.as_str(),
				@open.span => "expected this delimiter to be closed"),
			_ => bail!("Unexpected token `{}`, expected `{}`", self.slice(token.span), kind.as_str(),
				@open.span => "expected this delimiter to be closed"),
		}
	}

	/// Parse the elements of an array literal, the opening bracket is already consumed.
	fn parse_array(&mut self, open: Token) -> ParseResult<Ast> {
		let mut values = Vec::new();
		loop {
			if self.eat(t!("]")) {
				break;
			}

			values.push(self.pratt_parse_expr(BindingPower::Base)?);

			if !self.eat(t!(",")) {
				self.expect_closing_delimiter(t!("]"), open)?;
				break;
			}
		}
		Ok(Ast::Array(values))
	}

	fn parse_call(&mut self, name: String, token: Token) -> ParseResult<Ast> {
		let open = expected!(self, t!("("));
		let mut args = Vec::new();
		loop {
			if self.eat(t!(")")) {
				break;
			}

			args.push(self.pratt_parse_expr(BindingPower::Base)?);

			if !self.eat(t!(",")) {
				self.expect_closing_delimiter(t!(")"), open)?;
				break;
			}
		}
		Ok(Ast::Call {
			name: name.to_ascii_lowercase(),
			args,
			span: token.span.covers(self.last_span()),
		})
	}

	/// Parse a number token, negated when it directly followed a `-`.
	pub(super) fn parse_number(&mut self, token: Token, negative: bool) -> ParseResult<Ast> {
		let text = self.slice(token.span);
		match token.kind {
			TokenKind::Float => match text.parse::<f64>() {
				Ok(x) if x.is_finite() => Ok(Ast::Float(if negative {
					-x
				} else {
					x
				})),
				_ => bail!("Invalid floating point number `{}`", text, @token.span),
			},
			TokenKind::Integer | TokenKind::HexInteger => {
				let parsed = match text.strip_prefix("0x").or_else(|| text.strip_prefix("0X")) {
					Some(hex) => i128::from_str_radix(hex, 16),
					None => text.parse::<i128>(),
				};
				let value = parsed.ok().map(|x| if negative {
					-x
				} else {
					x
				});
				match value.and_then(|x| i64::try_from(x).ok()) {
					Some(x) => Ok(Ast::Integer(x)),
					None => bail!("Integer literal `{}{}` is out of range", if negative { "-" } else { "" }, text,
						@token.span => "integers must fit in a signed 64 bit integer"),
				}
			}
			_ => unexpected!(self, token, "a number"),
		}
	}

	fn parse_strand(&mut self, token: Token) -> ParseResult<Ast> {
		let text = self.slice(token.span);
		// Strand tokens always start and end with the same quote character.
		let body = text.get(1..text.len().saturating_sub(1)).unwrap_or_default();
		match unescape(body) {
			Ok(x) => Ok(Ast::Strand(x.into_owned())),
			Err(e) => bail!("Invalid string literal: {}", e, @token.span),
		}
	}
}
