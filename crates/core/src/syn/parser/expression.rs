//! This module defines the pratt parser for operators.

use super::mac::{enter_expression_recursion, expected};
use crate::syn::ast::{Ast, BinaryOperator, BindingPower, PrefixOperator};
use crate::syn::error::bail;
use crate::syn::parser::{ParseResult, Parser};
use crate::syn::token::{Span, TokenKind, t};

impl Parser {
	/// Returns the binding power of an infix operator.
	///
	/// Binding power is the opposite of precedence: a higher binding power means that a token is
	/// more likely to operate directly on its neighbours. Example `*` has a higher binding power
	/// than `-` resulting in 1 - 2 * 3 being parsed as 1 - (2 * 3).
	fn infix_binding_power(&self, token: TokenKind) -> Option<BindingPower> {
		match token {
			TokenKind::Or => Some(BindingPower::Or),
			TokenKind::And => Some(BindingPower::And),

			t!("==")
			| t!("!=")
			| t!("<")
			| t!("<=")
			| t!(">")
			| t!(">=")
			| TokenKind::In
			| TokenKind::Like
			| TokenKind::Is => Some(BindingPower::Relation),
			// `not` is only an infix operator as part of `not in`.
			TokenKind::Not if self.peek1().kind == TokenKind::In => Some(BindingPower::Relation),

			t!("+") | t!("-") => Some(BindingPower::AddSub),
			t!("*") | t!("/") | t!("%") => Some(BindingPower::MulDiv),
			t!("**") => Some(BindingPower::Power),
			t!("[") => Some(BindingPower::Postfix),
			_ => None,
		}
	}

	fn prefix_binding_power(token: TokenKind) -> Option<BindingPower> {
		match token {
			TokenKind::Not | t!("+") | t!("-") => Some(BindingPower::Prefix),
			_ => None,
		}
	}

	fn parse_prefix_op(&mut self, min_bp: BindingPower) -> ParseResult<Ast> {
		let token = self.next();
		let op = match token.kind {
			t!("-") => {
				// Parse negative number literals as a whole so that the most
				// negative integer does not overflow before it is negated.
				let peek = self.peek();
				if matches!(peek.kind, TokenKind::Integer | TokenKind::HexInteger | TokenKind::Float)
				{
					self.next();
					let number = self.parse_number(peek, true)?;
					return self.parse_postfix_of(number, min_bp);
				}
				PrefixOperator::Negate
			}
			t!("+") => PrefixOperator::Positive,
			TokenKind::Not => PrefixOperator::Not,
			_ => bail!("Unexpected token `{}`, expected a prefix operator", self.slice(token.span),
				@token.span),
		};

		let expr = self.pratt_parse_expr(min_bp)?;
		Ok(Ast::Prefix {
			op,
			expr: Box::new(expr),
		})
	}

	/// Continue parsing operators which bind more tightly than `min_bp` after an already parsed
	/// operand.
	fn parse_postfix_of(&mut self, mut lhs: Ast, min_bp: BindingPower) -> ParseResult<Ast> {
		let mut charged = 0;
		let res = loop {
			if self.peek_kind() != t!("[") || BindingPower::Postfix <= min_bp {
				break Ok(lhs);
			}
			if let Err(e) = self.charge_depth(1, &mut charged) {
				break Err(e);
			}
			lhs = match self.parse_index(lhs) {
				Ok(x) => x,
				Err(e) => break Err(e),
			};
		};
		self.depth_remaining += charged;
		res
	}

	fn parse_index(&mut self, base: Ast) -> ParseResult<Ast> {
		let open = expected!(self, t!("["));
		let index = self.pratt_parse_expr(BindingPower::Base)?;
		if !self.eat(t!("]")) {
			let token = self.peek();
			bail!("Unexpected token `{}`, expected `]`", self.slice(token.span),
				@open.span => "expected this delimiter to be closed")
		}
		Ok(Ast::Index {
			base: Box::new(base),
			index: Box::new(index),
		})
	}

	fn parse_infix_op(&mut self, lhs: Ast) -> ParseResult<Ast> {
		let token = self.next();
		let operator = match token.kind {
			TokenKind::Or => BinaryOperator::Or,
			TokenKind::And => BinaryOperator::And,
			t!("==") => BinaryOperator::Equal,
			t!("!=") => BinaryOperator::NotEqual,
			t!("<") => BinaryOperator::LessThan,
			t!("<=") => BinaryOperator::LessThanEqual,
			t!(">") => BinaryOperator::MoreThan,
			t!(">=") => BinaryOperator::MoreThanEqual,
			TokenKind::In => BinaryOperator::In,
			TokenKind::Not => {
				expected!(self, TokenKind::In);
				BinaryOperator::NotIn
			}
			TokenKind::Like => BinaryOperator::Like,
			TokenKind::Is => {
				let negated = self.eat(TokenKind::Not);
				expected!(self, TokenKind::Null);
				return Ok(Ast::Null {
					expr: Box::new(lhs),
					negated,
				});
			}
			t!("+") => BinaryOperator::Add,
			t!("-") => BinaryOperator::Subtract,
			t!("*") => BinaryOperator::Multiply,
			t!("/") => BinaryOperator::Divide,
			t!("%") => BinaryOperator::Modulo,
			t!("**") => {
				// Right associative, so parse the right hand side at a lower binding power.
				let rhs = self.pratt_parse_expr(BindingPower::MulDiv)?;
				return Ok(Ast::Binary {
					left: Box::new(lhs),
					op: BinaryOperator::Power,
					right: Box::new(rhs),
				});
			}
			_ => bail!("Unexpected token `{}`, expected an operator", self.slice(token.span),
				@token.span),
		};

		let rhs = self.pratt_parse_expr(BindingPower::for_binary_operator(operator))?;

		// `lower < column < upper` with both operators pointing the same way is a range.
		if let Some(direction) = Self::relation_direction(operator) {
			let upper_op = Self::relation_operator(self.peek_kind())
				.filter(|op| Self::relation_direction(*op) == Some(direction));
			if let Some(upper_op) = upper_op {
				self.next();
				let upper = self.pratt_parse_expr(BindingPower::Relation)?;
				return Ok(Ast::Range {
					lower: Box::new(lhs),
					lower_op: operator,
					column: Box::new(rhs),
					upper_op,
					upper: Box::new(upper),
				});
			}
		}

		Ok(Ast::Binary {
			left: Box::new(lhs),
			op: operator,
			right: Box::new(rhs),
		})
	}

	/// `true` for operators pointing up (`<`, `<=`), `false` for down.
	fn relation_direction(op: BinaryOperator) -> Option<bool> {
		match op {
			BinaryOperator::LessThan | BinaryOperator::LessThanEqual => Some(true),
			BinaryOperator::MoreThan | BinaryOperator::MoreThanEqual => Some(false),
			_ => None,
		}
	}

	fn relation_operator(kind: TokenKind) -> Option<BinaryOperator> {
		match kind {
			t!("<") => Some(BinaryOperator::LessThan),
			t!("<=") => Some(BinaryOperator::LessThanEqual),
			t!(">") => Some(BinaryOperator::MoreThan),
			t!(">=") => Some(BinaryOperator::MoreThanEqual),
			_ => None,
		}
	}

	/// The pratt parsing loop.
	/// Parses expression according to binding power.
	pub(super) fn pratt_parse_expr(&mut self, min_bp: BindingPower) -> ParseResult<Ast> {
		enter_expression_recursion!(this = self => {
			this.pratt_parse_expr_inner(min_bp)
		})
	}

	fn pratt_parse_expr_inner(&mut self, min_bp: BindingPower) -> ParseResult<Ast> {
		// Operators parsed in the loop below deepen the tree without recursing,
		// they are charged against the depth limit until this level is done.
		let mut charged = 0;
		let res = self.parse_operators(min_bp, &mut charged);
		self.depth_remaining += charged;
		res
	}

	fn parse_operators(&mut self, min_bp: BindingPower, charged: &mut u32) -> ParseResult<Ast> {
		let peek = self.peek();
		let mut lhs = if let Some(bp) = Self::prefix_binding_power(peek.kind) {
			self.parse_prefix_op(bp)?
		} else {
			self.parse_prime_expr()?
		};

		// Relational operators do not chain, `a == b == c` is rejected.
		let mut related: Option<Span> = None;
		// Right hand operands of a run of the same logical operator.
		let mut run: Vec<Ast> = Vec::new();
		let mut run_op = BinaryOperator::Or;

		loop {
			let token = self.peek();
			let Some(bp) = self.infix_binding_power(token.kind) else {
				break;
			};
			if bp <= min_bp {
				break;
			}

			let logical = match token.kind {
				TokenKind::Or => Some(BinaryOperator::Or),
				TokenKind::And => Some(BinaryOperator::And),
				_ => None,
			};
			if let Some(op) = logical {
				if op != run_op && !run.is_empty() {
					lhs = self.join_logical(run_op, lhs, std::mem::take(&mut run), charged)?;
				}
				run_op = op;
				self.next();
				run.push(self.pratt_parse_expr(bp)?);
				continue;
			}
			if !run.is_empty() {
				lhs = self.join_logical(run_op, lhs, std::mem::take(&mut run), charged)?;
			}

			self.charge_depth(1, charged)?;

			if bp == BindingPower::Postfix {
				lhs = self.parse_index(lhs)?;
				continue;
			}

			if bp == BindingPower::Relation {
				if let Some(before) = related {
					let span = before.covers(token.span);
					bail!("Chaining relational operators have no defined associativity.",
						@span => "Use parens, '()', to specify which operator must be evaluated first")
				}
				related = Some(token.span);
			}

			lhs = self.parse_infix_op(lhs)?;
		}
		if !run.is_empty() {
			lhs = self.join_logical(run_op, lhs, run, charged)?;
		}
		Ok(lhs)
	}

	/// Take `amount` levels from the remaining depth until the current level is done.
	fn charge_depth(&mut self, amount: u32, charged: &mut u32) -> ParseResult<()> {
		if self.depth_remaining < amount {
			let span = self.peek().span;
			bail!("Exceeded the maximum expression depth of {}", self.depth_limit,
				@span => "expression nests too deeply")
		}
		self.depth_remaining -= amount;
		*charged += amount;
		Ok(())
	}

	/// Join the operands of a run of `and` or `or` operators into a balanced tree.
	///
	/// Both operators are associative, so `a or b or c or d` may become
	/// `(a or b) or (c or d)`. The tree stays shallow however many operands
	/// the run has.
	fn join_logical(
		&mut self,
		op: BinaryOperator,
		first: Ast,
		rest: Vec<Ast>,
		charged: &mut u32,
	) -> ParseResult<Ast> {
		let height = (rest.len() + 1).next_power_of_two().trailing_zeros();
		self.charge_depth(height, charged)?;
		Ok(Self::balance(op, first, rest))
	}

	fn balance(op: BinaryOperator, first: Ast, mut rest: Vec<Ast>) -> Ast {
		if rest.is_empty() {
			return first;
		}
		// The left half takes the odd operand, so three operands join as `(a op b) op c`.
		let mid = (rest.len() + 2) / 2;
		let mut right = rest.split_off(mid - 1);
		let right_first = right.remove(0);
		Ast::Binary {
			left: Box::new(Self::balance(op, first, rest)),
			op,
			right: Box::new(Self::balance(op, right_first, right)),
		}
	}
}
