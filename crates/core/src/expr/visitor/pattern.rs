//! Translation of `like` patterns.
//!
//! `%` matches any run of characters and `_` any single character, a
//! backslash in front of either makes it literal. Patterns with a single
//! leading or trailing run of `%` become cheaper prefix, postfix or inner
//! matches, everything else is left to a general match.

use super::ExprVisitor;
use crate::err::Error;
use crate::expr::ExprWithType;
use crate::plan::{Expr, GenericValue, OpType, Slot, UnaryRangeExpr};
use crate::syn::ast::{Ast, AstVisitor};

/// Split a pattern on its unescaped `%`, unescaping `\%` and `\_` in the
/// pieces. Returns `None` when the pattern contains an unescaped `_`.
fn split_wildcards(pattern: &str) -> Option<Vec<String>> {
	let mut pieces = vec![String::new()];
	let mut chars = pattern.chars().peekable();
	while let Some(c) = chars.next() {
		let piece = pieces.last_mut()?;
		match c {
			'\\' => match chars.peek() {
				Some(&next) if next == '%' || next == '_' => {
					piece.push(next);
					chars.next();
				}
				_ => piece.push(c),
			},
			'%' => pieces.push(String::new()),
			'_' => return None,
			c => piece.push(c),
		}
	}
	Some(pieces)
}

/// The operator and operand a `like` pattern translates into.
pub(super) fn translate_pattern(pattern: &str) -> (OpType, String) {
	let Some(mut pieces) = split_wildcards(pattern) else {
		return (OpType::Match, pattern.to_owned());
	};
	let shape: Vec<bool> = pieces.iter().map(String::is_empty).collect();
	match shape.as_slice() {
		[_] => (OpType::Equal, pieces.remove(0)),
		// A lone `%` matches everything, as does the empty prefix.
		[true, true] => (OpType::PrefixMatch, String::new()),
		[false, true] => (OpType::PrefixMatch, pieces.remove(0)),
		[true, false] => (OpType::PostfixMatch, pieces.remove(1)),
		[true, false, true] => (OpType::InnerMatch, pieces.remove(1)),
		_ => (OpType::Match, pattern.to_owned()),
	}
}

impl ExprVisitor<'_> {
	pub(super) fn visit_like(&mut self, left: &Ast, right: &Ast) -> Result<ExprWithType, Error> {
		let column = self.visit_column(left, "like")?;
		let data_type = column.value_type();
		if !(data_type.is_string() || data_type.is_json()) {
			semantic!(
				"like operation on non-string or no-json field is unsupported: {}",
				self.describe(&column)
			);
		}
		let pattern = self.visit(right)?;
		let Some(GenericValue::String(pattern)) = pattern.expr.as_value() else {
			semantic!("the pattern of like must be a string constant");
		};
		let (op, operand) = translate_pattern(pattern);
		Ok(ExprWithType::predicate(Expr::UnaryRange(UnaryRangeExpr {
			column,
			op,
			value: Slot::Value(GenericValue::String(operand)),
		})))
	}
}
