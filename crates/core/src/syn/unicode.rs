//! Unicode related utilities.

use std::borrow::Cow;
use std::fmt::Write;

/// Code point ranges of the Han script, inclusive on both ends and sorted.
const HAN: &[(u32, u32)] = &[
	(0x2E80, 0x2E99),
	(0x2E9B, 0x2EF3),
	(0x2F00, 0x2FD5),
	(0x3005, 0x3005),
	(0x3007, 0x3007),
	(0x3021, 0x3029),
	(0x3038, 0x303B),
	(0x3400, 0x4DBF),
	(0x4E00, 0x9FFF),
	(0xF900, 0xFA6D),
	(0xFA70, 0xFAD9),
	(0x16FE2, 0x16FE3),
	(0x16FF0, 0x16FF1),
	(0x20000, 0x2A6DF),
	(0x2A700, 0x2B739),
	(0x2B740, 0x2B81D),
	(0x2B820, 0x2CEA1),
	(0x2CEB0, 0x2EBE0),
	(0x2EBF0, 0x2EE5D),
	(0x2F800, 0x2FA1D),
	(0x30000, 0x3134A),
	(0x31350, 0x323AF),
];

/// Returns whether the character belongs to the Han script.
pub fn is_han(c: char) -> bool {
	let c = c as u32;
	if c < HAN[0].0 {
		return false;
	}
	HAN.binary_search_by(|&(lo, hi)| {
		if hi < c {
			std::cmp::Ordering::Less
		} else if lo > c {
			std::cmp::Ordering::Greater
		} else {
			std::cmp::Ordering::Equal
		}
	})
	.is_ok()
}

/// Characters which may follow a backslash in an expression.
pub fn is_escape_char(c: char) -> bool {
	matches!(c, '\\' | 'n' | 't' | 'r' | 'f' | 'b' | '0' | '"' | '\'' | 'u' | 'U' | '%' | '_')
}

/// Rewrites every Han character of an expression into its escaped ASCII form.
///
/// Characters up to U+FFFF become `\uXXXX`, others `\UXXXXXXXX`, so that the
/// lexer only ever deals with ASCII inside string literals. A backslash and
/// the character following it are copied as they are. When a backslash is
/// followed by something which is not a recognised escape the expression is
/// returned unchanged and left for the lexer to reject.
pub fn convert_han_to_ascii(expr: &str) -> Cow<'_, str> {
	if expr.is_ascii() {
		return Cow::Borrowed(expr);
	}
	let mut out = String::with_capacity(expr.len() + expr.len() / 2);
	let mut changed = false;
	let mut chars = expr.chars();
	while let Some(c) = chars.next() {
		if c == '\\' {
			match chars.next() {
				Some(next) if is_escape_char(next) => {
					out.push(c);
					out.push(next);
				}
				Some(_) => return Cow::Borrowed(expr),
				None => out.push(c),
			}
			continue;
		}
		if is_han(c) {
			changed = true;
			let code = c as u32;
			// Writing into a String never fails.
			let _ = if code <= 0xFFFF {
				write!(out, "\\u{code:04x}")
			} else {
				write!(out, "\\U{code:08x}")
			};
		} else {
			out.push(c);
		}
	}
	if changed {
		Cow::Owned(out)
	} else {
		Cow::Borrowed(expr)
	}
}

#[cfg(test)]
mod test {
	use rstest::rstest;

	use super::*;

	#[rstest]
	#[case::ascii("a > 1", "a > 1")]
	#[case::bmp(r#"name == "中文""#, r#"name == "\u4e2d\u6587""#)]
	#[case::mixed(r#"title like "%α中%""#, r#"title like "%α\u4e2d%""#)]
	#[case::astral("x == \"\u{20000}\"", r#"x == "\U00020000""#)]
	#[case::escapes_kept(r#"s == "\"中\"""#, r#"s == "\"\u4e2d\"""#)]
	#[case::escaped_wildcard(r#"s like "中\%""#, r#"s like "\u4e2d\%""#)]
	#[case::trailing_backslash("中\\", "\\u4e2d\\")]
	#[case::bad_escape(r#"s == "中\q""#, r#"s == "中\q""#)]
	fn han_is_escaped(#[case] input: &str, #[case] expected: &str) {
		assert_eq!(convert_han_to_ascii(input), expected);
	}

	#[test]
	fn untouched_input_is_borrowed() {
		assert!(matches!(convert_han_to_ascii("a == \"é\""), Cow::Borrowed(_)));
		assert!(matches!(convert_han_to_ascii("a == 1"), Cow::Borrowed(_)));
		assert!(matches!(convert_han_to_ascii("a == \"中\""), Cow::Owned(_)));
	}

	#[test]
	fn han_ranges() {
		assert!(is_han('中'));
		assert!(is_han('\u{3005}'));
		assert!(is_han('\u{2F800}'));
		assert!(!is_han('\u{3006}'));
		assert!(!is_han('a'));
		assert!(!is_han('あ'));
		assert!(!is_han('\u{2E9A}'));
		for pair in HAN.windows(2) {
			assert!(pair[0].1 < pair[1].0);
		}
	}
}
