use std::borrow::Cow;

/// Resolve the escape sequences of the body of a string literal.
///
/// `\%` and `\_` are kept as they are since they only carry meaning in
/// `like` patterns, which resolve them later.
pub fn unescape(text: &str) -> Result<Cow<'_, str>, String> {
	if !text.contains('\\') {
		return Ok(Cow::Borrowed(text));
	}
	let mut out = String::with_capacity(text.len());
	let mut chars = text.chars();
	while let Some(c) = chars.next() {
		if c != '\\' {
			out.push(c);
			continue;
		}
		let Some(escape) = chars.next() else {
			return Err("string ends with an unfinished escape sequence".to_owned());
		};
		match escape {
			'\\' => out.push('\\'),
			'"' => out.push('"'),
			'\'' => out.push('\''),
			'n' => out.push('\n'),
			't' => out.push('\t'),
			'r' => out.push('\r'),
			'f' => out.push('\u{000C}'),
			'b' => out.push('\u{0008}'),
			'0' => out.push('\0'),
			'%' | '_' => {
				out.push('\\');
				out.push(escape);
			}
			'u' => out.push(code_point(&mut chars, 4)?),
			'U' => out.push(code_point(&mut chars, 8)?),
			x => return Err(format!("invalid escape sequence `\\{x}`")),
		}
	}
	Ok(Cow::Owned(out))
}

fn code_point(chars: &mut std::str::Chars<'_>, digits: usize) -> Result<char, String> {
	let hex: String = chars.by_ref().take(digits).collect();
	if hex.len() != digits || !hex.chars().all(|c| c.is_ascii_hexdigit()) {
		return Err(format!("invalid unicode escape, expected {digits} hex digits"));
	}
	let code = u32::from_str_radix(&hex, 16).map_err(|e| e.to_string())?;
	char::from_u32(code).ok_or_else(|| format!("invalid unicode code point {code:#x}"))
}

#[cfg(test)]
mod test {
	use rstest::rstest;

	use super::*;

	#[rstest]
	#[case::plain("abc", "abc")]
	#[case::quotes(r#"a\"b\'c"#, "a\"b'c")]
	#[case::control(r"\n\t\r\\", "\n\t\r\\")]
	#[case::short_unicode(r"\u4e2d", "中")]
	#[case::long_unicode(r"\U00020000", "\u{20000}")]
	#[case::wildcards(r"100\%\_", r"100\%\_")]
	fn escapes(#[case] input: &str, #[case] expected: &str) {
		assert_eq!(unescape(input).as_deref(), Ok(expected));
	}

	#[rstest]
	#[case::unknown(r"\q")]
	#[case::short_hex(r"\u4e")]
	#[case::bad_hex(r"\uzzzz")]
	#[case::surrogate(r"\ud800")]
	#[case::dangling("abc\\")]
	fn invalid_escapes(#[case] input: &str) {
		assert!(unescape(input).is_err());
	}
}
