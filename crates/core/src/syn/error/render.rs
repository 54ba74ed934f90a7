use std::fmt::{self, Display};

use crate::syn::token::Span;

/// A human readable position in a source text, both fields are one based.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub struct Location {
	pub line: usize,
	pub column: usize,
}

impl Location {
	/// The location of the first character covered by `span`.
	pub fn of_span_start(source: &str, span: Span) -> Self {
		let offset = (span.offset as usize).min(source.len());
		// Offsets come from the lexer and always fall on a char boundary, but
		// be lenient in case a span was built by hand.
		let prefix = source.get(..offset).unwrap_or(source);
		let line = prefix.matches('\n').count() + 1;
		let line_start = prefix.rfind('\n').map(|x| x + 1).unwrap_or(0);
		let column = prefix[line_start..].chars().count() + 1;
		Location {
			line,
			column,
		}
	}
}

/// A line of source with a part of it highlighted.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct Snippet {
	pub source: String,
	pub location: Location,
	pub length: usize,
	pub label: Option<String>,
}

impl Snippet {
	pub fn from_source_location(
		source: &str,
		location: Location,
		length: usize,
		label: Option<&str>,
	) -> Self {
		let line = source.lines().nth(location.line - 1).unwrap_or_default();
		Snippet {
			source: line.to_owned(),
			location,
			length: length.max(1),
			label: label.map(str::to_owned),
		}
	}
}

impl Display for Snippet {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		let gutter = self.location.line.to_string();
		let pad = " ".repeat(gutter.len());
		writeln!(f, "{pad}--> [{}:{}]", self.location.line, self.location.column)?;
		writeln!(f, "{pad} |")?;
		writeln!(f, "{gutter} | {}", self.source)?;
		write!(
			f,
			"{pad} | {}{}",
			" ".repeat(self.location.column - 1),
			"^".repeat(self.length)
		)?;
		if let Some(ref label) = self.label {
			write!(f, " {label}")?;
		}
		Ok(())
	}
}

/// A syntax error rendered against the source it was raised on.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct RenderedError {
	pub errors: Vec<String>,
	pub snippets: Vec<Snippet>,
}

impl Display for RenderedError {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		match self.errors.len() {
			1 => f.write_str(&self.errors[0])?,
			_ => {
				for (i, e) in self.errors.iter().enumerate() {
					if i > 0 {
						f.write_str("\n")?;
					}
					write!(f, "- {e}")?;
				}
			}
		}
		for s in &self.snippets {
			write!(f, "\n{s}")?;
		}
		Ok(())
	}
}
