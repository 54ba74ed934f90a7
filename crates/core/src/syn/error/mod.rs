use std::fmt::Display;

use crate::syn::token::Span;

mod mac;
mod render;
pub(crate) use mac::{bail, syntax_error};
pub use render::{Location, RenderedError, Snippet};

#[derive(Debug, Clone)]
enum DiagnosticKind {
	Cause(String),
	Span {
		span: Span,
		label: Option<String>,
	},
}

#[derive(Debug, Clone)]
struct Diagnostic {
	kind: DiagnosticKind,
	next: Option<Box<Diagnostic>>,
}

/// A lexing or parsing error.
#[derive(Debug, Clone)]
pub struct SyntaxError {
	diagnostic: Box<Diagnostic>,
}

impl SyntaxError {
	/// Create a new syntax error.
	pub fn new<T>(message: T) -> Self
	where
		T: Display,
	{
		let diagnostic = Diagnostic {
			kind: DiagnosticKind::Cause(message.to_string()),
			next: None,
		};

		Self {
			diagnostic: Box::new(diagnostic),
		}
	}

	pub fn with_span(mut self, span: Span) -> Self {
		self.diagnostic = Box::new(Diagnostic {
			kind: DiagnosticKind::Span {
				span,
				label: None,
			},
			next: Some(self.diagnostic),
		});
		self
	}

	pub fn with_labeled_span<T: Display>(mut self, span: Span, label: T) -> Self {
		self.diagnostic = Box::new(Diagnostic {
			kind: DiagnosticKind::Span {
				span,
				label: Some(label.to_string()),
			},
			next: Some(self.diagnostic),
		});
		self
	}

	pub fn with_cause<T: Display>(mut self, t: T) -> Self {
		self.diagnostic = Box::new(Diagnostic {
			kind: DiagnosticKind::Cause(t.to_string()),
			next: Some(self.diagnostic),
		});
		self
	}

	pub fn render_on(&self, source: &str) -> RenderedError {
		let mut res = RenderedError {
			errors: Vec::new(),
			snippets: Vec::new(),
		};
		Self::render_on_inner(&self.diagnostic, source, &mut res);
		res
	}

	fn render_on_inner(diagnostic: &Diagnostic, source: &str, res: &mut RenderedError) {
		if let Some(ref x) = diagnostic.next {
			Self::render_on_inner(x, source, res);
		}

		match diagnostic.kind {
			DiagnosticKind::Cause(ref x) => res.errors.push(x.clone()),
			DiagnosticKind::Span {
				ref span,
				ref label,
			} => {
				let location = Location::of_span_start(source, *span);
				let snippet = Snippet::from_source_location(
					source,
					location,
					span.len as usize,
					label.as_deref(),
				);
				res.snippets.push(snippet)
			}
		}
	}
}

/// Collects the errors raised while lexing and parsing one expression.
///
/// Only the first error is retained, anything reported after it is usually
/// a consequence of the first and only adds noise.
#[derive(Debug, Default)]
pub struct ErrorListener {
	error: Option<SyntaxError>,
}

impl ErrorListener {
	pub fn new() -> Self {
		Self::default()
	}

	pub fn report(&mut self, error: SyntaxError) {
		if self.error.is_none() {
			self.error = Some(error);
		} else {
			trace!("ignoring a syntax error reported after the first one");
		}
	}

	pub fn error(&self) -> Option<&SyntaxError> {
		self.error.as_ref()
	}

	pub fn has_error(&self) -> bool {
		self.error.is_some()
	}

	pub fn take(&mut self) -> Option<SyntaxError> {
		self.error.take()
	}
}

#[cfg(test)]
mod test {
	use super::*;

	#[test]
	fn listener_keeps_the_first_error() {
		let mut listener = ErrorListener::new();
		assert!(!listener.has_error());
		listener.report(SyntaxError::new("first"));
		listener.report(SyntaxError::new("second"));
		let rendered = listener.take().map(|e| e.render_on("")).map(|e| e.to_string());
		assert_eq!(rendered.as_deref(), Some("first"));
		assert!(listener.take().is_none());
	}

	#[test]
	fn macro_attaches_labels() {
		let span = Span {
			offset: 4,
			len: 1,
		};
		let error = syntax_error!("Unexpected token `{}`", ")", @span => "expected a value");
		let rendered = error.render_on("a > )");
		assert_eq!(rendered.errors, vec!["Unexpected token `)`".to_owned()]);
		assert_eq!(rendered.snippets.len(), 1);
		assert_eq!(rendered.snippets[0].location.column, 5);
		assert_eq!(rendered.snippets[0].label.as_deref(), Some("expected a value"));
	}
}
