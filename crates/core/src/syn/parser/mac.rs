/// A macro for indicating that the parser encountered a token which it didn't expect.
macro_rules! unexpected {
	($parser:expr_2021, $found:expr_2021, $expected:expr_2021 $(=> $explain:expr_2021)?) => {{
		let token: $crate::syn::token::Token = $found;
		match token.kind {
			$crate::syn::token::TokenKind::Eof => {
				$crate::syn::error::bail!("Unexpected end of expression, expected {}", $expected,
					@token.span $(=> "{}", $explain)?)
			}
			_ => {
				$crate::syn::error::bail!("Unexpected token `{}`, expected {}", $parser.slice(token.span), $expected,
					@token.span $(=> "{}", $explain)?)
			}
		}
	}};
}

/// A macro for requiring a certain token to be next, returning an error otherwise.
macro_rules! expected {
	($parser:expr_2021, $($kind:tt)*) => {{
		let token = $parser.next();
		match token.kind {
			$($kind)* => token,
			_ => {
				let expected = format!("`{}`", $($kind)*.as_str());
				$crate::syn::parser::mac::unexpected!($parser, token, expected)
			}
		}
	}};
}

/// Run the given block one level deeper into the expression, failing once the
/// depth limit of the parser is exhausted.
macro_rules! enter_expression_recursion {
	($name:ident = $this:expr_2021 => { $($t:tt)* }) => {{
		if $this.depth_remaining == 0 {
			let span = $this.peek().span;
			$crate::syn::error::bail!("Exceeded the maximum expression depth of {}", $this.depth_limit,
				@span => "expression nests too deeply")
		}
		struct Dropper<'a>(&'a mut $crate::syn::parser::Parser);
		impl Drop for Dropper<'_> {
			fn drop(&mut self) {
				self.0.depth_remaining += 1;
			}
		}
		impl ::std::ops::Deref for Dropper<'_> {
			type Target = $crate::syn::parser::Parser;

			fn deref(&self) -> &Self::Target {
				self.0
			}
		}
		impl ::std::ops::DerefMut for Dropper<'_> {
			fn deref_mut(&mut self) -> &mut Self::Target {
				self.0
			}
		}

		$this.depth_remaining -= 1;
		#[allow(unused_mut)]
		let mut $name = Dropper($this);
		{
			$($t)*
		}
	}};
}

pub(crate) use {enter_expression_recursion, expected, unexpected};
