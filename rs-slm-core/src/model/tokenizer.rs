use std::borrow::Cow;

/// Returns true for bytes that separate tokens.
///
/// Any ASCII whitespace byte (space, `\t`, `\n`, `\x0C`, `\r`) is a separator,
/// so `\r\n` line endings never leak into tokens.
#[inline]
pub fn is_separator(byte: u8) -> bool {
	byte.is_ascii_whitespace()
}

/// One token occurrence: a borrowed range of the corpus buffer.
///
/// A view never owns memory; its lifetime `'a` ties it to the buffer it
/// was cut from.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct TokenView<'a> {
	offset: usize,
	bytes: &'a [u8],
}

impl<'a> TokenView<'a> {
	/// Start of the token in the corpus buffer.
	pub fn offset(&self) -> usize {
		self.offset
	}

	pub fn len(&self) -> usize {
		self.bytes.len()
	}

	/// Always false for views produced by [`Tokenizer`].
	pub fn is_empty(&self) -> bool {
		self.bytes.is_empty()
	}

	/// The token bytes, borrowed from the corpus buffer.
	pub fn as_bytes(&self) -> &'a [u8] {
		self.bytes
	}

	/// The token as text; invalid UTF-8 is replaced with U+FFFD.
	pub fn to_string_lossy(&self) -> Cow<'a, str> {
		String::from_utf8_lossy(self.bytes)
	}
}

/// Lazy scanner splitting a buffer into whitespace-delimited token views.
///
/// Alternates between two states: skipping separators and consuming a
/// token. The sequence is finite and can be restarted by cloning the
/// tokenizer before iterating or creating a new one.
#[derive(Clone, Debug)]
pub struct Tokenizer<'a> {
	bytes: &'a [u8],
	cursor: usize,
}

impl<'a> Tokenizer<'a> {
	pub fn new(bytes: &'a [u8]) -> Self {
		Self { bytes, cursor: 0 }
	}
}

impl<'a> Iterator for Tokenizer<'a> {
	type Item = TokenView<'a>;

	fn next(&mut self) -> Option<Self::Item> {
		let rest = self.bytes.get(self.cursor..)?;

		// Skipping separators
		let skipped = rest.iter().take_while(|&&b| is_separator(b)).count();
		let start = self.cursor + skipped;
		if start >= self.bytes.len() {
			self.cursor = self.bytes.len();
			return None;
		}

		// Consuming a token, up to the next separator or the end of the buffer
		let len = self.bytes[start..].iter().take_while(|&&b| !is_separator(b)).count();
		self.cursor = start + len;

		Some(TokenView { offset: start, bytes: &self.bytes[start..start + len] })
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	fn tokens(input: &str) -> Vec<&str> {
		Tokenizer::new(input.as_bytes())
			.map(|view| std::str::from_utf8(view.as_bytes()).unwrap())
			.collect()
	}

	#[test]
	fn test_splits_on_whitespace() {
		assert_eq!(tokens("the cat\nsat\ton  the\r\nmat"), vec!["the", "cat", "sat", "on", "the", "mat"]);
	}

	#[test]
	fn test_final_token_without_separator() {
		assert_eq!(tokens("a b"), vec!["a", "b"]);
		assert_eq!(tokens("single"), vec!["single"]);
	}

	#[test]
	fn test_no_empty_tokens() {
		assert!(tokens("").is_empty());
		assert!(tokens(" \n\t  ").is_empty());
		assert_eq!(tokens("  lead and trail  "), vec!["lead", "and", "trail"]);
	}

	#[test]
	fn test_offsets_point_into_buffer() {
		let input = b"  ab cde";
		let views: Vec<TokenView> = Tokenizer::new(input).collect();
		assert_eq!(views[0].offset(), 2);
		assert_eq!(views[0].len(), 2);
		assert_eq!(views[1].offset(), 5);
		assert_eq!(&input[views[1].offset()..views[1].offset() + views[1].len()], b"cde");
	}

	#[test]
	fn test_count_matches_non_separator_runs() {
		let input = b"x  yy\n\nzzz w \t q\r\n";
		let mut runs = 0;
		let mut in_run = false;
		for &b in input.iter() {
			if !is_separator(b) && !in_run {
				runs += 1;
			}
			in_run = !is_separator(b);
		}
		assert_eq!(Tokenizer::new(input).count(), runs);
	}

	#[test]
	fn test_restart_by_clone() {
		let tokenizer = Tokenizer::new(b"one two three");
		let first: Vec<_> = tokenizer.clone().collect();
		let second: Vec<_> = tokenizer.collect();
		assert_eq!(first, second);
	}

	#[test]
	fn test_non_utf8_bytes_are_tokens() {
		let views: Vec<TokenView> = Tokenizer::new(b"\xff\xfe ok").collect();
		assert_eq!(views.len(), 2);
		assert_eq!(views[0].as_bytes(), b"\xff\xfe");
		assert_eq!(views[1].to_string_lossy(), "ok");
	}
}
