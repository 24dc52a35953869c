use super::token_interner::TokenId;

/// Sliding window over the `n` most recently consumed token ids.
///
/// Backed by a fixed ring buffer: pushing overwrites the oldest id and
/// never grows. Until `n` ids have been pushed the window is "unwarmed"
/// and no context is available.
///
/// # Usage
/// For each new token, read [`current`](Self::current) first (the `n` ids
/// preceding the token), pair it with the token, then [`push`](Self::push)
/// the token.
#[derive(Clone, Debug)]
pub struct ContextBuilder {
	/// Ring storage; `ring[head]` is the oldest id once warmed
	ring: Box<[TokenId]>,
	head: usize,
	seen: usize,
	/// Linearized copy of the window, oldest first
	window: Vec<TokenId>,
}

impl ContextBuilder {
	/// Creates an unwarmed builder for contexts of `n` ids.
	///
	/// `n` must be at least 1, which `BuildConfig` guarantees.
	pub fn new(n: usize) -> Self {
		let n = n.max(1);
		Self { ring: vec![0; n].into_boxed_slice(), head: 0, seen: 0, window: Vec::with_capacity(n) }
	}

	pub fn context_len(&self) -> usize {
		self.ring.len()
	}

	/// True once `n` ids have been pushed.
	pub fn is_warm(&self) -> bool {
		self.seen >= self.ring.len()
	}

	/// Slides the window to include `id`.
	pub fn push(&mut self, id: TokenId) {
		self.ring[self.head] = id;
		self.head = (self.head + 1) % self.ring.len();
		self.seen = self.seen.saturating_add(1);
	}

	/// The current window, oldest id first, or `None` while unwarmed.
	pub fn current(&mut self) -> Option<&[TokenId]> {
		if !self.is_warm() {
			return None;
		}
		self.window.clear();
		self.window.extend_from_slice(&self.ring[self.head..]);
		self.window.extend_from_slice(&self.ring[..self.head]);
		Some(&self.window)
	}

	/// Forgets every pushed id.
	pub fn reset(&mut self) {
		self.head = 0;
		self.seen = 0;
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn test_unwarmed_emits_nothing() {
		let mut builder = ContextBuilder::new(3);
		assert!(builder.current().is_none());
		builder.push(1);
		builder.push(2);
		assert!(!builder.is_warm());
		assert!(builder.current().is_none());
	}

	#[test]
	fn test_window_is_oldest_first() {
		let mut builder = ContextBuilder::new(3);
		for id in [1, 2, 3] {
			builder.push(id);
		}
		assert_eq!(builder.current(), Some(&[1, 2, 3][..]));
		builder.push(4);
		assert_eq!(builder.current(), Some(&[2, 3, 4][..]));
		builder.push(5);
		builder.push(6);
		builder.push(7);
		assert_eq!(builder.current(), Some(&[5, 6, 7][..]));
	}

	#[test]
	fn test_single_token_context() {
		let mut builder = ContextBuilder::new(1);
		builder.push(9);
		assert_eq!(builder.current(), Some(&[9][..]));
		builder.push(4);
		assert_eq!(builder.current(), Some(&[4][..]));
	}

	#[test]
	fn test_pairs_context_with_next_token() {
		let stream = [0, 1, 0, 1];
		let mut builder = ContextBuilder::new(2);
		let mut pairs = Vec::new();
		for &id in &stream {
			if let Some(context) = builder.current() {
				pairs.push((context.to_vec(), id));
			}
			builder.push(id);
		}
		assert_eq!(pairs, vec![(vec![0, 1], 0), (vec![1, 0], 1)]);
	}

	#[test]
	fn test_reset() {
		let mut builder = ContextBuilder::new(2);
		builder.push(1);
		builder.push(2);
		builder.reset();
		assert!(builder.current().is_none());
		assert_eq!(builder.context_len(), 2);
	}
}
