use super::count_table::Count;
use super::token_interner::TokenId;

/// Read-only view of one context's row in the count table.
///
/// A `Row` corresponds to a fixed context and stores how many times each
/// token of the vocabulary followed it.
///
/// Conceptually, this is a node in a Markov chain where outgoing edges
/// are weighted by their number of observations.
///
/// ## Responsibilities:
/// - Report occurrence totals for the context
/// - Derive transition probabilities (count / row total)
/// - List observed transitions
///
/// ## Invariants
/// - `counts.len() == vocab_size`
#[derive(Clone, Copy, Debug)]
pub struct Row<'t> {
	counts: &'t [Count],
}

impl<'t> Row<'t> {
	pub(crate) fn new(counts: &'t [Count]) -> Self {
		Self { counts }
	}

	/// Raw counts, indexed by token id.
	pub fn counts(&self) -> &'t [Count] {
		self.counts
	}

	/// Number of times token `token` followed this context (0 if unknown).
	pub fn count(&self, token: TokenId) -> Count {
		self.counts.get(token as usize).copied().unwrap_or(0)
	}

	/// Sum of the row. Zero for a context that was never followed by a token
	/// (e.g. the last window of the corpus).
	pub fn total(&self) -> u64 {
		self.counts.iter().map(|&c| c as u64).sum()
	}

	/// Probability that `token` follows this context.
	///
	/// Returns `None` if the row is empty or `token` is out of range.
	pub fn probability(&self, token: TokenId) -> Option<f64> {
		let count = *self.counts.get(token as usize)?;
		let total = self.total();
		if total == 0 {
			return None;
		}
		Some(count as f64 / total as f64)
	}

	/// Probabilities for every token of the vocabulary, summing to 1.
	///
	/// Returns `None` if the row is empty.
	pub fn probabilities(&self) -> Option<Vec<f64>> {
		let total = self.total();
		if total == 0 {
			return None;
		}
		Some(self.counts.iter().map(|&c| c as f64 / total as f64).collect())
	}

	/// Observed transitions `(token, count)`, by ascending token id.
	pub fn transitions(self) -> impl Iterator<Item = (TokenId, Count)> + 't {
		self.counts
			.iter()
			.enumerate()
			.filter(|(_, count)| **count > 0)
			.map(|(token, count)| (token as TokenId, *count))
	}

	/// Most frequent continuation; the lowest token id wins ties.
	pub fn most_likely(&self) -> Option<(TokenId, Count)> {
		self.transitions()
			.fold(None, |best, (token, count)| match best {
				Some((_, best_count)) if best_count >= count => best,
				_ => Some((token, count)),
			})
	}
}
