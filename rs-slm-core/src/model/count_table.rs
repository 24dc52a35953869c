use std::ops::Range;

use crate::error::BuildError;
use super::arena::BumpArena;
use super::context_interner::ContextId;
use super::row::Row;
use super::token_interner::TokenId;

/// One cell of the count table.
pub type Count = u32;

/// Rows start on a 64-byte boundary inside the arena.
const TABLE_ALIGNMENT: usize = 64 / size_of::<Count>();

/// Dense `context_count x vocab_size` matrix of transition counts.
///
/// Entry `(c, t)` is the number of times token `t` immediately followed
/// context `c`. The whole matrix is one bump allocation, made once both
/// dimensions are final; it is never resized.
#[derive(Debug)]
pub struct CountTable {
	arena: BumpArena<Count>,
	cells: Range<usize>,
	contexts: usize,
	vocab: usize,
}

impl CountTable {
	/// Number of cells a `contexts x vocab` table needs.
	///
	/// # Errors
	/// Returns `AllocationFailure` if the product overflows.
	pub fn cells_for(contexts: usize, vocab: usize) -> Result<usize, BuildError> {
		contexts
			.checked_mul(vocab)
			.ok_or(BuildError::AllocationFailure { what: "count table", requested: usize::MAX })
	}

	/// Carves a zeroed `contexts x vocab` table out of `arena`.
	///
	/// # Errors
	/// Returns `AllocationFailure` if the arena is too small.
	pub fn allocate(mut arena: BumpArena<Count>, contexts: usize, vocab: usize) -> Result<Self, BuildError> {
		let size = Self::cells_for(contexts, vocab)?;
		let cells = arena.allocate(size, TABLE_ALIGNMENT)?;
		log::debug!("count table allocated: {} x {} = {} cells", contexts, vocab, size);
		Ok(Self { arena, cells, contexts, vocab })
	}

	/// Number of rows.
	pub fn context_count(&self) -> usize {
		self.contexts
	}

	/// Number of columns.
	pub fn vocab_size(&self) -> usize {
		self.vocab
	}

	/// Cells in use in the backing arena (padding included).
	pub fn arena_used(&self) -> usize {
		self.arena.used()
	}

	fn cells(&self) -> &[Count] {
		self.arena.slice(self.cells.clone()).unwrap_or(&[])
	}

	fn index(&self, context: ContextId, token: TokenId) -> Option<usize> {
		let (context, token) = (context as usize, token as usize);
		(context < self.contexts && token < self.vocab).then(|| context * self.vocab + token)
	}

	/// Records one observation of `token` after `context`.
	///
	/// Out-of-range ids are ignored and reported as `false`.
	pub fn increment(&mut self, context: ContextId, token: TokenId) -> bool {
		let Some(index) = self.index(context, token) else {
			return false;
		};
		match self.arena.slice_mut(self.cells.clone()) {
			Some(cells) => {
				cells[index] = cells[index].saturating_add(1);
				true
			}
			None => false,
		}
	}

	/// Count for `(context, token)`; 0 when either id is out of range.
	pub fn count(&self, context: ContextId, token: TokenId) -> Count {
		self.index(context, token).map(|index| self.cells()[index]).unwrap_or(0)
	}

	/// Row of `context`.
	pub fn row(&self, context: ContextId) -> Option<Row<'_>> {
		if context as usize >= self.contexts {
			return None;
		}
		let start = context as usize * self.vocab;
		self.cells().get(start..start + self.vocab).map(Row::new)
	}

	/// Number of observations after `context`.
	pub fn row_total(&self, context: ContextId) -> u64 {
		self.row(context).map(|row| row.total()).unwrap_or(0)
	}

	/// Sum of all cells: the number of (context, next token) pairs seen.
	pub fn total(&self) -> u64 {
		self.cells().iter().map(|&c| c as u64).sum()
	}

	/// `count / row_total`, or `None` for an unknown context or an empty row.
	pub fn probability(&self, context: ContextId, token: TokenId) -> Option<f64> {
		self.row(context)?.probability(token)
	}

	/// Probability distribution of the token following `context`.
	pub fn probabilities(&self, context: ContextId) -> Option<Vec<f64>> {
		self.row(context)?.probabilities()
	}

	/// Non-zero `(token, count)` pairs after `context`, by token id.
	pub fn transitions(&self, context: ContextId) -> impl Iterator<Item = (TokenId, Count)> + '_ {
		self.row(context).into_iter().flat_map(|row| row.transitions())
	}

	/// Most frequent token after `context`.
	pub fn most_likely(&self, context: ContextId) -> Option<(TokenId, Count)> {
		self.row(context)?.most_likely()
	}
}
