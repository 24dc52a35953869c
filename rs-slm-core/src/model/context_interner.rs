use crate::error::BuildError;
use super::hash_table::HashTable;
use super::token_interner::TokenId;

/// Dense context identifier, in `[0, context_count)`.
pub type ContextId = u32;

/// Deduplicates fixed-length tuples of token ids into dense context ids.
///
/// Order matters: `(a, b)` and `(b, a)` are different contexts.
///
/// # Invariants
/// - Every key holds exactly `n` token ids
/// - Ids are assigned in first-occurrence order
/// - `flat[id * n..(id + 1) * n]` is the tuple of context `id`
#[derive(Debug)]
pub struct ContextInterner {
	n: usize,
	table: HashTable<Box<[TokenId]>, ContextId>,
	flat: Vec<TokenId>,
	len: usize,
}

impl ContextInterner {
	/// Creates an empty interner for tuples of `n` ids.
	///
	/// # Errors
	/// Returns `InvalidConfig` if `n` is 0.
	pub fn with_capacity(n: usize, capacity: usize) -> Result<Self, BuildError> {
		if n == 0 {
			return Err(BuildError::InvalidConfig("context length must be >= 1".to_owned()));
		}
		Ok(Self { n, table: HashTable::with_capacity(capacity)?, flat: Vec::new(), len: 0 })
	}

	fn check_len(&self, context: &[TokenId]) -> Result<(), BuildError> {
		if context.len() != self.n {
			return Err(BuildError::ContextLength { expected: self.n, got: context.len() });
		}
		Ok(())
	}

	/// Returns the id of `context` and whether this was its first sighting.
	///
	/// # Errors
	/// - `ContextLength` if `context` does not hold `n` ids
	/// - `IdSpaceExhausted` past `u32::MAX` distinct contexts
	/// - `AllocationFailure` if the table cannot grow
	pub fn intern(&mut self, context: &[TokenId]) -> Result<(ContextId, bool), BuildError> {
		self.check_len(context)?;
		if let Some(&id) = self.table.get(context) {
			return Ok((id, false));
		}

		let id = ContextId::try_from(self.len)
			.map_err(|_| BuildError::IdSpaceExhausted { what: "context" })?;
		self.table.insert(context.into(), id)?;
		self.flat.extend_from_slice(context);
		self.len += 1;
		Ok((id, true))
	}

	/// Looks a context up; a tuple of the wrong length is simply absent.
	pub fn get(&self, context: &[TokenId]) -> Option<ContextId> {
		self.table.get(context).copied()
	}

	/// Token ids of context `id`.
	pub fn resolve(&self, id: ContextId) -> Option<&[TokenId]> {
		let start = (id as usize).checked_mul(self.n)?;
		self.flat.get(start..start + self.n)
	}

	/// Number of distinct contexts.
	pub fn len(&self) -> usize {
		self.len
	}

	pub fn is_empty(&self) -> bool {
		self.len == 0
	}

	pub fn context_len(&self) -> usize {
		self.n
	}

	/// `(id, tuple)` pairs in id order.
	pub fn iter(&self) -> impl Iterator<Item = (ContextId, &[TokenId])> + '_ {
		self.flat.chunks_exact(self.n).enumerate().map(|(id, tuple)| (id as ContextId, tuple))
	}

	pub(crate) fn table(&self) -> &HashTable<Box<[TokenId]>, ContextId> {
		&self.table
	}
}
