use crate::error::BuildError;
use super::hash_table::HashTable;
use super::tokenizer::TokenView;

/// Dense token identifier, in `[0, vocab_size)`.
pub type TokenId = u32;

/// Deduplicates token views into dense ids.
///
/// Keys are the token bytes borrowed from the corpus buffer, so the
/// interner cannot outlive the buffer (`'a`).
///
/// # Invariants
/// - Byte-equal views always map to the same id
/// - Ids are assigned 0, 1, 2, ... in first-occurrence order
/// - `views[id]` is the first occurrence of token `id`
#[derive(Debug)]
pub struct TokenInterner<'a> {
	table: HashTable<&'a [u8], TokenId>,
	views: Vec<TokenView<'a>>,
}

impl<'a> TokenInterner<'a> {
	/// Creates an empty interner whose table starts with `capacity` slots.
	pub fn with_capacity(capacity: usize) -> Result<Self, BuildError> {
		Ok(Self { table: HashTable::with_capacity(capacity)?, views: Vec::new() })
	}

	/// Returns the id of `view` and whether this was its first sighting.
	///
	/// A new token receives `vocab_size` as id.
	///
	/// # Errors
	/// - `IdSpaceExhausted` past `u32::MAX` distinct tokens
	/// - `AllocationFailure` if the table cannot grow
	pub fn intern(&mut self, view: TokenView<'a>) -> Result<(TokenId, bool), BuildError> {
		if let Some(&id) = self.table.get(view.as_bytes()) {
			return Ok((id, false));
		}

		let id = TokenId::try_from(self.views.len())
			.map_err(|_| BuildError::IdSpaceExhausted { what: "token" })?;
		self.table.insert(view.as_bytes(), id)?;
		self.views.push(view);
		Ok((id, true))
	}

	/// Looks a token up by its bytes.
	pub fn get(&self, bytes: &[u8]) -> Option<TokenId> {
		self.table.get(bytes).copied()
	}

	/// Canonical (first-occurrence) view of token `id`.
	pub fn resolve(&self, id: TokenId) -> Option<TokenView<'a>> {
		self.views.get(id as usize).copied()
	}

	/// Vocabulary size.
	pub fn len(&self) -> usize {
		self.views.len()
	}

	pub fn is_empty(&self) -> bool {
		self.views.is_empty()
	}

	/// `(id, view)` pairs in id order.
	pub fn iter(&self) -> impl Iterator<Item = (TokenId, TokenView<'a>)> + '_ {
		self.views.iter().enumerate().map(|(id, view)| (id as TokenId, *view))
	}

	pub(crate) fn table(&self) -> &HashTable<&'a [u8], TokenId> {
		&self.table
	}
}
