use serde::Serialize;

use crate::error::BuildError;
use crate::io::ByteSource;
use super::arena::BumpArena;
use super::config::BuildConfig;
use super::context::ContextBuilder;
use super::context_interner::{ContextId, ContextInterner};
use super::count_table::{Count, CountTable};
use super::row::Row;
use super::token_interner::{TokenId, TokenInterner};
use super::tokenizer::{TokenView, Tokenizer};

/// How usable the corpus was for the requested context length.
#[derive(Serialize, Clone, Copy, Debug, PartialEq, Eq)]
pub enum InputStatus {
	/// At least one context was found.
	Ready,
	/// The corpus holds no token at all.
	Empty,
	/// The corpus holds fewer tokens than the context length.
	TooShort,
}

/// Sizes of a built model, for a reporting layer.
#[derive(Serialize, Clone, Debug, PartialEq)]
pub struct ModelSummary {
	pub context_len: usize,
	pub vocab_size: usize,
	pub context_count: usize,
	pub total_token_count: usize,
	/// Number of (context, next token) pairs counted.
	pub observed_transitions: u64,
	pub table_cells: usize,
	pub token_table_resizes: usize,
	pub context_table_resizes: usize,
	pub status: InputStatus,
}

/// Output of the first pass: both vocabularies and the token-id stream.
struct FirstPass<'a> {
	tokens: TokenInterner<'a>,
	contexts: ContextInterner,
	stream: Vec<TokenId>,
}

/// Count-based n-gram model over whitespace-delimited tokens.
///
/// The model borrows the corpus buffer (`'a`): token views point into it
/// and nothing is copied.
///
/// # Responsibilities
/// - Build the vocabulary and the context set from a corpus
/// - Count, for each context of `n` tokens, which token follows it
/// - Expose ids, counts and derived probabilities read-only
///
/// # Invariants
/// - `n >= 1`
/// - Token and context ids are dense and in first-occurrence order
/// - The count table is `context_count x vocab_size` and fully populated:
///   a build either succeeds entirely or returns an error
#[derive(Debug)]
pub struct NGramModel<'a> {
	/// The context length (number of tokens before a prediction point)
	n: usize,

	tokens: TokenInterner<'a>,
	contexts: ContextInterner,
	table: CountTable,

	/// Number of token occurrences in the corpus
	total_tokens: usize,
}

impl<'a> NGramModel<'a> {
	/// Builds a model from the corpus `bytes`.
	///
	/// Runs two passes:
	/// 1. Tokenize once, intern tokens and contexts, record the token-id stream
	/// 2. Allocate the count table and replay the stream to fill it
	///
	/// An empty corpus, or one shorter than the context length, is not an
	/// error: the model is returned with no contexts and
	/// [`input_status`](Self::input_status) says why.
	///
	/// # Errors
	/// Returns an error if the config is invalid or memory runs out; no
	/// partial model is returned.
	pub fn build(bytes: &'a [u8], config: &BuildConfig) -> Result<Self, BuildError> {
		config.validate()?;
		let n = config.context_len();

		let FirstPass { tokens, contexts, stream } = Self::first_pass(bytes, config)?;
		log::info!(
			"pass 1 done: {} tokens, vocabulary {}, {} contexts of {}",
			stream.len(),
			tokens.len(),
			contexts.len(),
			n
		);

		let table = Self::allocate_table(tokens.len(), contexts.len(), config)?;
		let table = Self::second_pass(&stream, &contexts, table, n)?;
		log::info!("pass 2 done: {} transitions counted", table.total());

		let model = Self { n, tokens, contexts, table, total_tokens: stream.len() };
		match model.input_status() {
			InputStatus::Ready => {}
			InputStatus::Empty => log::warn!("corpus holds no token, the model is empty"),
			InputStatus::TooShort => log::warn!(
				"corpus holds {} tokens, fewer than the context length {}",
				model.total_tokens,
				n
			),
		}
		Ok(model)
	}

	/// Builds a model from any byte source.
	pub fn from_source<S: ByteSource + ?Sized>(source: &'a S, config: &BuildConfig) -> Result<Self, BuildError> {
		Self::build(source.bytes(), config)
	}

	/// Interns every token and every full window of `n` tokens.
	///
	/// The final window is interned too, even though no token follows it.
	fn first_pass(bytes: &'a [u8], config: &BuildConfig) -> Result<FirstPass<'a>, BuildError> {
		let mut tokens = TokenInterner::with_capacity(config.initial_capacity())?;
		let mut contexts = ContextInterner::with_capacity(config.context_len(), config.initial_capacity())?;
		let mut builder = ContextBuilder::new(config.context_len());
		let mut stream = Vec::new();

		for view in Tokenizer::new(bytes) {
			let (id, _) = tokens.intern(view)?;
			stream.push(id);
			builder.push(id);
			if let Some(window) = builder.current() {
				contexts.intern(window)?;
			}
		}

		Ok(FirstPass { tokens, contexts, stream })
	}

	/// Reserves the arena and carves the count table out of it.
	///
	/// The arena holds exactly the table, capped by `max_table_cells`.
	fn allocate_table(vocab: usize, contexts: usize, config: &BuildConfig) -> Result<CountTable, BuildError> {
		let cells = CountTable::cells_for(contexts, vocab)?;
		let capacity = match config.max_table_cells {
			Some(max) => cells.min(max),
			None => cells,
		};
		let arena = BumpArena::reserve(capacity)?;
		CountTable::allocate(arena, contexts, vocab)
	}

	/// Replays the token-id stream and counts each (context, next token) pair.
	fn second_pass(
		stream: &[TokenId],
		contexts: &ContextInterner,
		mut table: CountTable,
		n: usize,
	) -> Result<CountTable, BuildError> {
		let mut builder = ContextBuilder::new(n);
		for (position, &token) in stream.iter().enumerate() {
			if let Some(window) = builder.current() {
				let context = contexts.get(window).ok_or(BuildError::InconsistentReplay { position })?;
				table.increment(context, token);
			}
			builder.push(token);
		}
		Ok(table)
	}

	/// Context length.
	pub fn context_len(&self) -> usize {
		self.n
	}

	/// Number of distinct tokens.
	pub fn vocab_size(&self) -> usize {
		self.tokens.len()
	}

	/// Number of distinct contexts.
	pub fn context_count(&self) -> usize {
		self.contexts.len()
	}

	/// Number of token occurrences in the corpus.
	pub fn total_token_count(&self) -> usize {
		self.total_tokens
	}

	pub fn input_status(&self) -> InputStatus {
		if self.total_tokens == 0 {
			InputStatus::Empty
		} else if self.contexts.is_empty() {
			InputStatus::TooShort
		} else {
			InputStatus::Ready
		}
	}

	/// `(view, id)` pairs of the vocabulary, in id order.
	pub fn tokens(&self) -> impl Iterator<Item = (TokenView<'a>, TokenId)> + '_ {
		self.tokens.iter().map(|(id, view)| (view, id))
	}

	pub fn token_id(&self, bytes: &[u8]) -> Option<TokenId> {
		self.tokens.get(bytes)
	}

	pub fn token(&self, id: TokenId) -> Option<TokenView<'a>> {
		self.tokens.resolve(id)
	}

	/// `(tuple, id)` pairs of the context set, in id order.
	pub fn contexts(&self) -> impl Iterator<Item = (&[TokenId], ContextId)> + '_ {
		self.contexts.iter().map(|(id, tuple)| (tuple, id))
	}

	pub fn context_id(&self, context: &[TokenId]) -> Option<ContextId> {
		self.contexts.get(context)
	}

	pub fn context(&self, id: ContextId) -> Option<&[TokenId]> {
		self.contexts.resolve(id)
	}

	/// Looks a context up by its token texts, e.g. `["the", "cat"]`.
	pub fn context_id_of(&self, words: &[&str]) -> Option<ContextId> {
		let ids = words
			.iter()
			.map(|word| self.token_id(word.as_bytes()))
			.collect::<Option<Vec<_>>>()?;
		self.context_id(&ids)
	}

	/// Context `id` rendered as its tokens joined by spaces.
	pub fn context_text(&self, id: ContextId) -> Option<String> {
		let words = self
			.context(id)?
			.iter()
			.map(|&token| self.token(token).map(|view| view.to_string_lossy().into_owned()))
			.collect::<Option<Vec<_>>>()?;
		Some(words.join(" "))
	}

	/// Number of times `token` followed `context`.
	pub fn count(&self, context: ContextId, token: TokenId) -> Count {
		self.table.count(context, token)
	}

	pub fn row(&self, context: ContextId) -> Option<Row<'_>> {
		self.table.row(context)
	}

	/// The populated count table.
	pub fn table(&self) -> &CountTable {
		&self.table
	}

	pub fn summary(&self) -> ModelSummary {
		ModelSummary {
			context_len: self.n,
			vocab_size: self.vocab_size(),
			context_count: self.context_count(),
			total_token_count: self.total_tokens,
			observed_transitions: self.table.total(),
			table_cells: self.table.arena_used(),
			token_table_resizes: self.tokens.table().resize_count(),
			context_table_resizes: self.contexts.table().resize_count(),
			status: self.input_status(),
		}
	}
}
