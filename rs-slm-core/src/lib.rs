//! Count-based n-gram language model engine.
//!
//! This crate builds the statistical skeleton of an n-gram model from a
//! text corpus:
//! - Whitespace tokenization over a borrowed, read-only buffer
//! - Dense token ids and dense context ids (tuples of `n` token ids)
//! - A `context x token` count table allocated once from a bump arena
//! - Derived transition probabilities
//!
//! The corpus is only borrowed: every token view and the built model are
//! tied to the buffer's lifetime.

/// N-gram engine: tokenizer, hash table, interners, count table, pipeline.
pub mod model;

/// Byte sources (in-memory buffers, memory-mapped files).
pub mod io;

/// Build errors.
pub mod error;

pub use error::BuildError;
pub use io::{ByteSource, MappedCorpus};
pub use model::config::BuildConfig;
pub use model::ngram_model::{InputStatus, ModelSummary, NGramModel};
