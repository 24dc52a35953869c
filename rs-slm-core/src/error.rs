//! Error type shared by every stage of the model build.

use thiserror::Error;

/// Errors that can abort a model build.
///
/// A build either completes or fails as a whole: no partially filled
/// count table is ever handed to the caller.
///
/// Lookup misses are not errors (they are `None`), and reaching the
/// hash table load-factor ceiling is handled internally by a resize.
#[derive(Debug, Error)]
pub enum BuildError {
	/// A table or the arena could not obtain the memory it needs.
	#[error("allocation failure in {what}: {requested} cells requested")]
	AllocationFailure { what: &'static str, requested: usize },

	/// Rejected build parameters.
	#[error("invalid configuration: {0}")]
	InvalidConfig(String),

	/// A context key does not have the configured number of tokens.
	#[error("context must hold {expected} token ids, got {got}")]
	ContextLength { expected: usize, got: usize },

	/// More distinct keys than the id type can represent.
	#[error("{what} id space exhausted")]
	IdSpaceExhausted { what: &'static str },

	/// The second pass met a context the first pass never interned.
	#[error("replay found an unknown context at token {position}")]
	InconsistentReplay { position: usize },

	/// The byte source could not be acquired.
	#[error(transparent)]
	Io(#[from] std::io::Error),
}
