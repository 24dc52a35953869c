use serde::{Deserialize, Serialize};

use crate::error::BuildError;
use super::hash_table::DEFAULT_CAPACITY;

/// Parameters of a model build.
///
/// `BuildConfig` is plain data: it can be built in code, through the
/// validating setters, or deserialized (missing fields take their default).
///
/// # Responsibilities
/// - Track the context length `n`
/// - Track the initial size of both interner tables
/// - Optionally cap the number of count-table cells
///
/// # Invariants
/// - `context_len >= 1`
/// - `initial_capacity >= 1`
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
#[serde(default)]
pub struct BuildConfig {
	/// Number of token ids in a context (the `n` of the n-gram prefix).
	context_len: usize,

	/// Slots of each interner table before the first resize.
	initial_capacity: usize,

	/// Upper bound on the count-table cells (`None` = exactly what is needed).
	pub max_table_cells: Option<usize>,
}

impl Default for BuildConfig {
	fn default() -> Self {
		Self { context_len: 2, initial_capacity: DEFAULT_CAPACITY, max_table_cells: None }
	}
}

impl BuildConfig {
	/// Creates a config for contexts of `context_len` tokens.
	///
	/// # Errors
	/// Returns an error if `context_len` is 0.
	pub fn new(context_len: usize) -> Result<Self, BuildError> {
		let mut config = Self::default();
		config.set_context_len(context_len)?;
		Ok(config)
	}

	pub fn context_len(&self) -> usize {
		self.context_len
	}

	pub fn initial_capacity(&self) -> usize {
		self.initial_capacity
	}

	/// Sets the context length.
	///
	/// # Errors
	/// Returns an error if `context_len` is 0.
	pub fn set_context_len(&mut self, context_len: usize) -> Result<(), BuildError> {
		if context_len == 0 {
			return Err(BuildError::InvalidConfig("context_len must be >= 1".to_owned()));
		}
		self.context_len = context_len;
		Ok(())
	}

	/// Sets the initial interner table capacity.
	///
	/// # Errors
	/// Returns an error if `capacity` is 0.
	pub fn set_initial_capacity(&mut self, capacity: usize) -> Result<(), BuildError> {
		if capacity == 0 {
			return Err(BuildError::InvalidConfig("initial_capacity must be >= 1".to_owned()));
		}
		self.initial_capacity = capacity;
		Ok(())
	}

	/// Checks the invariants; needed for deserialized configs.
	pub fn validate(&self) -> Result<(), BuildError> {
		if self.context_len == 0 {
			return Err(BuildError::InvalidConfig("context_len must be >= 1".to_owned()));
		}
		if self.initial_capacity == 0 {
			return Err(BuildError::InvalidConfig("initial_capacity must be >= 1".to_owned()));
		}
		Ok(())
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn test_defaults() {
		let config = BuildConfig::default();
		assert_eq!(config.context_len(), 2);
		assert_eq!(config.initial_capacity(), 32768);
		assert_eq!(config.max_table_cells, None);
		assert!(config.validate().is_ok());
	}

	#[test]
	fn test_setters_reject_zero() {
		assert!(BuildConfig::new(0).is_err());
		let mut config = BuildConfig::new(3).unwrap();
		assert!(config.set_initial_capacity(0).is_err());
		assert_eq!(config.initial_capacity(), 32768);
		config.set_initial_capacity(64).unwrap();
		assert_eq!(config.initial_capacity(), 64);
		assert_eq!(config.context_len(), 3);
	}
}
