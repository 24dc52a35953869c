use std::ops::Range;

use crate::error::BuildError;

/// Bump allocator over one up-front reservation of `T` cells.
///
/// Allocations hand out forward-advancing, alignment-rounded cell ranges.
/// There is no per-allocation release: the whole arena is freed at once
/// when dropped. Cells start zeroed (`T::default()`).
#[derive(Debug)]
pub struct BumpArena<T> {
	cells: Vec<T>,
	cursor: usize,
}

impl<T: Copy + Default> BumpArena<T> {
	/// Reserves `capacity` cells.
	///
	/// # Errors
	/// Returns `AllocationFailure` if the reservation cannot be satisfied.
	pub fn reserve(capacity: usize) -> Result<Self, BuildError> {
		let mut cells = Vec::new();
		cells
			.try_reserve_exact(capacity)
			.map_err(|_| BuildError::AllocationFailure { what: "arena", requested: capacity })?;
		cells.resize(capacity, T::default());
		log::debug!("arena reserved {} cells", capacity);
		Ok(Self { cells, cursor: 0 })
	}

	/// Hands out `size` cells starting at the next multiple of `alignment`.
	///
	/// # Errors
	/// - `InvalidConfig` if `alignment` is not a power of two
	/// - `AllocationFailure` if the request does not fit; the cursor does
	///   not move in that case
	pub fn allocate(&mut self, size: usize, alignment: usize) -> Result<Range<usize>, BuildError> {
		if !alignment.is_power_of_two() {
			return Err(BuildError::InvalidConfig(format!("alignment must be a power of two, got {}", alignment)));
		}

		let failure = || BuildError::AllocationFailure { what: "arena", requested: size };
		let start = self.cursor.checked_add(alignment - 1).ok_or_else(failure)? & !(alignment - 1);
		let end = start
			.checked_add(size)
			.filter(|&end| end <= self.cells.len())
			.ok_or_else(failure)?;

		self.cursor = end;
		Ok(start..end)
	}

	/// Reserved cells.
	pub fn capacity(&self) -> usize {
		self.cells.len()
	}

	/// Cells handed out so far, padding included.
	pub fn used(&self) -> usize {
		self.cursor
	}

	pub fn remaining(&self) -> usize {
		self.cells.len() - self.cursor
	}

	pub fn slice(&self, range: Range<usize>) -> Option<&[T]> {
		self.cells.get(range)
	}

	pub fn slice_mut(&mut self, range: Range<usize>) -> Option<&mut [T]> {
		self.cells.get_mut(range)
	}
}
