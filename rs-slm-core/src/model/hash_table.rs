use std::borrow::Borrow;

use crate::error::BuildError;

/// Default number of slots of a fresh table.
pub const DEFAULT_CAPACITY: usize = 32768;

const FNV_OFFSET: u64 = 14695981039346656037;
const FNV_PRIME: u64 = 1099511628211;

// Load factor ceiling, as a fraction: 4/5 = 0.80
const MAX_LOAD_NUM: usize = 4;
const MAX_LOAD_DEN: usize = 5;

/// 64-bit FNV-1a hashing for table keys.
///
/// Byte strings hash their raw bytes. Integer tuples fold the same
/// xor-then-multiply step once per element, in order.
pub trait FnvHash {
	fn fnv1a(&self) -> u64;
}

impl FnvHash for [u8] {
	fn fnv1a(&self) -> u64 {
		self.iter().fold(FNV_OFFSET, |hash, &byte| (hash ^ byte as u64).wrapping_mul(FNV_PRIME))
	}
}

impl FnvHash for [u32] {
	fn fnv1a(&self) -> u64 {
		self.iter().fold(FNV_OFFSET, |hash, &id| (hash ^ id as u64).wrapping_mul(FNV_PRIME))
	}
}

impl<T: FnvHash + ?Sized> FnvHash for &T {
	fn fnv1a(&self) -> u64 {
		(**self).fnv1a()
	}
}

impl<T: FnvHash + ?Sized> FnvHash for Box<T> {
	fn fnv1a(&self) -> u64 {
		(**self).fnv1a()
	}
}

/// One table slot. Occupied slots are never removed.
#[derive(Clone, Debug)]
enum Slot<K, V> {
	Empty,
	Occupied { hash: u64, key: K, value: V },
}

/// Open-addressing hash table with linear probing.
///
/// # Responsibilities
/// - Store each distinct key once, with the value given at first insertion
/// - Look keys up without mutating anything
/// - Grow (double and rehash) before the load factor passes 0.80
///
/// # Invariants
/// - `len <= capacity * 0.80` after every operation
/// - Every key ever inserted is retrievable with its original value
/// - A resize is all or nothing: the new slot array is fully built before
///   it replaces the old one
#[derive(Clone, Debug)]
pub struct HashTable<K, V> {
	slots: Vec<Slot<K, V>>,
	len: usize,
	resizes: usize,
}

impl<K, V> HashTable<K, V>
where
	K: FnvHash + Eq,
{
	/// Creates a table with `capacity` empty slots (at least one).
	///
	/// # Errors
	/// Returns `AllocationFailure` if the slots cannot be allocated.
	pub fn with_capacity(capacity: usize) -> Result<Self, BuildError> {
		Ok(Self { slots: Self::empty_slots(capacity.max(1))?, len: 0, resizes: 0 })
	}

	/// Creates a table with [`DEFAULT_CAPACITY`] slots.
	pub fn new() -> Result<Self, BuildError> {
		Self::with_capacity(DEFAULT_CAPACITY)
	}

	fn empty_slots(capacity: usize) -> Result<Vec<Slot<K, V>>, BuildError> {
		let mut slots = Vec::new();
		slots
			.try_reserve_exact(capacity)
			.map_err(|_| BuildError::AllocationFailure { what: "hash table", requested: capacity })?;
		slots.resize_with(capacity, || Slot::Empty);
		Ok(slots)
	}

	/// Number of stored keys.
	pub fn len(&self) -> usize {
		self.len
	}

	pub fn is_empty(&self) -> bool {
		self.len == 0
	}

	/// Number of slots.
	pub fn capacity(&self) -> usize {
		self.slots.len()
	}

	/// How many times the table has grown.
	pub fn resize_count(&self) -> usize {
		self.resizes
	}

	pub fn load_factor(&self) -> f64 {
		self.len as f64 / self.capacity() as f64
	}

	/// Largest number of keys the current slot array may hold.
	fn max_load(&self) -> usize {
		self.capacity() * MAX_LOAD_NUM / MAX_LOAD_DEN
	}

	/// Walks the probe sequence for `key` and returns the index of the
	/// matching slot, or of the first empty slot if the key is absent.
	///
	/// Terminates because the load factor keeps at least one slot empty.
	fn probe<Q>(&self, hash: u64, key: &Q) -> usize
	where
		K: Borrow<Q>,
		Q: Eq + ?Sized,
	{
		let capacity = self.capacity();
		let mut index = (hash % capacity as u64) as usize;
		loop {
			match &self.slots[index] {
				Slot::Empty => return index,
				Slot::Occupied { hash: h, key: k, .. } if *h == hash && <K as Borrow<Q>>::borrow(k) == key => return index,
				Slot::Occupied { .. } => index = (index + 1) % capacity,
			}
		}
	}

	/// Returns the value stored for `key`, or `None` if it was never inserted.
	pub fn get<Q>(&self, key: &Q) -> Option<&V>
	where
		K: Borrow<Q>,
		Q: FnvHash + Eq + ?Sized,
	{
		match &self.slots[self.probe(key.fnv1a(), key)] {
			Slot::Occupied { value, .. } => Some(value),
			Slot::Empty => None,
		}
	}

	pub fn contains_key<Q>(&self, key: &Q) -> bool
	where
		K: Borrow<Q>,
		Q: FnvHash + Eq + ?Sized,
	{
		self.get(key).is_some()
	}

	/// Inserts `key` with `value` unless the key is already present.
	///
	/// Returns `true` if the key already existed; its stored value is left
	/// unchanged and `value` is dropped. Returns `false` if the key is new.
	///
	/// # Errors
	/// Returns `AllocationFailure` if the table must grow and cannot. The
	/// table is unchanged in that case.
	pub fn insert(&mut self, key: K, value: V) -> Result<bool, BuildError> {
		let hash = key.fnv1a();
		let mut index = self.probe(hash, &key);
		if let Slot::Occupied { .. } = self.slots[index] {
			return Ok(true);
		}

		if self.len + 1 > self.max_load() {
			self.grow()?;
			index = self.probe(hash, &key);
		}

		self.slots[index] = Slot::Occupied { hash, key, value };
		self.len += 1;
		Ok(false)
	}

	/// Doubles the capacity and re-inserts every occupied slot.
	fn grow(&mut self) -> Result<(), BuildError> {
		let new_capacity = self
			.capacity()
			.checked_mul(2)
			.ok_or(BuildError::AllocationFailure { what: "hash table", requested: usize::MAX })?;
		let mut slots = Self::empty_slots(new_capacity)?;

		let old = std::mem::take(&mut self.slots);
		for slot in old {
			if let Slot::Occupied { hash, key, value } = slot {
				// Keys are distinct, only an empty slot has to be found
				let mut index = (hash % new_capacity as u64) as usize;
				while let Slot::Occupied { .. } = slots[index] {
					index = (index + 1) % new_capacity;
				}
				slots[index] = Slot::Occupied { hash, key, value };
			}
		}

		self.slots = slots;
		self.resizes += 1;
		log::debug!("hash table resized to {} slots ({} keys)", new_capacity, self.len);
		Ok(())
	}

	/// Iterates over stored `(key, value)` pairs in slot order.
	pub fn iter(&self) -> impl Iterator<Item = (&K, &V)> {
		self.slots.iter().filter_map(|slot| match slot {
			Slot::Occupied { key, value, .. } => Some((key, value)),
			Slot::Empty => None,
		})
	}
}
