use std::fs::File;
use std::path::Path;

use memmap2::Mmap;

use crate::error::BuildError;

/// Anything able to hand out one immutable byte buffer for a whole build.
///
/// Every token view produced from the buffer borrows it, so the source
/// must outlive the model built from it.
pub trait ByteSource {
	/// The whole corpus.
	fn bytes(&self) -> &[u8];

	fn len(&self) -> usize {
		self.bytes().len()
	}

	fn is_empty(&self) -> bool {
		self.bytes().is_empty()
	}
}

impl ByteSource for [u8] {
	fn bytes(&self) -> &[u8] {
		self
	}
}

impl ByteSource for Vec<u8> {
	fn bytes(&self) -> &[u8] {
		self
	}
}

impl ByteSource for str {
	fn bytes(&self) -> &[u8] {
		self.as_bytes()
	}
}

impl ByteSource for String {
	fn bytes(&self) -> &[u8] {
		self.as_bytes()
	}
}

/// A read-only, memory-mapped corpus file.
///
/// - Maps the whole file at once
/// - An empty file is not mapped (mapping zero bytes fails on most
///   platforms) and yields an empty buffer
#[derive(Debug)]
pub struct MappedCorpus {
	map: Option<Mmap>,
}

impl MappedCorpus {
	/// Opens and maps `path`.
	///
	/// # Errors
	/// Returns `BuildError::Io` if the file cannot be opened, queried or mapped.
	pub fn open<P: AsRef<Path>>(path: P) -> Result<Self, BuildError> {
		let file = File::open(path.as_ref())?;
		let size = file.metadata()?.len();
		if size == 0 {
			return Ok(Self { map: None });
		}

		// SAFETY: the mapping is read-only and lives as long as `Self`.
		// Truncating the file from another process while it is mapped is
		// outside what this type can guard against.
		let map = unsafe { Mmap::map(&file)? };
		log::debug!("mapped {} bytes from {}", size, path.as_ref().display());
		Ok(Self { map: Some(map) })
	}
}

impl ByteSource for MappedCorpus {
	fn bytes(&self) -> &[u8] {
		match &self.map {
			Some(map) => map,
			None => &[],
		}
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use std::io::Write;

	fn temp_path(name: &str) -> std::path::PathBuf {
		std::env::temp_dir().join(format!("rs-slm-{}-{}", std::process::id(), name))
	}

	#[test]
	fn test_in_memory_sources() {
		assert_eq!(ByteSource::len("ab c"), 4);
		assert!(ByteSource::is_empty(&Vec::<u8>::new()));
		assert_eq!(ByteSource::bytes(&String::from("x")), b"x");
	}

	#[test]
	fn test_mapped_corpus_reads_file() {
		let path = temp_path("mapped.txt");
		let mut file = File::create(&path).unwrap();
		file.write_all(b"the cat\nsat").unwrap();
		drop(file);

		let corpus = MappedCorpus::open(&path).unwrap();
		assert_eq!(corpus.bytes(), b"the cat\nsat");
		assert_eq!(corpus.len(), 11);

		std::fs::remove_file(path).unwrap();
	}

	#[test]
	fn test_mapped_corpus_empty_file() {
		let path = temp_path("empty.txt");
		File::create(&path).unwrap();

		let corpus = MappedCorpus::open(&path).unwrap();
		assert!(corpus.is_empty());

		std::fs::remove_file(path).unwrap();
	}

	#[test]
	fn test_mapped_corpus_missing_file() {
		assert!(matches!(MappedCorpus::open(temp_path("does-not-exist")), Err(BuildError::Io(_))));
	}
}
