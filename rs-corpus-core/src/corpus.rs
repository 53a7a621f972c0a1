use std::collections::BTreeMap;
use std::fs::File;
use std::io::BufReader;
use std::path::{Path, PathBuf};

use log::{debug, info};

use crate::error::{CorpusError, CorpusResult};
use crate::io;

/// One line-oriented text file of a corpus.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct CorpusSource {
	name: String,
	path: PathBuf,
	total_lines: usize,
}

impl CorpusSource {
	/// Opens a source and counts its lines in one streaming pass.
	pub fn open<P: AsRef<Path>>(name: &str, path: P) -> CorpusResult<Self> {
		let path = path.as_ref().to_path_buf();
		let total_lines = io::count_lines(io::open_reader(&path)?)?;
		debug!("Source '{}' ({}) has {} lines", name, path.display(), total_lines);
		Ok(Self { name: name.to_owned(), path, total_lines })
	}

	pub fn name(&self) -> &str {
		&self.name
	}

	pub fn path(&self) -> &Path {
		&self.path
	}

	pub fn total_lines(&self) -> usize {
		self.total_lines
	}

	/// Fresh reader positioned at the first line.
	pub fn reader(&self) -> CorpusResult<BufReader<File>> {
		Ok(io::open_reader(&self.path)?)
	}
}

/// Named collection of text sources.
///
/// # Responsibilities
/// - Discover sources (a directory scan or an explicit list)
/// - Record each source's line count
/// - Hand out readers for sampling
///
/// No file stays open between calls: each `reader` opens its own handle.
#[derive(Clone, Debug)]
pub struct Corpus {
	sources: BTreeMap<String, CorpusSource>,
}

impl Corpus {
	/// Opens every file with `extension` directly inside `folder`.
	///
	/// Sources are named after their file stem (`en_US.blogs.txt` → `en_US.blogs`).
	///
	/// # Errors
	/// - `InvalidArgument` if `folder` is not a directory
	/// - `EmptyCorpus` if no file matches
	pub fn open<P: AsRef<Path>>(folder: P, extension: &str) -> CorpusResult<Self> {
		let folder = io::resolve_folder(folder.as_ref());

		if !folder.is_dir() {
			return Err(CorpusError::invalid(format!("Expected a directory, got: {}", folder.display())));
		}

		let corpus = Self::from_paths(io::list_files(&folder, extension)?)?;
		info!("Opened corpus {} with {} sources", folder.display(), corpus.len());
		Ok(corpus)
	}

	/// Opens an explicit list of files, each named after its file stem.
	///
	/// # Errors
	/// - `EmptyCorpus` if `paths` is empty
	/// - `InvalidArgument` if two paths share a name
	pub fn from_paths<I, P>(paths: I) -> CorpusResult<Self>
	where
		I: IntoIterator<Item = P>,
		P: AsRef<Path>,
	{
		let mut sources = BTreeMap::new();
		for path in paths {
			let name = io::source_name(&path)?;
			if sources.contains_key(&name) {
				return Err(CorpusError::invalid(format!("Source '{}' already loaded", name)));
			}
			let source = CorpusSource::open(&name, &path)?;
			sources.insert(name, source);
		}

		if sources.is_empty() {
			return Err(CorpusError::EmptyCorpus);
		}
		Ok(Self { sources })
	}

	/// Source names, sorted.
	pub fn names(&self) -> Vec<String> {
		self.sources.keys().cloned().collect()
	}

	pub fn get(&self, name: &str) -> Option<&CorpusSource> {
		self.sources.get(name)
	}

	/// Line count of `name`.
	///
	/// # Errors
	/// Returns `InvalidArgument` if the source is unknown.
	pub fn total_lines(&self, name: &str) -> CorpusResult<usize> {
		Ok(self.source(name)?.total_lines())
	}

	/// Fresh reader over `name`.
	///
	/// # Errors
	/// Returns `InvalidArgument` if the source is unknown, `Io` if it cannot be opened.
	pub fn reader(&self, name: &str) -> CorpusResult<BufReader<File>> {
		self.source(name)?.reader()
	}

	pub fn sources(&self) -> impl Iterator<Item = &CorpusSource> {
		self.sources.values()
	}

	pub fn len(&self) -> usize {
		self.sources.len()
	}

	pub fn is_empty(&self) -> bool {
		self.sources.is_empty()
	}

	fn source(&self, name: &str) -> CorpusResult<&CorpusSource> {
		self.sources
			.get(name)
			.ok_or_else(|| CorpusError::invalid(format!("Unknown source '{}'", name)))
	}
}
