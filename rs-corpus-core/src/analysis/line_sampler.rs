use std::io::BufRead;

use log::{debug, warn};
use rand::SeedableRng;
use rand::rngs::StdRng;
use rand::seq::index;
use serde::{Deserialize, Serialize};

use crate::error::{CorpusError, CorpusResult};

/// Sampling request for one named source.
///
/// # Invariants
/// - `fraction` is in `(0, 1]`
/// - `sample_size() == floor(total_lines * fraction)`, so it never exceeds `total_lines`
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
pub struct SampleSpec {
	source_name: String,
	total_lines: usize,
	fraction: f64,
	seed: u64,
}

impl SampleSpec {
	/// Creates a sampling request.
	///
	/// # Errors
	/// Returns `InvalidArgument` if `fraction` is not in `(0, 1]`.
	/// A zero `total_lines` is accepted here but rejected by `draw`.
	pub fn new(source_name: &str, total_lines: usize, fraction: f64, seed: u64) -> CorpusResult<Self> {
		check_fraction(fraction)?;
		Ok(Self { source_name: source_name.to_owned(), total_lines, fraction, seed })
	}

	pub fn source_name(&self) -> &str {
		&self.source_name
	}

	pub fn total_lines(&self) -> usize {
		self.total_lines
	}

	pub fn fraction(&self) -> f64 {
		self.fraction
	}

	pub fn seed(&self) -> u64 {
		self.seed
	}

	/// Number of lines the draw will select.
	pub fn sample_size(&self) -> usize {
		sample_size(self.total_lines, self.fraction)
	}

	/// Draws the line set described by this request.
	pub fn draw(&self) -> CorpusResult<SampledLineSet> {
		debug!(
			"Sampling {} of {} lines from '{}' (seed {})",
			self.sample_size(),
			self.total_lines,
			self.source_name,
			self.seed
		);
		sample(self.total_lines, self.fraction, self.seed)
	}
}

/// Sorted, duplicate-free set of 1-based line indices selected from a source.
///
/// # Invariants
/// - indices are strictly increasing
/// - every index is in `[1, total_lines]`
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq, Eq)]
#[serde(try_from = "RawLineSet")]
pub struct SampledLineSet {
	total_lines: usize,
	indices: Vec<usize>,
}

/// Unchecked wire form, only turned into a `SampledLineSet` through `from_indices`.
#[derive(Deserialize)]
struct RawLineSet {
	total_lines: usize,
	indices: Vec<usize>,
}

impl TryFrom<RawLineSet> for SampledLineSet {
	type Error = CorpusError;

	fn try_from(raw: RawLineSet) -> CorpusResult<Self> {
		Self::from_indices(raw.total_lines, raw.indices)
	}
}

impl SampledLineSet {
	/// Builds a set from explicit 1-based indices.
	///
	/// # Errors
	/// Returns `InvalidArgument` if the indices are not strictly increasing
	/// or fall outside `[1, total_lines]`.
	pub fn from_indices(total_lines: usize, indices: Vec<usize>) -> CorpusResult<Self> {
		if indices.windows(2).any(|pair| pair[0] >= pair[1]) {
			return Err(CorpusError::invalid("line indices must be strictly increasing"));
		}
		if let (Some(&first), Some(&last)) = (indices.first(), indices.last()) {
			if first == 0 || last > total_lines {
				return Err(CorpusError::invalid(format!(
					"line indices must be within [1, {}], got [{}, {}]",
					total_lines, first, last
				)));
			}
		}
		Ok(Self { total_lines, indices })
	}

	/// Line count of the source this set was drawn for.
	pub fn total_lines(&self) -> usize {
		self.total_lines
	}

	pub fn indices(&self) -> &[usize] {
		&self.indices
	}

	pub fn len(&self) -> usize {
		self.indices.len()
	}

	pub fn is_empty(&self) -> bool {
		self.indices.is_empty()
	}

	pub fn contains(&self, line: usize) -> bool {
		self.indices.binary_search(&line).is_ok()
	}

	pub fn iter(&self) -> impl Iterator<Item = usize> + '_ {
		self.indices.iter().copied()
	}
}

pub(crate) fn check_fraction(fraction: f64) -> CorpusResult<()> {
	// `!(a && b)` also rejects NaN
	if !(fraction > 0.0 && fraction <= 1.0) {
		return Err(CorpusError::invalid(format!("fraction must be in (0, 1], got {}", fraction)));
	}
	Ok(())
}

fn sample_size(total_lines: usize, fraction: f64) -> usize {
	let size = (total_lines as f64 * fraction).floor() as usize;
	size.min(total_lines)
}

/// Selects `floor(total_lines * fraction)` distinct line indices uniformly
/// from `[1, total_lines]`.
///
/// The draw only depends on its three arguments: the same call always
/// returns the same set.
///
/// # Errors
/// Returns `InvalidArgument` if `total_lines` is 0 or `fraction` is not in `(0, 1]`.
pub fn sample(total_lines: usize, fraction: f64, seed: u64) -> CorpusResult<SampledLineSet> {
	if total_lines == 0 {
		return Err(CorpusError::invalid("total_lines must be > 0"));
	}
	check_fraction(fraction)?;

	let amount = sample_size(total_lines, fraction);
	let mut rng = StdRng::seed_from_u64(seed);

	// Zero-based draw shifted to 1-based line numbers
	let mut indices: Vec<usize> = index::sample(&mut rng, total_lines, amount).into_iter().map(|i| i + 1).collect();
	indices.sort_unstable();

	Ok(SampledLineSet { total_lines, indices })
}

/// Lazy single-pass reader yielding the selected lines of a source in file order.
///
/// Unselected lines are read and discarded, never buffered. Once every
/// selected line has been yielded the iterator stops without reading the
/// rest of the stream.
///
/// Yields `Err(TruncatedSource)` once, then stops, if the stream ends early.
pub struct LineExtractor<'a, R: BufRead> {
	reader: R,
	source_name: String,
	wanted: std::slice::Iter<'a, usize>,
	total_lines: usize,
	current_line: usize,
	buffer: Vec<u8>,
	done: bool,
}

impl<'a, R: BufRead> LineExtractor<'a, R> {
	pub fn new(reader: R, line_set: &'a SampledLineSet) -> Self {
		Self::named(reader, line_set, "<stream>")
	}

	/// Same as `new`, with a source name used in error reports.
	pub fn named(reader: R, line_set: &'a SampledLineSet, source_name: &str) -> Self {
		Self {
			reader,
			source_name: source_name.to_owned(),
			wanted: line_set.indices.iter(),
			total_lines: line_set.total_lines,
			current_line: 0,
			buffer: Vec::new(),
			done: false,
		}
	}

	/// Reads the next raw line into `self.buffer`. Returns `false` at end of stream.
	fn advance(&mut self) -> std::io::Result<bool> {
		self.buffer.clear();
		let read = self.reader.read_until(b'\n', &mut self.buffer)?;
		if read == 0 {
			return Ok(false);
		}
		self.current_line += 1;
		Ok(true)
	}

	fn current_text(&self) -> String {
		let mut end = self.buffer.len();
		if end > 0 && self.buffer[end - 1] == b'\n' {
			end -= 1;
			if end > 0 && self.buffer[end - 1] == b'\r' {
				end -= 1;
			}
		}
		String::from_utf8_lossy(&self.buffer[..end]).into_owned()
	}
}

impl<R: BufRead> Iterator for LineExtractor<'_, R> {
	type Item = CorpusResult<String>;

	fn next(&mut self) -> Option<Self::Item> {
		if self.done {
			return None;
		}
		let Some(&target) = self.wanted.next() else {
			self.done = true;
			return None;
		};

		while self.current_line < target {
			match self.advance() {
				Ok(true) => {}
				Ok(false) => {
					self.done = true;
					warn!(
						"Source '{}' ended at line {} while line {} was requested",
						self.source_name, self.current_line, target
					);
					return Some(Err(CorpusError::TruncatedSource {
						source_name: self.source_name.clone(),
						expected: self.total_lines,
						found: self.current_line,
					}));
				}
				Err(e) => {
					self.done = true;
					return Some(Err(e.into()));
				}
			}
		}

		Some(Ok(self.current_text()))
	}
}

/// Extracts the selected lines from `source` in one forward pass.
///
/// # Errors
/// - `TruncatedSource` if the stream has fewer lines than the last selected index
/// - `Io` if reading fails
///
/// On error no line is returned.
pub fn extract<R: BufRead>(source: R, line_set: &SampledLineSet) -> CorpusResult<Vec<String>> {
	LineExtractor::new(source, line_set).collect()
}

/// Same as `extract`, naming the source in error reports.
pub fn extract_named<R: BufRead>(source: R, line_set: &SampledLineSet, source_name: &str) -> CorpusResult<Vec<String>> {
	LineExtractor::named(source, line_set, source_name).collect()
}
