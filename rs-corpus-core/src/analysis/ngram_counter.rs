use std::collections::{BTreeMap, BTreeSet};
use std::sync::{Arc, mpsc};
use std::thread;

use log::debug;
use serde::{Deserialize, Serialize};

use super::ngram_table::NGramTable;
use super::tokenizer::Cleaner;
use crate::error::{CorpusError, CorpusResult};

/// Number of chunks per CPU when counting in parallel.
const CHUNKS_PER_CPU: usize = 8;

/// Multi-order n-gram counter.
///
/// Keeps one `NGramTable` per configured order and feeds every one of them
/// with each line's tokens.
///
/// # Invariants
/// - `tables` holds exactly one table per order, all orders >= 1
/// - `lines` and `tokens` count what was fed, blank lines included in `lines`
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
pub struct NGramCounter {
	tables: BTreeMap<usize, NGramTable>,
	lines: u64,
	tokens: u64,
}

impl NGramCounter {
	/// Creates a counter for the given orders.
	///
	/// # Errors
	/// Returns `InvalidArgument` if `orders` is empty or holds a 0.
	pub fn new(orders: &BTreeSet<usize>) -> CorpusResult<Self> {
		if orders.is_empty() {
			return Err(CorpusError::invalid("at least one n-gram order is required"));
		}
		let mut tables = BTreeMap::new();
		for &n in orders {
			tables.insert(n, NGramTable::new(n)?);
		}
		Ok(Self { tables, lines: 0, tokens: 0 })
	}

	/// Orders this counter tracks, ascending.
	pub fn orders(&self) -> impl Iterator<Item = usize> + '_ {
		self.tables.keys().copied()
	}

	/// Feeds the tokens of one line into every table.
	pub fn add_line<S: AsRef<str>>(&mut self, tokens: &[S]) {
		self.lines += 1;
		self.tokens += tokens.len() as u64;
		for table in self.tables.values_mut() {
			table.add_tokens(tokens);
		}
	}

	/// Cleans then counts a raw text line.
	pub fn add_text(&mut self, cleaner: &Cleaner, line: &str) {
		let tokens = cleaner.clean(line);
		self.add_line(&tokens);
	}

	pub fn table(&self, n: usize) -> Option<&NGramTable> {
		self.tables.get(&n)
	}

	/// Lines fed so far.
	pub fn lines(&self) -> u64 {
		self.lines
	}

	/// Tokens fed so far.
	pub fn tokens(&self) -> u64 {
		self.tokens
	}

	/// Merges another counter tracking the same orders.
	///
	/// # Errors
	/// Returns `InvalidArgument` if the order sets differ.
	pub fn merge(&mut self, other: &Self) -> CorpusResult<()> {
		if !self.tables.keys().eq(other.tables.keys()) {
			return Err(CorpusError::invalid("n-gram order sets do not match"));
		}
		for (n, table) in &other.tables {
			if let Some(existing) = self.tables.get_mut(n) {
				existing.merge(table)?;
			}
		}
		self.lines += other.lines;
		self.tokens += other.tokens;
		Ok(())
	}

	pub fn into_tables(self) -> BTreeMap<usize, NGramTable> {
		self.tables
	}

	/// Cleans and counts `lines` one after the other.
	pub fn count_lines<S: AsRef<str>>(orders: &BTreeSet<usize>, cleaner: &Cleaner, lines: &[S]) -> CorpusResult<Self> {
		let mut counter = Self::new(orders)?;
		for line in lines {
			counter.add_text(cleaner, line.as_ref());
		}
		Ok(counter)
	}

	/// Cleans and counts `lines` on worker threads, then merges the partial counters.
	///
	/// # Behavior
	/// - Splits lines into `num_cpus * CHUNKS_PER_CPU` chunks
	/// - Spawns one thread per chunk, each building a partial counter
	/// - Collects partial counters through a channel and merges them once
	///   every sender is gone
	///
	/// Merging is associative and commutative, so the result equals
	/// `count_lines` on the same input whatever the completion order.
	pub fn count_lines_parallel(orders: &BTreeSet<usize>, cleaner: Arc<Cleaner>, lines: &[String]) -> CorpusResult<Self> {
		let mut final_counter = Self::new(orders)?;
		if lines.is_empty() {
			return Ok(final_counter);
		}

		let chunks = num_cpus::get() * CHUNKS_PER_CPU;
		let chunk_size = lines.len().div_ceil(chunks);
		debug!("Counting {} lines in chunks of {}", lines.len(), chunk_size);

		let (tx, rx) = mpsc::channel();
		for chunk in lines.chunks(chunk_size) {
			let tx = tx.clone();
			let chunk: Vec<String> = chunk.to_vec();
			let cleaner = Arc::clone(&cleaner);
			let mut partial = final_counter.clone();

			thread::spawn(move || {
				for line in &chunk {
					partial.add_text(&cleaner, line);
				}
				// Receiver lives until the last chunk is in
				let _ = tx.send(partial);
			});
		}
		drop(tx);

		let mut received = 0;
		for partial in rx.iter() {
			final_counter.merge(&partial)?;
			received += 1;
		}
		if received != lines.len().div_ceil(chunk_size) {
			return Err(CorpusError::Worker("a counting thread stopped before finishing its chunk".to_owned()));
		}

		Ok(final_counter)
	}
}
