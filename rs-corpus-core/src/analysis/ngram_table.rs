use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use crate::error::{CorpusError, CorpusResult};

/// Separator placed between the tokens of an n-gram key.
///
/// Cleaned tokens never contain whitespace, so keys stay unambiguous.
pub const NGRAM_DELIMITER: char = ' ';

/// Frequency table of the n-grams of a fixed order `n`.
///
/// # Responsibilities
/// - Count n-grams of one line of tokens with a stride-1 sliding window
/// - Merge with another table of the same order
/// - Expose counts for aggregation and presentation
///
/// # Invariants
/// - `n` is always >= 1
/// - every key holds exactly `n` tokens joined by `NGRAM_DELIMITER`
/// - every stored count is >= 1
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq, Eq)]
pub struct NGramTable {
	/// Order of the table (number of tokens per n-gram)
	n: usize,

	/// N-gram key to occurrence count
	counts: HashMap<String, u64>,
}

impl NGramTable {
	/// Creates an empty table of order `n`.
	///
	/// # Errors
	/// Returns `InvalidArgument` if `n < 1`.
	pub fn new(n: usize) -> CorpusResult<Self> {
		if n < 1 {
			return Err(CorpusError::invalid("n must be >= 1"));
		}
		Ok(Self { n, counts: HashMap::new() })
	}

	pub fn order(&self) -> usize {
		self.n
	}

	/// Counts every window of one line of tokens.
	///
	/// Lines shorter than `n` add nothing. Callers pass one line at a time
	/// so that no n-gram spans two lines.
	pub fn add_tokens<S: AsRef<str>>(&mut self, tokens: &[S]) {
		if tokens.len() < self.n {
			return;
		}

		let mut key = String::new();
		for window in tokens.windows(self.n) {
			key.clear();
			for (i, token) in window.iter().enumerate() {
				if i > 0 {
					key.push(NGRAM_DELIMITER);
				}
				key.push_str(token.as_ref());
			}

			// Avoid allocating a new key when the n-gram is already known
			if let Some(count) = self.counts.get_mut(key.as_str()) {
				*count += 1;
			} else {
				self.counts.insert(key.clone(), 1);
			}
		}
	}

	/// Adds `occurrences` to a single key.
	///
	/// # Errors
	/// Returns `InvalidArgument` unless the key is exactly `n` non-empty
	/// tokens separated by single delimiters.
	pub fn insert(&mut self, ngram: &str, occurrences: u64) -> CorpusResult<()> {
		if ngram.split(NGRAM_DELIMITER).any(str::is_empty) {
			return Err(CorpusError::invalid(format!("'{}' has an empty token", ngram)));
		}
		let tokens = ngram.split(NGRAM_DELIMITER).count();
		if tokens != self.n {
			return Err(CorpusError::invalid(format!(
				"'{}' holds {} tokens, table order is {}",
				ngram, tokens, self.n
			)));
		}
		if occurrences > 0 {
			*self.counts.entry(ngram.to_owned()).or_insert(0) += occurrences;
		}
		Ok(())
	}

	/// Merges another table into this one, summing counts of identical keys.
	///
	/// # Errors
	/// Returns `InvalidArgument` if the orders do not match.
	pub fn merge(&mut self, other: &Self) -> CorpusResult<()> {
		if self.n != other.n {
			return Err(CorpusError::invalid(format!("order mismatch: {} vs {}", self.n, other.n)));
		}

		for (key, occurrences) in &other.counts {
			if let Some(existing) = self.counts.get_mut(key) {
				*existing += occurrences;
			} else {
				self.counts.insert(key.clone(), *occurrences);
			}
		}

		Ok(())
	}

	/// Value form of `merge`: returns a new table, leaving both inputs untouched.
	pub fn merged(&self, other: &Self) -> CorpusResult<Self> {
		let mut out = self.clone();
		out.merge(other)?;
		Ok(out)
	}

	/// Occurrences of `ngram` (0 when absent).
	pub fn get(&self, ngram: &str) -> u64 {
		self.counts.get(ngram).copied().unwrap_or(0)
	}

	/// Number of distinct n-grams.
	pub fn len(&self) -> usize {
		self.counts.len()
	}

	pub fn is_empty(&self) -> bool {
		self.counts.is_empty()
	}

	/// Sum of all counts.
	pub fn total(&self) -> u64 {
		self.counts.values().sum()
	}

	pub fn iter(&self) -> impl Iterator<Item = (&str, u64)> {
		self.counts.iter().map(|(k, v)| (k.as_str(), *v))
	}

	/// The `k` most frequent n-grams, highest count first, ties by key.
	pub fn most_common(&self, k: usize) -> Vec<(&str, u64)> {
		let mut entries: Vec<(&str, u64)> = self.iter().collect();
		entries.sort_unstable_by(|a, b| b.1.cmp(&a.1).then_with(|| a.0.cmp(b.0)));
		entries.truncate(k);
		entries
	}
}

/// Counts the n-grams of one token sequence.
///
/// # Errors
/// Returns `InvalidArgument` if `n < 1`. A sequence shorter than `n` gives
/// an empty table.
pub fn count<S: AsRef<str>>(tokens: &[S], n: usize) -> CorpusResult<NGramTable> {
	let mut table = NGramTable::new(n)?;
	table.add_tokens(tokens);
	Ok(table)
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn insert_checks_arity() {
		let mut table = NGramTable::new(2).unwrap();
		assert!(table.insert("a b", 3).is_ok());
		assert!(table.insert("a", 1).is_err());
		assert_eq!(table.get("a b"), 3);
	}

	#[test]
	fn insert_rejects_empty_tokens() {
		let mut table = NGramTable::new(2).unwrap();
		for key in ["a  b", " a b", "a b ", " ", ""] {
			assert!(table.insert(key, 1).is_err(), "{:?} was accepted", key);
		}
		assert!(table.is_empty());

		let mut unigrams = NGramTable::new(1).unwrap();
		assert!(unigrams.insert("", 1).is_err());
		assert!(unigrams.insert("a", 1).is_ok());
	}

	#[test]
	fn insert_zero_is_noop() {
		let mut table = NGramTable::new(1).unwrap();
		table.insert("a", 0).unwrap();
		assert!(table.is_empty());
	}
}
