use std::collections::{BTreeMap, HashMap};

use log::debug;
use serde::{Deserialize, Serialize};

use super::ngram_table::NGramTable;
use crate::error::{CorpusError, CorpusResult};

/// Full outer join of same-order tables from several sources.
///
/// Built once, then thresholded as many times as needed with `apply`.
/// An n-gram absent from a source counts as 0 for that source.
#[derive(Clone, Debug)]
pub struct FrequencyJoin {
	order: usize,
	sources: Vec<String>,
	/// N-gram to one count per source, in `sources` order
	rows: HashMap<String, Vec<u64>>,
}

impl FrequencyJoin {
	/// Joins every table over their n-gram keys.
	///
	/// # Errors
	/// - `EmptyCorpus` if `tables` is empty
	/// - `InvalidArgument` if the tables do not share the same order
	pub fn new(tables: &BTreeMap<String, NGramTable>) -> CorpusResult<Self> {
		let order = match tables.values().next() {
			Some(table) => table.order(),
			None => return Err(CorpusError::EmptyCorpus),
		};
		if let Some((name, table)) = tables.iter().find(|(_, t)| t.order() != order) {
			return Err(CorpusError::invalid(format!(
				"source '{}' holds {}-grams, expected {}-grams",
				name,
				table.order(),
				order
			)));
		}

		let sources: Vec<String> = tables.keys().cloned().collect();
		let width = sources.len();
		let mut rows: HashMap<String, Vec<u64>> = HashMap::new();
		for (column, table) in tables.values().enumerate() {
			for (ngram, occurrences) in table.iter() {
				let row = rows.entry(ngram.to_owned()).or_insert_with(|| vec![0; width]);
				row[column] = occurrences;
			}
		}

		debug!("Joined {} distinct {}-grams over {} sources", rows.len(), order, width);
		Ok(Self { order, sources, rows })
	}

	pub fn order(&self) -> usize {
		self.order
	}

	pub fn sources(&self) -> &[String] {
		&self.sources
	}

	/// Distinct n-grams over all sources.
	pub fn len(&self) -> usize {
		self.rows.len()
	}

	pub fn is_empty(&self) -> bool {
		self.rows.is_empty()
	}

	/// Keeps the n-grams whose count is strictly greater than `threshold` in every source.
	pub fn apply(&self, threshold: u64) -> AggregatedFrequencyView {
		let rows: HashMap<String, BTreeMap<String, u64>> = self
			.rows
			.iter()
			.filter(|(_, counts)| counts.iter().all(|&c| c > threshold))
			.map(|(ngram, counts)| {
				let per_source: BTreeMap<String, u64> = self.sources.iter().cloned().zip(counts.iter().copied()).collect();
				(ngram.clone(), per_source)
			})
			.collect();

		debug!(
			"Threshold {} keeps {} of {} {}-grams",
			threshold,
			rows.len(),
			self.rows.len(),
			self.order
		);
		AggregatedFrequencyView { order: self.order, threshold, sources: self.sources.clone(), rows }
	}
}

/// Joined frequency view: one row per n-gram, one count per source.
///
/// Only holds n-grams frequent enough in every source. Read-only; a new
/// threshold means a new view. Row order is unspecified, use `sorted_rows`
/// for presentation.
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq, Eq)]
pub struct AggregatedFrequencyView {
	order: usize,
	threshold: u64,
	sources: Vec<String>,
	rows: HashMap<String, BTreeMap<String, u64>>,
}

impl AggregatedFrequencyView {
	pub fn order(&self) -> usize {
		self.order
	}

	pub fn threshold(&self) -> u64 {
		self.threshold
	}

	/// Source names, sorted.
	pub fn sources(&self) -> &[String] {
		&self.sources
	}

	/// Per-source counts of `ngram`, if it passed the threshold.
	pub fn get(&self, ngram: &str) -> Option<&BTreeMap<String, u64>> {
		self.rows.get(ngram)
	}

	pub fn contains(&self, ngram: &str) -> bool {
		self.rows.contains_key(ngram)
	}

	pub fn len(&self) -> usize {
		self.rows.len()
	}

	pub fn is_empty(&self) -> bool {
		self.rows.is_empty()
	}

	/// Sum of the counts of `ngram` over all sources (0 when filtered out).
	pub fn total(&self, ngram: &str) -> u64 {
		self.rows.get(ngram).map_or(0, |counts| counts.values().sum())
	}

	pub fn iter(&self) -> impl Iterator<Item = (&str, &BTreeMap<String, u64>)> {
		self.rows.iter().map(|(k, v)| (k.as_str(), v))
	}

	/// Rows ordered by total count (highest first), ties by n-gram.
	pub fn sorted_rows(&self) -> Vec<(&str, &BTreeMap<String, u64>)> {
		let mut rows: Vec<(&str, &BTreeMap<String, u64>, u64)> =
			self.iter().map(|(ngram, counts)| (ngram, counts, counts.values().sum())).collect();
		rows.sort_unstable_by(|a, b| b.2.cmp(&a.2).then_with(|| a.0.cmp(b.0)));
		rows.into_iter().map(|(ngram, counts, _)| (ngram, counts)).collect()
	}
}

/// Joins the tables of every source and keeps the n-grams whose count
/// exceeds `threshold` everywhere.
///
/// # Errors
/// - `EmptyCorpus` if `tables` is empty
/// - `InvalidArgument` if the tables do not share the same order
pub fn aggregate(tables: &BTreeMap<String, NGramTable>, threshold: u64) -> CorpusResult<AggregatedFrequencyView> {
	Ok(FrequencyJoin::new(tables)?.apply(threshold))
}
