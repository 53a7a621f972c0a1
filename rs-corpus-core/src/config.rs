use std::collections::BTreeSet;
use std::fs::File;
use std::io::BufReader;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::analysis::line_sampler::check_fraction;
use crate::analysis::tokenizer::Stemming;
use crate::error::{CorpusError, CorpusResult};

/// Parameters of a corpus analysis run.
///
/// # Fields
/// - `fraction`: share of each source's lines to sample, in `(0, 1]`
/// - `seed`: sampling seed, the same seed always selects the same lines
/// - `ngram_orders`: n-gram orders to count, every order >= 1
/// - `stemming`: token stemming mode
/// - `threshold`: minimum count (exclusive) an n-gram needs in every source
///   to be kept by aggregation
/// - `parallel`: count each source's lines on worker threads
///
/// Missing JSON fields take their default value.
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
#[serde(default)]
pub struct AnalysisConfig {
	fraction: f64,
	pub seed: u64,
	ngram_orders: BTreeSet<usize>,
	pub stemming: Stemming,
	pub threshold: u64,
	pub parallel: bool,
}

impl Default for AnalysisConfig {
	fn default() -> Self {
		Self {
			fraction: 0.01,
			seed: 1234,
			ngram_orders: BTreeSet::from([1, 2, 3, 4]),
			stemming: Stemming::None,
			threshold: 0,
			parallel: false,
		}
	}
}

impl AnalysisConfig {
	/// Loads a configuration from a JSON file and validates it.
	pub fn from_json_file<P: AsRef<Path>>(path: P) -> CorpusResult<Self> {
		let reader = BufReader::new(File::open(path)?);
		let config: Self = serde_json::from_reader(reader)?;
		config.validate()?;
		Ok(config)
	}

	/// Parses a configuration from a JSON string and validates it.
	pub fn from_json_str(json: &str) -> CorpusResult<Self> {
		let config: Self = serde_json::from_str(json)?;
		config.validate()?;
		Ok(config)
	}

	pub fn to_json(&self) -> CorpusResult<String> {
		Ok(serde_json::to_string_pretty(self)?)
	}

	/// Checks every field against its domain.
	pub fn validate(&self) -> CorpusResult<()> {
		check_fraction(self.fraction)?;
		check_orders(&self.ngram_orders)
	}

	pub fn fraction(&self) -> f64 {
		self.fraction
	}

	pub fn ngram_orders(&self) -> &BTreeSet<usize> {
		&self.ngram_orders
	}

	/// Sets the sampled fraction.
	///
	/// # Errors
	/// Returns `InvalidArgument` if the value is outside `(0, 1]`.
	pub fn set_fraction(&mut self, fraction: f64) -> CorpusResult<()> {
		check_fraction(fraction)?;
		self.fraction = fraction;
		Ok(())
	}

	/// Sets the n-gram orders to count.
	///
	/// # Errors
	/// Returns `InvalidArgument` if `orders` is empty or holds a 0.
	pub fn set_ngram_orders<I: IntoIterator<Item = usize>>(&mut self, orders: I) -> CorpusResult<()> {
		let orders: BTreeSet<usize> = orders.into_iter().collect();
		check_orders(&orders)?;
		self.ngram_orders = orders;
		Ok(())
	}
}

fn check_orders(orders: &BTreeSet<usize>) -> CorpusResult<()> {
	if orders.is_empty() {
		return Err(CorpusError::invalid("at least one n-gram order is required"));
	}
	if orders.contains(&0) {
		return Err(CorpusError::invalid("n-gram orders must be >= 1"));
	}
	Ok(())
}
