use std::collections::BTreeMap;
use std::sync::Arc;

use log::{info, warn};
use serde::{Deserialize, Serialize};

use crate::analysis::aggregator::{AggregatedFrequencyView, FrequencyJoin};
use crate::analysis::line_sampler::{LineExtractor, SampleSpec};
use crate::analysis::ngram_counter::NGramCounter;
use crate::analysis::ngram_table::NGramTable;
use crate::analysis::tokenizer::Cleaner;
use crate::config::AnalysisConfig;
use crate::corpus::Corpus;
use crate::error::{CorpusError, CorpusResult};

/// What was read and counted for one source.
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq, Eq)]
pub struct SourceSummary {
	pub name: String,
	pub total_lines: usize,
	pub sampled_lines: usize,
	pub tokens: u64,
	/// Distinct n-grams per order
	pub distinct: BTreeMap<usize, usize>,
}

/// Result of a run: per-source summaries and tables indexed by order then source.
#[derive(Serialize, Deserialize, Clone, Debug)]
pub struct CorpusAnalysis {
	config: AnalysisConfig,
	summaries: Vec<SourceSummary>,
	tables: BTreeMap<usize, BTreeMap<String, NGramTable>>,
}

impl CorpusAnalysis {
	pub fn config(&self) -> &AnalysisConfig {
		&self.config
	}

	/// One summary per analyzed source, sorted by name.
	pub fn summaries(&self) -> &[SourceSummary] {
		&self.summaries
	}

	/// Tables of order `n`, by source name.
	pub fn tables(&self, n: usize) -> Option<&BTreeMap<String, NGramTable>> {
		self.tables.get(&n)
	}

	pub fn table(&self, n: usize, source: &str) -> Option<&NGramTable> {
		self.tables.get(&n)?.get(source)
	}

	/// Joins the order-`n` tables of every source without filtering.
	///
	/// # Errors
	/// - `InvalidArgument` if `n` was not counted
	/// - `EmptyCorpus` if no source was analyzed
	pub fn join(&self, n: usize) -> CorpusResult<FrequencyJoin> {
		if !self.config.ngram_orders().contains(&n) {
			return Err(CorpusError::invalid(format!("order {} was not counted", n)));
		}
		// Every source may have been skipped as empty
		match self.tables.get(&n) {
			Some(tables) => FrequencyJoin::new(tables),
			None => Err(CorpusError::EmptyCorpus),
		}
	}

	/// Joined view of order `n` keeping n-grams above `threshold` in every source.
	pub fn aggregate(&self, n: usize, threshold: u64) -> CorpusResult<AggregatedFrequencyView> {
		Ok(self.join(n)?.apply(threshold))
	}
}

/// Runs sampling, cleaning and counting over every source of a corpus.
///
/// # Responsibilities
/// - Build one `SampleSpec` per source from the configuration
/// - Extract the sampled lines in a single forward pass per source
/// - Count every configured order, sequentially or on worker threads
/// - Hand the extracted lines to an optional sample writer
#[derive(Debug)]
pub struct CorpusAnalyzer {
	corpus: Corpus,
	config: AnalysisConfig,
	cleaner: Arc<Cleaner>,
}

impl CorpusAnalyzer {
	/// # Errors
	/// Returns `InvalidArgument` if the configuration is invalid.
	pub fn new(corpus: Corpus, config: AnalysisConfig) -> CorpusResult<Self> {
		config.validate()?;
		let cleaner = Arc::new(Cleaner::new(config.stemming));
		Ok(Self { corpus, config, cleaner })
	}

	pub fn corpus(&self) -> &Corpus {
		&self.corpus
	}

	pub fn config(&self) -> &AnalysisConfig {
		&self.config
	}

	/// Samples and counts every source.
	pub fn analyze(&self) -> CorpusResult<CorpusAnalysis> {
		self.analyze_with(|_, _| Ok(()))
	}

	/// Same as `analyze`, calling `on_sample(source, lines)` with each
	/// source's extracted lines before they are counted.
	///
	/// Any error, from a source or from `on_sample`, aborts the whole run.
	pub fn analyze_with<F>(&self, mut on_sample: F) -> CorpusResult<CorpusAnalysis>
	where
		F: FnMut(&str, &[String]) -> CorpusResult<()>,
	{
		let mut summaries = Vec::new();
		let mut tables: BTreeMap<usize, BTreeMap<String, NGramTable>> = BTreeMap::new();

		for source in self.corpus.sources() {
			if source.total_lines() == 0 {
				warn!("Skipping empty source '{}'", source.name());
				continue;
			}

			let spec = SampleSpec::new(source.name(), source.total_lines(), self.config.fraction(), self.config.seed)?;
			let line_set = spec.draw()?;
			let lines: Vec<String> =
				LineExtractor::named(source.reader()?, &line_set, source.name()).collect::<CorpusResult<_>>()?;

			on_sample(source.name(), &lines)?;

			let counter = if self.config.parallel {
				NGramCounter::count_lines_parallel(self.config.ngram_orders(), Arc::clone(&self.cleaner), &lines)?
			} else {
				NGramCounter::count_lines(self.config.ngram_orders(), &self.cleaner, &lines)?
			};

			let summary = SourceSummary {
				name: source.name().to_owned(),
				total_lines: source.total_lines(),
				sampled_lines: lines.len(),
				tokens: counter.tokens(),
				distinct: counter
					.orders()
					.filter_map(|n| counter.table(n).map(|t| (n, t.len())))
					.collect(),
			};
			info!(
				"{}: sampled {} of {} lines, {} tokens",
				summary.name, summary.sampled_lines, summary.total_lines, summary.tokens
			);
			summaries.push(summary);

			for (n, table) in counter.into_tables() {
				tables.entry(n).or_default().insert(source.name().to_owned(), table);
			}
		}

		Ok(CorpusAnalysis { config: self.config.clone(), summaries, tables })
	}
}
