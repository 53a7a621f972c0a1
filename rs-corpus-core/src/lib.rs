//! Text-corpus sampling and n-gram frequency analysis library.
//!
//! This crate provides the building blocks of a corpus exploration run:
//! - Deterministic line sampling without loading whole files
//! - Cleaning and tokenization of raw lines, with optional stemming
//! - Sliding-window n-gram counting, mergeable across lines and threads
//! - Cross-source frequency joins filtered by a threshold
//! - I/O collaborators (sample files, table snapshots, CSV export)

/// Sampling, tokenization, counting and aggregation steps.
pub mod analysis;

/// End-to-end run over a whole corpus.
pub mod analyzer;

/// Run parameters, loadable from JSON.
pub mod config;

/// Corpus sources and their line counts.
pub mod corpus;

/// Error type shared by every module.
pub mod error;

/// I/O helpers (line counting, paths, sample files, snapshots, CSV).
pub mod io;

pub use analysis::aggregator::{AggregatedFrequencyView, FrequencyJoin, aggregate};
pub use analysis::line_sampler::{LineExtractor, SampleSpec, SampledLineSet, extract, sample};
pub use analysis::ngram_counter::NGramCounter;
pub use analysis::ngram_table::{NGramTable, count};
pub use analysis::tokenizer::{Cleaner, Stemming, TokenStream, clean};
pub use analyzer::{CorpusAnalysis, CorpusAnalyzer, SourceSummary};
pub use config::AnalysisConfig;
pub use corpus::{Corpus, CorpusSource};
pub use error::{CorpusError, CorpusResult};
