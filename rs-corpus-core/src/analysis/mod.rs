//! Corpus analysis building blocks.
//!
//! Each step is a single-pass transformation over in-memory values:
//! - Line sampling and extraction (`line_sampler`)
//! - Cleaning and tokenization (`tokenizer`)
//! - Fixed-order n-gram tables (`ngram_table`)
//! - Multi-order counting, sequential or chunked over threads (`ngram_counter`)
//! - Cross-source joins filtered by a threshold (`aggregator`)

/// Deterministic sampling of line indices and single-pass extraction of
/// the selected lines from a stream.
pub mod line_sampler;

/// Text cleaning into lowercase alphabetic tokens, with optional stemming.
pub mod tokenizer;

/// Frequency table of the n-grams of one order.
///
/// Handles sliding-window counting, merging and top-k queries.
pub mod ngram_table;

/// One table per configured order, fed line by line.
///
/// Also provides the chunked worker-thread counter.
pub mod ngram_counter;

/// Full outer join of per-source tables and threshold filtering.
pub mod aggregator;
