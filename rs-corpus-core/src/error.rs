use thiserror::Error;

/// Every failure the corpus analysis core can report.
///
/// The first three variants are the domain failures of the sampling,
/// counting and aggregation steps. The remaining ones wrap the errors of
/// the I/O collaborators (files, config, snapshots, CSV export).
///
/// No operation returns a partial result alongside an error: a failed
/// sampling or counting call yields nothing.
#[derive(Error, Debug)]
pub enum CorpusError {
	/// A parameter is outside its domain (fraction, line count, order, ...).
	#[error("Invalid argument: {0}")]
	InvalidArgument(String),

	/// The source stream ended before the last requested line was reached.
	#[error("Truncated source '{source_name}': expected at least {expected} lines, found {found}")]
	TruncatedSource {
		source_name: String,
		expected: usize,
		found: usize,
	},

	/// Aggregation (or corpus opening) was given zero sources.
	#[error("Empty corpus: no source to process")]
	EmptyCorpus,

	/// A counting worker thread died before reporting its partial result.
	#[error("Worker Error: {0}")]
	Worker(String),

	#[error("IO Error: {0}")]
	Io(#[from] std::io::Error),

	#[error("JSON Parsing Error: {0}")]
	Json(#[from] serde_json::Error),

	#[error("Snapshot Error: {0}")]
	Snapshot(#[from] postcard::Error),

	#[error("CSV Error: {0}")]
	Csv(#[from] csv::Error),
}

pub type CorpusResult<T> = Result<T, CorpusError>;

impl CorpusError {
	/// Shorthand for `CorpusError::InvalidArgument(msg.into())`.
	pub(crate) fn invalid<S: Into<String>>(msg: S) -> Self {
		CorpusError::InvalidArgument(msg.into())
	}
}
