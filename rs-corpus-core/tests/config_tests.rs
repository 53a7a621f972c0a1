use std::io::Write;

use rs_corpus_core::{AnalysisConfig, CorpusError, Stemming};
use tempfile::NamedTempFile;

#[test]
fn test_defaults() {
	let config = AnalysisConfig::default();
	assert_eq!(config.fraction(), 0.01);
	assert_eq!(config.ngram_orders().iter().copied().collect::<Vec<_>>(), vec![1, 2, 3, 4]);
	assert_eq!(config.stemming, Stemming::None);
	assert_eq!(config.threshold, 0);
	assert!(!config.parallel);
	assert!(config.validate().is_ok());
}

#[test]
fn test_partial_json_uses_defaults() {
	let config = AnalysisConfig::from_json_str(r#"{ "fraction": 0.05, "stemming": "porter" }"#).unwrap();
	assert_eq!(config.fraction(), 0.05);
	assert_eq!(config.stemming, Stemming::Porter);
	assert_eq!(config.seed, AnalysisConfig::default().seed);
}

#[test]
fn test_json_rejects_invalid_values() {
	assert!(matches!(
		AnalysisConfig::from_json_str(r#"{ "fraction": 0 }"#),
		Err(CorpusError::InvalidArgument(_))
	));
	assert!(matches!(
		AnalysisConfig::from_json_str(r#"{ "ngram_orders": [0, 2] }"#),
		Err(CorpusError::InvalidArgument(_))
	));
	assert!(matches!(
		AnalysisConfig::from_json_str(r#"{ "threshold": -1 }"#),
		Err(CorpusError::Json(_))
	));
}

#[test]
fn test_json_round_trip_through_file() {
	let mut config = AnalysisConfig::default();
	config.set_fraction(0.2).unwrap();
	config.set_ngram_orders([2, 3]).unwrap();
	config.seed = 99;
	config.parallel = true;

	let mut file = NamedTempFile::new().unwrap();
	write!(file, "{}", config.to_json().unwrap()).unwrap();

	let loaded = AnalysisConfig::from_json_file(file.path()).unwrap();
	assert_eq!(loaded, config);
}

#[test]
fn test_setters_validate() {
	let mut config = AnalysisConfig::default();
	assert!(config.set_fraction(1.5).is_err());
	assert!(config.set_ngram_orders(Vec::new()).is_err());
	assert!(config.set_ngram_orders([0]).is_err());
	assert_eq!(config, AnalysisConfig::default());
}

#[test]
fn test_missing_file() {
	assert!(matches!(
		AnalysisConfig::from_json_file("/definitely/not/here.json"),
		Err(CorpusError::Io(_))
	));
}
