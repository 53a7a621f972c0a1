use rs_corpus_core::analysis::tokenizer::{IdentityStem, PorterStem, Stem};
use rs_corpus_core::{Cleaner, Stemming, clean};
use rstest::rstest;

#[test]
fn test_clean_strips_numbers_and_punctuation() {
	assert_eq!(clean("The Quick, 2 Foxes!!"), vec!["the", "quick", "foxes"]);
}

#[rstest]
#[case("")]
#[case("   ")]
#[case("\t \r")]
#[case("123 456")]
#[case("!!! ... ???")]
fn test_blank_lines_give_no_token(#[case] line: &str) {
	assert!(clean(line).is_empty());
}

#[rstest]
#[case("don't stop", &["dont", "stop"])]
#[case("room101 is   HERE", &["room", "is", "here"])]
#[case("e-mail me @ 9am", &["email", "me", "am"])]
#[case("Café  Übersee", &["café", "übersee"])]
#[case("smile 😀 please", &["smile", "please"])]
fn test_clean_rules(#[case] line: &str, #[case] expected: &[&str]) {
	assert_eq!(clean(line), expected);
}

#[test]
fn test_tokens_are_alphabetic_only() {
	let tokens = clean("RT @user: check https://t.co/x1 #win 100% <3");
	assert!(!tokens.is_empty());
	assert!(tokens.iter().all(|t| t.chars().all(char::is_alphabetic)));
}

#[test]
fn test_default_cleaner_does_not_stem() {
	let cleaner = Cleaner::default();
	assert_eq!(cleaner.stemming(), Some(Stemming::None));
	assert_eq!(cleaner.clean("running dogs"), vec!["running", "dogs"]);
}

#[test]
fn test_porter_cleaner_stems() {
	let cleaner = Cleaner::new(Stemming::Porter);
	assert_eq!(cleaner.stemming(), Some(Stemming::Porter));
	assert_eq!(cleaner.clean("Running dogs jumped"), vec!["run", "dog", "jump"]);
}

#[test]
fn test_stem_strategies() {
	assert_eq!(IdentityStem.stem("running"), "running");
	assert_eq!(PorterStem::new().stem("running"), "run");
}

#[test]
fn test_custom_stemmer() {
	struct FirstLetter;
	impl Stem for FirstLetter {
		fn stem<'a>(&self, token: &'a str) -> std::borrow::Cow<'a, str> {
			std::borrow::Cow::Borrowed(&token[..1])
		}
	}

	let cleaner = Cleaner::with_stemmer(Box::new(FirstLetter));
	assert_eq!(cleaner.stemming(), None);
	assert_eq!(cleaner.clean("alpha beta"), vec!["a", "b"]);
}

#[test]
fn test_token_stream_is_lazy_and_restartable() {
	let cleaner = Cleaner::default();
	let mut stream = cleaner.tokens("  One, two;  THREE ");
	assert!(!stream.is_blank());
	assert_eq!(stream.next().as_deref(), Some("one"));
	assert_eq!(stream.next().as_deref(), Some("two"));
	stream.restart();
	let all: Vec<String> = stream.collect();
	assert_eq!(all, vec!["one", "two", "three"]);
}

#[test]
fn test_blank_token_stream() {
	let cleaner = Cleaner::default();
	let mut stream = cleaner.tokens("42 !!");
	assert!(stream.is_blank());
	assert!(stream.next().is_none());
}
