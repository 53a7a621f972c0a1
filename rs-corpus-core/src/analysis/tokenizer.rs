use std::borrow::Cow;
use std::fmt;

use rust_stemmers::{Algorithm, Stemmer};
use serde::{Deserialize, Serialize};

/// Stemming mode selected by configuration.
#[derive(Serialize, Deserialize, Clone, Copy, Debug, Default, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum Stemming {
	/// Tokens are kept as cleaned.
	#[default]
	None,
	/// Tokens are reduced with the Snowball English (Porter2) stemmer.
	Porter,
}

/// Reduces a cleaned token to its root form.
pub trait Stem: Send + Sync {
	fn stem<'a>(&self, token: &'a str) -> Cow<'a, str>;
}

/// Leaves tokens untouched.
#[derive(Clone, Copy, Debug, Default)]
pub struct IdentityStem;

impl Stem for IdentityStem {
	fn stem<'a>(&self, token: &'a str) -> Cow<'a, str> {
		Cow::Borrowed(token)
	}
}

/// Porter-style English stemmer ("running" → "run").
pub struct PorterStem {
	stemmer: Stemmer,
}

impl PorterStem {
	pub fn new() -> Self {
		Self { stemmer: Stemmer::create(Algorithm::English) }
	}
}

impl Default for PorterStem {
	fn default() -> Self {
		Self::new()
	}
}

impl Stem for PorterStem {
	fn stem<'a>(&self, token: &'a str) -> Cow<'a, str> {
		self.stemmer.stem(token)
	}
}

/// Turns raw text lines into lowercase word tokens.
///
/// Cleaning rules, applied in one pass:
/// - digits, punctuation, symbols and any other non-alphabetic,
///   non-whitespace character are deleted in place (`"don't"` → `"dont"`)
/// - remaining text is lowercased
/// - whitespace runs separate tokens
///
/// Tokens therefore only hold alphabetic characters, so a single space is a
/// safe n-gram delimiter.
pub struct Cleaner {
	/// `None` for a custom stemmer
	stemming: Option<Stemming>,
	stemmer: Box<dyn Stem>,
}

impl Cleaner {
	pub fn new(stemming: Stemming) -> Self {
		let stemmer: Box<dyn Stem> = match stemming {
			Stemming::None => Box::new(IdentityStem),
			Stemming::Porter => Box::new(PorterStem::new()),
		};
		Self { stemming: Some(stemming), stemmer }
	}

	/// Builds a cleaner around a custom stemming strategy.
	pub fn with_stemmer(stemmer: Box<dyn Stem>) -> Self {
		Self { stemming: None, stemmer }
	}

	/// Configured stemming mode, or `None` when built with `with_stemmer`.
	pub fn stemming(&self) -> Option<Stemming> {
		self.stemming
	}

	/// Lazy token stream over one line.
	pub fn tokens(&self, line: &str) -> TokenStream<'_> {
		TokenStream { text: normalize(line), position: 0, stemmer: self.stemmer.as_ref() }
	}

	/// Cleans one line into its tokens. Blank input gives no token.
	pub fn clean(&self, line: &str) -> Vec<String> {
		self.tokens(line).collect()
	}
}

impl Default for Cleaner {
	fn default() -> Self {
		Self::new(Stemming::None)
	}
}

impl fmt::Debug for Cleaner {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.debug_struct("Cleaner").field("stemming", &self.stemming).finish()
	}
}

/// Cleans a line without stemming.
pub fn clean(line: &str) -> Vec<String> {
	Cleaner::default().clean(line)
}

/// Deletes every character that is neither alphabetic nor whitespace and lowercases the rest.
fn normalize(line: &str) -> String {
	let mut out = String::with_capacity(line.len());
	for c in line.chars() {
		if c.is_alphabetic() {
			out.extend(c.to_lowercase());
		} else if c.is_whitespace() {
			out.push(' ');
		}
	}
	out
}

/// Tokens of a single line, produced on demand.
///
/// The normalized line is owned by the stream; tokens are cut and stemmed
/// only when requested. `restart` rewinds to the first token.
pub struct TokenStream<'s> {
	text: String,
	position: usize,
	stemmer: &'s dyn Stem,
}

impl TokenStream<'_> {
	pub fn restart(&mut self) {
		self.position = 0;
	}

	/// True when the line holds no token at all.
	pub fn is_blank(&self) -> bool {
		self.text.trim().is_empty()
	}
}

impl Iterator for TokenStream<'_> {
	type Item = String;

	fn next(&mut self) -> Option<String> {
		let rest = &self.text[self.position..];
		let start = self.position + (rest.len() - rest.trim_start_matches(' ').len());
		if start >= self.text.len() {
			self.position = self.text.len();
			return None;
		}
		let end = self.text[start..].find(' ').map_or(self.text.len(), |offset| start + offset);
		self.position = end;
		Some(self.stemmer.stem(&self.text[start..end]).into_owned())
	}
}
