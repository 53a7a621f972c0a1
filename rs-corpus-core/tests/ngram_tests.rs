use std::collections::BTreeSet;
use std::sync::Arc;

use proptest::prelude::*;
use rs_corpus_core::{Cleaner, CorpusError, NGramCounter, NGramTable, count};

fn table_of(n: usize, entries: &[(&str, u64)]) -> NGramTable {
	let mut table = NGramTable::new(n).unwrap();
	for (key, occurrences) in entries {
		table.insert(key, *occurrences).unwrap();
	}
	table
}

// --- TABLE ---

#[test]
fn test_bigram_count() {
	let table = count(&["a", "b", "a", "b"], 2).unwrap();
	assert_eq!(table, table_of(2, &[("a b", 2), ("b a", 1)]));
	assert_eq!(table.len(), 2);
	assert_eq!(table.total(), 3);
}

#[test]
fn test_unigram_count() {
	let table = count(&["to", "be", "or", "not", "to", "be"], 1).unwrap();
	assert_eq!(table.get("to"), 2);
	assert_eq!(table.get("be"), 2);
	assert_eq!(table.get("or"), 1);
	assert_eq!(table.get("missing"), 0);
}

#[test]
fn test_keys_are_order_sensitive() {
	let table = count(&["x", "y"], 2).unwrap();
	assert_eq!(table.get("x y"), 1);
	assert_eq!(table.get("y x"), 0);
}

#[test]
fn test_short_sequence_gives_empty_table() {
	let table = count(&["only", "two"], 3).unwrap();
	assert!(table.is_empty());
	assert_eq!(table.order(), 3);

	let empty: [&str; 0] = [];
	assert!(count(&empty, 1).unwrap().is_empty());
}

#[test]
fn test_order_zero_is_rejected() {
	assert!(matches!(count(&["a"], 0), Err(CorpusError::InvalidArgument(_))));
	assert!(matches!(NGramTable::new(0), Err(CorpusError::InvalidArgument(_))));
}

#[test]
fn test_lines_do_not_join() {
	let mut table = NGramTable::new(2).unwrap();
	table.add_tokens(&["end", "of"]);
	table.add_tokens(&["line", "two"]);
	assert_eq!(table.get("of line"), 0);
	assert_eq!(table.len(), 2);
}

#[test]
fn test_merge_sums_counts() {
	let mut a = table_of(1, &[("x", 2), ("y", 1)]);
	let b = table_of(1, &[("y", 4), ("z", 3)]);
	a.merge(&b).unwrap();
	assert_eq!(a, table_of(1, &[("x", 2), ("y", 5), ("z", 3)]));
}

#[test]
fn test_merge_rejects_order_mismatch() {
	let mut a = table_of(1, &[("x", 1)]);
	let b = table_of(2, &[("x y", 1)]);
	assert!(matches!(a.merge(&b), Err(CorpusError::InvalidArgument(_))));
}

#[test]
fn test_most_common() {
	let table = table_of(1, &[("b", 3), ("a", 3), ("c", 9), ("d", 1)]);
	assert_eq!(table.most_common(3), vec![("c", 9), ("a", 3), ("b", 3)]);
	assert_eq!(table.most_common(10).len(), 4);
}

fn arb_table() -> impl Strategy<Value = NGramTable> {
	prop::collection::vec(prop::collection::vec("[a-d]", 0..12), 0..6).prop_map(|lines| {
		let mut table = NGramTable::new(2).unwrap();
		for line in &lines {
			table.add_tokens(line);
		}
		table
	})
}

proptest! {
	#[test]
	fn prop_merge_is_associative(t1 in arb_table(), t2 in arb_table(), t3 in arb_table()) {
		let left = t1.merged(&t2).unwrap().merged(&t3).unwrap();
		let right = t1.merged(&t2.merged(&t3).unwrap()).unwrap();
		prop_assert_eq!(left, right);
	}

	#[test]
	fn prop_merge_is_commutative(t1 in arb_table(), t2 in arb_table()) {
		prop_assert_eq!(t1.merged(&t2).unwrap(), t2.merged(&t1).unwrap());
	}

	#[test]
	fn prop_window_count(tokens in prop::collection::vec("[a-c]", 0..40), n in 1usize..5) {
		let table = count(&tokens, n).unwrap();
		prop_assert_eq!(table.total() as usize, tokens.len().saturating_sub(n - 1));
	}
}

// --- COUNTER ---

#[test]
fn test_counter_feeds_every_order() {
	let orders = BTreeSet::from([1, 2, 3]);
	let cleaner = Cleaner::default();
	let counter = NGramCounter::count_lines(&orders, &cleaner, &["I am here", "", "here I am"]).unwrap();

	assert_eq!(counter.lines(), 3);
	assert_eq!(counter.tokens(), 6);
	assert_eq!(counter.table(1).unwrap().get("here"), 2);
	assert_eq!(counter.table(2).unwrap().get("i am"), 2);
	assert_eq!(counter.table(3).unwrap().len(), 2);
	assert!(counter.table(4).is_none());
}

#[test]
fn test_counter_rejects_bad_orders() {
	assert!(NGramCounter::new(&BTreeSet::new()).is_err());
	assert!(NGramCounter::new(&BTreeSet::from([0, 2])).is_err());
}

#[test]
fn test_counter_merge_requires_same_orders() {
	let mut a = NGramCounter::new(&BTreeSet::from([1])).unwrap();
	let b = NGramCounter::new(&BTreeSet::from([1, 2])).unwrap();
	assert!(a.merge(&b).is_err());
}

#[test]
fn test_parallel_count_matches_sequential() {
	let orders = BTreeSet::from([1, 2, 3, 4]);
	let lines: Vec<String> = (0..1_000)
		.map(|i| format!("line {} says the quick brown fox {} jumps", i % 7, if i % 3 == 0 { "often" } else { "rarely" }))
		.collect();

	let cleaner = Arc::new(Cleaner::default());
	let sequential = NGramCounter::count_lines(&orders, &cleaner, &lines).unwrap();
	let parallel = NGramCounter::count_lines_parallel(&orders, Arc::clone(&cleaner), &lines).unwrap();

	assert_eq!(sequential, parallel);
}

#[test]
fn test_parallel_count_of_nothing() {
	let orders = BTreeSet::from([2]);
	let counter = NGramCounter::count_lines_parallel(&orders, Arc::new(Cleaner::default()), &[]).unwrap();
	assert_eq!(counter.lines(), 0);
	assert!(counter.table(2).unwrap().is_empty());
}
