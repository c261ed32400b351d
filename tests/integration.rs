//! # Integration Tests for the Redbud Ordered Set
//!
//! This module contains end-to-end integration tests that exercise the set
//! through its public API with realistic workloads.

use rand::prelude::*;
use redbud::Set;

// ===========================================================================
// Large Scale Operation Tests
// ===========================================================================

#[test]
fn large_scale_insert_and_find() {
	let mut set: Set<i32> = Set::new();

	for i in 0..10_000 {
		assert!(set.insert(i));
	}

	set.assert_invariants();
	assert_eq!(set.len(), 10_000);

	for i in 0..10_000 {
		assert!(set.contains(&i), "failed to find value {}", i);
	}
	assert!(!set.contains(&10_000));
	assert!(!set.contains(&-1));
}

#[test]
fn large_scale_insert_and_remove() {
	let mut set: Set<i32> = Set::new();

	for i in 0..10_000 {
		set.insert(i);
	}

	set.assert_invariants();

	for i in 0..10_000 {
		assert!(set.remove(&i), "failed to remove value {}", i);
	}

	set.assert_invariants();
	assert!(set.is_empty());
}

#[test]
fn large_scale_random_operations() {
	let mut set: Set<i32> = Set::new();
	let mut rng = rand::rng();

	let mut expected: std::collections::BTreeSet<i32> = std::collections::BTreeSet::new();

	for _ in 0..10_000 {
		let value: i32 = rng.random_range(0..1000);

		match rng.random_range(0..3) {
			0 => {
				assert_eq!(set.insert(value), expected.insert(value));
			}
			1 => {
				assert_eq!(set.remove(&value), expected.remove(&value));
			}
			_ => {
				assert_eq!(set.contains(&value), expected.contains(&value));
			}
		}
	}

	set.assert_invariants();
	assert_eq!(set.len(), expected.len());

	let values: Vec<i32> = set.iter().copied().collect();
	let expected_values: Vec<i32> = expected.iter().copied().collect();
	assert_eq!(values, expected_values);
}

// ===========================================================================
// Ordered Traversal Workloads
// ===========================================================================

#[test]
fn full_scan_after_random_build() {
	let mut rng = StdRng::seed_from_u64(2024);
	let mut values: Vec<i32> = (0..5_000).collect();
	values.shuffle(&mut rng);

	let set: Set<i32> = values.iter().copied().collect();

	let mut count = 0;
	let mut previous: Option<i32> = None;
	for v in &set {
		if let Some(p) = previous {
			assert!(p < *v, "out of order: {} before {}", p, v);
		}
		previous = Some(*v);
		count += 1;
	}
	assert_eq!(count, 5_000);
}

#[test]
fn range_style_scan_with_lower_bound() {
	let set: Set<i32> = (0..1000).map(|i| i * 10).collect();

	// Collect the window [250, 600) by cursor stepping.
	let mut window = Vec::new();
	let mut cur = set.lower_bound(&250);
	while let Some(v) = cur.get() {
		if *v >= 600 {
			break;
		}
		window.push(*v);
		cur.advance();
	}

	let expected: Vec<i32> = (25..60).map(|i| i * 10).collect();
	assert_eq!(window, expected);
}

#[test]
fn reverse_scan_with_cursor() {
	let set: Set<i32> = (1..=100).collect();

	let mut cur = set.end();
	let mut collected = Vec::new();
	for _ in 0..set.len() {
		cur.retreat();
		collected.push(*cur.get().expect("cursor rests on an element"));
	}

	let expected: Vec<i32> = (1..=100).rev().collect();
	assert_eq!(collected, expected);
}

// ===========================================================================
// Non-Integer Key Workloads
// ===========================================================================

#[test]
fn string_values_sort_lexicographically() {
	let mut set: Set<String> = Set::new();

	for word in ["pear", "apple", "quince", "fig", "date", "banana"] {
		set.insert(word.to_string());
	}

	set.assert_invariants();
	assert_eq!(set.first().map(String::as_str), Some("apple"));
	assert_eq!(set.last().map(String::as_str), Some("quince"));

	assert_eq!(set.take(&"fig".to_string()), Some("fig".to_string()));
	assert!(!set.contains(&"fig".to_string()));

	let words: Vec<&str> = set.iter().map(String::as_str).collect();
	assert_eq!(words, vec!["apple", "banana", "date", "pear", "quince"]);
}

#[test]
fn tuple_values_use_lexicographic_order() {
	let mut set: Set<(u8, &str)> = Set::new();

	set.insert((2, "b"));
	set.insert((1, "z"));
	set.insert((2, "a"));
	set.insert((1, "a"));

	let order: Vec<(u8, &str)> = set.iter().copied().collect();
	assert_eq!(order, vec![(1, "a"), (1, "z"), (2, "a"), (2, "b")]);
}

// ===========================================================================
// Bulk Construction and Comparison
// ===========================================================================

#[test]
fn from_iterator_extend_and_equality() {
	let a: Set<i32> = (0..500).collect();

	let mut b: Set<i32> = Set::new();
	b.extend(0..250);
	b.extend((250..500).rev());

	assert_eq!(a, b);
	assert_eq!(a.clone(), b);

	b.remove(&100);
	assert_ne!(a, b);
}

#[test]
fn into_iterator_consumes_everything() {
	let mut rng = StdRng::seed_from_u64(5);
	let mut values: Vec<i32> = (0..3_000).collect();
	values.shuffle(&mut rng);

	let set: Set<i32> = values.iter().copied().collect();
	let drained: Vec<i32> = set.into_iter().collect();

	assert_eq!(drained, (0..3_000).collect::<Vec<_>>());
}
