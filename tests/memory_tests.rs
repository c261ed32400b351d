// Explicit drops are used for clarity in memory leak tests, even when the
// drop would happen at scope end anyway. This documents the point at which
// reclamation should occur.
#![allow(clippy::drop_non_drop)]

//! Memory leak detection tests for redbud.
//!
//! These tests verify that every node is reclaimed after set operations.
//! The whole binary runs under the tracking allocator, so allocation and
//! deallocation totals can be compared around each workload.
//!
//! # Running Memory Tests
//!
//! These tests can be run normally:
//!
//! ```bash
//! cargo test --test memory_tests
//! ```
//!
//! For more thorough leak detection, run under LeakSanitizer:
//!
//! ```bash
//! RUSTFLAGS="-Zsanitizer=leak" cargo +nightly test --target x86_64-unknown-linux-gnu
//! ```
//!
//! # Test Design
//!
//! The counters are process-global and the harness may run tests on several
//! threads, so assertions are one-sided: after dropping a structure of N
//! nodes, at least N deallocations must have happened since the structure
//! was built. Exact-balance checks would race with the harness.

use redbud::alloc::{snapshot, TrackingAllocator};
use redbud::Set;

#[global_allocator]
static ALLOC: TrackingAllocator = TrackingAllocator;

// ===========================================================================
// Basic Memory Tests
// ===========================================================================

/// Verify nodes are reclaimed after inserting and removing all values.
#[test]
fn no_leak_after_insert_remove_all() {
	let before = snapshot();

	let mut set: Set<i32> = Set::new();
	for i in 0..1000 {
		set.insert(i);
	}

	let built = snapshot();
	assert!(
		built.alloc_count - before.alloc_count >= 1000,
		"expected at least one allocation per node"
	);

	for i in 0..1000 {
		set.remove(&i);
	}
	assert!(set.is_empty());

	let drained = snapshot();
	assert!(
		drained.dealloc_count - built.dealloc_count >= 1000,
		"expected every removed node to be freed"
	);

	drop(set);
}

/// Verify dropping a populated set frees the whole node graph.
#[test]
fn drop_frees_every_node() {
	let mut set: Set<u64> = Set::new();
	for i in 0..5000 {
		set.insert(i);
	}

	let populated = snapshot();
	drop(set);
	let after = snapshot();

	assert!(
		after.dealloc_count - populated.dealloc_count >= 5000,
		"expected at least one deallocation per node on drop"
	);
}

/// Verify clear releases nodes immediately rather than waiting for drop.
#[test]
fn clear_frees_every_node() {
	let mut set: Set<i32> = (0..2000).collect();

	let populated = snapshot();
	set.clear();
	let cleared = snapshot();

	assert!(set.is_empty());
	assert!(
		cleared.dealloc_count - populated.dealloc_count >= 2000,
		"expected clear to free every node"
	);

	// The set stays usable after clear.
	set.insert(1);
	assert_eq!(set.len(), 1);
	drop(set);
}

/// Verify the owning iterator frees nodes as it drains, including the
/// remainder when it is dropped half-way.
#[test]
fn into_iter_frees_nodes_incrementally() {
	let set: Set<i32> = (0..1000).collect();

	let populated = snapshot();
	let mut iter = set.into_iter();
	for _ in 0..500 {
		iter.next();
	}

	let halfway = snapshot();
	assert!(
		halfway.dealloc_count - populated.dealloc_count >= 500,
		"expected drained nodes to be freed eagerly"
	);

	drop(iter);
	let after = snapshot();
	assert!(
		after.dealloc_count - populated.dealloc_count >= 1000,
		"expected the dropped remainder to be freed"
	);
}

// ===========================================================================
// Value Ownership Tests
// ===========================================================================

/// Heap-owning values must be freed exactly once: when they are taken out,
/// ownership transfers to the caller, and the rest die with the set.
#[test]
fn no_leak_with_heap_owning_values() {
	let mut set: Set<String> = Set::new();
	for i in 0..500 {
		set.insert(format!("value-{i:04}"));
	}

	// Take half out and let the strings drop here.
	for i in 0..250 {
		let taken = set.take(&format!("value-{i:04}"));
		assert!(taken.is_some());
	}
	assert_eq!(set.len(), 250);

	let populated = snapshot();
	drop(set);
	let after = snapshot();

	// Each remaining node frees itself and its string.
	assert!(
		after.dealloc_count - populated.dealloc_count >= 500,
		"expected nodes and their strings to be freed on drop"
	);
}

/// Churning the same narrow value range must not accumulate nodes. Exact
/// balance is racy to assert with a parallel harness; running this under
/// LeakSanitizer catches any node the churn leaves behind.
#[test]
fn churn_does_not_accumulate_nodes() {
	let before = snapshot();
	let mut set: Set<i32> = Set::new();

	for round in 0..100 {
		for v in 0..50 {
			set.insert(v);
		}
		for v in 0..50 {
			set.remove(&v);
		}
		assert!(set.is_empty(), "round {} left values behind", round);
	}

	drop(set);
	let after = snapshot();

	// 100 rounds of 50 nodes each were allocated and must all have been
	// freed again by the time the empty set is gone.
	assert!(
		after.dealloc_count - before.dealloc_count >= 5000,
		"expected every churned node to be freed"
	);
}
