//! Allocation tracking for memory leak detection.
//!
//! This module provides a custom global allocator that counts allocations,
//! deallocations and live bytes. It is designed for use in tests to verify
//! that every node the set allocates is reclaimed when values are removed
//! or the set is dropped.
//!
//! # Usage
//!
//! In a test binary that wants to track allocations, use:
//!
//! ```ignore
//! use redbud::alloc::TrackingAllocator;
//!
//! #[global_allocator]
//! static ALLOC: TrackingAllocator = TrackingAllocator;
//!
//! #[test]
//! fn no_leaks() {
//!     let before = redbud::alloc::snapshot();
//!
//!     // ... build and drop a set ...
//!
//!     let after = redbud::alloc::snapshot();
//!     assert_eq!(after.live_allocations(), before.live_allocations());
//! }
//! ```
//!
//! # Caveats
//!
//! - The tracking allocator adds overhead to every allocation
//! - Counters are global, so a parallel test harness contributes its own
//!   allocations; assert on deltas of `live_allocations`, not on absolute
//!   counter values
//! - Counts start when the process does, never at zero inside a test

use std::alloc::{GlobalAlloc, Layout, System};
use std::sync::atomic::{AtomicIsize, AtomicUsize, Ordering};

/// Total number of allocations since process start.
pub static ALLOC_COUNT: AtomicUsize = AtomicUsize::new(0);

/// Total number of deallocations since process start.
pub static DEALLOC_COUNT: AtomicUsize = AtomicUsize::new(0);

/// Current live bytes; transiently inconsistent across threads.
pub static BYTES_ALLOCATED: AtomicIsize = AtomicIsize::new(0);

/// A tracking allocator that counts allocations and deallocations.
///
/// Wraps the system allocator and bumps the module counters on each
/// allocation operation.
pub struct TrackingAllocator;

unsafe impl GlobalAlloc for TrackingAllocator {
	unsafe fn alloc(&self, layout: Layout) -> *mut u8 {
		ALLOC_COUNT.fetch_add(1, Ordering::Relaxed);
		BYTES_ALLOCATED.fetch_add(layout.size() as isize, Ordering::Relaxed);
		System.alloc(layout)
	}

	unsafe fn dealloc(&self, ptr: *mut u8, layout: Layout) {
		DEALLOC_COUNT.fetch_add(1, Ordering::Relaxed);
		BYTES_ALLOCATED.fetch_sub(layout.size() as isize, Ordering::Relaxed);
		System.dealloc(ptr, layout)
	}

	unsafe fn alloc_zeroed(&self, layout: Layout) -> *mut u8 {
		ALLOC_COUNT.fetch_add(1, Ordering::Relaxed);
		BYTES_ALLOCATED.fetch_add(layout.size() as isize, Ordering::Relaxed);
		System.alloc_zeroed(layout)
	}

	unsafe fn realloc(&self, ptr: *mut u8, layout: Layout, new_size: usize) -> *mut u8 {
		let diff = new_size as isize - layout.size() as isize;
		BYTES_ALLOCATED.fetch_add(diff, Ordering::Relaxed);
		System.realloc(ptr, layout, new_size)
	}
}

/// Returns the current allocation statistics.
pub fn snapshot() -> AllocationStats {
	AllocationStats {
		alloc_count: ALLOC_COUNT.load(Ordering::SeqCst),
		dealloc_count: DEALLOC_COUNT.load(Ordering::SeqCst),
		bytes_allocated: BYTES_ALLOCATED.load(Ordering::SeqCst),
	}
}

/// Allocation statistics snapshot.
#[derive(Debug, Clone, Copy)]
pub struct AllocationStats {
	/// Total number of allocations at snapshot time.
	pub alloc_count: usize,
	/// Total number of deallocations at snapshot time.
	pub dealloc_count: usize,
	/// Live bytes at snapshot time; may be transiently negative when other
	/// threads race with the snapshot.
	pub bytes_allocated: isize,
}

impl AllocationStats {
	/// Allocations not yet matched by a deallocation.
	pub fn live_allocations(&self) -> isize {
		self.alloc_count as isize - self.dealloc_count as isize
	}
}
