//! Cursors and iterators over the node graph of a [`Set`](crate::Set).
//!
//! A [`Cursor`] is a position: either at an element or at the distinguished
//! end position one past the largest element. Cursors step in both
//! directions in amortized O(1) by walking child and parent links, and stay
//! valid as long as the set is not mutated (the borrow checker enforces
//! this through the cursor's lifetime).
//!
//! [`Iter`] and [`IntoIter`] are the conventional iterator facades built on
//! the same traversal.

use crate::{Link, Node, Set};

use std::fmt;
use std::iter::FusedIterator;
use std::marker::PhantomData;
use std::ptr::NonNull;

// ---------------------------------------------------------------------------
// In-Order Stepping
// ---------------------------------------------------------------------------

/// Returns the in-order successor of `node`, or `None` at the rightmost
/// node: the leftmost node of the right subtree when one exists, otherwise
/// the nearest ancestor reached from a left child.
///
/// # Safety
/// `node` must point to a live node owned by the tree.
pub(crate) unsafe fn successor<T>(node: NonNull<Node<T>>) -> Link<T> {
	if let Some(right) = (*node.as_ptr()).right {
		let mut v = right;
		while let Some(left) = (*v.as_ptr()).left {
			v = left;
		}
		return Some(v);
	}
	let mut v = node;
	while let Some(parent) = (*v.as_ptr()).parent {
		if (*parent.as_ptr()).left == Some(v) {
			return Some(parent);
		}
		v = parent;
	}
	None
}

/// Returns the in-order predecessor of `node`, or `None` at the leftmost
/// node. Mirror image of [`successor`].
///
/// # Safety
/// `node` must point to a live node owned by the tree.
pub(crate) unsafe fn predecessor<T>(node: NonNull<Node<T>>) -> Link<T> {
	if let Some(left) = (*node.as_ptr()).left {
		let mut v = left;
		while let Some(right) = (*v.as_ptr()).right {
			v = right;
		}
		return Some(v);
	}
	let mut v = node;
	while let Some(parent) = (*v.as_ptr()).parent {
		if (*parent.as_ptr()).right == Some(v) {
			return Some(parent);
		}
		v = parent;
	}
	None
}

// ---------------------------------------------------------------------------
// Cursor
// ---------------------------------------------------------------------------

/// A bidirectional position within a [`Set`].
///
/// A cursor either rests on an element or is the end position. The end
/// cursor is anchored on the rightmost node so that stepping backward from
/// it lands on the largest element; on an empty set the end cursor has no
/// anchor and both stepping directions are no-ops.
///
/// Stepping rules:
/// - [`advance`](Cursor::advance) at the last element moves to the end
///   position; at the end position it is a no-op.
/// - [`retreat`](Cursor::retreat) at the end position moves to the last
///   element; at the first element it is a no-op.
///
/// Two cursors are equal when they rest on the same node with the same end
/// flag, so the end cursor never compares equal to the cursor at the
/// largest element.
///
/// # Example
///
/// ```
/// use redbud::Set;
///
/// let set = Set::from([10, 20, 30]);
///
/// let mut cur = set.begin();
/// assert_eq!(cur.get(), Some(&10));
/// cur.advance();
/// cur.advance();
/// assert_eq!(cur.get(), Some(&30));
/// cur.advance();
/// assert!(cur == set.end());
/// assert_eq!(cur.get(), None);
///
/// cur.retreat();
/// assert_eq!(cur.get(), Some(&30));
/// ```
pub struct Cursor<'a, T> {
	node: Link<T>,
	end: bool,
	_marker: PhantomData<&'a Node<T>>,
}

impl<'a, T> Cursor<'a, T> {
	pub(crate) fn from_parts(node: Link<T>, end: bool) -> Self {
		Cursor {
			node,
			end,
			_marker: PhantomData,
		}
	}

	/// Returns the value at the cursor, or `None` at the end position.
	pub fn get(&self) -> Option<&'a T> {
		match (self.end, self.node) {
			(false, Some(node)) => unsafe { Some(&(*node.as_ptr()).key) },
			_ => None,
		}
	}

	/// Returns `true` if this is the end position.
	pub fn is_end(&self) -> bool {
		self.end
	}

	/// Steps to the next larger element, or to the end position when the
	/// cursor is at the largest element. A no-op at the end position.
	pub fn advance(&mut self) {
		if self.end {
			return;
		}
		let Some(node) = self.node else {
			return;
		};
		match unsafe { successor(node) } {
			Some(next) => self.node = Some(next),
			// The rightmost node stays as the end anchor.
			None => self.end = true,
		}
	}

	/// Steps to the next smaller element. At the end position this
	/// un-flags the cursor, landing on the largest element; at the first
	/// element (or on an empty set) it is a no-op.
	pub fn retreat(&mut self) {
		if self.end {
			if self.node.is_some() {
				self.end = false;
			}
			return;
		}
		let Some(node) = self.node else {
			return;
		};
		if let Some(prev) = unsafe { predecessor(node) } {
			self.node = Some(prev);
		}
	}
}

impl<'a, T> Clone for Cursor<'a, T> {
	fn clone(&self) -> Self {
		*self
	}
}

impl<'a, T> Copy for Cursor<'a, T> {}

impl<'a, T> PartialEq for Cursor<'a, T> {
	/// Position equality: same node and same end flag.
	fn eq(&self, other: &Self) -> bool {
		self.node == other.node && self.end == other.end
	}
}

impl<'a, T> Eq for Cursor<'a, T> {}

impl<'a, T: fmt::Debug> fmt::Debug for Cursor<'a, T> {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		match self.get() {
			Some(value) => f.debug_tuple("Cursor").field(value).finish(),
			None => f.write_str("Cursor(end)"),
		}
	}
}

// A cursor only ever reads through its node reference.
unsafe impl<'a, T: Sync> Send for Cursor<'a, T> {}
unsafe impl<'a, T: Sync> Sync for Cursor<'a, T> {}

// ---------------------------------------------------------------------------
// Borrowing Iterator
// ---------------------------------------------------------------------------

/// A double-ended iterator over the values of a [`Set`] in ascending order.
///
/// Created by [`Set::iter`]. Tracks one cursor per end plus the number of
/// values left, so `next` and `next_back` never cross each other.
pub struct Iter<'a, T> {
	front: Link<T>,
	back: Link<T>,
	len: usize,
	_marker: PhantomData<&'a Node<T>>,
}

impl<'a, T> Iter<'a, T> {
	pub(crate) fn from_parts(front: Link<T>, back: Link<T>, len: usize) -> Self {
		Iter {
			front,
			back,
			len,
			_marker: PhantomData,
		}
	}
}

impl<'a, T> Iterator for Iter<'a, T> {
	type Item = &'a T;

	fn next(&mut self) -> Option<&'a T> {
		if self.len == 0 {
			return None;
		}
		let node = self.front.expect("remaining length and front position agree");
		self.len -= 1;
		unsafe {
			self.front = successor(node);
			Some(&(*node.as_ptr()).key)
		}
	}

	fn size_hint(&self) -> (usize, Option<usize>) {
		(self.len, Some(self.len))
	}
}

impl<'a, T> DoubleEndedIterator for Iter<'a, T> {
	fn next_back(&mut self) -> Option<&'a T> {
		if self.len == 0 {
			return None;
		}
		let node = self.back.expect("remaining length and back position agree");
		self.len -= 1;
		unsafe {
			self.back = predecessor(node);
			Some(&(*node.as_ptr()).key)
		}
	}
}

impl<'a, T> ExactSizeIterator for Iter<'a, T> {}

impl<'a, T> FusedIterator for Iter<'a, T> {}

impl<'a, T> Clone for Iter<'a, T> {
	fn clone(&self) -> Self {
		Iter {
			front: self.front,
			back: self.back,
			len: self.len,
			_marker: PhantomData,
		}
	}
}

unsafe impl<'a, T: Sync> Send for Iter<'a, T> {}
unsafe impl<'a, T: Sync> Sync for Iter<'a, T> {}

// ---------------------------------------------------------------------------
// Owning Iterator
// ---------------------------------------------------------------------------

/// An owning iterator over the values of a [`Set`] in ascending order.
///
/// Created by the [`IntoIterator`] impl for `Set`. Values are detached from
/// either boundary of the tree as they are yielded, so nodes are freed as
/// iteration proceeds and dropping the iterator releases whatever remains.
pub struct IntoIter<T: Ord> {
	set: Set<T>,
}

impl<T: Ord> IntoIter<T> {
	pub(crate) fn new(set: Set<T>) -> Self {
		IntoIter { set }
	}
}

impl<T: Ord> Iterator for IntoIter<T> {
	type Item = T;

	fn next(&mut self) -> Option<T> {
		self.set.pop_first()
	}

	fn size_hint(&self) -> (usize, Option<usize>) {
		(self.set.len(), Some(self.set.len()))
	}
}

impl<T: Ord> DoubleEndedIterator for IntoIter<T> {
	fn next_back(&mut self) -> Option<T> {
		self.set.pop_last()
	}
}

impl<T: Ord> ExactSizeIterator for IntoIter<T> {}

impl<T: Ord> FusedIterator for IntoIter<T> {}
