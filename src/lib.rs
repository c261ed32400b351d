//! # Redbud: An Ordered Set Backed by a Red-Black Tree
//!
//! This crate provides an in-memory ordered set with logarithmic-time
//! membership queries, insertion and removal, and ordered bidirectional
//! traversal via cursors and iterators.
//!
//! ## Design Overview
//!
//! The container is a classic red-black tree: a binary search tree whose
//! nodes carry a 2-coloring that bounds the height to O(log n).
//!
//! ### Key Concepts
//!
//! **Node graph**: Each stored value lives in exactly one heap-allocated
//! node with `left`/`right` child links and a `parent` back-reference. The
//! set exclusively owns every node reachable from the root; parent links are
//! non-owning and are used only for upward traversal (rotations, cursor
//! stepping, boundary walks), never to free memory.
//!
//! **Balancing invariants**: The root is black; no red node has a red child;
//! every path from a node down to a null reference passes through the same
//! number of black nodes. Insertion and removal restore these invariants
//! with the standard recolor-and-rotate fixups.
//!
//! **Boundary caches**: The set keeps references to its leftmost and
//! rightmost nodes, refreshed after every structural mutation. [`Set::first`],
//! [`Set::last`] and the [`Set::begin`]/[`Set::end`] cursors are O(1) reads
//! of these caches.
//!
//! ### Tree Structure
//!
//! ```text
//!                     ┌─────────────┐
//!                     │  root  (B)  │  <- always black
//!                     └──────┬──────┘
//!                ┌───────────┴───────────┐
//!                ▼                       ▼
//!          ┌───────────┐          ┌───────────┐
//!          │  node (B) │          │  node (B) │
//!          └─────┬─────┘          └─────┬─────┘
//!            ┌───┴───┐              ┌───┴───┐
//!            ▼       ▼              ▼       ▼
//!           (R)     (R)            (R)     (R)
//!
//!         first = leftmost node    last = rightmost node
//! ```
//!
//! ## Basic Usage
//!
//! ```
//! use redbud::Set;
//!
//! let mut set = Set::new();
//!
//! set.insert(3);
//! set.insert(1);
//! set.insert(2);
//! set.insert(2); // duplicate, silently ignored
//!
//! assert_eq!(set.len(), 3);
//! assert_eq!(set.iter().copied().collect::<Vec<_>>(), vec![1, 2, 3]);
//!
//! set.remove(&2);
//! assert!(set.find(&2) == set.end());
//! ```
//!
//! ## Thread Safety
//!
//! The set performs no internal synchronization. It is `Send`/`Sync` when
//! the element type is, because ownership of the node graph is exclusive
//! and shared references permit only reads, but shared mutation requires
//! external synchronization by the caller.

use smallvec::SmallVec;

use std::cmp::Ordering;
use std::fmt;
use std::ptr::NonNull;

pub mod alloc;
pub mod iter;

#[cfg(test)]
mod util;

pub use iter::{Cursor, IntoIter, Iter};

// ---------------------------------------------------------------------------
// Node Representation
// ---------------------------------------------------------------------------

/// A nullable, non-owning link into the node graph.
pub(crate) type Link<T> = Option<NonNull<Node<T>>>;

/// The balancing color of a node.
#[derive(Debug, PartialEq, Eq, Copy, Clone)]
pub(crate) enum Color {
	Red,
	Black,
}

/// A side of a binary node. Rotations and fixups are written once and
/// mirrored through this enum instead of being duplicated left/right.
#[derive(Debug, PartialEq, Eq, Copy, Clone)]
enum Side {
	Left,
	Right,
}

impl Side {
	fn opposite(self) -> Side {
		match self {
			Side::Left => Side::Right,
			Side::Right => Side::Left,
		}
	}
}

/// One stored value plus its relational links.
///
/// The key is immutable for the node's whole lifetime, except during removal
/// of a node with two children, where the key is exchanged with the in-order
/// successor's key before the successor node is spliced out.
pub(crate) struct Node<T> {
	pub(crate) key: T,
	pub(crate) color: Color,
	/// Non-owning back-reference; `None` iff this node is the root.
	pub(crate) parent: Link<T>,
	pub(crate) left: Link<T>,
	pub(crate) right: Link<T>,
}

impl<T> Node<T> {
	/// Allocates a fresh node with no children.
	pub(crate) fn new(key: T, color: Color, parent: Link<T>) -> NonNull<Node<T>> {
		NonNull::from(Box::leak(Box::new(Node {
			key,
			color,
			parent,
			left: None,
			right: None,
		})))
	}
}

/// Returns the child of `node` on the given side.
///
/// # Safety
/// `node` must point to a live node owned by the tree.
unsafe fn link<T>(node: NonNull<Node<T>>, side: Side) -> Link<T> {
	match side {
		Side::Left => (*node.as_ptr()).left,
		Side::Right => (*node.as_ptr()).right,
	}
}

/// Replaces the child link of `node` on the given side.
///
/// # Safety
/// `node` must point to a live node owned by the tree.
unsafe fn set_link<T>(node: NonNull<Node<T>>, side: Side, target: Link<T>) {
	match side {
		Side::Left => (*node.as_ptr()).left = target,
		Side::Right => (*node.as_ptr()).right = target,
	}
}

/// Null links count as black.
///
/// # Safety
/// A `Some` link must point to a live node owned by the tree.
unsafe fn is_red<T>(node: Link<T>) -> bool {
	match node {
		Some(n) => (*n.as_ptr()).color == Color::Red,
		None => false,
	}
}

/// Finds the node with the smallest key strictly greater than `start`'s key
/// within the subtree rooted at `start`, or `None` if no key there is
/// greater. Used during removal to locate the in-order successor of a node
/// that has two children.
///
/// # Safety
/// `start` must point to a live node owned by the tree.
unsafe fn subtree_upper_bound<T: Ord>(start: NonNull<Node<T>>) -> Link<T> {
	let key: *const T = &(*start.as_ptr()).key;
	let mut cur = start;
	let mut candidate = None;
	loop {
		let step = match (*key).cmp(&(*cur.as_ptr()).key) {
			Ordering::Less => {
				candidate = Some(cur);
				(*cur.as_ptr()).left
			}
			_ => (*cur.as_ptr()).right,
		};
		match step {
			Some(next) => cur = next,
			None => break,
		}
	}
	candidate
}

// ---------------------------------------------------------------------------
// Core Set Structure
// ---------------------------------------------------------------------------

/// An ordered set of unique values, backed by a red-black tree.
///
/// Ordering is the value type's intrinsic [`Ord`]; two values are considered
/// the same element when they compare equal. Lookup, insertion and removal
/// run in O(log n); [`len`](Set::len), [`is_empty`](Set::is_empty),
/// [`first`](Set::first) and [`last`](Set::last) are O(1).
///
/// Duplicate inserts and removals of absent values are silent no-ops, so
/// every operation is total over its inputs.
///
/// # Example
///
/// ```
/// use redbud::Set;
///
/// let mut set: Set<&str> = Set::new();
/// set.insert("fir");
/// set.insert("alder");
///
/// assert!(set.contains(&"fir"));
/// assert_eq!(set.first(), Some(&"alder"));
/// ```
pub struct Set<T: Ord> {
	/// Root of the node graph; `None` iff the set is empty.
	root: Link<T>,
	/// Number of stored values; kept in sync by `insert` and `detach_node`.
	len: usize,
	/// Cached leftmost node, refreshed after every structural mutation.
	first: Link<T>,
	/// Cached rightmost node; also anchors the end cursor.
	last: Link<T>,
}

// The set owns its node graph exclusively: sending it to another thread
// moves every node with it, and shared references permit only reads.
unsafe impl<T: Ord + Send> Send for Set<T> {}
unsafe impl<T: Ord + Sync> Sync for Set<T> {}

impl<T: Ord> Default for Set<T> {
	fn default() -> Self {
		Self::new()
	}
}

impl<T: Ord> Set<T> {
	// -----------------------------------------------------------------------
	// Construction
	// -----------------------------------------------------------------------

	/// Creates a new, empty set. Does not allocate.
	///
	/// # Example
	///
	/// ```
	/// use redbud::Set;
	///
	/// let set: Set<i32> = Set::new();
	/// assert!(set.is_empty());
	/// ```
	pub fn new() -> Self {
		Set {
			root: None,
			len: 0,
			first: None,
			last: None,
		}
	}

	/// Assembles a set from a prebuilt node graph. Test-only entry point
	/// used by the fixture loader; the caller is responsible for handing
	/// over a well-formed search tree with consistent parent links.
	#[cfg(test)]
	pub(crate) fn from_raw_parts(root: Link<T>, len: usize) -> Set<T> {
		let mut set = Set {
			root,
			len,
			first: None,
			last: None,
		};
		set.refresh_bounds();
		set
	}

	// -----------------------------------------------------------------------
	// Metadata
	// -----------------------------------------------------------------------

	/// Returns the number of values in the set. O(1).
	pub fn len(&self) -> usize {
		self.len
	}

	/// Returns `true` if the set contains no values. O(1).
	pub fn is_empty(&self) -> bool {
		self.len == 0
	}

	/// Returns a reference to the smallest value, or `None` if the set is
	/// empty. O(1), backed by the boundary cache.
	pub fn first(&self) -> Option<&T> {
		self.first.map(|node| unsafe { &(*node.as_ptr()).key })
	}

	/// Returns a reference to the largest value, or `None` if the set is
	/// empty. O(1), backed by the boundary cache.
	pub fn last(&self) -> Option<&T> {
		self.last.map(|node| unsafe { &(*node.as_ptr()).key })
	}

	// -----------------------------------------------------------------------
	// Queries
	// -----------------------------------------------------------------------

	/// Returns `true` if a value comparing equal to `value` is present.
	///
	/// # Example
	///
	/// ```
	/// use redbud::Set;
	///
	/// let set = Set::from([2, 4, 6]);
	/// assert!(set.contains(&4));
	/// assert!(!set.contains(&5));
	/// ```
	pub fn contains(&self, value: &T) -> bool {
		match self.lower_bound_node(value) {
			Some(node) => unsafe { (*node.as_ptr()).key.cmp(value) == Ordering::Equal },
			None => false,
		}
	}

	/// Returns a cursor at the element comparing equal to `value`, or the
	/// end cursor if no such element exists.
	///
	/// # Example
	///
	/// ```
	/// use redbud::Set;
	///
	/// let set = Set::from([1, 3, 5]);
	/// assert_eq!(set.find(&3).get(), Some(&3));
	/// assert!(set.find(&4) == set.end());
	/// ```
	pub fn find(&self, value: &T) -> Cursor<'_, T> {
		match self.lower_bound_node(value) {
			Some(node) if unsafe { (*node.as_ptr()).key.cmp(value) == Ordering::Equal } => {
				Cursor::from_parts(Some(node), false)
			}
			_ => self.end(),
		}
	}

	/// Returns a cursor at the first element whose value is not less than
	/// `value`, or the end cursor if every element is smaller.
	///
	/// # Example
	///
	/// ```
	/// use redbud::Set;
	///
	/// let set = Set::from([10, 20, 30]);
	/// assert_eq!(set.lower_bound(&15).get(), Some(&20));
	/// assert_eq!(set.lower_bound(&20).get(), Some(&20));
	/// assert!(set.lower_bound(&31) == set.end());
	/// ```
	pub fn lower_bound(&self, value: &T) -> Cursor<'_, T> {
		match self.lower_bound_node(value) {
			Some(node) => Cursor::from_parts(Some(node), false),
			None => self.end(),
		}
	}

	/// Returns a cursor at the smallest element, or the end cursor if the
	/// set is empty, so `begin() == end()` holds exactly for empty sets.
	pub fn begin(&self) -> Cursor<'_, T> {
		match self.first {
			Some(node) => Cursor::from_parts(Some(node), false),
			None => self.end(),
		}
	}

	/// Returns the end cursor: the position one past the largest element.
	/// It is anchored on the rightmost node so that stepping backward from
	/// it reaches the largest element.
	pub fn end(&self) -> Cursor<'_, T> {
		Cursor::from_parts(self.last, true)
	}

	/// Returns a double-ended iterator over the values in ascending order.
	///
	/// # Example
	///
	/// ```
	/// use redbud::Set;
	///
	/// let set = Set::from([3, 1, 2]);
	/// let ascending: Vec<i32> = set.iter().copied().collect();
	/// assert_eq!(ascending, vec![1, 2, 3]);
	/// ```
	pub fn iter(&self) -> Iter<'_, T> {
		Iter::from_parts(self.first, self.last, self.len)
	}

	// -----------------------------------------------------------------------
	// Mutation
	// -----------------------------------------------------------------------

	/// Inserts a value. Returns `true` if the value was newly inserted and
	/// `false` if an equal value was already present; the set is unchanged
	/// in that case.
	///
	/// # Example
	///
	/// ```
	/// use redbud::Set;
	///
	/// let mut set = Set::new();
	/// assert!(set.insert(10));
	/// assert!(!set.insert(10));
	/// assert_eq!(set.len(), 1);
	/// ```
	pub fn insert(&mut self, value: T) -> bool {
		let Some(root) = self.root else {
			// First node becomes a black root.
			self.root = Some(Node::new(value, Color::Black, None));
			self.len = 1;
			self.refresh_bounds();
			return true;
		};
		unsafe {
			let mut cur = root;
			let fresh = loop {
				let side = match value.cmp(&(*cur.as_ptr()).key) {
					Ordering::Equal => return false,
					Ordering::Less => Side::Left,
					Ordering::Greater => Side::Right,
				};
				match link(cur, side) {
					Some(next) => cur = next,
					None => {
						let node = Node::new(value, Color::Red, Some(cur));
						set_link(cur, side, Some(node));
						break node;
					}
				}
			};
			self.len += 1;
			self.fix_after_insert(fresh);
			self.refresh_bounds();
			true
		}
	}

	/// Removes the value comparing equal to `value`. Returns `true` if it
	/// was present; removing an absent value is a silent no-op.
	///
	/// # Example
	///
	/// ```
	/// use redbud::Set;
	///
	/// let mut set = Set::from([1, 2]);
	/// assert!(set.remove(&1));
	/// assert!(!set.remove(&1));
	/// assert_eq!(set.len(), 1);
	/// ```
	pub fn remove(&mut self, value: &T) -> bool {
		self.take(value).is_some()
	}

	/// Removes and returns the stored value comparing equal to `value`, or
	/// `None` if it is absent.
	pub fn take(&mut self, value: &T) -> Option<T> {
		let node = self.lower_bound_node(value)?;
		unsafe {
			if (*node.as_ptr()).key.cmp(value) != Ordering::Equal {
				return None;
			}
			Some(self.detach_node(node))
		}
	}

	/// Removes and returns the smallest value, or `None` if the set is
	/// empty.
	pub fn pop_first(&mut self) -> Option<T> {
		let node = self.first?;
		Some(unsafe { self.detach_node(node) })
	}

	/// Removes and returns the largest value, or `None` if the set is
	/// empty.
	pub fn pop_last(&mut self) -> Option<T> {
		let node = self.last?;
		Some(unsafe { self.detach_node(node) })
	}

	/// Removes all values, releasing every node.
	///
	/// # Example
	///
	/// ```
	/// use redbud::Set;
	///
	/// let mut set = Set::from([1, 2, 3]);
	/// set.clear();
	/// assert!(set.is_empty());
	/// ```
	pub fn clear(&mut self) {
		// Iterative pre-order release; parent links are never followed while
		// freeing. The inline stack covers trees of height up to 32 without
		// a heap allocation.
		let mut stack: SmallVec<[NonNull<Node<T>>; 32]> = SmallVec::new();
		if let Some(root) = self.root {
			stack.push(root);
		}
		while let Some(node) = stack.pop() {
			unsafe {
				if let Some(left) = (*node.as_ptr()).left {
					stack.push(left);
				}
				if let Some(right) = (*node.as_ptr()).right {
					stack.push(right);
				}
				drop(Box::from_raw(node.as_ptr()));
			}
		}
		self.root = None;
		self.len = 0;
		self.first = None;
		self.last = None;
	}

	// -----------------------------------------------------------------------
	// Tree Engine: Search
	// -----------------------------------------------------------------------

	/// Descends from the root to the node holding the smallest key not less
	/// than `value`, or `None` if every key is smaller. An equal key
	/// short-circuits the descent.
	fn lower_bound_node(&self, value: &T) -> Link<T> {
		let mut cur = self.root;
		let mut candidate = None;
		while let Some(node) = cur {
			unsafe {
				match value.cmp(&(*node.as_ptr()).key) {
					Ordering::Equal => return Some(node),
					Ordering::Less => {
						candidate = Some(node);
						cur = (*node.as_ptr()).left;
					}
					Ordering::Greater => cur = (*node.as_ptr()).right,
				}
			}
		}
		candidate
	}

	// -----------------------------------------------------------------------
	// Tree Engine: Rotation and Rebalancing
	// -----------------------------------------------------------------------

	/// Rotates the subtree rooted at `v` in the direction `dir`, promoting
	/// the child opposite the direction. O(1) relinking that preserves the
	/// in-order key sequence; updates the parent's child link (or the tree
	/// root) and the promoted child's parent back-reference.
	///
	/// # Safety
	/// `v` must be a live node with a child opposite `dir`.
	unsafe fn rotate(&mut self, v: NonNull<Node<T>>, dir: Side) {
		let pivot =
			link(v, dir.opposite()).expect("rotation requires a child opposite the direction");
		set_link(v, dir.opposite(), link(pivot, dir));
		if let Some(moved) = link(v, dir.opposite()) {
			(*moved.as_ptr()).parent = Some(v);
		}
		set_link(pivot, dir, Some(v));
		match (*v.as_ptr()).parent {
			Some(parent) => {
				if (*parent.as_ptr()).left == Some(v) {
					(*parent.as_ptr()).left = Some(pivot);
				} else {
					(*parent.as_ptr()).right = Some(pivot);
				}
			}
			None => self.root = Some(pivot),
		}
		(*pivot.as_ptr()).parent = (*v.as_ptr()).parent;
		(*v.as_ptr()).parent = Some(pivot);
	}

	/// Restores the balancing invariants after attaching the fresh red leaf
	/// `v`. Climbs while the parent is red: a red uncle is handled by
	/// recoloring and continuing from the grandparent, a black uncle by
	/// straightening a zigzag and rotating the grandparent. The root is
	/// forced black on exit.
	///
	/// # Safety
	/// `v` must be a live red node that was just attached as a leaf.
	unsafe fn fix_after_insert(&mut self, mut v: NonNull<Node<T>>) {
		loop {
			let Some(mut parent) = (*v.as_ptr()).parent else {
				break;
			};
			if (*parent.as_ptr()).color == Color::Black {
				break;
			}
			// The parent is red, so it cannot be the root and the
			// grandparent exists.
			let grandparent =
				(*parent.as_ptr()).parent.expect("a red node is never the root");
			let side = if (*grandparent.as_ptr()).left == Some(parent) {
				Side::Left
			} else {
				Side::Right
			};
			let uncle = link(grandparent, side.opposite());
			if is_red(uncle) {
				let uncle = uncle.expect("a red link is non-null");
				(*uncle.as_ptr()).color = Color::Black;
				(*parent.as_ptr()).color = Color::Black;
				(*grandparent.as_ptr()).color = Color::Red;
				// The violation may have moved up two levels.
				v = grandparent;
			} else {
				if link(parent, side.opposite()) == Some(v) {
					// Zigzag: straighten the path before the final rotation.
					v = parent;
					self.rotate(v, side);
					parent = (*v.as_ptr()).parent.expect("rotation placed a parent above");
				}
				(*parent.as_ptr()).color = Color::Black;
				(*grandparent.as_ptr()).color = Color::Red;
				self.rotate(grandparent, side.opposite());
			}
		}
		if let Some(root) = self.root {
			(*root.as_ptr()).color = Color::Black;
		}
	}

	/// Repairs the black-height deficit at `v` after a black node was
	/// removed from `v`'s path. Climbs while `v` is a black non-root: a red
	/// sibling is rotated down to expose a black one, a black sibling with
	/// black children absorbs the deficit by turning red, and a black
	/// sibling with a red child resolves the deficit with at most two
	/// rotations and terminates. The final node is forced black.
	///
	/// # Safety
	/// `v` must be a live node still wired into the tree.
	unsafe fn fix_after_remove(&mut self, mut v: NonNull<Node<T>>) {
		loop {
			let Some(parent) = (*v.as_ptr()).parent else {
				break;
			};
			if (*v.as_ptr()).color == Color::Red {
				break;
			}
			let side = if (*parent.as_ptr()).left == Some(v) {
				Side::Left
			} else {
				Side::Right
			};
			if is_red(link(parent, side.opposite())) {
				// Red sibling: rotate it above the parent so the new sibling
				// is black, then fall through within this iteration.
				let sibling =
					link(parent, side.opposite()).expect("a red link is non-null");
				(*sibling.as_ptr()).color = Color::Black;
				(*parent.as_ptr()).color = Color::Red;
				self.rotate(parent, side);
			}
			let sibling = link(parent, side.opposite())
				.expect("a black-height deficit implies a sibling");
			if !is_red((*sibling.as_ptr()).left) && !is_red((*sibling.as_ptr()).right) {
				// Both nephews black: drop the sibling's black count and
				// push the deficit up to the parent.
				(*sibling.as_ptr()).color = Color::Red;
				v = parent;
				continue;
			}
			let sibling = if is_red(link(sibling, side.opposite())) {
				sibling
			} else {
				// The red nephew sits on the near side; rotate it over to
				// the far side first.
				let near = link(sibling, side).expect("sibling has a red child");
				(*near.as_ptr()).color = Color::Black;
				(*sibling.as_ptr()).color = Color::Red;
				self.rotate(sibling, side.opposite());
				link(parent, side.opposite()).expect("rotation keeps a sibling in place")
			};
			// Transfer the parent's color to the sibling, blacken the far
			// nephew and rotate the parent toward the deficient side.
			(*sibling.as_ptr()).color = (*parent.as_ptr()).color;
			(*parent.as_ptr()).color = Color::Black;
			let far = link(sibling, side.opposite()).expect("far nephew is red at this point");
			(*far.as_ptr()).color = Color::Black;
			self.rotate(parent, side);
			v = self.root.expect("fixup runs on a nonempty tree");
		}
		(*v.as_ptr()).color = Color::Black;
	}

	// -----------------------------------------------------------------------
	// Tree Engine: Detachment
	// -----------------------------------------------------------------------

	/// Unlinks `vert` from the tree, rebalances, refreshes the boundary
	/// caches and returns the stored value.
	///
	/// When `vert` has two children its key is exchanged with the in-order
	/// successor's key and deletion retargets to the successor, which has at
	/// most one child. The exchange means the node that is physically freed
	/// always carries the value being removed.
	///
	/// # Safety
	/// `vert` must be a live node owned by this set.
	unsafe fn detach_node(&mut self, mut vert: NonNull<Node<T>>) -> T {
		self.len -= 1;

		if (*vert.as_ptr()).left.is_some() && (*vert.as_ptr()).right.is_some() {
			let succ =
				subtree_upper_bound(vert).expect("a node with a right child has a successor");
			std::mem::swap(&mut (*vert.as_ptr()).key, &mut (*succ.as_ptr()).key);
			vert = succ;
		}

		let left = (*vert.as_ptr()).left;
		let right = (*vert.as_ptr()).right;

		if left.is_none() && right.is_none() {
			match (*vert.as_ptr()).parent {
				None => self.root = None,
				Some(_) => {
					if (*vert.as_ptr()).color == Color::Black {
						// The fixup inspects sibling and parent colors, so
						// it must run while the leaf is still attached. It
						// may rotate ancestors, hence the parent is re-read
						// afterwards.
						self.fix_after_remove(vert);
					}
					let parent = (*vert.as_ptr()).parent.expect("leaf is not the root");
					if (*parent.as_ptr()).left == Some(vert) {
						(*parent.as_ptr()).left = None;
					} else {
						(*parent.as_ptr()).right = None;
					}
				}
			}
		} else {
			let child = left.or(right).expect("node has exactly one child here");
			match (*vert.as_ptr()).parent {
				None => {
					// Root with a single child: the child becomes the new
					// black root.
					self.root = Some(child);
					(*child.as_ptr()).parent = None;
					(*child.as_ptr()).color = Color::Black;
				}
				Some(parent) => {
					if (*parent.as_ptr()).left == Some(vert) {
						(*parent.as_ptr()).left = Some(child);
					} else {
						(*parent.as_ptr()).right = Some(child);
					}
					(*child.as_ptr()).parent = Some(parent);
					if (*vert.as_ptr()).color == Color::Black {
						self.fix_after_remove(child);
					}
					// A red node's child absorbs its position with no
					// further fixup.
				}
			}
		}

		self.refresh_bounds();
		let boxed = Box::from_raw(vert.as_ptr());
		boxed.key
	}

	// -----------------------------------------------------------------------
	// Tree Engine: Boundary Caches
	// -----------------------------------------------------------------------

	/// Recomputes the cached leftmost and rightmost nodes by full descent
	/// from the root. Called after every structural mutation so the caches
	/// never go stale between mutations.
	fn refresh_bounds(&mut self) {
		match self.root {
			None => {
				self.first = None;
				self.last = None;
			}
			Some(root) => unsafe {
				let mut v = root;
				while let Some(left) = (*v.as_ptr()).left {
					v = left;
				}
				self.first = Some(v);

				let mut v = root;
				while let Some(right) = (*v.as_ptr()).right {
					v = right;
				}
				self.last = Some(v);
			},
		}
	}
}

impl<T: Ord> Drop for Set<T> {
	fn drop(&mut self) {
		self.clear();
	}
}

// ---------------------------------------------------------------------------
// Standard Container Traits
// ---------------------------------------------------------------------------

impl<T: Ord + Clone> Clone for Set<T> {
	/// Produces an independent set holding the same values. Every value is
	/// re-inserted into a fresh tree; no nodes are shared, so mutating the
	/// copy never affects the source.
	fn clone(&self) -> Self {
		self.iter().cloned().collect()
	}
}

impl<T: Ord + fmt::Debug> fmt::Debug for Set<T> {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.debug_set().entries(self.iter()).finish()
	}
}

impl<T: Ord> PartialEq for Set<T> {
	fn eq(&self, other: &Self) -> bool {
		self.len == other.len && self.iter().eq(other.iter())
	}
}

impl<T: Ord> Eq for Set<T> {}

impl<T: Ord> FromIterator<T> for Set<T> {
	fn from_iter<I: IntoIterator<Item = T>>(values: I) -> Self {
		let mut set = Set::new();
		set.extend(values);
		set
	}
}

impl<T: Ord> Extend<T> for Set<T> {
	fn extend<I: IntoIterator<Item = T>>(&mut self, values: I) {
		for value in values {
			self.insert(value);
		}
	}
}

impl<T: Ord, const N: usize> From<[T; N]> for Set<T> {
	/// Builds a set from a literal list; later duplicates are dropped.
	///
	/// ```
	/// use redbud::Set;
	///
	/// let set = Set::from([3, 1, 3, 2]);
	/// assert_eq!(set.len(), 3);
	/// ```
	fn from(values: [T; N]) -> Self {
		values.into_iter().collect()
	}
}

impl<'a, T: Ord> IntoIterator for &'a Set<T> {
	type Item = &'a T;
	type IntoIter = Iter<'a, T>;

	fn into_iter(self) -> Iter<'a, T> {
		self.iter()
	}
}

impl<T: Ord> IntoIterator for Set<T> {
	type Item = T;
	type IntoIter = IntoIter<T>;

	/// Consumes the set, yielding its values in ascending order.
	fn into_iter(self) -> IntoIter<T> {
		IntoIter::new(self)
	}
}

// ---------------------------------------------------------------------------
// Invariant Validation
// ---------------------------------------------------------------------------

impl<T: Ord + fmt::Debug> Set<T> {
	/// Validates every structural invariant. Panics with diagnostic info if
	/// any invariant is violated.
	///
	/// Called after operations in tests to verify the tree maintains its
	/// integrity.
	///
	/// # Invariants Checked
	///
	/// 1. The root is black and has no parent link
	/// 2. No red node has a red child
	/// 3. Black-height is uniform across every root-to-null path
	/// 4. In-order traversal yields strictly increasing keys
	/// 5. Every child's parent link points back at its parent
	/// 6. `len` equals the number of reachable nodes
	/// 7. The boundary caches equal the true leftmost/rightmost nodes
	pub fn assert_invariants(&self) {
		unsafe {
			let Some(root) = self.root else {
				assert_eq!(self.len, 0, "empty tree must report len 0");
				assert!(
					self.first.is_none() && self.last.is_none(),
					"empty tree must have no boundary nodes"
				);
				return;
			};

			assert!((*root.as_ptr()).parent.is_none(), "root has a parent link");
			assert_eq!((*root.as_ptr()).color, Color::Black, "root must be black");

			let mut count = 0usize;
			let mut prev: Link<T> = None;
			self.validate_node(root, &mut count, &mut prev);

			assert_eq!(
				count, self.len,
				"len {} disagrees with reachable node count {}",
				self.len, count
			);

			let mut v = root;
			while let Some(left) = (*v.as_ptr()).left {
				v = left;
			}
			assert_eq!(self.first, Some(v), "stale leftmost boundary cache");

			let mut v = root;
			while let Some(right) = (*v.as_ptr()).right {
				v = right;
			}
			assert_eq!(self.last, Some(v), "stale rightmost boundary cache");
		}
	}

	/// Recursively validates the subtree under `node`, threading the
	/// in-order predecessor through `prev`, and returns the subtree's
	/// black-height. Recursion depth is bounded by the tree height.
	unsafe fn validate_node(
		&self,
		node: NonNull<Node<T>>,
		count: &mut usize,
		prev: &mut Link<T>,
	) -> usize {
		let n = &*node.as_ptr();

		if n.color == Color::Red {
			assert!(
				!is_red(n.left) && !is_red(n.right),
				"red node {:?} has a red child",
				n.key
			);
		}

		let left_height = match n.left {
			Some(left) => {
				assert_eq!(
					(*left.as_ptr()).parent,
					Some(node),
					"left child of {:?} has a bad parent link",
					n.key
				);
				self.validate_node(left, count, prev)
			}
			None => 1,
		};

		if let Some(p) = *prev {
			assert!(
				(*p.as_ptr()).key < n.key,
				"in-order keys not strictly increasing: {:?} then {:?}",
				(*p.as_ptr()).key,
				n.key
			);
		}
		*prev = Some(node);
		*count += 1;

		let right_height = match n.right {
			Some(right) => {
				assert_eq!(
					(*right.as_ptr()).parent,
					Some(node),
					"right child of {:?} has a bad parent link",
					n.key
				);
				self.validate_node(right, count, prev)
			}
			None => 1,
		};

		assert_eq!(
			left_height, right_height,
			"black-height mismatch under {:?}",
			n.key
		);

		left_height + usize::from(n.color == Color::Black)
	}
}
