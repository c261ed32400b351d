//! Test utilities for building sample trees from JSON fixtures.
//!
//! Fixtures describe a node graph shape and coloring directly, bypassing
//! the insertion path, so the invariant validator can be exercised against
//! known-good and known-broken structures.

use crate::{Color, Link, Node, Set};
use serde::Deserialize;
use std::ptr::NonNull;

/// A balanced 7-node tree holding 1..=7.
pub(crate) const VALID_TREE: &str = r#"{
	"key": 4, "red": false,
	"left":  { "key": 2, "red": false,
		"left":  { "key": 1, "red": true },
		"right": { "key": 3, "red": true } },
	"right": { "key": 6, "red": false,
		"left":  { "key": 5, "red": true },
		"right": { "key": 7, "red": true } }
}"#;

/// A red node with a red child.
pub(crate) const RED_RED_TREE: &str = r#"{
	"key": 3, "red": false,
	"left": { "key": 2, "red": true,
		"left": { "key": 1, "red": true } }
}"#;

/// Unequal black counts on the two root-to-null paths.
pub(crate) const UNEVEN_TREE: &str = r#"{
	"key": 2, "red": false,
	"left": { "key": 1, "red": false }
}"#;

#[derive(Deserialize, Debug)]
struct TreeNode {
	key: i32,
	red: bool,
	#[serde(default)]
	left: Option<Box<TreeNode>>,
	#[serde(default)]
	right: Option<Box<TreeNode>>,
}

fn translate_node(tree_node: TreeNode, parent: Link<i32>, count: &mut usize) -> NonNull<Node<i32>> {
	*count += 1;
	let color = if tree_node.red { Color::Red } else { Color::Black };
	let node = Node::new(tree_node.key, color, parent);
	if let Some(left) = tree_node.left {
		let child = translate_node(*left, Some(node), count);
		unsafe {
			(*node.as_ptr()).left = Some(child);
		}
	}
	if let Some(right) = tree_node.right {
		let child = translate_node(*right, Some(node), count);
		unsafe {
			(*node.as_ptr()).right = Some(child);
		}
	}
	node
}

/// Builds a set from a JSON shape description. The shape is taken at face
/// value; validation is the caller's business.
pub(crate) fn sample_set(json: &str) -> Set<i32> {
	let shape: TreeNode = serde_json::from_str(json).expect("fixture JSON is well formed");
	let mut count = 0;
	let root = translate_node(shape, None, &mut count);
	Set::from_raw_parts(Some(root), count)
}
