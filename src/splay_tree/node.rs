use crate::arena::{Handle, TypedArena};
use crate::splay_tree::tree::Tree;

pub struct Node<T> {
    pub key: T,
    pub left: Tree,
    pub right: Tree,
}

impl<T> Node<T> {
    pub fn new(key: T) -> Self {
        Node {
            key,
            left: None,
            right: None,
        }
    }
}

/// Lifts the left child of `node` above it and returns the new subtree root.
pub fn rotate_right<T>(arena: &mut TypedArena<Node<T>>, node: Handle) -> Handle {
    let child = arena[node].left.expect("Expected left child node to be `Some`.");
    arena[node].left = arena[child].right;
    arena[child].right = Some(node);
    child
}

/// Lifts the right child of `node` above it and returns the new subtree root.
pub fn rotate_left<T>(arena: &mut TypedArena<Node<T>>, node: Handle) -> Handle {
    let child = arena[node].right.expect("Expected right child node to be `Some`.");
    arena[node].right = arena[child].left;
    arena[child].left = Some(node);
    child
}
