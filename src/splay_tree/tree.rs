use crate::arena::{Handle, TypedArena};
use crate::splay_tree::node::{rotate_left, rotate_right, Node};
use crate::splay_tree::{Result, SearchResult};
use log::{trace, warn};
use std::borrow::Borrow;
use std::cmp::Ordering;

pub type Tree = Option<Handle>;

enum Rotation {
    ZigZig,
    ZigZag,
    ZagZig,
    ZagZag,
}

// A level of the descent whose grandchild subtree is splayed before `node` is restructured.
struct Frame {
    node: Handle,
    child: Handle,
    rotation: Rotation,
}

fn lift_left<T>(arena: &mut TypedArena<Node<T>>, node: Handle) -> Handle {
    match arena[node].left {
        Some(_) => rotate_right(arena, node),
        None => node,
    }
}

fn lift_right<T>(arena: &mut TypedArena<Node<T>>, node: Handle) -> Handle {
    match arena[node].right {
        Some(_) => rotate_left(arena, node),
        None => node,
    }
}

/// Splays `tree` toward `key` and returns the new subtree root together with the number of tree
/// levels descended.
///
/// The returned root holds `key` if it is present in the subtree. Otherwise it is the last node
/// visited on the search path, the node that would become the parent of `key`.
///
/// Each level compares `key` against a node and its child, records the pending zig-zig or
/// zig-zag case and descends two levels. The recorded cases are then applied bottom-up to the
/// splayed grandchild subtree, so the path is kept on an explicit stack rather than the call
/// stack and degenerate trees cannot overflow it.
pub fn splay<T, V>(arena: &mut TypedArena<Node<T>>, tree: Tree, key: &V) -> (Tree, usize)
where
    T: Borrow<V>,
    V: Ord + ?Sized,
{
    let mut frames = Vec::new();
    let mut steps = 0;
    let mut current = tree;

    let mut splayed = loop {
        let node = match current {
            Some(node) => node,
            None => break None,
        };

        match key.cmp(arena[node].key.borrow()) {
            Ordering::Equal => break Some(node),
            Ordering::Less => {
                steps += 1;
                let child = match arena[node].left {
                    Some(child) => child,
                    None => break Some(node),
                };
                let (rotation, next) = match key.cmp(arena[child].key.borrow()) {
                    Ordering::Less => (Rotation::ZigZig, arena[child].left),
                    Ordering::Greater => (Rotation::ZigZag, arena[child].right),
                    Ordering::Equal => break Some(rotate_right(arena, node)),
                };
                frames.push(Frame { node, child, rotation });
                current = next;
            },
            Ordering::Greater => {
                steps += 1;
                let child = match arena[node].right {
                    Some(child) => child,
                    None => break Some(node),
                };
                let (rotation, next) = match key.cmp(arena[child].key.borrow()) {
                    Ordering::Less => (Rotation::ZagZig, arena[child].left),
                    Ordering::Greater => (Rotation::ZagZag, arena[child].right),
                    Ordering::Equal => break Some(rotate_left(arena, node)),
                };
                frames.push(Frame { node, child, rotation });
                current = next;
            },
        }
    };

    while let Some(Frame { node, child, rotation }) = frames.pop() {
        let root = match rotation {
            Rotation::ZigZig => {
                arena[child].left = splayed;
                let node = rotate_right(arena, node);
                lift_left(arena, node)
            },
            Rotation::ZigZag => {
                arena[child].right = splayed;
                if splayed.is_some() {
                    arena[node].left = Some(rotate_left(arena, child));
                }
                lift_left(arena, node)
            },
            Rotation::ZagZig => {
                arena[child].left = splayed;
                if splayed.is_some() {
                    arena[node].right = Some(rotate_right(arena, child));
                }
                lift_right(arena, node)
            },
            Rotation::ZagZag => {
                arena[child].right = splayed;
                let node = rotate_left(arena, node);
                lift_right(arena, node)
            },
        };
        splayed = Some(root);
    }

    (splayed, steps)
}

/// Inserts `key` and makes it the root. Returns `Ok(false)` without modifying the key set if the
/// key is already present.
pub fn insert<T>(arena: &mut TypedArena<Node<T>>, tree: &mut Tree, key: T) -> Result<bool>
where
    T: Ord,
{
    let root = match *tree {
        Some(root) => root,
        None => {
            *tree = Some(arena.allocate(Node::new(key)).map_err(|err| {
                warn!("Failed to allocate root node: {}", err);
                err
            })?);
            trace!("Inserted key as the root of an empty tree.");
            return Ok(true);
        },
    };

    let (splayed, steps) = splay(arena, Some(root), &key);
    let root = splayed.expect("Expected non-empty tree.");
    *tree = Some(root);

    let ordering = key.cmp(&arena[root].key);
    if ordering == Ordering::Equal {
        trace!("Duplicate key found after {} steps.", steps);
        return Ok(false);
    }

    let new_node = arena.allocate(Node::new(key)).map_err(|err| {
        warn!("Failed to allocate tree node: {}", err);
        err
    })?;
    if ordering == Ordering::Less {
        arena[new_node].left = arena[root].left.take();
        arena[new_node].right = Some(root);
    } else {
        arena[new_node].right = arena[root].right.take();
        arena[new_node].left = Some(root);
    }
    *tree = Some(new_node);
    trace!("Inserted key after {} steps.", steps);
    Ok(true)
}

/// Splays the tree toward `key` and reports whether the new root holds `key`.
pub fn search<T, V>(arena: &mut TypedArena<Node<T>>, tree: &mut Tree, key: &V) -> SearchResult
where
    T: Borrow<V>,
    V: Ord + ?Sized,
{
    let (splayed, steps) = splay(arena, *tree, key);
    *tree = splayed;
    let found = match splayed {
        Some(root) => arena[root].key.borrow() == key,
        None => false,
    };
    trace!("Search finished after {} steps (found: {}).", steps, found);
    SearchResult { found, steps }
}

/// Removes `key` from the tree and returns it. The tree is left splayed toward `key` if it is
/// absent.
pub fn remove<T, V>(arena: &mut TypedArena<Node<T>>, tree: &mut Tree, key: &V) -> Option<T>
where
    T: Borrow<V>,
    V: Ord + ?Sized,
{
    let (splayed, _) = splay(arena, *tree, key);
    *tree = splayed;
    let root = splayed?;
    if arena[root].key.borrow() != key {
        trace!("Key to remove is absent.");
        return None;
    }

    let Node {
        key: removed,
        left,
        right,
    } = arena.free(&root);
    *tree = match left {
        Some(left_child) => {
            // every key on the left is smaller, so this brings the maximum to the root
            let (joined, _) = splay(arena, Some(left_child), key);
            let joined = joined.expect("Expected non-empty left subtree.");
            debug_assert!(arena[joined].right.is_none());
            arena[joined].right = right;
            Some(joined)
        },
        None => right,
    };
    trace!("Removed key from the tree.");
    Some(removed)
}

pub fn get<'a, T, V>(arena: &'a TypedArena<Node<T>>, tree: &Tree, key: &V) -> Option<&'a T>
where
    T: Borrow<V>,
    V: Ord + ?Sized,
{
    let mut curr = *tree;
    while let Some(handle) = curr {
        let node = &arena[handle];
        curr = match key.cmp(node.key.borrow()) {
            Ordering::Less => node.left,
            Ordering::Greater => node.right,
            Ordering::Equal => return Some(&node.key),
        };
    }
    None
}

pub fn ceil<'a, T, V>(arena: &'a TypedArena<Node<T>>, tree: &Tree, key: &V) -> Option<&'a T>
where
    T: Borrow<V>,
    V: Ord + ?Sized,
{
    let mut curr = *tree;
    let mut best = None;
    while let Some(handle) = curr {
        let node = &arena[handle];
        curr = match key.cmp(node.key.borrow()) {
            Ordering::Greater => node.right,
            Ordering::Less => {
                best = Some(&node.key);
                node.left
            },
            Ordering::Equal => return Some(&node.key),
        };
    }
    best
}

pub fn floor<'a, T, V>(arena: &'a TypedArena<Node<T>>, tree: &Tree, key: &V) -> Option<&'a T>
where
    T: Borrow<V>,
    V: Ord + ?Sized,
{
    let mut curr = *tree;
    let mut best = None;
    while let Some(handle) = curr {
        let node = &arena[handle];
        curr = match key.cmp(node.key.borrow()) {
            Ordering::Less => node.left,
            Ordering::Greater => {
                best = Some(&node.key);
                node.right
            },
            Ordering::Equal => return Some(&node.key),
        };
    }
    best
}

pub fn min<'a, T>(arena: &'a TypedArena<Node<T>>, tree: &Tree) -> Option<&'a T> {
    tree.map(|handle| {
        let mut curr = &arena[handle];
        while let Some(left) = curr.left {
            curr = &arena[left];
        }
        &curr.key
    })
}

pub fn max<'a, T>(arena: &'a TypedArena<Node<T>>, tree: &Tree) -> Option<&'a T> {
    tree.map(|handle| {
        let mut curr = &arena[handle];
        while let Some(right) = curr.right {
            curr = &arena[right];
        }
        &curr.key
    })
}

#[cfg(test)]
mod tests {
    use super::{insert, remove, search, splay, Tree};
    use crate::arena::TypedArena;
    use crate::splay_tree::node::Node;

    fn build(keys: &[u32]) -> (TypedArena<Node<u32>>, Tree) {
        let mut arena = TypedArena::new(64);
        let mut tree = None;
        for key in keys {
            insert(&mut arena, &mut tree, *key).unwrap();
        }
        (arena, tree)
    }

    fn key_of(arena: &TypedArena<Node<u32>>, tree: Tree) -> Option<u32> {
        tree.map(|handle| arena[handle].key)
    }

    fn children(arena: &TypedArena<Node<u32>>, tree: Tree) -> (Option<u32>, Option<u32>) {
        let node = &arena[tree.unwrap()];
        (key_of(arena, node.left), key_of(arena, node.right))
    }

    #[test]
    fn test_splay_empty() {
        let mut arena: TypedArena<Node<u32>> = TypedArena::new(64);
        assert_eq!(splay(&mut arena, None, &1u32), (None, 0));
    }

    #[test]
    fn test_splay_root_match_takes_no_steps() {
        let (mut arena, tree) = build(&[1, 2, 3]);
        let (root, steps) = splay(&mut arena, tree, &3);
        assert_eq!(root, tree);
        assert_eq!(steps, 0);
    }

    #[test]
    fn test_insert_ascending_builds_left_chain() {
        let (arena, tree) = build(&[10, 20, 30, 40, 50]);
        assert_eq!(key_of(&arena, tree), Some(50));
        let mut curr = tree;
        let mut keys = Vec::new();
        while let Some(handle) = curr {
            assert_eq!(arena[handle].right, None);
            keys.push(arena[handle].key);
            curr = arena[handle].left;
        }
        assert_eq!(keys, vec![50, 40, 30, 20, 10]);
    }

    #[test]
    fn test_zig_zig() {
        let (mut arena, mut tree) = build(&[10, 20, 30, 40, 50]);
        let result = search(&mut arena, &mut tree, &30);
        assert!(result.found);
        assert_eq!(result.steps, 1);
        assert_eq!(key_of(&arena, tree), Some(30));
        assert_eq!(children(&arena, tree), (Some(20), Some(40)));
        let right = arena[tree.unwrap()].right;
        assert_eq!(children(&arena, right), (None, Some(50)));
    }

    #[test]
    fn test_zig_zag_miss() {
        let (mut arena, mut tree) = build(&[10, 20, 30, 40, 50]);
        search(&mut arena, &mut tree, &30);
        let result = search(&mut arena, &mut tree, &25);
        assert!(!result.found);
        assert_eq!(result.steps, 1);
        assert_eq!(key_of(&arena, tree), Some(20));
        assert_eq!(children(&arena, tree), (Some(10), Some(30)));
    }

    #[test]
    fn test_zag_zig_miss() {
        // 20 -> (10, 40 -> (None, 50))
        let (mut arena, mut tree) = build(&[10, 20, 30, 40, 50]);
        search(&mut arena, &mut tree, &30);
        search(&mut arena, &mut tree, &25);
        remove(&mut arena, &mut tree, &30);
        assert_eq!(key_of(&arena, tree), Some(20));
        assert_eq!(children(&arena, tree), (Some(10), Some(40)));

        let result = search(&mut arena, &mut tree, &30);
        assert!(!result.found);
        assert_eq!(result.steps, 1);
        assert_eq!(key_of(&arena, tree), Some(40));
        assert_eq!(children(&arena, tree), (Some(20), Some(50)));
    }

    #[test]
    fn test_zag_zag() {
        let (mut arena, mut tree) = build(&[50, 40, 30, 20, 10]);
        let result = search(&mut arena, &mut tree, &30);
        assert!(result.found);
        assert_eq!(key_of(&arena, tree), Some(30));
        assert_eq!(children(&arena, tree), (Some(20), Some(40)));
    }

    #[test]
    fn test_deep_search_counts_levels() {
        let (mut arena, mut tree) = build(&[1, 2, 3, 4, 5, 6, 7, 8, 9]);
        // left chain rooted at 9; each step descends two levels
        let result = search(&mut arena, &mut tree, &1);
        assert!(result.found);
        assert_eq!(result.steps, 4);
        assert_eq!(key_of(&arena, tree), Some(1));
    }

    #[test]
    fn test_insert_duplicate() {
        let (mut arena, mut tree) = build(&[1, 2, 3]);
        assert!(!insert(&mut arena, &mut tree, 2).unwrap());
        assert_eq!(key_of(&arena, tree), Some(2));
        assert_eq!(arena.len(), 3);
    }

    #[test]
    fn test_insert_between_keys() {
        let (mut arena, mut tree) = build(&[10, 30]);
        assert!(insert(&mut arena, &mut tree, 20).unwrap());
        assert_eq!(key_of(&arena, tree), Some(20));
        assert_eq!(children(&arena, tree), (Some(10), Some(30)));
    }

    #[test]
    fn test_remove_root_without_left_child() {
        let (mut arena, mut tree) = build(&[2, 1]);
        assert_eq!(remove(&mut arena, &mut tree, &1), Some(1));
        assert_eq!(key_of(&arena, tree), Some(2));
        assert_eq!(arena.len(), 1);
    }

    #[test]
    fn test_remove_absent_leaves_tree_splayed() {
        let (mut arena, mut tree) = build(&[10, 20, 30]);
        assert_eq!(remove(&mut arena, &mut tree, &15), None);
        assert_eq!(arena.len(), 3);
        assert_eq!(key_of(&arena, tree), Some(10));
    }

    #[test]
    fn test_remove_last_key() {
        let (mut arena, mut tree) = build(&[1]);
        assert_eq!(remove(&mut arena, &mut tree, &1), Some(1));
        assert_eq!(tree, None);
        assert!(arena.is_empty());
        assert_eq!(remove(&mut arena, &mut tree, &1), None);
    }
}
