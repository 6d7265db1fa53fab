use crate::arena::{Handle, TypedArena};
use crate::splay_tree::node::Node;
use crate::splay_tree::tree::{self, Tree};
use crate::splay_tree::{Result, SearchResult};
use std::borrow::Borrow;
use std::collections::VecDeque;
use std::fmt;

/// Number of nodes reserved at a time by `SplaySet::new`.
pub const DEFAULT_CHUNK_SIZE: usize = 1024;

/// An ordered set implemented using a splay tree.
///
/// A splay tree is a self-adjusting binary search tree with the additional property that recently
/// accessed keys are quick to access again. Every `insert`, `search` and `remove` splays the
/// accessed key (or the last node on its search path) to the root using a single top-down pass,
/// which gives amortized `O(log n)` operations without storing any balance information.
///
/// Nodes live in a `TypedArena` owned by the set, so running out of memory while inserting is
/// reported as an `Error` instead of aborting.
///
/// # Examples
///
/// ```
/// use splay_collections::splay_tree::SplaySet;
///
/// let mut set = SplaySet::new();
/// for key in &[10, 20, 30, 40, 50] {
///     set.insert(*key).unwrap();
/// }
///
/// assert!(set.search(&30).found);
/// assert_eq!(set.root(), Some(&30));
///
/// assert!(!set.search(&25).found);
/// assert_eq!(set.remove(&30), Some(30));
/// assert!(!set.contains(&30));
/// assert_eq!(set.len(), 4);
/// ```
pub struct SplaySet<T> {
    arena: TypedArena<Node<T>>,
    tree: Tree,
    len: usize,
}

impl<T> SplaySet<T> {
    /// Constructs a new, empty `SplaySet<T>`.
    ///
    /// # Examples
    ///
    /// ```
    /// use splay_collections::splay_tree::SplaySet;
    ///
    /// let set: SplaySet<u32> = SplaySet::new();
    /// ```
    pub fn new() -> Self {
        Self::with_chunk_size(DEFAULT_CHUNK_SIZE)
    }

    /// Constructs a new, empty `SplaySet<T>` whose node storage grows `chunk_size` nodes at a
    /// time.
    ///
    /// # Examples
    ///
    /// ```
    /// use splay_collections::splay_tree::SplaySet;
    ///
    /// let mut set = SplaySet::with_chunk_size(16);
    /// set.insert(1).unwrap();
    /// ```
    pub fn with_chunk_size(chunk_size: usize) -> Self {
        SplaySet {
            arena: TypedArena::new(chunk_size),
            tree: None,
            len: 0,
        }
    }

    /// Inserts a key into the set and splays it to the root. Returns `Ok(false)` and leaves the
    /// set unchanged if the key already exists.
    ///
    /// # Errors
    ///
    /// Returns `Error::AllocationFailed` if a node for the new key could not be allocated.
    ///
    /// # Examples
    ///
    /// ```
    /// use splay_collections::splay_tree::SplaySet;
    ///
    /// let mut set = SplaySet::new();
    /// assert_eq!(set.insert(1).unwrap(), true);
    /// assert_eq!(set.insert(1).unwrap(), false);
    /// assert_eq!(set.len(), 1);
    /// ```
    pub fn insert(&mut self, key: T) -> Result<bool>
    where
        T: Ord,
    {
        let SplaySet { arena, tree, len } = self;
        let inserted = tree::insert(arena, tree, key)?;
        if inserted {
            *len += 1;
        }
        Ok(inserted)
    }

    /// Searches for a key, splaying it (or the last node on its search path) to the root. The
    /// tree is restructured even when the key is absent.
    ///
    /// # Examples
    ///
    /// ```
    /// use splay_collections::splay_tree::SplaySet;
    ///
    /// let mut set = SplaySet::new();
    /// set.insert(1).unwrap();
    /// set.insert(2).unwrap();
    ///
    /// let result = set.search(&1);
    /// assert!(result.found);
    /// assert_eq!(result.steps, 1);
    /// assert!(!set.search(&3).found);
    /// ```
    pub fn search<V>(&mut self, key: &V) -> SearchResult
    where
        T: Borrow<V>,
        V: Ord + ?Sized,
    {
        tree::search(&mut self.arena, &mut self.tree, key)
    }

    /// Removes a key from the set. If the key exists in the set, it will return the key.
    /// Otherwise it will return `None`, though the tree is still splayed toward the key.
    ///
    /// # Examples
    ///
    /// ```
    /// use splay_collections::splay_tree::SplaySet;
    ///
    /// let mut set = SplaySet::new();
    /// set.insert(1).unwrap();
    /// assert_eq!(set.remove(&1), Some(1));
    /// assert_eq!(set.remove(&1), None);
    /// ```
    pub fn remove<V>(&mut self, key: &V) -> Option<T>
    where
        T: Borrow<V>,
        V: Ord + ?Sized,
    {
        let SplaySet { arena, tree, len } = self;
        tree::remove(arena, tree, key).map(|key| {
            *len -= 1;
            key
        })
    }

    /// Checks if a key exists in the set. Note that `contains` does not splay the tree in order
    /// to use a non-mutable reference.
    ///
    /// # Examples
    ///
    /// ```
    /// use splay_collections::splay_tree::SplaySet;
    ///
    /// let mut set = SplaySet::new();
    /// set.insert(1).unwrap();
    /// assert!(!set.contains(&0));
    /// assert!(set.contains(&1));
    /// ```
    pub fn contains<V>(&self, key: &V) -> bool
    where
        T: Borrow<V>,
        V: Ord + ?Sized,
    {
        tree::get(&self.arena, &self.tree, key).is_some()
    }

    /// Returns the key at the root of the tree, which is the most recently accessed key after a
    /// successful operation.
    ///
    /// # Examples
    ///
    /// ```
    /// use splay_collections::splay_tree::SplaySet;
    ///
    /// let mut set = SplaySet::new();
    /// set.insert(1).unwrap();
    /// set.insert(2).unwrap();
    /// assert_eq!(set.root(), Some(&2));
    /// set.search(&1);
    /// assert_eq!(set.root(), Some(&1));
    /// ```
    pub fn root(&self) -> Option<&T> {
        self.tree.map(|handle| &self.arena[handle].key)
    }

    /// Returns the number of keys in the set.
    ///
    /// # Examples
    ///
    /// ```
    /// use splay_collections::splay_tree::SplaySet;
    ///
    /// let mut set = SplaySet::new();
    /// set.insert(1).unwrap();
    /// assert_eq!(set.len(), 1);
    /// ```
    pub fn len(&self) -> usize {
        self.len
    }

    /// Returns `true` if the set contains no keys.
    ///
    /// # Examples
    ///
    /// ```
    /// use splay_collections::splay_tree::SplaySet;
    ///
    /// let set: SplaySet<u32> = SplaySet::new();
    /// assert!(set.is_empty());
    /// ```
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Clears the set, removing all keys.
    ///
    /// # Examples
    ///
    /// ```
    /// use splay_collections::splay_tree::SplaySet;
    ///
    /// let mut set = SplaySet::new();
    /// set.insert(1).unwrap();
    /// set.insert(2).unwrap();
    /// set.clear();
    /// assert!(set.is_empty());
    /// assert_eq!(set.level_order().map(|keys| keys.count()), None);
    /// ```
    pub fn clear(&mut self) {
        self.arena.clear();
        self.tree = None;
        self.len = 0;
    }

    /// Returns a key in the set that is less than or equal to a particular key. Returns `None`
    /// if such a key does not exist. Note that `floor` does not splay the tree.
    ///
    /// # Examples
    ///
    /// ```
    /// use splay_collections::splay_tree::SplaySet;
    ///
    /// let mut set = SplaySet::new();
    /// set.insert(1).unwrap();
    /// assert_eq!(set.floor(&0), None);
    /// assert_eq!(set.floor(&2), Some(&1));
    /// ```
    pub fn floor<V>(&self, key: &V) -> Option<&T>
    where
        T: Borrow<V>,
        V: Ord + ?Sized,
    {
        tree::floor(&self.arena, &self.tree, key)
    }

    /// Returns a key in the set that is greater than or equal to a particular key. Returns `None`
    /// if such a key does not exist. Note that `ceil` does not splay the tree.
    ///
    /// # Examples
    ///
    /// ```
    /// use splay_collections::splay_tree::SplaySet;
    ///
    /// let mut set = SplaySet::new();
    /// set.insert(1).unwrap();
    /// assert_eq!(set.ceil(&0), Some(&1));
    /// assert_eq!(set.ceil(&2), None);
    /// ```
    pub fn ceil<V>(&self, key: &V) -> Option<&T>
    where
        T: Borrow<V>,
        V: Ord + ?Sized,
    {
        tree::ceil(&self.arena, &self.tree, key)
    }

    /// Returns the minimum key of the set. Returns `None` if the set is empty.
    ///
    /// # Examples
    ///
    /// ```
    /// use splay_collections::splay_tree::SplaySet;
    ///
    /// let mut set = SplaySet::new();
    /// assert_eq!(set.min(), None);
    /// set.insert(3).unwrap();
    /// set.insert(1).unwrap();
    /// assert_eq!(set.min(), Some(&1));
    /// ```
    pub fn min(&self) -> Option<&T> {
        tree::min(&self.arena, &self.tree)
    }

    /// Returns the maximum key of the set. Returns `None` if the set is empty.
    ///
    /// # Examples
    ///
    /// ```
    /// use splay_collections::splay_tree::SplaySet;
    ///
    /// let mut set = SplaySet::new();
    /// assert_eq!(set.max(), None);
    /// set.insert(1).unwrap();
    /// set.insert(3).unwrap();
    /// assert_eq!(set.max(), Some(&3));
    /// ```
    pub fn max(&self) -> Option<&T> {
        tree::max(&self.arena, &self.tree)
    }

    /// Returns an iterator over the set in breadth-first order starting at the root, visiting left
    /// children before right children. Returns `None` if the set is empty. The tree is not
    /// splayed.
    ///
    /// # Examples
    ///
    /// ```
    /// use splay_collections::splay_tree::SplaySet;
    ///
    /// let mut set = SplaySet::new();
    /// set.insert(10).unwrap();
    /// set.insert(30).unwrap();
    /// set.insert(20).unwrap();
    ///
    /// let keys: Vec<&u32> = set.level_order().unwrap().collect();
    /// assert_eq!(keys, vec![&20, &10, &30]);
    /// ```
    pub fn level_order(&self) -> Option<SplaySetLevelOrder<'_, T>> {
        self.tree.map(|root| {
            let mut queue = VecDeque::new();
            queue.push_back(root);
            SplaySetLevelOrder {
                arena: &self.arena,
                queue,
            }
        })
    }

    /// Returns an iterator over the set in ascending order. The tree is not splayed.
    ///
    /// # Examples
    ///
    /// ```
    /// use splay_collections::splay_tree::SplaySet;
    ///
    /// let mut set = SplaySet::new();
    /// set.insert(1).unwrap();
    /// set.insert(5).unwrap();
    /// set.insert(3).unwrap();
    ///
    /// assert_eq!(set.iter().collect::<Vec<&u32>>(), vec![&1, &3, &5]);
    /// ```
    pub fn iter(&self) -> SplaySetIter<'_, T> {
        SplaySetIter {
            arena: &self.arena,
            current: self.tree,
            stack: Vec::new(),
        }
    }
}

impl<T> Default for SplaySet<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T> fmt::Debug for SplaySet<T>
where
    T: fmt::Debug,
{
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_set().entries(self.iter()).finish()
    }
}

impl<'a, T> IntoIterator for &'a SplaySet<T>
where
    T: 'a,
{
    type Item = &'a T;
    type IntoIter = SplaySetIter<'a, T>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

/// An iterator for `SplaySet<T>`.
///
/// This iterator traverses the elements of the set in ascending order and yields immutable
/// references.
pub struct SplaySetIter<'a, T>
where
    T: 'a,
{
    arena: &'a TypedArena<Node<T>>,
    current: Tree,
    stack: Vec<Handle>,
}

impl<'a, T> Iterator for SplaySetIter<'a, T>
where
    T: 'a,
{
    type Item = &'a T;

    fn next(&mut self) -> Option<Self::Item> {
        let arena = self.arena;
        while let Some(handle) = self.current {
            self.stack.push(handle);
            self.current = arena[handle].left;
        }
        self.stack.pop().map(|handle| {
            let node = &arena[handle];
            self.current = node.right;
            &node.key
        })
    }
}

/// A breadth-first iterator for `SplaySet<T>`.
pub struct SplaySetLevelOrder<'a, T>
where
    T: 'a,
{
    arena: &'a TypedArena<Node<T>>,
    queue: VecDeque<Handle>,
}

impl<'a, T> Iterator for SplaySetLevelOrder<'a, T>
where
    T: 'a,
{
    type Item = &'a T;

    fn next(&mut self) -> Option<Self::Item> {
        let arena = self.arena;
        self.queue.pop_front().map(|handle| {
            let node = &arena[handle];
            self.queue.extend(node.left);
            self.queue.extend(node.right);
            &node.key
        })
    }
}
