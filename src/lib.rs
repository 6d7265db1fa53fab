//! An ordered set backed by a self-adjusting splay tree.
//!
//! Every access splays the touched key toward the root using a single top-down pass,
//! so recently and frequently used keys stay cheap to reach. Nodes are stored in a
//! [`TypedArena`](arena::TypedArena) owned by the set and linked by handles; no node
//! has a parent link and none stores balance metadata.

pub mod arena;
pub mod splay_tree;
