//! Self-adjusting binary search tree with the additional property that recently accessed elements
//! are quick to access again.

mod node;
mod set;
mod tree;

pub use self::set::{SplaySet, SplaySetIter, SplaySetLevelOrder, DEFAULT_CHUNK_SIZE};

use std::collections::TryReserveError;
use std::result;
use thiserror::Error;

/// The error type for operations on a `SplaySet<T>`. A missing key is never an error.
#[derive(Debug, Error)]
pub enum Error {
    /// Memory for a new tree node could not be reserved.
    #[error("failed to allocate tree node: {0}")]
    AllocationFailed(#[from] TryReserveError),
}

pub type Result<T> = result::Result<T, Error>;

/// The outcome of a splaying search.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub struct SearchResult {
    /// Whether the key was present. If it was, it is now the root of the tree.
    pub found: bool,
    /// Number of tree levels descended while splaying. This is purely diagnostic.
    pub steps: usize,
}
