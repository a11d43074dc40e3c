//! Error types for the red-black tree.

use thiserror::Error;

/// Result type alias using [`RbTreeError`]
pub type Result<T> = core::result::Result<T, RbTreeError>;

/// Failures reported by [`RbTree`](crate::RbTree) operations.
///
/// Every failing operation reports before it mutates anything, so the tree is
/// left exactly as it was when an error is returned.
#[derive(Debug, Error, Clone, Copy, PartialEq, Eq)]
pub enum RbTreeError {
    /// The key is not stored in the tree (search, delete, successor)
    #[error("key not found")]
    NotFound,

    /// A structural query was made on a tree with no nodes
    #[error("tree is empty")]
    EmptyTree,

    /// A rotation was requested around a node lacking the child it pivots on.
    ///
    /// Fixup code never triggers this on a valid tree; seeing it means an
    /// internal invariant was already broken.
    #[error("cannot rotate: required child is the sentinel")]
    InvalidRotation,
}
