#![doc = include_str!("../README.md")]
#![cfg_attr(not(test), no_std)]
#![deny(
    unsafe_code,
    unused_imports,
    unused_variables,
    unused_must_use,
    missing_docs,
    clippy::all,
    clippy::unwrap_used,
    clippy::expect_used,
    clippy::dbg_macro,
    clippy::todo,
    clippy::unimplemented
)]
#![cfg_attr(test, allow(clippy::unwrap_used, clippy::expect_used))]

extern crate alloc;

mod error;
pub use error::{RbTreeError, Result};

mod node;
pub use node::{Color, NodeId, NodeRef};

mod rb_tree;
pub use rb_tree::RbTree;

mod traversal;
pub use traversal::{Inorder, Keys, Postorder, Preorder};

mod display;
pub use display::ColoredDump;

mod float_keys;
pub use float_keys::FloatRbTree;
