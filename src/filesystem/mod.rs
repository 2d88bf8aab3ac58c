//! Filesystem primitives shared by the remote mirror and the local sync.
//!
//! This module provides the node representation used by tree listings,
//! idempotent directory creation and best-effort removal of scratch trees.

mod cleanup;
mod directory;
mod tree;

pub use cleanup::remove_tree_best_effort;
pub use directory::{EnsureDirError, ensure};
pub use tree::{EntryKind, TreeEntry, join_remote};
