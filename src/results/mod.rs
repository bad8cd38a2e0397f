//! Per-peer search results: path splitting, the compacted directory tree,
//! and the non-recursive walker used to render and query it.

pub mod builder;
pub mod node;
pub mod path;
pub mod tree;
pub mod walker;

pub use builder::build_tree;
pub use node::{Directory, Node};
pub use tree::{ResultTree, SelectedEntry};
pub use walker::TreeWalker;
