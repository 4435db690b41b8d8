//! Comment threads
//!
//! Course pages receive comments as a flat list where replies point at
//! their parent through `parentId`. [`build_tree`] nests them for display;
//! [`CommentTree`] exposes the underlying arena for callers that need to
//! inspect dropped comments or walk the thread with depths.

mod tree;
mod types;

pub use tree::{build_tree, CommentTree, DropReason, DroppedComment};
pub use types::{Comment, CommentNode};
