//! Flat comment list → reply tree
//!
//! Comments live in an arena (`Vec<Node>`) indexed by id. Linking a reply
//! to its parent pushes the reply's index onto the parent's child list, so
//! construction is two linear passes with no recursion.

use std::collections::HashMap;

use super::types::{Comment, CommentNode};

/// Why a comment is missing from the tree
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DropReason {
    /// `parentId` names a comment that is not in the input
    Orphan,
    /// Another comment earlier in the input has the same id
    DuplicateId,
    /// Linked to a parent, but no chain of parents reaches a root
    /// (descendant of an orphan, or part of a cycle)
    Unreachable,
}

/// A comment left out of the tree
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DroppedComment {
    pub id: String,
    pub reason: DropReason,
}

#[derive(Debug, Clone)]
struct Node {
    comment: Comment,
    parent: Option<usize>,
    replies: Vec<usize>,
}

/// Arena-backed comment forest
#[derive(Debug, Clone, Default)]
pub struct CommentTree {
    nodes: Vec<Node>,
    index: HashMap<String, usize>,
    roots: Vec<usize>,
    dropped: Vec<DroppedComment>,
}

impl CommentTree {
    /// Build the forest from comments in display order
    ///
    /// Roots and siblings keep their input order. Orphans are dropped, not
    /// promoted to roots. Never fails.
    pub fn build(comments: impl IntoIterator<Item = Comment>) -> Self {
        let mut tree = CommentTree::default();

        // First pass: one arena slot per distinct id
        for mut comment in comments {
            if tree.index.contains_key(&comment.id) {
                tracing::debug!("Dropping comment with duplicate id {}", comment.id);
                tree.dropped.push(DroppedComment {
                    id: comment.id,
                    reason: DropReason::DuplicateId,
                });
                continue;
            }

            // Output nesting is ours; ignore any incoming value
            comment.fields.remove("replies");
            tree.index.insert(comment.id.clone(), tree.nodes.len());
            tree.nodes.push(Node {
                comment,
                parent: None,
                replies: Vec::new(),
            });
        }

        // Second pass: link in input order
        for i in 0..tree.nodes.len() {
            let parent = tree.nodes[i]
                .comment
                .parent()
                .map(|p| tree.index.get(p).copied());

            match parent {
                Some(Some(p)) => {
                    tree.nodes[i].parent = Some(p);
                    tree.nodes[p].replies.push(i);
                }
                Some(None) => {
                    tracing::debug!(
                        "Dropping orphan comment {} (parent {:?} not found)",
                        tree.nodes[i].comment.id,
                        tree.nodes[i].comment.parent_id
                    );
                    tree.dropped.push(DroppedComment {
                        id: tree.nodes[i].comment.id.clone(),
                        reason: DropReason::Orphan,
                    });
                }
                None => tree.roots.push(i),
            }
        }

        tree.mark_unreachable();

        tracing::info!(
            "Built comment tree: {} roots, {} comments reachable, {} dropped",
            tree.roots.len(),
            tree.reachable_len(),
            tree.dropped.len()
        );

        tree
    }

    /// Record linked comments that no root reaches
    fn mark_unreachable(&mut self) {
        let mut reachable = vec![false; self.nodes.len()];
        for (i, _) in self.preorder() {
            reachable[i] = true;
        }

        for (i, node) in self.nodes.iter().enumerate() {
            if !reachable[i] && node.parent.is_some() {
                self.dropped.push(DroppedComment {
                    id: node.comment.id.clone(),
                    reason: DropReason::Unreachable,
                });
            }
        }
    }

    /// Depth-first walk from the roots: `(arena index, depth)`
    fn preorder(&self) -> Vec<(usize, usize)> {
        let mut order = Vec::new();
        let mut stack: Vec<(usize, usize)> = self.roots.iter().rev().map(|&r| (r, 0)).collect();

        while let Some((i, depth)) = stack.pop() {
            order.push((i, depth));
            stack.extend(self.nodes[i].replies.iter().rev().map(|&c| (c, depth + 1)));
        }

        order
    }

    /// Root comments in input order
    pub fn roots(&self) -> impl Iterator<Item = &Comment> + '_ {
        self.roots.iter().map(move |&i| &self.nodes[i].comment)
    }

    /// Direct replies to `id`, in input order; empty if `id` is unknown
    pub fn replies(&self, id: &str) -> impl Iterator<Item = &Comment> + '_ {
        self.index
            .get(id)
            .into_iter()
            .flat_map(move |&i| self.nodes[i].replies.iter())
            .map(move |&c| &self.nodes[c].comment)
    }

    /// Look up a comment by id, whether or not it is reachable
    pub fn get(&self, id: &str) -> Option<&Comment> {
        self.index.get(id).map(|&i| &self.nodes[i].comment)
    }

    /// Nesting depth of a comment in the tree (roots are 0)
    ///
    /// `None` if the comment is unknown or not part of the tree.
    pub fn depth_of(&self, id: &str) -> Option<usize> {
        let mut current = *self.index.get(id)?;
        let mut depth = 0;

        // A chain longer than the arena can only be a cycle
        for _ in 0..=self.nodes.len() {
            match self.nodes[current].parent {
                Some(parent) => {
                    current = parent;
                    depth += 1;
                }
                None if self.nodes[current].comment.parent().is_none() => return Some(depth),
                None => return None,
            }
        }

        None
    }

    /// Comments in display order with their depth
    pub fn walk(&self) -> Vec<(usize, &Comment)> {
        self.preorder()
            .into_iter()
            .map(|(i, depth)| (depth, &self.nodes[i].comment))
            .collect()
    }

    /// Number of comments that appear in the tree
    pub fn reachable_len(&self) -> usize {
        self.preorder().len()
    }

    /// Comments left out, in the order they were found
    pub fn dropped(&self) -> &[DroppedComment] {
        &self.dropped
    }

    pub fn is_empty(&self) -> bool {
        self.roots.is_empty()
    }

    /// Convert into nested nodes, roots first
    pub fn into_nested(self) -> Vec<CommentNode> {
        let order = self.preorder();
        let CommentTree { nodes, roots, .. } = self;

        let mut built: Vec<Option<CommentNode>> = Vec::with_capacity(nodes.len());
        let mut children = Vec::with_capacity(nodes.len());
        let mut comments = Vec::with_capacity(nodes.len());
        for node in nodes {
            built.push(None);
            children.push(node.replies);
            comments.push(Some(node.comment));
        }

        // Reverse preorder visits every reply before its parent
        for &(i, _) in order.iter().rev() {
            let replies = children[i]
                .iter()
                .filter_map(|&c| built[c].take())
                .collect();
            if let Some(comment) = comments[i].take() {
                built[i] = Some(CommentNode { comment, replies });
            }
        }

        roots.iter().filter_map(|&r| built[r].take()).collect()
    }
}

/// Build the nested reply tree for a flat comment list
pub fn build_tree(comments: &[Comment]) -> Vec<CommentNode> {
    CommentTree::build(comments.iter().cloned()).into_nested()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ids(nodes: &[CommentNode]) -> Vec<&str> {
        nodes.iter().map(|n| n.id()).collect()
    }

    #[test]
    fn test_empty_input() {
        assert!(build_tree(&[]).is_empty());
        assert!(CommentTree::build(Vec::new()).is_empty());
    }

    #[test]
    fn test_all_roots_keep_order() {
        let comments = vec![Comment::new("3"), Comment::new("1"), Comment::new("2")];
        let tree = build_tree(&comments);

        assert_eq!(ids(&tree), vec!["3", "1", "2"]);
        assert!(tree.iter().all(|n| n.replies.is_empty()));
    }

    #[test]
    fn test_nesting_deeper_than_two_levels() {
        let comments = vec![
            Comment::new("1"),
            Comment::reply("2", "1"),
            Comment::reply("3", "2"),
            Comment::reply("4", "3"),
        ];
        let tree = build_tree(&comments);

        assert_eq!(ids(&tree), vec!["1"]);
        let b = &tree[0].replies;
        assert_eq!(ids(b), vec!["2"]);
        assert_eq!(ids(&b[0].replies), vec!["3"]);
        assert_eq!(ids(&b[0].replies[0].replies), vec!["4"]);
    }

    #[test]
    fn test_reply_before_parent_in_input() {
        let comments = vec![Comment::reply("2", "1"), Comment::new("1")];
        let tree = build_tree(&comments);

        assert_eq!(ids(&tree), vec!["1"]);
        assert_eq!(ids(&tree[0].replies), vec!["2"]);
    }

    #[test]
    fn test_orphan_dropped_everywhere() {
        let comments = vec![
            Comment::new("1"),
            Comment::reply("2", "missing"),
            Comment::reply("3", "1"),
        ];
        let tree = CommentTree::build(comments);

        assert_eq!(
            tree.dropped(),
            &[DroppedComment {
                id: "2".into(),
                reason: DropReason::Orphan
            }]
        );
        let nested = tree.into_nested();
        assert_eq!(ids(&nested), vec!["1"]);
        assert_eq!(ids(&nested[0].replies), vec!["3"]);
    }

    #[test]
    fn test_orphan_descendants_unreachable() {
        let comments = vec![Comment::reply("2", "gone"), Comment::reply("3", "2")];
        let tree = CommentTree::build(comments);

        assert_eq!(tree.reachable_len(), 0);
        assert_eq!(tree.dropped().len(), 2);
        assert_eq!(tree.dropped()[1].reason, DropReason::Unreachable);
        assert!(tree.into_nested().is_empty());
    }

    #[test]
    fn test_sibling_order_with_interleaving() {
        let comments = vec![
            Comment::new("a"),
            Comment::new("b"),
            Comment::reply("a2", "a"),
            Comment::reply("b1", "b"),
            Comment::reply("a1", "a"),
            Comment::reply("b2", "b"),
            Comment::reply("a3", "a"),
        ];
        let tree = build_tree(&comments);

        assert_eq!(ids(&tree), vec!["a", "b"]);
        assert_eq!(ids(&tree[0].replies), vec!["a2", "a1", "a3"]);
        assert_eq!(ids(&tree[1].replies), vec!["b1", "b2"]);
    }

    #[test]
    fn test_cycle_does_not_hang() {
        let comments = vec![
            Comment::new("root"),
            Comment::reply("x", "y"),
            Comment::reply("y", "x"),
            Comment::reply("self", "self"),
        ];
        let tree = CommentTree::build(comments);

        assert_eq!(tree.reachable_len(), 1);
        assert_eq!(tree.depth_of("x"), None);
        assert_eq!(tree.depth_of("self"), None);
        assert!(tree
            .dropped()
            .iter()
            .all(|d| d.reason == DropReason::Unreachable));
        assert_eq!(ids(&tree.into_nested()), vec!["root"]);
    }

    #[test]
    fn test_duplicate_id_keeps_first() {
        let comments = vec![
            Comment::new("1").with_field("content", "first"),
            Comment::new("1").with_field("content", "second"),
        ];
        let tree = CommentTree::build(comments);

        assert_eq!(tree.get("1").unwrap().field("content").unwrap(), "first");
        assert_eq!(tree.dropped()[0].reason, DropReason::DuplicateId);
        assert_eq!(tree.into_nested().len(), 1);
    }

    #[test]
    fn test_arena_queries() {
        let comments = vec![
            Comment::new("1"),
            Comment::reply("2", "1"),
            Comment::reply("3", "2"),
            Comment::reply("4", "1"),
        ];
        let tree = CommentTree::build(comments);

        assert_eq!(tree.roots().map(|c| c.id.as_str()).collect::<Vec<_>>(), vec!["1"]);
        assert_eq!(
            tree.replies("1").map(|c| c.id.as_str()).collect::<Vec<_>>(),
            vec!["2", "4"]
        );
        assert_eq!(tree.replies("nope").count(), 0);
        assert_eq!(tree.depth_of("1"), Some(0));
        assert_eq!(tree.depth_of("3"), Some(2));
        assert_eq!(tree.depth_of("nope"), None);

        let walk: Vec<_> = tree
            .walk()
            .into_iter()
            .map(|(depth, c)| (depth, c.id.as_str()))
            .collect();
        assert_eq!(walk, vec![(0, "1"), (1, "2"), (2, "3"), (1, "4")]);
    }

    #[test]
    fn test_incoming_replies_field_ignored() {
        let comment: Comment = serde_json::from_value(serde_json::json!({
            "id": "1",
            "replies": [{ "id": "stale" }]
        }))
        .unwrap();
        let tree = build_tree(&[comment]);

        assert!(tree[0].comment.field("replies").is_none());
        assert!(tree[0].replies.is_empty());
    }

    #[test]
    fn test_deep_chain_nests_and_drops() {
        const DEPTH: usize = 100_000;

        let comments: Vec<Comment> = std::iter::once(Comment::new("0"))
            .chain((1..DEPTH).map(|i| Comment::reply(i.to_string(), (i - 1).to_string())))
            .collect();
        let tree = CommentTree::build(comments);
        assert_eq!(tree.depth_of("99999"), Some(DEPTH - 1));

        let nested = tree.into_nested();
        assert_eq!(nested.len(), 1);
        assert_eq!(nested[0].reply_count(), DEPTH - 1);
        assert_eq!(nested[0].truncated(1).reply_count(), 1);
        drop(nested);
    }
}
