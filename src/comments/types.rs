//! Comment records and nested output nodes

use serde::{Deserialize, Deserializer, Serialize};
use serde_json::{Map, Number, Value};

/// A comment as delivered by the backend
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Comment {
    /// Unique comment id; numeric ids are read as their decimal text
    #[serde(deserialize_with = "id_from_json")]
    pub id: String,

    /// Parent comment id; absent, `null` or empty marks a root
    #[serde(
        default,
        rename = "parentId",
        deserialize_with = "parent_id_from_json",
        skip_serializing_if = "Option::is_none"
    )]
    pub parent_id: Option<String>,

    /// Display fields (author, content, timestamps...), passed through untouched
    #[serde(flatten)]
    pub fields: Map<String, Value>,
}

/// Ids arrive as strings or numbers depending on the endpoint
#[derive(Deserialize)]
#[serde(untagged)]
enum JsonId {
    Text(String),
    Number(Number),
}

impl From<JsonId> for String {
    fn from(id: JsonId) -> Self {
        match id {
            JsonId::Text(text) => text,
            JsonId::Number(number) => number.to_string(),
        }
    }
}

fn id_from_json<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    JsonId::deserialize(deserializer).map(String::from)
}

fn parent_id_from_json<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    Option::<JsonId>::deserialize(deserializer).map(|id| id.map(String::from))
}

impl Comment {
    /// Create a root comment
    pub fn new(id: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            parent_id: None,
            fields: Map::new(),
        }
    }

    /// Create a reply to `parent_id`
    pub fn reply(id: impl Into<String>, parent_id: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            parent_id: Some(parent_id.into()),
            fields: Map::new(),
        }
    }

    /// Attach a display field
    pub fn with_field(mut self, key: impl Into<String>, value: impl Into<Value>) -> Self {
        self.fields.insert(key.into(), value.into());
        self
    }

    /// Parent id, if present and non-empty
    pub fn parent(&self) -> Option<&str> {
        self.parent_id.as_deref().filter(|p| !p.is_empty())
    }

    /// Look up a display field
    pub fn field(&self, key: &str) -> Option<&Value> {
        self.fields.get(key)
    }
}

/// A comment with its replies nested beneath it
///
/// Counting, copying, comparing and dropping walk the replies with an
/// explicit stack, so any depth is safe. `Debug` and `Serialize` still
/// recurse once per level: cap very deep threads with
/// [`CommentNode::truncated`] before formatting or serializing them.
#[derive(Debug, Serialize)]
pub struct CommentNode {
    #[serde(flatten)]
    pub comment: Comment,
    pub replies: Vec<CommentNode>,
}

/// Work item for [`CommentNode::truncated`]: a source node and the copies
/// of its replies built so far
struct CopyFrame<'a> {
    source: &'a CommentNode,
    depth: usize,
    next: usize,
    replies: Vec<CommentNode>,
}

impl<'a> CopyFrame<'a> {
    fn new(source: &'a CommentNode, depth: usize) -> Self {
        Self {
            source,
            depth,
            next: 0,
            replies: Vec::new(),
        }
    }
}

impl CommentNode {
    /// Create a node without replies
    pub fn leaf(comment: Comment) -> Self {
        Self {
            comment,
            replies: Vec::new(),
        }
    }

    pub fn id(&self) -> &str {
        &self.comment.id
    }

    /// Number of replies at every depth below this node
    pub fn reply_count(&self) -> usize {
        let mut count = 0;
        let mut pending: Vec<&CommentNode> = self.replies.iter().collect();

        while let Some(node) = pending.pop() {
            count += 1;
            pending.extend(node.replies.iter());
        }

        count
    }

    /// Copy of this node keeping at most `max_depth` levels of replies
    ///
    /// `truncated(0)` drops all replies; `truncated(1)` keeps direct replies
    /// only, which is what the course page displays.
    pub fn truncated(&self, max_depth: usize) -> CommentNode {
        let mut stack = vec![CopyFrame::new(self, 0)];
        let mut copy = None;

        while let Some(top) = stack.last_mut() {
            let source = top.source;
            if top.depth < max_depth {
                if let Some(reply) = source.replies.get(top.next) {
                    top.next += 1;
                    let depth = top.depth + 1;
                    stack.push(CopyFrame::new(reply, depth));
                    continue;
                }
            }

            // Every kept reply of the top frame is built
            let Some(done) = stack.pop() else { break };
            let node = CommentNode {
                comment: done.source.comment.clone(),
                replies: done.replies,
            };
            match stack.last_mut() {
                Some(parent) => parent.replies.push(node),
                None => copy = Some(node),
            }
        }

        copy.unwrap_or_else(|| CommentNode::leaf(self.comment.clone()))
    }
}

impl Clone for CommentNode {
    fn clone(&self) -> Self {
        self.truncated(usize::MAX)
    }
}

impl PartialEq for CommentNode {
    fn eq(&self, other: &Self) -> bool {
        let mut pending = vec![(self, other)];

        while let Some((left, right)) = pending.pop() {
            if left.comment != right.comment || left.replies.len() != right.replies.len() {
                return false;
            }
            pending.extend(left.replies.iter().zip(right.replies.iter()));
        }

        true
    }
}

impl Drop for CommentNode {
    fn drop(&mut self) {
        // Detach replies level by level so each node drops with no children
        let mut pending = std::mem::take(&mut self.replies);
        while let Some(mut node) = pending.pop() {
            pending.append(&mut node.replies);
        }
    }
}
