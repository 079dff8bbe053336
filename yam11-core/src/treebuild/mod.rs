//! Node graph built from parser events and turned back into events.
//!
//! A [`Document`] is an arena: nodes refer to their children by [`NodeId`], so
//! aliases (and cycles through them) are just repeated ids.

use alloc::borrow::Cow;
use alloc::string::String;
use alloc::vec::Vec;
use core::fmt::Display;
use yam11_common::{ScalarType, Span, Tag};

pub use loader::YamlLoader;
pub use serializer::YamlEmitter;

mod loader;
mod serializer;

/// Index of a node inside its [`Document`].
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NodeId(pub(crate) usize);

impl NodeId {
    #[must_use]
    pub fn index(self) -> usize {
        self.0
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum NodeData<'input> {
    Scalar {
        value: Cow<'input, str>,
        style: ScalarType,
    },
    // flow style like `[x, x, x]`
    // or block style like:
    //     - x
    //     - x
    Sequence {
        items: Vec<NodeId>,
        flow: bool,
    },
    // flow style like `{x: Y, a: B}`
    // or block style like:
    //     x: Y
    //     a: B
    Mapping {
        entries: Vec<(NodeId, NodeId)>,
        flow: bool,
    },
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Node<'input> {
    pub data: NodeData<'input>,
    pub tag: Option<Tag>,
    /// Anchor as written in the source. Serializing generates fresh names instead.
    pub anchor: Option<Cow<'input, str>>,
    pub span: Span,
}

impl<'input> Node<'input> {
    #[must_use]
    pub fn scalar(value: impl Into<Cow<'input, str>>, style: ScalarType) -> Self {
        Node {
            data: NodeData::Scalar {
                value: value.into(),
                style,
            },
            tag: None,
            anchor: None,
            span: Span::default(),
        }
    }

    #[must_use]
    pub fn sequence(flow: bool) -> Self {
        Node {
            data: NodeData::Sequence {
                items: Vec::new(),
                flow,
            },
            tag: None,
            anchor: None,
            span: Span::default(),
        }
    }

    #[must_use]
    pub fn mapping(flow: bool) -> Self {
        Node {
            data: NodeData::Mapping {
                entries: Vec::new(),
                flow,
            },
            tag: None,
            anchor: None,
            span: Span::default(),
        }
    }

    #[must_use]
    pub fn with_tag(mut self, tag: Tag) -> Self {
        self.tag = Some(tag);
        self
    }

    /// Scalar content, `None` for collections.
    #[must_use]
    pub fn as_str(&self) -> Option<&str> {
        match &self.data {
            NodeData::Scalar { value, .. } => Some(value),
            _ => None,
        }
    }

    #[must_use]
    pub fn is_scalar(&self) -> bool {
        matches!(self.data, NodeData::Scalar { .. })
    }
}

/// One composed document.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Document<'input> {
    pub nodes: Vec<Node<'input>>,
    pub root: NodeId,
    pub version: Option<(u8, u8)>,
    /// `%TAG` directives as `(handle, prefix)`.
    pub tags: Vec<(String, String)>,
}

impl<'input> Document<'input> {
    /// Document holding only `root`.
    #[must_use]
    pub fn new(root: Node<'input>) -> Self {
        Document {
            nodes: alloc::vec![root],
            root: NodeId(0),
            version: None,
            tags: Vec::new(),
        }
    }

    /// Adds a node that is not yet attached anywhere.
    pub fn push(&mut self, node: Node<'input>) -> NodeId {
        self.nodes.push(node);
        NodeId(self.nodes.len() - 1)
    }

    /// Appends `item` to the sequence `seq`. Returns `false` if `seq` is not a sequence.
    pub fn push_item(&mut self, seq: NodeId, item: NodeId) -> bool {
        match self.nodes.get_mut(seq.0).map(|node| &mut node.data) {
            Some(NodeData::Sequence { items, .. }) => {
                items.push(item);
                true
            }
            _ => false,
        }
    }

    /// Appends an entry to the mapping `map`. Returns `false` if `map` is not a mapping.
    pub fn push_entry(&mut self, map: NodeId, key: NodeId, value: NodeId) -> bool {
        match self.nodes.get_mut(map.0).map(|node| &mut node.data) {
            Some(NodeData::Mapping { entries, .. }) => {
                entries.push((key, value));
                true
            }
            _ => false,
        }
    }

    #[must_use]
    pub fn get(&self, id: NodeId) -> Option<&Node<'input>> {
        self.nodes.get(id.0)
    }

    #[must_use]
    pub fn root_node(&self) -> Option<&Node<'input>> {
        self.get(self.root)
    }

    /// Looks up the value for a scalar key in the mapping `map`.
    #[must_use]
    pub fn lookup(&self, map: NodeId, key: &str) -> Option<NodeId> {
        match &self.get(map)?.data {
            NodeData::Mapping { entries, .. } => entries
                .iter()
                .find(|(k, _)| self.get(*k).and_then(Node::as_str) == Some(key))
                .map(|&(_, v)| v),
            _ => None,
        }
    }
}

/// Compact single-line dump, `SEQ:`/`MAP:`/`SCAL:` prefixed. Shared and cyclic
/// nodes print as `*N` after their first appearance.
impl Display for Document<'_> {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        enum Step {
            Node(NodeId),
            Text(&'static str),
        }
        let mut seen = alloc::vec![false; self.nodes.len()];
        let mut stack = alloc::vec![Step::Node(self.root)];
        while let Some(step) = stack.pop() {
            let id = match step {
                Step::Text(text) => {
                    f.write_str(text)?;
                    continue;
                }
                Step::Node(id) => id,
            };
            let Some(node) = self.get(id) else {
                continue;
            };
            if seen[id.0] {
                write!(f, "*{}", id.0)?;
                continue;
            }
            seen[id.0] = true;
            match &node.data {
                NodeData::Scalar { value, .. } => write!(f, "SCAL: {value:?}")?,
                NodeData::Sequence { items, .. } => {
                    f.write_str("SEQ:[")?;
                    stack.push(Step::Text("]"));
                    for (i, item) in items.iter().enumerate().rev() {
                        stack.push(Step::Node(*item));
                        if i > 0 {
                            stack.push(Step::Text(", "));
                        }
                    }
                }
                NodeData::Mapping { entries, .. } => {
                    f.write_str("MAP:{")?;
                    stack.push(Step::Text("}"));
                    for (i, (key, value)) in entries.iter().enumerate().rev() {
                        stack.push(Step::Node(*value));
                        stack.push(Step::Text(" = "));
                        stack.push(Step::Node(*key));
                        if i > 0 {
                            stack.push(Step::Text(", "));
                        }
                    }
                }
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use alloc::string::ToString;

    #[test]
    fn test_build_by_hand() {
        let mut doc = Document::new(Node::mapping(false));
        let key = doc.push(Node::scalar("k", ScalarType::Plain));
        let seq = doc.push(Node::sequence(true));
        let item = doc.push(Node::scalar("v", ScalarType::DoubleQuote));
        assert!(doc.push_item(seq, item));
        assert!(doc.push_entry(doc.root, key, seq));
        assert!(!doc.push_item(doc.root, item));

        assert_eq!(doc.lookup(doc.root, "k"), Some(seq));
        assert_eq!(doc.lookup(doc.root, "missing"), None);
        assert_eq!(doc.to_string(), r#"MAP:{SCAL: "k" = SEQ:[SCAL: "v"]}"#);
    }

    #[test]
    fn test_display_cycle() {
        let mut doc = Document::new(Node::sequence(false));
        let root = doc.root;
        assert!(doc.push_item(root, root));
        assert_eq!(doc.to_string(), "SEQ:[*0]");
    }
}
