use crate::treebuild::{Document, Node, NodeData, NodeId};
use crate::{Parser, Reader, Source};
use alloc::borrow::Cow;
use alloc::format;
use alloc::string::String;
use alloc::vec::Vec;
use hashbrown::HashMap;
use tracing::debug;
use yam11_common::{CollectionStart, ComposeError, Event, Marker, ScalarValue, YamlResult};

/// Collection still waiting for its end event.
struct Open {
    id: NodeId,
    key: Option<NodeId>,
}

/// Composes parser events into [`Document`]s.
///
/// ```
/// use yam11_core::YamlLoader;
///
/// let docs = YamlLoader::load_from_str("a: &x [1]\nb: *x\n").unwrap();
/// let doc = &docs[0];
/// let a = doc.lookup(doc.root, "a");
/// assert!(a.is_some());
/// assert_eq!(doc.lookup(doc.root, "b"), a);
/// ```
#[derive(Default)]
pub struct YamlLoader<'input> {
    docs: Vec<Document<'input>>,
    nodes: Vec<Node<'input>>,
    stack: Vec<Open>,
    anchors: HashMap<String, NodeId>,
    root: Option<NodeId>,
}

impl<'input> YamlLoader<'input> {
    /// # Errors
    /// Returns the first reader, scanner, parser or composer error.
    pub fn load_from_str(input: &'input str) -> YamlResult<Vec<Document<'input>>> {
        Self::load_from_parser(&mut Parser::new(Reader::from_str(input)))
    }

    /// Loads UTF-8 or UTF-16 input, the encoding is picked from the byte order mark.
    ///
    /// # Errors
    /// Returns the first reader, scanner, parser or composer error.
    pub fn load_from_bytes(input: &'input [u8]) -> YamlResult<Vec<Document<'input>>> {
        Self::load_from_parser(&mut Parser::new(Reader::from_bytes(input)))
    }

    /// # Errors
    /// Returns the first reader, scanner, parser or composer error.
    pub fn load_from_parser<S: Source>(
        parser: &mut Parser<'input, S>,
    ) -> YamlResult<Vec<Document<'input>>> {
        let mut loader = YamlLoader::default();
        loader.load(parser)?;
        Ok(loader.into_documents())
    }

    /// Pulls events from `parser` until the end of the stream.
    ///
    /// # Errors
    /// Returns the first reader, scanner, parser or composer error.
    pub fn load<S: Source>(&mut self, parser: &mut Parser<'input, S>) -> YamlResult<()> {
        let mut version = None;
        let mut tags = Vec::new();
        loop {
            let (event, span) = parser.next_event()?;
            match event {
                Event::StreamStart => {}
                Event::StreamEnd => return Ok(()),
                Event::DocumentStart {
                    version: doc_version,
                    tags: doc_tags,
                    ..
                } => {
                    version = doc_version;
                    tags = doc_tags;
                }
                Event::DocumentEnd { .. } => {
                    let Some(root) = self.root.take() else {
                        return Err(ComposeError {
                            mark: span.start,
                            info: String::from("document ended without a node"),
                        }
                        .into());
                    };
                    self.anchors.clear();
                    debug!("composed document with {} nodes", self.nodes.len());
                    self.docs.push(Document {
                        nodes: core::mem::take(&mut self.nodes),
                        root,
                        version: version.take(),
                        tags: core::mem::take(&mut tags),
                    });
                }
                Event::Alias(name) => {
                    let id = self.resolve_alias(&name, span.start)?;
                    self.attach(id);
                }
                Event::Scalar(ScalarValue {
                    value,
                    scalar_type,
                    anchor,
                    tag,
                    ..
                }) => {
                    let node = Node {
                        data: NodeData::Scalar {
                            value,
                            style: scalar_type,
                        },
                        tag,
                        anchor,
                        span,
                    };
                    let id = self.register(node);
                    self.attach(id);
                }
                Event::SequenceStart(CollectionStart {
                    anchor, tag, flow, ..
                }) => {
                    let node = Node {
                        data: NodeData::Sequence {
                            items: Vec::new(),
                            flow,
                        },
                        tag,
                        anchor,
                        span,
                    };
                    self.open(node);
                }
                Event::MappingStart(CollectionStart {
                    anchor, tag, flow, ..
                }) => {
                    let node = Node {
                        data: NodeData::Mapping {
                            entries: Vec::new(),
                            flow,
                        },
                        tag,
                        anchor,
                        span,
                    };
                    self.open(node);
                }
                Event::SequenceEnd | Event::MappingEnd => {
                    if let Some(Open { id, .. }) = self.stack.pop() {
                        if let Some(node) = self.nodes.get_mut(id.0) {
                            node.span.end = span.end;
                        }
                        self.attach(id);
                    }
                }
            }
        }
    }

    #[must_use]
    pub fn into_documents(self) -> Vec<Document<'input>> {
        self.docs
    }

    fn resolve_alias(&self, name: &Cow<'input, str>, mark: Marker) -> YamlResult<NodeId> {
        match self.anchors.get(name.as_ref()) {
            Some(id) => Ok(*id),
            None => Err(ComposeError {
                mark,
                info: format!("found undefined alias {name}"),
            }
            .into()),
        }
    }

    /// Stores the node and makes its anchor visible. A redefined anchor points at the
    /// newest node from here on.
    fn register(&mut self, node: Node<'input>) -> NodeId {
        let id = NodeId(self.nodes.len());
        if let Some(anchor) = &node.anchor {
            self.anchors.insert(String::from(anchor.as_ref()), id);
        }
        self.nodes.push(node);
        id
    }

    /// Registers the collection before its children so they can alias it.
    fn open(&mut self, node: Node<'input>) {
        let id = self.register(node);
        self.stack.push(Open { id, key: None });
    }

    /// Hooks a finished node into the innermost open collection, or makes it the
    /// document root.
    fn attach(&mut self, child: NodeId) {
        let Some(parent) = self.stack.last_mut() else {
            self.root = Some(child);
            return;
        };
        let Some(node) = self.nodes.get_mut(parent.id.0) else {
            return;
        };
        match &mut node.data {
            NodeData::Sequence { items, .. } => items.push(child),
            NodeData::Mapping { entries, .. } => match parent.key.take() {
                Some(key) => entries.push((key, child)),
                None => parent.key = Some(child),
            },
            NodeData::Scalar { .. } => {}
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use alloc::string::ToString;
    use yam11_common::{ScalarType, Tag, YamlError};

    #[test]
    fn test_load_documents() {
        let docs = YamlLoader::load_from_str("a: 1\nb: [x, y]\n--- plain\n").unwrap();
        assert_eq!(docs.len(), 2);
        assert_eq!(docs[0].to_string(), r#"MAP:{SCAL: "a" = SCAL: "1", SCAL: "b" = SEQ:[SCAL: "x", SCAL: "y"]}"#);
        assert_eq!(docs[1].root_node().and_then(Node::as_str), Some("plain"));
        assert!(YamlLoader::load_from_str("").unwrap().is_empty());
    }

    #[test]
    fn test_styles_and_tags() {
        let docs = YamlLoader::load_from_str("- !!str 'q'\n- {k: v}\n").unwrap();
        let doc = &docs[0];
        let NodeData::Sequence { items, flow } = &doc.nodes[doc.root.index()].data else {
            panic!("expected sequence");
        };
        assert!(!flow);
        let first = doc.get(items[0]).unwrap();
        assert_eq!(
            first.data,
            NodeData::Scalar {
                value: "q".into(),
                style: ScalarType::SingleQuote
            }
        );
        assert_eq!(first.tag, Some(Tag::new("tag:yaml.org,2002:", "str")));
        assert!(matches!(
            doc.get(items[1]).unwrap().data,
            NodeData::Mapping { flow: true, .. }
        ));
    }

    #[test]
    fn test_alias_shares_node() {
        let docs = YamlLoader::load_from_str("- &a x\n- *a\n- &a y\n- *a\n").unwrap();
        let doc = &docs[0];
        let NodeData::Sequence { items, .. } = &doc.nodes[doc.root.index()].data else {
            panic!("expected sequence");
        };
        assert_eq!(items[0], items[1]);
        assert_eq!(items[2], items[3]);
        assert_ne!(items[0], items[2]);
    }

    #[test]
    fn test_self_reference() {
        let docs = YamlLoader::load_from_str("&loop [*loop]").unwrap();
        assert_eq!(docs[0].to_string(), "SEQ:[*0]");
    }

    #[test]
    fn test_undefined_alias() {
        let err = YamlLoader::load_from_str("a: *missing\n").unwrap_err();
        let YamlError::Composer(err) = err else {
            panic!("expected composer error, got {err:?}");
        };
        assert_eq!(err.info, "found undefined alias missing");
        assert_eq!((err.mark.line, err.mark.col), (1, 4));
    }

    #[test]
    fn test_anchors_do_not_cross_documents() {
        let err = YamlLoader::load_from_str("&a x\n--- *a\n").unwrap_err();
        assert!(matches!(err, YamlError::Composer(_)));
    }

    #[test]
    fn test_directives_kept() {
        let docs =
            YamlLoader::load_from_str("%YAML 1.1\n%TAG !e! tag:example.com,2000:\n--- !e!x v\n")
                .unwrap();
        assert_eq!(docs[0].version, Some((1, 1)));
        assert_eq!(
            docs[0].tags,
            [("!e!".to_string(), "tag:example.com,2000:".to_string())]
        );
        assert_eq!(
            docs[0].root_node().unwrap().tag,
            Some(Tag::new("tag:example.com,2000:", "x"))
        );
    }
}
