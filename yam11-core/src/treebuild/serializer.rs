use crate::emitter::{EmitResult, Emitter, EmitterOptions};
use crate::treebuild::{Document, NodeData, NodeId};
use alloc::borrow::Cow;
use alloc::format;
use alloc::string::String;
use alloc::vec;
use alloc::vec::Vec;
use core::fmt;
use yam11_common::{CollectionStart, Event, Implicit, ScalarType, ScalarValue, Tag};

enum Step {
    Node(NodeId),
    SequenceEnd,
    MappingEnd,
}

impl<'input> Document<'input> {
    /// Events for this document, shaped like the parser's output and framed by
    /// `DocumentStart` and `DocumentEnd`.
    ///
    /// Nodes reachable more than once get generated anchors `id001`, `id002`, ...
    /// in the order they are first written; later visits become aliases. Source
    /// anchors are not kept.
    #[must_use]
    pub fn serialize(&self) -> Vec<Event<'_>> {
        let shared = self.shared_nodes();
        let mut anchors: Vec<Option<String>> = vec![None; self.nodes.len()];
        let mut emitted = vec![false; self.nodes.len()];
        let mut last_anchor = 0;

        let mut events = vec![Event::DocumentStart {
            explicit: self.version.is_some() || !self.tags.is_empty(),
            version: self.version,
            tags: self.tags.clone(),
        }];
        let mut stack = vec![Step::Node(self.root)];

        while let Some(step) = stack.pop() {
            let id = match step {
                Step::Node(id) => id,
                Step::SequenceEnd => {
                    events.push(Event::SequenceEnd);
                    continue;
                }
                Step::MappingEnd => {
                    events.push(Event::MappingEnd);
                    continue;
                }
            };
            let Some(node) = self.get(id) else {
                continue;
            };
            if emitted[id.0] {
                if let Some(anchor) = &anchors[id.0] {
                    events.push(Event::Alias(Cow::Owned(anchor.clone())));
                }
                continue;
            }
            emitted[id.0] = true;

            let anchor = if shared[id.0] {
                last_anchor += 1;
                let name = format!("id{last_anchor:03}");
                anchors[id.0] = Some(name.clone());
                Some(Cow::Owned(name))
            } else {
                None
            };
            let tag = node.tag.clone();

            match &node.data {
                NodeData::Scalar { value, style } => {
                    let implicit = scalar_implicit(*style, tag.as_ref());
                    events.push(Event::Scalar(ScalarValue {
                        value: Cow::Borrowed(value.as_ref()),
                        scalar_type: *style,
                        anchor,
                        tag,
                        implicit,
                    }));
                }
                NodeData::Sequence { items, flow } => {
                    events.push(Event::SequenceStart(collection_start(anchor, tag, *flow)));
                    stack.push(Step::SequenceEnd);
                    stack.extend(items.iter().rev().map(|item| Step::Node(*item)));
                }
                NodeData::Mapping { entries, flow } => {
                    events.push(Event::MappingStart(collection_start(anchor, tag, *flow)));
                    stack.push(Step::MappingEnd);
                    for (key, value) in entries.iter().rev() {
                        stack.push(Step::Node(*value));
                        stack.push(Step::Node(*key));
                    }
                }
            }
        }

        events.push(Event::DocumentEnd { explicit: false });
        events
    }

    /// Marks nodes reachable from the root through more than one edge.
    fn shared_nodes(&self) -> Vec<bool> {
        let mut seen = vec![false; self.nodes.len()];
        let mut shared = vec![false; self.nodes.len()];
        let mut stack = vec![self.root];
        while let Some(id) = stack.pop() {
            let Some(node) = self.get(id) else {
                continue;
            };
            if seen[id.0] {
                shared[id.0] = true;
                continue;
            }
            seen[id.0] = true;
            match &node.data {
                NodeData::Scalar { .. } => {}
                NodeData::Sequence { items, .. } => stack.extend(items.iter().rev()),
                NodeData::Mapping { entries, .. } => {
                    for (key, value) in entries.iter().rev() {
                        stack.push(*value);
                        stack.push(*key);
                    }
                }
            }
        }
        shared
    }
}

/// Same flags the parser gives a scalar with this style and tag.
fn scalar_implicit(style: ScalarType, tag: Option<&Tag>) -> Implicit {
    match tag {
        None if style == ScalarType::Plain => Implicit::PLAIN,
        None => Implicit::QUOTED,
        Some(tag) if tag.is_non_specific() => Implicit::PLAIN,
        Some(_) => Implicit::NONE,
    }
}

fn collection_start<'a>(
    anchor: Option<Cow<'a, str>>,
    tag: Option<Tag>,
    flow: bool,
) -> CollectionStart<'a> {
    CollectionStart {
        implicit: tag.as_ref().map_or(true, Tag::is_non_specific),
        anchor,
        tag,
        flow,
    }
}

/// Writes [`Document`]s as YAML text.
///
/// ```
/// use yam11_core::{YamlEmitter, YamlLoader};
///
/// let docs = YamlLoader::load_from_str("{a: [1, 2]}").unwrap();
/// let mut out = String::new();
/// YamlEmitter::new(&mut out).dump_documents(&docs).unwrap();
/// assert_eq!(out, "{a: [1, 2]}\n");
/// ```
#[allow(clippy::module_name_repetitions)]
pub struct YamlEmitter<'w> {
    writer: &'w mut dyn fmt::Write,
    options: EmitterOptions,
}

impl<'w> YamlEmitter<'w> {
    /// Create a new emitter serializing into `writer`.
    pub fn new(writer: &'w mut dyn fmt::Write) -> Self {
        YamlEmitter {
            writer,
            options: EmitterOptions::default(),
        }
    }

    #[must_use]
    pub fn with_options(mut self, options: EmitterOptions) -> Self {
        self.options = options;
        self
    }

    /// Dump a single document as a complete stream.
    ///
    /// # Errors
    /// Same as [`YamlEmitter::dump_documents`].
    pub fn dump(&mut self, doc: &Document) -> EmitResult {
        self.dump_documents(core::slice::from_ref(doc))
    }

    /// Dump every document into one stream.
    ///
    /// # Errors
    /// Returns [`EmitError`](yam11_common::EmitError) for invalid options, for content
    /// the emitter can not represent and when the writer fails.
    pub fn dump_documents(&mut self, docs: &[Document]) -> EmitResult {
        let mut emitter = Emitter::with_options(&mut *self.writer, self.options.clone())?;
        emitter.emit(Event::StreamStart)?;
        for doc in docs {
            for event in doc.serialize() {
                emitter.emit(event)?;
            }
        }
        emitter.emit(Event::StreamEnd)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::treebuild::{Node, YamlLoader};
    use yam11_common::EventKind;

    fn dump(input: &str) -> String {
        let docs = YamlLoader::load_from_str(input).unwrap();
        let mut out = String::new();
        YamlEmitter::new(&mut out).dump_documents(&docs).unwrap();
        out
    }

    #[test]
    fn test_serialize_shape() {
        let docs = YamlLoader::load_from_str("a: [x]\n").unwrap();
        let kinds: Vec<EventKind> = docs[0].serialize().iter().map(Event::kind).collect();
        assert_eq!(
            kinds,
            [
                EventKind::DocumentStart,
                EventKind::MappingStart,
                EventKind::Scalar,
                EventKind::SequenceStart,
                EventKind::Scalar,
                EventKind::SequenceEnd,
                EventKind::MappingEnd,
                EventKind::DocumentEnd,
            ]
        );
    }

    #[test]
    fn test_generated_anchors() {
        assert_eq!(
            dump("- &first a\n- *first\n- &second [b]\n- *second\n- &lone c\n"),
            "- &id001 a\n- *id001\n- &id002 [b]\n- *id002\n- c\n"
        );
    }

    #[test]
    fn test_cycle() {
        let mut doc = Document::new(Node::mapping(false));
        let root = doc.root;
        let key = doc.push(Node::scalar("self", ScalarType::Plain));
        assert!(doc.push_entry(root, key, root));
        let mut out = String::new();
        YamlEmitter::new(&mut out).dump(&doc).unwrap();
        assert_eq!(out, "&id001\nself: *id001\n");
    }

    #[test]
    fn test_implicit_flags() {
        assert_eq!(scalar_implicit(ScalarType::Plain, None), Implicit::PLAIN);
        assert_eq!(scalar_implicit(ScalarType::DoubleQuote, None), Implicit::QUOTED);
        assert_eq!(
            scalar_implicit(ScalarType::Plain, Some(&Tag::from_uri("!"))),
            Implicit::PLAIN
        );
        assert_eq!(
            scalar_implicit(ScalarType::Plain, Some(&Tag::new("!", "x"))),
            Implicit::NONE
        );
    }

    #[test]
    fn test_quoted_stays_quoted() {
        assert_eq!(dump("- 'true'\n- true\n- \"1\"\n"), "- 'true'\n- true\n- \"1\"\n");
    }

    #[test]
    fn test_multiple_documents() {
        assert_eq!(dump("a\n--- b\n"), "a\n--- b\n...\n");
    }
}
