use yam11_common::{Event, EventKind, ScalarType, Tag};
use yam11_core::emitter::EmitterOptions;
use yam11_core::{Document, Node, NodeData, YamlEmitter, YamlLoader};
use yam11_test_bench::consts::*;
use yam11_test_bench::{comparable, parse_events};

fn dump(docs: &[Document]) -> String {
    let mut out = String::new();
    YamlEmitter::new(&mut out).dump_documents(docs).unwrap();
    out
}

#[test]
fn tree_matches_parser_events() {
    for input in [
        BLOCK_MAP_INPUT,
        NESTED_MAP_INPUT,
        COMPLEX_KEY_INPUT,
        MULTI_DOC_INPUT,
        FLOW_NESTED_INPUT,
        FLOW_PAIR_INPUT,
        SINGLE_QUOTE_INPUT,
        DOUBLE_QUOTE_INPUT,
    ] {
        let docs = YamlLoader::load_from_str(input).unwrap();
        let mut serialized = vec![Event::StreamStart];
        for doc in &docs {
            serialized.extend(doc.serialize());
        }
        serialized.push(Event::StreamEnd);

        let expected: Vec<Event> = parse_events(input).unwrap().iter().map(comparable).collect();
        let actual: Vec<Event> = serialized.iter().map(comparable).collect();
        assert_eq!(actual, expected, "serializing {input:?}");
    }
}

#[test]
fn tree_dump_reloads() {
    let docs = YamlLoader::load_from_str(ANCHOR_ALIAS_INPUT).unwrap();
    let out = dump(&docs);
    assert_eq!(out, "- &id001 a\n- *id001\n- &id002 [b]\n- *id002\n");

    let again = YamlLoader::load_from_str(&out).unwrap();
    let doc = &again[0];
    let NodeData::Sequence { items, .. } = &doc.root_node().unwrap().data else {
        panic!("expected a sequence");
    };
    assert_eq!(items.len(), 4);
    assert_eq!(items[0], items[1]);
    assert_eq!(items[2], items[3]);
}

#[test]
fn tree_recursive_document() {
    let docs = YamlLoader::load_from_str("&top\nself: *top\nname: x\n").unwrap();
    let doc = &docs[0];
    assert_eq!(doc.lookup(doc.root, "self"), Some(doc.root));

    let kinds: Vec<EventKind> = doc.serialize().iter().map(Event::kind).collect();
    assert_eq!(
        kinds,
        [
            EventKind::DocumentStart,
            EventKind::MappingStart,
            EventKind::Scalar,
            EventKind::Alias,
            EventKind::Scalar,
            EventKind::Scalar,
            EventKind::MappingEnd,
            EventKind::DocumentEnd,
        ]
    );
    assert_eq!(dump(&docs), "&id001\nself: *id001\nname: x\n");
}

#[test]
fn tree_from_bytes() {
    let mut bytes = vec![0xFF, 0xFE];
    for unit in "k: v".encode_utf16() {
        bytes.extend_from_slice(&unit.to_le_bytes());
    }
    let docs = YamlLoader::load_from_bytes(&bytes).unwrap();
    let doc = &docs[0];
    let value = doc.lookup(doc.root, "k").and_then(|id| doc.get(id));
    assert_eq!(value.and_then(Node::as_str), Some("v"));
}

#[test]
fn tree_built_by_hand() {
    let mut doc = Document::new(Node::mapping(false));
    let root = doc.root;
    let key = doc.push(Node::scalar("count", ScalarType::Plain));
    let value = doc.push(
        Node::scalar("3", ScalarType::Plain).with_tag(Tag::new("tag:yaml.org,2002:", "int")),
    );
    assert!(doc.push_entry(root, key, value));
    let text = doc.push(Node::scalar("a\nb\n", ScalarType::Literal));
    let key = doc.push(Node::scalar("text", ScalarType::Plain));
    assert!(doc.push_entry(root, key, text));

    let mut out = String::new();
    YamlEmitter::new(&mut out)
        .with_options(EmitterOptions::default().explicit_start(true))
        .dump(&doc)
        .unwrap();
    assert_eq!(out, "---\ncount: !!int 3\ntext: |\n  a\n  b\n");
}

#[test]
fn tree_invalid_options() {
    let docs = YamlLoader::load_from_str("a").unwrap();
    let mut out = String::new();
    let err = YamlEmitter::new(&mut out)
        .with_options(EmitterOptions::default().indent(1))
        .dump_documents(&docs)
        .unwrap_err();
    assert!(err.to_string().starts_with("invalid emitter options"));
}
