use proptest::prelude::*;
use yam11_common::{CollectionStart, Event, ScalarType, ScalarValue};
use yam11_core::emitter::{EmitterOptions, FlowStyle};
use yam11_test_bench::consts::*;
use yam11_test_bench::{assert_round_trip, emit_events, parse_events};

fn scalar_document(value: &str, scalar_type: ScalarType) -> Vec<Event<'_>> {
    vec![
        Event::StreamStart,
        Event::document_start(false),
        Event::SequenceStart(CollectionStart::block()),
        Event::Scalar(ScalarValue::new(value, scalar_type)),
        Event::SequenceEnd,
        Event::DocumentEnd { explicit: false },
        Event::StreamEnd,
    ]
}

fn scalar_values(text: &str) -> Vec<String> {
    parse_events(text)
        .unwrap_or_else(|err| panic!("{text:?} failed to parse: {err}"))
        .into_iter()
        .filter_map(|ev| match ev {
            Event::Scalar(scalar) => Some(scalar.value.into_owned()),
            _ => None,
        })
        .collect()
}

#[test]
fn emit_round_trip_inputs() {
    for input in [
        BLOCK_MAP_INPUT,
        BLOCK2_INPUT,
        NESTED_SEQ_INPUT,
        INDENTLESS_INPUT,
        NESTED_MAP_INPUT,
        COMPLEX_KEY_INPUT,
        MULTILINE_PLAIN_INPUT,
        LITERAL_INPUT,
        FOLDED_INPUT,
        CHOMP_INPUT,
        ANCHOR_ALIAS_INPUT,
        TAGS_INPUT,
        MULTI_DOC_INPUT,
        DIRECTIVE_INPUT,
        FLOW_MAP_INPUT,
        FLOW_NESTED_INPUT,
        FLOW_PAIR_INPUT,
        FLOW_IN_BLOCK_INPUT,
        SINGLE_QUOTE_INPUT,
        DOUBLE_QUOTE_INPUT,
        QUOTED_KEYS_INPUT,
    ] {
        assert_round_trip(input, EmitterOptions::default());
        assert_round_trip(input, EmitterOptions::default().canonical(true));
    }
}

#[test]
fn emit_block_map() {
    let out = assert_round_trip(BLOCK_MAP_INPUT, EmitterOptions::default());
    assert_eq!(out, BLOCK_MAP_INPUT);
}

#[test]
fn emit_literal_keeps_style() {
    let out = assert_round_trip(LITERAL_INPUT, EmitterOptions::default());
    assert_eq!(out, LITERAL_INPUT);
}

#[test]
fn emit_flow_policy() {
    let events = parse_events(FLOW_IN_BLOCK_INPUT).unwrap();
    let flow = emit_events(
        events.clone(),
        EmitterOptions::default().flow_style(FlowStyle::Flow),
    )
    .unwrap();
    assert_eq!(flow, "{a: [b, {c: d}]}\n");
    assert_eq!(scalar_values(&flow), ["a", "b", "c", "d"]);

    let block = emit_events(events, EmitterOptions::default().flow_style(FlowStyle::Block)).unwrap();
    assert_eq!(block, "a:\n- b\n- c: d\n");
}

#[test]
fn emit_canonical_round_trip() {
    let out = assert_round_trip(BLOCK_MAP_INPUT, EmitterOptions::default().canonical(true));
    assert!(out.starts_with("---\n{"), "{out:?}");
    let out = assert_round_trip(FLOW_IN_BLOCK_INPUT, EmitterOptions::default().canonical(true));
    assert!(out.contains('[') && !out.contains("- "), "{out:?}");
}

#[test]
fn emit_multiline_prefers_literal() {
    let out = emit_events(scalar_document("a\n b", ScalarType::Plain), EmitterOptions::default()).unwrap();
    assert_eq!(out, "- |-\n  a\n   b\n");
    assert_eq!(scalar_values(&out), ["a\n b"]);

    let out = emit_events(
        scalar_document("line\n  indented\n", ScalarType::SingleQuote),
        EmitterOptions::default(),
    )
    .unwrap();
    assert_eq!(out, "- |\n  line\n    indented\n");
    assert_eq!(scalar_values(&out), ["line\n  indented\n"]);
}

#[test]
fn emit_escaped_long_key_round_trips() {
    let key = "\u{1}".repeat(300);
    let events = vec![
        Event::StreamStart,
        Event::document_start(false),
        Event::MappingStart(CollectionStart::block()),
        Event::plain(key.as_str()),
        Event::plain("v"),
        Event::MappingEnd,
        Event::DocumentEnd { explicit: false },
        Event::StreamEnd,
    ];
    let out = emit_events(events, EmitterOptions::default().max_simple_key_length(1024)).unwrap();
    assert!(out.starts_with("? \""), "{out:?}");
    assert_eq!(scalar_values(&out), [key.as_str(), "v"]);
}

#[test]
fn emit_astral_double_quoted() {
    let events = scalar_document("\u{1F600}", ScalarType::DoubleQuote);
    let out = emit_events(events.clone(), EmitterOptions::default()).unwrap();
    assert_eq!(out, "- \"\u{1F600}\"\n");
    assert_eq!(scalar_values(&out), ["\u{1F600}"]);

    let ascii = emit_events(events, EmitterOptions::default().allow_unicode(false)).unwrap();
    assert_eq!(ascii, "- \"\\U0001F600\"\n");
    assert_eq!(scalar_values(&ascii), ["\u{1F600}"]);
}

#[test]
fn emit_deep_nesting() {
    let depth = 1000;
    let mut input = "- ".repeat(depth);
    input.push_str("x\n");
    let out = assert_round_trip(&input, EmitterOptions::default());
    assert!(out.ends_with("x\n"));

    let flow = format!("{}x{}", "[".repeat(depth), "]".repeat(depth));
    assert_round_trip(&flow, EmitterOptions::default());
}

proptest! {
    #[test]
    fn plain_request_round_trips(value in "[ -~\n]{0,30}") {
        let out = emit_events(scalar_document(&value, ScalarType::Plain), EmitterOptions::default()).unwrap();
        prop_assert_eq!(scalar_values(&out), vec![value]);
    }

    #[test]
    fn quoted_request_round_trips(value in "[ -~\t\u{e0}-\u{ff}]{0,30}") {
        for style in [ScalarType::SingleQuote, ScalarType::DoubleQuote] {
            let out = emit_events(scalar_document(&value, style), EmitterOptions::default()).unwrap();
            prop_assert_eq!(scalar_values(&out), vec![value.clone()]);
        }
    }

    #[test]
    fn style_choice_is_deterministic(value in "[ -~\n]{0,30}", indent in 2usize..=9) {
        let options = EmitterOptions::default().indent(indent);
        let first = emit_events(scalar_document(&value, ScalarType::Plain), options.clone()).unwrap();
        let second = emit_events(scalar_document(&value, ScalarType::Plain), options).unwrap();
        prop_assert_eq!(first, second);
    }

    #[test]
    fn mapping_keys_round_trip(key in "[a-z ]{1,12}", value in "[ -~]{0,20}") {
        let events = vec![
            Event::StreamStart,
            Event::document_start(false),
            Event::MappingStart(CollectionStart::block()),
            Event::plain(key.as_str()),
            Event::plain(value.as_str()),
            Event::MappingEnd,
            Event::DocumentEnd { explicit: false },
            Event::StreamEnd,
        ];
        let out = emit_events(events, EmitterOptions::default()).unwrap();
        prop_assert_eq!(scalar_values(&out), vec![key, value]);
    }
}
