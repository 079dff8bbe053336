use yam11_test_bench::assert_eq_event;
use yam11_test_bench::consts::*;

#[test]
fn block_map() {
    assert_eq_event(BLOCK_MAP_INPUT, BLOCK_MAP_EVENTS);
    assert_eq_event(NESTED_MAP_INPUT, NESTED_MAP_EVENTS);
}

#[test]
fn block_seq() {
    assert_eq_event(BLOCK1_INPUT, BLOCK_EVENTS);
    assert_eq_event(BLOCK2_INPUT, BLOCK_EVENTS);
    assert_eq_event(SEQ_PLAIN_INPUT, SEQ_PLAIN_EVENTS);
}

#[test]
fn seq_block_nested() {
    assert_eq_event(NESTED_SEQ_INPUT, NESTED_SEQ_EVENTS);
    assert_eq_event(INDENTLESS_INPUT, INDENTLESS_EVENTS);
}

#[test]
fn block_complex_key() {
    assert_eq_event(COMPLEX_KEY_INPUT, COMPLEX_KEY_EVENTS);
}

#[test]
fn block_plain_multiline() {
    assert_eq_event(MULTILINE_PLAIN_INPUT, MULTILINE_PLAIN_EVENTS);
}

#[test]
fn block_literal() {
    assert_eq_event(LITERAL_INPUT, LITERAL_EVENTS);
    assert_eq_event(CHOMP_INPUT, CHOMP_EVENTS);
    assert_eq_event(INDENT_INDICATOR_INPUT, INDENT_INDICATOR_EVENTS);
}

#[test]
fn block_fold() {
    assert_eq_event(FOLDED_INPUT, FOLDED_EVENTS);
}

#[test]
fn block_props() {
    assert_eq_event(ANCHOR_ALIAS_INPUT, ANCHOR_ALIAS_EVENTS);
    assert_eq_event(TAGS_INPUT, TAGS_EVENTS);
}

#[test]
fn deep_nesting() {
    let depth = 1000;
    let mut input = "- ".repeat(depth);
    input.push_str("x\n");

    let events = yam11_test_bench::parse_events(&input).unwrap();
    let starts = events
        .iter()
        .filter(|ev| matches!(ev, yam11_common::Event::SequenceStart(_)))
        .count();
    let ends = events
        .iter()
        .filter(|ev| matches!(ev, yam11_common::Event::SequenceEnd))
        .count();
    assert_eq!(starts, depth);
    assert_eq!(ends, depth);
}
