use yam11_test_bench::assert_eq_event;
use yam11_test_bench::consts::*;

#[test]
fn flow_map() {
    assert_eq_event(FLOW_MAP_INPUT, FLOW_MAP_EVENTS);
    assert_eq_event(FLOW_EMPTY_VALUES_INPUT, FLOW_EMPTY_VALUES_EVENTS);
}

#[test]
fn flow_seq() {
    assert_eq_event(FLOW_NESTED_INPUT, FLOW_NESTED_EVENTS);
    assert_eq_event(FLOW_PAIR_INPUT, FLOW_PAIR_EVENTS);
}

#[test]
fn flow_multiline() {
    assert_eq_event(FLOW_MULTILINE_INPUT, FLOW_MULTILINE_EVENTS);
}

#[test]
fn flow_in_block() {
    assert_eq_event(FLOW_IN_BLOCK_INPUT, FLOW_IN_BLOCK_EVENTS);
}

#[test]
fn flow_deep_nesting() {
    let depth = 1000;
    let input = format!("{}x{}", "[".repeat(depth), "]".repeat(depth));
    let events = yam11_test_bench::parse_events(&input).unwrap();
    // stream, document and the scalar on top of the collections
    assert_eq!(events.len(), depth * 2 + 5);
}
