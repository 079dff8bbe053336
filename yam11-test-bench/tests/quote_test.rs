use yam11_test_bench::assert_eq_event;
use yam11_test_bench::consts::*;

#[test]
fn single_quote() {
    assert_eq_event(SINGLE_QUOTE_INPUT, SINGLE_QUOTE_EVENTS);
}

#[test]
fn double_quote() {
    assert_eq_event(DOUBLE_QUOTE_INPUT, DOUBLE_QUOTE_EVENTS);
}

#[test]
fn quoted_keys() {
    assert_eq_event(QUOTED_KEYS_INPUT, QUOTED_KEYS_EVENTS);
}

#[test]
fn quote_err() {
    assert_eq_event(BAD_ESCAPE_INPUT, ERR_EVENTS);
    assert_eq_event(UNCLOSED_QUOTE_INPUT, ERR_EVENTS);
}
