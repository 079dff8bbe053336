use yam11_common::YamlError;
use yam11_core::{Parser, YamlLoader};
use yam11_test_bench::assert_eq_event;
use yam11_test_bench::consts::*;

fn first_error(input: &str) -> YamlError {
    Parser::new_from_str(input)
        .find_map(Result::err)
        .unwrap_or_else(|| panic!("{input:?} should fail"))
}

#[test]
fn error_events() {
    assert_eq_event(VALUE_AFTER_VALUE_INPUT, VALUE_AFTER_VALUE_EVENTS);
    assert_eq_event(TAB_INDENT_INPUT, TAB_INDENT_EVENTS);
    assert_eq_event(CONTENT_AFTER_END_INPUT, CONTENT_AFTER_END_EVENTS);
    assert_eq_event(UNCLOSED_FLOW_INPUT, UNCLOSED_FLOW_EVENTS);
    assert_eq_event(MISSING_VALUE_INDICATOR_INPUT, MISSING_VALUE_INDICATOR_EVENTS);
    assert_eq_event(NON_PRINTABLE_INPUT, ERR_EVENTS);
    assert_eq_event(BAD_INDICATOR_INPUT, ERR_EVENTS);
}

#[test]
fn error_kinds() {
    assert!(matches!(first_error(VALUE_AFTER_VALUE_INPUT), YamlError::Parser(_)));
    assert!(matches!(first_error(TAB_INDENT_INPUT), YamlError::Scanner(_)));
    assert!(matches!(first_error(CONTENT_AFTER_END_INPUT), YamlError::Parser(_)));
    assert!(matches!(first_error(UNCLOSED_FLOW_INPUT), YamlError::Scanner(_)));
    assert!(matches!(first_error(NON_PRINTABLE_INPUT), YamlError::Reader(_)));
}

#[test]
fn error_positions() {
    let err = first_error(TAB_INDENT_INPUT);
    let mark = err.mark().unwrap();
    assert_eq!((mark.line, mark.col), (2, 1));

    let YamlError::Parser(err) = first_error(CONTENT_AFTER_END_INPUT) else {
        panic!("expected a parser error");
    };
    assert_eq!(err.mark.line, 3);
    assert_eq!(err.expected, Some("<document start>"));
    assert_eq!(err.found, Some("<scalar>"));
    assert!(err.to_string().contains("line 3 column 1"));
}

#[test]
fn undefined_alias() {
    let err = YamlLoader::load_from_str("- &a x\n- *b\n").unwrap_err();
    assert!(matches!(err, YamlError::Composer(_)));
    assert_eq!(
        err.to_string(),
        "while composing a node: found undefined alias b at line 2 column 3"
    );
}
