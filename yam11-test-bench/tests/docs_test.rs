use yam11_common::{Event, EventKind};
use yam11_core::Parser;
use yam11_test_bench::assert_eq_event;
use yam11_test_bench::consts::*;

#[test]
fn explicit_doc() {
    assert_eq_event(EXPLICIT_DOC_INPUT, EXPLICIT_DOC_EVENTS);
}

#[test]
fn multi_doc() {
    assert_eq_event(MULTI_DOC_INPUT, MULTI_DOC_EVENTS);
}

#[test]
fn directives() {
    assert_eq_event(DIRECTIVE_INPUT, DIRECTIVE_EVENTS);

    let mut parser = Parser::new_from_str(DIRECTIVE_INPUT);
    parser.next_event().unwrap();
    let (start, span) = parser.next_event().unwrap();
    assert_eq!(
        start,
        Event::DocumentStart {
            explicit: true,
            version: Some((1, 1)),
            tags: vec![("!e!".into(), "tag:example.com,2000:app/".into())],
        }
    );
    assert_eq!(span.start.line, 1);
    assert_eq!(span.end.line, 3);
}

#[test]
fn tag_handles_reset_between_documents() {
    let input = "%TAG !e! tag:e.com,2000:\n--- !e!a x\n...\n--- !e!b y\n";
    let err = Parser::new_from_str(input).find_map(Result::err);
    assert!(err.is_some());
}

#[test]
fn stream_end_repeats() {
    let mut parser = Parser::new_from_str("a");
    let kinds: Vec<EventKind> = parser.by_ref().map(|ev| ev.unwrap().0.kind()).collect();
    assert_eq!(kinds.last(), Some(&EventKind::StreamEnd));
    assert_eq!(parser.next_event().unwrap().0, Event::StreamEnd);
    assert!(!parser.check_event(&[]).unwrap());
}

#[test]
fn spans_follow_input() {
    let mut parser = Parser::new_from_str("a: 1\nbb: 22\n");
    let spans: Vec<_> = parser
        .by_ref()
        .map(|ev| ev.unwrap())
        .filter(|(ev, _)| ev.kind() == EventKind::Scalar)
        .map(|(_, span)| (span.start.line, span.start.col, span.end.col))
        .collect();
    assert_eq!(spans, [(1, 1, 2), (1, 4, 5), (2, 1, 3), (2, 5, 7)]);
}
