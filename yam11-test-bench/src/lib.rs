pub mod consts;

use std::fmt::Write;
use yam11_common::{
    CollectionStart, EmitError, Event, Implicit, ScalarType, ScalarValue, Tag, YamlResult,
};
use yam11_core::emitter::{EmitterOptions, FlowStyle};
use yam11_core::escaper::EscapeWriter;
use yam11_core::{Emitter, Parser, Source};

///
/// Assert that in for given input, the parser generates expected set of events
///
/// `events` uses the yaml-test-suite notation without the stream events. A trailing
/// `ERR` line means the input must fail; the events listed before it must be produced
/// before the failure.
///
/// # Panics
///
///    Function panics if there is a difference between expected events string and one generated
///    from the input.
pub fn assert_eq_event(input: &str, events: &str) {
    let mut line = String::new();
    let mut parser = Parser::new_from_str(input);
    write_str_from_event(&mut line, &mut parser, false);

    let expected_err = events.ends_with("ERR");
    let actual_err = line.ends_with("ERR");
    assert_eq!(
        actual_err, expected_err,
        "Error mismatch in case: {input:?}\ngot:{line}"
    );
    if expected_err {
        let prefix = events.trim_end_matches("ERR").trim_end();
        assert!(
            line.starts_with(prefix),
            "Error in case: {input:?}\nexpected prefix:{prefix}\ngot:{line}"
        );
    } else {
        assert_eq!(line, events, "Error in case: {input:?}");
    }
}

/// Writes every event of `parser` in the yaml-test-suite notation, one per line, each
/// line preceded by a line break. A failure adds a final `ERR` line.
pub fn write_str_from_event<T: Source>(
    line: &mut String,
    parser: &mut Parser<T>,
    emit_stream_token: bool,
) {
    for res in parser.by_ref() {
        match res {
            Ok((Event::StreamStart, _)) if emit_stream_token => line.push_str("+STR"),
            Ok((Event::StreamEnd, _)) if emit_stream_token => line.push_str("\n-STR"),
            Ok((Event::StreamStart | Event::StreamEnd, _)) => {}
            Ok((ev, _)) => {
                line.push('\n');
                write_event(line, &ev);
            }
            Err(_) => {
                line.push_str("\nERR");
                break;
            }
        }
    }
    if emit_stream_token {
        line.push('\n');
    }
}

/// Single event in the yaml-test-suite notation, e.g. `=VAL &a <tag:yaml.org,2002:str> 'x`.
pub fn write_event(line: &mut String, ev: &Event) {
    let _ = match ev {
        Event::StreamStart => write!(line, "+STR"),
        Event::StreamEnd => write!(line, "-STR"),
        Event::DocumentStart { explicit, .. } => {
            write!(line, "+DOC{}", if *explicit { " ---" } else { "" })
        }
        Event::DocumentEnd { explicit } => {
            write!(line, "-DOC{}", if *explicit { " ..." } else { "" })
        }
        Event::Alias(name) => write!(line, "=ALI *{name}"),
        Event::Scalar(ScalarValue {
            value,
            scalar_type,
            anchor,
            tag,
            ..
        }) => {
            line.push_str("=VAL");
            write_props(line, anchor.as_deref(), tag.as_ref());
            let _ = write!(line, " {scalar_type}");
            write!(EscapeWriter::new(&mut *line, event_escape), "{value}")
        }
        Event::SequenceStart(start) => {
            line.push_str(if start.flow { "+SEQ []" } else { "+SEQ" });
            write_props(line, start.anchor.as_deref(), start.tag.as_ref());
            Ok(())
        }
        Event::SequenceEnd => write!(line, "-SEQ"),
        Event::MappingStart(start) => {
            line.push_str(if start.flow { "+MAP {}" } else { "+MAP" });
            write_props(line, start.anchor.as_deref(), start.tag.as_ref());
            Ok(())
        }
        Event::MappingEnd => write!(line, "-MAP"),
    };
}

fn write_props(line: &mut String, anchor: Option<&str>, tag: Option<&Tag>) {
    if let Some(anchor) = anchor {
        let _ = write!(line, " &{anchor}");
    }
    if let Some(tag) = tag {
        let _ = write!(line, " <{tag}>");
    }
}

/// Escapes scalar values the way `test.event` files do.
fn event_escape(c: char) -> Option<String> {
    let escaped = match c {
        '\\' => "\\\\",
        '\n' => "\\n",
        '\t' => "\\t",
        '\r' => "\\r",
        '\x08' => "\\b",
        _ => return None,
    };
    Some(escaped.to_string())
}

/// Collects every event of `input`, stream events included.
///
/// # Errors
/// Returns the first error the parser reports.
pub fn parse_events(input: &str) -> YamlResult<Vec<Event<'_>>> {
    Parser::new_from_str(input)
        .map(|res| res.map(|(ev, _)| ev))
        .collect()
}

/// Feeds `events` to an emitter and returns the text.
///
/// # Errors
/// Returns the first error the emitter reports.
pub fn emit_events<'a>(
    events: impl IntoIterator<Item = Event<'a>>,
    options: EmitterOptions,
) -> Result<String, EmitError> {
    let mut out = String::new();
    let mut emitter = Emitter::with_options(&mut out, options)?;
    for ev in events {
        emitter.emit(ev)?;
    }
    Ok(out)
}

/// Event with everything that does not survive re-emitting cleared: scalar styles,
/// implicit flags, document markers and directives. Non-specific `!` tags are dropped
/// because the emitter omits them.
#[must_use]
pub fn comparable(ev: &Event) -> Event<'static> {
    fn specific(tag: &Option<Tag>) -> Option<Tag> {
        tag.clone().filter(|t| !t.is_non_specific())
    }
    match ev {
        Event::DocumentStart { .. } => Event::document_start(false),
        Event::DocumentEnd { .. } => Event::DocumentEnd { explicit: false },
        Event::Scalar(scalar) => Event::Scalar(ScalarValue {
            value: scalar.value.to_string().into(),
            scalar_type: ScalarType::Plain,
            anchor: scalar.anchor.as_ref().map(|a| a.to_string().into()),
            tag: specific(&scalar.tag),
            implicit: Implicit::BOTH,
        }),
        Event::SequenceStart(start) => Event::SequenceStart(CollectionStart {
            anchor: start.anchor.as_ref().map(|a| a.to_string().into()),
            tag: specific(&start.tag),
            implicit: true,
            flow: start.flow,
        }),
        Event::MappingStart(start) => Event::MappingStart(CollectionStart {
            anchor: start.anchor.as_ref().map(|a| a.to_string().into()),
            tag: specific(&start.tag),
            implicit: true,
            flow: start.flow,
        }),
        other => other.clone().into_owned(),
    }
}

/// Like [`comparable`], with the flow flag of collections cleared too.
#[must_use]
pub fn comparable_layout_free(ev: &Event) -> Event<'static> {
    match comparable(ev) {
        Event::SequenceStart(start) => Event::SequenceStart(CollectionStart {
            flow: false,
            ..start
        }),
        Event::MappingStart(start) => Event::MappingStart(CollectionStart {
            flow: false,
            ..start
        }),
        other => other,
    }
}

/// Parses `input`, emits the events with `options`, parses the output again and
/// checks both event streams agree once made [`comparable`]. Returns the emitted
/// text.
///
/// Canonical output and a forced [`FlowStyle`] pick the collection layout
/// themselves, so those runs compare with [`comparable_layout_free`].
///
/// # Panics
///
///    Panics if either parse or the emit fails, or if the event streams differ.
pub fn assert_round_trip(input: &str, options: EmitterOptions) -> String {
    let events = parse_events(input)
        .unwrap_or_else(|err| panic!("input failed to parse: {err}\n{input:?}"));
    let layout_free = options.canonical || !matches!(options.flow_style, FlowStyle::Auto);
    let normalize: fn(&Event) -> Event<'static> = if layout_free {
        comparable_layout_free
    } else {
        comparable
    };
    let expected: Vec<Event> = events.iter().map(normalize).collect();
    let output = emit_events(events, options)
        .unwrap_or_else(|err| panic!("emitter failed: {err}\n{input:?}"));
    let reparsed = parse_events(&output)
        .unwrap_or_else(|err| panic!("output failed to parse: {err}\n{output:?}"));
    let actual: Vec<Event> = reparsed.iter().map(normalize).collect();
    assert_eq!(actual, expected, "round trip of {input:?} through {output:?}");
    output
}
