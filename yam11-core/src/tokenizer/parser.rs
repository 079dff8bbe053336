use crate::tokenizer::scanner::Scanner;
use crate::{Reader, Source};
use alloc::format;
use alloc::string::{String, ToString};
use alloc::vec::Vec;
use hashbrown::HashMap;
use tracing::{debug, trace, warn};
use yam11_common::{
    CollectionStart, Event, EventKind, Implicit, Marker, ParseError, ScalarType, ScalarValue,
    Span, Tag, Token, TokenType, YamlError, YamlResult,
};

/// Tag handles every document starts with.
const DEFAULT_TAGS: [(&str, &str); 2] = [("!", "!"), ("!!", "tag:yaml.org,2002:")];

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
enum State {
    StreamStart,
    ImplicitDocumentStart,
    DocumentStart,
    DocumentContent,
    DocumentEnd,
    BlockNode,
    BlockNodeOrIndentlessSequence,
    FlowNode,
    BlockSequenceFirstEntry,
    BlockSequenceEntry,
    IndentlessSequenceEntry,
    BlockMappingFirstKey,
    BlockMappingKey,
    BlockMappingValue,
    FlowSequenceFirstEntry,
    FlowSequenceEntry,
    FlowSequenceEntryMappingKey,
    FlowSequenceEntryMappingValue,
    FlowSequenceEntryMappingEnd,
    FlowMappingFirstKey,
    FlowMappingKey,
    FlowMappingValue,
    FlowMappingEmptyValue,
    End,
}

type EventResult<'input> = YamlResult<(Event<'input>, Span)>;

/// Pull parser turning tokens into events.
///
/// Nesting is tracked on an explicit stack of states, so arbitrarily deep documents
/// never grow the call stack. Every call to [`Parser::next_event`] pulls only as many
/// tokens as it needs to produce one event.
pub struct Parser<'input, S> {
    scanner: Scanner<'input, S>,
    token: Option<Token<'input>>,
    current: Option<(Event<'input>, Span)>,
    state: State,
    states: Vec<State>,
    tag_handles: HashMap<String, String>,
    error: Option<YamlError>,
    finished: bool,
}

impl<'input> Parser<'input, Reader<'input>> {
    #[must_use]
    pub fn new_from_str(input: &'input str) -> Self {
        Parser::new(Reader::from_str(input))
    }

    #[must_use]
    pub fn new_from_bytes(input: &'input [u8]) -> Self {
        Parser::new(Reader::from_bytes(input))
    }
}

impl<'input, S: Source> Parser<'input, S> {
    pub fn new(src: S) -> Self {
        Parser {
            scanner: Scanner::new(src),
            token: None,
            current: None,
            state: State::StreamStart,
            states: Vec::new(),
            tag_handles: HashMap::new(),
            error: None,
            finished: false,
        }
    }

    /// Returns the next event together with its span.
    ///
    /// # Errors
    /// Returns the first reader, scanner or parser error. Errors are sticky, every
    /// later call returns the same error.
    pub fn next_event(&mut self) -> EventResult<'input> {
        if let Some(err) = &self.error {
            return Err(err.clone());
        }
        if let Some(event) = self.current.take() {
            return Ok(event);
        }

        match self.state_machine() {
            Ok((event, span)) => {
                trace!("Event {:?} at {:?}", event, span);
                Ok((event, span))
            }
            Err(err) => {
                self.error = Some(err.clone());
                Err(err)
            }
        }
    }

    /// Returns the next event without consuming it.
    ///
    /// # Errors
    /// Same as [`Parser::next_event`].
    pub fn peek_event(&mut self) -> YamlResult<&(Event<'input>, Span)> {
        let event = match self.current.take() {
            Some(event) => event,
            None => self.next_event()?,
        };
        Ok(self.current.insert(event))
    }

    /// Checks whether the next event is one of `kinds`. With no kinds given, checks
    /// that there is a next event at all.
    ///
    /// # Errors
    /// Same as [`Parser::next_event`].
    pub fn check_event(&mut self, kinds: &[EventKind]) -> YamlResult<bool> {
        if self.finished && self.current.is_none() {
            return Ok(false);
        }
        let (event, _) = self.peek_event()?;
        Ok(kinds.is_empty() || kinds.contains(&event.kind()))
    }

    fn fetch_token(&mut self) -> YamlResult<Token<'input>> {
        match self.token.take() {
            Some(tok) => Ok(tok),
            None => self.scanner.next_token(),
        }
    }

    fn peek_token(&mut self) -> YamlResult<&Token<'input>> {
        let tok = self.fetch_token()?;
        Ok(self.token.insert(tok))
    }

    fn skip_token(&mut self) {
        self.token = None;
    }

    fn pop_state(&mut self) -> State {
        self.states.pop().unwrap_or(State::End)
    }

    /// Error for a token the current state can not accept.
    fn unexpected(&mut self, context: &'static str, expected: &'static str) -> YamlError {
        match self.peek_token() {
            Ok(tok) => {
                ParseError::unexpected(tok.span.start, context, expected, tok.token_type.describe())
                    .into()
            }
            Err(err) => err,
        }
    }

    fn empty_scalar(mark: Marker) -> (Event<'input>, Span) {
        let mut scalar = ScalarValue::new("", ScalarType::Plain);
        scalar.implicit = Implicit::PLAIN;
        (Event::Scalar(scalar), Span::empty(mark))
    }

    fn state_machine(&mut self) -> EventResult<'input> {
        match self.state {
            State::StreamStart => self.stream_start(),
            State::ImplicitDocumentStart => self.document_start(true),
            State::DocumentStart => self.document_start(false),
            State::DocumentContent => self.document_content(),
            State::DocumentEnd => self.document_end(),
            State::BlockNode => self.parse_node(true, false),
            State::BlockNodeOrIndentlessSequence => self.parse_node(true, true),
            State::FlowNode => self.parse_node(false, false),
            State::BlockSequenceFirstEntry => {
                self.skip_token();
                self.block_sequence_entry()
            }
            State::BlockSequenceEntry => self.block_sequence_entry(),
            State::IndentlessSequenceEntry => self.indentless_sequence_entry(),
            State::BlockMappingFirstKey => {
                self.skip_token();
                self.block_mapping_key()
            }
            State::BlockMappingKey => self.block_mapping_key(),
            State::BlockMappingValue => self.block_mapping_value(),
            State::FlowSequenceFirstEntry => {
                self.skip_token();
                self.flow_sequence_entry(true)
            }
            State::FlowSequenceEntry => self.flow_sequence_entry(false),
            State::FlowSequenceEntryMappingKey => self.flow_sequence_entry_mapping_key(),
            State::FlowSequenceEntryMappingValue => self.flow_sequence_entry_mapping_value(),
            State::FlowSequenceEntryMappingEnd => self.flow_sequence_entry_mapping_end(),
            State::FlowMappingFirstKey => {
                self.skip_token();
                self.flow_mapping_key(true)
            }
            State::FlowMappingKey => self.flow_mapping_key(false),
            State::FlowMappingValue => self.flow_mapping_value(),
            State::FlowMappingEmptyValue => {
                self.state = State::FlowMappingKey;
                let mark = self.peek_token()?.span.start;
                Ok(Self::empty_scalar(mark))
            }
            State::End => {
                let mark = self.scanner.mark();
                Ok((Event::StreamEnd, Span::empty(mark)))
            }
        }
    }

    fn stream_start(&mut self) -> EventResult<'input> {
        let tok = self.fetch_token()?;
        if tok.token_type == TokenType::StreamStart {
            self.state = State::ImplicitDocumentStart;
            Ok((Event::StreamStart, tok.span))
        } else {
            let found = tok.token_type.describe();
            self.token = Some(tok);
            Err(self.unexpected_at("while parsing a stream", "<stream start>", found))
        }
    }

    fn unexpected_at(
        &mut self,
        context: &'static str,
        expected: &'static str,
        found: &'static str,
    ) -> YamlError {
        let mark = self.token.as_ref().map_or_else(|| self.scanner.mark(), |t| t.span.start);
        ParseError::unexpected(mark, context, expected, found).into()
    }

    fn document_start(&mut self, implicit: bool) -> EventResult<'input> {
        if implicit {
            let tok = self.peek_token()?;
            let starts_document = !matches!(
                tok.token_type,
                TokenType::VersionDirective { .. }
                    | TokenType::TagDirective { .. }
                    | TokenType::ReservedDirective { .. }
                    | TokenType::DocumentStart
                    | TokenType::StreamEnd
            );
            if starts_document {
                let mark = tok.span.start;
                self.reset_tag_handles();
                self.states.push(State::DocumentEnd);
                self.state = State::BlockNode;
                debug!("implicit document start at {}", mark);
                return Ok((Event::document_start(false), Span::empty(mark)));
            }
        }

        // Stray document end markers are skipped.
        while self.peek_token()?.token_type == TokenType::DocumentEnd {
            self.skip_token();
        }

        let tok = self.peek_token()?;
        if tok.token_type == TokenType::StreamEnd {
            let span = tok.span;
            self.skip_token();
            self.state = State::End;
            self.finished = true;
            return Ok((Event::StreamEnd, span));
        }

        let start = tok.span.start;
        let (version, tags) = self.process_directives()?;
        let tok = self.peek_token()?;
        if tok.token_type != TokenType::DocumentStart {
            return Err(self.unexpected("while parsing a document", "<document start>"));
        }
        let end = tok.span.end;
        self.skip_token();

        self.states.push(State::DocumentEnd);
        self.state = State::DocumentContent;
        debug!("explicit document start at {}", start);
        Ok((
            Event::DocumentStart {
                explicit: true,
                version,
                tags,
            },
            Span::new(start, end),
        ))
    }

    fn reset_tag_handles(&mut self) {
        self.tag_handles.clear();
        for (handle, prefix) in DEFAULT_TAGS {
            self.tag_handles
                .insert(handle.to_string(), prefix.to_string());
        }
    }

    /// Consumes the directives before a document. Returns the `%YAML` version and the
    /// `%TAG` directives in declaration order.
    #[allow(clippy::type_complexity)]
    fn process_directives(&mut self) -> YamlResult<(Option<(u8, u8)>, Vec<(String, String)>)> {
        let mut version = None;
        let mut tags = Vec::new();
        self.tag_handles.clear();

        loop {
            let tok = self.fetch_token()?;
            match tok.token_type {
                TokenType::VersionDirective { major, minor } => {
                    if version.is_some() {
                        return Err(ParseError::new(
                            tok.span.start,
                            "while parsing directives",
                            "found duplicate YAML directive".to_string(),
                        )
                        .into());
                    }
                    if major != 1 {
                        return Err(ParseError::new(
                            tok.span.start,
                            "while parsing directives",
                            "found incompatible YAML document (version 1.* is required)"
                                .to_string(),
                        )
                        .into());
                    }
                    if minor != 1 {
                        warn!("unsupported YAML version {major}.{minor}, parsing as 1.1");
                    }
                    version = Some((major, minor));
                }
                TokenType::TagDirective { handle, prefix } => {
                    if self.tag_handles.contains_key(handle.as_ref()) {
                        return Err(ParseError::new(
                            tok.span.start,
                            "while parsing directives",
                            format!("found duplicate tag handle {handle}"),
                        )
                        .into());
                    }
                    self.tag_handles
                        .insert(handle.to_string(), prefix.to_string());
                    tags.push((handle.into_owned(), prefix.into_owned()));
                }
                TokenType::ReservedDirective { name } => {
                    warn!("ignoring reserved directive %{name}");
                }
                _ => {
                    self.token = Some(tok);
                    break;
                }
            }
        }

        for (handle, prefix) in DEFAULT_TAGS {
            self.tag_handles
                .entry(handle.to_string())
                .or_insert_with(|| prefix.to_string());
        }
        Ok((version, tags))
    }

    fn document_content(&mut self) -> EventResult<'input> {
        let tok = self.peek_token()?;
        if matches!(
            tok.token_type,
            TokenType::VersionDirective { .. }
                | TokenType::TagDirective { .. }
                | TokenType::ReservedDirective { .. }
                | TokenType::DocumentStart
                | TokenType::DocumentEnd
                | TokenType::StreamEnd
        ) {
            let mark = tok.span.start;
            self.state = self.pop_state();
            Ok(Self::empty_scalar(mark))
        } else {
            self.parse_node(true, false)
        }
    }

    fn document_end(&mut self) -> EventResult<'input> {
        let tok = self.peek_token()?;
        let mut span = Span::empty(tok.span.start);
        let explicit = tok.token_type == TokenType::DocumentEnd;
        if explicit {
            span.end = tok.span.end;
            self.skip_token();
        }
        self.state = State::DocumentStart;
        debug!("document end, explicit: {explicit}");
        Ok((Event::DocumentEnd { explicit }, span))
    }

    fn parse_node(&mut self, block: bool, indentless_sequence: bool) -> EventResult<'input> {
        let tok = self.fetch_token()?;
        let mut tok = match tok.token_type {
            TokenType::Alias(name) => {
                self.state = self.pop_state();
                return Ok((Event::Alias(name), tok.span));
            }
            _ => tok,
        };

        let mut anchor = None;
        let mut raw_tag = None;
        let mut props_start: Option<Marker> = None;
        let mut end_mark = tok.span.start;
        let mut tag_mark = tok.span.start;
        loop {
            match tok.token_type {
                TokenType::Anchor(name) if anchor.is_none() => {
                    props_start.get_or_insert(tok.span.start);
                    end_mark = tok.span.end;
                    anchor = Some(name);
                }
                TokenType::Tag { handle, suffix } if raw_tag.is_none() => {
                    props_start.get_or_insert(tok.span.start);
                    tag_mark = tok.span.start;
                    end_mark = tok.span.end;
                    raw_tag = Some((handle, suffix));
                }
                _ => break,
            }
            tok = self.fetch_token()?;
        }

        let tag = match raw_tag {
            None => None,
            Some((handle, suffix)) if handle.is_empty() => Some(Tag::from_uri(suffix)),
            Some((handle, suffix)) => match self.tag_handles.get(handle.as_ref()) {
                Some(prefix) => Some(Tag::new(prefix.clone(), suffix)),
                None => {
                    return Err(ParseError::new(
                        tag_mark,
                        "while parsing a node",
                        format!("found undefined tag handle {handle}"),
                    )
                    .into());
                }
            },
        };

        let start_mark = match props_start {
            Some(mark) => mark,
            None => {
                end_mark = tok.span.start;
                tok.span.start
            }
        };
        let non_specific = tag.as_ref().map_or(true, Tag::is_non_specific);

        if indentless_sequence && tok.token_type == TokenType::BlockEntry {
            let span = Span::new(start_mark, tok.span.end);
            self.token = Some(tok);
            self.state = State::IndentlessSequenceEntry;
            return Ok((
                Event::SequenceStart(CollectionStart {
                    anchor,
                    tag,
                    implicit: non_specific,
                    flow: false,
                }),
                span,
            ));
        }

        match tok.token_type {
            TokenType::Scalar { scalar_type, value } => {
                let implicit = if (scalar_type == ScalarType::Plain && tag.is_none())
                    || matches!(tag, Some(ref t) if t.is_non_specific())
                {
                    Implicit::PLAIN
                } else if tag.is_none() {
                    Implicit::QUOTED
                } else {
                    Implicit::NONE
                };
                self.state = self.pop_state();
                Ok((
                    Event::Scalar(ScalarValue {
                        value,
                        scalar_type,
                        anchor,
                        tag,
                        implicit,
                    }),
                    Span::new(start_mark, tok.span.end),
                ))
            }
            TokenType::FlowSequenceStart | TokenType::FlowMappingStart => {
                let span = Span::new(start_mark, tok.span.end);
                let start = CollectionStart {
                    anchor,
                    tag,
                    implicit: non_specific,
                    flow: true,
                };
                let event = if tok.token_type == TokenType::FlowSequenceStart {
                    self.state = State::FlowSequenceFirstEntry;
                    Event::SequenceStart(start)
                } else {
                    self.state = State::FlowMappingFirstKey;
                    Event::MappingStart(start)
                };
                self.token = Some(tok);
                Ok((event, span))
            }
            TokenType::BlockSequenceStart | TokenType::BlockMappingStart if block => {
                let span = Span::new(start_mark, tok.span.start);
                let start = CollectionStart {
                    anchor,
                    tag,
                    implicit: non_specific,
                    flow: false,
                };
                let event = if tok.token_type == TokenType::BlockSequenceStart {
                    self.state = State::BlockSequenceFirstEntry;
                    Event::SequenceStart(start)
                } else {
                    self.state = State::BlockMappingFirstKey;
                    Event::MappingStart(start)
                };
                self.token = Some(tok);
                Ok((event, span))
            }
            _ if anchor.is_some() || tag.is_some() => {
                // Properties without content make an empty scalar.
                self.token = Some(tok);
                self.state = self.pop_state();
                let mut scalar = ScalarValue::new("", ScalarType::Plain);
                scalar.anchor = anchor;
                scalar.tag = tag;
                scalar.implicit = Implicit {
                    plain: non_specific,
                    quoted: false,
                };
                Ok((Event::Scalar(scalar), Span::new(start_mark, end_mark)))
            }
            _ => {
                let context = if block {
                    "while parsing a block node"
                } else {
                    "while parsing a flow node"
                };
                let found = tok.token_type.describe();
                self.token = Some(tok);
                Err(self.unexpected_at(context, "the node content", found))
            }
        }
    }

    fn block_sequence_entry(&mut self) -> EventResult<'input> {
        let tok = self.peek_token()?;
        match tok.token_type {
            TokenType::BlockEntry => {
                let mark = tok.span.end;
                self.skip_token();
                if matches!(
                    self.peek_token()?.token_type,
                    TokenType::BlockEntry | TokenType::BlockEnd
                ) {
                    self.state = State::BlockSequenceEntry;
                    Ok(Self::empty_scalar(mark))
                } else {
                    self.states.push(State::BlockSequenceEntry);
                    self.parse_node(true, false)
                }
            }
            TokenType::BlockEnd => {
                let span = tok.span;
                self.skip_token();
                self.state = self.pop_state();
                Ok((Event::SequenceEnd, span))
            }
            _ => Err(self.unexpected("while parsing a block collection", "<block end>")),
        }
    }

    fn indentless_sequence_entry(&mut self) -> EventResult<'input> {
        let tok = self.peek_token()?;
        if tok.token_type != TokenType::BlockEntry {
            let mark = tok.span.start;
            self.state = self.pop_state();
            return Ok((Event::SequenceEnd, Span::empty(mark)));
        }

        let mark = tok.span.end;
        self.skip_token();
        if matches!(
            self.peek_token()?.token_type,
            TokenType::BlockEntry | TokenType::Key | TokenType::Value | TokenType::BlockEnd
        ) {
            self.state = State::IndentlessSequenceEntry;
            Ok(Self::empty_scalar(mark))
        } else {
            self.states.push(State::IndentlessSequenceEntry);
            self.parse_node(true, false)
        }
    }

    fn block_mapping_key(&mut self) -> EventResult<'input> {
        let tok = self.peek_token()?;
        match tok.token_type {
            TokenType::Key => {
                let mark = tok.span.end;
                self.skip_token();
                if matches!(
                    self.peek_token()?.token_type,
                    TokenType::Key | TokenType::Value | TokenType::BlockEnd
                ) {
                    self.state = State::BlockMappingValue;
                    Ok(Self::empty_scalar(mark))
                } else {
                    self.states.push(State::BlockMappingValue);
                    self.parse_node(true, true)
                }
            }
            TokenType::BlockEnd => {
                let span = tok.span;
                self.skip_token();
                self.state = self.pop_state();
                Ok((Event::MappingEnd, span))
            }
            _ => Err(self.unexpected("while parsing a block mapping", "<block end>")),
        }
    }

    fn block_mapping_value(&mut self) -> EventResult<'input> {
        let tok = self.peek_token()?;
        if tok.token_type != TokenType::Value {
            let mark = tok.span.start;
            self.state = State::BlockMappingKey;
            return Ok(Self::empty_scalar(mark));
        }

        let mark = tok.span.end;
        self.skip_token();
        if matches!(
            self.peek_token()?.token_type,
            TokenType::Key | TokenType::Value | TokenType::BlockEnd
        ) {
            self.state = State::BlockMappingKey;
            Ok(Self::empty_scalar(mark))
        } else {
            self.states.push(State::BlockMappingKey);
            self.parse_node(true, true)
        }
    }

    fn flow_sequence_entry(&mut self, first: bool) -> EventResult<'input> {
        let tok = self.peek_token()?;
        if tok.token_type != TokenType::FlowSequenceEnd {
            if !first {
                if tok.token_type != TokenType::FlowEntry {
                    return Err(self.unexpected("while parsing a flow sequence", "',' or ']'"));
                }
                self.skip_token();
            }

            let tok = self.peek_token()?;
            match tok.token_type {
                TokenType::Key => {
                    // A single `key: value` pair inside a flow sequence.
                    let span = tok.span;
                    self.state = State::FlowSequenceEntryMappingKey;
                    return Ok((Event::MappingStart(CollectionStart::flow()), span));
                }
                TokenType::FlowSequenceEnd => {}
                _ => {
                    self.states.push(State::FlowSequenceEntry);
                    return self.parse_node(false, false);
                }
            }
        }

        let span = self.peek_token()?.span;
        self.skip_token();
        self.state = self.pop_state();
        Ok((Event::SequenceEnd, span))
    }

    fn flow_sequence_entry_mapping_key(&mut self) -> EventResult<'input> {
        let tok = self.fetch_token()?;
        let mark = tok.span.end;
        if matches!(
            self.peek_token()?.token_type,
            TokenType::Value | TokenType::FlowEntry | TokenType::FlowSequenceEnd
        ) {
            self.state = State::FlowSequenceEntryMappingValue;
            Ok(Self::empty_scalar(mark))
        } else {
            self.states.push(State::FlowSequenceEntryMappingValue);
            self.parse_node(false, false)
        }
    }

    fn flow_sequence_entry_mapping_value(&mut self) -> EventResult<'input> {
        let tok = self.peek_token()?;
        if tok.token_type != TokenType::Value {
            let mark = tok.span.start;
            self.state = State::FlowSequenceEntryMappingEnd;
            return Ok(Self::empty_scalar(mark));
        }

        let mark = tok.span.end;
        self.skip_token();
        if matches!(
            self.peek_token()?.token_type,
            TokenType::FlowEntry | TokenType::FlowSequenceEnd
        ) {
            self.state = State::FlowSequenceEntryMappingEnd;
            Ok(Self::empty_scalar(mark))
        } else {
            self.states.push(State::FlowSequenceEntryMappingEnd);
            self.parse_node(false, false)
        }
    }

    fn flow_sequence_entry_mapping_end(&mut self) -> EventResult<'input> {
        self.state = State::FlowSequenceEntry;
        let mark = self.peek_token()?.span.start;
        Ok((Event::MappingEnd, Span::empty(mark)))
    }

    fn flow_mapping_key(&mut self, first: bool) -> EventResult<'input> {
        let tok = self.peek_token()?;
        if tok.token_type != TokenType::FlowMappingEnd {
            if !first {
                if tok.token_type != TokenType::FlowEntry {
                    return Err(self.unexpected("while parsing a flow mapping", "',' or '}'"));
                }
                self.skip_token();
            }

            let tok = self.peek_token()?;
            match tok.token_type {
                TokenType::Key => {
                    let mark = tok.span.end;
                    self.skip_token();
                    if matches!(
                        self.peek_token()?.token_type,
                        TokenType::Value | TokenType::FlowEntry | TokenType::FlowMappingEnd
                    ) {
                        self.state = State::FlowMappingValue;
                        return Ok(Self::empty_scalar(mark));
                    }
                    self.states.push(State::FlowMappingValue);
                    return self.parse_node(false, false);
                }
                TokenType::FlowMappingEnd => {}
                _ => {
                    self.states.push(State::FlowMappingEmptyValue);
                    return self.parse_node(false, false);
                }
            }
        }

        let span = self.peek_token()?.span;
        self.skip_token();
        self.state = self.pop_state();
        Ok((Event::MappingEnd, span))
    }

    fn flow_mapping_value(&mut self) -> EventResult<'input> {
        let tok = self.peek_token()?;
        if tok.token_type != TokenType::Value {
            let mark = tok.span.start;
            self.state = State::FlowMappingKey;
            return Ok(Self::empty_scalar(mark));
        }

        let mark = tok.span.end;
        self.skip_token();
        if matches!(
            self.peek_token()?.token_type,
            TokenType::FlowEntry | TokenType::FlowMappingEnd
        ) {
            self.state = State::FlowMappingKey;
            Ok(Self::empty_scalar(mark))
        } else {
            self.states.push(State::FlowMappingKey);
            self.parse_node(false, false)
        }
    }
}

impl<'input, S: Source> Iterator for Parser<'input, S> {
    type Item = EventResult<'input>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.finished && self.current.is_none() {
            return None;
        }
        let res = self.next_event();
        if res.is_err() {
            self.finished = true;
        }
        Some(res)
    }
}

#[cfg(test)]
mod test {
    use crate::Parser;
    use alloc::vec;
    use alloc::vec::Vec;
    use yam11_common::{Event, EventKind, Implicit, ScalarType, ScalarValue, Tag, YamlError};

    fn events(input: &str) -> Vec<Event<'_>> {
        Parser::new_from_str(input)
            .map(|res| res.map(|(ev, _)| ev))
            .collect::<Result<_, _>>()
            .unwrap()
    }

    #[test]
    fn test_block_mapping_events() {
        let kinds: Vec<EventKind> = events("a: 1\nb: 2\n").iter().map(Event::kind).collect();
        assert_eq!(
            kinds,
            [
                EventKind::StreamStart,
                EventKind::DocumentStart,
                EventKind::MappingStart,
                EventKind::Scalar,
                EventKind::Scalar,
                EventKind::Scalar,
                EventKind::Scalar,
                EventKind::MappingEnd,
                EventKind::DocumentEnd,
                EventKind::StreamEnd,
            ]
        );
    }

    #[test]
    fn test_tag_resolution() {
        let evs = events("%TAG !e! tag:example.com,2000:\n--- !e!foo [!!str a, ! b]\n");
        assert_eq!(
            evs[1],
            Event::DocumentStart {
                explicit: true,
                version: None,
                tags: vec![("!e!".into(), "tag:example.com,2000:".into())],
            }
        );
        assert_eq!(
            evs[2].tag(),
            Some(&Tag::new("tag:example.com,2000:", "foo"))
        );
        let Event::Scalar(ref str_scalar) = evs[3] else {
            panic!("expected scalar");
        };
        assert_eq!(str_scalar.tag, Some(Tag::new("tag:yaml.org,2002:", "str")));
        assert_eq!(str_scalar.implicit, Implicit::NONE);
        let Event::Scalar(ref bang) = evs[4] else {
            panic!("expected scalar");
        };
        assert_eq!(bang.implicit, Implicit::PLAIN);
    }

    #[test]
    fn test_quoted_scalar_implicit() {
        let evs = events("'a'");
        let Event::Scalar(ref scalar) = evs[2] else {
            panic!("expected scalar");
        };
        assert_eq!(scalar.implicit, Implicit::QUOTED);
    }

    #[test]
    fn test_anchor_without_content() {
        let evs = events("- &a\n- !!null\n");
        let Event::Scalar(ref anchored) = evs[3] else {
            panic!("expected scalar");
        };
        assert_eq!(anchored.anchor.as_deref(), Some("a"));
        assert_eq!(anchored.value, "");
        assert_eq!(anchored.implicit, Implicit::PLAIN);
        let Event::Scalar(ref tagged) = evs[4] else {
            panic!("expected scalar");
        };
        assert_eq!(tagged.implicit, Implicit::NONE);
    }

    #[test]
    fn test_errors_are_sticky() {
        let mut parser = Parser::new_from_str("a: : b");
        let err = loop {
            match parser.next_event() {
                Ok(_) => {}
                Err(err) => break err,
            }
        };
        assert!(matches!(err, YamlError::Parser(_)));
        assert_eq!(parser.next_event().unwrap_err(), err);
    }

    #[test]
    fn test_directive_errors() {
        let dup = Parser::new_from_str("%YAML 1.1\n%YAML 1.1\n---\n").find_map(Result::err);
        assert!(matches!(dup, Some(YamlError::Parser(ref e)) if e.problem.contains("duplicate YAML")));

        let major = Parser::new_from_str("%YAML 2.0\n---\n").find_map(Result::err);
        assert!(matches!(major, Some(YamlError::Parser(ref e)) if e.problem.contains("incompatible")));

        let handle = Parser::new_from_str("!x!y z").find_map(Result::err);
        assert!(matches!(handle, Some(YamlError::Parser(ref e)) if e.problem.contains("undefined tag handle")));
    }

    #[test]
    fn test_peek_and_check() {
        let mut parser = Parser::new_from_str("x");
        assert!(parser.check_event(&[EventKind::StreamStart]).unwrap());
        assert!(!parser.check_event(&[EventKind::Scalar]).unwrap());
        assert_eq!(parser.peek_event().unwrap().0, Event::StreamStart);
        assert_eq!(parser.next_event().unwrap().0, Event::StreamStart);
        assert_eq!(parser.next_event().unwrap().0, Event::document_start(false));
        let mut expected = ScalarValue::new("x", ScalarType::Plain);
        expected.implicit = Implicit::PLAIN;
        assert_eq!(parser.next_event().unwrap().0, Event::Scalar(expected));
        assert!(parser.check_event(&[EventKind::DocumentEnd]).unwrap());
    }
}
