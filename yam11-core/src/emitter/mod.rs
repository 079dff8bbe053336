//! Event-driven YAML writer.
//!
//! The [`Emitter`] accepts events in the order the [`Parser`](crate::Parser) produces
//! them and writes YAML text into any [`fmt::Write`]. Scalar styles are chosen per
//! event: the requested style is honored when the content allows it, otherwise the
//! narrowest safe style is used.

mod analysis;
mod options;

pub use analysis::{analyze_scalar, ScalarAnalysis};
pub use options::{EmitterOptions, FlowStyle, LineBreak};

use crate::escaper::escape_str;
use crate::tokenizer::char_utils::{is_alpha, is_break, is_printable};
use alloc::collections::{BTreeMap, VecDeque};
use alloc::format;
use alloc::string::{String, ToString};
use alloc::vec::Vec;
use analysis::is_ambiguous_plain;
use core::fmt;
use tracing::{debug, trace};
use yam11_common::{
    CollectionStart, EmitError, Event, EventKind, Implicit, ScalarType, ScalarValue,
};

/// A convenience alias for emitter functions that may fail without returning a value.
pub type EmitResult = Result<(), EmitError>;

const DEFAULT_TAG_PREFIXES: [(&str, &str); 2] = [("!", "!"), ("tag:yaml.org,2002:", "!!")];

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
enum State {
    StreamStart,
    FirstDocumentStart,
    DocumentStart,
    DocumentRoot,
    DocumentEnd,
    FirstFlowSequenceItem,
    FlowSequenceItem,
    FirstFlowMappingKey,
    FlowMappingKey,
    FlowMappingSimpleValue,
    FlowMappingValue,
    FirstBlockSequenceItem,
    BlockSequenceItem,
    FirstBlockMappingKey,
    BlockMappingKey,
    BlockMappingSimpleValue,
    BlockMappingValue,
    Nothing,
}

/// Where a node sits relative to its parent.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
enum NodeContext {
    Root,
    Sequence,
    Mapping,
    SimpleKey,
}

/// Writes events as YAML text.
///
/// Collection nesting is kept on explicit stacks, so arbitrarily deep input is
/// written without recursion. After the first error the emitter is poisoned and
/// rejects every further event with [`EmitError::Poisoned`].
///
/// ```
/// use yam11_common::{CollectionStart, Event};
/// use yam11_core::Emitter;
///
/// let mut out = String::new();
/// let mut emitter = Emitter::new(&mut out);
/// for event in [
///     Event::StreamStart,
///     Event::document_start(false),
///     Event::MappingStart(CollectionStart::block()),
///     Event::plain("a"),
///     Event::plain("b"),
///     Event::MappingEnd,
///     Event::DocumentEnd { explicit: false },
///     Event::StreamEnd,
/// ] {
///     emitter.emit(event).unwrap();
/// }
/// assert_eq!(out, "a: b\n");
/// ```
pub struct Emitter<'w, 'input> {
    writer: &'w mut dyn fmt::Write,
    options: EmitterOptions,
    events: VecDeque<Event<'input>>,
    state: State,
    states: Vec<State>,
    indents: Vec<Option<usize>>,
    indent: Option<usize>,
    flow_level: usize,
    root_context: bool,
    mapping_context: bool,
    simple_key_context: bool,
    column: usize,
    whitespace: bool,
    indention: bool,
    open_ended: bool,
    /// Active tag prefixes mapped to their handles.
    tag_prefixes: BTreeMap<String, String>,
    prepared_anchor: Option<String>,
    prepared_tag: Option<String>,
    analysis: Option<ScalarAnalysis>,
    style: Option<ScalarType>,
    failed: bool,
}

impl<'w, 'input> Emitter<'w, 'input> {
    /// Creates an emitter with [`EmitterOptions::default`].
    pub fn new(writer: &'w mut dyn fmt::Write) -> Self {
        Emitter {
            writer,
            options: EmitterOptions::default(),
            events: VecDeque::with_capacity(4),
            state: State::StreamStart,
            states: Vec::new(),
            indents: Vec::new(),
            indent: None,
            flow_level: 0,
            root_context: false,
            mapping_context: false,
            simple_key_context: false,
            column: 0,
            whitespace: true,
            indention: true,
            open_ended: false,
            tag_prefixes: BTreeMap::new(),
            prepared_anchor: None,
            prepared_tag: None,
            analysis: None,
            style: None,
            failed: false,
        }
    }

    /// Creates an emitter with custom options.
    ///
    /// # Errors
    /// Returns [`EmitError::Options`] if the options fail [`EmitterOptions::validate`].
    pub fn with_options(
        writer: &'w mut dyn fmt::Write,
        options: EmitterOptions,
    ) -> Result<Self, EmitError> {
        options.validate()?;
        let mut emitter = Emitter::new(writer);
        emitter.options = options;
        Ok(emitter)
    }

    #[must_use]
    pub fn options(&self) -> &EmitterOptions {
        &self.options
    }

    /// Feeds one event to the emitter.
    ///
    /// Output for an event may be delayed until up to three following events arrive,
    /// the emitter needs them to spot empty documents, empty collections and keys
    /// that fit on one line.
    ///
    /// # Errors
    /// Returns [`EmitError`] if the event does not fit the current state or its
    /// content can not be written. The emitter stays unusable afterwards.
    pub fn emit(&mut self, event: Event<'input>) -> EmitResult {
        if self.failed {
            return Err(EmitError::Poisoned);
        }
        self.events.push_back(event);
        while !self.need_more_events() {
            let Some(event) = self.events.pop_front() else {
                break;
            };
            trace!("Emit {:?} in {:?}", event, self.state);
            if let Err(err) = self.dispatch(event) {
                self.failed = true;
                return Err(err);
            }
        }
        Ok(())
    }

    fn need_more_events(&self) -> bool {
        let Some(first) = self.events.front() else {
            return true;
        };
        let count = match first.kind() {
            EventKind::DocumentStart => 1,
            EventKind::SequenceStart => 2,
            EventKind::MappingStart => 3,
            _ => return false,
        };

        let mut level: i32 = 0;
        for event in self.events.iter().skip(1) {
            match event.kind() {
                EventKind::DocumentStart | EventKind::SequenceStart | EventKind::MappingStart => {
                    level += 1;
                }
                EventKind::DocumentEnd | EventKind::SequenceEnd | EventKind::MappingEnd => {
                    level -= 1;
                }
                EventKind::StreamEnd => level = -1,
                _ => {}
            }
            if level < 0 {
                return false;
            }
        }
        self.events.len() < count + 1
    }

    fn dispatch(&mut self, event: Event<'input>) -> EmitResult {
        match self.state {
            State::StreamStart => self.expect_stream_start(event),
            State::FirstDocumentStart => self.expect_document_start(event, true),
            State::DocumentStart => self.expect_document_start(event, false),
            State::DocumentRoot => {
                self.states.push(State::DocumentEnd);
                self.expect_node(event, NodeContext::Root)
            }
            State::DocumentEnd => self.expect_document_end(event),
            State::FirstFlowSequenceItem => self.expect_flow_sequence_item(event, true),
            State::FlowSequenceItem => self.expect_flow_sequence_item(event, false),
            State::FirstFlowMappingKey => self.expect_flow_mapping_key(event, true),
            State::FlowMappingKey => self.expect_flow_mapping_key(event, false),
            State::FlowMappingSimpleValue => {
                self.write_indicator(":", false, false, false)?;
                self.states.push(State::FlowMappingKey);
                self.expect_node(event, NodeContext::Mapping)
            }
            State::FlowMappingValue => {
                if self.options.canonical || self.column > self.options.width {
                    self.write_indent()?;
                }
                self.write_indicator(":", true, false, false)?;
                self.states.push(State::FlowMappingKey);
                self.expect_node(event, NodeContext::Mapping)
            }
            State::FirstBlockSequenceItem => self.expect_block_sequence_item(event, true),
            State::BlockSequenceItem => self.expect_block_sequence_item(event, false),
            State::FirstBlockMappingKey => self.expect_block_mapping_key(event, true),
            State::BlockMappingKey => self.expect_block_mapping_key(event, false),
            State::BlockMappingSimpleValue => {
                self.write_indicator(":", false, false, false)?;
                self.states.push(State::BlockMappingKey);
                self.expect_node(event, NodeContext::Mapping)
            }
            State::BlockMappingValue => {
                self.write_indent()?;
                self.write_indicator(":", true, false, true)?;
                self.states.push(State::BlockMappingKey);
                self.expect_node(event, NodeContext::Mapping)
            }
            State::Nothing => Err(invalid_event("expected nothing", &event)),
        }
    }

    fn pop_state(&mut self) -> State {
        self.states.pop().unwrap_or(State::Nothing)
    }

    fn pop_indent(&mut self) {
        self.indent = self.indents.pop().unwrap_or(None);
    }

    fn increase_indent(&mut self, flow: bool, indentless: bool) {
        self.indents.push(self.indent);
        match self.indent {
            None if flow => self.indent = Some(self.options.indent),
            None => self.indent = Some(0),
            Some(indent) if !indentless => self.indent = Some(indent + self.options.indent),
            Some(_) => {}
        }
    }

    fn next_is(&self, kind: EventKind) -> bool {
        self.events.front().map(Event::kind) == Some(kind)
    }

    fn expect_stream_start(&mut self, event: Event<'input>) -> EmitResult {
        if event != Event::StreamStart {
            return Err(invalid_event("expected StreamStart", &event));
        }
        debug!("emitter stream start");
        self.state = State::FirstDocumentStart;
        Ok(())
    }

    fn expect_document_start(&mut self, event: Event<'input>, first: bool) -> EmitResult {
        let (explicit, version, tags) = match event {
            Event::DocumentStart {
                explicit,
                version,
                tags,
            } => (explicit, version, tags),
            Event::StreamEnd => {
                if self.open_ended {
                    self.write_indicator("...", true, false, false)?;
                    self.write_indent()?;
                }
                self.state = State::Nothing;
                return Ok(());
            }
            other => return Err(invalid_event("expected DocumentStart", &other)),
        };

        if (version.is_some() || !tags.is_empty()) && self.open_ended {
            self.write_indicator("...", true, false, false)?;
            self.write_indent()?;
        }
        if let Some((major, minor)) = version {
            if major != 1 {
                return Err(EmitError::Unrepresentable(format!(
                    "unsupported YAML version: {major}.{minor}"
                )));
            }
            self.write_raw(&format!("%YAML {major}.{minor}"))?;
            self.write_line_break(None)?;
        }

        self.tag_prefixes.clear();
        for (prefix, handle) in DEFAULT_TAG_PREFIXES {
            self.tag_prefixes
                .insert(prefix.to_string(), handle.to_string());
        }
        for (handle, prefix) in &tags {
            let handle_text = prepare_tag_handle(handle)?;
            let prefix_text = prepare_tag_prefix(prefix)?;
            self.tag_prefixes.insert(prefix.clone(), handle.clone());
            self.write_raw(&format!("%TAG {handle_text} {prefix_text}"))?;
            self.write_line_break(None)?;
        }

        let implicit = first
            && !explicit
            && !self.options.canonical
            && !self.options.explicit_start
            && version.is_none()
            && tags.is_empty()
            && !self.check_empty_document();
        if !implicit {
            self.write_indent()?;
            self.write_indicator("---", true, false, false)?;
            if self.options.canonical {
                self.write_indent()?;
            }
        }
        debug!("emitter document start, implicit: {implicit}");
        self.state = State::DocumentRoot;
        Ok(())
    }

    /// An empty untagged scalar as the whole document needs a `---` to be seen.
    fn check_empty_document(&self) -> bool {
        match self.events.front() {
            Some(Event::Scalar(scalar)) => {
                scalar.anchor.is_none() && scalar.tag.is_none() && scalar.value.is_empty()
            }
            _ => false,
        }
    }

    fn expect_document_end(&mut self, event: Event<'input>) -> EmitResult {
        let Event::DocumentEnd { explicit } = event else {
            return Err(invalid_event("expected DocumentEnd", &event));
        };
        self.write_indent()?;
        if explicit || self.options.explicit_end {
            self.write_indicator("...", true, false, false)?;
            self.write_indent()?;
        }
        self.state = State::DocumentStart;
        Ok(())
    }

    fn expect_node(&mut self, event: Event<'input>, context: NodeContext) -> EmitResult {
        self.root_context = context == NodeContext::Root;
        self.mapping_context = matches!(context, NodeContext::Mapping | NodeContext::SimpleKey);
        self.simple_key_context = context == NodeContext::SimpleKey;

        match event {
            Event::Alias(name) => {
                self.process_anchor('*', Some(name.as_ref()))?;
                self.state = self.pop_state();
                Ok(())
            }
            Event::Scalar(scalar) => {
                self.process_anchor('&', scalar.anchor.as_deref())?;
                self.process_scalar_tag(&scalar)?;
                self.increase_indent(true, false);
                self.process_scalar(&scalar)?;
                self.pop_indent();
                self.state = self.pop_state();
                Ok(())
            }
            Event::SequenceStart(start) => {
                self.process_anchor('&', start.anchor.as_deref())?;
                self.process_collection_tag(&start)?;
                if self.use_flow(&start, EventKind::SequenceEnd) {
                    self.write_indicator("[", true, true, false)?;
                    self.flow_level += 1;
                    self.increase_indent(true, false);
                    self.state = State::FirstFlowSequenceItem;
                } else {
                    let indentless = self.mapping_context && !self.indention;
                    self.increase_indent(false, indentless);
                    self.state = State::FirstBlockSequenceItem;
                }
                Ok(())
            }
            Event::MappingStart(start) => {
                self.process_anchor('&', start.anchor.as_deref())?;
                self.process_collection_tag(&start)?;
                if self.use_flow(&start, EventKind::MappingEnd) {
                    self.write_indicator("{", true, true, false)?;
                    self.flow_level += 1;
                    self.increase_indent(true, false);
                    self.state = State::FirstFlowMappingKey;
                } else {
                    self.increase_indent(false, false);
                    self.state = State::FirstBlockMappingKey;
                }
                Ok(())
            }
            other => Err(invalid_event("expected a node", &other)),
        }
    }

    fn use_flow(&self, start: &CollectionStart<'_>, end: EventKind) -> bool {
        let requested = match self.options.flow_style {
            FlowStyle::Auto => start.flow,
            FlowStyle::Flow => true,
            FlowStyle::Block => false,
        };
        self.flow_level > 0 || self.options.canonical || requested || self.next_is(end)
    }

    fn expect_flow_sequence_item(&mut self, event: Event<'input>, first: bool) -> EmitResult {
        if event == Event::SequenceEnd {
            self.pop_indent();
            self.flow_level -= 1;
            if self.options.canonical && !first {
                self.write_indicator(",", false, false, false)?;
                self.write_indent()?;
            }
            self.write_indicator("]", false, false, false)?;
            self.state = self.pop_state();
            return Ok(());
        }

        if !first {
            self.write_indicator(",", false, false, false)?;
        }
        if self.options.canonical || self.column > self.options.width {
            self.write_indent()?;
        }
        self.states.push(State::FlowSequenceItem);
        self.expect_node(event, NodeContext::Sequence)
    }

    fn expect_flow_mapping_key(&mut self, event: Event<'input>, first: bool) -> EmitResult {
        if event == Event::MappingEnd {
            self.pop_indent();
            self.flow_level -= 1;
            if self.options.canonical && !first {
                self.write_indicator(",", false, false, false)?;
                self.write_indent()?;
            }
            self.write_indicator("}", false, false, false)?;
            self.state = self.pop_state();
            return Ok(());
        }

        if !first {
            self.write_indicator(",", false, false, false)?;
        }
        if self.options.canonical || self.column > self.options.width {
            self.write_indent()?;
        }
        if !self.options.canonical && self.check_simple_key(&event)? {
            self.states.push(State::FlowMappingSimpleValue);
            self.expect_node(event, NodeContext::SimpleKey)
        } else {
            self.write_indicator("?", true, false, false)?;
            self.states.push(State::FlowMappingValue);
            self.expect_node(event, NodeContext::Mapping)
        }
    }

    fn expect_block_sequence_item(&mut self, event: Event<'input>, first: bool) -> EmitResult {
        if !first && event == Event::SequenceEnd {
            self.pop_indent();
            self.state = self.pop_state();
            return Ok(());
        }
        self.write_indent()?;
        self.write_indicator("-", true, false, true)?;
        self.states.push(State::BlockSequenceItem);
        self.expect_node(event, NodeContext::Sequence)
    }

    fn expect_block_mapping_key(&mut self, event: Event<'input>, first: bool) -> EmitResult {
        if !first && event == Event::MappingEnd {
            self.pop_indent();
            self.state = self.pop_state();
            return Ok(());
        }
        self.write_indent()?;
        if self.check_simple_key(&event)? {
            self.states.push(State::BlockMappingSimpleValue);
            self.expect_node(event, NodeContext::SimpleKey)
        } else {
            self.write_indicator("?", true, false, true)?;
            self.states.push(State::BlockMappingValue);
            self.expect_node(event, NodeContext::Mapping)
        }
    }

    /// Checks if `event` can be written as a `key: value` key. Prepares the anchor,
    /// tag and analysis on the way, they are reused when the key is written.
    fn check_simple_key(&mut self, event: &Event<'input>) -> Result<bool, EmitError> {
        let mut length = 0;
        if let Some(anchor) = event.anchor() {
            let prepared = prepare_anchor(anchor)?;
            length += prepared.len() + 2;
            self.prepared_anchor = Some(prepared);
        }
        if let Some(tag) = event.tag() {
            let prepared = self.prepare_tag(&tag.to_string())?;
            length += prepared.len() + 1;
            self.prepared_tag = Some(prepared);
        }

        let simple = match event {
            Event::Alias(name) => {
                length += name.len() + 1;
                true
            }
            Event::Scalar(scalar) => {
                let analysis = analyze_scalar(&scalar.value, self.options.allow_unicode);
                self.analysis = Some(analysis);
                length += self.written_key_length(scalar);
                !analysis.empty && !analysis.multiline
            }
            Event::SequenceStart(_) => self.next_is(EventKind::SequenceEnd),
            Event::MappingStart(_) => self.next_is(EventKind::MappingEnd),
            _ => false,
        };
        Ok(simple && length < self.options.max_simple_key_length)
    }

    /// Columns `scalar` takes up once written as a simple key, quotes and escapes
    /// included.
    fn written_key_length(&mut self, scalar: &ScalarValue<'_>) -> usize {
        let simple_key_context = core::mem::replace(&mut self.simple_key_context, true);
        let style = self.choose_scalar_style(scalar);
        self.simple_key_context = simple_key_context;

        let value = scalar.value.as_ref();
        match style {
            ScalarType::Plain => value.chars().count(),
            ScalarType::SingleQuote => value.chars().count() + value.matches('\'').count() + 2,
            _ => escape_str(value, self.options.escaper).chars().count() + 2,
        }
    }

    fn process_anchor(&mut self, indicator: char, anchor: Option<&str>) -> EmitResult {
        let Some(anchor) = anchor else {
            self.prepared_anchor = None;
            return Ok(());
        };
        let prepared = match self.prepared_anchor.take() {
            Some(prepared) if indicator == '&' => prepared,
            _ => prepare_anchor(anchor)?,
        };
        self.write_indicator(&format!("{indicator}{prepared}"), true, false, false)
    }

    fn process_scalar_tag(&mut self, scalar: &ScalarValue<'_>) -> EmitResult {
        let style = self.choose_scalar_style(scalar);
        self.style = Some(style);
        let implicit = scalar.implicit;

        if (!self.options.canonical || scalar.tag.is_none())
            && ((style == ScalarType::Plain && implicit.plain)
                || (style != ScalarType::Plain && implicit.quoted))
        {
            self.prepared_tag = None;
            return Ok(());
        }

        let prepared = match (&scalar.tag, self.prepared_tag.take()) {
            (Some(_), Some(prepared)) => prepared,
            (Some(tag), None) => self.prepare_tag(&tag.to_string())?,
            // A plain-only implicit scalar in another style needs the `!` tag.
            (None, _) if implicit.plain => "!".to_string(),
            (None, _) => {
                return Err(EmitError::Unrepresentable(
                    "tag is not specified for a scalar that is not implicit".to_string(),
                ));
            }
        };
        self.write_indicator(&prepared, true, false, false)
    }

    fn process_collection_tag(&mut self, start: &CollectionStart<'_>) -> EmitResult {
        if (!self.options.canonical || start.tag.is_none()) && start.implicit {
            self.prepared_tag = None;
            return Ok(());
        }
        let prepared = match (&start.tag, self.prepared_tag.take()) {
            (Some(_), Some(prepared)) => prepared,
            (Some(tag), None) => self.prepare_tag(&tag.to_string())?,
            (None, _) => {
                return Err(EmitError::Unrepresentable(
                    "tag is not specified for a collection that is not implicit".to_string(),
                ));
            }
        };
        self.write_indicator(&prepared, true, false, false)
    }

    fn scalar_analysis(&mut self, value: &str) -> ScalarAnalysis {
        match self.analysis {
            Some(analysis) => analysis,
            None => {
                let analysis = analyze_scalar(value, self.options.allow_unicode);
                self.analysis = Some(analysis);
                analysis
            }
        }
    }

    fn choose_scalar_style(&mut self, scalar: &ScalarValue<'_>) -> ScalarType {
        let analysis = self.scalar_analysis(&scalar.value);
        let requested = scalar.scalar_type;
        let style = if requested == ScalarType::DoubleQuote || self.options.canonical {
            ScalarType::DoubleQuote
        } else if requested == ScalarType::Plain
            && (scalar.implicit.plain || scalar.tag.is_some())
            && !(self.simple_key_context && (analysis.empty || analysis.multiline))
            && ((self.flow_level > 0 && analysis.allow_flow_plain)
                || (self.flow_level == 0 && analysis.allow_block_plain))
            && !(scalar.implicit == Implicit::BOTH && is_ambiguous_plain(&scalar.value))
        {
            ScalarType::Plain
        } else if requested.is_block()
            && self.flow_level == 0
            && !self.simple_key_context
            && analysis.allow_block
        {
            requested
        } else if matches!(requested, ScalarType::Plain | ScalarType::SingleQuote)
            && analysis.allow_single_quoted
            && !(self.simple_key_context && analysis.multiline)
        {
            ScalarType::SingleQuote
        } else if matches!(requested, ScalarType::Plain | ScalarType::SingleQuote)
            && self.flow_level == 0
            && !self.simple_key_context
            && analysis.allow_block
            && analysis.multiline
        {
            ScalarType::Literal
        } else {
            ScalarType::DoubleQuote
        };
        if style != requested {
            debug!("scalar style {:?} replaced by {:?}", requested, style);
        }
        style
    }

    fn process_scalar(&mut self, scalar: &ScalarValue<'_>) -> EmitResult {
        let style = match self.style.take() {
            Some(style) => style,
            None => self.choose_scalar_style(scalar),
        };
        self.analysis = None;
        let split = !self.simple_key_context;
        let chars: Vec<char> = scalar.value.chars().collect();
        match style {
            ScalarType::Plain => self.write_plain(&chars, split),
            ScalarType::SingleQuote => self.write_single_quoted(&chars, split),
            ScalarType::DoubleQuote => self.write_double_quoted(&chars, split),
            ScalarType::Literal => self.write_literal(&chars),
            ScalarType::Folded => self.write_folded(&chars),
        }
    }

    fn prepare_tag(&self, tag: &str) -> Result<String, EmitError> {
        if tag.is_empty() {
            return Err(EmitError::Unrepresentable("tag must not be empty".to_string()));
        }
        if tag == "!" {
            return Ok(tag.to_string());
        }

        let mut handle: Option<&str> = None;
        let mut suffix = tag;
        for (prefix, prefix_handle) in &self.tag_prefixes {
            if tag.starts_with(prefix.as_str()) && (prefix == "!" || prefix.len() < tag.len()) {
                handle = Some(prefix_handle.as_str());
                suffix = &tag[prefix.len()..];
            }
        }

        let verbatim = handle.is_none();
        let suffix_text = percent_encode(suffix, |c| {
            is_tag_uri_char(c) || (verbatim && matches!(c, ',' | '[' | ']' | '!'))
        });
        Ok(match handle {
            Some(handle) => format!("{handle}{suffix_text}"),
            None => format!("!<{suffix_text}>"),
        })
    }

    fn write_raw(&mut self, data: &str) -> EmitResult {
        self.column += data.chars().count();
        self.writer.write_str(data)?;
        Ok(())
    }

    fn write_chars(&mut self, data: &[char]) -> EmitResult {
        for &c in data {
            self.writer.write_char(c)?;
        }
        self.column += data.len();
        Ok(())
    }

    fn write_indicator(
        &mut self,
        indicator: &str,
        need_whitespace: bool,
        whitespace: bool,
        indention: bool,
    ) -> EmitResult {
        if !self.whitespace && need_whitespace {
            self.write_raw(" ")?;
        }
        self.write_raw(indicator)?;
        self.whitespace = whitespace;
        self.indention = self.indention && indention;
        self.open_ended = false;
        Ok(())
    }

    fn write_indent(&mut self) -> EmitResult {
        let indent = self.indent.unwrap_or(0);
        if !self.indention
            || self.column > indent
            || (self.column == indent && !self.whitespace)
        {
            self.write_line_break(None)?;
        }
        if self.column < indent {
            self.whitespace = true;
            for _ in self.column..indent {
                self.writer.write_char(' ')?;
            }
            self.column = indent;
        }
        Ok(())
    }

    fn write_line_break(&mut self, line_break: Option<char>) -> EmitResult {
        match line_break {
            Some(c) if c != '\n' => self.writer.write_char(c)?,
            _ => self.writer.write_str(self.options.line_break.as_str())?,
        }
        self.whitespace = true;
        self.indention = true;
        self.column = 0;
        Ok(())
    }

    fn write_breaks(&mut self, breaks: &[char]) -> EmitResult {
        for &br in breaks {
            self.write_line_break(Some(br))?;
        }
        Ok(())
    }

    fn write_plain(&mut self, text: &[char], split: bool) -> EmitResult {
        if self.root_context {
            self.open_ended = true;
        }
        if text.is_empty() {
            return Ok(());
        }
        if !self.whitespace {
            self.write_raw(" ")?;
        }
        self.whitespace = false;
        self.indention = false;

        let mut spaces = false;
        let mut breaks = false;
        let mut start = 0;
        for end in 0..=text.len() {
            let ch = text.get(end).copied();
            if spaces {
                if ch != Some(' ') {
                    if start + 1 == end && self.column > self.options.width && split {
                        self.write_indent()?;
                        self.whitespace = false;
                        self.indention = false;
                    } else {
                        self.write_chars(&text[start..end])?;
                    }
                    start = end;
                }
            } else if breaks {
                if !matches!(ch, Some(c) if is_break(c)) {
                    if text[start] == '\n' {
                        self.write_line_break(None)?;
                    }
                    self.write_breaks(&text[start..end])?;
                    self.write_indent()?;
                    self.whitespace = false;
                    self.indention = false;
                    start = end;
                }
            } else if matches!(ch, None | Some(' ')) || matches!(ch, Some(c) if is_break(c)) {
                self.write_chars(&text[start..end])?;
                start = end;
            }
            if let Some(c) = ch {
                spaces = c == ' ';
                breaks = is_break(c);
            }
        }
        Ok(())
    }

    fn write_single_quoted(&mut self, text: &[char], split: bool) -> EmitResult {
        self.write_indicator("'", true, false, false)?;
        let mut spaces = false;
        let mut breaks = false;
        let mut start = 0;
        for end in 0..=text.len() {
            let ch = text.get(end).copied();
            if spaces {
                if ch != Some(' ') {
                    if start + 1 == end
                        && self.column > self.options.width
                        && split
                        && start != 0
                        && end != text.len()
                    {
                        self.write_indent()?;
                    } else {
                        self.write_chars(&text[start..end])?;
                    }
                    start = end;
                }
            } else if breaks {
                if !matches!(ch, Some(c) if is_break(c)) {
                    if text[start] == '\n' {
                        self.write_line_break(None)?;
                    }
                    self.write_breaks(&text[start..end])?;
                    self.write_indent()?;
                    start = end;
                }
            } else if (matches!(ch, None | Some(' ' | '\'')) || matches!(ch, Some(c) if is_break(c)))
                && start < end
            {
                self.write_chars(&text[start..end])?;
                start = end;
            }
            if ch == Some('\'') {
                self.write_raw("''")?;
                start = end + 1;
            }
            if let Some(c) = ch {
                spaces = c == ' ';
                breaks = is_break(c);
            }
        }
        self.write_indicator("'", false, false, false)
    }

    fn needs_escape(&self, c: char) -> bool {
        if matches!(c, '"' | '\\' | '\u{85}' | '\u{2028}' | '\u{2029}' | '\u{FEFF}') {
            return true;
        }
        let printable = (' '..='~').contains(&c)
            || (self.options.allow_unicode && !c.is_ascii() && is_printable(c));
        !printable
    }

    fn write_double_quoted(&mut self, text: &[char], split: bool) -> EmitResult {
        self.write_indicator("\"", true, false, false)?;
        let mut start = 0;
        for end in 0..=text.len() {
            let ch = text.get(end).copied();
            if ch.map_or(true, |c| self.needs_escape(c)) {
                if start < end {
                    self.write_chars(&text[start..end])?;
                    start = end;
                }
                if let Some(c) = ch {
                    let Some(escaped) = (self.options.escaper)(c) else {
                        return Err(EmitError::Unrepresentable(format!(
                            "character {:?} (U+{:04X}) has no escape sequence",
                            c,
                            u32::from(c)
                        )));
                    };
                    self.write_raw(&escaped)?;
                    start = end + 1;
                }
            }
            if 0 < end
                && end + 1 < text.len()
                && (ch == Some(' ') || start >= end)
                && self.column + end > self.options.width + start
                && split
            {
                if start < end {
                    self.write_chars(&text[start..end])?;
                    start = end;
                }
                self.write_raw("\\")?;
                self.write_indent()?;
                self.whitespace = false;
                self.indention = false;
                if text[start] == ' ' {
                    self.write_raw("\\")?;
                }
            }
        }
        self.write_indicator("\"", false, false, false)
    }

    fn block_hints(&self, text: &[char]) -> String {
        let mut hints = String::new();
        if let (Some(&first), Some(&last)) = (text.first(), text.last()) {
            if first == ' ' || is_break(first) {
                hints.push_str(&self.options.indent.to_string());
            }
            if !is_break(last) {
                hints.push('-');
            } else if text.len() == 1 || is_break(text[text.len() - 2]) {
                hints.push('+');
            }
        }
        hints
    }

    fn write_block_header(&mut self, indicator: char, text: &[char]) -> EmitResult {
        let hints = self.block_hints(text);
        self.write_indicator(&format!("{indicator}{hints}"), true, false, false)?;
        if hints.ends_with('+') {
            self.open_ended = true;
        }
        self.write_line_break(None)
    }

    fn write_folded(&mut self, text: &[char]) -> EmitResult {
        self.write_block_header('>', text)?;
        let mut leading_space = true;
        let mut spaces = false;
        let mut breaks = true;
        let mut start = 0;
        for end in 0..=text.len() {
            let ch = text.get(end).copied();
            if breaks {
                if !matches!(ch, Some(c) if is_break(c)) {
                    if !leading_space && matches!(ch, Some(c) if c != ' ') && text[start] == '\n' {
                        self.write_line_break(None)?;
                    }
                    leading_space = ch == Some(' ');
                    self.write_breaks(&text[start..end])?;
                    if ch.is_some() {
                        self.write_indent()?;
                    }
                    start = end;
                }
            } else if spaces {
                if ch != Some(' ') {
                    if start + 1 == end && self.column > self.options.width {
                        self.write_indent()?;
                    } else {
                        self.write_chars(&text[start..end])?;
                    }
                    start = end;
                }
            } else if matches!(ch, None | Some(' ')) || matches!(ch, Some(c) if is_break(c)) {
                self.write_chars(&text[start..end])?;
                if ch.is_none() {
                    self.write_line_break(None)?;
                }
                start = end;
            }
            if let Some(c) = ch {
                breaks = is_break(c);
                spaces = c == ' ';
            }
        }
        Ok(())
    }

    fn write_literal(&mut self, text: &[char]) -> EmitResult {
        self.write_block_header('|', text)?;
        let mut breaks = true;
        let mut start = 0;
        for end in 0..=text.len() {
            let ch = text.get(end).copied();
            if breaks {
                if !matches!(ch, Some(c) if is_break(c)) {
                    self.write_breaks(&text[start..end])?;
                    if ch.is_some() {
                        self.write_indent()?;
                    }
                    start = end;
                }
            } else if ch.map_or(true, is_break) {
                self.write_chars(&text[start..end])?;
                if ch.is_none() {
                    self.write_line_break(None)?;
                }
                start = end;
            }
            if let Some(c) = ch {
                breaks = is_break(c);
            }
        }
        Ok(())
    }
}

fn invalid_event(info: &str, event: &Event<'_>) -> EmitError {
    EmitError::InvalidEvent {
        info: info.to_string(),
        event: format!("{event:?}"),
    }
}

fn prepare_anchor(anchor: &str) -> Result<String, EmitError> {
    if anchor.is_empty() {
        return Err(EmitError::Unrepresentable("anchor must not be empty".to_string()));
    }
    if let Some(c) = anchor.chars().find(|&c| !is_alpha(c)) {
        return Err(EmitError::Unrepresentable(format!(
            "invalid character {c:?} in the anchor: {anchor:?}"
        )));
    }
    Ok(anchor.to_string())
}

fn prepare_tag_handle(handle: &str) -> Result<String, EmitError> {
    if handle.is_empty() {
        return Err(EmitError::Unrepresentable("tag handle must not be empty".to_string()));
    }
    if !handle.starts_with('!') || !handle.ends_with('!') {
        return Err(EmitError::Unrepresentable(format!(
            "tag handle must start and end with '!': {handle:?}"
        )));
    }
    let inner = handle.get(1..handle.len().saturating_sub(1)).unwrap_or_default();
    if let Some(c) = inner.chars().find(|&c| !is_alpha(c)) {
        return Err(EmitError::Unrepresentable(format!(
            "invalid character {c:?} in the tag handle: {handle:?}"
        )));
    }
    Ok(handle.to_string())
}

fn prepare_tag_prefix(prefix: &str) -> Result<String, EmitError> {
    if prefix.is_empty() {
        return Err(EmitError::Unrepresentable("tag prefix must not be empty".to_string()));
    }
    Ok(percent_encode(prefix, |c| {
        is_tag_uri_char(c) || matches!(c, '!' | ',' | '[' | ']')
    }))
}

/// URI characters that can be written unescaped in a tag shorthand.
#[cfg_attr(not(feature = "no-inline"), inline)]
fn is_tag_uri_char(c: char) -> bool {
    c.is_ascii_alphanumeric() || "-;/?:@&=+$_.~*'()".contains(c)
}

fn percent_encode(text: &str, allowed: impl Fn(char) -> bool) -> String {
    let mut out = String::with_capacity(text.len());
    let mut buf = [0u8; 4];
    for c in text.chars() {
        if allowed(c) {
            out.push(c);
        } else {
            out.push_str(&urlencoding::encode(c.encode_utf8(&mut buf)));
        }
    }
    out
}
