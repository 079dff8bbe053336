extern crate core;

pub mod error;
pub mod event;

pub use error::{
    ComposeError, EmitError, ParseError, ReaderError, ReaderErrorKind, ScanError, ScanResult,
    YamlError, YamlResult,
};
pub use event::{CollectionStart, Event, EventKind, Implicit, ScalarValue};

use std::borrow::Cow;
use std::fmt::{Display, Formatter};

#[derive(Copy, Clone, PartialEq, Eq, Debug, Hash)]
pub enum ScalarType {
    /// Unquoted string type like:
    /// ```yaml
    ///   multiline
    ///   string
    /// ```
    Plain,
    /// Folded string type like:
    /// ```yaml
    ///   >
    ///     folded
    ///     string
    /// ```
    Folded,
    /// Literal string type like:
    /// ```yaml
    ///   |
    ///     literal
    ///     string
    /// ```
    Literal,
    /// Single quote string which permits any printable symbol inside
    /// E.g. :
    /// ```yaml
    /// ' This is a quoted string
    ///    with ''quoted'' string within.'
    /// ```
    SingleQuote,
    /// Double quote string, the only style able to hold escaped characters
    /// E.g. :
    /// ```yaml
    /// "This is a quoted string
    ///    with \"double quoted\" string within."
    /// ```
    DoubleQuote,
}

impl ScalarType {
    #[must_use]
    pub fn is_block(self) -> bool {
        matches!(self, ScalarType::Literal | ScalarType::Folded)
    }
}

impl Display for ScalarType {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            ScalarType::Plain => write!(f, ":"),
            ScalarType::Folded => write!(f, ">"),
            ScalarType::Literal => write!(f, "|"),
            ScalarType::SingleQuote => write!(f, "'"),
            ScalarType::DoubleQuote => write!(f, "\""),
        }
    }
}

#[derive(Debug, PartialEq, Eq, Clone, Copy)]
pub enum ChompIndicator {
    /// `-` final line break and any trailing empty lines are excluded from the scalar’s content
    Strip,
    ///  ` ` final line break character is preserved in the scalar’s content
    Clip,
    /// `+` final line break and any trailing empty lines are considered to be part of the scalar’s content
    Keep,
}

/// Encoding detected by the reader from the byte order mark.
#[derive(Debug, PartialEq, Eq, Clone, Copy, Default)]
pub enum Encoding {
    #[default]
    Utf8,
    Utf16Le,
    Utf16Be,
}

#[derive(Clone, PartialEq, Debug)]
pub enum TokenType<'input> {
    StreamStart,
    StreamEnd,
    DocumentStart,
    DocumentEnd,
    BlockSequenceStart,
    BlockMappingStart,
    BlockEnd,
    BlockEntry,
    FlowEntry,
    Key,
    Value,
    FlowSequenceStart,
    FlowSequenceEnd,
    FlowMappingStart,
    FlowMappingEnd,
    Alias(Cow<'input, str>),
    Anchor(Cow<'input, str>),
    VersionDirective {
        major: u8,
        minor: u8,
    },
    TagDirective {
        handle: Cow<'input, str>,
        prefix: Cow<'input, str>,
    },
    /// Any `%NAME` directive other than `%YAML` and `%TAG`.
    ReservedDirective {
        name: Cow<'input, str>,
    },
    /// Unresolved tag as written. An empty `handle` marks a verbatim tag or the
    /// non-specific `!` tag, in both cases `suffix` is used as is.
    Tag {
        handle: Cow<'input, str>,
        suffix: Cow<'input, str>,
    },
    Scalar {
        scalar_type: ScalarType,
        value: Cow<'input, str>,
    },
}

impl TokenType<'_> {
    /// Name of the token used in diagnostics.
    #[must_use]
    pub fn describe(&self) -> &'static str {
        match self {
            TokenType::StreamStart => "<stream start>",
            TokenType::StreamEnd => "<stream end>",
            TokenType::DocumentStart => "<document start>",
            TokenType::DocumentEnd => "<document end>",
            TokenType::BlockSequenceStart => "<block sequence start>",
            TokenType::BlockMappingStart => "<block mapping start>",
            TokenType::BlockEnd => "<block end>",
            TokenType::BlockEntry => "'-'",
            TokenType::FlowEntry => "','",
            TokenType::Key => "'?'",
            TokenType::Value => "':'",
            TokenType::FlowSequenceStart => "'['",
            TokenType::FlowSequenceEnd => "']'",
            TokenType::FlowMappingStart => "'{'",
            TokenType::FlowMappingEnd => "'}'",
            TokenType::Alias(_) => "<alias>",
            TokenType::Anchor(_) => "<anchor>",
            TokenType::VersionDirective { .. }
            | TokenType::TagDirective { .. }
            | TokenType::ReservedDirective { .. } => "<directive>",
            TokenType::Tag { .. } => "<tag>",
            TokenType::Scalar { .. } => "<scalar>",
        }
    }
}

#[derive(Clone, PartialEq, Debug)]
pub struct Token<'input> {
    pub span: Span,
    pub token_type: TokenType<'input>,
}

#[derive(Default, Debug, Clone, Copy, Eq, PartialEq, Hash)]
pub struct Marker {
    /// Index in characters of the decoded input.
    pub index: usize,
    /// Line of mark. One indexed.
    pub line: u32,
    /// Column of mark. One indexed.
    pub col: u32,
}

impl Marker {
    #[must_use]
    pub fn new(index: usize, line: u32, col: u32) -> Self {
        Marker { index, line, col }
    }

    /// Position of the first character of a stream.
    #[must_use]
    pub fn start() -> Self {
        Marker {
            index: 0,
            line: 1,
            col: 1,
        }
    }
}

impl Display for Marker {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "line {} column {}", self.line, self.col)
    }
}

#[derive(Clone, Copy, PartialEq, Debug, Eq, Default)]
pub struct Span {
    pub start: Marker,
    pub end: Marker,
}

impl Span {
    #[must_use]
    pub fn new(start: Marker, end: Marker) -> Self {
        Span { start, end }
    }

    #[must_use]
    pub fn empty(mark: Marker) -> Self {
        Span {
            start: mark,
            end: mark,
        }
    }
}

/// A resolved YAML tag.
///
/// After parsing, `handle` holds the prefix the tag handle expanded to, so the full
/// tag is always `handle` followed by `suffix`.
#[derive(Clone, PartialEq, Debug, Eq, Ord, PartialOrd, Hash)]
pub struct Tag {
    /// Resolved prefix of the tag.
    pub handle: String,
    /// The suffix of the tag.
    pub suffix: String,
}

impl Tag {
    pub fn new(handle: impl Into<String>, suffix: impl Into<String>) -> Self {
        Tag {
            handle: handle.into(),
            suffix: suffix.into(),
        }
    }

    /// Tag from a complete URI, e.g. `tag:yaml.org,2002:str`.
    pub fn from_uri(uri: impl Into<String>) -> Self {
        Tag {
            handle: String::new(),
            suffix: uri.into(),
        }
    }

    /// Returns whether the tag is a YAML tag from the core schema (`!!str`, `!!int`, ...).
    ///
    /// # Return
    /// Returns `true` if the handle is `tag:yaml.org,2002:`, `false` otherwise.
    #[must_use]
    pub fn is_yaml_core_schema(&self) -> bool {
        self.handle == "tag:yaml.org,2002:"
    }

    /// Returns whether this is the non-specific `!` tag.
    #[must_use]
    pub fn is_non_specific(&self) -> bool {
        self.len() == 1 && (self.handle == "!" || self.suffix == "!")
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.handle.len() + self.suffix.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl Display for Tag {
    fn fmt(&self, f: &mut Formatter<'_>) -> core::fmt::Result {
        write!(f, "{}{}", self.handle, self.suffix)
    }
}
