use crate::Marker;
use std::fmt;
use thiserror::Error;

/// A specialized `Result` type where the error is hard-wired to [`YamlError`].
pub type YamlResult<T> = Result<T, YamlError>;
pub type ScanResult = Result<(), ScanError>;

/// Any error the engine can produce, tagged by the component that raised it.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum YamlError {
    #[error(transparent)]
    Reader(#[from] ReaderError),
    #[error(transparent)]
    Scanner(#[from] ScanError),
    #[error(transparent)]
    Parser(#[from] ParseError),
    #[error(transparent)]
    Composer(#[from] ComposeError),
    #[error(transparent)]
    Emitter(#[from] EmitError),
}

impl YamlError {
    /// Position of the error in the input, if the error has one.
    #[must_use]
    pub fn mark(&self) -> Option<Marker> {
        match self {
            YamlError::Reader(err) => Some(Marker::new(err.index, err.line, err.col)),
            YamlError::Scanner(err) => Some(err.mark),
            YamlError::Parser(err) => Some(err.mark),
            YamlError::Composer(err) => Some(err.mark),
            YamlError::Emitter(_) => None,
        }
    }
}

/// Input could not be decoded or contains a character YAML does not allow.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("{kind} at line {line} column {col} (index {index})")]
pub struct ReaderError {
    pub index: usize,
    pub line: u32,
    pub col: u32,
    pub kind: ReaderErrorKind,
}

#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReaderErrorKind {
    #[error("invalid UTF-8 byte #x{0:02X}")]
    InvalidUtf8(u8),
    #[error("invalid UTF-16 code unit #x{0:04X}")]
    InvalidUtf16(u16),
    #[error("incomplete UTF-16 code unit at end of input")]
    TruncatedUtf16,
    #[error("special characters are not allowed, found #x{0:X}")]
    NonPrintable(u32),
}

/// Malformed token.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("{info} at {mark}")]
pub struct ScanError {
    pub mark: Marker,
    pub info: String,
    /// Offending source line with a caret under the error column.
    pub snippet: Option<String>,
}

impl ScanError {
    #[must_use]
    pub fn new(mark: Marker, info: String) -> Self {
        ScanError {
            mark,
            info,
            snippet: None,
        }
    }

    #[must_use]
    pub fn new_str(mark: Marker, info: &str) -> Self {
        ScanError::new(mark, info.to_string())
    }

    #[must_use]
    pub fn with_snippet(mut self, snippet: Option<String>) -> Self {
        self.snippet = snippet;
        self
    }
}

/// Grammar violation detected by the parser.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("{context}: {problem} at {mark}")]
pub struct ParseError {
    pub mark: Marker,
    pub context: &'static str,
    pub problem: String,
    /// What the parser expected, if the error is a token mismatch.
    pub expected: Option<&'static str>,
    /// Description of the token found instead.
    pub found: Option<&'static str>,
}

impl ParseError {
    #[must_use]
    pub fn new(mark: Marker, context: &'static str, problem: String) -> Self {
        ParseError {
            mark,
            context,
            problem,
            expected: None,
            found: None,
        }
    }

    #[must_use]
    pub fn unexpected(
        mark: Marker,
        context: &'static str,
        expected: &'static str,
        found: &'static str,
    ) -> Self {
        ParseError {
            mark,
            context,
            problem: format!("expected {expected}, but found {found}"),
            expected: Some(expected),
            found: Some(found),
        }
    }
}

/// Raised while building a node graph from events.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("while composing a node: {info} at {mark}")]
pub struct ComposeError {
    pub mark: Marker,
    pub info: String,
}

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum EmitError {
    /// Event does not fit the current emitter state.
    #[error("{info}, but got {event}")]
    InvalidEvent { info: String, event: String },
    /// Value can not be written in YAML.
    #[error("{0}")]
    Unrepresentable(String),
    #[error("invalid emitter options: {0}")]
    Options(String),
    /// Emitter failed earlier and refuses further events.
    #[error("emitter is in a failed state")]
    Poisoned,
    #[error("failed to write output")]
    Write(#[from] fmt::Error),
}
