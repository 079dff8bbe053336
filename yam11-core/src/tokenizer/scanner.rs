use crate::tokenizer::char_utils::{
    is_alpha, is_blank_or_breakz, is_break, is_tag_char, is_uri_char,
};
use crate::tokenizer::source::Source;
use alloc::borrow::Cow;
use alloc::collections::VecDeque;
use alloc::format;
use alloc::string::String;
use alloc::vec::Vec;
use tracing::trace;
use yam11_common::TokenType::{
    BlockEnd, FlowMappingEnd, FlowMappingStart, FlowSequenceEnd, FlowSequenceStart, StreamEnd,
};
use yam11_common::{
    ChompIndicator, Marker, ScalarType, ScanError, ScanResult, Span, Token, TokenType, YamlError,
    YamlResult,
};

#[derive(Copy, Clone, Debug, Eq, PartialEq)]
pub enum SkipTabs {
    Yes,
    No,
    Result { any_tabs: bool, has_yaml_ws: bool },
}

impl SkipTabs {
    #[must_use]
    pub fn found_tabs(&self) -> bool {
        matches!(self, SkipTabs::Result { any_tabs: true, .. })
    }
}

/// A scalar that may turn out to be a mapping key once a `:` is found.
#[derive(Clone, Debug, PartialEq, Eq)]
struct SimpleKey {
    possible: bool,
    required: bool,
    token_number: usize,
    mark: Marker,
}

impl SimpleKey {
    fn new(mark: Marker) -> SimpleKey {
        SimpleKey {
            possible: false,
            required: false,
            token_number: 0,
            mark,
        }
    }
}

/// Simple keys may not span more characters than this.
const SIMPLE_KEY_LIMIT: usize = 1024;

/// Turns decoded characters into YAML tokens.
///
/// Tokens are pulled one at a time with [`Scanner::next_token`]. The scanner keeps a
/// queue of tokens it has already produced, because a scalar followed by `:` only
/// becomes a key (and possibly a block mapping start) after the fact.
pub struct Scanner<'input, S> {
    src: S,
    tokens: VecDeque<Token<'input>>,
    error: Option<YamlError>,
    /// Raised once the tokens queued before it have been handed out.
    deferred_error: Option<ScanError>,

    /// One slot per flow level, the bottom one is the block context.
    simple_keys: Vec<SimpleKey>,
    indents: Vec<u32>,
    stream_start_produced: bool,
    stream_end_fetched: bool,
    stream_end_produced: bool,
    simple_key_allowed: bool,
    leading_whitespace: bool,

    /// Token count right after the last `Value` token was queued.
    last_value_at: usize,
    tokens_parsed: usize,
    flow_level: u32,
    /// Column of the innermost block collection, 0 outside of any.
    indent: u32,

    buf_trailing_breaks: String,
    buf_whitespaces: String,
}

impl<'input, S: Source> Scanner<'input, S> {
    pub fn new(src: S) -> Scanner<'input, S> {
        Scanner {
            src,
            tokens: VecDeque::new(),
            error: None,
            deferred_error: None,
            simple_keys: Vec::new(),
            indents: Vec::new(),

            stream_start_produced: false,
            stream_end_fetched: false,
            stream_end_produced: false,
            simple_key_allowed: true,
            leading_whitespace: true,

            last_value_at: 0,
            tokens_parsed: 0,
            flow_level: 0,
            indent: 0,

            buf_trailing_breaks: String::new(),
            buf_whitespaces: String::new(),
        }
    }

    /// Position of the next unread character.
    #[must_use]
    pub fn mark(&self) -> Marker {
        self.src.mark()
    }

    /// The error that stopped the scanner, if any.
    #[must_use]
    pub fn get_error(&self) -> Option<&YamlError> {
        self.error.as_ref()
    }

    #[must_use]
    pub fn stream_ended(&self) -> bool {
        self.stream_end_produced
    }

    fn get_span(&self, start: Marker) -> Span {
        Span::new(start, self.mark())
    }

    /// 0-indexed column of the next character.
    fn column(&self) -> u32 {
        self.mark().col - 1
    }

    fn error_at(&mut self, mark: Marker, info: &str) -> ScanError {
        ScanError::new_str(mark, info).with_snippet(self.src.snippet())
    }

    /// Returns the next token.
    ///
    /// # Errors
    /// Returns a [`YamlError::Reader`] when the input could not be decoded, or a
    /// [`YamlError::Scanner`] for malformed input. Once an error is returned, the same
    /// error is returned by every following call.
    pub fn next_token(&mut self) -> YamlResult<Token<'input>> {
        if let Some(err) = &self.error {
            return Err(err.clone());
        }
        if self.stream_end_produced {
            return Ok(Token {
                span: Span::empty(self.mark()),
                token_type: StreamEnd,
            });
        }

        if let Err(err) = self.fetch_more_tokens() {
            return Err(self.fail(err.into()));
        }
        if let Some(err) = self.src.error() {
            let err = YamlError::Reader(err.clone());
            self.error = Some(err.clone());
            return Err(err);
        }

        match self.tokens.pop_front() {
            Some(tok) => {
                self.tokens_parsed += 1;
                if tok.token_type == StreamEnd {
                    self.stream_end_produced = true;
                }
                trace!("Token {:?} at {:?}", tok.token_type, tok.span);
                Ok(tok)
            }
            None => {
                let err = match self.deferred_error.take() {
                    Some(err) => err,
                    None => {
                        let mark = self.mark();
                        self.error_at(mark, "did not find expected token")
                    }
                };
                Err(self.fail(err.into()))
            }
        }
    }

    /// Stores the error, preferring a decoding failure over whatever the scanner made
    /// of the truncated input.
    fn fail(&mut self, err: YamlError) -> YamlError {
        let err = match self.src.error() {
            Some(reader_err) => YamlError::Reader(reader_err.clone()),
            None => err,
        };
        self.error = Some(err.clone());
        err
    }

    fn fetch_more_tokens(&mut self) -> ScanResult {
        loop {
            let need_more = if self.stream_end_fetched {
                false
            } else if self.tokens.is_empty() {
                true
            } else {
                self.stale_simple_keys()?;
                self.simple_keys
                    .iter()
                    .any(|sk| sk.possible && sk.token_number == self.tokens_parsed)
            };

            if !need_more {
                break;
            }

            self.fetch_next_token()?;
        }
        Ok(())
    }

    fn process_start(&mut self) -> Option<ScanResult> {
        if self.src.next_char_is('%') {
            Some(self.fetch_directive())
        } else if self.src.next_is_three('-') && is_blank_or_breakz(self.src.peek_nth(3)) {
            Some(self.fetch_document_indicator(TokenType::DocumentStart))
        } else if self.src.next_is_three('.') && is_blank_or_breakz(self.src.peek_nth(3)) {
            Some(self.fetch_document_indicator(TokenType::DocumentEnd))
        } else {
            None
        }
    }

    fn fetch_next_token(&mut self) -> ScanResult {
        if !self.stream_start_produced {
            self.fetch_stream_start();
            return Ok(());
        }

        self.skip_to_next_token()?;
        self.stale_simple_keys()?;

        let mark = self.mark();
        self.unroll_indent(mark.col);

        if self.src.next_is_z() {
            return self.fetch_stream_end();
        }

        if mark.col == 1 {
            if let Some(res) = self.process_start() {
                return res;
            }
        }

        self.fetch_main_loop()
    }

    fn fetch_stream_start(&mut self) {
        let mark = self.mark();
        self.indent = 0;
        self.stream_start_produced = true;
        self.simple_key_allowed = true;
        self.tokens.push_back(Token {
            span: Span::empty(mark),
            token_type: TokenType::StreamStart,
        });
        self.simple_keys.push(SimpleKey::new(mark));
    }

    fn fetch_stream_end(&mut self) -> ScanResult {
        if self.flow_level > 0 && self.src.error().is_none() {
            let mark = self.mark();
            let err = self.error_at(
                mark,
                "while scanning a flow collection, found unexpected end of stream",
            );
            for sk in &mut self.simple_keys {
                sk.possible = false;
            }
            self.stream_end_fetched = true;
            self.deferred_error = Some(err);
            return Ok(());
        }

        // No more context is coming, a key still waiting for its ':' is an error.
        for i in 0..self.simple_keys.len() {
            let sk = &mut self.simple_keys[i];
            if sk.possible && sk.required {
                let mark = sk.mark;
                return Err(self.error_at(mark, "could not find expected ':'"));
            }
            sk.possible = false;
        }

        self.unroll_indent(0);
        self.simple_key_allowed = false;
        self.stream_end_fetched = true;

        let span = Span::empty(self.mark());
        self.tokens.push_back(Token {
            span,
            token_type: StreamEnd,
        });
        Ok(())
    }

    fn fetch_document_indicator(&mut self, token_type: TokenType<'input>) -> ScanResult {
        self.unroll_indent(0);
        self.remove_simple_key()?;
        self.simple_key_allowed = false;

        let mark = self.mark();
        self.skip_n_non_blank(3);

        let span = self.get_span(mark);
        self.tokens.push_back(Token { span, token_type });
        Ok(())
    }

    fn fetch_main_loop(&mut self) -> ScanResult {
        let in_flow = self.flow_level > 0;
        match self.src.peek_two() {
            ['[', _] => self.fetch_flow_collection_start(FlowSequenceStart),
            ['{', _] => self.fetch_flow_collection_start(FlowMappingStart),
            [']', _] => self.fetch_flow_collection_end(FlowSequenceEnd),
            ['}', _] => self.fetch_flow_collection_end(FlowMappingEnd),
            [',', _] => self.fetch_flow_entry(),
            ['-', x] if is_blank_or_breakz(x) => self.fetch_block_entry(),
            ['?', x] if in_flow || is_blank_or_breakz(x) => self.fetch_key(),
            [':', x] if in_flow || is_blank_or_breakz(x) => self.fetch_value(),
            ['*', _] => self.fetch_anchor(true),
            ['&', _] => self.fetch_anchor(false),
            ['!', _] => self.fetch_tag(),
            ['|', _] if !in_flow => self.fetch_block_scalar(true),
            ['>', _] if !in_flow => self.fetch_block_scalar(false),
            ['\'', _] => self.fetch_flow_scalar(true),
            ['"', _] => self.fetch_flow_scalar(false),
            ['-', _] => self.fetch_plain_scalar(),
            ['?' | ':', _] if !in_flow => self.fetch_plain_scalar(),
            [c, _]
                if is_blank_or_breakz(c)
                    || matches!(
                        c,
                        '?' | ':' | '#' | '|' | '>' | '%' | '@' | '`'
                    ) =>
            {
                let mark = self.mark();
                Err(self.error_at(
                    mark,
                    &format!(
                        "while scanning for the next token, found character {c:?} that cannot start any token"
                    ),
                ))
            }
            _ => self.fetch_plain_scalar(),
        }
    }

    fn fetch_flow_collection_start(&mut self, token_type: TokenType<'input>) -> ScanResult {
        self.save_simple_key();
        self.increase_flow_level()?;

        self.simple_key_allowed = true;

        let start_mark = self.mark();
        self.skip_non_blank();

        let span = self.get_span(start_mark);
        self.tokens.push_back(Token { span, token_type });
        Ok(())
    }

    fn fetch_flow_collection_end(&mut self, token_type: TokenType<'input>) -> ScanResult {
        self.remove_simple_key()?;
        self.decrease_flow_level();

        self.simple_key_allowed = false;

        let start_mark = self.mark();
        self.skip_non_blank();

        let span = self.get_span(start_mark);
        self.tokens.push_back(Token { span, token_type });
        Ok(())
    }

    fn fetch_flow_entry(&mut self) -> ScanResult {
        self.remove_simple_key()?;
        self.simple_key_allowed = true;

        let start_mark = self.mark();
        self.skip_non_blank();

        let span = self.get_span(start_mark);
        self.tokens.push_back(Token {
            token_type: TokenType::FlowEntry,
            span,
        });
        Ok(())
    }

    fn fetch_block_entry(&mut self) -> ScanResult {
        let mark = self.mark();
        if self.flow_level > 0 {
            return Err(self.error_at(mark, r#""-" is only valid inside a block"#));
        }
        // Check if we are allowed to start a new entry.
        if !self.simple_key_allowed {
            return Err(self.error_at(
                mark,
                "block sequence entries are not allowed in this context",
            ));
        }

        self.roll_indent(mark.col, None, TokenType::BlockSequenceStart, mark);
        self.simple_key_allowed = true;
        self.remove_simple_key()?;

        // Skip over the `-`.
        self.skip_non_blank();

        let span = self.get_span(mark);
        self.tokens.push_back(Token {
            span,
            token_type: TokenType::BlockEntry,
        });
        Ok(())
    }

    fn fetch_key(&mut self) -> ScanResult {
        let start_mark = self.mark();
        if self.flow_level == 0 {
            // Check if we are allowed to start a new key (not necessarily simple).
            if !self.simple_key_allowed {
                return Err(self.error_at(
                    start_mark,
                    "mapping keys are not allowed in this context",
                ));
            }
            self.roll_indent(
                start_mark.col,
                None,
                TokenType::BlockMappingStart,
                start_mark,
            );
        }

        self.simple_key_allowed = self.flow_level == 0;
        self.remove_simple_key()?;

        self.skip_non_blank();
        let span = self.get_span(start_mark);
        self.tokens.push_back(Token {
            span,
            token_type: TokenType::Key,
        });
        Ok(())
    }

    fn fetch_value(&mut self) -> ScanResult {
        let start_mark = self.mark();
        let level = self.simple_keys.len() - 1;
        let sk = self.simple_keys[level].clone();

        if sk.possible {
            // The scalar before ':' was a key after all.
            let pos = sk.token_number - self.tokens_parsed;
            self.insert_token(
                pos,
                Token {
                    span: Span::empty(sk.mark),
                    token_type: TokenType::Key,
                },
            );
            self.roll_indent(
                sk.mark.col,
                Some(sk.token_number),
                TokenType::BlockMappingStart,
                sk.mark,
            );

            self.simple_keys[level].possible = false;
            self.simple_key_allowed = false;
        } else {
            // The ':' indicator follows a complex key.
            if self.flow_level == 0 {
                if !self.simple_key_allowed {
                    // `a: : b`, the value indicator right after another one is left to
                    // the parser to reject.
                    if self.last_value_at != self.tokens_parsed + self.tokens.len() {
                        return Err(self.error_at(
                            start_mark,
                            "mapping values are not allowed in this context",
                        ));
                    }
                } else {
                    self.roll_indent(
                        start_mark.col,
                        None,
                        TokenType::BlockMappingStart,
                        start_mark,
                    );
                }
            }

            self.simple_key_allowed = self.flow_level == 0 && self.simple_key_allowed;
            self.remove_simple_key()?;
        }

        // Skip over ':'.
        self.skip_non_blank();
        self.tokens.push_back(Token {
            span: self.get_span(start_mark),
            token_type: TokenType::Value,
        });
        self.last_value_at = self.tokens_parsed + self.tokens.len();
        Ok(())
    }

    fn fetch_anchor(&mut self, is_alias: bool) -> ScanResult {
        self.save_simple_key();
        self.simple_key_allowed = false;

        let tok = self.scan_anchor(is_alias)?;
        self.tokens.push_back(tok);
        Ok(())
    }

    fn fetch_tag(&mut self) -> ScanResult {
        self.save_simple_key();
        self.simple_key_allowed = false;

        let tok = self.scan_tag()?;
        self.tokens.push_back(tok);
        Ok(())
    }

    fn fetch_block_scalar(&mut self, is_literal: bool) -> ScanResult {
        self.simple_key_allowed = true;
        self.remove_simple_key()?;

        let tok = self.scan_block_scalar(is_literal)?;
        self.tokens.push_back(tok);
        Ok(())
    }

    fn fetch_flow_scalar(&mut self, single: bool) -> ScanResult {
        self.save_simple_key();
        self.simple_key_allowed = false;

        let tok = self.scan_flow_scalar(single)?;
        self.tokens.push_back(tok);
        Ok(())
    }

    fn fetch_plain_scalar(&mut self) -> ScanResult {
        self.save_simple_key();
        self.simple_key_allowed = false;

        let tok = self.scan_plain_scalar()?;
        self.tokens.push_back(tok);
        Ok(())
    }

    fn fetch_directive(&mut self) -> ScanResult {
        self.unroll_indent(0);
        self.remove_simple_key()?;

        self.simple_key_allowed = false;

        let tok = self.scan_directive()?;
        self.tokens.push_back(tok);
        Ok(())
    }

    fn skip_n_non_blank(&mut self, count: usize) {
        self.src.skip(count);
        self.leading_whitespace = false;
    }

    fn skip_ws_to_eol(&mut self, skip_tabs: SkipTabs) -> Result<SkipTabs, ScanError> {
        match self.src.skip_ws_to_eol(skip_tabs) {
            Ok(res) => Ok(res),
            Err(message) => {
                let mark = self.mark();
                Err(self.error_at(mark, message))
            }
        }
    }

    /// Consumes one line break, `\r\n` counts as one. Returns the break normalized to
    /// `\n`, except for the Unicode line and paragraph separators which are kept.
    fn read_line_break(&mut self) -> char {
        let brk = match self.src.peek_two() {
            ['\r', '\n'] => {
                self.src.skip(2);
                '\n'
            }
            ['\r' | '\n' | '\u{85}', _] => {
                self.src.skip(1);
                '\n'
            }
            [c @ ('\u{2028}' | '\u{2029}'), _] => {
                self.src.skip(1);
                c
            }
            _ => return '\0',
        };
        self.leading_whitespace = true;
        brk
    }

    #[inline]
    fn read_break(&mut self, s: &mut String) {
        let brk = self.read_line_break();
        s.push(brk);
    }

    fn skip_blank(&mut self) {
        self.src.skip(1);
    }

    fn skip_non_blank(&mut self) {
        self.src.skip(1);
        self.leading_whitespace = false;
    }

    fn skip_to_next_token(&mut self) -> ScanResult {
        loop {
            match self.src.peek() {
                // Tabs may separate tokens, but they can never indent block content. A
                // line whose leading whitespace holds a tab must be empty.
                '\t' if self.flow_level == 0 && self.leading_whitespace => {
                    let mark = self.mark();
                    self.skip_ws_to_eol(SkipTabs::Yes)?;
                    if !self.src.next_is_breakz() {
                        return Err(self.error_at(
                            mark,
                            "while scanning for the next token, found a tab character that violates indentation",
                        ));
                    }
                }
                ' ' | '\t' => self.skip_blank(),
                c if is_break(c) => {
                    self.read_line_break();
                    if self.flow_level == 0 {
                        self.simple_key_allowed = true;
                    }
                }
                '#' => {
                    self.src.skip_while_non_breakz();
                }
                _ => break,
            }
        }
        Ok(())
    }

    fn scan_directive(&mut self) -> Result<Token<'input>, ScanError> {
        let start_mark = self.mark();
        self.skip_non_blank();

        let name = self.scan_directive_name()?;
        let token_type = match name.as_str() {
            "YAML" => self.scan_version_directive_value(start_mark)?,
            "TAG" => self.scan_tag_directive_value(start_mark)?,
            _ => {
                // Reserved directive, its parameters are ignored.
                self.src.skip_while_non_breakz();
                TokenType::ReservedDirective {
                    name: Cow::Owned(name),
                }
            }
        };
        let span = self.get_span(start_mark);

        self.skip_ws_to_eol(SkipTabs::Yes)?;

        if self.src.next_is_breakz() {
            self.read_line_break();
            Ok(Token { span, token_type })
        } else {
            Err(self.error_at(
                start_mark,
                "while scanning a directive, did not find expected comment or line break",
            ))
        }
    }

    fn scan_directive_name(&mut self) -> Result<String, ScanError> {
        let start_mark = self.mark();
        let mut string = String::new();

        self.src.fetch_while_is_alpha(&mut string);

        if string.is_empty() {
            return Err(self.error_at(
                start_mark,
                "while scanning a directive, could not find expected directive name",
            ));
        }

        if !self.src.next_is_blank_or_breakz() {
            return Err(self.error_at(
                start_mark,
                "while scanning a directive, found unexpected non-alphabetical character",
            ));
        }

        Ok(string)
    }

    fn scan_version_directive_value(
        &mut self,
        mark: Marker,
    ) -> Result<TokenType<'input>, ScanError> {
        self.src.skip_while_blank();

        let major = self.scan_version_directive_number(mark)?;

        if !self.src.next_char_is('.') {
            return Err(self.error_at(
                mark,
                "while scanning a YAML directive, did not find expected digit or '.' character",
            ));
        }
        self.skip_non_blank();

        let minor = self.scan_version_directive_number(mark)?;

        if !self.src.next_is_blank_or_breakz() {
            return Err(self.error_at(
                mark,
                "while scanning a YAML directive, did not find expected digit or ' ' character",
            ));
        }

        Ok(TokenType::VersionDirective { major, minor })
    }

    fn scan_version_directive_number(&mut self, mark: Marker) -> Result<u8, ScanError> {
        let mut val = 0u32;
        let mut length = 0usize;
        while let Some(digit) = self.src.peek().to_digit(10) {
            if length + 1 > 9 {
                return Err(self.error_at(
                    mark,
                    "while scanning a YAML directive, found extremely long version number",
                ));
            }
            length += 1;
            val = val * 10 + digit;
            self.skip_non_blank();
        }

        if length == 0 {
            return Err(self.error_at(
                mark,
                "while scanning a YAML directive, did not find expected version number",
            ));
        }

        u8::try_from(val).map_err(|_| {
            self.error_at(
                mark,
                "while scanning a YAML directive, found extremely long version number",
            )
        })
    }

    fn scan_tag_directive_value(&mut self, mark: Marker) -> Result<TokenType<'input>, ScanError> {
        self.src.skip_while_blank();

        let handle = self.scan_tag_handle(true, mark)?;

        if !self.src.next_is_blank() {
            return Err(self.error_at(
                mark,
                "while scanning a %TAG directive, did not find expected whitespace",
            ));
        }
        self.src.skip_while_blank();

        let prefix = self.scan_tag_prefix(mark)?;

        if self.src.next_is_blank_or_breakz() {
            Ok(TokenType::TagDirective {
                handle: Cow::Owned(handle),
                prefix: Cow::Owned(prefix),
            })
        } else {
            Err(self.error_at(
                mark,
                "while scanning a %TAG directive, did not find expected whitespace or line break",
            ))
        }
    }

    fn scan_plain_scalar(&mut self) -> Result<Token<'input>, ScanError> {
        let indent = self.indent + 1;
        let start_mark = self.mark();
        let mut end_mark = start_mark;
        let in_flow = self.flow_level > 0;

        let mut string = String::with_capacity(32);
        let mut spaces = String::new();

        loop {
            if self.src.next_char_is('#') {
                break;
            }

            let mut length = 0usize;
            while !self.src.next_is_blank_or_breakz() && self.src.next_can_be_plain_scalar(in_flow)
            {
                // Only a ':' followed by text is left here. YAML 1.1 does not allow it
                // inside a flow collection.
                if in_flow && self.src.next_char_is(':') {
                    let mark = self.mark();
                    return Err(
                        self.error_at(mark, "while scanning a plain scalar, found unexpected ':'")
                    );
                }
                if length == 0 {
                    string.push_str(&spaces);
                    spaces.clear();
                }
                string.push(self.src.peek());
                self.skip_non_blank();
                length += 1;
            }
            if length == 0 {
                break;
            }
            self.simple_key_allowed = false;
            end_mark = self.mark();

            // We may reach the end of a plain scalar if:
            //  - We reach eof
            //  - We reach ": "
            //  - We find a flow character in a flow context
            //  - A continuation line is not indented enough
            if !self.scan_plain_spaces(&mut spaces)?
                || self.src.next_char_is('#')
                || (!in_flow && self.mark().col < indent)
            {
                break;
            }
        }

        if string.is_empty() {
            // A plain scalar must consume at least one character, or the scanner would
            // never advance.
            return Err(self.error_at(start_mark, "unexpected end of plain scalar"));
        }

        Ok(Token {
            span: Span::new(start_mark, end_mark),
            token_type: TokenType::Scalar {
                scalar_type: ScalarType::Plain,
                value: Cow::Owned(string),
            },
        })
    }

    /// Scans the whitespace after a chunk of a plain scalar and appends it, folded, to
    /// `spaces`. Returns `false` when the scalar can not continue.
    fn scan_plain_spaces(&mut self, spaces: &mut String) -> Result<bool, ScanError> {
        self.buf_whitespaces.clear();
        while self.src.next_is_blank() {
            self.buf_whitespaces.push(self.src.peek());
            self.skip_blank();
        }

        if !self.src.next_is_break() {
            spaces.push_str(&self.buf_whitespaces);
            return Ok(!self.buf_whitespaces.is_empty());
        }

        let line_break = self.read_line_break();
        self.simple_key_allowed = true;
        if self.src.next_is_document_indicator() {
            return Ok(false);
        }

        self.buf_trailing_breaks.clear();
        loop {
            match self.src.peek() {
                ' ' => self.skip_blank(),
                '\t' if self.flow_level > 0 => self.skip_blank(),
                '\t' => {
                    // Only a blank line may hold a tab before its content.
                    let mark = self.mark();
                    self.src.skip_while_blank();
                    if !self.src.next_is_breakz() && !self.src.next_char_is('#') {
                        return Err(self.error_at(
                            mark,
                            "while scanning a plain scalar, found a tab character that violates indentation",
                        ));
                    }
                }
                c if is_break(c) => {
                    let brk = self.read_line_break();
                    self.buf_trailing_breaks.push(brk);
                    if self.src.next_is_document_indicator() {
                        return Ok(false);
                    }
                }
                _ => break,
            }
        }

        if line_break != '\n' {
            spaces.push(line_break);
        } else if self.buf_trailing_breaks.is_empty() {
            spaces.push(' ');
        }
        spaces.push_str(&self.buf_trailing_breaks);
        Ok(true)
    }

    fn scan_flow_scalar(&mut self, single: bool) -> Result<Token<'input>, ScanError> {
        let start_mark = self.mark();

        let mut string = String::new();
        let mut leading_break = String::new();
        let mut trailing_breaks = String::new();
        let mut whitespaces = String::new();
        let mut leading_blanks;

        // Eat the left quote.
        self.skip_non_blank();

        loop {
            if self.mark().col == 1 && self.src.next_is_document_indicator() {
                return Err(self.error_at(
                    start_mark,
                    "while scanning a quoted scalar, found unexpected document indicator",
                ));
            }

            if self.src.next_is_z() {
                return Err(self.error_at(
                    start_mark,
                    "while scanning a quoted scalar, found unexpected end of stream",
                ));
            }

            leading_blanks = false;
            self.consume_flow_scalar_non_whitespace_chars(
                single,
                &mut string,
                &mut leading_blanks,
                start_mark,
            )?;

            match self.src.peek() {
                '\'' if single => break,
                '"' if !single => break,
                _ => {}
            }

            // Consume blank characters.
            while self.src.next_is_blank() || self.src.next_is_break() {
                if self.src.next_is_blank() {
                    if leading_blanks {
                        self.skip_blank();
                    } else {
                        whitespaces.push(self.src.peek());
                        self.skip_blank();
                    }
                } else if leading_blanks {
                    self.read_break(&mut trailing_breaks);
                } else {
                    whitespaces.clear();
                    self.read_break(&mut leading_break);
                    leading_blanks = true;
                }
            }

            // Join the whitespaces or fold line breaks.
            if leading_blanks {
                if leading_break == "\n" {
                    if trailing_breaks.is_empty() {
                        string.push(' ');
                    } else {
                        string.push_str(&trailing_breaks);
                    }
                } else {
                    // Escaped line break or a Unicode separator, both kept as is.
                    string.push_str(&leading_break);
                    string.push_str(&trailing_breaks);
                }
                trailing_breaks.clear();
                leading_break.clear();
            } else {
                string.push_str(&whitespaces);
                whitespaces.clear();
            }
        }

        // Eat the right quote.
        self.skip_non_blank();

        let scalar_type = if single {
            ScalarType::SingleQuote
        } else {
            ScalarType::DoubleQuote
        };
        Ok(Token {
            span: self.get_span(start_mark),
            token_type: TokenType::Scalar {
                scalar_type,
                value: Cow::Owned(string),
            },
        })
    }

    fn consume_flow_scalar_non_whitespace_chars(
        &mut self,
        single: bool,
        string: &mut String,
        leading_blanks: &mut bool,
        start_mark: Marker,
    ) -> ScanResult {
        while !self.src.next_is_blank_or_breakz() {
            match self.src.peek() {
                // Check for an escaped single quote.
                '\'' if single && self.src.nth_char_is(1, '\'') => {
                    string.push('\'');
                    self.skip_n_non_blank(2);
                }
                // Check for the right quote.
                '\'' if single => break,
                '"' if !single => break,
                // Check for an escaped line break.
                '\\' if !single && is_break(self.src.peek_nth(1)) => {
                    self.skip_non_blank();
                    self.read_line_break();
                    *leading_blanks = true;
                    break;
                }
                // Check for an escape sequence.
                '\\' if !single => {
                    let chr = self.resolve_flow_scalar_escape_sequence(start_mark)?;
                    string.push(chr);
                }
                c => {
                    string.push(c);
                    self.skip_non_blank();
                }
            }
        }
        Ok(())
    }

    /// Escape the sequence we encounter in a flow scalar.
    ///
    /// `self.src.peek()` must point to the `\` starting the escape sequence.
    ///
    /// # Errors
    /// Return an error if an invalid escape sequence is found.
    fn resolve_flow_scalar_escape_sequence(
        &mut self,
        start_mark: Marker,
    ) -> Result<char, ScanError> {
        let mut code_length = 0usize;
        let mut ret = '\0';

        match self.src.peek_nth(1) {
            '0' => ret = '\0',
            'a' => ret = '\x07',
            'b' => ret = '\x08',
            't' | '\t' => ret = '\t',
            'n' => ret = '\n',
            'v' => ret = '\x0b',
            'f' => ret = '\x0c',
            'r' => ret = '\x0d',
            'e' => ret = '\x1b',
            ' ' => ret = '\x20',
            '"' => ret = '"',
            '/' => ret = '/',
            '\\' => ret = '\\',
            // Unicode next line (#x85)
            'N' => ret = '\u{85}',
            // Unicode non-breaking space (#xA0)
            '_' => ret = '\u{A0}',
            // Unicode line separator (#x2028)
            'L' => ret = '\u{2028}',
            // Unicode paragraph separator (#x2029)
            'P' => ret = '\u{2029}',
            'x' => code_length = 2,
            'u' => code_length = 4,
            'U' => code_length = 8,
            c => {
                return Err(self.error_at(
                    start_mark,
                    &format!(
                        "while parsing a quoted scalar, found unknown escape character {c:?}"
                    ),
                ));
            }
        }
        self.skip_n_non_blank(2);

        // Consume an arbitrary escape code.
        if code_length > 0 {
            let mut value = 0u32;
            for i in 0..code_length {
                let Some(digit) = self.src.peek_nth(i).to_digit(16) else {
                    return Err(self.error_at(
                        start_mark,
                        &format!(
                            "while parsing a quoted scalar, expected escape sequence of {code_length} hexadecimal numbers"
                        ),
                    ));
                };
                value = (value << 4) + digit;
            }

            let Some(ch) = char::from_u32(value) else {
                return Err(self.error_at(
                    start_mark,
                    "while parsing a quoted scalar, found invalid Unicode character escape code",
                ));
            };
            ret = ch;

            self.skip_n_non_blank(code_length);
        }
        Ok(ret)
    }

    fn scan_block_scalar(&mut self, literal: bool) -> Result<Token<'input>, ScanError> {
        let start_mark = self.mark();
        let mut chomping = ChompIndicator::Clip;
        let mut increment: u32 = 0;
        let scalar_type = if literal {
            ScalarType::Literal
        } else {
            ScalarType::Folded
        };

        // skip '|' or '>'
        self.skip_non_blank();

        let mut indicator = self.src.peek();
        if indicator == '+' || indicator == '-' {
            chomping = if indicator == '+' {
                ChompIndicator::Keep
            } else {
                ChompIndicator::Strip
            };
            self.skip_non_blank();
            indicator = self.src.peek();
            if let Some(digit) = indicator.to_digit(10) {
                increment = self.block_indentation_indicator(digit, start_mark)?;
            }
        } else if let Some(digit) = indicator.to_digit(10) {
            increment = self.block_indentation_indicator(digit, start_mark)?;
            indicator = self.src.peek();
            if indicator == '+' || indicator == '-' {
                chomping = if indicator == '+' {
                    ChompIndicator::Keep
                } else {
                    ChompIndicator::Strip
                };
                self.skip_non_blank();
            }
        }

        if !self.src.next_is_blank_or_breakz() {
            return Err(self.error_at(
                start_mark,
                "while scanning a block scalar, expected chomping or indentation indicators",
            ));
        }

        self.skip_ws_to_eol(SkipTabs::Yes)?;

        // Check if we are at the end of the line.
        if !self.src.next_is_breakz() {
            return Err(self.error_at(
                start_mark,
                "while scanning a block scalar, did not find expected comment or line break",
            ));
        }
        self.read_line_break();

        let mut string = String::new();
        let mut breaks = String::new();
        let mut end_mark = self.mark();

        let min_indent = self.indent.max(1);
        let indent = if increment == 0 {
            let max_indent = self.skip_block_scalar_first_line_indent(&mut breaks, &mut end_mark);
            min_indent.max(max_indent)
        } else {
            let indent = min_indent + increment - 1;
            self.skip_block_scalar_indent(indent, &mut breaks, &mut end_mark);
            indent
        };

        let mut line_break = '\0';
        while self.column() == indent && !self.src.next_is_z() {
            string.push_str(&breaks);
            let leading_non_space = !self.src.next_is_blank();

            self.src.push_non_breakz_chr(&mut string);
            self.leading_whitespace = false;

            line_break = self.read_line_break();
            breaks.clear();
            self.skip_block_scalar_indent(indent, &mut breaks, &mut end_mark);

            if self.column() == indent && !self.src.next_is_z() {
                if !literal
                    && line_break == '\n'
                    && leading_non_space
                    && !self.src.next_is_blank()
                {
                    if breaks.is_empty() {
                        string.push(' ');
                    }
                } else {
                    string.push(line_break);
                }
            } else {
                break;
            }
        }

        // Chomp the tail.
        if chomping != ChompIndicator::Strip && line_break != '\0' {
            string.push(line_break);
        }
        if chomping == ChompIndicator::Keep {
            string.push_str(&breaks);
        }

        Ok(Token {
            span: Span::new(start_mark, end_mark),
            token_type: TokenType::Scalar {
                scalar_type,
                value: Cow::Owned(string),
            },
        })
    }

    fn block_indentation_indicator(
        &mut self,
        digit: u32,
        start_mark: Marker,
    ) -> Result<u32, ScanError> {
        if digit == 0 {
            return Err(self.error_at(
                start_mark,
                "while scanning a block scalar, found an indentation indicator equal to 0",
            ));
        }
        self.skip_non_blank();
        Ok(digit)
    }

    /// Skips the empty lines before the first content line and returns the deepest
    /// indentation seen on the way.
    fn skip_block_scalar_first_line_indent(
        &mut self,
        breaks: &mut String,
        end_mark: &mut Marker,
    ) -> u32 {
        let mut max_indent = 0;
        loop {
            match self.src.peek() {
                ' ' => {
                    self.skip_blank();
                    max_indent = max_indent.max(self.column());
                }
                c if is_break(c) => {
                    self.read_break(breaks);
                    *end_mark = self.mark();
                }
                _ => break,
            }
        }
        max_indent
    }

    /// Skip the block scalar indentation and empty lines.
    fn skip_block_scalar_indent(&mut self, indent: u32, breaks: &mut String, end_mark: &mut Marker) {
        loop {
            // Tabs can not be used as indentation.
            while self.column() < indent && self.src.next_char_is(' ') {
                self.skip_blank();
            }

            if self.src.next_is_break() {
                self.read_break(breaks);
                *end_mark = self.mark();
            } else {
                break;
            }
        }
    }

    fn scan_anchor(&mut self, alias: bool) -> Result<Token<'input>, ScanError> {
        let mut string = String::new();
        let start_mark = self.mark();

        self.skip_non_blank();
        while is_alpha(self.src.peek()) {
            string.push(self.src.peek());
            self.skip_non_blank();
        }

        let next = self.src.peek();
        let terminated = is_blank_or_breakz(next)
            || matches!(next, '?' | ':' | ',' | ']' | '}' | '%' | '@' | '`');
        if string.is_empty() || !terminated {
            let context = if alias { "an alias" } else { "an anchor" };
            return Err(self.error_at(
                start_mark,
                &format!(
                    "while scanning {context}, did not find expected alphabetic or numeric character"
                ),
            ));
        }

        let tok = if alias {
            TokenType::Alias(Cow::Owned(string))
        } else {
            TokenType::Anchor(Cow::Owned(string))
        };
        Ok(Token {
            span: self.get_span(start_mark),
            token_type: tok,
        })
    }

    fn scan_tag(&mut self) -> Result<Token<'input>, ScanError> {
        let start_mark = self.mark();
        let mut handle;
        let mut suffix;

        if self.src.nth_char_is(1, '<') {
            handle = String::new();
            suffix = self.scan_verbatim_tag(start_mark)?;
        } else {
            // The tag has either the '!suffix' or the '!handle!suffix'
            handle = self.scan_tag_handle(false, start_mark)?;
            // Check if it is, indeed, handle.
            if handle.len() >= 2 && handle.starts_with('!') && handle.ends_with('!') {
                suffix = self.scan_tag_shorthand_suffix("", start_mark)?;
            } else {
                suffix = self.scan_tag_shorthand_suffix(&handle, start_mark)?;

                handle = String::from("!");
                // A special case: the '!' tag.  Set the handle to '' and the
                // suffix to '!'.
                if suffix.is_empty() {
                    handle.clear();
                    suffix.push('!');
                }
            }
        }

        if self.src.next_is_blank_or_breakz() || (self.flow_level > 0 && self.src.next_is_flow())
        {
            Ok(Token {
                span: self.get_span(start_mark),
                token_type: TokenType::Tag {
                    handle: Cow::Owned(handle),
                    suffix: Cow::Owned(suffix),
                },
            })
        } else {
            Err(self.error_at(
                start_mark,
                "while scanning a tag, did not find expected whitespace or line break",
            ))
        }
    }

    fn scan_verbatim_tag(&mut self, start_mark: Marker) -> Result<String, ScanError> {
        // Eat `!<`
        self.skip_n_non_blank(2);

        let mut string = String::new();
        while is_uri_char(self.src.peek()) {
            if self.src.next_char_is('%') {
                self.scan_uri_escapes(start_mark, &mut string)?;
            } else {
                string.push(self.src.peek());
                self.skip_non_blank();
            }
        }

        if !self.src.next_char_is('>') || string.is_empty() {
            return Err(self.error_at(
                start_mark,
                "while scanning a verbatim tag, did not find the expected '>'",
            ));
        }
        self.skip_non_blank();

        Ok(string)
    }

    fn scan_tag_handle(&mut self, directive: bool, mark: Marker) -> Result<String, ScanError> {
        let mut string = String::new();
        if !self.src.next_char_is('!') {
            return Err(self.error_at(mark, "while scanning a tag, did not find expected '!'"));
        }

        string.push('!');
        self.skip_non_blank();

        self.src.fetch_while_is_alpha(&mut string);

        // Check if the trailing character is '!' and copy it.
        if self.src.next_char_is('!') {
            string.push('!');
            self.skip_non_blank();
        } else if directive && string != "!" {
            // It's either the '!' tag or not really a tag handle.  If it's a %TAG
            // directive, it's an error.  If it's a tag token, it must be a part of
            // URI.
            return Err(self.error_at(
                mark,
                "while parsing a tag directive, did not find expected '!'",
            ));
        }
        Ok(string)
    }

    fn scan_tag_shorthand_suffix(&mut self, head: &str, mark: Marker) -> Result<String, ScanError> {
        let mut string = String::new();

        // The leading '!' of the head is not part of the suffix.
        if head.len() > 1 {
            string.push_str(&head[1..]);
        }
        let mut length = head.len();

        while is_tag_char(self.src.peek()) {
            // Check if it is a URI-escape sequence.
            if self.src.next_char_is('%') {
                self.scan_uri_escapes(mark, &mut string)?;
            } else {
                string.push(self.src.peek());
                self.skip_non_blank();
            }
            length += 1;
        }

        if length == 0 {
            return Err(self.error_at(
                mark,
                "while parsing a tag, did not find expected tag URI",
            ));
        }

        Ok(string)
    }

    fn scan_tag_prefix(&mut self, start_mark: Marker) -> Result<String, ScanError> {
        let mut string = String::new();

        if self.src.next_char_is('!') {
            // If we have a local tag, insert and skip `!`.
            string.push('!');
            self.skip_non_blank();
        } else if !is_tag_char(self.src.peek()) {
            // Otherwise, check if the first global tag character is valid.
            return Err(self.error_at(
                start_mark,
                "while parsing a %TAG directive, found invalid global tag character",
            ));
        }

        while is_uri_char(self.src.peek()) {
            if self.src.next_char_is('%') {
                self.scan_uri_escapes(start_mark, &mut string)?;
            } else {
                string.push(self.src.peek());
                self.skip_non_blank();
            }
        }

        Ok(string)
    }

    /// Decodes a run of `%XX` escapes forming one UTF-8 encoded character.
    fn scan_uri_escapes(&mut self, mark: Marker, out: &mut String) -> ScanResult {
        let mut bytes: Vec<u8> = Vec::with_capacity(4);
        let mut width = 0usize;
        loop {
            let hi = self.src.peek_nth(1).to_digit(16);
            let lo = self.src.peek_nth(2).to_digit(16);
            let (true, Some(hi), Some(lo)) = (self.src.next_char_is('%'), hi, lo) else {
                return Err(self.error_at(
                    mark,
                    "while parsing a tag, found an invalid escape sequence",
                ));
            };

            let byte = ((hi << 4) + lo) as u8;
            if width == 0 {
                width = match byte {
                    _ if byte & 0x80 == 0x00 => 1,
                    _ if byte & 0xE0 == 0xC0 => 2,
                    _ if byte & 0xF0 == 0xE0 => 3,
                    _ if byte & 0xF8 == 0xF0 => 4,
                    _ => {
                        return Err(self.error_at(
                            mark,
                            "while parsing a tag, found an incorrect leading UTF-8 byte",
                        ));
                    }
                };
            } else if byte & 0xC0 != 0x80 {
                return Err(self.error_at(
                    mark,
                    "while parsing a tag, found an incorrect trailing UTF-8 byte",
                ));
            }
            bytes.push(byte);

            self.skip_n_non_blank(3);

            width -= 1;
            if width == 0 {
                break;
            }
        }

        match String::from_utf8(bytes) {
            Ok(decoded) => {
                out.push_str(&decoded);
                Ok(())
            }
            Err(_) => Err(self.error_at(
                mark,
                "while parsing a tag, found an invalid UTF-8 codepoint",
            )),
        }
    }

    fn unroll_indent(&mut self, col: u32) {
        if self.flow_level > 0 {
            return;
        }

        while self.indent > col {
            let Some(indent) = self.indents.pop() else {
                break;
            };
            self.indent = indent;
            self.tokens.push_back(Token {
                span: Span::empty(self.mark()),
                token_type: BlockEnd,
            });
        }
    }

    /// Opens a block collection at `col` if it is deeper than the current one. With a
    /// `number`, the start token is inserted before the token with that number.
    fn roll_indent(
        &mut self,
        col: u32,
        number: Option<usize>,
        token_type: TokenType<'input>,
        mark: Marker,
    ) {
        if self.flow_level > 0 {
            return;
        }

        if self.indent < col {
            self.indents.push(self.indent);
            self.indent = col;
            let span = Span::empty(mark);
            match number {
                Some(n) => self.insert_token(n - self.tokens_parsed, Token { span, token_type }),
                None => self.tokens.push_back(Token { span, token_type }),
            }
        }
    }

    fn insert_token(&mut self, pos: usize, token: Token<'input>) {
        let pos = pos.min(self.tokens.len());
        self.tokens.insert(pos, token);
    }

    fn increase_flow_level(&mut self) -> ScanResult {
        let mark = self.mark();
        self.simple_keys.push(SimpleKey::new(mark));
        self.flow_level = match self.flow_level.checked_add(1) {
            Some(level) => level,
            None => return Err(self.error_at(mark, "recursion limit exceeded")),
        };
        Ok(())
    }

    fn decrease_flow_level(&mut self) {
        if self.flow_level > 0 {
            self.flow_level -= 1;
            self.simple_keys.pop();
        }
    }

    /// Drops simple key candidates that can no longer be followed by `:`, they must
    /// stay on one line and within [`SIMPLE_KEY_LIMIT`] characters.
    fn stale_simple_keys(&mut self) -> ScanResult {
        let mark = self.mark();
        for i in 0..self.simple_keys.len() {
            let sk = &mut self.simple_keys[i];
            if sk.possible
                && (sk.mark.line < mark.line || sk.mark.index + SIMPLE_KEY_LIMIT < mark.index)
            {
                if sk.required {
                    let key_mark = sk.mark;
                    return Err(self.error_at(
                        key_mark,
                        "while scanning a simple key, could not find expected ':'",
                    ));
                }
                sk.possible = false;
            }
        }
        Ok(())
    }

    fn remove_simple_key(&mut self) -> ScanResult {
        let Some(last) = self.simple_keys.last_mut() else {
            return Ok(());
        };
        if last.possible && last.required {
            let mark = last.mark;
            return Err(self.error_at(
                mark,
                "while scanning a simple key, could not find expected ':'",
            ));
        }

        last.possible = false;
        Ok(())
    }

    fn save_simple_key(&mut self) {
        if self.simple_key_allowed {
            let mark = self.mark();
            let required = self.flow_level == 0 && self.indent == mark.col;

            let sk = SimpleKey {
                mark,
                required,
                possible: true,
                token_number: self.tokens_parsed + self.tokens.len(),
            };

            self.simple_keys.pop();
            self.simple_keys.push(sk);
        }
    }
}

impl<'input, S: Source> Iterator for Scanner<'input, S> {
    type Item = Token<'input>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.error.is_some() || self.stream_end_produced {
            return None;
        }
        self.next_token().ok()
    }
}

#[cfg(test)]
mod test {
    use crate::tokenizer::scanner::Scanner;
    use crate::Reader;
    use alloc::borrow::Cow;
    use alloc::vec::Vec;
    use yam11_common::TokenType::*;
    use yam11_common::{ScalarType, TokenType, YamlError};

    fn tokens(input: &str) -> Vec<TokenType<'static>> {
        Scanner::new(Reader::from_str(input))
            .map(|tok| tok.token_type)
            .collect()
    }

    fn scalar(value: &'static str, scalar_type: ScalarType) -> TokenType<'static> {
        Scalar {
            scalar_type,
            value: Cow::Borrowed(value),
        }
    }

    fn scan_error(input: &str) -> YamlError {
        let mut scanner = Scanner::new(Reader::from_str(input));
        for _ in scanner.by_ref() {}
        scanner.get_error().cloned().unwrap()
    }

    #[test]
    fn test_block_mapping() {
        assert_eq!(
            tokens("a: 1\nb: 2\n"),
            [
                StreamStart,
                BlockMappingStart,
                Key,
                scalar("a", ScalarType::Plain),
                Value,
                scalar("1", ScalarType::Plain),
                Key,
                scalar("b", ScalarType::Plain),
                Value,
                scalar("2", ScalarType::Plain),
                BlockEnd,
                StreamEnd,
            ]
        );
    }

    #[test]
    fn test_indentless_sequence_in_mapping() {
        assert_eq!(
            tokens("k:\n- a\n"),
            [
                StreamStart,
                BlockMappingStart,
                Key,
                scalar("k", ScalarType::Plain),
                Value,
                BlockEntry,
                scalar("a", ScalarType::Plain),
                BlockEnd,
                StreamEnd,
            ]
        );
    }

    #[test]
    fn test_flow_sequence_with_pair() {
        assert_eq!(
            tokens("[a, b: c]"),
            [
                StreamStart,
                FlowSequenceStart,
                scalar("a", ScalarType::Plain),
                FlowEntry,
                Key,
                scalar("b", ScalarType::Plain),
                Value,
                scalar("c", ScalarType::Plain),
                FlowSequenceEnd,
                StreamEnd,
            ]
        );
    }

    #[test]
    fn test_plain_folding() {
        assert_eq!(
            tokens("a\n  b\n\n  c"),
            [
                StreamStart,
                scalar("a b\nc", ScalarType::Plain),
                StreamEnd
            ]
        );
    }

    #[test]
    fn test_quoted_scalars() {
        assert_eq!(
            tokens("'it''s'"),
            [StreamStart, scalar("it's", ScalarType::SingleQuote), StreamEnd]
        );
        assert_eq!(
            tokens(r#""a\tb\x41\u263A\U0001F600""#),
            [
                StreamStart,
                scalar("a\tbA\u{263A}\u{1F600}", ScalarType::DoubleQuote),
                StreamEnd
            ]
        );
        assert_eq!(
            tokens("\"fold\n  ed\\\n  joined\""),
            [
                StreamStart,
                scalar("fold edjoined", ScalarType::DoubleQuote),
                StreamEnd
            ]
        );
    }

    #[test]
    fn test_block_scalars() {
        assert_eq!(
            tokens("|\n  line1\n  line2\n"),
            [
                StreamStart,
                scalar("line1\nline2\n", ScalarType::Literal),
                StreamEnd
            ]
        );
        assert_eq!(
            tokens(">-\n  folded\n  text\n\n  para\n"),
            [
                StreamStart,
                scalar("folded text\npara", ScalarType::Folded),
                StreamEnd
            ]
        );
        assert_eq!(
            tokens("|+\n  keep\n\n"),
            [
                StreamStart,
                scalar("keep\n\n", ScalarType::Literal),
                StreamEnd
            ]
        );
        assert_eq!(
            tokens("|2\n   x\n"),
            [StreamStart, scalar(" x\n", ScalarType::Literal), StreamEnd]
        );
    }

    #[test]
    fn test_tags_and_anchors() {
        assert_eq!(
            tokens("!!str &a *b !local ! !<tag:x>"),
            [
                StreamStart,
                Tag {
                    handle: Cow::Borrowed("!!"),
                    suffix: Cow::Borrowed("str"),
                },
                Anchor(Cow::Borrowed("a")),
                Alias(Cow::Borrowed("b")),
                Tag {
                    handle: Cow::Borrowed("!"),
                    suffix: Cow::Borrowed("local"),
                },
                Tag {
                    handle: Cow::Borrowed(""),
                    suffix: Cow::Borrowed("!"),
                },
                Tag {
                    handle: Cow::Borrowed(""),
                    suffix: Cow::Borrowed("tag:x"),
                },
                StreamEnd,
            ]
        );
    }

    #[test]
    fn test_uri_escapes_decode_utf8() {
        assert_eq!(
            tokens("!e%C3%A9 x"),
            [
                StreamStart,
                Tag {
                    handle: Cow::Borrowed("!"),
                    suffix: Cow::Borrowed("e\u{e9}"),
                },
                scalar("x", ScalarType::Plain),
                StreamEnd,
            ]
        );
    }

    #[test]
    fn test_directives() {
        assert_eq!(
            tokens("%YAML 1.1\n%TAG !e! tag:example.com,2000:\n%FOO bar\n---\n"),
            [
                StreamStart,
                VersionDirective { major: 1, minor: 1 },
                TagDirective {
                    handle: Cow::Borrowed("!e!"),
                    prefix: Cow::Borrowed("tag:example.com,2000:"),
                },
                ReservedDirective {
                    name: Cow::Borrowed("FOO"),
                },
                DocumentStart,
                StreamEnd,
            ]
        );
    }

    #[test]
    fn test_tab_indentation_fails() {
        let err = scan_error("a:\n\tb: c\n");
        assert!(matches!(err, YamlError::Scanner(ref e) if e.info.contains("tab")));
        assert_eq!(err.mark().map(|m| m.line), Some(2));
    }

    #[test]
    fn test_tabs_as_separators() {
        assert_eq!(
            tokens("a:\tb\n\t\n"),
            [
                StreamStart,
                BlockMappingStart,
                Key,
                scalar("a", ScalarType::Plain),
                Value,
                scalar("b", ScalarType::Plain),
                BlockEnd,
                StreamEnd,
            ]
        );
    }

    #[test]
    fn test_required_simple_key() {
        let err = scan_error("a: 1\nb\n");
        assert!(matches!(err, YamlError::Scanner(ref e) if e.info.contains("expected ':'")));
    }

    #[test]
    fn test_long_simple_key_is_stale() {
        let mut input = "x".repeat(1030);
        input.push_str(": v");
        let err = scan_error(&input);
        assert!(matches!(err, YamlError::Scanner(_)));
    }

    #[test]
    fn test_unterminated_constructs() {
        assert!(matches!(scan_error("'abc"), YamlError::Scanner(_)));
        assert!(matches!(scan_error("[a, b"), YamlError::Scanner(_)));
        assert!(matches!(scan_error("\"\\q\""), YamlError::Scanner(_)));
    }

    #[test]
    fn test_unclosed_flow_releases_queued_tokens() {
        let mut scanner = Scanner::new(Reader::from_str("[a, b"));
        let found: Vec<TokenType> = scanner.by_ref().map(|tok| tok.token_type).collect();
        assert_eq!(
            found,
            [
                StreamStart,
                FlowSequenceStart,
                scalar("a", ScalarType::Plain),
                FlowEntry,
                scalar("b", ScalarType::Plain),
            ]
        );
        assert!(matches!(scanner.get_error(), Some(YamlError::Scanner(_))));
    }

    #[test]
    fn test_flow_plain_rejects_inner_colon() {
        let YamlError::Scanner(err) = scan_error("[a:b]") else {
            panic!("expected a scanner error");
        };
        assert!(err.info.contains("found unexpected ':'"));
        assert!(matches!(scan_error("{a: b:c}"), YamlError::Scanner(_)));

        // Outside flow collections and before blanks or flow indicators it stays legal.
        assert_eq!(tokens("a:b")[1], scalar("a:b", ScalarType::Plain));
        assert_eq!(
            tokens("[a:, b]")[2..6],
            [Key, scalar("a", ScalarType::Plain), Value, FlowEntry]
        );
    }

    #[test]
    fn test_reader_error_has_priority() {
        let err = scan_error("a: \"b\x07");
        assert!(matches!(err, YamlError::Reader(_)));
    }

    #[test]
    fn test_snippet_attached() {
        let YamlError::Scanner(err) = scan_error("key: @x") else {
            panic!("expected a scanner error");
        };
        assert_eq!(err.snippet.as_deref(), Some("key: @x\n     ^"));
    }
}
