use crate::tokenizer::char_utils::{is_break, is_printable};
use crate::Source;
use alloc::collections::VecDeque;
use alloc::string::String;
use core::str::CharIndices;
use tracing::debug;
use yam11_common::{Encoding, Marker, ReaderError, ReaderErrorKind};

enum Decoder<'a> {
    Utf8 {
        chars: CharIndices<'a>,
        /// Offset of `chars` in the raw input.
        base: usize,
        /// First byte of an invalid sequence that ends the valid prefix.
        invalid: Option<u8>,
    },
    Utf16 {
        input: &'a [u8],
        pos: usize,
        big_endian: bool,
    },
}

impl Decoder<'_> {
    /// Decodes the next character together with its raw byte offset.
    fn next(&mut self) -> Option<Result<(char, usize), ReaderErrorKind>> {
        match self {
            Decoder::Utf8 {
                chars,
                base,
                invalid,
            } => match chars.next() {
                Some((pos, c)) => Some(Ok((c, *base + pos))),
                None => invalid.take().map(|b| Err(ReaderErrorKind::InvalidUtf8(b))),
            },
            Decoder::Utf16 {
                input,
                pos,
                big_endian,
            } => {
                let start = *pos;
                let unit = match Self::unit(input, start, *big_endian)? {
                    Ok(unit) => unit,
                    Err(err) => {
                        *pos = input.len();
                        return Some(Err(err));
                    }
                };
                *pos += 2;
                let code = match unit {
                    0xD800..=0xDBFF => match Self::unit(input, *pos, *big_endian) {
                        Some(Ok(low @ 0xDC00..=0xDFFF)) => {
                            *pos += 2;
                            0x10000 + ((u32::from(unit) - 0xD800) << 10) + (u32::from(low) - 0xDC00)
                        }
                        _ => return Some(Err(ReaderErrorKind::InvalidUtf16(unit))),
                    },
                    0xDC00..=0xDFFF => return Some(Err(ReaderErrorKind::InvalidUtf16(unit))),
                    _ => u32::from(unit),
                };
                char::from_u32(code)
                    .map(|c| Ok((c, start)))
                    .or(Some(Err(ReaderErrorKind::InvalidUtf16(unit))))
            }
        }
    }

    fn unit(input: &[u8], pos: usize, big_endian: bool) -> Option<Result<u16, ReaderErrorKind>> {
        match input.get(pos..pos + 2) {
            Some(&[a, b]) if big_endian => Some(Ok(u16::from_be_bytes([a, b]))),
            Some(&[a, b]) => Some(Ok(u16::from_le_bytes([a, b]))),
            _ if pos < input.len() => Some(Err(ReaderErrorKind::TruncatedUtf16)),
            _ => None,
        }
    }
}

/// Decodes raw input into the character stream consumed by the scanner.
///
/// Characters are decoded lazily into a small lookahead window. Decoding stops at the
/// first malformed sequence or forbidden character; everything before it is still
/// readable and the failure is kept in [`Source::error`].
pub struct Reader<'a> {
    input: &'a [u8],
    decoder: Decoder<'a>,
    encoding: Encoding,
    buffer: VecDeque<(char, usize)>,
    mark: Marker,
    prev: char,
    /// Raw offset of the line holding `mark`.
    line_start: usize,
    decoded: Marker,
    decoded_prev: char,
    error: Option<ReaderError>,
    eof: bool,
}

impl<'a> Reader<'a> {
    #[allow(clippy::should_implement_trait)]
    #[must_use]
    pub fn from_str(input: &'a str) -> Reader<'a> {
        Reader::from_bytes(input.as_bytes())
    }

    /// Creates a reader over raw bytes, detecting the encoding from the byte order mark.
    #[must_use]
    pub fn from_bytes(input: &'a [u8]) -> Reader<'a> {
        let (encoding, bom_len) = match input {
            [0xFF, 0xFE, ..] => (Encoding::Utf16Le, 2),
            [0xFE, 0xFF, ..] => (Encoding::Utf16Be, 2),
            [0xEF, 0xBB, 0xBF, ..] => (Encoding::Utf8, 3),
            _ => (Encoding::Utf8, 0),
        };
        debug!("detected {:?} input encoding", encoding);

        let body = &input[bom_len..];
        let decoder = match encoding {
            Encoding::Utf8 => {
                let (valid, invalid) = match core::str::from_utf8(body) {
                    Ok(s) => (s, None),
                    Err(e) => (
                        core::str::from_utf8(&body[..e.valid_up_to()]).unwrap_or_default(),
                        body.get(e.valid_up_to()).copied(),
                    ),
                };
                Decoder::Utf8 {
                    chars: valid.char_indices(),
                    base: bom_len,
                    invalid,
                }
            }
            Encoding::Utf16Le | Encoding::Utf16Be => Decoder::Utf16 {
                input,
                pos: bom_len,
                big_endian: encoding == Encoding::Utf16Be,
            },
        };

        Reader {
            input,
            decoder,
            encoding,
            buffer: VecDeque::with_capacity(16),
            mark: Marker::start(),
            prev: '\0',
            line_start: bom_len,
            decoded: Marker::start(),
            decoded_prev: '\0',
            error: None,
            eof: false,
        }
    }

    #[must_use]
    pub fn encoding(&self) -> Encoding {
        self.encoding
    }

    /// Consumes the next character, `Ok(None)` at the end of the stream.
    ///
    /// # Errors
    /// Returns the decoding error once every character before it has been read.
    pub fn next_char(&mut self) -> Result<Option<char>, ReaderError> {
        let c = self.peek();
        if c != '\0' {
            self.skip(1);
            return Ok(Some(c));
        }
        match &self.error {
            Some(err) => Err(err.clone()),
            None => Ok(None),
        }
    }

    fn fill(&mut self, n: usize) {
        while self.buffer.len() <= n && !self.eof && self.error.is_none() {
            match self.decoder.next() {
                None => self.eof = true,
                Some(Ok((c, _))) if !is_printable(c) => {
                    self.fail(ReaderErrorKind::NonPrintable(c as u32));
                }
                Some(Ok((c, offset))) => {
                    self.buffer.push_back((c, offset));
                    advance(&mut self.decoded, c, self.decoded_prev);
                    self.decoded_prev = c;
                }
                Some(Err(kind)) => self.fail(kind),
            }
        }
    }

    fn fail(&mut self, kind: ReaderErrorKind) {
        debug!("reader stopped: {}", kind);
        self.error = Some(ReaderError {
            index: self.decoded.index,
            line: self.decoded.line,
            col: self.decoded.col,
            kind,
        });
    }

    fn raw_width(&self, c: char) -> usize {
        match self.encoding {
            Encoding::Utf8 => c.len_utf8(),
            Encoding::Utf16Le | Encoding::Utf16Be => c.len_utf16() * 2,
        }
    }
}

#[cfg_attr(not(feature = "no-inline"), inline)]
fn advance(mark: &mut Marker, c: char, prev: char) {
    mark.index += 1;
    if c == '\n' && prev == '\r' {
        return;
    }
    if is_break(c) {
        mark.line += 1;
        mark.col = 1;
    } else {
        mark.col += 1;
    }
}

impl Source for Reader<'_> {
    #[cfg_attr(not(feature = "no-inline"), inline)]
    fn peek_nth(&mut self, n: usize) -> char {
        self.fill(n);
        self.buffer.get(n).map_or('\0', |&(c, _)| c)
    }

    fn skip(&mut self, n: usize) {
        for _ in 0..n {
            self.fill(0);
            let Some((c, offset)) = self.buffer.pop_front() else {
                break;
            };
            advance(&mut self.mark, c, self.prev);
            self.prev = c;
            if is_break(c) {
                self.line_start = offset + self.raw_width(c);
            }
        }
    }

    fn mark(&self) -> Marker {
        self.mark
    }

    fn error(&self) -> Option<&ReaderError> {
        self.error.as_ref()
    }

    fn snippet(&mut self) -> Option<String> {
        let rest = self.input.get(self.line_start..)?;
        let mut out: String = match self.encoding {
            Encoding::Utf8 => {
                let end = memchr::memchr2(b'\n', b'\r', rest).unwrap_or(rest.len());
                String::from_utf8_lossy(&rest[..end]).into_owned()
            }
            Encoding::Utf16Le | Encoding::Utf16Be => {
                let big_endian = self.encoding == Encoding::Utf16Be;
                let units = rest.chunks_exact(2).map(|pair| {
                    if big_endian {
                        u16::from_be_bytes([pair[0], pair[1]])
                    } else {
                        u16::from_le_bytes([pair[0], pair[1]])
                    }
                });
                char::decode_utf16(units)
                    .map(|c| c.unwrap_or(char::REPLACEMENT_CHARACTER))
                    .take_while(|c| !is_break(*c))
                    .collect()
            }
        };
        out.push('\n');
        for _ in 1..self.mark.col {
            out.push(' ');
        }
        out.push('^');
        Some(out)
    }
}

#[cfg(test)]
mod test {
    use crate::{Reader, Source};
    use alloc::vec::Vec;
    use yam11_common::{Encoding, Marker, ReaderErrorKind};

    fn read_all(reader: &mut Reader) -> Vec<char> {
        let mut chars = Vec::new();
        while let Ok(Some(c)) = reader.next_char() {
            chars.push(c);
        }
        chars
    }

    #[test]
    fn test_marks_track_lines() {
        let mut reader = Reader::from_str("ab\r\nc\u{2028}d");
        reader.skip(2);
        assert_eq!(reader.mark(), Marker::new(2, 1, 3));
        reader.skip(2);
        assert_eq!(reader.mark(), Marker::new(4, 2, 1));
        reader.skip(2);
        assert_eq!(reader.mark(), Marker::new(6, 3, 1));
        assert_eq!(reader.peek(), 'd');
    }

    #[test]
    fn test_utf8_bom_is_skipped() {
        let mut reader = Reader::from_bytes(b"\xEF\xBB\xBFkey");
        assert_eq!(reader.encoding(), Encoding::Utf8);
        assert_eq!(read_all(&mut reader), ['k', 'e', 'y']);
    }

    #[test]
    fn test_utf16_le_and_be() {
        let le: Vec<u8> = [0xFF, 0xFE, b'a', 0, 0x3D, 0xD8, 0x00, 0xDE].to_vec();
        let mut reader = Reader::from_bytes(&le);
        assert_eq!(reader.encoding(), Encoding::Utf16Le);
        assert_eq!(read_all(&mut reader), ['a', '\u{1F600}']);

        let be: Vec<u8> = [0xFE, 0xFF, 0, b'x', 0, b'\n'].to_vec();
        let mut reader = Reader::from_bytes(&be);
        assert_eq!(reader.encoding(), Encoding::Utf16Be);
        assert_eq!(read_all(&mut reader), ['x', '\n']);
    }

    #[test]
    fn test_unpaired_surrogate() {
        let input: Vec<u8> = [0xFF, 0xFE, b'a', 0, 0x00, 0xDC].to_vec();
        let mut reader = Reader::from_bytes(&input);
        assert_eq!(reader.next_char(), Ok(Some('a')));
        let err = reader.next_char().unwrap_err();
        assert_eq!(err.kind, ReaderErrorKind::InvalidUtf16(0xDC00));
        assert_eq!(err.index, 1);
    }

    #[test]
    fn test_invalid_utf8_is_deferred() {
        let mut reader = Reader::from_bytes(b"ok: \xFF");
        assert_eq!(reader.peek_nth(3), ' ');
        assert!(reader.error().is_none());
        assert_eq!(reader.peek_nth(4), '\0');
        let err = reader.error().cloned().unwrap();
        assert_eq!(err.kind, ReaderErrorKind::InvalidUtf8(0xFF));
        assert_eq!((err.index, err.line, err.col), (4, 1, 5));
    }

    #[test]
    fn test_non_printable() {
        let mut reader = Reader::from_str("a\nb\x07");
        assert_eq!(read_all(&mut reader), ['a', '\n', 'b']);
        let err = reader.next_char().unwrap_err();
        assert_eq!(err.kind, ReaderErrorKind::NonPrintable(7));
        assert_eq!((err.line, err.col), (2, 2));
    }

    #[test]
    fn test_snippet_points_at_column() {
        let mut reader = Reader::from_str("first\nsecond line\nthird");
        reader.skip(9);
        assert_eq!(reader.snippet().as_deref(), Some("second line\n   ^"));
    }
}
