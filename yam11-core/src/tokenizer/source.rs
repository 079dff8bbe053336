use crate::tokenizer::char_utils::{
    is_alpha, is_blank, is_blank_or_break, is_blank_or_breakz, is_break, is_breakz, is_flow,
};
use crate::tokenizer::scanner::SkipTabs;
use alloc::string::String;
use yam11_common::{Marker, ReaderError};

///
/// A source of decoded characters for the scanner, with methods for peeking, skipping
/// and inspecting upcoming characters.
///
/// The end of input is reported as `'\0'`. The NUL character is outside the YAML
/// printable set, so it can never be part of a valid stream. A source that failed to
/// decode its input behaves as if the input ended at the failure and keeps the error
/// in [`Source::error`].
///
/// # Methods
/// ## Peeking
/// - `peek_nth(n: usize) -> char`: character `n` positions ahead, `'\0'` past the end.
/// - `peek() -> char`: the next character.
/// - `peek_two() -> [char; 2]`: the next two characters.
///
/// ## Position
/// - `skip(n: usize)`: consume `n` characters, updating the mark.
/// - `mark() -> Marker`: position of the next character.
/// - `snippet() -> Option<String>`: current line with a caret under the current column.
///
/// ## Parsing Helpers
/// - `fetch_while_is_alpha(out: &mut String) -> usize`: appends consecutive alphanumeric characters.
/// - `skip_while_blank() -> usize`: skips consecutive blanks.
/// - `skip_ws_to_eol(skip_tabs) -> Result<SkipTabs, &'static str>`: skips whitespace and a
///   trailing comment up to the end of line.
pub trait Source {
    #[must_use]
    fn peek_nth(&mut self, n: usize) -> char;

    #[must_use]
    fn peek(&mut self) -> char {
        self.peek_nth(0)
    }

    fn skip(&mut self, n: usize);

    #[must_use]
    fn mark(&self) -> Marker;

    /// Decoding failure hit while filling the lookahead, if any.
    fn error(&self) -> Option<&ReaderError>;

    fn snippet(&mut self) -> Option<String> {
        None
    }

    fn next_is_z(&mut self) -> bool {
        self.peek() == '\0'
    }

    fn fetch_while_is_alpha(&mut self, out: &mut String) -> usize {
        let mut n_chars = 0;
        while is_alpha(self.peek()) {
            n_chars += 1;
            out.push(self.peek());
            self.skip(1);
        }
        n_chars
    }

    fn skip_while_blank(&mut self) -> usize {
        let mut n_chars = 0;
        while is_blank(self.peek()) {
            n_chars += 1;
            self.skip(1);
        }
        n_chars
    }

    fn skip_while_non_breakz(&mut self) -> usize {
        let mut count = 0;
        while !is_breakz(self.peek()) {
            count += 1;
            self.skip(1);
        }
        count
    }

    fn push_non_breakz_chr(&mut self, out: &mut String) {
        loop {
            let c = self.peek();
            if is_breakz(c) {
                break;
            }
            out.push(c);
            self.skip(1);
        }
    }

    fn skip_ws_to_eol(&mut self, skip_tabs: SkipTabs) -> Result<SkipTabs, &'static str> {
        let mut any_tabs = false;
        let mut has_yaml_ws = false;
        loop {
            match self.peek() {
                ' ' => {
                    has_yaml_ws = true;
                    self.skip(1);
                }
                '\t' if skip_tabs != SkipTabs::No => {
                    any_tabs = true;
                    self.skip(1);
                }
                // YAML comments must be preceded by whitespace.
                '#' if !any_tabs && !has_yaml_ws => {
                    return Err("comments must be separated from other tokens by whitespace");
                }
                '#' => {
                    self.skip_while_non_breakz();
                }
                _ => break,
            }
        }

        Ok(SkipTabs::Result {
            any_tabs,
            has_yaml_ws,
        })
    }

    fn next_char_is(&mut self, chr: char) -> bool {
        chr == self.peek()
    }

    fn nth_char_is(&mut self, n: usize, chr: char) -> bool {
        chr == self.peek_nth(n)
    }

    fn peek_two(&mut self) -> [char; 2] {
        [self.peek(), self.peek_nth(1)]
    }

    fn next_is_three(&mut self, chr: char) -> bool {
        self.peek() == chr && self.peek_nth(1) == chr && self.peek_nth(2) == chr
    }

    #[must_use]
    fn next_is_flow(&mut self) -> bool {
        is_flow(self.peek())
    }

    #[must_use]
    fn next_is_break(&mut self) -> bool {
        is_break(self.peek())
    }

    #[must_use]
    fn next_is_blank(&mut self) -> bool {
        is_blank(self.peek())
    }

    #[must_use]
    fn next_is_breakz(&mut self) -> bool {
        is_breakz(self.peek())
    }

    fn next_is_blank_or_break(&mut self) -> bool {
        is_blank_or_break(self.peek())
    }

    fn next_is_blank_or_breakz(&mut self) -> bool {
        is_blank_or_breakz(self.peek())
    }

    fn next_can_be_plain_scalar(&mut self, in_flow: bool) -> bool {
        let nc = self.peek_nth(1);
        match self.peek() {
            // indicators can end a plain scalar
            ':' if is_blank_or_breakz(nc) || (in_flow && is_flow(nc)) => false,
            c if in_flow && (is_flow(c) || c == '?') => false,
            _ => true,
        }
    }

    fn next_is_document_indicator(&mut self) -> bool {
        (self.next_is_three('-') || self.next_is_three('.'))
            && is_blank_or_breakz(self.peek_nth(3))
    }

    fn next_is_alpha(&mut self) -> bool {
        is_alpha(self.peek())
    }
}

#[cfg(test)]
mod test {
    use crate::tokenizer::scanner::SkipTabs;
    use crate::{Reader, Source};

    const TEST_STR: &str = "                                      \
                                    \n                     \
                hello ";

    #[test]
    fn test_skip_ws_to_eol() {
        let mut x = Reader::from_str(TEST_STR);
        let skip = x.skip_ws_to_eol(SkipTabs::Yes);
        assert_eq!(
            skip,
            Ok(SkipTabs::Result {
                has_yaml_ws: true,
                any_tabs: false
            })
        );
        assert_eq!(x.mark().col, 39);
        assert!(x.next_is_break());
    }

    #[test]
    fn test_comment_needs_whitespace() {
        let mut x = Reader::from_str("#comment");
        assert!(x.skip_ws_to_eol(SkipTabs::Yes).is_err());

        let mut x = Reader::from_str("\t# comment\nnext");
        let skip = x.skip_ws_to_eol(SkipTabs::Yes);
        assert!(matches!(skip, Ok(t) if t.found_tabs()));
        assert!(x.next_is_break());
    }

    #[test]
    fn test_plain_scalar_indicators() {
        let mut x = Reader::from_str(": x");
        assert!(!x.next_can_be_plain_scalar(false));
        let mut x = Reader::from_str(":x");
        assert!(x.next_can_be_plain_scalar(false));
        let mut x = Reader::from_str(":]");
        assert!(!x.next_can_be_plain_scalar(true));
        assert!(x.next_can_be_plain_scalar(false));
    }
}
