//! Character escaping for double-quoted scalars.
//!
//! An escaper is a plain function from a character to its replacement. `None` keeps
//! the character as is, `Some(String::new())` strips it.

use alloc::borrow::Cow;
use alloc::format;
use alloc::string::{String, ToString};
use core::fmt;

/// Replacement function used by [`escape_str`], [`EscapeWriter`] and the emitter.
pub type EscapeFn = fn(char) -> Option<String>;

/// Default escaper for YAML double-quoted scalars.
///
/// Uses the short escapes (`\n`, `\t`, `\N`, `\L`, ...) where YAML has one, then the
/// narrowest of `\xXX`, `\uXXXX` and `\UXXXXXXXX`. Printable ASCII other than `"` and
/// `\` is kept.
#[must_use]
pub fn yaml_escape(c: char) -> Option<String> {
    let named = match c {
        '\0' => "\\0",
        '\x07' => "\\a",
        '\x08' => "\\b",
        '\t' => "\\t",
        '\n' => "\\n",
        '\x0B' => "\\v",
        '\x0C' => "\\f",
        '\r' => "\\r",
        '\x1B' => "\\e",
        '"' => "\\\"",
        '\\' => "\\\\",
        '\u{85}' => "\\N",
        '\u{A0}' => "\\_",
        '\u{2028}' => "\\L",
        '\u{2029}' => "\\P",
        ' '..='~' => return None,
        c => return Some(numeric_escape(c)),
    };
    Some(named.to_string())
}

#[cfg_attr(not(feature = "no-inline"), inline)]
fn numeric_escape(c: char) -> String {
    let code = u32::from(c);
    if code <= 0xFF {
        format!("\\x{code:02X}")
    } else if code <= 0xFFFF {
        format!("\\u{code:04X}")
    } else {
        format!("\\U{code:08X}")
    }
}

/// Byte index of the first character `escaper` replaces, starting at `start`.
#[cfg_attr(not(feature = "no-inline"), inline)]
fn next_escape_index(input: &str, start: usize, escaper: EscapeFn) -> Option<usize> {
    input[start..]
        .char_indices()
        .find(|&(_, c)| escaper(c).is_some())
        .map(|(i, _)| start + i)
}

/// Escapes `input` with `escaper`.
///
/// Returns the input unchanged and borrowed when no character needs a replacement.
///
/// ```
/// use yam11_core::escaper::{escape_str, yaml_escape};
///
/// assert_eq!(escape_str("plain", yaml_escape), "plain");
/// assert_eq!(escape_str("tab\there", yaml_escape), "tab\\there");
/// ```
#[must_use]
pub fn escape_str(input: &str, escaper: EscapeFn) -> Cow<'_, str> {
    let Some(first) = next_escape_index(input, 0, escaper) else {
        return Cow::Borrowed(input);
    };

    let mut out = String::with_capacity(input.len() + 16);
    out.push_str(&input[..first]);
    for c in input[first..].chars() {
        match escaper(c) {
            Some(rep) => out.push_str(&rep),
            None => out.push(c),
        }
    }
    Cow::Owned(out)
}

/// A [`fmt::Write`] adapter that escapes everything written through it.
///
/// Runs of characters that need no escaping are forwarded in one piece.
pub struct EscapeWriter<W> {
    inner: W,
    escaper: EscapeFn,
}

impl<W: fmt::Write> EscapeWriter<W> {
    pub fn new(inner: W, escaper: EscapeFn) -> Self {
        EscapeWriter { inner, escaper }
    }

    pub fn get_ref(&self) -> &W {
        &self.inner
    }

    pub fn into_inner(self) -> W {
        self.inner
    }
}

impl<W: fmt::Write> fmt::Write for EscapeWriter<W> {
    fn write_str(&mut self, s: &str) -> fmt::Result {
        let mut start = 0;
        while let Some(index) = next_escape_index(s, start, self.escaper) {
            self.inner.write_str(&s[start..index])?;
            let c = s[index..].chars().next().unwrap_or_default();
            if let Some(rep) = (self.escaper)(c) {
                self.inner.write_str(&rep)?;
            }
            start = index + c.len_utf8();
        }
        self.inner.write_str(&s[start..])
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use core::fmt::Write;

    #[test]
    fn test_named_escapes() {
        assert_eq!(yaml_escape('\n').as_deref(), Some("\\n"));
        assert_eq!(yaml_escape('\x1B').as_deref(), Some("\\e"));
        assert_eq!(yaml_escape('\u{2029}').as_deref(), Some("\\P"));
        assert_eq!(yaml_escape('"').as_deref(), Some("\\\""));
        assert_eq!(yaml_escape('a'), None);
        assert_eq!(yaml_escape(' '), None);
    }

    #[test]
    fn test_numeric_escapes() {
        assert_eq!(yaml_escape('\x01').as_deref(), Some("\\x01"));
        assert_eq!(yaml_escape('\u{7F}').as_deref(), Some("\\x7F"));
        assert_eq!(yaml_escape('é').as_deref(), Some("\\xE9"));
        assert_eq!(yaml_escape('\u{FEFF}').as_deref(), Some("\\uFEFF"));
        assert_eq!(yaml_escape('😀').as_deref(), Some("\\U0001F600"));
    }

    #[test]
    fn test_escape_str_borrows_clean_input() {
        assert!(matches!(escape_str("nothing here", yaml_escape), Cow::Borrowed(_)));
        assert_eq!(
            escape_str("a\"b\\c\u{85}", yaml_escape),
            "a\\\"b\\\\c\\N"
        );
    }

    #[test]
    fn test_custom_escaper_strips() {
        fn strip_digits(c: char) -> Option<String> {
            c.is_ascii_digit().then(String::new)
        }
        assert_eq!(escape_str("a1b22c", strip_digits), "abc");
    }

    #[test]
    fn test_escape_writer() {
        let mut writer = EscapeWriter::new(String::new(), yaml_escape);
        writer.write_str("line\n").unwrap();
        write!(writer, "{}", '\t').unwrap();
        writer.write_str("end").unwrap();
        assert_eq!(writer.get_ref(), "line\\n\\tend");
        assert_eq!(writer.into_inner(), "line\\n\\tend");
    }
}
