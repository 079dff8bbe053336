#[inline]
#[must_use]
pub(crate) fn is_blank_or_break(c: char) -> bool {
    is_blank(c) || is_break(c)
}

#[inline]
#[must_use]
pub(crate) fn is_word_char(c: char) -> bool {
    c.is_ascii_alphanumeric() || c == '-'
}

#[inline]
#[must_use]
pub(crate) fn is_blank_or_breakz(c: char) -> bool {
    c == '\0' || is_blank(c) || is_break(c)
}

/// Check whether the character is a valid URI character.
#[inline]
#[must_use]
pub(crate) fn is_uri_char(c: char) -> bool {
    is_word_char(c) || "#;/?:@&=+$,_.!~*'()[]%".contains(c)
}

/// Line breaks recognized by YAML 1.1, including the Unicode ones.
#[inline]
#[must_use]
pub(crate) fn is_break(c: char) -> bool {
    matches!(c, '\r' | '\n' | '\u{85}' | '\u{2028}' | '\u{2029}')
}

#[inline]
#[must_use]
pub(crate) fn is_breakz(c: char) -> bool {
    is_break(c) || c == '\0'
}

#[inline]
#[must_use]
pub(crate) fn is_blank(c: char) -> bool {
    c == ' ' || c == '\t'
}

#[inline]
#[must_use]
pub(crate) fn is_flow(c: char) -> bool {
    matches!(c, ',' | '[' | ']' | '{' | '}')
}

pub(crate) fn is_tag_char(c: char) -> bool {
    is_uri_char(c) && !is_flow(c) && c != '!'
}

#[inline]
#[must_use]
pub fn is_alpha(c: char) -> bool {
    matches!(c, '0'..='9' | 'a'..='z' | 'A'..='Z' | '_' | '-')
}

/// The YAML 1.1 printable set. Everything else is rejected by the reader.
#[inline]
#[must_use]
pub fn is_printable(c: char) -> bool {
    matches!(c,
        '\t' | '\n' | '\r'
        | '\x20'..='\x7E'
        | '\u{85}'
        | '\u{A0}'..='\u{D7FF}'
        | '\u{E000}'..='\u{FFFD}'
        | '\u{10000}'..='\u{10FFFF}')
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn printable_set() {
        assert!(is_printable('\t'));
        assert!(is_printable('\u{1F600}'));
        assert!(is_printable('\u{85}'));
        assert!(!is_printable('\0'));
        assert!(!is_printable('\x07'));
        assert!(!is_printable('\u{7F}'));
        assert!(!is_printable('\u{9F}'));
        assert!(!is_printable('\u{FFFE}'));
    }

    #[test]
    fn unicode_breaks() {
        assert!(is_break('\u{2028}'));
        assert!(is_breakz('\0'));
        assert!(!is_break('\t'));
        assert!(is_blank_or_breakz('\u{85}'));
    }
}
