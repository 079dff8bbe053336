use crate::tokenizer::char_utils::{is_break, is_printable};

/// Styles a scalar's content can be written in without changing its value.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct ScalarAnalysis {
    pub empty: bool,
    pub multiline: bool,
    pub allow_flow_plain: bool,
    pub allow_block_plain: bool,
    pub allow_single_quoted: bool,
    pub allow_double_quoted: bool,
    pub allow_block: bool,
}

#[cfg_attr(not(feature = "no-inline"), inline)]
fn is_space_or_breakz(c: char) -> bool {
    matches!(c, '\0' | ' ' | '\t' | '\r' | '\n' | '\u{85}' | '\u{2028}' | '\u{2029}')
}

/// Inspects `value` and decides which scalar styles can represent it.
///
/// With `allow_unicode` unset every non-ASCII character counts as special, which
/// leaves only the double-quoted style.
#[must_use]
pub fn analyze_scalar(value: &str, allow_unicode: bool) -> ScalarAnalysis {
    if value.is_empty() {
        return ScalarAnalysis {
            empty: true,
            multiline: false,
            allow_flow_plain: false,
            allow_block_plain: true,
            allow_single_quoted: true,
            allow_double_quoted: true,
            allow_block: false,
        };
    }

    let mut block_indicators = false;
    let mut flow_indicators = false;
    let mut line_breaks = false;
    let mut special_characters = false;

    let mut leading_space = false;
    let mut leading_break = false;
    let mut trailing_space = false;
    let mut trailing_break = false;
    let mut break_space = false;
    let mut space_break = false;

    if value.starts_with("---") || value.starts_with("...") {
        block_indicators = true;
        flow_indicators = true;
    }

    let mut chars = value.chars().peekable();
    let mut preceded_by_whitespace = true;
    let mut previous_space = false;
    let mut previous_break = false;
    let mut index = 0;

    while let Some(c) = chars.next() {
        let next = chars.peek().copied();
        let followed_by_whitespace = next.map_or(true, is_space_or_breakz);
        let last = next.is_none();

        if index == 0 {
            match c {
                '#' | ',' | '[' | ']' | '{' | '}' | '&' | '*' | '!' | '|' | '>' | '\'' | '"'
                | '%' | '@' | '`' => {
                    flow_indicators = true;
                    block_indicators = true;
                }
                '?' | ':' => {
                    flow_indicators = true;
                    if followed_by_whitespace {
                        block_indicators = true;
                    }
                }
                '-' if followed_by_whitespace => {
                    flow_indicators = true;
                    block_indicators = true;
                }
                _ => {}
            }
        } else {
            match c {
                ',' | '?' | '[' | ']' | '{' | '}' => flow_indicators = true,
                ':' => {
                    flow_indicators = true;
                    if followed_by_whitespace {
                        block_indicators = true;
                    }
                }
                '#' if preceded_by_whitespace => {
                    flow_indicators = true;
                    block_indicators = true;
                }
                _ => {}
            }
        }

        if is_break(c) && c != '\r' {
            line_breaks = true;
        }
        if !(c == '\n' || (' '..='~').contains(&c)) {
            let unicode = c != '\u{FEFF}' && !c.is_ascii() && is_printable(c);
            if !unicode || !allow_unicode {
                special_characters = true;
            }
        }

        if c == ' ' {
            if index == 0 {
                leading_space = true;
            }
            if last {
                trailing_space = true;
            }
            if previous_break {
                break_space = true;
            }
            previous_space = true;
            previous_break = false;
        } else if is_break(c) {
            if index == 0 {
                leading_break = true;
            }
            if last {
                trailing_break = true;
            }
            if previous_space {
                space_break = true;
            }
            previous_space = false;
            previous_break = true;
        } else {
            previous_space = false;
            previous_break = false;
        }

        index += 1;
        preceded_by_whitespace = is_space_or_breakz(c);
    }

    let mut analysis = ScalarAnalysis {
        empty: false,
        multiline: line_breaks,
        allow_flow_plain: true,
        allow_block_plain: true,
        allow_single_quoted: true,
        allow_double_quoted: true,
        allow_block: true,
    };

    if leading_space || leading_break || trailing_space || trailing_break {
        analysis.allow_flow_plain = false;
        analysis.allow_block_plain = false;
    }
    if trailing_space {
        analysis.allow_block = false;
    }
    if break_space {
        analysis.allow_flow_plain = false;
        analysis.allow_block_plain = false;
        analysis.allow_single_quoted = false;
    }
    if space_break || special_characters {
        analysis.allow_flow_plain = false;
        analysis.allow_block_plain = false;
        analysis.allow_single_quoted = false;
        analysis.allow_block = false;
    }
    // Multi-line plain scalars are never written.
    if line_breaks {
        analysis.allow_flow_plain = false;
        analysis.allow_block_plain = false;
    }
    if flow_indicators {
        analysis.allow_flow_plain = false;
    }
    if block_indicators {
        analysis.allow_block_plain = false;
    }
    analysis
}

/// Checks if a plain scalar with this content would be read back as something other
/// than a string: a null, a boolean, a number, a date, a merge key or a value key.
#[allow(clippy::doc_markdown)]
pub(crate) fn is_ambiguous_plain(value: &str) -> bool {
    const RESOLVED_WORDS: [&str; 26] = [
        // http://yaml.org/type/bool.html
        "yes", "Yes", "YES", "no", "No", "NO", "true", "True", "TRUE", "false", "False", "FALSE",
        "on", "On", "ON", "off", "Off", "OFF",
        // http://yaml.org/type/null.html
        "null", "Null", "NULL", "~",
        // http://yaml.org/type/merge.html and value.html
        "<<", "=",
        // http://yaml.org/type/float.html
        ".inf", ".nan",
    ];

    if value.is_empty() || RESOLVED_WORDS.contains(&value) {
        return true;
    }

    let unsigned = value.trim_start_matches(|c: char| c == '+' || c == '-');
    unsigned.starts_with('.')
        || unsigned.starts_with("0x")
        || unsigned.starts_with("0b")
        || value.parse::<i64>().is_ok()
        || value.parse::<f64>().is_ok()
        || (unsigned.starts_with(|c: char| c.is_ascii_digit())
            && unsigned
                .chars()
                .all(|c| c.is_ascii_digit() || matches!(c, '_' | ':' | '.' | 'e' | 'E' | '+' | '-')))
        || looks_like_date(value)
}

fn looks_like_date(value: &str) -> bool {
    let bytes = value.as_bytes();
    bytes.len() >= 8
        && bytes[..4].iter().all(u8::is_ascii_digit)
        && bytes[4] == b'-'
        && bytes[5].is_ascii_digit()
}
