use crate::escaper::{yaml_escape, EscapeFn};
use alloc::format;
use yam11_common::EmitError;

/// Line break written by the emitter.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Default)]
pub enum LineBreak {
    #[default]
    Lf,
    Cr,
    CrLf,
}

impl LineBreak {
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            LineBreak::Lf => "\n",
            LineBreak::Cr => "\r",
            LineBreak::CrLf => "\r\n",
        }
    }
}

/// Collection style policy.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Default)]
pub enum FlowStyle {
    /// Use the style requested by each event.
    #[default]
    Auto,
    /// Write every collection in flow style.
    Flow,
    /// Write collections in block style even when an event asks for flow. Empty
    /// collections and collections nested in flow ones stay flow.
    Block,
}

/// Emitter configuration.
///
/// ```
/// use yam11_core::emitter::{EmitterOptions, LineBreak};
///
/// let options = EmitterOptions::default()
///     .indent(4)
///     .width(40)
///     .line_break(LineBreak::CrLf);
/// assert!(options.validate().is_ok());
/// assert!(EmitterOptions::default().indent(12).validate().is_err());
/// ```
#[derive(Clone, Debug)]
pub struct EmitterOptions {
    pub canonical: bool,
    pub indent: usize,
    pub width: usize,
    pub line_break: LineBreak,
    pub allow_unicode: bool,
    pub explicit_start: bool,
    pub explicit_end: bool,
    pub flow_style: FlowStyle,
    /// Keys whose written form is this long or longer use the `? ` form.
    pub max_simple_key_length: usize,
    pub escaper: EscapeFn,
}

impl Default for EmitterOptions {
    fn default() -> Self {
        EmitterOptions {
            canonical: false,
            indent: 2,
            width: 80,
            line_break: LineBreak::Lf,
            allow_unicode: true,
            explicit_start: false,
            explicit_end: false,
            flow_style: FlowStyle::Auto,
            max_simple_key_length: 128,
            escaper: yaml_escape,
        }
    }
}

impl EmitterOptions {
    #[must_use]
    pub fn canonical(mut self, canonical: bool) -> Self {
        self.canonical = canonical;
        self
    }

    #[must_use]
    pub fn indent(mut self, indent: usize) -> Self {
        self.indent = indent;
        self
    }

    #[must_use]
    pub fn width(mut self, width: usize) -> Self {
        self.width = width;
        self
    }

    #[must_use]
    pub fn line_break(mut self, line_break: LineBreak) -> Self {
        self.line_break = line_break;
        self
    }

    #[must_use]
    pub fn allow_unicode(mut self, allow_unicode: bool) -> Self {
        self.allow_unicode = allow_unicode;
        self
    }

    #[must_use]
    pub fn explicit_start(mut self, explicit_start: bool) -> Self {
        self.explicit_start = explicit_start;
        self
    }

    #[must_use]
    pub fn explicit_end(mut self, explicit_end: bool) -> Self {
        self.explicit_end = explicit_end;
        self
    }

    #[must_use]
    pub fn flow_style(mut self, flow_style: FlowStyle) -> Self {
        self.flow_style = flow_style;
        self
    }

    #[must_use]
    pub fn max_simple_key_length(mut self, max_simple_key_length: usize) -> Self {
        self.max_simple_key_length = max_simple_key_length;
        self
    }

    #[must_use]
    pub fn escaper(mut self, escaper: EscapeFn) -> Self {
        self.escaper = escaper;
        self
    }

    /// Checks that the options describe an output the scanner can read back.
    ///
    /// # Errors
    /// Returns [`EmitError::Options`] when the indent is outside `2..=9`, the width is
    /// not wider than two indents, or the simple key length is outside `1..=1024`.
    pub fn validate(&self) -> Result<(), EmitError> {
        if !(2..=9).contains(&self.indent) {
            return Err(EmitError::Options(format!(
                "indent must be between 2 and 9, got {}",
                self.indent
            )));
        }
        if self.width <= self.indent * 2 {
            return Err(EmitError::Options(format!(
                "width must be greater than {}, got {}",
                self.indent * 2,
                self.width
            )));
        }
        if !(1..=1024).contains(&self.max_simple_key_length) {
            return Err(EmitError::Options(format!(
                "max simple key length must be between 1 and 1024, got {}",
                self.max_simple_key_length
            )));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_are_valid() {
        let options = EmitterOptions::default();
        assert_eq!(options.indent, 2);
        assert_eq!(options.width, 80);
        assert_eq!(options.max_simple_key_length, 128);
        assert!(options.allow_unicode);
        assert!(options.validate().is_ok());
    }

    #[test]
    fn test_out_of_range() {
        assert!(EmitterOptions::default().indent(1).validate().is_err());
        assert!(EmitterOptions::default().indent(10).validate().is_err());
        assert!(EmitterOptions::default().indent(9).width(18).validate().is_err());
        assert!(EmitterOptions::default().indent(9).width(19).validate().is_ok());
        assert!(EmitterOptions::default()
            .max_simple_key_length(0)
            .validate()
            .is_err());
        assert!(EmitterOptions::default()
            .max_simple_key_length(1025)
            .validate()
            .is_err());
    }

    #[test]
    fn test_line_breaks() {
        assert_eq!(LineBreak::default().as_str(), "\n");
        assert_eq!(LineBreak::CrLf.as_str(), "\r\n");
    }
}
