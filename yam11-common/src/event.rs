use crate::{ScalarType, Tag};
use std::borrow::Cow;

/// Whether a scalar's tag may be omitted when it is written in plain or in a
/// quoted style.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Default, Hash)]
pub struct Implicit {
    pub plain: bool,
    pub quoted: bool,
}

impl Implicit {
    pub const PLAIN: Implicit = Implicit {
        plain: true,
        quoted: false,
    };
    pub const QUOTED: Implicit = Implicit {
        plain: false,
        quoted: true,
    };
    pub const BOTH: Implicit = Implicit {
        plain: true,
        quoted: true,
    };
    pub const NONE: Implicit = Implicit {
        plain: false,
        quoted: false,
    };
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ScalarValue<'input> {
    pub value: Cow<'input, str>,
    pub scalar_type: ScalarType,
    pub anchor: Option<Cow<'input, str>>,
    pub tag: Option<Tag>,
    pub implicit: Implicit,
}

impl<'input> ScalarValue<'input> {
    /// Untagged scalar, implicit in both plain and quoted form.
    pub fn new(value: impl Into<Cow<'input, str>>, scalar_type: ScalarType) -> Self {
        ScalarValue {
            value: value.into(),
            scalar_type,
            anchor: None,
            tag: None,
            implicit: Implicit::BOTH,
        }
    }
}

/// Properties shared by `SequenceStart` and `MappingStart`.
#[derive(Clone, Debug, PartialEq, Eq, Default)]
pub struct CollectionStart<'input> {
    pub anchor: Option<Cow<'input, str>>,
    pub tag: Option<Tag>,
    pub implicit: bool,
    pub flow: bool,
}

impl CollectionStart<'_> {
    #[must_use]
    pub fn block() -> Self {
        CollectionStart {
            anchor: None,
            tag: None,
            implicit: true,
            flow: false,
        }
    }

    #[must_use]
    pub fn flow() -> Self {
        CollectionStart {
            flow: true,
            ..CollectionStart::block()
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Event<'input> {
    StreamStart,
    StreamEnd,
    DocumentStart {
        explicit: bool,
        version: Option<(u8, u8)>,
        /// `%TAG` directives as `(handle, prefix)` in declaration order.
        tags: Vec<(String, String)>,
    },
    DocumentEnd {
        explicit: bool,
    },
    Alias(Cow<'input, str>),
    Scalar(ScalarValue<'input>),
    SequenceStart(CollectionStart<'input>),
    SequenceEnd,
    MappingStart(CollectionStart<'input>),
    MappingEnd,
}

#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum EventKind {
    StreamStart,
    StreamEnd,
    DocumentStart,
    DocumentEnd,
    Alias,
    Scalar,
    SequenceStart,
    SequenceEnd,
    MappingStart,
    MappingEnd,
}

impl<'input> Event<'input> {
    #[must_use]
    pub fn kind(&self) -> EventKind {
        match self {
            Event::StreamStart => EventKind::StreamStart,
            Event::StreamEnd => EventKind::StreamEnd,
            Event::DocumentStart { .. } => EventKind::DocumentStart,
            Event::DocumentEnd { .. } => EventKind::DocumentEnd,
            Event::Alias(_) => EventKind::Alias,
            Event::Scalar(_) => EventKind::Scalar,
            Event::SequenceStart(_) => EventKind::SequenceStart,
            Event::SequenceEnd => EventKind::SequenceEnd,
            Event::MappingStart(_) => EventKind::MappingStart,
            Event::MappingEnd => EventKind::MappingEnd,
        }
    }

    /// Implicit document start without directives.
    #[must_use]
    pub fn document_start(explicit: bool) -> Self {
        Event::DocumentStart {
            explicit,
            version: None,
            tags: Vec::new(),
        }
    }

    /// Untagged scalar requesting plain style, flagged implicit for every style so
    /// the emitter may pick any of them. Parsed plain scalars carry
    /// [`Implicit::PLAIN`] instead.
    pub fn plain(value: impl Into<Cow<'input, str>>) -> Self {
        Event::Scalar(ScalarValue::new(value, ScalarType::Plain))
    }

    /// Anchor attached to a node event.
    #[must_use]
    pub fn anchor(&self) -> Option<&str> {
        match self {
            Event::Scalar(ScalarValue { anchor, .. })
            | Event::SequenceStart(CollectionStart { anchor, .. })
            | Event::MappingStart(CollectionStart { anchor, .. }) => anchor.as_deref(),
            _ => None,
        }
    }

    #[must_use]
    pub fn tag(&self) -> Option<&Tag> {
        match self {
            Event::Scalar(ScalarValue { tag, .. })
            | Event::SequenceStart(CollectionStart { tag, .. })
            | Event::MappingStart(CollectionStart { tag, .. }) => tag.as_ref(),
            _ => None,
        }
    }

    /// Detaches the event from the input lifetime.
    #[must_use]
    pub fn into_owned(self) -> Event<'static> {
        fn own(cow: Cow<'_, str>) -> Cow<'static, str> {
            Cow::Owned(cow.into_owned())
        }
        match self {
            Event::StreamStart => Event::StreamStart,
            Event::StreamEnd => Event::StreamEnd,
            Event::DocumentStart {
                explicit,
                version,
                tags,
            } => Event::DocumentStart {
                explicit,
                version,
                tags,
            },
            Event::DocumentEnd { explicit } => Event::DocumentEnd { explicit },
            Event::Alias(name) => Event::Alias(own(name)),
            Event::Scalar(ScalarValue {
                value,
                scalar_type,
                anchor,
                tag,
                implicit,
            }) => Event::Scalar(ScalarValue {
                value: own(value),
                scalar_type,
                anchor: anchor.map(own),
                tag,
                implicit,
            }),
            Event::SequenceStart(start) => Event::SequenceStart(start.into_owned()),
            Event::SequenceEnd => Event::SequenceEnd,
            Event::MappingStart(start) => Event::MappingStart(start.into_owned()),
            Event::MappingEnd => Event::MappingEnd,
        }
    }
}

impl CollectionStart<'_> {
    #[must_use]
    pub fn into_owned(self) -> CollectionStart<'static> {
        CollectionStart {
            anchor: self.anchor.map(|x| Cow::Owned(x.into_owned())),
            tag: self.tag,
            implicit: self.implicit,
            flow: self.flow,
        }
    }
}

#[cfg(test)]
mod test {
    use crate::{Event, EventKind, ScalarType, ScalarValue};
    use std::borrow::Cow;

    #[test]
    fn event_kind_and_props() {
        let mut scalar = ScalarValue::new("x", ScalarType::Plain);
        scalar.anchor = Some(Cow::Borrowed("a"));
        let ev = Event::Scalar(scalar);
        assert_eq!(ev.kind(), EventKind::Scalar);
        assert_eq!(ev.anchor(), Some("a"));
        assert_eq!(ev.tag(), None);
        assert_eq!(Event::MappingEnd.anchor(), None);
    }
}
