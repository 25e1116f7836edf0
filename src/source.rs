//! Layers of candidate property values.
//!
//! A [`Source`] is either *stringified* (property name to text, converted
//! during resolution) or *raw* (property key to an already typed value).
//! Sources have identity: clones of one handle compare equal, separately
//! built sources never do.

use std::fmt;
use std::ops::Range;
use std::sync::Arc;

use indexmap::IndexMap;

use crate::property::{Accessor, PropertyKey};
use crate::value::{PropertyValue, Slot, Value};

/// Which part of the pipeline a source plays.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum SourceRole {
    Explicit,
    Defaults,
    Tweak,
}

pub(crate) enum SourceData {
    Stringified(IndexMap<String, Option<String>>),
    Raw(IndexMap<PropertyKey, Slot>),
}

/// The text a stringified source was parsed from, with byte spans per key.
#[derive(Debug, Clone, Default)]
pub struct SourceText {
    pub(crate) text: String,
    pub(crate) key_spans: IndexMap<String, Range<usize>>,
    pub(crate) value_spans: IndexMap<String, Range<usize>>,
}

impl SourceText {
    /// Wrap source text. Spans are added with [`SourceText::span`].
    pub fn new(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            ..Self::default()
        }
    }

    /// Record where `key` and its value sit in the text.
    pub fn span(&mut self, key: impl Into<String>, key_span: Range<usize>, value_span: Range<usize>) {
        let key = key.into();
        self.key_spans.insert(key.clone(), key_span);
        self.value_spans.insert(key, value_span);
    }

    /// The full text.
    pub fn text(&self) -> &str {
        &self.text
    }

    /// Span of `key` in the text.
    pub fn key_span(&self, key: &str) -> Option<Range<usize>> {
        self.key_spans.get(key).cloned()
    }

    /// Span of the value of `key` in the text.
    pub fn value_span(&self, key: &str) -> Option<Range<usize>> {
        self.value_spans.get(key).cloned()
    }
}

struct SourceInner {
    name: String,
    role: SourceRole,
    data: SourceData,
    text: Option<SourceText>,
}

/// One layer of candidate values with a diagnostic name.
#[derive(Clone)]
pub struct Source(Arc<SourceInner>);

impl Source {
    fn build(name: String, role: SourceRole, data: SourceData, text: Option<SourceText>) -> Self {
        Self(Arc::new(SourceInner {
            name,
            role,
            data,
            text,
        }))
    }

    /// A stringified source. A `None` value means explicitly present but null.
    pub fn stringified<I, K, V>(name: impl Into<String>, entries: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: IntoText,
    {
        Self::build(
            name.into(),
            SourceRole::Explicit,
            SourceData::Stringified(collect_entries(entries)),
            None,
        )
    }

    /// A stringified source keeping the text it was parsed from, for diagnostics.
    pub fn stringified_with_text<I, K, V>(
        name: impl Into<String>,
        entries: I,
        text: SourceText,
    ) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: IntoText,
    {
        Self::build(
            name.into(),
            SourceRole::Explicit,
            SourceData::Stringified(collect_entries(entries)),
            Some(text),
        )
    }

    /// Start a raw source.
    pub fn raw(name: impl Into<String>) -> RawSourceBuilder {
        RawSourceBuilder {
            name: name.into(),
            values: IndexMap::new(),
        }
    }

    pub(crate) fn internal(name: String, role: SourceRole, values: IndexMap<PropertyKey, Slot>) -> Self {
        Self::build(name, role, SourceData::Raw(values), None)
    }

    /// The diagnostic name.
    pub fn name(&self) -> &str {
        &self.0.name
    }

    /// Whether values are already typed.
    pub fn is_raw(&self) -> bool {
        matches!(self.0.data, SourceData::Raw(_))
    }

    /// Whether this is the implicit source holding declared defaults.
    pub fn is_defaults(&self) -> bool {
        self.0.role == SourceRole::Defaults
    }

    /// Whether this source holds tweak-stage values.
    pub fn is_tweak(&self) -> bool {
        self.0.role == SourceRole::Tweak
    }

    /// Number of entries.
    pub fn len(&self) -> usize {
        match &self.0.data {
            SourceData::Stringified(entries) => entries.len(),
            SourceData::Raw(values) => values.len(),
        }
    }

    /// Whether the source declares nothing.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// For a stringified source, the text for `name`. The outer `None` means
    /// absent, the inner `None` explicit null.
    pub fn string_value(&self, name: &str) -> Option<Option<&str>> {
        match &self.0.data {
            SourceData::Stringified(entries) => entries.get(name).map(Option::as_deref),
            SourceData::Raw(_) => None,
        }
    }

    /// For a raw source, the value for `key`.
    pub fn raw_value(&self, key: &PropertyKey) -> Option<&Slot> {
        match &self.0.data {
            SourceData::Raw(values) => values.get(key),
            SourceData::Stringified(_) => None,
        }
    }

    /// The parsed text, if the producer kept it.
    pub fn text(&self) -> Option<&SourceText> {
        self.0.text.as_ref()
    }

    pub(crate) fn role(&self) -> SourceRole {
        self.0.role
    }

    pub(crate) fn data(&self) -> &SourceData {
        &self.0.data
    }
}

impl PartialEq for Source {
    fn eq(&self, other: &Self) -> bool {
        Arc::ptr_eq(&self.0, &other.0)
    }
}

impl Eq for Source {}

impl fmt::Debug for Source {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let kind = if self.is_raw() { "raw" } else { "stringified" };
        write!(f, "Source({}, {kind}, {} entries)", self.0.name, self.len())
    }
}

impl fmt::Display for Source {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0.name)
    }
}

/// Values accepted by [`Source::stringified`]; `None` is an explicit null.
pub trait IntoText {
    /// Convert into an optional string.
    fn into_text(self) -> Option<String>;
}

impl IntoText for &str {
    fn into_text(self) -> Option<String> {
        Some(self.to_string())
    }
}

impl IntoText for String {
    fn into_text(self) -> Option<String> {
        Some(self)
    }
}

impl IntoText for &String {
    fn into_text(self) -> Option<String> {
        Some(self.clone())
    }
}

impl IntoText for Option<&str> {
    fn into_text(self) -> Option<String> {
        self.map(str::to_string)
    }
}

impl IntoText for Option<String> {
    fn into_text(self) -> Option<String> {
        self
    }
}

fn collect_entries<I, K, V>(entries: I) -> IndexMap<String, Option<String>>
where
    I: IntoIterator<Item = (K, V)>,
    K: Into<String>,
    V: IntoText,
{
    entries
        .into_iter()
        .map(|(key, value)| (key.into(), value.into_text()))
        .collect()
}

// ============================================================================
// RawSourceBuilder
// ============================================================================

/// Builder for a raw source.
#[derive(Debug)]
pub struct RawSourceBuilder {
    name: String,
    values: IndexMap<PropertyKey, Slot>,
}

impl RawSourceBuilder {
    /// Set a typed value.
    pub fn set<T: PropertyValue>(mut self, accessor: Accessor<T>, value: T) -> Self {
        self.values.insert(accessor.key, Slot::of(value));
        self
    }

    /// Set an explicit null.
    pub fn set_null<T>(mut self, accessor: Accessor<T>) -> Self {
        self.values.insert(accessor.key, Slot::ExplicitNull);
        self
    }

    /// Set an untyped value. It is type-checked during resolution.
    pub fn insert(mut self, key: PropertyKey, value: Value) -> Self {
        self.values.insert(key, Slot::Present(value));
        self
    }

    /// Finish the source.
    pub fn build(self) -> Source {
        Source::internal(self.name, SourceRole::Explicit, self.values)
    }
}
