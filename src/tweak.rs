//! Replacement values computed by [`Schema::tweak`](crate::Schema::tweak).
//!
//! Tweaks run after first-pass resolution, so they can derive one property
//! from others:
//!
//! ```rust,ignore
//! fn tweak(&self, configuration: &Configuration<Self>) -> Tweaks {
//!     let mut tweaks = Tweaks::new();
//!     if configuration.try_get(self.workers).is_none() {
//!         tweaks.set(self.workers, configuration.get(self.cores) * 2);
//!     }
//!     tweaks
//! }
//! ```

use indexmap::IndexMap;

use crate::property::{Accessor, PropertyKey, PropertyRef};
use crate::value::{PropertyValue, Value};

/// One replacement: a value (`None` for null) and its text.
#[derive(Debug, Clone, PartialEq)]
pub struct TweakedValue {
    /// The new value, `None` for an explicit null.
    pub value: Option<Value>,
    /// The text reported by inspection, defaults to the value's rendering.
    pub text: Option<String>,
}

/// Replacement values keyed by property.
#[derive(Debug, Clone, Default)]
pub struct Tweaks {
    entries: IndexMap<PropertyKey, TweakedValue>,
}

impl Tweaks {
    /// No replacements.
    pub fn new() -> Self {
        Self::default()
    }

    /// Replace a property with a typed value.
    pub fn set<T: PropertyValue>(&mut self, accessor: Accessor<T>, value: T) -> &mut Self {
        self.insert(accessor, Some(Value::new(value)), None)
    }

    /// Replace a property with a typed value and the text to report for it.
    pub fn set_with_text<T: PropertyValue>(
        &mut self,
        accessor: Accessor<T>,
        value: T,
        text: impl Into<String>,
    ) -> &mut Self {
        self.insert(accessor, Some(Value::new(value)), Some(text.into()))
    }

    /// Replace a property with null.
    pub fn set_null<T>(&mut self, accessor: Accessor<T>) -> &mut Self {
        self.insert(accessor, None, None)
    }

    /// Replace a property with an untyped value. It is type-checked when applied.
    pub fn insert(
        &mut self,
        property: impl PropertyRef,
        value: Option<Value>,
        text: Option<String>,
    ) -> &mut Self {
        self.entries
            .insert(property.property_key(), TweakedValue { value, text });
        self
    }

    /// Whether there is nothing to apply.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Number of replacements.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Iterate in insertion order.
    pub fn iter(&self) -> impl Iterator<Item = (&PropertyKey, &TweakedValue)> {
        self.entries.iter()
    }
}

impl IntoIterator for Tweaks {
    type Item = (PropertyKey, TweakedValue);
    type IntoIter = indexmap::map::IntoIter<PropertyKey, TweakedValue>;

    fn into_iter(self) -> Self::IntoIter {
        self.entries.into_iter()
    }
}
