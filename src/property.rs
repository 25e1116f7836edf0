//! Property descriptors and typed accessors.

use std::any::TypeId;
use std::fmt;
use std::hash::{Hash, Hasher};
use std::marker::PhantomData;
use std::sync::Arc;

use crate::converter::ErasedConverter;
use crate::obfuscator::Obfuscator;
use crate::value::{Slot, ValueType};

// ============================================================================
// PropertyKey / Accessor
// ============================================================================

/// Identity of one declared field: the schema it belongs to and its position.
///
/// Keys compare by schema type and index only.
#[derive(Clone, Copy)]
pub struct PropertyKey {
    pub(crate) schema: TypeId,
    pub(crate) schema_name: &'static str,
    pub(crate) field: &'static str,
    pub(crate) index: usize,
}

impl PropertyKey {
    /// The name of the schema declaring this field.
    pub fn schema_name(&self) -> &'static str {
        self.schema_name
    }

    /// The declared field name.
    pub fn field(&self) -> &'static str {
        self.field
    }

    pub(crate) fn index(&self) -> usize {
        self.index
    }
}

impl PartialEq for PropertyKey {
    fn eq(&self, other: &Self) -> bool {
        self.schema == other.schema && self.index == other.index
    }
}

impl Eq for PropertyKey {}

impl Hash for PropertyKey {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.schema.hash(state);
        self.index.hash(state);
    }
}

impl fmt::Debug for PropertyKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}::{}", self.schema_name, self.field)
    }
}

impl fmt::Display for PropertyKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}::{}", self.schema_name, self.field)
    }
}

/// A typed handle to one declared property.
///
/// Returned by [`PropertySetup::finish`](crate::PropertySetup::finish) and
/// passed to [`Configuration::get`](crate::Configuration::get).
pub struct Accessor<T> {
    pub(crate) key: PropertyKey,
    marker: PhantomData<fn() -> T>,
}

impl<T> Accessor<T> {
    pub(crate) fn new(key: PropertyKey) -> Self {
        Self {
            key,
            marker: PhantomData,
        }
    }

    /// The untyped key.
    pub fn key(&self) -> PropertyKey {
        self.key
    }
}

impl<T> Clone for Accessor<T> {
    fn clone(&self) -> Self {
        *self
    }
}

impl<T> Copy for Accessor<T> {}

impl<T> PartialEq for Accessor<T> {
    fn eq(&self, other: &Self) -> bool {
        self.key == other.key
    }
}

impl<T> Eq for Accessor<T> {}

impl<T> fmt::Debug for Accessor<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Accessor({})", self.key)
    }
}

// ============================================================================
// Property
// ============================================================================

/// A resolved default: the value and the text it was written as.
#[derive(Debug, Clone)]
pub(crate) struct DefaultValue {
    pub(crate) slot: Slot,
    pub(crate) text: Option<String>,
}

pub(crate) struct PropertyInner {
    pub(crate) key: PropertyKey,
    pub(crate) name: String,
    pub(crate) value_type: ValueType,
    pub(crate) converter: ErasedConverter,
    pub(crate) default: Option<DefaultValue>,
    pub(crate) maybe_null: bool,
    pub(crate) obfuscator: Option<Obfuscator>,
    pub(crate) documentation: String,
}

/// Immutable description of one configuration property.
///
/// Cheap to clone. Two descriptors are equal when they describe the same
/// declared field.
#[derive(Clone)]
pub struct Property(pub(crate) Arc<PropertyInner>);

impl Property {
    /// The property name, after naming policies.
    pub fn name(&self) -> &str {
        &self.0.name
    }

    /// The declaring field's key.
    pub fn key(&self) -> PropertyKey {
        self.0.key
    }

    /// The declared field name.
    pub fn field(&self) -> &'static str {
        self.0.key.field
    }

    /// The declared type.
    pub fn value_type(&self) -> ValueType {
        self.0.value_type
    }

    /// Name of the converter used for stringified sources.
    pub fn converter_name(&self) -> &str {
        self.0.converter.name()
    }

    /// The default value, if one was declared.
    pub fn default_value(&self) -> Option<&Slot> {
        self.0.default.as_ref().map(|default| &default.slot)
    }

    /// The default value's string form, if one was declared and it is not null.
    pub fn default_value_as_string(&self) -> Option<&str> {
        self.0
            .default
            .as_ref()
            .and_then(|default| default.text.as_deref())
    }

    /// Whether a default was declared.
    pub fn has_default(&self) -> bool {
        self.0.default.is_some()
    }

    /// Whether the property was declared maybe-null.
    pub fn maybe_null(&self) -> bool {
        self.0.maybe_null
    }

    /// Whether an explicit null is a legal value.
    pub fn accepts_null(&self) -> bool {
        self.0.maybe_null || self.0.value_type.is_nullable()
    }

    /// The obfuscator, if one was declared.
    pub fn obfuscator(&self) -> Option<&Obfuscator> {
        self.0.obfuscator.as_ref()
    }

    /// Apply the obfuscator, or return the value unchanged.
    pub fn obfuscate(&self, value: &str, replacement: &str) -> String {
        match &self.0.obfuscator {
            Some(obfuscator) => obfuscator.apply(value, replacement),
            None => value.to_string(),
        }
    }

    /// Free-text documentation.
    pub fn documentation(&self) -> &str {
        &self.0.documentation
    }

    pub(crate) fn converter(&self) -> &ErasedConverter {
        &self.0.converter
    }
}

impl PartialEq for Property {
    fn eq(&self, other: &Self) -> bool {
        self.0.key == other.0.key
    }
}

impl Eq for Property {}

impl Hash for Property {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.0.key.hash(state);
    }
}

impl fmt::Debug for Property {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Property")
            .field("name", &self.0.name)
            .field("field", &self.0.key.field)
            .field("type", &self.0.value_type.name())
            .finish()
    }
}

impl fmt::Display for Property {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0.name)
    }
}

// ============================================================================
// PropertyRef
// ============================================================================

/// Anything naming one property: a [`Property`], an [`Accessor`] or a [`PropertyKey`].
pub trait PropertyRef {
    /// The key of the named property.
    fn property_key(&self) -> PropertyKey;
}

impl PropertyRef for PropertyKey {
    fn property_key(&self) -> PropertyKey {
        *self
    }
}

impl PropertyRef for Property {
    fn property_key(&self) -> PropertyKey {
        self.0.key
    }
}

impl<T> PropertyRef for Accessor<T> {
    fn property_key(&self) -> PropertyKey {
        self.key
    }
}

impl<R: PropertyRef + ?Sized> PropertyRef for &R {
    fn property_key(&self) -> PropertyKey {
        (**self).property_key()
    }
}
