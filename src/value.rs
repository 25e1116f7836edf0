//! Typed property values.
//!
//! Every property has a declared Rust type implementing [`PropertyValue`].
//! Internally values travel type-erased as [`Value`], and each resolved
//! property holds a tri-state [`Slot`] so that "never set" and "explicitly
//! null" stay distinguishable all the way to the accessor.

use std::any::{Any, TypeId};
use std::fmt;
use std::path::PathBuf;
use std::sync::Arc;

use camino::Utf8PathBuf;

// ============================================================================
// PropertyValue
// ============================================================================

/// A type that can be the declared type of a configuration property.
pub trait PropertyValue: Clone + PartialEq + fmt::Debug + Send + Sync + 'static {
    /// `true` when the type itself models absence, like `Option<T>`.
    const NULLABLE: bool = false;

    /// The value an accessor returns for an explicitly null property.
    ///
    /// `None` means the type has no zero value, so it cannot hold null.
    fn null() -> Option<Self> {
        None
    }

    /// The string form shown by `Display` of a configuration and by inspection.
    fn render(&self) -> String;

    /// Whether this value is the null representation of its type.
    fn is_null(&self) -> bool {
        false
    }

    /// Accept a value of a neighbouring type.
    ///
    /// The default accepts `Option<Self>`: `Some(v)` widens to `v` and
    /// `None` to an explicit null.
    fn widen(value: &dyn Any) -> Option<Slot> {
        value
            .downcast_ref::<Option<Self>>()
            .map(|value| match value {
                Some(value) => Slot::Present(Value::new(value.clone())),
                None => Slot::ExplicitNull,
            })
    }
}

macro_rules! zeroed_values {
    ($($ty:ty => $zero:expr),* $(,)?) => {
        $(
            impl PropertyValue for $ty {
                fn null() -> Option<Self> {
                    Some($zero)
                }

                fn render(&self) -> String {
                    self.to_string()
                }
            }
        )*
    };
}

zeroed_values!(
    bool => false,
    i8 => 0,
    i16 => 0,
    i32 => 0,
    i64 => 0,
    isize => 0,
    u8 => 0,
    u16 => 0,
    u32 => 0,
    u64 => 0,
    usize => 0,
    f32 => 0.0,
    f64 => 0.0,
    char => '\0',
);

impl PropertyValue for String {
    fn render(&self) -> String {
        self.clone()
    }
}

impl PropertyValue for Utf8PathBuf {
    fn render(&self) -> String {
        self.to_string()
    }
}

impl PropertyValue for PathBuf {
    fn render(&self) -> String {
        self.display().to_string()
    }
}

impl<T: PropertyValue> PropertyValue for Option<T> {
    const NULLABLE: bool = true;

    fn null() -> Option<Self> {
        Some(None)
    }

    fn render(&self) -> String {
        match self {
            Some(value) => value.render(),
            None => "null".to_string(),
        }
    }

    fn is_null(&self) -> bool {
        self.is_none()
    }

    fn widen(value: &dyn Any) -> Option<Slot> {
        value
            .downcast_ref::<T>()
            .map(|value| Slot::Present(Value::new(Some(value.clone()))))
    }
}

// ============================================================================
// Value
// ============================================================================

trait AnyValue: Any + Send + Sync {
    fn as_any(&self) -> &dyn Any;
    fn eq_dyn(&self, other: &dyn AnyValue) -> bool;
    fn render(&self) -> String;
    fn is_null(&self) -> bool;
    fn type_name(&self) -> &'static str;
    fn debug(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result;
}

impl<T: PropertyValue> AnyValue for T {
    fn as_any(&self) -> &dyn Any {
        self
    }

    fn eq_dyn(&self, other: &dyn AnyValue) -> bool {
        other
            .as_any()
            .downcast_ref::<T>()
            .is_some_and(|other| self == other)
    }

    fn render(&self) -> String {
        PropertyValue::render(self)
    }

    fn is_null(&self) -> bool {
        PropertyValue::is_null(self)
    }

    fn type_name(&self) -> &'static str {
        std::any::type_name::<T>()
    }

    fn debug(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Debug::fmt(self, f)
    }
}

/// A type-erased property value.
///
/// Cloning is cheap; the payload is shared.
#[derive(Clone)]
pub struct Value(Arc<dyn AnyValue>);

impl Value {
    /// Wrap a typed value.
    pub fn new<T: PropertyValue>(value: T) -> Self {
        Self(Arc::new(value))
    }

    /// Borrow the payload as `T`, if that is its type.
    pub fn downcast_ref<T: 'static>(&self) -> Option<&T> {
        self.0.as_any().downcast_ref::<T>()
    }

    /// The [`TypeId`] of the payload.
    pub fn type_id(&self) -> TypeId {
        self.0.as_any().type_id()
    }

    /// The Rust type name of the payload.
    pub fn type_name(&self) -> &'static str {
        self.0.type_name()
    }

    /// The payload's string form.
    pub fn render(&self) -> String {
        self.0.render()
    }
}

impl PartialEq for Value {
    fn eq(&self, other: &Self) -> bool {
        self.0.eq_dyn(other.0.as_ref())
    }
}

impl fmt::Debug for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.debug(f)
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.render())
    }
}

// ============================================================================
// Slot
// ============================================================================

/// The resolved state of one property.
#[derive(Debug, Clone, PartialEq, Default)]
pub enum Slot {
    /// No source provided a value.
    #[default]
    Unset,
    /// A source explicitly provided null.
    ExplicitNull,
    /// A concrete value.
    Present(Value),
}

impl Slot {
    /// Build a slot from a typed value, mapping the type's null to [`Slot::ExplicitNull`].
    pub fn of<T: PropertyValue>(value: T) -> Self {
        if value.is_null() {
            Slot::ExplicitNull
        } else {
            Slot::Present(Value::new(value))
        }
    }

    /// Whether any source provided something, null included.
    pub fn is_set(&self) -> bool {
        !matches!(self, Slot::Unset)
    }

    /// The concrete value, if there is one.
    pub fn value(&self) -> Option<&Value> {
        match self {
            Slot::Present(value) => Some(value),
            _ => None,
        }
    }

    /// Read the slot as `T`. Null reads as `T::null()`, unset reads as `None`.
    pub(crate) fn read<T: PropertyValue>(&self) -> Option<T> {
        match self {
            Slot::Unset => None,
            Slot::ExplicitNull => T::null(),
            Slot::Present(value) => value.downcast_ref::<T>().cloned(),
        }
    }

    /// The string form of the slot, `None` for null or unset.
    pub fn render(&self) -> Option<String> {
        self.value().map(Value::render)
    }
}

// ============================================================================
// ValueType
// ============================================================================

/// Runtime description of a declared property type.
#[derive(Debug, Clone, Copy)]
pub struct ValueType {
    id: TypeId,
    name: &'static str,
    nullable: bool,
    has_null: bool,
    widen: fn(&dyn Any) -> Option<Slot>,
}

impl ValueType {
    /// Describe `T`.
    pub fn of<T: PropertyValue>() -> Self {
        Self {
            id: TypeId::of::<T>(),
            name: std::any::type_name::<T>(),
            nullable: T::NULLABLE,
            has_null: T::null().is_some(),
            widen: T::widen,
        }
    }

    /// The [`TypeId`] of the declared type.
    pub fn id(&self) -> TypeId {
        self.id
    }

    /// The Rust type name of the declared type.
    pub fn name(&self) -> &'static str {
        self.name
    }

    /// Whether the type models absence itself (`Option<T>`).
    pub fn is_nullable(&self) -> bool {
        self.nullable
    }

    /// Whether reading null yields a value (`None`, zero, `false`).
    pub fn has_null(&self) -> bool {
        self.has_null
    }

    /// Check a value against this type, widening where permitted.
    ///
    /// Returns `None` when the value cannot be assigned.
    pub(crate) fn coerce(&self, value: &Value) -> Option<Slot> {
        if value.type_id() == self.id {
            if value.0.is_null() {
                return Some(Slot::ExplicitNull);
            }
            return Some(Slot::Present(value.clone()));
        }
        (self.widen)(value.0.as_any())
    }
}

impl PartialEq for ValueType {
    fn eq(&self, other: &Self) -> bool {
        self.id == other.id
    }
}
