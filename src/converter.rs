//! String to value conversion.
//!
//! A [`Converter<T>`] turns the raw text of a stringified source into a `T`.
//! [`Converters`] is the per-type table consulted when a property does not
//! name its own converter.

use std::any::TypeId;
use std::error::Error;
use std::fmt;
use std::path::PathBuf;
use std::str::FromStr;
use std::sync::Arc;

use camino::Utf8PathBuf;
use indexmap::IndexMap;

use crate::value::{PropertyValue, Slot};

/// The error type converters return.
pub type BoxError = Box<dyn Error + Send + Sync>;

type ConvertFn<T> = dyn Fn(&str) -> Result<T, BoxError> + Send + Sync;

// ============================================================================
// Converter
// ============================================================================

/// A named conversion from text to `T`.
pub struct Converter<T> {
    name: Arc<str>,
    convert: Arc<ConvertFn<T>>,
}

impl<T: PropertyValue> Converter<T> {
    /// Create a converter from a function. The name shows up in conversion errors.
    pub fn new<F>(name: impl Into<Arc<str>>, convert: F) -> Self
    where
        F: Fn(&str) -> Result<T, BoxError> + Send + Sync + 'static,
    {
        Self {
            name: name.into(),
            convert: Arc::new(convert),
        }
    }

    /// A converter using `T`'s [`FromStr`] implementation on the trimmed text.
    pub fn from_str() -> Self
    where
        T: FromStr,
        T::Err: Error + Send + Sync + 'static,
    {
        Self::new(std::any::type_name::<T>(), |text: &str| {
            text.trim().parse::<T>().map_err(BoxError::from)
        })
    }

    /// The converter's name.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Run the conversion.
    pub fn convert(&self, text: &str) -> Result<T, BoxError> {
        (self.convert)(text)
    }

    pub(crate) fn erase(self) -> ErasedConverter {
        let convert = self.convert;
        ErasedConverter {
            name: self.name,
            convert: Arc::new(move |text: &str| convert(text).map(Slot::of)),
        }
    }
}

impl<T> Clone for Converter<T> {
    fn clone(&self) -> Self {
        Self {
            name: self.name.clone(),
            convert: self.convert.clone(),
        }
    }
}

impl<T> fmt::Debug for Converter<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("Converter").field(&self.name).finish()
    }
}

/// A converter with its target type erased, producing [`Slot`]s.
#[derive(Clone)]
pub(crate) struct ErasedConverter {
    name: Arc<str>,
    convert: Arc<ConvertFn<Slot>>,
}

impl ErasedConverter {
    pub(crate) fn name(&self) -> &str {
        &self.name
    }

    pub(crate) fn convert(&self, text: &str) -> Result<Slot, BoxError> {
        (self.convert)(text)
    }
}

impl fmt::Debug for ErasedConverter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("ErasedConverter").field(&self.name).finish()
    }
}

// ============================================================================
// Converters
// ============================================================================

/// A table of converters keyed by target type.
#[derive(Clone, Default)]
pub struct Converters {
    table: IndexMap<TypeId, ErasedConverter>,
}

impl Converters {
    /// An empty table.
    pub fn new() -> Self {
        Self::default()
    }

    /// The built-in table: strings, numbers, booleans, chars and paths,
    /// each with an `Option` variant that maps empty text to `None`.
    pub fn defaults() -> Self {
        let mut converters = Self::new();
        converters
            .insert(Converter::<String>::new("string", |text| Ok(text.to_string())))
            .insert(Converter::<Option<String>>::new("optional string", |text| {
                Ok(Some(text.to_string()))
            }))
            .insert(Converter::<bool>::new("lenient bool", |text| {
                Ok(lenient_bool(text))
            }))
            .insert(Converter::<Option<bool>>::new(
                "optional lenient bool",
                |text| Ok(non_empty(text).map(lenient_bool)),
            ))
            .insert(Converter::<char>::new("char", parse_char))
            .insert(Converter::<Option<char>>::new("optional char", |text| {
                non_empty(text).map(parse_char).transpose()
            }))
            .insert(Converter::<Utf8PathBuf>::new("path", |text| {
                non_empty(text)
                    .map(Utf8PathBuf::from)
                    .ok_or_else(|| BoxError::from("empty path"))
            }))
            .insert(Converter::<Option<Utf8PathBuf>>::new(
                "optional path",
                |text| Ok(non_empty(text).map(Utf8PathBuf::from)),
            ))
            .insert(Converter::<PathBuf>::new("path", |text| {
                non_empty(text)
                    .map(PathBuf::from)
                    .ok_or_else(|| BoxError::from("empty path"))
            }))
            .insert(Converter::<Option<PathBuf>>::new("optional path", |text| {
                Ok(non_empty(text).map(PathBuf::from))
            }));

        macro_rules! numbers {
            ($($ty:ty),* $(,)?) => {
                $(
                    converters
                        .insert(Converter::<$ty>::new(stringify!($ty), |text| {
                            text.trim().parse::<$ty>().map_err(BoxError::from)
                        }))
                        .insert(Converter::<Option<$ty>>::new(
                            concat!("optional ", stringify!($ty)),
                            |text| {
                                non_empty(text)
                                    .map(|text| text.trim().parse::<$ty>())
                                    .transpose()
                                    .map_err(BoxError::from)
                            },
                        ));
                )*
            };
        }
        numbers!(i8, i16, i32, i64, isize, u8, u16, u32, u64, usize, f32, f64);

        converters
    }

    /// Add or replace the converter for `T`.
    pub fn insert<T: PropertyValue>(&mut self, converter: Converter<T>) -> &mut Self {
        self.table.insert(TypeId::of::<T>(), converter.erase());
        self
    }

    /// Builder-style [`Converters::insert`].
    pub fn with<T: PropertyValue>(mut self, converter: Converter<T>) -> Self {
        self.insert(converter);
        self
    }

    /// Whether a converter for `T` is registered.
    pub fn contains<T: PropertyValue>(&self) -> bool {
        self.table.contains_key(&TypeId::of::<T>())
    }

    pub(crate) fn get(&self, target: TypeId) -> Option<&ErasedConverter> {
        self.table.get(&target)
    }
}

impl fmt::Debug for Converters {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_list()
            .entries(self.table.values().map(ErasedConverter::name))
            .finish()
    }
}

fn non_empty(text: &str) -> Option<&str> {
    if text.is_empty() { None } else { Some(text) }
}

fn lenient_bool(text: &str) -> bool {
    text.trim().eq_ignore_ascii_case("true")
}

fn parse_char(text: &str) -> Result<char, BoxError> {
    let mut chars = text.chars();
    match (chars.next(), chars.next()) {
        (Some(c), None) => Ok(c),
        _ => Err(format!("expected exactly one character, got '{text}'").into()),
    }
}
