#![warn(missing_docs)]
#![deny(unsafe_code)]
#![doc = include_str!("../README.md")]

pub(crate) mod macros;

pub(crate) mod color;
pub(crate) mod configuration;
pub(crate) mod converter;
pub(crate) mod diagnostics;
pub(crate) mod driver;
pub(crate) mod error;
pub(crate) mod inspector;
pub(crate) mod naming;
pub(crate) mod obfuscator;
pub(crate) mod property;
pub(crate) mod provenance;
pub(crate) mod registry;
pub(crate) mod source;
pub(crate) mod template;
pub(crate) mod tweak;
pub(crate) mod validation;
pub(crate) mod value;

pub mod dump;
pub mod help;
pub mod layers;

// ==========================================
// PUBLIC INTERFACE
// ==========================================

pub use color::{ColorChoice, should_use_color};
pub use configuration::Configuration;
pub use converter::{BoxError, Converter, Converters};
pub use driver::{DEFAULTS_SOURCE, Factory, TWEAKS_SOURCE};
pub use error::{
    CommandLineError, ConfigurationError, ConvertError, DefinitionError, DefinitionProblem,
    SourceError,
};
pub use inspector::Inspector;
pub use naming::NameTransformer;
pub use obfuscator::Obfuscator;
pub use property::{Accessor, Property, PropertyKey, PropertyRef};
pub use provenance::{Origin, ValuedProperty};
pub use registry::Registry;
pub use source::{IntoText, RawSourceBuilder, Source, SourceText};
pub use template::{PropertySetup, Schema, Template};
pub use tweak::{TweakedValue, Tweaks};
pub use validation::{Accumulator, Bad, Location, Part};
pub use value::{PropertyValue, Slot, Value, ValueType};
