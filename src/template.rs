//! Schema declaration.
//!
//! A schema is a Rust type implementing [`Schema`]. Its `declare` function
//! receives a [`Template`], declares one field per property, and returns the
//! typed [`Accessor`]s that application code later reads through:
//!
//! ```rust
//! use wrench::{Accessor, Schema, Template};
//!
//! struct Server {
//!     host: Accessor<String>,
//!     port: Accessor<u16>,
//! }
//!
//! impl Schema for Server {
//!     const NAME: &'static str = "Server";
//!
//!     fn declare(t: &mut Template<Self>) -> Self {
//!         Server {
//!             host: t.field("host").default_value("localhost".to_string()).finish(),
//!             port: t
//!                 .field("port")
//!                 .default_literal("8080")
//!                 .documentation("Port to listen on")
//!                 .finish(),
//!         }
//!     }
//! }
//! ```

use std::any::TypeId;
use std::marker::PhantomData;

use crate::configuration::Configuration;
use crate::converter::{Converter, Converters, ErasedConverter};
use crate::error::DefinitionProblem;
use crate::naming::NameTransformer;
use crate::obfuscator::Obfuscator;
use crate::property::{Accessor, PropertyKey};
use crate::tweak::Tweaks;
use crate::validation::Bad;
use crate::value::{PropertyValue, Slot, ValueType};

// ============================================================================
// Schema
// ============================================================================

/// A configuration type.
pub trait Schema: Sized + Send + Sync + 'static {
    /// Name used by `Display` and diagnostics.
    const NAME: &'static str;

    /// Declare every property and return the accessors.
    fn declare(template: &mut Template<Self>) -> Self;

    /// Compute replacement values after first-pass resolution.
    fn tweak(&self, _configuration: &Configuration<Self>) -> Tweaks {
        Tweaks::new()
    }

    /// Check whole-object rules. Every returned finding is reported.
    fn validate(&self, _configuration: &Configuration<Self>) -> Vec<Bad> {
        Vec::new()
    }
}

// ============================================================================
// Template
// ============================================================================

pub(crate) enum DefaultSetup {
    Value { slot: Slot, text: Option<String> },
    Literal(String),
}

pub(crate) struct FieldSetup {
    pub(crate) key: PropertyKey,
    pub(crate) value_type: ValueType,
    pub(crate) name: Option<String>,
    pub(crate) name_transformer: Option<NameTransformer>,
    pub(crate) default: Option<DefaultSetup>,
    pub(crate) maybe_null: bool,
    pub(crate) converter: Option<ErasedConverter>,
    pub(crate) obfuscator: Option<Obfuscator>,
    pub(crate) documentation: String,
}

/// Collects field declarations for one schema.
pub struct Template<S> {
    pub(crate) fields: Vec<FieldSetup>,
    pub(crate) name_transformer: NameTransformer,
    pub(crate) converters: Converters,
    pub(crate) problems: Vec<DefinitionProblem>,
    schema: PhantomData<fn() -> S>,
}

impl<S: Schema> Template<S> {
    pub(crate) fn new() -> Self {
        Self {
            fields: Vec::new(),
            name_transformer: NameTransformer::Identity,
            converters: Converters::defaults(),
            problems: Vec::new(),
            schema: PhantomData,
        }
    }

    /// Declare a field of type `T`.
    pub fn field<T: PropertyValue>(&mut self, field: &'static str) -> PropertySetup<'_, S, T> {
        if field.is_empty() {
            self.problems.push(DefinitionProblem::EmptyFieldName);
        } else if self.fields.iter().any(|setup| setup.key.field == field) {
            self.problems.push(DefinitionProblem::DuplicateField { field });
        }

        let index = self.fields.len();
        let key = PropertyKey {
            schema: TypeId::of::<S>(),
            schema_name: S::NAME,
            field,
            index,
        };
        self.fields.push(FieldSetup {
            key,
            value_type: ValueType::of::<T>(),
            name: None,
            name_transformer: None,
            default: None,
            maybe_null: false,
            converter: None,
            obfuscator: None,
            documentation: String::new(),
        });
        PropertySetup {
            template: self,
            index,
            marker: PhantomData,
        }
    }

    /// Reopen the setup of an already declared field.
    pub fn property<T: PropertyValue>(&mut self, accessor: Accessor<T>) -> PropertySetup<'_, S, T> {
        PropertySetup {
            template: self,
            index: accessor.key.index,
            marker: PhantomData,
        }
    }

    /// Set the schema-wide naming policy.
    pub fn name_transformer(&mut self, transformer: NameTransformer) -> &mut Self {
        self.name_transformer = transformer;
        self
    }

    /// Register a converter for every field of type `T`.
    pub fn converter<T: PropertyValue>(&mut self, converter: Converter<T>) -> &mut Self {
        self.converters.insert(converter);
        self
    }

    /// Replace the whole converter table.
    pub fn converters(&mut self, converters: Converters) -> &mut Self {
        self.converters = converters;
        self
    }
}

// ============================================================================
// PropertySetup
// ============================================================================

/// Per-field setup, finished with [`PropertySetup::finish`].
#[must_use = "call `finish()` to obtain the accessor"]
pub struct PropertySetup<'t, S, T> {
    template: &'t mut Template<S>,
    index: usize,
    marker: PhantomData<fn() -> T>,
}

impl<S: Schema, T: PropertyValue> PropertySetup<'_, S, T> {
    fn setup(&mut self) -> &mut FieldSetup {
        &mut self.template.fields[self.index]
    }

    fn set_default(&mut self, default: DefaultSetup) {
        let setup = self.setup();
        let field = setup.key.field;
        if setup.default.replace(default).is_some() {
            self.template
                .problems
                .push(DefinitionProblem::DefaultDeclaredTwice { field });
        }
    }

    /// Use an explicit property name.
    pub fn name(mut self, name: impl Into<String>) -> Self {
        self.setup().name = Some(name.into());
        self
    }

    /// Derive the property name from the field name with this policy.
    pub fn name_transformer(mut self, transformer: NameTransformer) -> Self {
        self.setup().name_transformer = Some(transformer);
        self
    }

    /// Default to a typed value.
    pub fn default_value(mut self, value: T) -> Self {
        let text = if value.is_null() {
            None
        } else {
            Some(value.render())
        };
        self.set_default(DefaultSetup::Value {
            slot: Slot::of(value),
            text,
        });
        self
    }

    /// Default to the conversion of `literal`, checked when the registry is built.
    pub fn default_literal(mut self, literal: impl Into<String>) -> Self {
        self.set_default(DefaultSetup::Literal(literal.into()));
        self
    }

    /// Resolve to null instead of failing when no source has a value.
    pub fn maybe_null(mut self) -> Self {
        self.setup().maybe_null = true;
        self
    }

    /// Convert text with this converter instead of the table's.
    pub fn converter(mut self, converter: Converter<T>) -> Self {
        self.setup().converter = Some(converter.erase());
        self
    }

    /// Redact the value in inspection output.
    pub fn obfuscator(mut self, obfuscator: Obfuscator) -> Self {
        self.setup().obfuscator = Some(obfuscator);
        self
    }

    /// Attach documentation, shown in help output.
    pub fn documentation(mut self, documentation: impl Into<String>) -> Self {
        self.setup().documentation = documentation.into();
        self
    }

    /// Finish the field and return its accessor.
    pub fn finish(self) -> Accessor<T> {
        Accessor::new(self.template.fields[self.index].key)
    }
}
