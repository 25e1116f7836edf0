//! The immutable set of property descriptors of one schema.

use std::any::TypeId;
use std::sync::Arc;

use indexmap::IndexMap;

#[allow(unused_imports)]
use crate::macros::{debug, trace};
use crate::error::{DefinitionError, DefinitionProblem};
use crate::property::{DefaultValue, Property, PropertyInner, PropertyKey};
use crate::template::{DefaultSetup, FieldSetup, Schema, Template};

/// Name to descriptor map for one schema, built once and shared by every
/// configuration created from it.
#[derive(Debug)]
pub struct Registry {
    schema: TypeId,
    schema_name: &'static str,
    by_index: Vec<Property>,
    by_name: IndexMap<String, Property>,
}

impl Registry {
    /// Build the registry for `S`, reporting every definition problem at once.
    pub fn of<S: Schema>() -> Result<(S, Registry), DefinitionError> {
        let mut template = Template::<S>::new();
        let schema = S::declare(&mut template);
        let registry = Registry::build(template)?;
        Ok((schema, registry))
    }

    pub(crate) fn build<S: Schema>(template: Template<S>) -> Result<Registry, DefinitionError> {
        let Template {
            fields,
            name_transformer,
            converters,
            mut problems,
            ..
        } = template;

        let mut by_index = Vec::with_capacity(fields.len());
        let mut by_name: IndexMap<String, Property> = IndexMap::with_capacity(fields.len());

        for setup in fields {
            let FieldSetup {
                key,
                value_type,
                name,
                name_transformer: field_transformer,
                default,
                maybe_null,
                converter,
                obfuscator,
                documentation,
            } = setup;
            let field = key.field;

            // Name: explicit > field policy > schema policy > field name.
            let name = match (name, field_transformer) {
                (Some(name), None) => name,
                (None, Some(transformer)) => transformer.apply(field),
                (None, None) => name_transformer.apply(field),
                (Some(name), Some(_)) => {
                    problems.push(DefinitionProblem::ConflictingNaming { field });
                    name
                }
            };

            let Some(converter) = converter.or_else(|| converters.get(value_type.id()).cloned())
            else {
                problems.push(DefinitionProblem::MissingConverter {
                    field,
                    type_name: value_type.name(),
                });
                continue;
            };

            let default = match default {
                None => None,
                Some(DefaultSetup::Value { slot, text }) => Some(DefaultValue { slot, text }),
                Some(DefaultSetup::Literal(literal)) => match converter.convert(&literal) {
                    Ok(slot) => Some(DefaultValue {
                        slot,
                        text: Some(literal),
                    }),
                    Err(error) => {
                        problems.push(DefinitionProblem::InvalidDefault {
                            field,
                            literal,
                            message: error.to_string(),
                        });
                        continue;
                    }
                },
            };

            if maybe_null && default.is_some() {
                problems.push(DefinitionProblem::DefaultWithMaybeNull { field });
            }
            if maybe_null && !value_type.has_null() {
                problems.push(DefinitionProblem::NullWithoutZero {
                    field,
                    type_name: value_type.name(),
                });
            }

            trace!(field, name = %name, converter = converter.name(), "registry: declared property");

            let property = Property(Arc::new(PropertyInner {
                key,
                name: name.clone(),
                value_type,
                converter,
                default,
                maybe_null,
                obfuscator,
                documentation,
            }));

            if let Some(existing) = by_name.get(&name) {
                problems.push(DefinitionProblem::DuplicateName {
                    name,
                    first: existing.field(),
                    second: field,
                });
            } else {
                by_name.insert(name, property.clone());
            }
            by_index.push(property);
        }

        if !problems.is_empty() {
            debug!(schema = S::NAME, problems = problems.len(), "registry: definition failed");
            return Err(DefinitionError {
                schema: S::NAME,
                problems,
            });
        }

        by_name.sort_keys();
        debug!(schema = S::NAME, properties = by_name.len(), "registry: built");

        Ok(Registry {
            schema: TypeId::of::<S>(),
            schema_name: S::NAME,
            by_index,
            by_name,
        })
    }

    /// The schema's name.
    pub fn schema_name(&self) -> &'static str {
        self.schema_name
    }

    /// Every property, sorted by name.
    pub fn properties(&self) -> impl ExactSizeIterator<Item = &Property> {
        self.by_name.values()
    }

    /// The name to property map, sorted by name.
    pub fn by_name(&self) -> &IndexMap<String, Property> {
        &self.by_name
    }

    /// Look a property up by name.
    pub fn get(&self, name: &str) -> Option<&Property> {
        self.by_name.get(name)
    }

    /// Look a property up by key; `None` for keys of other schemas.
    pub fn property(&self, key: &PropertyKey) -> Option<&Property> {
        if key.schema != self.schema {
            return None;
        }
        self.by_index.get(key.index())
    }

    /// Properties in declaration order.
    pub(crate) fn declared(&self) -> &[Property] {
        &self.by_index
    }

    /// Number of properties.
    pub fn len(&self) -> usize {
        self.by_index.len()
    }

    /// Whether the schema declares nothing.
    pub fn is_empty(&self) -> bool {
        self.by_index.is_empty()
    }
}
