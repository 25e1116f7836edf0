//! Driver: resolves sources into a configuration.
//!
//! # Pipeline
//!
//! 1. Prepend the implicit defaults source.
//! 2. Report every key no property answers to, across all sources.
//! 3. Resolve each property: later sources override earlier ones,
//!    stringified text goes through the property's converter, raw values are
//!    type-checked. Nullable properties nobody set resolve to null.
//! 4. Stop with a declaration error if steps 2 and 3 found anything.
//! 5. Apply the schema's tweaks and rebuild the view.
//! 6. Report every property still without a value.
//! 7. Run the schema's validation.
//!
//! Each step reports everything it finds. Later steps never run after a
//! failed one.

use std::sync::Arc;

use indexmap::IndexMap;

#[allow(unused_imports)]
use crate::macros::{debug, trace};
use crate::configuration::Configuration;
use crate::error::{CommandLineError, ConfigurationError, ConvertError, DefinitionError};
use crate::layers::cli::command_line_sources;
use crate::property::{Property, PropertyKey};
use crate::provenance::ValuedProperty;
use crate::registry::Registry;
use crate::source::{Source, SourceData, SourceRole};
use crate::template::Schema;
use crate::tweak::Tweaks;
use crate::validation::{Bad, Part, push_unique, unique};
use crate::value::Slot;

/// Name of the implicit source holding declared defaults.
pub const DEFAULTS_SOURCE: &str = "defaults";

/// Name of the source holding tweak-stage values.
pub const TWEAKS_SOURCE: &str = "tweaks";

/// Creates configurations of schema `S`.
///
/// The registry is built once in [`Factory::new`] and shared by every
/// configuration the factory creates.
pub struct Factory<S> {
    schema: Arc<S>,
    registry: Arc<Registry>,
    defaults: Source,
}

impl<S: Schema> Factory<S> {
    /// Declare the schema and build its registry.
    ///
    /// Fails with every definition problem found, before any configuration
    /// is created.
    pub fn new() -> Result<Self, DefinitionError> {
        let (schema, registry) = Registry::of::<S>()?;

        let defaults = registry
            .declared()
            .iter()
            .filter_map(|property| {
                property
                    .default_value()
                    .map(|slot| (property.key(), slot.clone()))
            })
            .collect::<IndexMap<_, _>>();
        let defaults = Source::internal(DEFAULTS_SOURCE.to_string(), SourceRole::Defaults, defaults);

        Ok(Self {
            schema: Arc::new(schema),
            registry: Arc::new(registry),
            defaults,
        })
    }

    /// The accessors.
    pub fn schema(&self) -> &S {
        &self.schema
    }

    /// The property registry.
    pub fn registry(&self) -> &Registry {
        &self.registry
    }

    /// The implicit lowest-priority source holding declared defaults.
    pub fn defaults(&self) -> &Source {
        &self.defaults
    }

    /// Resolve `sources`, lowest priority first, into a configuration.
    pub fn create<I>(&self, sources: I) -> Result<Configuration<S>, ConfigurationError>
    where
        I: IntoIterator<Item = Source>,
    {
        let mut all = vec![self.defaults.clone()];
        all.extend(sources);
        debug!(schema = S::NAME, sources = all.len(), "driver: creating configuration");

        // Phase 1: keys nobody answers to
        let mut bads = Vec::new();
        for source in &all {
            self.check_keys(source, &mut bads);
        }

        // Phase 2: per-property resolution
        let values: Vec<ValuedProperty> = self
            .registry
            .declared()
            .iter()
            .map(|property| self.resolve(property, &all, &mut bads))
            .collect();

        if !bads.is_empty() {
            debug!(schema = S::NAME, problems = bads.len(), "driver: declaration failed");
            return Err(self.declaration(bads));
        }

        // Phase 3: tweaks
        let view = Configuration::new(self.schema.clone(), self.registry.clone(), values, all);
        let view = self.apply_tweaks(view)?;

        // Phase 4: missing values
        let bads: Vec<Bad> = view
            .valued_properties()
            .iter()
            .filter(|valued| !valued.is_set())
            .map(|valued| Bad::with_properties("No value set", vec![valued.clone()]))
            .collect();
        if !bads.is_empty() {
            debug!(schema = S::NAME, missing = bads.len(), "driver: values missing");
            return Err(self.declaration(bads));
        }

        // Phase 5: validation
        let bads = unique(self.schema.validate(&view));
        if !bads.is_empty() {
            debug!(schema = S::NAME, problems = bads.len(), "driver: validation failed");
            return Err(ConfigurationError::Validation {
                schema: S::NAME,
                bads,
            });
        }

        debug!(configuration = %view, "driver: created configuration");
        Ok(view)
    }

    /// Split `args` into file sources and one dashed-argument source, then
    /// resolve them.
    ///
    /// See [`command_line_sources`] for the argument layout.
    pub fn create_from_command_line<I, A>(&self, args: I) -> Result<Configuration<S>, CommandLineError>
    where
        I: IntoIterator<Item = A>,
        A: AsRef<str>,
    {
        let sources = command_line_sources(args)?;
        Ok(self.create(sources)?)
    }

    fn declaration(&self, bads: Vec<Bad>) -> ConfigurationError {
        ConfigurationError::Declaration {
            schema: S::NAME,
            bads: unique(bads),
        }
    }

    fn check_keys(&self, source: &Source, bads: &mut Vec<Bad>) {
        match source.data() {
            SourceData::Stringified(entries) => {
                for name in entries.keys() {
                    if self.registry.get(name).is_none() {
                        trace!(source = source.name(), name = %name, "driver: unknown property name");
                        push_unique(
                            bads,
                            Bad::in_source(
                                format!("Unknown property name '{name}' from {}", source.name()),
                                source,
                            )
                            .at(name, Part::Key),
                        );
                    }
                }
            }
            SourceData::Raw(values) => {
                for key in values.keys() {
                    if self.registry.property(key).is_none() {
                        trace!(source = source.name(), key = %key, "driver: unknown property");
                        push_unique(
                            bads,
                            Bad::in_source(
                                format!("Unknown property '{key}' from {}", source.name()),
                                source,
                            ),
                        );
                    }
                }
            }
        }
    }

    fn resolve(&self, property: &Property, sources: &[Source], bads: &mut Vec<Bad>) -> ValuedProperty {
        let mut current = ValuedProperty::new(property.clone(), self.defaults.clone(), None, Slot::Unset);

        for source in sources {
            let contribution = match source.data() {
                SourceData::Stringified(entries) => match entries.get(property.name()) {
                    None => continue,
                    Some(text) => self.convert(property, source, text.as_deref(), &current),
                },
                SourceData::Raw(values) => match values.get(&property.key()) {
                    None | Some(Slot::Unset) => continue,
                    Some(slot) => self.check_raw(property, source, slot),
                },
            };
            match contribution {
                Ok(valued) => {
                    trace!(
                        property = property.name(),
                        source = source.name(),
                        value = %valued.display_value(),
                        "driver: source contributes"
                    );
                    current = valued;
                }
                Err(bad) => push_unique(bads, bad),
            }
        }

        if !current.is_set() && property.accepts_null() {
            current = ValuedProperty::new(
                property.clone(),
                self.defaults.clone(),
                None,
                Slot::ExplicitNull,
            );
        }
        current
    }

    fn convert(
        &self,
        property: &Property,
        source: &Source,
        text: Option<&str>,
        current: &ValuedProperty,
    ) -> Result<ValuedProperty, Bad> {
        let Some(text) = text else {
            return self.null(property, source, None);
        };
        match property.converter().convert(text) {
            Ok(Slot::ExplicitNull) => self.null(property, source, Some(text.to_string())),
            Ok(slot) => Ok(ValuedProperty::new(
                property.clone(),
                source.clone(),
                Some(text.to_string()),
                slot,
            )),
            Err(error) => {
                let error = ConvertError {
                    property: property.name().to_string(),
                    source: source.name().to_string(),
                    converter: property.converter_name().to_string(),
                    message: error.to_string(),
                };
                Err(Bad::in_source(error.to_string(), source)
                    .at(property.name(), Part::Value)
                    .implicating(current.clone()))
            }
        }
    }

    fn check_raw(&self, property: &Property, source: &Source, slot: &Slot) -> Result<ValuedProperty, Bad> {
        let text = if source.is_defaults() {
            property.default_value_as_string().map(str::to_string)
        } else {
            slot.render()
        };
        let value = match slot {
            Slot::Present(value) => value,
            _ => return self.null(property, source, text),
        };
        match property.value_type().coerce(value) {
            Some(Slot::ExplicitNull) => self.null(property, source, None),
            Some(slot) => Ok(ValuedProperty::new(property.clone(), source.clone(), text, slot)),
            None => Err(Bad::in_source(
                format!(
                    "Can't use '{}' of type {} as a value for property '{}' of type {} from {}",
                    value,
                    value.type_name(),
                    property.name(),
                    property.value_type().name(),
                    source.name()
                ),
                source,
            )
            .at(property.name(), Part::Value)),
        }
    }

    fn null(&self, property: &Property, source: &Source, text: Option<String>) -> Result<ValuedProperty, Bad> {
        if property.accepts_null() {
            Ok(ValuedProperty::new(
                property.clone(),
                source.clone(),
                text,
                Slot::ExplicitNull,
            ))
        } else {
            Err(Bad::in_source(
                format!(
                    "Null value for property '{}' from {}, which does not accept null",
                    property.name(),
                    source.name()
                ),
                source,
            )
            .at(property.name(), Part::Value))
        }
    }

    fn apply_tweaks(&self, view: Configuration<S>) -> Result<Configuration<S>, ConfigurationError> {
        let tweaks: Tweaks = self.schema.tweak(&view);
        if tweaks.is_empty() {
            return Ok(view);
        }
        debug!(schema = S::NAME, tweaks = tweaks.len(), "driver: applying tweaks");

        let mut bads = Vec::new();
        let mut accepted: Vec<(Property, Slot, Option<String>)> = Vec::new();

        for (key, tweak) in tweaks {
            let Some(property) = self.registry.property(&key) else {
                push_unique(&mut bads, Bad::new(format!("Tweak of unknown property '{key}'")));
                continue;
            };
            let current = view.valued_properties()[property.key().index()].clone();

            let slot = match &tweak.value {
                None => Some(Slot::ExplicitNull),
                Some(value) => property.value_type().coerce(value),
            };
            let message = match (&slot, &tweak.value) {
                (Some(Slot::ExplicitNull), _) if !property.accepts_null() => Some(format!(
                    "Can't assign null to a property of type {}",
                    property.value_type().name()
                )),
                (None, Some(value)) => Some(format!(
                    "Can't assign a value of type {} to a property of type {}",
                    value.type_name(),
                    property.value_type().name()
                )),
                _ => None,
            };
            match (slot, message) {
                (Some(slot), None) => {
                    let text = tweak.text.or_else(|| slot.render());
                    accepted.push((property.clone(), slot, text));
                }
                (_, Some(message)) => push_unique(&mut bads, Bad::with_properties(message, vec![current])),
                (None, None) => {}
            }
        }

        if !bads.is_empty() {
            debug!(schema = S::NAME, problems = bads.len(), "driver: tweaks rejected");
            return Err(self.declaration(bads));
        }

        let tweak_source = Source::internal(
            TWEAKS_SOURCE.to_string(),
            SourceRole::Tweak,
            accepted
                .iter()
                .map(|(property, slot, _)| (property.key(), slot.clone()))
                .collect::<IndexMap<PropertyKey, Slot>>(),
        );

        let mut values = view.valued_properties().to_vec();
        for (property, slot, text) in accepted {
            let index = property.key().index();
            values[index] = ValuedProperty::new(property, tweak_source.clone(), text, slot);
        }
        let mut sources = view.sources().to_vec();
        sources.push(tweak_source);

        Ok(Configuration::new(view.schema_arc(), view.registry_arc(), values, sources))
    }
}

impl<S> Clone for Factory<S> {
    fn clone(&self) -> Self {
        Self {
            schema: self.schema.clone(),
            registry: self.registry.clone(),
            defaults: self.defaults.clone(),
        }
    }
}

impl<S: Schema> std::fmt::Debug for Factory<S> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Factory")
            .field("schema", &S::NAME)
            .field("registry", &self.registry)
            .finish()
    }
}
