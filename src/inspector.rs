//! Read-only introspection of a resolved configuration.

use std::fmt;

use indexmap::IndexMap;

use crate::configuration::{AccessLog, Configuration, access};
use crate::property::{Property, PropertyRef};
use crate::provenance::{Origin, ValuedProperty};
use crate::source::Source;
use crate::template::Schema;

/// Metadata view over one configuration with its own access log.
///
/// The log records every property read through the configuration on the
/// thread that created the inspector, after the inspector was created.
/// Inspectors are not `Send`, so a log never observes another thread.
pub struct Inspector<'c, S> {
    configuration: &'c Configuration<S>,
    log: AccessLog,
}

impl<'c, S: Schema> Inspector<'c, S> {
    /// Start observing `configuration` on this thread.
    pub fn new(configuration: &'c Configuration<S>) -> Self {
        Self {
            configuration,
            log: access::register(configuration.id()),
        }
    }

    /// The observed configuration.
    pub fn configuration(&self) -> &'c Configuration<S> {
        self.configuration
    }

    /// Every property, sorted by name.
    pub fn properties(&self) -> &'c IndexMap<String, Property> {
        self.configuration.registry().by_name()
    }

    /// Look a property up by name.
    pub fn property(&self, name: &str) -> Option<&'c Property> {
        self.configuration.registry().get(name)
    }

    /// The resolved state of a property.
    pub fn valued_property(&self, property: impl PropertyRef) -> Option<&'c ValuedProperty> {
        self.configuration
            .valued_property(&property.property_key())
    }

    /// Where the property's value came from.
    pub fn origin(&self, property: impl PropertyRef) -> Option<Origin> {
        self.valued_property(property).map(ValuedProperty::origin)
    }

    /// Whether the property holds its declared default.
    pub fn using_default(&self, property: impl PropertyRef) -> bool {
        self.origin(property) == Some(Origin::Builtin)
    }

    /// The source that supplied the property's value.
    pub fn source_of(&self, property: impl PropertyRef) -> Option<&'c Source> {
        self.valued_property(property).map(ValuedProperty::source)
    }

    /// The property's text as written, `None` for null or unset.
    pub fn string_value_of(&self, property: impl PropertyRef) -> Option<&'c str> {
        self.valued_property(property)
            .and_then(ValuedProperty::string_value)
    }

    /// The property's text with its obfuscator applied, sensitive parts
    /// replaced by `replacement`.
    pub fn safe_value_of(&self, property: impl PropertyRef, replacement: &str) -> Option<String> {
        let valued = self.valued_property(property)?;
        let text = valued.string_value()?;
        Some(valued.property().obfuscate(text, replacement))
    }

    /// Properties read since the inspector was created or last cleared,
    /// most recent first.
    pub fn last_accessed(&self) -> Vec<Property> {
        self.log.borrow().clone()
    }

    /// Forget the recorded accesses.
    pub fn clear_last_accessed(&self) {
        self.log.borrow_mut().clear();
    }

    /// Every source that took part in resolution, lowest priority first.
    pub fn sources(&self) -> &'c [Source] {
        self.configuration.sources()
    }
}

impl<S: Schema> fmt::Debug for Inspector<'_, S> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Inspector")
            .field("configuration", self.configuration)
            .field("last_accessed", &self.log.borrow())
            .finish()
    }
}
