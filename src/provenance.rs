//! Provenance tracking for resolved properties.
//!
//! Every property of a configuration resolves to one [`ValuedProperty`]: the
//! value, the [`Source`] that won, the text it was written as, and an
//! [`Origin`] saying which part of the pipeline supplied it.
//!
//! # Example
//!
//! ```rust,ignore
//! let inspector = configuration.inspector();
//! let port = inspector.property("port").unwrap();
//! assert_eq!(inspector.origin(port), Some(Origin::Explicit));
//! assert_eq!(inspector.source_of(port).map(Source::name), Some("args"));
//! ```

use std::fmt;

use crate::property::Property;
use crate::source::{Source, SourceRole};
use crate::value::Slot;

/// Which part of the pipeline supplied a value.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Origin {
    /// A declared default.
    Builtin,
    /// The schema's tweak stage.
    Tweak,
    /// A caller-supplied source.
    Explicit,
}

impl Origin {
    /// A short upper-case label.
    pub const fn label(&self) -> &'static str {
        match self {
            Origin::Builtin => "DEFAULT",
            Origin::Tweak => "TWEAK",
            Origin::Explicit => "EXPLICIT",
        }
    }

    pub(crate) fn of(source: &Source) -> Self {
        match source.role() {
            SourceRole::Defaults => Origin::Builtin,
            SourceRole::Tweak => Origin::Tweak,
            SourceRole::Explicit => Origin::Explicit,
        }
    }
}

impl fmt::Display for Origin {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// The resolved state of one property.
#[derive(Debug, Clone, PartialEq)]
pub struct ValuedProperty {
    property: Property,
    source: Source,
    string_value: Option<String>,
    slot: Slot,
    origin: Origin,
}

impl ValuedProperty {
    pub(crate) fn new(
        property: Property,
        source: Source,
        string_value: Option<String>,
        slot: Slot,
    ) -> Self {
        let origin = Origin::of(&source);
        Self {
            property,
            source,
            string_value,
            slot,
            origin,
        }
    }

    /// The described property.
    pub fn property(&self) -> &Property {
        &self.property
    }

    /// The source that supplied the value.
    pub fn source(&self) -> &Source {
        &self.source
    }

    /// The value's text as written in its source, or its rendering for
    /// typed values. `None` for null and unset.
    pub fn string_value(&self) -> Option<&str> {
        self.string_value.as_deref()
    }

    /// The resolved slot.
    pub fn slot(&self) -> &Slot {
        &self.slot
    }

    /// Where the value came from.
    pub fn origin(&self) -> Origin {
        self.origin
    }

    /// Whether any source provided something.
    pub fn is_set(&self) -> bool {
        self.slot.is_set()
    }

    /// A human form: the string value, `null`, or `<not-set>`.
    pub fn display_value(&self) -> String {
        if let Some(text) = &self.string_value {
            return text.clone();
        }
        match &self.slot {
            Slot::Present(value) => value.render(),
            Slot::ExplicitNull => "null".to_string(),
            Slot::Unset => "<not-set>".to_string(),
        }
    }
}

impl fmt::Display for ValuedProperty {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} -> '{}' ({} from {})",
            self.property.name(),
            self.display_value(),
            self.origin,
            self.source.name()
        )
    }
}
