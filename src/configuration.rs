//! The resolved configuration and its per-thread access logs.

use std::cell::RefCell;
use std::fmt;
use std::rc::{Rc, Weak};
use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};

use crate::inspector::Inspector;
use crate::property::{Accessor, Property, PropertyKey};
use crate::provenance::ValuedProperty;
use crate::registry::Registry;
use crate::source::Source;
use crate::template::Schema;
use crate::value::PropertyValue;

static NEXT_ID: AtomicU64 = AtomicU64::new(1);

struct Resolved<S> {
    id: u64,
    schema: Arc<S>,
    registry: Arc<Registry>,
    values: Vec<ValuedProperty>,
    sources: Vec<Source>,
}

/// An immutable, resolved configuration of schema `S`.
///
/// Read values with [`Configuration::get`] and the accessors returned by
/// [`Schema::declare`]. Cloning is cheap and clones share everything,
/// including the identity that inspectors observe.
pub struct Configuration<S> {
    inner: Arc<Resolved<S>>,
}

impl<S: Schema> Configuration<S> {
    pub(crate) fn new(
        schema: Arc<S>,
        registry: Arc<Registry>,
        values: Vec<ValuedProperty>,
        sources: Vec<Source>,
    ) -> Self {
        Self {
            inner: Arc::new(Resolved {
                id: NEXT_ID.fetch_add(1, Ordering::Relaxed),
                schema,
                registry,
                values,
                sources,
            }),
        }
    }

    /// Read a property.
    ///
    /// Null reads as the type's null value (`None`, zero, `false`).
    ///
    /// # Panics
    ///
    /// Panics if the accessor belongs to another schema, or if the property
    /// has no value. The latter can only happen inside [`Schema::tweak`],
    /// which runs before missing values are reported; use
    /// [`Configuration::try_get`] there.
    pub fn get<T: PropertyValue>(&self, accessor: Accessor<T>) -> T {
        match self.try_get(accessor) {
            Some(value) => value,
            None => panic!(
                "property '{}' of {} has no value",
                self.valued(accessor.key).property().name(),
                S::NAME
            ),
        }
    }

    /// Read a property, `None` if it has no value.
    ///
    /// # Panics
    ///
    /// Panics if the accessor belongs to another schema.
    pub fn try_get<T: PropertyValue>(&self, accessor: Accessor<T>) -> Option<T> {
        let valued = self.valued(accessor.key);
        access::record(self.inner.id, valued.property());
        valued.slot().read::<T>()
    }

    fn valued(&self, key: PropertyKey) -> &ValuedProperty {
        match self.valued_property(&key) {
            Some(valued) => valued,
            None => panic!("{key} is not a property of {}", S::NAME),
        }
    }

    /// The accessors.
    pub fn schema(&self) -> &S {
        &self.inner.schema
    }

    /// The property registry.
    pub fn registry(&self) -> &Registry {
        &self.inner.registry
    }

    /// The resolved state of a property, without recording an access.
    pub fn valued_property(&self, key: &PropertyKey) -> Option<&ValuedProperty> {
        self.inner
            .registry
            .property(key)
            .and_then(|property| self.inner.values.get(property.key().index()))
    }

    /// Every resolved property, in declaration order.
    pub fn valued_properties(&self) -> &[ValuedProperty] {
        &self.inner.values
    }

    /// Every source that took part in resolution, lowest priority first.
    pub fn sources(&self) -> &[Source] {
        &self.inner.sources
    }

    /// Open an inspector with a fresh access log.
    pub fn inspector(&self) -> Inspector<'_, S> {
        Inspector::new(self)
    }

    pub(crate) fn schema_arc(&self) -> Arc<S> {
        self.inner.schema.clone()
    }

    pub(crate) fn registry_arc(&self) -> Arc<Registry> {
        self.inner.registry.clone()
    }

    pub(crate) fn id(&self) -> u64 {
        self.inner.id
    }
}

impl<S> Clone for Configuration<S> {
    fn clone(&self) -> Self {
        Self {
            inner: self.inner.clone(),
        }
    }
}

impl<S: Schema> PartialEq for Configuration<S> {
    fn eq(&self, other: &Self) -> bool {
        if Arc::ptr_eq(&self.inner, &other.inner) {
            return true;
        }
        self.inner.values.len() == other.inner.values.len()
            && self
                .inner
                .values
                .iter()
                .zip(&other.inner.values)
                .all(|(a, b)| {
                    a.property() == b.property()
                        && a.slot() == b.slot()
                        && a.string_value() == b.string_value()
                        && a.origin() == b.origin()
                        && a.source().name() == b.source().name()
                })
    }
}

impl<S: Schema> fmt::Display for Configuration<S> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{{", S::NAME)?;
        for (i, property) in self.inner.registry.properties().enumerate() {
            if i > 0 {
                f.write_str("; ")?;
            }
            let value = self.inner.values[property.key().index()].display_value();
            write!(f, "{}={}", property.name(), value)?;
        }
        f.write_str("}")
    }
}

impl<S: Schema> fmt::Debug for Configuration<S> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Configuration({self})")
    }
}

// ============================================================================
// Access logs
// ============================================================================

/// One inspector's log of accessed properties, most recent first.
pub(crate) type AccessLog = Rc<RefCell<Vec<Property>>>;

pub(crate) mod access {
    use super::*;

    thread_local! {
        static LOGS: RefCell<Vec<(u64, Weak<RefCell<Vec<Property>>>)>> =
            const { RefCell::new(Vec::new()) };
    }

    /// Open a log that receives accesses to `configuration` made on this thread.
    pub(crate) fn register(configuration: u64) -> AccessLog {
        let log = AccessLog::default();
        LOGS.with_borrow_mut(|logs| {
            logs.retain(|(_, log)| log.strong_count() > 0);
            logs.push((configuration, Rc::downgrade(&log)));
        });
        log
    }

    pub(crate) fn record(configuration: u64, property: &Property) {
        LOGS.with_borrow_mut(|logs| {
            logs.retain(|(_, log)| log.strong_count() > 0);
            for (id, log) in logs.iter() {
                if *id != configuration {
                    continue;
                }
                if let Some(log) = log.upgrade() {
                    let mut log = log.borrow_mut();
                    log.retain(|seen| seen != property);
                    log.insert(0, property.clone());
                }
            }
        });
    }
}
