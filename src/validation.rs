//! Findings and whole-object validation.

use std::fmt;

use crate::configuration::Configuration;
use crate::inspector::Inspector;
use crate::provenance::ValuedProperty;
use crate::source::Source;
use crate::template::Schema;

// ============================================================================
// Bad
// ============================================================================

/// One declaration or validation finding.
///
/// Findings compare structurally; identical findings collapse when
/// accumulated.
#[derive(Debug, Clone, PartialEq)]
pub struct Bad {
    message: String,
    properties: Vec<ValuedProperty>,
    sources: Vec<Source>,
    location: Option<Location>,
}

/// Which part of a source entry a finding points at.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Part {
    /// The key as written.
    Key,
    /// The value as written.
    Value,
}

/// An entry of the single source implicated by a finding.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Location {
    /// The key as written in the source.
    pub key: String,
    /// The part of the entry at fault.
    pub part: Part,
}

impl Bad {
    /// A finding not tied to any property.
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            properties: Vec::new(),
            sources: Vec::new(),
            location: None,
        }
    }

    /// A finding implicating `properties`. Sources are derived from them.
    pub fn with_properties(message: impl Into<String>, properties: Vec<ValuedProperty>) -> Self {
        let mut sources: Vec<Source> = Vec::new();
        for valued in properties.iter().filter(|valued| valued.is_set()) {
            if !sources.contains(valued.source()) {
                sources.push(valued.source().clone());
            }
        }
        Self {
            message: message.into(),
            properties,
            sources,
            location: None,
        }
    }

    /// A finding about an entry of `source`.
    pub(crate) fn in_source(message: impl Into<String>, source: &Source) -> Self {
        Self {
            message: message.into(),
            properties: Vec::new(),
            sources: vec![source.clone()],
            location: None,
        }
    }

    pub(crate) fn at(mut self, key: &str, part: Part) -> Self {
        self.location = Some(Location {
            key: key.to_string(),
            part,
        });
        self
    }

    /// Implicate `valued` without changing the sources.
    pub(crate) fn implicating(mut self, valued: ValuedProperty) -> Self {
        self.properties.push(valued);
        self
    }

    /// What is wrong.
    pub fn message(&self) -> &str {
        &self.message
    }

    /// The implicated properties.
    pub fn properties(&self) -> &[ValuedProperty] {
        &self.properties
    }

    /// The implicated sources.
    pub fn sources(&self) -> &[Source] {
        &self.sources
    }

    /// The entry of the single implicated source the finding is about.
    pub fn location(&self) -> Option<&Location> {
        self.location.as_ref()
    }
}

impl fmt::Display for Bad {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.properties.is_empty() {
            return f.write_str(&self.message);
        }
        f.write_str("[ ")?;
        for (i, valued) in self.properties.iter().enumerate() {
            if i > 0 {
                f.write_str(", ")?;
            }
            f.write_str(valued.property().name())?;
        }
        write!(f, " ] {}", self.message)
    }
}

/// Append `bad` unless an equal finding is already present.
pub(crate) fn push_unique(bads: &mut Vec<Bad>, bad: Bad) {
    if !bads.contains(&bad) {
        bads.push(bad);
    }
}

/// Deduplicate findings, keeping first occurrences in order.
pub(crate) fn unique(bads: Vec<Bad>) -> Vec<Bad> {
    let mut out = Vec::with_capacity(bads.len());
    for bad in bads {
        push_unique(&mut out, bad);
    }
    out
}

// ============================================================================
// Accumulator
// ============================================================================

/// Collects findings during [`Schema::validate`], attaching the properties
/// read by each failed check.
///
/// ```rust,ignore
/// fn validate(&self, configuration: &Configuration<Self>) -> Vec<Bad> {
///     let mut accumulator = Accumulator::new(configuration);
///     accumulator
///         .verify(configuration.get(self.min) <= configuration.get(self.max), "min must not exceed max")
///         .verify(configuration.get(self.port) != 0, "port must be set");
///     accumulator.done()
/// }
/// ```
pub struct Accumulator<'c, S> {
    inspector: Inspector<'c, S>,
    bads: Vec<Bad>,
}

impl<'c, S: Schema> Accumulator<'c, S> {
    /// Start accumulating. Only reads made after this call are attached.
    pub fn new(configuration: &'c Configuration<S>) -> Self {
        Self {
            inspector: Inspector::new(configuration),
            bads: Vec::new(),
        }
    }

    /// Record a finding if `condition` is false, implicating every property
    /// read since the previous check. The access log is cleared either way.
    pub fn verify(&mut self, condition: bool, message: impl Into<String>) -> &mut Self {
        if !condition {
            self.add(message);
        }
        self.inspector.clear_last_accessed();
        self
    }

    /// Record a finding implicating every property read since the previous
    /// check, and clear the access log.
    pub fn add(&mut self, message: impl Into<String>) -> &mut Self {
        let properties = self
            .inspector
            .last_accessed()
            .iter()
            .filter_map(|property| self.inspector.valued_property(property).cloned())
            .collect();
        push_unique(&mut self.bads, Bad::with_properties(message, properties));
        self.inspector.clear_last_accessed();
        self
    }

    /// Record a finding tied to no property if `condition` is false.
    pub fn just_verify(&mut self, condition: bool, message: impl Into<String>) -> &mut Self {
        if !condition {
            self.just_add(message);
        }
        self.inspector.clear_last_accessed();
        self
    }

    /// Record a finding tied to no property.
    pub fn just_add(&mut self, message: impl Into<String>) -> &mut Self {
        push_unique(&mut self.bads, Bad::new(message));
        self
    }

    /// Record a finding built by the caller.
    pub fn push(&mut self, bad: Bad) -> &mut Self {
        push_unique(&mut self.bads, bad);
        self
    }

    /// The inspector backing the accumulator.
    pub fn inspector(&self) -> &Inspector<'c, S> {
        &self.inspector
    }

    /// Whether nothing has been recorded.
    pub fn is_ok(&self) -> bool {
        self.bads.is_empty()
    }

    /// The findings, in the order recorded.
    pub fn done(self) -> Vec<Bad> {
        self.bads
    }
}
