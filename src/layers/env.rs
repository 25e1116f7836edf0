//! Environment variables as a source.
//!
//! # Naming Convention
//!
//! Given a prefix like `"REEF"`, a property named `port` is read from
//! `REEF__PORT` and `smtp.connection-timeout` from
//! `REEF__SMTP_CONNECTION_TIMEOUT`: the property name in
//! SCREAMING_SNAKE_CASE after the prefix and a double underscore.
//!
//! In strict mode, prefixed variables matching no property are passed on
//! under their variable name, so resolution reports them as unknown keys.

use std::collections::HashMap;

use heck::ToShoutySnakeCase;
use indexmap::IndexMap;

#[allow(unused_imports)]
use crate::macros::{debug, trace};
use crate::registry::Registry;
use crate::source::{Source, SourceText};

/// Name of the source built from environment variables.
pub const ENVIRONMENT_SOURCE: &str = "environment";

// ============================================================================
// EnvSource trait
// ============================================================================

/// Trait for abstracting over environment variable sources.
///
/// This allows testing without modifying the actual environment.
pub trait EnvSource {
    /// Get the value of an environment variable by name.
    fn get(&self, name: &str) -> Option<String>;

    /// Iterate over all environment variables.
    fn vars(&self) -> Box<dyn Iterator<Item = (String, String)> + '_>;
}

/// Environment source that reads from the actual process environment.
#[derive(Debug, Clone, Copy, Default)]
pub struct StdEnv;

impl EnvSource for StdEnv {
    fn get(&self, name: &str) -> Option<String> {
        std::env::var(name).ok()
    }

    fn vars(&self) -> Box<dyn Iterator<Item = (String, String)> + '_> {
        Box::new(std::env::vars())
    }
}

/// Environment source backed by a map (for testing).
#[derive(Debug, Clone, Default)]
pub struct MockEnv {
    vars: IndexMap<String, String>,
}

impl MockEnv {
    /// Create a new empty mock environment.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a mock environment from an iterator of key-value pairs.
    pub fn from_pairs<I, K, V>(iter: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<String>,
    {
        Self {
            vars: iter
                .into_iter()
                .map(|(k, v)| (k.into(), v.into()))
                .collect(),
        }
    }

    /// Set an environment variable.
    pub fn set(&mut self, name: impl Into<String>, value: impl Into<String>) {
        self.vars.insert(name.into(), value.into());
    }
}

impl EnvSource for MockEnv {
    fn get(&self, name: &str) -> Option<String> {
        self.vars.get(name).cloned()
    }

    fn vars(&self) -> Box<dyn Iterator<Item = (String, String)> + '_> {
        Box::new(self.vars.iter().map(|(k, v)| (k.clone(), v.clone())))
    }
}

// ============================================================================
// EnvConfig
// ============================================================================

/// Configuration for reading environment variables.
#[derive(Debug, Clone)]
pub struct EnvConfig {
    /// The prefix to look for (e.g., `MYAPP`).
    pub prefix: String,

    /// Pass prefixed variables that match no property on as unknown keys,
    /// to catch typos.
    pub strict: bool,
}

impl EnvConfig {
    /// Create a new EnvConfig with the given prefix.
    pub fn new(prefix: impl Into<String>) -> Self {
        Self {
            prefix: prefix.into(),
            strict: false,
        }
    }

    /// Enable strict mode.
    pub fn strict(mut self) -> Self {
        self.strict = true;
        self
    }

    /// The variable that sets `property`.
    pub fn variable_for(&self, property: &str) -> String {
        format!("{}__{}", self.prefix, property.to_shouty_snake_case())
    }
}

/// Build a source from the variables of `env` that carry the configured prefix.
///
/// Variables are read in name order. The source text is a synthetic
/// document of `VAR="value"` lines for diagnostics.
pub fn env_source(registry: &Registry, config: &EnvConfig, env: &dyn EnvSource) -> Source {
    let by_variable: HashMap<String, &str> = registry
        .properties()
        .map(|property| (config.variable_for(property.name()), property.name()))
        .collect();
    let prefix = format!("{}__", config.prefix);

    let mut vars: Vec<(String, String)> = env
        .vars()
        .filter(|(name, _)| name.starts_with(&prefix))
        .collect();
    vars.sort();

    let mut document = String::new();
    let mut spans = Vec::new();
    let mut entries = Vec::new();
    for (variable, value) in vars {
        let key = match by_variable.get(&variable) {
            Some(name) => name.to_string(),
            None if config.strict => variable.clone(),
            None => {
                trace!(variable = %variable, "env: ignoring unmatched variable");
                continue;
            }
        };
        let key_start = document.len();
        document.push_str(&variable);
        let key_span = key_start..document.len();
        document.push_str("=\"");
        let value_start = document.len();
        document.push_str(&value);
        let value_span = value_start..document.len();
        document.push_str("\"\n");

        spans.push((key.clone(), key_span, value_span));
        entries.push((key, value));
    }

    let mut text = SourceText::new(document);
    for (key, key_span, value_span) in spans {
        text.span(key, key_span, value_span);
    }
    debug!(prefix = %config.prefix, entries = entries.len(), "env: built source");
    Source::stringified_with_text(ENVIRONMENT_SOURCE, entries, text)
}
