//! Redaction of sensitive values for logs and inspection.

use std::fmt;
use std::sync::Arc;

use regex::{NoExpand, Regex};

type ObfuscateFn = dyn Fn(&str, &str) -> String + Send + Sync;

/// Rewrites a property's string form, hiding sensitive parts behind a
/// caller-supplied replacement token.
#[derive(Clone)]
pub enum Obfuscator {
    /// The first pattern with a match has every match replaced.
    Patterns(Arc<[Regex]>),
    /// The whole value is replaced.
    All,
    /// A custom function of `(value, replacement)`.
    Custom(Arc<ObfuscateFn>),
}

impl Obfuscator {
    /// Build a pattern obfuscator.
    pub fn patterns<I, P>(patterns: I) -> Result<Self, regex::Error>
    where
        I: IntoIterator<Item = P>,
        P: AsRef<str>,
    {
        let compiled = patterns
            .into_iter()
            .map(|pattern| Regex::new(pattern.as_ref()))
            .collect::<Result<Vec<_>, _>>()?;
        Ok(Obfuscator::Patterns(compiled.into()))
    }

    /// Replace the whole value.
    pub fn all() -> Self {
        Obfuscator::All
    }

    /// Build a custom obfuscator.
    pub fn custom<F>(obfuscate: F) -> Self
    where
        F: Fn(&str, &str) -> String + Send + Sync + 'static,
    {
        Obfuscator::Custom(Arc::new(obfuscate))
    }

    /// Apply to `value`.
    pub fn apply(&self, value: &str, replacement: &str) -> String {
        match self {
            Obfuscator::Patterns(patterns) => patterns
                .iter()
                .find(|pattern| pattern.is_match(value))
                .map(|pattern| {
                    pattern
                        .replace_all(value, NoExpand(replacement))
                        .into_owned()
                })
                .unwrap_or_else(|| value.to_string()),
            Obfuscator::All => replacement.to_string(),
            Obfuscator::Custom(obfuscate) => obfuscate(value, replacement),
        }
    }
}

impl fmt::Debug for Obfuscator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Obfuscator::Patterns(patterns) => f
                .debug_tuple("Patterns")
                .field(&patterns.iter().map(Regex::as_str).collect::<Vec<_>>())
                .finish(),
            Obfuscator::All => f.write_str("All"),
            Obfuscator::Custom(_) => f.write_str("Custom(..)"),
        }
    }
}
