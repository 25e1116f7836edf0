//! Human-readable dump of a configuration with the provenance of every value.
//!
//! ```text
//! Sources:
//!   1. defaults
//!   2. server.properties
//!   3. tweaks
//!
//! Server
//!   host....... localhost   DEFAULT
//!   password... ***         EXPLICIT server.properties
//!   port....... 9000        EXPLICIT server.properties
//! ```
//!
//! Values go through each property's obfuscator. Dumping does not count as
//! reading: no inspector access log records it.

use std::io::Write;

use owo_colors::OwoColorize;
use unicode_width::UnicodeWidthStr;

use crate::color::ColorChoice;
use crate::configuration::Configuration;
use crate::provenance::{Origin, ValuedProperty};
use crate::template::Schema;

/// Dump options.
#[derive(Debug, Clone)]
pub struct DumpOptions {
    /// Replaces obfuscated parts of values.
    pub replacement: String,
    /// Whether padding and provenance are colored.
    pub color: ColorChoice,
}

impl Default for DumpOptions {
    fn default() -> Self {
        Self {
            replacement: "***".to_string(),
            color: ColorChoice::Auto,
        }
    }
}

struct Row {
    name: String,
    value: String,
    origin: Origin,
    source: String,
}

impl Row {
    fn of(valued: &ValuedProperty, replacement: &str) -> Self {
        let property = valued.property();
        let value = match valued.string_value() {
            Some(text) => property.obfuscate(text, replacement),
            None => valued.display_value(),
        };
        Self {
            name: property.name().to_string(),
            value,
            origin: valued.origin(),
            source: valued.source().name().to_string(),
        }
    }

    fn provenance(&self, color: bool) -> String {
        let text = match self.origin {
            Origin::Builtin => self.origin.label().to_string(),
            _ => format!("{} {}", self.origin.label(), self.source),
        };
        if !color {
            return text;
        }
        match self.origin {
            Origin::Builtin => text.bright_black().to_string(),
            Origin::Tweak => text.magenta().to_string(),
            Origin::Explicit => text.cyan().to_string(),
        }
    }
}

// ============================================================================
// Public API
// ============================================================================

/// Write the sources and every property of `configuration` to `w`.
pub fn dump_configuration<S: Schema>(
    w: &mut impl Write,
    configuration: &Configuration<S>,
    options: &DumpOptions,
) -> std::io::Result<()> {
    let color = options.color.enabled();

    writeln!(w, "Sources:")?;
    for (i, source) in configuration.sources().iter().enumerate() {
        writeln!(w, "  {}. {}", i + 1, source.name())?;
    }
    writeln!(w)?;

    let mut rows: Vec<Row> = configuration
        .valued_properties()
        .iter()
        .map(|valued| Row::of(valued, &options.replacement))
        .collect();
    rows.sort_by(|a, b| a.name.cmp(&b.name));

    let key_width = rows.iter().map(|row| row.name.width()).max().unwrap_or(0) + 3;
    let value_width = rows.iter().map(|row| row.value.width()).max().unwrap_or(0) + 3;

    writeln!(w, "{}", configuration.registry().schema_name())?;
    for row in &rows {
        let dots = ".".repeat(key_width.saturating_sub(row.name.width()));
        let spaces = " ".repeat(value_width.saturating_sub(row.value.width()));
        let dots = if color {
            dots.bright_black().to_string()
        } else {
            dots
        };
        writeln!(
            w,
            "  {}{} {}{}{}",
            row.name,
            dots,
            row.value,
            spaces,
            row.provenance(color)
        )?;
    }
    Ok(())
}

/// [`dump_configuration`] into a string.
pub fn dump_to_string<S: Schema>(configuration: &Configuration<S>, options: &DumpOptions) -> String {
    let mut out = Vec::new();
    // Writing to a Vec cannot fail.
    let _ = dump_configuration(&mut out, configuration, options);
    String::from_utf8_lossy(&out).into_owned()
}
