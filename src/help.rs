//! Help text generated from a property registry.
//!
//! Every property is listed by name with its default (or a note that it must
//! be set) and its documentation, wrapped to the configured width.

use owo_colors::OwoColorize;
use unicode_width::UnicodeWidthStr;

use crate::color::ColorChoice;
use crate::error::ConfigurationError;
use crate::property::Property;
use crate::registry::Registry;
use crate::source::Source;

/// Configuration for help text generation.
#[derive(Debug, Clone)]
pub struct HelpConfig {
    /// Program name shown above the properties.
    pub program_name: Option<String>,
    /// Program version
    pub version: Option<String>,
    /// Description shown between the program name and the properties.
    pub description: Option<String>,
    /// Width for wrapping text (0 = no wrapping)
    pub width: usize,
    /// Whether headings and names are colored.
    pub color: ColorChoice,
}

impl Default for HelpConfig {
    fn default() -> Self {
        Self {
            program_name: None,
            version: None,
            description: None,
            width: 80,
            color: ColorChoice::Auto,
        }
    }
}

const INDENT: &str = "    ";

struct Painter {
    color: bool,
}

impl Painter {
    fn heading(&self, text: &str) -> String {
        if self.color {
            format!("{}:", text.yellow().bold())
        } else {
            format!("{text}:")
        }
    }

    fn name(&self, text: &str) -> String {
        if self.color {
            text.green().to_string()
        } else {
            text.to_string()
        }
    }

    fn error(&self, text: &str) -> String {
        if self.color {
            text.red().bold().to_string()
        } else {
            text.to_string()
        }
    }
}

/// Describe every property of `registry`, sorted by name.
pub fn generate_help(registry: &Registry, config: &HelpConfig) -> String {
    let painter = Painter {
        color: config.color.enabled(),
    };
    let mut out = String::new();

    if let Some(program) = &config.program_name {
        match &config.version {
            Some(version) => out.push_str(&format!("{program} {version}\n\n")),
            None => out.push_str(&format!("{program}\n\n")),
        }
    }
    if let Some(description) = &config.description {
        for line in wrap(description, config.width) {
            out.push_str(&line);
            out.push('\n');
        }
        out.push('\n');
    }

    out.push_str(&painter.heading("PROPERTIES"));
    out.push('\n');
    for (i, property) in registry.properties().enumerate() {
        if i > 0 {
            out.push('\n');
        }
        write_property(&mut out, property, config.width, &painter);
    }
    out
}

fn write_property(out: &mut String, property: &Property, width: usize, painter: &Painter) {
    out.push_str(INDENT);
    out.push_str(&painter.name(property.name()));
    out.push('\n');

    let requirement = match property.default_value_as_string() {
        Some(text) => format!("Default value: '{text}'"),
        None if property.accepts_null() => "(May be null)".to_string(),
        None => "(Requires explicit value)".to_string(),
    };
    out.push_str(INDENT);
    out.push_str(INDENT);
    out.push_str(&requirement);
    out.push('\n');

    let inner = width.saturating_sub(2 * INDENT.len());
    for line in wrap(property.documentation(), inner) {
        out.push_str(INDENT);
        out.push_str(INDENT);
        out.push_str(&line);
        out.push('\n');
    }
}

/// Explain why a configuration could not be created, followed by the help.
///
/// The findings are listed one per line, then every source they implicate.
pub fn error_message_and_help(
    error: &ConfigurationError,
    registry: &Registry,
    config: &HelpConfig,
) -> String {
    let painter = Painter {
        color: config.color.enabled(),
    };
    let mut out = format!(
        "{} Could not create a configuration from {}\n",
        painter.error("error:"),
        error.schema()
    );
    for bad in error.bads() {
        out.push_str(INDENT);
        out.push_str(&bad.to_string());
        out.push('\n');
    }

    let mut sources: Vec<&Source> = Vec::new();
    for source in error.bads().iter().flat_map(|bad| bad.sources()) {
        if !sources.contains(&source) {
            sources.push(source);
        }
    }
    if !sources.is_empty() {
        out.push('\n');
        out.push_str(&painter.heading("SOURCES"));
        out.push('\n');
        for source in sources {
            out.push_str(INDENT);
            out.push_str(source.name());
            out.push('\n');
        }
    }

    out.push('\n');
    out.push_str(&generate_help(registry, config));
    out
}

/// Greedy word wrap measured in display columns. A width of zero disables
/// wrapping; words wider than the line get a line of their own.
fn wrap(text: &str, width: usize) -> Vec<String> {
    let mut lines = Vec::new();
    for paragraph in text.lines() {
        if width == 0 {
            lines.push(paragraph.trim_end().to_string());
            continue;
        }
        let mut line = String::new();
        for word in paragraph.split_whitespace() {
            if !line.is_empty() && line.width() + 1 + word.width() > width {
                lines.push(std::mem::take(&mut line));
            }
            if !line.is_empty() {
                line.push(' ');
            }
            line.push_str(word);
        }
        lines.push(line);
    }
    while lines.last().is_some_and(String::is_empty) {
        lines.pop();
    }
    lines
}
