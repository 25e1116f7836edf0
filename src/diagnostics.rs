//! Pretty rendering of configuration errors.
//!
//! Findings about an entry of a source that kept its text (properties files,
//! command lines, the environment) are rendered with `ariadne`, pointing at
//! the offending key or value. Everything else is printed as a plain line.

use ariadne::{Color, Config, Label, Report, ReportKind};

use crate::color::should_use_color;
use crate::error::ConfigurationError;
use crate::validation::{Bad, Part};

struct NamedSource {
    name: String,
    source: ariadne::Source<String>,
}

impl ariadne::Cache<()> for NamedSource {
    type Storage = String;

    fn fetch(&mut self, _: &()) -> Result<&ariadne::Source<Self::Storage>, impl std::fmt::Debug> {
        Ok::<_, std::convert::Infallible>(&self.source)
    }

    fn display<'a>(&self, _: &'a ()) -> Option<impl std::fmt::Display + 'a> {
        Some(self.name.clone())
    }
}

impl ConfigurationError {
    /// Render every finding, with source excerpts where available.
    pub fn render_pretty(&self) -> String {
        let mut output = Vec::new();
        let heading = match self {
            ConfigurationError::Declaration { schema, .. } => format!("could not create {schema}"),
            ConfigurationError::Validation { schema, .. } => format!("{schema} failed validation"),
        };
        output.extend_from_slice(heading.as_bytes());
        output.extend_from_slice(b":\n");

        for bad in self.bads() {
            if !render_located(bad, &mut output) {
                output.extend_from_slice(b"Error: ");
                output.extend_from_slice(bad.to_string().as_bytes());
                output.push(b'\n');
                for valued in bad.properties() {
                    output.extend_from_slice(format!("    {valued}\n").as_bytes());
                }
            }
        }

        String::from_utf8(output).unwrap_or_else(|_| "error rendering diagnostics".to_string())
    }
}

/// Render `bad` against the text of its source. Returns `false` when the
/// finding has no location or the source kept no text for it.
fn render_located(bad: &Bad, output: &mut Vec<u8>) -> bool {
    let (Some(location), [source]) = (bad.location(), bad.sources()) else {
        return false;
    };
    let Some(text) = source.text() else {
        return false;
    };
    let span = match location.part {
        Part::Key => text.key_span(&location.key),
        Part::Value => text.value_span(&location.key),
    };
    let Some(span) = span else {
        return false;
    };

    let label = match location.part {
        Part::Key => "unknown property",
        Part::Value => "invalid value",
    };
    let mut cache = NamedSource {
        name: source.name().to_string(),
        source: ariadne::Source::from(text.text().to_string()),
    };
    let report = Report::build(ReportKind::Error, span.clone())
        .with_config(Config::default().with_color(should_use_color()))
        .with_message(bad.message())
        .with_label(Label::new(span).with_message(label).with_color(Color::Red))
        .finish();
    report.write(&mut cache, &mut *output).is_ok()
}
