//! Command-line arguments as sources.
//!
//! Arguments follow the layout
//!
//! ```text
//! [--configuration-files FILE...] [--name value]... [-- ignored...]
//! ```
//!
//! Every file becomes a properties source, in order, followed by one source
//! for the `--name value` pairs, which therefore wins over the files.
//! Everything after a bare `--` belongs to the application and is ignored.

use crate::error::SourceError;
#[allow(unused_imports)]
use crate::macros::{debug, trace};
use crate::layers::file::properties_file;
use crate::source::{Source, SourceText};

/// Flag introducing configuration files.
pub const CONFIGURATION_FILES: &str = "--configuration-files";

/// Marks the end of configuration arguments.
pub const END_OF_CONFIGURATION: &str = "--";

/// Name of the source built from `--name value` pairs.
pub const COMMAND_LINE_SOURCE: &str = "command line";

/// Build a source from `--name value` pairs.
///
/// The source keeps the joined arguments as its text so diagnostics can
/// point at the offending argument.
pub fn dashed_source<I, A>(name: impl Into<String>, args: I) -> Result<Source, SourceError>
where
    I: IntoIterator<Item = A>,
    A: AsRef<str>,
{
    let args: Vec<String> = args.into_iter().map(|arg| arg.as_ref().to_string()).collect();

    let mut text = SourceText::new(args.join(" "));
    let mut offsets = Vec::with_capacity(args.len());
    let mut offset = 0;
    for arg in &args {
        offsets.push(offset..offset + arg.len());
        offset += arg.len() + 1;
    }

    let mut entries = Vec::with_capacity(args.len() / 2);
    let mut i = 0;
    while i < args.len() {
        let flag = &args[i];
        let Some(key) = flag.strip_prefix("--").filter(|key| !key.is_empty()) else {
            return Err(SourceError::Arguments {
                message: format!("expected '--name' but found '{flag}'"),
            });
        };
        let Some(value) = args.get(i + 1) else {
            return Err(SourceError::Arguments {
                message: format!("missing value for '{flag}'"),
            });
        };
        let key_span = offsets[i].start + 2..offsets[i].end;
        text.span(key, key_span, offsets[i + 1].clone());
        entries.push((key.to_string(), value.clone()));
        i += 2;
    }

    trace!(entries = entries.len(), "cli: parsed dashed arguments");
    Ok(Source::stringified_with_text(name, entries, text))
}

/// Split an argument vector into file sources followed by one source for
/// the `--name value` pairs.
pub fn command_line_sources<I, A>(args: I) -> Result<Vec<Source>, SourceError>
where
    I: IntoIterator<Item = A>,
    A: AsRef<str>,
{
    let args: Vec<String> = args
        .into_iter()
        .map(|arg| arg.as_ref().to_string())
        .take_while(|arg| arg != END_OF_CONFIGURATION)
        .collect();

    let mut rest = args.as_slice();
    let mut sources = Vec::new();

    if rest.first().map(String::as_str) == Some(CONFIGURATION_FILES) {
        rest = &rest[1..];
        let files = rest.iter().take_while(|arg| !arg.starts_with("--")).count();
        for file in &rest[..files] {
            sources.push(properties_file(file.as_str())?);
        }
        rest = &rest[files..];
    }

    sources.push(dashed_source(COMMAND_LINE_SOURCE, rest)?);
    debug!(sources = sources.len(), "cli: built command-line sources");
    Ok(sources)
}
