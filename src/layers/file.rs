//! Properties files on disk.
//!
//! # Example
//!
//! ```rust,ignore
//! use wrench::layers::file::properties_file;
//!
//! let source = properties_file("config/server.properties")?;
//! let configuration = factory.create([source])?;
//! ```

use camino::Utf8Path;

#[allow(unused_imports)]
use crate::macros::{debug, trace};
use crate::error::SourceError;
use crate::layers::properties::properties_source;
use crate::source::Source;

/// Read a properties file into a source named after its path.
pub fn properties_file(path: impl AsRef<Utf8Path>) -> Result<Source, SourceError> {
    let path = path.as_ref();
    let text = std::fs::read_to_string(path).map_err(|error| SourceError::Io {
        path: path.to_owned(),
        error,
    })?;
    let source = properties_source(path.as_str(), &text);
    debug!(path = %path, entries = source.len(), "file: loaded properties");
    Ok(source)
}
