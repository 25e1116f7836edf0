use std::fmt;

use camino::Utf8PathBuf;

use crate::validation::Bad;

// ============================================================================
// Definition errors
// ============================================================================

/// A schema that cannot be turned into a registry.
///
/// Every problem found while building the registry is reported.
#[derive(Debug, Clone)]
pub struct DefinitionError {
    /// The schema's name.
    pub schema: &'static str,
    /// Everything wrong with the declaration, in declaration order.
    pub problems: Vec<DefinitionProblem>,
}

impl fmt::Display for DefinitionError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "invalid definition of {}:", self.schema)?;
        for problem in &self.problems {
            write!(f, "\n    {}", problem.label())?;
        }
        Ok(())
    }
}

impl std::error::Error for DefinitionError {}

/// One mistake in a schema declaration.
#[derive(Debug, Clone, PartialEq)]
#[non_exhaustive]
pub enum DefinitionProblem {
    /// A field was declared with an empty name.
    EmptyFieldName,

    /// The same field was declared twice.
    DuplicateField {
        /// The repeated field.
        field: &'static str,
    },

    /// Two fields resolve to the same property name.
    DuplicateName {
        /// The shared property name.
        name: String,
        /// The field declared first.
        first: &'static str,
        /// The field declared second.
        second: &'static str,
    },

    /// A field has both an explicit name and a field-level name transformer.
    ConflictingNaming {
        /// The field.
        field: &'static str,
    },

    /// No converter exists for the declared type.
    MissingConverter {
        /// The field.
        field: &'static str,
        /// The declared type.
        type_name: &'static str,
    },

    /// The default literal does not convert.
    InvalidDefault {
        /// The field.
        field: &'static str,
        /// The literal as written.
        literal: String,
        /// The converter's message.
        message: String,
    },

    /// The field declares a default more than once.
    DefaultDeclaredTwice {
        /// The field.
        field: &'static str,
    },

    /// The field declares both a default and maybe-null.
    DefaultWithMaybeNull {
        /// The field.
        field: &'static str,
    },

    /// The field is maybe-null but its type cannot represent null.
    NullWithoutZero {
        /// The field.
        field: &'static str,
        /// The declared type.
        type_name: &'static str,
    },
}

impl DefinitionProblem {
    /// Returns an error code for this problem.
    pub const fn code(&self) -> &'static str {
        match self {
            DefinitionProblem::EmptyFieldName => "definition::empty_field",
            DefinitionProblem::DuplicateField { .. } => "definition::duplicate_field",
            DefinitionProblem::DuplicateName { .. } => "definition::duplicate_name",
            DefinitionProblem::ConflictingNaming { .. } => "definition::conflicting_naming",
            DefinitionProblem::MissingConverter { .. } => "definition::missing_converter",
            DefinitionProblem::InvalidDefault { .. } => "definition::invalid_default",
            DefinitionProblem::DefaultDeclaredTwice { .. } => "definition::default_twice",
            DefinitionProblem::DefaultWithMaybeNull { .. } => "definition::default_with_null",
            DefinitionProblem::NullWithoutZero { .. } => "definition::null_without_zero",
        }
    }

    /// A one-line description.
    pub fn label(&self) -> String {
        match self {
            DefinitionProblem::EmptyFieldName => "a field was declared with an empty name".into(),
            DefinitionProblem::DuplicateField { field } => {
                format!("field '{field}' is declared more than once")
            }
            DefinitionProblem::DuplicateName {
                name,
                first,
                second,
            } => format!("fields '{first}' and '{second}' both use the property name '{name}'"),
            DefinitionProblem::ConflictingNaming { field } => format!(
                "field '{field}' declares both an explicit name and a name transformer"
            ),
            DefinitionProblem::MissingConverter { field, type_name } => {
                format!("no converter for type {type_name} of field '{field}'")
            }
            DefinitionProblem::InvalidDefault {
                field,
                literal,
                message,
            } => format!("default value '{literal}' of field '{field}' does not convert: {message}"),
            DefinitionProblem::DefaultDeclaredTwice { field } => {
                format!("field '{field}' declares a default more than once")
            }
            DefinitionProblem::DefaultWithMaybeNull { field } => {
                format!("field '{field}' declares both a default value and maybe-null")
            }
            DefinitionProblem::NullWithoutZero { field, type_name } => format!(
                "field '{field}' is maybe-null but {type_name} has no null value, declare it as an Option"
            ),
        }
    }
}

impl fmt::Display for DefinitionProblem {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.label())
    }
}

// ============================================================================
// Conversion errors
// ============================================================================

/// A converter rejected a source's text.
#[derive(Debug, Clone, PartialEq)]
pub struct ConvertError {
    /// The property being converted.
    pub property: String,
    /// The source the text came from.
    pub source: String,
    /// The converter's name.
    pub converter: String,
    /// The converter's message.
    pub message: String,
}

impl fmt::Display for ConvertError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Conversion failed on property '{}' from {}: {}: {}",
            self.property, self.source, self.converter, self.message
        )
    }
}

impl std::error::Error for ConvertError {}

// ============================================================================
// Configuration errors
// ============================================================================

/// Failure to create a configuration.
///
/// Carries every finding of the stage that failed.
#[derive(Debug, Clone, PartialEq)]
pub enum ConfigurationError {
    /// The sources could not be resolved: unknown keys, failed conversions,
    /// missing values or bad tweaks.
    Declaration {
        /// The schema's name.
        schema: &'static str,
        /// Every finding, in the order found.
        bads: Vec<Bad>,
    },
    /// The resolved configuration broke a whole-object rule.
    Validation {
        /// The schema's name.
        schema: &'static str,
        /// Every violated rule, in the order found.
        bads: Vec<Bad>,
    },
}

impl ConfigurationError {
    /// The findings.
    pub fn bads(&self) -> &[Bad] {
        match self {
            ConfigurationError::Declaration { bads, .. }
            | ConfigurationError::Validation { bads, .. } => bads,
        }
    }

    /// The schema's name.
    pub fn schema(&self) -> &'static str {
        match self {
            ConfigurationError::Declaration { schema, .. }
            | ConfigurationError::Validation { schema, .. } => schema,
        }
    }

    /// Whether resolution failed before validation.
    pub fn is_declaration(&self) -> bool {
        matches!(self, ConfigurationError::Declaration { .. })
    }

    /// Whether validation failed.
    pub fn is_validation(&self) -> bool {
        matches!(self, ConfigurationError::Validation { .. })
    }
}

impl fmt::Display for ConfigurationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConfigurationError::Declaration { schema, bads } => {
                write!(f, "could not create {schema}:")?;
                for bad in bads {
                    write!(f, "\n    {bad}")?;
                }
            }
            ConfigurationError::Validation { schema, bads } => {
                write!(f, "{schema} failed validation:")?;
                for bad in bads {
                    write!(f, "\n    {bad}")?;
                    for property in bad.properties() {
                        write!(
                            f,
                            "\n        {} -> '{}' from {}",
                            property.property().name(),
                            property.display_value(),
                            property.source().name()
                        )?;
                    }
                }
            }
        }
        Ok(())
    }
}

impl std::error::Error for ConfigurationError {}

// ============================================================================
// Source errors
// ============================================================================

/// A source producer could not build its source.
#[derive(Debug)]
pub enum SourceError {
    /// A file could not be read.
    Io {
        /// The file.
        path: Utf8PathBuf,
        /// The underlying error.
        error: std::io::Error,
    },
    /// Command-line arguments are malformed.
    Arguments {
        /// What is wrong.
        message: String,
    },
}

impl fmt::Display for SourceError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SourceError::Io { path, error } => write!(f, "cannot read {path}: {error}"),
            SourceError::Arguments { message } => write!(f, "invalid arguments: {message}"),
        }
    }
}

impl std::error::Error for SourceError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            SourceError::Io { error, .. } => Some(error),
            SourceError::Arguments { .. } => None,
        }
    }
}

// ============================================================================
// Command-line errors
// ============================================================================

/// Failure of [`Factory::create_from_command_line`](crate::Factory::create_from_command_line).
#[derive(Debug)]
pub enum CommandLineError {
    /// The arguments or a named file could not be turned into sources.
    Source(SourceError),
    /// The sources did not resolve.
    Configuration(ConfigurationError),
}

impl fmt::Display for CommandLineError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CommandLineError::Source(error) => error.fmt(f),
            CommandLineError::Configuration(error) => error.fmt(f),
        }
    }
}

impl std::error::Error for CommandLineError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            CommandLineError::Source(error) => Some(error),
            CommandLineError::Configuration(error) => Some(error),
        }
    }
}

impl From<SourceError> for CommandLineError {
    fn from(error: SourceError) -> Self {
        CommandLineError::Source(error)
    }
}

impl From<ConfigurationError> for CommandLineError {
    fn from(error: ConfigurationError) -> Self {
        CommandLineError::Configuration(error)
    }
}
