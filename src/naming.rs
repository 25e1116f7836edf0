//! Naming policies that turn declared field names into property names.

use std::fmt;

use heck::{ToKebabCase, ToShoutySnakeCase, ToSnakeCase};

/// How a declared field name becomes a property name.
#[derive(Clone, Copy, Default)]
pub enum NameTransformer {
    /// Use the field name as declared.
    #[default]
    Identity,
    /// `myBinaryNumber` or `my_binary_number` becomes `my-binary-number`.
    KebabCase,
    /// `myBinaryNumber` becomes `my.binary.number`.
    DotCase,
    /// `myBinaryNumber` becomes `my_binary_number`.
    SnakeCase,
    /// `myBinaryNumber` becomes `MY_BINARY_NUMBER`.
    ShoutySnakeCase,
    /// A caller-supplied function.
    Custom(fn(&str) -> String),
}

impl NameTransformer {
    /// Apply the policy to a declared field name.
    pub fn apply(&self, field: &str) -> String {
        match self {
            NameTransformer::Identity => field.to_string(),
            NameTransformer::KebabCase => field.to_kebab_case(),
            NameTransformer::DotCase => field.to_kebab_case().replace('-', "."),
            NameTransformer::SnakeCase => field.to_snake_case(),
            NameTransformer::ShoutySnakeCase => field.to_shouty_snake_case(),
            NameTransformer::Custom(transform) => transform(field),
        }
    }
}

impl fmt::Debug for NameTransformer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            NameTransformer::Identity => f.write_str("Identity"),
            NameTransformer::KebabCase => f.write_str("KebabCase"),
            NameTransformer::DotCase => f.write_str("DotCase"),
            NameTransformer::SnakeCase => f.write_str("SnakeCase"),
            NameTransformer::ShoutySnakeCase => f.write_str("ShoutySnakeCase"),
            NameTransformer::Custom(_) => f.write_str("Custom(..)"),
        }
    }
}
