//! Deciding whether terminal output gets color.

use std::env::var_os;

use supports_color::Stream;

/// When to color help text and dumps.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ColorChoice {
    /// Color if stdout supports it.
    #[default]
    Auto,
    /// Always emit ANSI escapes.
    Always,
    /// Never emit ANSI escapes.
    Never,
}

impl ColorChoice {
    /// Settle the choice for the current process.
    pub fn enabled(self) -> bool {
        match self {
            ColorChoice::Auto => should_use_color(),
            ColorChoice::Always => true,
            ColorChoice::Never => false,
        }
    }
}

/// Whether stdout should be colored.
///
/// Honors `NO_COLOR` and `FORCE_COLOR` through `supports-color`. Snapshot
/// runs under `insta` are never colored.
pub fn should_use_color() -> bool {
    let snapshotting = ["INSTA_UPDATE", "INSTA_WORKSPACE", "INSTA_SNAPSHOT_UPDATE"]
        .iter()
        .any(|name| var_os(name).is_some());
    !snapshotting && supports_color::on(Stream::Stdout).is_some()
}
