#![allow(unused_imports)]
#![allow(unused_macros)]

// Logging macros for the resolution pipeline.
//
// With the `tracing` feature (and always under test) they forward to
// `tracing`; otherwise they expand to nothing and their arguments are never
// evaluated.

// -----------------------------------------------------------------------------
// Enabled
// -----------------------------------------------------------------------------

/// Per-entry detail: each source contribution, each ignored variable.
#[cfg(any(feature = "tracing", test))]
macro_rules! trace {
    ($($arg:tt)*) => { ::tracing::trace!($($arg)*) }
}

/// Per-phase summaries: sources loaded, phases failed, configurations built.
#[cfg(any(feature = "tracing", test))]
macro_rules! debug {
    ($($arg:tt)*) => { ::tracing::debug!($($arg)*) }
}

// -----------------------------------------------------------------------------
// Disabled
// -----------------------------------------------------------------------------

#[cfg(not(any(feature = "tracing", test)))]
macro_rules! trace {
    ($($arg:tt)*) => {};
}

#[cfg(not(any(feature = "tracing", test)))]
macro_rules! debug {
    ($($arg:tt)*) => {};
}

pub(crate) use debug;
pub(crate) use trace;
