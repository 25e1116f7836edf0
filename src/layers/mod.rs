//! Source producers.
//!
//! Each layer turns one kind of external input into a [`Source`](crate::Source)
//! the driver consumes:
//! - `properties`: `.properties` text
//! - `file`: properties files on disk
//! - `cli`: `--name value` arguments and the command-line composition
//! - `env`: prefixed environment variables

pub mod cli;
pub mod env;
pub mod file;
pub mod properties;
