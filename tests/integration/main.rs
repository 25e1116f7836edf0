#[path = "../common/mod.rs"]
mod common;

mod fixtures;

mod inspection;
mod layers;
mod resolution;
mod tweaks;
mod validation;
