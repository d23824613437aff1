//! CLI command implementations.

pub mod algorithms;
pub mod presets;
pub mod process;
