//! CLI command implementations.

pub mod check;
pub mod kinds;
pub mod process;
