//! CLI command implementations.

pub mod execute;
pub mod organize;
