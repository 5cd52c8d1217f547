//! CLI subcommand implementations.

pub mod departments;
pub mod employees;
pub mod sweep;
