//! Shared database schema, migrations, and query builders.

pub mod members;
pub mod migrations;
pub mod tables;
pub mod teams;

// Re-export tables for convenience
pub use tables::*;

/// A built statement: SQL text plus its bound values.
pub type Built = (String, sea_query::Values);
