//! Boundary adapters: CSV seed input and JSON output.

pub mod csv;
pub mod json;
