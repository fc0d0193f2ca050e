//! Inputs: form schemas and translation records.

pub mod schema;
pub mod translation;
