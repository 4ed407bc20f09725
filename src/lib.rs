//! field-types - A registry of field types for a data-modeling layer
//!
//! Each field type bundles an acceptance test, a cast into a store
//! expression, and a closed table of named validators.

pub mod config;
pub mod observability;
pub mod types;
