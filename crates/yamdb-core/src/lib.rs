//! yamdb/crates/yamdb-core/src/lib.rs
//!
//! The record schemas, validation rules and persistence ports for YaMDb.

pub mod constants;
pub mod error;
pub mod models;
pub mod traits;
pub mod validation;

// Re-exporting for easier access in other crates
pub use error::*;
pub use models::*;
pub use traits::*;
pub use validation::FieldRules;
