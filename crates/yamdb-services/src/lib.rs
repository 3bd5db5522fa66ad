//! # yamdb-services
//!
//! The upstream caller of the model layer: builds records, runs their
//! validation explicitly, and only then hands them to a repository port.

pub mod catalog;
pub mod reviews;
pub mod users;

pub use catalog::CatalogService;
pub use reviews::ReviewService;
pub use users::UserService;

use log::warn;
use yamdb_core::error::{AppError, Result};

/// Logs a rejected record and passes the error through untouched.
pub(crate) fn checked(entity: &str, outcome: Result<()>) -> Result<()> {
    if let Err(AppError::ValidationError(reason)) = &outcome {
        warn!("rejected {entity}: {reason}");
    }
    outcome
}
