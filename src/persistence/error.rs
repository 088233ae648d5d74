//! Errors raised by the store lifecycle and schema migration.

use crate::error::ErrorKind;
use thiserror::Error;

/// Failures of the shared store itself, independent of any repository.
#[derive(Debug, Error)]
pub enum StoreError {
    /// No connection could be obtained; the store was never opened or has
    /// been exhausted.
    #[error("store unavailable: {0}")]
    Unavailable(String),

    /// A schema migration step failed. Startup must abort.
    #[error("schema migration failed at step '{step}': {reason}")]
    Migration {
        /// Name of the migration step that failed.
        step: &'static str,
        /// Underlying failure description.
        reason: String,
    },

    /// A query failed outside a migration.
    #[error("query failed: {0}")]
    Query(#[from] diesel::result::Error),

    /// The blocking worker running a query panicked or was cancelled.
    #[error("blocking store task failed: {0}")]
    Join(String),
}

impl StoreError {
    /// Builds a migration error for `step`.
    pub fn migration(step: &'static str, reason: impl ToString) -> Self {
        Self::Migration {
            step,
            reason: reason.to_string(),
        }
    }

    /// Classifies the error for callers.
    #[must_use]
    pub const fn kind(&self) -> ErrorKind {
        match self {
            Self::Unavailable(_) => ErrorKind::Unavailable,
            Self::Migration { .. } => ErrorKind::Migration,
            Self::Query(_) | Self::Join(_) => ErrorKind::Internal,
        }
    }
}
