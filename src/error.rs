//! Error classification shared by every service in the crate.

use serde::Serialize;

/// Coarse category of a failure, used by callers to choose a response.
///
/// API layers map [`ErrorKind::Validation`] to a bad-request response and
/// [`ErrorKind::NotFound`] to a not-found response. None of the kinds are
/// retried by the crate itself.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ErrorKind {
    /// Input was missing, blank, malformed, or outside a closed vocabulary.
    Validation,
    /// A referenced task, artifact, or version does not exist.
    NotFound,
    /// A schema migration step failed; the process must not continue.
    Migration,
    /// The store has no usable connection.
    Unavailable,
    /// Any other storage or rendering failure.
    Internal,
}
