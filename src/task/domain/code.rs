//! Human-readable task codes.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Prefix shared by every allocated task code.
pub const TASK_CODE_PREFIX: &str = "TASK";

const SEPARATOR: char = '-';
const MIN_DIGITS: usize = 4;

/// Unique human-readable task code such as `TASK-0042`.
///
/// Codes are assigned once at creation and never change. The numeric suffix
/// is zero-padded to at least four digits and grows past that when needed.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TaskCode(String);

impl TaskCode {
    /// Builds the code for a sequence number.
    #[must_use]
    pub fn from_sequence(sequence: u64) -> Self {
        Self(format!(
            "{TASK_CODE_PREFIX}{SEPARATOR}{sequence:0width$}",
            width = MIN_DIGITS
        ))
    }

    /// Allocates the code following the highest sequence among `existing`.
    ///
    /// Codes that do not carry the task prefix or whose suffix is not
    /// numeric are ignored. With no usable codes the first code is
    /// `TASK-0001`. Freed numbers are reused when the highest code has been
    /// deleted.
    #[must_use]
    pub fn next_after<'a>(existing: impl IntoIterator<Item = &'a str>) -> Self {
        let highest = existing
            .into_iter()
            .filter_map(parse_sequence)
            .max()
            .unwrap_or(0);
        Self::from_sequence(highest.saturating_add(1))
    }

    /// Wraps a code read back from storage without validation.
    #[must_use]
    pub fn from_persisted(value: impl Into<String>) -> Self {
        Self(value.into())
    }

    /// Returns the numeric suffix, if the code has one.
    #[must_use]
    pub fn sequence(&self) -> Option<u64> {
        parse_sequence(&self.0)
    }

    /// Returns the code as `str`.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl AsRef<str> for TaskCode {
    fn as_ref(&self) -> &str {
        self.as_str()
    }
}

impl fmt::Display for TaskCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

fn parse_sequence(code: &str) -> Option<u64> {
    let (prefix, suffix) = code.split_once(SEPARATOR)?;
    let numeric = !suffix.is_empty() && suffix.bytes().all(|b| b.is_ascii_digit());
    if prefix != TASK_CODE_PREFIX || !numeric {
        return None;
    }
    suffix.parse().ok()
}
