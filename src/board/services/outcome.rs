//! Uniform success/failure projection for UI callers.

use serde::Serialize;
use std::fmt;

/// `{ ok, error? }` view of an operation result.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct OperationOutcome {
    /// Whether the operation succeeded.
    pub ok: bool,
    /// Human-readable failure message.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl OperationOutcome {
    /// A successful outcome.
    #[must_use]
    pub const fn success() -> Self {
        Self {
            ok: true,
            error: None,
        }
    }

    /// A failed outcome carrying `error`'s message.
    #[must_use]
    pub fn failure(error: &impl fmt::Display) -> Self {
        Self {
            ok: false,
            error: Some(error.to_string()),
        }
    }
}

impl<T, E> From<&Result<T, E>> for OperationOutcome
where
    E: fmt::Display,
{
    fn from(result: &Result<T, E>) -> Self {
        match result {
            Ok(_) => Self::success(),
            Err(err) => Self::failure(err),
        }
    }
}
