use serde::{Deserialize, Serialize};

use crate::error::CoreError;

/// Outcome of the most recent connector operation.
///
/// Cleared when an operation starts and set when it fails (or completes
/// only partially), so callers can inspect the device state without
/// holding on to the returned `Result`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ErrorState {
    pub status: bool,
    pub description: String,
    pub details: String,
}

impl ErrorState {
    pub fn clear(&mut self) {
        *self = Self::default();
    }

    pub fn set(&mut self, description: impl Into<String>, details: impl Into<String>) {
        self.status = true;
        self.description = description.into();
        self.details = details.into();
    }

    pub fn record(&mut self, operation: &str, err: &CoreError) {
        self.set(format!("{operation} failed ({})", err.kind()), err.to_string());
    }

    pub fn is_error(&self) -> bool {
        self.status
    }
}
