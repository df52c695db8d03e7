// ── Core error types ──
//
// User-facing errors from switchyard-core. Consumers never see raw
// transport failures; the `From<switchyard_api::Error>` impl translates
// them into the engine's taxonomy.

use thiserror::Error;

/// Unified error type for the core crate.
#[derive(Debug, Error)]
pub enum CoreError {
    // ── Transport errors ─────────────────────────────────────────────
    /// Timeout, authentication, or network failure. Retries already
    /// happened inside the transport, so this is terminal for the operation.
    #[error("Device unreachable: {message}")]
    Transport { message: String },

    /// The device answered but refused a write (SET error status or a
    /// failed commit check).
    #[error("Device rejected the change: {message}")]
    Rejected { message: String },

    // ── Data errors ──────────────────────────────────────────────────
    /// The device's data is inconsistent or an expected object is missing.
    #[error("Device data inconsistent: {message}")]
    Protocol { message: String },

    // ── Operation errors ─────────────────────────────────────────────
    #[error("Validation failed: {message}")]
    Validation { message: String },

    #[error("Operation not supported: {operation} on {vendor} devices")]
    VendorUnsupported { operation: String, vendor: String },

    // ── Cache errors ─────────────────────────────────────────────────
    #[error("Snapshot cache error: {message}")]
    Cache { message: String },

    // ── Internal errors ──────────────────────────────────────────────
    #[error("Internal error: {0}")]
    Internal(String),
}

impl CoreError {
    pub(crate) fn validation(message: impl Into<String>) -> Self {
        Self::Validation {
            message: message.into(),
        }
    }

    pub(crate) fn protocol(message: impl Into<String>) -> Self {
        Self::Protocol {
            message: message.into(),
        }
    }

    pub(crate) fn unsupported(operation: impl Into<String>, vendor: impl ToString) -> Self {
        Self::VendorUnsupported {
            operation: operation.into(),
            vendor: vendor.to_string(),
        }
    }

    /// Short label for the error class, used in `ErrorState` descriptions.
    pub fn kind(&self) -> &'static str {
        match self {
            Self::Transport { .. } => "transport",
            Self::Rejected { .. } => "rejected",
            Self::Protocol { .. } => "protocol",
            Self::Validation { .. } => "validation",
            Self::VendorUnsupported { .. } => "unsupported",
            Self::Cache { .. } => "cache",
            Self::Internal(_) => "internal",
        }
    }

    pub fn is_rejected(&self) -> bool {
        matches!(self, Self::Rejected { .. })
    }

    pub fn is_transport(&self) -> bool {
        matches!(self, Self::Transport { .. })
    }
}

// ── Conversion from transport-layer errors ───────────────────────────

impl From<switchyard_api::Error> for CoreError {
    fn from(err: switchyard_api::Error) -> Self {
        use switchyard_api::Error as Api;

        match err {
            e @ (Api::Timeout { .. } | Api::Authentication { .. } | Api::Network { .. }) => {
                CoreError::Transport {
                    message: e.to_string(),
                }
            }
            Api::Io(e) => CoreError::Transport {
                message: e.to_string(),
            },
            Api::NoSuchObject { oid } => CoreError::Protocol {
                message: format!("device does not implement {oid}"),
            },
            e @ Api::SetRejected { .. } => CoreError::Rejected {
                message: e.to_string(),
            },
            Api::CommitCheck { message } => CoreError::Rejected { message },
            Api::Rpc { message } => CoreError::Rejected { message },
            e @ Api::Parse { .. } => CoreError::Internal(e.to_string()),
        }
    }
}

impl From<serde_json::Error> for CoreError {
    fn from(err: serde_json::Error) -> Self {
        CoreError::Cache {
            message: err.to_string(),
        }
    }
}
