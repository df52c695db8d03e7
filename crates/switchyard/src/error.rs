//! CLI error types with miette diagnostics.
//!
//! Maps `CoreError` and `ConfigError` variants into user-facing errors
//! with actionable help text.

use miette::Diagnostic;
use thiserror::Error;

use switchyard_config::ConfigError;
use switchyard_core::CoreError;

/// Process exit codes.
pub mod exit_code {
    pub const GENERAL: i32 = 1;
    pub const USAGE: i32 = 2;
    pub const AUTH: i32 = 3;
    pub const NOT_FOUND: i32 = 4;
    pub const UNSUPPORTED: i32 = 5;
    pub const REJECTED: i32 = 6;
    pub const CONNECTION: i32 = 7;
}

#[derive(Debug, Error, Diagnostic)]
pub enum CliError {
    // ── Device source ────────────────────────────────────────────────
    #[error("No device source given")]
    #[diagnostic(
        code(switchyard::no_walk),
        help(
            "Pass a walk dump with --walk <FILE> (or SWITCHYARD_WALK).\n\
             Capture one with: snmpwalk -On -v2c -c <community> <host> .1"
        )
    )]
    NoWalk,

    #[error("Could not load walk dump {path}")]
    #[diagnostic(code(switchyard::walk_file))]
    WalkFile {
        path: String,
        #[source]
        source: switchyard_api::Error,
    },

    #[error("Device unreachable: {message}")]
    #[diagnostic(
        code(switchyard::unreachable),
        help("Check the address, community or v3 credentials, and the agent ACL.")
    )]
    Unreachable { message: String },

    // ── Device answers ───────────────────────────────────────────────
    #[error("Device rejected the change: {message}")]
    #[diagnostic(code(switchyard::rejected))]
    Rejected { message: String },

    #[error("Device data inconsistent: {message}")]
    #[diagnostic(code(switchyard::protocol))]
    DeviceData { message: String },

    #[error("'{operation}' is not supported on {vendor} devices")]
    #[diagnostic(
        code(switchyard::unsupported),
        help("Force a different dialect with --driver if detection picked the wrong one.")
    )]
    Unsupported { operation: String, vendor: String },

    // ── Resources ────────────────────────────────────────────────────
    #[error("Interface '{identifier}' not found")]
    #[diagnostic(
        code(switchyard::not_found),
        help("Run: switchyard interfaces list --all to see available interfaces")
    )]
    InterfaceNotFound { identifier: String },

    // ── Validation ───────────────────────────────────────────────────
    #[error("Invalid value for {field}: {reason}")]
    #[diagnostic(code(switchyard::validation))]
    Validation { field: String, reason: String },

    // ── Configuration ────────────────────────────────────────────────
    #[error("Profile '{name}' not found in configuration")]
    #[diagnostic(
        code(switchyard::profile_not_found),
        help(
            "Available profiles: {available}\n\
             Create one with: switchyard config add <NAME> --host <HOST>"
        )
    )]
    ProfileNotFound { name: String, available: String },

    #[error("No {secret} configured for profile '{profile}'")]
    #[diagnostic(
        code(switchyard::no_credentials),
        help("Store one with: switchyard config set-secret {profile} --kind {secret}")
    )]
    NoCredentials { profile: String, secret: String },

    #[error("Configuration error: {message}")]
    #[diagnostic(code(switchyard::config))]
    Config { message: String },

    // ── Snapshot ─────────────────────────────────────────────────────
    #[error("Snapshot cache error: {message}")]
    #[diagnostic(
        code(switchyard::cache),
        help("Snapshots only restore onto the same device and profile that wrote them.")
    )]
    Cache { message: String },

    #[error("Internal error: {0}")]
    #[diagnostic(code(switchyard::internal))]
    Internal(String),

    // ── IO / Serialization ───────────────────────────────────────────
    #[error(transparent)]
    Io(#[from] std::io::Error),

    #[error("JSON output failed: {0}")]
    #[diagnostic(code(switchyard::json))]
    Json(#[from] serde_json::Error),

    #[error("YAML output failed: {0}")]
    #[diagnostic(code(switchyard::yaml))]
    Yaml(#[from] serde_yaml::Error),
}

impl CliError {
    /// Map this error to an exit code for process termination.
    pub fn exit_code(&self) -> i32 {
        match self {
            Self::Unreachable { .. } => exit_code::CONNECTION,
            Self::NoCredentials { .. } => exit_code::AUTH,
            Self::InterfaceNotFound { .. } | Self::ProfileNotFound { .. } => exit_code::NOT_FOUND,
            Self::Rejected { .. } => exit_code::REJECTED,
            Self::Unsupported { .. } => exit_code::UNSUPPORTED,
            Self::NoWalk | Self::Validation { .. } => exit_code::USAGE,
            _ => exit_code::GENERAL,
        }
    }
}

// ── CoreError → CliError mapping ─────────────────────────────────────

impl From<CoreError> for CliError {
    fn from(err: CoreError) -> Self {
        match err {
            CoreError::Transport { message } => CliError::Unreachable { message },
            CoreError::Rejected { message } => CliError::Rejected { message },
            CoreError::Protocol { message } => CliError::DeviceData { message },
            CoreError::Validation { message } => CliError::Validation {
                field: "request".into(),
                reason: message,
            },
            CoreError::VendorUnsupported { operation, vendor } => {
                CliError::Unsupported { operation, vendor }
            }
            CoreError::Cache { message } => CliError::Cache { message },
            CoreError::Internal(message) => CliError::Internal(message),
        }
    }
}

// ── ConfigError → CliError mapping ───────────────────────────────────

impl From<ConfigError> for CliError {
    fn from(err: ConfigError) -> Self {
        match err {
            ConfigError::Validation { field, reason } => CliError::Validation { field, reason },
            ConfigError::UnknownProfile(name) => CliError::ProfileNotFound {
                name,
                available: "(see: switchyard config profiles)".into(),
            },
            ConfigError::NoCredentials { profile, secret } => {
                CliError::NoCredentials { profile, secret }
            }
            ConfigError::Io(e) => CliError::Io(e),
            other => CliError::Config {
                message: other.to_string(),
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn core_errors_keep_their_exit_class() {
        let rejected: CliError = CoreError::Rejected {
            message: "wrongValue".into(),
        }
        .into();
        assert_eq!(rejected.exit_code(), exit_code::REJECTED);

        let unreachable: CliError = CoreError::Transport {
            message: "timeout".into(),
        }
        .into();
        assert_eq!(unreachable.exit_code(), exit_code::CONNECTION);

        let unsupported: CliError = CoreError::VendorUnsupported {
            operation: "save running config".into(),
            vendor: "generic".into(),
        }
        .into();
        assert_eq!(unsupported.exit_code(), exit_code::UNSUPPORTED);
    }

    #[test]
    fn unknown_profile_is_not_found() {
        let err: CliError = ConfigError::UnknownProfile("lab".into()).into();
        assert_eq!(err.exit_code(), exit_code::NOT_FOUND);
    }
}
