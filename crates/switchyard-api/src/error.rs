use thiserror::Error;

/// Top-level error type for the `switchyard-api` crate.
///
/// Covers every failure mode a transport can report: SNMP request
/// failures, RPC/commit failures, and the replay transport's own
/// dump parsing. `switchyard-core` maps these into its error taxonomy.
#[derive(Debug, Error)]
pub enum Error {
    // ── Transport ───────────────────────────────────────────────────
    /// No response after the transport exhausted its retries.
    #[error("Request to {target} timed out after {retries} retries")]
    Timeout { target: String, retries: u32 },

    /// Community rejected, USM user unknown, or authentication digest mismatch.
    #[error("Authentication failed: {message}")]
    Authentication { message: String },

    /// Socket-level failure (unreachable host, refused connection, DNS).
    #[error("Network error: {message}")]
    Network { message: String },

    // ── SNMP ────────────────────────────────────────────────────────
    /// The agent has no instance at the requested OID.
    #[error("No such object: {oid}")]
    NoSuchObject { oid: String },

    /// The agent answered a SET with an error status.
    #[error("SET rejected for {oid}: {reason}")]
    SetRejected { oid: String, reason: String },

    // ── RPC ─────────────────────────────────────────────────────────
    /// Error reply from the RPC endpoint.
    #[error("RPC error: {message}")]
    Rpc { message: String },

    /// The candidate configuration failed `commit check`.
    #[error("Commit check failed: {message}")]
    CommitCheck { message: String },

    // ── Replay ──────────────────────────────────────────────────────
    /// A walk dump line could not be parsed.
    #[error("Invalid walk dump at line {line}: {message}")]
    Parse { line: usize, message: String },

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl Error {
    /// Returns `true` if this error comes from the network path rather than
    /// from a well-formed answer of the agent.
    pub fn is_communication(&self) -> bool {
        matches!(
            self,
            Self::Timeout { .. } | Self::Authentication { .. } | Self::Network { .. }
        )
    }

    /// Returns `true` if the agent simply does not implement the object.
    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::NoSuchObject { .. })
    }

    /// Returns `true` if the agent refused a write.
    pub fn is_rejected(&self) -> bool {
        matches!(self, Self::SetRejected { .. } | Self::CommitCheck { .. })
    }
}
