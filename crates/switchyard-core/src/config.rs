// ── Runtime connector configuration ──
//
// How the engine treats one device: policy and tuning only. Transport
// settings live in `switchyard_api::TransportConfig`. The CLI builds both
// from a profile and hands them in; core never reads config files.

use std::time::Duration;

use crate::model::Vendor;

/// Configuration for one device connector.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConnectorConfig {
    /// Stable external key for the device (host name, inventory id). Part
    /// of the snapshot-cache identity.
    pub device_key: String,
    /// Skip detection and force a dialect.
    pub vendor_override: Option<Vendor>,
    /// Reject every mutation before touching the wire.
    pub read_only: bool,
    /// GETBULK max-repetitions handed to the transport on walks.
    pub max_repetitions: u32,
    /// Interfaces whose name starts with one of these are hidden.
    pub hide_interfaces: Vec<String>,
    /// Poll period of the Cisco config-copy state machine.
    pub save_poll_interval: Duration,
    /// Give up on a config copy after this long.
    pub save_timeout: Duration,
    /// Fixed row for config-copy tables; derived from the clock when unset.
    pub copy_row_index: Option<u32>,
}

impl Default for ConnectorConfig {
    fn default() -> Self {
        Self {
            device_key: String::new(),
            vendor_override: None,
            read_only: false,
            max_repetitions: 25,
            hide_interfaces: Vec::new(),
            save_poll_interval: Duration::from_secs(1),
            save_timeout: Duration::from_secs(30),
            copy_row_index: None,
        }
    }
}

impl ConnectorConfig {
    pub fn new(device_key: impl Into<String>) -> Self {
        Self {
            device_key: device_key.into(),
            ..Self::default()
        }
    }

    /// Row index for a config-copy request.
    pub(crate) fn copy_row(&self) -> u32 {
        self.copy_row_index.unwrap_or_else(|| {
            let secs = chrono::Utc::now().timestamp().rem_euclid(10_000);
            u32::try_from(secs).unwrap_or(0) + 1
        })
    }
}
