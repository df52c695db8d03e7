//! Offline device session: a connector over the replay transport.
//!
//! Every SET the engine issues lands in the replay store instead of a
//! real agent, so mutations become dry runs whose PDUs can be shown.

use std::sync::Arc;

use switchyard_api::{ReplayTransport, VarBind};
use switchyard_core::{Connector, Device};
use tracing::debug;

use crate::cli::GlobalOpts;
use crate::config;
use crate::error::CliError;

pub struct DeviceSession {
    pub connector: Connector,
    transport: Arc<ReplayTransport>,
}

impl DeviceSession {
    /// Load the walk dump, open the connector, and restore `--snapshot`.
    pub async fn open(global: &GlobalOpts) -> Result<Self, CliError> {
        let walk = global.walk.as_deref().ok_or(CliError::NoWalk)?;
        let cfg = config::load(global)?;
        let connector_config = config::connector_config(global, &cfg, walk)?;

        let transport = ReplayTransport::from_file(walk).map_err(|source| CliError::WalkFile {
            path: walk.display().to_string(),
            source,
        })?;
        let transport = Arc::new(transport);
        debug!(instances = transport.len(), walk = %walk.display(), "walk dump loaded");

        let connector = Connector::open(transport.clone(), connector_config).await?;

        if let Some(path) = global.snapshot.as_deref() {
            let json = std::fs::read_to_string(path)?;
            connector.deserialize(&json).await?;
            debug!(snapshot = %path.display(), "snapshot restored");
        }

        Ok(Self {
            connector,
            transport,
        })
    }

    /// Current model with basic info loaded.
    pub async fn device(&self) -> Result<Device, CliError> {
        self.connector.get_basic_info(false).await?;
        Ok(self.connector.device().await)
    }

    /// SET PDUs issued so far, in order.
    pub fn sent_sets(&self) -> Vec<Vec<VarBind>> {
        self.transport.set_requests()
    }
}
