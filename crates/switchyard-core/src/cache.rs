// ── Snapshot cache ──
//
// Versioned JSON snapshot of the cacheable part of the model. Learned
// addresses and LLDP neighbors are client data and never stored. Entries
// are keyed by device identity; any mismatch on load means "no entry".
// A snapshot also records the dialect it was read under, so one taken
// before a firmware change does not feed a session with another strategy.

use std::collections::BTreeMap;

use chrono::{DateTime, Utc};
use dashmap::DashMap;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::error::CoreError;
use crate::model::{Device, Interface, PoeData, StackMember, SystemInfo, Vendor, Vlan};
use crate::vendor::Strategy;

pub const SNAPSHOT_VERSION: u32 = 1;

/// Who a snapshot belongs to.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct DeviceIdentity {
    pub device_key: String,
    pub object_id: String,
    pub name: String,
}

impl DeviceIdentity {
    /// Store key for this identity.
    pub fn cache_key(&self) -> String {
        format!("{}|{}|{}", self.device_key, self.object_id, self.name)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Snapshot {
    pub version: u32,
    pub identity: DeviceIdentity,
    pub taken_at: DateTime<Utc>,
    pub system: SystemInfo,
    pub vendor: Vendor,
    /// Whether the device supported Q-Bridge at capture time.
    pub qbridge: bool,
    pub interfaces: BTreeMap<u32, Interface>,
    pub vlans: BTreeMap<u16, Vlan>,
    pub poe: PoeData,
    pub stack: BTreeMap<u32, StackMember>,
    pub warnings: Vec<String>,
    pub hardware_loaded: bool,
}

impl Snapshot {
    pub fn capture(identity: DeviceIdentity, qbridge: bool, device: &Device) -> Self {
        let mut interfaces = device.interfaces.clone();
        for iface in interfaces.values_mut() {
            iface.ethernet.clear();
            iface.lldp.clear();
        }
        Self {
            version: SNAPSHOT_VERSION,
            identity,
            taken_at: Utc::now(),
            system: device.system.clone(),
            vendor: device.vendor,
            qbridge,
            interfaces,
            vlans: device.vlans.clone(),
            poe: device.poe.clone(),
            stack: device.stack.clone(),
            warnings: device.warnings.clone(),
            hardware_loaded: device.hardware_loaded,
        }
    }

    pub fn to_json(&self) -> Result<String, CoreError> {
        Ok(serde_json::to_string(self)?)
    }

    /// Parse and check the format version.
    pub fn from_json(json: &str) -> Result<Self, CoreError> {
        let snapshot: Self = serde_json::from_str(json)?;
        if snapshot.version != SNAPSHOT_VERSION {
            return Err(CoreError::Cache {
                message: format!(
                    "snapshot version {} (expected {SNAPSHOT_VERSION})",
                    snapshot.version
                ),
            });
        }
        Ok(snapshot)
    }

    /// Check that this snapshot belongs to `identity` and was read under
    /// the same dialect and Q-Bridge support as `strategy`.
    pub fn check(&self, identity: &DeviceIdentity, strategy: &Strategy) -> Result<(), CoreError> {
        if self.identity != *identity {
            return Err(CoreError::Cache {
                message: format!(
                    "snapshot belongs to {}, not {}",
                    self.identity.cache_key(),
                    identity.cache_key()
                ),
            });
        }
        if self.vendor != strategy.vendor || self.qbridge != strategy.qbridge {
            return Err(CoreError::Cache {
                message: format!(
                    "snapshot was read as {} (Q-Bridge {}), the device is now {} (Q-Bridge {})",
                    self.vendor, self.qbridge, strategy.vendor, strategy.qbridge
                ),
            });
        }
        Ok(())
    }

    /// Rebuild a model. Join inputs recoverable from cached fields are
    /// restored too.
    pub fn into_device(self) -> Device {
        let mut device = Device::new(self.vendor);
        device.system = self.system;
        device.interfaces = self.interfaces;
        device.vlans = self.vlans;
        device.poe = self.poe;
        device.stack = self.stack;
        device.warnings = self.warnings;
        device.hardware_loaded = self.hardware_loaded;
        device.rebuild_join_state();
        device
    }
}

/// Opaque per-session snapshot storage.
pub trait SnapshotStore: Send + Sync {
    fn load(&self, key: &str) -> Option<String>;
    fn store(&self, key: &str, json: String);
    fn remove(&self, key: &str);
}

/// Concurrent in-memory store.
#[derive(Debug, Default)]
pub struct MemoryStore {
    entries: DashMap<String, String>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl SnapshotStore for MemoryStore {
    fn load(&self, key: &str) -> Option<String> {
        self.entries.get(key).map(|entry| entry.value().clone())
    }

    fn store(&self, key: &str, json: String) {
        self.entries.insert(key.to_string(), json);
    }

    fn remove(&self, key: &str) {
        self.entries.remove(key);
    }
}

/// Load the snapshot for `identity`, discarding unreadable, foreign or
/// stale entries.
pub fn load_snapshot(
    store: &dyn SnapshotStore,
    identity: &DeviceIdentity,
    strategy: &Strategy,
) -> Option<Snapshot> {
    let key = identity.cache_key();
    let json = store.load(&key)?;
    let checked = Snapshot::from_json(&json)
        .and_then(|snapshot| snapshot.check(identity, strategy).map(|()| snapshot));
    match checked {
        Ok(snapshot) => Some(snapshot),
        Err(err) => {
            debug!(key, %err, "discarding snapshot");
            store.remove(&key);
            None
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;
    use crate::model::{EthernetAddress, MacAddress};

    fn identity() -> DeviceIdentity {
        DeviceIdentity {
            device_key: "sw1".into(),
            object_id: ".1.3.6.1.4.1.9.1.1208".into(),
            name: "core".into(),
        }
    }

    fn strategy(qbridge: bool) -> Strategy {
        Strategy::for_vendor(Vendor::CiscoVtp, qbridge)
    }

    fn device() -> Device {
        let mut d = Device::new(Vendor::CiscoVtp);
        let mut iface = Interface::new(1);
        iface.port_id = Some(7);
        let mac = MacAddress::new("00:11:22:33:44:55");
        iface
            .ethernet
            .insert(mac.clone(), EthernetAddress::new(mac, Some(10)));
        d.interfaces.insert(1, iface);
        d.vlans.insert(10, Vlan::new(10, "data"));
        d
    }

    #[test]
    fn client_data_is_not_cached() {
        let snapshot = Snapshot::capture(identity(), false, &device());
        assert!(snapshot.interfaces[&1].ethernet.is_empty());
    }

    #[test]
    fn restore_rebuilds_bridge_map() {
        let json = Snapshot::capture(identity(), false, &device()).to_json().unwrap();
        let restored = Snapshot::from_json(&json).unwrap().into_device();
        assert_eq!(restored.if_index_for_port(7), Some(1));
        assert_eq!(restored.vlans[&10].name, "data");
        assert_eq!(restored.vendor, Vendor::CiscoVtp);
    }

    #[test]
    fn version_mismatch_is_a_cache_error() {
        let mut snapshot = Snapshot::capture(identity(), false, &device());
        snapshot.version = 99;
        let json = serde_json::to_string(&snapshot).unwrap();
        assert_eq!(Snapshot::from_json(&json).unwrap_err().kind(), "cache");
    }

    #[test]
    fn foreign_entry_is_discarded() {
        let store = MemoryStore::new();
        let mut other = identity();
        other.name = "edge".into();
        let json = Snapshot::capture(other, false, &device()).to_json().unwrap();
        store.store(&identity().cache_key(), json);

        assert!(load_snapshot(&store, &identity(), &strategy(false)).is_none());
        assert!(store.is_empty());
    }

    #[test]
    fn snapshot_from_another_qbridge_result_is_discarded() {
        let store = MemoryStore::new();
        let json = Snapshot::capture(identity(), true, &device()).to_json().unwrap();
        store.store(&identity().cache_key(), json);

        assert!(load_snapshot(&store, &identity(), &strategy(true)).is_some());
        assert!(load_snapshot(&store, &identity(), &strategy(false)).is_none());
        assert!(store.is_empty());
    }
}
