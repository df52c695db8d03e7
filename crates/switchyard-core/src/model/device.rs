// ── Device model root ──

use std::collections::BTreeMap;
use std::net::Ipv4Addr;

use serde::{Deserialize, Serialize};

use super::address::MacAddress;
use super::interface::Interface;
use super::poe::PoeData;
use super::stack::StackMember;
use super::system::{SystemInfo, Vendor};
use super::vlan::Vlan;

/// Cross-table join inputs collected while walking and consumed once the
/// relevant branches are loaded. Never cached.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub(crate) struct JoinState {
    /// Bridge port → ifIndex, from `dot1dBasePortIfIndex`.
    pub bridge_ports: BTreeMap<u32, u32>,
    /// ifIndex → `dot3adAggActorAdminKey`.
    pub aggregator_keys: BTreeMap<u32, u32>,
    /// ifIndex → `dot3adAggPortActorAdminKey`.
    pub member_keys: BTreeMap<u32, u32>,
    /// Forwarding database id → VLAN.
    pub fdb_vlans: BTreeMap<u32, u16>,
    pub arp: BTreeMap<MacAddress, Ipv4Addr>,
    /// ifIndex → `vlanTrunkPortNativeVlan`.
    pub trunk_native: BTreeMap<u32, u16>,
    /// ifIndex → the four "vlans enabled" chunks.
    pub trunk_vlans: BTreeMap<u32, [Vec<u8>; 4]>,
}

/// Everything known about one switch.
///
/// Exclusively owned by its connector; vendor code borrows it per call.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Device {
    pub vendor: Vendor,
    pub system: SystemInfo,
    pub interfaces: BTreeMap<u32, Interface>,
    pub vlans: BTreeMap<u16, Vlan>,
    pub poe: PoeData,
    pub stack: BTreeMap<u32, StackMember>,
    pub hardware_loaded: bool,
    pub warnings: Vec<String>,
    #[serde(skip)]
    pub(crate) join: JoinState,
}

impl Device {
    pub fn new(vendor: Vendor) -> Self {
        Self {
            vendor,
            ..Self::default()
        }
    }

    pub fn interface(&self, index: u32) -> Option<&Interface> {
        self.interfaces.get(&index)
    }

    pub fn interface_mut(&mut self, index: u32) -> Option<&mut Interface> {
        self.interfaces.get_mut(&index)
    }

    pub fn interface_by_name(&self, name: &str) -> Option<&Interface> {
        self.interfaces.values().find(|i| i.name == name)
    }

    /// Whether `dot1dBasePortIfIndex` mapped any bridge port.
    pub fn has_bridge_map(&self) -> bool {
        !self.join.bridge_ports.is_empty()
    }

    /// ifIndex behind a bridge port. Without a bridge map the port number
    /// is the ifIndex; with one, unmapped ports resolve to nothing.
    pub fn if_index_for_port(&self, port: u32) -> Option<u32> {
        if self.has_bridge_map() {
            return self.join.bridge_ports.get(&port).copied();
        }
        self.interfaces.contains_key(&port).then_some(port)
    }

    pub fn interface_for_port_mut(&mut self, port: u32) -> Option<&mut Interface> {
        let index = self.if_index_for_port(port)?;
        self.interfaces.get_mut(&index)
    }

    /// Bridge port of an interface. `None` when the bridge map does not
    /// list it.
    pub fn port_of(&self, if_index: u32) -> Option<u32> {
        self.interfaces
            .get(&if_index)?
            .bridge_port(self.has_bridge_map())
    }

    /// Highest bridge port number, used to size port bitmaps.
    pub fn max_port_id(&self) -> u32 {
        let mapped = self.has_bridge_map();
        self.interfaces
            .values()
            .filter_map(|i| i.bridge_port(mapped))
            .max()
            .unwrap_or(0)
    }

    pub fn vlan_or_insert(&mut self, id: u16) -> &mut Vlan {
        self.vlans
            .entry(id)
            .or_insert_with(|| Vlan::new(id, Vlan::default_name(id)))
    }

    pub fn stack_or_insert(&mut self, entity_index: u32) -> &mut StackMember {
        self.stack
            .entry(entity_index)
            .or_insert_with(|| StackMember::new(entity_index, super::stack::EntityClass::Unknown))
    }

    /// Record a pipeline warning and log it.
    pub fn warn(&mut self, message: impl Into<String>) {
        let message = message.into();
        tracing::warn!(device = %self.system.name, "{message}");
        self.warnings.push(message);
    }

    /// Drop learned addresses and neighbors before a client-data reload.
    pub fn clear_client_data(&mut self) {
        for iface in self.interfaces.values_mut() {
            iface.ethernet.clear();
            iface.lldp.clear();
        }
        self.join.arp.clear();
    }

    /// Drop VLAN membership before a fresh membership read.
    pub fn clear_vlan_membership(&mut self) {
        for iface in self.interfaces.values_mut() {
            iface.untagged_vlan = 0;
            iface.tagged_vlans.clear();
            iface.is_tagged = false;
        }
        self.join.trunk_native.clear();
        self.join.trunk_vlans.clear();
    }

    /// Rebuild join inputs that can be recovered from cached fields.
    pub(crate) fn rebuild_join_state(&mut self) {
        self.join = JoinState::default();
        for iface in self.interfaces.values() {
            if let Some(port) = iface.port_id {
                self.join.bridge_ports.insert(port, iface.index);
            }
        }
    }
}
