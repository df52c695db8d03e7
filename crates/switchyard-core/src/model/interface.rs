// ── Interface domain types ──

use std::collections::{BTreeMap, BTreeSet};

use serde::{Deserialize, Serialize};

use super::address::{EthernetAddress, MacAddress};
use super::lldp::LldpNeighbor;

/// `ifAdminStatus`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum AdminStatus {
    Up,
    Down,
    Testing,
    #[default]
    Unknown,
}

impl AdminStatus {
    pub fn from_mib(v: i64) -> Self {
        match v {
            1 => Self::Up,
            2 => Self::Down,
            3 => Self::Testing,
            _ => Self::Unknown,
        }
    }

    pub fn is_up(self) -> bool {
        matches!(self, Self::Up)
    }
}

/// `ifOperStatus`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum OperStatus {
    Up,
    Down,
    Testing,
    #[default]
    Unknown,
    Dormant,
    NotPresent,
    LowerLayerDown,
}

impl OperStatus {
    pub fn from_mib(v: i64) -> Self {
        match v {
            1 => Self::Up,
            2 => Self::Down,
            3 => Self::Testing,
            5 => Self::Dormant,
            6 => Self::NotPresent,
            7 => Self::LowerLayerDown,
            _ => Self::Unknown,
        }
    }

    pub fn is_up(self) -> bool {
        matches!(self, Self::Up)
    }
}

/// Switchport mode as reported by a vendor MIB.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum PortMode {
    /// No vendor mode column; membership alone decides.
    #[default]
    Unknown,
    Access,
    Trunk,
    Hybrid,
    General,
    /// A vendor mode value with no mapping.
    Other(u32),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum LacpRole {
    #[default]
    None,
    Aggregator,
    Member,
}

/// IANA ifType values treated as switch ports.
const ETHERNET_IF_TYPES: [u32; 4] = [6, 62, 69, 117];

/// One switch interface, keyed by its MIB-2 ifIndex.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Interface {
    pub index: u32,
    /// `ifName`, falling back to `ifDescr`.
    pub name: String,
    /// `ifAlias`.
    pub description: String,
    pub if_descr: String,
    pub if_type: u32,
    pub admin_status: AdminStatus,
    pub oper_status: OperStatus,
    pub speed_mbps: u64,
    pub mtu: u32,
    pub phys_address: Option<MacAddress>,
    /// Bridge-port number, distinct from `index`.
    pub port_id: Option<u32>,

    /// 0 when unset.
    pub untagged_vlan: u16,
    pub tagged_vlans: BTreeSet<u16>,
    pub is_tagged: bool,
    pub mode: PortMode,

    pub manageable: bool,
    pub visible: bool,
    pub unmanage_reason: Option<String>,

    /// Key into the device's PoE port table.
    pub poe_entry: Option<String>,

    pub lacp_role: LacpRole,
    pub lacp_admin_key: Option<u32>,
    /// ifIndex of the aggregator this member belongs to.
    pub lacp_master: Option<u32>,

    pub ethernet: BTreeMap<MacAddress, EthernetAddress>,
    /// Keyed by the LLDP remote-table suffix `time.port.index`.
    pub lldp: BTreeMap<String, LldpNeighbor>,
}

impl Interface {
    pub fn new(index: u32) -> Self {
        Self {
            index,
            manageable: true,
            visible: true,
            ..Self::default()
        }
    }

    pub fn is_ethernet(&self) -> bool {
        ETHERNET_IF_TYPES.contains(&self.if_type)
    }

    /// Flag the interface as not manageable. The first reason wins.
    pub fn disable(&mut self, reason: impl Into<String>) {
        self.manageable = false;
        if self.unmanage_reason.is_none() {
            self.unmanage_reason = Some(reason.into());
        }
    }

    /// Bridge port. Only a device without a bridge map (`mapped == false`)
    /// uses the ifIndex in its place.
    pub fn bridge_port(&self, mapped: bool) -> Option<u32> {
        match self.port_id {
            Some(port) => Some(port),
            None if mapped => None,
            None => Some(self.index),
        }
    }

    /// Every VLAN this interface references.
    pub fn referenced_vlans(&self) -> impl Iterator<Item = u16> + '_ {
        std::iter::once(self.untagged_vlan)
            .filter(|v| *v != 0)
            .chain(self.tagged_vlans.iter().copied())
    }
}
