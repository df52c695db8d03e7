// ── Junos RPC boundary ──
//
// Juniper switches are driven through NETCONF tables instead of SNMP.
// The RPC client (outside this workspace) returns these already-typed
// records; configuration changes go through a candidate datastore.

use std::net::Ipv4Addr;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::error::Error;

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct RpcSystem {
    pub hostname: String,
    pub model: Option<String>,
    pub serial: Option<String>,
    pub version: Option<String>,
    pub uptime_secs: Option<u64>,
}

/// A physical interface row (`get-interface-information`).
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct RpcInterface {
    pub name: String,
    pub description: Option<String>,
    pub admin_up: bool,
    pub oper_up: bool,
    pub speed_mbps: Option<u64>,
    pub mtu: Option<u32>,
    pub mac: Option<String>,
    pub snmp_index: Option<u32>,
    /// `ae` bundle this port belongs to, if any.
    pub ae_bundle: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RpcVlanMember {
    pub interface: String,
    pub tagged: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RpcVlan {
    pub name: String,
    pub tag: u16,
    #[serde(default)]
    pub members: Vec<RpcVlanMember>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct RpcLldpNeighbor {
    pub local_interface: String,
    pub chassis_id: String,
    pub chassis_id_subtype: Option<String>,
    pub port_id: String,
    pub port_id_subtype: Option<String>,
    pub port_description: Option<String>,
    pub system_name: Option<String>,
    pub system_description: Option<String>,
    /// Comma-separated capability names, e.g. `"Bridge Router"`.
    pub capabilities_enabled: Option<String>,
    pub management_address: Option<Ipv4Addr>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RpcMacEntry {
    pub mac: String,
    pub vlan_tag: Option<u16>,
    pub interface: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RpcArpEntry {
    pub mac: String,
    pub ip: Ipv4Addr,
    pub interface: String,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct RpcPoeInterface {
    pub name: String,
    pub admin_enabled: bool,
    /// `ON`, `OFF`, `searching`, `fault`, ...
    pub oper_status: String,
    pub power_mw: Option<u32>,
    pub max_power_mw: Option<u32>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct RpcChassisModule {
    pub name: String,
    pub model: Option<String>,
    pub serial: Option<String>,
    pub description: Option<String>,
    pub version: Option<String>,
}

/// A Junos device session.
#[async_trait]
pub trait JunosRpc: Send + Sync {
    async fn system(&self) -> Result<RpcSystem, Error>;
    async fn interfaces(&self) -> Result<Vec<RpcInterface>, Error>;
    async fn vlans(&self) -> Result<Vec<RpcVlan>, Error>;
    async fn poe_interfaces(&self) -> Result<Vec<RpcPoeInterface>, Error>;
    async fn lldp_neighbors(&self) -> Result<Vec<RpcLldpNeighbor>, Error>;
    async fn switching_table(&self) -> Result<Vec<RpcMacEntry>, Error>;
    async fn arp_table(&self) -> Result<Vec<RpcArpEntry>, Error>;
    async fn chassis_modules(&self) -> Result<Vec<RpcChassisModule>, Error>;

    /// Load `set ...` statements into the candidate configuration.
    async fn load_set_commands(&self, commands: &[String]) -> Result<(), Error>;
    /// Validate the candidate configuration.
    async fn commit_check(&self) -> Result<(), Error>;
    async fn commit(&self, comment: Option<&str>) -> Result<(), Error>;
    /// Discard the candidate configuration.
    async fn rollback(&self) -> Result<(), Error>;
}
