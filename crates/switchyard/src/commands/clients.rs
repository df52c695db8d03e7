//! Client-data command handler: learned addresses and LLDP neighbors.

use std::net::Ipv4Addr;

use serde::Serialize;
use tabled::Tabled;

use switchyard_core::{Device, LldpCapability, MacAddress};

use crate::cli::{ClientsArgs, GlobalOpts};
use crate::error::CliError;
use crate::output;
use crate::session::DeviceSession;

// ── Learned addresses ───────────────────────────────────────────────

#[derive(Debug, Serialize)]
struct ClientEntry {
    interface: String,
    if_index: u32,
    mac: MacAddress,
    vlan: Option<u16>,
    ipv4: Option<Ipv4Addr>,
}

#[derive(Tabled)]
struct ClientRow {
    #[tabled(rename = "Interface")]
    interface: String,
    #[tabled(rename = "MAC")]
    mac: String,
    #[tabled(rename = "VLAN")]
    vlan: String,
    #[tabled(rename = "IPv4")]
    ipv4: String,
}

impl From<&ClientEntry> for ClientRow {
    fn from(c: &ClientEntry) -> Self {
        Self {
            interface: c.interface.clone(),
            mac: c.mac.to_string(),
            vlan: c.vlan.map(|v| v.to_string()).unwrap_or_default(),
            ipv4: c.ipv4.map(|ip| ip.to_string()).unwrap_or_default(),
        }
    }
}

fn clients(device: &Device) -> Vec<ClientEntry> {
    device
        .interfaces
        .values()
        .filter(|i| i.visible)
        .flat_map(|iface| {
            iface.ethernet.values().map(|addr| ClientEntry {
                interface: iface.name.clone(),
                if_index: iface.index,
                mac: addr.mac.clone(),
                vlan: addr.vlan,
                ipv4: addr.ipv4,
            })
        })
        .collect()
}

// ── LLDP neighbors ──────────────────────────────────────────────────

#[derive(Debug, Serialize)]
struct NeighborEntry {
    interface: String,
    system_name: String,
    chassis_id: String,
    port_id: String,
    port_description: String,
    management_address: Option<Ipv4Addr>,
    capabilities: Vec<LldpCapability>,
}

#[derive(Tabled)]
struct NeighborRow {
    #[tabled(rename = "Interface")]
    interface: String,
    #[tabled(rename = "System")]
    system: String,
    #[tabled(rename = "Chassis ID")]
    chassis: String,
    #[tabled(rename = "Port")]
    port: String,
    #[tabled(rename = "Address")]
    address: String,
    #[tabled(rename = "Capabilities")]
    capabilities: String,
}

impl From<&NeighborEntry> for NeighborRow {
    fn from(n: &NeighborEntry) -> Self {
        Self {
            interface: n.interface.clone(),
            system: n.system_name.clone(),
            chassis: n.chassis_id.clone(),
            port: if n.port_description.is_empty() {
                n.port_id.clone()
            } else {
                format!("{} ({})", n.port_id, n.port_description)
            },
            address: n
                .management_address
                .map(|ip| ip.to_string())
                .unwrap_or_default(),
            capabilities: n
                .capabilities
                .iter()
                .map(|c| format!("{c:?}"))
                .collect::<Vec<_>>()
                .join(", "),
        }
    }
}

fn neighbors(device: &Device) -> Vec<NeighborEntry> {
    device
        .interfaces
        .values()
        .flat_map(|iface| {
            iface.lldp.values().map(|n| NeighborEntry {
                interface: iface.name.clone(),
                system_name: n.system_name.clone(),
                chassis_id: n.chassis_string(),
                port_id: n.port_string(),
                port_description: n.port_description.clone(),
                management_address: n.management_address,
                capabilities: n.capabilities(),
            })
        })
        .collect()
}

// ── Handler ─────────────────────────────────────────────────────────

pub async fn handle(
    session: &DeviceSession,
    args: &ClientsArgs,
    global: &GlobalOpts,
) -> Result<(), CliError> {
    session.device().await?;
    session.connector.get_client_data().await?;
    let device = session.connector.device().await;

    let out = if args.lldp {
        output::render_list(
            &global.output,
            &neighbors(&device),
            |n| NeighborRow::from(n),
            |n| n.system_name.clone(),
        )?
    } else {
        output::render_list(
            &global.output,
            &clients(&device),
            |c| ClientRow::from(c),
            |c| c.mac.to_string(),
        )?
    };
    output::print_output(&out, global.quiet);
    Ok(())
}
