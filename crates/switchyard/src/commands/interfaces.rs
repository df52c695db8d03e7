//! Interface command handlers.

use tabled::Tabled;

use switchyard_core::{Device, Interface};

use crate::cli::{GlobalOpts, InterfacesArgs, InterfacesCommand};
use crate::error::CliError;
use crate::output;
use crate::session::DeviceSession;

use super::util;

// ── Table row ───────────────────────────────────────────────────────

#[derive(Tabled)]
struct InterfaceRow {
    #[tabled(rename = "Index")]
    index: u32,
    #[tabled(rename = "Name")]
    name: String,
    #[tabled(rename = "Admin")]
    admin: String,
    #[tabled(rename = "Oper")]
    oper: String,
    #[tabled(rename = "Speed")]
    speed: String,
    #[tabled(rename = "Mode")]
    mode: String,
    #[tabled(rename = "VLAN")]
    vlan: String,
    #[tabled(rename = "Tagged")]
    tagged: String,
    #[tabled(rename = "PoE")]
    poe: String,
    #[tabled(rename = "Description")]
    description: String,
}

fn poe_state(device: &Device, iface: &Interface) -> Option<bool> {
    let entry = iface.poe_entry.as_deref()?;
    device.poe.ports.get(entry).map(|p| p.admin_enabled)
}

fn speed_text(mbps: u64) -> String {
    match mbps {
        0 => "-".into(),
        m if m >= 1_000 && m % 1_000 == 0 => format!("{}G", m / 1_000),
        m => format!("{m}M"),
    }
}

fn row(device: &Device, iface: &Interface, color: bool) -> InterfaceRow {
    let admin_up = iface.admin_status.is_up();
    let oper_up = iface.oper_status.is_up();
    InterfaceRow {
        index: iface.index,
        name: if iface.manageable {
            iface.name.clone()
        } else {
            output::muted(&iface.name, color)
        },
        admin: output::status(if admin_up { "up" } else { "down" }, admin_up, color),
        oper: output::status(&format!("{:?}", iface.oper_status), oper_up, color),
        speed: speed_text(iface.speed_mbps),
        mode: format!("{:?}", iface.mode),
        vlan: if iface.untagged_vlan == 0 {
            "-".into()
        } else {
            iface.untagged_vlan.to_string()
        },
        tagged: util::format_vlan_list(iface.tagged_vlans.iter().copied()),
        poe: match poe_state(device, iface) {
            Some(true) => "on".into(),
            Some(false) => "off".into(),
            None => "-".into(),
        },
        description: iface.description.clone(),
    }
}

fn detail(device: &Device, iface: &Interface) -> String {
    let mut lines = vec![
        format!("Index:       {}", iface.index),
        format!("Name:        {}", iface.name),
        format!("ifDescr:     {}", iface.if_descr),
        format!("Description: {}", iface.description),
        format!("Admin:       {:?}", iface.admin_status),
        format!("Oper:        {:?}", iface.oper_status),
        format!("Speed:       {}", speed_text(iface.speed_mbps)),
        format!("MTU:         {}", iface.mtu),
        format!(
            "MAC:         {}",
            iface
                .phys_address
                .as_ref()
                .map_or_else(|| "-".into(), ToString::to_string)
        ),
        format!("Mode:        {:?}", iface.mode),
        format!("Untagged:    {}", iface.untagged_vlan),
        format!(
            "Tagged:      {}",
            util::format_vlan_list(iface.tagged_vlans.iter().copied())
        ),
    ];
    if let Some(port) = iface.port_id {
        lines.push(format!("Bridge port: {port}"));
    }
    if let Some(entry) = iface.poe_entry.as_deref() {
        let state = match poe_state(device, iface) {
            Some(true) => "on",
            Some(false) => "off",
            None => "-",
        };
        lines.push(format!("PoE:         {entry} ({state})"));
    }
    if let Some(master) = iface.lacp_master {
        lines.push(format!("LACP:        {:?} of {master}", iface.lacp_role));
    }
    if let Some(reason) = iface.unmanage_reason.as_deref() {
        lines.push(format!("Unmanaged:   {reason}"));
    }
    lines.push(format!("Clients:     {}", iface.ethernet.len()));
    lines.push(format!("Neighbors:   {}", iface.lldp.len()));
    lines.join("\n")
}

// ── Handler ─────────────────────────────────────────────────────────

pub async fn handle(
    session: &DeviceSession,
    args: InterfacesArgs,
    global: &GlobalOpts,
) -> Result<(), CliError> {
    let device = session.device().await?;
    let color = output::should_color(&global.color);

    match args.command {
        InterfacesCommand::List { all } => {
            let ifaces: Vec<Interface> = device
                .interfaces
                .values()
                .filter(|i| all || (i.visible && i.manageable))
                .cloned()
                .collect();
            let out = output::render_list(
                &global.output,
                &ifaces,
                |i| row(&device, i, color),
                |i| i.name.clone(),
            )?;
            output::print_output(&out, global.quiet);
        }
        InterfacesCommand::Show { interface } => {
            let index = util::resolve_interface(&device, &interface)?;
            let iface = device
                .interface(index)
                .ok_or_else(|| CliError::InterfaceNotFound {
                    identifier: interface.clone(),
                })?;
            let out = output::render_single(
                &global.output,
                iface,
                |i| detail(&device, i),
                |i| i.index.to_string(),
            )?;
            output::print_output(&out, global.quiet);
        }
    }
    Ok(())
}
