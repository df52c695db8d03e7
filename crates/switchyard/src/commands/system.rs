//! System command handler.

use serde::Serialize;

use switchyard_core::Vendor;

use crate::cli::GlobalOpts;
use crate::error::CliError;
use crate::output;
use crate::session::DeviceSession;

use super::util;

#[derive(Debug, Serialize)]
struct SystemView {
    name: String,
    description: String,
    object_id: String,
    vendor: Vendor,
    qbridge: bool,
    uptime_secs: u64,
    contact: String,
    location: String,
    can_save_config: bool,
    interfaces: usize,
    vlans: usize,
    poe_ports: usize,
    warnings: Vec<String>,
}

fn or_dash(s: &str) -> &str {
    if s.is_empty() { "-" } else { s }
}

fn detail(v: &SystemView) -> String {
    let mut lines = vec![
        format!("Name:        {}", or_dash(&v.name)),
        format!("Description: {}", or_dash(&v.description)),
        format!("Object ID:   {}", v.object_id),
        format!(
            "Vendor:      {}{}",
            v.vendor,
            if v.qbridge { " (Q-BRIDGE)" } else { "" }
        ),
        format!("Uptime:      {}", util::format_uptime(v.uptime_secs)),
        format!("Contact:     {}", or_dash(&v.contact)),
        format!("Location:    {}", or_dash(&v.location)),
        format!(
            "Save config: {}",
            if v.can_save_config { "yes" } else { "no" }
        ),
        format!("Interfaces:  {}", v.interfaces),
        format!("VLANs:       {}", v.vlans),
        format!("PoE ports:   {}", v.poe_ports),
    ];
    for warning in &v.warnings {
        lines.push(format!("Warning:     {warning}"));
    }
    lines.join("\n")
}

pub async fn handle(session: &DeviceSession, global: &GlobalOpts) -> Result<(), CliError> {
    let device = session.device().await?;
    let connector = &session.connector;

    let view = SystemView {
        name: device.system.name.clone(),
        description: device.system.descr.clone(),
        object_id: device.system.object_id.clone(),
        vendor: connector.vendor(),
        qbridge: connector.strategy().qbridge,
        uptime_secs: device.system.uptime_secs(),
        contact: device.system.contact.clone(),
        location: device.system.location.clone(),
        can_save_config: connector.can_save_config(),
        interfaces: device.interfaces.values().filter(|i| i.visible).count(),
        vlans: device.vlans.len(),
        poe_ports: device.poe.ports.len(),
        warnings: device.warnings.clone(),
    };

    let out = output::render_single(&global.output, &view, detail, |v| v.name.clone())?;
    output::print_output(&out, global.quiet);
    Ok(())
}
