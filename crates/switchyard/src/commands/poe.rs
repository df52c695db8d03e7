//! PoE command handler.

use std::fmt::Write as _;

use tabled::Tabled;

use switchyard_core::{Device, PoePort};

use crate::cli::{GlobalOpts, OutputFormat};
use crate::error::CliError;
use crate::output;
use crate::session::DeviceSession;

#[derive(Tabled)]
struct PoeRow {
    #[tabled(rename = "Port")]
    port: String,
    #[tabled(rename = "Interface")]
    interface: String,
    #[tabled(rename = "Admin")]
    admin: String,
    #[tabled(rename = "Detection")]
    detection: String,
    #[tabled(rename = "Power (mW)")]
    power: String,
}

fn mw(value: Option<u32>) -> String {
    value.map_or_else(|| "-".into(), |v| v.to_string())
}

fn row(device: &Device, port: &PoePort, color: bool) -> PoeRow {
    PoeRow {
        port: port.index.clone(),
        interface: port
            .interface
            .and_then(|i| device.interface(i))
            .map(|i| i.name.clone())
            .unwrap_or_default(),
        admin: output::status(
            if port.admin_enabled { "on" } else { "off" },
            port.admin_enabled,
            color,
        ),
        detection: output::status(
            &format!("{:?}", port.detect_status),
            !port.is_fault(),
            color,
        ),
        power: format!(
            "{} / {}",
            mw(port.power_consumed_mw),
            mw(port.power_max_mw)
        ),
    }
}

fn pse_summary(device: &Device) -> String {
    let mut out = String::new();
    for pse in device.poe.pse.values() {
        let _ = writeln!(
            out,
            "PSE {}: {:?}, {} / {} mW",
            pse.module, pse.status, pse.consumed_power_mw, pse.max_power_mw
        );
    }
    out.trim_end().to_owned()
}

pub async fn handle(session: &DeviceSession, global: &GlobalOpts) -> Result<(), CliError> {
    let device = session.device().await?;
    let color = output::should_color(&global.color);

    let ports: Vec<PoePort> = device.poe.ports.values().cloned().collect();
    let mut out = output::render_list(
        &global.output,
        &ports,
        |p| row(&device, p, color),
        |p| p.index.clone(),
    )?;
    if matches!(global.output, OutputFormat::Table) && !device.poe.pse.is_empty() {
        out = format!("{}\n{out}", pse_summary(&device));
    }
    output::print_output(&out, global.quiet);
    Ok(())
}
