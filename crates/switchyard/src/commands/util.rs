//! Shared helpers for command handlers.

use std::fmt::Write as _;

use serde::Serialize;

use switchyard_api::VarBind;
use switchyard_core::{Command as CoreCommand, CommandResult, Device};

use crate::cli::GlobalOpts;
use crate::error::CliError;
use crate::output;
use crate::session::DeviceSession;

/// Resolve an interface identifier (ifIndex or name) to an ifIndex.
pub fn resolve_interface(device: &Device, identifier: &str) -> Result<u32, CliError> {
    if let Ok(index) = identifier.parse::<u32>() {
        if device.interfaces.contains_key(&index) {
            return Ok(index);
        }
    }
    if let Some(iface) = device.interface_by_name(identifier) {
        return Ok(iface.index);
    }
    device
        .interfaces
        .values()
        .find(|iface| iface.name.eq_ignore_ascii_case(identifier))
        .map(|iface| iface.index)
        .ok_or_else(|| CliError::InterfaceNotFound {
            identifier: identifier.into(),
        })
}

/// `3d 4h 12m` style uptime.
pub fn format_uptime(secs: u64) -> String {
    let days = secs / 86_400;
    let hours = (secs % 86_400) / 3_600;
    let minutes = (secs % 3_600) / 60;
    if days > 0 {
        format!("{days}d {hours}h {minutes}m")
    } else if hours > 0 {
        format!("{hours}h {minutes}m")
    } else {
        format!("{minutes}m {}s", secs % 60)
    }
}

/// Join a VLAN set, collapsing consecutive ids into ranges.
pub fn format_vlan_list(vlans: impl IntoIterator<Item = u16>) -> String {
    let mut parts: Vec<String> = Vec::new();
    let mut run: Option<(u16, u16)> = None;
    for id in vlans {
        run = match run {
            Some((start, end)) if end.checked_add(1) == Some(id) => Some((start, id)),
            Some(prev) => {
                parts.push(range_text(prev));
                Some((id, id))
            }
            None => Some((id, id)),
        };
    }
    if let Some(prev) = run {
        parts.push(range_text(prev));
    }
    parts.join(",")
}

fn range_text((start, end): (u16, u16)) -> String {
    if start == end {
        start.to_string()
    } else {
        format!("{start}-{end}")
    }
}

// ── Mutations ───────────────────────────────────────────────────────

/// What one change did, including the PDUs it put on the wire.
#[derive(Debug, Serialize)]
pub struct ChangeReport {
    pub device: String,
    pub operation: &'static str,
    pub result: CommandResult,
    pub set_pdus: Vec<Vec<VarBind>>,
}

fn report_detail(report: &ChangeReport) -> String {
    let mut out = String::new();
    let outcome = match report.result {
        CommandResult::Ok => "applied",
        CommandResult::Saved => "saved",
    };
    let _ = writeln!(
        out,
        "✓ {} on {}: {outcome} (dry run)",
        report.operation, report.device
    );
    if report.set_pdus.is_empty() {
        let _ = write!(out, "  no SET requests");
    }
    for (i, pdu) in report.set_pdus.iter().enumerate() {
        let _ = writeln!(out, "SET #{}", i + 1);
        for vb in pdu {
            let _ = writeln!(out, "  {vb}");
        }
    }
    out.trim_end().to_owned()
}

fn report_plain(report: &ChangeReport) -> String {
    report
        .set_pdus
        .iter()
        .flatten()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join("\n")
}

/// Run one command through the connector and print what it sent.
pub async fn apply(
    session: &DeviceSession,
    command: CoreCommand,
    global: &GlobalOpts,
) -> Result<(), CliError> {
    let operation = command.operation();
    let already_sent = session.sent_sets().len();

    let result = session.connector.execute(command).await?;

    let report = ChangeReport {
        device: session.connector.identity().name.clone(),
        operation,
        result,
        set_pdus: session.sent_sets().split_off(already_sent),
    };
    let out = output::render_single(&global.output, &report, report_detail, report_plain)?;
    output::print_output(&out, global.quiet);
    Ok(())
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use switchyard_core::Interface;

    fn device() -> Device {
        let mut device = Device::default();
        for (index, name) in [(1, "GigabitEthernet1/0/1"), (2, "GigabitEthernet1/0/2")] {
            let mut iface = Interface::new(index);
            iface.name = name.into();
            device.interfaces.insert(index, iface);
        }
        device
    }

    #[test]
    fn interfaces_resolve_by_index_or_name() {
        let device = device();
        assert_eq!(resolve_interface(&device, "2").unwrap(), 2);
        assert_eq!(resolve_interface(&device, "GigabitEthernet1/0/1").unwrap(), 1);
        assert_eq!(resolve_interface(&device, "gigabitethernet1/0/2").unwrap(), 2);
        assert!(matches!(
            resolve_interface(&device, "9"),
            Err(CliError::InterfaceNotFound { .. })
        ));
    }

    #[test]
    fn vlan_lists_collapse_into_ranges() {
        assert_eq!(format_vlan_list([1, 2, 3, 10, 20, 21]), "1-3,10,20-21");
        assert_eq!(format_vlan_list([]), "");
    }

    #[test]
    fn uptime_formats() {
        assert_eq!(format_uptime(59), "0m 59s");
        assert_eq!(format_uptime(3_660), "1h 1m");
        assert_eq!(format_uptime(90_061), "1d 1h 1m");
    }
}
