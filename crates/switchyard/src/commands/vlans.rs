//! VLAN command handlers.

use tabled::Tabled;

use switchyard_core::{Command as CoreCommand, Device, Vlan};

use crate::cli::{GlobalOpts, VlansArgs, VlansCommand};
use crate::error::CliError;
use crate::output;
use crate::session::DeviceSession;

use super::util;

#[derive(Tabled)]
struct VlanRow {
    #[tabled(rename = "ID")]
    id: u16,
    #[tabled(rename = "Name")]
    name: String,
    #[tabled(rename = "Status")]
    status: String,
    #[tabled(rename = "Untagged")]
    untagged: String,
    #[tabled(rename = "Tagged")]
    tagged: String,
}

/// Names of visible interfaces carrying `vlan`, untagged and tagged.
fn members(device: &Device, vlan: u16) -> (Vec<&str>, Vec<&str>) {
    let mut untagged = Vec::new();
    let mut tagged = Vec::new();
    for iface in device.interfaces.values().filter(|i| i.visible) {
        if iface.untagged_vlan == vlan {
            untagged.push(iface.name.as_str());
        } else if iface.tagged_vlans.contains(&vlan) {
            tagged.push(iface.name.as_str());
        }
    }
    (untagged, tagged)
}

fn row(device: &Device, vlan: &Vlan) -> VlanRow {
    let (untagged, tagged) = members(device, vlan.id);
    VlanRow {
        id: vlan.id,
        name: vlan.name.clone(),
        status: format!("{:?}", vlan.status),
        untagged: untagged.join(", "),
        tagged: match tagged.len() {
            0 => String::new(),
            n => format!("{n} ports"),
        },
    }
}

pub async fn handle(
    session: &DeviceSession,
    args: VlansArgs,
    global: &GlobalOpts,
) -> Result<(), CliError> {
    match args.command {
        VlansCommand::List => {
            let device = session.device().await?;
            let vlans: Vec<Vlan> = device.vlans.values().cloned().collect();
            let out = output::render_list(
                &global.output,
                &vlans,
                |v| row(&device, v),
                |v| v.id.to_string(),
            )?;
            output::print_output(&out, global.quiet);
            Ok(())
        }
        VlansCommand::Create { id, name } => {
            util::apply(session, CoreCommand::CreateVlan { vlan: id, name }, global).await
        }
    }
}
