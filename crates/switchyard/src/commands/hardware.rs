//! Hardware command handler.

use tabled::Tabled;

use switchyard_core::StackMember;

use crate::cli::GlobalOpts;
use crate::error::CliError;
use crate::output;
use crate::session::DeviceSession;

#[derive(Tabled)]
struct MemberRow {
    #[tabled(rename = "Entity")]
    entity: u32,
    #[tabled(rename = "Member")]
    member: String,
    #[tabled(rename = "Class")]
    class: String,
    #[tabled(rename = "Model")]
    model: String,
    #[tabled(rename = "Serial")]
    serial: String,
    #[tabled(rename = "Software")]
    software: String,
}

impl From<&StackMember> for MemberRow {
    fn from(m: &StackMember) -> Self {
        Self {
            entity: m.entity_index,
            member: m.member_id.map(|id| id.to_string()).unwrap_or_default(),
            class: format!("{:?}", m.class),
            model: if m.model.is_empty() {
                m.name.clone()
            } else {
                m.model.clone()
            },
            serial: m.serial.clone(),
            software: m.software_version.clone(),
        }
    }
}

pub async fn handle(session: &DeviceSession, global: &GlobalOpts) -> Result<(), CliError> {
    session.device().await?;
    session.connector.get_hardware_details().await?;
    let device = session.connector.device().await;

    let members: Vec<StackMember> = device.stack.values().cloned().collect();
    let out = output::render_list(&global.output, &members, |m| MemberRow::from(m), |m| {
        m.serial.clone()
    })?;
    output::print_output(&out, global.quiet);
    Ok(())
}
