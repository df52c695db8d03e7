//! Mutation command handlers: `set ...` and `save`.

use switchyard_core::Command as CoreCommand;

use crate::cli::{GlobalOpts, SetArgs, SetCommand};
use crate::error::CliError;
use crate::session::DeviceSession;

use super::util;

pub async fn handle(
    session: &DeviceSession,
    args: SetArgs,
    global: &GlobalOpts,
) -> Result<(), CliError> {
    let device = session.device().await?;

    let command = match args.command {
        SetCommand::Admin { interface, state } => CoreCommand::SetAdminStatus {
            if_index: util::resolve_interface(&device, &interface)?,
            up: state.is_on(),
        },
        SetCommand::Vlan { interface, vlan } => CoreCommand::SetUntaggedVlan {
            if_index: util::resolve_interface(&device, &interface)?,
            vlan,
        },
        SetCommand::Poe { interface, state } => CoreCommand::SetPoeStatus {
            if_index: util::resolve_interface(&device, &interface)?,
            enabled: state.is_on(),
        },
        SetCommand::Description { interface, text } => CoreCommand::SetDescription {
            if_index: util::resolve_interface(&device, &interface)?,
            description: text,
        },
    };

    util::apply(session, command, global).await
}

pub async fn save(session: &DeviceSession, global: &GlobalOpts) -> Result<(), CliError> {
    util::apply(session, CoreCommand::SaveRunningConfig, global).await
}
