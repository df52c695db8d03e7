//! Command dispatch: bridges CLI args -> connector calls -> output formatting.

pub mod clients;
pub mod config_cmd;
pub mod hardware;
pub mod interfaces;
pub mod poe;
pub mod set;
pub mod snapshot;
pub mod system;
pub mod util;
pub mod vlans;

use crate::cli::{Command, GlobalOpts};
use crate::error::CliError;
use crate::session::DeviceSession;

/// Dispatch a device-bound command to the appropriate handler.
pub async fn dispatch(
    cmd: Command,
    session: &DeviceSession,
    global: &GlobalOpts,
) -> Result<(), CliError> {
    match cmd {
        Command::System => system::handle(session, global).await,
        Command::Interfaces(args) => interfaces::handle(session, args, global).await,
        Command::Vlans(args) => vlans::handle(session, args, global).await,
        Command::Poe => poe::handle(session, global).await,
        Command::Clients(args) => clients::handle(session, &args, global).await,
        Command::Hardware => hardware::handle(session, global).await,
        Command::Set(args) => set::handle(session, args, global).await,
        Command::Save => set::save(session, global).await,
        Command::Snapshot(args) => snapshot::handle(session, args, global).await,
        // Config and Completions are handled before dispatch
        Command::Config(_) | Command::Completions(_) => unreachable!(),
    }
}
