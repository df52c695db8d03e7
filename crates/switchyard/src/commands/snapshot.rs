//! Snapshot command handler.

use crate::cli::{GlobalOpts, SnapshotArgs};
use crate::error::CliError;
use crate::output;
use crate::session::DeviceSession;

pub async fn handle(
    session: &DeviceSession,
    args: SnapshotArgs,
    global: &GlobalOpts,
) -> Result<(), CliError> {
    session.device().await?;
    let json = session.connector.serialize().await?;

    match args.out {
        Some(path) => {
            std::fs::write(&path, &json)?;
            if !global.quiet {
                eprintln!("✓ snapshot written to {}", path.display());
            }
        }
        None => output::print_output(&json, global.quiet),
    }
    Ok(())
}
