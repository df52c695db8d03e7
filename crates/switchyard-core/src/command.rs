// ── Command API ──
//
// Every mutation can also be expressed as a `Command` value and routed
// through `Connector::execute`, which is what the CLI does.

use serde::{Deserialize, Serialize};

/// All write operations against one switch.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "command", rename_all = "snake_case")]
pub enum Command {
    // ── Interface operations ─────────────────────────────────────────
    SetAdminStatus { if_index: u32, up: bool },
    SetUntaggedVlan { if_index: u32, vlan: u16 },
    SetPoeStatus { if_index: u32, enabled: bool },
    SetDescription { if_index: u32, description: String },

    // ── Device operations ────────────────────────────────────────────
    CreateVlan { vlan: u16, name: String },
    SaveRunningConfig,
}

impl Command {
    /// Short operation name used in logs and `ErrorState` descriptions.
    pub fn operation(&self) -> &'static str {
        match self {
            Self::SetAdminStatus { .. } => "set admin status",
            Self::SetUntaggedVlan { .. } => "set untagged vlan",
            Self::SetPoeStatus { .. } => "set poe status",
            Self::SetDescription { .. } => "set description",
            Self::CreateVlan { .. } => "create vlan",
            Self::SaveRunningConfig => "save running config",
        }
    }

    /// Interface the command targets, if any.
    pub fn if_index(&self) -> Option<u32> {
        match self {
            Self::SetAdminStatus { if_index, .. }
            | Self::SetUntaggedVlan { if_index, .. }
            | Self::SetPoeStatus { if_index, .. }
            | Self::SetDescription { if_index, .. } => Some(*if_index),
            Self::CreateVlan { .. } | Self::SaveRunningConfig => None,
        }
    }
}

/// Outcome of a successful command.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum CommandResult {
    Ok,
    /// The running configuration was written to startup storage.
    Saved,
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn commands_serialize_with_a_tag() {
        let json = serde_json::to_string(&Command::SetUntaggedVlan {
            if_index: 3,
            vlan: 20,
        })
        .unwrap();
        assert_eq!(json, r#"{"command":"set_untagged_vlan","if_index":3,"vlan":20}"#);
        let back: Command = serde_json::from_str(&json).unwrap();
        assert_eq!(back.if_index(), Some(3));
    }
}
