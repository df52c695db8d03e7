// ── VLAN domain types ──

use serde::{Deserialize, Serialize};

pub const VLAN_ID_MIN: u16 = 1;
pub const VLAN_ID_MAX: u16 = 4094;

pub fn is_valid_vlan_id(id: u32) -> bool {
    (u32::from(VLAN_ID_MIN)..=u32::from(VLAN_ID_MAX)).contains(&id)
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum VlanType {
    #[default]
    Ethernet,
    Other,
}

/// Q-Bridge `dot1qVlanStatus`, or VTP `vtpVlanState`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum VlanStatus {
    Other,
    #[default]
    Permanent,
    DynamicGvrp,
    Operational,
    Suspended,
    Unknown,
}

impl VlanStatus {
    pub fn from_qbridge(v: i64) -> Self {
        match v {
            1 => Self::Other,
            2 => Self::Permanent,
            3 => Self::DynamicGvrp,
            _ => Self::Unknown,
        }
    }

    pub fn from_vtp(v: i64) -> Self {
        match v {
            1 => Self::Operational,
            2 => Self::Suspended,
            _ => Self::Unknown,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Vlan {
    pub id: u16,
    pub name: String,
    pub vlan_type: VlanType,
    pub status: VlanStatus,
    /// Raw `dot1qVlanCurrentEgressPorts` octets.
    #[serde(default)]
    pub current_egress: Vec<u8>,
    /// Raw `dot1qVlanStaticEgressPorts` octets.
    #[serde(default)]
    pub static_egress: Vec<u8>,
}

impl Vlan {
    pub fn new(id: u16, name: impl Into<String>) -> Self {
        Self {
            id,
            name: name.into(),
            ..Self::default()
        }
    }

    /// Placeholder name for VLANs first seen in a membership table.
    pub fn default_name(id: u16) -> String {
        format!("VLAN{id}")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn vlan_id_range() {
        assert!(!is_valid_vlan_id(0));
        assert!(is_valid_vlan_id(1));
        assert!(is_valid_vlan_id(4094));
        assert!(!is_valid_vlan_id(4095));
    }
}
