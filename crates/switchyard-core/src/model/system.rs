// ── System information and vendor identity ──

use serde::{Deserialize, Serialize};
use strum::{Display, EnumString};

use crate::oids;

/// Device family. Selects the capability table at session open.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize, Display, EnumString,
)]
#[serde(rename_all = "kebab-case")]
#[strum(serialize_all = "kebab-case")]
pub enum Vendor {
    /// Standards-based Q-Bridge device.
    #[default]
    Generic,
    CiscoVtp,
    CiscoSb,
    Comware,
    Juniper,
}

impl Vendor {
    /// Pick the dialect from `sysObjectID`.
    pub fn detect(sys_object_id: &str) -> Self {
        if oids::oid_in_branch(oids::CISCO_SB_PRODUCTS, sys_object_id).is_some() {
            return Self::CiscoSb;
        }
        match oids::enterprise_of(sys_object_id) {
            Some(oids::enterprise::CISCO) => Self::CiscoVtp,
            Some(oids::enterprise::HH3C | oids::enterprise::H3C) => Self::Comware,
            _ => Self::Generic,
        }
    }
}

/// SNMPv2-MIB system group.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SystemInfo {
    pub descr: String,
    pub object_id: String,
    /// Hundredths of a second.
    pub uptime_ticks: u64,
    pub contact: String,
    pub name: String,
    pub location: String,
}

impl SystemInfo {
    pub fn enterprise(&self) -> Option<u32> {
        oids::enterprise_of(&self.object_id)
    }

    pub fn uptime_secs(&self) -> u64 {
        self.uptime_ticks / 100
    }
}
