// ── Stack / entity domain types ──

use serde::{Deserialize, Serialize};

/// `entPhysicalClass`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum EntityClass {
    Other,
    #[default]
    Unknown,
    Chassis,
    Backplane,
    Container,
    PowerSupply,
    Fan,
    Sensor,
    Module,
    Port,
    Stack,
    Cpu,
}

impl EntityClass {
    pub fn from_mib(v: i64) -> Self {
        match v {
            1 => Self::Other,
            3 => Self::Chassis,
            4 => Self::Backplane,
            5 => Self::Container,
            6 => Self::PowerSupply,
            7 => Self::Fan,
            8 => Self::Sensor,
            9 => Self::Module,
            10 => Self::Port,
            11 => Self::Stack,
            12 => Self::Cpu,
            _ => Self::Unknown,
        }
    }

    /// Classes that become [`StackMember`] entries.
    pub fn is_tracked(self) -> bool {
        matches!(self, Self::Chassis | Self::Stack | Self::Module)
    }
}

/// A chassis, stack, or module entity. Chassis entries are stack members.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct StackMember {
    pub entity_index: u32,
    pub class: EntityClass,
    /// Stack member (switch) number, when the vendor reports one.
    pub member_id: Option<u32>,
    pub name: String,
    pub description: String,
    pub model: String,
    pub serial: String,
    pub software_version: String,
}

impl StackMember {
    pub fn new(entity_index: u32, class: EntityClass) -> Self {
        Self {
            entity_index,
            class,
            ..Self::default()
        }
    }

    pub fn is_chassis(&self) -> bool {
        matches!(self.class, EntityClass::Chassis)
    }
}
