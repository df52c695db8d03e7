// ── PoE domain types ──

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

/// `pethPsePortDetectionStatus`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum PoeDetectStatus {
    Disabled,
    Searching,
    DeliveringPower,
    Fault,
    Test,
    OtherFault,
    #[default]
    Unknown,
}

impl PoeDetectStatus {
    pub fn from_mib(v: i64) -> Self {
        match v {
            1 => Self::Disabled,
            2 => Self::Searching,
            3 => Self::DeliveringPower,
            4 => Self::Fault,
            5 => Self::Test,
            6 => Self::OtherFault,
            _ => Self::Unknown,
        }
    }
}

/// `pethMainPseOperStatus`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum PseStatus {
    On,
    Off,
    Faulty,
    #[default]
    Unknown,
}

impl PseStatus {
    pub fn from_mib(v: i64) -> Self {
        match v {
            1 => Self::On,
            2 => Self::Off,
            3 => Self::Faulty,
            _ => Self::Unknown,
        }
    }
}

/// One PoE-capable port, keyed by its `module.port` index.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PoePort {
    pub index: String,
    pub admin_enabled: bool,
    pub detect_status: PoeDetectStatus,
    pub power_available_mw: Option<u32>,
    pub power_consumed_mw: Option<u32>,
    pub power_max_mw: Option<u32>,
    /// ifIndex this entry was mapped to.
    pub interface: Option<u32>,
}

impl PoePort {
    pub fn new(index: impl Into<String>) -> Self {
        Self {
            index: index.into(),
            ..Self::default()
        }
    }

    pub fn is_fault(&self) -> bool {
        matches!(
            self.detect_status,
            PoeDetectStatus::Fault | PoeDetectStatus::OtherFault
        )
    }

    /// `(module, port)` parsed from a numeric `m.p` index.
    pub fn module_port(&self) -> Option<(u32, u32)> {
        let (module, port) = self.index.split_once('.')?;
        Some((module.parse().ok()?, port.parse().ok()?))
    }
}

/// One power-sourcing module (a stack member or line card).
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PoePse {
    pub module: u32,
    pub status: PseStatus,
    pub max_power_mw: u32,
    pub consumed_power_mw: u32,
}

impl PoePse {
    pub fn new(module: u32) -> Self {
        Self {
            module,
            ..Self::default()
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PoeData {
    pub pse: BTreeMap<u32, PoePse>,
    pub ports: BTreeMap<String, PoePort>,
}

impl PoeData {
    pub fn is_empty(&self) -> bool {
        self.pse.is_empty() && self.ports.is_empty()
    }

    pub fn port_mut(&mut self, index: &str) -> &mut PoePort {
        self.ports
            .entry(index.to_string())
            .or_insert_with(|| PoePort::new(index))
    }

    pub fn pse_mut(&mut self, module: u32) -> &mut PoePse {
        self.pse.entry(module).or_insert_with(|| PoePse::new(module))
    }

    /// Fill PSE consumption from the ports when the PSE table reports none.
    pub fn aggregate_consumption(&mut self) {
        for pse in self.pse.values_mut() {
            if pse.consumed_power_mw != 0 {
                continue;
            }
            pse.consumed_power_mw = self
                .ports
                .values()
                .filter(|p| p.module_port().is_some_and(|(m, _)| m == pse.module))
                .filter_map(|p| p.power_consumed_mw)
                .sum();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn pse_consumption_falls_back_to_port_sum() {
        let mut poe = PoeData::default();
        poe.pse_mut(1).max_power_mw = 370_000;
        poe.pse_mut(2).consumed_power_mw = 5_000;
        poe.port_mut("1.1").power_consumed_mw = Some(4_000);
        poe.port_mut("1.2").power_consumed_mw = Some(6_500);
        poe.port_mut("2.1").power_consumed_mw = Some(1_000);

        poe.aggregate_consumption();

        assert_eq!(poe.pse[&1].consumed_power_mw, 10_500);
        assert_eq!(poe.pse[&2].consumed_power_mw, 5_000);
    }

    #[test]
    fn fault_detection() {
        let mut port = PoePort::new("1.4");
        port.detect_status = PoeDetectStatus::from_mib(4);
        assert!(port.is_fault());
        assert_eq!(port.module_port(), Some((1, 4)));
    }
}
