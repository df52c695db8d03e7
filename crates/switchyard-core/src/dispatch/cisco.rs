// ── Cisco handlers ──
//
// VTP-based switches keep VLANs, access VLANs and trunk state in
// proprietary tables. Small-business (SB) switches use Q-Bridge plus a
// port-mode column.

use super::{Matcher, index, with_interface};
use crate::bitmap::VlanListLayout;
use crate::coerce::Value;
use crate::model::{Device, PortMode, VlanStatus, VlanType, is_valid_vlan_id};
use crate::oids::{self, last_arc};

pub(crate) static VTP_MATCHERS: &[Matcher] = &[
    Matcher::new(oids::VTP_VLAN_STATE, vtp_vlan_state),
    Matcher::new(oids::VTP_VLAN_TYPE, vtp_vlan_type),
    Matcher::new(oids::VTP_VLAN_NAME, vtp_vlan_name),
    Matcher::new(oids::VM_VLAN, vm_vlan),
    Matcher::new(oids::VLAN_TRUNK_PORT_DYNAMIC_STATUS, trunk_dynamic_status),
    Matcher::new(oids::VLAN_TRUNK_PORT_NATIVE_VLAN, trunk_native_vlan),
    Matcher::new(oids::VLAN_TRUNK_PORT_VLANS_ENABLED, trunk_vlans_chunk::<0>),
    Matcher::new(oids::VLAN_TRUNK_PORT_VLANS_ENABLED_2K, trunk_vlans_chunk::<1>),
    Matcher::new(oids::VLAN_TRUNK_PORT_VLANS_ENABLED_3K, trunk_vlans_chunk::<2>),
    Matcher::new(oids::VLAN_TRUNK_PORT_VLANS_ENABLED_4K, trunk_vlans_chunk::<3>),
    Matcher::new(oids::CPE_EXT_PSE_PORT_PWR_AVAILABLE, poe_power_available),
    Matcher::new(oids::CPE_EXT_PSE_PORT_PWR_CONSUMPTION, poe_power_consumed),
    Matcher::new(oids::CPE_EXT_PSE_PORT_MAX_PWR_DRAWN, poe_power_max),
    Matcher::new(oids::CSW_SWITCH_NUM_CURRENT, stack_switch_number),
];

pub(crate) static SB_MATCHERS: &[Matcher] = &[
    Matcher::new(oids::SB_VLAN_PORT_MODE_STATE, sb_port_mode),
];

/// `vlanPortModeState` values.
pub mod sb_mode {
    pub const GENERAL: i64 = 10;
    pub const ACCESS: i64 = 11;
    pub const TRUNK: i64 = 12;
    pub const CUSTOMER: i64 = 13;
}

const VTP_ETHERNET: i64 = 1;
const TRUNKING: i64 = 1;

fn vtp_vlan(suffix: &str) -> Option<u16> {
    last_arc(suffix)
        .filter(|v| is_valid_vlan_id(*v))
        .and_then(|v| u16::try_from(v).ok())
}

fn vtp_vlan_state(d: &mut Device, suffix: &str, v: &Value) -> bool {
    let Some(id) = vtp_vlan(suffix) else {
        return false;
    };
    d.vlan_or_insert(id).status = VlanStatus::from_vtp(v.as_int().unwrap_or(0));
    true
}

fn vtp_vlan_type(d: &mut Device, suffix: &str, v: &Value) -> bool {
    let Some(id) = vtp_vlan(suffix) else {
        return false;
    };
    d.vlan_or_insert(id).vlan_type = if v.as_int() == Some(VTP_ETHERNET) {
        VlanType::Ethernet
    } else {
        VlanType::Other
    };
    true
}

fn vtp_vlan_name(d: &mut Device, suffix: &str, v: &Value) -> bool {
    let Some(id) = vtp_vlan(suffix) else {
        return false;
    };
    let name = v.display_string();
    if !name.is_empty() {
        d.vlan_or_insert(id).name = name;
    }
    true
}

fn vm_vlan(d: &mut Device, suffix: &str, v: &Value) -> bool {
    let vlan = v.as_u16().unwrap_or(0);
    with_interface(d, suffix, |i| {
        i.untagged_vlan = vlan;
        if i.mode == PortMode::Unknown {
            i.mode = PortMode::Access;
        }
    })
}

fn trunk_dynamic_status(d: &mut Device, suffix: &str, v: &Value) -> bool {
    let trunking = v.as_int() == Some(TRUNKING);
    with_interface(d, suffix, |i| {
        if trunking {
            i.is_tagged = true;
            i.mode = PortMode::Trunk;
        } else if i.mode == PortMode::Unknown {
            i.mode = PortMode::Access;
        }
    })
}

fn trunk_native_vlan(d: &mut Device, suffix: &str, v: &Value) -> bool {
    let (Some(if_index), Some(vlan)) = (index(suffix), v.as_u16()) else {
        return false;
    };
    d.join.trunk_native.insert(if_index, vlan);
    true
}

fn trunk_vlans_chunk<const CHUNK: usize>(d: &mut Device, suffix: &str, v: &Value) -> bool {
    let Some(if_index) = index(suffix) else {
        return false;
    };
    let chunks = d.join.trunk_vlans.entry(if_index).or_default();
    if let Some(slot) = chunks.get_mut(CHUNK) {
        *slot = v.octets().to_vec();
    }
    true
}

fn poe_power_available(d: &mut Device, suffix: &str, v: &Value) -> bool {
    d.poe.port_mut(suffix).power_available_mw = v.as_u32();
    true
}

fn poe_power_consumed(d: &mut Device, suffix: &str, v: &Value) -> bool {
    d.poe.port_mut(suffix).power_consumed_mw = v.as_u32();
    true
}

fn poe_power_max(d: &mut Device, suffix: &str, v: &Value) -> bool {
    d.poe.port_mut(suffix).power_max_mw = v.as_u32();
    true
}

fn stack_switch_number(d: &mut Device, suffix: &str, v: &Value) -> bool {
    let (Some(entity), Some(number)) = (index(suffix), v.as_u32()) else {
        return false;
    };
    d.stack_or_insert(entity).member_id = Some(number);
    true
}

fn sb_port_mode(d: &mut Device, suffix: &str, v: &Value) -> bool {
    let raw = v.as_int().unwrap_or(0);
    let mode = match raw {
        sb_mode::GENERAL => PortMode::General,
        sb_mode::ACCESS => PortMode::Access,
        sb_mode::TRUNK => PortMode::Trunk,
        other => PortMode::Other(u32::try_from(other).unwrap_or(0)),
    };
    with_interface(d, suffix, |i| i.mode = mode)
}

/// Settle trunk ports once the VTP trunk columns are loaded: the native
/// VLAN is the untagged VLAN and the enabled lists are the tagged set.
/// Non-Ethernet VTP VLANs (FDDI, token ring) are dropped.
pub fn resolve_vtp_trunks(device: &mut Device) {
    device.vlans.retain(|_, vlan| vlan.vlan_type == VlanType::Ethernet);

    let natives = device.join.trunk_native.clone();
    let lists = device.join.trunk_vlans.clone();
    let layout = VlanListLayout::CISCO_TRUNK;
    for iface in device.interfaces.values_mut() {
        if iface.mode != PortMode::Trunk {
            continue;
        }
        if let Some(native) = natives.get(&iface.index) {
            iface.untagged_vlan = *native;
        }
        if let Some(chunks) = lists.get(&iface.index) {
            iface.tagged_vlans = chunks
                .iter()
                .zip(0u16..)
                .flat_map(|(octets, chunk)| layout.decode(chunk, octets))
                .filter(|vlan| *vlan != iface.untagged_vlan)
                .collect();
        }
    }
}
