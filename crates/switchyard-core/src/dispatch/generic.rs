// ── Standard MIB handlers ──
//
// SNMPv2-MIB, IF-MIB, BRIDGE/Q-BRIDGE, IEEE Q-BRIDGE, POWER-ETHERNET,
// IEEE8023-LAG, LLDP, IP-MIB and ENTITY-MIB. Interface-keyed branches
// never create interfaces; only the ifIndex column does.

use std::net::Ipv4Addr;

use super::{Matcher, index, with_interface};
use crate::bitmap;
use crate::coerce::Value;
use crate::model::{
    AdminStatus, Device, EntityClass, EthernetAddress, Interface, LldpNeighbor, MacAddress,
    OperStatus, PoeDetectStatus, PseStatus, VlanStatus, is_valid_vlan_id,
};
use crate::oids::{self, last_arc, suffix_arcs};

pub(crate) static MATCHERS: &[Matcher] = &[
    // system
    Matcher::new(oids::SYS_DESCR, sys_descr),
    Matcher::new(oids::SYS_OBJECT_ID, sys_object_id),
    Matcher::new(oids::SYS_UPTIME, sys_uptime),
    Matcher::new(oids::SYS_CONTACT, sys_contact),
    Matcher::new(oids::SYS_NAME, sys_name),
    Matcher::new(oids::SYS_LOCATION, sys_location),
    // interfaces
    Matcher::new(oids::IF_INDEX, if_index),
    Matcher::new(oids::IF_DESCR, if_descr),
    Matcher::new(oids::IF_TYPE, if_type),
    Matcher::new(oids::IF_MTU, if_mtu),
    Matcher::new(oids::IF_SPEED, if_speed),
    Matcher::new(oids::IF_PHYS_ADDRESS, if_phys_address),
    Matcher::new(oids::IF_ADMIN_STATUS, if_admin_status),
    Matcher::new(oids::IF_OPER_STATUS, if_oper_status),
    Matcher::new(oids::IF_NAME, if_name),
    Matcher::new(oids::IF_HIGH_SPEED, if_high_speed),
    Matcher::new(oids::IF_ALIAS, if_alias),
    // bridge / q-bridge
    Matcher::new(oids::DOT1D_BASE_PORT_IF_INDEX, base_port_if_index),
    Matcher::new(oids::DOT1Q_VLAN_STATIC_NAME, vlan_static_name),
    Matcher::new(oids::DOT1Q_VLAN_STATUS, vlan_status),
    Matcher::new(oids::DOT1Q_VLAN_FDB_ID, vlan_fdb_id),
    Matcher::new(oids::DOT1Q_PVID, pvid),
    Matcher::new(oids::DOT1Q_VLAN_CURRENT_EGRESS_PORTS, current_egress),
    Matcher::new(oids::DOT1Q_VLAN_STATIC_EGRESS_PORTS, static_egress),
    // ieee8021 q-bridge, suffixes carry a component id
    Matcher::new(oids::IEEE8021_QBRIDGE_VLAN_STATIC_NAME, vlan_static_name_last_arc),
    Matcher::new(oids::IEEE8021_QBRIDGE_VLAN_CURRENT_EGRESS_PORTS, current_egress),
    Matcher::new(oids::IEEE8021_QBRIDGE_VLAN_STATIC_EGRESS_PORTS, static_egress_last_arc),
    Matcher::new(oids::IEEE8021_QBRIDGE_PVID, pvid_last_arc),
    // poe
    Matcher::new(oids::PETH_PSE_PORT_ADMIN_ENABLE, poe_port_admin),
    Matcher::new(oids::PETH_PSE_PORT_DETECTION_STATUS, poe_port_detection),
    Matcher::new(oids::PETH_MAIN_PSE_POWER, pse_power),
    Matcher::new(oids::PETH_MAIN_PSE_OPER_STATUS, pse_status),
    Matcher::new(oids::PETH_MAIN_PSE_CONSUMPTION_POWER, pse_consumption),
    // lacp
    Matcher::new(oids::DOT3AD_AGG_ACTOR_ADMIN_KEY, lacp_aggregator_key),
    Matcher::new(oids::DOT3AD_AGG_PORT_ACTOR_ADMIN_KEY, lacp_member_key),
    // lldp
    Matcher::new(oids::LLDP_REM_CHASSIS_ID_SUBTYPE, lldp_chassis_subtype),
    Matcher::new(oids::LLDP_REM_CHASSIS_ID, lldp_chassis_id),
    Matcher::new(oids::LLDP_REM_PORT_ID_SUBTYPE, lldp_port_subtype),
    Matcher::new(oids::LLDP_REM_PORT_ID, lldp_port_id),
    Matcher::new(oids::LLDP_REM_PORT_DESC, lldp_port_desc),
    Matcher::new(oids::LLDP_REM_SYS_NAME, lldp_sys_name),
    Matcher::new(oids::LLDP_REM_SYS_DESC, lldp_sys_desc),
    Matcher::new(oids::LLDP_REM_SYS_CAP_SUPPORTED, lldp_caps_supported),
    Matcher::new(oids::LLDP_REM_SYS_CAP_ENABLED, lldp_caps_enabled),
    Matcher::new(oids::LLDP_REM_MAN_ADDR_IF_SUBTYPE, lldp_management_address),
    // forwarding / arp
    Matcher::new(oids::DOT1Q_TP_FDB_PORT, qbridge_fdb_port),
    Matcher::new(oids::DOT1D_TP_FDB_PORT, bridge_fdb_port),
    Matcher::new(oids::IP_NET_TO_MEDIA_PHYS_ADDRESS, arp_entry),
    // entity
    Matcher::new(oids::ENT_PHYSICAL_CLASS, entity_class),
    Matcher::new(oids::ENT_PHYSICAL_DESCR, entity_descr),
    Matcher::new(oids::ENT_PHYSICAL_NAME, entity_name),
    Matcher::new(oids::ENT_PHYSICAL_SOFTWARE_REV, entity_software),
    Matcher::new(oids::ENT_PHYSICAL_SERIAL_NUM, entity_serial),
    Matcher::new(oids::ENT_PHYSICAL_MODEL_NAME, entity_model),
];

// ── System ───────────────────────────────────────────────────────────

/// Scalars are only accepted at instance `.0`.
fn scalar(suffix: &str, f: impl FnOnce()) -> bool {
    if suffix != "0" {
        return false;
    }
    f();
    true
}

fn sys_descr(d: &mut Device, suffix: &str, v: &Value) -> bool {
    scalar(suffix, || d.system.descr = v.display_string())
}

fn sys_object_id(d: &mut Device, suffix: &str, v: &Value) -> bool {
    scalar(suffix, || {
        let oid = v.display_string();
        d.system.object_id = if oid.is_empty() || oid.starts_with('.') {
            oid
        } else {
            format!(".{oid}")
        };
    })
}

fn sys_uptime(d: &mut Device, suffix: &str, v: &Value) -> bool {
    scalar(suffix, || {
        d.system.uptime_ticks = v.as_int().and_then(|t| u64::try_from(t).ok()).unwrap_or(0);
    })
}

fn sys_contact(d: &mut Device, suffix: &str, v: &Value) -> bool {
    scalar(suffix, || d.system.contact = v.display_string())
}

fn sys_name(d: &mut Device, suffix: &str, v: &Value) -> bool {
    scalar(suffix, || d.system.name = v.display_string())
}

fn sys_location(d: &mut Device, suffix: &str, v: &Value) -> bool {
    scalar(suffix, || d.system.location = v.display_string())
}

// ── Interfaces ───────────────────────────────────────────────────────

fn if_index(d: &mut Device, _suffix: &str, v: &Value) -> bool {
    let Some(index) = v.as_u32() else {
        return false;
    };
    d.interfaces
        .entry(index)
        .or_insert_with(|| Interface::new(index));
    true
}

fn if_descr(d: &mut Device, suffix: &str, v: &Value) -> bool {
    let text = v.display_string();
    with_interface(d, suffix, |i| {
        if i.name.is_empty() {
            i.name.clone_from(&text);
        }
        i.if_descr = text;
    })
}

fn if_name(d: &mut Device, suffix: &str, v: &Value) -> bool {
    let text = v.display_string();
    with_interface(d, suffix, |i| {
        if !text.is_empty() {
            i.name = text;
        }
    })
}

fn if_type(d: &mut Device, suffix: &str, v: &Value) -> bool {
    with_interface(d, suffix, |i| i.if_type = v.as_u32().unwrap_or(0))
}

fn if_mtu(d: &mut Device, suffix: &str, v: &Value) -> bool {
    with_interface(d, suffix, |i| i.mtu = v.as_u32().unwrap_or(0))
}

fn if_speed(d: &mut Device, suffix: &str, v: &Value) -> bool {
    let bps = v.as_int().and_then(|b| u64::try_from(b).ok()).unwrap_or(0);
    with_interface(d, suffix, |i| {
        // ifHighSpeed wins whenever present
        if i.speed_mbps == 0 {
            i.speed_mbps = bps / 1_000_000;
        }
    })
}

fn if_high_speed(d: &mut Device, suffix: &str, v: &Value) -> bool {
    let mbps = v.as_int().and_then(|m| u64::try_from(m).ok()).unwrap_or(0);
    with_interface(d, suffix, |i| {
        if mbps > 0 {
            i.speed_mbps = mbps;
        }
    })
}

fn if_phys_address(d: &mut Device, suffix: &str, v: &Value) -> bool {
    let mac = MacAddress::from_octets(v.octets());
    with_interface(d, suffix, |i| i.phys_address = mac)
}

fn if_admin_status(d: &mut Device, suffix: &str, v: &Value) -> bool {
    with_interface(d, suffix, |i| {
        i.admin_status = AdminStatus::from_mib(v.as_int().unwrap_or(0));
    })
}

fn if_oper_status(d: &mut Device, suffix: &str, v: &Value) -> bool {
    with_interface(d, suffix, |i| {
        i.oper_status = OperStatus::from_mib(v.as_int().unwrap_or(0));
    })
}

fn if_alias(d: &mut Device, suffix: &str, v: &Value) -> bool {
    let text = v.display_string();
    with_interface(d, suffix, |i| i.description = text)
}

// ── Bridge / VLANs ───────────────────────────────────────────────────

fn base_port_if_index(d: &mut Device, suffix: &str, v: &Value) -> bool {
    let (Some(port), Some(if_index)) = (index(suffix), v.as_u32()) else {
        return false;
    };
    d.join.bridge_ports.insert(port, if_index);
    if let Some(iface) = d.interface_mut(if_index) {
        iface.port_id = Some(port);
    }
    true
}

fn vlan_id(arc: Option<u32>) -> Option<u16> {
    arc.filter(|v| is_valid_vlan_id(*v))
        .and_then(|v| u16::try_from(v).ok())
}

fn set_vlan_name(d: &mut Device, id: Option<u16>, v: &Value) -> bool {
    let Some(id) = id else {
        return false;
    };
    let name = v.display_string();
    let vlan = d.vlan_or_insert(id);
    if !name.is_empty() {
        vlan.name = name;
    }
    true
}

fn vlan_static_name(d: &mut Device, suffix: &str, v: &Value) -> bool {
    set_vlan_name(d, vlan_id(index(suffix)), v)
}

fn vlan_static_name_last_arc(d: &mut Device, suffix: &str, v: &Value) -> bool {
    set_vlan_name(d, vlan_id(last_arc(suffix)), v)
}

fn vlan_status(d: &mut Device, suffix: &str, v: &Value) -> bool {
    let Some(id) = vlan_id(last_arc(suffix)) else {
        return false;
    };
    d.vlan_or_insert(id).status = VlanStatus::from_qbridge(v.as_int().unwrap_or(0));
    true
}

fn vlan_fdb_id(d: &mut Device, suffix: &str, v: &Value) -> bool {
    let (Some(vlan), Some(fdb)) = (vlan_id(last_arc(suffix)), v.as_u32()) else {
        return false;
    };
    d.join.fdb_vlans.insert(fdb, vlan);
    true
}

fn set_pvid(d: &mut Device, port: Option<u32>, v: &Value) -> bool {
    let Some(port) = port else {
        return false;
    };
    let vlan = v.as_u16().unwrap_or(0);
    if let Some(iface) = d.interface_for_port_mut(port) {
        iface.untagged_vlan = vlan;
    }
    true
}

fn pvid(d: &mut Device, suffix: &str, v: &Value) -> bool {
    set_pvid(d, index(suffix), v)
}

fn pvid_last_arc(d: &mut Device, suffix: &str, v: &Value) -> bool {
    set_pvid(d, last_arc(suffix), v)
}

fn current_egress(d: &mut Device, suffix: &str, v: &Value) -> bool {
    let Some(id) = vlan_id(last_arc(suffix)) else {
        return false;
    };
    d.vlan_or_insert(id).current_egress = v.octets().to_vec();
    apply_vlan_egress(d, id, v.octets());
    true
}

fn set_static_egress(d: &mut Device, id: Option<u16>, v: &Value) -> bool {
    let Some(id) = id else {
        return false;
    };
    d.vlan_or_insert(id).static_egress = v.octets().to_vec();
    true
}

fn static_egress(d: &mut Device, suffix: &str, v: &Value) -> bool {
    set_static_egress(d, vlan_id(index(suffix)), v)
}

fn static_egress_last_arc(d: &mut Device, suffix: &str, v: &Value) -> bool {
    set_static_egress(d, vlan_id(last_arc(suffix)), v)
}

/// Mark every port in an egress bitmap as a member of `vlan_id`.
///
/// A port whose untagged VLAN is `vlan_id` is left alone; any other member
/// gains the VLAN as tagged and becomes a trunk.
pub fn apply_vlan_egress(device: &mut Device, vlan_id: u16, bytes: &[u8]) {
    for port in bitmap::vlan_egress_ports(vlan_id, bytes) {
        let Some(iface) = device.interface_for_port_mut(port) else {
            continue;
        };
        if iface.untagged_vlan == vlan_id {
            continue;
        }
        iface.tagged_vlans.insert(vlan_id);
        iface.is_tagged = true;
    }
}

// ── PoE ──────────────────────────────────────────────────────────────

fn poe_port_admin(d: &mut Device, suffix: &str, v: &Value) -> bool {
    d.poe.port_mut(suffix).admin_enabled = v.as_int() == Some(1);
    true
}

fn poe_port_detection(d: &mut Device, suffix: &str, v: &Value) -> bool {
    d.poe.port_mut(suffix).detect_status = PoeDetectStatus::from_mib(v.as_int().unwrap_or(0));
    true
}

fn watts_to_mw(v: &Value) -> u32 {
    v.as_u32().unwrap_or(0).saturating_mul(1000)
}

fn pse_power(d: &mut Device, suffix: &str, v: &Value) -> bool {
    let Some(module) = index(suffix) else {
        return false;
    };
    d.poe.pse_mut(module).max_power_mw = watts_to_mw(v);
    true
}

fn pse_status(d: &mut Device, suffix: &str, v: &Value) -> bool {
    let Some(module) = index(suffix) else {
        return false;
    };
    d.poe.pse_mut(module).status = PseStatus::from_mib(v.as_int().unwrap_or(0));
    true
}

fn pse_consumption(d: &mut Device, suffix: &str, v: &Value) -> bool {
    let Some(module) = index(suffix) else {
        return false;
    };
    d.poe.pse_mut(module).consumed_power_mw = watts_to_mw(v);
    true
}

// ── LACP ─────────────────────────────────────────────────────────────

fn lacp_aggregator_key(d: &mut Device, suffix: &str, v: &Value) -> bool {
    let (Some(if_index), Some(key)) = (index(suffix), v.as_u32()) else {
        return false;
    };
    d.join.aggregator_keys.insert(if_index, key);
    true
}

fn lacp_member_key(d: &mut Device, suffix: &str, v: &Value) -> bool {
    let (Some(if_index), Some(key)) = (index(suffix), v.as_u32()) else {
        return false;
    };
    d.join.member_keys.insert(if_index, key);
    true
}

// ── LLDP ─────────────────────────────────────────────────────────────

/// Merge one remote-table column into the neighbor keyed by
/// `time.local_port.index`.
fn with_neighbor(d: &mut Device, suffix: &str, f: impl FnOnce(&mut LldpNeighbor)) -> bool {
    let Some(arcs) = suffix_arcs(suffix) else {
        return false;
    };
    let &[time, local_port, idx, ..] = arcs.as_slice() else {
        return false;
    };
    let key = format!("{time}.{local_port}.{idx}");
    if let Some(iface) = d.interface_for_port_mut(local_port) {
        let neighbor = iface
            .lldp
            .entry(key.clone())
            .or_insert_with(|| LldpNeighbor::new(key, local_port));
        f(neighbor);
    }
    true
}

fn small_int(v: &Value) -> Option<u8> {
    v.as_int().and_then(|s| u8::try_from(s).ok())
}

fn lldp_chassis_subtype(d: &mut Device, suffix: &str, v: &Value) -> bool {
    with_neighbor(d, suffix, |n| n.chassis_id_subtype = small_int(v))
}

fn lldp_chassis_id(d: &mut Device, suffix: &str, v: &Value) -> bool {
    with_neighbor(d, suffix, |n| n.chassis_id = v.octets().to_vec())
}

fn lldp_port_subtype(d: &mut Device, suffix: &str, v: &Value) -> bool {
    with_neighbor(d, suffix, |n| n.port_id_subtype = small_int(v))
}

fn lldp_port_id(d: &mut Device, suffix: &str, v: &Value) -> bool {
    with_neighbor(d, suffix, |n| n.port_id = v.octets().to_vec())
}

fn lldp_port_desc(d: &mut Device, suffix: &str, v: &Value) -> bool {
    with_neighbor(d, suffix, |n| n.port_description = v.display_string())
}

fn lldp_sys_name(d: &mut Device, suffix: &str, v: &Value) -> bool {
    with_neighbor(d, suffix, |n| n.system_name = v.display_string())
}

fn lldp_sys_desc(d: &mut Device, suffix: &str, v: &Value) -> bool {
    with_neighbor(d, suffix, |n| n.system_description = v.display_string())
}

fn lldp_caps_supported(d: &mut Device, suffix: &str, v: &Value) -> bool {
    with_neighbor(d, suffix, |n| n.capabilities_supported = v.octets().to_vec())
}

fn lldp_caps_enabled(d: &mut Device, suffix: &str, v: &Value) -> bool {
    with_neighbor(d, suffix, |n| n.capabilities_enabled = v.octets().to_vec())
}

/// Suffix `time.port.idx.family.len.addr...`; only IPv4 is kept.
fn lldp_management_address(d: &mut Device, suffix: &str, _v: &Value) -> bool {
    let Some(arcs) = suffix_arcs(suffix) else {
        return false;
    };
    let Some([family, len, addr @ ..]) = arcs.get(3..) else {
        return false;
    };
    let family = u8::try_from(*family).ok();
    let ip = match (family, *len, addr) {
        (Some(1), 4, &[a, b, c, dd]) => {
            let octet = |x: u32| u8::try_from(x).unwrap_or(0);
            Some(Ipv4Addr::new(octet(a), octet(b), octet(c), octet(dd)))
        }
        _ => None,
    };
    let prefix = arcs[..3]
        .iter()
        .map(u32::to_string)
        .collect::<Vec<_>>()
        .join(".");
    with_neighbor(d, &prefix, |n| {
        n.management_family = family;
        if ip.is_some() {
            n.management_address = ip;
        }
    })
}

// ── Forwarding table / ARP ───────────────────────────────────────────

fn learn_address(d: &mut Device, port: u32, mac: MacAddress, vlan: Option<u16>) {
    // port 0 is the switch itself
    if port == 0 {
        return;
    }
    if let Some(iface) = d.interface_for_port_mut(port) {
        iface
            .ethernet
            .insert(mac.clone(), EthernetAddress::new(mac, vlan));
    }
}

fn qbridge_fdb_port(d: &mut Device, suffix: &str, v: &Value) -> bool {
    let Some(arcs) = suffix_arcs(suffix) else {
        return false;
    };
    let [fdb, mac_arcs @ ..] = arcs.as_slice() else {
        return false;
    };
    let (Some(mac), Some(port)) = (MacAddress::from_arcs(mac_arcs), v.as_u32()) else {
        return false;
    };
    let vlan = d
        .join
        .fdb_vlans
        .get(fdb)
        .copied()
        .or_else(|| vlan_id(Some(*fdb)));
    learn_address(d, port, mac, vlan);
    true
}

fn bridge_fdb_port(d: &mut Device, suffix: &str, v: &Value) -> bool {
    let Some(mac) = suffix_arcs(suffix).and_then(|arcs| MacAddress::from_arcs(&arcs)) else {
        return false;
    };
    let Some(port) = v.as_u32() else {
        return false;
    };
    learn_address(d, port, mac, None);
    true
}

/// Suffix `ifIndex.a.b.c.d`, value the MAC octets.
fn arp_entry(d: &mut Device, suffix: &str, v: &Value) -> bool {
    let Some(arcs) = suffix_arcs(suffix) else {
        return false;
    };
    let &[_if_index, a, b, c, dd] = arcs.as_slice() else {
        return false;
    };
    let octets: Option<Vec<u8>> = [a, b, c, dd]
        .iter()
        .map(|x| u8::try_from(*x).ok())
        .collect();
    let (Some(octets), Some(mac)) = (octets, MacAddress::from_octets(v.octets())) else {
        return false;
    };
    let ip = Ipv4Addr::new(octets[0], octets[1], octets[2], octets[3]);
    d.join.arp.insert(mac, ip);
    true
}

// ── Entity ───────────────────────────────────────────────────────────

fn entity_class(d: &mut Device, suffix: &str, v: &Value) -> bool {
    let Some(entity) = index(suffix) else {
        return false;
    };
    let class = EntityClass::from_mib(v.as_int().unwrap_or(0));
    if class.is_tracked() || d.stack.contains_key(&entity) {
        d.stack_or_insert(entity).class = class;
    }
    true
}

fn with_entity(
    d: &mut Device,
    suffix: &str,
    f: impl FnOnce(&mut crate::model::StackMember),
) -> bool {
    let Some(entity) = index(suffix) else {
        return false;
    };
    if let Some(member) = d.stack.get_mut(&entity) {
        f(member);
    }
    true
}

fn entity_descr(d: &mut Device, suffix: &str, v: &Value) -> bool {
    with_entity(d, suffix, |m| m.description = v.display_string())
}

fn entity_name(d: &mut Device, suffix: &str, v: &Value) -> bool {
    with_entity(d, suffix, |m| m.name = v.display_string())
}

fn entity_software(d: &mut Device, suffix: &str, v: &Value) -> bool {
    with_entity(d, suffix, |m| m.software_version = v.display_string())
}

fn entity_serial(d: &mut Device, suffix: &str, v: &Value) -> bool {
    with_entity(d, suffix, |m| m.serial = v.display_string())
}

fn entity_model(d: &mut Device, suffix: &str, v: &Value) -> bool {
    with_entity(d, suffix, |m| m.model = v.display_string())
}
