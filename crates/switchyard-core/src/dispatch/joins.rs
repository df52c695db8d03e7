// ── Post-walk joins ──
//
// Relations that span several branches. Each runs once after every
// branch it depends on is loaded, because walk order between those
// branches is not guaranteed.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::model::{Device, Interface, LacpRole};

/// How PoE port indexes (`module.port`) are matched to interfaces.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum PoeMapping {
    /// `m.p` becomes the name suffix `m/p`.
    #[default]
    NameSuffix,
    /// PSE module ordinal selects the stack member number.
    CiscoStack,
    /// IRF member derived arithmetically from the PSE module.
    ComwareIrf,
    /// PoE index already is the interface name.
    InterfaceName,
}

/// Drop an untagged VLAN from the tagged set and settle `is_tagged`.
pub fn normalize_membership(device: &mut Device) {
    for iface in device.interfaces.values_mut() {
        if iface.untagged_vlan != 0 {
            iface.tagged_vlans.remove(&iface.untagged_vlan);
        }
        if iface.tagged_vlans.is_empty() && iface.mode != crate::model::PortMode::Trunk {
            iface.is_tagged = false;
        }
    }
}

/// Aggregators carry an actor admin key; a member's port key equals the
/// key of some aggregator.
pub fn resolve_lacp(device: &mut Device) {
    let aggregators = device.join.aggregator_keys.clone();
    let mut by_key = BTreeMap::new();
    for (if_index, key) in &aggregators {
        by_key.entry(*key).or_insert(*if_index);
        if let Some(iface) = device.interface_mut(*if_index) {
            iface.lacp_role = LacpRole::Aggregator;
            iface.lacp_admin_key = Some(*key);
        }
    }

    let members = device.join.member_keys.clone();
    for (if_index, key) in members {
        if aggregators.contains_key(&if_index) {
            continue;
        }
        let Some(master) = by_key.get(&key).copied() else {
            continue;
        };
        if let Some(iface) = device.interface_mut(if_index) {
            iface.lacp_role = LacpRole::Member;
            iface.lacp_master = Some(master);
            iface.lacp_admin_key = Some(key);
        }
    }
}

/// `true` if `name` ends with `suffix` and the character before it is
/// neither a digit nor a slash (so `1/1` does not match `Gi1/11/1`).
pub fn has_port_suffix(name: &str, suffix: &str) -> bool {
    let Some(head) = name.strip_suffix(suffix) else {
        return false;
    };
    !head
        .chars()
        .next_back()
        .is_some_and(|c| c.is_ascii_digit() || c == '/')
}

fn poe_candidates(
    index: &str,
    mapping: PoeMapping,
    modules: &[u32],
    members: &[u32],
) -> Vec<String> {
    let module_port = index
        .split_once('.')
        .and_then(|(m, p)| Some((m.parse::<u32>().ok()?, p.parse::<u32>().ok()?)));
    match (mapping, module_port) {
        (PoeMapping::InterfaceName, _) => vec![index.to_string()],
        (PoeMapping::CiscoStack, Some((module, port))) => {
            let member = modules
                .iter()
                .position(|m| *m == module)
                .and_then(|ordinal| members.get(ordinal).copied())
                .unwrap_or(module);
            vec![format!("{member}/0/{port}"), format!("{member}/{port}")]
        }
        (PoeMapping::ComwareIrf, Some((module, port))) => {
            let member = module.saturating_sub(1) / 3 + 1;
            vec![format!("{member}/0/{port}")]
        }
        _ => vec![index.replace('.', "/")],
    }
}

/// Attach every PoE port to the interface it powers.
pub fn map_poe(device: &mut Device, mapping: PoeMapping) {
    let mut modules: Vec<u32> = device.poe.pse.keys().copied().collect();
    for port in device.poe.ports.values() {
        if let Some((module, _)) = port.module_port() {
            modules.push(module);
        }
    }
    modules.sort_unstable();
    modules.dedup();

    let mut members: Vec<u32> = device.stack.values().filter_map(|m| m.member_id).collect();
    members.sort_unstable();
    members.dedup();

    let indexes: Vec<String> = device.poe.ports.keys().cloned().collect();
    for index in indexes {
        let candidates = poe_candidates(&index, mapping, &modules, &members);
        let exact = mapping == PoeMapping::InterfaceName;
        let found = device.interfaces.values().find(|iface| {
            candidates.iter().any(|c| {
                if exact {
                    iface.name == *c
                } else {
                    has_port_suffix(&iface.name, c)
                }
            })
        });
        let Some(if_index) = found.map(|i| i.index) else {
            tracing::debug!(poe = %index, "no interface for PoE port");
            continue;
        };
        if let Some(iface) = device.interface_mut(if_index) {
            iface.poe_entry = Some(index.clone());
        }
        if let Some(port) = device.poe.ports.get_mut(&index) {
            port.interface = Some(if_index);
        }
    }
    device.poe.aggregate_consumption();
}

/// Flag interfaces that reference VLANs the device does not define.
pub fn check_vlan_consistency(device: &mut Device) {
    let mut problems = Vec::new();
    for iface in device.interfaces.values() {
        if let Some(vlan) = iface
            .referenced_vlans()
            .find(|v| !device.vlans.contains_key(v))
        {
            problems.push((iface.index, vlan));
        }
    }
    for (if_index, vlan) in problems {
        let Some(iface) = device.interface_mut(if_index) else {
            continue;
        };
        iface.disable(format!("VLAN {vlan} is not defined on the device"));
        let name = iface.name.clone();
        device.warn(format!("{name} references undefined VLAN {vlan}"));
    }
}

/// Hide configured prefixes and lock non-switchport interfaces.
pub fn apply_visibility(device: &mut Device, hide_prefixes: &[String]) {
    for iface in device.interfaces.values_mut() {
        if hide_prefixes.iter().any(|p| iface.name.starts_with(p.as_str())) {
            iface.visible = false;
            iface.disable("hidden by configuration");
        } else if is_foreign_type(iface) {
            iface.disable(format!("interface type {} is not a switch port", iface.if_type));
        }
    }
}

fn is_foreign_type(iface: &Interface) -> bool {
    iface.if_type != 0 && !iface.is_ethernet() && iface.lacp_role != LacpRole::Aggregator
}

/// Fill in IPv4 addresses for learned MACs from the ARP table.
pub fn attach_arp(device: &mut Device) {
    let arp = device.join.arp.clone();
    for iface in device.interfaces.values_mut() {
        for entry in iface.ethernet.values_mut() {
            if let Some(ip) = arp.get(&entry.mac) {
                entry.ipv4 = Some(*ip);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;
    use crate::model::{EntityClass, PoePort, StackMember, Vlan};

    fn named(device: &mut Device, index: u32, name: &str) {
        let mut iface = Interface::new(index);
        iface.name = name.into();
        iface.if_type = 6;
        device.interfaces.insert(index, iface);
    }

    #[test]
    fn lacp_join_is_order_independent() {
        let mut device = Device::default();
        named(&mut device, 1, "Gi1/0/1");
        named(&mut device, 2, "Gi1/0/2");
        named(&mut device, 50, "Po1");
        // members recorded before the aggregator
        device.join.member_keys.insert(1, 7);
        device.join.member_keys.insert(2, 9);
        device.join.aggregator_keys.insert(50, 7);

        resolve_lacp(&mut device);

        assert_eq!(device.interfaces[&50].lacp_role, LacpRole::Aggregator);
        assert_eq!(device.interfaces[&1].lacp_role, LacpRole::Member);
        assert_eq!(device.interfaces[&1].lacp_master, Some(50));
        assert_eq!(device.interfaces[&2].lacp_role, LacpRole::None);
    }

    #[test]
    fn suffix_match_needs_a_non_digit_boundary() {
        assert!(has_port_suffix("GigabitEthernet1/0/1", "1/0/1"));
        assert!(has_port_suffix("Gi1/1", "1/1"));
        assert!(!has_port_suffix("Gi11/1", "1/1"));
        assert!(!has_port_suffix("Gi1/0/11", "1/1"));
        assert!(!has_port_suffix("Gi2/1/1", "1/1"));
    }

    #[test]
    fn default_poe_mapping_uses_slash_suffix() {
        let mut device = Device::default();
        named(&mut device, 1, "1/1");
        named(&mut device, 2, "1/2");
        device.poe.ports.insert("1.2".into(), PoePort::new("1.2"));

        map_poe(&mut device, PoeMapping::NameSuffix);

        assert_eq!(device.interfaces[&2].poe_entry.as_deref(), Some("1.2"));
        assert_eq!(device.interfaces[&1].poe_entry, None);
        assert_eq!(device.poe.ports["1.2"].interface, Some(2));
    }

    #[test]
    fn cisco_stack_mapping_uses_member_numbers() {
        let mut device = Device::default();
        named(&mut device, 10, "GigabitEthernet2/0/3");
        named(&mut device, 11, "GigabitEthernet3/0/3");
        device.poe.pse_mut(1);
        device.poe.pse_mut(2);
        device.poe.ports.insert("2.3".into(), PoePort::new("2.3"));
        for (entity, member) in [(1000, 2), (2000, 3)] {
            let mut m = StackMember::new(entity, EntityClass::Chassis);
            m.member_id = Some(member);
            device.stack.insert(entity, m);
        }

        map_poe(&mut device, PoeMapping::CiscoStack);

        // second PSE module -> second stack member (3)
        assert_eq!(device.interfaces[&11].poe_entry.as_deref(), Some("2.3"));
        assert_eq!(device.interfaces[&10].poe_entry, None);
    }

    #[test]
    fn comware_irf_member_from_module() {
        let mut device = Device::default();
        named(&mut device, 1, "GigabitEthernet1/0/5");
        named(&mut device, 2, "GigabitEthernet2/0/5");
        device.poe.ports.insert("4.5".into(), PoePort::new("4.5"));
        device.poe.ports.insert("1.5".into(), PoePort::new("1.5"));

        map_poe(&mut device, PoeMapping::ComwareIrf);

        assert_eq!(device.interfaces[&1].poe_entry.as_deref(), Some("1.5"));
        assert_eq!(device.interfaces[&2].poe_entry.as_deref(), Some("4.5"));
    }

    #[test]
    fn undefined_vlan_disables_interface_with_reason() {
        let mut device = Device::default();
        named(&mut device, 1, "Gi1/0/1");
        named(&mut device, 2, "Gi1/0/2");
        device.vlans.insert(10, Vlan::new(10, "data"));
        for (index, vlan) in [(1, 10), (2, 99)] {
            if let Some(i) = device.interface_mut(index) {
                i.untagged_vlan = vlan;
            }
        }

        check_vlan_consistency(&mut device);

        assert!(device.interfaces[&1].manageable);
        assert!(!device.interfaces[&2].manageable);
        assert!(
            device.interfaces[&2]
                .unmanage_reason
                .as_deref()
                .is_some_and(|r| r.contains("99"))
        );
        assert_eq!(device.warnings.len(), 1);
    }

    #[test]
    fn untagged_vlan_is_not_also_tagged() {
        let mut device = Device::default();
        named(&mut device, 1, "Gi1/0/1");
        if let Some(i) = device.interface_mut(1) {
            i.tagged_vlans.insert(10);
            i.is_tagged = true;
            i.untagged_vlan = 10;
        }
        normalize_membership(&mut device);
        assert!(device.interfaces[&1].tagged_vlans.is_empty());
        assert!(!device.interfaces[&1].is_tagged);
    }

    #[test]
    fn hidden_prefixes_and_foreign_types() {
        let mut device = Device::default();
        named(&mut device, 1, "Gi1/0/1");
        named(&mut device, 2, "Vlan10");
        if let Some(i) = device.interface_mut(2) {
            i.if_type = 136;
        }
        named(&mut device, 3, "Null0");

        apply_visibility(&mut device, &["Null".to_string()]);

        assert!(device.interfaces[&1].manageable);
        assert!(!device.interfaces[&2].manageable);
        assert!(device.interfaces[&2].visible);
        assert!(!device.interfaces[&3].visible);
    }
}
