// ── OID registry ──
//
// Every MIB object the engine reads or writes, by symbolic name.
// Branches are stored with a leading dot and without an instance suffix.

use std::collections::HashMap;
use std::sync::LazyLock;

macro_rules! oid_registry {
    ($( $konst:ident = $name:literal => $oid:literal; )*) => {
        $( #[doc = concat!("`", $name, "`")] pub const $konst: &str = $oid; )*

        /// Symbolic name → dotted OID for every registered object.
        pub static REGISTRY: &[(&str, &str)] = &[ $( ($name, $oid), )* ];
    };
}

oid_registry! {
    // SNMPv2-MIB system group
    SYSTEM = "system" => ".1.3.6.1.2.1.1";
    SYS_DESCR = "sysDescr" => ".1.3.6.1.2.1.1.1";
    SYS_OBJECT_ID = "sysObjectID" => ".1.3.6.1.2.1.1.2";
    SYS_UPTIME = "sysUpTime" => ".1.3.6.1.2.1.1.3";
    SYS_CONTACT = "sysContact" => ".1.3.6.1.2.1.1.4";
    SYS_NAME = "sysName" => ".1.3.6.1.2.1.1.5";
    SYS_LOCATION = "sysLocation" => ".1.3.6.1.2.1.1.6";

    // IF-MIB
    IF_TABLE = "ifTable" => ".1.3.6.1.2.1.2.2";
    IF_X_TABLE = "ifXTable" => ".1.3.6.1.2.1.31.1.1";
    IF_INDEX = "ifIndex" => ".1.3.6.1.2.1.2.2.1.1";
    IF_DESCR = "ifDescr" => ".1.3.6.1.2.1.2.2.1.2";
    IF_TYPE = "ifType" => ".1.3.6.1.2.1.2.2.1.3";
    IF_MTU = "ifMtu" => ".1.3.6.1.2.1.2.2.1.4";
    IF_SPEED = "ifSpeed" => ".1.3.6.1.2.1.2.2.1.5";
    IF_PHYS_ADDRESS = "ifPhysAddress" => ".1.3.6.1.2.1.2.2.1.6";
    IF_ADMIN_STATUS = "ifAdminStatus" => ".1.3.6.1.2.1.2.2.1.7";
    IF_OPER_STATUS = "ifOperStatus" => ".1.3.6.1.2.1.2.2.1.8";
    IF_NAME = "ifName" => ".1.3.6.1.2.1.31.1.1.1.1";
    IF_HIGH_SPEED = "ifHighSpeed" => ".1.3.6.1.2.1.31.1.1.1.15";
    IF_ALIAS = "ifAlias" => ".1.3.6.1.2.1.31.1.1.1.18";

    // BRIDGE-MIB
    DOT1D_BASE_PORT_IF_INDEX = "dot1dBasePortIfIndex" => ".1.3.6.1.2.1.17.1.4.1.2";
    DOT1D_TP_FDB_PORT = "dot1dTpFdbPort" => ".1.3.6.1.2.1.17.4.3.1.2";

    // Q-BRIDGE-MIB
    DOT1Q_VLAN_VERSION_NUMBER = "dot1qVlanVersionNumber" => ".1.3.6.1.2.1.17.7.1.1.1";
    DOT1Q_NUM_VLANS = "dot1qNumVlans" => ".1.3.6.1.2.1.17.7.1.1.4";
    DOT1Q_TP_FDB_PORT = "dot1qTpFdbPort" => ".1.3.6.1.2.1.17.7.1.2.2.1.2";
    DOT1Q_VLAN_FDB_ID = "dot1qVlanFdbId" => ".1.3.6.1.2.1.17.7.1.4.2.1.3";
    DOT1Q_VLAN_CURRENT_EGRESS_PORTS = "dot1qVlanCurrentEgressPorts" => ".1.3.6.1.2.1.17.7.1.4.2.1.4";
    DOT1Q_VLAN_CURRENT_UNTAGGED_PORTS = "dot1qVlanCurrentUntaggedPorts" => ".1.3.6.1.2.1.17.7.1.4.2.1.5";
    DOT1Q_VLAN_STATUS = "dot1qVlanStatus" => ".1.3.6.1.2.1.17.7.1.4.2.1.6";
    DOT1Q_VLAN_STATIC_NAME = "dot1qVlanStaticName" => ".1.3.6.1.2.1.17.7.1.4.3.1.1";
    DOT1Q_VLAN_STATIC_EGRESS_PORTS = "dot1qVlanStaticEgressPorts" => ".1.3.6.1.2.1.17.7.1.4.3.1.2";
    DOT1Q_VLAN_STATIC_UNTAGGED_PORTS = "dot1qVlanStaticUntaggedPorts" => ".1.3.6.1.2.1.17.7.1.4.3.1.4";
    DOT1Q_VLAN_STATIC_ROW_STATUS = "dot1qVlanStaticRowStatus" => ".1.3.6.1.2.1.17.7.1.4.3.1.5";
    DOT1Q_PVID = "dot1qPvid" => ".1.3.6.1.2.1.17.7.1.4.5.1.1";

    // IEEE8021-Q-BRIDGE-MIB
    IEEE8021_QBRIDGE_VLAN_CURRENT_EGRESS_PORTS = "ieee8021QBridgeVlanCurrentEgressPorts" => ".1.3.111.2.802.1.1.4.1.4.2.1.5";
    IEEE8021_QBRIDGE_VLAN_STATIC_NAME = "ieee8021QBridgeVlanStaticName" => ".1.3.111.2.802.1.1.4.1.4.3.1.3";
    IEEE8021_QBRIDGE_VLAN_STATIC_EGRESS_PORTS = "ieee8021QBridgeVlanStaticEgressPorts" => ".1.3.111.2.802.1.1.4.1.4.3.1.4";
    IEEE8021_QBRIDGE_PVID = "ieee8021QBridgePvid" => ".1.3.111.2.802.1.1.4.1.4.5.1.1";

    // POWER-ETHERNET-MIB
    PETH_PSE_PORT_ADMIN_ENABLE = "pethPsePortAdminEnable" => ".1.3.6.1.2.1.105.1.1.1.3";
    PETH_PSE_PORT_DETECTION_STATUS = "pethPsePortDetectionStatus" => ".1.3.6.1.2.1.105.1.1.1.6";
    PETH_MAIN_PSE_POWER = "pethMainPsePower" => ".1.3.6.1.2.1.105.1.3.1.1.2";
    PETH_MAIN_PSE_OPER_STATUS = "pethMainPseOperStatus" => ".1.3.6.1.2.1.105.1.3.1.1.3";
    PETH_MAIN_PSE_CONSUMPTION_POWER = "pethMainPseConsumptionPower" => ".1.3.6.1.2.1.105.1.3.1.1.4";

    // IEEE8023-LAG-MIB
    DOT3AD_AGG_ACTOR_ADMIN_KEY = "dot3adAggActorAdminKey" => ".1.2.840.10006.300.43.1.1.1.1.6";
    DOT3AD_AGG_PORT_ACTOR_ADMIN_KEY = "dot3adAggPortActorAdminKey" => ".1.2.840.10006.300.43.1.2.1.1.4";

    // LLDP-MIB
    LLDP_REM_CHASSIS_ID_SUBTYPE = "lldpRemChassisIdSubtype" => ".1.0.8802.1.1.2.1.4.1.1.4";
    LLDP_REM_CHASSIS_ID = "lldpRemChassisId" => ".1.0.8802.1.1.2.1.4.1.1.5";
    LLDP_REM_PORT_ID_SUBTYPE = "lldpRemPortIdSubtype" => ".1.0.8802.1.1.2.1.4.1.1.6";
    LLDP_REM_PORT_ID = "lldpRemPortId" => ".1.0.8802.1.1.2.1.4.1.1.7";
    LLDP_REM_PORT_DESC = "lldpRemPortDesc" => ".1.0.8802.1.1.2.1.4.1.1.8";
    LLDP_REM_SYS_NAME = "lldpRemSysName" => ".1.0.8802.1.1.2.1.4.1.1.9";
    LLDP_REM_SYS_DESC = "lldpRemSysDesc" => ".1.0.8802.1.1.2.1.4.1.1.10";
    LLDP_REM_SYS_CAP_SUPPORTED = "lldpRemSysCapSupported" => ".1.0.8802.1.1.2.1.4.1.1.11";
    LLDP_REM_SYS_CAP_ENABLED = "lldpRemSysCapEnabled" => ".1.0.8802.1.1.2.1.4.1.1.12";
    LLDP_REM_MAN_ADDR_IF_SUBTYPE = "lldpRemManAddrIfSubtype" => ".1.0.8802.1.1.2.1.4.2.1.3";

    // IP-MIB
    IP_NET_TO_MEDIA_PHYS_ADDRESS = "ipNetToMediaPhysAddress" => ".1.3.6.1.2.1.4.22.1.2";

    // ENTITY-MIB
    ENT_PHYSICAL_DESCR = "entPhysicalDescr" => ".1.3.6.1.2.1.47.1.1.1.1.2";
    ENT_PHYSICAL_CLASS = "entPhysicalClass" => ".1.3.6.1.2.1.47.1.1.1.1.5";
    ENT_PHYSICAL_NAME = "entPhysicalName" => ".1.3.6.1.2.1.47.1.1.1.1.7";
    ENT_PHYSICAL_SOFTWARE_REV = "entPhysicalSoftwareRev" => ".1.3.6.1.2.1.47.1.1.1.1.10";
    ENT_PHYSICAL_SERIAL_NUM = "entPhysicalSerialNum" => ".1.3.6.1.2.1.47.1.1.1.1.11";
    ENT_PHYSICAL_MODEL_NAME = "entPhysicalModelName" => ".1.3.6.1.2.1.47.1.1.1.1.13";

    // CISCO-VTP-MIB
    VTP_VLAN_STATE = "vtpVlanState" => ".1.3.6.1.4.1.9.9.46.1.3.1.1.2";
    VTP_VLAN_TYPE = "vtpVlanType" => ".1.3.6.1.4.1.9.9.46.1.3.1.1.3";
    VTP_VLAN_NAME = "vtpVlanName" => ".1.3.6.1.4.1.9.9.46.1.3.1.1.4";
    VTP_VLAN_EDIT_OPERATION = "vtpVlanEditOperation" => ".1.3.6.1.4.1.9.9.46.1.4.1.1.1";
    VTP_VLAN_EDIT_BUFFER_OWNER = "vtpVlanEditBufferOwner" => ".1.3.6.1.4.1.9.9.46.1.4.1.1.3";
    VTP_VLAN_EDIT_TYPE = "vtpVlanEditType" => ".1.3.6.1.4.1.9.9.46.1.4.2.1.3";
    VTP_VLAN_EDIT_NAME = "vtpVlanEditName" => ".1.3.6.1.4.1.9.9.46.1.4.2.1.4";
    VTP_VLAN_EDIT_DOT10_SAID = "vtpVlanEditDot10Said" => ".1.3.6.1.4.1.9.9.46.1.4.2.1.6";
    VTP_VLAN_EDIT_ROW_STATUS = "vtpVlanEditRowStatus" => ".1.3.6.1.4.1.9.9.46.1.4.2.1.11";
    VLAN_TRUNK_PORT_VLANS_ENABLED = "vlanTrunkPortVlansEnabled" => ".1.3.6.1.4.1.9.9.46.1.6.1.1.4";
    VLAN_TRUNK_PORT_NATIVE_VLAN = "vlanTrunkPortNativeVlan" => ".1.3.6.1.4.1.9.9.46.1.6.1.1.5";
    VLAN_TRUNK_PORT_DYNAMIC_STATUS = "vlanTrunkPortDynamicStatus" => ".1.3.6.1.4.1.9.9.46.1.6.1.1.14";
    VLAN_TRUNK_PORT_VLANS_ENABLED_2K = "vlanTrunkPortVlansEnabled2k" => ".1.3.6.1.4.1.9.9.46.1.6.1.1.17";
    VLAN_TRUNK_PORT_VLANS_ENABLED_3K = "vlanTrunkPortVlansEnabled3k" => ".1.3.6.1.4.1.9.9.46.1.6.1.1.18";
    VLAN_TRUNK_PORT_VLANS_ENABLED_4K = "vlanTrunkPortVlansEnabled4k" => ".1.3.6.1.4.1.9.9.46.1.6.1.1.19";

    // CISCO-VLAN-MEMBERSHIP-MIB
    VM_VLAN = "vmVlan" => ".1.3.6.1.4.1.9.9.68.1.2.2.1.2";

    // CISCO-POWER-ETHERNET-EXT-MIB
    CPE_EXT_PSE_PORT_PWR_AVAILABLE = "cpeExtPsePortPwrAvailable" => ".1.3.6.1.4.1.9.9.402.1.2.1.7";
    CPE_EXT_PSE_PORT_PWR_CONSUMPTION = "cpeExtPsePortPwrConsumption" => ".1.3.6.1.4.1.9.9.402.1.2.1.9";
    CPE_EXT_PSE_PORT_MAX_PWR_DRAWN = "cpeExtPsePortMaxPwrDrawn" => ".1.3.6.1.4.1.9.9.402.1.2.1.10";

    // CISCO-STACKWISE-MIB
    CSW_SWITCH_NUM_CURRENT = "cswSwitchNumCurrent" => ".1.3.6.1.4.1.9.9.500.1.2.1.1.1";

    // OLD-CISCO-SYS-MIB / CISCO-CONFIG-COPY-MIB
    CISCO_WRITE_MEM = "writeMem" => ".1.3.6.1.4.1.9.2.1.54";
    CC_COPY_SOURCE_FILE_TYPE = "ccCopySourceFileType" => ".1.3.6.1.4.1.9.9.96.1.1.1.1.3";
    CC_COPY_DEST_FILE_TYPE = "ccCopyDestFileType" => ".1.3.6.1.4.1.9.9.96.1.1.1.1.4";
    CC_COPY_STATE = "ccCopyState" => ".1.3.6.1.4.1.9.9.96.1.1.1.1.10";
    CC_COPY_FAIL_CAUSE = "ccCopyFailCause" => ".1.3.6.1.4.1.9.9.96.1.1.1.1.13";
    CC_COPY_ENTRY_ROW_STATUS = "ccCopyEntryRowStatus" => ".1.3.6.1.4.1.9.9.96.1.1.1.1.14";

    // CISCOSB-vlan-MIB / CISCOSB-COPY-MIB
    CISCO_SB_PRODUCTS = "ciscoSB" => ".1.3.6.1.4.1.9.6.1";
    SB_VLAN_PORT_MODE_STATE = "vlanPortModeState" => ".1.3.6.1.4.1.9.6.1.101.48.22.1.1";
    SB_VLAN_TRUNK_MODE_NATIVE_VLAN_ID = "vlanTrunkModeNativeVlanId" => ".1.3.6.1.4.1.9.6.1.101.48.61.1.1";
    SB_VLAN_ACCESS_PORT_MODE_VLAN_ID = "vlanAccessPortModeVlanId" => ".1.3.6.1.4.1.9.6.1.101.48.62.1.1";
    SB_RL_COPY_SOURCE_LOCATION = "rlCopySourceLocation" => ".1.3.6.1.4.1.9.6.1.101.87.2.1.3";
    SB_RL_COPY_SOURCE_FILE_TYPE = "rlCopySourceFileType" => ".1.3.6.1.4.1.9.6.1.101.87.2.1.7";
    SB_RL_COPY_DESTINATION_LOCATION = "rlCopyDestinationLocation" => ".1.3.6.1.4.1.9.6.1.101.87.2.1.8";
    SB_RL_COPY_DESTINATION_FILE_TYPE = "rlCopyDestinationFileType" => ".1.3.6.1.4.1.9.6.1.101.87.2.1.12";
    SB_RL_COPY_ROW_STATUS = "rlCopyRowStatus" => ".1.3.6.1.4.1.9.6.1.101.87.2.1.17";

    // HH3C-LswVLAN-MIB / HH3C-CONFIG-MAN-MIB
    HH3C_IF_VLAN_TYPE = "hh3cifVLANType" => ".1.3.6.1.4.1.25506.8.35.1.1.1.5";
    HH3C_DOT1Q_VLAN_PORTS = "hh3cdot1qVlanPorts" => ".1.3.6.1.4.1.25506.8.35.2.1.1.1.3";
    HH3C_IF_VLAN_TRUNK_ALLOW_LIST_LOW = "hh3cifVLANTrunkAllowListLow" => ".1.3.6.1.4.1.25506.8.35.5.1.3.1.4";
    HH3C_IF_VLAN_TRUNK_ALLOW_LIST_HIGH = "hh3cifVLANTrunkAllowListHigh" => ".1.3.6.1.4.1.25506.8.35.5.1.3.1.5";
    HH3C_CFG_OPERATE_TYPE = "hh3cCfgOperateType" => ".1.3.6.1.4.1.25506.2.4.1.2.4.1.2";
    HH3C_CFG_OPERATE_ROW_STATUS = "hh3cCfgOperateRowStatus" => ".1.3.6.1.4.1.25506.2.4.1.2.4.1.9";
}

/// IANA enterprise numbers used for dialect detection.
pub mod enterprise {
    pub const PREFIX: &str = ".1.3.6.1.4.1";
    pub const CISCO: u32 = 9;
    pub const HP: u32 = 11;
    pub const H3C: u32 = 2011;
    pub const JUNIPER: u32 = 2636;
    pub const HH3C: u32 = 25506;
}

/// SNMPv2-TC RowStatus values.
pub mod row_status {
    pub const ACTIVE: i64 = 1;
    pub const CREATE_AND_GO: i64 = 4;
    pub const DESTROY: i64 = 6;
}

static BY_NAME: LazyLock<HashMap<&'static str, &'static str>> =
    LazyLock::new(|| REGISTRY.iter().copied().collect());

/// Dotted OID of a registered object, by its MIB name.
pub fn branch_of(name: &str) -> Option<&'static str> {
    BY_NAME.get(name).copied()
}

/// Returns the instance suffix of `oid` below `branch`, or `None` if `oid`
/// is not strictly inside the branch.
///
/// Matching is textual on `branch + "."`, so `.1.3.6.1.2.1.2.2.1.1` does not
/// claim `.1.3.6.1.2.1.2.2.1.10.5`. A leading dot on either side is optional.
pub fn oid_in_branch<'a>(branch: &str, oid: &'a str) -> Option<&'a str> {
    let branch = branch.trim_start_matches('.');
    let oid = oid.trim_start_matches('.');
    oid.strip_prefix(branch)?
        .strip_prefix('.')
        .filter(|rest| !rest.is_empty())
}

/// `branch.instance` with exactly one separator.
pub fn instance(branch: &str, index: impl std::fmt::Display) -> String {
    format!("{branch}.{index}")
}

/// Split a suffix into numeric arcs; `None` if any arc is not a number.
pub fn suffix_arcs(suffix: &str) -> Option<Vec<u32>> {
    suffix.split('.').map(|arc| arc.parse().ok()).collect()
}

/// Last numeric arc of a composite suffix (e.g. the VLAN of `time.vlan`).
pub fn last_arc(suffix: &str) -> Option<u32> {
    suffix.rsplit('.').next()?.parse().ok()
}

/// Enterprise number from a sysObjectID such as `.1.3.6.1.4.1.9.1.1208`.
pub fn enterprise_of(sys_object_id: &str) -> Option<u32> {
    oid_in_branch(enterprise::PREFIX, sys_object_id)?
        .split('.')
        .next()?
        .parse()
        .ok()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn branch_match_returns_remainder() {
        assert_eq!(oid_in_branch(IF_INDEX, ".1.3.6.1.2.1.2.2.1.1.17"), Some("17"));
        assert_eq!(
            oid_in_branch(DOT1Q_VLAN_CURRENT_EGRESS_PORTS, ".1.3.6.1.2.1.17.7.1.4.2.1.4.0.10"),
            Some("0.10")
        );
    }

    #[test]
    fn branch_match_requires_dot_boundary() {
        assert_eq!(oid_in_branch(IF_INDEX, ".1.3.6.1.2.1.2.2.1.10.5"), None);
        assert_eq!(oid_in_branch(IF_INDEX, IF_INDEX), None);
        assert_eq!(oid_in_branch(IF_INDEX, ".1.3.6.1.2.1.2.2.1.1."), None);
    }

    #[test]
    fn branch_match_ignores_leading_dot_differences() {
        assert_eq!(oid_in_branch("1.3.6.1.2.1.1.5", ".1.3.6.1.2.1.1.5.0"), Some("0"));
        assert_eq!(oid_in_branch(SYS_NAME, "1.3.6.1.2.1.1.5.0"), Some("0"));
    }

    #[test]
    fn registry_lookup_by_name() {
        assert_eq!(branch_of("dot1qPvid"), Some(DOT1Q_PVID));
        assert_eq!(branch_of("noSuchThing"), None);
    }

    #[test]
    fn registry_names_are_unique() {
        assert_eq!(BY_NAME.len(), REGISTRY.len());
    }

    #[test]
    fn enterprise_from_sys_object_id() {
        assert_eq!(enterprise_of(".1.3.6.1.4.1.9.1.1208"), Some(enterprise::CISCO));
        assert_eq!(enterprise_of(".1.3.6.1.4.1.25506.11.1.136"), Some(enterprise::HH3C));
        assert_eq!(enterprise_of(".1.3.6.1.2.1.1"), None);
    }

    #[test]
    fn suffix_helpers() {
        assert_eq!(suffix_arcs("0.27.44.1.2.3"), Some(vec![0, 27, 44, 1, 2, 3]));
        assert_eq!(suffix_arcs("1.x"), None);
        assert_eq!(last_arc("12345.20"), Some(20));
    }
}
