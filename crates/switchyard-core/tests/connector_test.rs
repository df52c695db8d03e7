#![allow(clippy::unwrap_used)]
// End-to-end connector tests against walk dumps served by `ReplayTransport`.

use std::sync::Arc;

use pretty_assertions::assert_eq;
use tokio_test::{assert_err, assert_ok};

use switchyard_api::{ReplayTransport, VarBind, WireOp, WireValue};
use switchyard_core::oids::{self, instance};
use switchyard_core::{
    AdminStatus, Command, CommandResult, Connector, ConnectorConfig, MemoryStore, PortMode, Vendor,
};

// ── Dumps ───────────────────────────────────────────────────────────

/// Two access ports on VLAN 10, PoE on port 2.
const GENERIC_DUMP: &str = r#"
.1.3.6.1.2.1.1.1.0 = STRING: "Lab Switch 24G"
.1.3.6.1.2.1.1.2.0 = OID: .1.3.6.1.4.1.8072.3.2.10
.1.3.6.1.2.1.1.3.0 = Timeticks: (360000) 1:00:00.00
.1.3.6.1.2.1.1.5.0 = STRING: "lab-sw"
.1.3.6.1.2.1.2.2.1.1.1 = INTEGER: 1
.1.3.6.1.2.1.2.2.1.1.2 = INTEGER: 2
.1.3.6.1.2.1.2.2.1.2.1 = STRING: "GigabitEthernet1/1"
.1.3.6.1.2.1.2.2.1.2.2 = STRING: "GigabitEthernet1/2"
.1.3.6.1.2.1.2.2.1.3.1 = INTEGER: ethernetCsmacd(6)
.1.3.6.1.2.1.2.2.1.3.2 = INTEGER: ethernetCsmacd(6)
.1.3.6.1.2.1.2.2.1.7.1 = INTEGER: up(1)
.1.3.6.1.2.1.2.2.1.7.2 = INTEGER: up(1)
.1.3.6.1.2.1.2.2.1.8.1 = INTEGER: up(1)
.1.3.6.1.2.1.2.2.1.8.2 = INTEGER: down(2)
.1.3.6.1.2.1.31.1.1.1.18.1 = STRING: "uplink"
.1.3.6.1.2.1.31.1.1.1.18.2 = STRING: "printer"
.1.3.6.1.2.1.17.7.1.1.1.0 = INTEGER: 1
.1.3.6.1.2.1.17.7.1.4.3.1.1.1 = STRING: "default"
.1.3.6.1.2.1.17.7.1.4.3.1.1.10 = STRING: "data"
.1.3.6.1.2.1.17.7.1.4.3.1.1.20 = STRING: "voice"
.1.3.6.1.2.1.17.7.1.4.3.1.2.1 = Hex-STRING: 00
.1.3.6.1.2.1.17.7.1.4.3.1.2.10 = Hex-STRING: C0
.1.3.6.1.2.1.17.7.1.4.3.1.2.20 = Hex-STRING: 00
.1.3.6.1.2.1.17.7.1.4.5.1.1.1 = Gauge32: 10
.1.3.6.1.2.1.17.7.1.4.5.1.1.2 = Gauge32: 10
.1.3.6.1.2.1.105.1.1.1.3.1.2 = INTEGER: true(1)
.1.3.6.1.2.1.105.1.1.1.6.1.2 = INTEGER: deliveringPower(3)
.1.3.6.1.2.1.105.1.3.1.1.2.1 = Gauge32: 370
.1.3.6.1.2.1.105.1.3.1.1.3.1 = INTEGER: on(1)
"#;

/// Catalyst with one trunk (native 1) and one access port.
const CISCO_DUMP: &str = r#"
.1.3.6.1.2.1.1.2.0 = OID: .1.3.6.1.4.1.9.1.1208
.1.3.6.1.2.1.1.5.0 = STRING: "core-1"
.1.3.6.1.2.1.2.2.1.1.10101 = INTEGER: 10101
.1.3.6.1.2.1.2.2.1.1.10102 = INTEGER: 10102
.1.3.6.1.2.1.2.2.1.3.10101 = INTEGER: 6
.1.3.6.1.2.1.2.2.1.3.10102 = INTEGER: 6
.1.3.6.1.2.1.31.1.1.1.1.10101 = STRING: "Gi1/0/1"
.1.3.6.1.2.1.31.1.1.1.1.10102 = STRING: "Gi1/0/2"
.1.3.6.1.4.1.9.9.46.1.3.1.1.2.1.1 = INTEGER: operational(1)
.1.3.6.1.4.1.9.9.46.1.3.1.1.2.1.30 = INTEGER: operational(1)
.1.3.6.1.4.1.9.9.46.1.3.1.1.3.1.1 = INTEGER: ethernet(1)
.1.3.6.1.4.1.9.9.46.1.3.1.1.3.1.30 = INTEGER: ethernet(1)
.1.3.6.1.4.1.9.9.46.1.3.1.1.4.1.1 = STRING: "default"
.1.3.6.1.4.1.9.9.46.1.3.1.1.4.1.30 = STRING: "servers"
.1.3.6.1.4.1.9.9.68.1.2.2.1.2.10102 = INTEGER: 1
.1.3.6.1.4.1.9.9.46.1.6.1.1.5.10101 = INTEGER: 1
.1.3.6.1.4.1.9.9.46.1.6.1.1.14.10101 = INTEGER: trunking(1)
.1.3.6.1.4.1.9.9.46.1.6.1.1.14.10102 = INTEGER: notTrunking(2)
"#;

const COMWARE_DUMP: &str = r#"
.1.3.6.1.2.1.1.2.0 = OID: .1.3.6.1.4.1.25506.11.1.1
.1.3.6.1.2.1.1.5.0 = STRING: "irf-stack"
.1.3.6.1.2.1.2.2.1.1.1 = INTEGER: 1
.1.3.6.1.2.1.2.2.1.3.1 = INTEGER: 6
.1.3.6.1.2.1.31.1.1.1.1.1 = STRING: "GigabitEthernet1/0/1"
.1.3.6.1.4.1.25506.2.4.1.2.4.1.9.1 = INTEGER: active(1)
"#;

fn replay(dump: &str) -> Arc<ReplayTransport> {
    Arc::new(ReplayTransport::from_dump(dump).unwrap())
}

async fn connect(transport: &Arc<ReplayTransport>, key: &str) -> Connector {
    let connector = Connector::open(transport.clone(), ConnectorConfig::new(key))
        .await
        .unwrap();
    connector.get_basic_info(false).await.unwrap();
    transport.clear_operations();
    connector
}

// ── Reads ───────────────────────────────────────────────────────────

#[tokio::test]
async fn generic_basic_info_builds_the_model() {
    let transport = replay(GENERIC_DUMP);
    let connector = connect(&transport, "lab").await;
    let device = connector.device().await;

    assert_eq!(connector.vendor(), Vendor::Generic);
    assert_eq!(device.system.name, "lab-sw");
    assert_eq!(device.interfaces.len(), 2);
    assert_eq!(device.vlans.len(), 3);

    let port = &device.interfaces[&2];
    assert_eq!(port.untagged_vlan, 10);
    assert!(!port.is_tagged);
    assert_eq!(port.description, "printer");
    assert_eq!(port.poe_entry.as_deref(), Some("1.2"));
    assert!(device.poe.ports["1.2"].admin_enabled);
    assert!(!connector.error_state().await.is_error());
}

#[tokio::test]
async fn poe_walk_timeout_keeps_the_rest_of_the_model() {
    let transport = replay(GENERIC_DUMP);
    transport.fail_walks_under(oids::PETH_PSE_PORT_DETECTION_STATUS);
    let connector = Connector::open(transport.clone(), ConnectorConfig::new("lab"))
        .await
        .unwrap();

    connector.get_basic_info(false).await.unwrap();

    let device = connector.device().await;
    assert_eq!(device.interfaces.len(), 2);
    assert_eq!(device.vlans.len(), 3);
    assert!(device.poe.is_empty());
    assert_eq!(device.interfaces[&2].poe_entry, None);
    assert!(device.warnings.iter().any(|w| w.starts_with("poe data unavailable")));

    let errors = connector.error_state().await;
    assert!(errors.is_error());
    assert!(errors.description.contains("poe"));
}

#[tokio::test]
async fn cisco_trunk_native_comes_from_vtp() {
    let transport = replay(CISCO_DUMP);
    let connector = connect(&transport, "core").await;
    let device = connector.device().await;

    assert_eq!(connector.vendor(), Vendor::CiscoVtp);
    assert!(!connector.strategy().qbridge);
    assert_eq!(device.interfaces[&10101].mode, PortMode::Trunk);
    assert_eq!(device.interfaces[&10101].untagged_vlan, 1);
    assert_eq!(device.interfaces[&10102].mode, PortMode::Access);
    assert_eq!(device.vlans[&30].name, "servers");
}

// ── Mutations ───────────────────────────────────────────────────────

#[tokio::test]
async fn generic_untagged_change_rewrites_pvid_then_old_egress() {
    let transport = replay(GENERIC_DUMP);
    let connector = connect(&transport, "lab").await;

    connector.set_interface_untagged_vlan(1, 20).await.unwrap();

    let egress = instance(oids::DOT1Q_VLAN_STATIC_EGRESS_PORTS, 10);
    assert_eq!(
        transport.operations(),
        vec![
            WireOp::Set {
                varbinds: vec![VarBind::new(
                    instance(oids::DOT1Q_PVID, 1),
                    WireValue::Gauge32(20),
                )],
            },
            WireOp::Get {
                oid: egress.clone()
            },
            WireOp::Set {
                varbinds: vec![VarBind::new(egress, WireValue::OctetString(vec![0x40]))],
            },
        ]
    );
    assert_eq!(connector.device().await.interfaces[&1].untagged_vlan, 20);
}

#[tokio::test]
async fn undefined_vlan_is_rejected_without_wire_calls() {
    let transport = replay(GENERIC_DUMP);
    let connector = connect(&transport, "lab").await;

    let err = connector
        .set_interface_untagged_vlan(1, 99)
        .await
        .unwrap_err();

    assert_eq!(err.kind(), "validation");
    assert!(transport.operations().is_empty());
    assert_eq!(connector.device().await.interfaces[&1].untagged_vlan, 10);
}

#[tokio::test]
async fn unknown_interface_is_rejected() {
    let transport = replay(GENERIC_DUMP);
    let connector = connect(&transport, "lab").await;

    let err = connector.set_interface_admin_status(7, false).await.unwrap_err();
    assert_eq!(err.kind(), "validation");
    assert!(transport.operations().is_empty());
}

#[tokio::test]
async fn poe_toggle_writes_the_pse_port() {
    let transport = replay(GENERIC_DUMP);
    let connector = connect(&transport, "lab").await;

    assert_ok!(connector.set_interface_poe_status(2, false).await);

    let sets = transport.set_requests();
    assert_eq!(
        sets,
        vec![vec![VarBind::new(
            instance(oids::PETH_PSE_PORT_ADMIN_ENABLE, "1.2"),
            WireValue::Integer(2),
        )]]
    );
    assert!(!connector.device().await.poe.ports["1.2"].admin_enabled);

    let err = assert_err!(connector.set_interface_poe_status(1, true).await);
    assert_eq!(err.kind(), "validation");
}

#[tokio::test]
async fn rejected_write_leaves_the_model_untouched() {
    let transport = replay(GENERIC_DUMP);
    let connector = connect(&transport, "lab").await;
    transport.reject_sets_under(oids::IF_ALIAS, None);
    let before = connector.device().await;

    let err = connector
        .set_interface_description(2, "label printer")
        .await
        .unwrap_err();

    assert!(err.is_rejected());
    assert_eq!(connector.device().await, before);
    let errors = connector.error_state().await;
    assert!(errors.is_error());
    assert_eq!(errors.description, "set description failed (rejected)");
}

#[tokio::test]
async fn failed_egress_update_restores_pvid_and_model() {
    let transport = replay(GENERIC_DUMP);
    let connector = connect(&transport, "lab").await;
    transport.reject_sets_under(oids::DOT1Q_VLAN_STATIC_EGRESS_PORTS, None);

    let err = connector
        .set_interface_untagged_vlan(1, 20)
        .await
        .unwrap_err();

    assert!(err.is_rejected());
    assert_eq!(
        transport.value(&instance(oids::DOT1Q_PVID, 1)),
        Some(WireValue::Gauge32(10))
    );
    assert_eq!(connector.device().await.interfaces[&1].untagged_vlan, 10);
}

#[tokio::test]
async fn admin_status_goes_through_execute() {
    let transport = replay(GENERIC_DUMP);
    let connector = connect(&transport, "lab").await;

    let result = connector
        .execute(Command::SetAdminStatus {
            if_index: 2,
            up: false,
        })
        .await
        .unwrap();

    assert_eq!(result, CommandResult::Ok);
    assert_eq!(
        connector.device().await.interfaces[&2].admin_status,
        AdminStatus::Down
    );
}

#[tokio::test]
async fn cisco_trunk_native_change_sets_only_the_native_oid() {
    let transport = replay(CISCO_DUMP);
    let connector = connect(&transport, "core").await;

    connector
        .set_interface_untagged_vlan(10101, 30)
        .await
        .unwrap();

    assert_eq!(
        transport.set_requests(),
        vec![vec![VarBind::new(
            instance(oids::VLAN_TRUNK_PORT_NATIVE_VLAN, 10101),
            WireValue::Integer(30),
        )]]
    );
    assert_eq!(connector.device().await.interfaces[&10101].untagged_vlan, 30);
}

#[tokio::test]
async fn comware_save_uses_a_free_operate_row() {
    let transport = replay(COMWARE_DUMP);
    let connector = connect(&transport, "irf").await;
    assert!(connector.can_save_config());

    let result = connector.execute(Command::SaveRunningConfig).await.unwrap();

    assert_eq!(result, CommandResult::Saved);
    assert!(transport.operations().contains(&WireOp::Walk {
        root: oids::HH3C_CFG_OPERATE_ROW_STATUS.to_string()
    }));
    assert_eq!(
        transport.set_requests(),
        vec![vec![
            VarBind::new(
                instance(oids::HH3C_CFG_OPERATE_TYPE, 2),
                WireValue::Integer(1),
            ),
            VarBind::new(
                instance(oids::HH3C_CFG_OPERATE_ROW_STATUS, 2),
                WireValue::Integer(4),
            ),
        ]]
    );
}

// ── Snapshot cache ──────────────────────────────────────────────────

#[tokio::test]
async fn snapshot_survives_a_new_session() {
    let transport = replay(GENERIC_DUMP);
    let store = Arc::new(MemoryStore::new());

    let first = Connector::open(transport.clone(), ConnectorConfig::new("lab"))
        .await
        .unwrap();
    first.attach_store(store.clone()).await;
    first.get_basic_info(false).await.unwrap();
    first.set_interface_description(1, "core uplink").await.unwrap();

    let second = Connector::open(transport.clone(), ConnectorConfig::new("lab"))
        .await
        .unwrap();
    second.attach_store(store).await;
    transport.clear_operations();
    second.get_basic_info(false).await.unwrap();

    assert!(transport.operations().is_empty());
    assert_eq!(
        second.device().await.interfaces[&1].description,
        "core uplink"
    );

    second.get_basic_info(true).await.unwrap();
    assert!(!transport.operations().is_empty());
}

#[tokio::test]
async fn snapshot_from_before_a_qbridge_change_is_refused() {
    let transport = replay(GENERIC_DUMP);
    let connector = connect(&transport, "lab").await;
    let json = connector.serialize().await.unwrap();

    let dump = GENERIC_DUMP.replace(".1.3.6.1.2.1.17.7.1.1.1.0 = INTEGER: 1\n", "");
    let without_qbridge = replay(&dump);
    let reopened = Connector::open(without_qbridge, ConnectorConfig::new("lab"))
        .await
        .unwrap();
    assert!(!reopened.strategy().qbridge);

    let err = assert_err!(reopened.deserialize(&json).await);
    assert_eq!(err.kind(), "cache");
}
