#![allow(clippy::unwrap_used)]
// Connector tests for the Junos backend, driven by an in-memory `JunosRpc`.

use std::net::Ipv4Addr;
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use pretty_assertions::assert_eq;

use switchyard_api::{
    Error, JunosRpc, RpcArpEntry, RpcChassisModule, RpcInterface, RpcLldpNeighbor, RpcMacEntry,
    RpcPoeInterface, RpcSystem, RpcVlan, RpcVlanMember,
};
use switchyard_core::{Connector, ConnectorConfig, MacAddress, PortMode, Vendor};

// ── Fake device ─────────────────────────────────────────────────────

#[derive(Debug, Default)]
struct Calls {
    loaded: Vec<String>,
    commits: usize,
    rollbacks: usize,
}

#[derive(Default)]
struct FakeJunos {
    fail_check: bool,
    fail_poe: bool,
    calls: Mutex<Calls>,
}

impl FakeJunos {
    fn loaded(&self) -> Vec<String> {
        self.calls.lock().unwrap().loaded.clone()
    }
}

#[async_trait]
impl JunosRpc for FakeJunos {
    async fn system(&self) -> Result<RpcSystem, Error> {
        Ok(RpcSystem {
            hostname: "ex-access-1".into(),
            model: Some("ex4300-48p".into()),
            version: Some("21.4R3".into()),
            uptime_secs: Some(86_400),
            ..RpcSystem::default()
        })
    }

    async fn interfaces(&self) -> Result<Vec<RpcInterface>, Error> {
        Ok(vec![
            RpcInterface {
                name: "ge-0/0/1".into(),
                admin_up: true,
                oper_up: true,
                snmp_index: Some(510),
                ..RpcInterface::default()
            },
            RpcInterface {
                name: "ge-0/0/2".into(),
                admin_up: true,
                snmp_index: Some(511),
                ..RpcInterface::default()
            },
        ])
    }

    async fn vlans(&self) -> Result<Vec<RpcVlan>, Error> {
        Ok(vec![
            RpcVlan {
                name: "users".into(),
                tag: 20,
                members: vec![RpcVlanMember {
                    interface: "ge-0/0/1.0".into(),
                    tagged: false,
                }],
            },
            RpcVlan {
                name: "voice".into(),
                tag: 30,
                members: vec![RpcVlanMember {
                    interface: "ge-0/0/2.0".into(),
                    tagged: false,
                }],
            },
        ])
    }

    async fn poe_interfaces(&self) -> Result<Vec<RpcPoeInterface>, Error> {
        if self.fail_poe {
            return Err(Error::Rpc {
                message: "poe not supported".into(),
            });
        }
        Ok(vec![RpcPoeInterface {
            name: "ge-0/0/2".into(),
            admin_enabled: true,
            oper_status: "ON".into(),
            power_mw: Some(4_200),
            ..RpcPoeInterface::default()
        }])
    }

    async fn lldp_neighbors(&self) -> Result<Vec<RpcLldpNeighbor>, Error> {
        Ok(Vec::new())
    }

    async fn switching_table(&self) -> Result<Vec<RpcMacEntry>, Error> {
        Ok(vec![RpcMacEntry {
            mac: "00:11:22:33:44:55".into(),
            vlan_tag: Some(20),
            interface: "ge-0/0/1.0".into(),
        }])
    }

    async fn arp_table(&self) -> Result<Vec<RpcArpEntry>, Error> {
        Ok(vec![RpcArpEntry {
            mac: "00:11:22:33:44:55".into(),
            ip: Ipv4Addr::new(10, 0, 20, 15),
            interface: "irb.20".into(),
        }])
    }

    async fn chassis_modules(&self) -> Result<Vec<RpcChassisModule>, Error> {
        Ok(vec![RpcChassisModule {
            name: "FPC 0".into(),
            model: Some("EX4300-48P".into()),
            serial: Some("PE3714100000".into()),
            ..RpcChassisModule::default()
        }])
    }

    async fn load_set_commands(&self, commands: &[String]) -> Result<(), Error> {
        self.calls
            .lock()
            .unwrap()
            .loaded
            .extend(commands.iter().cloned());
        Ok(())
    }

    async fn commit_check(&self) -> Result<(), Error> {
        if self.fail_check {
            return Err(Error::CommitCheck {
                message: "vlan members: referenced vlan does not exist".into(),
            });
        }
        Ok(())
    }

    async fn commit(&self, _comment: Option<&str>) -> Result<(), Error> {
        self.calls.lock().unwrap().commits += 1;
        Ok(())
    }

    async fn rollback(&self) -> Result<(), Error> {
        self.calls.lock().unwrap().rollbacks += 1;
        Ok(())
    }
}

async fn connect(rpc: &Arc<FakeJunos>) -> Connector {
    let connector = Connector::open_rpc(rpc.clone(), ConnectorConfig::new("ex-1"))
        .await
        .unwrap();
    connector.get_basic_info(false).await.unwrap();
    connector
}

// ── Tests ───────────────────────────────────────────────────────────

#[tokio::test]
async fn rpc_tables_build_the_same_model() {
    let rpc = Arc::new(FakeJunos::default());
    let connector = connect(&rpc).await;
    let device = connector.device().await;

    assert_eq!(connector.vendor(), Vendor::Juniper);
    assert!(!connector.can_save_config());
    assert_eq!(device.system.name, "ex-access-1");
    assert_eq!(device.interfaces[&510].untagged_vlan, 20);
    assert_eq!(device.interfaces[&510].mode, PortMode::Access);
    assert_eq!(device.interfaces[&511].poe_entry.as_deref(), Some("ge-0/0/2"));
}

#[tokio::test]
async fn poe_failure_only_warns() {
    let rpc = Arc::new(FakeJunos {
        fail_poe: true,
        ..FakeJunos::default()
    });
    let connector = connect(&rpc).await;
    let device = connector.device().await;

    assert!(device.poe.is_empty());
    assert_eq!(device.interfaces.len(), 2);
    assert!(connector.error_state().await.is_error());
}

#[tokio::test]
async fn untagged_change_is_committed() {
    let rpc = Arc::new(FakeJunos::default());
    let connector = connect(&rpc).await;

    connector.set_interface_untagged_vlan(510, 30).await.unwrap();

    assert_eq!(
        rpc.loaded(),
        vec![
            "delete interfaces ge-0/0/1 unit 0 family ethernet-switching vlan members".to_string(),
            "set interfaces ge-0/0/1 unit 0 family ethernet-switching vlan members voice"
                .to_string(),
        ]
    );
    assert_eq!(rpc.calls.lock().unwrap().commits, 1);
    assert_eq!(connector.device().await.interfaces[&510].untagged_vlan, 30);
}

#[tokio::test]
async fn failed_commit_check_rolls_back() {
    let rpc = Arc::new(FakeJunos {
        fail_check: true,
        ..FakeJunos::default()
    });
    let connector = connect(&rpc).await;
    let before = connector.device().await;

    let err = connector.set_interface_admin_status(511, false).await.unwrap_err();

    assert!(err.is_rejected());
    let calls = rpc.calls.lock().unwrap();
    assert_eq!(calls.commits, 0);
    assert_eq!(calls.rollbacks, 1);
    drop(calls);
    assert_eq!(connector.device().await, before);
}

#[tokio::test]
async fn save_is_not_offered() {
    let rpc = Arc::new(FakeJunos::default());
    let connector = connect(&rpc).await;

    let err = connector.save_running_config().await.unwrap_err();

    assert_eq!(err.kind(), "unsupported");
    assert!(rpc.loaded().is_empty());
}

#[tokio::test]
async fn client_data_joins_arp_onto_learned_macs() {
    let rpc = Arc::new(FakeJunos::default());
    let connector = connect(&rpc).await;

    connector.get_client_data().await.unwrap();

    let device = connector.device().await;
    let entry = &device.interfaces[&510].ethernet[&MacAddress::new("00:11:22:33:44:55")];
    assert_eq!(entry.vlan, Some(20));
    assert_eq!(entry.ipv4, Some(Ipv4Addr::new(10, 0, 20, 15)));
}

#[tokio::test]
async fn hardware_is_read_once() {
    let rpc = Arc::new(FakeJunos::default());
    let connector = connect(&rpc).await;

    connector.get_hardware_details().await.unwrap();
    connector.get_hardware_details().await.unwrap();

    let device = connector.device().await;
    assert!(device.hardware_loaded);
    assert_eq!(device.stack.len(), 1);
    assert_eq!(device.stack[&1].member_id, Some(0));
}
