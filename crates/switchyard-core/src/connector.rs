// ── Connector ──
//
// Facade over one switch. Owns the device model, the vendor strategy
// picked at open, and the operation-level error state. Every public
// operation takes the session lock for its whole duration, so compound
// read-modify-write mutations never interleave on one device.

use std::sync::Arc;

use switchyard_api::{JunosRpc, SnmpTransport};
use tokio::sync::Mutex;
use tracing::{debug, info, warn};

use crate::cache::{DeviceIdentity, Snapshot, SnapshotStore, load_snapshot};
use crate::command::{Command, CommandResult};
use crate::config::ConnectorConfig;
use crate::dispatch::{Dispatcher, joins};
use crate::error::CoreError;
use crate::model::{AdminStatus, Device, ErrorState, Vendor, Vlan, is_valid_vlan_id};
use crate::oids::{self, instance};
use crate::vendor::session::SnmpSession;
use crate::vendor::{
    SaveConfig, Strategy, VlanCreate, VlanMembership, cisco_sb, cisco_vtp, comware,
    generic, juniper, stages,
};

/// Longest `ifAlias` / interface description accepted, in bytes.
pub const MAX_DESCRIPTION_LEN: usize = 255;

/// `sysObjectID` recorded for RPC-managed Junos devices.
const JUNIPER_OBJECT_ID: &str = ".1.3.6.1.4.1.2636";

// ── Session state ────────────────────────────────────────────────────

enum Backend {
    Snmp(SnmpSession),
    Junos(Arc<dyn JunosRpc>),
}

/// Mutable state guarded by the session lock.
struct Session {
    device: Device,
    errors: ErrorState,
    basic_loaded: bool,
    store: Option<Arc<dyn SnapshotStore>>,
}

struct ConnectorInner {
    config: ConnectorConfig,
    backend: Backend,
    strategy: Strategy,
    dispatcher: Dispatcher,
    identity: DeviceIdentity,
    session: Mutex<Session>,
}

/// Handle to one managed switch. Cheap to clone; clones share the
/// session.
#[derive(Clone)]
pub struct Connector {
    inner: Arc<ConnectorInner>,
}

impl Connector {
    // ── Opening ──────────────────────────────────────────────────────

    /// Read the system group, pick the vendor dialect and probe for
    /// Q-Bridge support.
    pub async fn open(
        transport: Arc<dyn SnmpTransport>,
        config: ConnectorConfig,
    ) -> Result<Self, CoreError> {
        let snmp = SnmpSession::new(transport, config.max_repetitions);

        let mut device = Device::default();
        let rows = snmp.walk(oids::SYSTEM).await?;
        Dispatcher::generic().parse_all(&mut device, &rows);
        if device.system.object_id.is_empty() {
            return Err(CoreError::protocol("device did not report sysObjectID"));
        }

        let vendor = config
            .vendor_override
            .unwrap_or_else(|| Vendor::detect(&device.system.object_id));
        if vendor == Vendor::Juniper {
            return Err(CoreError::validation(
                "Junos devices are managed over RPC, not SNMP",
            ));
        }
        device.vendor = vendor;

        let qbridge = snmp
            .get_opt(&instance(oids::DOT1Q_VLAN_VERSION_NUMBER, 0))
            .await?
            .is_some();
        let strategy = Strategy::for_vendor(vendor, qbridge);

        info!(
            device = %device.system.name,
            %vendor,
            qbridge,
            "session opened"
        );
        Ok(Self::assemble(config, Backend::Snmp(snmp), strategy, device))
    }

    /// Open a Junos device over its RPC channel.
    pub async fn open_rpc(
        rpc: Arc<dyn JunosRpc>,
        config: ConnectorConfig,
    ) -> Result<Self, CoreError> {
        let mut device = Device::new(Vendor::Juniper);
        juniper::read_system(rpc.as_ref(), &mut device).await?;
        device.system.object_id = JUNIPER_OBJECT_ID.to_string();

        let strategy = Strategy::for_vendor(Vendor::Juniper, false);
        info!(device = %device.system.name, "junos session opened");
        Ok(Self::assemble(config, Backend::Junos(rpc), strategy, device))
    }

    fn assemble(
        config: ConnectorConfig,
        backend: Backend,
        strategy: Strategy,
        device: Device,
    ) -> Self {
        let identity = DeviceIdentity {
            device_key: config.device_key.clone(),
            object_id: device.system.object_id.clone(),
            name: device.system.name.clone(),
        };
        Self {
            inner: Arc::new(ConnectorInner {
                dispatcher: strategy.dispatcher(),
                config,
                backend,
                strategy,
                identity,
                session: Mutex::new(Session {
                    device,
                    errors: ErrorState::default(),
                    basic_loaded: false,
                    store: None,
                }),
            }),
        }
    }

    // ── Accessors ────────────────────────────────────────────────────

    /// Use `store` for snapshots from now on.
    pub async fn attach_store(&self, store: Arc<dyn SnapshotStore>) {
        self.inner.session.lock().await.store = Some(store);
    }

    pub fn config(&self) -> &ConnectorConfig {
        &self.inner.config
    }

    pub fn strategy(&self) -> Strategy {
        self.inner.strategy
    }

    pub fn vendor(&self) -> Vendor {
        self.inner.strategy.vendor
    }

    pub fn identity(&self) -> &DeviceIdentity {
        &self.inner.identity
    }

    pub fn can_save_config(&self) -> bool {
        self.inner.strategy.can_save_config()
    }

    /// Snapshot of the current model.
    pub async fn device(&self) -> Device {
        self.inner.session.lock().await.device.clone()
    }

    /// Outcome of the most recent operation.
    pub async fn error_state(&self) -> ErrorState {
        self.inner.session.lock().await.errors.clone()
    }

    // ── Reads ────────────────────────────────────────────────────────

    /// Interfaces, VLANs, PoE and LACP. Served from the snapshot store
    /// unless `force` is set.
    pub async fn get_basic_info(&self, force: bool) -> Result<(), CoreError> {
        let mut session = self.inner.session.lock().await;
        session.errors.clear();
        let result = self.load_basic(&mut session, force).await;
        if let Err(err) = &result {
            session.errors.record("get basic info", err);
        }
        result
    }

    /// Learned addresses, ARP and LLDP. Never cached.
    pub async fn get_client_data(&self) -> Result<(), CoreError> {
        let mut session = self.inner.session.lock().await;
        session.errors.clear();
        let result = self.load_clients(&mut session).await;
        if let Err(err) = &result {
            session.errors.record("get client data", err);
        }
        result
    }

    /// Entity and stack inventory. Read once per session.
    pub async fn get_hardware_details(&self) -> Result<(), CoreError> {
        let mut session = self.inner.session.lock().await;
        session.errors.clear();
        if session.device.hardware_loaded {
            debug!("hardware details already loaded");
            return Ok(());
        }
        let result = self.load_hardware(&mut session).await;
        if let Err(err) = &result {
            session.errors.record("get hardware details", err);
        }
        result
    }

    async fn ensure_basic(&self, session: &mut Session) -> Result<(), CoreError> {
        if session.basic_loaded {
            return Ok(());
        }
        self.load_basic(session, false).await
    }

    async fn load_basic(&self, session: &mut Session, force: bool) -> Result<(), CoreError> {
        if !force && self.restore_cached(session) {
            return Ok(());
        }

        let mut device = Device::new(self.inner.strategy.vendor);
        device.system = session.device.system.clone();
        device.stack = session.device.stack.clone();
        device.hardware_loaded = session.device.hardware_loaded;

        match &self.inner.backend {
            Backend::Snmp(snmp) => {
                let plan = self.inner.strategy.basic_stages();
                stages::run(
                    snmp,
                    &self.inner.dispatcher,
                    &mut device,
                    &plan,
                    &mut session.errors,
                )
                .await?;
                self.inner
                    .strategy
                    .finalize_basic(&mut device, &self.inner.config);
            }
            Backend::Junos(rpc) => {
                juniper::read_basic(
                    rpc.as_ref(),
                    &mut device,
                    &self.inner.config.hide_interfaces,
                    &mut session.errors,
                )
                .await?;
            }
        }

        debug!(
            interfaces = device.interfaces.len(),
            vlans = device.vlans.len(),
            "basic info loaded"
        );
        session.device = device;
        session.basic_loaded = true;
        self.store_snapshot(session);
        Ok(())
    }

    async fn load_clients(&self, session: &mut Session) -> Result<(), CoreError> {
        self.ensure_basic(session).await?;
        match &self.inner.backend {
            Backend::Snmp(snmp) => {
                let mut device = session.device.clone();
                device.clear_client_data();
                let plan = self.inner.strategy.client_stages();
                stages::run(
                    snmp,
                    &self.inner.dispatcher,
                    &mut device,
                    &plan,
                    &mut session.errors,
                )
                .await?;
                joins::attach_arp(&mut device);
                session.device = device;
            }
            Backend::Junos(rpc) => {
                juniper::read_client_data(rpc.as_ref(), &mut session.device, &mut session.errors)
                    .await;
            }
        }
        Ok(())
    }

    async fn load_hardware(&self, session: &mut Session) -> Result<(), CoreError> {
        let mut device = session.device.clone();
        match &self.inner.backend {
            Backend::Snmp(snmp) => {
                device.stack.clear();
                let plan = self.inner.strategy.hardware_stages();
                stages::run(
                    snmp,
                    &self.inner.dispatcher,
                    &mut device,
                    &plan,
                    &mut session.errors,
                )
                .await?;
                device.hardware_loaded = true;
            }
            Backend::Junos(rpc) => juniper::read_hardware(rpc.as_ref(), &mut device).await?,
        }
        debug!(members = device.stack.len(), "hardware details loaded");
        session.device = device;
        self.store_snapshot(session);
        Ok(())
    }

    // ── Snapshot cache ───────────────────────────────────────────────

    /// Replace the model with a cached snapshot, keeping the live system
    /// group. Returns whether a snapshot was used.
    fn restore_cached(&self, session: &mut Session) -> bool {
        let Some(store) = session.store.as_deref() else {
            return false;
        };
        let inner = &self.inner;
        let Some(snapshot) = load_snapshot(store, &inner.identity, &inner.strategy) else {
            return false;
        };
        debug!(taken_at = %snapshot.taken_at, "basic info served from snapshot");
        let system = session.device.system.clone();
        session.device = snapshot.into_device();
        session.device.system = system;
        session.basic_loaded = true;
        true
    }

    fn store_snapshot(&self, session: &Session) {
        let Some(store) = session.store.as_deref() else {
            return;
        };
        if !session.basic_loaded {
            return;
        }
        let snapshot = self.capture(&session.device);
        match snapshot.to_json() {
            Ok(json) => store.store(&self.inner.identity.cache_key(), json),
            Err(err) => warn!(%err, "snapshot not stored"),
        }
    }

    fn capture(&self, device: &Device) -> Snapshot {
        Snapshot::capture(
            self.inner.identity.clone(),
            self.inner.strategy.qbridge,
            device,
        )
    }

    /// Serialize the cacheable part of the model.
    pub async fn serialize(&self) -> Result<String, CoreError> {
        let session = self.inner.session.lock().await;
        if !session.basic_loaded {
            return Err(CoreError::Cache {
                message: "basic info has not been loaded".into(),
            });
        }
        self.capture(&session.device).to_json()
    }

    /// Restore a model produced by `serialize` for this same device.
    pub async fn deserialize(&self, json: &str) -> Result<(), CoreError> {
        let snapshot = Snapshot::from_json(json)?;
        snapshot.check(&self.inner.identity, &self.inner.strategy)?;
        let mut session = self.inner.session.lock().await;
        let system = session.device.system.clone();
        session.device = snapshot.into_device();
        session.device.system = system;
        session.basic_loaded = true;
        Ok(())
    }

    // ── Mutations ────────────────────────────────────────────────────

    pub async fn set_interface_admin_status(
        &self,
        if_index: u32,
        up: bool,
    ) -> Result<(), CoreError> {
        self.execute(Command::SetAdminStatus { if_index, up })
            .await
            .map(|_| ())
    }

    pub async fn set_interface_untagged_vlan(
        &self,
        if_index: u32,
        vlan: u16,
    ) -> Result<(), CoreError> {
        self.execute(Command::SetUntaggedVlan { if_index, vlan })
            .await
            .map(|_| ())
    }

    pub async fn set_interface_poe_status(
        &self,
        if_index: u32,
        enabled: bool,
    ) -> Result<(), CoreError> {
        self.execute(Command::SetPoeStatus { if_index, enabled })
            .await
            .map(|_| ())
    }

    pub async fn set_interface_description(
        &self,
        if_index: u32,
        description: impl Into<String>,
    ) -> Result<(), CoreError> {
        self.execute(Command::SetDescription {
            if_index,
            description: description.into(),
        })
        .await
        .map(|_| ())
    }

    pub async fn create_vlan(&self, vlan: u16, name: impl Into<String>) -> Result<(), CoreError> {
        self.execute(Command::CreateVlan {
            vlan,
            name: name.into(),
        })
        .await
        .map(|_| ())
    }

    pub async fn save_running_config(&self) -> Result<(), CoreError> {
        self.execute(Command::SaveRunningConfig).await.map(|_| ())
    }

    /// Validate, apply, and record a mutation.
    ///
    /// On failure the model is left exactly as it was and the error is
    /// also recorded in the connector's `ErrorState`.
    pub async fn execute(&self, command: Command) -> Result<CommandResult, CoreError> {
        let mut session = self.inner.session.lock().await;
        session.errors.clear();
        let operation = command.operation();

        let result = self.run_command(&mut session, &command).await;
        match &result {
            Ok(_) => info!(
                device = %self.inner.identity.name,
                operation,
                if_index = ?command.if_index(),
                "change applied"
            ),
            Err(err) => {
                warn!(operation, %err, "change failed");
                session.errors.record(operation, err);
            }
        }
        result
    }

    async fn run_command(
        &self,
        session: &mut Session,
        command: &Command,
    ) -> Result<CommandResult, CoreError> {
        if self.inner.config.read_only {
            return Err(CoreError::validation("device is configured read-only"));
        }
        self.ensure_basic(session).await?;
        self.validate(&session.device, command)?;

        let before = session.device.clone();
        let applied = match &self.inner.backend {
            Backend::Snmp(snmp) => self.apply_snmp(snmp, &mut session.device, command).await,
            Backend::Junos(rpc) => apply_junos(rpc.as_ref(), &session.device, command).await,
        };
        if let Err(err) = applied {
            session.device = before;
            return Err(err);
        }

        record(&mut session.device, command);
        self.store_snapshot(session);
        Ok(match command {
            Command::SaveRunningConfig => CommandResult::Saved,
            _ => CommandResult::Ok,
        })
    }

    /// Reject a command before any wire call.
    fn validate(&self, device: &Device, command: &Command) -> Result<(), CoreError> {
        let strategy = self.inner.strategy;

        let iface = match command.if_index() {
            Some(if_index) => {
                let iface = device.interface(if_index).ok_or_else(|| {
                    CoreError::validation(format!("unknown interface {if_index}"))
                })?;
                if !iface.manageable {
                    return Err(CoreError::validation(format!(
                        "interface {} is not manageable: {}",
                        iface.name,
                        iface.unmanage_reason.as_deref().unwrap_or("unknown reason")
                    )));
                }
                Some(iface)
            }
            None => None,
        };

        match command {
            Command::SetUntaggedVlan { vlan, .. } => {
                check_vlan_id(*vlan)?;
                if strategy.vlan_membership == VlanMembership::Unsupported {
                    return Err(CoreError::unsupported("untagged VLAN change", strategy.vendor));
                }
                if !device.vlans.contains_key(vlan) {
                    return Err(CoreError::validation(format!(
                        "VLAN {vlan} is not defined on the device"
                    )));
                }
            }
            Command::SetPoeStatus { .. } => {
                let has_port = iface
                    .and_then(|i| i.poe_entry.as_ref())
                    .is_some_and(|entry| device.poe.ports.contains_key(entry));
                if !has_port {
                    return Err(CoreError::validation(format!(
                        "interface {} has no PoE port",
                        iface.map_or("", |i| i.name.as_str())
                    )));
                }
            }
            Command::SetDescription { description, .. } => {
                if description.len() > MAX_DESCRIPTION_LEN {
                    return Err(CoreError::validation(format!(
                        "description is {} bytes, the limit is {MAX_DESCRIPTION_LEN}",
                        description.len()
                    )));
                }
            }
            Command::CreateVlan { vlan, .. } => {
                check_vlan_id(*vlan)?;
                if strategy.vlan_create == VlanCreate::Unsupported {
                    return Err(CoreError::unsupported("VLAN creation", strategy.vendor));
                }
                if device.vlans.contains_key(vlan) {
                    return Err(CoreError::validation(format!("VLAN {vlan} already exists")));
                }
            }
            Command::SaveRunningConfig => {
                if !strategy.can_save_config() {
                    return Err(CoreError::unsupported(
                        "saving the running configuration",
                        strategy.vendor,
                    ));
                }
            }
            Command::SetAdminStatus { .. } => {}
        }
        Ok(())
    }

    async fn apply_snmp(
        &self,
        s: &SnmpSession,
        device: &mut Device,
        command: &Command,
    ) -> Result<(), CoreError> {
        let strategy = self.inner.strategy;
        match command {
            Command::SetAdminStatus { if_index, up } => {
                generic::set_admin_status(s, *if_index, *up).await
            }
            Command::SetDescription {
                if_index,
                description,
            } => generic::set_description(s, *if_index, description).await,
            Command::SetPoeStatus { if_index, enabled } => {
                let entry = poe_entry(device, *if_index)?;
                generic::set_poe(s, &entry, *enabled).await
            }
            Command::SetUntaggedVlan { if_index, vlan } => match strategy.vlan_membership {
                VlanMembership::QBridge => {
                    generic::set_untagged_vlan(s, device, *if_index, *vlan).await
                }
                VlanMembership::CiscoVtp => {
                    cisco_vtp::set_untagged_vlan(s, device, *if_index, *vlan).await
                }
                VlanMembership::CiscoSb => {
                    cisco_sb::set_untagged_vlan(s, device, *if_index, *vlan).await
                }
                VlanMembership::Comware => {
                    comware::set_untagged_vlan(s, &self.inner.dispatcher, device, *if_index, *vlan)
                        .await
                }
                VlanMembership::Junos | VlanMembership::Unsupported => Err(
                    CoreError::unsupported("untagged VLAN change", strategy.vendor),
                ),
            },
            Command::CreateVlan { vlan, name } => {
                let name = vlan_name(*vlan, name);
                match strategy.vlan_create {
                    VlanCreate::QBridge => generic::create_vlan(s, *vlan, &name).await,
                    VlanCreate::VtpEditBuffer => cisco_vtp::create_vlan(s, *vlan, &name).await,
                    VlanCreate::Junos | VlanCreate::Unsupported => {
                        Err(CoreError::unsupported("VLAN creation", strategy.vendor))
                    }
                }
            }
            Command::SaveRunningConfig => match strategy.save {
                SaveConfig::CiscoWriteMem => cisco_vtp::save_config(s, &self.inner.config).await,
                SaveConfig::CiscoSbCopy => cisco_sb::save_config(s, &self.inner.config).await,
                SaveConfig::ComwareCfgOperate => comware::save_config(s).await,
                SaveConfig::None => Err(CoreError::unsupported(
                    "saving the running configuration",
                    strategy.vendor,
                )),
            },
        }
    }
}

// ── Helpers ──────────────────────────────────────────────────────────

fn check_vlan_id(vlan: u16) -> Result<(), CoreError> {
    if is_valid_vlan_id(u32::from(vlan)) {
        Ok(())
    } else {
        Err(CoreError::validation(format!(
            "VLAN id {vlan} is outside 1-4094"
        )))
    }
}

fn vlan_name(vlan: u16, name: &str) -> String {
    if name.trim().is_empty() {
        Vlan::default_name(vlan)
    } else {
        name.to_string()
    }
}

fn poe_entry(device: &Device, if_index: u32) -> Result<String, CoreError> {
    device
        .interface(if_index)
        .and_then(|i| i.poe_entry.clone())
        .ok_or_else(|| CoreError::validation(format!("interface {if_index} has no PoE port")))
}

fn interface_name(device: &Device, if_index: u32) -> Result<&str, CoreError> {
    device
        .interface(if_index)
        .map(|i| i.name.as_str())
        .ok_or_else(|| CoreError::validation(format!("unknown interface {if_index}")))
}

/// Translate a command into Junos `set` statements and commit them.
async fn apply_junos(
    rpc: &dyn JunosRpc,
    device: &Device,
    command: &Command,
) -> Result<(), CoreError> {
    let commands = match command {
        Command::SetAdminStatus { if_index, up } => {
            juniper::admin_status_commands(interface_name(device, *if_index)?, *up)
        }
        Command::SetDescription {
            if_index,
            description,
        } => juniper::description_commands(interface_name(device, *if_index)?, description),
        Command::SetPoeStatus { if_index, enabled } => {
            juniper::poe_commands(&poe_entry(device, *if_index)?, *enabled)
        }
        Command::SetUntaggedVlan { if_index, vlan } => {
            let iface = device
                .interface(*if_index)
                .ok_or_else(|| CoreError::validation(format!("unknown interface {if_index}")))?;
            let vlan = device
                .vlans
                .get(vlan)
                .ok_or_else(|| CoreError::validation(format!("VLAN {vlan} is not defined")))?;
            juniper::untagged_vlan_commands(iface, vlan)
        }
        Command::CreateVlan { vlan, name } => {
            juniper::create_vlan_commands(*vlan, &vlan_name(*vlan, name))
        }
        Command::SaveRunningConfig => {
            return Err(CoreError::unsupported(
                "saving the running configuration",
                Vendor::Juniper,
            ));
        }
    };
    juniper::apply(rpc, &commands).await
}

/// Optimistic bookkeeping after the device accepted a command.
fn record(device: &mut Device, command: &Command) {
    match command {
        Command::SetAdminStatus { if_index, up } => {
            if let Some(iface) = device.interface_mut(*if_index) {
                iface.admin_status = if *up {
                    AdminStatus::Up
                } else {
                    AdminStatus::Down
                };
            }
        }
        Command::SetDescription {
            if_index,
            description,
        } => {
            if let Some(iface) = device.interface_mut(*if_index) {
                iface.description.clone_from(description);
            }
        }
        Command::SetPoeStatus { if_index, enabled } => {
            let entry = device.interface(*if_index).and_then(|i| i.poe_entry.clone());
            if let Some(port) = entry.and_then(|e| device.poe.ports.get_mut(&e)) {
                port.admin_enabled = *enabled;
            }
        }
        Command::SetUntaggedVlan { if_index, vlan } => {
            if let Some(iface) = device.interface_mut(*if_index) {
                iface.untagged_vlan = *vlan;
                iface.tagged_vlans.remove(vlan);
            }
        }
        Command::CreateVlan { vlan, name } => {
            device.vlans.insert(*vlan, Vlan::new(*vlan, vlan_name(*vlan, name)));
        }
        Command::SaveRunningConfig => {}
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use pretty_assertions::assert_eq;
    use switchyard_api::{ReplayTransport, VarBind, WireValue};

    use super::*;
    use crate::cache::MemoryStore;

    const GENERIC_OBJECT_ID: &str = ".1.3.6.1.4.1.8072.3.2.10";

    fn generic_switch() -> Arc<ReplayTransport> {
        Arc::new(ReplayTransport::from_varbinds([
            VarBind::new(instance(oids::SYS_DESCR, 0), WireValue::string("test switch")),
            VarBind::new(
                instance(oids::SYS_OBJECT_ID, 0),
                WireValue::ObjectIdentifier(GENERIC_OBJECT_ID.into()),
            ),
            VarBind::new(instance(oids::SYS_NAME, 0), WireValue::string("sw1")),
            VarBind::new(instance(oids::DOT1Q_VLAN_VERSION_NUMBER, 0), WireValue::Integer(1)),
            VarBind::new(instance(oids::IF_INDEX, 1), WireValue::Integer(1)),
            VarBind::new(instance(oids::IF_TYPE, 1), WireValue::Integer(6)),
            VarBind::new(instance(oids::IF_NAME, 1), WireValue::string("ge1")),
            VarBind::new(instance(oids::IF_ADMIN_STATUS, 1), WireValue::Integer(1)),
            VarBind::new(instance(oids::DOT1Q_VLAN_STATIC_NAME, 1), WireValue::string("default")),
            VarBind::new(instance(oids::DOT1Q_VLAN_STATIC_NAME, 10), WireValue::string("data")),
            VarBind::new(instance(oids::DOT1Q_PVID, 1), WireValue::Gauge32(1)),
        ]))
    }

    async fn open(transport: Arc<ReplayTransport>, config: ConnectorConfig) -> Connector {
        Connector::open(transport, config).await.unwrap()
    }

    #[tokio::test]
    async fn open_detects_vendor_and_qbridge() {
        let connector = open(generic_switch(), ConnectorConfig::new("sw1")).await;
        assert_eq!(connector.vendor(), Vendor::Generic);
        assert!(connector.strategy().qbridge);
        assert_eq!(connector.identity().object_id, GENERIC_OBJECT_ID);
        assert_eq!(connector.identity().name, "sw1");
    }

    #[tokio::test]
    async fn open_without_object_id_fails() {
        let transport = Arc::new(ReplayTransport::from_varbinds([VarBind::new(
            instance(oids::SYS_NAME, 0),
            WireValue::string("sw1"),
        )]));
        let err = Connector::open(transport, ConnectorConfig::default())
            .await
            .err()
            .unwrap();
        assert_eq!(err.kind(), "protocol");
    }

    #[tokio::test]
    async fn read_only_rejects_before_wire() {
        let transport = generic_switch();
        let config = ConnectorConfig {
            read_only: true,
            ..ConnectorConfig::new("sw1")
        };
        let connector = open(transport.clone(), config).await;
        let err = connector
            .set_interface_admin_status(1, false)
            .await
            .unwrap_err();
        assert_eq!(err.kind(), "validation");
        assert!(transport.set_requests().is_empty());
        assert!(connector.error_state().await.is_error());
    }

    #[tokio::test]
    async fn admin_status_is_recorded_locally() {
        let transport = generic_switch();
        let connector = open(transport.clone(), ConnectorConfig::new("sw1")).await;
        connector.set_interface_admin_status(1, false).await.unwrap();

        assert_eq!(
            connector.device().await.interfaces[&1].admin_status,
            AdminStatus::Down
        );
        assert_eq!(
            transport.set_requests()[0][0].value,
            WireValue::Integer(2)
        );
        assert!(!connector.error_state().await.is_error());
    }

    #[tokio::test]
    async fn long_description_is_rejected() {
        let transport = generic_switch();
        let connector = open(transport.clone(), ConnectorConfig::new("sw1")).await;
        let err = connector
            .set_interface_description(1, "x".repeat(MAX_DESCRIPTION_LEN + 1))
            .await
            .unwrap_err();
        assert_eq!(err.kind(), "validation");
        assert!(transport.set_requests().is_empty());
    }

    #[tokio::test]
    async fn existing_vlan_cannot_be_created() {
        let connector = open(generic_switch(), ConnectorConfig::new("sw1")).await;
        let err = connector.create_vlan(10, "dup").await.unwrap_err();
        assert_eq!(err.kind(), "validation");

        connector.create_vlan(30, "").await.unwrap();
        assert_eq!(connector.device().await.vlans[&30].name, "VLAN30");
    }

    #[tokio::test]
    async fn generic_save_is_unsupported() {
        let connector = open(generic_switch(), ConnectorConfig::new("sw1")).await;
        assert!(!connector.can_save_config());
        let err = connector.save_running_config().await.unwrap_err();
        assert_eq!(err.kind(), "unsupported");
    }

    #[tokio::test]
    async fn basic_info_is_served_from_the_store() {
        let store = Arc::new(MemoryStore::new());
        let transport = generic_switch();
        let connector = open(transport.clone(), ConnectorConfig::new("sw1")).await;
        connector.attach_store(store.clone()).await;
        connector.get_basic_info(true).await.unwrap();
        assert_eq!(store.len(), 1);

        let second = open(transport.clone(), ConnectorConfig::new("sw1")).await;
        second.attach_store(store).await;
        transport.clear_operations();
        second.get_basic_info(false).await.unwrap();
        assert!(transport.operations().is_empty());
        assert_eq!(second.device().await.interfaces[&1].name, "ge1");
    }

    #[tokio::test]
    async fn foreign_snapshot_is_refused() {
        let connector = open(generic_switch(), ConnectorConfig::new("sw1")).await;
        connector.get_basic_info(false).await.unwrap();
        let json = connector.serialize().await.unwrap();

        let other = open(generic_switch(), ConnectorConfig::new("sw2")).await;
        let err = other.deserialize(&json).await.unwrap_err();
        assert_eq!(err.kind(), "cache");

        let same = open(generic_switch(), ConnectorConfig::new("sw1")).await;
        same.deserialize(&json).await.unwrap();
        assert_eq!(same.device().await.vlans.len(), 2);
    }
}
