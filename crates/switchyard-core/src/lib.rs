// switchyard-core: Device-abstraction engine between switchyard-api and consumers (CLI).

pub mod bitmap;
pub mod cache;
pub mod coerce;
pub mod command;
pub mod config;
pub mod connector;
pub mod dispatch;
pub mod error;
pub mod model;
pub mod oids;
pub mod vendor;

// ── Primary re-exports ──────────────────────────────────────────────
pub use cache::{DeviceIdentity, MemoryStore, SNAPSHOT_VERSION, Snapshot, SnapshotStore};
pub use command::{Command, CommandResult};
pub use config::ConnectorConfig;
pub use connector::{Connector, MAX_DESCRIPTION_LEN};
pub use dispatch::joins::PoeMapping;
pub use error::CoreError;
pub use vendor::Strategy;

// Re-export model types at the crate root for ergonomics.
pub use model::{
    // Core entities
    Device, Interface, StackMember, Vlan,
    // Client data
    EthernetAddress, LldpCapability, LldpNeighbor, MacAddress,
    // PoE
    PoeData, PoeDetectStatus, PoePort, PoePse, PseStatus,
    // Supporting types
    AdminStatus, EntityClass, ErrorState, LacpRole, OperStatus, PortMode, SystemInfo, Vendor,
    VlanStatus, VlanType,
};
