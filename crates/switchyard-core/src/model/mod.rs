// ── Domain model ──
//
// Vendor-neutral entity graph built by the dispatcher and mutated by the
// connector. Re-exports everything for ergonomic imports.

pub mod address;
pub mod device;
pub mod error_state;
pub mod interface;
pub mod lldp;
pub mod poe;
pub mod stack;
pub mod system;
pub mod vlan;

pub use address::{EthernetAddress, MacAddress};
pub use device::Device;
pub use error_state::ErrorState;
pub use interface::{AdminStatus, Interface, LacpRole, OperStatus, PortMode};
pub use lldp::{LldpCapability, LldpNeighbor};
pub use poe::{PoeData, PoeDetectStatus, PoePort, PoePse, PseStatus};
pub use stack::{EntityClass, StackMember};
pub use system::{SystemInfo, Vendor};
pub use vlan::{Vlan, VlanStatus, VlanType, is_valid_vlan_id};
