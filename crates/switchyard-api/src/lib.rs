//! Transport boundary for the switchyard engine.
//!
//! The engine consumes two kinds of device session and never implements
//! either protocol stack itself:
//!
//! - **[`SnmpTransport`]**: GET / WALK / SET / atomic multi-SET against one
//!   agent, bound to a [`TransportConfig`] (address, version, credentials).
//! - **[`JunosRpc`]**: typed NETCONF table reads plus candidate-config
//!   load / commit-check / commit / rollback for Juniper switches.
//!
//! [`ReplayTransport`] is an in-memory agent loaded from `snmpwalk -On`
//! dumps. It records every wire operation, which makes it the test double
//! for the engine and the backend of the offline CLI.

pub mod error;
pub mod replay;
pub mod rpc;
pub mod transport;
pub mod value;

pub use error::Error;
pub use replay::{ReplayTransport, WireOp, parse_dump};
pub use rpc::{
    JunosRpc, RpcArpEntry, RpcChassisModule, RpcInterface, RpcLldpNeighbor, RpcMacEntry,
    RpcPoeInterface, RpcSystem, RpcVlan, RpcVlanMember,
};
pub use transport::{
    AuthProtocol, PrivProtocol, SecurityLevel, SnmpCredentials, SnmpTransport, SnmpVersion,
    TransportConfig, UsmCredentials,
};
pub use value::{VarBind, WireType, WireValue};
