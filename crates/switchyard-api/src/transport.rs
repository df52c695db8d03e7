// ── SNMP transport boundary ──
//
// The engine never encodes PDUs itself. A conforming client library
// implements `SnmpTransport` for one device session; retries and
// timeouts are its business, not the engine's.

use std::time::Duration;

use async_trait::async_trait;
use secrecy::SecretString;
use serde::{Deserialize, Serialize};
use strum::{Display, EnumString};

use crate::error::Error;
use crate::value::VarBind;

/// Protocol version negotiated with the agent.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, Display, EnumString)]
#[strum(serialize_all = "lowercase")]
#[serde(rename_all = "lowercase")]
pub enum SnmpVersion {
    V1,
    #[default]
    V2c,
    V3,
}

/// USM security level.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, Display, EnumString)]
#[strum(serialize_all = "camelCase")]
#[serde(rename_all = "camelCase")]
pub enum SecurityLevel {
    #[default]
    NoAuthNoPriv,
    AuthNoPriv,
    AuthPriv,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Display, EnumString)]
#[strum(ascii_case_insensitive)]
pub enum AuthProtocol {
    Md5,
    Sha,
    Sha256,
    Sha512,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Display, EnumString)]
#[strum(ascii_case_insensitive)]
pub enum PrivProtocol {
    Des,
    Aes128,
    Aes256,
}

/// SNMPv3 user-based security parameters.
#[derive(Debug, Clone)]
pub struct UsmCredentials {
    pub username: String,
    pub level: SecurityLevel,
    pub auth: Option<(AuthProtocol, SecretString)>,
    pub privacy: Option<(PrivProtocol, SecretString)>,
}

/// Credential data for one device session.
#[derive(Debug, Clone)]
pub enum SnmpCredentials {
    /// v1/v2c community string.
    Community(SecretString),
    /// v3 USM.
    Usm(UsmCredentials),
}

/// Everything a transport needs to bind to one device.
#[derive(Debug, Clone)]
pub struct TransportConfig {
    pub host: String,
    pub port: u16,
    pub version: SnmpVersion,
    pub credentials: SnmpCredentials,
    pub timeout: Duration,
    pub retries: u32,
    /// GETBULK max-repetitions used for walks.
    pub max_repetitions: u32,
}

impl TransportConfig {
    /// `host:port` target string.
    pub fn target(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

impl Default for TransportConfig {
    fn default() -> Self {
        Self {
            host: "127.0.0.1".into(),
            port: 161,
            version: SnmpVersion::V2c,
            credentials: SnmpCredentials::Community(SecretString::from("public".to_string())),
            timeout: Duration::from_secs(5),
            retries: 2,
            max_repetitions: 25,
        }
    }
}

/// One device's SNMP session.
///
/// Every call is a suspension point; nothing else in the engine awaits.
#[async_trait]
pub trait SnmpTransport: Send + Sync {
    /// GET a single instance.
    async fn get(&self, oid: &str) -> Result<VarBind, Error>;

    /// Walk every instance below `root`, in ascending OID order.
    async fn walk(&self, root: &str, max_repetitions: u32) -> Result<Vec<VarBind>, Error>;

    /// SET a single instance.
    async fn set(&self, varbind: VarBind) -> Result<(), Error>;

    /// SET several instances in one PDU; the agent applies all or none.
    async fn set_multiple(&self, varbinds: Vec<VarBind>) -> Result<(), Error>;
}
