// ── SNMP wire values ──
//
// The typed values a transport hands back from GET/WALK and accepts for SET.
// Interpretation (string vs. bitmap vs. MAC) is left to the consumer.

use std::fmt;
use std::net::Ipv4Addr;

use serde::{Deserialize, Serialize};
use strum::{Display, EnumString};

/// ASN.1/SMI type tag of a wire value.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Display, EnumString)]
#[strum(serialize_all = "SCREAMING_SNAKE_CASE")]
pub enum WireType {
    Integer,
    OctetString,
    ObjectIdentifier,
    IpAddress,
    Counter32,
    /// Gauge32 and Unsigned32 share one tag on the wire.
    Gauge32,
    TimeTicks,
    Counter64,
    Opaque,
    Null,
}

/// A single typed value as carried in a varbind.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum WireValue {
    Integer(i64),
    OctetString(Vec<u8>),
    ObjectIdentifier(String),
    IpAddress(Ipv4Addr),
    Counter32(u32),
    Gauge32(u32),
    TimeTicks(u32),
    Counter64(u64),
    Opaque(Vec<u8>),
    Null,
}

impl WireValue {
    pub fn wire_type(&self) -> WireType {
        match self {
            Self::Integer(_) => WireType::Integer,
            Self::OctetString(_) => WireType::OctetString,
            Self::ObjectIdentifier(_) => WireType::ObjectIdentifier,
            Self::IpAddress(_) => WireType::IpAddress,
            Self::Counter32(_) => WireType::Counter32,
            Self::Gauge32(_) => WireType::Gauge32,
            Self::TimeTicks(_) => WireType::TimeTicks,
            Self::Counter64(_) => WireType::Counter64,
            Self::Opaque(_) => WireType::Opaque,
            Self::Null => WireType::Null,
        }
    }

    /// Convenience constructor for display strings.
    pub fn string(s: impl AsRef<str>) -> Self {
        Self::OctetString(s.as_ref().as_bytes().to_vec())
    }
}

impl fmt::Display for WireValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Integer(v) => write!(f, "INTEGER: {v}"),
            Self::OctetString(bytes) | Self::Opaque(bytes) => {
                let printable = bytes
                    .iter()
                    .all(|b| b.is_ascii_graphic() || *b == b' ');
                if printable {
                    write!(f, "STRING: \"{}\"", String::from_utf8_lossy(bytes))
                } else {
                    write!(f, "Hex-STRING:")?;
                    for b in bytes {
                        write!(f, " {b:02X}")?;
                    }
                    Ok(())
                }
            }
            Self::ObjectIdentifier(oid) => write!(f, "OID: {oid}"),
            Self::IpAddress(ip) => write!(f, "IpAddress: {ip}"),
            Self::Counter32(v) => write!(f, "Counter32: {v}"),
            Self::Gauge32(v) => write!(f, "Gauge32: {v}"),
            Self::TimeTicks(v) => write!(f, "Timeticks: ({v})"),
            Self::Counter64(v) => write!(f, "Counter64: {v}"),
            Self::Null => write!(f, "NULL"),
        }
    }
}

/// An (OID, value) pair.
///
/// OIDs are dotted-numeric strings with a leading dot, e.g. `.1.3.6.1.2.1.1.5.0`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct VarBind {
    pub oid: String,
    pub value: WireValue,
}

impl VarBind {
    pub fn new(oid: impl Into<String>, value: WireValue) -> Self {
        let oid = oid.into();
        let oid = if oid.starts_with('.') {
            oid
        } else {
            format!(".{oid}")
        };
        Self { oid, value }
    }

    pub fn wire_type(&self) -> WireType {
        self.value.wire_type()
    }
}

impl fmt::Display for VarBind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} = {}", self.oid, self.value)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn varbind_normalizes_leading_dot() {
        let vb = VarBind::new("1.3.6.1.2.1.1.5.0", WireValue::string("sw1"));
        assert_eq!(vb.oid, ".1.3.6.1.2.1.1.5.0");
    }

    #[test]
    fn display_uses_hex_for_binary_octets() {
        let v = WireValue::OctetString(vec![0x80, 0x00]);
        assert_eq!(v.to_string(), "Hex-STRING: 80 00");
    }

    #[test]
    fn unsigned_and_gauge_share_a_tag() {
        assert_eq!(WireValue::Gauge32(7).wire_type(), WireType::Gauge32);
        assert_eq!(WireType::Gauge32.to_string(), "GAUGE32");
    }
}
