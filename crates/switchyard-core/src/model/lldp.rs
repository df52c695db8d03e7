// ── LLDP neighbor ──
//
// Remote-table columns arrive as separate walks, so the raw bytes and the
// subtype are stored independently and decoded only when read.

use std::net::Ipv4Addr;

use serde::{Deserialize, Serialize};

use super::address::MacAddress;

/// LldpChassisIdSubtype / LldpPortIdSubtype values that change decoding.
pub mod subtype {
    pub const CHASSIS_MAC_ADDRESS: u8 = 4;
    pub const CHASSIS_NETWORK_ADDRESS: u8 = 5;
    pub const PORT_MAC_ADDRESS: u8 = 3;
    pub const PORT_NETWORK_ADDRESS: u8 = 4;
    pub const LOCAL: u8 = 7;
}

/// Bits of `LldpSystemCapabilitiesMap`, MSB first.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum LldpCapability {
    Other,
    Repeater,
    Bridge,
    WlanAccessPoint,
    Router,
    Telephone,
    DocsisCableDevice,
    Station,
}

impl LldpCapability {
    const ALL: [Self; 8] = [
        Self::Other,
        Self::Repeater,
        Self::Bridge,
        Self::WlanAccessPoint,
        Self::Router,
        Self::Telephone,
        Self::DocsisCableDevice,
        Self::Station,
    ];

    pub fn from_name(name: &str) -> Option<Self> {
        match name.trim().to_ascii_lowercase().as_str() {
            "other" => Some(Self::Other),
            "repeater" => Some(Self::Repeater),
            "bridge" => Some(Self::Bridge),
            "wlan access point" | "wlan-access-point" | "wlan" => Some(Self::WlanAccessPoint),
            "router" => Some(Self::Router),
            "telephone" => Some(Self::Telephone),
            "docsis cable device" | "docsis" => Some(Self::DocsisCableDevice),
            "station" | "station only" => Some(Self::Station),
            _ => None,
        }
    }

    fn bit(self) -> u8 {
        let rank = Self::ALL.iter().position(|c| *c == self).unwrap_or(0);
        0x80 >> rank
    }

    /// Encode a capability set into the one-octet MIB bitmap.
    pub fn to_bitmap(caps: &[Self]) -> Vec<u8> {
        vec![caps.iter().fold(0u8, |acc, c| acc | c.bit())]
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct LldpNeighbor {
    /// Remote-table suffix `time.local_port.index`.
    pub key: String,
    pub local_port: u32,
    pub chassis_id_subtype: Option<u8>,
    pub chassis_id: Vec<u8>,
    pub port_id_subtype: Option<u8>,
    pub port_id: Vec<u8>,
    pub port_description: String,
    pub system_name: String,
    pub system_description: String,
    pub capabilities_supported: Vec<u8>,
    pub capabilities_enabled: Vec<u8>,
    pub management_address: Option<Ipv4Addr>,
    /// IANA address family of the management address (1 = IPv4).
    pub management_family: Option<u8>,
}

impl LldpNeighbor {
    pub fn new(key: impl Into<String>, local_port: u32) -> Self {
        Self {
            key: key.into(),
            local_port,
            ..Self::default()
        }
    }

    /// Chassis id rendered according to its subtype.
    pub fn chassis_string(&self) -> String {
        decode_id(
            self.chassis_id_subtype,
            &self.chassis_id,
            subtype::CHASSIS_MAC_ADDRESS,
            subtype::CHASSIS_NETWORK_ADDRESS,
        )
    }

    /// Port id rendered according to its subtype.
    pub fn port_string(&self) -> String {
        decode_id(
            self.port_id_subtype,
            &self.port_id,
            subtype::PORT_MAC_ADDRESS,
            subtype::PORT_NETWORK_ADDRESS,
        )
    }

    pub fn capabilities(&self) -> Vec<LldpCapability> {
        let Some(first) = self.capabilities_enabled.first() else {
            return Vec::new();
        };
        LldpCapability::ALL
            .into_iter()
            .filter(|c| first & c.bit() != 0)
            .collect()
    }
}

fn decode_id(subtype: Option<u8>, raw: &[u8], mac_subtype: u8, net_subtype: u8) -> String {
    match subtype {
        Some(s) if s == mac_subtype => MacAddress::from_octets(raw)
            .map_or_else(|| printable(raw), |mac| mac.to_string()),
        // IANA family byte followed by the address
        Some(s) if s == net_subtype && raw.len() == 5 && raw[0] == 1 => {
            Ipv4Addr::new(raw[1], raw[2], raw[3], raw[4]).to_string()
        }
        _ => printable(raw),
    }
}

fn printable(raw: &[u8]) -> String {
    if raw.iter().all(|b| b.is_ascii_graphic() || *b == b' ') {
        String::from_utf8_lossy(raw).into_owned()
    } else {
        raw.iter()
            .map(|b| format!("{b:02x}"))
            .collect::<Vec<_>>()
            .join(":")
    }
}
