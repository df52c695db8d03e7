// ── Link-layer addresses ──

use std::fmt;
use std::net::Ipv4Addr;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

// ── MacAddress ──────────────────────────────────────────────────────

/// MAC address, normalized to lowercase colon-separated format (aa:bb:cc:dd:ee:ff).
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct MacAddress(String);

impl MacAddress {
    /// Create a normalized MAC address from any common format.
    /// Accepts colon-separated, dash-separated, Cisco dotted, or bare hex.
    /// Input that does not hold 12 hex digits is kept lowercased as-is.
    pub fn new(raw: impl AsRef<str>) -> Self {
        let lowered = raw.as_ref().trim().to_lowercase();
        let digits: String = lowered
            .chars()
            .filter(|c| !matches!(c, ':' | '-' | '.'))
            .collect();
        if digits.len() == 12 && digits.chars().all(|c| c.is_ascii_hexdigit()) {
            let pairs: Vec<&str> = (0..6).map(|i| &digits[i * 2..i * 2 + 2]).collect();
            return Self(pairs.join(":"));
        }
        Self(lowered.replace('-', ":"))
    }

    /// From exactly six raw octets (ifPhysAddress, ipNetToMediaPhysAddress).
    pub fn from_octets(octets: &[u8]) -> Option<Self> {
        if octets.len() != 6 {
            return None;
        }
        let hex: Vec<String> = octets.iter().map(|b| format!("{b:02x}")).collect();
        Some(Self(hex.join(":")))
    }

    /// From six decimal OID arcs, as in forwarding-table suffixes
    /// (`0.27.44.1.2.3`).
    pub fn from_arcs(arcs: &[u32]) -> Option<Self> {
        let octets: Option<Vec<u8>> = arcs.iter().map(|a| u8::try_from(*a).ok()).collect();
        Self::from_octets(&octets?)
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for MacAddress {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl FromStr for MacAddress {
    type Err = std::convert::Infallible;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(Self::new(s))
    }
}

// ── EthernetAddress ─────────────────────────────────────────────────

/// A MAC address learned behind an interface.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EthernetAddress {
    pub mac: MacAddress,
    /// VLAN the address was learned on, when the forwarding table says.
    pub vlan: Option<u16>,
    /// Resolved from the ARP table.
    pub ipv4: Option<Ipv4Addr>,
}

impl EthernetAddress {
    pub fn new(mac: MacAddress, vlan: Option<u16>) -> Self {
        Self {
            mac,
            vlan,
            ipv4: None,
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn normalizes_common_formats() {
        for raw in [
            "AA:BB:CC:00:11:22",
            "aa-bb-cc-00-11-22",
            "aabb.cc00.1122",
            "AABBCC001122",
        ] {
            assert_eq!(MacAddress::new(raw).as_str(), "aa:bb:cc:00:11:22");
        }
    }

    #[test]
    fn from_octets_requires_six_bytes() {
        assert_eq!(
            MacAddress::from_octets(&[0, 0x1b, 0x2c, 1, 2, 3]).unwrap().as_str(),
            "00:1b:2c:01:02:03"
        );
        assert!(MacAddress::from_octets(&[1, 2, 3]).is_none());
    }

    #[test]
    fn from_decimal_arcs() {
        let mac = MacAddress::from_arcs(&[0, 27, 44, 1, 2, 255]).unwrap();
        assert_eq!(mac.as_str(), "00:1b:2c:01:02:ff");
        assert!(MacAddress::from_arcs(&[0, 27, 44, 1, 2, 256]).is_none());
    }
}
