// ── Bitmap codec ──
//
// Q-Bridge PortList octet strings: MSB of byte 0 is port 1, LSB of byte 0
// is port 8, MSB of byte 1 is port 9. Comware stores the same lists with
// the bits of every byte reversed. VLAN lists reuse the codec with an
// offset applied by the caller.

use serde::{Deserialize, Serialize};

/// Bit order within each octet.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum BitOrder {
    /// Q-Bridge canonical order.
    #[default]
    MsbFirst,
    /// LSB of each byte is the lowest-numbered port (Comware).
    Reversed,
}

/// A set of 1-based port (or list) positions backed by raw octets.
///
/// Keeps the octet length it was decoded from, so unknown trailing bytes
/// survive a read-modify-write untouched.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct PortList {
    bytes: Vec<u8>,
}

impl PortList {
    /// Empty list sized for `max_port` positions.
    pub fn with_ports(max_port: u32) -> Self {
        Self {
            bytes: vec![0; byte_len_for(max_port)],
        }
    }

    pub fn from_octets(octets: &[u8], order: BitOrder) -> Self {
        let bytes = match order {
            BitOrder::MsbFirst => octets.to_vec(),
            BitOrder::Reversed => reverse_bits_in_bytes(octets),
        };
        Self { bytes }
    }

    pub fn to_octets(&self, order: BitOrder) -> Vec<u8> {
        match order {
            BitOrder::MsbFirst => self.bytes.clone(),
            BitOrder::Reversed => reverse_bits_in_bytes(&self.bytes),
        }
    }

    pub fn byte_len(&self) -> usize {
        self.bytes.len()
    }

    /// Grow (never shrink) to at least `len` octets.
    pub fn ensure_len(&mut self, len: usize) {
        if self.bytes.len() < len {
            self.bytes.resize(len, 0);
        }
    }

    pub fn contains(&self, port: u32) -> bool {
        let Some((byte, mask)) = position(port) else {
            return false;
        };
        self.bytes.get(byte).is_some_and(|b| b & mask != 0)
    }

    /// Set `port`, growing the list if needed. Port 0 is ignored.
    pub fn insert(&mut self, port: u32) {
        if let Some((byte, mask)) = position(port) {
            self.ensure_len(byte + 1);
            self.bytes[byte] |= mask;
        }
    }

    pub fn remove(&mut self, port: u32) {
        let Some((byte, mask)) = position(port) else {
            return;
        };
        if let Some(b) = self.bytes.get_mut(byte) {
            *b &= !mask;
        }
    }

    /// Set positions in ascending order.
    pub fn ports(&self) -> Vec<u32> {
        decode_portlist(&self.bytes)
    }

    pub fn is_empty(&self) -> bool {
        self.bytes.iter().all(|b| *b == 0)
    }
}

fn position(port: u32) -> Option<(usize, u8)> {
    let zero_based = port.checked_sub(1)?;
    let byte = usize::try_from(zero_based / 8).ok()?;
    let mask = 0x80u8 >> (zero_based % 8);
    Some((byte, mask))
}

/// Octets needed to hold `max_port` positions: `ceil(max_port / 8)`.
pub fn byte_len_for(max_port: u32) -> usize {
    usize::try_from(max_port.div_ceil(8)).unwrap_or(usize::MAX)
}

/// Reverse the bit order inside every octet, leaving octet order intact.
pub fn reverse_bits_in_bytes(bytes: &[u8]) -> Vec<u8> {
    bytes.iter().map(|b| b.reverse_bits()).collect()
}

/// Set positions of an MSB-first octet string, 1-based and ascending.
pub fn decode_portlist(bytes: &[u8]) -> Vec<u32> {
    let mut ports = Vec::new();
    for (offset, byte) in bytes.iter().enumerate() {
        if *byte == 0 {
            continue;
        }
        for rank in 0..8u32 {
            if byte & (0x80 >> rank) != 0 {
                // offsets beyond u32 range cannot come from a real agent
                let offset = u32::try_from(offset).unwrap_or(u32::MAX / 8);
                ports.push(offset * 8 + rank + 1);
            }
        }
    }
    ports
}

/// MSB-first octet string of `byte_len` octets with `ports` set.
/// Ports that do not fit are dropped.
pub fn encode_portlist(ports: &[u32], byte_len: usize) -> Vec<u8> {
    let mut bytes = vec![0u8; byte_len];
    for port in ports {
        let Some((byte, mask)) = position(*port) else {
            continue;
        };
        if let Some(b) = bytes.get_mut(byte) {
            *b |= mask;
        }
    }
    bytes
}

/// Ports that are members of `vlan_id` according to its egress bitmap.
pub fn vlan_egress_ports(vlan_id: u16, bytes: &[u8]) -> Vec<u32> {
    let ports = decode_portlist(bytes);
    tracing::trace!(vlan_id, ports = ports.len(), "decoded egress bitmap");
    ports
}

// ── VLAN lists ───────────────────────────────────────────────────────

/// A VLAN list spread over fixed-size chunks, e.g. Cisco's four
/// 1024-bit "vlans enabled" columns or Comware's two 2048-bit allow lists.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct VlanListLayout {
    /// VLANs covered by one chunk.
    pub bits_per_chunk: u16,
    /// VLAN id held by bit 1 of chunk 0 (0 for Cisco, 1 for Comware).
    pub first_vlan: u16,
    pub order: BitOrder,
}

impl VlanListLayout {
    pub const CISCO_TRUNK: Self = Self {
        bits_per_chunk: 1024,
        first_vlan: 0,
        order: BitOrder::MsbFirst,
    };

    pub const COMWARE_ALLOW: Self = Self {
        bits_per_chunk: 2048,
        first_vlan: 1,
        order: BitOrder::Reversed,
    };

    fn chunk_bytes(&self) -> usize {
        usize::from(self.bits_per_chunk / 8)
    }

    /// VLAN ids set in `chunk` (0-based chunk number).
    pub fn decode(&self, chunk: u16, octets: &[u8]) -> Vec<u16> {
        let base = u32::from(chunk) * u32::from(self.bits_per_chunk) + u32::from(self.first_vlan);
        PortList::from_octets(octets, self.order)
            .ports()
            .into_iter()
            .filter_map(|bit| u16::try_from(base + bit - 1).ok())
            .filter(|vlan| (1..=4094).contains(vlan))
            .collect()
    }

    /// Encode `vlans` into `chunks` octet strings of full chunk length.
    pub fn encode(&self, vlans: impl IntoIterator<Item = u16>, chunks: u16) -> Vec<Vec<u8>> {
        let mut lists = vec![PortList::default(); usize::from(chunks)];
        for list in &mut lists {
            list.ensure_len(self.chunk_bytes());
        }
        for vlan in vlans {
            let Some(rel) = vlan.checked_sub(self.first_vlan) else {
                continue;
            };
            let chunk = usize::from(rel / self.bits_per_chunk);
            if let Some(list) = lists.get_mut(chunk) {
                list.insert(u32::from(rel % self.bits_per_chunk) + 1);
            }
        }
        lists.iter().map(|l| l.to_octets(self.order)).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn msb_is_port_one() {
        assert_eq!(decode_portlist(&[0x80]), vec![1]);
        assert_eq!(decode_portlist(&[0xC0]), vec![1, 2]);
        assert_eq!(decode_portlist(&[0x00, 0x01]), vec![16]);
    }

    #[test]
    fn encode_decode_preserves_arbitrary_octets() {
        let samples: [&[u8]; 5] = [
            &[],
            &[0x00],
            &[0x80, 0x00, 0x01],
            &[0xFF, 0x5A, 0xA5, 0x00],
            &[0x01, 0x02, 0x04, 0x08, 0x10, 0x20, 0x40, 0x80],
        ];
        for b in samples {
            assert_eq!(encode_portlist(&decode_portlist(b), b.len()), b);
            for order in [BitOrder::MsbFirst, BitOrder::Reversed] {
                assert_eq!(PortList::from_octets(b, order).to_octets(order), b);
            }
        }
    }

    #[test]
    fn reversed_order_flips_bits_within_each_byte() {
        assert_eq!(reverse_bits_in_bytes(&[0x80, 0x01, 0xC0]), vec![0x01, 0x80, 0x03]);
        let list = PortList::from_octets(&[0x01], BitOrder::Reversed);
        assert_eq!(list.ports(), vec![1]);
    }

    #[test]
    fn byte_length_rounds_up() {
        assert_eq!(byte_len_for(0), 0);
        assert_eq!(byte_len_for(8), 1);
        assert_eq!(byte_len_for(9), 2);
        assert_eq!(byte_len_for(52), 7);
    }

    #[test]
    fn remove_keeps_length_and_other_bits() {
        let mut list = PortList::from_octets(&[0xC0, 0x00, 0x01], BitOrder::MsbFirst);
        list.remove(1);
        assert_eq!(list.to_octets(BitOrder::MsbFirst), vec![0x40, 0x00, 0x01]);
        list.remove(200);
        assert_eq!(list.byte_len(), 3);
    }

    #[test]
    fn insert_grows_as_needed() {
        let mut list = PortList::with_ports(8);
        list.insert(12);
        assert_eq!(list.to_octets(BitOrder::MsbFirst), vec![0x00, 0x10]);
        list.insert(0);
        assert!(list.contains(12));
        assert!(!list.contains(0));
    }

    #[test]
    fn cisco_trunk_chunks_are_zero_based() {
        let layout = VlanListLayout::CISCO_TRUNK;
        // bit 1 of chunk 0 is VLAN 0 and is never reported
        assert_eq!(layout.decode(0, &[0xC0]), vec![1]);
        assert_eq!(layout.decode(1, &[0x80]), vec![1024]);

        let chunks = layout.encode([1, 1024, 4094], 4);
        assert_eq!(chunks.len(), 4);
        assert_eq!(chunks[0].len(), 128);
        assert_eq!(chunks[0][0], 0x40);
        assert_eq!(chunks[1][0], 0x80);
        assert_eq!(layout.decode(3, &chunks[3]), vec![4094]);
    }

    #[test]
    fn comware_allow_lists_are_one_based_and_reversed() {
        let layout = VlanListLayout::COMWARE_ALLOW;
        let chunks = layout.encode([1, 10, 2049], 2);
        assert_eq!(chunks[0].len(), 256);
        assert_eq!(chunks[0][0], 0x01);
        assert_eq!(chunks[0][1], 0x02);
        assert_eq!(chunks[1][0], 0x01);
        assert_eq!(layout.decode(0, &chunks[0]), vec![1, 10]);
        assert_eq!(layout.decode(1, &chunks[1]), vec![2049]);
    }
}
