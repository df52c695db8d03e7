// ── Value coercion ──
//
// Wire values collapse into three semantic shapes before reaching a
// handler. Octet strings keep their raw bytes so a handler can read them
// as text, a port bitmap, or a MAC address.

use std::borrow::Cow;

use switchyard_api::WireValue;

/// A wire value after coercion.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Value {
    /// Octet string or OID text. Raw bytes, not necessarily UTF-8.
    Text(Vec<u8>),
    Integer(i64),
    /// IpAddress, Opaque, and NULL pass through untouched.
    Bytes(Vec<u8>),
}

/// Coerce one wire value. `oid` only feeds trace output.
pub fn coerce(oid: &str, raw: &WireValue) -> Value {
    let value = match raw {
        WireValue::OctetString(bytes) => Value::Text(bytes.clone()),
        WireValue::ObjectIdentifier(dotted) => Value::Text(dotted.as_bytes().to_vec()),
        WireValue::Integer(v) => Value::Integer(*v),
        WireValue::Counter32(v) | WireValue::Gauge32(v) | WireValue::TimeTicks(v) => {
            Value::Integer(i64::from(*v))
        }
        WireValue::Counter64(v) => Value::Integer(i64::try_from(*v).unwrap_or(i64::MAX)),
        WireValue::IpAddress(ip) => Value::Bytes(ip.octets().to_vec()),
        WireValue::Opaque(bytes) => Value::Bytes(bytes.clone()),
        WireValue::Null => Value::Bytes(Vec::new()),
    };
    tracing::trace!(oid, ?value, "coerced");
    value
}

impl Value {
    /// Lossy text view. Integers render in decimal.
    pub fn as_text(&self) -> Cow<'_, str> {
        match self {
            Self::Text(bytes) | Self::Bytes(bytes) => String::from_utf8_lossy(bytes),
            Self::Integer(v) => Cow::Owned(v.to_string()),
        }
    }

    /// Display text with trailing NULs and surrounding whitespace removed.
    pub fn display_string(&self) -> String {
        self.as_text().trim_end_matches('\0').trim().to_string()
    }

    /// Raw octets; empty for integers.
    pub fn octets(&self) -> &[u8] {
        match self {
            Self::Text(bytes) | Self::Bytes(bytes) => bytes,
            Self::Integer(_) => &[],
        }
    }

    /// Integer view. Text that holds a decimal number is accepted too,
    /// since some agents report numeric columns as DisplayString.
    pub fn as_int(&self) -> Option<i64> {
        match self {
            Self::Integer(v) => Some(*v),
            Self::Text(bytes) => std::str::from_utf8(bytes).ok()?.trim().parse().ok(),
            Self::Bytes(_) => None,
        }
    }

    pub fn as_u32(&self) -> Option<u32> {
        self.as_int().and_then(|v| u32::try_from(v).ok())
    }

    pub fn as_u16(&self) -> Option<u16> {
        self.as_int().and_then(|v| u16::try_from(v).ok())
    }
}

#[cfg(test)]
mod tests {
    use std::net::Ipv4Addr;

    use super::*;

    #[test]
    fn octet_strings_become_text_with_raw_bytes() {
        let v = coerce(".1.3.6.1.2.1.31.1.1.1.18.1", &WireValue::OctetString(vec![0x80, 0x01]));
        assert_eq!(v, Value::Text(vec![0x80, 0x01]));
        assert_eq!(v.octets(), &[0x80, 0x01]);
    }

    #[test]
    fn unsigned_types_become_integers() {
        assert_eq!(coerce("", &WireValue::Gauge32(20)).as_int(), Some(20));
        assert_eq!(coerce("", &WireValue::TimeTicks(1234)).as_int(), Some(1234));
        assert_eq!(coerce("", &WireValue::Counter64(u64::MAX)).as_int(), Some(i64::MAX));
    }

    #[test]
    fn ip_address_passes_through_as_bytes() {
        let v = coerce("", &WireValue::IpAddress(Ipv4Addr::new(10, 1, 2, 3)));
        assert_eq!(v, Value::Bytes(vec![10, 1, 2, 3]));
        assert_eq!(v.as_int(), None);
    }

    #[test]
    fn oid_values_become_dotted_text() {
        let v = coerce("", &WireValue::ObjectIdentifier(".1.3.6.1.4.1.9.1.1208".into()));
        assert_eq!(v.as_text(), ".1.3.6.1.4.1.9.1.1208");
    }

    #[test]
    fn numeric_display_strings_parse_as_integers() {
        assert_eq!(Value::Text(b" 42 ".to_vec()).as_int(), Some(42));
        assert_eq!(Value::Text(b"Gi1/0/1".to_vec()).as_int(), None);
    }

    #[test]
    fn display_string_strips_trailing_nul() {
        assert_eq!(Value::Text(b"core-sw\0".to_vec()).display_string(), "core-sw");
    }
}
