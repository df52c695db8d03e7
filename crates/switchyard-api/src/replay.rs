// ── Replay transport ──
//
// An in-memory agent backed by an ordered OID store. Loaded from
// `snmpwalk -On` text dumps, it answers GET/WALK from the store, applies
// SETs back into it, and records every wire operation so callers can see
// exactly what a mutation would have sent. Faults can be injected per
// branch to exercise partial-failure paths.

use std::collections::BTreeMap;
use std::net::Ipv4Addr;
use std::path::Path;

use async_trait::async_trait;
use parking_lot::Mutex;
use tracing::trace;

use crate::error::Error;
use crate::transport::SnmpTransport;
use crate::value::{VarBind, WireType, WireValue};

/// One operation observed by the replay transport, in call order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum WireOp {
    Get { oid: String },
    Walk { root: String },
    /// One SET PDU; a single-varbind `set` is recorded as a one-element list.
    Set { varbinds: Vec<VarBind> },
}

/// Rule rejecting SETs below `prefix`, optionally only for one wire type.
#[derive(Debug, Clone)]
struct SetRule {
    prefix: Vec<u32>,
    wire_type: Option<WireType>,
}

#[derive(Debug, Default)]
struct ReplayState {
    store: BTreeMap<Vec<u32>, VarBind>,
    ops: Vec<WireOp>,
    walk_faults: Vec<Vec<u32>>,
    get_faults: Vec<Vec<u32>>,
    set_rules: Vec<SetRule>,
}

/// Dump-backed `SnmpTransport`.
#[derive(Debug, Default)]
pub struct ReplayTransport {
    target: String,
    state: Mutex<ReplayState>,
}

impl ReplayTransport {
    pub fn new() -> Self {
        Self {
            target: "replay".into(),
            state: Mutex::new(ReplayState::default()),
        }
    }

    /// Build from an iterator of varbinds. Unparseable OIDs are skipped.
    pub fn from_varbinds(varbinds: impl IntoIterator<Item = VarBind>) -> Self {
        let transport = Self::new();
        for vb in varbinds {
            transport.insert(vb);
        }
        transport
    }

    /// Parse `snmpwalk -On` output (numeric OIDs, typed values).
    pub fn from_dump(text: &str) -> Result<Self, Error> {
        let transport = Self::new();
        for vb in parse_dump(text)? {
            transport.insert(vb);
        }
        Ok(transport)
    }

    pub fn from_file(path: impl AsRef<Path>) -> Result<Self, Error> {
        let text = std::fs::read_to_string(path.as_ref())?;
        let mut transport = Self::from_dump(&text)?;
        transport.target = path.as_ref().display().to_string();
        Ok(transport)
    }

    /// Insert or replace one instance.
    pub fn insert(&self, varbind: VarBind) {
        if let Some(key) = oid_arcs(&varbind.oid) {
            self.state.lock().store.insert(key, varbind);
        }
    }

    /// Current value of one instance, if present.
    pub fn value(&self, oid: &str) -> Option<WireValue> {
        let key = oid_arcs(oid)?;
        self.state.lock().store.get(&key).map(|vb| vb.value.clone())
    }

    /// Number of stored instances.
    pub fn len(&self) -> usize {
        self.state.lock().store.len()
    }

    pub fn is_empty(&self) -> bool {
        self.state.lock().store.is_empty()
    }

    /// Make every walk touching `root` time out.
    pub fn fail_walks_under(&self, root: &str) {
        if let Some(key) = oid_arcs(root) {
            self.state.lock().walk_faults.push(key);
        }
    }

    /// Make every GET below `root` time out.
    pub fn fail_gets_under(&self, root: &str) {
        if let Some(key) = oid_arcs(root) {
            self.state.lock().get_faults.push(key);
        }
    }

    /// Reject SETs below `prefix`; with `wire_type`, only values of that type.
    pub fn reject_sets_under(&self, prefix: &str, wire_type: Option<WireType>) {
        if let Some(key) = oid_arcs(prefix) {
            self.state.lock().set_rules.push(SetRule {
                prefix: key,
                wire_type,
            });
        }
    }

    /// All operations observed so far.
    pub fn operations(&self) -> Vec<WireOp> {
        self.state.lock().ops.clone()
    }

    /// Only the SET PDUs observed so far.
    pub fn set_requests(&self) -> Vec<Vec<VarBind>> {
        self.state
            .lock()
            .ops
            .iter()
            .filter_map(|op| match op {
                WireOp::Set { varbinds } => Some(varbinds.clone()),
                _ => None,
            })
            .collect()
    }

    pub fn clear_operations(&self) {
        self.state.lock().ops.clear();
    }

    fn timeout(&self) -> Error {
        Error::Timeout {
            target: self.target.clone(),
            retries: 0,
        }
    }

    fn apply_set(&self, varbinds: Vec<VarBind>) -> Result<(), Error> {
        let mut state = self.state.lock();
        state.ops.push(WireOp::Set {
            varbinds: varbinds.clone(),
        });

        let mut keyed = Vec::with_capacity(varbinds.len());
        for vb in varbinds {
            let key = oid_arcs(&vb.oid).ok_or_else(|| Error::SetRejected {
                oid: vb.oid.clone(),
                reason: "malformed OID".into(),
            })?;
            let rejected = state.set_rules.iter().any(|rule| {
                key.starts_with(&rule.prefix)
                    && rule.wire_type.is_none_or(|t| t == vb.wire_type())
            });
            if rejected {
                trace!(oid = %vb.oid, "replay: rejecting set");
                return Err(Error::SetRejected {
                    oid: vb.oid,
                    reason: "wrongType".into(),
                });
            }
            keyed.push((key, vb));
        }

        // All-or-nothing, like a single SET PDU.
        for (key, vb) in keyed {
            state.store.insert(key, vb);
        }
        Ok(())
    }
}

#[async_trait]
impl SnmpTransport for ReplayTransport {
    async fn get(&self, oid: &str) -> Result<VarBind, Error> {
        let mut state = self.state.lock();
        state.ops.push(WireOp::Get { oid: oid.into() });
        let key = oid_arcs(oid).ok_or_else(|| Error::NoSuchObject { oid: oid.into() })?;
        if state.get_faults.iter().any(|f| key.starts_with(f)) {
            return Err(self.timeout());
        }
        state
            .store
            .get(&key)
            .cloned()
            .ok_or_else(|| Error::NoSuchObject { oid: oid.into() })
    }

    async fn walk(&self, root: &str, _max_repetitions: u32) -> Result<Vec<VarBind>, Error> {
        let mut state = self.state.lock();
        state.ops.push(WireOp::Walk { root: root.into() });
        let Some(key) = oid_arcs(root) else {
            return Ok(Vec::new());
        };
        if state
            .walk_faults
            .iter()
            .any(|f| key.starts_with(f) || f.starts_with(&key))
        {
            return Err(self.timeout());
        }
        Ok(state
            .store
            .range(key.clone()..)
            .take_while(|(k, _)| k.starts_with(&key))
            .filter(|(k, _)| k.len() > key.len())
            .map(|(_, vb)| vb.clone())
            .collect())
    }

    async fn set(&self, varbind: VarBind) -> Result<(), Error> {
        self.apply_set(vec![varbind])
    }

    async fn set_multiple(&self, varbinds: Vec<VarBind>) -> Result<(), Error> {
        self.apply_set(varbinds)
    }
}

// ── Dump parsing ────────────────────────────────────────────────────

/// Split a dotted OID into numeric arcs.
fn oid_arcs(oid: &str) -> Option<Vec<u32>> {
    let trimmed = oid.trim().trim_start_matches('.');
    if trimmed.is_empty() {
        return None;
    }
    trimmed.split('.').map(|arc| arc.parse().ok()).collect()
}

fn is_entry_start(line: &str) -> Option<(&str, &str)> {
    let (oid, rest) = line.split_once(" = ")?;
    let oid = oid.trim();
    let numeric = oid
        .trim_start_matches('.')
        .chars()
        .all(|c| c.is_ascii_digit() || c == '.');
    (numeric && oid.contains('.')).then_some((oid, rest))
}

/// Parse `snmpwalk -On` text into varbinds.
///
/// Values wrapped over several lines (long Hex-STRINGs, multi-line STRINGs)
/// are joined back before parsing. `No Such ...` rows are dropped.
pub fn parse_dump(text: &str) -> Result<Vec<VarBind>, Error> {
    let mut entries: Vec<(usize, String, String)> = Vec::new();

    for (idx, line) in text.lines().enumerate() {
        let line_no = idx + 1;
        if line.trim().is_empty() || line.trim_start().starts_with('#') {
            continue;
        }
        if let Some((oid, rest)) = is_entry_start(line) {
            entries.push((line_no, oid.to_owned(), rest.to_owned()));
        } else if let Some((_, _, raw)) = entries.last_mut() {
            raw.push('\n');
            raw.push_str(line);
        } else {
            return Err(Error::Parse {
                line: line_no,
                message: "continuation line before first entry".into(),
            });
        }
    }

    let mut out = Vec::with_capacity(entries.len());
    for (line, oid, raw) in entries {
        if let Some(value) = parse_value(&raw).map_err(|message| Error::Parse { line, message })? {
            out.push(VarBind::new(oid, value));
        }
    }
    Ok(out)
}

fn parse_value(raw: &str) -> Result<Option<WireValue>, String> {
    let raw = raw.trim();
    if raw == "\"\"" {
        return Ok(Some(WireValue::OctetString(Vec::new())));
    }
    if raw.starts_with("No Such") || raw.starts_with("No more variables") {
        return Ok(None);
    }
    let (ty, val) = raw
        .split_once(':')
        .ok_or_else(|| format!("missing type tag in '{raw}'"))?;
    let val = val.trim();

    let value = match ty.trim() {
        "INTEGER" => WireValue::Integer(parse_enum_int(val)?),
        "STRING" => WireValue::OctetString(unquote(val).into_bytes()),
        "Hex-STRING" | "Opaque" => WireValue::OctetString(parse_hex(val)?),
        "BITS" => WireValue::OctetString(parse_hex_prefix(val)),
        "OID" => WireValue::ObjectIdentifier(val.to_owned()),
        "IpAddress" => WireValue::IpAddress(
            val.parse::<Ipv4Addr>()
                .map_err(|e| format!("bad IpAddress '{val}': {e}"))?,
        ),
        "Counter32" => WireValue::Counter32(parse_num(val)?),
        "Gauge32" | "Unsigned32" => WireValue::Gauge32(parse_num(val)?),
        "Counter64" => WireValue::Counter64(parse_num(val)?),
        "Timeticks" => {
            let inner = val
                .strip_prefix('(')
                .and_then(|v| v.split_once(')'))
                .map_or(val, |(n, _)| n);
            WireValue::TimeTicks(parse_num(inner)?)
        }
        "NULL" => WireValue::Null,
        other => return Err(format!("unsupported type tag '{other}'")),
    };
    Ok(Some(value))
}

/// Accepts `5`, `-3`, and the symbolic `up(1)` form.
fn parse_enum_int(val: &str) -> Result<i64, String> {
    let digits = match (val.find('('), val.rfind(')')) {
        (Some(open), Some(close)) if open < close => &val[open + 1..close],
        _ => val,
    };
    digits
        .trim()
        .parse()
        .map_err(|e| format!("bad INTEGER '{val}': {e}"))
}

fn parse_num<T: std::str::FromStr>(val: &str) -> Result<T, String>
where
    T::Err: std::fmt::Display,
{
    let token = val.split_whitespace().next().unwrap_or_default();
    token.parse().map_err(|e| format!("bad number '{val}': {e}"))
}

fn parse_hex(val: &str) -> Result<Vec<u8>, String> {
    val.split_whitespace()
        .map(|b| u8::from_str_radix(b, 16).map_err(|e| format!("bad hex byte '{b}': {e}")))
        .collect()
}

/// `BITS: 80 00 bridge(2)` keeps only the leading hex octets.
fn parse_hex_prefix(val: &str) -> Vec<u8> {
    val.split_whitespace()
        .map_while(|b| {
            if b.len() == 2 {
                u8::from_str_radix(b, 16).ok()
            } else {
                None
            }
        })
        .collect()
}

fn unquote(val: &str) -> String {
    let inner = val
        .strip_prefix('"')
        .and_then(|v| v.strip_suffix('"'))
        .unwrap_or(val);
    inner.replace("\\\"", "\"").replace("\\\\", "\\")
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn parses_common_value_types() {
        let dump = r#"
.1.3.6.1.2.1.1.5.0 = STRING: "core-sw1"
.1.3.6.1.2.1.2.2.1.7.1 = INTEGER: up(1)
.1.3.6.1.2.1.2.2.1.5.1 = Gauge32: 1000000000
.1.3.6.1.2.1.1.3.0 = Timeticks: (4821) 0:00:48.21
.1.3.6.1.2.1.1.2.0 = OID: .1.3.6.1.4.1.9.1.1208
.1.3.6.1.2.1.4.22.1.3.1.10.0.0.1 = IpAddress: 10.0.0.1
.1.3.6.1.2.1.31.1.1.1.18.1 = ""
"#;
        let vbs = parse_dump(dump).unwrap();
        assert_eq!(vbs.len(), 7);
        assert_eq!(vbs[0].value, WireValue::string("core-sw1"));
        assert_eq!(vbs[1].value, WireValue::Integer(1));
        assert_eq!(vbs[2].value, WireValue::Gauge32(1_000_000_000));
        assert_eq!(vbs[3].value, WireValue::TimeTicks(4821));
        assert_eq!(
            vbs[4].value,
            WireValue::ObjectIdentifier(".1.3.6.1.4.1.9.1.1208".into())
        );
        assert_eq!(vbs[6].value, WireValue::OctetString(Vec::new()));
    }

    #[test]
    fn joins_wrapped_hex_strings() {
        let dump = ".1.3.6.1.2.1.17.7.1.4.3.1.2.10 = Hex-STRING: 80 00 00 00\n00 01\n";
        let vbs = parse_dump(dump).unwrap();
        assert_eq!(
            vbs[0].value,
            WireValue::OctetString(vec![0x80, 0, 0, 0, 0, 0x01])
        );
    }

    #[test]
    fn drops_no_such_rows() {
        let dump = ".1.3.6.1.2.1.105.1.1.1.3 = No Such Object available on this agent at this OID\n";
        assert!(parse_dump(dump).unwrap().is_empty());
    }

    #[test]
    fn rejects_unknown_type_tag() {
        let err = parse_dump(".1.3.6.1.2.1.1.5.0 = Wibble: 3\n").unwrap_err();
        assert!(matches!(err, Error::Parse { line: 1, .. }));
    }

    #[test]
    fn numeric_ordering_beats_text_ordering() {
        assert!(oid_arcs(".1.3.6.1.2.1.2.2.1.1.2") < oid_arcs(".1.3.6.1.2.1.2.2.1.1.10"));
    }
}
