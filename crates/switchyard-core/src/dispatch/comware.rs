// ── Comware (HH3C) handlers ──

use super::{Matcher, with_interface};
use crate::coerce::Value;
use crate::model::{Device, PortMode};
use crate::oids;

pub(crate) static MATCHERS: &[Matcher] = &[Matcher::new(oids::HH3C_IF_VLAN_TYPE, if_vlan_type)];

/// `hh3cifVLANType` values.
pub mod link_type {
    pub const ACCESS: i64 = 1;
    pub const TRUNK: i64 = 2;
    pub const HYBRID: i64 = 3;
}

fn if_vlan_type(d: &mut Device, suffix: &str, v: &Value) -> bool {
    let mode = match v.as_int().unwrap_or(0) {
        link_type::ACCESS => PortMode::Access,
        link_type::TRUNK => PortMode::Trunk,
        link_type::HYBRID => PortMode::Hybrid,
        other => PortMode::Other(u32::try_from(other).unwrap_or(0)),
    };
    with_interface(d, suffix, |i| {
        i.mode = mode;
        if mode == PortMode::Trunk {
            i.is_tagged = true;
        }
    })
}
