// ── OID dispatcher ──
//
// Turns walked (oid, value) pairs into model mutations. Each family of
// handlers is registered as a (branch, handler) table; the chain runs the
// vendor table first, then the generic one, each ordered most-specific
// branch first. The first handler that returns `true` wins.

pub mod cisco;
pub mod comware;
pub mod generic;
pub mod joins;

use switchyard_api::{VarBind, WireValue};

use crate::coerce::{Value, coerce};
use crate::model::{Device, Vendor};
use crate::oids::oid_in_branch;

/// Handler invoked with the instance suffix below its branch.
pub type Handler = fn(&mut Device, &str, &Value) -> bool;

#[derive(Clone, Copy)]
pub struct Matcher {
    pub branch: &'static str,
    pub handler: Handler,
}

impl Matcher {
    pub const fn new(branch: &'static str, handler: Handler) -> Self {
        Self { branch, handler }
    }
}

impl std::fmt::Debug for Matcher {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Matcher").field("branch", &self.branch).finish()
    }
}

#[derive(Debug, Clone)]
pub struct Dispatcher {
    chain: Vec<Matcher>,
}

impl Dispatcher {
    /// Generic matchers only.
    pub fn generic() -> Self {
        Self::with_vendor(&[])
    }

    /// Vendor matchers ahead of the generic ones.
    pub fn with_vendor(vendor: &[Matcher]) -> Self {
        let mut chain = most_specific_first(vendor);
        chain.extend(most_specific_first(generic::MATCHERS));
        Self { chain }
    }

    pub fn for_vendor(vendor: Vendor) -> Self {
        match vendor {
            Vendor::CiscoVtp => Self::with_vendor(cisco::VTP_MATCHERS),
            Vendor::CiscoSb => Self::with_vendor(cisco::SB_MATCHERS),
            Vendor::Comware => Self::with_vendor(comware::MATCHERS),
            Vendor::Generic | Vendor::Juniper => Self::generic(),
        }
    }

    /// Feed one walked value into the model. Returns `false` when no
    /// handler claimed it; unknown data is ignored, never an error.
    pub fn parse(&self, device: &mut Device, oid: &str, raw: &WireValue) -> bool {
        let value = coerce(oid, raw);
        for matcher in &self.chain {
            let Some(suffix) = oid_in_branch(matcher.branch, oid) else {
                continue;
            };
            if (matcher.handler)(device, suffix, &value) {
                return true;
            }
        }
        false
    }

    /// Feed a whole walk. Returns how many values were handled.
    pub fn parse_all(&self, device: &mut Device, varbinds: &[VarBind]) -> usize {
        varbinds
            .iter()
            .filter(|vb| self.parse(device, &vb.oid, &vb.value))
            .count()
    }

    /// Branch of the first matcher whose prefix covers `oid`.
    pub fn claimant(&self, oid: &str) -> Option<&'static str> {
        self.chain
            .iter()
            .find(|m| oid_in_branch(m.branch, oid).is_some())
            .map(|m| m.branch)
    }
}

fn most_specific_first(table: &[Matcher]) -> Vec<Matcher> {
    let mut sorted = table.to_vec();
    sorted.sort_by_key(|m| std::cmp::Reverse(arc_count(m.branch)));
    sorted
}

fn arc_count(branch: &str) -> usize {
    branch.trim_start_matches('.').split('.').count()
}

// ── Shared suffix helpers ────────────────────────────────────────────

/// Single-arc suffix as an index (ifIndex, bridge port, VLAN).
pub(crate) fn index(suffix: &str) -> Option<u32> {
    suffix.parse().ok()
}

/// Apply `f` to the interface keyed by a single-arc ifIndex suffix.
/// Unknown interfaces are a no-op, but the value still counts as handled.
pub(crate) fn with_interface(
    device: &mut Device,
    suffix: &str,
    f: impl FnOnce(&mut crate::model::Interface),
) -> bool {
    let Some(if_index) = index(suffix) else {
        return false;
    };
    if let Some(iface) = device.interface_mut(if_index) {
        f(iface);
    }
    true
}
