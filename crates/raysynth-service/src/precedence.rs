//! Merge precedence between computed and user-authored service fields
//!
//! Every merged field names which side wins a key collision and which keys
//! survive. The head service rules are:
//!
//! | Field       | Base                 | Overlay              | Winner  | Keys      |
//! |-------------|----------------------|----------------------|---------|-----------|
//! | selector    | default labels       | pod template labels  | overlay | base only |
//! | labels      | final selector       | user labels          | base    | union     |
//! | annotations | caller annotations   | user annotations     | base    | union     |
//! | ports       | resolved ports       | user ports           | overlay | union     |

use std::collections::{BTreeMap, BTreeSet};

use raysynth_common::k8s::ServicePort;
use raysynth_common::{Error, Result};

/// Which side of a merge wins on a key collision
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Side {
    /// The computed (base) value is kept
    Base,
    /// The overlay value replaces the base value
    Overlay,
}

/// Which keys appear in a merge result
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum KeyScope {
    /// Keys from both sides
    Union,
    /// Only keys the base already has
    BaseOnly,
}

/// Rule for merging one field
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Precedence {
    /// Collision winner
    pub winner: Side,
    /// Surviving keys
    pub keys: KeyScope,
}

impl Precedence {
    /// Union of keys, base wins collisions
    pub const BASE_WINS: Self = Self {
        winner: Side::Base,
        keys: KeyScope::Union,
    };

    /// Union of keys, overlay wins collisions
    pub const OVERLAY_WINS: Self = Self {
        winner: Side::Overlay,
        keys: KeyScope::Union,
    };

    /// Base keys only, overlay supplies their values
    pub const OVERLAY_VALUES_ONLY: Self = Self {
        winner: Side::Overlay,
        keys: KeyScope::BaseOnly,
    };
}

/// Merge rules for every field of the head service
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct MergePrecedence {
    /// Default labels vs. pod template labels
    pub selector: Precedence,
    /// Selector vs. user labels
    pub labels: Precedence,
    /// Caller annotations vs. user annotations
    pub annotations: Precedence,
    /// Resolved ports vs. user ports
    pub ports: Precedence,
}

impl MergePrecedence {
    /// The head service rules
    pub const HEAD_SERVICE: Self = Self {
        selector: Precedence::OVERLAY_VALUES_ONLY,
        labels: Precedence::BASE_WINS,
        annotations: Precedence::BASE_WINS,
        ports: Precedence::OVERLAY_WINS,
    };
}

impl Default for MergePrecedence {
    fn default() -> Self {
        Self::HEAD_SERVICE
    }
}

/// Merge two string maps under a rule
pub fn merge_maps(
    base: &BTreeMap<String, String>,
    overlay: &BTreeMap<String, String>,
    rule: Precedence,
) -> BTreeMap<String, String> {
    let mut merged = base.clone();
    for (key, value) in overlay {
        let in_base = base.contains_key(key);
        match (in_base, rule.winner, rule.keys) {
            (true, Side::Overlay, _) => {
                merged.insert(key.clone(), value.clone());
            }
            (false, _, KeyScope::Union) => {
                merged.insert(key.clone(), value.clone());
            }
            _ => {}
        }
    }
    merged
}

/// Merge user ports into computed ports under a rule.
///
/// Ports are matched by name. A colliding overlay port takes the base port's
/// position when the overlay wins; non-colliding overlay ports (including
/// unnamed ones) follow in overlay order. Duplicate names in the overlay are
/// rejected.
pub fn merge_ports(
    base: Vec<ServicePort>,
    overlay: &[ServicePort],
    rule: Precedence,
) -> Result<Vec<ServicePort>> {
    let mut seen = BTreeSet::new();
    for name in overlay.iter().filter_map(|p| p.name.as_deref()) {
        if !seen.insert(name) {
            return Err(Error::duplicate_port(name, "head service override ports"));
        }
    }

    let mut merged = base;
    for port in overlay {
        let existing = port
            .name
            .as_deref()
            .and_then(|name| merged.iter().position(|p| p.name.as_deref() == Some(name)));
        match (existing, rule.winner, rule.keys) {
            (Some(i), Side::Overlay, _) => merged[i] = port.clone(),
            (None, _, KeyScope::Union) => merged.push(port.clone()),
            _ => {}
        }
    }
    Ok(merged)
}
