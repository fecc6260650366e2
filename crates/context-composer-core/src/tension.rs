//! Ordinal tension between two fragments.
//!
//! # Algorithm
//!
//! 1. Base level: the maximum of the role-pair table over every
//!    combination of the two role sets.
//! 2. Advance one step if the fragments come from different providers.
//! 3. Advance one step if both texts contain a normative cue. This re-scans
//!    the text directly instead of trusting the role sets.
//!
//! Both steps saturate at [`Tension::High`], so once a pair is `high` no
//! escalation changes it and the two steps commute.

use serde::Serialize;
use std::fmt;

use crate::models::Fragment;
use crate::roles::{CueLexicon, Role, RoleSet};

/// Ordinal conflict level: `Low < Medium < High`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Tension {
    Low,
    Medium,
    High,
}

impl Tension {
    /// One step up the scale, capped at `High`.
    pub fn advance(self) -> Self {
        match self {
            Tension::Low => Tension::Medium,
            Tension::Medium | Tension::High => Tension::High,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Tension::Low => "low",
            Tension::Medium => "medium",
            Tension::High => "high",
        }
    }
}

impl fmt::Display for Tension {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

use self::Tension::{High as H, Low as L, Medium as M};

/// Role-pair tension, indexed by [`Role::ALL`] order on both axes:
/// alternative, descriptive, normative, orientative.
///
/// Every ordered pair is listed and the matrix is symmetric.
const ROLE_TENSION: [[Tension; 4]; 4] = [
    // alt  desc norm orient
    [M, M, H, M], // alternative
    [M, L, M, L], // descriptive
    [H, M, H, M], // normative
    [M, L, M, L], // orientative
];

/// Tension of a single role pair.
pub fn role_pair_tension(a: Role, b: Role) -> Tension {
    ROLE_TENSION[a.index()][b.index()]
}

/// Maximum role-pair tension across two role sets.
pub fn base_tension(roles_a: &RoleSet, roles_b: &RoleSet) -> Tension {
    roles_a
        .iter()
        .flat_map(|&ra| roles_b.iter().map(move |&rb| role_pair_tension(ra, rb)))
        .max()
        .unwrap_or(Tension::Low)
}

/// Full tension of a fragment pair, including provenance and deontic
/// escalation.
pub fn pair_tension(lexicon: &CueLexicon, a: &Fragment, b: &Fragment) -> Tension {
    let mut level = base_tension(&a.roles, &b.roles);

    if a.provenance != b.provenance {
        level = level.advance();
    }

    if lexicon.has_cue(Role::Normative, &a.text) && lexicon.has_cue(Role::Normative, &b.text) {
        level = level.advance();
    }

    level
}
