//! Conflict graph over all fragment pairs.
//!
//! A fragment is a conflict member when it takes part in at least one
//! pair whose tension is [`Tension::High`]. The set is recomputed for
//! every composition call.

use serde::Serialize;
use std::collections::BTreeSet;

use crate::models::Fragment;
use crate::roles::CueLexicon;
use crate::tension::{pair_tension, Tension};

/// Tension of one unordered fragment pair, `left < right`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct PairTension {
    pub left: usize,
    pub right: usize,
    pub tension: Tension,
}

/// Evaluate every unordered pair `(i, j)` with `i < j`.
pub fn pair_tensions(lexicon: &CueLexicon, fragments: &[Fragment]) -> Vec<PairTension> {
    let mut pairs = Vec::with_capacity(fragments.len() * fragments.len().saturating_sub(1) / 2);
    for (i, a) in fragments.iter().enumerate() {
        for (j, b) in fragments.iter().enumerate().skip(i + 1) {
            pairs.push(PairTension {
                left: i,
                right: j,
                tension: pair_tension(lexicon, a, b),
            });
        }
    }
    pairs
}

/// Indices of fragments involved in at least one high-tension pair.
pub fn conflict_members(lexicon: &CueLexicon, fragments: &[Fragment]) -> BTreeSet<usize> {
    let mut members = BTreeSet::new();
    for pair in pair_tensions(lexicon, fragments) {
        if pair.tension == Tension::High {
            tracing::debug!(
                left = pair.left,
                right = pair.right,
                "high tension between fragments"
            );
            members.insert(pair.left);
            members.insert(pair.right);
        }
    }
    members
}
