//! Composition planning: integrated versus separated fragments.
//!
//! A fragment joins the integrated (shared) bucket only when all of the
//! following hold:
//!
//! - it is descriptive,
//! - its exact text occurs in at least two descriptive fragments,
//! - it is not a conflict member,
//! - it is not normative.
//!
//! Every other fragment goes to the separated bucket keyed by its
//! provenance and its sorted role set. Buckets appear in first-seen order
//! and keep the original relative order of their fragments.
//!
//! Recurrence uses exact string equality on the trimmed text. Changing it
//! (e.g. normalizing whitespace) changes which fragments integrate.

use serde::Serialize;
use std::collections::{BTreeSet, HashMap};

use crate::conflict::conflict_members;
use crate::models::Fragment;
use crate::roles::{CueLexicon, Role, RoleSet};

/// Key of a separated bucket.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
pub struct GroupKey {
    pub provenance: String,
    pub roles: RoleSet,
}

/// A fragment's position in the input and its text.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PlannedFragment {
    pub index: usize,
    pub text: String,
}

/// Fragments kept apart under one provenance and role signature.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SeparatedGroup {
    pub key: GroupKey,
    pub fragments: Vec<PlannedFragment>,
}

/// Where a fragment ended up.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(tag = "bucket", content = "group", rename_all = "lowercase")]
pub enum Placement {
    Integrated,
    /// Position of the group in [`PartitionPlan::separated`].
    Separated(usize),
}

/// Final bucket assignment, decided once before rendering.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct PartitionPlan {
    pub integrated: Vec<PlannedFragment>,
    pub separated: Vec<SeparatedGroup>,
}

impl PartitionPlan {
    /// Total number of planned fragments across all buckets.
    pub fn len(&self) -> usize {
        self.integrated.len()
            + self
                .separated
                .iter()
                .map(|g| g.fragments.len())
                .sum::<usize>()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Bucket holding the fragment at `index`, if it was planned.
    pub fn placement(&self, index: usize) -> Option<Placement> {
        if self.integrated.iter().any(|f| f.index == index) {
            return Some(Placement::Integrated);
        }
        self.separated
            .iter()
            .position(|g| g.fragments.iter().any(|f| f.index == index))
            .map(Placement::Separated)
    }
}

/// Occurrences of each text among descriptive fragments, not deduplicated.
pub fn recurrence_counts(fragments: &[Fragment]) -> HashMap<&str, usize> {
    let mut counts = HashMap::new();
    for f in fragments {
        if f.roles.contains(&Role::Descriptive) {
            *counts.entry(f.text.as_str()).or_insert(0) += 1;
        }
    }
    counts
}

/// Partition fragments given a precomputed conflict set.
pub fn plan_composition(fragments: &[Fragment], conflicts: &BTreeSet<usize>) -> PartitionPlan {
    let counts = recurrence_counts(fragments);

    let mut plan = PartitionPlan::default();
    let mut group_positions: HashMap<GroupKey, usize> = HashMap::new();

    for (idx, f) in fragments.iter().enumerate() {
        let planned = PlannedFragment {
            index: idx,
            text: f.text.clone(),
        };

        let integrable = f.roles.contains(&Role::Descriptive)
            && counts.get(f.text.as_str()).copied().unwrap_or(0) >= 2
            && !conflicts.contains(&idx)
            && !f.roles.contains(&Role::Normative);

        if integrable {
            plan.integrated.push(planned);
            continue;
        }

        let key = GroupKey {
            provenance: f.provenance.clone(),
            roles: f.roles.clone(),
        };
        let pos = *group_positions.entry(key.clone()).or_insert_with(|| {
            plan.separated.push(SeparatedGroup {
                key,
                fragments: Vec::new(),
            });
            plan.separated.len() - 1
        });
        plan.separated[pos].fragments.push(planned);
    }

    tracing::debug!(
        integrated = plan.integrated.len(),
        groups = plan.separated.len(),
        conflicts = conflicts.len(),
        "composition planned"
    );

    plan
}

/// Compute the conflict set and partition in one step.
pub fn plan_fragments(lexicon: &CueLexicon, fragments: &[Fragment]) -> PartitionPlan {
    let conflicts = conflict_members(lexicon, fragments);
    plan_composition(fragments, &conflicts)
}
