//! Decision trace for a semantic composition.
//!
//! `ctxc explain` shows why each fragment was integrated or separated:
//! its roles, every pair at `medium` or above, the conflict set, and the
//! final bucket.

use anyhow::Result;
use context_composer_core::conflict::{pair_tensions, PairTension};
use context_composer_core::models::Fragment;
use context_composer_core::plan::{plan_composition, recurrence_counts, Placement};
use context_composer_core::roles::{role_label, CueLexicon, RoleSet};
use context_composer_core::tension::Tension;
use serde::Serialize;
use std::collections::BTreeSet;

/// Per-fragment decision details.
#[derive(Debug, Clone, Serialize)]
pub struct FragmentTrace {
    pub index: usize,
    pub provenance: String,
    pub roles: RoleSet,
    pub recurrence: usize,
    pub conflict: bool,
    pub placement: Placement,
    pub preview: String,
}

/// Full decision trace for one composition.
#[derive(Debug, Clone, Serialize)]
pub struct Explanation {
    pub fragments: Vec<FragmentTrace>,
    /// Pairs at `medium` or `high`.
    pub pairs: Vec<PairTension>,
    pub conflicts: Vec<usize>,
    pub integrated: usize,
    pub groups: usize,
}

const PREVIEW_CHARS: usize = 60;

pub fn explain(lexicon: &CueLexicon, fragments: &[Fragment]) -> Explanation {
    let pairs = pair_tensions(lexicon, fragments);
    let conflicts: BTreeSet<usize> = pairs
        .iter()
        .filter(|p| p.tension == Tension::High)
        .flat_map(|p| [p.left, p.right])
        .collect();
    let plan = plan_composition(fragments, &conflicts);
    let counts = recurrence_counts(fragments);

    let traces = fragments
        .iter()
        .enumerate()
        .map(|(index, f)| FragmentTrace {
            index,
            provenance: f.provenance.clone(),
            roles: f.roles.clone(),
            recurrence: counts.get(f.text.as_str()).copied().unwrap_or(0),
            conflict: conflicts.contains(&index),
            placement: plan.placement(index).unwrap_or(Placement::Integrated),
            preview: preview(&f.text, PREVIEW_CHARS),
        })
        .collect();

    Explanation {
        fragments: traces,
        pairs: pairs
            .into_iter()
            .filter(|p| p.tension >= Tension::Medium)
            .collect(),
        conflicts: conflicts.into_iter().collect(),
        integrated: plan.integrated.len(),
        groups: plan.separated.len(),
    }
}

/// First `max_chars` characters, with an ellipsis when truncated.
pub fn preview(text: &str, max_chars: usize) -> String {
    let flat = text.replace('\n', " ");
    match flat.char_indices().nth(max_chars) {
        Some((cut, _)) => format!("{}…", &flat[..cut]),
        None => flat,
    }
}

pub fn print_explanation(explanation: &Explanation, json: bool) -> Result<()> {
    if json {
        println!("{}", serde_json::to_string_pretty(explanation)?);
        return Ok(());
    }

    println!("Fragments:");
    for f in &explanation.fragments {
        let roles = role_label(&f.roles);
        let bucket = match f.placement {
            Placement::Integrated => "integrated".to_string(),
            Placement::Separated(g) => format!("group {}", g),
        };
        println!(
            "  #{:<3} {:<12} ({}) recurrence={} conflict={} -> {}",
            f.index, f.provenance, roles, f.recurrence, f.conflict, bucket
        );
        println!("        {}", f.preview);
    }

    println!();
    println!("Tension (medium and above):");
    if explanation.pairs.is_empty() {
        println!("  none");
    }
    for p in &explanation.pairs {
        println!("  #{} - #{}: {}", p.left, p.right, p.tension);
    }

    println!();
    println!(
        "integrated: {}  groups: {}  conflicts: {:?}",
        explanation.integrated, explanation.groups, explanation.conflicts
    );

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn frags(items: &[(&str, &str)]) -> Vec<Fragment> {
        let lexicon = CueLexicon::default();
        items
            .iter()
            .map(|(t, d)| Fragment::new(t, *d, &lexicon))
            .collect()
    }

    #[test]
    fn test_explain_traces_every_fragment() {
        let f = frags(&[
            ("Texto común.", "dp1"),
            ("Texto común.", "dp1"),
            ("Debe cumplir.", "dp2"),
        ]);
        let e = explain(&CueLexicon::default(), &f);
        assert_eq!(e.fragments.len(), 3);
        assert_eq!(e.conflicts, vec![0, 1, 2]);
        assert_eq!(e.integrated, 0);
        assert!(e.fragments.iter().all(|t| t.conflict));
        assert_eq!(e.fragments[0].recurrence, 2);
        assert_eq!(e.fragments[2].recurrence, 0);
    }

    #[test]
    fn test_low_pairs_are_omitted() {
        let f = frags(&[("Texto común.", "dp1"), ("Texto común.", "dp1")]);
        let e = explain(&CueLexicon::default(), &f);
        assert!(e.pairs.is_empty());
        assert_eq!(e.integrated, 2);
        assert_eq!(e.fragments[1].placement, Placement::Integrated);
    }

    #[test]
    fn test_preview_truncates_on_char_boundary() {
        assert_eq!(preview("añejo", 2), "añ…");
        assert_eq!(preview("corto", 10), "corto");
        assert_eq!(preview("a\nb", 10), "a b");
    }
}
