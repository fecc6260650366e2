//! Comparison baselines that ignore roles and tension.

use crate::models::Fragment;
use crate::render::{header, BLOCK_SEPARATOR};

/// Every fragment in retrieval order, tagged with its provenance:
/// `[dp1] text`.
pub fn flat_concatenation(fragments: &[Fragment]) -> String {
    fragments
        .iter()
        .map(|f| format!("[{}] {}", f.provenance, f.text))
        .collect::<Vec<_>>()
        .join(BLOCK_SEPARATOR)
}

/// One block per provenance, in first-seen order:
///
/// ```text
/// === Fragments from dp1 ===
///
/// text
/// ```
pub fn provider_grouping(fragments: &[Fragment]) -> String {
    let mut groups: Vec<(&str, Vec<&str>)> = Vec::new();
    for f in fragments {
        match groups.iter().position(|(p, _)| *p == f.provenance) {
            Some(i) => groups[i].1.push(f.text.as_str()),
            None => groups.push((f.provenance.as_str(), vec![f.text.as_str()])),
        }
    }

    groups
        .into_iter()
        .map(|(provenance, texts)| {
            format!(
                "{}{}{}",
                header(&format!("Fragments from {}", provenance)),
                BLOCK_SEPARATOR,
                texts.join(BLOCK_SEPARATOR)
            )
        })
        .collect::<Vec<_>>()
        .join(BLOCK_SEPARATOR)
}
