//! Rendering a [`PartitionPlan`] into a single context string, and parsing
//! it back into labeled blocks.
//!
//! # Layout
//!
//! ```text
//! === Contexto común (integrado) ===
//! <text>
//!
//! <text>
//!
//! === dp1 (alternative, normative) ===
//! <text>
//! ```
//!
//! Blocks are separated by a blank line. Header lines start with
//! [`HEADER_MARKER`] followed by a space and end with a space followed by
//! [`HEADER_MARKER`].

use serde::Serialize;

use crate::plan::{PartitionPlan, PlannedFragment};
use crate::roles::role_label;

/// Delimiter on both sides of a header.
pub const HEADER_MARKER: &str = "===";

/// Title of the integrated block.
pub const INTEGRATED_TITLE: &str = "Contexto común (integrado)";

/// Separator between fragments and between blocks.
pub const BLOCK_SEPARATOR: &str = "\n\n";

/// Wrap a title in header markers: `=== title ===`.
pub fn header(title: &str) -> String {
    format!("{HEADER_MARKER} {title} {HEADER_MARKER}")
}

fn join_texts(fragments: &[PlannedFragment]) -> String {
    fragments
        .iter()
        .map(|f| f.text.as_str())
        .collect::<Vec<_>>()
        .join(BLOCK_SEPARATOR)
}

/// Serialize a plan. An empty plan renders as the empty string.
pub fn render(plan: &PartitionPlan) -> String {
    let mut blocks = Vec::with_capacity(plan.separated.len() + 1);

    if !plan.integrated.is_empty() {
        blocks.push(format!(
            "{}\n{}",
            header(INTEGRATED_TITLE),
            join_texts(&plan.integrated)
        ));
    }

    for group in &plan.separated {
        let title = format!("{} ({})", group.key.provenance, role_label(&group.key.roles));
        blocks.push(format!("{}\n{}", header(&title), join_texts(&group.fragments)));
    }

    blocks.join(BLOCK_SEPARATOR)
}

/// Label recovered from a header line.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "lowercase")]
pub enum BlockLabel {
    /// The shared, integrated block.
    Integrated,
    /// A separated group: provenance plus role names.
    Group {
        provenance: String,
        roles: Vec<String>,
    },
    /// Any other header, e.g. `Fragments from dp1` from provider grouping.
    Other { title: String },
}

/// A block of a rendered context.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RenderedBlock {
    pub label: BlockLabel,
    pub body: String,
}

fn header_title(line: &str) -> Option<&str> {
    let inner = line
        .strip_prefix(HEADER_MARKER)?
        .strip_suffix(HEADER_MARKER)?;
    let title = inner.strip_prefix(' ')?.strip_suffix(' ')?;
    Some(title)
}

fn classify(title: &str) -> BlockLabel {
    if title == INTEGRATED_TITLE {
        return BlockLabel::Integrated;
    }
    if let Some(open) = title.rfind(" (") {
        if let Some(roles) = title[open + 2..].strip_suffix(')') {
            return BlockLabel::Group {
                provenance: title[..open].to_string(),
                roles: roles.split(", ").map(str::to_string).collect(),
            };
        }
    }
    BlockLabel::Other {
        title: title.to_string(),
    }
}

/// Split a rendered context into labeled blocks.
///
/// Text before the first header (e.g. flat concatenation output) is
/// dropped. A fragment line that itself looks like a header starts a new
/// block; rendered texts are not escaped.
pub fn parse_blocks(rendered: &str) -> Vec<RenderedBlock> {
    let mut blocks: Vec<RenderedBlock> = Vec::new();
    let mut current: Option<(BlockLabel, Vec<&str>)> = None;

    for line in rendered.lines() {
        if let Some(title) = header_title(line) {
            if let Some((label, lines)) = current.take() {
                blocks.push(finish_block(label, &lines));
            }
            current = Some((classify(title), Vec::new()));
        } else if let Some((_, lines)) = current.as_mut() {
            lines.push(line);
        }
    }
    if let Some((label, lines)) = current {
        blocks.push(finish_block(label, &lines));
    }

    blocks
}

fn finish_block(label: BlockLabel, lines: &[&str]) -> RenderedBlock {
    RenderedBlock {
        label,
        body: lines.join("\n").trim_matches('\n').to_string(),
    }
}

/// Remove header lines, keeping only fragment text.
pub fn strip_headers(rendered: &str) -> String {
    rendered
        .lines()
        .filter(|line| header_title(line).is_none())
        .collect::<Vec<_>>()
        .join("\n")
        .trim_matches('\n')
        .to_string()
}
