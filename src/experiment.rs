//! Side-by-side comparison of the three composition strategies.
//!
//! For every query in a batch the same retrieved records are composed
//! with each strategy. The log records build latency, a SHA-256 digest of
//! every context, a header-stripped preview, and the size of the prompt
//! that would be sent to a model. Model calls are left to the caller.

use anyhow::{Context, Result};
use chrono::Utc;
use context_composer_core::models::fragments_from_retrieved;
use context_composer_core::render::strip_headers;
use context_composer_core::roles::CueLexicon;
use context_composer_core::strategy::{builder_for, Strategy};
use serde::Serialize;
use sha2::{Digest, Sha256};
use std::collections::BTreeMap;
use std::path::Path;
use std::time::Instant;
use uuid::Uuid;

use crate::input::QueryResults;
use crate::prompt::render_prompt;

#[derive(Debug, Clone, Serialize)]
pub struct ExperimentLog {
    pub run_id: String,
    pub generated_at: String,
    pub entries: Vec<ExperimentEntry>,
}

/// Per-query measurements, keyed by system label (`S1_base`, …).
#[derive(Debug, Clone, Serialize)]
pub struct ExperimentEntry {
    pub query_index: usize,
    pub query: String,
    pub retrieved_fragments: usize,
    pub build_latency_ms: BTreeMap<String, f64>,
    pub context_digest: BTreeMap<String, String>,
    pub contexts_preview: BTreeMap<String, String>,
    pub stripped_preview: BTreeMap<String, String>,
    pub prompt_chars: BTreeMap<String, usize>,
}

/// Compose every query with every strategy.
pub fn run_experiment(
    batch: &[QueryResults],
    lexicon: &CueLexicon,
    provenance_key: &str,
    preview_chars: usize,
) -> Result<ExperimentLog> {
    let builders: Vec<_> = Strategy::ALL
        .iter()
        .map(|&s| builder_for(s, lexicon))
        .collect();

    let mut entries = Vec::with_capacity(batch.len());
    for (i, item) in batch.iter().enumerate() {
        let query_index = i + 1;
        let fragments = fragments_from_retrieved(&item.results, provenance_key, lexicon)
            .with_context(|| format!("Invalid results for query {}", query_index))?;

        let mut entry = ExperimentEntry {
            query_index,
            query: item.query.clone(),
            retrieved_fragments: fragments.len(),
            build_latency_ms: BTreeMap::new(),
            context_digest: BTreeMap::new(),
            contexts_preview: BTreeMap::new(),
            stripped_preview: BTreeMap::new(),
            prompt_chars: BTreeMap::new(),
        };

        for builder in &builders {
            let label = builder.strategy().system_label().to_string();

            let started = Instant::now();
            let context = builder.build(&fragments);
            let elapsed_ms = started.elapsed().as_secs_f64() * 1000.0;

            let prompt = render_prompt(&context, &item.query);

            entry
                .build_latency_ms
                .insert(label.clone(), (elapsed_ms * 100.0).round() / 100.0);
            entry.context_digest.insert(label.clone(), digest(&context));
            entry
                .contexts_preview
                .insert(label.clone(), truncate_chars(&context, preview_chars));
            entry.stripped_preview.insert(
                label.clone(),
                truncate_chars(&strip_headers(&context), preview_chars),
            );
            entry.prompt_chars.insert(label, prompt.chars().count());
        }

        tracing::info!(
            query_index,
            fragments = entry.retrieved_fragments,
            "query composed"
        );
        entries.push(entry);
    }

    Ok(ExperimentLog {
        run_id: Uuid::new_v4().to_string(),
        generated_at: Utc::now().to_rfc3339(),
        entries,
    })
}

/// Write the log as pretty JSON, creating parent directories.
pub fn write_log(log: &ExperimentLog, output: &Path) -> Result<()> {
    if let Some(parent) = output.parent() {
        if !parent.as_os_str().is_empty() {
            std::fs::create_dir_all(parent).with_context(|| {
                format!("Failed to create output directory: {}", parent.display())
            })?;
        }
    }
    let json = serde_json::to_string_pretty(log)?;
    std::fs::write(output, json)
        .with_context(|| format!("Failed to write experiment log: {}", output.display()))?;
    Ok(())
}

/// Hex SHA-256 of a context string.
pub fn digest(text: &str) -> String {
    let mut hasher = Sha256::new();
    hasher.update(text.as_bytes());
    format!("{:x}", hasher.finalize())
}

fn truncate_chars(text: &str, max_chars: usize) -> String {
    match text.char_indices().nth(max_chars) {
        Some((cut, _)) => text[..cut].to_string(),
        None => text.to_string(),
    }
}
