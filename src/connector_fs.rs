//! Filesystem loader for per-provider document directories.
//!
//! Each configured provider directory holds plain-text documents. The
//! directory's base name becomes the provenance of every document in it,
//! so `data/dp1/consent.txt` is retrieved as provenance `dp1`.

use anyhow::{bail, Context, Result};
use context_composer_core::models::RetrievedItem;
use globset::{Glob, GlobSet, GlobSetBuilder};
use serde_json::{Map, Value};
use std::path::Path;
use walkdir::WalkDir;

use crate::config::CorpusConfig;

/// Load every provider in configuration order, documents sorted by
/// relative path within each provider.
pub fn scan_providers(corpus: &CorpusConfig, provenance_key: &str) -> Result<Vec<RetrievedItem>> {
    if corpus.providers.is_empty() {
        bail!("No corpus providers configured. Set [corpus] providers or pass --input.");
    }

    let include_set = build_globset(&corpus.include_globs)?;

    let mut default_excludes = vec!["**/.git/**".to_string()];
    default_excludes.extend(corpus.exclude_globs.clone());
    let exclude_set = build_globset(&default_excludes)?;

    let mut items = Vec::new();
    for root in &corpus.providers {
        let loaded = scan_provider(root, &include_set, &exclude_set, provenance_key)?;
        tracing::info!(provider = %root.display(), documents = loaded.len(), "provider loaded");
        items.extend(loaded);
    }

    Ok(items)
}

fn scan_provider(
    root: &Path,
    include_set: &GlobSet,
    exclude_set: &GlobSet,
    provenance_key: &str,
) -> Result<Vec<RetrievedItem>> {
    if !root.is_dir() {
        bail!("Provider directory does not exist: {}", root.display());
    }

    let provenance = root
        .file_name()
        .map(|n| n.to_string_lossy().to_string())
        .with_context(|| format!("Provider path has no directory name: {}", root.display()))?;

    let mut found = Vec::new();
    for entry in WalkDir::new(root) {
        let entry = entry?;
        if !entry.file_type().is_file() {
            continue;
        }

        let path = entry.path();
        let relative = path.strip_prefix(root).unwrap_or(path);
        let rel_str = relative.to_string_lossy().to_string();

        if exclude_set.is_match(&rel_str) || !include_set.is_match(&rel_str) {
            continue;
        }

        let body = match std::fs::read_to_string(path) {
            Ok(body) => body,
            Err(e) => {
                tracing::warn!(path = %path.display(), error = %e, "skipping unreadable document");
                continue;
            }
        };
        found.push((rel_str, body));
    }

    // Sort for deterministic ordering
    found.sort_by(|a, b| a.0.cmp(&b.0));

    Ok(found
        .into_iter()
        .map(|(rel_str, body)| {
            let mut metadata = Map::new();
            metadata.insert(provenance_key.to_string(), Value::String(provenance.clone()));
            metadata.insert("source".to_string(), Value::String(rel_str));
            RetrievedItem {
                page_content: Some(body),
                metadata,
            }
        })
        .collect())
}

fn build_globset(patterns: &[String]) -> Result<GlobSet> {
    let mut builder = GlobSetBuilder::new();
    for pattern in patterns {
        builder.add(Glob::new(pattern)?);
    }
    Ok(builder.build()?)
}
