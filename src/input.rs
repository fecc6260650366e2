//! JSON inputs handed over by the retrieval step.
//!
//! A results file is an array of records:
//!
//! ```json
//! [{"page_content": "…", "metadata": {"dp": "dp1", "source": "a.txt"}}]
//! ```
//!
//! A batch file pairs each query with its retrieved records:
//!
//! ```json
//! [{"query": "…", "results": [ … ]}]
//! ```

use anyhow::{Context, Result};
use context_composer_core::models::RetrievedItem;
use serde::Deserialize;
use std::io::Read;
use std::path::Path;

/// One query and the records retrieved for it.
#[derive(Debug, Clone, Deserialize)]
pub struct QueryResults {
    pub query: String,
    #[serde(default)]
    pub results: Vec<RetrievedItem>,
}

fn read_source(path: &Path) -> Result<String> {
    if path == Path::new("-") {
        let mut buf = String::new();
        std::io::stdin()
            .read_to_string(&mut buf)
            .context("Failed to read results from stdin")?;
        return Ok(buf);
    }
    std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read results file: {}", path.display()))
}

/// Load a results array. `-` reads from stdin.
pub fn load_results(path: &Path) -> Result<Vec<RetrievedItem>> {
    let content = read_source(path)?;
    serde_json::from_str(&content)
        .with_context(|| format!("Failed to parse results file: {}", path.display()))
}

/// Load a batch of queries with their results.
pub fn load_batch(path: &Path) -> Result<Vec<QueryResults>> {
    let content = read_source(path)?;
    serde_json::from_str(&content)
        .with_context(|| format!("Failed to parse batch file: {}", path.display()))
}
