use anyhow::{bail, Context, Result};
use context_composer_core::models::DEFAULT_PROVENANCE_KEY;
use context_composer_core::roles::{CueLexicon, Role};
use context_composer_core::strategy::Strategy;
use serde::Deserialize;
use std::path::{Path, PathBuf};

#[derive(Debug, Deserialize, Clone, Default)]
pub struct Config {
    #[serde(default)]
    pub compose: ComposeConfig,
    #[serde(default)]
    pub cues: CuesConfig,
    #[serde(default)]
    pub corpus: CorpusConfig,
    #[serde(default)]
    pub experiment: ExperimentConfig,
}

#[derive(Debug, Deserialize, Clone)]
pub struct ComposeConfig {
    #[serde(default = "default_strategy")]
    pub strategy: String,
    #[serde(default = "default_provenance_key")]
    pub provenance_key: String,
}

impl Default for ComposeConfig {
    fn default() -> Self {
        Self {
            strategy: default_strategy(),
            provenance_key: default_provenance_key(),
        }
    }
}

fn default_strategy() -> String {
    "semantic".to_string()
}
fn default_provenance_key() -> String {
    DEFAULT_PROVENANCE_KEY.to_string()
}

/// Cue overrides. A present list replaces the built-in list for its role.
#[derive(Debug, Deserialize, Clone, Default)]
pub struct CuesConfig {
    #[serde(default)]
    pub normative: Option<Vec<String>>,
    #[serde(default)]
    pub alternative: Option<Vec<String>>,
    #[serde(default)]
    pub orientative: Option<Vec<String>>,
}

#[derive(Debug, Deserialize, Clone)]
pub struct CorpusConfig {
    #[serde(default)]
    pub providers: Vec<PathBuf>,
    #[serde(default = "default_include_globs")]
    pub include_globs: Vec<String>,
    #[serde(default)]
    pub exclude_globs: Vec<String>,
}

impl Default for CorpusConfig {
    fn default() -> Self {
        Self {
            providers: Vec::new(),
            include_globs: default_include_globs(),
            exclude_globs: Vec::new(),
        }
    }
}

fn default_include_globs() -> Vec<String> {
    vec!["**/*.txt".to_string()]
}

#[derive(Debug, Deserialize, Clone)]
pub struct ExperimentConfig {
    #[serde(default = "default_preview_chars")]
    pub preview_chars: usize,
    #[serde(default = "default_output")]
    pub output: PathBuf,
}

impl Default for ExperimentConfig {
    fn default() -> Self {
        Self {
            preview_chars: default_preview_chars(),
            output: default_output(),
        }
    }
}

fn default_preview_chars() -> usize {
    1000
}
fn default_output() -> PathBuf {
    PathBuf::from("results/results_semantic_homeostasis.json")
}

impl Config {
    pub fn strategy(&self) -> Result<Strategy> {
        self.compose
            .strategy
            .parse::<Strategy>()
            .map_err(anyhow::Error::msg)
    }

    /// Built-in Spanish cues with any configured overrides applied.
    pub fn lexicon(&self) -> Result<CueLexicon> {
        let mut lexicon = CueLexicon::default();
        let overrides = [
            (Role::Normative, &self.cues.normative),
            (Role::Alternative, &self.cues.alternative),
            (Role::Orientative, &self.cues.orientative),
        ];
        for (role, cues) in overrides {
            if let Some(cues) = cues {
                lexicon = lexicon
                    .with_cues(role, cues)
                    .with_context(|| format!("Invalid cues.{}", role))?;
            }
        }
        Ok(lexicon)
    }
}

pub fn load_config(path: &Path) -> Result<Config> {
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read config file: {}", path.display()))?;

    let config: Config = toml::from_str(&content).with_context(|| "Failed to parse config file")?;

    validate(&config)?;
    Ok(config)
}

/// Load `path` when given, otherwise fall back to defaults.
pub fn load_or_default(path: Option<&Path>) -> Result<Config> {
    match path {
        Some(p) => load_config(p),
        None => Ok(Config::default()),
    }
}

fn validate(config: &Config) -> Result<()> {
    config.strategy()?;

    if config.compose.provenance_key.trim().is_empty() {
        bail!("compose.provenance_key must not be empty");
    }

    config.lexicon()?;

    if config.experiment.preview_chars == 0 {
        bail!("experiment.preview_chars must be > 0");
    }

    Ok(())
}
