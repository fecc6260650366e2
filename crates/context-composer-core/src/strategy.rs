//! Composition strategies and the [`ContextBuilder`] trait.
//!
//! | Strategy | Behavior |
//! |----------|----------|
//! | `flat` | provenance-tagged concatenation in retrieval order |
//! | `grouped` | one block per provenance |
//! | `semantic` | role/tension-aware integration and separation |

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::baseline::{flat_concatenation, provider_grouping};
use crate::models::Fragment;
use crate::plan::plan_fragments;
use crate::render::render;
use crate::roles::CueLexicon;

/// How fragments are turned into a context string.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Strategy {
    Flat,
    Grouped,
    Semantic,
}

impl Strategy {
    pub const ALL: [Strategy; 3] = [Strategy::Flat, Strategy::Grouped, Strategy::Semantic];

    pub fn as_str(self) -> &'static str {
        match self {
            Strategy::Flat => "flat",
            Strategy::Grouped => "grouped",
            Strategy::Semantic => "semantic",
        }
    }

    /// System label used in experiment logs.
    pub fn system_label(self) -> &'static str {
        match self {
            Strategy::Flat => "S1_base",
            Strategy::Grouped => "S2_hard",
            Strategy::Semantic => "S3_semantic",
        }
    }
}

impl fmt::Display for Strategy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Strategy {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "flat" | "base" => Ok(Strategy::Flat),
            "grouped" | "hard" => Ok(Strategy::Grouped),
            "semantic" => Ok(Strategy::Semantic),
            other => Err(format!(
                "Unknown strategy: '{}'. Use flat, grouped, or semantic.",
                other
            )),
        }
    }
}

/// Builds a context string from fragments.
///
/// Implementations hold no mutable state, so one builder can serve many
/// concurrent compositions.
pub trait ContextBuilder: Send + Sync {
    fn strategy(&self) -> Strategy;

    fn build(&self, fragments: &[Fragment]) -> String;
}

/// Provenance-tagged concatenation.
pub struct FlatBuilder;

impl ContextBuilder for FlatBuilder {
    fn strategy(&self) -> Strategy {
        Strategy::Flat
    }

    fn build(&self, fragments: &[Fragment]) -> String {
        flat_concatenation(fragments)
    }
}

/// Strict grouping by provenance.
pub struct GroupedBuilder;

impl ContextBuilder for GroupedBuilder {
    fn strategy(&self) -> Strategy {
        Strategy::Grouped
    }

    fn build(&self, fragments: &[Fragment]) -> String {
        provider_grouping(fragments)
    }
}

/// Role and tension aware composition.
pub struct SemanticBuilder {
    lexicon: CueLexicon,
}

impl SemanticBuilder {
    pub fn new(lexicon: CueLexicon) -> Self {
        Self { lexicon }
    }
}

impl ContextBuilder for SemanticBuilder {
    fn strategy(&self) -> Strategy {
        Strategy::Semantic
    }

    fn build(&self, fragments: &[Fragment]) -> String {
        render(&plan_fragments(&self.lexicon, fragments))
    }
}

/// Builder for `strategy`.
pub fn builder_for(strategy: Strategy, lexicon: &CueLexicon) -> Box<dyn ContextBuilder> {
    match strategy {
        Strategy::Flat => Box::new(FlatBuilder),
        Strategy::Grouped => Box::new(GroupedBuilder),
        Strategy::Semantic => Box::new(SemanticBuilder::new(lexicon.clone())),
    }
}

/// Compose fragments with a single strategy.
pub fn compose(strategy: Strategy, fragments: &[Fragment], lexicon: &CueLexicon) -> String {
    builder_for(strategy, lexicon).build(fragments)
}
