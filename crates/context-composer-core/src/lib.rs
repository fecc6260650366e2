//! # Context Composer Core
//!
//! Deterministic, I/O-free logic for composing a model context out of
//! retrieved fragments: role assignment, pairwise tension, conflict
//! detection, composition planning, and rendering.
//!
//! This crate contains no filesystem access, async runtime, or global
//! state. Every call receives the full fragment list and returns a
//! complete value, so concurrent compositions need no coordination.
//!
//! ```text
//! fragments ─▶ roles ─▶ pair tensions ─▶ conflict set ─▶ plan ─▶ string
//! ```
//!
//! ## Example
//!
//! ```rust
//! use context_composer_core::models::Fragment;
//! use context_composer_core::roles::CueLexicon;
//! use context_composer_core::strategy::{compose, Strategy};
//!
//! let lexicon = CueLexicon::default();
//! let fragments = vec![
//!     Fragment::new("El proyecto trata datos de salud.", "dp1", &lexicon),
//!     Fragment::new("El proyecto trata datos de salud.", "dp1", &lexicon),
//! ];
//! let context = compose(Strategy::Semantic, &fragments, &lexicon);
//! assert!(context.starts_with("=== Contexto común (integrado) ==="));
//! ```

pub mod baseline;
pub mod conflict;
pub mod error;
pub mod models;
pub mod plan;
pub mod render;
pub mod roles;
pub mod strategy;
pub mod tension;
