//! # Context Composer
//!
//! Role- and tension-aware context composition for retrieval-augmented
//! prompts.
//!
//! Retrieved fragments from several data providers are either merged into
//! a shared block or kept in labeled per-provider, per-role blocks before
//! they reach a language model. The decision logic lives in
//! [`context_composer_core`]; this crate adds configuration, input
//! loading, decision traces, the comparison experiment, and the `ctxc`
//! CLI.
//!
//! ## Architecture
//!
//! ```text
//! ┌──────────────┐   ┌───────────────────────────┐   ┌──────────────┐
//! │ Inputs       │──▶│ Core                      │──▶│ Outputs      │
//! │ JSON results │   │ roles ▶ tension ▶ plan    │   │ context      │
//! │ provider dirs│   │       ▶ render            │   │ prompt / log │
//! └──────────────┘   └───────────────────────────┘   └──────────────┘
//! ```
//!
//! ## Quick Start
//!
//! ```bash
//! ctxc compose --input results.json            # semantic context
//! ctxc compose --input results.json --strategy grouped
//! ctxc explain --input results.json --json     # decision trace
//! ctxc roles "Debe cumplir, excepto si…"        # role set of a text
//! ctxc experiment --batch batch.json            # compare all strategies
//! ```
//!
//! ## Modules
//!
//! | Module | Purpose |
//! |--------|---------|
//! | [`config`] | TOML configuration parsing |
//! | [`connector_fs`] | Provider directory loader |
//! | [`input`] | Retrieved-results JSON loading |
//! | [`explain`] | Per-fragment decision trace |
//! | [`experiment`] | Strategy comparison log |
//! | [`prompt`] | Prompt wrapping |
//! | [`telemetry`] | Tracing setup |

pub mod config;
pub mod connector_fs;
pub mod experiment;
pub mod explain;
pub mod input;
pub mod prompt;
pub mod telemetry;
