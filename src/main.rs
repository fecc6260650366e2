//! # Context Composer CLI (`ctxc`)
//!
//! Composes retrieved fragments into a single model context and explains
//! the composition decisions.
//!
//! ## Commands
//!
//! | Command | Description |
//! |---------|-------------|
//! | `ctxc compose` | Print the composed context (or full prompt with `--query`) |
//! | `ctxc explain` | Print roles, tensions, conflicts, and buckets per fragment |
//! | `ctxc roles <text>` | Print the role set of a text |
//! | `ctxc experiment` | Compose a query batch with every strategy and write a JSON log |
//!
//! ## Examples
//!
//! ```bash
//! # Semantic composition of retrieved results
//! ctxc compose --input results.json
//!
//! # Provider-grouped baseline, reading from stdin
//! cat results.json | ctxc compose --input - --strategy grouped
//!
//! # Compose documents from the provider directories in ctx.toml
//! ctxc --config ./config/ctxc.toml compose
//!
//! # Compare strategies for a batch of queries
//! ctxc experiment --batch batch.json --output results/log.json
//! ```

use anyhow::Result;
use clap::{Parser, Subcommand};
use context_composer::config::{self, Config};
use context_composer::connector_fs::scan_providers;
use context_composer::experiment::{run_experiment, write_log};
use context_composer::explain::{explain, print_explanation};
use context_composer::input::{load_batch, load_results};
use context_composer::prompt::render_prompt;
use context_composer::telemetry::init_tracing;
use context_composer_core::models::{fragments_from_retrieved, Fragment};
use context_composer_core::roles::{role_label, CueLexicon};
use context_composer_core::strategy::{compose, Strategy};
use std::path::{Path, PathBuf};
use tracing::Level;

/// Context Composer CLI: role- and tension-aware context composition for
/// retrieval-augmented prompts.
#[derive(Parser)]
#[command(
    name = "ctxc",
    about = "Context Composer: role- and tension-aware context composition for retrieval-augmented prompts",
    version
)]
struct Cli {
    /// Path to a TOML configuration file. Built-in defaults are used when omitted.
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Emit logs as JSON lines on stderr.
    #[arg(long, global = true)]
    log_json: bool,

    /// Log debug events (per-pair tension decisions).
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Compose retrieved fragments into a context.
    ///
    /// Reads a JSON array of retrieved records from `--input` (use `-` for
    /// stdin), or loads the provider directories from `[corpus]`.
    Compose {
        /// Retrieved results file (JSON array), or `-` for stdin.
        #[arg(long)]
        input: Option<PathBuf>,

        /// Composition strategy: `semantic`, `grouped`, or `flat`.
        /// Overrides `compose.strategy` from the config.
        #[arg(long)]
        strategy: Option<Strategy>,

        /// Wrap the context in a prompt for this question.
        #[arg(long)]
        query: Option<String>,
    },

    /// Show the decision trace of a semantic composition.
    Explain {
        /// Retrieved results file (JSON array), or `-` for stdin.
        #[arg(long)]
        input: Option<PathBuf>,

        /// Print the trace as JSON.
        #[arg(long)]
        json: bool,
    },

    /// Print the role set assigned to a text.
    Roles {
        /// Text to classify.
        text: String,
    },

    /// Compose each query of a batch with every strategy and log the results.
    Experiment {
        /// Batch file: JSON array of `{"query", "results"}` objects.
        #[arg(long)]
        batch: PathBuf,

        /// Output path. Overrides `experiment.output` from the config.
        #[arg(long)]
        output: Option<PathBuf>,
    },
}

fn load_fragments(cfg: &Config, lexicon: &CueLexicon, input: Option<&Path>) -> Result<Vec<Fragment>> {
    let key = cfg.compose.provenance_key.as_str();
    let items = match input {
        Some(path) => load_results(path)?,
        None => scan_providers(&cfg.corpus, key)?,
    };
    Ok(fragments_from_retrieved(&items, key, lexicon)?)
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    let level = if cli.verbose { Level::DEBUG } else { Level::WARN };
    init_tracing(cli.log_json, level);

    let cfg = config::load_or_default(cli.config.as_deref())?;
    let lexicon = cfg.lexicon()?;

    match cli.command {
        Commands::Compose {
            input,
            strategy,
            query,
        } => {
            let strategy = match strategy {
                Some(s) => s,
                None => cfg.strategy()?,
            };
            let fragments = load_fragments(&cfg, &lexicon, input.as_deref())?;
            let context = compose(strategy, &fragments, &lexicon);
            tracing::info!(%strategy, fragments = fragments.len(), "context composed");

            match query {
                Some(q) => println!("{}", render_prompt(&context, &q)),
                None => println!("{}", context),
            }
        }
        Commands::Explain { input, json } => {
            let fragments = load_fragments(&cfg, &lexicon, input.as_deref())?;
            print_explanation(&explain(&lexicon, &fragments), json)?;
        }
        Commands::Roles { text } => {
            println!("{}", role_label(&lexicon.assign_roles(&text)));
        }
        Commands::Experiment { batch, output } => {
            let batch = load_batch(&batch)?;
            let log = run_experiment(
                &batch,
                &lexicon,
                &cfg.compose.provenance_key,
                cfg.experiment.preview_chars,
            )?;
            let output = output.unwrap_or_else(|| cfg.experiment.output.clone());
            write_log(&log, &output)?;
            println!(
                "experiment {}: {} queries -> {}",
                log.run_id,
                log.entries.len(),
                output.display()
            );
        }
    }

    Ok(())
}
