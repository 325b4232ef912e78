/*!
 * rlu-complete - completion suggestions for the rlu journal CLI
 *
 * Called by shell completion hooks with the words typed so far; prints
 * one suggestion per line (or a JSON array). Never fails on a bad or
 * missing helper script, only on an unreadable config file.
 */

use std::io::{self, Write};
use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use rlu_complete::{rlu_spec, CompletionConfig, CompletionEngine, Suggestion};
use tracing::debug;

#[derive(Parser)]
#[command(name = "rlu-complete", version)]
#[command(about = "Completion suggestions for rlu - Rust Logseq Utility", long_about = None)]
struct Cli {
    /// Directory containing the rlu helper scripts (overrides config and RLU_SCRIPTS_DIR)
    #[arg(long, global = true)]
    scripts_dir: Option<PathBuf>,

    /// Helper script time budget in milliseconds
    #[arg(long, global = true)]
    timeout_ms: Option<u64>,

    /// Config file (default: <config dir>/rlu/completions.yaml)
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Suggest completions for the words typed after `rlu`
    Suggest {
        /// Emit a JSON array instead of tab-separated lines
        #[arg(short, long)]
        json: bool,

        /// Typed words; the last one is the word being completed
        #[arg(trailing_var_arg = true, allow_hyphen_values = true)]
        tokens: Vec<String>,
    },

    /// Print the rlu completion spec as JSON
    Spec,
}

#[tokio::main]
async fn main() {
    // stdout carries suggestions, so logs go to stderr
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("warn")),
        )
        .with_writer(io::stderr)
        .init();

    let cli = Cli::parse();

    if let Err(e) = run(cli).await {
        eprintln!("Error: {:#}", e);
        std::process::exit(1);
    }
}

async fn run(cli: Cli) -> Result<()> {
    let config = load_config(&cli)?;
    debug!(?config, "resolved completion config");

    let engine = CompletionEngine::new(rlu_spec(&config), config.run_opts());

    match cli.command {
        Commands::Suggest { json, tokens } => {
            let suggestions = engine.complete(&tokens).await;
            let mut out = io::stdout().lock();
            write_suggestions(&mut out, &suggestions, json)?;
            out.flush()?;
        }
        Commands::Spec => {
            let mut out = io::stdout().lock();
            serde_json::to_writer_pretty(&mut out, engine.spec())?;
            writeln!(out)?;
            out.flush()?;
        }
    }

    Ok(())
}

fn load_config(cli: &Cli) -> Result<CompletionConfig> {
    let mut config = match &cli.config {
        Some(path) => {
            let mut config = CompletionConfig::load_from_path(path)
                .with_context(|| format!("Failed to load config from {}", path.display()))?;
            config.apply_env_overrides(|key| std::env::var(key).ok());
            config
        }
        None => CompletionConfig::load().context("Failed to load completion config")?,
    };

    if let Some(dir) = &cli.scripts_dir {
        config.scripts_dir = dir.clone();
    }
    if let Some(ms) = cli.timeout_ms {
        config.timeout_ms = ms;
    }

    Ok(config)
}

fn write_suggestions(out: &mut impl Write, suggestions: &[Suggestion], json: bool) -> io::Result<()> {
    if json {
        serde_json::to_writer(&mut *out, suggestions)?;
        writeln!(out)?;
        return Ok(());
    }

    for s in suggestions {
        writeln!(out, "{}\t{}\t{}", s.insert_value, s.name, s.description)?;
    }
    Ok(())
}
