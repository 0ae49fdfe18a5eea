//! Pokedex - interactive shell for browsing PokeAPI location areas
//!
//! Main entry point for the Pokedex CLI.

use std::path::{Path, PathBuf};

use anyhow::Result;
use clap::{Parser, Subcommand};
use pokedex_config::PokedexConfig;
use tracing::warn;
use tracing_appender::non_blocking::WorkerGuard;

mod commands;

use commands::{config, repl};

/// Console filter used with `--verbose`.
const VERBOSE_FILTER: &str =
    "pokedex=debug,pokedex_cache=debug,pokedex_client=debug,pokedex_config=debug,info";

/// Filter for the JSON log file.
const FILE_FILTER: &str =
    "pokedex=trace,pokedex_cache=trace,pokedex_client=trace,pokedex_config=trace,info";

// ─────────────────────────────────────────────────────────────────────────────
// CLI Structure
// ─────────────────────────────────────────────────────────────────────────────

/// Pokedex - interactive shell for browsing PokeAPI location areas
#[derive(Parser, Debug)]
#[command(name = "pokedex")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    /// Enable verbose output
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Directory holding config.toml and logs/
    #[arg(long, global = true, env = "POKEDEX_CONFIG_DIR")]
    pub config_dir: Option<PathBuf>,

    /// API root URL (default: https://pokeapi.co/api/v2/)
    #[arg(long, global = true)]
    pub api_url: Option<String>,

    /// Cache entry lifetime and reap period, in milliseconds
    #[arg(long, global = true)]
    pub cache_interval_ms: Option<u64>,

    /// Keep cached responses until exit instead of reaping them
    #[arg(long, global = true)]
    pub no_reap: bool,

    #[command(subcommand)]
    pub command: Option<Commands>,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Start the interactive shell (default)
    Repl,

    /// Configuration management
    Config(config::ConfigArgs),
}

impl Cli {
    /// Apply command-line overrides on top of the loaded config.
    fn apply_overrides(&self, config: &mut PokedexConfig) {
        if let Some(ref url) = self.api_url {
            let mut api = config.api();
            api.base_url = url.clone();
            config.api = Some(api);
        }

        if self.cache_interval_ms.is_some() || self.no_reap {
            let mut cache = config.cache();
            if let Some(ms) = self.cache_interval_ms {
                cache.interval_ms = ms;
            }
            if self.no_reap {
                cache.reaping = false;
            }
            config.cache = Some(cache);
        }
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Main
// ─────────────────────────────────────────────────────────────────────────────

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    let config_dir = cli
        .config_dir
        .clone()
        .or_else(pokedex_config::xdg_config_dir);

    let loaded = pokedex_config::load_config_with_options(None, config_dir.as_deref())?;

    let mut config = loaded.config.clone();
    cli.apply_overrides(&mut config);

    let _guard = init_tracing(&cli, &config, config_dir.as_deref());

    for warning in &loaded.warnings {
        warn!("{}", warning);
    }

    let ctx = commands::Context {
        loaded,
        config,
        config_dir,
        verbose: cli.verbose,
    };

    // Dispatch to command handlers
    match cli.command {
        None | Some(Commands::Repl) => {
            ctx.config.validate()?;
            repl::run(&ctx).await
        }
        Some(Commands::Config(args)) => config::run(args, &ctx).await,
    }
}

/// Initialize tracing: human-readable console on stderr plus a rotating
/// JSON file under `<config dir>/logs/`.
fn init_tracing(
    cli: &Cli,
    config: &PokedexConfig,
    config_dir: Option<&Path>,
) -> Option<WorkerGuard> {
    use tracing_subscriber::prelude::*;
    use tracing_subscriber::{EnvFilter, fmt};

    let logging = config.logging();

    let console_filter = if cli.verbose {
        EnvFilter::new(VERBOSE_FILTER)
    } else {
        EnvFilter::try_new(&logging.level)
            .unwrap_or_else(|_| EnvFilter::new(pokedex_config::DEFAULT_LOG_LEVEL))
    };

    let (file_writer, guard) = match config_dir {
        Some(dir) if logging.file => {
            let file_appender = tracing_appender::rolling::daily(dir.join("logs"), "pokedex.log");
            let (non_blocking, guard) = tracing_appender::non_blocking(file_appender);
            (Some(non_blocking), Some(guard))
        }
        _ => (None, None),
    };

    tracing_subscriber::registry()
        .with(
            fmt::layer()
                .with_target(true)
                .with_writer(std::io::stderr)
                .with_filter(console_filter),
        )
        .with(file_writer.map(|writer| {
            fmt::layer()
                .json()
                .with_writer(writer)
                .with_filter(EnvFilter::new(FILE_FILTER))
        }))
        .init();

    guard
}
