//! Config command - configuration management.

use anyhow::{Context as _, Result};
use clap::{Args, Subcommand};
use pokedex_config::PokedexConfig;

use super::Context;

/// Arguments for the config command.
#[derive(Args, Debug)]
pub struct ConfigArgs {
    #[command(subcommand)]
    pub command: ConfigCommand,
}

#[derive(Subcommand, Debug)]
pub enum ConfigCommand {
    /// Show the effective configuration and where it came from
    Show,

    /// Show the user configuration file path
    Path,

    /// Write a config file with defaults
    Init {
        /// Overwrite an existing file
        #[arg(long)]
        force: bool,
    },
}

/// Run the config command.
pub async fn run(args: ConfigArgs, ctx: &Context) -> Result<()> {
    match args.command {
        ConfigCommand::Show => cmd_show(ctx),
        ConfigCommand::Path => cmd_path(ctx),
        ConfigCommand::Init { force } => cmd_init(ctx, force),
    }
}

fn cmd_show(ctx: &Context) -> Result<()> {
    println!("# Pokedex Configuration\n");

    // Sources
    let sources = ctx.loaded.loaded_from();
    if sources.is_empty() {
        println!("No config files loaded (using defaults)\n");
    } else {
        println!("Config files:");
        for source in &sources {
            println!("  {}", source.display());
        }
        println!();
    }

    if ctx.verbose {
        println!("Search order (later overrides earlier):");
        for source in &ctx.loaded.sources {
            let status = if source.loaded {
                "✓ loaded"
            } else {
                "· not found"
            };
            println!("  {} {}", status, source.path.display());
        }
        println!();
    }

    // Warnings
    let invalid = ctx.config.validate().err().map(|e| e.to_string());
    if !ctx.loaded.warnings.is_empty() || invalid.is_some() {
        println!("Warnings:");
        for w in ctx.loaded.warnings.iter().chain(invalid.iter()) {
            println!("  ⚠ {}", w);
        }
        println!();
    }

    let effective = PokedexConfig {
        cache: Some(ctx.config.cache()),
        api: Some(ctx.config.api()),
        logging: Some(ctx.config.logging()),
    };
    println!("{}", effective.to_toml()?);

    Ok(())
}

fn cmd_path(ctx: &Context) -> Result<()> {
    if let Some(path) = ctx.user_config_path() {
        println!("{}", path.display());
    } else {
        eprintln!("Could not determine config directory");
    }
    Ok(())
}

fn cmd_init(ctx: &Context, force: bool) -> Result<()> {
    let path = ctx
        .user_config_path()
        .context("Could not determine config directory")?;

    pokedex_config::save_config(&PokedexConfig::with_defaults(), &path, force)?;

    println!("✓ Created config file: {}", path.display());
    println!();
    println!("Next steps:");
    println!("  pokedex config show    # verify configuration");
    println!("  pokedex                # start the shell");

    Ok(())
}
