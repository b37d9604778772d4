//! arcommands: command-line front end of the codec and filter engine.

use std::process;

use anyhow::Result;
use clap::Parser;

use arcommands::cli::{Cli, Commands};
use arcommands::config::{self, ConfigService};
use arcommands::domain;
use arcommands::service::FrameService;

fn main() -> Result<()> {
    let cli = Cli::parse();

    // Load configuration
    let config = ConfigService::load(cli.config.as_deref())?;

    // Initialize logging if debug mode
    if cli.debug || config.debug {
        domain::logger::init(&config)?;
    }

    // Execute command
    let exit_code = match cli.command {
        Commands::Init { path } => {
            let config_path = if let Some(p) = path {
                ConfigService::generate_at(&p)?;
                p
            } else {
                ConfigService::generate_default()?;
                ConfigService::default_path()
            };
            if !cli.quiet {
                eprintln!("Configuration file created at: {}", config_path.display());
            }
            0
        }
        Commands::Check => {
            config::validate(&config)?;
            FrameService::new(config, cli.format)?.check()?;
            if !cli.quiet {
                eprintln!("Configuration is valid.");
            }
            0
        }
        Commands::Version => {
            println!("arcommands {}", env!("CARGO_PKG_VERSION"));
            0
        }
        command => {
            let service = FrameService::new(config, cli.format)?;
            match command {
                Commands::Decode { hex } => service.decode(hex)?,
                Commands::Encode { name, args } => service.encode(&name, &args)?,
                Commands::Dissect { hex } => service.dissect(hex)?,
                Commands::Filter { name } => service.filter_command(&name)?,
                Commands::List { project } => service.list(project.as_deref())?,
                Commands::Compat { old, new } => service.compat(&old, new.as_deref())?,
                Commands::CompareVersions { v1, v2 } => service.compare_versions(&v1, &v2)?,
                Commands::Init { .. } | Commands::Check | Commands::Version => 0,
            }
        }
    };

    if exit_code != 0 {
        process::exit(exit_code);
    }
    Ok(())
}
