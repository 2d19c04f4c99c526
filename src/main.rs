//! Rookery hub configuration front-end
//!
//! Loads, validates, and renders the configuration handed to the hub runtime.

use anyhow::Context;
use clap::{Parser, Subcommand, ValueEnum};
use rookery::{
    config::{HubConfig, SetOverride, load_config},
    error::DocumentError,
    plugin::{AuthenticatorKind, ProxyKind, SpawnerKind},
};
use std::fs;
use std::path::PathBuf;
use tracing::{error, info};
use tracing_subscriber::{EnvFilter, fmt, prelude::*};

/// Starter configuration written by `rookery init`.
const STARTER_CONFIG: &str = include_str!("../rookery.example.toml");

/// Rookery - configuration front-end for the multi-user workspace hub
#[derive(Parser, Debug)]
#[command(name = "rookery")]
#[command(version, about, long_about = None)]
struct Args {
    /// Path to configuration file
    #[arg(short, long, env = "ROOKERY_CONFIG", global = true)]
    config: Option<String>,

    /// Log level (trace, debug, info, warn, error)
    #[arg(long, env = "ROOKERY_LOG_LEVEL", default_value = "info", global = true)]
    log_level: String,

    /// Explicit option assignment, PATH=VALUE (repeatable, applied in order)
    #[arg(long = "set", value_name = "PATH=VALUE", global = true)]
    set: Vec<String>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Validate the effective configuration and summarize what the hub would run
    Check,
    /// Render the effective configuration with secrets redacted
    Show {
        /// Output format
        #[arg(long, value_enum, default_value = "flat")]
        format: OutputFormat,
    },
    /// Write a starter configuration file
    Init {
        /// Destination path (defaults to the user configuration directory)
        #[arg(long)]
        path: Option<PathBuf>,
        /// Overwrite an existing file
        #[arg(long)]
        force: bool,
    },
}

#[derive(ValueEnum, Clone, Copy, Debug)]
enum OutputFormat {
    /// One `path = value` line per option
    Flat,
    /// TOML, loadable shape (secrets redacted)
    Toml,
    /// JSON object keyed by dotted paths
    Json,
}

fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    let args = Args::parse();

    // Initialize logging
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&args.log_level));

    tracing_subscriber::registry()
        .with(fmt::layer().with_writer(std::io::stderr))
        .with(filter)
        .init();

    match args.command {
        Command::Check => check(args.config.as_deref(), &args.set)?,
        Command::Show { format } => show(args.config.as_deref(), &args.set, format)?,
        Command::Init { path, force } => init(path, force)?,
    }

    Ok(())
}

fn load(config_path: Option<&str>, raw_overrides: &[String]) -> rookery::Result<HubConfig> {
    let overrides = SetOverride::parse_all(raw_overrides)?;
    let config = load_config(config_path, &overrides)
        .inspect_err(|e| error!(error = %e, "Failed to load configuration"))?;
    Ok(config)
}

fn check(config_path: Option<&str>, raw_overrides: &[String]) -> rookery::Result<()> {
    let config = load(config_path, raw_overrides)?;

    info!(
        class = %config.spawner.class,
        kind = SpawnerKind::detect(&config.spawner.class).label(),
        "spawner"
    );
    info!(
        class = %config.proxy.class,
        kind = ProxyKind::detect(&config.proxy.class).label(),
        api_url = %config.proxy.api_url,
        "proxy"
    );
    info!(
        class = %config.auth.class,
        kind = AuthenticatorKind::detect(&config.auth.class).label(),
        admin_users = config.auth.admin_users.len(),
        "authenticator"
    );
    info!(
        ip = %config.hub.ip,
        port = config.hub.port,
        bind_url = %config.hub.bind_url,
        "hub network"
    );

    println!(
        "configuration OK: {} options",
        config.to_document()?.len()
    );
    Ok(())
}

fn show(
    config_path: Option<&str>,
    raw_overrides: &[String],
    format: OutputFormat,
) -> rookery::Result<()> {
    let config = load(config_path, raw_overrides)?;

    match format {
        OutputFormat::Flat => {
            print!("{}", config.to_document()?);
        }
        OutputFormat::Toml => {
            let rendered = toml::to_string_pretty(&config).map_err(DocumentError::from)?;
            print!("{rendered}");
        }
        OutputFormat::Json => {
            let rendered = serde_json::to_string_pretty(&config.to_document()?.to_json())
                .map_err(DocumentError::from)?;
            println!("{rendered}");
        }
    }
    Ok(())
}

fn init(path: Option<PathBuf>, force: bool) -> anyhow::Result<()> {
    let path = match path {
        Some(path) => path,
        None => dirs::config_dir()
            .context("could not determine the user configuration directory")?
            .join("rookery")
            .join("config.toml"),
    };

    if path.exists() && !force {
        anyhow::bail!(
            "refusing to overwrite {}; pass --force to replace it",
            path.display()
        );
    }
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)
            .with_context(|| format!("failed to create {}", parent.display()))?;
    }
    fs::write(&path, STARTER_CONFIG)
        .with_context(|| format!("failed to write {}", path.display()))?;

    info!(path = %path.display(), "wrote starter configuration");
    println!("wrote {}", path.display());
    Ok(())
}
