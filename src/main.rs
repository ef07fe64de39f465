//! pdg-lookup - interactive particle lookup
//!
//! Entry point: parses the command line, sets up logging and configuration,
//! builds the resolver bridge and runs either the terminal UI or a one-shot
//! lookup.

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use pdg_lookup_core::cli::{self as handlers, ConfigAction};
use pdg_lookup_core::tui::LookupApp;
use pdg_lookup_core::{BackendKind, LookupConfig, QueryDispatcher, ResolverBridge, SearchMode};
use std::path::PathBuf;
use std::sync::Arc;
use tracing::{debug, Level};
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "pdg-lookup")]
#[command(about = "Look up particle properties by PDG ID or name")]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,

    /// Configuration file (defaults to the user config dir)
    #[arg(long, global = true, env = "PDG_LOOKUP_CONFIG")]
    config: Option<PathBuf>,

    /// Log level (trace, debug, info, warn, error)
    #[arg(short, long, global = true, default_value = "info")]
    log_level: String,

    /// Python interpreter for the process backend
    #[arg(long, global = true)]
    python: Option<String>,

    /// Resolver backend (process, embedded)
    #[arg(long, global = true)]
    backend: Option<BackendKind>,

    /// Give up on a single lookup after this many seconds
    #[arg(long, global = true)]
    timeout_secs: Option<u64>,

    /// Install the particle package with pip if it is missing
    #[arg(long, global = true)]
    install_missing: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// Interactive terminal UI (default)
    Tui {
        /// Initial search mode (pdg-id, name)
        #[arg(long)]
        mode: Option<SearchMode>,

        /// Hide the title bar
        #[arg(long)]
        no_header: bool,
    },

    /// Resolve queries non-interactively and print the history table
    Lookup {
        /// PDG ID to resolve (repeatable)
        #[arg(long = "pdg-id", value_name = "ID", allow_hyphen_values = true)]
        pdg_ids: Vec<String>,

        /// Particle name to resolve (repeatable)
        #[arg(long = "name", value_name = "NAME", allow_hyphen_values = true)]
        names: Vec<String>,

        /// Print history as JSON
        #[arg(long)]
        json: bool,
    },

    /// Load the resolver and report whether it works
    Doctor,

    /// Manage the configuration file
    Config {
        #[command(subcommand)]
        action: ConfigAction,
    },
}

fn parse_level(level: &str) -> Level {
    match level {
        "trace" => Level::TRACE,
        "debug" => Level::DEBUG,
        "info" => Level::INFO,
        "warn" => Level::WARN,
        "error" => Level::ERROR,
        _ => Level::INFO,
    }
}

/// Initialize tracing; the TUI owns the terminal, so its logs go to a file
fn init_tracing(level: Level, to_file: bool) -> Result<()> {
    let level = level.as_str().to_lowercase();
    let filter = EnvFilter::new(format!("pdg_lookup={level},pdg_lookup_core={level}"));

    if to_file {
        let log_path = dirs::data_local_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join("pdg-lookup")
            .join("pdg-lookup.log");
        if let Some(parent) = log_path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let file = std::fs::OpenOptions::new()
            .create(true)
            .append(true)
            .open(&log_path)
            .with_context(|| format!("Failed to open log file {}", log_path.display()))?;

        tracing_subscriber::fmt()
            .with_env_filter(filter)
            .with_ansi(false)
            .with_writer(std::sync::Mutex::new(file))
            .init();
    } else {
        tracing_subscriber::fmt()
            .with_env_filter(filter)
            .with_target(false)
            .with_writer(std::io::stderr) // Logs to stderr, not stdout
            .init();
    }

    Ok(())
}

/// Load configuration and apply command-line overrides
fn load_config(cli: &Cli) -> Result<LookupConfig> {
    let path = cli.config.clone().unwrap_or_else(LookupConfig::default_path);
    let mut config = LookupConfig::load(Some(&path)).context("Failed to load configuration")?;

    if let Some(python) = &cli.python {
        config.resolver.python = python.clone();
    }
    if let Some(backend) = cli.backend {
        config.resolver.backend = backend;
    }
    if cli.timeout_secs.is_some() {
        config.resolver.timeout_secs = cli.timeout_secs;
    }
    if cli.install_missing {
        config.resolver.install_missing = true;
    }

    config.validate()?;
    Ok(config)
}

fn build_bridge(config: &LookupConfig) -> Result<Arc<ResolverBridge>> {
    let bridge =
        ResolverBridge::from_settings(&config.resolver).context("Failed to set up resolver")?;
    Ok(Arc::new(bridge))
}

async fn run_tui(config: &LookupConfig, mode: SearchMode, show_header: bool) -> Result<()> {
    let dispatcher = QueryDispatcher::new(build_bridge(config)?, mode);
    LookupApp::new(dispatcher, config.ui.tick_rate_ms, show_header)
        .run()
        .await
        .context("TUI runtime error")
}

#[tokio::main]
async fn main() -> Result<()> {
    let mut cli = Cli::parse();

    let interactive = matches!(cli.command, None | Some(Commands::Tui { .. }));
    init_tracing(parse_level(&cli.log_level), interactive)?;

    debug!("pdg-lookup v{} starting...", env!("CARGO_PKG_VERSION"));

    let mut stdout = std::io::stdout();
    match cli.command.take() {
        None => {
            let config = load_config(&cli)?;
            run_tui(&config, config.ui.default_mode, config.ui.show_header).await
        }
        Some(Commands::Tui { mode, no_header }) => {
            let config = load_config(&cli)?;
            let mode = mode.unwrap_or(config.ui.default_mode);
            run_tui(&config, mode, config.ui.show_header && !no_header).await
        }
        Some(Commands::Lookup {
            pdg_ids,
            names,
            json,
        }) => {
            let config = load_config(&cli)?;
            let dispatcher = QueryDispatcher::new(build_bridge(&config)?, config.ui.default_mode);
            handlers::run_lookup(&dispatcher, pdg_ids, names, json, &mut stdout).await
        }
        Some(Commands::Doctor) => {
            let config = load_config(&cli)?;
            handlers::run_doctor(&*build_bridge(&config)?, &config, &mut stdout).await
        }
        Some(Commands::Config { action }) => match action {
            // Must not require a loadable file: it is how one gets created
            ConfigAction::Init { force } => {
                let path = cli.config.clone().unwrap_or_else(LookupConfig::default_path);
                handlers::config::init(&path, force, &mut stdout)
            }
            ConfigAction::Show => handlers::config::show(&load_config(&cli)?, &mut stdout),
        },
    }
}
