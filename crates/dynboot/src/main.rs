//! Tox bootstrap node discovery CLI.

use anyhow::{Context, Result};
use clap::{Parser, Subcommand, ValueEnum};
use std::path::PathBuf;
use std::time::Duration;
use tox_dynboot::{Discovery, DiscoveryConfig, Error, TableLayout, ToxNode, logging};
use tracing::debug;

#[derive(Parser)]
#[command(name = "tox-dynboot")]
#[command(about = "Find live Tox bootstrap nodes")]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    #[arg(long, global = true, default_value = "info")]
    log_level: String,

    /// YAML config file
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Registry page URL
    #[arg(long, global = true)]
    url: Option<String>,

    /// Registry table layout (legacy, status)
    #[arg(long, global = true)]
    layout: Option<TableLayout>,

    /// Probe timeout, e.g. "2s" or "750ms"
    #[arg(long, global = true, value_parser = humantime::parse_duration)]
    timeout: Option<Duration>,

    /// Seed for random selection
    #[arg(long, global = true)]
    seed: Option<u64>,

    #[arg(long, global = true, value_enum, default_value_t = OutputFormat::Table)]
    format: OutputFormat,
}

#[derive(Subcommand)]
enum Commands {
    /// Every node listed in the registry
    All,
    /// Nodes the registry marks as up
    Up,
    /// A random node marked as up, without probing
    Any,
    /// All nodes marked as up that answer a probe
    Reachable,
    /// A random node among those that answer a probe
    AnyReachable,
    /// The node whose probe finishes first, if it answered
    FirstReachable,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
enum OutputFormat {
    Table,
    Json,
}

fn load_config(cli: &Cli) -> Result<DiscoveryConfig> {
    let mut config = match &cli.config {
        Some(path) => DiscoveryConfig::from_yaml_file(path)?,
        None => DiscoveryConfig::default(),
    };
    if let Some(url) = &cli.url {
        config.registry_url = url.clone();
    }
    if let Some(layout) = cli.layout {
        config.layout = layout;
    }
    if let Some(timeout) = cli.timeout {
        config.probe_timeout = timeout;
    }
    if cli.seed.is_some() {
        config.rng_seed = cli.seed;
    }
    Ok(config)
}

fn print_nodes(nodes: &[ToxNode], format: OutputFormat) -> Result<()> {
    match format {
        OutputFormat::Json => {
            println!("{}", serde_json::to_string_pretty(nodes)?);
        }
        OutputFormat::Table => {
            println!(
                "{:<16} {:>5}  {:<4}  {:<4}  {:<20}  KEY",
                "IPV4", "PORT", "UP", "LOC", "MAINTAINER"
            );
            for node in nodes {
                println!(
                    "{:<16} {:>5}  {:<4}  {:<4}  {:<20}  {}",
                    node.ipv4,
                    node.port,
                    if node.status { "yes" } else { "no" },
                    node.location,
                    node.maintainer,
                    node.public_key_hex()
                );
            }
        }
    }
    Ok(())
}

fn print_one(node: Option<ToxNode>, format: OutputFormat) -> Result<()> {
    match (node, format) {
        (Some(node), _) => print_nodes(&[node], format),
        (None, OutputFormat::Json) => {
            println!("null");
            Ok(())
        }
        (None, OutputFormat::Table) => {
            eprintln!("No reachable bootstrap node found");
            Ok(())
        }
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    logging::init(&cli.log_level);

    let config = load_config(&cli)?;
    debug!("Using config: {:?}", config);

    let discovery =
        Discovery::from_config(&config).context("failed to set up registry client")?;
    let timeout = config.probe_timeout;

    match cli.command {
        Commands::All => print_nodes(&discovery.fetch_all_candidates().await?, cli.format),
        Commands::Up => print_nodes(&discovery.fetch_up().await?, cli.format),
        Commands::Any => print_one(discovery.fetch_any().await?, cli.format),
        Commands::Reachable => {
            print_nodes(&discovery.fetch_reachable(timeout).await?, cli.format)
        }
        Commands::AnyReachable => {
            print_one(discovery.fetch_any_reachable(timeout).await?, cli.format)
        }
        Commands::FirstReachable => match discovery.fetch_first_reachable(timeout).await {
            Ok(node) => print_one(node, cli.format),
            Err(Error::NoCandidates) => print_one(None, cli.format),
            Err(e) => Err(e.into()),
        },
    }
}
