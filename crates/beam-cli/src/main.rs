//! # Beam CLI Entry Point
//!
//! Main binary for Beam. Serves the HTTP front end or runs single queries
//! against the access nodes of a node directory.
//!
//! ## Usage
//!
//! ```bash
//! # Serve on 0.0.0.0:8080 using the directory in $ACCESS_NODES
//! beam serve
//!
//! # Serve with an explicit directory and address
//! beam serve --nodes nodes.json --bind 127.0.0.1:9000
//!
//! # One event range query (outputs raw JSON)
//! beam events --nodes nodes.json -t A.0b2a3299cc857e29.TopShot.Deposit 100 200
//!
//! # Latest sealed block height
//! beam latest --nodes nodes.json
//!
//! # Print the directory as loaded
//! beam nodes --nodes nodes.json
//! ```

use anyhow::Result;
use argh::FromArgs;
use beam_cli::config;
use beam_common::QueryRange;
use beam_router::{Aggregator, HttpServer, NodeDirectory};
use std::sync::Arc;

#[derive(FromArgs)]
/// Beam - height-range routing over versioned access nodes
struct Cli {
    #[argh(subcommand)]
    command: Commands,
}

#[derive(FromArgs)]
#[argh(subcommand)]
enum Commands {
    Serve(ServeArgs),
    Events(EventsArgs),
    Latest(LatestArgs),
    Nodes(NodesArgs),
}

/// Arguments for running the HTTP server.
///
/// The directory is loaded once at startup to fail fast on a broken file, and
/// then again for every request so edits take effect without a restart.
#[derive(FromArgs)]
#[argh(subcommand, name = "serve")]
/// start the Beam HTTP server
struct ServeArgs {
    /// path to the node directory JSON file (default: $ACCESS_NODES)
    #[argh(option, short = 'n')]
    nodes: Option<String>,

    /// address to bind the HTTP server to (default: 0.0.0.0:$LISTEN_PORT or 0.0.0.0:8080)
    #[argh(option, short = 'b')]
    bind: Option<String>,
}

#[derive(FromArgs)]
#[argh(subcommand, name = "events")]
/// collect events for a height range and print them as JSON
struct EventsArgs {
    /// path to the node directory JSON file (default: $ACCESS_NODES)
    #[argh(option, short = 'n')]
    nodes: Option<String>,

    /// fully qualified event type
    #[argh(option, short = 't', long = "event-type")]
    event_type: String,

    /// first height of the range
    #[argh(positional)]
    start: u64,

    /// last height of the range (inclusive)
    #[argh(positional)]
    end: u64,
}

#[derive(FromArgs)]
#[argh(subcommand, name = "latest")]
/// print the latest sealed block height
struct LatestArgs {
    /// path to the node directory JSON file (default: $ACCESS_NODES)
    #[argh(option, short = 'n')]
    nodes: Option<String>,
}

#[derive(FromArgs)]
#[argh(subcommand, name = "nodes")]
/// print the node directory as loaded
struct NodesArgs {
    /// path to the node directory JSON file (default: $ACCESS_NODES)
    #[argh(option, short = 'n')]
    nodes: Option<String>,
}

fn directory(flag: Option<String>) -> Result<NodeDirectory> {
    let path = config::nodes_path(flag, std::env::var(config::NODES_ENV).ok())?;
    Ok(NodeDirectory::from_file(path))
}

fn init_tracing() {
    // RUST_LOG wins; APP_LOG_LEVEL is the deployment knob
    let env_filter = tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| {
        let level = std::env::var(config::LOG_LEVEL_ENV).ok();
        tracing_subscriber::EnvFilter::new(config::log_level(level.as_deref()))
    });
    tracing_subscriber::fmt().with_env_filter(env_filter).init();
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli: Cli = argh::from_env();

    // One-shot commands print JSON to stdout and stay quiet otherwise
    if matches!(cli.command, Commands::Serve(_)) {
        init_tracing();
    }

    match cli.command {
        Commands::Serve(args) => run_serve(args).await,
        Commands::Events(args) => run_events(args).await,
        Commands::Latest(args) => run_latest(args).await,
        Commands::Nodes(args) => run_nodes(args),
    }
}

async fn run_serve(args: ServeArgs) -> Result<()> {
    let directory = directory(args.nodes)?;
    let addr = config::bind_addr(args.bind, std::env::var(config::PORT_ENV).ok())?;

    let nodes = directory.load()?;
    if nodes.is_empty() {
        tracing::warn!("Node directory is empty; every query will fail with no coverage");
    }
    for node in &nodes {
        tracing::debug!("{}", node);
    }
    tracing::info!("Loaded {} access nodes", nodes.len());

    let aggregator = Arc::new(Aggregator::new(directory));
    HttpServer::new(aggregator).run(addr).await?;

    Ok(())
}

async fn run_events(args: EventsArgs) -> Result<()> {
    let aggregator = Aggregator::new(directory(args.nodes)?);
    let range = QueryRange::new(args.start, args.end)?;

    match aggregator.collect_events(&args.event_type, range).await {
        Ok(result) => {
            println!("{}", serde_json::to_string(&result)?);
            Ok(())
        }
        Err(failure) => {
            eprintln!(
                "partial result: {} blocks from {} api calls",
                failure.partial.blocks.len(),
                failure.partial.api_calls
            );
            Err(failure.into())
        }
    }
}

async fn run_latest(args: LatestArgs) -> Result<()> {
    let aggregator = Aggregator::new(directory(args.nodes)?);
    let latest = aggregator.latest_block_height().await?;

    let output = serde_json::json!({
        "LatestBlockHeight": latest.value,
        "ApiCalls": latest.api_calls,
    });
    println!("{}", output);

    Ok(())
}

fn run_nodes(args: NodesArgs) -> Result<()> {
    let nodes = directory(args.nodes)?.load()?;
    println!("{}", serde_json::to_string_pretty(&nodes)?);
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cli_parse_serve_defaults() {
        let args: Cli = Cli::from_args(&["beam"], &["serve"]).unwrap();
        match args.command {
            Commands::Serve(ServeArgs { nodes, bind }) => {
                assert!(nodes.is_none());
                assert!(bind.is_none());
            }
            _ => panic!("Expected Serve command"),
        }
    }

    #[test]
    fn test_cli_parse_serve_with_options() {
        let args: Cli = Cli::from_args(
            &["beam"],
            &["serve", "--nodes", "nodes.json", "-b", "127.0.0.1:9000"],
        )
        .unwrap();
        match args.command {
            Commands::Serve(ServeArgs { nodes, bind }) => {
                assert_eq!(nodes.as_deref(), Some("nodes.json"));
                assert_eq!(bind.as_deref(), Some("127.0.0.1:9000"));
            }
            _ => panic!("Expected Serve command"),
        }
    }

    #[test]
    fn test_cli_parse_events() {
        let args: Cli = Cli::from_args(
            &["beam"],
            &["events", "-n", "nodes.json", "--event-type", "A.Deposit", "100", "200"],
        )
        .unwrap();
        match args.command {
            Commands::Events(EventsArgs { nodes, event_type, start, end }) => {
                assert_eq!(nodes.as_deref(), Some("nodes.json"));
                assert_eq!(event_type, "A.Deposit");
                assert_eq!((start, end), (100, 200));
            }
            _ => panic!("Expected Events command"),
        }
    }

    #[test]
    fn test_cli_parse_events_requires_event_type() {
        assert!(Cli::from_args(&["beam"], &["events", "1", "2"]).is_err());
    }

    #[test]
    fn test_cli_parse_events_rejects_negative_height() {
        assert!(Cli::from_args(&["beam"], &["events", "-t", "A.X", "--", "-1", "2"]).is_err());
    }

    #[test]
    fn test_cli_parse_latest_and_nodes() {
        let args: Cli = Cli::from_args(&["beam"], &["latest", "-n", "a.json"]).unwrap();
        assert!(matches!(args.command, Commands::Latest(LatestArgs { nodes: Some(_) })));

        let args: Cli = Cli::from_args(&["beam"], &["nodes"]).unwrap();
        assert!(matches!(args.command, Commands::Nodes(NodesArgs { nodes: None })));
    }
}
