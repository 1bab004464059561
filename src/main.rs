//! Pokedex Browser terminal front end
//!
//! Reads commands from stdin, drives the browser controller against the
//! catalog API and renders the current list or detail view to stdout.
//! Logs go to stderr.

use std::path::PathBuf;
use std::process::ExitCode;

use clap::Parser;
use tokio::io::{self, AsyncBufReadExt, BufReader};
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

use pokedex_browser::commands::{execute, parse_command};
use pokedex_browser::display::display_filters;
use pokedex_browser::{BrowserConfig, BrowserController, ConfigResult, HttpTransport, PokedexClient};

#[derive(Debug, Parser)]
#[command(name = "pokedex", version, about = "Browse a Pokemon catalog API from the terminal")]
struct Args {
    /// RON config file
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Catalog API base URL (overrides the config file and POKEDEX_API_BASE)
    #[arg(long)]
    api_base: Option<String>,

    /// Results per page
    #[arg(long)]
    page_size: Option<u64>,

    /// Log debug output to stderr
    #[arg(short, long)]
    verbose: bool,
}

fn init_logging(verbose: bool) {
    let default_level = if verbose { "debug" } else { "warn" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}

fn load_config(args: &Args) -> ConfigResult<BrowserConfig> {
    let mut config = BrowserConfig::load(args.config.as_deref())?;
    if let Some(api_base) = &args.api_base {
        config.api_base = api_base.clone();
    }
    if let Some(page_size) = args.page_size {
        config.page_size = page_size;
    }
    config.validate()
}

#[tokio::main]
async fn main() -> ExitCode {
    let args = Args::parse();
    init_logging(args.verbose);

    let config = match load_config(&args) {
        Ok(config) => config,
        Err(e) => {
            eprintln!("Error loading configuration: {}", e);
            return ExitCode::FAILURE;
        }
    };

    let transport = match HttpTransport::new() {
        Ok(transport) => transport,
        Err(e) => {
            eprintln!("Error initializing HTTP client: {}", e);
            return ExitCode::FAILURE;
        }
    };

    let client = PokedexClient::new(transport, config.api_base.clone());
    if let Err(e) = client.check_health().await {
        warn!("backend at {} did not answer /health: {}", config.api_base, e);
    }

    let mut controller = BrowserController::new(client, &config);
    controller.start();
    controller.settle().await;

    println!("Pokedex Browser ({}). Type 'help' for commands.", config.api_base);
    println!("{}\n{}", display_filters(controller.filters()), controller.list_view());

    let mut lines = BufReader::new(io::stdin()).lines();
    loop {
        let line = match lines.next_line().await {
            Ok(Some(line)) => line,
            Ok(None) => break,
            Err(e) => {
                eprintln!("Error reading input: {}", e);
                break;
            }
        };
        if line.trim().is_empty() {
            continue;
        }

        let command = match parse_command(&line) {
            Ok(command) => command,
            Err(e) => {
                println!("{}", e);
                continue;
            }
        };

        match execute(&mut controller, command).await {
            Some(text) => println!("{}", text),
            None => break,
        }
    }

    controller.shutdown();
    info!("session ended");
    ExitCode::SUCCESS
}
