use anyhow::{Context, Result};
use board_core::config::Config;
use board_core::core_board::{ActorId, RecordStore};
use board_core::logging::{init_logging_with_config, LogConfig, LogLevel};
use board_core::metrics::init_metrics;
use board_core::BoardServer;
use clap::Parser;
use serde::Serialize;
use std::net::SocketAddr;
use std::path::PathBuf;
use std::sync::Arc;
use tracing::{debug, info, warn};

#[derive(Parser, Debug)]
#[command(name = "board")]
#[command(author, version, about = "Append-only public message board", long_about = None)]
struct Args {
    /// Set the log level (trace, debug, info, warn, error); overrides the config file
    #[arg(short, long)]
    log_level: Option<String>,

    /// Enable JSON formatted logging
    #[arg(long)]
    json_logs: bool,

    /// Path to a TOML config file
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Directory holding the record log; overrides the config file
    #[arg(short, long)]
    data_dir: Option<PathBuf>,

    /// Subcommand to execute
    #[command(subcommand)]
    command: Command,
}

#[derive(Parser, Debug)]
enum Command {
    /// Serve the board over HTTP until Ctrl-C
    Serve {
        /// Address to bind; overrides the config file
        #[arg(long)]
        bind: Option<SocketAddr>,
    },

    /// Post a message
    Post {
        /// Author actor id (0x followed by 40 hex digits)
        #[arg(long)]
        author: String,

        /// Message text
        content: String,
    },

    /// Print the message at an index
    Get { index: u64 },

    /// Print the number of messages
    Count,

    /// Print every message in posting order
    List,

    /// Print the messages written by one author
    ByAuthor {
        /// Author actor id
        author: String,
    },
}

fn load_config(args: &Args) -> Result<Config> {
    let mut config = match &args.config {
        Some(path) => Config::from_file(path)
            .with_context(|| format!("failed to load config from {}", path.display()))?,
        None => Config::from_env().context("failed to read config from environment")?,
    };

    if let Some(dir) = &args.data_dir {
        config.store.data_dir = dir.clone();
    }
    if let Command::Serve { bind: Some(addr) } = &args.command {
        config.server.bind_address = *addr;
    }

    config.validate()?;
    Ok(config)
}

fn init_logging(args: &Args, config: &Config) -> Result<()> {
    let mut log_config = LogConfig::from_settings(&config.logging);

    if let Some(level) = &args.log_level {
        log_config.level = LogLevel::parse(level).unwrap_or_else(|| {
            eprintln!("Invalid log level '{}', using 'info'", level);
            LogLevel::Info
        });
    }
    if args.json_logs {
        log_config = log_config.json_format(true);
    }

    init_logging_with_config(log_config)?;
    Ok(())
}

fn print_json<T: Serialize>(value: &T) -> Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();
    let config = load_config(&args)?;
    init_logging(&args, &config)?;
    init_metrics();

    debug!(?config, "Loaded configuration");
    if !config.store.persist {
        warn!("Persistence is disabled; records will not outlive this process");
    }

    let store = RecordStore::open(&config.store)
        .with_context(|| format!("failed to open store in {}", config.store.data_dir.display()))?;

    match args.command {
        Command::Serve { .. } => {
            info!(records = store.count(), "Starting board server");
            let server = BoardServer::new(Arc::new(store), &config.server)?;
            server.run().await?;
        }
        Command::Post { author, content } => {
            let author = ActorId::parse(&author)?;
            let index = store.post(author, content)?;
            print_json(&serde_json::json!({ "index": index }))?;
        }
        Command::Get { index } => {
            print_json(&store.get(index)?)?;
        }
        Command::Count => {
            print_json(&serde_json::json!({ "count": store.count() }))?;
        }
        Command::List => {
            print_json(&store.get_all())?;
        }
        Command::ByAuthor { author } => {
            let author = ActorId::parse(&author)?;
            print_json(&store.get_by_author(&author))?;
        }
    }

    Ok(())
}
