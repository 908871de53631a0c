mod config;
mod error;

use std::path::{Path, PathBuf};

use clap::{Parser, Subcommand};
use moncap::{MonCap, Query};
use tracing::debug;
use tracing_subscriber::{EnvFilter, fmt, layer::SubscriberExt, util::SubscriberInitExt};

use config::Config;
use error::{Error, Result};

const CONFIG_FILE: &str = "moncap.toml";

#[derive(Parser)]
#[command(name = "moncap")]
#[command(about = "Parse and evaluate monitor capability strings", long_about = None)]
#[command(version)]
struct Cli {
    /// Config file (defaults to ./moncap.toml when present)
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Parse a capability string and print its grants
    Parse {
        /// Capability string, e.g. "allow r service=mon"
        caps: String,
        /// Print the grants as JSON
        #[arg(long, conflicts_with = "canonical")]
        json: bool,
        /// Print capability text that parses back to the same grants
        #[arg(long)]
        canonical: bool,
    },
    /// Check whether a capability allows a request
    Check {
        /// Capability string, e.g. "allow rwx pool=foo"
        caps: String,
        /// Service being accessed
        #[arg(short, long)]
        service: Option<String>,
        /// Pool being accessed
        #[arg(short, long, default_value = "")]
        pool: String,
        /// Command being run
        #[arg(long, default_value = "")]
        command: String,
        /// Request read access
        #[arg(short, long)]
        read: bool,
        /// Request write access
        #[arg(short, long)]
        write: bool,
        /// Request execute access
        #[arg(short = 'x', long)]
        exec: bool,
    },
}

fn main() {
    if let Err(e) = run() {
        eprintln!("Error: {e}");
        std::process::exit(1);
    }
}

fn run() -> Result<()> {
    let cli = Cli::parse();
    let config = load_config(cli.config.as_deref())?;
    init_logging(&config.log.filter)?;

    match cli.command {
        Commands::Parse {
            caps,
            json,
            canonical,
        } => cmd_parse(&caps, json, canonical),
        Commands::Check {
            caps,
            service,
            pool,
            command,
            read,
            write,
            exec,
        } => {
            let service = service.or(config.query.service).unwrap_or_default();
            let mut query = Query::new().service(service).pool(pool).command(command);
            if read {
                query = query.read();
            }
            if write {
                query = query.write();
            }
            if exec {
                query = query.exec();
            }
            cmd_check(&caps, &query)
        }
    }
}

fn cmd_parse(caps: &str, json: bool, canonical: bool) -> Result<()> {
    let cap = MonCap::parse(caps)?;

    if json {
        println!("{}", serde_json::to_string_pretty(&cap)?);
    } else if canonical {
        println!("{}", cap.to_canonical());
    } else {
        println!("{cap}");
        if cap.allow_all() {
            println!("(allows everything)");
        }
    }
    Ok(())
}

fn cmd_check(caps: &str, query: &Query) -> Result<()> {
    let cap = MonCap::parse(caps)?;
    cap.require(query)?;
    println!("allowed: {query}");
    Ok(())
}

fn load_config(explicit: Option<&Path>) -> Result<Config> {
    match explicit {
        Some(path) => Config::load(path),
        None if Path::new(CONFIG_FILE).exists() => Config::load(CONFIG_FILE),
        None => Ok(Config::default()),
    }
}

fn init_logging(default_filter: &str) -> Result<()> {
    let filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(default_filter))
        .map_err(|e| Error::Logging(e.to_string()))?;

    let fmt_layer = fmt::layer()
        .with_writer(std::io::stderr)
        .compact()
        .with_target(false);

    tracing_subscriber::registry()
        .with(filter)
        .with(fmt_layer)
        .try_init()
        .map_err(|e| Error::Logging(e.to_string()))?;

    debug!(filter = default_filter, "logging initialized");
    Ok(())
}
