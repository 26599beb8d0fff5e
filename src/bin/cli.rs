//! fatcache CLI Client
//!
//! Command-line interface for interacting with a fatcache server.

use std::process::ExitCode;

use clap::{Parser, Subcommand};
use fatcache::{connect_json, Client, Config, Result};
use tracing_subscriber::{fmt, EnvFilter};

/// fatcache CLI
#[derive(Parser, Debug)]
#[command(name = "fatcache-cli")]
#[command(about = "CLI for the fatcache cache server")]
#[command(version)]
struct Args {
    /// Server host
    #[arg(long, default_value = fatcache::config::DEFAULT_HOST)]
    host: String,

    /// Server port
    #[arg(short, long, default_value_t = fatcache::config::DEFAULT_PORT)]
    port: u16,

    /// Read timeout in milliseconds (0 = wait forever)
    #[arg(short, long, default_value = "5000")]
    timeout_ms: u64,

    /// Treat values as raw strings instead of JSON
    #[arg(long)]
    raw: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Get a value by key
    Get {
        /// The key to get
        key: String,
    },

    /// Set a key-value pair
    Set {
        /// The key to set
        key: String,

        /// The value to set (JSON unless --raw)
        value: String,

        /// Opaque client flags stored with the value
        #[arg(short, long, default_value = "0")]
        flags: u32,

        /// Expiry in seconds (0 = never)
        #[arg(short, long, default_value = "0")]
        expiry: u32,
    },

    /// Delete a key
    Del {
        /// The key to delete
        key: String,
    },
}

fn main() -> ExitCode {
    // Initialize tracing/logging
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("warn,fatcache=info"));

    fmt()
        .with_env_filter(filter)
        .with_target(true)
        .with_writer(std::io::stderr)
        .init();

    let args = Args::parse();

    let config = Config::builder()
        .host(&args.host)
        .port(args.port)
        .read_timeout_ms(args.timeout_ms)
        .build();

    tracing::debug!("Connecting to {}", config.addr());

    let result = if args.raw {
        run_raw(config, args.command)
    } else {
        run_json(config, args.command)
    };

    match result {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            tracing::error!("{}", e);
            eprintln!("error: {}", e);
            ExitCode::FAILURE
        }
    }
}

fn run_raw(config: Config, command: Commands) -> Result<()> {
    let mut client = Client::connect(config)?;

    match command {
        Commands::Get { key } => match client.get(key.as_bytes())? {
            Some(item) => println!("{} (flags={})", String::from_utf8_lossy(&item.payload), item.flags),
            None => println!("(nil)"),
        },
        Commands::Set {
            key,
            value,
            flags,
            expiry,
        } => {
            client.set(key.as_bytes(), value.as_bytes(), flags, expiry)?;
            println!("STORED");
        }
        Commands::Del { key } => {
            client.delete(key.as_bytes())?;
            println!("OK");
        }
    }

    client.close()
}

fn run_json(config: Config, command: Commands) -> Result<()> {
    let mut client = connect_json(config)?;

    match command {
        Commands::Get { key } => match client.get(key.as_bytes())? {
            Some((value, flags)) => println!("{} (flags={})", value, flags),
            None => println!("(nil)"),
        },
        Commands::Set {
            key,
            value,
            flags,
            expiry,
        } => {
            let value: serde_json::Value = serde_json::from_str(&value)
                .map_err(|e| fatcache::FatcacheError::Encode(format!("invalid JSON value: {}", e)))?;
            client.set(key.as_bytes(), &value, flags, expiry)?;
            println!("STORED");
        }
        Commands::Del { key } => {
            client.delete(key.as_bytes())?;
            println!("OK");
        }
    }

    client.close()
}
