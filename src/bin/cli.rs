//! photon-cli
//!
//! Command-line interface for interacting with a Photon server.

use std::path::PathBuf;
use std::process::ExitCode;

use clap::{Parser, Subcommand};
use photon_bridge::{status_report, Client, Config, Result};
use tracing_subscriber::{fmt, EnvFilter};

/// photon-cli
#[derive(Parser, Debug)]
#[command(name = "photon-cli")]
#[command(about = "CLI for the Photon key-value server")]
#[command(version)]
struct Args {
    /// Server host (overrides config)
    #[arg(long)]
    host: Option<String>,

    /// Server port (overrides config)
    #[arg(short, long)]
    port: Option<u16>,

    /// JSON config file (defaults to $PHOTON_BRIDGE_CONFIG or ./config.json)
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Log requests and responses
    #[arg(short, long)]
    debug: bool,

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

        /// The value to set
        value: String,
    },

    /// Delete a key
    Del {
        /// The key to delete
        key: String,
    },

    /// List all keys
    Keys,

    /// Ping the server
    Ping,

    /// Print the status report as JSON
    Status,

    /// Send a raw command and print the decoded value
    Raw {
        /// Command name and arguments
        #[arg(required = true, num_args = 1.., allow_hyphen_values = true)]
        args: Vec<String>,
    },
}

fn main() -> ExitCode {
    let args = Args::parse();

    let config = match resolve_config(&args) {
        Ok(config) => config,
        Err(e) => {
            eprintln!("{}", e);
            return ExitCode::FAILURE;
        }
    };

    // Initialize tracing/logging
    let default_filter = if config.debug {
        "warn,photon_bridge=debug"
    } else {
        "warn"
    };
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(default_filter));

    fmt()
        .with_env_filter(filter)
        .with_target(true)
        .with_writer(std::io::stderr)
        .init();

    tracing::debug!("photon-cli v{} -> {}", photon_bridge::VERSION, config.addr());

    let client = Client::new(config);
    match run(&client, args.command) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("{}", e);
            ExitCode::FAILURE
        }
    }
}

/// Config file and environment first, then command-line flags
fn resolve_config(args: &Args) -> Result<Config> {
    let mut config = match &args.config {
        Some(path) => Config::from_sources(Some(path.as_path()), |key| std::env::var(key).ok())?,
        None => Config::load()?,
    };

    if let Some(host) = &args.host {
        config.host = host.clone();
    }
    if let Some(port) = args.port {
        config.port = port;
    }
    if args.debug {
        config.debug = true;
    }

    Ok(config)
}

fn run(client: &Client, command: Commands) -> Result<()> {
    match command {
        Commands::Get { key } => match client.get(&key)? {
            Some(value) => println!("{}", value),
            None => println!("(nil)"),
        },
        Commands::Set { key, value } => {
            client.set(&key, &value)?;
            println!("OK");
        }
        Commands::Del { key } => println!("(int) {}", client.delete(&key)?),
        Commands::Keys => {
            for key in client.keys()? {
                println!("{}", key);
            }
        }
        Commands::Ping => println!("{}", client.ping()?),
        Commands::Status => {
            let report = status_report(client);
            match serde_json::to_string_pretty(&report) {
                Ok(json) => println!("{}", json),
                Err(e) => eprintln!("failed to render status: {}", e),
            }
        }
        Commands::Raw { args } => println!("{}", client.execute(args)?),
    }

    Ok(())
}
