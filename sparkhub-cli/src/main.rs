//! SparkHub CLI
//!
//! Command-line client for the SparkHub seed vault, Spark address tools and
//! Lightning Address payments.

use anyhow::Result;
use clap::{Parser, Subcommand};
use sparkhub_lib::SparkNetwork;

mod commands;
mod ui;

#[derive(Parser)]
#[command(name = "sparkhub")]
#[command(about = "SparkHub CLI - seed vault, Spark addresses and Lightning Address payments", long_about = None)]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Enable verbose output
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Custom storage directory (can also be set via SPARKHUB_DIR env var)
    #[arg(long, global = true, env = "SPARKHUB_DIR")]
    storage_dir: Option<String>,

    /// Spark network for address handling
    #[arg(long, global = true, env = "SPARKHUB_NETWORK", default_value = "mainnet")]
    network: SparkNetwork,
}

#[derive(Subcommand)]
enum Commands {
    /// Manage the password-sealed seed phrase
    Vault {
        #[command(subcommand)]
        action: VaultAction,
    },

    /// Check that sealing and unsealing work on this machine
    Selftest {
        /// Override log2(N) of the scrypt cost
        #[arg(long)]
        log_n: Option<u8>,
    },

    /// Decode a Spark address to its identity public key
    Decode {
        /// Spark address (spark1... or sp1...)
        address: String,

        /// Print JSON
        #[arg(long)]
        json: bool,
    },

    /// Fetch an invoice for a Lightning Address
    Invoice {
        /// Lightning Address (user@domain)
        address: String,

        /// Amount in satoshis
        #[arg(short, long)]
        sats: u64,

        /// Comment for the recipient
        #[arg(short, long)]
        comment: Option<String>,

        /// Resolve over plain HTTP (local development)
        #[arg(long)]
        insecure: bool,

        /// Print JSON
        #[arg(long)]
        json: bool,
    },

    /// Stable scrypt hash of a string
    Hash {
        /// Input string
        input: String,

        /// Salt
        #[arg(long, default_value = "sparkhub")]
        salt: String,
    },
}

#[derive(Subcommand)]
enum VaultAction {
    /// Seal a seed phrase under a password
    Save {
        /// Read the seed phrase from stdin
        #[arg(long)]
        stdin: bool,

        /// Replace an existing seed without asking
        #[arg(short, long)]
        force: bool,
    },

    /// Unseal and print the seed phrase
    Show,

    /// Show whether a seed is stored
    Status,

    /// Delete the stored seed
    Remove {
        /// Also delete the device salt
        #[arg(long)]
        clear_salt: bool,

        /// Do not ask for confirmation
        #[arg(short, long)]
        yes: bool,
    },

    /// Forget the device salt (orphans any stored seed)
    ResetSalt {
        /// Do not ask for confirmation
        #[arg(short, long)]
        yes: bool,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // Initialize tracing
    if cli.verbose {
        tracing_subscriber::fmt()
            .with_env_filter("sparkhub_cli=debug,sparkhub_lib=debug")
            .with_writer(std::io::stderr)
            .init();
    } else {
        tracing_subscriber::fmt()
            .with_env_filter("sparkhub_cli=info,sparkhub_lib=warn")
            .with_writer(std::io::stderr)
            .init();
    }

    // Setup storage directory
    let storage_dir = if let Some(dir) = cli.storage_dir {
        std::path::PathBuf::from(dir)
    } else {
        dirs::data_local_dir()
            .unwrap_or_else(|| std::path::PathBuf::from("."))
            .join("sparkhub")
    };

    // Dispatch commands
    match cli.command {
        Commands::Vault { action } => match action {
            VaultAction::Save { stdin, force } => {
                commands::vault::save(&storage_dir, stdin, force, cli.verbose).await
            }
            VaultAction::Show => commands::vault::show(&storage_dir, cli.verbose).await,
            VaultAction::Status => commands::vault::status(&storage_dir, cli.verbose).await,
            VaultAction::Remove { clear_salt, yes } => {
                commands::vault::remove(&storage_dir, clear_salt, yes, cli.verbose).await
            }
            VaultAction::ResetSalt { yes } => {
                commands::vault::reset_salt(&storage_dir, yes, cli.verbose).await
            }
        },
        Commands::Selftest { log_n } => commands::selftest::run(log_n, cli.verbose).await,
        Commands::Decode { address, json } => commands::decode::run(&address, cli.network, json),
        Commands::Invoice {
            address,
            sats,
            comment,
            insecure,
            json,
        } => commands::invoice::run(&address, sats, comment.as_deref(), insecure, json).await,
        Commands::Hash { input, salt } => commands::hash::run(&input, &salt),
    }
}
