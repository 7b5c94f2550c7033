//! Command line client for broadcasting Steem transactions.
//!
//! Keys are read from `STEEM_<ROLE>_KEY_<ACCOUNT>` environment variables for
//! the accounts listed in the config file plus the account named on the
//! command line.

use clap::{Parser, Subcommand};
use serde::Deserialize;
use std::path::{Path, PathBuf};
use std::process::ExitCode;

use steem_broadcast::config::{load_config, ClientConfig};
use steem_broadcast::keys::KeyStore;
use steem_broadcast::observability::logging::init_logging;
use steem_broadcast::transaction::{Asset, Operation, TransferOperation, VoteOperation};
use steem_broadcast::Client;

#[derive(Parser)]
#[command(name = "steem-broadcast")]
#[command(about = "Build, sign and broadcast Steem transactions", long_about = None)]
struct Cli {
    /// Path to a TOML configuration file
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Node websocket URL; repeat for failover. Overrides the config file.
    #[arg(short, long)]
    url: Vec<String>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Show current chain head metadata
    Props,
    /// Vote on a post
    Vote {
        #[arg(long)]
        voter: String,
        #[arg(long)]
        author: String,
        #[arg(long)]
        permlink: String,
        /// Weight in basis points (-10000..=10000)
        #[arg(long, default_value_t = 10_000, allow_hyphen_values = true)]
        weight: i16,
    },
    /// Transfer funds, e.g. --amount "1.000 STEEM"
    Transfer {
        #[arg(long)]
        from: String,
        #[arg(long)]
        to: String,
        #[arg(long)]
        amount: Asset,
        #[arg(long, default_value = "")]
        memo: String,
    },
    /// Sign and broadcast the operation(s) in a JSON file
    Send {
        #[arg(long)]
        account: String,
        file: PathBuf,
    },
    /// Sign one operation from a JSON file and check its authority without broadcasting
    Verify {
        #[arg(long)]
        account: String,
        file: PathBuf,
    },
}

impl Commands {
    /// Account whose keys the command needs.
    fn account(&self) -> Option<&str> {
        match self {
            Commands::Props => None,
            Commands::Vote { voter, .. } => Some(voter.as_str()),
            Commands::Transfer { from, .. } => Some(from.as_str()),
            Commands::Send { account, .. } | Commands::Verify { account, .. } => {
                Some(account.as_str())
            }
        }
    }
}

/// A file holds either one operation or a list of them.
#[derive(Deserialize)]
#[serde(untagged)]
enum OperationFile {
    Many(Vec<Operation>),
    One(Operation),
}

fn read_operations(path: &Path) -> Result<Vec<Operation>, Box<dyn std::error::Error>> {
    let content = std::fs::read_to_string(path)?;
    Ok(match serde_json::from_str(&content)? {
        OperationFile::Many(operations) => operations,
        OperationFile::One(operation) => vec![operation],
    })
}

#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse();

    let mut config = match &cli.config {
        Some(path) => match load_config(path) {
            Ok(config) => config,
            Err(e) => {
                eprintln!("Failed to load {}: {}", path.display(), e);
                return ExitCode::FAILURE;
            }
        },
        None => ClientConfig::default(),
    };

    init_logging(&config.observability.log_level);

    if !cli.url.is_empty() {
        config.node.urls = cli.url;
    }

    match run(cli.command, config).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            tracing::error!(error = %e, "Command failed");
            ExitCode::FAILURE
        }
    }
}

async fn run(command: Commands, config: ClientConfig) -> Result<(), Box<dyn std::error::Error>> {
    let mut accounts = config.keys.accounts.clone();
    if let Some(account) = command.account() {
        if !accounts.iter().any(|a| a == account) {
            accounts.push(account.to_string());
        }
    }

    let keys = KeyStore::from_env(&accounts)?;
    let client = Client::connect(&config, keys).await?;

    match command {
        Commands::Props => {
            let props = client.dynamic_global_properties().await?;
            println!("{}", serde_json::to_string_pretty(&props)?);
        }
        Commands::Vote { voter, author, permlink, weight } => {
            let operation = Operation::Vote(VoteOperation {
                voter: voter.clone(),
                author,
                permlink,
                weight,
            });
            let response = client.send_trx(&voter, operation).await?;
            println!("{}", serde_json::to_string_pretty(&response)?);
        }
        Commands::Transfer { from, to, amount, memo } => {
            let operation = Operation::Transfer(TransferOperation {
                from: from.clone(),
                to,
                amount,
                memo,
            });
            let response = client.send_trx(&from, operation).await?;
            println!("{}", serde_json::to_string_pretty(&response)?);
        }
        Commands::Send { account, file } => {
            let operations = read_operations(&file)?;
            let response = client.send_arr_trx(&account, operations).await?;
            println!("{}", serde_json::to_string_pretty(&response)?);
        }
        Commands::Verify { account, file } => {
            let mut operations = read_operations(&file)?;
            if operations.len() != 1 {
                return Err(format!(
                    "verify expects exactly one operation, found {}",
                    operations.len()
                )
                .into());
            }
            let verified = client.verify_trx(&account, operations.remove(0)).await?;
            println!("{}", verified);
        }
    }

    Ok(())
}
