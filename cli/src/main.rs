use anyhow::{bail, Result};
use clap::{Parser, Subcommand, ValueEnum};
use owo_colors::OwoColorize;
use std::path::PathBuf;

mod commands;
mod config;
mod platform;

use config::load_config;
use platform::Platform;

#[derive(Parser)]
#[command(name = "vesika")]
#[command(about = "VesikaArt platform ledger", version)]
struct Cli {
    /// Path to configuration file
    #[arg(short, long, value_name = "FILE", default_value = "vesika.toml")]
    config: PathBuf,

    /// Platform state file (overrides the config)
    #[arg(short, long, value_name = "FILE")]
    state: Option<PathBuf>,

    /// Unix time to run the operation at (defaults to now)
    #[arg(long, value_name = "SECS")]
    now: Option<u64>,

    /// Acting account (defaults to the configured admin)
    #[arg(long = "as", value_name = "ADDRESS", global = true)]
    caller: Option<String>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum Side {
    /// Pay VSK, receive artist tokens
    Buy,
    /// Pay artist tokens, receive VSK
    Sell,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Create a fresh platform state
    Init {
        /// Overwrite an existing state file
        #[arg(long)]
        force: bool,
    },

    /// Show an account's balances
    Balance { address: String },

    /// Show supply figures for a token
    Supply {
        #[arg(default_value = "VSK")]
        token: String,
    },

    /// Mint tokens (minter only); NATIVE mints act as a faucet
    Mint {
        to: String,
        amount: String,
        #[arg(long, default_value = "VSK")]
        token: String,
    },

    /// Transfer tokens from the acting account
    Transfer {
        to: String,
        amount: String,
        #[arg(long, default_value = "VSK")]
        token: String,
    },

    /// Grant a role (admin only)
    GrantRole { role: String, account: String },

    /// Revoke a role (admin only)
    RevokeRole { role: String, account: String },

    /// Add or remove an account on an artist token's whitelist
    Whitelist {
        token: String,
        account: String,
        #[arg(long)]
        remove: bool,
    },

    /// Freeze transfers of a token
    PauseToken { token: String },

    /// Resume transfers of a token
    UnpauseToken { token: String },

    /// Register the acting account as an artist
    RegisterArtist {
        #[arg(long, default_value = "")]
        metadata: String,
    },

    ApproveArtist { artist: String },

    RejectArtist { artist: String },

    /// Request a new artist token
    RequestToken {
        name: String,
        symbol: String,
        /// Whole tokens
        max_supply: String,
        #[arg(long, default_value = "1")]
        swap_rate: String,
        #[arg(long, default_value = "")]
        description: String,
        #[arg(long, default_value = "")]
        metadata: String,
    },

    ApproveRequest { id: u64 },

    RejectRequest { id: u64 },

    /// Deploy the token for an approved request
    DeployToken { id: u64 },

    /// List token requests
    Requests {
        /// Only requests by this artist
        #[arg(long)]
        artist: Option<String>,
    },

    PauseRegistry,

    UnpauseRegistry,

    /// Seed a VSK / artist-token pool from the acting account
    CreatePool {
        token: String,
        main_amount: String,
        artist_amount: String,
    },

    PoolInfo { token: String },

    /// Expected output of a swap
    Quote {
        token: String,
        amount: String,
        #[arg(long, value_enum, default_value = "buy")]
        side: Side,
    },

    /// Swap against a pool
    Swap {
        token: String,
        amount: String,
        #[arg(long, value_enum, default_value = "buy")]
        side: Side,
        /// Minimum output; defaults to the current quote less 10%
        #[arg(long)]
        min_out: Option<String>,
    },

    /// Stake VSK for a number of days
    Stake { amount: String, days: u64 },

    Unstake,

    /// Mint accrued staking rewards
    Claim,

    /// Show an account's stake and pending reward
    Reward { address: Option<String> },

    VotingPower { address: Option<String> },

    /// List staking tiers
    Tiers,

    SaleInfo,

    /// Buy VSK with native currency
    Buy { value: String },

    UpdateRate { rate: String },

    AddInventory { amount: String },

    SetInventory { amount: String },

    PauseSale,

    UnpauseSale,

    /// Move raised native currency out of the sale
    Withdraw { to: String, amount: String },
}

fn main() {
    let cli = Cli::parse();

    if let Err(e) = run(cli) {
        eprintln!("{} {:#}", "✗".red().bold(), e);
        std::process::exit(1);
    }
}

fn run(cli: Cli) -> Result<()> {
    let config = load_config(&cli.config)?;

    env_logger::Builder::from_env(
        env_logger::Env::default().default_filter_or(config.platform.log_level.as_str()),
    )
    .init();

    let state_path = cli
        .state
        .unwrap_or_else(|| PathBuf::from(&config.platform.state_file));
    let now = cli
        .now
        .unwrap_or_else(|| chrono::Utc::now().timestamp().max(0) as u64);

    if let Commands::Init { force } = cli.command {
        if state_path.exists() && !force {
            bail!(
                "state {} already exists (use --force to overwrite)",
                state_path.display()
            );
        }
        let platform = Platform::genesis(&config, now)?;
        platform.save(&state_path)?;
        println!("{}", "✓ Platform initialized".green().bold());
        println!("  State: {}", state_path.display());
        println!("  Admin: {}", platform.admin);
        return Ok(());
    }

    let mut platform = Platform::load(&state_path)?;
    let caller = cli.caller.unwrap_or_else(|| platform.admin.clone());

    let changed = commands::execute(&mut platform, &caller, now, cli.command)?;
    if changed {
        platform.save(&state_path)?;
    }
    Ok(())
}
