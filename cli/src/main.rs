//! Sphygmos command line: evaluate the dashboard derivations offline.

mod report;

use anyhow::Context;
use clap::Parser;
use serde::Serialize;
use sphygmos_client::ClientConfig;
use sphygmos_types::{Clock, SystemClock, Timestamp};
use sphygmos_utils::LogFormat;
use std::fmt::Display;
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "sphygmos", about = "Sphygmos client core tools")]
struct Cli {
    /// Path to a TOML configuration file. File settings are the base;
    /// CLI flags and env vars override them.
    #[arg(long, env = "SPHYGMOS_CONFIG")]
    config: Option<PathBuf>,

    /// Log level: "trace", "debug", "info", "warn", "error".
    #[arg(long, env = "SPHYGMOS_LOG_LEVEL")]
    log_level: Option<String>,

    /// Log format: "human" or "json".
    #[arg(long, env = "SPHYGMOS_LOG_FORMAT")]
    log_format: Option<LogFormat>,

    /// Token decimals (defaults to the config value, 18).
    #[arg(long, env = "SPHYGMOS_TOKEN_DECIMALS")]
    decimals: Option<u8>,

    /// Print results as JSON.
    #[arg(long, global = true)]
    json: bool,

    /// Subcommand.
    #[command(subcommand)]
    command: Command,
}

#[derive(clap::Subcommand)]
enum Command {
    /// Classify a USDT allowance against an amount to spend.
    Allowance {
        /// Current allowance, raw integer.
        #[arg(long)]
        allowance: String,
        /// Amount to spend, human units ("12.5").
        #[arg(long)]
        required: String,
    },
    /// Compute a position's pending miner reward.
    Reward {
        /// Staked amount, raw integer.
        #[arg(long)]
        stake: String,
        /// accRewardPerUnit, raw integer.
        #[arg(long)]
        acc: String,
        /// rewardDebt, raw integer.
        #[arg(long)]
        debt: String,
        /// Accumulator scale (default 1e18).
        #[arg(long)]
        scale: Option<String>,
    },
    /// Show the stake lock countdown.
    Lock {
        /// Unlock time, unix seconds (0 = never staked).
        #[arg(long)]
        unlock: u64,
        /// Evaluate at this unix time instead of now.
        #[arg(long)]
        now: Option<u64>,
        /// Staked amount, raw integer; enables the unstake check.
        #[arg(long)]
        staked: Option<String>,
    },
    /// Project the drip rate onto a day.
    Drip {
        /// Drip rate per second, raw integer.
        #[arg(long)]
        rate: String,
        /// Pending drip reward, raw integer; enables the claim check.
        #[arg(long)]
        pending: Option<String>,
    },
    /// Validate and print the effective configuration.
    Config,
}

fn load_config(cli: &Cli) -> anyhow::Result<ClientConfig> {
    let mut config = match &cli.config {
        Some(path) => ClientConfig::from_toml_file(path)
            .with_context(|| format!("loading {}", path.display()))?,
        None => ClientConfig::default(),
    };
    if let Some(level) = &cli.log_level {
        config.log_level = level.clone();
    }
    if let Some(format) = cli.log_format {
        config.log_format = format;
    }
    if let Some(decimals) = cli.decimals {
        config.token_decimals = decimals;
    }
    Ok(config)
}

fn emit<T: Serialize + Display>(json: bool, report: &T) -> anyhow::Result<()> {
    if json {
        println!("{}", serde_json::to_string_pretty(report)?);
    } else {
        println!("{report}");
    }
    Ok(())
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    let config = load_config(&cli)?;
    if !sphygmos_utils::init_logging(config.log_format, &config.log_level) {
        tracing::debug!("tracing subscriber already installed");
    }
    if let Some(path) = &cli.config {
        tracing::info!(path = %path.display(), "loaded config");
    }

    match &cli.command {
        Command::Allowance { allowance, required } => {
            emit(cli.json, &report::allowance(&config, allowance, required)?)
        }
        Command::Reward {
            stake,
            acc,
            debt,
            scale,
        } => emit(
            cli.json,
            &report::reward(&config, stake, acc, debt, scale.as_deref())?,
        ),
        Command::Lock { unlock, now, staked } => {
            let now = now.map(Timestamp::new).unwrap_or_else(|| SystemClock.now());
            emit(cli.json, &report::lock(*unlock, now, staked.as_deref())?)
        }
        Command::Drip { rate, pending } => {
            emit(cli.json, &report::drip(&config, rate, pending.as_deref())?)
        }
        Command::Config => {
            config.validate().context("invalid configuration")?;
            if cli.json {
                println!("{}", serde_json::to_string_pretty(&config)?);
            } else {
                print!("{}", config.to_toml_string()?);
            }
            Ok(())
        }
    }
}
