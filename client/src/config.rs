//! Client configuration with TOML file support.
//!
//! Contract addresses and ABI choices are configuration injected at startup.
//! Nothing in the workspace reads them from globals.

use crate::error::ClientError;
use serde::{Deserialize, Serialize};
use sphygmos_approval::ApprovalPolicy;
use sphygmos_types::{address, Address, ProtocolParams};
use sphygmos_utils::LogFormat;
use std::path::Path;
use std::time::Duration;

/// Deployed contract addresses.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ContractAddresses {
    /// Sphygmos controller (staking, power units, rewards).
    #[serde(default)]
    pub controller: Address,

    /// USDT, spent when acquiring power units.
    #[serde(default = "default_usdt")]
    pub usdt: Address,

    /// SMOS, the staked token. Approved to the controller before staking.
    #[serde(default)]
    pub smos: Address,
}

/// Configuration for the client data layer.
///
/// Can be loaded from a TOML file via [`ClientConfig::from_toml_file`] or
/// built programmatically (e.g. for tests).
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct ClientConfig {
    /// EVM chain id (56 = BNB Smart Chain).
    #[serde(default = "default_chain_id")]
    pub chain_id: u64,

    /// Decimals of SMOS and USDT.
    #[serde(default = "default_token_decimals")]
    pub token_decimals: u8,

    /// Fraction digits shown for token amounts.
    #[serde(default = "default_display_fraction_digits")]
    pub display_fraction_digits: usize,

    #[serde(default)]
    pub approval_policy: ApprovalPolicy,

    /// Name of the controller's unstake function. Deployments disagree
    /// (`unstakeSMOS` vs `withdraw`); confirm against the deployed ABI.
    #[serde(default = "default_unstake_function")]
    pub unstake_function: String,

    /// How often the poller re-reads chain state.
    #[serde(default = "default_refresh_interval_secs")]
    pub refresh_interval_secs: u64,

    /// How often lock countdowns are re-derived without re-reading.
    #[serde(default = "default_lock_tick_secs")]
    pub lock_tick_secs: u64,

    /// Log format: "human" or "json".
    #[serde(default)]
    pub log_format: LogFormat,

    /// Log level filter: "trace", "debug", "info", "warn", "error".
    #[serde(default = "default_log_level")]
    pub log_level: String,

    /// Kept last so it serializes as a trailing `[contracts]` table.
    #[serde(default)]
    pub contracts: ContractAddresses,
}

// ── Serde default helpers ──────────────────────────────────────────────

fn default_chain_id() -> u64 {
    56
}

fn default_usdt() -> Address {
    address!("55d398326f99059ff775485246999027b3197955")
}

fn default_token_decimals() -> u8 {
    18
}

fn default_display_fraction_digits() -> usize {
    4
}

fn default_unstake_function() -> String {
    "unstakeSMOS".to_string()
}

fn default_refresh_interval_secs() -> u64 {
    5
}

fn default_lock_tick_secs() -> u64 {
    60
}

fn default_log_level() -> String {
    "info".to_string()
}

// ── Impl ───────────────────────────────────────────────────────────────

impl ClientConfig {
    /// Load configuration from a TOML file.
    pub fn from_toml_file(path: impl AsRef<Path>) -> Result<Self, ClientError> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path)
            .map_err(|e| ClientError::Config(format!("{}: {e}", path.display())))?;
        Self::from_toml_str(&content)
    }

    /// Parse configuration from a TOML string.
    pub fn from_toml_str(s: &str) -> Result<Self, ClientError> {
        toml::from_str(s).map_err(|e| ClientError::Config(e.to_string()))
    }

    /// Serialize the configuration to a TOML string.
    pub fn to_toml_string(&self) -> Result<String, ClientError> {
        toml::to_string_pretty(self).map_err(|e| ClientError::Config(e.to_string()))
    }

    /// Reject configurations the data layer cannot run with.
    pub fn validate(&self) -> Result<(), ClientError> {
        if self.contracts.controller.is_zero() {
            return Err(ClientError::Config("contracts.controller is not set".into()));
        }
        if self.refresh_interval_secs == 0 {
            return Err(ClientError::Config("refresh_interval_secs must be > 0".into()));
        }
        if self.lock_tick_secs == 0 {
            return Err(ClientError::Config("lock_tick_secs must be > 0".into()));
        }
        if self.token_decimals > sphygmos_types::amount::MAX_DECIMALS {
            return Err(ClientError::Config(format!(
                "token_decimals {} exceeds {}",
                self.token_decimals,
                sphygmos_types::amount::MAX_DECIMALS
            )));
        }
        if self.unstake_function.trim().is_empty() {
            return Err(ClientError::Config("unstake_function must not be empty".into()));
        }
        Ok(())
    }

    pub fn refresh_interval(&self) -> Duration {
        Duration::from_secs(self.refresh_interval_secs)
    }

    pub fn lock_tick(&self) -> Duration {
        Duration::from_secs(self.lock_tick_secs)
    }

    /// Protocol constants, with this deployment's token precision.
    pub fn params(&self) -> ProtocolParams {
        ProtocolParams {
            token_decimals: self.token_decimals,
            ..ProtocolParams::default()
        }
    }
}

impl Default for ContractAddresses {
    fn default() -> Self {
        Self {
            controller: Address::ZERO,
            usdt: default_usdt(),
            smos: Address::ZERO,
        }
    }
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            chain_id: default_chain_id(),
            token_decimals: default_token_decimals(),
            display_fraction_digits: default_display_fraction_digits(),
            approval_policy: ApprovalPolicy::default(),
            unstake_function: default_unstake_function(),
            refresh_interval_secs: default_refresh_interval_secs(),
            lock_tick_secs: default_lock_tick_secs(),
            log_format: LogFormat::default(),
            log_level: default_log_level(),
            contracts: ContractAddresses::default(),
        }
    }
}
