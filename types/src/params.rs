//! Protocol constants mirrored from the deployed controller contract.
//!
//! None of these are decided by the client. They exist so the derivations
//! use the same scale, lock length and token precision as the chain does.

use alloy_primitives::U256;
use serde::{Deserialize, Serialize};

/// Fixed-point scale of `accRewardPerUnit` (1e18).
pub const REWARD_SCALE: u64 = 1_000_000_000_000_000_000;

/// Seconds per day, used for drip projections and countdowns.
pub const SECS_PER_DAY: u64 = 86_400;

/// Constants shared by the reward, lock and approval derivations.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProtocolParams {
    /// Divisor applied to `stake * accRewardPerUnit`.
    pub reward_scale: U256,

    /// How long a stake stays locked after the latest deposit (seconds).
    pub stake_lock_secs: u64,

    /// Decimals of SMOS and USDT on BSC (both 18).
    pub token_decimals: u8,

    /// Gas limit attached to an approve transaction. Some mobile wallets
    /// mis-estimate approve gas, so the limit is explicit.
    pub approve_gas_limit: u64,

    /// Gas limit attached to an approve-to-zero (reset) transaction.
    pub reset_gas_limit: u64,
}

impl ProtocolParams {
    /// The 168 hour lock the controller enforces on staked SMOS.
    pub const STAKE_LOCK_168H: u64 = 168 * 3600;
}

impl Default for ProtocolParams {
    fn default() -> Self {
        Self {
            reward_scale: U256::from(REWARD_SCALE),
            stake_lock_secs: Self::STAKE_LOCK_168H,
            token_decimals: 18,
            approve_gas_limit: 70_000,
            reset_gas_limit: 50_000,
        }
    }
}
