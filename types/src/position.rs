//! On-chain entities as the client sees them.
//!
//! The chain is the source of truth for all of these. The client never creates
//! or mutates them locally; it re-reads them after every confirmed write.

use crate::time::Timestamp;
use alloy_primitives::{Address, U256};
use serde::{Deserialize, Serialize};

/// ERC-20 allowance `owner` has granted `spender`.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Allowance {
    pub owner: Address,
    pub spender: Address,
    pub amount: U256,
}

/// A staker's position in the controller.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct StakePosition {
    pub staker: Address,
    pub amount_staked: U256,
    /// Zero when the staker has never staked.
    pub unlock_timestamp: Timestamp,
    pub reward_debt: U256,
}

/// Global `accRewardPerUnit` value; only ever grows on chain.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
pub struct RewardAccumulator {
    pub acc_reward_per_unit: U256,
}

impl RewardAccumulator {
    pub fn new(acc_reward_per_unit: U256) -> Self {
        Self { acc_reward_per_unit }
    }
}
