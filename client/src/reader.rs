//! Read-only contract views the client depends on.
//!
//! Implementations live outside this crate (an RPC-backed reader in the
//! frontend, `NullChain` in tests). Every method returns a value already
//! decoded from the ABI response.

use crate::error::ClientError;
use serde::{Deserialize, Serialize};
use sphygmos_types::{Address, Timestamp, U256};
use std::fmt;

/// Identifies a view call, for logging and failure injection.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ReadCall {
    Allowance,
    StakedAmount,
    UnlockTime,
    AccRewardPerUnit,
    RewardDebt,
    UserPu,
    TotalPu,
    MinersPoolBalance,
    RewardPoolBalance,
    DripRatePerSecond,
    PendingDripReward,
}

impl ReadCall {
    /// Solidity function name of the view.
    pub fn function_name(&self) -> &'static str {
        match self {
            ReadCall::Allowance => "allowance",
            ReadCall::StakedAmount => "stakedSMOS",
            ReadCall::UnlockTime => "unlockTime",
            ReadCall::AccRewardPerUnit => "accRewardPerUnit",
            ReadCall::RewardDebt => "rewardDebt",
            ReadCall::UserPu => "userPU",
            ReadCall::TotalPu => "totalPU",
            ReadCall::MinersPoolBalance => "minersPoolBalance",
            ReadCall::RewardPoolBalance => "rewardPoolBalance",
            ReadCall::DripRatePerSecond => "dripRatePerSecond",
            ReadCall::PendingDripReward => "pendingDripReward",
        }
    }
}

impl fmt::Display for ReadCall {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.function_name())
    }
}

/// Read access to the token and controller contracts.
#[allow(async_fn_in_trait)]
pub trait ChainReader {
    async fn allowance(
        &self,
        token: Address,
        owner: Address,
        spender: Address,
    ) -> Result<U256, ClientError>;

    async fn staked_amount(&self, user: Address) -> Result<U256, ClientError>;

    /// Zero when the user has never staked.
    async fn unlock_time(&self, user: Address) -> Result<Timestamp, ClientError>;

    async fn acc_reward_per_unit(&self) -> Result<U256, ClientError>;

    async fn reward_debt(&self, user: Address) -> Result<U256, ClientError>;

    async fn user_pu(&self, user: Address) -> Result<U256, ClientError>;

    async fn total_pu(&self) -> Result<U256, ClientError>;

    async fn miners_pool_balance(&self) -> Result<U256, ClientError>;

    async fn reward_pool_balance(&self) -> Result<U256, ClientError>;

    async fn drip_rate_per_second(&self) -> Result<U256, ClientError>;

    async fn pending_drip_reward(&self, user: Address) -> Result<U256, ClientError>;
}
