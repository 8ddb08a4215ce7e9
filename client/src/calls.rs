//! Controller write calls.
//!
//! The client only plans these. Submission, signing and gas belong to the
//! transaction layer, which reports back through [`crate::TxTracker`].

use crate::config::{ClientConfig, ContractAddresses};
use crate::error::ClientError;
use crate::snapshot::UserPosition;
use crate::tx::TxKind;
use serde::{Deserialize, Serialize};
use sphygmos_rewards::{can_claim, unlock_after_stake, LockState};
use sphygmos_types::{Address, ProtocolParams, Timestamp, TokenAmount, U256};

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum ControllerCall {
    /// Spend USDT for power units.
    AcquirePowerUnits { usdt: U256 },
    Stake { amount: U256 },
    /// Withdraws the whole stake once unlocked.
    Unstake { amount: U256 },
    ClaimMinerRewards,
    ClaimDripRewards,
}

impl ControllerCall {
    /// Solidity function name on the controller.
    pub fn function_name<'a>(&self, config: &'a ClientConfig) -> &'a str {
        match self {
            ControllerCall::AcquirePowerUnits { .. } => "acquirePU",
            ControllerCall::Stake { .. } => "stakeSMOS",
            ControllerCall::Unstake { .. } => &config.unstake_function,
            ControllerCall::ClaimMinerRewards => "claimMinerRewards",
            ControllerCall::ClaimDripRewards => "claimDripRewards",
        }
    }

    pub fn kind(&self) -> TxKind {
        match self {
            ControllerCall::AcquirePowerUnits { .. } => TxKind::AcquirePowerUnits,
            ControllerCall::Stake { .. } => TxKind::Stake,
            ControllerCall::Unstake { .. } => TxKind::Unstake,
            ControllerCall::ClaimMinerRewards => TxKind::ClaimMinerRewards,
            ControllerCall::ClaimDripRewards => TxKind::ClaimDripRewards,
        }
    }

    /// Token and amount the controller will pull through `transferFrom`, if any.
    ///
    /// Callers run this through the approval guard before submitting.
    pub fn spend(&self, contracts: &ContractAddresses) -> Option<(Address, U256)> {
        match self {
            ControllerCall::AcquirePowerUnits { usdt } => Some((contracts.usdt, *usdt)),
            ControllerCall::Stake { amount } => Some((contracts.smos, *amount)),
            _ => None,
        }
    }

    /// Unlock time of the position after this call confirms at `now`.
    /// Only a stake moves it.
    pub fn unlock_after(&self, now: Timestamp, params: &ProtocolParams) -> Option<Timestamp> {
        match self {
            ControllerCall::Stake { .. } => Some(unlock_after_stake(now, params.stake_lock_secs)),
            _ => None,
        }
    }
}

fn parse_positive(input: &str, config: &ClientConfig) -> Result<U256, ClientError> {
    let amount = TokenAmount::parse(input, config.token_decimals)?;
    if amount.is_zero() {
        return Err(ClientError::ZeroAmount);
    }
    Ok(amount.raw())
}

pub fn plan_acquire(input: &str, config: &ClientConfig) -> Result<ControllerCall, ClientError> {
    Ok(ControllerCall::AcquirePowerUnits {
        usdt: parse_positive(input, config)?,
    })
}

pub fn plan_stake(input: &str, config: &ClientConfig) -> Result<ControllerCall, ClientError> {
    Ok(ControllerCall::Stake {
        amount: parse_positive(input, config)?,
    })
}

/// Plan a full withdrawal; refused while locked or with nothing staked.
pub fn plan_unstake(
    position: &UserPosition,
    now: Timestamp,
) -> Result<ControllerCall, ClientError> {
    let staked = position.staked.ok_or(ClientError::NotLoaded("staked amount"))?;
    if staked.is_zero() {
        return Err(ClientError::NothingStaked);
    }
    let unlock = position.unlock_time.ok_or(ClientError::NotLoaded("unlock time"))?;
    if let LockState::Locked { remaining } = LockState::at(unlock, now) {
        return Err(ClientError::Locked { remaining });
    }
    Ok(ControllerCall::Unstake { amount: staked })
}

pub fn plan_claim_drip(position: &UserPosition) -> Result<ControllerCall, ClientError> {
    if !can_claim(position.pending_drip) {
        return Err(ClientError::NothingToClaim);
    }
    Ok(ControllerCall::ClaimDripRewards)
}
