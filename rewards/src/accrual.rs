//! Pending-reward accrual from the global accumulator.

use crate::error::RewardError;
use sphygmos_types::{RewardAccumulator, U256};

/// Compute the miner reward a position can claim right now.
///
/// `accumulated = stake × acc_per_unit / scale`, then `accumulated − debt`.
///
/// The stake and the accumulator come from separate `eth_call`s that are not
/// atomic, so `accumulated < debt` can happen transiently. That case clamps to
/// zero; it is not an error.
pub fn pending_reward(
    stake: U256,
    acc_per_unit: U256,
    reward_debt: U256,
    scale: U256,
) -> Result<U256, RewardError> {
    if scale.is_zero() {
        return Err(RewardError::ZeroScale);
    }
    let accumulated = stake
        .checked_mul(acc_per_unit)
        .ok_or(RewardError::Overflow)?
        / scale;
    Ok(accumulated.saturating_sub(reward_debt))
}

/// [`pending_reward`] over values that may not have loaded yet.
///
/// Any missing input yields `Ok(None)` so the caller shows a placeholder
/// instead of a false zero balance.
pub fn pending_reward_of(
    stake: Option<U256>,
    acc_per_unit: Option<U256>,
    reward_debt: Option<U256>,
    scale: U256,
) -> Result<Option<U256>, RewardError> {
    match (stake, acc_per_unit, reward_debt) {
        (Some(stake), Some(acc), Some(debt)) => pending_reward(stake, acc, debt, scale).map(Some),
        _ => Ok(None),
    }
}

/// Replace the cached accumulator with a fresh read.
///
/// The on-chain value never decreases, so a smaller read means it was served
/// by a lagging node and should be discarded.
pub fn advance_accumulator(
    current: &mut RewardAccumulator,
    next: U256,
) -> Result<(), RewardError> {
    if next < current.acc_reward_per_unit {
        return Err(RewardError::AccumulatorRegressed {
            previous: current.acc_reward_per_unit,
            next,
        });
    }
    current.acc_reward_per_unit = next;
    Ok(())
}
