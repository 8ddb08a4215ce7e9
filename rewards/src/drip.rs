//! Drip emission: reward-pool tokens released per second into the claimable pool.

use crate::error::RewardError;
use sphygmos_types::params::SECS_PER_DAY;
use sphygmos_types::U256;

/// Project the per-second drip rate onto a day.
///
/// A zero rate yields `None`: the controller has not rebased yet and the UI
/// shows a waiting message instead of "0 / day".
pub fn drip_per_day(rate_per_second: U256) -> Result<Option<U256>, RewardError> {
    if rate_per_second.is_zero() {
        return Ok(None);
    }
    rate_per_second
        .checked_mul(U256::from(SECS_PER_DAY))
        .map(Some)
        .ok_or(RewardError::Overflow)
}

/// A drip claim only makes sense once the pending amount is known and non-zero.
pub fn can_claim(pending: Option<U256>) -> bool {
    pending.is_some_and(|p| !p.is_zero())
}
