//! Stake lock status and countdown.
//!
//! Two states, Locked and Unlocked, switched only by wall-clock time crossing
//! the unlock timestamp. An unlock time of zero means the wallet never staked.

use serde::{Deserialize, Serialize};
use sphygmos_types::{Timestamp, U256};
use sphygmos_utils::format_countdown;

pub const NOT_STAKED: &str = "Not Staked";
pub const UNLOCKED: &str = "Unlocked & Ready";

/// Which side of the unlock boundary a position is on.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum LockState {
    NotStaked,
    Unlocked,
    Locked { remaining: u64 },
}

/// Lock information ready for display.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct LockStatus {
    pub locked: bool,
    /// Seconds until unlock; zero when unlocked.
    pub remaining: u64,
    pub display: String,
}

impl LockState {
    pub fn at(unlock: Timestamp, now: Timestamp) -> Self {
        if unlock.is_epoch() {
            LockState::NotStaked
        } else if unlock.has_passed(now) {
            LockState::Unlocked
        } else {
            LockState::Locked {
                remaining: unlock.remaining_from(now),
            }
        }
    }
}

/// Classify a position's lock at `now`. Unlock is inclusive: `unlock == now` is unlocked.
pub fn lock_status(unlock: Timestamp, now: Timestamp) -> LockStatus {
    match LockState::at(unlock, now) {
        LockState::NotStaked => LockStatus {
            locked: false,
            remaining: 0,
            display: NOT_STAKED.to_string(),
        },
        LockState::Unlocked => LockStatus {
            locked: false,
            remaining: 0,
            display: UNLOCKED.to_string(),
        },
        LockState::Locked { remaining } => LockStatus {
            locked: true,
            remaining,
            display: format_countdown(remaining),
        },
    }
}

/// Badge shown next to the stake form, e.g. "168H LOCK".
pub fn lock_badge(lock_secs: u64) -> String {
    format!("{}H LOCK", lock_secs / 3_600)
}

/// When a stake made at `now` unlocks; each deposit restarts the lock.
pub fn unlock_after_stake(now: Timestamp, lock_secs: u64) -> Timestamp {
    now.saturating_add_secs(lock_secs)
}

/// Whether an unstake transaction would be accepted: something is staked and
/// the lock has expired.
pub fn can_unstake(staked: U256, unlock: Timestamp, now: Timestamp) -> bool {
    !staked.is_zero() && !lock_status(unlock, now).locked
}
