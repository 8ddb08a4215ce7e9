//! Reward derivations mirrored from the Sphygmos controller contract.
//!
//! Every function here is pure: it takes values already read from chain and
//! returns what the UI should show. Nothing is cached and nothing is written.
//!
//! `pending = stake × accRewardPerUnit / SCALE − rewardDebt` (clamped at zero)
//!
//! This crate handles:
//! - Pending miner-reward accrual from the global accumulator
//! - Stake lock status and countdown
//! - Drip emission projections
//! - Power-unit share of the miners pool

pub mod accrual;
pub mod drip;
pub mod error;
pub mod lock;
pub mod power;

pub use accrual::{advance_accumulator, pending_reward, pending_reward_of};
pub use drip::{can_claim, drip_per_day};
pub use error::RewardError;
pub use lock::{can_unstake, lock_badge, lock_status, unlock_after_stake, LockState, LockStatus};
pub use power::{estimated_miner_share, pu_share_bps};
