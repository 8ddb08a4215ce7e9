//! Reward-derivation errors.

use sphygmos_types::U256;
use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RewardError {
    #[error("reward scale must be non-zero")]
    ZeroScale,

    #[error("arithmetic overflow in reward computation")]
    Overflow,

    #[error("accumulator went backwards: {previous} -> {next}")]
    AccumulatorRegressed { previous: U256, next: U256 },
}
