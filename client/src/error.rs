use crate::reader::ReadCall;
use sphygmos_rewards::RewardError;
use sphygmos_types::{AmountError, TxHash};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ClientError {
    #[error("configuration error: {0}")]
    Config(String),

    #[error("read {call} failed: {reason}")]
    Read { call: ReadCall, reason: String },

    #[error("{0} has not been loaded yet")]
    NotLoaded(&'static str),

    #[error("nothing is staked")]
    NothingStaked,

    #[error("stake is locked for another {remaining}s")]
    Locked { remaining: u64 },

    #[error("amount must be non-zero")]
    ZeroAmount,

    #[error("nothing to claim")]
    NothingToClaim,

    #[error("unknown transaction {0}")]
    UnknownTransaction(TxHash),

    #[error("transaction {0} already resolved")]
    AlreadyResolved(TxHash),

    #[error(transparent)]
    Reward(#[from] RewardError),

    #[error(transparent)]
    Amount(#[from] AmountError),
}
