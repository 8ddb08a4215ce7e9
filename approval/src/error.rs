use sphygmos_types::{AmountError, TxHash};
use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ApprovalError {
    #[error("an approval transaction is already in flight: {0}")]
    AlreadyPending(TxHash),

    #[error("transaction {0} is not the in-flight approval")]
    UnknownTransaction(TxHash),

    #[error(transparent)]
    Amount(#[from] AmountError),
}
