//! Errors raised while turning user input into token amounts.

use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum AmountError {
    #[error("amount is empty")]
    Empty,

    #[error("amount must not be negative")]
    Negative,

    #[error("malformed amount: {0}")]
    Malformed(String),
}
