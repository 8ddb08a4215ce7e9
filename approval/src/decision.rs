//! Allowance classification.

use serde::{Deserialize, Serialize};
use sphygmos_types::{TokenAmount, U256};

/// What the caller should do next for a given allowance.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum Decision {
    /// The allowance already covers the required amount.
    Proceed,
    /// A non-zero allowance is too small; approve zero before approving more.
    NeedsReset,
    /// Nothing approved yet; approve directly.
    NeedsApprove,
    /// The required amount could not be parsed. Nothing should be sent.
    Invalid,
}

/// Classify `current_allowance` against `required_amount`.
pub fn evaluate(current_allowance: U256, required_amount: U256) -> Decision {
    if current_allowance >= required_amount {
        Decision::Proceed
    } else if !current_allowance.is_zero() {
        Decision::NeedsReset
    } else {
        Decision::NeedsApprove
    }
}

/// Classify against a human-entered amount (`"12.5"`) scaled by `decimals`.
///
/// Unparsable input yields [`Decision::Invalid`] without touching the chain.
pub fn evaluate_input(current_allowance: U256, required_input: &str, decimals: u8) -> Decision {
    match TokenAmount::parse(required_input, decimals) {
        Ok(required) => evaluate(current_allowance, required.raw()),
        Err(_) => Decision::Invalid,
    }
}

impl Decision {
    /// Whether this decision calls for an approve-family transaction.
    pub fn needs_transaction(&self) -> bool {
        matches!(self, Decision::NeedsReset | Decision::NeedsApprove)
    }
}
