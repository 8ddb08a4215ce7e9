//! ERC-20 approval decisions for the Sphygmos controller.
//!
//! Some tokens (USDT among them) refuse to change a non-zero allowance to
//! another non-zero value. Before approving a larger amount the client must
//! first approve zero, wait for that to confirm, re-read the allowance and
//! only then approve the new amount.
//!
//! This crate handles:
//! - Classifying an allowance against a required amount
//! - Choosing the amount and gas limit of the next approve transaction
//! - Sequencing reset → approve → proceed across confirmations

pub mod decision;
pub mod error;
pub mod guard;
pub mod policy;

pub use decision::{evaluate, evaluate_input, Decision};
pub use error::ApprovalError;
pub use guard::{AllowanceReading, ApprovalGuard, ApprovalKind, GuardAction, GuardState};
pub use policy::{ApprovalPolicy, ApprovalRequest};
