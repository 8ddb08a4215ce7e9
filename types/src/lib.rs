//! Fundamental types for the Sphygmos client core.
//!
//! This crate defines the types shared across every other crate in the workspace:
//! token amounts, timestamps and clocks, the on-chain entities the client reads,
//! and the protocol constants the frontend mirrors from the deployed contracts.

pub mod amount;
pub mod error;
pub mod params;
pub mod position;
pub mod time;

pub use alloy_primitives::{address, Address, TxHash, U256};
pub use amount::{format_optional, TokenAmount, UNKNOWN_DISPLAY};
pub use error::AmountError;
pub use params::ProtocolParams;
pub use position::{Allowance, RewardAccumulator, StakePosition};
pub use time::{Clock, SystemClock, Timestamp};
