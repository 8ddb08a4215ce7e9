//! Client data layer for the Sphygmos dApp.
//!
//! Provides everything a frontend needs around the pure derivations:
//! - Configuration (contract addresses, display precision, approval policy)
//! - The `ChainReader` abstraction over read-only contract views
//! - Snapshots: every read plus everything derived from it
//! - A polling loop that re-reads on an interval and on demand
//! - Transaction tracking that triggers a refresh on confirmation
//! - Planning of controller write calls (never submitted here)

pub mod calls;
pub mod config;
pub mod error;
pub mod poller;
pub mod reader;
pub mod refresh;
pub mod snapshot;
pub mod tx;

pub use calls::ControllerCall;
pub use config::{ClientConfig, ContractAddresses};
pub use error::ClientError;
pub use poller::{Poller, PollerStats, PollerStatsSnapshot};
pub use reader::{ChainReader, ReadCall};
pub use refresh::RefreshSignal;
pub use snapshot::{DashboardText, DerivedView, ProtocolStats, Snapshot, UserPosition};
pub use tx::{TxKind, TxStatus, TxTracker};
