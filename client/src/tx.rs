//! Submitted-transaction tracking.
//!
//! The transaction layer reports hashes as it submits them and receipts as
//! they arrive. A confirmed write changes on-chain state, so it triggers a
//! refresh of everything the client has read.

use crate::error::ClientError;
use crate::refresh::RefreshSignal;
use serde::{Deserialize, Serialize};
use sphygmos_types::TxHash;
use std::collections::HashMap;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum TxKind {
    AcquirePowerUnits,
    Stake,
    Unstake,
    ClaimMinerRewards,
    ClaimDripRewards,
    Approve,
    ResetApproval,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum TxStatus {
    Pending,
    Confirmed,
    Failed,
}

impl TxStatus {
    pub fn message(&self) -> &'static str {
        match self {
            TxStatus::Pending => "Transaction pending…",
            TxStatus::Confirmed => "Transaction confirmed",
            TxStatus::Failed => "Transaction failed",
        }
    }
}

pub struct TxTracker {
    refresh: RefreshSignal,
    txs: HashMap<TxHash, (TxKind, TxStatus)>,
}

impl TxTracker {
    pub fn new(refresh: RefreshSignal) -> Self {
        Self {
            refresh,
            txs: HashMap::new(),
        }
    }

    /// Record a submission. Reporting a still-pending hash again is a no-op;
    /// a hash that already has a receipt is rejected.
    pub fn submitted(&mut self, kind: TxKind, hash: TxHash) -> Result<(), ClientError> {
        match self.txs.get(&hash) {
            Some((_, TxStatus::Pending)) => Ok(()),
            Some(_) => Err(ClientError::AlreadyResolved(hash)),
            None => {
                tracing::info!(%hash, ?kind, "transaction submitted");
                self.txs.insert(hash, (kind, TxStatus::Pending));
                Ok(())
            }
        }
    }

    /// Record a receipt. Returns the refresh generation a confirmation
    /// triggered, or `None` for a failure.
    ///
    /// Only a pending transaction resolves. Duplicate or late receipts are
    /// rejected without touching the status or the refresh generation.
    pub fn resolve(&mut self, hash: TxHash, success: bool) -> Result<Option<u64>, ClientError> {
        let (kind, status) = self
            .txs
            .get_mut(&hash)
            .ok_or(ClientError::UnknownTransaction(hash))?;
        if *status != TxStatus::Pending {
            tracing::debug!(%hash, ?status, success, "ignoring receipt for resolved transaction");
            return Err(ClientError::AlreadyResolved(hash));
        }
        if success {
            *status = TxStatus::Confirmed;
            let generation = self.refresh.trigger();
            tracing::info!(%hash, kind = ?*kind, generation, "transaction confirmed");
            Ok(Some(generation))
        } else {
            *status = TxStatus::Failed;
            tracing::warn!(%hash, kind = ?*kind, "transaction failed");
            Ok(None)
        }
    }

    pub fn status(&self, hash: &TxHash) -> Option<TxStatus> {
        self.txs.get(hash).map(|(_, status)| *status)
    }

    pub fn kind(&self, hash: &TxHash) -> Option<TxKind> {
        self.txs.get(hash).map(|(kind, _)| *kind)
    }

    /// Number of transactions still awaiting a receipt.
    pub fn pending(&self) -> usize {
        self.txs
            .values()
            .filter(|(_, status)| *status == TxStatus::Pending)
            .count()
    }

    /// Forget every transaction that has a receipt. Returns how many were dropped.
    pub fn prune_resolved(&mut self) -> usize {
        let before = self.txs.len();
        self.txs.retain(|_, (_, status)| *status == TxStatus::Pending);
        before - self.txs.len()
    }

    /// Whether any transaction of `kind` is still awaiting a receipt.
    pub fn has_pending(&self, kind: TxKind) -> bool {
        self.txs
            .values()
            .any(|(k, status)| *k == kind && *status == TxStatus::Pending)
    }
}
