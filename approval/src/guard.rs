//! Approval guard — sequences reset and approve transactions across confirmations.
//!
//! ```text
//!   Idle ──submitted──▶ Submitted ──confirmed(gen)──▶ AwaitingRefresh(gen)
//!    ▲                      │                               │
//!    └──────failed──────────┘        reading.generation >= gen
//!    ▲                                                      │
//!    └──────────────────────────────────────────────────────┘
//! ```
//!
//! While a transaction is in flight the guard recommends nothing. After it
//! confirms, the guard ignores allowance readings taken before the refresh
//! generation the confirmation triggered, so a stale read can never produce a
//! second approve (or a reset of a freshly granted allowance).

use crate::decision::{evaluate, Decision};
use crate::error::ApprovalError;
use crate::policy::{ApprovalPolicy, ApprovalRequest};
use serde::{Deserialize, Serialize};
use sphygmos_types::{Address, ProtocolParams, TokenAmount, TxHash, U256};

/// Which approve-family transaction was sent.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum ApprovalKind {
    Reset,
    Approve,
}

/// An allowance value tagged with the refresh generation it was read under.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct AllowanceReading {
    pub amount: U256,
    pub generation: u64,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum GuardState {
    Idle,
    Submitted { kind: ApprovalKind, tx: TxHash },
    AwaitingRefresh { after_generation: u64 },
}

/// What the UI should offer right now.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum GuardAction {
    /// No allowance has been read yet.
    Loading,
    AwaitingConfirmation(ApprovalKind),
    /// Confirmed; waiting for an allowance read newer than the confirmation.
    AwaitingRefresh,
    Proceed,
    Reset(ApprovalRequest),
    Approve(ApprovalRequest),
    Invalid,
}

/// Approval state for one (token, spender) pair.
#[derive(Clone, Debug)]
pub struct ApprovalGuard {
    token: Address,
    spender: Address,
    policy: ApprovalPolicy,
    params: ProtocolParams,
    state: GuardState,
}

impl ApprovalGuard {
    pub fn new(
        token: Address,
        spender: Address,
        policy: ApprovalPolicy,
        params: ProtocolParams,
    ) -> Self {
        Self {
            token,
            spender,
            policy,
            params,
            state: GuardState::Idle,
        }
    }

    pub fn state(&self) -> GuardState {
        self.state
    }

    pub fn token(&self) -> Address {
        self.token
    }

    pub fn spender(&self) -> Address {
        self.spender
    }

    /// Decide the next step for a human-entered required amount.
    pub fn next_action(
        &mut self,
        reading: Option<AllowanceReading>,
        required_input: &str,
    ) -> GuardAction {
        match TokenAmount::parse(required_input, self.params.token_decimals) {
            Ok(required) => self.next_action_for(reading, required.raw()),
            Err(e) => {
                tracing::debug!(input = required_input, error = %e, "unparsable approval amount");
                // In-flight or settling transactions still take precedence.
                match self.pending_action(reading) {
                    Some(action) => action,
                    None => GuardAction::Invalid,
                }
            }
        }
    }

    /// Decide the next step for an already-scaled required amount.
    pub fn next_action_for(
        &mut self,
        reading: Option<AllowanceReading>,
        required: U256,
    ) -> GuardAction {
        if let Some(action) = self.pending_action(reading) {
            return action;
        }
        let Some(reading) = reading else {
            return GuardAction::Loading;
        };

        let decision = evaluate(reading.amount, required);
        tracing::debug!(
            token = %self.token,
            allowance = %reading.amount,
            required = %required,
            ?decision,
            "evaluated allowance"
        );
        match decision {
            Decision::Proceed => GuardAction::Proceed,
            Decision::NeedsReset => {
                GuardAction::Reset(ApprovalRequest::reset(self.token, self.spender, &self.params))
            }
            Decision::NeedsApprove => GuardAction::Approve(ApprovalRequest::approve(
                self.token,
                self.spender,
                required,
                self.policy,
                &self.params,
            )),
            Decision::Invalid => GuardAction::Invalid,
        }
    }

    /// Actions that override evaluation: in-flight or not-yet-refreshed approvals.
    fn pending_action(&mut self, reading: Option<AllowanceReading>) -> Option<GuardAction> {
        match self.state {
            GuardState::Submitted { kind, .. } => Some(GuardAction::AwaitingConfirmation(kind)),
            GuardState::AwaitingRefresh { after_generation } => match reading {
                Some(r) if r.generation >= after_generation => {
                    tracing::debug!(generation = r.generation, "fresh allowance observed");
                    self.state = GuardState::Idle;
                    None
                }
                _ => Some(GuardAction::AwaitingRefresh),
            },
            GuardState::Idle => None,
        }
    }

    /// Record that the transaction layer sent `request` as `tx`.
    pub fn submitted(
        &mut self,
        request: &ApprovalRequest,
        tx: TxHash,
    ) -> Result<(), ApprovalError> {
        if let GuardState::Submitted { tx: pending, .. } = self.state {
            return Err(ApprovalError::AlreadyPending(pending));
        }
        let kind = if request.is_reset() {
            ApprovalKind::Reset
        } else {
            ApprovalKind::Approve
        };
        tracing::info!(%tx, ?kind, amount = %request.amount, "approval submitted");
        self.state = GuardState::Submitted { kind, tx };
        Ok(())
    }

    /// The in-flight transaction confirmed; `generation` is the refresh it triggered.
    pub fn confirmed(&mut self, tx: TxHash, generation: u64) -> Result<(), ApprovalError> {
        self.expect_in_flight(tx)?;
        tracing::info!(%tx, generation, "approval confirmed");
        self.state = GuardState::AwaitingRefresh {
            after_generation: generation,
        };
        Ok(())
    }

    /// The in-flight transaction reverted or was dropped.
    pub fn failed(&mut self, tx: TxHash) -> Result<(), ApprovalError> {
        self.expect_in_flight(tx)?;
        tracing::warn!(%tx, "approval failed");
        self.state = GuardState::Idle;
        Ok(())
    }

    fn expect_in_flight(&self, tx: TxHash) -> Result<(), ApprovalError> {
        match self.state {
            GuardState::Submitted { tx: pending, .. } if pending == tx => Ok(()),
            _ => Err(ApprovalError::UnknownTransaction(tx)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const USDT: Address = Address::repeat_byte(0x55);
    const CONTROLLER: Address = Address::repeat_byte(0xc0);

    fn guard(policy: ApprovalPolicy) -> ApprovalGuard {
        ApprovalGuard::new(USDT, CONTROLLER, policy, ProtocolParams::default())
    }

    fn reading(amount: u64, generation: u64) -> Option<AllowanceReading> {
        Some(AllowanceReading {
            amount: U256::from(amount),
            generation,
        })
    }

    fn tx(n: u8) -> TxHash {
        TxHash::repeat_byte(n)
    }

    #[test]
    fn loading_until_first_read() {
        let mut g = guard(ApprovalPolicy::Unlimited);
        assert_eq!(g.next_action_for(None, U256::from(1u64)), GuardAction::Loading);
    }

    #[test]
    fn full_reset_then_approve_sequence() {
        let mut g = guard(ApprovalPolicy::Unlimited);
        let required = U256::from(100u64);

        // Stuck partial allowance: reset first.
        let GuardAction::Reset(reset) = g.next_action_for(reading(50, 0), required) else {
            panic!("expected reset");
        };
        assert_eq!(reset.amount, U256::ZERO);
        g.submitted(&reset, tx(1)).unwrap();
        assert_eq!(
            g.next_action_for(reading(50, 0), required),
            GuardAction::AwaitingConfirmation(ApprovalKind::Reset)
        );

        // Confirmation triggers refresh generation 1; the old read is ignored.
        g.confirmed(tx(1), 1).unwrap();
        assert_eq!(g.next_action_for(reading(50, 0), required), GuardAction::AwaitingRefresh);

        // Fresh read shows zero: approve.
        let GuardAction::Approve(approve) = g.next_action_for(reading(0, 1), required) else {
            panic!("expected approve");
        };
        assert_eq!(approve.amount, U256::MAX);
        g.submitted(&approve, tx(2)).unwrap();
        g.confirmed(tx(2), 2).unwrap();

        assert_eq!(g.next_action_for(reading(0, 1), required), GuardAction::AwaitingRefresh);
        let fresh = AllowanceReading {
            amount: U256::MAX,
            generation: 2,
        };
        assert_eq!(g.next_action_for(Some(fresh), required), GuardAction::Proceed);
        assert_eq!(g.state(), GuardState::Idle);
    }

    #[test]
    fn second_submission_rejected_while_pending() {
        let mut g = guard(ApprovalPolicy::Exact);
        let GuardAction::Approve(req) = g.next_action_for(reading(0, 0), U256::from(10u64)) else {
            panic!("expected approve");
        };
        assert_eq!(req.amount, U256::from(10u64));
        g.submitted(&req, tx(1)).unwrap();
        assert_eq!(g.submitted(&req, tx(2)), Err(ApprovalError::AlreadyPending(tx(1))));
    }

    #[test]
    fn failure_returns_to_idle() {
        let mut g = guard(ApprovalPolicy::Unlimited);
        let GuardAction::Approve(req) = g.next_action_for(reading(0, 0), U256::from(10u64)) else {
            panic!("expected approve");
        };
        g.submitted(&req, tx(7)).unwrap();
        assert_eq!(g.failed(tx(8)), Err(ApprovalError::UnknownTransaction(tx(8))));
        g.failed(tx(7)).unwrap();
        assert_eq!(g.state(), GuardState::Idle);
        assert!(matches!(
            g.next_action_for(reading(0, 0), U256::from(10u64)),
            GuardAction::Approve(_)
        ));
    }

    #[test]
    fn confirming_unknown_tx_is_an_error() {
        let mut g = guard(ApprovalPolicy::Unlimited);
        assert_eq!(g.confirmed(tx(3), 1), Err(ApprovalError::UnknownTransaction(tx(3))));
    }

    #[test]
    fn human_input_paths() {
        let mut g = guard(ApprovalPolicy::Unlimited);
        let one = 1_000_000_000_000_000_000u64;
        assert_eq!(g.next_action(reading(one, 0), "1"), GuardAction::Proceed);
        assert_eq!(g.next_action(reading(one, 0), "abc"), GuardAction::Invalid);
        assert!(matches!(g.next_action(reading(one, 0), "2"), GuardAction::Reset(_)));
    }

    #[test]
    fn pending_state_wins_over_invalid_input() {
        let mut g = guard(ApprovalPolicy::Unlimited);
        let GuardAction::Approve(req) = g.next_action_for(reading(0, 0), U256::from(1u64)) else {
            panic!("expected approve");
        };
        g.submitted(&req, tx(1)).unwrap();
        assert_eq!(
            g.next_action(reading(0, 0), ""),
            GuardAction::AwaitingConfirmation(ApprovalKind::Approve)
        );
    }
}
