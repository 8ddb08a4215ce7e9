//! How much to approve, and with what gas.

use crate::decision::Decision;
use serde::{Deserialize, Serialize};
use sphygmos_types::{Address, ProtocolParams, U256};

/// Amount granted when an approval is needed.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ApprovalPolicy {
    /// Approve `U256::MAX` once so later actions skip the wallet prompt.
    #[default]
    Unlimited,
    /// Approve exactly what the pending action needs.
    Exact,
}

impl ApprovalPolicy {
    pub fn approval_amount(&self, required: U256) -> U256 {
        match self {
            ApprovalPolicy::Unlimited => U256::MAX,
            ApprovalPolicy::Exact => required,
        }
    }
}

/// An `approve(spender, amount)` call the transaction layer should submit.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ApprovalRequest {
    pub token: Address,
    pub spender: Address,
    pub amount: U256,
    pub gas_limit: u64,
}

impl ApprovalRequest {
    pub fn reset(token: Address, spender: Address, params: &ProtocolParams) -> Self {
        Self {
            token,
            spender,
            amount: U256::ZERO,
            gas_limit: params.reset_gas_limit,
        }
    }

    pub fn approve(
        token: Address,
        spender: Address,
        required: U256,
        policy: ApprovalPolicy,
        params: &ProtocolParams,
    ) -> Self {
        Self {
            token,
            spender,
            amount: policy.approval_amount(required),
            gas_limit: params.approve_gas_limit,
        }
    }

    /// The request a decision calls for, if any.
    pub fn for_decision(
        decision: Decision,
        token: Address,
        spender: Address,
        required: U256,
        policy: ApprovalPolicy,
        params: &ProtocolParams,
    ) -> Option<Self> {
        match decision {
            Decision::NeedsReset => Some(Self::reset(token, spender, params)),
            Decision::NeedsApprove => Some(Self::approve(token, spender, required, policy, params)),
            Decision::Proceed | Decision::Invalid => None,
        }
    }

    pub fn is_reset(&self) -> bool {
        self.amount.is_zero()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const TOKEN: Address = Address::repeat_byte(0x11);
    const SPENDER: Address = Address::repeat_byte(0x22);

    #[test]
    fn unlimited_uses_max_sentinel() {
        let params = ProtocolParams::default();
        let req = ApprovalRequest::approve(
            TOKEN,
            SPENDER,
            U256::from(5u64),
            ApprovalPolicy::Unlimited,
            &params,
        );
        assert_eq!(req.amount, U256::MAX);
        assert_eq!(req.gas_limit, 70_000);
    }

    #[test]
    fn exact_uses_required_amount() {
        let params = ProtocolParams::default();
        let required = U256::from(5u64);
        let req =
            ApprovalRequest::approve(TOKEN, SPENDER, required, ApprovalPolicy::Exact, &params);
        assert_eq!(req.amount, required);
    }

    #[test]
    fn reset_is_zero_with_lower_gas() {
        let params = ProtocolParams::default();
        let req = ApprovalRequest::reset(TOKEN, SPENDER, &params);
        assert!(req.is_reset());
        assert_eq!(req.gas_limit, 50_000);
    }

    #[test]
    fn decisions_map_to_requests() {
        let params = ProtocolParams::default();
        let required = U256::from(100u64);
        let request = |decision| {
            ApprovalRequest::for_decision(
                decision,
                TOKEN,
                SPENDER,
                required,
                ApprovalPolicy::Exact,
                &params,
            )
        };
        assert!(request(Decision::NeedsReset).unwrap().is_reset());
        assert_eq!(request(Decision::NeedsApprove).unwrap().amount, required);
        assert!(request(Decision::Proceed).is_none());
        assert!(request(Decision::Invalid).is_none());
    }
}
