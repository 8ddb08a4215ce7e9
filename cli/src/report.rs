//! Offline evaluation of the client derivations.
//!
//! Every command takes raw on-chain integers (wei-style `U256`) or
//! human-entered amounts and prints what the dashboard would show.

use anyhow::{anyhow, Context};
use serde::Serialize;
use sphygmos_approval::{evaluate_input, ApprovalRequest, Decision};
use sphygmos_client::snapshot::WAITING_REBASE;
use sphygmos_client::ClientConfig;
use sphygmos_rewards::{
    can_claim, can_unstake, drip_per_day, lock_status, pending_reward, LockStatus,
};
use sphygmos_types::{Timestamp, TokenAmount, U256};
use std::fmt;

/// Parse a raw integer (decimal, or `0x`-prefixed hex).
pub fn parse_raw(input: &str) -> anyhow::Result<U256> {
    input
        .trim()
        .parse::<U256>()
        .map_err(|e| anyhow!("invalid integer '{input}': {e}"))
}

fn fmt_amount(raw: U256, config: &ClientConfig) -> String {
    TokenAmount::new(raw, config.token_decimals).display(config.display_fraction_digits)
}

#[derive(Debug, Serialize)]
pub struct AllowanceReport {
    pub allowance: U256,
    pub required: String,
    pub decision: Decision,
    pub needs_transaction: bool,
    /// The approve call to submit next, if any.
    pub request: Option<ApprovalRequest>,
}

pub fn allowance(
    config: &ClientConfig,
    allowance: &str,
    required: &str,
) -> anyhow::Result<AllowanceReport> {
    let allowance = parse_raw(allowance).context("--allowance")?;
    let params = config.params();
    let decision = evaluate_input(allowance, required, params.token_decimals);
    let request = match TokenAmount::parse(required, params.token_decimals) {
        Ok(amount) => ApprovalRequest::for_decision(
            decision,
            config.contracts.usdt,
            config.contracts.controller,
            amount.raw(),
            config.approval_policy,
            &params,
        ),
        Err(e) => {
            tracing::debug!(input = required, error = %e, "required amount rejected");
            None
        }
    };
    Ok(AllowanceReport {
        allowance,
        required: required.to_string(),
        decision,
        needs_transaction: decision.needs_transaction(),
        request,
    })
}

impl fmt::Display for AllowanceReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "allowance: {}", self.allowance)?;
        writeln!(f, "required:  {}", self.required)?;
        write!(f, "decision:  {:?}", self.decision)?;
        if let Some(req) = &self.request {
            write!(
                f,
                "\nnext:      approve({}, {}) gas {}",
                req.spender, req.amount, req.gas_limit
            )?;
        }
        Ok(())
    }
}

#[derive(Debug, Serialize)]
pub struct RewardReport {
    pub pending: U256,
    pub display: String,
}

pub fn reward(
    config: &ClientConfig,
    stake: &str,
    acc: &str,
    debt: &str,
    scale: Option<&str>,
) -> anyhow::Result<RewardReport> {
    let stake = parse_raw(stake).context("--stake")?;
    let acc = parse_raw(acc).context("--acc")?;
    let debt = parse_raw(debt).context("--debt")?;
    let scale = match scale {
        Some(s) => parse_raw(s).context("--scale")?,
        None => config.params().reward_scale,
    };
    let pending = pending_reward(stake, acc, debt, scale)?;
    Ok(RewardReport {
        pending,
        display: fmt_amount(pending, config),
    })
}

impl fmt::Display for RewardReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "pending reward: {} ({})", self.display, self.pending)
    }
}

#[derive(Debug, Serialize)]
pub struct LockReport {
    pub now: Timestamp,
    #[serde(flatten)]
    pub status: LockStatus,
    /// Present when a staked amount was given.
    pub can_unstake: Option<bool>,
}

pub fn lock(unlock: u64, now: Timestamp, staked: Option<&str>) -> anyhow::Result<LockReport> {
    let unlock = Timestamp::new(unlock);
    let can_unstake = match staked {
        Some(s) => Some(can_unstake(parse_raw(s).context("--staked")?, unlock, now)),
        None => None,
    };
    Ok(LockReport {
        now,
        status: lock_status(unlock, now),
        can_unstake,
    })
}

impl fmt::Display for LockReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "lock: {}", self.status.display)?;
        if let Some(can) = self.can_unstake {
            write!(f, "\ncan unstake: {can}")?;
        }
        Ok(())
    }
}

#[derive(Debug, Serialize)]
pub struct DripReport {
    pub rate_per_second: U256,
    /// `None` until the controller has rebased.
    pub per_day: Option<U256>,
    pub display: String,
    pub can_claim: Option<bool>,
}

pub fn drip(
    config: &ClientConfig,
    rate: &str,
    pending: Option<&str>,
) -> anyhow::Result<DripReport> {
    let rate = parse_raw(rate).context("--rate")?;
    let per_day = drip_per_day(rate)?;
    let can_claim = match pending {
        Some(p) => Some(can_claim(Some(parse_raw(p).context("--pending")?))),
        None => None,
    };
    Ok(DripReport {
        rate_per_second: rate,
        per_day,
        display: match per_day {
            Some(v) => format!("{} / day", fmt_amount(v, config)),
            None => WAITING_REBASE.to_string(),
        },
        can_claim,
    })
}

impl fmt::Display for DripReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "drip: {}", self.display)?;
        if let Some(can) = self.can_claim {
            write!(f, "\ncan claim: {can}")?;
        }
        Ok(())
    }
}
