//! Snapshots: one consistent pass over every view call, plus derivations.
//!
//! A failed or missing read is recorded as `None` and stays `None` through
//! every value derived from it. Unknown is never shown as zero.

use crate::config::ClientConfig;
use crate::error::ClientError;
use crate::reader::{ChainReader, ReadCall};
use serde::{Deserialize, Serialize};
use sphygmos_approval::AllowanceReading;
use sphygmos_rewards::{
    advance_accumulator, can_claim, can_unstake, drip_per_day, estimated_miner_share,
    lock_badge, lock_status, pending_reward_of, pu_share_bps, LockStatus,
};
use sphygmos_types::{
    format_optional, Address, ProtocolParams, RewardAccumulator, Timestamp, U256,
    UNKNOWN_DISPLAY,
};

/// Protocol-wide values.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProtocolStats {
    pub miners_pool: Option<U256>,
    pub reward_pool: Option<U256>,
    pub total_pu: Option<U256>,
    pub drip_rate_per_second: Option<U256>,
    pub acc_reward_per_unit: Option<U256>,
}

/// Values specific to the connected wallet.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserPosition {
    pub address: Address,
    pub user_pu: Option<U256>,
    pub staked: Option<U256>,
    pub unlock_time: Option<Timestamp>,
    pub reward_debt: Option<U256>,
    pub pending_drip: Option<U256>,
    /// USDT allowance granted to the controller.
    pub usdt_allowance: Option<U256>,
}

impl UserPosition {
    pub fn unloaded(address: Address) -> Self {
        Self {
            address,
            user_pu: None,
            staked: None,
            unlock_time: None,
            reward_debt: None,
            pending_drip: None,
            usdt_allowance: None,
        }
    }
}

/// Everything computed from the raw reads.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DerivedView {
    pub pending_reward: Option<U256>,
    pub lock: Option<LockStatus>,
    pub can_unstake: bool,
    /// `None` while the rate is unknown or still zero.
    pub drip_per_day: Option<U256>,
    pub can_claim_drip: bool,
    pub pu_share_bps: Option<u32>,
    pub estimated_miner_share: Option<U256>,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Snapshot {
    /// Refresh generation current when the reads started.
    pub generation: u64,
    pub read_at: Timestamp,
    pub derived_at: Timestamp,
    pub stats: ProtocolStats,
    /// `None` when no wallet is connected.
    pub user: Option<UserPosition>,
    pub view: DerivedView,
    pub failed_reads: Vec<ReadCall>,
}

fn settle<T>(
    call: ReadCall,
    result: Result<T, ClientError>,
    failed: &mut Vec<ReadCall>,
) -> Option<T> {
    match result {
        Ok(value) => Some(value),
        Err(e) => {
            tracing::warn!(%call, error = %e, "chain read failed");
            failed.push(call);
            None
        }
    }
}

impl Snapshot {
    /// Read every view the dashboard needs and derive the display values.
    pub async fn read<R: ChainReader>(
        reader: &R,
        config: &ClientConfig,
        user: Option<Address>,
        generation: u64,
        now: Timestamp,
    ) -> Self {
        let mut failed = Vec::new();
        let stats = ProtocolStats {
            miners_pool: settle(
                ReadCall::MinersPoolBalance,
                reader.miners_pool_balance().await,
                &mut failed,
            ),
            reward_pool: settle(
                ReadCall::RewardPoolBalance,
                reader.reward_pool_balance().await,
                &mut failed,
            ),
            total_pu: settle(ReadCall::TotalPu, reader.total_pu().await, &mut failed),
            drip_rate_per_second: settle(
                ReadCall::DripRatePerSecond,
                reader.drip_rate_per_second().await,
                &mut failed,
            ),
            acc_reward_per_unit: settle(
                ReadCall::AccRewardPerUnit,
                reader.acc_reward_per_unit().await,
                &mut failed,
            ),
        };

        let user = match user {
            Some(address) => {
                let contracts = &config.contracts;
                Some(UserPosition {
                    address,
                    user_pu: settle(ReadCall::UserPu, reader.user_pu(address).await, &mut failed),
                    staked: settle(
                        ReadCall::StakedAmount,
                        reader.staked_amount(address).await,
                        &mut failed,
                    ),
                    unlock_time: settle(
                        ReadCall::UnlockTime,
                        reader.unlock_time(address).await,
                        &mut failed,
                    ),
                    reward_debt: settle(
                        ReadCall::RewardDebt,
                        reader.reward_debt(address).await,
                        &mut failed,
                    ),
                    pending_drip: settle(
                        ReadCall::PendingDripReward,
                        reader.pending_drip_reward(address).await,
                        &mut failed,
                    ),
                    usdt_allowance: settle(
                        ReadCall::Allowance,
                        reader.allowance(contracts.usdt, address, contracts.controller).await,
                        &mut failed,
                    ),
                })
            }
            None => None,
        };

        tracing::debug!(generation, failed = failed.len(), "snapshot read");
        let view = derive(&stats, user.as_ref(), now, &config.params());
        Self {
            generation,
            read_at: now,
            derived_at: now,
            stats,
            user,
            view,
            failed_reads: failed,
        }
    }

    /// Recompute time-dependent values without re-reading the chain.
    pub fn rederive(&mut self, now: Timestamp, params: &ProtocolParams) {
        self.view = derive(&self.stats, self.user.as_ref(), now, params);
        self.derived_at = now;
    }

    /// Keep `accRewardPerUnit` from moving backwards across reads.
    ///
    /// `last` is the highest value seen so far. A smaller read came from a
    /// lagging node: it is replaced by `last` and the view re-derived.
    /// Returns whether the read regressed.
    pub fn hold_accumulator(
        &mut self,
        last: &mut Option<RewardAccumulator>,
        params: &ProtocolParams,
    ) -> bool {
        let Some(read) = self.stats.acc_reward_per_unit else {
            return false;
        };
        let Some(current) = last else {
            *last = Some(RewardAccumulator::new(read));
            return false;
        };
        match advance_accumulator(current, read) {
            Ok(()) => false,
            Err(e) => {
                tracing::warn!(
                    generation = self.generation,
                    error = %e,
                    "discarding regressed accumulator read"
                );
                self.stats.acc_reward_per_unit = Some(current.acc_reward_per_unit);
                let derived_at = self.derived_at;
                self.rederive(derived_at, params);
                true
            }
        }
    }

    /// The USDT allowance, tagged for the approval guard.
    pub fn allowance_reading(&self) -> Option<AllowanceReading> {
        let amount = self.user.as_ref()?.usdt_allowance?;
        Some(AllowanceReading {
            amount,
            generation: self.generation,
        })
    }

    pub fn is_complete(&self) -> bool {
        self.failed_reads.is_empty()
    }
}

/// Derive display values from raw reads at `now`.
pub fn derive(
    stats: &ProtocolStats,
    user: Option<&UserPosition>,
    now: Timestamp,
    params: &ProtocolParams,
) -> DerivedView {
    let drip_per_day = stats.drip_rate_per_second.and_then(|rate| match drip_per_day(rate) {
        Ok(per_day) => per_day,
        Err(e) => {
            tracing::warn!(error = %e, "drip projection failed");
            None
        }
    });

    let Some(user) = user else {
        return DerivedView {
            drip_per_day,
            ..DerivedView::default()
        };
    };

    let pending_reward = match pending_reward_of(
        user.staked,
        stats.acc_reward_per_unit,
        user.reward_debt,
        params.reward_scale,
    ) {
        Ok(pending) => pending,
        Err(e) => {
            tracing::warn!(user = %user.address, error = %e, "pending reward derivation failed");
            None
        }
    };

    let pu_share = match (user.user_pu, stats.total_pu) {
        (Some(mine), Some(total)) => Some(pu_share_bps(mine, total)),
        _ => None,
    };
    let miner_share = match (user.user_pu, stats.total_pu, stats.miners_pool) {
        (Some(mine), Some(total), Some(pool)) => Some(estimated_miner_share(mine, total, pool)),
        _ => None,
    };

    DerivedView {
        pending_reward,
        lock: user.unlock_time.map(|unlock| lock_status(unlock, now)),
        can_unstake: match (user.staked, user.unlock_time) {
            (Some(staked), Some(unlock)) => can_unstake(staked, unlock, now),
            _ => false,
        },
        drip_per_day,
        can_claim_drip: can_claim(user.pending_drip),
        pu_share_bps: pu_share,
        estimated_miner_share: miner_share,
    }
}

pub const NO_STAKE: &str = "No Stake found";
pub const WAITING_REBASE: &str = "Waiting rebase…";

/// The dashboard's labels, rendered as strings.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct DashboardText {
    pub miners_pool: String,
    pub reward_pool: String,
    pub total_pu: String,
    pub your_pu: String,
    pub staked: String,
    pub lock: String,
    /// Lock length shown beside the stake form.
    pub lock_badge: String,
    pub pending_reward: String,
    pub drip_per_day: String,
    pub pending_drip: String,
}

impl DashboardText {
    pub fn render(snapshot: &Snapshot, config: &ClientConfig) -> Self {
        let fmt = |v: Option<U256>| {
            format_optional(v, config.token_decimals, config.display_fraction_digits)
        };
        let user = snapshot.user.as_ref();

        let lock = match (user.and_then(|u| u.staked), &snapshot.view.lock) {
            (Some(staked), _) if staked.is_zero() => NO_STAKE.to_string(),
            (Some(_), Some(lock)) => lock.display.clone(),
            _ => UNKNOWN_DISPLAY.to_string(),
        };
        let drip_per_day = match (snapshot.stats.drip_rate_per_second, snapshot.view.drip_per_day) {
            (None, _) => UNKNOWN_DISPLAY.to_string(),
            (Some(_), None) => WAITING_REBASE.to_string(),
            (Some(_), per_day) => fmt(per_day),
        };

        Self {
            miners_pool: fmt(snapshot.stats.miners_pool),
            reward_pool: fmt(snapshot.stats.reward_pool),
            total_pu: fmt(snapshot.stats.total_pu),
            your_pu: fmt(user.and_then(|u| u.user_pu)),
            staked: fmt(user.and_then(|u| u.staked)),
            lock,
            lock_badge: lock_badge(config.params().stake_lock_secs),
            pending_reward: fmt(snapshot.view.pending_reward),
            drip_per_day,
            pending_drip: fmt(user.and_then(|u| u.pending_drip)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const ONE: u64 = 1_000_000_000_000_000_000;

    fn u(v: u64) -> U256 {
        U256::from(v)
    }

    fn loaded_user(staked: u64, unlock: u64) -> UserPosition {
        UserPosition {
            address: Address::repeat_byte(7),
            user_pu: Some(u(25)),
            staked: Some(u(staked)),
            unlock_time: Some(Timestamp::new(unlock)),
            reward_debt: Some(u(1_500)),
            pending_drip: Some(u(0)),
            usdt_allowance: Some(U256::MAX),
        }
    }

    fn loaded_stats() -> ProtocolStats {
        ProtocolStats {
            miners_pool: Some(u(1_000)),
            reward_pool: Some(u(500)),
            total_pu: Some(u(100)),
            drip_rate_per_second: Some(u(1)),
            acc_reward_per_unit: Some(u(2) * u(ONE)),
        }
    }

    #[test]
    fn derives_every_value_when_loaded() {
        let view = derive(
            &loaded_stats(),
            Some(&loaded_user(1_000, 5_000)),
            Timestamp::new(1_339),
            &ProtocolParams::default(),
        );
        assert_eq!(view.pending_reward, Some(u(500)));
        let lock = view.lock.unwrap();
        assert!(lock.locked);
        assert_eq!(lock.display, "00d:01h:01m");
        assert!(!view.can_unstake);
        assert_eq!(view.drip_per_day, Some(u(86_400)));
        assert!(!view.can_claim_drip);
        assert_eq!(view.pu_share_bps, Some(2_500));
        assert_eq!(view.estimated_miner_share, Some(u(250)));
    }

    #[test]
    fn missing_accumulator_leaves_reward_unknown() {
        let stats = ProtocolStats {
            acc_reward_per_unit: None,
            ..loaded_stats()
        };
        let view = derive(
            &stats,
            Some(&loaded_user(1_000, 0)),
            Timestamp::new(10),
            &ProtocolParams::default(),
        );
        assert_eq!(view.pending_reward, None);
        // Never staked: unlock time zero.
        assert_eq!(view.lock.unwrap().display, "Not Staked");
        assert!(view.can_unstake);
    }

    #[test]
    fn no_wallet_only_protocol_values() {
        let view = derive(&loaded_stats(), None, Timestamp::new(10), &ProtocolParams::default());
        assert_eq!(view.drip_per_day, Some(u(86_400)));
        assert_eq!(view.pending_reward, None);
        assert_eq!(view.lock, None);
        assert!(!view.can_unstake);
    }

    fn snapshot_with(stats: ProtocolStats, user: Option<UserPosition>, now: u64) -> Snapshot {
        let now = Timestamp::new(now);
        let view = derive(&stats, user.as_ref(), now, &ProtocolParams::default());
        Snapshot {
            generation: 3,
            read_at: now,
            derived_at: now,
            stats,
            user,
            view,
            failed_reads: Vec::new(),
        }
    }

    #[test]
    fn rederive_moves_the_countdown() {
        let mut snap = snapshot_with(loaded_stats(), Some(loaded_user(10, 5_000)), 1_000);
        assert!(snap.view.lock.as_ref().unwrap().locked);
        snap.rederive(Timestamp::new(5_000), &ProtocolParams::default());
        assert!(!snap.view.lock.as_ref().unwrap().locked);
        assert!(snap.view.can_unstake);
        assert_eq!(snap.derived_at, Timestamp::new(5_000));
        assert_eq!(snap.read_at, Timestamp::new(1_000));
    }

    #[test]
    fn regressed_accumulator_keeps_previous_value() {
        let params = ProtocolParams::default();
        let mut last = None;

        let mut first = snapshot_with(loaded_stats(), Some(loaded_user(1_000, 0)), 1);
        assert!(!first.hold_accumulator(&mut last, &params));
        assert_eq!(last, Some(RewardAccumulator::new(u(2) * u(ONE))));

        let mut stats = loaded_stats();
        stats.acc_reward_per_unit = Some(u(ONE));
        let mut lagging = snapshot_with(stats, Some(loaded_user(1_000, 0)), 2);
        assert_eq!(lagging.view.pending_reward, Some(U256::ZERO));
        assert!(lagging.hold_accumulator(&mut last, &params));
        assert_eq!(lagging.stats.acc_reward_per_unit, Some(u(2) * u(ONE)));
        assert_eq!(lagging.view.pending_reward, Some(u(500)));
        assert_eq!(lagging.derived_at, Timestamp::new(2));

        let mut stats = loaded_stats();
        stats.acc_reward_per_unit = Some(u(3) * u(ONE));
        let mut ahead = snapshot_with(stats, Some(loaded_user(1_000, 0)), 3);
        assert!(!ahead.hold_accumulator(&mut last, &params));
        assert_eq!(last, Some(RewardAccumulator::new(u(3) * u(ONE))));
    }

    #[test]
    fn missing_accumulator_read_leaves_history_alone() {
        let mut stats = loaded_stats();
        stats.acc_reward_per_unit = None;
        let mut snap = snapshot_with(stats, None, 1);
        let mut last = Some(RewardAccumulator::new(u(7)));
        assert!(!snap.hold_accumulator(&mut last, &ProtocolParams::default()));
        assert_eq!(snap.stats.acc_reward_per_unit, None);
        assert_eq!(last, Some(RewardAccumulator::new(u(7))));
    }

    #[test]
    fn allowance_reading_carries_generation() {
        let snap = snapshot_with(loaded_stats(), Some(loaded_user(10, 0)), 1);
        assert_eq!(
            snap.allowance_reading(),
            Some(AllowanceReading {
                amount: U256::MAX,
                generation: 3
            })
        );
        let anon = snapshot_with(loaded_stats(), None, 1);
        assert_eq!(anon.allowance_reading(), None);
    }

    #[test]
    fn text_rendering() {
        let config = ClientConfig::default();
        let mut stats = loaded_stats();
        stats.miners_pool = Some(u(1_234) * u(ONE) + u(ONE / 2));
        let snap = snapshot_with(stats, Some(loaded_user(0, 0)), 1);
        let text = DashboardText::render(&snap, &config);
        assert_eq!(text.miners_pool, "1,234.5");
        assert_eq!(text.staked, "0");
        assert_eq!(text.lock, NO_STAKE);
        assert_eq!(text.lock_badge, "168H LOCK");
        assert_eq!(text.pending_drip, "0");
    }

    #[test]
    fn text_distinguishes_unknown_from_waiting() {
        let config = ClientConfig::default();
        let mut stats = loaded_stats();
        stats.drip_rate_per_second = Some(U256::ZERO);
        stats.total_pu = None;
        let snap = snapshot_with(stats, None, 1);
        let text = DashboardText::render(&snap, &config);
        assert_eq!(text.drip_per_day, WAITING_REBASE);
        assert_eq!(text.total_pu, UNKNOWN_DISPLAY);
        assert_eq!(text.your_pu, UNKNOWN_DISPLAY);
        assert_eq!(text.lock, UNKNOWN_DISPLAY);
    }
}
