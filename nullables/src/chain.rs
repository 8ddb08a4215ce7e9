//! Nullable chain — in-memory contract views.
//!
//! Unset values read as zero, like an unwritten Solidity mapping slot.
//! Individual calls can be made to fail to exercise unknown-value handling.

use sphygmos_client::{ChainReader, ClientError, ReadCall};
use sphygmos_types::{Address, Allowance, StakePosition, Timestamp, U256};
use std::collections::{HashMap, HashSet};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

#[derive(Clone, Debug, Default)]
struct UserState {
    staked: U256,
    unlock_time: Timestamp,
    reward_debt: U256,
    user_pu: U256,
    pending_drip: U256,
}

#[derive(Debug, Default)]
struct ChainState {
    allowances: HashMap<(Address, Address, Address), U256>,
    users: HashMap<Address, UserState>,
    acc_reward_per_unit: U256,
    total_pu: U256,
    miners_pool: U256,
    reward_pool: U256,
    drip_rate: U256,
    failing: HashSet<ReadCall>,
    calls: Vec<ReadCall>,
}

/// In-memory stand-in for the token and controller contracts.
///
/// Clones share state, so a test can keep a handle while the poller owns another.
#[derive(Clone, Debug, Default)]
pub struct NullChain {
    state: Arc<Mutex<ChainState>>,
}

impl NullChain {
    pub fn new() -> Self {
        Self::default()
    }

    fn lock(&self) -> MutexGuard<'_, ChainState> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }

    fn with_user(&self, user: Address, f: impl FnOnce(&mut UserState)) {
        f(self.lock().users.entry(user).or_default());
    }

    /// Record `allowance` on the ERC-20 at `token`.
    pub fn set_allowance(&self, token: Address, allowance: Allowance) {
        self.lock()
            .allowances
            .insert((token, allowance.owner, allowance.spender), allowance.amount);
    }

    pub fn set_stake(&self, position: StakePosition) {
        self.with_user(position.staker, |u| {
            u.staked = position.amount_staked;
            u.unlock_time = position.unlock_timestamp;
            u.reward_debt = position.reward_debt;
        });
    }

    pub fn set_user_pu(&self, user: Address, pu: U256) {
        self.with_user(user, |u| u.user_pu = pu);
    }

    pub fn set_pending_drip(&self, user: Address, pending: U256) {
        self.with_user(user, |u| u.pending_drip = pending);
    }

    pub fn set_acc_reward_per_unit(&self, acc: U256) {
        self.lock().acc_reward_per_unit = acc;
    }

    pub fn set_total_pu(&self, total: U256) {
        self.lock().total_pu = total;
    }

    pub fn set_pools(&self, miners_pool: U256, reward_pool: U256) {
        let mut state = self.lock();
        state.miners_pool = miners_pool;
        state.reward_pool = reward_pool;
    }

    pub fn set_drip_rate(&self, rate_per_second: U256) {
        self.lock().drip_rate = rate_per_second;
    }

    /// Make every subsequent `call` fail until [`NullChain::recover`].
    pub fn fail(&self, call: ReadCall) {
        self.lock().failing.insert(call);
    }

    pub fn recover(&self, call: ReadCall) {
        self.lock().failing.remove(&call);
    }

    /// Every call made so far, in order (for assertions).
    pub fn calls(&self) -> Vec<ReadCall> {
        self.lock().calls.clone()
    }

    pub fn reset_calls(&self) {
        self.lock().calls.clear();
    }

    fn read<T>(&self, call: ReadCall, f: impl FnOnce(&ChainState) -> T) -> Result<T, ClientError> {
        let mut state = self.lock();
        state.calls.push(call);
        if state.failing.contains(&call) {
            return Err(ClientError::Read {
                call,
                reason: "injected failure".into(),
            });
        }
        Ok(f(&*state))
    }

    fn read_user<T>(
        &self,
        call: ReadCall,
        user: Address,
        f: impl FnOnce(&UserState) -> T,
    ) -> Result<T, ClientError> {
        self.read(call, |state| {
            let fallback = UserState::default();
            f(state.users.get(&user).unwrap_or(&fallback))
        })
    }
}

impl ChainReader for NullChain {
    async fn allowance(
        &self,
        token: Address,
        owner: Address,
        spender: Address,
    ) -> Result<U256, ClientError> {
        self.read(ReadCall::Allowance, |s| {
            s.allowances.get(&(token, owner, spender)).copied().unwrap_or_default()
        })
    }

    async fn staked_amount(&self, user: Address) -> Result<U256, ClientError> {
        self.read_user(ReadCall::StakedAmount, user, |u| u.staked)
    }

    async fn unlock_time(&self, user: Address) -> Result<Timestamp, ClientError> {
        self.read_user(ReadCall::UnlockTime, user, |u| u.unlock_time)
    }

    async fn acc_reward_per_unit(&self) -> Result<U256, ClientError> {
        self.read(ReadCall::AccRewardPerUnit, |s| s.acc_reward_per_unit)
    }

    async fn reward_debt(&self, user: Address) -> Result<U256, ClientError> {
        self.read_user(ReadCall::RewardDebt, user, |u| u.reward_debt)
    }

    async fn user_pu(&self, user: Address) -> Result<U256, ClientError> {
        self.read_user(ReadCall::UserPu, user, |u| u.user_pu)
    }

    async fn total_pu(&self) -> Result<U256, ClientError> {
        self.read(ReadCall::TotalPu, |s| s.total_pu)
    }

    async fn miners_pool_balance(&self) -> Result<U256, ClientError> {
        self.read(ReadCall::MinersPoolBalance, |s| s.miners_pool)
    }

    async fn reward_pool_balance(&self) -> Result<U256, ClientError> {
        self.read(ReadCall::RewardPoolBalance, |s| s.reward_pool)
    }

    async fn drip_rate_per_second(&self) -> Result<U256, ClientError> {
        self.read(ReadCall::DripRatePerSecond, |s| s.drip_rate)
    }

    async fn pending_drip_reward(&self, user: Address) -> Result<U256, ClientError> {
        self.read_user(ReadCall::PendingDripReward, user, |u| u.pending_drip)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn unset_values_read_as_zero() {
        let chain = NullChain::new();
        let user = Address::repeat_byte(1);
        assert_eq!(chain.staked_amount(user).await.unwrap(), U256::ZERO);
        assert_eq!(chain.unlock_time(user).await.unwrap(), Timestamp::EPOCH);
        assert_eq!(chain.calls(), vec![ReadCall::StakedAmount, ReadCall::UnlockTime]);
    }

    #[tokio::test]
    async fn injected_failures_until_recovered() {
        let chain = NullChain::new();
        chain.set_total_pu(U256::from(9u64));
        chain.fail(ReadCall::TotalPu);
        assert!(matches!(
            chain.total_pu().await,
            Err(ClientError::Read { call: ReadCall::TotalPu, .. })
        ));
        chain.recover(ReadCall::TotalPu);
        assert_eq!(chain.total_pu().await.unwrap(), U256::from(9u64));
    }

    #[tokio::test]
    async fn allowances_are_keyed_by_triple() {
        let chain = NullChain::new();
        let token = Address::repeat_byte(1);
        let owner = Address::repeat_byte(2);
        let spender = Address::repeat_byte(3);
        chain.set_allowance(
            token,
            Allowance {
                owner,
                spender,
                amount: U256::from(50u64),
            },
        );
        assert_eq!(chain.allowance(token, owner, spender).await.unwrap(), U256::from(50u64));
        assert_eq!(chain.allowance(token, spender, owner).await.unwrap(), U256::ZERO);
    }

    #[tokio::test]
    async fn stake_position_fills_per_user_views() {
        let chain = NullChain::new();
        let staker = Address::repeat_byte(4);
        chain.set_stake(StakePosition {
            staker,
            amount_staked: U256::from(7u64),
            unlock_timestamp: Timestamp::new(99),
            reward_debt: U256::from(3u64),
        });
        assert_eq!(chain.staked_amount(staker).await.unwrap(), U256::from(7u64));
        assert_eq!(chain.unlock_time(staker).await.unwrap(), Timestamp::new(99));
        assert_eq!(chain.reward_debt(staker).await.unwrap(), U256::from(3u64));
        assert_eq!(chain.user_pu(staker).await.unwrap(), U256::ZERO);
    }
}
