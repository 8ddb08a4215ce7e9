use proptest::prelude::*;

use sphygmos_rewards::{can_unstake, lock_status, pending_reward, pu_share_bps};
use sphygmos_types::params::REWARD_SCALE;
use sphygmos_types::{Timestamp, U256};

fn scale() -> U256 {
    U256::from(REWARD_SCALE)
}

proptest! {
    /// Pending reward never decreases as the accumulator grows.
    #[test]
    fn pending_monotonic_in_accumulator(
        stake in any::<u64>(),
        acc1 in any::<u128>(),
        bump in any::<u64>(),
        debt in any::<u128>(),
    ) {
        let acc2 = U256::from(acc1) + U256::from(bump);
        let p1 = pending_reward(U256::from(stake), U256::from(acc1), U256::from(debt), scale())
            .unwrap();
        let p2 = pending_reward(U256::from(stake), acc2, U256::from(debt), scale()).unwrap();
        prop_assert!(p2 >= p1, "pending decreased: {} -> {}", p1, p2);
    }

    /// Pending reward is exactly accumulated minus debt, or zero.
    #[test]
    fn pending_matches_formula(
        stake in any::<u64>(),
        acc in any::<u64>(),
        debt in any::<u64>(),
    ) {
        let accumulated = U256::from(stake) * U256::from(acc) / scale();
        let expected = if accumulated >= U256::from(debt) {
            accumulated - U256::from(debt)
        } else {
            U256::ZERO
        };
        let pending =
            pending_reward(U256::from(stake), U256::from(acc), U256::from(debt), scale()).unwrap();
        prop_assert_eq!(pending, expected);
    }

    /// More debt never means more reward.
    #[test]
    fn pending_antitone_in_debt(
        stake in any::<u64>(),
        acc in any::<u128>(),
        debt in any::<u64>(),
        extra in any::<u64>(),
    ) {
        let lo = pending_reward(U256::from(stake), U256::from(acc), U256::from(debt), scale())
            .unwrap();
        let hi_debt = U256::from(debt) + U256::from(extra);
        let hi = pending_reward(U256::from(stake), U256::from(acc), hi_debt, scale()).unwrap();
        prop_assert!(hi <= lo);
    }

    /// An unlock time of zero is never locked, whatever the clock says.
    #[test]
    fn never_staked_is_never_locked(now in any::<u64>()) {
        let status = lock_status(Timestamp::EPOCH, Timestamp::new(now));
        prop_assert!(!status.locked);
        prop_assert_eq!(status.display, "Not Staked");
    }

    /// A position is locked exactly while `now < unlock`.
    #[test]
    fn locked_iff_before_unlock(unlock in 1u64..u64::MAX, now in any::<u64>()) {
        let status = lock_status(Timestamp::new(unlock), Timestamp::new(now));
        prop_assert_eq!(status.locked, now < unlock);
        if status.locked {
            prop_assert_eq!(status.remaining, unlock - now);
        } else {
            prop_assert_eq!(status.remaining, 0);
        }
    }

    /// Unstaking is allowed only once the lock has lapsed.
    #[test]
    fn unstake_waits_for_lock(stake in 1u64.., unlock in 1u64..1_000_000, now in 0u64..2_000_000) {
        prop_assert_eq!(
            can_unstake(U256::from(stake), Timestamp::new(unlock), Timestamp::new(now)),
            now >= unlock
        );
    }

    /// The power-unit share is a valid basis-point value.
    #[test]
    fn share_is_bounded(user in any::<u128>(), total in any::<u128>()) {
        let bps = pu_share_bps(U256::from(user), U256::from(total));
        prop_assert!(bps <= 10_000);
    }
}
