//! Power-unit share of the miners pool.

use sphygmos_types::U256;

const BPS: u64 = 10_000;

/// The wallet's share of all power units, in basis points.
///
/// Zero when nobody holds power units. Capped at 100% so a stale `totalPU`
/// read that lags a fresh `userPU` read cannot exceed the whole.
pub fn pu_share_bps(user_pu: U256, total_pu: U256) -> u32 {
    if total_pu.is_zero() || user_pu.is_zero() {
        return 0;
    }
    if user_pu >= total_pu {
        return BPS as u32;
    }
    // user < total, so the quotient is below 10_000.
    match user_pu.checked_mul(U256::from(BPS)) {
        Some(scaled) => (scaled / total_pu).as_limbs()[0] as u32,
        None => {
            // Both operands are huge; scale the divisor down instead.
            let per_bps = total_pu / U256::from(BPS);
            (user_pu / per_bps).as_limbs()[0].min(BPS) as u32
        }
    }
}

/// Pro-rata slice of the miners pool this wallet's power units represent.
///
/// Informational only: the contract decides the real payout.
pub fn estimated_miner_share(user_pu: U256, total_pu: U256, miners_pool: U256) -> U256 {
    if total_pu.is_zero() || user_pu.is_zero() {
        return U256::ZERO;
    }
    let user_pu = user_pu.min(total_pu);
    match miners_pool.checked_mul(user_pu) {
        Some(product) => product / total_pu,
        None => miners_pool / total_pu * user_pu,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn u(v: u64) -> U256 {
        U256::from(v)
    }

    #[test]
    fn share_in_basis_points() {
        assert_eq!(pu_share_bps(u(25), u(100)), 2_500);
        assert_eq!(pu_share_bps(u(1), u(3)), 3_333);
    }

    #[test]
    fn share_edges() {
        assert_eq!(pu_share_bps(u(0), u(100)), 0);
        assert_eq!(pu_share_bps(u(5), u(0)), 0);
        assert_eq!(pu_share_bps(u(150), u(100)), 10_000);
    }

    #[test]
    fn share_handles_huge_values() {
        let total = U256::MAX;
        let user = U256::MAX / u(2);
        let bps = pu_share_bps(user, total);
        assert!((4_999..=5_000).contains(&bps));
    }

    #[test]
    fn miner_share_is_pro_rata() {
        assert_eq!(estimated_miner_share(u(25), u(100), u(1_000)), u(250));
        assert_eq!(estimated_miner_share(u(0), u(100), u(1_000)), U256::ZERO);
        assert_eq!(estimated_miner_share(u(10), u(0), u(1_000)), U256::ZERO);
        assert_eq!(estimated_miner_share(u(200), u(100), u(1_000)), u(1_000));
    }
}
