use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};

use sphygmos_rewards::{lock_status, pending_reward};
use sphygmos_types::params::REWARD_SCALE;
use sphygmos_types::{Timestamp, U256};

fn bench_pending_reward(c: &mut Criterion) {
    let mut group = c.benchmark_group("pending_reward");
    let scale = U256::from(REWARD_SCALE);

    for stake_exp in [3u64, 18, 30] {
        let stake = U256::from(10u64).pow(U256::from(stake_exp));
        let acc = U256::from(7u64) * scale;
        let debt = stake;

        group.bench_with_input(
            BenchmarkId::new("stake_1e", stake_exp),
            &stake_exp,
            |b, _| {
                b.iter(|| {
                    black_box(pending_reward(
                        black_box(stake),
                        black_box(acc),
                        black_box(debt),
                        scale,
                    ))
                })
            },
        );
    }

    group.finish();
}

fn bench_lock_status(c: &mut Criterion) {
    let now = Timestamp::new(1_700_000_000);
    let unlock = Timestamp::new(1_700_000_000 + 5 * 86_400 + 3_661);
    c.bench_function("lock_status_locked", |b| {
        b.iter(|| black_box(lock_status(black_box(unlock), black_box(now))))
    });
}

criterion_group!(benches, bench_pending_reward, bench_lock_status);
criterion_main!(benches);
