use super::XorShift64;
use criterion::{black_box, Criterion, Throughput};
use rankset::SortedSet;

const LIVE: u64 = 10_000;
const OPS: u64 = 100_000;

/// Steady-state insert/remove churn around a fixed population, stressing
/// arena slot reuse and level sampling.
pub fn run(c: &mut Criterion) {
    let mut group = c.benchmark_group("churn");
    group.throughput(Throughput::Elements(OPS));

    group.bench_function("insert_remove_pop", |b| {
        b.iter(|| {
            let mut rng = XorShift64::new(42);
            let mut set = SortedSet::with_seed(7);
            for key in 0..LIVE {
                set.add_or_update(key, rng.next() % 1_000, vec![0u8; 32]);
            }

            let mut next_key = LIVE;
            for _ in 0..OPS {
                match rng.gen_range(0, 4) {
                    0 => {
                        set.remove(&rng.gen_range(0, next_key));
                    }
                    1 => {
                        black_box(set.pop_min());
                    }
                    _ => {
                        set.add_or_update(next_key, rng.next() % 1_000, vec![0u8; 32]);
                        next_key += 1;
                    }
                }
            }
            black_box(set.len());
        })
    });

    group.finish();
}
