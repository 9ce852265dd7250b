use super::XorShift64;
use criterion::{black_box, Criterion, Throughput};
use rankset::SortedSet;

const PLAYERS: u64 = 50_000;
const SUBMISSIONS: u64 = 20_000;

/// Score submissions interleaved with "my rank" and "top 10" reads.
pub fn run(c: &mut Criterion) {
    let mut group = c.benchmark_group("leaderboard");
    group.throughput(Throughput::Elements(SUBMISSIONS));

    group.bench_function("submit_and_read", |b| {
        b.iter(|| {
            let mut rng = XorShift64::new(0xdead_beef);
            let mut board: SortedSet<u64, u64, String> = SortedSet::with_capacity(PLAYERS as usize);
            for player in 0..PLAYERS {
                board.add_or_update(player, rng.gen_range(0, 10_000), format!("player-{}", player));
            }

            for _ in 0..SUBMISSIONS {
                let player = rng.gen_range(0, PLAYERS);
                let best = board.get_by_key(&player).map_or(0, |n| *n.score());
                let score = best + rng.gen_range(0, 50);
                let name = format!("player-{}", player);
                board.add_or_update(player, score, name);

                black_box(board.find_rank(&player));
                black_box(board.get_by_rank_range(-1, -10));
            }
        })
    });

    group.finish();
}
