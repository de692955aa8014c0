use criterion::{
    black_box, criterion_group, criterion_main, BenchmarkId, Criterion,
};
use lazy_range_tree::LazyRangeTree;
use op_add::OpAdd;
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha20Rng;
use range_naive::NaiveRange;

enum Query {
    Apply(usize, usize, i64),
    Fold(usize, usize),
}

fn queries<R: Rng>(n: usize, count: usize, rng: &mut R) -> Vec<Query> {
    (0..count)
        .map(|_| {
            let i = rng.gen_range(0..n);
            let j = rng.gen_range(0..n);
            let (l, r) = (i.min(j), i.max(j) + 1);
            if rng.gen_bool(0.5) {
                Query::Apply(l, r, rng.gen_range(-1000..=1000))
            } else {
                Query::Fold(l, r)
            }
        })
        .collect()
}

fn bench_mixed(c: &mut Criterion) {
    let mut group = c.benchmark_group("mixed");

    let mut rng = ChaCha20Rng::from_seed([
        0x7B, 0x12, 0xD5, 0x60, 0x1C, 0x84, 0x9A, 0x0F, 0x3E, 0xC2, 0x55, 0x71,
        0x08, 0xEE, 0x4D, 0xB3, 0x96, 0x27, 0xFA, 0x30, 0x61, 0x8C, 0x05, 0xD9,
        0x42, 0xBF, 0x13, 0x78, 0xA6, 0xE0, 0x2B, 0x94,
    ]);

    for lg_n in [8, 12, 16] {
        let n = 1_usize << lg_n;
        let q = queries(n, 10_000, &mut rng);

        group.bench_function(BenchmarkId::new("lazy", n), |b| {
            b.iter(|| {
                let mut tree = LazyRangeTree::new(n, OpAdd::<i64>::default());
                for query in &q {
                    match *query {
                        Query::Apply(l, r, val) => tree.apply(l..r, val),
                        Query::Fold(l, r) => {
                            black_box(tree.fold(l..r));
                        }
                    }
                }
            })
        });
        if lg_n <= 12 {
            group.bench_function(BenchmarkId::new("naive", n), |b| {
                b.iter(|| {
                    let mut naive = NaiveRange::new(n, OpAdd::<i64>::default());
                    for query in &q {
                        match *query {
                            Query::Apply(l, r, val) => naive.apply(l..r, val),
                            Query::Fold(l, r) => {
                                black_box(naive.fold(l..r));
                            }
                        }
                    }
                })
            });
        }
    }
    group.finish();
}

criterion_group!(benches, bench_mixed);
criterion_main!(benches);
