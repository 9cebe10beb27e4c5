use criterion::{black_box, criterion_group, criterion_main, Criterion};
use parmap::{Batch, Invocation, Pool, Result};

fn pool_benchmark(c: &mut Criterion) {
    let pool = Pool::builder(|unit: Invocation<u64>| -> Result<u64> {
        Ok(unit.args[0].wrapping_mul(unit.args[0]))
    })
    .workers(4)
    .build()
    .unwrap();

    c.bench_function("map 256 invocations over 4 workers", |b| {
        b.iter(|| {
            let batch = Batch::new().arg(black_box((0u64..256).collect()));
            pool.call(batch).unwrap()
        })
    });
}

criterion_group!(benches, pool_benchmark);
criterion_main!(benches);
