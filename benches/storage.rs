use criterion::*;
use std::hint::black_box;

use group_update::engine::group::{check_unique, GroupIndex};
use group_update::engine::storage::EntityColumn;

const ENTITIES: u32 = 1_000_000;

fn storage_benchmark(c: &mut Criterion) {
    let mut group = c.benchmark_group("storage");

    group.bench_function("column_set_1M", |b| {
        let column = EntityColumn::new(ENTITIES as usize, 0u64);
        b.iter(|| {
            for id in 0..ENTITIES {
                column.set(id, id as u64).unwrap();
            }
            black_box(&column);
        });
    });

    group.bench_function("column_get_1M", |b| {
        let column = EntityColumn::new(ENTITIES as usize, 1u64);
        b.iter(|| {
            let mut sum = 0u64;
            for id in 0..ENTITIES {
                sum += column.get(id).unwrap();
            }
            black_box(sum)
        });
    });

    group.bench_function("check_unique_1M", |b| {
        let ids = GroupIndex::range(0..ENTITIES);
        b.iter(|| check_unique(black_box(&ids)).unwrap());
    });

    group.finish();
}

criterion_group!(benches, storage_benchmark);
criterion_main!(benches);
