//! Compare sequential vs parallel batch resolution.
//!
//! Run with: `cargo bench --bench resolve_batch_parallel`

use std::sync::Arc;

use criterion::{black_box, criterion_group, criterion_main, Criterion};
use foundry::blueprint::{resolve_request, ModuleClass, ModuleRequest, ModuleSpec, ResolvedOp, StatId};
use foundry::catalog::fallback_catalog;
use foundry::parallel::{resolve_batch, WorkerPool};

fn requests(count: usize) -> Vec<ModuleRequest> {
    let archetypes = [
        ("laser-s-1", ModuleClass::Laser),
        ("pd-s-1", ModuleClass::PointDefense),
        ("hangar-s-1", ModuleClass::Hangar),
        ("reactor-m-1", ModuleClass::Reactor),
    ];
    (0..count)
        .map(|i| {
            let (id, class) = archetypes[i % archetypes.len()];
            ModuleRequest {
                spec: ModuleSpec {
                    offense_rating: (i % 10) as f64,
                    power_draw_mw: 4.0,
                    mass_tons: 3.0,
                    ..ModuleSpec::new(id, class)
                },
                blueprint: None,
                parts: Vec::new(),
            }
        })
        .collect()
}

fn bench_resolve_batch(c: &mut Criterion) {
    let catalog = Arc::new(fallback_catalog());
    let batch = requests(4096);
    let perks = [ResolvedOp::mul_stat(StatId::FireRate, 1.05)];
    let pool = WorkerPool::default();

    let mut group = c.benchmark_group("resolve_batch");
    group.sample_size(20);

    group.bench_function("sequential", |b| {
        b.iter(|| {
            black_box(
                batch
                    .iter()
                    .map(|request| resolve_request(request, &perks, &catalog))
                    .collect::<Vec<_>>(),
            )
        });
    });

    group.bench_function("parallel", |b| {
        b.iter(|| black_box(resolve_batch(&batch, &perks, &catalog, &pool)));
    });

    group.finish();
}

criterion_group!(benches, bench_resolve_batch);
criterion_main!(benches);
