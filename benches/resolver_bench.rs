//! Resolver throughput: module resolutions per second.
//!
//! Run with: `cargo bench --bench resolver`

use criterion::{black_box, criterion_group, criterion_main, Criterion, Throughput};
use foundry::blueprint::{
    resolve, BlueprintRef, DamageType, ModuleClass, ModuleOutputs, ModuleSpec, ResolvedOp, StatId,
};
use foundry::catalog::fallback_catalog;

fn laser() -> ModuleSpec {
    ModuleSpec {
        offense_rating: 5.0,
        power_draw_mw: 4.0,
        mass_tons: 2.0,
        ..ModuleSpec::new("laser-s-1", ModuleClass::Laser)
    }
}

fn bench_resolver(c: &mut Criterion) {
    let catalog = fallback_catalog();
    let spec = laser();
    let blueprint_ref = BlueprintRef::blueprint("blueprint.laser.prismworks");
    let parts = ["cooling_stable", "lens_beam_bias", "core_a"];

    let mut group = c.benchmark_group("resolver");
    group.throughput(Throughput::Elements(1));

    group.bench_function("blueprint_no_perks", |b| {
        let mut outputs = ModuleOutputs::default();
        b.iter(|| {
            black_box(resolve(
                &spec,
                &blueprint_ref,
                &parts,
                &[],
                &catalog,
                &mut outputs,
            ))
        });
    });

    // Conversion pass plus a handful of effect records.
    let perks = [
        ResolvedOp::mul_stat(StatId::Damage, 1.1),
        ResolvedOp::convert_damage(DamageType::Energy, DamageType::Thermal, 0.6),
        ResolvedOp::convert_damage(DamageType::Energy, DamageType::EM, 0.6),
        ResolvedOp::add_proc("proc.arc", 0.1, 1.0),
        ResolvedOp::add_tag("run.overcharged", 1.0),
    ];
    group.bench_function("blueprint_with_conversion_perks", |b| {
        let mut outputs = ModuleOutputs::default();
        b.iter(|| {
            black_box(resolve(
                &spec,
                &blueprint_ref,
                &parts,
                &perks,
                &catalog,
                &mut outputs,
            ))
        });
    });

    group.finish();
}

criterion_group!(benches, bench_resolver);
criterion_main!(benches);
