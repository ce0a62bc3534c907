// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Benchmarks for `understory_param`.

use criterion::{BatchSize, BenchmarkId, Criterion, black_box, criterion_group, criterion_main};
use std::cell::RefCell;
use std::rc::Rc;
use std::sync::Once;

use understory_param::{
    ParamHandle, ParamReader, ParamRegistry, TreeDocument, TreeSync, UiMetadata, Variant,
};

fn registry_with(count: usize) -> ParamRegistry {
    let mut registry = ParamRegistry::new();
    for i in 0..count {
        registry
            .add(format!("param_{i}"), 0.5_f32, UiMetadata::default())
            .unwrap();
    }
    registry
}

fn bench_param(c: &mut Criterion) {
    static PRINT_SIZES: Once = Once::new();
    PRINT_SIZES.call_once(|| {
        eprintln!(
            "sizes: ParamHandle={} ParamReader<f32>={} ParamReader<String>={} Variant={}",
            size_of::<ParamHandle>(),
            size_of::<ParamReader<f32>>(),
            size_of::<ParamReader<String>>(),
            size_of::<Variant>(),
        );
    });

    let mut group = c.benchmark_group("param/read");

    let mut registry = ParamRegistry::new();
    let gain = registry.add("gain", 0.5_f32, UiMetadata::default()).unwrap();
    let label = registry
        .add("label", String::from("hello world"), UiMetadata::default())
        .unwrap();

    group.bench_function("reader/f32", |b| {
        let reader = registry.reader(gain).unwrap();
        b.iter(|| black_box(reader.get()));
    });

    group.bench_function("reader/string_with", |b| {
        let reader = registry.reader(label).unwrap();
        b.iter(|| black_box(reader.with(String::len)));
    });

    group.bench_function("reader/string_clone", |b| {
        let reader = registry.reader(label).unwrap();
        b.iter(|| black_box(reader.get()));
    });

    group.bench_function("typed_key", |b| {
        b.iter(|| black_box(registry.value(gain)));
    });

    for count in [8, 64, 512] {
        let registry = registry_with(count);
        let last = format!("param_{}", count - 1);
        group.bench_function(BenchmarkId::new("by_name", count), |b| {
            b.iter(|| black_box(registry.get(&last).map(|h| h.get::<f32>())));
        });
    }

    group.finish();

    let mut group = c.benchmark_group("param/write");

    group.bench_function("set_value/clamped", |b| {
        let mut registry = ParamRegistry::new();
        let gain = registry
            .add_with_clamper("gain", 0.5_f32, UiMetadata::default(), |v: &mut f32| {
                *v = v.clamp(0.0, 1.0);
            })
            .unwrap();
        b.iter(|| registry.set_value(gain, black_box(3.0)));
    });

    group.bench_function("set_variant/f32", |b| {
        let mut registry = registry_with(64);
        let value = Variant::Float(0.25);
        b.iter(|| registry.set_variant(black_box("param_63"), &value));
    });

    group.bench_function("set_variant/string", |b| {
        let mut registry = ParamRegistry::new();
        registry
            .add("label", String::new(), UiMetadata::default())
            .unwrap();
        let value = Variant::from("hello world");
        b.iter(|| registry.set_variant("label", black_box(&value)));
    });

    group.finish();

    let mut group = c.benchmark_group("param/tree");

    for count in [8, 64, 512] {
        let registry = registry_with(count);
        group.bench_function(BenchmarkId::new("export_state", count), |b| {
            b.iter(|| black_box(registry.export_state()));
        });
    }

    for count in [8, 64] {
        let registry = Rc::new(RefCell::new(registry_with(count)));
        group.bench_function(BenchmarkId::new("sync_pull", count), |b| {
            b.iter_batched(
                || registry.borrow().export_state(),
                |mut tree| {
                    let mut sync = TreeSync::new(Rc::clone(&registry));
                    black_box(sync.sync(&mut tree));
                    black_box(tree);
                },
                BatchSize::SmallInput,
            );
        });
    }

    group.bench_function("live_edit", |b| {
        let registry = Rc::new(RefCell::new(registry_with(64)));
        let mut tree = registry.borrow().export_state();
        let mut sync = TreeSync::new(Rc::clone(&registry));
        sync.sync(&mut tree);
        let mut flip = false;
        b.iter(|| {
            flip = !flip;
            let value = if flip { 0.25 } else { 0.75 };
            tree.set_property("param_32", Variant::Float(value));
        });
    });

    group.finish();
}

criterion_group!(benches, bench_param);
criterion_main!(benches);
