// Copyright (c) 2022, Mysten Labs, Inc.
// SPDX-License-Identifier: Apache-2.0

use criterion::measurement::Measurement;
use criterion::{criterion_group, criterion_main, BatchSize, BenchmarkGroup, Criterion};
use num_bigint::BigUint;
use pot_vdf::class_group::discriminant::Discriminant;
use pot_vdf::class_group::QuadraticForm;
use pot_vdf::math::parameterized_group::{multiply, Parameter, ParameterizedGroupElement};
use pot_vdf::ToBytes;

fn class_group_ops_single<M: Measurement>(size_in_bits: usize, group: &mut BenchmarkGroup<M>) {
    let discriminant = Discriminant::from_seed(b"class group benchmark", size_in_bits).unwrap();
    let generator = QuadraticForm::generator(&discriminant).unwrap();
    let x = multiply(&generator, &BigUint::from(1234u32), &discriminant);
    let y = multiply(&generator, &BigUint::from(4321u32), &discriminant);
    let z = y.clone();
    let bytes = x.to_bytes();

    group.bench_function(format!("Compose/{}", size_in_bits), |b| {
        b.iter(|| x.compose(&y))
    });

    group.bench_function(format!("Double/{}", size_in_bits), move |b| {
        b.iter_batched(|| z.clone(), |z| z.double(), BatchSize::SmallInput)
    });

    group.bench_function(format!("Deserialize/{}", size_in_bits), move |b| {
        b.iter(|| QuadraticForm::from_bytes(&bytes, &discriminant))
    });
}

fn class_group_ops(c: &mut Criterion) {
    let mut group: BenchmarkGroup<_> = c.benchmark_group("Class Group");
    for size_in_bits in [512, 1024, 2048] {
        class_group_ops_single(size_in_bits, &mut group);
    }
}

criterion_group! {
name = class_group_benchmarks;
config = Criterion::default().sample_size(100);
targets = class_group_ops,
}

criterion_main!(class_group_benchmarks);
