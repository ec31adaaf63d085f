// Copyright 2024 The Placebench Authors
// SPDX-License-Identifier: Apache-2.0

//! Selector and end-to-end simulation benchmarks.

#![allow(missing_docs)]

use std::hint::black_box;
use std::num::NonZeroUsize;

use criterion::{criterion_group, criterion_main, BenchmarkId, Criterion, Throughput};
use placebench_core::{BlockSize, DeviceCatalog, Window};
use placebench_placement::PlacementAlgorithm;
use placebench_sim::{ObjectPopulation, SimulationConfig, SimulationEngine, Topology, WindowedSelector};

fn bench_select(c: &mut Criterion) {
    let topology = Topology::generate(64, 8, &DeviceCatalog::default(), 123).unwrap();
    let mut group = c.benchmark_group("select_server");

    for window in [3usize, 8, 32] {
        let selector =
            WindowedSelector::new(Window::new(window).unwrap(), BlockSize::from_kb(4).unwrap());
        group.throughput(Throughput::Elements(1));
        group.bench_with_input(BenchmarkId::new("window", window), &selector, |b, selector| {
            let mut start = 0;
            b.iter(|| {
                start = (start + 7) % topology.len();
                black_box(selector.select(topology.servers(), black_box(start)))
            });
        });
    }

    group.finish();
}

fn bench_simulation(c: &mut Criterion) {
    let mut group = c.benchmark_group("simulate");
    group.sample_size(10);
    let objects = 10_000;

    for threads in [1usize, 4] {
        let config = SimulationConfig {
            replication: 3,
            window: Window::new(5).unwrap(),
            block: BlockSize::from_kb(4).unwrap(),
            threads: NonZeroUsize::new(threads).unwrap(),
        };
        let engine = SimulationEngine::new(config, PlacementAlgorithm::Ring.build(16, 0).unwrap());
        group.throughput(Throughput::Elements(objects as u64));
        group.bench_with_input(BenchmarkId::new("threads", threads), &engine, |b, engine| {
            b.iter(|| {
                let mut topology =
                    Topology::generate(32, 4, &DeviceCatalog::default(), 123).unwrap();
                let mut population = ObjectPopulation::random(objects, 3, 8_675_309);
                black_box(engine.run(&mut topology, &mut population).unwrap())
            });
        });
    }

    group.finish();
}

criterion_group!(benches, bench_select, bench_simulation);
criterion_main!(benches);
