// Copyright (c) 2025 Felix Kahle.
//
// Permission is hereby granted, free of charge, to any person obtaining
// a copy of this software and associated documentation files (the
// "Software"), to deal in the Software without restriction, including
// without limitation the rights to use, copy, modify, merge, publish,
// distribute, sublicense, and/or sell copies of the Software, and to
// permit persons to whom the Software is furnished to do so, subject to
// the following conditions:
//
// The above copyright notice and this permission notice shall be
// included in all copies or substantial portions of the Software.
//
// THE SOFTWARE IS PROVIDED "AS IS", WITHOUT WARRANTY OF ANY KIND,
// EXPRESS OR IMPLIED, INCLUDING BUT NOT LIMITED TO THE WARRANTIES OF
// MERCHANTABILITY, FITNESS FOR A PARTICULAR PURPOSE AND
// NONINFRINGEMENT. IN NO EVENT SHALL THE AUTHORS OR COPYRIGHT HOLDERS BE
// LIABLE FOR ANY CLAIM, DAMAGES OR OTHER LIABILITY, WHETHER IN AN ACTION
// OF CONTRACT, TORT OR OTHERWISE, ARISING FROM, OUT OF OR IN CONNECTION
// WITH THE SOFTWARE OR THE USE OR OTHER DEALINGS IN THE SOFTWARE.

use criterion::{BenchmarkId, Criterion, Throughput, criterion_group, criterion_main};
use rand::{Rng, SeedableRng, rngs::SmallRng};
use std::hint::black_box;
use stowage_bnb::bnb::BnbSolver;
use stowage_bnb::bound::CombinedBound;
use stowage_bnb::branching::first_fit::FirstFitBranching;
use stowage_bnb::incumbent::SharedIncumbent;
use stowage_bnb::monitor::no_op::NoOperationMonitor;
use stowage_heuristic::ffd::first_fit_decreasing;
use stowage_model::instance::Instance;

const CAPACITY: i64 = 150;

/// Uniform sizes in `[20, 100]`, the classic Falkenauer "u" family shape.
fn random_instance(num_items: usize, seed: u64) -> Instance<i64> {
    let mut rng = SmallRng::seed_from_u64(seed);
    let sizes: Vec<i64> = (0..num_items).map(|_| rng.random_range(20..=100)).collect();
    Instance::new(sizes, CAPACITY).unwrap_or_else(|e| panic!("invalid benchmark instance: {}", e))
}

fn bench_uniform_instances(c: &mut Criterion) {
    let mut group = c.benchmark_group("bnb_benchmark");

    for &num_items in &[12usize, 16, 20] {
        let instance = random_instance(num_items, 0xb1b0 + num_items as u64);
        let heuristic = first_fit_decreasing(&instance);
        let mut solver = BnbSolver::preallocated(num_items);
        let mut builder = FirstFitBranching::new();
        let mut bound = CombinedBound::new();

        group.throughput(Throughput::Elements(num_items as u64));
        group.bench_with_input(
            BenchmarkId::new("uniform", num_items),
            &instance,
            |b, instance| {
                b.iter(|| {
                    let incumbent = SharedIncumbent::new();
                    incumbent.try_install(&heuristic);
                    let outcome = solver.solve_with_incumbent(
                        black_box(instance),
                        &mut builder,
                        &mut bound,
                        NoOperationMonitor::new(),
                        &incumbent,
                    );
                    black_box(outcome)
                })
            },
        );
    }
    group.finish();
}

criterion_group!(benches, bench_uniform_instances);
criterion_main!(benches);
