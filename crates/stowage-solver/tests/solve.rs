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

use rand::{Rng, SeedableRng, rngs::StdRng};
use std::sync::atomic::{AtomicBool, Ordering};
use stowage_bnb::bound::root_lower_bound;
use stowage_bnb::result::TerminationReason;
use stowage_heuristic::ffd::first_fit_decreasing;
use stowage_model::instance::{Instance, InvalidInstance};
use stowage_model::loading::InstanceLoader;
use stowage_solver::solver::SolverBuilder;

type IntegerType = i64;

fn random_instance(rng: &mut StdRng, max_items: usize) -> Instance<IntegerType> {
    let capacity: IntegerType = rng.random_range(20..=60);
    let num_items = rng.random_range(1..=max_items);
    let sizes: Vec<IntegerType> = (0..num_items)
        .map(|_| rng.random_range(1..=capacity))
        .collect();
    Instance::new(sizes, capacity).unwrap()
}

#[test]
fn test_pairwise_incompatible_items() {
    let instance = Instance::new(vec![9 as IntegerType, 8, 2, 7, 6, 5], 10).unwrap();
    assert_eq!(first_fit_decreasing(&instance).num_bins(), 5);
    assert_eq!(root_lower_bound(&instance), 4);

    let outcome = SolverBuilder::new().build().solve(&instance);
    assert!(outcome.is_optimal());
    assert_eq!(outcome.num_bins(), 5);
    assert_eq!(outcome.termination_reason(), &TerminationReason::Exhausted);
}

#[test]
fn test_full_bins() {
    let instance = Instance::new(vec![10 as IntegerType; 5], 10).unwrap();
    let outcome = SolverBuilder::new().build().solve(&instance);
    assert!(outcome.is_optimal());
    assert_eq!(outcome.num_bins(), 5);
    for bin in &outcome.report().bins {
        assert_eq!(bin.items.len(), 1);
        assert_eq!(bin.load, 10);
    }
}

#[test]
fn test_oversized_item_is_rejected() {
    let err = Instance::new(vec![4 as IntegerType, 11], 10).unwrap_err();
    assert!(matches!(err, InvalidInstance::OversizedItem { .. }));
}

#[test]
fn test_zero_items() {
    let instance = Instance::new(Vec::<IntegerType>::new(), 10).unwrap();
    let outcome = SolverBuilder::new().with_threads(4).build().solve(&instance);
    assert!(outcome.is_optimal());
    assert_eq!(outcome.num_bins(), 0);
}

#[test]
fn test_loaded_instance_end_to_end() {
    let text = "# capacity first\n10\n5\n4\n4\n3\n3\n3\n3\n3\n2\n";
    let instance = InstanceLoader::<IntegerType>::new().from_str(text).unwrap();
    let outcome = SolverBuilder::new().build().solve(&instance);

    assert!(outcome.is_optimal());
    assert_eq!(outcome.num_bins(), 3);
    for bin in &outcome.report().bins {
        assert_eq!(bin.load, 10);
    }
}

#[test]
fn test_parallel_and_sequential_agree() {
    let mut rng = StdRng::seed_from_u64(0xb1b);
    let sequential = SolverBuilder::new().build();
    let parallel = SolverBuilder::new()
        .with_threads(4)
        .with_subtrees_per_thread(4)
        .build();

    for _ in 0..25 {
        let instance = random_instance(&mut rng, 14);
        let a = sequential.solve(&instance);
        let b = parallel.solve(&instance);

        assert!(a.is_optimal());
        assert!(b.is_optimal());
        assert_eq!(a.num_bins(), b.num_bins());
        assert!(a.packing().validate(&instance).is_ok());
        assert!(b.packing().validate(&instance).is_ok());
    }
}

#[test]
fn test_engine_never_worse_than_heuristic() {
    let mut rng = StdRng::seed_from_u64(42);
    let solver = SolverBuilder::new().build();

    for _ in 0..40 {
        let instance = random_instance(&mut rng, 12);
        let heuristic = first_fit_decreasing(&instance).num_bins();
        let lower_bound = root_lower_bound(&instance);
        let outcome = solver.solve(&instance);

        assert!(outcome.num_bins() <= heuristic);
        assert!(outcome.num_bins() >= lower_bound);
        assert!(outcome.is_optimal());
    }
}

#[test]
fn test_repeated_runs_are_identical() {
    let mut rng = StdRng::seed_from_u64(7);
    let instance = random_instance(&mut rng, 14);
    let solver = SolverBuilder::new().build();

    let first = solver.solve(&instance);
    let second = solver.solve(&instance);
    assert_eq!(first.packing(), second.packing());
    assert_eq!(first.report(), second.report());
}

#[test]
fn test_budgets_return_non_optimal_incumbent() {
    let instance = Instance::new(vec![5 as IntegerType, 4, 4, 3, 3, 3, 3, 3, 2], 10).unwrap();

    let outcome = SolverBuilder::new()
        .with_node_limit(1)
        .build()
        .solve(&instance);
    assert!(!outcome.is_optimal());
    assert_eq!(outcome.num_bins(), 4);
    assert!(matches!(
        outcome.termination_reason(),
        TerminationReason::Aborted(_)
    ));

    let outcome = SolverBuilder::new()
        .with_time_limit(std::time::Duration::ZERO)
        .with_threads(2)
        .build()
        .solve(&instance);
    assert!(!outcome.is_optimal());
    assert_eq!(outcome.num_bins(), 4);
}

#[test]
fn test_stop_signal_is_cleared_between_solves() {
    let instance = Instance::new(vec![5 as IntegerType, 4, 4, 3, 3, 3, 3, 3, 2], 10).unwrap();
    let solver = SolverBuilder::new().build();
    solver.stop_signal().store(true, Ordering::Relaxed);

    let outcome = solver.solve(&instance);
    assert!(outcome.is_optimal());
    assert_eq!(outcome.num_bins(), 3);
}

#[test]
fn test_interrupted_parallel_solve_is_never_optimal_by_accident() {
    let instance = Instance::new(vec![5 as IntegerType, 4, 4, 3, 3, 3, 3, 3, 2], 10).unwrap();
    let solver = SolverBuilder::new().with_threads(2).build();
    let done = AtomicBool::new(false);

    let outcomes: Vec<_> = std::thread::scope(|scope| {
        scope.spawn(|| {
            while !done.load(Ordering::Relaxed) {
                solver.stop_signal().store(true, Ordering::Relaxed);
                std::thread::yield_now();
            }
        });

        let outcomes = (0..200).map(|_| solver.solve(&instance)).collect();
        done.store(true, Ordering::Relaxed);
        outcomes
    });

    for outcome in &outcomes {
        assert!(outcome.packing().validate(&instance).is_ok());
        if outcome.is_optimal() {
            assert_eq!(outcome.num_bins(), 3, "{}", outcome.termination_reason());
        } else {
            assert!(matches!(
                outcome.termination_reason(),
                TerminationReason::Aborted(_)
            ));
        }
    }
}
