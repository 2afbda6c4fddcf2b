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

//! # Solver orchestration
//!
//! Runs the whole pipeline on an instance: first-fit decreasing for an
//! initial incumbent, the root lower bound, and, unless the two already
//! meet, the exact branch-and-bound search under the configured budgets.
//!
//! ## Highlights
//!
//! - Sequential mode runs a single `BnbSolver` with a composite monitor
//!   (interrupt, time limit, node limit and progress logging).
//! - Parallel mode splits the tree into subtree prefixes and runs workers in
//!   `std::thread::scope`. Workers pull prefixes from an atomic cursor and
//!   share one `SharedIncumbent`, a node counter and a stop flag of their
//!   own. The first worker to match the root lower bound stops all others.
//!   The run counts as exhausted only if every subtree was searched to the
//!   end.
//! - `SolverBuilder` configures limits, threads and logging.
//!
//! ## Usage
//!
//! ```rust
//! use std::time::Duration;
//! use stowage_model::instance::Instance;
//! use stowage_solver::solver::SolverBuilder;
//!
//! let instance = Instance::new(vec![5i64, 4, 4, 3, 3, 3, 3, 3, 2], 10).unwrap();
//! let solver = SolverBuilder::new()
//!     .with_time_limit(Duration::from_secs(10))
//!     .with_threads(2)
//!     .build();
//!
//! let outcome = solver.solve(&instance);
//! assert!(outcome.is_optimal());
//! assert_eq!(outcome.num_bins(), 3);
//! ```

use crate::{
    extract::{PackingReport, extract},
    split::split_subtrees,
    stats::{SolverStatistics, SolverStatisticsBuilder},
};
use std::{
    sync::{
        Mutex, PoisonError,
        atomic::{AtomicBool, AtomicU64, AtomicUsize, Ordering},
    },
    time::{Duration, Instant},
};
use stowage_bnb::{
    bnb::BnbSolver,
    bound::{CombinedBound, root_lower_bound},
    branching::first_fit::FirstFitBranching,
    fixed::FixedAssignment,
    incumbent::SharedIncumbent,
    monitor::{
        composite::CompositeTreeSearchMonitor, interrupt::InterruptMonitor,
        log::LogTreeSearchMonitor, node_limit::NodeLimitMonitor, time_limit::TimeLimitMonitor,
    },
    result::TerminationReason,
    stats::BnbSolverStatistics,
};
use stowage_core::num::PackingNumeric;
use stowage_heuristic::ffd::first_fit_decreasing;
use stowage_model::{instance::Instance, packing::Packing};

const DEFAULT_SUBTREES_PER_THREAD: usize = 8;
const TIME_CHECK_INTERVAL: u64 = 10_000;
const LOG_CLOCK_CHECK_MASK: u64 = 4095;

/// The final result of a solve.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SolveOutcome<T> {
    packing: Packing<T>,
    report: PackingReport<T>,
    termination_reason: TerminationReason,
    statistics: SolverStatistics,
}

impl<T> SolveOutcome<T> {
    /// The best packing found. Always valid for the solved instance.
    #[inline]
    pub fn packing(&self) -> &Packing<T> {
        &self.packing
    }

    #[inline]
    pub fn report(&self) -> &PackingReport<T> {
        &self.report
    }

    #[inline]
    pub fn num_bins(&self) -> usize {
        self.report.num_bins()
    }

    /// Returns `true` if the bin count is proven minimal.
    #[inline]
    pub fn is_optimal(&self) -> bool {
        self.report.optimal
    }

    #[inline]
    pub fn termination_reason(&self) -> &TerminationReason {
        &self.termination_reason
    }

    #[inline]
    pub fn statistics(&self) -> &SolverStatistics {
        &self.statistics
    }

    #[inline]
    pub fn into_report(self) -> PackingReport<T> {
        self.report
    }
}

impl<T> std::fmt::Display for SolveOutcome<T>
where
    T: std::fmt::Display,
{
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.report)?;
        writeln!(f, "Termination: {}", self.termination_reason)
    }
}

/// Runs heuristic and exact search with the configured budgets.
#[derive(Debug)]
pub struct Solver {
    time_limit: Option<Duration>,
    node_limit: Option<u64>,
    threads: usize,
    subtrees_per_thread: usize,
    log_interval: Option<Duration>,
    heuristic_only: bool,
    /// Signals all running searches to stop.
    stop_signal: AtomicBool,
}

impl Solver {
    #[inline]
    pub fn time_limit(&self) -> Option<Duration> {
        self.time_limit
    }

    #[inline]
    pub fn node_limit(&self) -> Option<u64> {
        self.node_limit
    }

    #[inline]
    pub fn threads(&self) -> usize {
        self.threads
    }

    /// The flag that interrupts a running `solve` from another thread.
    /// It is cleared at the start of every solve.
    #[inline]
    pub fn stop_signal(&self) -> &AtomicBool {
        &self.stop_signal
    }

    /// Solves `instance`. Budget exhaustion is not an error: the outcome then
    /// carries the best packing found, flagged non-optimal.
    pub fn solve<T>(&self, instance: &Instance<T>) -> SolveOutcome<T>
    where
        T: PackingNumeric,
    {
        let start_time = Instant::now();
        self.stop_signal.store(false, Ordering::Relaxed);

        let heuristic = first_fit_decreasing(instance);
        let lower_bound = root_lower_bound(instance);
        log::info!(
            "First-fit decreasing packed {} items into {} bins, lower bound is {}",
            instance.num_items(),
            heuristic.num_bins(),
            lower_bound
        );

        let stats = SolverStatisticsBuilder::new()
            .heuristic_bins(heuristic.num_bins())
            .lower_bound(lower_bound);

        if heuristic.num_bins() <= lower_bound {
            log::info!("Heuristic packing matches the lower bound");
            return self.finish(
                instance,
                heuristic,
                TerminationReason::LowerBoundReached,
                stats,
                start_time,
            );
        }

        if self.heuristic_only {
            return self.finish(
                instance,
                heuristic,
                TerminationReason::Aborted("Exact search disabled".to_string()),
                stats,
                start_time,
            );
        }

        let incumbent = SharedIncumbent::new();
        incumbent.try_install(&heuristic);

        let (reason, stats) = if self.threads <= 1 {
            self.run_sequential(instance, &incumbent, stats)
        } else {
            self.run_parallel(instance, &incumbent, lower_bound, stats, start_time)
        };

        let packing = incumbent.snapshot().unwrap_or(heuristic);
        self.finish(instance, packing, reason, stats, start_time)
    }

    fn finish<T>(
        &self,
        instance: &Instance<T>,
        packing: Packing<T>,
        termination_reason: TerminationReason,
        stats: SolverStatisticsBuilder,
        start_time: Instant,
    ) -> SolveOutcome<T>
    where
        T: PackingNumeric,
    {
        debug_assert!(
            packing.validate(instance).is_ok(),
            "called `Solver::finish` with a packing that does not fit the instance"
        );

        let report = extract(instance, &packing, termination_reason.is_complete());
        let statistics = stats.solve_duration(start_time.elapsed()).build();
        log::info!(
            "Finished with {} bins ({}) in {:.3}s",
            packing.num_bins(),
            termination_reason,
            statistics.solve_duration.as_secs_f64()
        );

        SolveOutcome {
            packing,
            report,
            termination_reason,
            statistics,
        }
    }

    fn run_sequential<T>(
        &self,
        instance: &Instance<T>,
        incumbent: &SharedIncumbent<T>,
        stats: SolverStatisticsBuilder,
    ) -> (TerminationReason, SolverStatisticsBuilder)
    where
        T: PackingNumeric,
    {
        let mut monitor = CompositeTreeSearchMonitor::<T>::new();
        monitor.add_monitor(InterruptMonitor::new(&self.stop_signal));
        if let Some(limit) = self.time_limit {
            monitor.add_monitor(TimeLimitMonitor::new(limit, TIME_CHECK_INTERVAL));
        }
        if let Some(limit) = self.node_limit {
            monitor.add_monitor(NodeLimitMonitor::new(limit));
        }
        if let Some(interval) = self.log_interval {
            monitor.add_monitor(LogTreeSearchMonitor::new(interval, LOG_CLOCK_CHECK_MASK));
        }

        let mut solver = BnbSolver::preallocated(instance.num_items());
        let outcome = solver.solve_with_incumbent(
            instance,
            &mut FirstFitBranching::new(),
            &mut CombinedBound::new(),
            monitor,
            incumbent,
        );

        let (_, reason, search) = outcome.into_parts();
        (reason, stats.used_threads(1).subtrees(1).search(search))
    }

    fn run_parallel<T>(
        &self,
        instance: &Instance<T>,
        incumbent: &SharedIncumbent<T>,
        lower_bound: usize,
        stats: SolverStatisticsBuilder,
        start_time: Instant,
    ) -> (TerminationReason, SolverStatisticsBuilder)
    where
        T: PackingNumeric,
    {
        let target = self.threads.saturating_mul(self.subtrees_per_thread);
        let subtrees = split_subtrees(instance, incumbent.upper_bound(), target);
        log::info!(
            "Split the search into {} subtrees for {} threads",
            subtrees.len(),
            self.threads
        );

        let queue = WorkQueue::new(&subtrees, self.time_limit.map(|limit| start_time + limit));
        let mut search = BnbSolverStatistics::default();
        search.set_root_lower_bound(lower_bound);

        std::thread::scope(|scope| {
            let handles: Vec<_> = (0..self.threads)
                .map(|worker| {
                    let queue = &queue;
                    scope.spawn(move || self.run_worker(worker, instance, incumbent, queue))
                })
                .collect();

            for handle in handles {
                match handle.join() {
                    Ok(worker_stats) => search.merge(&worker_stats),
                    Err(payload) => std::panic::resume_unwind(payload),
                }
            }
        });

        let reason = if queue.bound_reached.load(Ordering::Relaxed)
            || incumbent.upper_bound() <= lower_bound
        {
            TerminationReason::LowerBoundReached
        } else if queue.is_complete() {
            TerminationReason::Exhausted
        } else {
            let msg = queue.take_abort_reason().unwrap_or_else(|| {
                "Search stopped before all subtrees were explored".to_string()
            });
            TerminationReason::Aborted(msg)
        };

        let stats = stats
            .used_threads(self.threads)
            .subtrees(subtrees.len())
            .search(search);
        (reason, stats)
    }

    fn run_worker<T>(
        &self,
        worker: usize,
        instance: &Instance<T>,
        incumbent: &SharedIncumbent<T>,
        queue: &WorkQueue<'_>,
    ) -> BnbSolverStatistics
    where
        T: PackingNumeric,
    {
        let mut solver = BnbSolver::preallocated(instance.num_items());
        let mut builder = FirstFitBranching::new();
        let mut bound = CombinedBound::new();
        let mut stats = BnbSolverStatistics::default();

        while let Some((index, prefix)) = queue.next(&self.stop_signal) {
            if let Some(msg) = self.exhausted_budget(queue) {
                queue.abort(msg);
                break;
            }

            let mut monitor = CompositeTreeSearchMonitor::<T>::new();
            monitor.add_monitor(InterruptMonitor::new(&self.stop_signal));
            monitor.add_monitor(InterruptMonitor::new(&queue.stop));
            if let Some(deadline) = queue.deadline {
                let remaining = deadline.saturating_duration_since(Instant::now());
                monitor.add_monitor(TimeLimitMonitor::new(remaining, TIME_CHECK_INTERVAL));
            }
            if let Some(limit) = self.node_limit {
                monitor.add_monitor(NodeLimitMonitor::shared(limit, &queue.nodes));
            }

            let outcome = solver.solve_with_fixed_and_incumbent(
                instance,
                &mut builder,
                &mut bound,
                monitor,
                prefix,
                incumbent,
            );
            let (_, reason, search) = outcome.into_parts();
            stats.merge(&search);
            log::debug!(
                "Worker {} finished subtree {} after {} nodes: {}",
                worker,
                index,
                search.nodes_explored,
                reason
            );

            match reason {
                TerminationReason::Exhausted => {
                    queue.completed.fetch_add(1, Ordering::Relaxed);
                }
                TerminationReason::LowerBoundReached => {
                    queue.bound_reached.store(true, Ordering::Relaxed);
                    queue.stop.store(true, Ordering::Relaxed);
                    break;
                }
                TerminationReason::Aborted(msg) => {
                    queue.abort(msg);
                    break;
                }
                TerminationReason::InvalidPrefix(msg) => {
                    log::warn!("Worker {} rejected subtree {}: {}", worker, index, msg);
                    queue.abort(msg);
                    break;
                }
            }
        }

        stats
    }

    /// Returns the abort message if a global budget ran out between
    /// subtrees.
    fn exhausted_budget(&self, queue: &WorkQueue<'_>) -> Option<String> {
        if let (Some(deadline), Some(limit)) = (queue.deadline, self.time_limit)
            && Instant::now() >= deadline
        {
            return Some(format!(
                "Time limit of {:.3} seconds exceeded",
                limit.as_secs_f64()
            ));
        }
        if let Some(limit) = self.node_limit
            && queue.nodes.load(Ordering::Relaxed) >= limit
        {
            return Some(format!("Node limit of {} nodes reached", limit));
        }
        None
    }
}

/// Subtrees shared by the workers of one parallel solve.
struct WorkQueue<'a> {
    subtrees: &'a [Vec<FixedAssignment>],
    cursor: AtomicUsize,
    /// Subtrees searched to the end.
    completed: AtomicUsize,
    nodes: AtomicU64,
    deadline: Option<Instant>,
    bound_reached: AtomicBool,
    /// Stops the workers of this solve only.
    stop: AtomicBool,
    abort_reason: Mutex<Option<String>>,
}

impl<'a> WorkQueue<'a> {
    fn new(subtrees: &'a [Vec<FixedAssignment>], deadline: Option<Instant>) -> Self {
        Self {
            subtrees,
            cursor: AtomicUsize::new(0),
            completed: AtomicUsize::new(0),
            nodes: AtomicU64::new(0),
            deadline,
            bound_reached: AtomicBool::new(false),
            stop: AtomicBool::new(false),
            abort_reason: Mutex::new(None),
        }
    }

    /// Hands out the next subtree unless the search was stopped, either by
    /// `stop_signal` or by another worker.
    fn next(&self, stop_signal: &AtomicBool) -> Option<(usize, &'a [FixedAssignment])> {
        if stop_signal.load(Ordering::Relaxed) {
            self.abort("Interrupt signal received".to_string());
            return None;
        }
        if self.stop.load(Ordering::Relaxed) {
            return None;
        }
        let index = self.cursor.fetch_add(1, Ordering::Relaxed);
        self.subtrees
            .get(index)
            .map(|prefix| (index, prefix.as_slice()))
    }

    /// Records why the search stopped and stops the other workers. The
    /// first reason wins.
    fn abort(&self, msg: String) {
        self.stop.store(true, Ordering::Relaxed);
        let mut reason = self
            .abort_reason
            .lock()
            .unwrap_or_else(PoisonError::into_inner);
        if reason.is_none() {
            *reason = Some(msg);
        }
    }

    fn is_complete(&self) -> bool {
        self.completed.load(Ordering::Relaxed) == self.subtrees.len()
    }

    fn take_abort_reason(&self) -> Option<String> {
        self.abort_reason
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .take()
    }
}

/// Builder for `Solver`.
#[derive(Debug, Clone)]
pub struct SolverBuilder {
    time_limit: Option<Duration>,
    node_limit: Option<u64>,
    threads: usize,
    subtrees_per_thread: usize,
    log_interval: Option<Duration>,
    heuristic_only: bool,
}

impl Default for SolverBuilder {
    #[inline]
    fn default() -> Self {
        Self::new()
    }
}

impl SolverBuilder {
    /// A sequential solver without limits or progress logging.
    #[inline]
    pub fn new() -> Self {
        Self {
            time_limit: None,
            node_limit: None,
            threads: 1,
            subtrees_per_thread: DEFAULT_SUBTREES_PER_THREAD,
            log_interval: None,
            heuristic_only: false,
        }
    }

    #[inline]
    pub fn with_time_limit(mut self, limit: Duration) -> Self {
        self.time_limit = Some(limit);
        self
    }

    /// Limits the number of search nodes. Across threads the limit is
    /// approximate.
    #[inline]
    pub fn with_node_limit(mut self, limit: u64) -> Self {
        self.node_limit = Some(limit);
        self
    }

    /// Sets the number of search threads. Zero is treated as one.
    #[inline]
    pub fn with_threads(mut self, threads: usize) -> Self {
        self.threads = threads.max(1);
        self
    }

    /// Sets how many subtrees the parallel split aims for per thread.
    #[inline]
    pub fn with_subtrees_per_thread(mut self, subtrees: usize) -> Self {
        self.subtrees_per_thread = subtrees.max(1);
        self
    }

    /// Enables periodic progress logging at `info` level.
    #[inline]
    pub fn with_log_interval(mut self, interval: Duration) -> Self {
        self.log_interval = Some(interval);
        self
    }

    /// Skips the exact search and returns the heuristic packing.
    #[inline]
    pub fn heuristic_only(mut self, heuristic_only: bool) -> Self {
        self.heuristic_only = heuristic_only;
        self
    }

    #[inline]
    pub fn build(self) -> Solver {
        Solver {
            time_limit: self.time_limit,
            node_limit: self.node_limit,
            threads: self.threads,
            subtrees_per_thread: self.subtrees_per_thread,
            log_interval: self.log_interval,
            heuristic_only: self.heuristic_only,
            stop_signal: AtomicBool::new(false),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    type IntegerType = i64;

    fn instance(sizes: &[IntegerType], capacity: IntegerType) -> Instance<IntegerType> {
        Instance::new(sizes.iter().copied(), capacity).unwrap()
    }

    #[test]
    fn test_builder_defaults() {
        let solver = SolverBuilder::new().build();
        assert_eq!(solver.threads(), 1);
        assert_eq!(solver.time_limit(), None);
        assert_eq!(solver.node_limit(), None);
        assert!(!solver.stop_signal().load(Ordering::Relaxed));
    }

    #[test]
    fn test_zero_threads_means_one() {
        let solver = SolverBuilder::new().with_threads(0).build();
        assert_eq!(solver.threads(), 1);
    }

    #[test]
    fn test_tight_heuristic_skips_search() {
        let instance = instance(&[6, 4, 5, 5], 10);
        let outcome = SolverBuilder::new().build().solve(&instance);

        assert!(outcome.is_optimal());
        assert_eq!(outcome.num_bins(), 2);
        assert_eq!(
            outcome.termination_reason(),
            &TerminationReason::LowerBoundReached
        );
        assert_eq!(outcome.statistics().used_threads, 0);
        assert_eq!(outcome.statistics().search.nodes_explored, 0);
    }

    #[test]
    fn test_heuristic_only_is_not_optimal_when_bound_is_loose() {
        let instance = instance(&[5, 4, 4, 3, 3, 3, 3, 3, 2], 10);
        let outcome = SolverBuilder::new()
            .heuristic_only(true)
            .build()
            .solve(&instance);

        assert!(!outcome.is_optimal());
        assert_eq!(outcome.num_bins(), 4);
        assert!(matches!(
            outcome.termination_reason(),
            TerminationReason::Aborted(_)
        ));
    }

    #[test]
    fn test_sequential_improves_heuristic() {
        let instance = instance(&[5, 4, 4, 3, 3, 3, 3, 3, 2], 10);
        let outcome = SolverBuilder::new().build().solve(&instance);

        assert!(outcome.is_optimal());
        assert_eq!(outcome.num_bins(), 3);
        assert_eq!(outcome.statistics().heuristic_bins, 4);
        assert_eq!(outcome.statistics().lower_bound, 3);
        assert!(outcome.packing().validate(&instance).is_ok());
    }

    #[test]
    fn test_parallel_proves_heuristic_optimal() {
        let instance = instance(&[9, 8, 2, 7, 6, 5], 10);
        let outcome = SolverBuilder::new().with_threads(3).build().solve(&instance);

        assert!(outcome.is_optimal());
        assert_eq!(outcome.num_bins(), 5);
        assert_eq!(outcome.termination_reason(), &TerminationReason::Exhausted);
        assert_eq!(outcome.statistics().subtrees, 0);
    }

    #[test]
    fn test_work_queue_records_external_interrupt() {
        let subtrees = vec![Vec::new(), Vec::new()];
        let queue = WorkQueue::new(&subtrees, None);
        let stop_signal = AtomicBool::new(false);

        assert_eq!(queue.next(&stop_signal).map(|(index, _)| index), Some(0));
        queue.completed.fetch_add(1, Ordering::Relaxed);

        stop_signal.store(true, Ordering::Relaxed);
        assert!(queue.next(&stop_signal).is_none());
        assert!(queue.stop.load(Ordering::Relaxed));
        assert!(!queue.is_complete());
        assert_eq!(
            queue.take_abort_reason().as_deref(),
            Some("Interrupt signal received")
        );
    }

    #[test]
    fn test_work_queue_stop_is_local_to_the_solve() {
        let subtrees = vec![Vec::new()];
        let queue = WorkQueue::new(&subtrees, None);
        let stop_signal = AtomicBool::new(false);

        queue.abort("Node limit of 1 nodes reached".to_string());
        queue.abort("Interrupt signal received".to_string());
        assert!(queue.next(&stop_signal).is_none());
        assert!(!stop_signal.load(Ordering::Relaxed));
        assert_eq!(
            queue.take_abort_reason().as_deref(),
            Some("Node limit of 1 nodes reached")
        );
    }

    #[test]
    fn test_node_limit_reports_best_packing() {
        let instance = instance(&[5, 4, 4, 3, 3, 3, 3, 3, 2], 10);
        let outcome = SolverBuilder::new()
            .with_node_limit(1)
            .build()
            .solve(&instance);

        assert!(!outcome.is_optimal());
        assert_eq!(outcome.num_bins(), 4);
        assert!(outcome.packing().validate(&instance).is_ok());
    }
}
