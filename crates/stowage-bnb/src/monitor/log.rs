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

use crate::{
    branching::decision::Decision,
    monitor::tree_search_monitor::{PruneReason, TreeSearchMonitor},
    state::SearchState,
    stats::BnbSolverStatistics,
};
use std::{
    marker::PhantomData,
    time::{Duration, Instant},
};
use stowage_core::num::PackingNumeric;
use stowage_model::{instance::Instance, packing::Packing};

/// Reports search progress through the `log` facade at `info` level.
///
/// The clock is only read on steps where `steps & clock_check_mask == 0`, so
/// the mask should be a power of two minus one.
#[derive(Debug, Clone)]
pub struct LogTreeSearchMonitor<T> {
    start_time: Instant,
    last_log_time: Instant,
    log_interval: Duration,
    clock_check_mask: u64,
    steps: u64,
    best_bins: Option<usize>,
    _phantom: PhantomData<T>,
}

impl<T> LogTreeSearchMonitor<T> {
    pub fn new(log_interval: Duration, clock_check_mask: u64) -> Self {
        let now = Instant::now();
        Self {
            start_time: now,
            last_log_time: now,
            log_interval,
            clock_check_mask,
            steps: 0,
            best_bins: None,
            _phantom: PhantomData,
        }
    }

    #[inline(always)]
    fn log_header(&self) {
        log::info!(
            "{:<9} | {:<14} | {:<7} | {:<7} | {:<7} | {:<12} | {:<12}",
            "Elapsed",
            "Nodes",
            "Depth",
            "Open",
            "Best",
            "Backtracks",
            "Pruned"
        );
    }

    fn log_line(&mut self, state: &SearchState<T>, stats: &BnbSolverStatistics)
    where
        T: PackingNumeric,
    {
        let now = Instant::now();
        let elapsed = format!("{:.1}s", now.duration_since(self.start_time).as_secs_f32());
        let best = self
            .best_bins
            .map_or_else(|| "-".to_string(), |bins| bins.to_string());

        log::info!(
            "{:<9} | {:<14} | {:<7} | {:<7} | {:<7} | {:<12} | {:<12}",
            elapsed,
            stats.nodes_explored,
            state.depth(),
            state.num_bins(),
            best,
            stats.backtracks,
            stats.prunings_bound
        );

        self.last_log_time = now;
    }
}

impl<T> Default for LogTreeSearchMonitor<T> {
    fn default() -> Self {
        Self::new(Duration::from_secs(1), 4095)
    }
}

impl<T> std::fmt::Display for LogTreeSearchMonitor<T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "LogTreeSearchMonitor(log_interval: {}s, clock_check_mask: {})",
            self.log_interval.as_secs(),
            self.clock_check_mask
        )
    }
}

impl<T> TreeSearchMonitor<T> for LogTreeSearchMonitor<T>
where
    T: PackingNumeric,
{
    fn name(&self) -> &str {
        "LogTreeSearchMonitor"
    }

    fn on_enter_search(&mut self, instance: &Instance<T>, _statistics: &BnbSolverStatistics) {
        self.start_time = Instant::now();
        self.last_log_time = self.start_time;
        self.steps = 0;
        self.best_bins = None;
        log::info!("Search started on {}", instance);
        self.log_header();
    }

    fn on_exit_search(&mut self, statistics: &BnbSolverStatistics) {
        log::info!(
            "Search finished after {} nodes in {:.3}s",
            statistics.nodes_explored,
            self.start_time.elapsed().as_secs_f64()
        );
    }

    fn on_step(&mut self, state: &SearchState<T>, statistics: &BnbSolverStatistics) {
        self.steps = self.steps.wrapping_add(1);
        if (self.steps & self.clock_check_mask) == 0
            && self.last_log_time.elapsed() >= self.log_interval
        {
            self.log_line(state, statistics);
        }
    }

    fn on_lower_bound_computed(&mut self, _: &SearchState<T>, _: usize, _: &BnbSolverStatistics) {}

    fn on_prune(&mut self, _: &SearchState<T>, _: PruneReason, _: &BnbSolverStatistics) {}

    fn on_decisions_enqueued(&mut self, _: &SearchState<T>, _: usize, _: &BnbSolverStatistics) {}

    fn on_descend(&mut self, _: &SearchState<T>, _: Decision<T>, _: &BnbSolverStatistics) {}

    fn on_backtrack(&mut self, _: &SearchState<T>, _: &BnbSolverStatistics) {}

    fn on_solution_found(&mut self, packing: &Packing<T>, statistics: &BnbSolverStatistics) {
        self.best_bins = Some(packing.num_bins());
        log::info!(
            "New incumbent with {} bins after {} nodes",
            packing.num_bins(),
            statistics.nodes_explored
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use stowage_model::index::BinIndex;

    #[test]
    fn test_tracks_best_bins_and_resets_on_enter() {
        let instance = Instance::new(vec![3i64, 3], 10).unwrap();
        let stats = BnbSolverStatistics::default();
        let mut monitor = LogTreeSearchMonitor::<i64>::new(Duration::ZERO, 0);

        monitor.on_enter_search(&instance, &stats);
        let packing = Packing::new(vec![BinIndex::new(0); 2], vec![6]);
        monitor.on_solution_found(&packing, &stats);
        assert_eq!(monitor.best_bins, Some(1));

        let state = SearchState::new(&instance);
        monitor.on_step(&state, &stats);
        assert_eq!(monitor.steps, 1);

        monitor.on_enter_search(&instance, &stats);
        assert_eq!(monitor.best_bins, None);
        assert_eq!(monitor.steps, 0);
    }

    #[test]
    fn test_display() {
        let monitor = LogTreeSearchMonitor::<i64>::default();
        assert_eq!(
            format!("{}", monitor),
            "LogTreeSearchMonitor(log_interval: 1s, clock_check_mask: 4095)"
        );
    }
}
