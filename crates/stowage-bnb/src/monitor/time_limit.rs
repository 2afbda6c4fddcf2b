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
    monitor::tree_search_monitor::{PruneReason, SearchCommand, TreeSearchMonitor},
    state::SearchState,
    stats::BnbSolverStatistics,
};
use std::{
    marker::PhantomData,
    time::{Duration, Instant},
};
use stowage_core::num::{PackingNumeric, ops::saturating_arithmetic::SaturatingAddVal};
use stowage_model::{instance::Instance, packing::Packing};

/// A monitor that terminates the search after a specified duration.
///
/// Checks the clock only every `check_interval` commands.
#[derive(Debug, Clone)]
pub struct TimeLimitMonitor<T> {
    time_limit: Duration,
    start_time: Option<Instant>,
    check_interval: u64,
    ops_since_last_check: u64,
    _marker: PhantomData<T>,
}

impl<T> TimeLimitMonitor<T> {
    /// Creates a monitor for `duration`, reading the clock every
    /// `check_interval` steps. A higher interval is cheaper but may overshoot
    /// the limit.
    pub fn new(duration: Duration, check_interval: u64) -> Self {
        Self {
            time_limit: duration,
            start_time: None,
            check_interval: check_interval.max(1),
            ops_since_last_check: 0,
            _marker: PhantomData,
        }
    }
}

impl<T> TreeSearchMonitor<T> for TimeLimitMonitor<T>
where
    T: PackingNumeric,
{
    fn name(&self) -> &str {
        "TimeLimitMonitor"
    }

    fn on_enter_search(&mut self, _instance: &Instance<T>, _statistics: &BnbSolverStatistics) {
        self.start_time = Some(Instant::now());
        self.ops_since_last_check = 0;
    }

    fn on_exit_search(&mut self, _statistics: &BnbSolverStatistics) {
        self.start_time = None;
    }

    fn search_command(
        &mut self,
        _state: &SearchState<T>,
        _statistics: &BnbSolverStatistics,
    ) -> SearchCommand {
        self.ops_since_last_check = self.ops_since_last_check.saturating_add_val(1);

        if self.ops_since_last_check >= self.check_interval {
            self.ops_since_last_check = 0;

            if let Some(start) = self.start_time
                && start.elapsed() > self.time_limit
            {
                return SearchCommand::Terminate(format!(
                    "Time limit of {:.3} seconds exceeded",
                    self.time_limit.as_secs_f64()
                ));
            }
        }

        SearchCommand::Continue
    }

    fn on_step(&mut self, _: &SearchState<T>, _: &BnbSolverStatistics) {}
    fn on_lower_bound_computed(&mut self, _: &SearchState<T>, _: usize, _: &BnbSolverStatistics) {}
    fn on_prune(&mut self, _: &SearchState<T>, _: PruneReason, _: &BnbSolverStatistics) {}
    fn on_decisions_enqueued(&mut self, _: &SearchState<T>, _: usize, _: &BnbSolverStatistics) {}
    fn on_descend(&mut self, _: &SearchState<T>, _: Decision<T>, _: &BnbSolverStatistics) {}
    fn on_backtrack(&mut self, _: &SearchState<T>, _: &BnbSolverStatistics) {}
    fn on_solution_found(&mut self, _: &Packing<T>, _: &BnbSolverStatistics) {}
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_zero_limit_terminates_on_first_check() {
        let instance = Instance::new(vec![1i64], 10).unwrap();
        let state = SearchState::new(&instance);
        let stats = BnbSolverStatistics::default();
        let mut monitor = TimeLimitMonitor::new(Duration::ZERO, 1);

        monitor.on_enter_search(&instance, &stats);
        std::thread::sleep(Duration::from_millis(2));
        assert!(matches!(
            monitor.search_command(&state, &stats),
            SearchCommand::Terminate(_)
        ));
    }

    #[test]
    fn test_clock_only_read_every_interval() {
        let instance = Instance::new(vec![1i64], 10).unwrap();
        let state = SearchState::new(&instance);
        let stats = BnbSolverStatistics::default();
        let mut monitor = TimeLimitMonitor::new(Duration::ZERO, 3);

        monitor.on_enter_search(&instance, &stats);
        std::thread::sleep(Duration::from_millis(2));
        assert_eq!(monitor.search_command(&state, &stats), SearchCommand::Continue);
        assert_eq!(monitor.search_command(&state, &stats), SearchCommand::Continue);
        assert!(matches!(
            monitor.search_command(&state, &stats),
            SearchCommand::Terminate(_)
        ));
    }

    #[test]
    fn test_generous_limit_continues_and_idle_monitor_never_stops() {
        let instance = Instance::new(vec![1i64], 10).unwrap();
        let state = SearchState::new(&instance);
        let stats = BnbSolverStatistics::default();

        let mut idle = TimeLimitMonitor::<i64>::new(Duration::ZERO, 1);
        assert_eq!(idle.search_command(&state, &stats), SearchCommand::Continue);

        let mut monitor = TimeLimitMonitor::new(Duration::from_secs(3600), 10_000);
        monitor.on_enter_search(&instance, &stats);
        for _ in 0..20_000 {
            assert_eq!(monitor.search_command(&state, &stats), SearchCommand::Continue);
        }
    }
}
