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

//! Monitoring combinators for tree search
//!
//! `CompositeTreeSearchMonitor` forwards every event to its children, so
//! logging and budgets can be mixed without touching the engine.
//!
//! - Events are dispatched in insertion order.
//! - `search_command` short-circuits on the first non-`Continue` answer; put
//!   stricter stop conditions first.

use crate::{
    branching::decision::Decision,
    monitor::tree_search_monitor::{PruneReason, SearchCommand, TreeSearchMonitor},
    state::SearchState,
    stats::BnbSolverStatistics,
};
use stowage_core::num::PackingNumeric;
use stowage_model::{instance::Instance, packing::Packing};

/// A monitor that aggregates several monitors and forwards events to all of
/// them.
pub struct CompositeTreeSearchMonitor<'a, T>
where
    T: PackingNumeric,
{
    monitors: Vec<Box<dyn TreeSearchMonitor<T> + 'a>>,
}

impl<'a, T> Default for CompositeTreeSearchMonitor<'a, T>
where
    T: PackingNumeric,
{
    fn default() -> Self {
        Self::new()
    }
}

impl<'a, T> CompositeTreeSearchMonitor<'a, T>
where
    T: PackingNumeric,
{
    /// Creates a new empty `CompositeTreeSearchMonitor`.
    #[inline(always)]
    pub fn new() -> Self {
        Self {
            monitors: Vec::new(),
        }
    }

    /// Creates an empty composite with room for `capacity` monitors.
    #[inline(always)]
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            monitors: Vec::with_capacity(capacity),
        }
    }

    /// Adds a monitor.
    #[inline(always)]
    pub fn add_monitor<M>(&mut self, monitor: M)
    where
        M: TreeSearchMonitor<T> + 'a,
    {
        self.monitors.push(Box::new(monitor));
    }

    /// Adds a boxed monitor.
    #[inline(always)]
    pub fn add_monitor_boxed(&mut self, monitor: Box<dyn TreeSearchMonitor<T> + 'a>) {
        self.monitors.push(monitor);
    }

    /// Returns the number of monitors.
    #[inline(always)]
    pub fn len(&self) -> usize {
        self.monitors.len()
    }

    /// Returns `true` if the composite holds no monitors.
    #[inline(always)]
    pub fn is_empty(&self) -> bool {
        self.monitors.is_empty()
    }
}

impl<'a, T> FromIterator<Box<dyn TreeSearchMonitor<T> + 'a>> for CompositeTreeSearchMonitor<'a, T>
where
    T: PackingNumeric,
{
    #[inline(always)]
    fn from_iter<I>(iter: I) -> Self
    where
        I: IntoIterator<Item = Box<dyn TreeSearchMonitor<T> + 'a>>,
    {
        Self {
            monitors: iter.into_iter().collect(),
        }
    }
}

impl<'a, T> TreeSearchMonitor<T> for CompositeTreeSearchMonitor<'a, T>
where
    T: PackingNumeric,
{
    #[inline(always)]
    fn name(&self) -> &str {
        "CompositeTreeSearchMonitor"
    }

    #[inline(always)]
    fn on_enter_search(&mut self, instance: &Instance<T>, statistics: &BnbSolverStatistics) {
        for monitor in &mut self.monitors {
            monitor.on_enter_search(instance, statistics);
        }
    }

    #[inline(always)]
    fn on_exit_search(&mut self, statistics: &BnbSolverStatistics) {
        for monitor in &mut self.monitors {
            monitor.on_exit_search(statistics);
        }
    }

    #[inline(always)]
    fn search_command(
        &mut self,
        state: &SearchState<T>,
        statistics: &BnbSolverStatistics,
    ) -> SearchCommand {
        for monitor in &mut self.monitors {
            let cmd = monitor.search_command(state, statistics);
            if !matches!(cmd, SearchCommand::Continue) {
                return cmd;
            }
        }
        SearchCommand::Continue
    }

    #[inline(always)]
    fn on_step(&mut self, state: &SearchState<T>, statistics: &BnbSolverStatistics) {
        for monitor in &mut self.monitors {
            monitor.on_step(state, statistics);
        }
    }

    #[inline(always)]
    fn on_lower_bound_computed(
        &mut self,
        state: &SearchState<T>,
        lower_bound: usize,
        statistics: &BnbSolverStatistics,
    ) {
        for monitor in &mut self.monitors {
            monitor.on_lower_bound_computed(state, lower_bound, statistics);
        }
    }

    #[inline(always)]
    fn on_prune(
        &mut self,
        state: &SearchState<T>,
        reason: PruneReason,
        statistics: &BnbSolverStatistics,
    ) {
        for monitor in &mut self.monitors {
            monitor.on_prune(state, reason, statistics);
        }
    }

    #[inline(always)]
    fn on_decisions_enqueued(
        &mut self,
        state: &SearchState<T>,
        count: usize,
        statistics: &BnbSolverStatistics,
    ) {
        for monitor in &mut self.monitors {
            monitor.on_decisions_enqueued(state, count, statistics);
        }
    }

    #[inline(always)]
    fn on_descend(
        &mut self,
        state: &SearchState<T>,
        decision: Decision<T>,
        statistics: &BnbSolverStatistics,
    ) {
        for monitor in &mut self.monitors {
            monitor.on_descend(state, decision, statistics);
        }
    }

    #[inline(always)]
    fn on_backtrack(&mut self, state: &SearchState<T>, statistics: &BnbSolverStatistics) {
        for monitor in &mut self.monitors {
            monitor.on_backtrack(state, statistics);
        }
    }

    #[inline(always)]
    fn on_solution_found(&mut self, packing: &Packing<T>, statistics: &BnbSolverStatistics) {
        for monitor in &mut self.monitors {
            monitor.on_solution_found(packing, statistics);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::monitor::no_op::NoOperationMonitor;
    use std::{cell::Cell, rc::Rc};

    type IntegerType = i64;

    /// Counts the calls it receives and optionally terminates.
    struct Probe {
        calls: Rc<Cell<usize>>,
        terminate: Option<&'static str>,
    }

    impl TreeSearchMonitor<IntegerType> for Probe {
        fn name(&self) -> &str {
            "Probe"
        }
        fn on_enter_search(&mut self, _: &Instance<IntegerType>, _: &BnbSolverStatistics) {
            self.calls.set(self.calls.get() + 1);
        }
        fn on_exit_search(&mut self, _: &BnbSolverStatistics) {}
        fn search_command(
            &mut self,
            _: &SearchState<IntegerType>,
            _: &BnbSolverStatistics,
        ) -> SearchCommand {
            self.calls.set(self.calls.get() + 1);
            match self.terminate {
                Some(reason) => SearchCommand::Terminate(reason.to_string()),
                None => SearchCommand::Continue,
            }
        }
        fn on_step(&mut self, _: &SearchState<IntegerType>, _: &BnbSolverStatistics) {}
        fn on_lower_bound_computed(
            &mut self,
            _: &SearchState<IntegerType>,
            _: usize,
            _: &BnbSolverStatistics,
        ) {
        }
        fn on_prune(
            &mut self,
            _: &SearchState<IntegerType>,
            _: PruneReason,
            _: &BnbSolverStatistics,
        ) {
        }
        fn on_decisions_enqueued(
            &mut self,
            _: &SearchState<IntegerType>,
            _: usize,
            _: &BnbSolverStatistics,
        ) {
        }
        fn on_descend(
            &mut self,
            _: &SearchState<IntegerType>,
            _: Decision<IntegerType>,
            _: &BnbSolverStatistics,
        ) {
        }
        fn on_backtrack(&mut self, _: &SearchState<IntegerType>, _: &BnbSolverStatistics) {}
        fn on_solution_found(&mut self, _: &Packing<IntegerType>, _: &BnbSolverStatistics) {}
    }

    #[test]
    fn test_events_fan_out_to_all_children() {
        let calls = Rc::new(Cell::new(0));
        let mut composite = CompositeTreeSearchMonitor::new();
        composite.add_monitor(Probe {
            calls: Rc::clone(&calls),
            terminate: None,
        });
        composite.add_monitor(Probe {
            calls: Rc::clone(&calls),
            terminate: None,
        });
        composite.add_monitor(NoOperationMonitor::new());
        assert_eq!(composite.len(), 3);

        let instance = Instance::new(vec![1i64], 10).unwrap();
        composite.on_enter_search(&instance, &BnbSolverStatistics::default());
        assert_eq!(calls.get(), 2);
    }

    #[test]
    fn test_first_terminate_wins_and_short_circuits() {
        let calls = Rc::new(Cell::new(0));
        let mut composite = CompositeTreeSearchMonitor::with_capacity(3);
        composite.add_monitor(Probe {
            calls: Rc::clone(&calls),
            terminate: Some("first"),
        });
        composite.add_monitor(Probe {
            calls: Rc::clone(&calls),
            terminate: Some("second"),
        });

        let instance = Instance::new(vec![1i64], 10).unwrap();
        let state = SearchState::new(&instance);
        let cmd = composite.search_command(&state, &BnbSolverStatistics::default());
        assert_eq!(cmd, SearchCommand::Terminate("first".to_string()));
        assert_eq!(calls.get(), 1);
    }

    #[test]
    fn test_empty_composite_continues() {
        let mut composite = CompositeTreeSearchMonitor::<IntegerType>::default();
        assert!(composite.is_empty());
        let instance = Instance::new(vec![1i64], 10).unwrap();
        let state = SearchState::new(&instance);
        assert_eq!(
            composite.search_command(&state, &BnbSolverStatistics::default()),
            SearchCommand::Continue
        );
    }
}
