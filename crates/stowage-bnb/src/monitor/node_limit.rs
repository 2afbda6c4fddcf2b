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
    sync::atomic::{AtomicU64, Ordering},
};
use stowage_core::num::PackingNumeric;
use stowage_model::{instance::Instance, packing::Packing};

/// Nodes a session explores before publishing them to a shared counter.
const SHARED_FLUSH_INTERVAL: u64 = 256;

/// A monitor that terminates the search once a node budget is spent.
///
/// A local monitor counts the nodes of its own session. A shared monitor
/// adds them to an `AtomicU64` that several sessions draw from; nodes are
/// published in batches, so a shared budget may be overshot by up to one
/// batch per session.
#[derive(Debug, Clone)]
pub struct NodeLimitMonitor<'a, T> {
    node_limit: u64,
    shared: Option<&'a AtomicU64>,
    published: u64,
    _marker: PhantomData<T>,
}

impl<'a, T> NodeLimitMonitor<'a, T> {
    /// Creates a monitor limiting this session to `node_limit` nodes.
    #[inline]
    pub fn new(node_limit: u64) -> Self {
        Self {
            node_limit,
            shared: None,
            published: 0,
            _marker: PhantomData,
        }
    }

    /// Creates a monitor drawing from a budget shared through `counter`.
    #[inline]
    pub fn shared(node_limit: u64, counter: &'a AtomicU64) -> Self {
        Self {
            node_limit,
            shared: Some(counter),
            published: 0,
            _marker: PhantomData,
        }
    }

    #[inline]
    fn terminate(&self) -> SearchCommand {
        SearchCommand::Terminate(format!("Node limit of {} nodes reached", self.node_limit))
    }
}

impl<'a, T> TreeSearchMonitor<T> for NodeLimitMonitor<'a, T>
where
    T: PackingNumeric,
{
    fn name(&self) -> &str {
        "NodeLimitMonitor"
    }

    fn on_enter_search(&mut self, _instance: &Instance<T>, _statistics: &BnbSolverStatistics) {
        self.published = 0;
    }

    fn on_exit_search(&mut self, statistics: &BnbSolverStatistics) {
        if let Some(counter) = self.shared {
            let pending = statistics.nodes_explored.saturating_sub(self.published);
            counter.fetch_add(pending, Ordering::Relaxed);
            self.published = statistics.nodes_explored;
        }
    }

    fn search_command(
        &mut self,
        _state: &SearchState<T>,
        statistics: &BnbSolverStatistics,
    ) -> SearchCommand {
        let explored = statistics.nodes_explored;
        let Some(counter) = self.shared else {
            return if explored >= self.node_limit {
                self.terminate()
            } else {
                SearchCommand::Continue
            };
        };

        let pending = explored.saturating_sub(self.published);
        let total = if pending >= SHARED_FLUSH_INTERVAL {
            self.published = explored;
            counter
                .fetch_add(pending, Ordering::Relaxed)
                .saturating_add(pending)
        } else {
            counter.load(Ordering::Relaxed)
        };

        if total >= self.node_limit {
            self.terminate()
        } else {
            SearchCommand::Continue
        }
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

    fn stats(nodes: u64) -> BnbSolverStatistics {
        BnbSolverStatistics {
            nodes_explored: nodes,
            ..Default::default()
        }
    }

    #[test]
    fn test_local_limit() {
        let instance = Instance::new(vec![1i64], 10).unwrap();
        let state = SearchState::new(&instance);
        let mut monitor = NodeLimitMonitor::<i64>::new(5);

        assert_eq!(monitor.search_command(&state, &stats(4)), SearchCommand::Continue);
        assert_eq!(
            monitor.search_command(&state, &stats(5)),
            SearchCommand::Terminate("Node limit of 5 nodes reached".to_string())
        );
    }

    #[test]
    fn test_shared_limit_sees_other_sessions() {
        let instance = Instance::new(vec![1i64], 10).unwrap();
        let state = SearchState::new(&instance);
        let counter = AtomicU64::new(0);
        let mut a = NodeLimitMonitor::<i64>::shared(1000, &counter);
        let mut b = NodeLimitMonitor::<i64>::shared(1000, &counter);

        assert_eq!(a.search_command(&state, &stats(600)), SearchCommand::Continue);
        assert_eq!(counter.load(Ordering::Relaxed), 600);
        assert!(matches!(
            b.search_command(&state, &stats(400)),
            SearchCommand::Terminate(_)
        ));
        // Already spent, a sees it without flushing.
        assert!(matches!(
            a.search_command(&state, &stats(601)),
            SearchCommand::Terminate(_)
        ));
    }

    #[test]
    fn test_exit_publishes_remaining_nodes() {
        let counter = AtomicU64::new(0);
        let mut monitor = NodeLimitMonitor::<i64>::shared(1000, &counter);
        monitor.on_exit_search(&stats(17));
        assert_eq!(counter.load(Ordering::Relaxed), 17);
        monitor.on_exit_search(&stats(17));
        assert_eq!(counter.load(Ordering::Relaxed), 17);
    }
}
