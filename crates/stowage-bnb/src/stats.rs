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

use std::time::Duration;
use stowage_core::num::ops::saturating_arithmetic::SaturatingAddVal;

/// Statistics collected during one branch-and-bound session.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BnbSolverStatistics {
    /// Total nodes visited, the root included.
    pub nodes_explored: u64,
    /// Total returns to a parent node.
    pub backtracks: u64,
    /// Total decisions popped from the stack.
    pub decisions_generated: u64,
    /// The deepest level reached in the tree.
    pub max_depth: u64,
    /// Nodes and children cut off because they cannot beat the incumbent.
    /// This covers the node bound, the new-bin check and dominated leaves.
    pub prunings_bound: u64,
    /// Children never generated because an earlier open bin had the same load.
    pub symmetry_skips: u64,
    /// Total improving packings found by this session.
    pub solutions_found: u64,
    /// Total time spent in the session.
    pub time_total: Duration,
    /// The lower bound of the empty packing. Any packing with this many bins
    /// is optimal.
    pub root_lower_bound: usize,
}

impl BnbSolverStatistics {
    #[inline]
    pub fn on_node_explored(&mut self) {
        self.nodes_explored = self.nodes_explored.saturating_add_val(1);
    }

    #[inline]
    pub fn on_backtrack(&mut self) {
        self.backtracks = self.backtracks.saturating_add_val(1);
    }

    #[inline]
    pub fn on_solution_found(&mut self) {
        self.solutions_found = self.solutions_found.saturating_add_val(1);
    }

    #[inline]
    pub fn on_depth_update(&mut self, depth: u64) {
        self.max_depth = self.max_depth.max(depth);
    }

    #[inline]
    pub fn on_decision_generated(&mut self) {
        self.decisions_generated = self.decisions_generated.saturating_add_val(1);
    }

    #[inline]
    pub fn on_pruning_bound(&mut self) {
        self.prunings_bound = self.prunings_bound.saturating_add_val(1);
    }

    #[inline]
    pub fn on_symmetry_skips(&mut self, count: u64) {
        self.symmetry_skips = self.symmetry_skips.saturating_add_val(count);
    }

    #[inline]
    pub fn set_total_time(&mut self, duration: Duration) {
        self.time_total = duration;
    }

    #[inline]
    pub fn set_root_lower_bound(&mut self, bound: usize) {
        self.root_lower_bound = bound;
    }

    /// Adds the counters of `other` to this one. Depths and root bounds take
    /// the maximum, times add up.
    pub fn merge(&mut self, other: &BnbSolverStatistics) {
        self.nodes_explored = self.nodes_explored.saturating_add_val(other.nodes_explored);
        self.backtracks = self.backtracks.saturating_add_val(other.backtracks);
        self.decisions_generated = self
            .decisions_generated
            .saturating_add_val(other.decisions_generated);
        self.max_depth = self.max_depth.max(other.max_depth);
        self.prunings_bound = self.prunings_bound.saturating_add_val(other.prunings_bound);
        self.symmetry_skips = self.symmetry_skips.saturating_add_val(other.symmetry_skips);
        self.solutions_found = self.solutions_found.saturating_add_val(other.solutions_found);
        self.time_total = self.time_total.saturating_add(other.time_total);
        self.root_lower_bound = self.root_lower_bound.max(other.root_lower_bound);
    }
}

impl std::fmt::Display for BnbSolverStatistics {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        writeln!(f, "Stowage-BnB Solver Statistics:")?;
        writeln!(f, "  Nodes explored:       {}", self.nodes_explored)?;
        writeln!(f, "  Backtracks:           {}", self.backtracks)?;
        writeln!(f, "  Max depth reached:    {}", self.max_depth)?;
        writeln!(f, "  Decisions generated:  {}", self.decisions_generated)?;
        writeln!(f, "  Prunings (bound):     {}", self.prunings_bound)?;
        writeln!(f, "  Symmetry skips:       {}", self.symmetry_skips)?;
        writeln!(f, "  Solutions found:      {}", self.solutions_found)?;
        writeln!(f, "  Root Lower Bound:     {}", self.root_lower_bound)?;
        writeln!(f, "  Total time:           {:.2?}", self.time_total)?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_counters_saturate() {
        let mut stats = BnbSolverStatistics {
            nodes_explored: u64::MAX,
            ..Default::default()
        };
        stats.on_node_explored();
        assert_eq!(stats.nodes_explored, u64::MAX);

        stats.on_backtrack();
        stats.on_symmetry_skips(3);
        stats.on_depth_update(4);
        stats.on_depth_update(2);
        assert_eq!(stats.backtracks, 1);
        assert_eq!(stats.symmetry_skips, 3);
        assert_eq!(stats.max_depth, 4);
    }

    #[test]
    fn test_merge_adds_counters_and_keeps_maxima() {
        let mut a = BnbSolverStatistics {
            nodes_explored: 10,
            max_depth: 3,
            root_lower_bound: 4,
            time_total: Duration::from_millis(5),
            ..Default::default()
        };
        let b = BnbSolverStatistics {
            nodes_explored: 7,
            max_depth: 6,
            root_lower_bound: 4,
            solutions_found: 2,
            time_total: Duration::from_millis(7),
            ..Default::default()
        };
        a.merge(&b);
        assert_eq!(a.nodes_explored, 17);
        assert_eq!(a.max_depth, 6);
        assert_eq!(a.solutions_found, 2);
        assert_eq!(a.root_lower_bound, 4);
        assert_eq!(a.time_total, Duration::from_millis(12));
    }

    #[test]
    fn test_display_lists_counters() {
        let stats = BnbSolverStatistics {
            nodes_explored: 42,
            root_lower_bound: 3,
            ..Default::default()
        };
        let out = format!("{}", stats);
        assert!(out.contains("Nodes explored:       42"));
        assert!(out.contains("Root Lower Bound:     3"));
    }
}
