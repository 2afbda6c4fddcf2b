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
use stowage_bnb::stats::BnbSolverStatistics;

/// Statistics of a complete solve, across all workers.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SolverStatistics {
    /// Bins used by the first-fit-decreasing packing.
    pub heuristic_bins: usize,
    /// The root lower bound of the instance.
    pub lower_bound: usize,
    /// Number of threads that ran the exact search (0 if it was skipped).
    pub used_threads: usize,
    /// Number of subtrees the search space was split into.
    pub subtrees: usize,
    /// Search counters, merged over all sessions.
    pub search: BnbSolverStatistics,
    /// Wall-clock duration of the solve.
    pub solve_duration: Duration,
}

impl std::fmt::Display for SolverStatistics {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        writeln!(f, "Solver Statistics:")?;
        writeln!(f, "  Heuristic Bins: {}", self.heuristic_bins)?;
        writeln!(f, "  Lower Bound: {}", self.lower_bound)?;
        writeln!(f, "  Used Threads: {}", self.used_threads)?;
        writeln!(f, "  Subtrees: {}", self.subtrees)?;
        writeln!(f, "  Nodes Explored: {}", self.search.nodes_explored)?;
        writeln!(f, "  Solutions Found: {}", self.search.solutions_found)?;
        writeln!(
            f,
            "  Solve Duration (secs): {:.3}",
            self.solve_duration.as_secs_f64()
        )
    }
}

/// Builder for `SolverStatistics`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SolverStatisticsBuilder {
    heuristic_bins: usize,
    lower_bound: usize,
    used_threads: usize,
    subtrees: usize,
    search: BnbSolverStatistics,
    solve_duration: Duration,
}

impl Default for SolverStatisticsBuilder {
    fn default() -> Self {
        Self::new()
    }
}

impl SolverStatisticsBuilder {
    #[inline]
    pub fn new() -> Self {
        Self {
            heuristic_bins: 0,
            lower_bound: 0,
            used_threads: 0,
            subtrees: 0,
            search: BnbSolverStatistics::default(),
            solve_duration: Duration::ZERO,
        }
    }

    #[inline]
    pub fn heuristic_bins(mut self, heuristic_bins: usize) -> Self {
        self.heuristic_bins = heuristic_bins;
        self
    }

    #[inline]
    pub fn lower_bound(mut self, lower_bound: usize) -> Self {
        self.lower_bound = lower_bound;
        self
    }

    #[inline]
    pub fn used_threads(mut self, used_threads: usize) -> Self {
        self.used_threads = used_threads;
        self
    }

    #[inline]
    pub fn subtrees(mut self, subtrees: usize) -> Self {
        self.subtrees = subtrees;
        self
    }

    /// Sets the merged search counters.
    #[inline]
    pub fn search(mut self, search: BnbSolverStatistics) -> Self {
        self.search = search;
        self
    }

    #[inline]
    pub fn solve_duration(mut self, solve_duration: Duration) -> Self {
        self.solve_duration = solve_duration;
        self
    }

    #[inline]
    pub fn build(self) -> SolverStatistics {
        SolverStatistics {
            heuristic_bins: self.heuristic_bins,
            lower_bound: self.lower_bound,
            used_threads: self.used_threads,
            subtrees: self.subtrees,
            search: self.search,
            solve_duration: self.solve_duration,
        }
    }
}
