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

//! Branch-and-bound engine for one-dimensional bin packing.
//!
//! `BnbSolver` explores placements of the canonical item sequence depth
//! first. Every level of the tree places the next item, either into one of
//! the open bins or into a fresh one; the `DecisionBuilder` decides which of
//! those children exist and in which order they are visited. Nodes whose
//! `bins used + admissible bound` cannot beat the incumbent are cut, and the
//! search stops early once the incumbent matches the root lower bound.
//!
//! The solver owns its trail and decision stack so repeated solves reuse
//! their memory; a search session holds all per-run state and is consumed
//! when the run ends. Incumbents may be local to a session or shared across
//! sessions running on other threads through `SharedIncumbent`.

use crate::{
    bound::{combined::root_lower_bound, estimator::BoundEstimator},
    branching::decision::{Decision, DecisionBuilder},
    fixed::{FixedAssignment, validate_prefix},
    incumbent::{IncumbentStore, NoSharedIncumbent, SharedIncumbent, SharedIncumbentAdapter},
    monitor::tree_search_monitor::{PruneReason, SearchCommand, TreeSearchMonitor},
    result::{BnbSolverOutcome, SolverResult, TerminationReason},
    stack::SearchStack,
    state::SearchState,
    stats::BnbSolverStatistics,
    trail::SearchTrail,
};
use stowage_core::num::PackingNumeric;
use stowage_model::{instance::Instance, packing::Packing};

/// An exact branch-and-bound solver for the bin packing problem.
///
/// This is only the execution engine: the shape of the tree comes from a
/// `DecisionBuilder` and the node bounds from a `BoundEstimator`.
#[derive(Clone, Debug)]
pub struct BnbSolver<T> {
    trail: SearchTrail<T>,
    stack: SearchStack<T>,
}

impl<T> Default for BnbSolver<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T> BnbSolver<T> {
    /// Creates a solver without preallocated storage.
    #[inline]
    pub fn new() -> Self {
        Self {
            trail: SearchTrail::new(),
            stack: SearchStack::new(),
        }
    }

    /// Creates a solver with storage for instances of up to `num_items`
    /// items.
    ///
    /// # Note
    ///
    /// Every solve grows the storage to the instance anyway; preallocating
    /// only moves the allocations to construction time.
    #[inline]
    pub fn preallocated(num_items: usize) -> Self {
        Self {
            trail: SearchTrail::preallocated(num_items),
            stack: SearchStack::preallocated(num_items),
        }
    }

    /// Clears the trail and the stack, keeping their capacity.
    #[inline]
    fn reset(&mut self) {
        self.trail.reset();
        self.stack.reset();
    }
}

impl<T> BnbSolver<T>
where
    T: PackingNumeric,
{
    /// Solves `instance` as a standalone, single threaded search.
    #[inline]
    pub fn solve<B, E, S>(
        &mut self,
        instance: &Instance<T>,
        builder: &mut B,
        bound: &mut E,
        monitor: S,
    ) -> BnbSolverOutcome<T>
    where
        B: DecisionBuilder<T>,
        E: BoundEstimator<T>,
        S: TreeSearchMonitor<T>,
    {
        let backing = NoSharedIncumbent::new();
        self.solve_internal(instance, &[], builder, bound, monitor, backing)
    }

    /// Solves `instance` against `incumbent`, which may be seeded with a
    /// heuristic packing and is updated by every improvement found here.
    #[inline]
    pub fn solve_with_incumbent<B, E, S>(
        &mut self,
        instance: &Instance<T>,
        builder: &mut B,
        bound: &mut E,
        monitor: S,
        incumbent: &SharedIncumbent<T>,
    ) -> BnbSolverOutcome<T>
    where
        B: DecisionBuilder<T>,
        E: BoundEstimator<T>,
        S: TreeSearchMonitor<T>,
    {
        let backing = SharedIncumbentAdapter::new(incumbent);
        self.solve_internal(instance, &[], builder, bound, monitor, backing)
    }

    /// Solves the subtree below the placements in `fixed`.
    ///
    /// Exhausting a subtree proves nothing about the whole instance, so the
    /// result is only `Optimal` if the root lower bound is reached.
    #[inline]
    pub fn solve_with_fixed<B, E, S>(
        &mut self,
        instance: &Instance<T>,
        builder: &mut B,
        bound: &mut E,
        monitor: S,
        fixed: &[FixedAssignment],
    ) -> BnbSolverOutcome<T>
    where
        B: DecisionBuilder<T>,
        E: BoundEstimator<T>,
        S: TreeSearchMonitor<T>,
    {
        let backing = NoSharedIncumbent::new();
        self.solve_internal(instance, fixed, builder, bound, monitor, backing)
    }

    /// Solves the subtree below the placements in `fixed` against a shared
    /// incumbent. This is the entry point of the parallel workers.
    #[inline]
    pub fn solve_with_fixed_and_incumbent<B, E, S>(
        &mut self,
        instance: &Instance<T>,
        builder: &mut B,
        bound: &mut E,
        monitor: S,
        fixed: &[FixedAssignment],
        incumbent: &SharedIncumbent<T>,
    ) -> BnbSolverOutcome<T>
    where
        B: DecisionBuilder<T>,
        E: BoundEstimator<T>,
        S: TreeSearchMonitor<T>,
    {
        let backing = SharedIncumbentAdapter::new(incumbent);
        self.solve_internal(instance, fixed, builder, bound, monitor, backing)
    }

    #[inline(always)]
    fn solve_internal<B, E, S, I>(
        &mut self,
        instance: &Instance<T>,
        fixed: &[FixedAssignment],
        builder: &mut B,
        bound: &mut E,
        mut monitor: S,
        backing: I,
    ) -> BnbSolverOutcome<T>
    where
        B: DecisionBuilder<T>,
        E: BoundEstimator<T>,
        S: TreeSearchMonitor<T>,
        I: IncumbentStore<T>,
    {
        let session =
            BnbSolverSearchSession::new(self, instance, fixed, builder, bound, &mut monitor, backing);
        let outcome = session.run();
        self.reset();
        outcome
    }
}

/// A single search run. Consumed by `run`.
struct BnbSolverSearchSession<'a, T, B, E, S, I>
where
    T: PackingNumeric,
    I: IncumbentStore<T>,
{
    solver: &'a mut BnbSolver<T>,
    instance: &'a Instance<T>,
    fixed: &'a [FixedAssignment],
    builder: &'a mut B,
    bound: &'a mut E,
    monitor: &'a mut S,
    incumbent: I,
    state: SearchState<T>,
    root_lower_bound: usize,
    best_bins: usize,
    best_packing: Option<Packing<T>>,
    stats: BnbSolverStatistics,
    start_time: std::time::Instant,
}

impl<'a, T, B, E, S, I> std::fmt::Debug for BnbSolverSearchSession<'a, T, B, E, S, I>
where
    T: PackingNumeric,
    I: IncumbentStore<T>,
{
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SearchSession")
            .field("instance", &self.instance)
            .field("state", &self.state)
            .field("root_lower_bound", &self.root_lower_bound)
            .field("best_bins", &self.best_bins)
            .field("best_packing", &self.best_packing)
            .field("stats", &self.stats)
            .finish()
    }
}

impl<'a, T, B, E, S, I> std::fmt::Display for BnbSolverSearchSession<'a, T, B, E, S, I>
where
    T: PackingNumeric,
    I: IncumbentStore<T>,
{
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let packing_str = match &self.best_packing {
            Some(packing) => format!("Packing(bins: {})", packing.num_bins()),
            None => "No packing found".to_string(),
        };
        write!(
            f,
            "SearchSession(root_lower_bound: {}, best_packing: {}, stats: {})",
            self.root_lower_bound, packing_str, self.stats
        )
    }
}

impl<'a, T, B, E, S, I> BnbSolverSearchSession<'a, T, B, E, S, I>
where
    T: PackingNumeric,
    B: DecisionBuilder<T>,
    E: BoundEstimator<T>,
    S: TreeSearchMonitor<T>,
    I: IncumbentStore<T>,
{
    #[inline]
    fn new(
        solver: &'a mut BnbSolver<T>,
        instance: &'a Instance<T>,
        fixed: &'a [FixedAssignment],
        builder: &'a mut B,
        bound: &'a mut E,
        monitor: &'a mut S,
        incumbent: I,
    ) -> Self {
        let best_bins = incumbent.initial_upper_bound();
        Self {
            solver,
            instance,
            fixed,
            builder,
            bound,
            monitor,
            incumbent,
            state: SearchState::new(instance),
            root_lower_bound: root_lower_bound(instance),
            best_bins,
            best_packing: None,
            stats: BnbSolverStatistics::default(),
            start_time: std::time::Instant::now(),
        }
    }

    fn run(mut self) -> BnbSolverOutcome<T> {
        self.stats.set_root_lower_bound(self.root_lower_bound);
        self.monitor.on_enter_search(self.instance, &self.stats);

        if let Err(err) = self.initialize() {
            log::debug!("Rejected fixed prefix: {}", err);
            self.stats.set_total_time(self.start_time.elapsed());
            self.monitor.on_exit_search(&self.stats);
            return BnbSolverOutcome::new(
                SolverResult::Unknown,
                TerminationReason::InvalidPrefix(err.to_string()),
                self.stats,
            );
        }

        let termination_reason = loop {
            self.best_bins = self.incumbent.tighten(self.best_bins);
            if self.best_bins <= self.root_lower_bound {
                break TerminationReason::LowerBoundReached;
            }

            self.monitor.on_step(&self.state, &self.stats);

            if let SearchCommand::Terminate(msg) =
                self.monitor.search_command(&self.state, &self.stats)
            {
                break TerminationReason::Aborted(msg);
            }

            if self.solver.stack.is_current_level_empty() {
                if self.solver.stack.depth() <= 1 {
                    break TerminationReason::Exhausted;
                }
                self.backtrack_step();
            } else {
                self.process_next_decision();
            }
        };

        self.stats.set_total_time(self.start_time.elapsed());
        self.monitor.on_exit_search(&self.stats);
        self.finalize_result(termination_reason)
    }

    /// Maps the termination reason and the best known packing to an outcome.
    fn finalize_result(self, reason: TerminationReason) -> BnbSolverOutcome<T> {
        let packing = match self.best_packing {
            Some(packing) => Some(packing),
            None => self.incumbent.best_packing(),
        };

        match reason {
            TerminationReason::LowerBoundReached => match packing {
                Some(packing) => BnbSolverOutcome::optimal(packing, reason, self.stats),
                None => BnbSolverOutcome::new(SolverResult::Unknown, reason, self.stats),
            },
            TerminationReason::Exhausted => {
                let result = match packing {
                    Some(packing) if self.fixed.is_empty() => SolverResult::Optimal(packing),
                    Some(packing) => SolverResult::Feasible(packing),
                    None => SolverResult::Unknown,
                };
                BnbSolverOutcome::new(result, reason, self.stats)
            }
            TerminationReason::Aborted(msg) => BnbSolverOutcome::aborted(packing, msg, self.stats),
            TerminationReason::InvalidPrefix(_) => {
                BnbSolverOutcome::new(SolverResult::Unknown, reason, self.stats)
            }
        }
    }

    /// Applies the fixed prefix, opens the root frame and expands the root.
    fn initialize(&mut self) -> Result<(), crate::fixed::InvalidPrefix> {
        validate_prefix(self.instance, self.fixed)?;

        self.solver.trail.ensure_capacity(self.instance.num_items());
        self.solver.stack.ensure_capacity(self.instance.num_items());

        for assignment in self.fixed {
            let size = self.instance.item_size(assignment.item_index);
            self.state.assign_next(assignment.bin_index, size);
        }

        // Root frame. Has to exist before decisions are pushed.
        self.solver.trail.push_frame();
        self.solver.stack.push_frame();
        self.stats.on_node_explored();
        self.stats.on_depth_update(self.state.depth() as u64);

        if self.state.is_complete() {
            self.handle_complete_solution();
        } else {
            self.expand_node();
        }

        Ok(())
    }

    #[inline]
    fn backtrack_step(&mut self) {
        self.stats.on_backtrack();
        self.monitor.on_backtrack(&self.state, &self.stats);

        self.solver.trail.backtrack(&mut self.state);
        self.solver.stack.pop_frame();
    }

    #[inline(always)]
    fn process_next_decision(&mut self) {
        let Some(decision) = self.solver.stack.pop() else {
            return;
        };

        self.stats.on_decision_generated();

        if let Some(child) = self.build_child(decision) {
            self.descend(child);
        }
    }

    /// Returns the decision if its child may still improve the incumbent.
    #[inline(always)]
    fn build_child(&mut self, decision: Decision<T>) -> Option<Decision<T>> {
        debug_assert_eq!(
            Some(decision.item_index()),
            self.state.next_item(),
            "called `BnbSolverSearchSession::build_child` with a decision for {} at depth {}",
            decision.item_index(),
            self.state.depth()
        );

        if decision.opens_bin() && self.state.num_bins().saturating_add(1) >= self.best_bins {
            self.stats.on_pruning_bound();
            self.monitor
                .on_prune(&self.state, PruneReason::NewBinDominated, &self.stats);
            return None;
        }

        Some(decision)
    }

    #[inline(always)]
    fn descend(&mut self, decision: Decision<T>) {
        self.solver.trail.push_frame();
        self.solver
            .trail
            .apply_assignment(&mut self.state, decision.bin_index(), decision.size());
        self.solver.stack.push_frame();

        self.stats.on_node_explored();
        self.stats.on_depth_update(self.state.depth() as u64);
        self.monitor.on_descend(&self.state, decision, &self.stats);

        if self.state.is_complete() {
            self.handle_complete_solution();
            return;
        }

        if !self.expand_node() {
            self.backtrack_step();
        }
    }

    /// Installs the complete packing of the current state if it uses fewer
    /// bins than the incumbent.
    #[inline(always)]
    fn handle_complete_solution(&mut self) {
        let bins = self.state.num_bins();
        if bins >= self.best_bins {
            self.stats.on_pruning_bound();
            self.monitor
                .on_prune(&self.state, PruneReason::BoundDominated, &self.stats);
            return;
        }

        if let Ok(packing) = Packing::try_from(&self.state) {
            debug_assert!(
                packing.validate(self.instance).is_ok(),
                "called `BnbSolverSearchSession::handle_complete_solution` with an invalid packing"
            );

            self.best_bins = bins;
            self.incumbent.on_solution_found(&packing);
            self.stats.on_solution_found();
            self.monitor.on_solution_found(&packing, &self.stats);
            self.best_packing = Some(packing);
        }
    }

    /// Bounds the current node and enqueues its children. Returns `false` if
    /// the node was pruned.
    #[inline(always)]
    fn expand_node(&mut self) -> bool {
        let lower_bound = self.bound.lower_bound(self.instance, &self.state);
        self.monitor
            .on_lower_bound_computed(&self.state, lower_bound, &self.stats);

        if lower_bound >= self.best_bins {
            self.stats.on_pruning_bound();
            self.monitor
                .on_prune(&self.state, PruneReason::BoundDominated, &self.stats);
            return false;
        }

        let skips_before = self.builder.symmetry_skips();
        let decisions = self.builder.next_decision(self.instance, &self.state);
        let added = self.solver.stack.extend_reversed(decisions);
        let skipped = self.builder.symmetry_skips().saturating_sub(skips_before);

        self.stats.on_symmetry_skips(skipped);
        self.monitor
            .on_decisions_enqueued(&self.state, added, &self.stats);

        true
    }
}
