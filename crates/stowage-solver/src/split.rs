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

//! Splitting the search tree into independent subtrees
//!
//! The tree is expanded breadth first with the same branching rule and the
//! same pruning the engine applies, until the frontier holds enough nodes to
//! keep every worker busy. Each frontier node is returned as the prefix of
//! fixed assignments leading to it, in the order a sequential search would
//! visit them.

use stowage_bnb::{
    bound::{BoundEstimator, CombinedBound},
    branching::{decision::DecisionBuilder, first_fit::FirstFitBranching},
    fixed::FixedAssignment,
    state::SearchState,
};
use stowage_core::num::PackingNumeric;
use stowage_model::instance::Instance;

/// Returns disjoint subtree prefixes covering every node that can still
/// beat a packing with `upper_bound` bins.
///
/// Stops expanding once at least `target` subtrees exist or all items are
/// fixed. An empty result means no packing with fewer than `upper_bound` bins
/// exists.
pub fn split_subtrees<T>(
    instance: &Instance<T>,
    upper_bound: usize,
    target: usize,
) -> Vec<Vec<FixedAssignment>>
where
    T: PackingNumeric,
{
    let mut builder = FirstFitBranching::new();
    let mut bound = CombinedBound::new();
    let mut frontier: Vec<Vec<FixedAssignment>> = vec![Vec::new()];

    for _ in 0..instance.num_items() {
        if frontier.len() >= target || frontier.is_empty() {
            break;
        }

        let mut next = Vec::with_capacity(frontier.len() * 2);
        for prefix in &frontier {
            let state = replay(instance, prefix);
            let decisions: Vec<_> = builder.next_decision(instance, &state).collect();

            for decision in decisions {
                if decision.opens_bin() && state.num_bins().saturating_add(1) >= upper_bound {
                    continue;
                }

                let mut child = state.clone();
                child.assign_next(decision.bin_index(), decision.size());
                if bound.lower_bound(instance, &child) >= upper_bound {
                    continue;
                }

                let mut extended = Vec::with_capacity(prefix.len() + 1);
                extended.extend_from_slice(prefix);
                extended.push(FixedAssignment::new(
                    decision.item_index(),
                    decision.bin_index(),
                ));
                next.push(extended);
            }
        }
        frontier = next;
    }

    frontier
}

fn replay<T>(instance: &Instance<T>, prefix: &[FixedAssignment]) -> SearchState<T>
where
    T: PackingNumeric,
{
    let mut state = SearchState::new(instance);
    for fixed in prefix {
        state.assign_next(fixed.bin_index, instance.item_size(fixed.item_index));
    }
    state
}
