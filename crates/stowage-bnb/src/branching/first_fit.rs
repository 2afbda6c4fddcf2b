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
    branching::decision::{Decision, DecisionBuilder},
    state::SearchState,
};
use std::iter::FusedIterator;
use stowage_core::num::PackingNumeric;
use stowage_model::{index::BinIndex, instance::Instance};

/// A decision builder that offers the next item to every open bin it fits,
/// in ascending opening order, followed by exactly one new bin.
///
/// With symmetry breaking enabled, a bin whose load equals the load of an
/// earlier open bin yields no child: both subtrees are identical up to a
/// renaming of the bins, and the earlier bin already covers it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct FirstFitBranching {
    symmetry_breaking: bool,
    symmetry_skips: u64,
}

impl Default for FirstFitBranching {
    fn default() -> Self {
        Self::new()
    }
}

impl FirstFitBranching {
    /// Creates a builder with symmetry breaking enabled.
    #[inline]
    pub const fn new() -> Self {
        Self {
            symmetry_breaking: true,
            symmetry_skips: 0,
        }
    }

    /// Creates a builder that branches on every fitting bin, equal loads
    /// included.
    #[inline]
    pub const fn without_symmetry_breaking() -> Self {
        Self {
            symmetry_breaking: false,
            symmetry_skips: 0,
        }
    }

    /// Returns `true` if equal-load bins are collapsed.
    #[inline]
    pub const fn symmetry_breaking(&self) -> bool {
        self.symmetry_breaking
    }
}

impl<T> DecisionBuilder<T> for FirstFitBranching
where
    T: PackingNumeric,
{
    type DecisionIterator<'a>
        = FirstFitIter<'a, T>
    where
        T: 'a,
        Self: 'a;

    fn name(&self) -> &str {
        if self.symmetry_breaking {
            "FirstFitBranching"
        } else {
            "FirstFitBranching(no symmetry breaking)"
        }
    }

    fn next_decision<'a>(
        &'a mut self,
        instance: &'a Instance<T>,
        state: &'a SearchState<T>,
    ) -> Self::DecisionIterator<'a> {
        FirstFitIter {
            next_bin: BinIndex::new(0),
            new_bin_done: state.is_complete(),
            symmetry_breaking: self.symmetry_breaking,
            symmetry_skips: &mut self.symmetry_skips,
            instance,
            state,
        }
    }

    fn symmetry_skips(&self) -> u64 {
        self.symmetry_skips
    }
}

/// Iterator over the children of one node in exploration order.
#[derive(Debug)]
pub struct FirstFitIter<'a, T> {
    next_bin: BinIndex,
    new_bin_done: bool,
    symmetry_breaking: bool,
    symmetry_skips: &'a mut u64,
    instance: &'a Instance<T>,
    state: &'a SearchState<T>,
}

impl<'a, T> Iterator for FirstFitIter<'a, T>
where
    T: PackingNumeric,
{
    type Item = Decision<T>;

    fn next(&mut self) -> Option<Self::Item> {
        let loads = self.state.loads();

        while self.next_bin.get() < loads.len() {
            let bin_index = self.next_bin;
            self.next_bin = bin_index.next();

            let Some(decision) = Decision::try_existing(self.instance, self.state, bin_index)
            else {
                continue;
            };

            let load = loads[bin_index.get()];
            if self.symmetry_breaking && loads[..bin_index.get()].contains(&load) {
                *self.symmetry_skips += 1;
                continue;
            }

            return Some(decision);
        }

        if self.new_bin_done {
            return None;
        }
        self.new_bin_done = true;
        Decision::new_bin(self.instance, self.state)
    }
}

impl<'a, T> FusedIterator for FirstFitIter<'a, T> where T: PackingNumeric {}
