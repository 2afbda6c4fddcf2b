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

//! Search state management for the branch-and-bound engine.
//!
//! `SearchState` is the mutable node of the search tree. Item `i` is decided
//! at depth `i`, so the state is a prefix of bin assignments in canonical
//! item order, the loads of the bins opened so far and the size still left
//! to place. The engine mutates it in place and restores it through the
//! `SearchTrail`; states are never shared between sessions.
//!
//! Invariants (debug-checked):
//! - `depth <= num_items`
//! - every load is positive and at most the capacity
//! - `remaining_size` equals the total size of the items at `depth..`

use stowage_core::num::PackingNumeric;
use stowage_model::{
    index::{BinIndex, ItemIndex},
    instance::Instance,
    packing::Packing,
};
use thiserror::Error;

/// A compact, mutable container holding one node of the search.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SearchState<T> {
    assignments: Vec<BinIndex>,
    loads: Vec<T>,
    capacity: T,
    remaining_size: T,
    depth: usize,
}

impl<T> SearchState<T>
where
    T: PackingNumeric,
{
    /// Creates the root state of `instance`: no item placed, no bin open.
    #[inline]
    pub fn new(instance: &Instance<T>) -> Self {
        let num_items = instance.num_items();
        Self {
            assignments: vec![BinIndex::new(0); num_items],
            loads: Vec::with_capacity(num_items),
            capacity: instance.capacity(),
            remaining_size: instance.total_size(),
            depth: 0,
        }
    }

    /// Returns the number of items of the instance.
    #[inline]
    pub fn num_items(&self) -> usize {
        self.assignments.len()
    }

    /// Returns the number of items placed so far.
    #[inline]
    pub fn depth(&self) -> usize {
        self.depth
    }

    /// Returns `true` once every item is placed.
    #[inline]
    pub fn is_complete(&self) -> bool {
        self.depth == self.num_items()
    }

    /// Returns the item decided next, if any.
    #[inline]
    pub fn next_item(&self) -> Option<ItemIndex> {
        (!self.is_complete()).then(|| ItemIndex::new(self.depth))
    }

    /// Returns the number of bins opened so far.
    #[inline]
    pub fn num_bins(&self) -> usize {
        self.loads.len()
    }

    /// Returns the loads of the open bins in opening order.
    #[inline]
    pub fn loads(&self) -> &[T] {
        &self.loads
    }

    /// Returns the load of an open bin.
    ///
    /// # Panics
    ///
    /// Panics if `bin_index` is not an open bin.
    #[inline]
    pub fn load(&self, bin_index: BinIndex) -> T {
        let index = bin_index.get();
        debug_assert!(
            index < self.num_bins(),
            "called `SearchState::load` with bin index out of bounds: the len is {} but the index is {}",
            self.num_bins(),
            index
        );

        self.loads[index]
    }

    /// Returns the free capacity of an open bin.
    #[inline]
    pub fn residual(&self, bin_index: BinIndex) -> T {
        self.capacity.saturating_sub_val(self.load(bin_index))
    }

    /// Returns the bin capacity.
    #[inline]
    pub fn capacity(&self) -> T {
        self.capacity
    }

    /// Returns the total size of the items not placed yet.
    #[inline]
    pub fn remaining_size(&self) -> T {
        self.remaining_size
    }

    /// Returns the bin of every placed item, in canonical order.
    #[inline]
    pub fn assignments(&self) -> &[BinIndex] {
        &self.assignments[..self.depth]
    }

    /// Places the next item of `size` into `bin_index`. If `bin_index` equals
    /// the number of open bins, a new bin is opened for it.
    ///
    /// # Panics
    ///
    /// In debug builds, panics if the state is complete, if `bin_index` skips
    /// a bin number or if the bin would overflow.
    #[inline]
    pub fn assign_next(&mut self, bin_index: BinIndex, size: T) {
        debug_assert!(
            !self.is_complete(),
            "called `SearchState::assign_next` on a complete state with {} items",
            self.num_items()
        );
        debug_assert!(
            bin_index.get() <= self.num_bins(),
            "called `SearchState::assign_next` with bin {} but only {} bins are open",
            bin_index,
            self.num_bins()
        );

        let index = bin_index.get();
        if index == self.loads.len() {
            self.loads.push(size);
        } else {
            self.loads[index] = self.loads[index].saturating_add_val(size);
        }

        debug_assert!(
            self.loads[index] <= self.capacity,
            "called `SearchState::assign_next` overflowing {}: load {} exceeds capacity {}",
            bin_index,
            self.loads[index],
            self.capacity
        );

        self.assignments[self.depth] = bin_index;
        self.remaining_size = self.remaining_size.saturating_sub_val(size);
        self.depth += 1;
    }

    /// Removes the most recently placed item of `size`. If `closes_bin` is
    /// set, the item was alone in the last bin, which is closed again.
    ///
    /// # Panics
    ///
    /// In debug builds, panics if no item is placed.
    #[inline]
    pub fn unassign_last(&mut self, size: T, closes_bin: bool) {
        debug_assert!(
            self.depth > 0,
            "called `SearchState::unassign_last` on a state without placed items"
        );

        self.depth -= 1;
        let bin_index = self.assignments[self.depth];
        if closes_bin {
            debug_assert_eq!(
                bin_index.get() + 1,
                self.loads.len(),
                "called `SearchState::unassign_last` closing a bin that is not the last one"
            );
            self.loads.pop();
        } else {
            let load = &mut self.loads[bin_index.get()];
            *load = load.saturating_sub_val(size);
        }
        self.remaining_size = self.remaining_size.saturating_add_val(size);
    }
}

/// The error returned when converting a state that still has unplaced items.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
#[error("search state is incomplete: {placed} of {total} items placed")]
pub struct IncompleteSolutionError {
    pub placed: usize,
    pub total: usize,
}

impl<T> TryFrom<&SearchState<T>> for Packing<T>
where
    T: PackingNumeric,
{
    type Error = IncompleteSolutionError;

    fn try_from(state: &SearchState<T>) -> Result<Self, Self::Error> {
        if !state.is_complete() {
            return Err(IncompleteSolutionError {
                placed: state.depth(),
                total: state.num_items(),
            });
        }

        Ok(Packing::new(state.assignments.clone(), state.loads.clone()))
    }
}

impl<T> std::fmt::Display for SearchState<T>
where
    T: PackingNumeric,
{
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "SearchState(depth: {}/{}, bins: {}, remaining: {})",
            self.depth,
            self.num_items(),
            self.num_bins(),
            self.remaining_size
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn bi(i: usize) -> BinIndex {
        BinIndex::new(i)
    }

    fn instance() -> Instance<i64> {
        Instance::new(vec![6, 4, 3], 10).unwrap()
    }

    #[test]
    fn test_new_state_is_root() {
        let state = SearchState::new(&instance());
        assert_eq!(state.depth(), 0);
        assert_eq!(state.num_bins(), 0);
        assert_eq!(state.remaining_size(), 13);
        assert_eq!(state.next_item(), Some(ItemIndex::new(0)));
        assert!(!state.is_complete());
    }

    #[test]
    fn test_assign_and_unassign_restore_state() {
        let mut state = SearchState::new(&instance());
        let root = state.clone();

        state.assign_next(bi(0), 6);
        state.assign_next(bi(0), 4);
        state.assign_next(bi(1), 3);
        assert!(state.is_complete());
        assert_eq!(state.loads(), &[10, 3]);
        assert_eq!(state.residual(bi(0)), 0);
        assert_eq!(state.remaining_size(), 0);
        assert_eq!(state.assignments(), &[bi(0), bi(0), bi(1)]);

        state.unassign_last(3, true);
        state.unassign_last(4, false);
        state.unassign_last(6, true);
        assert_eq!(state.depth(), 0);
        assert_eq!(state.loads(), root.loads());
        assert_eq!(state.remaining_size(), root.remaining_size());
    }

    #[test]
    fn test_try_from_complete_state() {
        let instance = instance();
        let mut state = SearchState::new(&instance);
        state.assign_next(bi(0), 6);
        state.assign_next(bi(0), 4);
        state.assign_next(bi(1), 3);

        let packing = Packing::try_from(&state).unwrap();
        assert_eq!(packing.num_bins(), 2);
        assert!(packing.validate(&instance).is_ok());
    }

    #[test]
    fn test_try_from_incomplete_state_fails() {
        let mut state = SearchState::new(&instance());
        state.assign_next(bi(0), 6);
        let err = Packing::try_from(&state).unwrap_err();
        assert_eq!(err, IncompleteSolutionError { placed: 1, total: 3 });
    }

    #[test]
    #[should_panic]
    #[cfg(debug_assertions)]
    fn test_assign_beyond_capacity_panics_in_debug() {
        let mut state = SearchState::new(&instance());
        state.assign_next(bi(0), 6);
        state.assign_next(bi(0), 6);
    }
}
