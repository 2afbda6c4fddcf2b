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

use crate::state::SearchState;
use stowage_core::num::PackingNumeric;
use stowage_model::{
    index::{BinIndex, ItemIndex},
    instance::Instance,
};
use std::iter::FusedIterator;

/// A decision to place an item into a bin, carrying everything the engine
/// needs to apply it.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub struct Decision<T> {
    size: T,
    item_index: ItemIndex,
    bin_index: BinIndex,
    opens_bin: bool,
}

impl<T> std::fmt::Display for Decision<T>
where
    T: std::fmt::Display,
{
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "Decision(item: {}, bin: {}, size: {}, opens_bin: {})",
            self.item_index, self.bin_index, self.size, self.opens_bin
        )
    }
}

impl<T> Decision<T>
where
    T: PackingNumeric,
{
    /// Tries to create the decision of placing the next item of `state` into
    /// the open bin `bin_index`. Returns `None` if the item does not fit or
    /// the state is complete.
    #[inline]
    pub fn try_existing(
        instance: &Instance<T>,
        state: &SearchState<T>,
        bin_index: BinIndex,
    ) -> Option<Self> {
        let item_index = state.next_item()?;
        let size = instance.item_size(item_index);
        if size > state.residual(bin_index) {
            return None;
        }

        Some(Self {
            size,
            item_index,
            bin_index,
            opens_bin: false,
        })
    }

    /// Creates the decision of placing the next item of `state` into a new
    /// bin. Returns `None` if the state is complete.
    #[inline]
    pub fn new_bin(instance: &Instance<T>, state: &SearchState<T>) -> Option<Self> {
        let item_index = state.next_item()?;
        Some(Self {
            size: instance.item_size(item_index),
            item_index,
            bin_index: BinIndex::new(state.num_bins()),
            opens_bin: true,
        })
    }

    /// Returns the size of the placed item.
    #[inline(always)]
    pub const fn size(&self) -> T {
        self.size
    }

    /// Returns the index of the placed item.
    #[inline(always)]
    pub const fn item_index(&self) -> ItemIndex {
        self.item_index
    }

    /// Returns the target bin.
    #[inline(always)]
    pub const fn bin_index(&self) -> BinIndex {
        self.bin_index
    }

    /// Returns `true` if the decision opens a new bin.
    #[inline(always)]
    pub const fn opens_bin(&self) -> bool {
        self.opens_bin
    }
}

/// Generates the children of a search node.
///
/// Implementations yield decisions for the next unplaced item of the state
/// in the order the engine should explore them.
pub trait DecisionBuilder<T>
where
    T: PackingNumeric,
{
    type DecisionIterator<'a>: Iterator<Item = Decision<T>> + FusedIterator + 'a
    where
        Self: 'a,
        T: 'a;

    fn name(&self) -> &str;

    fn next_decision<'a>(
        &'a mut self,
        instance: &'a Instance<T>,
        state: &'a SearchState<T>,
    ) -> Self::DecisionIterator<'a>;

    /// Returns the number of children discarded as symmetric since creation.
    fn symmetry_skips(&self) -> u64 {
        0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_try_existing_respects_residual() {
        let instance = Instance::new(vec![6i64, 5, 4], 10).unwrap();
        let mut state = SearchState::new(&instance);
        state.assign_next(BinIndex::new(0), 6);

        assert!(Decision::try_existing(&instance, &state, BinIndex::new(0)).is_none());
        state.assign_next(BinIndex::new(1), 5);
        let d = Decision::try_existing(&instance, &state, BinIndex::new(0)).unwrap();
        assert_eq!(d.item_index(), ItemIndex::new(2));
        assert_eq!(d.size(), 4);
        assert!(!d.opens_bin());
    }

    #[test]
    fn test_new_bin_targets_next_bin_number() {
        let instance = Instance::new(vec![6i64, 5], 10).unwrap();
        let mut state = SearchState::new(&instance);
        let first = Decision::new_bin(&instance, &state).unwrap();
        assert_eq!(first.bin_index(), BinIndex::new(0));
        assert!(first.opens_bin());

        state.assign_next(first.bin_index(), first.size());
        let second = Decision::new_bin(&instance, &state).unwrap();
        assert_eq!(second.bin_index(), BinIndex::new(1));

        state.assign_next(second.bin_index(), second.size());
        assert!(Decision::new_bin(&instance, &state).is_none());
    }

    #[test]
    fn test_display() {
        let instance = Instance::new(vec![3i64], 10).unwrap();
        let state = SearchState::new(&instance);
        let d = Decision::new_bin(&instance, &state).unwrap();
        assert_eq!(
            format!("{}", d),
            "Decision(item: ItemIndex(0), bin: BinIndex(0), size: 3, opens_bin: true)"
        );
    }
}
