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

//! Large-item bound
//!
//! Items larger than half the capacity never share a bin with each other. A
//! remaining large item that fits into no open bin therefore needs a new bin
//! of its own, distinct from the new bin of any other such item.

use crate::{bound::estimator::BoundEstimator, state::SearchState};
use stowage_core::num::PackingNumeric;
use stowage_model::instance::{Instance, is_large};

/// Counts the remaining large items that fit into none of the open bins.
///
/// `remaining_sizes` must be in non-increasing order, so that the large
/// items form a prefix.
pub fn large_item_bound<T>(remaining_sizes: &[T], open_loads: &[T], capacity: T) -> usize
where
    T: PackingNumeric,
{
    let max_residual = open_loads
        .iter()
        .map(|&load| capacity.saturating_sub_val(load))
        .max()
        .unwrap_or(T::ZERO);

    remaining_sizes
        .iter()
        .take_while(|&&size| is_large(size, capacity))
        .filter(|&&size| size > max_residual)
        .count()
}

/// `BoundEstimator` counting large items without a home among the open bins.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub struct LargeItemBound;

impl LargeItemBound {
    #[inline]
    pub fn new() -> Self {
        Self
    }
}

impl<T> BoundEstimator<T> for LargeItemBound
where
    T: PackingNumeric,
{
    fn name(&self) -> &str {
        "LargeItemBound"
    }

    #[inline]
    fn additional_bins(&mut self, instance: &Instance<T>, state: &SearchState<T>) -> usize {
        let Some(next) = state.next_item() else {
            return 0;
        };
        large_item_bound(
            instance.remaining_sizes(next),
            state.loads(),
            instance.capacity(),
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use stowage_model::index::BinIndex;

    #[test]
    fn test_counts_large_items_without_open_bins() {
        assert_eq!(large_item_bound(&[9i64, 8, 7, 6, 5, 2], &[], 10), 4);
        assert_eq!(large_item_bound::<i64>(&[], &[], 10), 0);
    }

    #[test]
    fn test_large_items_fitting_open_bins_are_not_counted() {
        // Max residual 8 takes any 6.
        assert_eq!(large_item_bound(&[6i64, 6, 6], &[2, 2], 10), 0);
        // Max residual 6 is too small for a 7.
        assert_eq!(large_item_bound(&[7i64, 7, 7], &[4], 10), 3);
        assert_eq!(large_item_bound(&[7i64, 6], &[4], 10), 1);
    }

    #[test]
    fn test_estimator_reads_state() {
        let instance = Instance::new(vec![7i64, 7, 7, 4], 10).unwrap();
        let mut state = SearchState::new(&instance);
        let mut bound = LargeItemBound::new();
        assert_eq!(bound.additional_bins(&instance, &state), 3);

        state.assign_next(BinIndex::new(0), 7);
        assert_eq!(bound.additional_bins(&instance, &state), 2);
        assert_eq!(BoundEstimator::<i64>::name(&bound), "LargeItemBound");
    }
}
