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

//! Volume bound
//!
//! The remaining size has to go somewhere. Open bins absorb at most their
//! residual capacity, everything else needs new bins:
//!
//! `additional = ceil((remaining - usable residual) / capacity)`
//!
//! An open bin whose residual is smaller than the smallest remaining item
//! can take none of them, so its residual does not count as usable.

use crate::{bound::estimator::BoundEstimator, state::SearchState};
use num_traits::ToPrimitive;
use stowage_core::num::{PackingNumeric, div_ceil_positive};
use stowage_model::instance::Instance;

/// Computes the volume bound from the aggregate remaining size, the size of
/// the smallest remaining item and the loads of the open bins.
pub fn volume_bound<T>(
    remaining_size: T,
    smallest_remaining: Option<T>,
    open_loads: &[T],
    capacity: T,
) -> usize
where
    T: PackingNumeric,
{
    let Some(smallest) = smallest_remaining else {
        return 0;
    };

    let usable = open_loads
        .iter()
        .map(|&load| capacity.saturating_sub_val(load))
        .filter(|&residual| residual >= smallest)
        .fold(T::ZERO, |acc, residual| acc.saturating_add_val(residual));

    let excess = remaining_size.saturating_sub_val(usable);
    div_ceil_positive(excess, capacity)
        .and_then(|bins| bins.to_usize())
        .unwrap_or(usize::MAX)
}

/// `BoundEstimator` for the volume bound with the incompatible-bin
/// refinement.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub struct VolumeBound;

impl VolumeBound {
    #[inline]
    pub fn new() -> Self {
        Self
    }
}

impl<T> BoundEstimator<T> for VolumeBound
where
    T: PackingNumeric,
{
    fn name(&self) -> &str {
        "VolumeBound"
    }

    #[inline]
    fn additional_bins(&mut self, instance: &Instance<T>, state: &SearchState<T>) -> usize {
        let Some(next) = state.next_item() else {
            return 0;
        };
        let smallest = instance.remaining_sizes(next).last().copied();
        volume_bound(
            state.remaining_size(),
            smallest,
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
    fn test_empty_state_is_ceil_of_total() {
        assert_eq!(volume_bound(37i64, Some(2), &[], 10), 4);
        assert_eq!(volume_bound(40i64, Some(2), &[], 10), 4);
        assert_eq!(volume_bound(0i64, None, &[3], 10), 0);
    }

    #[test]
    fn test_usable_residual_reduces_bound() {
        // Residual 5 absorbs the smallest item, 7 - 5 = 2 needs one more bin.
        assert_eq!(volume_bound(7i64, Some(3), &[5], 10), 1);
        // Everything fits into the open bins.
        assert_eq!(volume_bound(6i64, Some(3), &[5, 7], 10), 0);
    }

    #[test]
    fn test_incompatible_bins_are_excluded() {
        // Residual 1 cannot take the smallest item of size 2.
        assert_eq!(volume_bound(28i64, Some(2), &[9], 10), 3);
        assert_eq!(volume_bound(11i64, Some(2), &[9, 9], 10), 2);
        // Same loads, but now the residuals take the smallest item.
        assert_eq!(volume_bound(11i64, Some(1), &[9, 9], 10), 1);
    }

    #[test]
    fn test_estimator_reads_state() {
        let instance = Instance::new(vec![9i64, 8, 2, 7, 6, 5], 10).unwrap();
        let mut state = SearchState::new(&instance);
        let mut bound = VolumeBound::new();
        assert_eq!(bound.additional_bins(&instance, &state), 4);

        state.assign_next(BinIndex::new(0), 9);
        // 28 left, residual 1 is unusable.
        assert_eq!(bound.additional_bins(&instance, &state), 3);
        assert_eq!(bound.lower_bound(&instance, &state), 4);
    }
}
