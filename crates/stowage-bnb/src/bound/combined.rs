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
    bound::{
        estimator::BoundEstimator, large_item::large_item_bound, volume::volume_bound,
    },
    state::SearchState,
};
use stowage_core::num::PackingNumeric;
use stowage_model::instance::Instance;

/// Returns the number of additional bins any completion must open, given
/// the remaining item sizes in non-increasing order, the loads of the open
/// bins and the capacity.
///
/// This is the maximum of the volume bound and the large-item bound. Both
/// are admissible, so is their maximum.
///
/// # Examples
///
/// ```rust
/// # use stowage_bnb::bound::lower_bound;
/// assert_eq!(lower_bound(&[9i64, 8, 7, 6, 5, 2], &[], 10), 4);
/// assert_eq!(lower_bound(&[7i64, 7, 7], &[4], 10), 3);
/// assert_eq!(lower_bound::<i64>(&[], &[3, 4], 10), 0);
/// ```
pub fn lower_bound<T>(remaining_sizes: &[T], open_loads: &[T], capacity: T) -> usize
where
    T: PackingNumeric,
{
    let remaining_size = remaining_sizes
        .iter()
        .fold(T::ZERO, |acc, &size| acc.saturating_add_val(size));
    let smallest = remaining_sizes.iter().min().copied();

    volume_bound(remaining_size, smallest, open_loads, capacity).max(large_item_bound(
        remaining_sizes,
        open_loads,
        capacity,
    ))
}

/// Returns the lower bound on the bin count of any packing of `instance`:
/// `max(ceil(total / capacity), number of large items)`.
#[inline]
pub fn root_lower_bound<T>(instance: &Instance<T>) -> usize
where
    T: PackingNumeric,
{
    CombinedBound::new().additional_bins(instance, &SearchState::new(instance))
}

/// `BoundEstimator` taking the maximum of `VolumeBound` and `LargeItemBound`.
/// This is the default of the engine.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub struct CombinedBound;

impl CombinedBound {
    #[inline]
    pub fn new() -> Self {
        Self
    }
}

impl<T> BoundEstimator<T> for CombinedBound
where
    T: PackingNumeric,
{
    fn name(&self) -> &str {
        "CombinedBound"
    }

    #[inline]
    fn additional_bins(&mut self, instance: &Instance<T>, state: &SearchState<T>) -> usize {
        let Some(next) = state.next_item() else {
            return 0;
        };
        let remaining = instance.remaining_sizes(next);
        let capacity = instance.capacity();

        let volume = volume_bound(
            state.remaining_size(),
            remaining.last().copied(),
            state.loads(),
            capacity,
        );
        volume.max(large_item_bound(remaining, state.loads(), capacity))
    }
}
