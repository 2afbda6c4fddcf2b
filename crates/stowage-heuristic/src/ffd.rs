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

//! First-fit-decreasing.
//!
//! Items are offered in canonical order, which already is non-increasing
//! size. Each item goes into the first open bin, in opening order, whose
//! residual capacity admits it, or into a newly opened bin. The scan is
//! `O(items x bins)`.

use stowage_core::num::PackingNumeric;
use stowage_model::{
    index::{BinIndex, ItemIndex},
    instance::Instance,
    packing::Packing,
};

/// Packs `instance` with first-fit-decreasing.
///
/// The result is deterministic for a given instance and never uses more
/// than `11/9 OPT + 6/9` bins.
///
/// # Examples
///
/// ```rust
/// # use stowage_model::instance::Instance;
/// # use stowage_heuristic::first_fit_decreasing;
/// let instance = Instance::new(vec![5i64, 5, 5, 5], 10).unwrap();
/// let packing = first_fit_decreasing(&instance);
/// assert_eq!(packing.num_bins(), 2);
/// ```
pub fn first_fit_decreasing<T>(instance: &Instance<T>) -> Packing<T>
where
    T: PackingNumeric,
{
    let capacity = instance.capacity();
    let mut bins: Vec<BinIndex> = Vec::with_capacity(instance.num_items());
    let mut loads: Vec<T> = Vec::new();

    for item in ItemIndex::range(instance.num_items()) {
        let size = instance.item_size(item);
        let target = loads
            .iter()
            .position(|&load| fits(load, size, capacity));

        let bin = match target {
            Some(bin) => {
                loads[bin] = loads[bin].saturating_add_val(size);
                BinIndex::new(bin)
            }
            None => {
                loads.push(size);
                BinIndex::new(loads.len() - 1)
            }
        };
        bins.push(bin);

        debug_assert!(
            loads[bin.get()] <= capacity,
            "first fit placed {} into {} beyond capacity",
            item,
            bin
        );
    }

    Packing::new(bins, loads)
}

/// Returns `true` if an item of `size` fits into a bin of `load`.
#[inline(always)]
fn fits<T>(load: T, size: T, capacity: T) -> bool
where
    T: PackingNumeric,
{
    // load <= capacity, so capacity - load never overflows.
    size <= capacity.saturating_sub_val(load)
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::{Rng, SeedableRng, rngs::StdRng};

    #[test]
    fn test_ffd_basic_scenario() {
        // Canonical order 9, 8, 7, 6, 5, 2: the 2 joins the 8.
        let instance = Instance::new(vec![9i64, 8, 2, 7, 6, 5], 10).unwrap();
        let packing = first_fit_decreasing(&instance);

        assert_eq!(packing.num_bins(), 5);
        assert_eq!(packing.loads(), &[9, 10, 7, 6, 5]);
        assert!(packing.validate(&instance).is_ok());
    }

    #[test]
    fn test_ffd_full_items_each_take_a_bin() {
        let instance = Instance::new(vec![10i64; 5], 10).unwrap();
        let packing = first_fit_decreasing(&instance);
        assert_eq!(packing.num_bins(), 5);
    }

    #[test]
    fn test_ffd_empty_instance() {
        let instance = Instance::new(Vec::<i64>::new(), 10).unwrap();
        let packing = first_fit_decreasing(&instance);
        assert_eq!(packing.num_bins(), 0);
        assert!(packing.validate(&instance).is_ok());
    }

    #[test]
    fn test_ffd_prefers_first_bin_with_room() {
        // 6 and 5 cannot share a bin; 4 completes bin 0 and 3 joins the 5.
        let instance = Instance::new(vec![6i64, 5, 4, 3], 10).unwrap();
        let packing = first_fit_decreasing(&instance);
        assert_eq!(
            packing.bins(),
            &[
                BinIndex::new(0),
                BinIndex::new(1),
                BinIndex::new(0),
                BinIndex::new(1)
            ]
        );
        assert_eq!(packing.loads(), &[10, 8]);
    }

    #[test]
    fn test_ffd_is_suboptimal_on_known_instance() {
        // FFD: [5 4] [4 3 3] [3 3 3] [2]. Three full bins exist:
        // [5 3 2] [4 3 3] [4 3 3].
        let instance = Instance::new(vec![5i64, 4, 4, 3, 3, 3, 3, 3, 2], 10).unwrap();
        let packing = first_fit_decreasing(&instance);
        assert!(packing.validate(&instance).is_ok());
        assert_eq!(packing.num_bins(), 4);
        assert_eq!(packing.loads(), &[9, 10, 9, 2]);
    }

    #[test]
    fn test_ffd_random_instances_are_valid_and_bounded() {
        let mut rng = StdRng::seed_from_u64(42);
        for _ in 0..100 {
            let len: usize = rng.random_range(1..60);
            let sizes: Vec<i64> = (0..len).map(|_| rng.random_range(1..=100)).collect();
            let instance = Instance::new(sizes, 100).unwrap();
            let packing = first_fit_decreasing(&instance);

            assert!(packing.validate(&instance).is_ok());
            let volume = (instance.total_size() + 99) / 100;
            assert!(packing.num_bins() as i64 >= volume);
            assert!(packing.num_bins() <= instance.num_items());
        }
    }
}
