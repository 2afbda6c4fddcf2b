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

//! Validated bin packing instances.
//!
//! An `Instance` owns the item sizes in canonical order: non-increasing size,
//! ties broken by ascending input position. Every consumer relies on that
//! order, the heuristic for its "decreasing" part and the exact search for
//! its depth-to-item mapping, so it is established once here.

use crate::index::{ItemId, ItemIndex};
use stowage_core::num::PackingNumeric;
use thiserror::Error;

/// Why a set of sizes and a capacity do not form a packable instance.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum InvalidInstance<T>
where
    T: std::fmt::Debug + std::fmt::Display,
{
    /// The bin capacity is zero or negative.
    #[error("bin capacity must be positive, got {capacity}")]
    NonPositiveCapacity { capacity: T },
    /// An item has a zero or negative size.
    #[error("item {item} has non-positive size {size}")]
    NonPositiveSize { item: ItemId, size: T },
    /// An item does not fit into an empty bin.
    #[error("item {item} has size {size} which exceeds the bin capacity {capacity}")]
    OversizedItem { item: ItemId, size: T, capacity: T },
    /// The sum of all item sizes is not representable in the numeric type.
    #[error("total item size overflows the numeric type")]
    TotalSizeOverflow,
}

/// A single item: where it came from and how large it is.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Item<T> {
    pub id: ItemId,
    pub size: T,
}

/// An immutable, validated bin packing instance.
///
/// Items are stored as structure of arrays, indexed by `ItemIndex` in
/// canonical order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Instance<T> {
    capacity: T,
    item_sizes: Vec<T>,
    item_ids: Vec<ItemId>,
    total_size: T,
    large_item_count: usize,
}

impl<T> Instance<T>
where
    T: PackingNumeric,
{
    /// Builds an instance from sizes given in input order.
    ///
    /// Fails without side effects if the capacity is not positive, if any size
    /// is not positive or exceeds the capacity, or if the total size overflows.
    ///
    /// # Examples
    ///
    /// ```rust
    /// # use stowage_model::instance::Instance;
    /// # use stowage_model::index::ItemIndex;
    /// let instance = Instance::new(vec![3i64, 7, 5], 10).unwrap();
    /// assert_eq!(instance.item_sizes(), &[7, 5, 3]);
    /// assert_eq!(instance.item_id(ItemIndex::new(0)).get(), 1);
    /// assert_eq!(instance.total_size(), 15);
    /// ```
    pub fn new<I>(sizes: I, capacity: T) -> Result<Self, InvalidInstance<T>>
    where
        I: IntoIterator<Item = T>,
    {
        if capacity <= T::ZERO {
            return Err(InvalidInstance::NonPositiveCapacity { capacity });
        }

        let mut items: Vec<Item<T>> = Vec::new();
        let mut total_size = T::ZERO;
        for (position, size) in sizes.into_iter().enumerate() {
            let id = ItemId::new(position);
            if size <= T::ZERO {
                return Err(InvalidInstance::NonPositiveSize { item: id, size });
            }
            if size > capacity {
                return Err(InvalidInstance::OversizedItem {
                    item: id,
                    size,
                    capacity,
                });
            }
            total_size = total_size
                .checked_add_val(size)
                .ok_or(InvalidInstance::TotalSizeOverflow)?;
            items.push(Item { id, size });
        }

        // Stable sort keeps ties in input order.
        items.sort_by(|a, b| b.size.cmp(&a.size));

        let large_item_count = items
            .iter()
            .filter(|item| is_large(item.size, capacity))
            .count();

        Ok(Self {
            capacity,
            item_sizes: items.iter().map(|item| item.size).collect(),
            item_ids: items.iter().map(|item| item.id).collect(),
            total_size,
            large_item_count,
        })
    }

    /// Returns the capacity shared by every bin.
    #[inline]
    pub fn capacity(&self) -> T {
        self.capacity
    }

    /// Returns the number of items.
    #[inline]
    pub fn num_items(&self) -> usize {
        self.item_sizes.len()
    }

    /// Returns `true` if the instance has no items.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.item_sizes.is_empty()
    }

    /// Returns the sum of all item sizes.
    #[inline]
    pub fn total_size(&self) -> T {
        self.total_size
    }

    /// Returns the number of items strictly larger than half the capacity.
    /// No two of them fit into the same bin.
    #[inline]
    pub fn large_item_count(&self) -> usize {
        self.large_item_count
    }

    /// Returns all item sizes in canonical order.
    #[inline]
    pub fn item_sizes(&self) -> &[T] {
        &self.item_sizes
    }

    /// Returns all item identifiers in canonical order.
    #[inline]
    pub fn item_ids(&self) -> &[ItemId] {
        &self.item_ids
    }

    /// Returns the size of an item.
    ///
    /// # Panics
    ///
    /// Panics if `item_index` is out of bounds.
    #[inline]
    pub fn item_size(&self, item_index: ItemIndex) -> T {
        let index = item_index.get();
        debug_assert!(
            index < self.num_items(),
            "called `Instance::item_size` with item index out of bounds: the len is {} but the index is {}",
            self.num_items(),
            index
        );

        self.item_sizes[index]
    }

    /// Returns the input position of an item.
    ///
    /// # Panics
    ///
    /// Panics if `item_index` is out of bounds.
    #[inline]
    pub fn item_id(&self, item_index: ItemIndex) -> ItemId {
        let index = item_index.get();
        debug_assert!(
            index < self.num_items(),
            "called `Instance::item_id` with item index out of bounds: the len is {} but the index is {}",
            self.num_items(),
            index
        );

        self.item_ids[index]
    }

    /// Returns the item at `item_index`.
    #[inline]
    pub fn item(&self, item_index: ItemIndex) -> Item<T> {
        Item {
            id: self.item_id(item_index),
            size: self.item_size(item_index),
        }
    }

    /// Iterates over the items in canonical order.
    #[inline]
    pub fn items(&self) -> impl ExactSizeIterator<Item = Item<T>> + '_ {
        self.item_ids
            .iter()
            .zip(self.item_sizes.iter())
            .map(|(&id, &size)| Item { id, size })
    }

    /// Returns the sizes of the items from `item_index` to the end, in
    /// canonical order. The last element, if any, is the smallest.
    #[inline]
    pub fn remaining_sizes(&self, item_index: ItemIndex) -> &[T] {
        &self.item_sizes[item_index.get().min(self.num_items())..]
    }
}

/// Returns `true` if no two items of `size` share a bin of `capacity`.
#[inline]
pub fn is_large<T>(size: T, capacity: T) -> bool
where
    T: PackingNumeric,
{
    // size > capacity / 2 without rounding: 2 * size > capacity.
    match size.checked_add_val(size) {
        Some(doubled) => doubled > capacity,
        None => true,
    }
}

impl<T> std::fmt::Display for Instance<T>
where
    T: PackingNumeric,
{
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "Instance(items: {}, capacity: {}, total size: {})",
            self.num_items(),
            self.capacity,
            self.total_size
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::{Rng, SeedableRng, rngs::StdRng};

    #[test]
    fn test_new_sorts_non_increasing_with_stable_ties() {
        let instance = Instance::new(vec![4i64, 9, 4, 2, 9], 10).unwrap();
        assert_eq!(instance.item_sizes(), &[9, 9, 4, 4, 2]);
        let ids: Vec<usize> = instance.item_ids().iter().map(|id| id.get()).collect();
        assert_eq!(ids, vec![1, 4, 0, 2, 3]);
    }

    #[test]
    fn test_new_rejects_oversized_item() {
        let err = Instance::new(vec![3i64, 11, 2], 10).unwrap_err();
        assert_eq!(
            err,
            InvalidInstance::OversizedItem {
                item: ItemId::new(1),
                size: 11,
                capacity: 10
            }
        );
    }

    #[test]
    fn test_new_rejects_non_positive_capacity() {
        assert_eq!(
            Instance::new(vec![1i32], 0).unwrap_err(),
            InvalidInstance::NonPositiveCapacity { capacity: 0 }
        );
        assert_eq!(
            Instance::new(Vec::<i32>::new(), -5).unwrap_err(),
            InvalidInstance::NonPositiveCapacity { capacity: -5 }
        );
    }

    #[test]
    fn test_new_rejects_non_positive_size() {
        let err = Instance::new(vec![5i32, 0], 10).unwrap_err();
        assert_eq!(
            err,
            InvalidInstance::NonPositiveSize {
                item: ItemId::new(1),
                size: 0
            }
        );
        assert!(matches!(
            Instance::new(vec![-1i32], 10),
            Err(InvalidInstance::NonPositiveSize { .. })
        ));
    }

    #[test]
    fn test_new_rejects_total_size_overflow() {
        let err = Instance::new(vec![100i8, 100], 100).unwrap_err();
        assert_eq!(err, InvalidInstance::TotalSizeOverflow);
    }

    #[test]
    fn test_empty_instance_is_valid() {
        let instance = Instance::new(Vec::<i64>::new(), 10).unwrap();
        assert!(instance.is_empty());
        assert_eq!(instance.total_size(), 0);
        assert_eq!(instance.large_item_count(), 0);
        assert!(instance.remaining_sizes(ItemIndex::new(0)).is_empty());
    }

    #[test]
    fn test_large_item_count_uses_strict_half() {
        // 5 is exactly half of 10 and two of them share a bin.
        let instance = Instance::new(vec![9i64, 8, 2, 7, 6, 5], 10).unwrap();
        assert_eq!(instance.large_item_count(), 4);
        assert!(is_large(6i64, 11));
        assert!(!is_large(5i64, 11));
        assert!(is_large(i8::MAX, i8::MAX));
    }

    #[test]
    fn test_item_accessors_and_remaining_sizes() {
        let instance = Instance::new(vec![2i64, 8, 5], 10).unwrap();
        let first = instance.item(ItemIndex::new(0));
        assert_eq!(first.size, 8);
        assert_eq!(first.id, ItemId::new(1));
        assert_eq!(instance.remaining_sizes(ItemIndex::new(1)), &[5, 2]);
        assert!(instance.remaining_sizes(ItemIndex::new(3)).is_empty());
        assert_eq!(instance.items().len(), 3);
    }

    #[test]
    fn test_random_instances_keep_canonical_order() {
        let mut rng = StdRng::seed_from_u64(7);
        for _ in 0..50 {
            let len = rng.random_range(0..40);
            let sizes: Vec<i64> = (0..len).map(|_| rng.random_range(1..=100)).collect();
            let instance = Instance::new(sizes.clone(), 100).unwrap();

            assert_eq!(instance.total_size(), sizes.iter().sum::<i64>());
            for window in instance.item_sizes().windows(2) {
                assert!(window[0] >= window[1]);
            }
            for item in instance.items() {
                assert_eq!(sizes[item.id.get()], item.size);
            }
        }
    }

    #[test]
    fn test_display() {
        let instance = Instance::new(vec![3i64, 4], 10).unwrap();
        assert_eq!(
            format!("{}", instance),
            "Instance(items: 2, capacity: 10, total size: 7)"
        );
    }
}
