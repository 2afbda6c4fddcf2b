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
    index::{BinIndex, ItemIndex},
    instance::Instance,
};
use stowage_core::num::PackingNumeric;
use thiserror::Error;

/// Reasons a `Packing` does not describe a valid packing of an `Instance`.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum PackingError<T>
where
    T: std::fmt::Debug + std::fmt::Display,
{
    #[error("packing assigns {found} items but the instance has {expected}")]
    ItemCountMismatch { expected: usize, found: usize },
    #[error("{item} is assigned to {bin} but only {num_bins} bins exist")]
    BinOutOfRange {
        item: ItemIndex,
        bin: BinIndex,
        num_bins: usize,
    },
    #[error("{bin} holds no items")]
    EmptyBin { bin: BinIndex },
    #[error("{bin} records load {recorded} but its items sum to {actual}")]
    LoadMismatch {
        bin: BinIndex,
        recorded: T,
        actual: T,
    },
    #[error("{bin} has load {load} which exceeds the capacity {capacity}")]
    CapacityExceeded {
        bin: BinIndex,
        load: T,
        capacity: T,
    },
    #[error("load of {bin} overflows the numeric type")]
    LoadOverflow { bin: BinIndex },
}

/// A packing of every item of an instance into bins.
///
/// This struct uses a Structure of Arrays (SoA) layout: `bins[i]` is the bin
/// of the item at `ItemIndex` `i` (canonical order) and `loads[b]` is the
/// load of bin `b`. Bins are numbered in the order they were opened and
/// reference items by index, never by copy.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct Packing<T> {
    bins: Vec<BinIndex>,
    loads: Vec<T>,
}

impl<T> Packing<T>
where
    T: PackingNumeric,
{
    /// Constructs a packing from per-item bins and per-bin loads without
    /// checking it against an instance. Use `validate` for that.
    #[inline]
    pub fn new(bins: Vec<BinIndex>, loads: Vec<T>) -> Self {
        debug_assert!(
            bins.iter().all(|bin| bin.get() < loads.len()),
            "called `Packing::new` with a bin index beyond the {} recorded loads",
            loads.len()
        );

        Self { bins, loads }
    }

    /// The packing of an instance without items.
    #[inline]
    pub fn empty() -> Self {
        Self {
            bins: Vec::new(),
            loads: Vec::new(),
        }
    }

    /// Builds a packing from per-item bins, deriving the loads from the
    /// instance, and validates the result.
    pub fn from_assignment(
        instance: &Instance<T>,
        bins: Vec<BinIndex>,
    ) -> Result<Self, PackingError<T>> {
        if bins.len() != instance.num_items() {
            return Err(PackingError::ItemCountMismatch {
                expected: instance.num_items(),
                found: bins.len(),
            });
        }

        let num_bins = bins.iter().map(|bin| bin.get() + 1).max().unwrap_or(0);
        let mut loads = vec![T::ZERO; num_bins];
        for (index, bin) in bins.iter().enumerate() {
            let load = &mut loads[bin.get()];
            *load = load
                .checked_add_val(instance.item_size(ItemIndex::new(index)))
                .ok_or(PackingError::LoadOverflow { bin: *bin })?;
        }

        let packing = Self { bins, loads };
        packing.validate(instance)?;
        Ok(packing)
    }

    /// Returns the number of bins used, the objective value of the packing.
    #[inline]
    pub fn num_bins(&self) -> usize {
        self.loads.len()
    }

    /// Returns the number of packed items.
    #[inline]
    pub fn num_items(&self) -> usize {
        self.bins.len()
    }

    /// Returns the bin holding an item.
    ///
    /// # Panics
    ///
    /// Panics if `item_index` is out of bounds.
    #[inline]
    pub fn bin_for_item(&self, item_index: ItemIndex) -> BinIndex {
        let index = item_index.get();
        debug_assert!(
            index < self.num_items(),
            "called `Packing::bin_for_item` with item index out of bounds: the len is {} but the index is {}",
            self.num_items(),
            index
        );

        self.bins[index]
    }

    /// Returns the load of a bin.
    ///
    /// # Panics
    ///
    /// Panics if `bin_index` is out of bounds.
    #[inline]
    pub fn load(&self, bin_index: BinIndex) -> T {
        let index = bin_index.get();
        debug_assert!(
            index < self.num_bins(),
            "called `Packing::load` with bin index out of bounds: the len is {} but the index is {}",
            self.num_bins(),
            index
        );

        self.loads[index]
    }

    /// Returns the bin of every item, indexed by `ItemIndex`.
    #[inline]
    pub fn bins(&self) -> &[BinIndex] {
        &self.bins
    }

    /// Returns the load of every bin, indexed by `BinIndex`.
    #[inline]
    pub fn loads(&self) -> &[T] {
        &self.loads
    }

    /// Iterates over the items of a bin in canonical order.
    #[inline]
    pub fn items_in_bin(&self, bin_index: BinIndex) -> impl Iterator<Item = ItemIndex> + '_ {
        self.bins
            .iter()
            .enumerate()
            .filter(move |(_, bin)| **bin == bin_index)
            .map(|(index, _)| ItemIndex::new(index))
    }

    /// Groups the items by bin. The outer vector is indexed by `BinIndex`.
    pub fn bin_contents(&self) -> Vec<Vec<ItemIndex>> {
        let mut contents = vec![Vec::new(); self.num_bins()];
        for (index, bin) in self.bins.iter().enumerate() {
            contents[bin.get()].push(ItemIndex::new(index));
        }
        contents
    }

    /// Checks that this packing is a valid packing of `instance`: every item
    /// is placed exactly once, every bin is used, every recorded load is the
    /// sum of its item sizes and no load exceeds the capacity.
    pub fn validate(&self, instance: &Instance<T>) -> Result<(), PackingError<T>> {
        if self.num_items() != instance.num_items() {
            return Err(PackingError::ItemCountMismatch {
                expected: instance.num_items(),
                found: self.num_items(),
            });
        }

        let num_bins = self.num_bins();
        let mut actual = vec![T::ZERO; num_bins];
        let mut counts = vec![0usize; num_bins];
        for (index, &bin) in self.bins.iter().enumerate() {
            let item = ItemIndex::new(index);
            if bin.get() >= num_bins {
                return Err(PackingError::BinOutOfRange {
                    item,
                    bin,
                    num_bins,
                });
            }
            let slot = &mut actual[bin.get()];
            *slot = slot
                .checked_add_val(instance.item_size(item))
                .ok_or(PackingError::LoadOverflow { bin })?;
            counts[bin.get()] += 1;
        }

        for bin in BinIndex::range(num_bins) {
            let recorded = self.loads[bin.get()];
            let sum = actual[bin.get()];
            if counts[bin.get()] == 0 {
                return Err(PackingError::EmptyBin { bin });
            }
            if recorded != sum {
                return Err(PackingError::LoadMismatch {
                    bin,
                    recorded,
                    actual: sum,
                });
            }
            if sum > instance.capacity() {
                return Err(PackingError::CapacityExceeded {
                    bin,
                    load: sum,
                    capacity: instance.capacity(),
                });
            }
        }

        Ok(())
    }
}

impl<T> std::fmt::Display for Packing<T>
where
    T: PackingNumeric,
{
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        writeln!(f, "Packing Summary")?;
        writeln!(f, "   Bins Used: {}", self.num_bins())?;
        writeln!(f)?;

        if self.num_bins() == 0 {
            writeln!(f, "   (No items packed)")?;
            return Ok(());
        }

        writeln!(f, "   {:<6} | {:<10} | Items", "Bin", "Load")?;
        writeln!(f, "   {:-<6}-+-{:-<10}-+-{:-<12}", "", "", "")?;
        for (bin, items) in self.bin_contents().iter().enumerate() {
            let items: Vec<String> = items.iter().map(|i| i.get().to_string()).collect();
            writeln!(
                f,
                "   {:<6} | {:<10} | {}",
                bin,
                self.loads[bin],
                items.join(" ")
            )?;
        }

        Ok(())
    }
}
