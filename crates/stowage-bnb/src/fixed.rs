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

//! Fixed assignments
//!
//! A `FixedAssignment` pins an item to a bin before the search starts. A
//! sequence of them forms a prefix: it must cover items `0..k` in canonical
//! order, open bins in increasing order without gaps and respect the
//! capacity. The parallel solver uses prefixes to hand out disjoint subtrees.

use stowage_core::num::PackingNumeric;
use stowage_model::{
    index::{BinIndex, ItemIndex},
    instance::Instance,
};
use thiserror::Error;

/// A fixed placement of an item into a bin.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct FixedAssignment {
    pub item_index: ItemIndex,
    pub bin_index: BinIndex,
}

impl FixedAssignment {
    #[inline]
    pub fn new(item_index: ItemIndex, bin_index: BinIndex) -> Self {
        Self {
            item_index,
            bin_index,
        }
    }
}

impl std::fmt::Display for FixedAssignment {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "FixedAssignment(item: {}, bin: {})",
            self.item_index, self.bin_index
        )
    }
}

/// Why a sequence of fixed assignments is not a valid search prefix.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum InvalidPrefix {
    #[error("position {position} fixes {found} but the prefix must continue with {expected}")]
    OutOfOrder {
        position: usize,
        expected: ItemIndex,
        found: ItemIndex,
    },
    #[error("{item} is fixed to {bin} but only {num_bins} bins are open")]
    SkippedBin {
        item: ItemIndex,
        bin: BinIndex,
        num_bins: usize,
    },
    #[error("{item} does not fit into {bin}")]
    CapacityExceeded { item: ItemIndex, bin: BinIndex },
}

/// Checks that `prefix` can be replayed onto the root of `instance`.
pub fn validate_prefix<T>(
    instance: &Instance<T>,
    prefix: &[FixedAssignment],
) -> Result<(), InvalidPrefix>
where
    T: PackingNumeric,
{
    let mut loads: Vec<T> = Vec::new();
    for (position, fixed) in prefix.iter().enumerate() {
        let expected = ItemIndex::new(position);
        if fixed.item_index != expected || position >= instance.num_items() {
            return Err(InvalidPrefix::OutOfOrder {
                position,
                expected,
                found: fixed.item_index,
            });
        }

        let bin = fixed.bin_index.get();
        if bin > loads.len() {
            return Err(InvalidPrefix::SkippedBin {
                item: fixed.item_index,
                bin: fixed.bin_index,
                num_bins: loads.len(),
            });
        }
        if bin == loads.len() {
            loads.push(T::ZERO);
        }

        let size = instance.item_size(fixed.item_index);
        match loads[bin].checked_add_val(size) {
            Some(load) if load <= instance.capacity() => loads[bin] = load,
            _ => {
                return Err(InvalidPrefix::CapacityExceeded {
                    item: fixed.item_index,
                    bin: fixed.bin_index,
                });
            }
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn fa(item: usize, bin: usize) -> FixedAssignment {
        FixedAssignment::new(ItemIndex::new(item), BinIndex::new(bin))
    }

    fn instance() -> Instance<i64> {
        Instance::new(vec![6, 5, 4, 3], 10).unwrap()
    }

    #[test]
    fn test_valid_prefixes_are_accepted() {
        // Item 2 fills bin 0 to exactly the capacity.
        assert_eq!(
            validate_prefix(&instance(), &[fa(0, 0), fa(1, 1), fa(2, 0)]),
            Ok(())
        );
        assert_eq!(
            validate_prefix(&instance(), &[fa(0, 0), fa(1, 1), fa(2, 0), fa(3, 1)]),
            Ok(())
        );
        assert_eq!(validate_prefix(&instance(), &[]), Ok(()));
    }

    #[test]
    fn test_out_of_order_prefix_is_rejected() {
        let err = validate_prefix(&instance(), &[fa(1, 0)]).unwrap_err();
        assert_eq!(
            err,
            InvalidPrefix::OutOfOrder {
                position: 0,
                expected: ItemIndex::new(0),
                found: ItemIndex::new(1)
            }
        );
    }

    #[test]
    fn test_skipped_bin_is_rejected() {
        let err = validate_prefix(&instance(), &[fa(0, 0), fa(1, 2)]).unwrap_err();
        assert!(matches!(err, InvalidPrefix::SkippedBin { num_bins: 1, .. }));
    }

    #[test]
    fn test_overfull_bin_is_rejected() {
        let err = validate_prefix(&instance(), &[fa(0, 0), fa(1, 0)]).unwrap_err();
        assert_eq!(
            err,
            InvalidPrefix::CapacityExceeded {
                item: ItemIndex::new(1),
                bin: BinIndex::new(0)
            }
        );
    }

    #[test]
    fn test_prefix_longer_than_instance_is_rejected() {
        let small = Instance::new(vec![1i64], 10).unwrap();
        let err = validate_prefix(&small, &[fa(0, 0), fa(1, 0)]).unwrap_err();
        assert!(matches!(err, InvalidPrefix::OutOfOrder { position: 1, .. }));
    }
}
