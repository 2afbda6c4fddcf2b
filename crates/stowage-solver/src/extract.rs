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

//! Solution extraction
//!
//! Turns a `Packing`, which stores one bin index per canonical item, into a
//! per-bin report listing the original item identifiers and the bin load.

use stowage_core::num::PackingNumeric;
use stowage_model::{
    index::{BinIndex, ItemId},
    instance::Instance,
    packing::Packing,
};

/// One bin of a `PackingReport`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReportBin<T> {
    pub bin_id: BinIndex,
    /// Identifiers of the items in this bin, largest item first.
    pub items: Vec<ItemId>,
    pub load: T,
}

/// A packing in reportable form.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PackingReport<T> {
    pub bins: Vec<ReportBin<T>>,
    /// `true` only if an exhaustive search proved the bin count minimal.
    pub optimal: bool,
}

impl<T> PackingReport<T> {
    #[inline]
    pub fn num_bins(&self) -> usize {
        self.bins.len()
    }

    #[inline]
    pub fn is_optimal(&self) -> bool {
        self.optimal
    }
}

/// Builds the report of `packing` for `instance`.
///
/// `exhausted` states whether the search that produced the packing completed
/// on its own; it becomes the `optimal` flag unchanged.
///
/// # Panics
///
/// In debug builds, panics if `packing` does not belong to `instance`.
///
/// # Examples
///
/// ```rust
/// # use stowage_model::{index::BinIndex, instance::Instance, packing::Packing};
/// # use stowage_solver::extract::extract;
/// let instance = Instance::new(vec![4i64, 6, 5], 10).unwrap();
/// // Canonical order is [6, 5, 4].
/// let packing = Packing::from_assignment(
///     &instance,
///     vec![BinIndex::new(0), BinIndex::new(1), BinIndex::new(0)],
/// )
/// .unwrap();
///
/// let report = extract(&instance, &packing, true);
/// assert_eq!(report.num_bins(), 2);
/// assert_eq!(report.bins[0].load, 10);
/// assert!(report.optimal);
/// ```
pub fn extract<T>(instance: &Instance<T>, packing: &Packing<T>, exhausted: bool) -> PackingReport<T>
where
    T: PackingNumeric,
{
    debug_assert_eq!(
        packing.num_items(),
        instance.num_items(),
        "called `extract` with a packing of {} items for an instance of {} items",
        packing.num_items(),
        instance.num_items()
    );

    let bins = packing
        .bin_contents()
        .into_iter()
        .enumerate()
        .map(|(bin, members)| {
            let bin_id = BinIndex::new(bin);
            ReportBin {
                bin_id,
                items: members
                    .into_iter()
                    .map(|item| instance.item_id(item))
                    .collect(),
                load: packing.load(bin_id),
            }
        })
        .collect();

    PackingReport {
        bins,
        optimal: exhausted,
    }
}

impl<T> std::fmt::Display for PackingReport<T>
where
    T: std::fmt::Display,
{
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        writeln!(
            f,
            "{} bins ({})",
            self.bins.len(),
            if self.optimal { "optimal" } else { "not proven optimal" }
        )?;
        writeln!(f, "{:<6} | {:<10} | Items", "Bin", "Load")?;
        for bin in &self.bins {
            let items = bin
                .items
                .iter()
                .map(|id| id.get().to_string())
                .collect::<Vec<_>>()
                .join(" ");
            writeln!(f, "{:<6} | {:<10} | {}", bin.bin_id.get(), bin.load, items)?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use stowage_heuristic::ffd::first_fit_decreasing;

    #[test]
    fn test_extract_maps_items_back_to_input_ids() {
        // Input positions: 0 -> 2, 1 -> 9, 2 -> 8, 3 -> 1
        let instance = Instance::new(vec![2i64, 9, 8, 1], 10).unwrap();
        let packing = first_fit_decreasing(&instance);
        let report = extract(&instance, &packing, false);

        assert_eq!(report.num_bins(), 2);
        assert!(!report.is_optimal());
        assert_eq!(report.bins[0].items, vec![ItemId::new(1), ItemId::new(3)]);
        assert_eq!(report.bins[0].load, 10);
        assert_eq!(report.bins[1].items, vec![ItemId::new(2), ItemId::new(0)]);
        assert_eq!(report.bins[1].load, 10);
    }

    #[test]
    fn test_every_item_reported_once() {
        let instance = Instance::new(vec![3i64, 3, 3, 7, 7, 1, 5], 10).unwrap();
        let packing = first_fit_decreasing(&instance);
        let report = extract(&instance, &packing, true);

        let mut ids: Vec<usize> = report
            .bins
            .iter()
            .flat_map(|bin| bin.items.iter().map(|id| id.get()))
            .collect();
        ids.sort_unstable();
        assert_eq!(ids, (0..7).collect::<Vec<_>>());

        let total: i64 = report.bins.iter().map(|bin| bin.load).sum();
        assert_eq!(total, instance.total_size());
    }

    #[test]
    fn test_empty_packing() {
        let instance = Instance::new(Vec::<i64>::new(), 10).unwrap();
        let report = extract(&instance, &Packing::empty(), true);
        assert_eq!(report.num_bins(), 0);
        assert!(report.optimal);
    }

    #[test]
    fn test_display_renders_table() {
        let instance = Instance::new(vec![6i64, 4], 10).unwrap();
        let packing = first_fit_decreasing(&instance);
        let rendered = format!("{}", extract(&instance, &packing, true));

        let lines: Vec<&str> = rendered.lines().collect();
        assert_eq!(lines[0], "1 bins (optimal)");
        assert_eq!(lines[2], "0      | 10         | 0 1");
    }
}
