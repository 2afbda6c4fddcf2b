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
use stowage_model::index::BinIndex;

/// A compact record of a single placement applied to the search state.
///
/// The size is kept so that the placement can be undone without looking the
/// item up again, and `opened_bin` records whether the placement created the
/// bin it went into.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash)]
pub struct TrailEntry<T> {
    size: T,
    bin_index: BinIndex,
    opened_bin: bool,
}

impl<T> TrailEntry<T>
where
    T: Copy,
{
    /// Returns the size of the placed item.
    #[inline]
    pub fn size(&self) -> T {
        self.size
    }

    /// Returns the bin the item was placed into.
    #[inline]
    pub fn bin_index(&self) -> BinIndex {
        self.bin_index
    }

    /// Returns `true` if the placement opened a new bin.
    #[inline]
    pub fn opened_bin(&self) -> bool {
        self.opened_bin
    }
}

impl<T> std::fmt::Display for TrailEntry<T>
where
    T: std::fmt::Display,
{
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "TrailEntry(bin: {}, size: {}, opened: {})",
            self.bin_index.get(),
            self.size,
            self.opened_bin
        )
    }
}

/// A linear undo log with frame markers for backtracking.
///
/// Typical usage:
/// 1. Call `push_frame` before descending into a child,
/// 2. apply the child's placement with `apply_assignment`,
/// 3. on prune or completion, call `backtrack` to restore the state to the
///    start of the frame.
#[derive(Debug, Clone)]
pub struct SearchTrail<T> {
    entries: Vec<TrailEntry<T>>,
    /// `frames[i]` is the index in `entries` where depth `i` began.
    frames: Vec<usize>,
}

impl<T> Default for SearchTrail<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T> SearchTrail<T> {
    /// Creates a new, empty `SearchTrail`.
    #[inline]
    pub fn new() -> Self {
        Self {
            entries: Vec::new(),
            frames: Vec::new(),
        }
    }

    /// Creates a trail with room for `num_items` placements.
    #[inline]
    pub fn preallocated(num_items: usize) -> Self {
        Self {
            entries: Vec::with_capacity(num_items),
            frames: Vec::with_capacity(num_items + 1),
        }
    }

    /// Ensures the trail has capacity for an instance of `num_items` items.
    pub fn ensure_capacity(&mut self, num_items: usize) {
        if self.entries.capacity() < num_items {
            self.entries.reserve(num_items - self.entries.len());
        }
        if self.frames.capacity() < num_items + 1 {
            self.frames.reserve((num_items + 1) - self.frames.len());
        }
    }

    /// Returns the number of entries in the trail.
    #[inline]
    pub fn num_entries(&self) -> usize {
        self.entries.len()
    }

    /// Returns the number of frames in the trail.
    #[inline]
    pub fn depth(&self) -> usize {
        self.frames.len()
    }

    /// Returns `true` if there are no frames tracked.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.frames.is_empty()
    }

    /// Marks the start of a new decision level.
    #[inline]
    pub fn push_frame(&mut self) {
        self.frames.push(self.entries.len());
    }

    /// Places the next item of the state into `bin_index` and records the
    /// placement.
    pub fn apply_assignment(&mut self, state: &mut SearchState<T>, bin_index: BinIndex, size: T)
    where
        T: PackingNumeric,
    {
        let opened_bin = bin_index.get() == state.num_bins();
        self.entries.push(TrailEntry {
            size,
            bin_index,
            opened_bin,
        });
        state.assign_next(bin_index, size);
    }

    /// Undoes every placement of the current frame and pops it.
    pub fn backtrack(&mut self, state: &mut SearchState<T>)
    where
        T: PackingNumeric,
    {
        let Some(start) = self.frames.pop() else {
            return;
        };

        while self.entries.len() > start {
            if let Some(entry) = self.entries.pop() {
                state.unassign_last(entry.size, entry.opened_bin);
            }
        }
    }

    /// Clears the entire trail without touching any state.
    #[inline]
    pub fn reset(&mut self) {
        self.entries.clear();
        self.frames.clear();
    }
}

impl<T> std::fmt::Display for SearchTrail<T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "SearchTrail(entries: {}, frames: {})",
            self.entries.len(),
            self.frames.len()
        )
    }
}
