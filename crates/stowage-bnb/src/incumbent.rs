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

//! Incumbent management for branch-and-bound
//!
//! The incumbent is the best complete packing found so far. Its bin count is
//! the upper bound every node is compared against; improvements are monotone
//! decreases.
//!
//! - `SharedIncumbent<T>`: a concurrent holder with a lock-free upper bound
//!   (`AtomicUsize`) and the packing behind a `Mutex` as the source of truth.
//! - `IncumbentStore<T>`: what a search session needs from its incumbent.
//!   `NoSharedIncumbent<T>` keeps everything local, `SharedIncumbentAdapter`
//!   publishes to and reads from a `SharedIncumbent`.
//!
//! Atomic reads and writes use `Ordering::Relaxed`: the atomic only
//! short-circuits obviously worse candidates, the mutex decides.

use std::{
    marker::PhantomData,
    sync::{
        Mutex, PoisonError,
        atomic::{AtomicUsize, Ordering},
    },
};
use stowage_core::num::PackingNumeric;
use stowage_model::packing::Packing;

/// A concurrent holder for the best packing found by any worker.
///
/// `upper_bound` starts at `usize::MAX`, meaning "no incumbent yet".
#[derive(Debug)]
pub struct SharedIncumbent<T> {
    upper_bound: AtomicUsize,
    packing: Mutex<Option<Packing<T>>>,
}

impl<T> Default for SharedIncumbent<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T> std::fmt::Display for SharedIncumbent<T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "Incumbent(upper_bound: {})", self.upper_bound())
    }
}

impl<T> SharedIncumbent<T> {
    /// Creates a shared incumbent with no packing installed.
    #[inline]
    pub fn new() -> Self {
        Self {
            upper_bound: AtomicUsize::new(usize::MAX),
            packing: Mutex::new(None),
        }
    }

    /// Returns the bin count of the incumbent, `usize::MAX` if there is none.
    #[inline]
    pub fn upper_bound(&self) -> usize {
        self.upper_bound.load(Ordering::Relaxed)
    }

    /// Returns a copy of the incumbent packing, if any.
    #[inline]
    pub fn snapshot(&self) -> Option<Packing<T>>
    where
        T: Clone,
    {
        let guard = self.packing.lock().unwrap_or_else(PoisonError::into_inner);
        guard.clone()
    }

    /// Installs `candidate` if it uses strictly fewer bins than the
    /// incumbent. Returns `true` if it was installed.
    pub fn try_install(&self, candidate: &Packing<T>) -> bool
    where
        T: PackingNumeric,
    {
        let candidate_bins = candidate.num_bins();
        if candidate_bins >= self.upper_bound() {
            return false;
        }

        let mut guard = self.packing.lock().unwrap_or_else(PoisonError::into_inner);
        // The atomic may be stale, compare against the packing under the lock.
        if let Some(current) = guard.as_ref()
            && candidate_bins >= current.num_bins()
        {
            return false;
        }

        *guard = Some(candidate.clone());
        self.upper_bound.store(candidate_bins, Ordering::Relaxed);
        true
    }
}

/// What a search session needs from its incumbent.
pub trait IncumbentStore<T>
where
    T: PackingNumeric,
{
    /// Returns the bin count a session starts from.
    fn initial_upper_bound(&self) -> usize;
    /// Combines the session's own best bin count with the store's.
    fn tighten(&self, current_local_best: usize) -> usize;
    /// Notifies the store that the session found an improving packing.
    fn on_solution_found(&self, packing: &Packing<T>);
    /// Returns the best packing known to the store, if it holds one.
    fn best_packing(&self) -> Option<Packing<T>>;
}

/// A store that does not share anything. The session starts without an
/// upper bound.
#[repr(transparent)]
#[derive(Debug)]
pub struct NoSharedIncumbent<T>(PhantomData<T>);

impl<T> Default for NoSharedIncumbent<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T> NoSharedIncumbent<T> {
    /// Creates a new `NoSharedIncumbent`.
    #[inline(always)]
    pub fn new() -> Self {
        Self(PhantomData)
    }
}

impl<T> IncumbentStore<T> for NoSharedIncumbent<T>
where
    T: PackingNumeric,
{
    #[inline(always)]
    fn initial_upper_bound(&self) -> usize {
        usize::MAX
    }

    #[inline(always)]
    fn tighten(&self, current_local_best: usize) -> usize {
        current_local_best
    }

    #[inline(always)]
    fn on_solution_found(&self, _: &Packing<T>) {}

    #[inline(always)]
    fn best_packing(&self) -> Option<Packing<T>> {
        None
    }
}

/// A store backed by a borrowed `SharedIncumbent`.
#[repr(transparent)]
#[derive(Debug, Clone, Copy)]
pub struct SharedIncumbentAdapter<'a, T> {
    inner: &'a SharedIncumbent<T>,
}

impl<'a, T> SharedIncumbentAdapter<'a, T> {
    #[inline(always)]
    pub fn new(inner: &'a SharedIncumbent<T>) -> Self {
        Self { inner }
    }
}

impl<'a, T> IncumbentStore<T> for SharedIncumbentAdapter<'a, T>
where
    T: PackingNumeric,
{
    #[inline(always)]
    fn initial_upper_bound(&self) -> usize {
        self.inner.upper_bound()
    }

    #[inline(always)]
    fn tighten(&self, current_local_best: usize) -> usize {
        self.inner.upper_bound().min(current_local_best)
    }

    #[inline(always)]
    fn on_solution_found(&self, packing: &Packing<T>) {
        self.inner.try_install(packing);
    }

    #[inline]
    fn best_packing(&self) -> Option<Packing<T>> {
        self.inner.snapshot()
    }
}
