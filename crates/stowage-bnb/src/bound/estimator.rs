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
use stowage_model::instance::Instance;

/// A strategy for bounding the number of bins a completion still needs.
///
/// The engine prunes a node when
/// `state.num_bins() + additional_bins(state) >= incumbent`. The estimate must
/// be admissible: no completion of the state may open fewer new bins than
/// returned.
pub trait BoundEstimator<T>
where
    T: PackingNumeric,
{
    /// Returns the name of the estimator.
    fn name(&self) -> &str;

    /// Returns a lower bound on the number of bins any completion of `state`
    /// has to open in addition to the open ones.
    fn additional_bins(&mut self, instance: &Instance<T>, state: &SearchState<T>) -> usize;

    /// Returns a lower bound on the total bin count of any completion.
    #[inline]
    fn lower_bound(&mut self, instance: &Instance<T>, state: &SearchState<T>) -> usize {
        state
            .num_bins()
            .saturating_add(self.additional_bins(instance, state))
    }
}

impl<T> std::fmt::Debug for dyn BoundEstimator<T>
where
    T: PackingNumeric,
{
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "BoundEstimator({})", self.name())
    }
}

impl<T> std::fmt::Display for dyn BoundEstimator<T>
where
    T: PackingNumeric,
{
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "BoundEstimator({})", self.name())
    }
}
