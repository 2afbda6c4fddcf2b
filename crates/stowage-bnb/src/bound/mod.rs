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

//! Lower bounds on the number of bins
//!
//! Every estimator answers the same question: given the open bins and the
//! items still to place, how many new bins must any completion open? The
//! answers are admissible, so the engine may prune a node as soon as
//! `open bins + answer` reaches the incumbent.
//!
//! - `volume`: remaining size minus usable residual capacity, rounded up.
//! - `large_item`: large items that fit into no open bin.
//! - `combined`: the maximum of both, used by default.

pub mod combined;
pub mod estimator;
pub mod large_item;
pub mod volume;

pub use combined::{CombinedBound, lower_bound, root_lower_bound};
pub use estimator::BoundEstimator;
pub use large_item::LargeItemBound;
pub use volume::VolumeBound;
