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

//! Stowage-BnB: exact branch-and-bound for one-dimensional bin packing
//!
//! The engine places items in canonical (non-increasing) order and branches
//! on the bin each item goes to. Branching, bounding, monitoring and
//! incumbent handling are separate pieces, so strategies can be swapped
//! without touching the search loop.
//!
//! Core flow
//! - Load a `stowage_model::instance::Instance<T>`.
//! - Choose a `branching::decision::DecisionBuilder` (child order, symmetry).
//! - Choose a `bound::BoundEstimator` (admissible additional-bin bound).
//! - Optionally pass fixed assignments, a shared incumbent and monitors.
//! - Run `bnb::BnbSolver`.
//!
//! Assumptions and guarantees
//! - Bounds must be admissible; pruning relies on it.
//! - Deterministic given deterministic builders and bounds.
//!
//! Module map
//! - `bnb`: the solver engine and session orchestration.
//! - `bound`: volume, large-item and combined lower bounds.
//! - `branching`: decision builders.
//! - `incumbent`: shared and session-local incumbents.
//! - `monitor`: tree-search monitors (log, limits, composite).
//! - `result`: outcomes with termination reasons.
//! - `stats`: lightweight counters and timing.
//! - `fixed`: fixed prefixes for subtree searches.
//! - `state`, `trail`, `stack`: the in-place search state and its undo log.

pub mod bnb;
pub mod bound;
pub mod branching;
pub mod fixed;
pub mod incumbent;
pub mod monitor;
pub mod result;
pub mod stack;
pub mod state;
pub mod stats;
pub mod trail;
