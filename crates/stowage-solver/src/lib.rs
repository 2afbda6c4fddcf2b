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

//! # Stowage Solver
//!
//! High-level entry point for exact bin packing. Combines the
//! first-fit-decreasing heuristic, the root lower bound and the
//! branch-and-bound engine, optionally across several threads, and turns the
//! result into a per-bin report.
//!
//! ## Modules
//!
//! - `solver`: `SolverBuilder` and `Solver`, sequential and parallel search.
//! - `split`: breadth-first splitting of the tree into subtree prefixes.
//! - `extract`: `PackingReport` construction.
//! - `stats`: statistics of a whole solve.

pub mod extract;
pub mod solver;
pub mod split;
pub mod stats;
