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

//! # Stowage Model
//!
//! Data model of the one-dimensional bin packing problem: what has to be
//! packed (`Instance`) and how it was packed (`Packing`).
//!
//! * **`index`**: tagged indices for items in canonical order (`ItemIndex`),
//!   items in input order (`ItemId`) and bins (`BinIndex`).
//! * **`instance`**: the validated, immutable `Instance` with its items sorted
//!   by non-increasing size.
//! * **`packing`**: the `Packing` result, stored as structure of arrays, with
//!   an explicit validity check.
//! * **`loading`**: `InstanceLoader`, a tolerant text reader for instances.
//!
//! Construction is fail-fast: an `Instance` that exists is valid, so the
//! heuristic and exact solvers never re-check sizes against capacity.

pub mod index;
pub mod instance;
pub mod loading;
pub mod packing;
