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

//! # Numeric Foundations
//!
//! Integer helpers for sizes, capacities and loads.
//!
//! - `constants`: associated-constant traits (`Zero`, `PlusOne`).
//! - `ops`: by-value checked (`Option<T>`) and saturating arithmetic.
//! - `PackingNumeric`: the single bound every generic packing component uses.

pub mod constants;
pub mod ops;

use constants::{PlusOne, Zero};
use num_traits::{FromPrimitive, PrimInt, Signed};
use ops::{checked_arithmetic, saturating_arithmetic};
use std::hash::Hash;

/// A trait alias for the integer types that may express item sizes and bin
/// capacities. In practice these are the signed primitives `i8` through `i64`
/// and `isize`.
///
/// Signedness keeps residual computations (`capacity - load`) well defined
/// even while a caller is building an invalid instance that is about to be
/// rejected.
///
/// # Note
///
/// `i128` satisfies the bound but is noticeably slower in the search loop.
pub trait PackingNumeric:
    PrimInt
    + Signed
    + FromPrimitive
    + std::fmt::Debug
    + std::fmt::Display
    + PlusOne
    + Zero
    + saturating_arithmetic::SaturatingAddVal
    + saturating_arithmetic::SaturatingSubVal
    + checked_arithmetic::CheckedAddVal
    + checked_arithmetic::CheckedMulVal
    + checked_arithmetic::CheckedDivVal
    + Send
    + Sync
    + Hash
{
}

impl<T> PackingNumeric for T where
    T: PrimInt
        + Signed
        + FromPrimitive
        + std::fmt::Debug
        + std::fmt::Display
        + PlusOne
        + Zero
        + saturating_arithmetic::SaturatingAddVal
        + saturating_arithmetic::SaturatingSubVal
        + checked_arithmetic::CheckedAddVal
        + checked_arithmetic::CheckedMulVal
        + checked_arithmetic::CheckedDivVal
        + Send
        + Sync
        + Hash
{
}

/// Integer division of `numerator` by a positive `denominator`, rounded up.
///
/// Returns `None` if `denominator` is not positive. A non-positive numerator
/// yields zero.
///
/// # Examples
///
/// ```rust
/// # use stowage_core::num::div_ceil_positive;
/// assert_eq!(div_ceil_positive(37i64, 10), Some(4));
/// assert_eq!(div_ceil_positive(40i64, 10), Some(4));
/// assert_eq!(div_ceil_positive(0i64, 10), Some(0));
/// assert_eq!(div_ceil_positive(5i64, 0), None);
/// ```
#[inline]
pub fn div_ceil_positive<T>(numerator: T, denominator: T) -> Option<T>
where
    T: PackingNumeric,
{
    if denominator <= T::ZERO {
        return None;
    }
    if numerator <= T::ZERO {
        return Some(T::ZERO);
    }
    let quotient = numerator.checked_div_val(denominator)?;
    if quotient.checked_mul_val(denominator)? == numerator {
        Some(quotient)
    } else {
        quotient.checked_add_val(T::PLUS_ONE)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn assert_packing_numeric<T: PackingNumeric>() {}

    #[test]
    fn test_signed_primitives_are_packing_numeric() {
        assert_packing_numeric::<i8>();
        assert_packing_numeric::<i16>();
        assert_packing_numeric::<i32>();
        assert_packing_numeric::<i64>();
        assert_packing_numeric::<isize>();
    }

    #[test]
    fn test_div_ceil_positive_rounds_up() {
        assert_eq!(div_ceil_positive(1i32, 10), Some(1));
        assert_eq!(div_ceil_positive(10i32, 10), Some(1));
        assert_eq!(div_ceil_positive(11i32, 10), Some(2));
        assert_eq!(div_ceil_positive(-3i32, 10), Some(0));
    }

    #[test]
    fn test_div_ceil_positive_rejects_non_positive_denominator() {
        assert_eq!(div_ceil_positive(7i64, 0), None);
        assert_eq!(div_ceil_positive(7i64, -2), None);
    }

    #[test]
    fn test_div_ceil_positive_near_type_bounds() {
        assert_eq!(div_ceil_positive(i8::MAX, 1), Some(i8::MAX));
        assert_eq!(div_ceil_positive(i8::MAX, 2), Some(64));
        assert_eq!(div_ceil_positive(i8::MAX, i8::MAX), Some(1));
    }
}
