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

//! Checked arithmetic by value, returning `None` on overflow or division by
//! zero.

/// Checked addition by value.
///
/// ```rust
/// # use stowage_core::num::ops::checked_arithmetic::CheckedAddVal;
/// assert_eq!(120i8.checked_add_val(10), None);
/// assert_eq!(100i8.checked_add_val(10), Some(110));
/// ```
pub trait CheckedAddVal: Sized {
    fn checked_add_val(self, v: Self) -> Option<Self>;
}

/// Checked multiplication by value.
pub trait CheckedMulVal: Sized {
    fn checked_mul_val(self, v: Self) -> Option<Self>;
}

/// Checked division by value. `None` on division by zero and on
/// `MIN / -1` for signed types.
pub trait CheckedDivVal: Sized {
    fn checked_div_val(self, v: Self) -> Option<Self>;
}

macro_rules! impl_checked_val {
    ($trait_name:ident, $method:ident, $src_method:ident; $($t:ty),* $(,)?) => {
        $(
            impl $trait_name for $t {
                #[inline(always)]
                fn $method(self, v: $t) -> Option<$t> {
                    <$t>::$src_method(self, v)
                }
            }
        )*
    };
}

impl_checked_val!(CheckedAddVal, checked_add_val, checked_add;
    i8, i16, i32, i64, i128, isize, u8, u16, u32, u64, u128, usize);
impl_checked_val!(CheckedMulVal, checked_mul_val, checked_mul;
    i8, i16, i32, i64, i128, isize, u8, u16, u32, u64, u128, usize);
impl_checked_val!(CheckedDivVal, checked_div_val, checked_div;
    i8, i16, i32, i64, i128, isize, u8, u16, u32, u64, u128, usize);

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_checked_add_val_overflow() {
        assert_eq!(i64::MAX.checked_add_val(1), None);
        assert_eq!(i64::MAX.checked_add_val(0), Some(i64::MAX));
    }

    #[test]
    fn test_checked_mul_val() {
        assert_eq!(16i8.checked_mul_val(8), None);
        assert_eq!(8i8.checked_mul_val(8), Some(64));
    }

    #[test]
    fn test_checked_div_val() {
        assert_eq!(10i16.checked_div_val(0), None);
        assert_eq!(i16::MIN.checked_div_val(-1), None);
        assert_eq!(10i16.checked_div_val(3), Some(3));
    }
}
