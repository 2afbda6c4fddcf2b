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

//! Saturating arithmetic by value, clamping to the bounds of the type.

/// Saturating addition by value.
///
/// ```rust
/// # use stowage_core::num::ops::saturating_arithmetic::SaturatingAddVal;
/// assert_eq!(250u8.saturating_add_val(10), 255);
/// assert_eq!((-120i8).saturating_add_val(-20), -128);
/// ```
pub trait SaturatingAddVal: Sized {
    fn saturating_add_val(self, v: Self) -> Self;
}

/// Saturating subtraction by value.
///
/// ```rust
/// # use stowage_core::num::ops::saturating_arithmetic::SaturatingSubVal;
/// assert_eq!(5u8.saturating_sub_val(10), 0);
/// assert_eq!(120i8.saturating_sub_val(-20), 127);
/// ```
pub trait SaturatingSubVal: Sized {
    fn saturating_sub_val(self, v: Self) -> Self;
}

macro_rules! impl_saturating_val {
    ($trait_name:ident, $method:ident, $src_method:ident; $($t:ty),* $(,)?) => {
        $(
            impl $trait_name for $t {
                #[inline(always)]
                fn $method(self, v: Self) -> Self {
                    <$t>::$src_method(self, v)
                }
            }
        )*
    };
}

impl_saturating_val!(SaturatingAddVal, saturating_add_val, saturating_add;
    i8, i16, i32, i64, i128, isize, u8, u16, u32, u64, u128, usize);
impl_saturating_val!(SaturatingSubVal, saturating_sub_val, saturating_sub;
    i8, i16, i32, i64, i128, isize, u8, u16, u32, u64, u128, usize);
