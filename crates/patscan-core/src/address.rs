//! Pointer-sized addresses for 32-bit and 64-bit targets
//!
//! [`Address`] wraps an unsigned integer of the target's pointer width. The
//! magnitude is always stored unsigned, so every comparison is an unsigned
//! comparison: on a 32-bit target `0x8000_0000` sorts above `0x7FFF_FFFF`,
//! never below it.
//!
//! Arithmetic wraps exactly like fixed-width integer arithmetic. Division and
//! remainder read the address as a signed integer of its width, so on a
//! 32-bit target `0xFFFF_FFFF / 2` is `0` and `0xFFFF_FFFF % 16` is `-1`.
//! Both panic on a zero divisor; use [`Address::checked_div`] and
//! [`Address::checked_remainder`] where the divisor is not known to be
//! non-zero.
//!
//! The width used by the rest of the crate is [`NativeWidth`], selected once
//! by the `x86` cargo feature. Code outside this module never branches on
//! width.

use std::cmp::Ordering;
use std::fmt;
use std::hash::Hash;
use std::ops::{Add, Div, Mul, Neg, Sub};

use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};

/// Lowest address considered valid; the first 64 KiB are reserved.
pub const MIN_VALID_ADDRESS: u64 = 0x10000;

/// Backing integer of an [`Address`]
pub trait Width:
    Copy
    + Eq
    + Ord
    + Hash
    + Default
    + fmt::Debug
    + fmt::LowerHex
    + fmt::UpperHex
    + Serialize
    + DeserializeOwned
    + Send
    + Sync
    + 'static
{
    const BITS: u32;
    const ZERO: Self;
    const MAX: Self;

    /// Keep only the low `BITS` bits of `value`
    fn truncate_from(value: u64) -> Self;
    /// Zero-extend to 64 bits
    fn to_u64(self) -> u64;
    /// Reinterpret as a signed integer of the same width, then sign-extend
    fn to_signed(self) -> i64;

    fn wrapping_add(self, rhs: Self) -> Self;
    fn wrapping_sub(self, rhs: Self) -> Self;
    fn wrapping_mul(self, rhs: Self) -> Self;
    fn wrapping_neg(self) -> Self;
}

macro_rules! impl_width {
    ($($ty:ty => $signed:ty),*) => {
        $(
            impl Width for $ty {
                const BITS: u32 = <$ty>::BITS;
                const ZERO: Self = 0;
                const MAX: Self = <$ty>::MAX;

                #[inline]
                fn truncate_from(value: u64) -> Self {
                    value as $ty
                }

                #[inline]
                fn to_u64(self) -> u64 {
                    self as u64
                }

                #[inline]
                fn to_signed(self) -> i64 {
                    self as $signed as i64
                }

                #[inline]
                fn wrapping_add(self, rhs: Self) -> Self {
                    <$ty>::wrapping_add(self, rhs)
                }

                #[inline]
                fn wrapping_sub(self, rhs: Self) -> Self {
                    <$ty>::wrapping_sub(self, rhs)
                }

                #[inline]
                fn wrapping_mul(self, rhs: Self) -> Self {
                    <$ty>::wrapping_mul(self, rhs)
                }

                #[inline]
                fn wrapping_neg(self) -> Self {
                    <$ty>::wrapping_neg(self)
                }
            }
        )*
    };
}

impl_width!(u32 => i32, u64 => i64);

#[cfg(feature = "x86")]
pub type NativeWidth = u32;
#[cfg(not(feature = "x86"))]
pub type NativeWidth = u64;

pub type Address32 = Address<u32>;
pub type Address64 = Address<u64>;
pub type NativeAddress = Address<NativeWidth>;

/// An address in the target process
#[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Address<W = NativeWidth>(W);

impl<W: Width> Address<W> {
    pub const NULL: Self = Self(W::ZERO);
    pub const MAX: Self = Self(W::MAX);

    pub const fn new(value: W) -> Self {
        Self(value)
    }

    /// Build an address from a 64-bit value, dropping bits above the width
    pub fn truncating(value: u64) -> Self {
        Self(W::truncate_from(value))
    }

    /// Sign-extend `value` into the width
    pub fn from_i32(value: i32) -> Self {
        Self::truncating(value as i64 as u64)
    }

    pub fn from_i64(value: i64) -> Self {
        Self::truncating(value as u64)
    }

    /// Build an address from a 64-bit value, or `None` if it does not fit
    pub fn try_from_u64(value: u64) -> Option<Self> {
        let address = Self::truncating(value);
        (address.to_u64() == value).then_some(address)
    }

    pub fn value(self) -> W {
        self.0
    }

    pub fn to_u64(self) -> u64 {
        self.0.to_u64()
    }

    /// The address as a 64-bit integer without sign extension.
    ///
    /// A 32-bit `0x8000_0000` becomes `2147483648`, not
    /// `0xFFFF_FFFF_8000_0000`. A 64-bit address keeps its bit pattern.
    pub fn to_i64_bits(self) -> i64 {
        self.to_u64() as i64
    }

    pub fn is_null(self) -> bool {
        self.0 == W::ZERO
    }

    /// Whether the address lies above the reserved low page
    pub fn is_valid(self) -> bool {
        self.is_in_range(Self::truncating(MIN_VALID_ADDRESS), Self::MAX)
    }

    /// Inclusive unsigned range check
    pub fn is_in_range(self, start: Self, end: Self) -> bool {
        start <= self && self <= end
    }

    /// `Equal` when the address lies in `[start, end]`, otherwise the
    /// ordering of the address relative to `start`.
    ///
    /// Suitable as a `binary_search_by` comparator over sorted,
    /// non-overlapping ranges.
    pub fn compare_to_range(self, start: Self, end: Self) -> Ordering {
        if self.is_in_range(start, end) {
            return Ordering::Equal;
        }
        self.cmp(&start)
    }

    /// Signed truncating division; `None` if `rhs` is null.
    ///
    /// The most negative value divided by `-1` wraps back to itself.
    pub fn checked_div(self, rhs: Self) -> Option<Self> {
        if rhs.is_null() {
            return None;
        }
        let quotient = self.0.to_signed().wrapping_div(rhs.0.to_signed());
        Some(Self::from_i64(quotient))
    }

    /// Signed remainder, taking the sign of the address
    pub fn checked_remainder(self, modulus: i32) -> Option<i32> {
        if modulus == 0 {
            return None;
        }
        Some(self.0.to_signed().wrapping_rem(i64::from(modulus)) as i32)
    }

    /// Remainder of the address divided by `modulus`.
    ///
    /// # Panics
    ///
    /// Panics if `modulus` is zero.
    pub fn remainder(self, modulus: i32) -> i32 {
        match self.checked_remainder(modulus) {
            Some(rem) => rem,
            None => panic!("attempt to calculate the remainder of an address with a divisor of zero"),
        }
    }

    /// Advance by a byte count, wrapping at the width
    pub fn offset(self, bytes: usize) -> Self {
        self + Self::truncating(bytes as u64)
    }
}

impl<W: Width> From<W> for Address<W> {
    fn from(value: W) -> Self {
        Self(value)
    }
}

impl<W: Width> Add for Address<W> {
    type Output = Self;

    fn add(self, rhs: Self) -> Self {
        Self(self.0.wrapping_add(rhs.0))
    }
}

impl<W: Width> Add<usize> for Address<W> {
    type Output = Self;

    fn add(self, rhs: usize) -> Self {
        self.offset(rhs)
    }
}

impl<W: Width> Sub for Address<W> {
    type Output = Self;

    fn sub(self, rhs: Self) -> Self {
        Self(self.0.wrapping_sub(rhs.0))
    }
}

impl<W: Width> Mul for Address<W> {
    type Output = Self;

    fn mul(self, rhs: Self) -> Self {
        Self(self.0.wrapping_mul(rhs.0))
    }
}

impl<W: Width> Div for Address<W> {
    type Output = Self;

    /// # Panics
    ///
    /// Panics if `rhs` is the null address.
    fn div(self, rhs: Self) -> Self {
        match self.checked_div(rhs) {
            Some(quotient) => quotient,
            None => panic!("attempt to divide an address by the null address"),
        }
    }
}

impl<W: Width> Neg for Address<W> {
    type Output = Self;

    fn neg(self) -> Self {
        Self(self.0.wrapping_neg())
    }
}

impl<W: Width> fmt::Debug for Address<W> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Address({:#x})", self.0)
    }
}

impl<W: Width> fmt::Display for Address<W> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "0x{:X}", self.0)
    }
}

impl<W: Width> fmt::LowerHex for Address<W> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::LowerHex::fmt(&self.0, f)
    }
}

impl<W: Width> fmt::UpperHex for Address<W> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::UpperHex::fmt(&self.0, f)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_null_and_valid() {
        assert!(Address64::NULL.is_null());
        assert!(!Address64::NULL.is_valid());
        assert!(!Address32::new(0xFFFF).is_valid());
        assert!(Address32::new(0x10000).is_valid());
        // The whole upper half counts as valid
        assert!(Address32::new(0x8000_0000).is_valid());
        assert!(Address32::MAX.is_valid());
        assert!(Address64::new(u64::MAX).is_valid());
    }

    #[test]
    fn test_unsigned_comparison_32() {
        let high = Address32::new(0x8000_0000);
        let low = Address32::new(0x7FFF_FFFF);
        assert!(low < high);
        assert!(high.is_in_range(Address32::new(0x1000), Address32::MAX));
        assert!(!high.is_in_range(Address32::new(0x1000), low));
    }

    #[test]
    fn test_is_in_range_inclusive() {
        let start = Address64::new(0x1000);
        let end = Address64::new(0x2000);
        assert!(start.is_in_range(start, end));
        assert!(end.is_in_range(start, end));
        assert!(Address64::new(0x1800).is_in_range(start, end));
        assert!(!Address64::new(0xFFF).is_in_range(start, end));
        assert!(!Address64::new(0x2001).is_in_range(start, end));
    }

    #[test]
    fn test_compare_to_range() {
        let start = Address32::new(0x1000);
        let end = Address32::new(0x2000);
        assert_eq!(Address32::new(0x1000).compare_to_range(start, end), Ordering::Equal);
        assert_eq!(Address32::new(0x2000).compare_to_range(start, end), Ordering::Equal);
        assert_eq!(Address32::new(0x0800).compare_to_range(start, end), Ordering::Less);
        assert_eq!(Address32::new(0x2001).compare_to_range(start, end), Ordering::Greater);
        // Would be Less under a signed comparison
        assert_eq!(
            Address32::new(0x9000_0000).compare_to_range(start, end),
            Ordering::Greater
        );
    }

    #[test]
    fn test_compare_to_range_binary_search() {
        let ranges = [
            (Address64::new(0x1000), Address64::new(0x1FFF)),
            (Address64::new(0x4000), Address64::new(0x4FFF)),
            (Address64::new(0x8000_0000_0000_0000), Address64::new(0x8000_0000_0000_FFFF)),
        ];
        let find = |addr: Address64| {
            ranges
                .binary_search_by(|&(start, end)| addr.compare_to_range(start, end).reverse())
                .ok()
        };

        assert_eq!(find(Address64::new(0x4800)), Some(1));
        assert_eq!(find(Address64::new(0x8000_0000_0000_0010)), Some(2));
        assert_eq!(find(Address64::new(0x3000)), None);
    }

    #[test]
    fn test_arithmetic_wraps() {
        assert_eq!(Address32::MAX + Address32::new(2), Address32::new(1));
        assert_eq!(Address32::NULL - Address32::new(1), Address32::MAX);
        assert_eq!(
            Address32::new(0x8000_0000) * Address32::new(2),
            Address32::NULL
        );
        assert_eq!(-Address32::new(1), Address32::new(0xFFFF_FFFF));
        assert_eq!(-Address64::new(0x10), Address64::new(0xFFFF_FFFF_FFFF_FFF0));
        assert_eq!(Address64::new(0x1000) + 0x10usize, Address64::new(0x1010));
    }

    #[test]
    fn test_division() {
        assert_eq!(
            Address64::new(0x1000) / Address64::new(0x10),
            Address64::new(0x100)
        );
        assert_eq!(Address64::new(7) / Address64::new(2), Address64::new(3));
        // The top bit is a sign bit here
        assert_eq!(
            Address32::new(0xFFFF_FFFF) / Address32::new(2),
            Address32::NULL
        );
        assert_eq!(Address64::MAX / Address64::new(2), Address64::NULL);
        assert_eq!(
            Address32::from_i32(-7) / Address32::new(2),
            Address32::from_i32(-3)
        );
        assert_eq!(Address32::new(5).checked_div(Address32::NULL), None);
    }

    #[test]
    fn test_division_of_minimum_by_minus_one_wraps() {
        let min = Address32::new(0x8000_0000);
        assert_eq!(min / Address32::MAX, min);

        let min = Address64::new(0x8000_0000_0000_0000);
        assert_eq!(min / Address64::MAX, min);
    }

    #[test]
    #[should_panic(expected = "null address")]
    fn test_division_by_null_panics() {
        let _ = Address64::new(0x1000) / Address64::NULL;
    }

    #[test]
    fn test_remainder() {
        assert_eq!(Address64::new(0x1003).remainder(4), 3);
        assert_eq!(Address32::new(0xFFFF_FFFF).remainder(0x10), -1);
        assert_eq!(Address64::MAX.remainder(0x10), -1);
        assert_eq!(Address32::new(0x13).remainder(-4), 3);
        assert_eq!(Address32::new(0x8000_0000).remainder(-1), 0);
        assert_eq!(Address32::new(0x10).checked_remainder(0), None);
    }

    #[test]
    #[should_panic(expected = "divisor of zero")]
    fn test_remainder_by_zero_panics() {
        let _ = Address32::new(0x10).remainder(0);
    }

    #[test]
    fn test_truncating_conversion() {
        assert_eq!(
            Address32::truncating(0x1_2345_6789).value(),
            0x2345_6789
        );
        assert_eq!(
            Address64::truncating(0x1_2345_6789).value(),
            0x1_2345_6789
        );
        for value in [0u64, 1, 0x7FFF_FFFF, 0x8000_0000, 0xFFFF_FFFF, u64::MAX] {
            assert_eq!(Address64::truncating(value).to_u64(), value);
            assert_eq!(Address32::truncating(value).to_u64(), value & 0xFFFF_FFFF);
        }
    }

    #[test]
    fn test_try_from_u64() {
        assert_eq!(Address32::try_from_u64(0xFFFF_FFFF), Some(Address32::MAX));
        assert_eq!(Address32::try_from_u64(0x1_0000_0000), None);
        assert_eq!(Address64::try_from_u64(u64::MAX), Some(Address64::MAX));
    }

    #[test]
    fn test_signed_constructors() {
        assert_eq!(Address32::from_i32(-1), Address32::MAX);
        assert_eq!(Address64::from_i32(-1), Address64::MAX);
        assert_eq!(Address64::from_i32(0x1000), Address64::new(0x1000));
        assert_eq!(Address32::from_i64(0x1_0000_1000), Address32::new(0x1000));
        assert_eq!(Address64::from_i64(-2), Address64::new(u64::MAX - 1));
    }

    #[test]
    fn test_to_i64_bits() {
        assert_eq!(Address32::new(0x8000_0000).to_i64_bits(), 2_147_483_648);
        assert_eq!(Address32::MAX.to_i64_bits(), 0xFFFF_FFFF);
        assert_eq!(Address32::new(0x1234).to_i64_bits(), 0x1234);
        assert_eq!(Address64::MAX.to_i64_bits(), -1);
    }

    #[test]
    fn test_formatting() {
        let addr = Address64::new(0x7FF6_1234);
        assert_eq!(addr.to_string(), "0x7FF61234");
        assert_eq!(format!("{:#x}", addr), "0x7ff61234");
        assert_eq!(format!("{:08X}", Address32::new(0x1001)), "00001001");
        assert_eq!(format!("{:?}", addr), "Address(0x7ff61234)");
    }

    #[test]
    fn test_serde_transparent() {
        let addr = Address64::new(0x1000);
        let json = serde_json::to_string(&addr).unwrap();
        assert_eq!(json, "4096");
        let parsed: Address64 = serde_json::from_str(&json).unwrap();
        assert_eq!(parsed, addr);
    }
}
