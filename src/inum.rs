use std::{convert::TryFrom, fmt};

use crate::from_fn;

/// The value of an integer record: a sign and an unsigned 64-bit magnitude.
///
/// This covers every primitive integer type. Negative zero is normalized to zero.
///
/// # Example
///
/// ```
/// use tbson::prelude::*;
///
/// let n = Inum::from(-300i32);
///
/// assert!(n.is_negative());
/// assert_eq!(n.magnitude(), 300);
/// assert_eq!(i64::try_from(n).unwrap(), -300);
/// ```
#[derive(Eq, PartialEq, Ord, PartialOrd, Copy, Clone, Hash, Debug, Default)]
pub struct Inum {
    negative: bool,
    magnitude: u64,
}

impl Inum {
    /// Creates an `Inum` from its parts.
    pub fn new(negative: bool, magnitude: u64) -> Inum {
        Inum {
            negative: negative && magnitude != 0,
            magnitude,
        }
    }

    pub fn is_negative(&self) -> bool { self.negative }

    pub fn magnitude(&self) -> u64 { self.magnitude }

    /// Converts to `i64`, wrapping values outside its range.
    pub fn to_i64_wrapping(self) -> i64 {
        let v = self.magnitude as i64;
        if self.negative {
            v.wrapping_neg()
        } else {
            v
        }
    }

    /// Converts to `i128`, which holds every `Inum` exactly.
    pub fn to_i128(self) -> i128 {
        let v = self.magnitude as i128;
        if self.negative {
            -v
        } else {
            v
        }
    }
}

fn from_signed(i: i64) -> Inum { Inum::new(i < 0, i.unsigned_abs()) }

fn from_unsigned(u: u64) -> Inum { Inum::new(false, u) }

from_fn!(Inum, i64, from_signed);
from_fn!(Inum, i32, |i: i32| from_signed(i64::from(i)));
from_fn!(Inum, i16, |i: i16| from_signed(i64::from(i)));
from_fn!(Inum, i8, |i: i8| from_signed(i64::from(i)));
from_fn!(Inum, isize, |i: isize| from_signed(i as i64));
from_fn!(Inum, u64, from_unsigned);
from_fn!(Inum, u32, |u: u32| from_unsigned(u64::from(u)));
from_fn!(Inum, u16, |u: u16| from_unsigned(u64::from(u)));
from_fn!(Inum, u8, |u: u8| from_unsigned(u64::from(u)));
from_fn!(Inum, usize, |u: usize| from_unsigned(u as u64));

impl TryFrom<i128> for Inum {
    type Error = i128;

    fn try_from(i: i128) -> Result<Self, i128> {
        match u64::try_from(i.unsigned_abs()) {
            Ok(mag) => Ok(Inum::new(i < 0, mag)),
            Err(_) => Err(i),
        }
    }
}

impl TryFrom<Inum> for i64 {
    type Error = Inum;

    fn try_from(n: Inum) -> Result<Self, Inum> { i64::try_from(n.to_i128()).map_err(|_| n) }
}

impl TryFrom<Inum> for u64 {
    type Error = Inum;

    fn try_from(n: Inum) -> Result<Self, Inum> {
        if n.negative {
            Err(n)
        } else {
            Ok(n.magnitude)
        }
    }
}

impl From<Inum> for i128 {
    fn from(n: Inum) -> i128 { n.to_i128() }
}

impl fmt::Display for Inum {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        if self.negative {
            f.write_str("-")?;
        }
        write!(f, "{}", self.magnitude)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn negative_zero() {
        assert_eq!(Inum::new(true, 0), Inum::from(0));
        assert!(!Inum::new(true, 0).is_negative());
    }

    #[test]
    fn extremes() {
        let min = Inum::from(i64::min_value());
        assert!(min.is_negative());
        assert_eq!(min.magnitude(), 1 << 63);
        assert_eq!(i64::try_from(min), Ok(i64::min_value()));

        let max = Inum::from(u64::max_value());
        assert_eq!(u64::try_from(max), Ok(u64::max_value()));
        assert!(i64::try_from(max).is_err());
        assert_eq!(max.to_i64_wrapping(), -1);

        assert!(Inum::try_from(-(u64::max_value() as i128)).is_ok());
        assert!(Inum::try_from(u64::max_value() as i128 + 1).is_err());
    }

    #[test]
    fn display() {
        assert_eq!(Inum::from(-5).to_string(), "-5");
        assert_eq!(Inum::from(u64::max_value()).to_string(), "18446744073709551615");
    }
}
