use crate::encoding::tag::minimal_width;
use smallvec::SmallVec;

/// Converts a `u64` to the smallest possible vec of digits in little-endian order.
/// Zero has no digits.
///
/// # Arguments
///
/// * `num: u64` - The integer to be converted.
///
/// # Example
///
/// ```
/// use tbson::util::u64_to_digits;
///
/// let some_vec = u64_to_digits(4);
///
/// // first byte should be 4
/// assert_eq!(some_vec[0], 4);
/// // there should only be one element
/// assert_eq!(some_vec.len(), 1);
///
/// assert!(u64_to_digits(0).is_empty());
/// ```
pub fn u64_to_digits(num: u64) -> SmallVec<[u8; 8]> {
    let len = minimal_width(num) as usize;
    let mut out = SmallVec::from_buf(u64::to_le_bytes(num));
    out.truncate(len);
    out
}

/// Reads little-endian digits into a `u64`, keeping at most the first `max` of them.
pub fn digits_to_u64(digits: &[u8], max: usize) -> u64 {
    let mut buf = [0u8; 8];
    let take = digits.len().min(max).min(8);
    buf[..take].copy_from_slice(&digits[..take]);
    u64::from_le_bytes(buf)
}

/// Largest prefix of `s` that is at most `max` bytes long and ends on a char boundary.
pub fn floor_char_boundary(s: &str, max: usize) -> usize {
    if max >= s.len() {
        return s.len();
    }
    let mut end = max;
    while !s.is_char_boundary(end) {
        end -= 1;
    }
    end
}

#[macro_export]
/// Helper macro to make implementing `From` easier.
macro_rules! from_fn {
    ($to:ty, $from:ty, $fn:expr) => {
        impl From<$from> for $to {
            fn from(f: $from) -> Self { $fn(f) }
        }
    };
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn digits() {
        assert_eq!(u64_to_digits(257).as_slice(), &[1, 1]);
        assert_eq!(u64_to_digits(u64::max_value()).as_slice(), &[255; 8]);
        assert_eq!(digits_to_u64(&[1, 1], 8), 257);
        assert_eq!(digits_to_u64(&[1, 1], 1), 1);
        assert_eq!(digits_to_u64(&[], 8), 0);
    }

    #[test]
    fn char_boundary() {
        assert_eq!(floor_char_boundary("abc", 10), 3);
        assert_eq!(floor_char_boundary("abc", 2), 2);
        // 'é' is two bytes
        assert_eq!(floor_char_boundary("aé", 2), 1);
    }
}
