use alloc::string::String;

/// Conversion of an array element into a byte, used by
/// [`ByteBuffer::from_array`](crate::ByteBuffer::from_array).
///
/// Numbers are truncated toward zero and reduced modulo 256, so `-1` becomes
/// `255` and `257` becomes `1`. Strings may also carry an unsigned `0x`,
/// `0o` or `0b` prefix. Anything that is not a number (`NaN`,
/// infinities, unparsable strings, `None`) becomes `0`.
///
/// ```
/// use bufevent::ByteValue;
///
/// assert_eq!(300_i32.to_byte(), 44);
/// assert_eq!((-1.9_f64).to_byte(), 255);
/// assert_eq!(" 17 ".to_byte(), 17);
/// assert_eq!("seventeen".to_byte(), 0);
/// ```
pub trait ByteValue {
    /// The byte stored for this element.
    fn to_byte(&self) -> u8;
}

macro_rules! impl_byte_value_for_int {
    ($($t:ty),*) => {
        $(
            impl ByteValue for $t {
                #[inline]
                #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
                fn to_byte(&self) -> u8 {
                    *self as u8
                }
            }
        )*
    };
}

impl_byte_value_for_int!(u8, u16, u32, u64, u128, usize, i8, i16, i32, i64, i128, isize);

// Every finite f64 at or beyond 2^63 in magnitude is a multiple of 2^11, so
// its value modulo 256 is zero.
const TWO_POW_63: f64 = 9_223_372_036_854_775_808.0;

impl ByteValue for f64 {
    #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
    fn to_byte(&self) -> u8 {
        let v = *self;
        if !(v > -TWO_POW_63 && v < TWO_POW_63) {
            return 0;
        }
        (v as i64) as u8
    }
}

impl ByteValue for f32 {
    fn to_byte(&self) -> u8 {
        f64::from(*self).to_byte()
    }
}

impl ByteValue for bool {
    fn to_byte(&self) -> u8 {
        u8::from(*self)
    }
}

impl ByteValue for str {
    fn to_byte(&self) -> u8 {
        let trimmed = self.trim();
        if trimmed.is_empty() {
            return 0;
        }
        radix_literal(trimmed)
            .or_else(|| trimmed.parse::<f64>().ok())
            .map_or(0, |n| n.to_byte())
    }
}

/// `0x`/`0o`/`0b` integer literals, unsigned, any letter case. Digits are
/// folded into an `f64` so very long literals round like other numbers.
fn radix_literal(text: &str) -> Option<f64> {
    let bytes = text.as_bytes();
    if bytes.len() < 3 || bytes[0] != b'0' {
        return None;
    }
    let radix = match bytes[1].to_ascii_lowercase() {
        b'x' => 16,
        b'o' => 8,
        b'b' => 2,
        _ => return None,
    };
    text[2..].chars().try_fold(0.0_f64, |acc, c| {
        c.to_digit(radix)
            .map(|d| acc * f64::from(radix) + f64::from(d))
    })
}

impl ByteValue for String {
    fn to_byte(&self) -> u8 {
        self.as_str().to_byte()
    }
}

impl<T: ByteValue> ByteValue for Option<T> {
    fn to_byte(&self) -> u8 {
        self.as_ref().map_or(0, ByteValue::to_byte)
    }
}

impl<T: ByteValue + ?Sized> ByteValue for &T {
    fn to_byte(&self) -> u8 {
        (**self).to_byte()
    }
}

#[cfg(test)]
mod tests {
    use rstest::rstest;

    use super::*;

    #[rstest]
    #[case(0.0, 0)]
    #[case(255.9, 255)]
    #[case(256.0, 0)]
    #[case(-1.0, 255)]
    #[case(-0.5, 0)]
    #[case(f64::NAN, 0)]
    #[case(f64::INFINITY, 0)]
    #[case(f64::NEG_INFINITY, 0)]
    #[case(1e300, 0)]
    fn floats_wrap_modulo_256(#[case] input: f64, #[case] expected: u8) {
        assert_eq!(input.to_byte(), expected);
    }

    #[test]
    fn integers_wrap_modulo_256() {
        assert_eq!(257_u32.to_byte(), 1);
        assert_eq!((-256_i64).to_byte(), 0);
        assert_eq!((-255_i16).to_byte(), 1);
    }

    #[rstest]
    #[case("0x10", 16)]
    #[case("0XfF", 255)]
    #[case("0x101", 1)]
    #[case(" 0b11 ", 3)]
    #[case("0o17", 15)]
    #[case("0x", 0)]
    #[case("0xg1", 0)]
    #[case("-0x10", 0)]
    #[case("0b12", 0)]
    fn prefixed_integer_strings(#[case] input: &str, #[case] expected: u8) {
        assert_eq!(input.to_byte(), expected);
    }

    #[test]
    fn non_numbers_become_zero() {
        assert_eq!("".to_byte(), 0);
        assert_eq!("abc".to_byte(), 0);
        assert_eq!(None::<u8>.to_byte(), 0);
        assert_eq!(Some(7_u8).to_byte(), 7);
        assert_eq!(true.to_byte(), 1);
    }
}
