use std::fmt;
use std::hash::{Hash, Hasher};
use std::str::FromStr;

use num_bigint::BigUint;
use smallvec::SmallVec;

use crate::constants::{
    DEFAULT_MAX_EXPONENT, MAX_EXPONENT, MAX_FAST_DECIMAL_DIGITS, MAX_FAST_HEX_DIGITS,
};
use crate::error::NumberError;

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
enum Magnitude {
    Small(u64),
    Big(BigUint),
}

impl Magnitude {
    fn from_big(big: BigUint) -> Self {
        match u64::try_from(&big) {
            Ok(small) => Magnitude::Small(small),
            Err(_) => Magnitude::Big(big),
        }
    }

    fn is_zero(&self) -> bool {
        match self {
            Magnitude::Small(value) => *value == 0,
            Magnitude::Big(value) => value.bits() == 0,
        }
    }

    fn digits(&self) -> String {
        match self {
            Magnitude::Small(value) => {
                let mut buffer = itoa::Buffer::new();
                buffer.format(*value).to_string()
            }
            Magnitude::Big(value) => value.to_str_radix(10),
        }
    }

    fn to_biguint(&self) -> BigUint {
        match self {
            Magnitude::Small(value) => BigUint::from(*value),
            Magnitude::Big(value) => value.clone(),
        }
    }
}

/// An exact base-10 number: `±magnitude × 10^exponent`.
///
/// The literal's own scale is kept (`1.50` has exponent `-2`), but equality and
/// hashing compare the numeric value, so `1.50 == 1.5` and `-0 == 0`.
#[derive(Debug, Clone)]
pub struct Decimal {
    negative: bool,
    magnitude: Magnitude,
    exponent: i64,
}

impl Decimal {
    pub fn zero() -> Self {
        Self {
            negative: false,
            magnitude: Magnitude::Small(0),
            exponent: 0,
        }
    }

    /// Fails with `OutOfRange("exponent")` when `|exponent|` exceeds [`MAX_EXPONENT`].
    pub fn new(negative: bool, magnitude: BigUint, exponent: i64) -> Result<Self, NumberError> {
        if exponent.unsigned_abs() > MAX_EXPONENT as u64 {
            return Err(NumberError::OutOfRange("exponent"));
        }
        Ok(Self::from_parts(negative, magnitude, exponent))
    }

    pub(crate) fn from_parts(negative: bool, magnitude: BigUint, exponent: i64) -> Self {
        Self {
            negative,
            magnitude: Magnitude::from_big(magnitude),
            exponent,
        }
    }

    pub(crate) fn from_small(negative: bool, magnitude: u64, exponent: i64) -> Self {
        Self {
            negative,
            magnitude: Magnitude::Small(magnitude),
            exponent,
        }
    }

    /// Builds a decimal from the digit runs of a literal such as `12.50e3`.
    ///
    /// `int_digits` and `frac_digits` must be ASCII digits; at least one of them
    /// is non-empty.
    pub(crate) fn from_digits(
        negative: bool,
        int_digits: &str,
        frac_digits: &str,
        literal_exponent: i64,
    ) -> Self {
        Self::from_digits_fast(negative, int_digits, frac_digits, literal_exponent)
            .unwrap_or_else(|| {
                Self::from_digits_slow(negative, int_digits, frac_digits, literal_exponent)
            })
    }

    pub(crate) fn from_digits_fast(
        negative: bool,
        int_digits: &str,
        frac_digits: &str,
        literal_exponent: i64,
    ) -> Option<Self> {
        if int_digits.len() + frac_digits.len() > MAX_FAST_DECIMAL_DIGITS {
            return None;
        }
        let mut mantissa: u64 = 0;
        for byte in int_digits.bytes().chain(frac_digits.bytes()) {
            mantissa = mantissa
                .checked_mul(10)?
                .checked_add(u64::from(byte - b'0'))?;
        }
        Some(Self::from_small(
            negative,
            mantissa,
            scaled_exponent(literal_exponent, frac_digits.len()),
        ))
    }

    pub(crate) fn from_digits_slow(
        negative: bool,
        int_digits: &str,
        frac_digits: &str,
        literal_exponent: i64,
    ) -> Self {
        let mut digits: SmallVec<[u8; 64]> = SmallVec::new();
        digits.extend_from_slice(int_digits.as_bytes());
        digits.extend_from_slice(frac_digits.as_bytes());
        let magnitude = BigUint::parse_bytes(&digits, 10).unwrap_or_default();
        Self::from_parts(
            negative,
            magnitude,
            scaled_exponent(literal_exponent, frac_digits.len()),
        )
    }

    pub(crate) fn from_hex_digits(negative: bool, hex_digits: &str) -> Self {
        if hex_digits.len() <= MAX_FAST_HEX_DIGITS {
            if let Ok(value) = u64::from_str_radix(hex_digits, 16) {
                return Self::from_small(negative, value, 0);
            }
        }
        let magnitude = BigUint::parse_bytes(hex_digits.as_bytes(), 16).unwrap_or_default();
        Self::from_parts(negative, magnitude, 0)
    }

    /// Shortest decimal that reads back as `value`. `None` for NaN and infinities.
    pub fn from_f64(value: f64) -> Option<Self> {
        if !value.is_finite() {
            return None;
        }
        let mut buffer = ryu::Buffer::new();
        parse_plain(buffer.format_finite(value))
    }

    pub fn from_f32(value: f32) -> Option<Self> {
        if !value.is_finite() {
            return None;
        }
        let mut buffer = ryu::Buffer::new();
        parse_plain(buffer.format_finite(value))
    }

    pub fn is_zero(&self) -> bool {
        self.magnitude.is_zero()
    }

    pub fn is_negative(&self) -> bool {
        self.negative && !self.is_zero()
    }

    /// Power of ten applied to the magnitude, as written in the literal.
    pub fn exponent(&self) -> i64 {
        self.exponent
    }

    /// Number of digits after the decimal point (`-exponent`).
    pub fn scale(&self) -> i64 {
        self.exponent.saturating_neg()
    }

    pub fn magnitude(&self) -> BigUint {
        self.magnitude.to_biguint()
    }

    pub fn is_integer(&self) -> bool {
        self.normalized().exponent >= 0
    }

    /// Same value with trailing zeros moved into the exponent; zero becomes `0e0`.
    pub fn normalized(&self) -> Decimal {
        if self.is_zero() {
            return Decimal::zero();
        }
        match &self.magnitude {
            Magnitude::Small(value) => {
                let mut value = *value;
                let mut exponent = self.exponent;
                while value % 10 == 0 {
                    value /= 10;
                    exponent = exponent.saturating_add(1);
                }
                Self::from_small(self.negative, value, exponent)
            }
            Magnitude::Big(value) => {
                let digits = value.to_str_radix(10);
                let trimmed = digits.trim_end_matches('0');
                let stripped = (digits.len() - trimmed.len()) as i64;
                if stripped == 0 {
                    return self.clone();
                }
                let magnitude = BigUint::parse_bytes(trimmed.as_bytes(), 10).unwrap_or_default();
                Self::from_parts(self.negative, magnitude, self.exponent.saturating_add(stripped))
            }
        }
    }

    /// Integral part of the magnitude (fraction truncated), or `None` past `u128`.
    fn truncated_magnitude(&self) -> Option<u128> {
        let normalized = self.normalized();
        if normalized.exponent >= 0 {
            let mut value = match &normalized.magnitude {
                Magnitude::Small(value) => u128::from(*value),
                Magnitude::Big(value) => u128::try_from(value).ok()?,
            };
            if value == 0 {
                return Some(0);
            }
            for _ in 0..normalized.exponent {
                value = value.checked_mul(10)?;
            }
            return Some(value);
        }
        let digits = normalized.magnitude.digits();
        let dropped = normalized.exponent.unsigned_abs();
        if dropped >= digits.len() as u64 {
            return Some(0);
        }
        digits[..digits.len() - dropped as usize].parse::<u128>().ok()
    }

    pub(crate) fn to_i128(&self, target: &'static str) -> Result<i128, NumberError> {
        let magnitude = self
            .truncated_magnitude()
            .ok_or(NumberError::OutOfRange(target))?;
        if self.negative {
            if magnitude == i128::MIN.unsigned_abs() {
                return Ok(i128::MIN);
            }
            i128::try_from(magnitude)
                .map(|value| -value)
                .map_err(|_| NumberError::OutOfRange(target))
        } else {
            i128::try_from(magnitude).map_err(|_| NumberError::OutOfRange(target))
        }
    }

    /// Truncating conversion to any integer type that `i128` narrows into.
    pub fn to_integer<T: TryFrom<i128>>(&self, target: &'static str) -> Result<T, NumberError> {
        let value = self.to_i128(target)?;
        T::try_from(value).map_err(|_| NumberError::OutOfRange(target))
    }

    pub fn to_u128(&self) -> Result<u128, NumberError> {
        let magnitude = self
            .truncated_magnitude()
            .ok_or(NumberError::OutOfRange("u128"))?;
        if self.negative && magnitude != 0 {
            return Err(NumberError::OutOfRange("u128"));
        }
        Ok(magnitude)
    }

    fn scientific_text(&self) -> String {
        let sign = if self.negative { "-" } else { "" };
        format!("{sign}{}e{}", self.magnitude.digits(), self.exponent)
    }

    pub fn to_f64(&self) -> Result<f64, NumberError> {
        let text = self.scientific_text();
        let value = text
            .parse::<f64>()
            .map_err(|_| NumberError::Malformed(text.clone()))?;
        if value.is_finite() {
            Ok(value)
        } else {
            Err(NumberError::OutOfRange("f64"))
        }
    }

    pub fn to_f32(&self) -> Result<f32, NumberError> {
        let text = self.scientific_text();
        let value = text
            .parse::<f32>()
            .map_err(|_| NumberError::Malformed(text.clone()))?;
        if value.is_finite() {
            Ok(value)
        } else {
            Err(NumberError::OutOfRange("f32"))
        }
    }

    /// Plain (non-exponential) text with trailing fractional zeros removed.
    pub fn to_plain_string(&self) -> String {
        let normalized = self.normalized();
        if normalized.is_zero() {
            return "0".to_string();
        }
        let digits = normalized.magnitude.digits();
        let mut out = String::with_capacity(digits.len() + 2);
        if normalized.negative {
            out.push('-');
        }
        if normalized.exponent >= 0 {
            out.push_str(&digits);
            out.push_str(&"0".repeat(normalized.exponent as usize));
            return out;
        }
        let fraction = normalized.exponent.unsigned_abs() as usize;
        if digits.len() > fraction {
            let point = digits.len() - fraction;
            out.push_str(&digits[..point]);
            out.push('.');
            out.push_str(&digits[point..]);
        } else {
            out.push_str("0.");
            out.push_str(&"0".repeat(fraction - digits.len()));
            out.push_str(&digits);
        }
        out
    }
}

fn scaled_exponent(literal_exponent: i64, fraction_digits: usize) -> i64 {
    literal_exponent.saturating_sub(fraction_digits as i64)
}

/// Parses `[+-]digits[.digits][(e|E)[+-]digits]`, the shape produced by float formatters.
fn parse_plain(text: &str) -> Option<Decimal> {
    let (negative, rest) = match text.as_bytes().first() {
        Some(b'-') => (true, &text[1..]),
        Some(b'+') => (false, &text[1..]),
        _ => (false, text),
    };
    let (mantissa, exponent) = match rest.find(|ch| ch == 'e' || ch == 'E') {
        Some(idx) => (&rest[..idx], rest[idx + 1..].parse::<i64>().ok()?),
        None => (rest, 0),
    };
    let (int_digits, frac_digits) = match mantissa.find('.') {
        Some(idx) => (&mantissa[..idx], &mantissa[idx + 1..]),
        None => (mantissa, ""),
    };
    if int_digits.is_empty() && frac_digits.is_empty() {
        return None;
    }
    if !int_digits
        .bytes()
        .chain(frac_digits.bytes())
        .all(|byte| byte.is_ascii_digit())
    {
        return None;
    }
    let scaled = scaled_exponent(exponent, frac_digits.len());
    if exponent.unsigned_abs() > u64::from(DEFAULT_MAX_EXPONENT)
        || scaled.unsigned_abs() > MAX_EXPONENT as u64
    {
        return None;
    }
    Some(Decimal::from_digits(
        negative,
        int_digits,
        frac_digits,
        exponent,
    ))
}

impl PartialEq for Decimal {
    fn eq(&self, other: &Self) -> bool {
        let lhs = self.normalized();
        let rhs = other.normalized();
        lhs.negative == rhs.negative
            && lhs.exponent == rhs.exponent
            && lhs.magnitude == rhs.magnitude
    }
}

impl Eq for Decimal {}

impl Hash for Decimal {
    fn hash<H: Hasher>(&self, state: &mut H) {
        let normalized = self.normalized();
        normalized.negative.hash(state);
        normalized.exponent.hash(state);
        normalized.magnitude.hash(state);
    }
}

impl fmt::Display for Decimal {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_plain_string())
    }
}

impl FromStr for Decimal {
    type Err = NumberError;

    fn from_str(text: &str) -> Result<Self, Self::Err> {
        parse_plain(text).ok_or_else(|| NumberError::Malformed(text.to_string()))
    }
}

macro_rules! impl_from_signed {
    ($($ty:ty),*) => {
        $(
            impl From<$ty> for Decimal {
                fn from(value: $ty) -> Self {
                    Decimal::from_small(value < 0, (value as i64).unsigned_abs(), 0)
                }
            }
        )*
    };
}

macro_rules! impl_from_unsigned {
    ($($ty:ty),*) => {
        $(
            impl From<$ty> for Decimal {
                fn from(value: $ty) -> Self {
                    Decimal::from_small(false, value as u64, 0)
                }
            }
        )*
    };
}

impl_from_signed!(i8, i16, i32, i64, isize);
impl_from_unsigned!(u8, u16, u32, u64, usize);

impl From<i128> for Decimal {
    fn from(value: i128) -> Self {
        Decimal::from_parts(value < 0, BigUint::from(value.unsigned_abs()), 0)
    }
}

impl From<u128> for Decimal {
    fn from(value: u128) -> Self {
        Decimal::from_parts(false, BigUint::from(value), 0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn dec(text: &str) -> Decimal {
        text.parse().unwrap()
    }

    #[rstest::rstest]
    #[case("0", "0")]
    #[case("-0", "0")]
    #[case("-0.000", "0")]
    #[case("1.50", "1.5")]
    #[case("100", "100")]
    #[case("1e3", "1000")]
    #[case("1.25e-5", "0.0000125")]
    #[case("-12.5e1", "-125")]
    #[case("123456789012345678901234567890", "123456789012345678901234567890")]
    #[case("0.000000000000000000000000000001", "0.000000000000000000000000000001")]
    fn test_plain_string(#[case] input: &str, #[case] expected: &str) {
        assert_eq!(dec(input).to_plain_string(), expected);
    }

    #[rstest::rstest]
    fn test_numeric_equality() {
        assert_eq!(dec("1.50"), dec("1.5"));
        assert_eq!(dec("-0"), dec("0"));
        assert_eq!(dec("1e2"), dec("100"));
        assert_ne!(dec("1.5"), dec("-1.5"));
        assert_ne!(dec("1"), dec("10"));
    }

    #[rstest::rstest]
    fn test_scale_is_kept() {
        let value = dec("1.50");
        assert_eq!(value.exponent(), -2);
        assert_eq!(value.scale(), 2);
        assert_eq!(value.magnitude(), BigUint::from(150u32));
    }

    #[rstest::rstest]
    fn test_big_magnitude_that_fits_is_small() {
        let slow = Decimal::from_digits_slow(false, "00000000000000000000042", "", 0);
        assert_eq!(slow.magnitude, Magnitude::Small(42));
    }

    #[rstest::rstest]
    #[case("12.9", 12)]
    #[case("-12.9", -12)]
    #[case("1e3", 1000)]
    #[case("-0.5", 0)]
    fn test_truncating_integer(#[case] input: &str, #[case] expected: i64) {
        assert_eq!(dec(input).to_integer::<i64>("i64").unwrap(), expected);
    }

    #[rstest::rstest]
    fn test_integer_out_of_range() {
        assert_eq!(
            dec("300").to_integer::<i8>("i8"),
            Err(NumberError::OutOfRange("i8"))
        );
        assert_eq!(
            dec("1e40").to_integer::<i64>("i64"),
            Err(NumberError::OutOfRange("i64"))
        );
        assert_eq!(dec("-1").to_u128(), Err(NumberError::OutOfRange("u128")));
        assert_eq!(
            dec("-170141183460469231731687303715884105728")
                .to_integer::<i128>("i128")
                .unwrap(),
            i128::MIN
        );
    }

    #[rstest::rstest]
    fn test_float_conversion() {
        assert_eq!(dec("0.1").to_f64().unwrap(), 0.1);
        assert_eq!(dec("-2.5e-3").to_f64().unwrap(), -0.0025);
        assert_eq!(dec("1e400").to_f64(), Err(NumberError::OutOfRange("f64")));
        assert_eq!(dec("1e-400").to_f64().unwrap(), 0.0);
        assert_eq!(dec("3.5").to_f32().unwrap(), 3.5f32);
    }

    #[rstest::rstest]
    fn test_from_f64_uses_shortest_form() {
        assert_eq!(Decimal::from_f64(0.1).unwrap().to_plain_string(), "0.1");
        assert_eq!(Decimal::from_f64(1e21).unwrap().to_plain_string(), "1000000000000000000000");
        assert_eq!(Decimal::from_f64(-0.0).unwrap().to_plain_string(), "0");
        assert!(Decimal::from_f64(f64::NAN).is_none());
    }

    #[rstest::rstest]
    fn test_hex_digits() {
        assert_eq!(Decimal::from_hex_digits(false, "1F"), Decimal::from(31u8));
        assert_eq!(
            Decimal::from_hex_digits(true, "FFFFFFFFFFFFFFFFFF").to_plain_string(),
            "-4722366482869645213695"
        );
    }

    #[rstest::rstest]
    fn test_constructor_bounds_exponent() {
        let big = BigUint::from(7u8);
        assert!(Decimal::new(false, big.clone(), MAX_EXPONENT).is_ok());
        assert_eq!(
            Decimal::new(false, big.clone(), i64::MIN).map(|_| ()),
            Err(NumberError::OutOfRange("exponent"))
        );
        assert_eq!(
            Decimal::new(true, big, MAX_EXPONENT + 1).map(|_| ()),
            Err(NumberError::OutOfRange("exponent"))
        );
        let value = Decimal::new(false, BigUint::from(1000u32), -MAX_EXPONENT).unwrap();
        assert_eq!(value.scale(), MAX_EXPONENT);
        assert_eq!(value.normalized().exponent(), 3 - MAX_EXPONENT);
    }

    #[rstest::rstest]
    fn test_from_str_rejects_huge_exponents() {
        assert!("1e4096".parse::<Decimal>().is_ok());
        assert!("1e4097".parse::<Decimal>().is_err());
        assert!("1e-2147483647".parse::<Decimal>().is_err());
    }

    #[rstest::rstest]
    fn test_from_str_rejects_garbage() {
        assert!("".parse::<Decimal>().is_err());
        assert!(".".parse::<Decimal>().is_err());
        assert!("1x".parse::<Decimal>().is_err());
        assert!("1e".parse::<Decimal>().is_err());
    }

    proptest! {
        #[test]
        fn fast_and_slow_paths_agree(
            int_digits in "[0-9]{0,9}",
            frac_digits in "[0-9]{0,9}",
            exponent in -400i64..400,
            negative in any::<bool>(),
        ) {
            prop_assume!(!int_digits.is_empty() || !frac_digits.is_empty());
            let fast = Decimal::from_digits_fast(negative, &int_digits, &frac_digits, exponent);
            let slow = Decimal::from_digits_slow(negative, &int_digits, &frac_digits, exponent);
            prop_assert!(fast.is_some());
            let fast = fast.unwrap();
            prop_assert_eq!(&fast, &slow);
            prop_assert_eq!(fast.exponent(), slow.exponent());
            prop_assert_eq!(fast.magnitude(), slow.magnitude());
            prop_assert_eq!(fast.to_plain_string(), slow.to_plain_string());
        }

        #[test]
        fn eighteen_digit_literals_take_the_fast_path(digits in "[1-9][0-9]{0,17}") {
            let fast = Decimal::from_digits_fast(false, &digits, "", 0).unwrap();
            let slow = Decimal::from_digits_slow(false, &digits, "", 0);
            prop_assert_eq!(fast.magnitude, slow.magnitude);
        }
    }
}
