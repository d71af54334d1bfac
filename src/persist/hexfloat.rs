//! Exact hexadecimal floating-point text encoding for `f32`.
//!
//! The format is the C `%a` shape: `[-]0x1.<hex fraction>p<+/-><exponent>`,
//! e.g. `0x1.99999ap-4` for 0.1. Every finite f32 has a unique shortest
//! form, the decimal exponent is a power of two, and no precision is lost -
//! which is the whole point: persisted curves must rebuild bit-for-bit, on
//! any machine, under any locale.
//!
//! Rust's std has no `%a` equivalent, so this is done directly on the bit
//! representation: 1 sign bit, 8 exponent bits (bias 127), 23 fraction
//! bits. The 23 fraction bits are shifted up by one to make six whole hex
//! digits, then trailing zeros are trimmed.

const FRACTION_BITS: u32 = 23;
const FRACTION_MASK: u32 = (1 << FRACTION_BITS) - 1;
const IMPLICIT_BIT: u32 = 1 << FRACTION_BITS;
const EXPONENT_BIAS: i32 = 127;

/// Encode an `f32` in exact hex-float form.
///
/// Non-finite values have no `%a` shape; they are snapped to the nearest
/// finite value (NaN to zero) so the emitted record always parses back.
pub fn to_hex_float(value: f32) -> String {
    let value = if value.is_finite() {
        value
    } else if value.is_nan() {
        0.0
    } else if value > 0.0 {
        f32::MAX
    } else {
        f32::MIN
    };

    let bits = value.to_bits();
    let sign = if bits >> 31 == 1 { "-" } else { "" };
    let exp_raw = ((bits >> FRACTION_BITS) & 0xff) as i32;
    let fraction = bits & FRACTION_MASK;

    if exp_raw == 0 && fraction == 0 {
        return format!("{sign}0x0p+0");
    }

    let (fraction, exp) = if exp_raw == 0 {
        // Subnormal: shift until the leading bit is explicit so the output
        // keeps the 0x1. shape.
        let mut fraction = fraction;
        let mut exp = 1 - EXPONENT_BIAS;
        while fraction & IMPLICIT_BIT == 0 {
            fraction <<= 1;
            exp -= 1;
        }
        (fraction & FRACTION_MASK, exp)
    } else {
        (fraction, exp_raw - EXPONENT_BIAS)
    };

    // 23 fraction bits -> 24 bits -> exactly six hex digits.
    let mut digits = format!("{:06x}", fraction << 1);
    while digits.ends_with('0') {
        digits.pop();
    }

    if digits.is_empty() {
        format!("{sign}0x1p{exp:+}")
    } else {
        format!("{sign}0x1.{digits}p{exp:+}")
    }
}

/// Parse a hex-float token. The whole input must be one value; trailing
/// garbage is an error.
pub fn parse_hex_float(text: &str) -> Result<f32, HexFloatError> {
    let mut s = text;

    let negative = if let Some(rest) = s.strip_prefix('-') {
        s = rest;
        true
    } else {
        if let Some(rest) = s.strip_prefix('+') {
            s = rest;
        }
        false
    };

    s = s
        .strip_prefix("0x")
        .or_else(|| s.strip_prefix("0X"))
        .ok_or(HexFloatError::MissingPrefix)?;

    let bytes = s.as_bytes();
    let mut mantissa: u64 = 0;
    let mut folded_digits = 0usize;
    let mut seen_digit = false;
    let mut in_fraction = false;
    let mut frac_digits: i32 = 0;
    let mut dropped_int_digits: i32 = 0;
    let mut i = 0usize;

    while i < bytes.len() {
        let c = bytes[i];
        if c == b'.' {
            if in_fraction {
                return Err(HexFloatError::MalformedMantissa);
            }
            in_fraction = true;
            i += 1;
            continue;
        }

        let Some(digit) = (c as char).to_digit(16) else {
            break;
        };
        seen_digit = true;

        // 16 hex digits saturate a u64; further digits only shift scale
        // (integer side) or fall below f32 precision (fraction side).
        if folded_digits < 16 {
            mantissa = mantissa * 16 + u64::from(digit);
            folded_digits += 1;
            if in_fraction {
                frac_digits += 1;
            }
        } else if !in_fraction {
            dropped_int_digits += 1;
        }
        i += 1;
    }

    if !seen_digit {
        return Err(HexFloatError::MissingDigits);
    }
    if i >= bytes.len() || (bytes[i] != b'p' && bytes[i] != b'P') {
        return Err(HexFloatError::MissingExponent);
    }

    let exp: i32 = s[i + 1..]
        .parse()
        .map_err(|_| HexFloatError::MalformedExponent)?;

    // The mantissa fits in 53 bits of an f64 only when it fits in 16 hex
    // digits minus rounding; for the values this crate emits (<= 6 fraction
    // digits) the conversion below is exact.
    let scale = exp.saturating_add(4 * dropped_int_digits).saturating_sub(4 * frac_digits);
    let value = (mantissa as f64) * 2.0f64.powi(scale.clamp(-1100, 1100));
    let value = value as f32;

    Ok(if negative { -value } else { value })
}

/// Errors from [`parse_hex_float`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HexFloatError {
    /// No `0x` prefix.
    MissingPrefix,
    /// Prefix present but no hex digits follow.
    MissingDigits,
    /// More than one `.` in the mantissa.
    MalformedMantissa,
    /// No `p` exponent marker.
    MissingExponent,
    /// The exponent is not a decimal integer.
    MalformedExponent,
}

impl std::fmt::Display for HexFloatError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let reason = match self {
            HexFloatError::MissingPrefix => "missing 0x prefix",
            HexFloatError::MissingDigits => "no hex digits in mantissa",
            HexFloatError::MalformedMantissa => "malformed mantissa",
            HexFloatError::MissingExponent => "missing p exponent marker",
            HexFloatError::MalformedExponent => "exponent is not a decimal integer",
        };
        write!(f, "invalid hex float: {reason}")
    }
}

impl std::error::Error for HexFloatError {}
