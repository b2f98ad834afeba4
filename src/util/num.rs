/// `2^53 - 1`: integers up to this magnitude survive a trip through `f64`.
pub const MAX_SAFE_U64_INT: u64 = 9_007_199_254_740_991;

/// Number of significant digits used when displaying reals.
pub const REAL_SIGNIFICANT_DIGITS: i32 = 16;

/// Widens an integer to a real.
///
/// Magnitudes above [`MAX_SAFE_U64_INT`] round to the nearest representable
/// real; the conversion never fails.
///
/// ## Example
/// ```
/// use nepa::util::num::{MAX_SAFE_U64_INT, i64_to_f64_widening};
///
/// assert_eq!(i64_to_f64_widening(-7), -7.0);
/// assert_eq!(i64_to_f64_widening(MAX_SAFE_U64_INT as i64 + 2), 9_007_199_254_740_992.0);
/// ```
#[allow(clippy::cast_precision_loss)]
#[must_use]
pub const fn i64_to_f64_widening(value: i64) -> f64 {
    value as f64
}

/// Truncates a float towards zero into an `i64`.
///
/// Returns `None` for NaN, infinities and values outside the `i64` range.
///
/// ## Example
/// ```
/// use nepa::util::num::f64_to_i64_truncating;
///
/// assert_eq!(f64_to_i64_truncating(3.9), Some(3));
/// assert_eq!(f64_to_i64_truncating(-3.9), Some(-3));
/// assert_eq!(f64_to_i64_truncating(f64::NAN), None);
/// ```
#[allow(clippy::cast_possible_truncation, clippy::cast_precision_loss)]
#[must_use]
pub fn f64_to_i64_truncating(value: f64) -> Option<i64> {
    if !value.is_finite() {
        return None;
    }
    let truncated = value.trunc();
    if truncated < i64::MIN as f64 || truncated >= i64::MAX as f64 {
        return None;
    }
    Some(truncated as i64)
}

/// Converts a float into an `i64` only when it is integral and exactly
/// representable.
///
/// Used to narrow arithmetic results computed in `f64` back to integers.
///
/// ## Example
/// ```
/// use nepa::util::num::f64_to_i64_exact;
///
/// assert_eq!(f64_to_i64_exact(5.0), Some(5));
/// assert_eq!(f64_to_i64_exact(5.5), None);
/// ```
#[allow(clippy::cast_possible_truncation, clippy::cast_precision_loss)]
#[must_use]
pub fn f64_to_i64_exact(value: f64) -> Option<i64> {
    if !value.is_finite() || value.fract() != 0.0 || value.abs() > MAX_SAFE_U64_INT as f64 {
        return None;
    }
    Some(value as i64)
}

/// Resolves a possibly out-of-range index against a sequence length.
///
/// Indices are 0-based; negative indices are rejected.
///
/// ## Example
/// ```
/// use nepa::util::num::checked_index;
///
/// assert_eq!(checked_index(2, 3), Some(2));
/// assert_eq!(checked_index(3, 3), None);
/// assert_eq!(checked_index(-1, 3), None);
/// ```
#[must_use]
pub fn checked_index(index: i64, len: usize) -> Option<usize> {
    usize::try_from(index).ok().filter(|i| *i < len)
}

/// Formats a real with up to sixteen significant digits, trimming trailing
/// zeros.
///
/// Very large and very small magnitudes switch to scientific notation.
///
/// ## Example
/// ```
/// use nepa::util::num::format_real;
///
/// assert_eq!(format_real(10.0 / 3.0), "3.333333333333333");
/// assert_eq!(format_real(5.0), "5");
/// assert_eq!(format_real(0.1 + 0.2), "0.3");
/// assert_eq!(format_real(-2.5), "-2.5");
/// ```
#[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
#[must_use]
pub fn format_real(value: f64) -> String {
    if value.is_nan() {
        return "NaN".to_string();
    }
    if value.is_infinite() {
        return if value > 0.0 { "Inf" } else { "-Inf" }.to_string();
    }
    if value == 0.0 {
        return "0".to_string();
    }

    let exponent = value.abs().log10().floor() as i32;
    if !(-5..REAL_SIGNIFICANT_DIGITS).contains(&exponent) {
        let precision = (REAL_SIGNIFICANT_DIGITS - 1) as usize;
        let formatted = format!("{value:.precision$e}");
        return match formatted.split_once('e') {
            Some((mantissa, exp)) => format!("{}e{exp}", trim_fraction(mantissa)),
            None => formatted,
        };
    }

    let decimals = (REAL_SIGNIFICANT_DIGITS - 1 - exponent).max(0) as usize;
    let formatted = format!("{value:.decimals$}");
    let trimmed = trim_fraction(&formatted);
    if trimmed == "-0" { "0".to_string() } else { trimmed.to_string() }
}

/// Formats a value with exactly two fraction digits.
///
/// ## Example
/// ```
/// use nepa::util::num::format_decimal;
///
/// assert_eq!(format_decimal(3.14159), "3.14");
/// assert_eq!(format_decimal(2.0), "2.00");
/// ```
#[must_use]
pub fn format_decimal(value: f64) -> String {
    format!("{value:.2}")
}

fn trim_fraction(text: &str) -> &str {
    if text.contains('.') {
        text.trim_end_matches('0').trim_end_matches('.')
    } else {
        text
    }
}
