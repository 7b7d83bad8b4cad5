/// Converts an `i64` to `f64`.
///
/// Values beyond `2^53` lose precision; CSS values never get anywhere near
/// that, so the loss is accepted rather than reported.
///
/// # Example
/// ```
/// use csspp_expr::util::num::i64_to_f64;
///
/// assert_eq!(i64_to_f64(-42), -42.0);
/// ```
#[allow(clippy::cast_precision_loss)]
#[must_use]
pub const fn i64_to_f64(value: i64) -> f64 {
    value as f64
}

/// Converts an `f64` to `i64`, truncating toward zero and saturating at the
/// bounds of `i64`. `NaN` becomes `0`.
///
/// ## Example
/// ```
/// use csspp_expr::util::num::f64_to_i64_truncated;
///
/// assert_eq!(f64_to_i64_truncated(2.9), 2);
/// assert_eq!(f64_to_i64_truncated(-2.9), -2);
/// assert_eq!(f64_to_i64_truncated(1e300), i64::MAX);
/// ```
#[allow(clippy::cast_possible_truncation)]
#[must_use]
pub const fn f64_to_i64_truncated(value: f64) -> i64 {
    value as i64
}

/// Converts a `usize` to `i64`, saturating at `i64::MAX`.
///
/// ## Example
/// ```
/// use csspp_expr::util::num::usize_to_i64;
///
/// assert_eq!(usize_to_i64(7), 7);
/// ```
#[must_use]
pub fn usize_to_i64(value: usize) -> i64 {
    i64::try_from(value).unwrap_or(i64::MAX)
}

/// Converts an `i64` to a `usize` if and only if it can be represented
/// exactly.
///
/// ## Errors
/// Returns `Err(error)` if the value is negative or exceeds the maximum
/// representable `usize`.
///
/// ## Example
/// ```
/// use csspp_expr::util::num::i64_to_usize_checked;
///
/// assert_eq!(i64_to_usize_checked(42, ()), Ok(42));
/// assert!(i64_to_usize_checked(-1, ()).is_err());
/// ```
pub fn i64_to_usize_checked<E>(value: i64, error: E) -> Result<usize, E> {
    usize::try_from(value).map_err(|_| error)
}

/// Formats a decimal number for CSS output.
///
/// The value is rounded half away from zero to `precision` digits after the
/// decimal point, then trailing zeroes and a trailing period are removed.
/// When `remove_leading_zero` is set, `0.5` is written `.5` and `-0.5` is
/// written `-.5`.
///
/// # Parameters
/// - `d`: The number to format.
/// - `precision`: Maximum number of digits after the decimal point.
/// - `remove_leading_zero`: Whether to drop the zero before the period.
///
/// # Returns
/// The shortest textual representation at the requested precision.
///
/// # Example
/// ```
/// use csspp_expr::util::num::decimal_number_to_string;
///
/// assert_eq!(decimal_number_to_string(3.14159, 3, false), "3.142");
/// assert_eq!(decimal_number_to_string(2.5, 3, false), "2.5");
/// assert_eq!(decimal_number_to_string(18.0, 3, false), "18");
/// assert_eq!(decimal_number_to_string(0.25, 2, true), ".25");
/// assert_eq!(decimal_number_to_string(-0.25, 2, true), "-.25");
/// ```
#[must_use]
pub fn decimal_number_to_string(d: f64, precision: usize, remove_leading_zero: bool) -> String {
    let exponent = i32::try_from(precision).unwrap_or(i32::MAX);
    let half = 0.5 / 10f64.powi(exponent);
    let rounded = if d >= 0.0 { d + half } else { d - half };

    let mut out = rounded.to_string();
    if let Some(period) = out.find('.') {
        out.truncate(period + precision + 1);
        while out.ends_with('0') {
            out.pop();
        }
        if out.ends_with('.') {
            out.pop();
        }
    }
    if out == "-0" {
        out = "0".to_string();
    }

    if remove_leading_zero {
        if out.starts_with("0.") && out.len() >= 3 {
            out.remove(0);
        } else if out.starts_with("-0.") && out.len() >= 4 {
            out.remove(1);
        }
    }

    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rounds_half_away_from_zero() {
        assert_eq!(decimal_number_to_string(1.9996, 3, false), "2");
        assert_eq!(decimal_number_to_string(-1.9996, 3, false), "-2");
        assert_eq!(decimal_number_to_string(2.718_28, 3, false), "2.718");
        assert_eq!(decimal_number_to_string(0.0001, 3, false), "0");
        assert_eq!(decimal_number_to_string(-0.0001, 3, false), "0");
    }

    #[test]
    fn large_values_have_no_exponent() {
        assert_eq!(decimal_number_to_string(1e21, 3, false), "1000000000000000000000");
    }

    #[test]
    fn zero_precision() {
        assert_eq!(decimal_number_to_string(2.4, 0, false), "2");
        assert_eq!(decimal_number_to_string(2.6, 0, false), "3");
    }
}
