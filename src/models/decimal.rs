//! Scaled-integer decimal helpers
//!
//! All amounts in the budget are stored as integers scaled by a power of ten
//! (cents, thousandths of a unit, hundredths of a percent). These helpers
//! parse user input into that representation and perform rounded division
//! without ever touching floating point.

/// Parse a decimal string into an integer scaled by `10^scale`
///
/// Accepts an optional leading sign and a single decimal separator, which may
/// be either `,` or `.`. Thousands separators are not accepted. Digits beyond
/// `scale` are rounded half away from zero. Returns `None` for anything else.
pub fn parse_scaled(input: &str, scale: u32) -> Option<i64> {
    let s = input.trim();

    let (negative, s) = if let Some(stripped) = s.strip_prefix('-') {
        (true, stripped)
    } else {
        (false, s.strip_prefix('+').unwrap_or(s))
    };

    let mut parts = s.splitn(2, |c: char| c == ',' || c == '.');
    let whole = parts.next().unwrap_or("");
    let fraction = parts.next().unwrap_or("");

    if whole.is_empty() && fraction.is_empty() {
        return None;
    }
    if !whole.bytes().all(|b| b.is_ascii_digit()) || !fraction.bytes().all(|b| b.is_ascii_digit())
    {
        return None;
    }

    let factor = 10i128.checked_pow(scale)?;
    let mut value: i128 = 0;
    for digit in whole.bytes() {
        value = value.checked_mul(10)?.checked_add(i128::from(digit - b'0'))?;
    }
    value = value.checked_mul(factor)?;

    let mut place = factor;
    let mut digits = fraction.bytes();
    for digit in digits.by_ref().take(scale as usize) {
        place /= 10;
        value = value.checked_add(i128::from(digit - b'0') * place)?;
    }
    if let Some(next) = digits.next() {
        if next >= b'5' {
            value = value.checked_add(1)?;
        }
    }

    let value = if negative { -value } else { value };
    i64::try_from(value).ok()
}

/// Divide with rounding half away from zero
///
/// `denominator` must be positive. The result saturates at the `i64` bounds.
pub fn div_round(numerator: i128, denominator: i128) -> i64 {
    debug_assert!(denominator > 0);
    let quotient = numerator / denominator;
    let remainder = numerator % denominator;
    let rounded = if remainder.abs() * 2 >= denominator {
        quotient + numerator.signum()
    } else {
        quotient
    };
    i64::try_from(rounded).unwrap_or(if rounded.is_negative() {
        i64::MIN
    } else {
        i64::MAX
    })
}

/// Format a scaled integer, keeping at least `min_decimals` fraction digits
/// and trimming trailing zeros beyond that
pub fn format_scaled(value: i64, scale: u32, min_decimals: u32, separator: char) -> String {
    let factor = 10u64.pow(scale);
    let magnitude = value.unsigned_abs();
    let whole = magnitude / factor;
    let mut fraction = format!("{:0width$}", magnitude % factor, width = scale as usize);

    while fraction.len() > min_decimals as usize && fraction.ends_with('0') {
        fraction.pop();
    }

    let sign = if value < 0 { "-" } else { "" };
    if fraction.is_empty() {
        format!("{}{}", sign, whole)
    } else {
        format!("{}{}{}{}", sign, whole, separator, fraction)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_comma_and_dot() {
        assert_eq!(parse_scaled("12,5", 2), Some(1250));
        assert_eq!(parse_scaled("12.5", 2), Some(1250));
        assert_eq!(parse_scaled("12", 2), Some(1200));
        assert_eq!(parse_scaled(",5", 2), Some(50));
        assert_eq!(parse_scaled("3,", 3), Some(3000));
        assert_eq!(parse_scaled("  -0,05 ", 2), Some(-5));
    }

    #[test]
    fn test_parse_rounds_extra_digits() {
        assert_eq!(parse_scaled("1,005", 2), Some(101));
        assert_eq!(parse_scaled("1,004", 2), Some(100));
        assert_eq!(parse_scaled("-1,005", 2), Some(-101));
    }

    #[test]
    fn test_parse_rejects_garbage() {
        assert_eq!(parse_scaled("", 2), None);
        assert_eq!(parse_scaled("abc", 2), None);
        assert_eq!(parse_scaled("1.234,56", 2), None);
        assert_eq!(parse_scaled("1 000", 2), None);
        assert_eq!(parse_scaled(",", 2), None);
        assert_eq!(parse_scaled("99999999999999999999", 2), None);
    }

    #[test]
    fn test_div_round() {
        assert_eq!(div_round(5, 2), 3);
        assert_eq!(div_round(-5, 2), -3);
        assert_eq!(div_round(4, 3), 1);
        assert_eq!(div_round(2_000_000, 1000), 2000);
        assert_eq!(div_round(0, 7), 0);
    }

    #[test]
    fn test_format_scaled() {
        assert_eq!(format_scaled(2500, 3, 0, ','), "2,5");
        assert_eq!(format_scaled(2000, 3, 0, ','), "2");
        assert_eq!(format_scaled(125, 3, 0, '.'), "0.125");
        assert_eq!(format_scaled(1250, 2, 2, '.'), "12.50");
        assert_eq!(format_scaled(-50, 2, 2, '.'), "-0.50");
    }
}
