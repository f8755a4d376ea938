//! Number formatting with thousands separators.

/// Format a count with `,` between groups of three digits.
pub fn group_thousands(n: u64) -> String {
    group_digits(&n.to_string())
}

/// Insert separators into a plain run of ASCII digits.
fn group_digits(digits: &str) -> String {
    let mut out = String::with_capacity(digits.len() + digits.len() / 3);
    for (i, ch) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            out.push(',');
        }
        out.push(ch);
    }
    out
}

/// Format a real number with grouped integer digits and two decimals.
pub fn format_decimal(value: f64) -> String {
    if !value.is_finite() {
        return value.to_string();
    }
    let rounded = format!("{:.2}", value.abs());
    let (whole, frac) = rounded.split_once('.').unwrap_or((rounded.as_str(), "00"));
    let sign = if value < 0.0 && rounded != "0.00" { "-" } else { "" };
    format!("{}{}.{}", sign, group_digits(whole), frac)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_group_thousands() {
        assert_eq!(group_thousands(0), "0");
        assert_eq!(group_thousands(999), "999");
        assert_eq!(group_thousands(1_000), "1,000");
        assert_eq!(group_thousands(1_234_567), "1,234,567");
        assert_eq!(group_thousands(u64::MAX), "18,446,744,073,709,551,615");
    }

    #[test]
    fn test_format_decimal() {
        assert_eq!(format_decimal(60.0), "60.00");
        assert_eq!(format_decimal(22.5), "22.50");
        assert_eq!(format_decimal(1234.567), "1,234.57");
        assert_eq!(format_decimal(-0.001), "0.00");
        assert_eq!(format_decimal(-1500.0), "-1,500.00");
    }

    #[test]
    fn test_format_decimal_beyond_integer_range() {
        assert_eq!(format_decimal(1e19), "10,000,000,000,000,000,000.00");
        assert_eq!(format_decimal(-2e20), "-200,000,000,000,000,000,000.00");
    }
}
