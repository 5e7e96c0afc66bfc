use bigdecimal::{BigDecimal, RoundingMode};
use num_traits::{Signed, Zero};

use crate::ext::DecimalExt;

/// Display style of an amount
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NumberFormat {
    /// Balances: two significant digits below one, otherwise two places, grouped.
    Currency,
    /// Text-field values: never rounds up, so the value stays spendable.
    Input,
    /// Exchange rates: four places, truncated.
    Ratio,
    /// Prices: four places, grouped.
    Price,
}

pub fn format_big_number(value: Option<&BigDecimal>, format: NumberFormat) -> String {
    let value = match value {
        Some(v) if !v.is_zero() => v,
        _ => return "0".to_string(),
    };
    let one = BigDecimal::from(1);

    match format {
        NumberFormat::Currency => {
            if !value.is_negative() && *value < one {
                significant_down(value, 2).to_trimmed_string()
            } else {
                group_thousands(&round_places(value, 2, RoundingMode::HalfUp).to_trimmed_string())
            }
        }
        NumberFormat::Input => {
            if decimal_places(value) == 0 {
                value.to_trimmed_string()
            } else if *value < one {
                significant_down(value, 2).to_trimmed_string()
            } else {
                fixed(value, 2, RoundingMode::Down)
            }
        }
        NumberFormat::Ratio => {
            if decimal_places(value) == 0 {
                group_thousands(&value.to_trimmed_string())
            } else {
                fixed(value, 4, RoundingMode::Down)
            }
        }
        NumberFormat::Price => {
            group_thousands(&round_places(value, 4, RoundingMode::HalfUp).to_trimmed_string())
        }
    }
}

/// Renders a ratio (`0.125`) as a percentage (`12.5%`).
pub fn format_percent(percent: Option<&BigDecimal>) -> String {
    let percent = match percent {
        Some(p) if !p.is_zero() => p,
        _ => return "0%".to_string(),
    };

    let scaled = percent * BigDecimal::from(100);
    if scaled < BigDecimal::new(1.into(), 2) {
        return "<0.01%".to_string();
    }

    format!(
        "{}%",
        round_places(&scaled, 2, RoundingMode::HalfUp).to_trimmed_string()
    )
}

/// Number of significant fractional digits, ignoring trailing zeros.
fn decimal_places(value: &BigDecimal) -> i64 {
    let (_, scale) = value.normalized().as_bigint_and_exponent();
    scale.max(0)
}

fn round_places(value: &BigDecimal, places: i64, mode: RoundingMode) -> BigDecimal {
    value.with_scale_round(places, mode)
}

fn fixed(value: &BigDecimal, places: i64, mode: RoundingMode) -> String {
    round_places(value, places, mode).to_plain_string()
}

/// Keeps `digits` significant digits, rounding toward zero.
fn significant_down(value: &BigDecimal, digits: i64) -> BigDecimal {
    let (int, scale) = value.as_bigint_and_exponent();
    let len = int.magnitude().to_string().len() as i64;
    value.with_scale_round(scale - len + digits, RoundingMode::Down)
}

fn group_thousands(plain: &str) -> String {
    let (sign, unsigned) = match plain.strip_prefix('-') {
        Some(rest) => ("-", rest),
        None => ("", plain),
    };
    let (integer, fraction) = match unsigned.split_once('.') {
        Some((i, f)) => (i, Some(f)),
        None => (unsigned, None),
    };

    let mut grouped = String::with_capacity(integer.len() + integer.len() / 3);
    for (i, ch) in integer.chars().enumerate() {
        if i > 0 && (integer.len() - i) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(ch);
    }

    match fraction {
        Some(f) => format!("{sign}{grouped}.{f}"),
        None => format!("{sign}{grouped}"),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::str::FromStr;

    fn fmt(value: &str, format: NumberFormat) -> String {
        format_big_number(Some(&BigDecimal::from_str(value).unwrap()), format)
    }

    #[test]
    fn zero_and_missing_render_as_zero() {
        assert_eq!(format_big_number(None, NumberFormat::Currency), "0");
        assert_eq!(fmt("0.000", NumberFormat::Price), "0");
    }

    #[test]
    fn currency_format() {
        assert_eq!(fmt("0.012345", NumberFormat::Currency), "0.012");
        assert_eq!(fmt("0.5", NumberFormat::Currency), "0.5");
        assert_eq!(fmt("1234567.125", NumberFormat::Currency), "1,234,567.13");
        assert_eq!(fmt("1000", NumberFormat::Currency), "1,000");
    }

    #[test]
    fn input_format_never_rounds_up() {
        assert_eq!(fmt("12", NumberFormat::Input), "12");
        assert_eq!(fmt("0.0789", NumberFormat::Input), "0.078");
        assert_eq!(fmt("12.349", NumberFormat::Input), "12.34");
        assert_eq!(fmt("12.5", NumberFormat::Input), "12.50");
        assert_eq!(fmt("1234.5", NumberFormat::Input), "1234.50");
    }

    #[test]
    fn ratio_and_price_formats() {
        assert_eq!(fmt("25000", NumberFormat::Ratio), "25,000");
        assert_eq!(fmt("1.234567", NumberFormat::Ratio), "1.2345");
        assert_eq!(fmt("0.5", NumberFormat::Ratio), "0.5000");
        assert_eq!(fmt("1234.56789", NumberFormat::Price), "1,234.5679");
    }

    #[test]
    fn percent_format() {
        assert_eq!(format_percent(None), "0%");
        assert_eq!(format_percent(Some(&BigDecimal::from(0))), "0%");
        assert_eq!(
            format_percent(Some(&BigDecimal::from_str("0.00001").unwrap())),
            "<0.01%"
        );
        assert_eq!(
            format_percent(Some(&BigDecimal::from_str("0.12345").unwrap())),
            "12.35%"
        );
        assert_eq!(format_percent(Some(&BigDecimal::from_str("0.5").unwrap())), "50%");
    }

    #[test]
    fn groups_negative_numbers() {
        assert_eq!(group_thousands("-1234567.5"), "-1,234,567.5");
        assert_eq!(group_thousands("123"), "123");
    }
}
