//! Fixed-locale currency formatting.
//!
//! The order message is read by a human in a Brazilian chat client, so the
//! shape `R$ 1.234,56` is part of the external contract and is not
//! configurable.

use rust_decimal::prelude::ToPrimitive;
use rust_decimal::Decimal;

/// Format a monetary amount as Brazilian reais: `R$ 99,90`, `R$ 1.234,56`.
/// Negative amounts get a leading minus sign (`-R$ 13,00`).
pub fn format_brl(value: Decimal) -> String {
    let rounded = value.round_dp(2);
    let negative = rounded.is_sign_negative();
    let cents = (rounded.abs() * Decimal::from(100)).to_i128().unwrap_or(0);

    let int_part = cents / 100;
    let frac_part = cents % 100;

    let digits = int_part.to_string();
    let mut grouped = String::with_capacity(digits.len() + digits.len() / 3);
    for (i, ch) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            grouped.push('.');
        }
        grouped.push(ch);
    }

    let sign = if negative { "-" } else { "" };
    format!("{}R$ {},{:02}", sign, grouped, frac_part)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::str::FromStr;

    fn d(s: &str) -> Decimal {
        Decimal::from_str(s).unwrap()
    }

    #[test]
    fn formats_plain_amounts() {
        assert_eq!(format_brl(d("99.90")), "R$ 99,90");
        assert_eq!(format_brl(d("99.9")), "R$ 99,90");
        assert_eq!(format_brl(d("0")), "R$ 0,00");
        assert_eq!(format_brl(d("8")), "R$ 8,00");
    }

    #[test]
    fn groups_thousands() {
        assert_eq!(format_brl(d("1234.5")), "R$ 1.234,50");
        assert_eq!(format_brl(d("1234567.89")), "R$ 1.234.567,89");
    }

    #[test]
    fn formats_negative_amounts() {
        assert_eq!(format_brl(d("-13.00")), "-R$ 13,00");
    }
}
