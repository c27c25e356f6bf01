use rust_decimal::{Decimal, RoundingStrategy};

/// Renders monetary amounts as `<symbol><U+00A0><grouped integer><decimal sep><2 digits>`.
///
/// The default matches Brazilian real amounts shown with Colombian-Spanish
/// separators, e.g. `R$ 1.234.567,89` with a non-breaking space after `R$`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CurrencyFormat {
    pub symbol: String,
    pub thousands_separator: String,
    pub decimal_separator: String,
}

impl Default for CurrencyFormat {
    fn default() -> Self {
        Self {
            symbol: "R$".to_string(),
            thousands_separator: ".".to_string(),
            decimal_separator: ",".to_string(),
        }
    }
}

impl CurrencyFormat {
    pub fn format(&self, amount: Decimal) -> String {
        let rounded = amount.round_dp_with_strategy(2, RoundingStrategy::MidpointAwayFromZero);
        let digits = format!("{:.2}", rounded.abs());
        let (integer, fraction) = digits.split_once('.').unwrap_or((digits.as_str(), "00"));

        let mut grouped = String::with_capacity(integer.len() + integer.len() / 3);
        for (idx, ch) in integer.chars().enumerate() {
            if idx > 0 && (integer.len() - idx) % 3 == 0 {
                grouped.push_str(&self.thousands_separator);
            }
            grouped.push(ch);
        }

        let sign = if rounded.is_sign_negative() && !rounded.is_zero() {
            "-"
        } else {
            ""
        };

        format!(
            "{sign}{}\u{a0}{grouped}{}{fraction}",
            self.symbol, self.decimal_separator
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn groups_thousands_with_dots() {
        let format = CurrencyFormat::default();
        assert_eq!(format.format(dec!(1234567.891)), "R$\u{a0}1.234.567,89");
        assert_eq!(format.format(dec!(999)), "R$\u{a0}999,00");
        assert_eq!(format.format(dec!(1000)), "R$\u{a0}1.000,00");
    }

    #[test]
    fn rounds_half_away_from_zero() {
        let format = CurrencyFormat::default();
        assert_eq!(format.format(dec!(0.005)), "R$\u{a0}0,01");
        assert_eq!(format.format(dec!(-2.345)), "-R$\u{a0}2,35");
    }

    #[test]
    fn symbol_is_followed_by_a_non_breaking_space() {
        let rendered = CurrencyFormat::default().format(dec!(35));
        assert_eq!(rendered.chars().nth(2), Some('\u{a0}'));
        assert!(!rendered.contains(' '));
    }

    #[test]
    fn zero_has_no_sign() {
        let format = CurrencyFormat::default();
        assert_eq!(format.format(dec!(-0.001)), "R$\u{a0}0,00");
    }

    #[test]
    fn custom_separators() {
        let format = CurrencyFormat {
            symbol: "BRL".to_string(),
            thousands_separator: ",".to_string(),
            decimal_separator: ".".to_string(),
        };
        assert_eq!(format.format(dec!(15234.5)), "BRL\u{a0}15,234.50");
    }
}
