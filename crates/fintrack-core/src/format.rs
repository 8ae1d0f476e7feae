use rust_decimal::Decimal;

/// Formats monetary amounts for presentation. Supplied by the caller.
pub trait AmountFormatter {
    fn format_amount(&self, amount: Decimal) -> String;
}

/// Two-decimal plain formatter with an optional currency code suffix.
#[derive(Debug, Clone, Default)]
pub struct PlainAmountFormatter {
    pub currency: Option<String>,
}

impl PlainAmountFormatter {
    pub fn with_currency(currency: impl Into<String>) -> Self {
        Self {
            currency: Some(currency.into()),
        }
    }
}

impl AmountFormatter for PlainAmountFormatter {
    fn format_amount(&self, amount: Decimal) -> String {
        let rounded = amount.round_dp(2);
        match &self.currency {
            Some(code) => format!("{rounded:.2} {code}"),
            None => format!("{rounded:.2}"),
        }
    }
}

/// True when every strftime item in `pattern` parses.
pub fn is_valid_pattern(pattern: &str) -> bool {
    use chrono::format::{Item, StrftimeItems};
    !pattern.is_empty() && StrftimeItems::new(pattern).all(|item| !matches!(item, Item::Error))
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn plain_formatter_rounds_to_cents() {
        let formatter = PlainAmountFormatter::with_currency("BRL");
        assert_eq!(formatter.format_amount(dec!(1234.5)), "1234.50 BRL");
        assert_eq!(PlainAmountFormatter::default().format_amount(dec!(-0.125)), "-0.12");
    }

    #[test]
    fn pattern_validation() {
        assert!(is_valid_pattern("%Y-%m-%d"));
        assert!(!is_valid_pattern("%Q"));
        assert!(!is_valid_pattern(""));
    }
}
