//! Overflow-safe arithmetic for aggregated amounts.
//!
//! Totals saturate at `Decimal::MAX` / `Decimal::MIN` instead of panicking.

use rust_decimal::Decimal;

/// Adds two amounts, saturating and logging on overflow.
pub fn add(left: Decimal, right: Decimal) -> Decimal {
    left.checked_add(right).unwrap_or_else(|| {
        tracing::warn!(%left, %right, "amount addition overflowed, saturating");
        left.saturating_add(right)
    })
}

/// Subtracts `right` from `left`, saturating and logging on overflow.
pub fn difference(left: Decimal, right: Decimal) -> Decimal {
    left.checked_sub(right).unwrap_or_else(|| {
        tracing::warn!(%left, %right, "amount subtraction overflowed, saturating");
        left.saturating_sub(right)
    })
}

pub fn total(amounts: impl IntoIterator<Item = Decimal>) -> Decimal {
    amounts.into_iter().fold(Decimal::ZERO, add)
}
