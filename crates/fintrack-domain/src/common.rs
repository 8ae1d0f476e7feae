//! Shared traits and enums for finance records.

use std::fmt;

use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// Exposes the identifier assigned by the upstream data layer.
pub trait Identifiable {
    fn id(&self) -> &str;
}

/// Provides read-only access to an entity's display name.
pub trait NamedEntity {
    fn name(&self) -> &str;
}

/// Associates records with an optional category link.
pub trait BelongsToCategory {
    fn category_id(&self) -> Option<&str>;
}

/// Supplies a common contract for retrieving monetary amounts.
pub trait Amounted {
    fn amount(&self) -> Decimal;
}

/// Obligations that are settled by marking them paid or received.
///
/// A record only counts as settled when the flag is set *and* a settlement
/// date is present; a flag without a date is downgraded to pending.
pub trait Settleable: Identifiable + Amounted + BelongsToCategory {
    fn due_date(&self) -> Option<NaiveDate>;
    fn settled_flag(&self) -> bool;
    fn settlement_date(&self) -> Option<NaiveDate>;
    fn counterparty_id(&self) -> Option<&str>;
    /// Counterparty name embedded by an upstream join, if any.
    fn counterparty_name(&self) -> Option<&str>;
    fn observations(&self) -> Option<&str>;

    fn is_settled(&self) -> bool {
        self.settled_flag() && self.settlement_date().is_some()
    }

    fn is_pending(&self) -> bool {
        !self.is_settled()
    }
}

/// Direction of money flow shared by categories and transactions.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "lowercase")]
pub enum FlowType {
    Expense,
    Revenue,
}

impl FlowType {
    /// Parses English labels and the upstream Portuguese spellings.
    pub fn from_label(label: &str) -> Option<Self> {
        match label.trim().to_ascii_lowercase().as_str() {
            "expense" | "expenses" | "despesa" => Some(FlowType::Expense),
            "revenue" | "revenues" | "income" | "receita" => Some(FlowType::Revenue),
            _ => None,
        }
    }
}

impl fmt::Display for FlowType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            FlowType::Expense => "expense",
            FlowType::Revenue => "revenue",
        };
        f.write_str(label)
    }
}
