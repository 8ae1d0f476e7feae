//! Category-grouped report structures for tables, print, and export.

use std::{collections::HashMap, fmt, str::FromStr};

use chrono::NaiveDate;
use fintrack_domain::{
    Category, FinanceSnapshot, FlowType, NamedEntity, Settleable, Transaction,
};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::{
    format::is_valid_pattern,
    money,
    window::{DateBounds, PeriodWindow},
    CoreError,
};

pub const DEFAULT_DATE_FORMAT: &str = "%d/%m/%Y";
pub const DEFAULT_ACCUMULATED_LABEL: &str = "Accumulated total";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum ReportKind {
    UnpaidExpenses,
    PaidExpenses,
    UnreceivedRevenues,
    ReceivedRevenues,
}

impl ReportKind {
    pub const ALL: [ReportKind; 4] = [
        ReportKind::UnpaidExpenses,
        ReportKind::PaidExpenses,
        ReportKind::UnreceivedRevenues,
        ReportKind::ReceivedRevenues,
    ];

    /// Stable identifier used on the command line and in exports.
    pub fn identifier(self) -> &'static str {
        match self {
            ReportKind::UnpaidExpenses => "unpaid-expenses",
            ReportKind::PaidExpenses => "paid-expenses",
            ReportKind::UnreceivedRevenues => "unreceived-revenues",
            ReportKind::ReceivedRevenues => "received-revenues",
        }
    }

    pub fn flow(self) -> FlowType {
        match self {
            ReportKind::UnpaidExpenses | ReportKind::PaidExpenses => FlowType::Expense,
            ReportKind::UnreceivedRevenues | ReportKind::ReceivedRevenues => FlowType::Revenue,
        }
    }

    /// Settled kinds list settled accounts plus manual transactions.
    pub fn settled(self) -> bool {
        matches!(self, ReportKind::PaidExpenses | ReportKind::ReceivedRevenues)
    }

    pub fn title(self) -> &'static str {
        match self {
            ReportKind::UnpaidExpenses => "Unpaid Expenses Report",
            ReportKind::PaidExpenses => "Paid Expenses Report",
            ReportKind::UnreceivedRevenues => "Unreceived Revenues Report",
            ReportKind::ReceivedRevenues => "Received Revenues Report",
        }
    }
}

impl fmt::Display for ReportKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.identifier())
    }
}

impl FromStr for ReportKind {
    type Err = CoreError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        let wanted = value.trim().to_ascii_lowercase();
        ReportKind::ALL
            .into_iter()
            .find(|kind| kind.identifier() == wanted)
            .ok_or_else(|| CoreError::UnknownReportKind(value.to_string()))
    }
}

/// Presentation strings the report engine needs for its period label.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReportLabels {
    pub accumulated_label: String,
    pub date_format: String,
}

impl Default for ReportLabels {
    fn default() -> Self {
        Self {
            accumulated_label: DEFAULT_ACCUMULATED_LABEL.to_string(),
            date_format: DEFAULT_DATE_FORMAT.to_string(),
        }
    }
}

impl ReportLabels {
    /// "from - to" when both bounds are known, otherwise the accumulated label.
    pub fn period(&self, bounds: &DateBounds) -> String {
        match (bounds.from, bounds.to) {
            (Some(from), Some(to)) => {
                format!("{} - {}", self.format_date(from), self.format_date(to))
            }
            _ => self.accumulated_label.clone(),
        }
    }

    pub fn format_date(&self, date: NaiveDate) -> String {
        let pattern = if is_valid_pattern(&self.date_format) {
            self.date_format.as_str()
        } else {
            DEFAULT_DATE_FORMAT
        };
        date.format(pattern).to_string()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ItemSource {
    Payable,
    Receivable,
    Manual,
}

/// One listed record, with everything a presenter needs already resolved.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ReportItem {
    pub id: String,
    pub source: ItemSource,
    pub value: Decimal,
    pub category_id: Option<String>,
    pub counterparty_name: Option<String>,
    /// Display date: settlement, then payment, then due date.
    pub date: Option<NaiveDate>,
    pub due_date: Option<NaiveDate>,
    pub payment_date: Option<NaiveDate>,
    pub settlement_date: Option<NaiveDate>,
    pub observations: Option<String>,
}

impl ReportItem {
    fn from_account<T: Settleable>(
        record: &T,
        source: ItemSource,
        snapshot: &FinanceSnapshot,
    ) -> Self {
        let settlement_date = if record.is_settled() {
            record.settlement_date()
        } else {
            None
        };
        let mut item = Self {
            id: record.id().to_string(),
            source,
            value: record.amount(),
            category_id: record.category_id().map(str::to_string),
            counterparty_name: counterparty_name(
                snapshot,
                record.counterparty_id(),
                record.counterparty_name(),
            ),
            date: None,
            due_date: record.due_date(),
            payment_date: None,
            settlement_date,
            observations: record.observations().map(str::to_string),
        };
        item.date = item.effective_date();
        item
    }

    fn from_transaction(transaction: &Transaction, snapshot: &FinanceSnapshot) -> Self {
        Self {
            id: transaction.id.clone(),
            source: ItemSource::Manual,
            value: transaction.value,
            category_id: transaction.category_id.clone(),
            counterparty_name: counterparty_name(
                snapshot,
                transaction.client_supplier_id.as_deref(),
                transaction.client_supplier_name.as_deref(),
            ),
            date: transaction.payment_date,
            due_date: None,
            payment_date: transaction.payment_date,
            settlement_date: None,
            observations: transaction.observations.clone(),
        }
    }

    /// Date used for window membership.
    pub fn effective_date(&self) -> Option<NaiveDate> {
        self.settlement_date.or(self.payment_date).or(self.due_date)
    }

    /// Date used to order items inside a group.
    pub fn listing_date(&self) -> Option<NaiveDate> {
        self.due_date.or(self.payment_date).or(self.settlement_date)
    }
}

fn counterparty_name(
    snapshot: &FinanceSnapshot,
    id: Option<&str>,
    embedded: Option<&str>,
) -> Option<String> {
    id.and_then(|id| snapshot.counterparty(id))
        .map(|party| party.name().to_string())
        .filter(|name| !name.trim().is_empty())
        .or_else(|| embedded.map(str::to_string))
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ReportGroup {
    pub category_id: String,
    pub category_name: String,
    pub total: Decimal,
    pub count: usize,
    pub items: Vec<ReportItem>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Report {
    pub kind: ReportKind,
    pub title: String,
    pub data: Vec<ReportGroup>,
    pub grand_total: Decimal,
    pub period: String,
}

impl Report {
    pub fn item_count(&self) -> usize {
        self.data.iter().map(|group| group.count).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }
}

pub struct ReportService;

impl ReportService {
    /// Builds the grouped report for `kind`.
    ///
    /// `CurrentMonth` resolves against `today`; an unbounded window keeps
    /// every record, undated ones included.
    pub fn build(
        snapshot: &FinanceSnapshot,
        kind: ReportKind,
        window: &PeriodWindow,
        today: NaiveDate,
        labels: &ReportLabels,
    ) -> Report {
        let bounds = window.bounds(today);
        let items = Self::base_items(snapshot, kind)
            .into_iter()
            .filter(|item| bounds.contains(item.effective_date()));

        let mut by_category: HashMap<String, Vec<ReportItem>> = HashMap::new();
        let mut uncategorised = 0usize;
        for item in items {
            match item.category_id.clone() {
                Some(category_id) => by_category.entry(category_id).or_default().push(item),
                None => uncategorised += 1,
            }
        }

        let data: Vec<ReportGroup> = snapshot
            .categories_of(kind.flow())
            .filter_map(|category| Self::group(category, &mut by_category))
            .collect();
        let grand_total = money::total(data.iter().map(|group| group.total));

        let unmatched: usize = by_category.values().map(Vec::len).sum::<usize>() + uncategorised;
        tracing::debug!(
            kind = %kind,
            groups = data.len(),
            unmatched,
            grand_total = %grand_total,
            "report built"
        );

        Report {
            kind,
            title: kind.title().to_string(),
            data,
            grand_total,
            period: labels.period(&bounds),
        }
    }

    fn base_items(snapshot: &FinanceSnapshot, kind: ReportKind) -> Vec<ReportItem> {
        match kind {
            ReportKind::UnpaidExpenses => {
                pending(&snapshot.payable_accounts, ItemSource::Payable, snapshot)
            }
            ReportKind::UnreceivedRevenues => {
                pending(&snapshot.receivable_accounts, ItemSource::Receivable, snapshot)
            }
            ReportKind::PaidExpenses => {
                let mut items = settled(&snapshot.payable_accounts, ItemSource::Payable, snapshot);
                items.extend(manual(snapshot, FlowType::Expense));
                items
            }
            ReportKind::ReceivedRevenues => {
                let mut items =
                    settled(&snapshot.receivable_accounts, ItemSource::Receivable, snapshot);
                items.extend(manual(snapshot, FlowType::Revenue));
                items
            }
        }
    }

    /// Takes the category's items out of the pool. A repeated category id
    /// finds the pool already drained and yields no second group.
    fn group(
        category: &Category,
        pool: &mut HashMap<String, Vec<ReportItem>>,
    ) -> Option<ReportGroup> {
        let mut items = pool.remove(&category.id)?;
        if items.is_empty() {
            return None;
        }
        items.sort_by_key(|item| {
            let listing = item.listing_date();
            (listing.is_none(), listing)
        });
        let total = money::total(items.iter().map(|item| item.value));
        Some(ReportGroup {
            category_id: category.id.clone(),
            category_name: category.name.clone(),
            total,
            count: items.len(),
            items,
        })
    }
}

fn pending<T: Settleable>(
    records: &[T],
    source: ItemSource,
    snapshot: &FinanceSnapshot,
) -> Vec<ReportItem> {
    records
        .iter()
        .filter(|record| record.is_pending())
        .map(|record| ReportItem::from_account(record, source, snapshot))
        .collect()
}

fn settled<T: Settleable>(
    records: &[T],
    source: ItemSource,
    snapshot: &FinanceSnapshot,
) -> Vec<ReportItem> {
    records
        .iter()
        .filter(|record| record.is_settled())
        .map(|record| ReportItem::from_account(record, source, snapshot))
        .collect()
}

fn manual(snapshot: &FinanceSnapshot, kind: FlowType) -> impl Iterator<Item = ReportItem> + '_ {
    snapshot
        .transactions
        .iter()
        .filter(move |transaction| transaction.is_manual() && transaction.kind == kind)
        .map(move |transaction| ReportItem::from_transaction(transaction, snapshot))
}
