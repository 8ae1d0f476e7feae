//! Immutable snapshot of every collection the engine reads.

use std::sync::Arc;

use serde_json::Value;

use crate::{
    account::{PayableAccount, ReceivableAccount},
    category::Category,
    common::{FlowType, Identifiable},
    error::{DomainError, RecordKind},
    fields::{first_present, RawRecord},
    party::ClientSupplier,
    transaction::Transaction,
};

/// Top-level document keys of each collection, in lookup order.
pub const PAYABLE_KEYS: &[&str] = &["payableAccounts", "payable_accounts"];
pub const RECEIVABLE_KEYS: &[&str] = &["receivableAccounts", "receivable_accounts"];
pub const TRANSACTION_KEYS: &[&str] = &["transactions"];
pub const CATEGORY_KEYS: &[&str] = &["categories"];
pub const CLIENT_SUPPLIER_KEYS: &[&str] = &["clientsSuppliers", "clients_suppliers"];

/// Read-only view of the data layer at one point in time.
///
/// Collections sit behind `Arc` slices so a snapshot is cheap to clone and
/// each collection's identity can be compared to detect changes.
#[derive(Debug, Clone)]
pub struct FinanceSnapshot {
    pub payable_accounts: Arc<[PayableAccount]>,
    pub receivable_accounts: Arc<[ReceivableAccount]>,
    pub transactions: Arc<[Transaction]>,
    pub categories: Arc<[Category]>,
    pub clients_suppliers: Arc<[ClientSupplier]>,
}

impl Default for FinanceSnapshot {
    fn default() -> Self {
        Self {
            payable_accounts: Arc::from(Vec::new()),
            receivable_accounts: Arc::from(Vec::new()),
            transactions: Arc::from(Vec::new()),
            categories: Arc::from(Vec::new()),
            clients_suppliers: Arc::from(Vec::new()),
        }
    }
}

impl FinanceSnapshot {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_payables(mut self, payables: Vec<PayableAccount>) -> Self {
        self.payable_accounts = Arc::from(payables);
        self
    }

    pub fn with_receivables(mut self, receivables: Vec<ReceivableAccount>) -> Self {
        self.receivable_accounts = Arc::from(receivables);
        self
    }

    pub fn with_transactions(mut self, transactions: Vec<Transaction>) -> Self {
        self.transactions = Arc::from(transactions);
        self
    }

    pub fn with_categories(mut self, categories: Vec<Category>) -> Self {
        self.categories = Arc::from(categories);
        self
    }

    pub fn with_clients_suppliers(mut self, parties: Vec<ClientSupplier>) -> Self {
        self.clients_suppliers = Arc::from(parties);
        self
    }

    pub fn category(&self, id: &str) -> Option<&Category> {
        self.categories.iter().find(|category| category.id() == id)
    }

    pub fn categories_of(&self, kind: FlowType) -> impl Iterator<Item = &Category> {
        self.categories
            .iter()
            .filter(move |category| category.kind == kind)
    }

    pub fn counterparty(&self, id: &str) -> Option<&ClientSupplier> {
        self.clients_suppliers.iter().find(|party| party.id() == id)
    }

    /// Normalizes a raw JSON document into a snapshot.
    ///
    /// Records that fail normalization are left out and returned alongside
    /// the snapshot so the caller decides how to report them.
    pub fn from_raw(document: &Value) -> RawSnapshot {
        let mut rejected = Vec::new();
        let Some(fields) = document.as_object() else {
            return RawSnapshot {
                snapshot: Self::default(),
                rejected,
            };
        };
        let payables = collect(
            first_present(fields, PAYABLE_KEYS),
            RecordKind::Payable,
            PayableAccount::from_raw,
            &mut rejected,
        );
        let receivables = collect(
            first_present(fields, RECEIVABLE_KEYS),
            RecordKind::Receivable,
            ReceivableAccount::from_raw,
            &mut rejected,
        );
        let transactions = collect(
            first_present(fields, TRANSACTION_KEYS),
            RecordKind::Transaction,
            Transaction::from_raw,
            &mut rejected,
        );
        let categories = collect(
            first_present(fields, CATEGORY_KEYS),
            RecordKind::Category,
            Category::from_raw,
            &mut rejected,
        );
        let parties = collect(
            first_present(fields, CLIENT_SUPPLIER_KEYS),
            RecordKind::ClientSupplier,
            ClientSupplier::from_raw,
            &mut rejected,
        );
        RawSnapshot {
            snapshot: Self::default()
                .with_payables(payables)
                .with_receivables(receivables)
                .with_transactions(transactions)
                .with_categories(categories)
                .with_clients_suppliers(parties),
            rejected,
        }
    }
}

/// Result of normalizing a raw document.
#[derive(Debug, Clone)]
pub struct RawSnapshot {
    pub snapshot: FinanceSnapshot,
    pub rejected: Vec<DomainError>,
}

fn collect<T>(
    collection: Option<&Value>,
    kind: RecordKind,
    parse: fn(&RawRecord<'_>) -> Result<T, DomainError>,
    rejected: &mut Vec<DomainError>,
) -> Vec<T> {
    let Some(items) = collection.and_then(Value::as_array) else {
        return Vec::new();
    };
    let mut records = Vec::with_capacity(items.len());
    for item in items {
        let parsed = RawRecord::new(item)
            .ok_or(DomainError::NotAnObject { kind })
            .and_then(|record| parse(&record));
        match parsed {
            Ok(record) => records.push(record),
            Err(err) => rejected.push(err),
        }
    }
    records
}
