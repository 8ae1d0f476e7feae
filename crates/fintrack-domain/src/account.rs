//! Payable and receivable accounts.

use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::{
    common::*,
    error::{DomainError, RecordKind},
    fields::{LogicalField, RawRecord},
};

/// An amount owed to a supplier.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct PayableAccount {
    pub id: String,
    pub value: Decimal,
    pub due_date: Option<NaiveDate>,
    pub is_paid: bool,
    pub paid_date: Option<NaiveDate>,
    pub category_id: Option<String>,
    pub supplier_id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub supplier_name: Option<String>,
    pub account_id: Option<String>,
    pub observations: Option<String>,
}

impl PayableAccount {
    pub fn new(id: impl Into<String>, value: Decimal, due_date: NaiveDate) -> Self {
        Self {
            id: id.into(),
            value,
            due_date: Some(due_date),
            is_paid: false,
            paid_date: None,
            category_id: None,
            supplier_id: None,
            supplier_name: None,
            account_id: None,
            observations: None,
        }
    }

    pub fn with_category(mut self, category_id: impl Into<String>) -> Self {
        self.category_id = Some(category_id.into());
        self
    }

    pub fn with_supplier(mut self, supplier_id: impl Into<String>) -> Self {
        self.supplier_id = Some(supplier_id.into());
        self
    }

    pub fn with_account(mut self, account_id: impl Into<String>) -> Self {
        self.account_id = Some(account_id.into());
        self
    }

    pub fn paid_on(mut self, date: NaiveDate) -> Self {
        self.is_paid = true;
        self.paid_date = Some(date);
        self
    }

    pub fn from_raw(record: &RawRecord<'_>) -> Result<Self, DomainError> {
        let id = record
            .string(LogicalField::Id)
            .ok_or(DomainError::MissingField {
                kind: RecordKind::Payable,
                field: LogicalField::Id,
            })?;
        Ok(Self {
            id,
            value: record.decimal(LogicalField::Value).unwrap_or_default(),
            due_date: record.date(LogicalField::DueDate),
            is_paid: record.flag(LogicalField::SettledFlag).unwrap_or(false),
            paid_date: record.date(LogicalField::SettlementDate),
            category_id: record.string(LogicalField::CategoryId),
            supplier_id: record.string(LogicalField::CounterpartyId),
            supplier_name: record.string(LogicalField::CounterpartyName),
            account_id: record.string(LogicalField::AccountId),
            observations: record.string(LogicalField::Observations),
        })
    }
}

impl Identifiable for PayableAccount {
    fn id(&self) -> &str {
        &self.id
    }
}

impl Amounted for PayableAccount {
    fn amount(&self) -> Decimal {
        self.value
    }
}

impl BelongsToCategory for PayableAccount {
    fn category_id(&self) -> Option<&str> {
        self.category_id.as_deref()
    }
}

impl Settleable for PayableAccount {
    fn due_date(&self) -> Option<NaiveDate> {
        self.due_date
    }

    fn settled_flag(&self) -> bool {
        self.is_paid
    }

    fn settlement_date(&self) -> Option<NaiveDate> {
        self.paid_date
    }

    fn counterparty_id(&self) -> Option<&str> {
        self.supplier_id.as_deref()
    }

    fn counterparty_name(&self) -> Option<&str> {
        self.supplier_name.as_deref()
    }

    fn observations(&self) -> Option<&str> {
        self.observations.as_deref()
    }
}

/// An amount expected from a client.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct ReceivableAccount {
    pub id: String,
    pub value: Decimal,
    pub due_date: Option<NaiveDate>,
    pub is_received: bool,
    pub received_date: Option<NaiveDate>,
    pub category_id: Option<String>,
    pub client_id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub client_name: Option<String>,
    pub account_id: Option<String>,
    pub observations: Option<String>,
}

impl ReceivableAccount {
    pub fn new(id: impl Into<String>, value: Decimal, due_date: NaiveDate) -> Self {
        Self {
            id: id.into(),
            value,
            due_date: Some(due_date),
            is_received: false,
            received_date: None,
            category_id: None,
            client_id: None,
            client_name: None,
            account_id: None,
            observations: None,
        }
    }

    pub fn with_category(mut self, category_id: impl Into<String>) -> Self {
        self.category_id = Some(category_id.into());
        self
    }

    pub fn with_client(mut self, client_id: impl Into<String>) -> Self {
        self.client_id = Some(client_id.into());
        self
    }

    pub fn with_account(mut self, account_id: impl Into<String>) -> Self {
        self.account_id = Some(account_id.into());
        self
    }

    pub fn received_on(mut self, date: NaiveDate) -> Self {
        self.is_received = true;
        self.received_date = Some(date);
        self
    }

    pub fn from_raw(record: &RawRecord<'_>) -> Result<Self, DomainError> {
        let id = record
            .string(LogicalField::Id)
            .ok_or(DomainError::MissingField {
                kind: RecordKind::Receivable,
                field: LogicalField::Id,
            })?;
        Ok(Self {
            id,
            value: record.decimal(LogicalField::Value).unwrap_or_default(),
            due_date: record.date(LogicalField::DueDate),
            is_received: record.flag(LogicalField::SettledFlag).unwrap_or(false),
            received_date: record.date(LogicalField::SettlementDate),
            category_id: record.string(LogicalField::CategoryId),
            client_id: record.string(LogicalField::CounterpartyId),
            client_name: record.string(LogicalField::CounterpartyName),
            account_id: record.string(LogicalField::AccountId),
            observations: record.string(LogicalField::Observations),
        })
    }
}

impl Identifiable for ReceivableAccount {
    fn id(&self) -> &str {
        &self.id
    }
}

impl Amounted for ReceivableAccount {
    fn amount(&self) -> Decimal {
        self.value
    }
}

impl BelongsToCategory for ReceivableAccount {
    fn category_id(&self) -> Option<&str> {
        self.category_id.as_deref()
    }
}

impl Settleable for ReceivableAccount {
    fn due_date(&self) -> Option<NaiveDate> {
        self.due_date
    }

    fn settled_flag(&self) -> bool {
        self.is_received
    }

    fn settlement_date(&self) -> Option<NaiveDate> {
        self.received_date
    }

    fn counterparty_id(&self) -> Option<&str> {
        self.client_id.as_deref()
    }

    fn counterparty_name(&self) -> Option<&str> {
        self.client_name.as_deref()
    }

    fn observations(&self) -> Option<&str> {
        self.observations.as_deref()
    }
}
