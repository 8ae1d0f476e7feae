//! Recorded money movements, manual or mirrored from a settled account.

use std::fmt;

use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::{
    common::*,
    error::{DomainError, RecordKind},
    fields::{LogicalField, RawRecord},
};

/// Origin of a transaction.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "lowercase")]
pub enum SourceType {
    /// Entered directly; not backed by any payable or receivable.
    Manual,
    /// Mirror of a settled payable account.
    Payable,
    /// Mirror of a settled receivable account.
    Receivable,
    /// Linked to an unrecognised origin; never counted.
    Unknown,
}

impl SourceType {
    pub fn from_label(label: &str) -> Self {
        match label.trim().to_ascii_lowercase().as_str() {
            "manual" => SourceType::Manual,
            "payable" => SourceType::Payable,
            "receivable" => SourceType::Receivable,
            _ => SourceType::Unknown,
        }
    }
}

impl fmt::Display for SourceType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            SourceType::Manual => "manual",
            SourceType::Payable => "payable",
            SourceType::Receivable => "receivable",
            SourceType::Unknown => "unknown",
        };
        f.write_str(label)
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Transaction {
    pub id: String,
    #[serde(rename = "type")]
    pub kind: FlowType,
    pub value: Decimal,
    pub payment_date: Option<NaiveDate>,
    pub category_id: Option<String>,
    pub client_supplier_id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub client_supplier_name: Option<String>,
    pub account_id: Option<String>,
    pub source_type: SourceType,
    pub source_id: Option<String>,
    pub observations: Option<String>,
}

impl Transaction {
    /// Creates a manual transaction.
    pub fn manual(
        id: impl Into<String>,
        kind: FlowType,
        value: Decimal,
        payment_date: NaiveDate,
    ) -> Self {
        Self {
            id: id.into(),
            kind,
            value,
            payment_date: Some(payment_date),
            category_id: None,
            client_supplier_id: None,
            client_supplier_name: None,
            account_id: None,
            source_type: SourceType::Manual,
            source_id: None,
            observations: None,
        }
    }

    pub fn with_category(mut self, category_id: impl Into<String>) -> Self {
        self.category_id = Some(category_id.into());
        self
    }

    pub fn with_counterparty(mut self, client_supplier_id: impl Into<String>) -> Self {
        self.client_supplier_id = Some(client_supplier_id.into());
        self
    }

    pub fn is_manual(&self) -> bool {
        self.source_type == SourceType::Manual
    }

    /// True when this transaction mirrors the given settled account.
    pub fn mirrors(&self, source_type: SourceType, source_id: &str) -> bool {
        self.source_type == source_type && self.source_id.as_deref() == Some(source_id)
    }

    /// Builds a transaction from a raw record.
    ///
    /// A missing source type means `manual` unless a source id is present,
    /// in which case the origin is `unknown`.
    pub fn from_raw(record: &RawRecord<'_>) -> Result<Self, DomainError> {
        let missing = |field| DomainError::MissingField {
            kind: RecordKind::Transaction,
            field,
        };
        let id = record
            .string(LogicalField::Id)
            .ok_or(missing(LogicalField::Id))?;
        let kind = record
            .string(LogicalField::Kind)
            .and_then(|label| FlowType::from_label(&label))
            .ok_or(missing(LogicalField::Kind))?;
        let source_id = record.string(LogicalField::SourceId);
        let source_type = match record.string(LogicalField::SourceType) {
            Some(label) => SourceType::from_label(&label),
            None if source_id.is_none() => SourceType::Manual,
            None => SourceType::Unknown,
        };
        Ok(Self {
            id,
            kind,
            value: record.decimal(LogicalField::Value).unwrap_or_default(),
            payment_date: record.date(LogicalField::PaymentDate),
            category_id: record.string(LogicalField::CategoryId),
            client_supplier_id: record.string(LogicalField::CounterpartyId),
            client_supplier_name: record.string(LogicalField::CounterpartyName),
            account_id: record.string(LogicalField::AccountId),
            source_type,
            source_id,
            observations: record.string(LogicalField::Observations),
        })
    }
}

impl Identifiable for Transaction {
    fn id(&self) -> &str {
        &self.id
    }
}

impl Amounted for Transaction {
    fn amount(&self) -> Decimal {
        self.value
    }
}

impl BelongsToCategory for Transaction {
    fn category_id(&self) -> Option<&str> {
        self.category_id.as_deref()
    }
}
