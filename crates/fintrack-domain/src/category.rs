//! Categories grouping expenses and revenues.

use serde::{Deserialize, Serialize};

use crate::{
    common::*,
    error::{DomainError, RecordKind},
    fields::{LogicalField, RawRecord},
};

/// Categorises payables, receivables, and transactions for reporting.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Category {
    pub id: String,
    pub name: String,
    #[serde(rename = "type")]
    pub kind: FlowType,
}

impl Category {
    pub fn new(id: impl Into<String>, name: impl Into<String>, kind: FlowType) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            kind,
        }
    }

    pub fn expense(id: impl Into<String>, name: impl Into<String>) -> Self {
        Self::new(id, name, FlowType::Expense)
    }

    pub fn revenue(id: impl Into<String>, name: impl Into<String>) -> Self {
        Self::new(id, name, FlowType::Revenue)
    }

    /// Builds a category from a raw record. Categories without a recognisable
    /// type cannot be assigned to any report and are rejected.
    pub fn from_raw(record: &RawRecord<'_>) -> Result<Self, DomainError> {
        let missing = |field| DomainError::MissingField {
            kind: RecordKind::Category,
            field,
        };
        let id = record
            .string(LogicalField::Id)
            .ok_or(missing(LogicalField::Id))?;
        let kind = record
            .string(LogicalField::Kind)
            .and_then(|label| FlowType::from_label(&label))
            .ok_or(missing(LogicalField::Kind))?;
        Ok(Self {
            id,
            name: record.string(LogicalField::Name).unwrap_or_default(),
            kind,
        })
    }
}

impl Identifiable for Category {
    fn id(&self) -> &str {
        &self.id
    }
}

impl NamedEntity for Category {
    fn name(&self) -> &str {
        &self.name
    }
}
