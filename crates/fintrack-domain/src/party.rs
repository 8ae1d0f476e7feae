//! Clients and suppliers, consulted for display only.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::{
    common::*,
    error::{DomainError, RecordKind},
    fields::{LogicalField, RawRecord},
};

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum CounterpartyRole {
    Client,
    Supplier,
}

impl CounterpartyRole {
    pub fn from_label(label: &str) -> Option<Self> {
        match label.trim().to_ascii_lowercase().as_str() {
            "client" | "cliente" => Some(CounterpartyRole::Client),
            "supplier" | "fornecedor" => Some(CounterpartyRole::Supplier),
            _ => None,
        }
    }
}

impl fmt::Display for CounterpartyRole {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            CounterpartyRole::Client => "client",
            CounterpartyRole::Supplier => "supplier",
        };
        f.write_str(label)
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct ClientSupplier {
    pub id: String,
    pub name: String,
    pub role: Option<CounterpartyRole>,
}

impl ClientSupplier {
    pub fn new(id: impl Into<String>, name: impl Into<String>, role: CounterpartyRole) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            role: Some(role),
        }
    }

    pub fn from_raw(record: &RawRecord<'_>) -> Result<Self, DomainError> {
        let id = record
            .string(LogicalField::Id)
            .ok_or(DomainError::MissingField {
                kind: RecordKind::ClientSupplier,
                field: LogicalField::Id,
            })?;
        Ok(Self {
            id,
            name: record.string(LogicalField::Name).unwrap_or_default(),
            role: record
                .string(LogicalField::Kind)
                .and_then(|label| CounterpartyRole::from_label(&label)),
        })
    }
}

impl Identifiable for ClientSupplier {
    fn id(&self) -> &str {
        &self.id
    }
}

impl NamedEntity for ClientSupplier {
    fn name(&self) -> &str {
        &self.name
    }
}
