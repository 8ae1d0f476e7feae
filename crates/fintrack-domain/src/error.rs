use std::fmt;

use thiserror::Error;

use crate::fields::LogicalField;

/// Identifies which collection a raw record came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RecordKind {
    Payable,
    Receivable,
    Transaction,
    Category,
    ClientSupplier,
}

impl fmt::Display for RecordKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            RecordKind::Payable => "payable account",
            RecordKind::Receivable => "receivable account",
            RecordKind::Transaction => "transaction",
            RecordKind::Category => "category",
            RecordKind::ClientSupplier => "client/supplier",
        };
        f.write_str(label)
    }
}

#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum DomainError {
    #[error("{kind} record is not a JSON object")]
    NotAnObject { kind: RecordKind },
    #[error("{kind} record is missing required field `{field}`")]
    MissingField {
        kind: RecordKind,
        field: LogicalField,
    },
}
