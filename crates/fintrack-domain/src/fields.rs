//! Field resolution across the two upstream naming conventions.
//!
//! Records reach the engine either in the camelCase shape used by the
//! application layer (`dueDate`, `categoryId`) or in the snake_case shape
//! written by the persistence layer (`due_date`, `category_id`). Every
//! logical field owns one fixed alias list; resolution walks that list in
//! order and returns the first non-empty value. Nothing outside this module
//! looks at raw key names.

use std::{fmt, str::FromStr};

use chrono::{DateTime, Local, NaiveDate, NaiveDateTime};
use rust_decimal::Decimal;
use serde_json::{Map, Value};

/// Semantic fields understood by the resolver.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum LogicalField {
    Id,
    Value,
    Name,
    Kind,
    CategoryId,
    DueDate,
    SettledFlag,
    SettlementDate,
    PaymentDate,
    CounterpartyId,
    CounterpartyName,
    AccountId,
    SourceType,
    SourceId,
    Observations,
}

impl LogicalField {
    /// Alias precedence for the field, highest priority first.
    ///
    /// Dotted aliases address a nested object (`client.name`).
    pub fn aliases(self) -> &'static [&'static str] {
        match self {
            LogicalField::Id => &["id"],
            LogicalField::Value => &["value", "amount"],
            LogicalField::Name => &["name"],
            LogicalField::Kind => &["type", "kind", "role"],
            LogicalField::CategoryId => &["categoryId", "category_id"],
            LogicalField::DueDate => &["dueDate", "due_date"],
            LogicalField::SettledFlag => &["isPaid", "is_paid", "isReceived", "is_received"],
            LogicalField::SettlementDate => {
                &["paidDate", "paid_date", "receivedDate", "received_date"]
            }
            LogicalField::PaymentDate => &["paymentDate", "payment_date"],
            LogicalField::CounterpartyId => &[
                "supplierId",
                "supplier_id",
                "clientId",
                "client_id",
                "clientSupplierId",
                "client_supplier_id",
            ],
            LogicalField::CounterpartyName => &[
                "client.name",
                "supplier.name",
                "clientSupplier.name",
                "clients_suppliers.name",
                "supplierName",
                "clientName",
                "clientSupplierName",
            ],
            LogicalField::AccountId => &["accountId", "account_id"],
            LogicalField::SourceType => &["sourceType", "source_type"],
            LogicalField::SourceId => &["sourceId", "source_id"],
            LogicalField::Observations => &["observations", "notes"],
        }
    }
}

impl fmt::Display for LogicalField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            LogicalField::Id => "id",
            LogicalField::Value => "value",
            LogicalField::Name => "name",
            LogicalField::Kind => "kind",
            LogicalField::CategoryId => "category id",
            LogicalField::DueDate => "due date",
            LogicalField::SettledFlag => "settled flag",
            LogicalField::SettlementDate => "settlement date",
            LogicalField::PaymentDate => "payment date",
            LogicalField::CounterpartyId => "counterparty id",
            LogicalField::CounterpartyName => "counterparty name",
            LogicalField::AccountId => "account id",
            LogicalField::SourceType => "source type",
            LogicalField::SourceId => "source id",
            LogicalField::Observations => "observations",
        };
        f.write_str(label)
    }
}

/// Borrowed view over a raw JSON object in either naming convention.
#[derive(Debug, Clone, Copy)]
pub struct RawRecord<'a> {
    fields: &'a Map<String, Value>,
}

impl<'a> RawRecord<'a> {
    /// Wraps a JSON value; returns `None` for anything but an object.
    pub fn new(value: &'a Value) -> Option<Self> {
        value.as_object().map(|fields| Self { fields })
    }

    pub fn from_map(fields: &'a Map<String, Value>) -> Self {
        Self { fields }
    }

    /// First non-empty value among the field's aliases, or `None` when the
    /// field is unresolved.
    pub fn resolve(&self, field: LogicalField) -> Option<&'a Value> {
        first_present(self.fields, field.aliases())
    }

    pub fn string(&self, field: LogicalField) -> Option<String> {
        self.resolve(field).and_then(decode_string)
    }

    pub fn decimal(&self, field: LogicalField) -> Option<Decimal> {
        self.resolve(field).and_then(decode_decimal)
    }

    pub fn flag(&self, field: LogicalField) -> Option<bool> {
        self.resolve(field).and_then(decode_flag)
    }

    pub fn date(&self, field: LogicalField) -> Option<NaiveDate> {
        self.resolve(field).and_then(decode_date)
    }
}

/// Walks `aliases` in order and returns the first non-empty value.
pub fn first_present<'a>(fields: &'a Map<String, Value>, aliases: &[&str]) -> Option<&'a Value> {
    aliases
        .iter()
        .filter_map(|alias| lookup_path(fields, alias))
        .find(|value| !is_empty(value))
}

fn lookup_path<'a>(fields: &'a Map<String, Value>, path: &str) -> Option<&'a Value> {
    let mut segments = path.split('.');
    let mut current = fields.get(segments.next()?)?;
    for segment in segments {
        current = current.as_object()?.get(segment)?;
    }
    Some(current)
}

fn is_empty(value: &Value) -> bool {
    match value {
        Value::Null => true,
        Value::String(text) => text.trim().is_empty(),
        _ => false,
    }
}

fn decode_string(value: &Value) -> Option<String> {
    match value {
        Value::String(text) => Some(text.trim().to_string()),
        Value::Number(number) => Some(number.to_string()),
        Value::Bool(flag) => Some(flag.to_string()),
        _ => None,
    }
}

fn decode_decimal(value: &Value) -> Option<Decimal> {
    let raw = match value {
        Value::Number(number) => number.to_string(),
        Value::String(text) => text.trim().to_string(),
        _ => return None,
    };
    Decimal::from_str(&raw)
        .or_else(|_| Decimal::from_scientific(&raw))
        .ok()
}

fn decode_flag(value: &Value) -> Option<bool> {
    match value {
        Value::Bool(flag) => Some(*flag),
        Value::String(text) => match text.trim().to_ascii_lowercase().as_str() {
            "true" => Some(true),
            "false" => Some(false),
            _ => None,
        },
        Value::Number(number) => number.as_i64().map(|n| n != 0),
        _ => None,
    }
}

/// Decodes `YYYY-MM-DD`, naive datetimes, and RFC 3339 timestamps. Timestamps
/// carrying an offset are converted to the local calendar day.
pub fn decode_date(value: &Value) -> Option<NaiveDate> {
    let text = value.as_str()?.trim();
    if let Ok(date) = NaiveDate::parse_from_str(text, "%Y-%m-%d") {
        return Some(date);
    }
    if let Ok(stamp) = DateTime::parse_from_rfc3339(text) {
        return Some(stamp.with_timezone(&Local).date_naive());
    }
    ["%Y-%m-%dT%H:%M:%S%.f", "%Y-%m-%d %H:%M:%S%.f"]
        .iter()
        .find_map(|format| NaiveDateTime::parse_from_str(text, format).ok())
        .map(|stamp| stamp.date())
}
