//! Record-level edits applied to the stored JSON document.
//!
//! Only the records named in a [`SnapshotChanges`] are touched. Everything
//! else in the document, including records the resolver could not read and
//! keys it does not know, is written back as it was read.

use chrono::NaiveDate;
use fintrack_domain::{
    LogicalField, PayableAccount, RawRecord, ReceivableAccount, RecordKind, Transaction,
    PAYABLE_KEYS, RECEIVABLE_KEYS, TRANSACTION_KEYS,
};
use serde_json::{Map, Value};

use crate::StorageError;

/// Keys used when a settlement field is absent from the stored record,
/// as `(camelCase, snake_case)`.
struct SettlementKeys {
    kind: RecordKind,
    collection: &'static [&'static str],
    flag: (&'static str, &'static str),
    date: (&'static str, &'static str),
}

const PAYABLE: SettlementKeys = SettlementKeys {
    kind: RecordKind::Payable,
    collection: PAYABLE_KEYS,
    flag: ("isPaid", "is_paid"),
    date: ("paidDate", "paid_date"),
};

const RECEIVABLE: SettlementKeys = SettlementKeys {
    kind: RecordKind::Receivable,
    collection: RECEIVABLE_KEYS,
    flag: ("isReceived", "is_received"),
    date: ("receivedDate", "received_date"),
};

const ACCOUNT: (&str, &str) = ("accountId", "account_id");

/// Settlement-state updates plus mirrored transactions to insert or delete.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SnapshotChanges {
    payables: Vec<PayableAccount>,
    receivables: Vec<ReceivableAccount>,
    inserted: Vec<Transaction>,
    removed: Vec<String>,
}

impl SnapshotChanges {
    pub fn new() -> Self {
        Self::default()
    }

    /// Rewrites the settlement state (flag, date, account) of the stored payable.
    pub fn update_payable(mut self, payable: PayableAccount) -> Self {
        self.payables.push(payable);
        self
    }

    pub fn update_receivable(mut self, receivable: ReceivableAccount) -> Self {
        self.receivables.push(receivable);
        self
    }

    pub fn insert_transactions(mut self, transactions: impl IntoIterator<Item = Transaction>) -> Self {
        self.inserted.extend(transactions);
        self
    }

    pub fn remove_transactions(mut self, ids: impl IntoIterator<Item = String>) -> Self {
        self.removed.extend(ids);
        self
    }

    pub fn is_empty(&self) -> bool {
        self.payables.is_empty()
            && self.receivables.is_empty()
            && self.inserted.is_empty()
            && self.removed.is_empty()
    }

    pub(crate) fn apply_to(&self, document: &mut Map<String, Value>) -> Result<(), StorageError> {
        for payable in &self.payables {
            update_settlement(
                document,
                &PAYABLE,
                &payable.id,
                payable.is_paid,
                payable.paid_date,
                payable.account_id.as_deref(),
            )?;
        }
        for receivable in &self.receivables {
            update_settlement(
                document,
                &RECEIVABLE,
                &receivable.id,
                receivable.is_received,
                receivable.received_date,
                receivable.account_id.as_deref(),
            )?;
        }

        if !self.removed.is_empty() {
            if let Some(transactions) = collection_mut(document, TRANSACTION_KEYS) {
                transactions.retain(|item| {
                    !self
                        .removed
                        .iter()
                        .any(|id| record_id(item).as_deref() == Some(id.as_str()))
                });
            }
        }
        if !self.inserted.is_empty() {
            let mut values = Vec::with_capacity(self.inserted.len());
            for transaction in &self.inserted {
                values.push(
                    serde_json::to_value(transaction)
                        .map_err(|err| StorageError::Serde(err.to_string()))?,
                );
            }
            match collection_mut(document, TRANSACTION_KEYS) {
                Some(transactions) => transactions.extend(values),
                None => {
                    document.insert(TRANSACTION_KEYS[0].to_string(), Value::Array(values));
                }
            }
        }
        Ok(())
    }
}

fn update_settlement(
    document: &mut Map<String, Value>,
    keys: &SettlementKeys,
    id: &str,
    settled: bool,
    date: Option<NaiveDate>,
    account: Option<&str>,
) -> Result<(), StorageError> {
    let record = collection_mut(document, keys.collection)
        .and_then(|items| {
            items
                .iter_mut()
                .find(|item| record_id(item).as_deref() == Some(id))
        })
        .and_then(Value::as_object_mut)
        .ok_or_else(|| StorageError::MissingRecord {
            kind: keys.kind,
            id: id.to_string(),
        })?;

    let date = date.map_or(Value::Null, |date| {
        Value::String(date.format("%Y-%m-%d").to_string())
    });
    let account = account.map_or(Value::Null, |account| Value::String(account.to_string()));
    set_field(record, LogicalField::SettledFlag, keys.flag, Value::Bool(settled));
    set_field(record, LogicalField::SettlementDate, keys.date, date);
    set_field(record, LogicalField::AccountId, ACCOUNT, account);
    Ok(())
}

/// Overwrites every alias of `field` already present on the record so no
/// stale spelling can win resolution; inserts under the record's own naming
/// convention when none is present.
fn set_field(
    record: &mut Map<String, Value>,
    field: LogicalField,
    fallback: (&str, &str),
    value: Value,
) {
    let present: Vec<&str> = field
        .aliases()
        .iter()
        .copied()
        .filter(|alias| record.contains_key(*alias))
        .collect();
    if present.is_empty() {
        let snake = record.keys().any(|key| key.contains('_'));
        let key = if snake { fallback.1 } else { fallback.0 };
        record.insert(key.to_string(), value);
        return;
    }
    for alias in present {
        record.insert(alias.to_string(), value.clone());
    }
}

fn collection_mut<'a>(
    document: &'a mut Map<String, Value>,
    keys: &[&str],
) -> Option<&'a mut Vec<Value>> {
    let key = keys
        .iter()
        .find(|key| document.get(**key).is_some_and(Value::is_array))?;
    document.get_mut(*key).and_then(Value::as_array_mut)
}

fn record_id(item: &Value) -> Option<String> {
    RawRecord::new(item).and_then(|record| record.string(LogicalField::Id))
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;
    use serde_json::json;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn apply(changes: &SnapshotChanges, mut document: Value) -> Value {
        changes
            .apply_to(document.as_object_mut().unwrap())
            .unwrap();
        document
    }

    #[test]
    fn settlement_keeps_the_record_spelling_and_unknown_keys() {
        let document = json!({
            "payable_accounts": [
                { "id": "p1", "value": 10, "due_date": "2024-05-01", "is_paid": false, "extra": 7 }
            ]
        });
        let paid = PayableAccount::new("p1", dec!(10), date(2024, 5, 1))
            .with_account("bank")
            .paid_on(date(2024, 5, 2));
        let patched = apply(&SnapshotChanges::new().update_payable(paid), document);

        assert_eq!(
            patched["payable_accounts"][0],
            json!({
                "id": "p1",
                "value": 10,
                "due_date": "2024-05-01",
                "is_paid": true,
                "paid_date": "2024-05-02",
                "account_id": "bank",
                "extra": 7
            })
        );
    }

    #[test]
    fn reopening_clears_every_spelling_of_the_date() {
        let document = json!({
            "receivableAccounts": [
                { "id": "r1", "isReceived": true, "receivedDate": "2024-05-02", "received_date": "2024-05-02" }
            ],
            "transactions": [
                { "id": "t1", "sourceId": "r1" },
                { "id": "t2" }
            ]
        });
        let open = ReceivableAccount::new("r1", dec!(5), date(2024, 5, 1));
        let changes = SnapshotChanges::new()
            .update_receivable(open)
            .remove_transactions(["t1".to_string()]);
        let patched = apply(&changes, document);

        let record = &patched["receivableAccounts"][0];
        assert_eq!(record["isReceived"], json!(false));
        assert_eq!(record["receivedDate"], Value::Null);
        assert_eq!(record["received_date"], Value::Null);
        assert_eq!(patched["transactions"], json!([{ "id": "t2" }]));
    }

    #[test]
    fn unknown_record_is_an_error() {
        let mut document = json!({ "payableAccounts": [] });
        let payable = PayableAccount::new("missing", dec!(1), date(2024, 5, 1));
        let err = SnapshotChanges::new()
            .update_payable(payable)
            .apply_to(document.as_object_mut().unwrap())
            .unwrap_err();
        assert!(matches!(
            err,
            StorageError::MissingRecord { kind: RecordKind::Payable, .. }
        ));
    }
}
