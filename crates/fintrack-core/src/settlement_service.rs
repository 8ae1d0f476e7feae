//! Settlement transitions that keep account state and mirrored
//! transactions consistent.
//!
//! These functions never write anywhere. They return the records the data
//! layer has to persist (and the mirrored transaction it has to delete) so
//! exactly one mirror exists per settled account.

use chrono::NaiveDate;
use fintrack_domain::{
    FlowType, PayableAccount, ReceivableAccount, Settleable, SourceType, Transaction,
};
use uuid::Uuid;

use crate::CoreError;

/// An account after settlement plus the mirror to insert, if one was missing.
#[derive(Debug, Clone, PartialEq)]
pub struct Settlement<T> {
    pub record: T,
    pub mirrored: Option<Transaction>,
}

/// An account after reopening plus the id of the mirror to delete.
#[derive(Debug, Clone, PartialEq)]
pub struct Reopened<T> {
    pub record: T,
    pub removed_transaction: Option<String>,
}

pub struct SettlementService;

impl SettlementService {
    /// Marks a payable paid on `paid_on` through `account_id` (or the account
    /// already recorded on the payable).
    pub fn settle_payable(
        payable: &PayableAccount,
        transactions: &[Transaction],
        paid_on: NaiveDate,
        account_id: Option<&str>,
    ) -> Result<Settlement<PayableAccount>, CoreError> {
        if payable.is_settled() {
            return Err(CoreError::InvalidOperation(format!(
                "payable {} is already paid",
                payable.id
            )));
        }
        let account = settlement_account(account_id, payable.account_id.as_deref(), &payable.id)?;
        let mut record = payable.clone();
        record.is_paid = true;
        record.paid_date = Some(paid_on);
        record.account_id = Some(account.clone());

        let mirrored = mirror_if_missing(
            &record,
            transactions,
            FlowType::Expense,
            SourceType::Payable,
            account,
            paid_on,
        );
        Ok(Settlement { record, mirrored })
    }

    /// Clears the paid state and reports the mirrored transaction to delete.
    pub fn reopen_payable(
        payable: &PayableAccount,
        transactions: &[Transaction],
    ) -> Reopened<PayableAccount> {
        let mut record = payable.clone();
        record.is_paid = false;
        record.paid_date = None;
        record.account_id = None;
        let removed_transaction = find_mirror(transactions, SourceType::Payable, &payable.id);
        Reopened {
            record,
            removed_transaction,
        }
    }

    pub fn settle_receivable(
        receivable: &ReceivableAccount,
        transactions: &[Transaction],
        received_on: NaiveDate,
        account_id: Option<&str>,
    ) -> Result<Settlement<ReceivableAccount>, CoreError> {
        if receivable.is_settled() {
            return Err(CoreError::InvalidOperation(format!(
                "receivable {} is already received",
                receivable.id
            )));
        }
        let account = settlement_account(
            account_id,
            receivable.account_id.as_deref(),
            &receivable.id,
        )?;
        let mut record = receivable.clone();
        record.is_received = true;
        record.received_date = Some(received_on);
        record.account_id = Some(account.clone());

        let mirrored = mirror_if_missing(
            &record,
            transactions,
            FlowType::Revenue,
            SourceType::Receivable,
            account,
            received_on,
        );
        Ok(Settlement { record, mirrored })
    }

    pub fn reopen_receivable(
        receivable: &ReceivableAccount,
        transactions: &[Transaction],
    ) -> Reopened<ReceivableAccount> {
        let mut record = receivable.clone();
        record.is_received = false;
        record.received_date = None;
        record.account_id = None;
        let removed_transaction =
            find_mirror(transactions, SourceType::Receivable, &receivable.id);
        Reopened {
            record,
            removed_transaction,
        }
    }
}

fn settlement_account(
    given: Option<&str>,
    recorded: Option<&str>,
    record_id: &str,
) -> Result<String, CoreError> {
    non_blank(given)
        .or_else(|| non_blank(recorded))
        .map(str::to_string)
        .ok_or_else(|| {
            CoreError::Validation(format!("a settlement account is required for {record_id}"))
        })
}

fn non_blank(account: Option<&str>) -> Option<&str> {
    account.map(str::trim).filter(|account| !account.is_empty())
}

fn find_mirror(transactions: &[Transaction], source: SourceType, id: &str) -> Option<String> {
    transactions
        .iter()
        .find(|transaction| transaction.mirrors(source, id))
        .map(|transaction| transaction.id.clone())
}

fn mirror_if_missing<T: Settleable>(
    record: &T,
    transactions: &[Transaction],
    kind: FlowType,
    source: SourceType,
    account: String,
    date: NaiveDate,
) -> Option<Transaction> {
    if let Some(existing) = find_mirror(transactions, source, record.id()) {
        tracing::debug!(record = record.id(), transaction = %existing, "mirror already present");
        return None;
    }
    Some(Transaction {
        id: Uuid::new_v4().to_string(),
        kind,
        value: record.amount(),
        payment_date: Some(date),
        category_id: record.category_id().map(str::to_string),
        client_supplier_id: record.counterparty_id().map(str::to_string),
        client_supplier_name: record.counterparty_name().map(str::to_string),
        account_id: Some(account),
        source_type: source,
        source_id: Some(record.id().to_string()),
        observations: record.observations().map(str::to_string),
    })
}
