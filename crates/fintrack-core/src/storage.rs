use std::collections::{HashMap, HashSet};

use fintrack_domain::{FinanceSnapshot, Settleable, SourceType};

/// Abstraction over backends able to produce a finance snapshot.
pub trait SnapshotSource {
    type Error: std::error::Error;

    fn load_snapshot(&self) -> Result<FinanceSnapshot, Self::Error>;
}

/// Detects dangling references and broken mirror pairs within a snapshot.
pub fn snapshot_warnings(snapshot: &FinanceSnapshot) -> Vec<String> {
    let category_ids: HashSet<&str> = snapshot.categories.iter().map(|c| c.id.as_str()).collect();
    let mut warnings = Vec::new();

    let mut check_category = |owner: String, category: Option<&str>| {
        if let Some(category) = category {
            if !category_ids.contains(category) {
                warnings.push(format!("{owner} references missing category {category}"));
            }
        }
    };
    for payable in snapshot.payable_accounts.iter() {
        check_category(format!("payable {}", payable.id), payable.category_id.as_deref());
    }
    for receivable in snapshot.receivable_accounts.iter() {
        check_category(
            format!("receivable {}", receivable.id),
            receivable.category_id.as_deref(),
        );
    }
    for txn in snapshot.transactions.iter() {
        check_category(format!("transaction {}", txn.id), txn.category_id.as_deref());
    }

    let mut mirrors: HashMap<(SourceType, &str), usize> = HashMap::new();
    for txn in snapshot.transactions.iter() {
        if let (SourceType::Payable | SourceType::Receivable, Some(source)) =
            (txn.source_type, txn.source_id.as_deref())
        {
            *mirrors.entry((txn.source_type, source)).or_default() += 1;
        }
        if txn.source_type == SourceType::Unknown {
            warnings.push(format!("transaction {} has an unknown source type", txn.id));
        }
    }

    for payable in snapshot.payable_accounts.iter() {
        let count = mirrors
            .remove(&(SourceType::Payable, payable.id.as_str()))
            .unwrap_or(0);
        warnings.extend(mirror_warning("payable", &payable.id, payable.is_settled(), count));
    }
    for receivable in snapshot.receivable_accounts.iter() {
        let count = mirrors
            .remove(&(SourceType::Receivable, receivable.id.as_str()))
            .unwrap_or(0);
        warnings.extend(mirror_warning(
            "receivable",
            &receivable.id,
            receivable.is_settled(),
            count,
        ));
    }
    let mut orphans: Vec<_> = mirrors.into_keys().collect();
    orphans.sort_by_key(|(source, id)| (source.to_string(), *id));
    for (source, id) in orphans {
        warnings.push(format!("{source} transaction points at missing account {id}"));
    }
    warnings
}

fn mirror_warning(label: &str, id: &str, settled: bool, count: usize) -> Option<String> {
    match (settled, count) {
        (true, 0) => Some(format!("{label} {id} is settled without a transaction")),
        (false, n) if n > 0 => Some(format!("{label} {id} is pending but has a transaction")),
        (_, n) if n > 1 => Some(format!("{label} {id} has {n} transactions")),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;
    use fintrack_domain::{Category, FlowType, PayableAccount, Transaction};
    use rust_decimal_macros::dec;

    fn mirror(id: &str, source_id: &str) -> Transaction {
        let day = NaiveDate::from_ymd_opt(2024, 5, 2).unwrap();
        let mut txn = Transaction::manual(id, FlowType::Expense, dec!(1), day);
        txn.source_type = SourceType::Payable;
        txn.source_id = Some(source_id.into());
        txn
    }

    #[test]
    fn reports_dangling_references_and_mirror_mismatches() {
        let day = NaiveDate::from_ymd_opt(2024, 5, 1).unwrap();
        let snapshot = FinanceSnapshot::new()
            .with_categories(vec![Category::expense("rent", "Rent")])
            .with_payables(vec![
                PayableAccount::new("ok", dec!(1), day).with_category("rent").paid_on(day),
                PayableAccount::new("lost", dec!(1), day).with_category("ghost"),
                PayableAccount::new("bare", dec!(1), day).paid_on(day),
            ])
            .with_transactions(vec![mirror("t1", "ok"), mirror("t2", "gone")]);

        let warnings = snapshot_warnings(&snapshot);
        assert_eq!(
            warnings,
            vec![
                "payable lost references missing category ghost".to_string(),
                "payable bare is settled without a transaction".to_string(),
                "payable transaction points at missing account gone".to_string(),
            ]
        );
    }

    #[test]
    fn pending_account_with_duplicate_mirrors_is_reported_once() {
        let day = NaiveDate::from_ymd_opt(2024, 5, 1).unwrap();
        let snapshot = FinanceSnapshot::new()
            .with_payables(vec![PayableAccount::new("open", dec!(1), day)])
            .with_transactions(vec![mirror("t1", "open"), mirror("t2", "open")]);

        assert_eq!(
            snapshot_warnings(&snapshot),
            vec!["payable open is pending but has a transaction".to_string()]
        );
    }

    #[test]
    fn consistent_snapshot_has_no_warnings() {
        assert!(snapshot_warnings(&FinanceSnapshot::new()).is_empty());
    }
}
