use std::fs;

use chrono::NaiveDate;
use fintrack_core::{
    DashboardService, PeriodWindow, ReportKind, ReportLabels, ReportService, SnapshotSource,
};
use serde_json::{json, Value};
use fintrack_domain::{
    Category, ClientSupplier, CounterpartyRole, FinanceSnapshot, FlowType, PayableAccount,
    Transaction,
};
use fintrack_core::SettlementService;
use fintrack_storage_json::{JsonSnapshotStorage, SnapshotChanges, StorageError};
use rust_decimal_macros::dec;
use tempfile::tempdir;

fn date(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).expect("valid date")
}

#[test]
fn persisted_shape_loads_with_skips_and_warnings() {
    let dir = tempdir().expect("tempdir");
    let path = dir.path().join("snapshot.json");
    fs::write(
        &path,
        r#"{
            "payable_accounts": [
                { "id": "p1", "value": "1000", "due_date": "2024-05-10", "category_id": "rent" },
                { "value": 3 },
                { "id": "p2", "value": 12.5, "due_date": "2024-05-11", "category_id": "ghost" }
            ],
            "categories": [ { "id": "rent", "name": "Rent", "type": "despesa" } ]
        }"#,
    )
    .expect("write snapshot");

    let report = JsonSnapshotStorage::new(&path)
        .load_with_report()
        .expect("load snapshot");

    assert_eq!(report.snapshot.payable_accounts.len(), 2);
    assert_eq!(report.rejected.len(), 1);
    assert_eq!(
        report.warnings,
        vec!["payable p2 references missing category ghost".to_string()]
    );
}

#[test]
fn saved_snapshot_round_trips_through_the_resolver() {
    let dir = tempdir().expect("tempdir");
    let storage = JsonSnapshotStorage::new(dir.path().join("data").join("snapshot.json"));
    let mut payable = PayableAccount::new("p1", dec!(200), date(2024, 5, 12))
        .with_category("utilities")
        .with_supplier("s1")
        .paid_on(date(2024, 5, 15));
    payable.supplier_name = Some("Power Co".into());
    let snapshot = FinanceSnapshot::new()
        .with_categories(vec![Category::expense("utilities", "Utilities")])
        .with_clients_suppliers(vec![ClientSupplier::new(
            "s1",
            "Power Co",
            CounterpartyRole::Supplier,
        )])
        .with_payables(vec![payable])
        .with_transactions(vec![Transaction::manual(
            "t1",
            FlowType::Expense,
            dec!(50),
            date(2024, 5, 1),
        )
        .with_category("utilities")]);

    storage.save(&snapshot).expect("save snapshot");
    let loaded = storage.load_snapshot().expect("load snapshot");

    assert_eq!(&*loaded.payable_accounts, &*snapshot.payable_accounts);
    assert_eq!(&*loaded.transactions, &*snapshot.transactions);
    assert_eq!(&*loaded.clients_suppliers, &*snapshot.clients_suppliers);

    let today = date(2024, 6, 1);
    assert_eq!(
        DashboardService::summarize(&loaded, &PeriodWindow::Unbounded, today),
        DashboardService::summarize(&snapshot, &PeriodWindow::Unbounded, today)
    );
    let report = ReportService::build(
        &loaded,
        ReportKind::PaidExpenses,
        &PeriodWindow::Unbounded,
        today,
        &ReportLabels::default(),
    );
    assert_eq!(report.grand_total, dec!(250));
}

#[test]
fn non_object_document_is_an_error() {
    let dir = tempdir().expect("tempdir");
    let path = dir.path().join("snapshot.json");
    fs::write(&path, "[1, 2, 3]").expect("write snapshot");

    let err = JsonSnapshotStorage::new(&path)
        .load_snapshot()
        .expect_err("array document");
    assert!(matches!(err, StorageError::InvalidDocument { .. }));
}

#[test]
fn missing_file_is_an_io_error() {
    let dir = tempdir().expect("tempdir");
    let err = JsonSnapshotStorage::new(dir.path().join("absent.json"))
        .load_snapshot()
        .expect_err("missing file");
    assert!(matches!(err, StorageError::Io(_)));
}

#[test]
fn applied_settlement_keeps_unreadable_records() {
    let dir = tempdir().expect("tempdir");
    let path = dir.path().join("snapshot.json");
    fs::write(
        &path,
        r#"{
            "payableAccounts": [
                { "id": "p1", "value": 40, "dueDate": "2024-05-01", "categoryId": "x", "tag": "keep" }
            ],
            "transactions": [ { "id": "t-legacy", "value": 5 } ],
            "categories": [ { "id": "x", "name": "Untyped" } ],
            "settings": { "theme": "dark" }
        }"#,
    )
    .expect("write snapshot");
    let storage = JsonSnapshotStorage::new(&path);
    let loaded = storage.load_with_report().expect("load snapshot");
    assert_eq!(loaded.rejected.len(), 2);

    let settlement = SettlementService::settle_payable(
        &loaded.snapshot.payable_accounts[0],
        &loaded.snapshot.transactions,
        date(2024, 5, 2),
        Some("bank"),
    )
    .expect("settle");
    let mirror_id = settlement.mirrored.as_ref().map(|txn| txn.id.clone());
    storage
        .apply(
            &SnapshotChanges::new()
                .update_payable(settlement.record)
                .insert_transactions(settlement.mirrored),
        )
        .expect("apply changes");

    let stored: Value =
        serde_json::from_str(&fs::read_to_string(&path).expect("read back")).expect("parse");
    assert_eq!(stored["settings"], json!({ "theme": "dark" }));
    assert_eq!(stored["categories"], json!([{ "id": "x", "name": "Untyped" }]));
    assert_eq!(stored["transactions"][0], json!({ "id": "t-legacy", "value": 5 }));
    assert_eq!(stored["transactions"][1]["id"], json!(mirror_id));
    assert_eq!(stored["payableAccounts"][0]["tag"], json!("keep"));
    assert_eq!(stored["payableAccounts"][0]["isPaid"], json!(true));

    let reloaded = storage.load_snapshot().expect("reload");
    assert!(reloaded.payable_accounts[0].is_paid);
    assert_eq!(reloaded.transactions.len(), 1);
}
