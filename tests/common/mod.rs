#![allow(dead_code)]

use std::{
    path::{Path, PathBuf},
    sync::Mutex,
};

use fintrack_domain::FinanceSnapshot;
use once_cell::sync::Lazy;
use serde_json::{json, Value};
use tempfile::TempDir;

/// Holds TempDir guards so temporary folders live for the duration of the test run.
static TEST_DIRS: Lazy<Mutex<Vec<TempDir>>> = Lazy::new(|| Mutex::new(Vec::new()));

/// Rent/Utilities bookkeeping in the snake_case persisted shape, with one
/// client-facing receivable and a mirrored settlement transaction.
pub static SAMPLE_DOCUMENT: Lazy<Value> = Lazy::new(|| {
    json!({
        "payable_accounts": [
            {
                "id": "p-rent",
                "value": 1000,
                "due_date": "2024-05-10",
                "is_paid": false,
                "category_id": "rent",
                "supplier_id": "s-landlord"
            },
            {
                "id": "p-util",
                "value": 200,
                "due_date": "2024-05-12",
                "is_paid": true,
                "paid_date": "2024-05-15",
                "category_id": "utilities",
                "supplier_id": "s-power",
                "account_id": "acc-bank"
            }
        ],
        "receivable_accounts": [
            {
                "id": "r-acme",
                "value": 800,
                "due_date": "2024-05-20",
                "is_received": false,
                "category_id": "sales",
                "client_id": "c-acme"
            }
        ],
        "transactions": [
            {
                "id": "t-util-manual",
                "type": "despesa",
                "value": 50,
                "payment_date": "2024-05-01",
                "category_id": "utilities",
                "source_type": "manual"
            },
            {
                "id": "t-util-mirror",
                "type": "despesa",
                "value": 200,
                "payment_date": "2024-05-15",
                "category_id": "utilities",
                "account_id": "acc-bank",
                "source_type": "payable",
                "source_id": "p-util"
            }
        ],
        "categories": [
            { "id": "rent", "name": "Rent", "type": "despesa" },
            { "id": "utilities", "name": "Utilities", "type": "despesa" },
            { "id": "sales", "name": "Sales", "type": "receita" }
        ],
        "clients_suppliers": [
            { "id": "s-landlord", "name": "Landlord Ltd", "type": "fornecedor" },
            { "id": "s-power", "name": "Power Co", "type": "fornecedor" },
            { "id": "c-acme", "name": "Acme", "type": "cliente" }
        ]
    })
});

pub static SAMPLE_SNAPSHOT: Lazy<FinanceSnapshot> =
    Lazy::new(|| FinanceSnapshot::from_raw(&SAMPLE_DOCUMENT).snapshot);

/// Creates a unique directory that outlives the calling test.
pub fn temp_dir() -> PathBuf {
    let temp = TempDir::new().expect("create temp dir");
    let path = temp.path().to_path_buf();
    TEST_DIRS.lock().expect("lock temp dir registry").push(temp);
    path
}

/// Writes the sample document into `dir` and returns its path.
pub fn write_sample(dir: &Path) -> PathBuf {
    let path = dir.join("snapshot.json");
    let json = serde_json::to_string_pretty(&*SAMPLE_DOCUMENT).expect("serialize sample");
    std::fs::write(&path, json).expect("write sample");
    path
}
