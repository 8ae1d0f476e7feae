//! JSON snapshot files: loading through the field resolver, in-place record
//! edits, and atomic saves.

mod patch;

use std::{
    fs::{self, File},
    io::{self, Write},
    path::{Path, PathBuf},
};

use fintrack_core::{snapshot_warnings, SnapshotSource};
use fintrack_domain::{
    Category, ClientSupplier, DomainError, FinanceSnapshot, PayableAccount, ReceivableAccount,
    RecordKind, Transaction,
};
use serde::Serialize;
use serde_json::{Map, Value};
use thiserror::Error;

pub use patch::SnapshotChanges;

const TMP_SUFFIX: &str = "tmp";

#[derive(Debug, Error)]
pub enum StorageError {
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    #[error("Serialization error: {0}")]
    Serde(String),

    #[error("Snapshot {path} is not a JSON object")]
    InvalidDocument { path: PathBuf },

    #[error("{kind} {id} not found in the stored document")]
    MissingRecord { kind: RecordKind, id: String },
}

/// Everything learned while loading a snapshot file.
#[derive(Debug, Clone)]
pub struct LoadReport {
    pub snapshot: FinanceSnapshot,
    pub rejected: Vec<DomainError>,
    pub warnings: Vec<String>,
}

/// File-backed snapshot store using the upstream collection layout.
#[derive(Debug, Clone)]
pub struct JsonSnapshotStorage {
    path: PathBuf,
}

impl JsonSnapshotStorage {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Loads and normalizes the file, keeping the skipped records and
    /// consistency warnings for the caller.
    pub fn load_with_report(&self) -> Result<LoadReport, StorageError> {
        let document = Value::Object(self.read_document()?);
        let raw = FinanceSnapshot::from_raw(&document);
        for rejected in &raw.rejected {
            tracing::warn!(path = %self.path.display(), "skipped record: {rejected}");
        }
        let warnings = snapshot_warnings(&raw.snapshot);
        for warning in &warnings {
            tracing::warn!(path = %self.path.display(), "{warning}");
        }
        tracing::debug!(
            path = %self.path.display(),
            payables = raw.snapshot.payable_accounts.len(),
            receivables = raw.snapshot.receivable_accounts.len(),
            transactions = raw.snapshot.transactions.len(),
            "snapshot loaded"
        );
        Ok(LoadReport {
            snapshot: raw.snapshot,
            rejected: raw.rejected,
            warnings,
        })
    }

    /// Applies record-level edits to the stored document and writes it back
    /// atomically. Records outside `changes` are preserved verbatim, including
    /// ones that failed normalization on load.
    pub fn apply(&self, changes: &SnapshotChanges) -> Result<(), StorageError> {
        if changes.is_empty() {
            return Ok(());
        }
        let mut document = self.read_document()?;
        changes.apply_to(&mut document)?;
        let json = serde_json::to_string_pretty(&document)
            .map_err(|err| StorageError::Serde(err.to_string()))?;
        self.write(&json)?;
        tracing::debug!(path = %self.path.display(), "snapshot edited in place");
        Ok(())
    }

    /// Writes the snapshot in the camelCase layout via a temporary file,
    /// replacing the whole document.
    pub fn save(&self, snapshot: &FinanceSnapshot) -> Result<(), StorageError> {
        let document = SnapshotDocument {
            payable_accounts: &snapshot.payable_accounts,
            receivable_accounts: &snapshot.receivable_accounts,
            transactions: &snapshot.transactions,
            categories: &snapshot.categories,
            clients_suppliers: &snapshot.clients_suppliers,
        };
        let json = serde_json::to_string_pretty(&document)
            .map_err(|err| StorageError::Serde(err.to_string()))?;
        self.write(&json)
    }

    fn read_document(&self) -> Result<Map<String, Value>, StorageError> {
        let data = fs::read_to_string(&self.path)?;
        let document: Value =
            serde_json::from_str(&data).map_err(|err| StorageError::Serde(err.to_string()))?;
        match document {
            Value::Object(fields) => Ok(fields),
            _ => Err(StorageError::InvalidDocument {
                path: self.path.clone(),
            }),
        }
    }

    fn write(&self, json: &str) -> Result<(), StorageError> {
        if let Some(parent) = self.path.parent() {
            if !parent.as_os_str().is_empty() {
                fs::create_dir_all(parent)?;
            }
        }
        let tmp = tmp_path(&self.path);
        write_atomic(&tmp, json)?;
        fs::rename(&tmp, &self.path)?;
        Ok(())
    }
}

impl SnapshotSource for JsonSnapshotStorage {
    type Error = StorageError;

    fn load_snapshot(&self) -> Result<FinanceSnapshot, Self::Error> {
        self.load_with_report().map(|report| report.snapshot)
    }
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct SnapshotDocument<'a> {
    payable_accounts: &'a [PayableAccount],
    receivable_accounts: &'a [ReceivableAccount],
    transactions: &'a [Transaction],
    categories: &'a [Category],
    clients_suppliers: &'a [ClientSupplier],
}

fn tmp_path(path: &Path) -> PathBuf {
    let mut tmp = path.to_path_buf();
    let ext = match path.extension().and_then(|ext| ext.to_str()) {
        Some(existing) => format!("{}.{}", existing, TMP_SUFFIX),
        None => TMP_SUFFIX.to_string(),
    };
    tmp.set_extension(ext);
    tmp
}

fn write_atomic(path: &Path, data: &str) -> Result<(), StorageError> {
    let mut file = File::create(path)?;
    file.write_all(data.as_bytes())?;
    file.sync_all()?;
    Ok(())
}
