//! fintrack-domain
//!
//! Pure domain records (payables, receivables, transactions, categories,
//! clients/suppliers) plus the field resolver that normalizes upstream
//! record shapes. No I/O, no aggregation logic.

pub mod account;
pub mod category;
pub mod common;
pub mod error;
pub mod fields;
pub mod party;
pub mod snapshot;
pub mod transaction;

pub use account::*;
pub use category::*;
pub use common::*;
pub use error::{DomainError, RecordKind};
pub use fields::{LogicalField, RawRecord};
pub use party::*;
pub use snapshot::*;
pub use transaction::*;
