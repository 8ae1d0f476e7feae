//! fintrack-core
//!
//! Aggregation and reporting engine: period windows, dashboard KPIs,
//! category-grouped reports, export flattening, and settlement transitions.
//! Depends on fintrack-domain. Pure computation; no terminal or file I/O.

pub mod chart_service;
pub mod dashboard_service;
pub mod engine;
pub mod error;
pub mod export;
pub mod format;
pub mod money;
pub mod report_service;
pub mod settlement_service;
pub mod storage;
pub mod time;
pub mod window;

pub use chart_service::{ChartPoint, ChartService};
pub use dashboard_service::{DashboardService, DashboardSummary};
pub use engine::FinanceEngine;
pub use error::CoreError;
pub use export::{ExportContext, ExportMode, ExportRow};
pub use format::{AmountFormatter, PlainAmountFormatter};
pub use report_service::{
    ItemSource, Report, ReportGroup, ReportItem, ReportKind, ReportLabels, ReportService,
};
pub use settlement_service::{Reopened, Settlement, SettlementService};
pub use storage::{snapshot_warnings, SnapshotSource};
pub use time::{Clock, FixedClock, SystemClock};
pub use window::{DateBounds, PendingPolicy, PeriodWindow};

#[cfg(test)]
mod tests;
