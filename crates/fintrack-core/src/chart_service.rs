use chrono::NaiveDate;
use fintrack_domain::{FinanceSnapshot, FlowType};
use rust_decimal::Decimal;
use serde::Serialize;

use crate::{
    report_service::{ReportKind, ReportLabels, ReportService},
    window::PeriodWindow,
};

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ChartPoint {
    pub name: String,
    pub value: Decimal,
}

pub struct ChartService;

impl ChartService {
    /// Settled totals per category, largest first. Shares the report
    /// grouping so chart and report totals always agree.
    pub fn settled_by_category(
        snapshot: &FinanceSnapshot,
        flow: FlowType,
        window: &PeriodWindow,
        today: NaiveDate,
    ) -> Vec<ChartPoint> {
        let kind = match flow {
            FlowType::Expense => ReportKind::PaidExpenses,
            FlowType::Revenue => ReportKind::ReceivedRevenues,
        };
        let report = ReportService::build(snapshot, kind, window, today, &ReportLabels::default());
        let mut points: Vec<ChartPoint> = report
            .data
            .into_iter()
            .map(|group| ChartPoint {
                name: group.category_name,
                value: group.total,
            })
            .collect();
        points.sort_by(|a, b| b.value.cmp(&a.value));
        points
    }
}
