//! Flattens a report into plain string rows for spreadsheet and PDF writers.

use chrono::{NaiveDate, NaiveDateTime};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::report_service::{Report, ReportGroup, ReportLabels};

/// One spreadsheet row; cells are already formatted.
pub type ExportRow = Vec<String>;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ExportMode {
    #[default]
    Summary,
    Detailed,
}

/// Everything the flattener needs besides the report itself.
#[derive(Debug, Clone)]
pub struct ExportContext {
    pub generated_at: NaiveDateTime,
    pub labels: ReportLabels,
}

impl ExportContext {
    pub fn new(generated_at: NaiveDateTime, labels: ReportLabels) -> Self {
        Self {
            generated_at,
            labels,
        }
    }

    fn generated_label(&self) -> String {
        format!(
            "{} at {}",
            self.labels.format_date(self.generated_at.date()),
            self.generated_at.format("%H:%M")
        )
    }
}

pub fn flatten(report: &Report, mode: ExportMode, context: &ExportContext) -> Vec<ExportRow> {
    let title = match mode {
        ExportMode::Summary => report.title.clone(),
        ExportMode::Detailed => format!("{} - Detailed", report.title),
    };
    let mut rows: Vec<ExportRow> = vec![
        vec![title],
        vec![format!("Period: {}", report.period)],
        vec![format!("Generated at: {}", context.generated_label())],
        Vec::new(),
    ];

    match mode {
        ExportMode::Detailed => {
            for group in &report.data {
                detailed_group(&mut rows, group, &context.labels);
            }
        }
        ExportMode::Summary => {
            rows.push(cells(["Category", "Quantity", "Total"]));
            for group in &report.data {
                rows.push(vec![
                    group.category_name.clone(),
                    group.count.to_string(),
                    amount(group.total),
                ]);
            }
        }
    }

    let count = match mode {
        ExportMode::Summary => report.item_count().to_string(),
        ExportMode::Detailed => String::new(),
    };
    rows.push(vec![
        "GRAND TOTAL".to_string(),
        count,
        String::new(),
        amount(report.grand_total),
    ]);
    rows
}

fn detailed_group(rows: &mut Vec<ExportRow>, group: &ReportGroup, labels: &ReportLabels) {
    rows.push(Vec::new());
    rows.push(vec![format!("CATEGORY: {}", group.category_name)]);
    rows.push(cells(["Client/Supplier", "Date", "Observations", "Value"]));
    for item in &group.items {
        rows.push(vec![
            item.counterparty_name
                .clone()
                .unwrap_or_else(|| "N/A".to_string()),
            item.date
                .map(|date| labels.format_date(date))
                .unwrap_or_default(),
            item.observations.clone().unwrap_or_default(),
            amount(item.value),
        ]);
    }
    rows.push(vec![
        format!("Subtotal - {}", group.category_name),
        String::new(),
        String::new(),
        amount(group.total),
    ]);
}

/// `<Title_With_Underscores>_[Detailed_]<yyyy-mm-dd>.<extension>`
pub fn file_name(title: &str, mode: ExportMode, date: NaiveDate, extension: &str) -> String {
    let stem = title.split_whitespace().collect::<Vec<_>>().join("_");
    let detailed = match mode {
        ExportMode::Detailed => "Detailed_",
        ExportMode::Summary => "",
    };
    format!(
        "{stem}_{detailed}{}.{}",
        date.format("%Y-%m-%d"),
        extension.trim_start_matches('.')
    )
}

fn amount(value: Decimal) -> String {
    format!("{:.2}", value.round_dp(2))
}

fn cells<const N: usize>(labels: [&str; N]) -> ExportRow {
    labels.iter().map(|label| label.to_string()).collect()
}
