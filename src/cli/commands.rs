use std::{io::Write, path::Path};

use chrono::NaiveDate;
use colored::Colorize;
use fintrack_core::{
    export::{self, ExportContext, ExportMode},
    AmountFormatter, ChartService, Clock, FinanceEngine, PeriodWindow, Report, ReportKind,
    SettlementService,
};
use fintrack_domain::{FinanceSnapshot, FlowType, Identifiable};
use fintrack_storage_json::{JsonSnapshotStorage, SnapshotChanges};

use super::{
    table::{Table, TableColumn},
    AccountArg, Context, FlowArg, ReportFormat, SummaryFormat, WindowArgs,
};
use crate::{errors::AppError, utils::build_info};

fn load(path: &Path) -> Result<FinanceSnapshot, AppError> {
    let loaded = JsonSnapshotStorage::new(path).load_with_report()?;
    if !loaded.rejected.is_empty() {
        tracing::info!(
            skipped = loaded.rejected.len(),
            "some records could not be read and were left out"
        );
    }
    Ok(loaded.snapshot)
}

fn period_label(ctx: &Context, window: &PeriodWindow) -> String {
    ctx.config
        .report_labels()
        .period(&window.bounds(ctx.today()))
}

pub fn dashboard(
    ctx: &Context,
    path: &Path,
    window: &WindowArgs,
    format: SummaryFormat,
    out: &mut dyn Write,
) -> Result<(), AppError> {
    let snapshot = load(path)?;
    let window = window.resolve(ctx.config.default_window.to_window());
    let mut engine = FinanceEngine::new(ctx.clock);
    let summary = *engine.dashboard(&snapshot, &window);

    match format {
        SummaryFormat::Json => writeln!(out, "{}", serde_json::to_string_pretty(&summary)?)?,
        SummaryFormat::Table => {
            writeln!(out, "{}", "Dashboard".bold())?;
            writeln!(out, "Period: {}", period_label(ctx, &window))?;
            let formatter = ctx.config.amount_formatter();
            let mut table =
                Table::new(vec![TableColumn::left("Metric"), TableColumn::right("Amount")]);
            for (label, amount) in summary.lines(&formatter) {
                let amount = if amount.starts_with('-') {
                    amount.red().to_string()
                } else {
                    amount
                };
                table.push(vec![label.to_string(), amount]);
            }
            writeln!(out, "{}", table.render())?;
        }
    }
    Ok(())
}

pub fn report(
    ctx: &Context,
    kind: &str,
    path: &Path,
    window: &WindowArgs,
    format: ReportFormat,
    detailed: bool,
    out: &mut dyn Write,
) -> Result<(), AppError> {
    let kind: ReportKind = kind.parse()?;
    let snapshot = load(path)?;
    let window = window.resolve(PeriodWindow::Unbounded);
    let labels = ctx.config.report_labels();
    let mut engine = FinanceEngine::new(ctx.clock).with_labels(labels.clone());
    let report = engine.report(&snapshot, kind, &window);
    let mode = if detailed {
        ExportMode::Detailed
    } else {
        ctx.config.export_mode()
    };

    match format {
        ReportFormat::Json => writeln!(out, "{}", serde_json::to_string_pretty(report)?)?,
        ReportFormat::Rows => {
            let context = ExportContext::new(ctx.clock.now(), labels);
            for row in export::flatten(report, mode, &context) {
                writeln!(out, "{}", row.join("\t"))?;
            }
        }
        ReportFormat::Table => render_report(ctx, report, mode, out)?,
    }
    Ok(())
}

fn render_report(
    ctx: &Context,
    report: &Report,
    mode: ExportMode,
    out: &mut dyn Write,
) -> Result<(), AppError> {
    let formatter = ctx.config.amount_formatter();
    let labels = ctx.config.report_labels();
    writeln!(out, "{}", report.title.bold())?;
    writeln!(out, "Period: {}", report.period)?;
    if report.is_empty() {
        writeln!(out, "No records for this period.")?;
        return Ok(());
    }

    match mode {
        ExportMode::Summary => {
            let mut table = Table::new(vec![
                TableColumn::left("Category"),
                TableColumn::right("Quantity"),
                TableColumn::right("Total"),
            ]);
            for group in &report.data {
                table.push(vec![
                    group.category_name.clone(),
                    group.count.to_string(),
                    formatter.format_amount(group.total),
                ]);
            }
            writeln!(out, "{}", table.render())?;
        }
        ExportMode::Detailed => {
            for group in &report.data {
                writeln!(out)?;
                writeln!(out, "{}", group.category_name.bold())?;
                let mut table = Table::new(vec![
                    TableColumn::left("Client/Supplier"),
                    TableColumn::left("Date"),
                    TableColumn::left("Observations"),
                    TableColumn::right("Value"),
                ]);
                for item in &group.items {
                    table.push(vec![
                        item.counterparty_name.clone().unwrap_or_else(|| "N/A".into()),
                        item.date.map(|d| labels.format_date(d)).unwrap_or_default(),
                        item.observations.clone().unwrap_or_default(),
                        formatter.format_amount(item.value),
                    ]);
                }
                writeln!(out, "{}", table.render())?;
                writeln!(out, "Subtotal: {}", formatter.format_amount(group.total))?;
            }
        }
    }
    writeln!(
        out,
        "{} {}",
        "Grand total:".bold(),
        formatter.format_amount(report.grand_total)
    )?;
    Ok(())
}

pub fn chart(
    ctx: &Context,
    flow: FlowArg,
    path: &Path,
    window: &WindowArgs,
    out: &mut dyn Write,
) -> Result<(), AppError> {
    let snapshot = load(path)?;
    let window = window.resolve(ctx.config.default_window.to_window());
    let flow = match flow {
        FlowArg::Expense => FlowType::Expense,
        FlowArg::Revenue => FlowType::Revenue,
    };
    let points = ChartService::settled_by_category(&snapshot, flow, &window, ctx.today());
    let formatter = ctx.config.amount_formatter();

    writeln!(out, "Period: {}", period_label(ctx, &window))?;
    let mut table = Table::new(vec![TableColumn::left("Category"), TableColumn::right("Total")]);
    for point in points {
        table.push(vec![point.name, formatter.format_amount(point.value)]);
    }
    writeln!(out, "{}", table.render())?;
    Ok(())
}

pub fn settle(
    ctx: &Context,
    target: AccountArg,
    path: &Path,
    id: &str,
    account: Option<&str>,
    on: Option<NaiveDate>,
    out: &mut dyn Write,
) -> Result<(), AppError> {
    let storage = JsonSnapshotStorage::new(path);
    let snapshot = load(path)?;
    let on = on.unwrap_or_else(|| ctx.today());

    let (changes, mirrored) = match target {
        AccountArg::Payable => {
            let payable = find(&snapshot.payable_accounts, "payable", id)?;
            let settlement =
                SettlementService::settle_payable(payable, &snapshot.transactions, on, account)?;
            let mirrored = settlement.mirrored.as_ref().map(|t| t.id.clone());
            (
                SnapshotChanges::new()
                    .update_payable(settlement.record)
                    .insert_transactions(settlement.mirrored),
                mirrored,
            )
        }
        AccountArg::Receivable => {
            let receivable = find(&snapshot.receivable_accounts, "receivable", id)?;
            let settlement = SettlementService::settle_receivable(
                receivable,
                &snapshot.transactions,
                on,
                account,
            )?;
            let mirrored = settlement.mirrored.as_ref().map(|t| t.id.clone());
            (
                SnapshotChanges::new()
                    .update_receivable(settlement.record)
                    .insert_transactions(settlement.mirrored),
                mirrored,
            )
        }
    };
    storage.apply(&changes)?;
    tracing::info!(id, settled_on = %on, "account settled");

    write!(out, "Settled {} {id} on {on}", label(target))?;
    match mirrored {
        Some(txn) => writeln!(out, " (transaction {txn})")?,
        None => writeln!(out, " (existing transaction kept)")?,
    }
    Ok(())
}

pub fn reopen(
    target: AccountArg,
    path: &Path,
    id: &str,
    out: &mut dyn Write,
) -> Result<(), AppError> {
    let storage = JsonSnapshotStorage::new(path);
    let snapshot = load(path)?;

    let (changes, removed) = match target {
        AccountArg::Payable => {
            let payable = find(&snapshot.payable_accounts, "payable", id)?;
            let reopened = SettlementService::reopen_payable(payable, &snapshot.transactions);
            (
                SnapshotChanges::new()
                    .update_payable(reopened.record)
                    .remove_transactions(reopened.removed_transaction.clone()),
                reopened.removed_transaction,
            )
        }
        AccountArg::Receivable => {
            let receivable = find(&snapshot.receivable_accounts, "receivable", id)?;
            let reopened =
                SettlementService::reopen_receivable(receivable, &snapshot.transactions);
            (
                SnapshotChanges::new()
                    .update_receivable(reopened.record)
                    .remove_transactions(reopened.removed_transaction.clone()),
                reopened.removed_transaction,
            )
        }
    };
    storage.apply(&changes)?;
    tracing::info!(id, "account reopened");

    write!(out, "Reopened {} {id}", label(target))?;
    match removed {
        Some(txn) => writeln!(out, " (removed transaction {txn})")?,
        None => writeln!(out)?,
    }
    Ok(())
}

pub fn version(out: &mut dyn Write) -> Result<(), AppError> {
    let meta = build_info::current();
    writeln!(out, "fintrack {}", meta.version)?;
    for (key, value) in meta.lines().into_iter().skip(1) {
        writeln!(out, "  {key:<8}: {value}")?;
    }
    Ok(())
}

fn label(target: AccountArg) -> &'static str {
    match target {
        AccountArg::Payable => "payable",
        AccountArg::Receivable => "receivable",
    }
}

fn find<'a, T: Identifiable>(records: &'a [T], kind: &str, id: &str) -> Result<&'a T, AppError> {
    records
        .iter()
        .find(|record| record.id() == id)
        .ok_or_else(|| AppError::NotFound(format!("{kind} {id}")))
}
