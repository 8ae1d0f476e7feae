use chrono::NaiveDate;
use fintrack_domain::{
    Category, ClientSupplier, CounterpartyRole, FinanceSnapshot, FlowType, PayableAccount,
    ReceivableAccount, Transaction,
};
use rust_decimal::Decimal;
use rust_decimal_macros::dec;

use crate::{
    dashboard_service::DashboardService,
    report_service::{ItemSource, ReportKind, ReportLabels, ReportService},
    window::PeriodWindow,
};

fn date(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).unwrap()
}

fn rent_and_utilities() -> FinanceSnapshot {
    FinanceSnapshot::new()
        .with_categories(vec![
            Category::expense("rent", "Rent"),
            Category::expense("utilities", "Utilities"),
        ])
        .with_payables(vec![
            PayableAccount::new("p-rent", dec!(1000), date(2024, 5, 10)).with_category("rent"),
            PayableAccount::new("p-util", dec!(200), date(2024, 5, 12))
                .with_category("utilities")
                .paid_on(date(2024, 5, 15)),
        ])
        .with_transactions(vec![Transaction::manual(
            "t-util",
            FlowType::Expense,
            dec!(50),
            date(2024, 5, 1),
        )
        .with_category("utilities")])
}

fn build(snapshot: &FinanceSnapshot, kind: ReportKind, window: PeriodWindow) -> crate::Report {
    ReportService::build(snapshot, kind, &window, date(2024, 6, 1), &ReportLabels::default())
}

#[test]
fn paid_expenses_report_merges_settled_and_manual() {
    let report = build(&rent_and_utilities(), ReportKind::PaidExpenses, PeriodWindow::Unbounded);

    assert_eq!(report.title, "Paid Expenses Report");
    assert_eq!(report.data.len(), 1);
    let group = &report.data[0];
    assert_eq!(group.category_name, "Utilities");
    assert_eq!(group.total, dec!(250));
    assert_eq!(group.count, 2);
    assert_eq!(report.grand_total, dec!(250));
    assert_eq!(report.period, "Accumulated total");

    assert_eq!(group.items[0].source, ItemSource::Manual);
    assert_eq!(group.items[1].source, ItemSource::Payable);
    assert_eq!(group.items[1].date, Some(date(2024, 5, 15)));
}

#[test]
fn unpaid_expenses_report_lists_pending_payables() {
    let report = build(&rent_and_utilities(), ReportKind::UnpaidExpenses, PeriodWindow::Unbounded);

    assert_eq!(report.data.len(), 1);
    assert_eq!(report.data[0].category_name, "Rent");
    assert_eq!(report.data[0].total, dec!(1000));
    assert_eq!(report.data[0].count, 1);
    assert_eq!(report.grand_total, dec!(1000));
}

#[test]
fn revenue_reports_ignore_expense_categories() {
    let report = build(&rent_and_utilities(), ReportKind::ReceivedRevenues, PeriodWindow::Unbounded);
    assert!(report.is_empty());
    assert_eq!(report.grand_total, Decimal::ZERO);
}

#[test]
fn overdue_ignores_the_active_window() {
    let snapshot = FinanceSnapshot::new()
        .with_payables(vec![PayableAccount::new("late", dec!(70), date(2024, 5, 1))]);
    let today = date(2024, 6, 1);
    let june = PeriodWindow::between(date(2024, 6, 1), date(2024, 6, 30));

    let filtered = DashboardService::summarize(&snapshot, &june, today);
    let unfiltered = DashboardService::summarize(&snapshot, &PeriodWindow::Unbounded, today);

    assert_eq!(filtered.unpaid_expenses, Decimal::ZERO);
    assert_eq!(filtered.overdue_payables, dec!(70));
    assert_eq!(unfiltered.overdue_payables, dec!(70));
}

#[test]
fn settling_a_payable_moves_its_value_exactly_once() {
    let before = rent_and_utilities();
    let today = date(2024, 5, 20);
    let window = PeriodWindow::CurrentMonth;
    let base = DashboardService::summarize(&before, &window, today);

    let rent = before.payable_accounts[0].clone();
    let settled = crate::SettlementService::settle_payable(
        &rent,
        &before.transactions,
        date(2024, 5, 18),
        Some("bank"),
    )
    .expect("settle rent");
    let mut transactions = before.transactions.to_vec();
    transactions.extend(settled.mirrored);
    let after = before
        .clone()
        .with_payables(vec![settled.record, before.payable_accounts[1].clone()])
        .with_transactions(transactions);

    let moved = DashboardService::summarize(&after, &window, today);
    assert_eq!(
        moved.total_paid_expenses - base.total_paid_expenses,
        dec!(1000)
    );
    assert_eq!(base.unpaid_expenses - moved.unpaid_expenses, dec!(1000));
}

#[test]
fn range_filter_uses_settlement_then_payment_then_due() {
    let snapshot = rent_and_utilities();
    let may_first_half = PeriodWindow::between(date(2024, 5, 1), date(2024, 5, 14));

    let paid = build(&snapshot, ReportKind::PaidExpenses, may_first_half);
    assert_eq!(paid.grand_total, dec!(50));
    assert_eq!(paid.period, "01/05/2024 - 14/05/2024");

    let unpaid = build(&snapshot, ReportKind::UnpaidExpenses, may_first_half);
    assert_eq!(unpaid.grand_total, dec!(1000));
}

#[test]
fn half_open_range_uses_the_accumulated_label() {
    let report = build(
        &rent_and_utilities(),
        ReportKind::PaidExpenses,
        PeriodWindow::range(Some(date(2024, 5, 10)), None),
    );
    assert_eq!(report.grand_total, dec!(200));
    assert_eq!(report.period, "Accumulated total");
}

#[test]
fn current_month_report_filters_and_labels_the_month() {
    let snapshot = rent_and_utilities();
    let report = ReportService::build(
        &snapshot,
        ReportKind::PaidExpenses,
        &PeriodWindow::CurrentMonth,
        date(2024, 5, 20),
        &ReportLabels::default(),
    );
    assert_eq!(report.grand_total, dec!(250));
    assert_eq!(report.period, "01/05/2024 - 31/05/2024");
}

#[test]
fn unknown_and_missing_categories_are_excluded() {
    let day = date(2024, 5, 1);
    let snapshot = FinanceSnapshot::new()
        .with_categories(vec![Category::expense("rent", "Rent")])
        .with_payables(vec![
            PayableAccount::new("a", dec!(10), day).with_category("rent"),
            PayableAccount::new("b", dec!(20), day).with_category("ghost"),
            PayableAccount::new("c", dec!(30), day),
        ]);
    let report = build(&snapshot, ReportKind::UnpaidExpenses, PeriodWindow::Unbounded);
    assert_eq!(report.grand_total, dec!(10));
    assert_eq!(report.item_count(), 1);
}

#[test]
fn duplicate_category_ids_produce_one_group() {
    let day = date(2024, 5, 1);
    let snapshot = FinanceSnapshot::new()
        .with_categories(vec![
            Category::expense("rent", "Rent"),
            Category::expense("rent", "Rent (copy)"),
        ])
        .with_payables(vec![PayableAccount::new("a", dec!(10), day).with_category("rent")]);
    let report = build(&snapshot, ReportKind::UnpaidExpenses, PeriodWindow::Unbounded);
    assert_eq!(report.data.len(), 1);
    assert_eq!(report.grand_total, dec!(10));
}

#[test]
fn undated_items_sort_last_and_only_match_unbounded() {
    let mut undated = PayableAccount::new("undated", dec!(5), date(2024, 1, 1)).with_category("rent");
    undated.due_date = None;
    let snapshot = FinanceSnapshot::new()
        .with_categories(vec![Category::expense("rent", "Rent")])
        .with_payables(vec![
            undated,
            PayableAccount::new("late", dec!(1), date(2024, 3, 1)).with_category("rent"),
            PayableAccount::new("early", dec!(2), date(2024, 2, 1)).with_category("rent"),
        ]);

    let all = build(&snapshot, ReportKind::UnpaidExpenses, PeriodWindow::Unbounded);
    let ids: Vec<&str> = all.data[0].items.iter().map(|i| i.id.as_str()).collect();
    assert_eq!(ids, ["early", "late", "undated"]);

    let bounded = build(
        &snapshot,
        ReportKind::UnpaidExpenses,
        PeriodWindow::range(None, Some(date(2030, 1, 1))),
    );
    assert_eq!(bounded.data[0].count, 2);
}

#[test]
fn counterparty_names_prefer_the_directory() {
    let day = date(2024, 5, 1);
    let mut receivable = ReceivableAccount::new("r", dec!(9), day)
        .with_category("sales")
        .with_client("c1");
    receivable.client_name = Some("Stale Name".into());
    let mut embedded_only = ReceivableAccount::new("r2", dec!(1), day).with_category("sales");
    embedded_only.client_name = Some("Walk-in".into());
    let snapshot = FinanceSnapshot::new()
        .with_categories(vec![Category::revenue("sales", "Sales")])
        .with_clients_suppliers(vec![ClientSupplier::new("c1", "Acme Ltd", CounterpartyRole::Client)])
        .with_receivables(vec![receivable, embedded_only]);

    let report = build(&snapshot, ReportKind::UnreceivedRevenues, PeriodWindow::Unbounded);
    let names: Vec<Option<&str>> = report.data[0]
        .items
        .iter()
        .map(|item| item.counterparty_name.as_deref())
        .collect();
    assert_eq!(names, [Some("Acme Ltd"), Some("Walk-in")]);
}

#[test]
fn building_twice_yields_identical_reports() {
    let snapshot = rent_and_utilities();
    for kind in ReportKind::ALL {
        let first = build(&snapshot, kind, PeriodWindow::Unbounded);
        let second = build(&snapshot, kind, PeriodWindow::Unbounded);
        assert_eq!(first, second);
        let sum = first
            .data
            .iter()
            .fold(Decimal::ZERO, |acc, group| acc + group.total);
        assert_eq!(sum, first.grand_total);
    }
}

#[test]
fn report_totals_saturate_on_overflow() {
    let snapshot = FinanceSnapshot::new()
        .with_categories(vec![
            Category::expense("rent", "Rent"),
            Category::expense("utilities", "Utilities"),
        ])
        .with_payables(vec![
            PayableAccount::new("a", Decimal::MAX, date(2024, 5, 1)).with_category("rent"),
            PayableAccount::new("b", Decimal::MAX, date(2024, 5, 2)).with_category("rent"),
            PayableAccount::new("c", Decimal::MAX, date(2024, 5, 3)).with_category("utilities"),
        ]);
    let report = build(&snapshot, ReportKind::UnpaidExpenses, PeriodWindow::Unbounded);

    assert_eq!(report.data[0].total, Decimal::MAX);
    assert_eq!(report.data[0].count, 2);
    assert_eq!(report.data[1].total, Decimal::MAX);
    assert_eq!(report.grand_total, Decimal::MAX);
}
