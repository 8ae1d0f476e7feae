//! Dashboard KPIs for a period window.

use chrono::NaiveDate;
use fintrack_domain::{Amounted, FinanceSnapshot, FlowType, Settleable, Transaction};
use rust_decimal::Decimal;
use serde::Serialize;

use crate::{
    format::AmountFormatter,
    money,
    window::{effective_date, is_overdue, transaction_date, DateBounds, PeriodWindow},
};

/// Scalar KPIs shown on the dashboard.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
pub struct DashboardSummary {
    pub paid_expenses: Decimal,
    pub received_revenues: Decimal,
    pub manual_expenses: Decimal,
    pub manual_revenues: Decimal,
    pub total_paid_expenses: Decimal,
    pub total_received_revenues: Decimal,
    pub unpaid_expenses: Decimal,
    pub unreceived_revenues: Decimal,
    pub balance_paid: Decimal,
    pub balance_unpaid: Decimal,
    pub overdue_payables: Decimal,
    pub overdue_receivables: Decimal,
}

impl DashboardSummary {
    /// Label/value pairs in display order, formatted by the caller's formatter.
    pub fn lines(&self, formatter: &dyn AmountFormatter) -> Vec<(&'static str, String)> {
        [
            ("Paid expenses", self.paid_expenses),
            ("Manual expenses", self.manual_expenses),
            ("Total paid expenses", self.total_paid_expenses),
            ("Received revenues", self.received_revenues),
            ("Manual revenues", self.manual_revenues),
            ("Total received revenues", self.total_received_revenues),
            ("Balance (settled)", self.balance_paid),
            ("Unpaid expenses", self.unpaid_expenses),
            ("Unreceived revenues", self.unreceived_revenues),
            ("Balance (pending)", self.balance_unpaid),
            ("Overdue payables", self.overdue_payables),
            ("Overdue receivables", self.overdue_receivables),
        ]
        .into_iter()
        .map(|(label, amount)| (label, formatter.format_amount(amount)))
        .collect()
    }
}

pub struct DashboardService;

impl DashboardService {
    /// Computes every KPI from scratch for `window`, evaluated on `today`.
    pub fn summarize(
        snapshot: &FinanceSnapshot,
        window: &PeriodWindow,
        today: NaiveDate,
    ) -> DashboardSummary {
        let bounds = window.bounds(today);
        let pending = window.pending_policy(today);

        let paid_expenses = sum(snapshot
            .payable_accounts
            .iter()
            .filter(|p| settled_in(*p, &bounds))
            .map(Amounted::amount));
        let received_revenues = sum(snapshot
            .receivable_accounts
            .iter()
            .filter(|r| settled_in(*r, &bounds))
            .map(Amounted::amount));

        let manual = |kind: FlowType| {
            sum(snapshot
                .transactions
                .iter()
                .filter(|t| t.is_manual() && t.kind == kind)
                .filter(|t| bounds.contains(transaction_date(t)))
                .map(Transaction::amount))
        };
        let manual_expenses = manual(FlowType::Expense);
        let manual_revenues = manual(FlowType::Revenue);

        let unpaid_expenses = sum(snapshot
            .payable_accounts
            .iter()
            .filter(|p| p.is_pending() && pending.admits(*p))
            .map(Amounted::amount));
        let unreceived_revenues = sum(snapshot
            .receivable_accounts
            .iter()
            .filter(|r| r.is_pending() && pending.admits(*r))
            .map(Amounted::amount));

        let overdue_payables = sum(snapshot
            .payable_accounts
            .iter()
            .filter(|p| is_overdue(*p, today))
            .map(Amounted::amount));
        let overdue_receivables = sum(snapshot
            .receivable_accounts
            .iter()
            .filter(|r| is_overdue(*r, today))
            .map(Amounted::amount));

        let total_paid_expenses = money::add(paid_expenses, manual_expenses);
        let total_received_revenues = money::add(received_revenues, manual_revenues);
        let summary = DashboardSummary {
            paid_expenses,
            received_revenues,
            manual_expenses,
            manual_revenues,
            total_paid_expenses,
            total_received_revenues,
            unpaid_expenses,
            unreceived_revenues,
            balance_paid: money::difference(total_received_revenues, total_paid_expenses),
            balance_unpaid: money::difference(unreceived_revenues, unpaid_expenses),
            overdue_payables,
            overdue_receivables,
        };
        tracing::debug!(
            window = %window,
            %today,
            balance_paid = %summary.balance_paid,
            balance_unpaid = %summary.balance_unpaid,
            "dashboard summary computed"
        );
        summary
    }
}

fn settled_in<T: Settleable>(record: &T, bounds: &DateBounds) -> bool {
    record.is_settled() && bounds.contains(effective_date(record))
}

fn sum(amounts: impl Iterator<Item = Decimal>) -> Decimal {
    money::total(amounts)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::format::PlainAmountFormatter;
    use fintrack_domain::{PayableAccount, ReceivableAccount};
    use rust_decimal_macros::dec;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn snapshot() -> FinanceSnapshot {
        FinanceSnapshot::new()
            .with_payables(vec![
                PayableAccount::new("p1", dec!(100), date(2024, 5, 5)).paid_on(date(2024, 5, 6)),
                PayableAccount::new("p2", dec!(40), date(2024, 4, 20)),
                PayableAccount::new("p3", dec!(60), date(2025, 1, 10)),
            ])
            .with_receivables(vec![
                ReceivableAccount::new("r1", dec!(500), date(2024, 5, 1))
                    .received_on(date(2024, 5, 2)),
                ReceivableAccount::new("r2", dec!(80), date(2024, 5, 30)),
            ])
            .with_transactions(vec![
                Transaction::manual("t1", FlowType::Expense, dec!(15), date(2024, 5, 9)),
                Transaction::manual("t2", FlowType::Revenue, dec!(25), date(2024, 4, 9)),
            ])
    }

    #[test]
    fn current_month_totals() {
        let summary =
            DashboardService::summarize(&snapshot(), &PeriodWindow::CurrentMonth, date(2024, 5, 20));

        assert_eq!(summary.paid_expenses, dec!(100));
        assert_eq!(summary.manual_expenses, dec!(15));
        assert_eq!(summary.total_paid_expenses, dec!(115));
        assert_eq!(summary.received_revenues, dec!(500));
        assert_eq!(summary.manual_revenues, Decimal::ZERO);
        assert_eq!(summary.balance_paid, dec!(385));
        assert_eq!(summary.unpaid_expenses, dec!(100));
        assert_eq!(summary.unreceived_revenues, dec!(80));
        assert_eq!(summary.balance_unpaid, dec!(-20));
        assert_eq!(summary.overdue_payables, dec!(40));
        assert_eq!(summary.overdue_receivables, Decimal::ZERO);
    }

    #[test]
    fn explicit_range_windows_pending_by_due_date() {
        let window = PeriodWindow::between(date(2024, 5, 1), date(2024, 5, 31));
        let summary = DashboardService::summarize(&snapshot(), &window, date(2024, 5, 20));

        assert_eq!(summary.unpaid_expenses, Decimal::ZERO);
        assert_eq!(summary.unreceived_revenues, dec!(80));
        assert_eq!(summary.overdue_payables, dec!(40));
    }

    #[test]
    fn unbounded_counts_everything() {
        let summary =
            DashboardService::summarize(&snapshot(), &PeriodWindow::Unbounded, date(2024, 5, 20));
        assert_eq!(summary.total_received_revenues, dec!(525));
        assert_eq!(summary.unpaid_expenses, dec!(100));
    }

    #[test]
    fn overflowing_totals_saturate() {
        let huge = FinanceSnapshot::new().with_payables(vec![
            PayableAccount::new("a", Decimal::MAX, date(2024, 5, 1)).paid_on(date(2024, 5, 1)),
            PayableAccount::new("b", Decimal::MAX, date(2024, 5, 1)).paid_on(date(2024, 5, 2)),
            PayableAccount::new("c", Decimal::MAX, date(2024, 4, 1)),
            PayableAccount::new("d", Decimal::MAX, date(2024, 4, 2)),
        ]);
        let summary = DashboardService::summarize(&huge, &PeriodWindow::Unbounded, date(2024, 5, 20));

        assert_eq!(summary.paid_expenses, Decimal::MAX);
        assert_eq!(summary.total_paid_expenses, Decimal::MAX);
        assert_eq!(summary.unpaid_expenses, Decimal::MAX);
        assert_eq!(summary.overdue_payables, Decimal::MAX);
        assert_eq!(summary.balance_paid, -Decimal::MAX);
    }

    #[test]
    fn lines_use_the_injected_formatter() {
        let summary =
            DashboardService::summarize(&snapshot(), &PeriodWindow::Unbounded, date(2024, 5, 20));
        let lines = summary.lines(&PlainAmountFormatter::default());
        assert_eq!(lines.len(), 12);
        assert_eq!(lines[2], ("Total paid expenses", "115.00".to_string()));
    }
}
