//! Memoizing front door over the dashboard and report services.

use std::sync::Arc;

use fintrack_domain::FinanceSnapshot;

use crate::{
    dashboard_service::{DashboardService, DashboardSummary},
    report_service::{Report, ReportKind, ReportLabels, ReportService},
    time::{Clock, SystemClock},
    window::PeriodWindow,
};

struct Cached<K, V> {
    inputs: FinanceSnapshot,
    key: K,
    value: V,
}

impl<K: PartialEq, V> Cached<K, V> {
    fn is_fresh(&self, snapshot: &FinanceSnapshot, key: &K) -> bool {
        self.key == *key && same_inputs(&self.inputs, snapshot)
    }
}

/// Collections are compared by `Arc` identity, never by content.
fn same_inputs(a: &FinanceSnapshot, b: &FinanceSnapshot) -> bool {
    Arc::ptr_eq(&a.payable_accounts, &b.payable_accounts)
        && Arc::ptr_eq(&a.receivable_accounts, &b.receivable_accounts)
        && Arc::ptr_eq(&a.transactions, &b.transactions)
        && Arc::ptr_eq(&a.categories, &b.categories)
        && Arc::ptr_eq(&a.clients_suppliers, &b.clients_suppliers)
}

/// Keeps the latest dashboard and report results and recomputes them in
/// full whenever an input collection or a parameter changes.
pub struct FinanceEngine<C: Clock = SystemClock> {
    clock: C,
    labels: ReportLabels,
    dashboard: Option<Cached<(PeriodWindow, chrono::NaiveDate), DashboardSummary>>,
    report: Option<Cached<(ReportKind, PeriodWindow, chrono::NaiveDate), Report>>,
    computations: usize,
}

impl Default for FinanceEngine<SystemClock> {
    fn default() -> Self {
        Self::new(SystemClock)
    }
}

impl<C: Clock> FinanceEngine<C> {
    pub fn new(clock: C) -> Self {
        Self {
            clock,
            labels: ReportLabels::default(),
            dashboard: None,
            report: None,
            computations: 0,
        }
    }

    pub fn with_labels(mut self, labels: ReportLabels) -> Self {
        self.set_labels(labels);
        self
    }

    pub fn set_labels(&mut self, labels: ReportLabels) {
        if self.labels != labels {
            self.labels = labels;
            self.report = None;
        }
    }

    pub fn labels(&self) -> &ReportLabels {
        &self.labels
    }

    pub fn clock(&self) -> &C {
        &self.clock
    }

    /// Number of full recomputations performed so far.
    pub fn computations(&self) -> usize {
        self.computations
    }

    pub fn dashboard(
        &mut self,
        snapshot: &FinanceSnapshot,
        window: &PeriodWindow,
    ) -> &DashboardSummary {
        let today = self.clock.today();
        let key = (*window, today);
        let cached = match self.dashboard.take() {
            Some(cached) if cached.is_fresh(snapshot, &key) => cached,
            _ => {
                self.computations += 1;
                Cached {
                    inputs: snapshot.clone(),
                    key,
                    value: DashboardService::summarize(snapshot, window, today),
                }
            }
        };
        &self.dashboard.insert(cached).value
    }

    pub fn report(
        &mut self,
        snapshot: &FinanceSnapshot,
        kind: ReportKind,
        window: &PeriodWindow,
    ) -> &Report {
        let today = self.clock.today();
        let key = (kind, *window, today);
        let cached = match self.report.take() {
            Some(cached) if cached.is_fresh(snapshot, &key) => cached,
            _ => {
                self.computations += 1;
                Cached {
                    inputs: snapshot.clone(),
                    key,
                    value: ReportService::build(snapshot, kind, window, today, &self.labels),
                }
            }
        };
        &self.report.insert(cached).value
    }
}
