//! Period windows: which dates a computation covers and how each record's
//! date is chosen.

use std::{fmt, str::FromStr};

use chrono::{Datelike, NaiveDate};
use fintrack_domain::{Settleable, Transaction};
use serde::{Deserialize, Serialize};

use crate::CoreError;

/// Temporal predicate applied to dashboards and reports.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "kebab-case")]
pub enum PeriodWindow {
    /// Every record matches, dated or not.
    Unbounded,
    /// First to last day of the month containing "today".
    #[default]
    CurrentMonth,
    /// Inclusive range; a missing bound leaves that side open.
    Range {
        from: Option<NaiveDate>,
        to: Option<NaiveDate>,
    },
}

impl PeriodWindow {
    pub fn between(from: NaiveDate, to: NaiveDate) -> Self {
        PeriodWindow::Range {
            from: Some(from),
            to: Some(to),
        }
    }

    pub fn range(from: Option<NaiveDate>, to: Option<NaiveDate>) -> Self {
        PeriodWindow::Range { from, to }
    }

    /// True only for a range carrying at least one bound.
    pub fn has_date_filter(&self) -> bool {
        matches!(self, PeriodWindow::Range { from, to } if from.is_some() || to.is_some())
    }

    /// Resolves the window into concrete bounds for the given day.
    pub fn bounds(&self, today: NaiveDate) -> DateBounds {
        match *self {
            PeriodWindow::Unbounded => DateBounds::default(),
            PeriodWindow::CurrentMonth => {
                let (first, last) = month_bounds(today);
                DateBounds::new(Some(first), Some(last))
            }
            PeriodWindow::Range { from, to } => DateBounds::new(from, to),
        }
    }

    /// Inclusion of an effective date in the window.
    pub fn contains(&self, date: Option<NaiveDate>, today: NaiveDate) -> bool {
        self.bounds(today).contains(date)
    }

    /// How pending records are admitted under this window.
    pub fn pending_policy(&self, today: NaiveDate) -> PendingPolicy {
        match self {
            PeriodWindow::Range { .. } if self.has_date_filter() => {
                PendingPolicy::ByDueDate(self.bounds(today))
            }
            PeriodWindow::Range { .. } | PeriodWindow::Unbounded | PeriodWindow::CurrentMonth => {
                PendingPolicy::IncludeAll
            }
        }
    }
}

impl fmt::Display for PeriodWindow {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PeriodWindow::Unbounded => f.write_str("unbounded"),
            PeriodWindow::CurrentMonth => f.write_str("current-month"),
            PeriodWindow::Range { from, to } => {
                let side = |date: &Option<NaiveDate>| {
                    date.map(|d| d.to_string()).unwrap_or_else(|| "..".into())
                };
                write!(f, "{} to {}", side(from), side(to))
            }
        }
    }
}

impl FromStr for PeriodWindow {
    type Err = CoreError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.trim().to_ascii_lowercase().as_str() {
            "unbounded" | "all" => Ok(PeriodWindow::Unbounded),
            "current-month" | "month" => Ok(PeriodWindow::CurrentMonth),
            other => Err(CoreError::UnknownWindow(other.to_string())),
        }
    }
}

/// Concrete inclusive bounds; `None` on a side means no constraint.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub struct DateBounds {
    pub from: Option<NaiveDate>,
    pub to: Option<NaiveDate>,
}

impl DateBounds {
    pub fn new(from: Option<NaiveDate>, to: Option<NaiveDate>) -> Self {
        Self { from, to }
    }

    pub fn is_unbounded(&self) -> bool {
        self.from.is_none() && self.to.is_none()
    }

    /// Undated records only match when both sides are open.
    pub fn contains(&self, date: Option<NaiveDate>) -> bool {
        if self.is_unbounded() {
            return true;
        }
        let Some(date) = date else {
            return false;
        };
        self.from.map_or(true, |from| from <= date) && self.to.map_or(true, |to| date <= to)
    }
}

/// Admission rule for pending accounts.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PendingPolicy {
    IncludeAll,
    ByDueDate(DateBounds),
}

impl PendingPolicy {
    pub fn admits<T: Settleable>(&self, record: &T) -> bool {
        match self {
            PendingPolicy::IncludeAll => true,
            PendingPolicy::ByDueDate(bounds) => bounds.contains(record.due_date()),
        }
    }
}

/// First and last day of the month containing `day`.
pub fn month_bounds(day: NaiveDate) -> (NaiveDate, NaiveDate) {
    let first = day.with_day(1).unwrap_or(day);
    let (year, month) = if day.month() == 12 {
        (day.year() + 1, 1)
    } else {
        (day.year(), day.month() + 1)
    };
    let last = NaiveDate::from_ymd_opt(year, month, 1)
        .and_then(|next| next.pred_opt())
        .unwrap_or(day);
    (first, last)
}

/// Settled accounts use the settlement date; pending ones the due date.
pub fn effective_date<T: Settleable>(record: &T) -> Option<NaiveDate> {
    if record.is_settled() {
        record.settlement_date()
    } else {
        record.due_date()
    }
}

pub fn transaction_date(transaction: &Transaction) -> Option<NaiveDate> {
    transaction.payment_date
}

/// A pending account is overdue once its due date is strictly before today.
pub fn is_overdue<T: Settleable>(record: &T, today: NaiveDate) -> bool {
    record.is_pending() && record.due_date().map_or(false, |due| due < today)
}
