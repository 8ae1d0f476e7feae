//! Command line front end over the snapshot store and the engine.

pub mod commands;
pub mod table;

use std::{io::Write, path::PathBuf};

use chrono::NaiveDate;
use clap::{Args, Parser, Subcommand, ValueEnum};
use fintrack_config::{Config, ConfigManager};
use fintrack_core::{Clock, FixedClock, PeriodWindow, SystemClock};

use crate::errors::AppError;

#[derive(Parser, Debug)]
#[command(name = "fintrack")]
#[command(version)]
#[command(about = "Dashboards and category reports over payables, receivables, and transactions", long_about = None)]
pub struct Cli {
    /// Directory holding config.json (defaults to FINTRACK_HOME or the platform config dir)
    #[arg(long, global = true)]
    pub config_dir: Option<PathBuf>,

    /// Disable coloured output
    #[arg(long, global = true)]
    pub no_color: bool,

    /// Evaluate as if today were this date (YYYY-MM-DD)
    #[arg(long, global = true)]
    pub today: Option<NaiveDate>,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Show dashboard KPIs for a window
    Dashboard {
        snapshot: PathBuf,
        #[command(flatten)]
        window: WindowArgs,
        #[arg(long, value_enum, default_value_t = SummaryFormat::Table)]
        format: SummaryFormat,
    },
    /// Build a category-grouped report
    Report {
        /// unpaid-expenses | paid-expenses | unreceived-revenues | received-revenues
        kind: String,
        snapshot: PathBuf,
        #[command(flatten)]
        window: WindowArgs,
        #[arg(long, value_enum, default_value_t = ReportFormat::Table)]
        format: ReportFormat,
        /// List every item under its category
        #[arg(long)]
        detailed: bool,
    },
    /// Settled totals per category, largest first
    Chart {
        flow: FlowArg,
        snapshot: PathBuf,
        #[command(flatten)]
        window: WindowArgs,
    },
    /// Mark an account paid or received and record its transaction
    Settle {
        target: AccountArg,
        snapshot: PathBuf,
        id: String,
        /// Settlement account (required unless already on the record)
        #[arg(long)]
        account: Option<String>,
        /// Settlement date (defaults to today)
        #[arg(long)]
        on: Option<NaiveDate>,
    },
    /// Undo a settlement and drop its transaction
    Reopen {
        target: AccountArg,
        snapshot: PathBuf,
        id: String,
    },
    /// Print build metadata
    Version,
}

#[derive(Args, Debug, Default, Clone)]
pub struct WindowArgs {
    /// Inclusive lower bound (YYYY-MM-DD)
    #[arg(long, conflicts_with = "all")]
    pub from: Option<NaiveDate>,
    /// Inclusive upper bound (YYYY-MM-DD)
    #[arg(long, conflicts_with = "all")]
    pub to: Option<NaiveDate>,
    /// Ignore dates entirely
    #[arg(long)]
    pub all: bool,
    /// Restrict to the current month
    #[arg(long, conflicts_with_all = ["all", "from", "to"])]
    pub month: bool,
}

impl WindowArgs {
    /// Explicit flags win; otherwise `fallback` applies.
    pub fn resolve(&self, fallback: PeriodWindow) -> PeriodWindow {
        if self.from.is_some() || self.to.is_some() {
            PeriodWindow::range(self.from, self.to)
        } else if self.all {
            PeriodWindow::Unbounded
        } else if self.month {
            PeriodWindow::CurrentMonth
        } else {
            fallback
        }
    }
}

#[derive(ValueEnum, Debug, Clone, Copy, PartialEq, Eq)]
pub enum SummaryFormat {
    Table,
    Json,
}

#[derive(ValueEnum, Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReportFormat {
    Table,
    Json,
    Rows,
}

#[derive(ValueEnum, Debug, Clone, Copy, PartialEq, Eq)]
pub enum FlowArg {
    Expense,
    Revenue,
}

#[derive(ValueEnum, Debug, Clone, Copy, PartialEq, Eq)]
pub enum AccountArg {
    Payable,
    Receivable,
}

/// Settings shared by every command.
pub struct Context {
    pub config: Config,
    pub clock: FixedClock,
}

impl Context {
    pub fn today(&self) -> NaiveDate {
        self.clock.today()
    }
}

pub fn run_cli(cli: Cli, out: &mut dyn Write) -> Result<(), AppError> {
    let manager = match &cli.config_dir {
        Some(dir) => ConfigManager::with_base_dir(dir.clone())?,
        None => ConfigManager::from_env()?,
    };
    let config = manager.load()?;
    if cli.no_color || !config.ui_color_enabled {
        colored::control::set_override(false);
    }
    let clock = match cli.today {
        Some(day) => FixedClock::on(day),
        None => FixedClock(SystemClock.now()),
    };
    tracing::debug!(config = %manager.config_path().display(), today = %clock.today(), "cli context ready");
    let ctx = Context { config, clock };

    match cli.command {
        Command::Dashboard {
            snapshot,
            window,
            format,
        } => commands::dashboard(&ctx, &snapshot, &window, format, out),
        Command::Report {
            kind,
            snapshot,
            window,
            format,
            detailed,
        } => commands::report(&ctx, &kind, &snapshot, &window, format, detailed, out),
        Command::Chart {
            flow,
            snapshot,
            window,
        } => commands::chart(&ctx, flow, &snapshot, &window, out),
        Command::Settle {
            target,
            snapshot,
            id,
            account,
            on,
        } => commands::settle(&ctx, target, &snapshot, &id, account.as_deref(), on, out),
        Command::Reopen {
            target,
            snapshot,
            id,
        } => commands::reopen(target, &snapshot, &id, out),
        Command::Version => commands::version(out),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn explicit_bounds_win_over_the_fallback() {
        let day = NaiveDate::from_ymd_opt(2024, 5, 1).unwrap();
        let args = WindowArgs {
            from: Some(day),
            ..WindowArgs::default()
        };
        assert_eq!(
            args.resolve(PeriodWindow::CurrentMonth),
            PeriodWindow::range(Some(day), None)
        );
        assert_eq!(
            WindowArgs::default().resolve(PeriodWindow::Unbounded),
            PeriodWindow::Unbounded
        );
        let all = WindowArgs {
            all: true,
            ..WindowArgs::default()
        };
        assert_eq!(all.resolve(PeriodWindow::CurrentMonth), PeriodWindow::Unbounded);
    }

    #[test]
    fn parses_report_arguments() {
        let cli = Cli::try_parse_from([
            "fintrack",
            "--today",
            "2024-06-01",
            "report",
            "paid-expenses",
            "snapshot.json",
            "--from",
            "2024-05-01",
            "--format",
            "rows",
            "--detailed",
        ])
        .expect("parse");
        assert_eq!(cli.today, NaiveDate::from_ymd_opt(2024, 6, 1));
        match cli.command {
            Command::Report {
                kind,
                format,
                detailed,
                ..
            } => {
                assert_eq!(kind, "paid-expenses");
                assert_eq!(format, ReportFormat::Rows);
                assert!(detailed);
            }
            other => panic!("unexpected command {other:?}"),
        }
    }

    #[test]
    fn all_conflicts_with_bounds() {
        let parsed = Cli::try_parse_from([
            "fintrack",
            "dashboard",
            "snapshot.json",
            "--all",
            "--to",
            "2024-05-01",
        ]);
        assert!(parsed.is_err());
    }
}
