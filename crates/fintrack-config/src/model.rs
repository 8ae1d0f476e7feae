use std::fmt;

use fintrack_core::{
    format::is_valid_pattern,
    report_service::{DEFAULT_ACCUMULATED_LABEL, DEFAULT_DATE_FORMAT},
    ExportMode, PeriodWindow, PlainAmountFormatter, ReportLabels,
};
use serde::{de::Deserializer, Deserialize, Serialize};

use crate::ConfigError;

/// User preferences applied to dashboards, reports, and exports.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Config {
    pub locale: String,
    pub currency: String,
    #[serde(default = "Config::default_date_format")]
    pub date_format: String,
    #[serde(default = "Config::default_accumulated_label")]
    pub accumulated_label: String,
    #[serde(default)]
    pub default_window: DefaultWindow,
    #[serde(default)]
    pub export_detailed: bool,
    #[serde(default = "Config::default_ui_color_enabled")]
    pub ui_color_enabled: bool,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            locale: "en-US".into(),
            currency: "USD".into(),
            date_format: Self::default_date_format(),
            accumulated_label: Self::default_accumulated_label(),
            default_window: DefaultWindow::default(),
            export_detailed: false,
            ui_color_enabled: Self::default_ui_color_enabled(),
        }
    }
}

impl Config {
    pub fn default_date_format() -> String {
        DEFAULT_DATE_FORMAT.into()
    }

    pub fn default_accumulated_label() -> String {
        DEFAULT_ACCUMULATED_LABEL.into()
    }

    pub fn default_ui_color_enabled() -> bool {
        true
    }

    /// Labels handed to the report engine.
    pub fn report_labels(&self) -> ReportLabels {
        ReportLabels {
            accumulated_label: self.accumulated_label.clone(),
            date_format: self.date_format.clone(),
        }
    }

    pub fn export_mode(&self) -> ExportMode {
        if self.export_detailed {
            ExportMode::Detailed
        } else {
            ExportMode::Summary
        }
    }

    pub fn amount_formatter(&self) -> PlainAmountFormatter {
        PlainAmountFormatter::with_currency(self.currency.clone())
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if !is_valid_pattern(&self.date_format) {
            return Err(ConfigError::Invalid {
                field: "date_format",
                reason: format!("`{}` is not a valid date pattern", self.date_format),
            });
        }
        if self.currency.trim().is_empty() {
            return Err(ConfigError::Invalid {
                field: "currency",
                reason: "currency code cannot be empty".into(),
            });
        }
        Ok(())
    }
}

/// Window used when the command line does not pass one.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Default)]
#[serde(rename_all = "kebab-case")]
pub enum DefaultWindow {
    #[default]
    CurrentMonth,
    Unbounded,
}

impl DefaultWindow {
    fn from_value(value: Option<String>) -> Self {
        value
            .and_then(|v| v.parse::<PeriodWindow>().ok())
            .map(|window| match window {
                PeriodWindow::Unbounded => DefaultWindow::Unbounded,
                _ => DefaultWindow::CurrentMonth,
            })
            .unwrap_or_default()
    }

    pub fn to_window(self) -> PeriodWindow {
        match self {
            DefaultWindow::CurrentMonth => PeriodWindow::CurrentMonth,
            DefaultWindow::Unbounded => PeriodWindow::Unbounded,
        }
    }
}

impl fmt::Display for DefaultWindow {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            DefaultWindow::CurrentMonth => "current-month",
            DefaultWindow::Unbounded => "unbounded",
        };
        f.write_str(label)
    }
}

impl<'de> Deserialize<'de> for DefaultWindow {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let value = Option::<String>::deserialize(deserializer)?;
        Ok(DefaultWindow::from_value(value))
    }
}
