use super::traits::{read_field, read_selector, ConfigSection};
use crate::error::PatternError;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use std::str::FromStr;

/// Report persistence settings (`[io]` section)
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ReportConfig {
    pub report_path: Option<PathBuf>,
    pub report_format: ReportFormat,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ReportFormat {
    #[default]
    Json,
    Csv,
}

impl FromStr for ReportFormat {
    type Err = PatternError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_uppercase().as_str() {
            "JSON" => Ok(ReportFormat::Json),
            "CSV" => Ok(ReportFormat::Csv),
            other => Err(PatternError::Configuration(format!(
                "Unknown report format: {}",
                other
            ))),
        }
    }
}

impl ConfigSection for ReportConfig {
    fn section_name() -> &'static str {
        "io"
    }

    fn validate(&self) -> Result<(), PatternError> {
        if let Some(path) = &self.report_path {
            if path.as_os_str().is_empty() {
                return Err(PatternError::Configuration(
                    "Report path cannot be empty".to_string(),
                ));
            }
        }
        Ok(())
    }

    fn from_settings(settings: &config::Config) -> Result<Self, PatternError> {
        let s = Self::section_name();
        let d = Self::default();

        Ok(Self {
            report_path: read_field(settings, s, "report_path", d.report_path),
            report_format: read_selector(settings, s, "report_format", d.report_format)?,
        })
    }
}
