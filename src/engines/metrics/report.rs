use super::stats::{Stats, StatsSummary};
use crate::config::{ReportConfig, ReportFormat};
use crate::error::Result;
use chrono::{DateTime, Utc};
use serde::Serialize;
use std::fs::OpenOptions;
use std::io::Write;
use std::path::{Path, PathBuf};

#[derive(Serialize)]
struct ReportLine<'a> {
    timestamp: DateTime<Utc>,
    #[serde(flatten)]
    summary: &'a StatsSummary,
}

/// Appends one line per search to a report file
#[derive(Debug, Clone)]
pub struct ReportWriter {
    path: PathBuf,
    format: ReportFormat,
}

impl ReportWriter {
    pub fn new<P: Into<PathBuf>>(path: P, format: ReportFormat) -> Self {
        Self {
            path: path.into(),
            format,
        }
    }

    /// `None` when no report path is configured
    pub fn from_config(config: &ReportConfig) -> Option<Self> {
        config
            .report_path
            .as_ref()
            .map(|path| Self::new(path.clone(), config.report_format))
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn write(&self, stats: &Stats) -> Result<()> {
        self.write_at(stats, Utc::now())
    }

    pub fn write_at(&self, stats: &Stats, timestamp: DateTime<Utc>) -> Result<()> {
        let summary = stats.summary();
        let mut file = OpenOptions::new().create(true).append(true).open(&self.path)?;

        match self.format {
            ReportFormat::Json => {
                let line = serde_json::to_string(&ReportLine {
                    timestamp,
                    summary: &summary,
                })?;
                writeln!(file, "{}", line)?;
            }
            ReportFormat::Csv => Self::write_tsv(file, &Self::tsv_record(&summary, timestamp)?)?,
        }

        log::info!("Report written to {}", self.path.display());
        Ok(())
    }

    fn tsv_record(summary: &StatsSummary, timestamp: DateTime<Utc>) -> Result<Vec<String>> {
        let (pattern, fitness) = match &summary.best_individual {
            Some(best) => (serde_json::to_string(best.phenotype())?, best.fitness().to_string()),
            None => (String::new(), String::new()),
        };

        Ok(vec![
            timestamp.to_rfc3339(),
            summary.success_rate.to_string(),
            summary.mean_best_fitness.to_string(),
            summary.average_evaluations_to_solution.to_string(),
            summary.mean_time.to_string(),
            pattern,
            fitness,
        ])
    }

    fn write_tsv<W: Write>(writer: W, record: &[String]) -> Result<()> {
        let mut wtr = csv::WriterBuilder::new()
            .delimiter(b'\t')
            .has_headers(false)
            .from_writer(writer);
        wtr.write_record(record)?;
        wtr.flush()?;
        Ok(())
    }
}
