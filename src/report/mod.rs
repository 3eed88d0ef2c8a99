pub mod markdown;

pub use markdown::{NO_RESULTS_NOTICE, render_markdown};

use crate::pipeline::DashboardOutputs;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::str::FromStr;

/// How the driver renders each pipeline run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ReportFormat {
    #[default]
    Markdown,
    Json,
}

impl FromStr for ReportFormat {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "markdown" | "md" => Ok(ReportFormat::Markdown),
            "json" => Ok(ReportFormat::Json),
            other => Err(anyhow::anyhow!("Unknown report format: {}", other)),
        }
    }
}

/// Pipeline outputs plus the context they were produced in.
#[derive(Debug, Clone, Serialize)]
pub struct Report {
    pub source: String,
    pub generated_at: DateTime<Utc>,
    pub outputs: DashboardOutputs,
}

impl Report {
    pub fn new(source: impl Into<String>, outputs: DashboardOutputs) -> Self {
        Self {
            source: source.into(),
            generated_at: Utc::now(),
            outputs,
        }
    }

    pub fn render(&self, format: ReportFormat) -> anyhow::Result<String> {
        match format {
            ReportFormat::Markdown => Ok(render_markdown(self)?),
            ReportFormat::Json => Ok(serde_json::to_string_pretty(self)?),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_report_format_parsing() {
        assert_eq!("Markdown".parse::<ReportFormat>().unwrap(), ReportFormat::Markdown);
        assert_eq!(" json ".parse::<ReportFormat>().unwrap(), ReportFormat::Json);
        assert!("xml".parse::<ReportFormat>().is_err());
    }
}
