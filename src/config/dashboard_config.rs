use crate::models::{DEFAULT_MAX_BUDGET, DEFAULT_MIN_RATING, MIN_RATING_CEILING, MIN_RATING_FLOOR, UserInputs};
use crate::pipeline::{DEFAULT_PREVIEW_ROWS, PipelineOptions};
use crate::processor::{MAX_RECOMMENDATIONS, TOP_SUB_CATEGORIES};
use crate::report::ReportFormat;
use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::env;
use std::path::PathBuf;
use tracing::info;

pub const DEFAULT_DATA_PATH: &str = "sample_data/sales_data.csv";
pub const ENV_DATA_PATH: &str = "DASHBOARD_DATA_PATH";
pub const ENV_REPORT_FORMAT: &str = "DASHBOARD_REPORT_FORMAT";

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DashboardConfigFile {
    pub data: DataSection,
    #[serde(default)]
    pub recommender: Option<RecommenderSection>,
    #[serde(default)]
    pub report: Option<ReportSection>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DataSection {
    pub path: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RecommenderSection {
    pub default_budget: Option<i64>,
    pub default_min_rating: Option<f64>,
    pub max_results: Option<usize>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReportSection {
    pub format: Option<ReportFormat>,
    pub preview_rows: Option<usize>,
    pub top_sub_categories: Option<usize>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct DashboardConfig {
    pub data_path: PathBuf,
    pub default_budget: i64,
    pub default_min_rating: f64,
    pub max_results: usize,
    pub report_format: ReportFormat,
    pub preview_rows: usize,
    pub top_sub_categories: usize,
}

impl DashboardConfig {
    pub fn from_file(path: &str) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read dashboard config file: {}", path))?;

        let mut config = Self::from_toml(&content)
            .with_context(|| format!("Failed to parse dashboard config file: {}", path))?;

        config.apply_env_overrides()?;
        config.validate()?;

        info!("Loaded dashboard configuration from {}", path);
        Ok(config)
    }

    pub fn from_toml(content: &str) -> Result<Self> {
        let file: DashboardConfigFile = toml::from_str(content)?;
        Ok(Self::from_sections(file))
    }

    fn from_sections(file: DashboardConfigFile) -> Self {
        let defaults = Self::default();
        let recommender = file.recommender;
        let report = file.report;

        Self {
            data_path: PathBuf::from(file.data.path),
            default_budget: recommender
                .as_ref()
                .and_then(|r| r.default_budget)
                .unwrap_or(defaults.default_budget),
            default_min_rating: recommender
                .as_ref()
                .and_then(|r| r.default_min_rating)
                .unwrap_or(defaults.default_min_rating),
            max_results: recommender
                .as_ref()
                .and_then(|r| r.max_results)
                .unwrap_or(defaults.max_results),
            report_format: report
                .as_ref()
                .and_then(|r| r.format)
                .unwrap_or(defaults.report_format),
            preview_rows: report
                .as_ref()
                .and_then(|r| r.preview_rows)
                .unwrap_or(defaults.preview_rows),
            top_sub_categories: report
                .as_ref()
                .and_then(|r| r.top_sub_categories)
                .unwrap_or(defaults.top_sub_categories),
        }
    }

    /// Environment wins over the file for the data path and report format.
    pub fn apply_env_overrides(&mut self) -> Result<()> {
        if let Ok(path) = env::var(ENV_DATA_PATH) {
            info!("Using data path from {}: {}", ENV_DATA_PATH, path);
            self.data_path = PathBuf::from(path);
        }

        if let Ok(format) = env::var(ENV_REPORT_FORMAT) {
            self.report_format = format
                .parse()
                .with_context(|| format!("Invalid value in {}", ENV_REPORT_FORMAT))?;
        }

        Ok(())
    }

    pub fn validate(&self) -> Result<()> {
        if self.data_path.as_os_str().is_empty() {
            return Err(anyhow::anyhow!("Data path cannot be empty"));
        }

        if self.default_budget < 0 {
            return Err(anyhow::anyhow!("Default budget cannot be negative"));
        }

        if !(MIN_RATING_FLOOR..=MIN_RATING_CEILING).contains(&self.default_min_rating) {
            return Err(anyhow::anyhow!(
                "Default minimum rating must be between {} and {}",
                MIN_RATING_FLOOR,
                MIN_RATING_CEILING
            ));
        }

        if self.max_results == 0 {
            return Err(anyhow::anyhow!("max_results must be at least 1"));
        }

        Ok(())
    }

    pub fn initial_inputs(&self) -> UserInputs {
        UserInputs::new(self.default_budget, self.default_min_rating)
    }

    pub fn pipeline_options(&self) -> PipelineOptions {
        PipelineOptions {
            preview_rows: self.preview_rows,
            top_sub_categories: self.top_sub_categories,
            max_recommendations: self.max_results,
        }
    }
}

impl Default for DashboardConfig {
    fn default() -> Self {
        Self {
            data_path: PathBuf::from(DEFAULT_DATA_PATH),
            default_budget: DEFAULT_MAX_BUDGET,
            default_min_rating: DEFAULT_MIN_RATING,
            max_results: MAX_RECOMMENDATIONS,
            report_format: ReportFormat::Markdown,
            preview_rows: DEFAULT_PREVIEW_ROWS,
            top_sub_categories: TOP_SUB_CATEGORIES,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    #[test]
    fn test_default_config() {
        let config = DashboardConfig::default();
        assert_eq!(config.data_path, PathBuf::from("sample_data/sales_data.csv"));
        assert_eq!(config.initial_inputs(), UserInputs::new(50_000, 4.0));
        assert_eq!(config.pipeline_options(), PipelineOptions::default());
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_partial_file_uses_defaults() {
        let config = DashboardConfig::from_toml(
            r#"
            [data]
            path = "data/acs.csv"

            [report]
            format = "json"
            "#,
        )
        .unwrap();

        assert_eq!(config.data_path, PathBuf::from("data/acs.csv"));
        assert_eq!(config.report_format, ReportFormat::Json);
        assert_eq!(config.default_budget, 50_000);
        assert_eq!(config.max_results, 10);
    }

    #[test]
    fn test_validation() {
        let mut config = DashboardConfig::default();
        config.default_min_rating = 6.0;
        assert!(config.validate().is_err());

        config.default_min_rating = 4.0;
        config.max_results = 0;
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_from_file_with_env_override() {
        let mut file = NamedTempFile::new().unwrap();
        writeln!(file, "[data]\npath = \"from_file.csv\"\n\n[recommender]\ndefault_budget = 70000").unwrap();

        unsafe {
            env::set_var(ENV_DATA_PATH, "from_env.csv");
        }

        let config = DashboardConfig::from_file(file.path().to_str().unwrap()).unwrap();
        assert_eq!(config.data_path, PathBuf::from("from_env.csv"));
        assert_eq!(config.default_budget, 70_000);

        // Clean up
        unsafe {
            env::remove_var(ENV_DATA_PATH);
        }
    }
}
