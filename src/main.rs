use anyhow::{Context, Result};
use sales_dashboard::Dashboard;
use sales_dashboard::config::DashboardConfig;
use sales_dashboard::loader::LoadCache;
use std::env;
use std::io;
use std::path::Path;
use tracing::{error, info, warn};
use tracing_subscriber::EnvFilter;

const DEFAULT_CONFIG_PATH: &str = "src/configs/dashboard.toml";

fn main() -> Result<()> {
    // Initialize logging on stderr so reports on stdout stay clean
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .with_writer(io::stderr)
        .init();

    // Load environment variables
    dotenv::dotenv().ok();

    info!("🚀 Starting Sales Dashboard");

    let config_path = env::var("DASHBOARD_CONFIG").unwrap_or_else(|_| DEFAULT_CONFIG_PATH.to_string());
    let config = if Path::new(&config_path).exists() {
        DashboardConfig::from_file(&config_path)
            .with_context(|| format!("Failed to load dashboard configuration from {}", config_path))?
    } else {
        warn!("Config file not found: {}, using defaults", config_path);
        let mut config = DashboardConfig::default();
        config.apply_env_overrides()?;
        config.validate()?;
        config
    };

    info!(
        "Dataset: {} | default budget {} | default minimum rating {:.1}",
        config.data_path.display(),
        config.default_budget,
        config.default_min_rating
    );

    // The cache lives for the whole session and is handed to the driver
    let cache = LoadCache::new();
    let mut dashboard = Dashboard::new(config, cache);

    let stdin = io::stdin();
    let stdout = io::stdout();
    if let Err(e) = dashboard.run_session(stdin.lock(), stdout.lock()) {
        error!("❌ Dashboard stopped: {:#}", e);
        return Err(e);
    }

    info!("🎉 Dashboard closed");
    Ok(())
}
