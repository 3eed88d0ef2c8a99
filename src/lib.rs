//! Sales dashboard: loads a product listing CSV, cleans prices and ratings,
//! aggregates by category, sub-category and price segment, and recommends
//! products for a budget and rating floor.

pub mod config;
pub mod driver;
pub mod error;
pub mod loader;
pub mod models;
pub mod pipeline;
pub mod processor;
pub mod report;

pub use driver::Dashboard;
pub use error::{DashboardError, Result};
pub use pipeline::{DashboardOutputs, PipelineOptions};
