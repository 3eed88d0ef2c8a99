//! The whole dashboard computation as one pure function.
//!
//! `run` takes the raw dataset and the current user inputs and produces every
//! structure the presentation layer renders. It never mutates the raw frame
//! and holds no state between calls, so the driver can re-invoke it on every
//! input change.

use crate::error::Result;
use crate::models::{AggregateRecord, BudgetBounds, Recommendations, UserInputs};
use crate::processor::frame::{self, ACTUAL_PRICE, DISCOUNT_PRICE, RATINGS, column_mean, string_values};
use crate::processor::{
    CleanedDataset, ColumnNullCount, DataCleaner, InsightSummary, MAX_RECOMMENDATIONS,
    TOP_SUB_CATEGORIES, add_derived_columns, aggregator, recommend, summarize,
};
use polars::prelude::*;
use serde::{Deserialize, Serialize};
use tracing::info;

pub const DEFAULT_PREVIEW_ROWS: usize = 5;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PipelineOptions {
    pub preview_rows: usize,
    pub top_sub_categories: usize,
    pub max_recommendations: usize,
}

impl Default for PipelineOptions {
    fn default() -> Self {
        Self {
            preview_rows: DEFAULT_PREVIEW_ROWS,
            top_sub_categories: TOP_SUB_CATEGORIES,
            max_recommendations: MAX_RECOMMENDATIONS,
        }
    }
}

/// First rows of a frame rendered as text, nulls as `None`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TablePreview {
    pub columns: Vec<String>,
    pub rows: Vec<Vec<Option<String>>>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DatasetOverview {
    pub preview: TablePreview,
    pub row_count: usize,
    pub column_count: usize,
    pub column_names: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CleaningSummary {
    pub duplicates_removed: usize,
    pub null_counts: Vec<ColumnNullCount>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct KpiMetrics {
    pub avg_actual_price: Option<f64>,
    pub avg_discount_price: Option<f64>,
    pub avg_rating: Option<f64>,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct DiscountRatingPoint {
    pub discount_percent: f64,
    pub ratings: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DashboardOutputs {
    pub overview: DatasetOverview,
    pub cleaning: CleaningSummary,
    pub kpis: KpiMetrics,
    pub category_stats: Vec<AggregateRecord>,
    pub sub_category_stats: Vec<AggregateRecord>,
    pub segment_stats: Vec<AggregateRecord>,
    pub discount_vs_rating: Vec<DiscountRatingPoint>,
    pub insights: InsightSummary,
    pub budget_bounds: Option<BudgetBounds>,
    /// Inputs after clamping to the allowed ranges.
    pub inputs: UserInputs,
    pub recommendations: Recommendations,
}

pub fn run(raw: &DataFrame, inputs: &UserInputs, options: &PipelineOptions) -> Result<DashboardOutputs> {
    let overview = overview(raw, options.preview_rows)?;

    let cleaner = DataCleaner::new()?;
    let CleanedDataset {
        mut df,
        duplicates_removed,
        null_counts,
    } = cleaner.clean(raw)?;
    add_derived_columns(&mut df)?;

    let products = frame::products_from_frame(&df)?;
    info!("Pipeline working on {} cleaned products", products.len());

    let kpis = KpiMetrics {
        avg_actual_price: column_mean(&df, ACTUAL_PRICE)?,
        avg_discount_price: column_mean(&df, DISCOUNT_PRICE)?,
        avg_rating: column_mean(&df, RATINGS)?,
    };

    let category_stats = aggregator::by_category(&df)?;
    let sub_category_stats = aggregator::by_sub_category(&df, options.top_sub_categories)?;
    let segment_stats = aggregator::by_price_segment(&df)?;

    let discount_vs_rating = products
        .iter()
        .filter_map(|p| {
            Some(DiscountRatingPoint {
                discount_percent: p.discount_percent?,
                ratings: p.ratings?,
            })
        })
        .collect();

    let insights = summarize(&segment_stats, &df)?;

    let budget_bounds = BudgetBounds::from_prices(products.iter().map(|p| p.actual_price));
    let effective = inputs.clamped(budget_bounds);
    let recommendations = recommend(&products, &effective, options.max_recommendations);

    Ok(DashboardOutputs {
        overview,
        cleaning: CleaningSummary {
            duplicates_removed,
            null_counts,
        },
        kpis,
        category_stats,
        sub_category_stats,
        segment_stats,
        discount_vs_rating,
        insights,
        budget_bounds,
        inputs: effective,
        recommendations,
    })
}

fn overview(raw: &DataFrame, preview_rows: usize) -> Result<DatasetOverview> {
    let column_names: Vec<String> = raw
        .get_column_names()
        .iter()
        .map(|name| name.to_string())
        .collect();

    let head = raw.head(Some(preview_rows));
    let columns = head
        .get_columns()
        .iter()
        .map(string_values)
        .collect::<Result<Vec<_>>>()?;
    let rows = (0..head.height())
        .map(|row| columns.iter().map(|values| values[row].clone()).collect())
        .collect();

    Ok(DatasetOverview {
        preview: TablePreview {
            columns: column_names.clone(),
            rows,
        },
        row_count: raw.height(),
        column_count: raw.width(),
        column_names,
    })
}
