use crate::error::Result;
use crate::models::AggregateRecord;
use crate::processor::frame::{DISCOUNT_PERCENT, RATINGS, column_mean, float_values};
use crate::processor::stats;
use polars::prelude::*;
use serde::{Deserialize, Serialize};

/// Headline facts derived from the aggregates. Every field may be missing
/// when the data behind it is all null.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct InsightSummary {
    pub best_segment: Option<String>,
    pub best_rating: Option<f64>,
    pub avg_discount_percent: Option<f64>,
    /// Pearson coefficient between discount_percent and ratings.
    pub discount_rating_correlation: Option<f64>,
}

/// `segment_stats` is read in its given order, so the first segment wins a
/// tie on average rating. `df` must carry the derived `discount_percent`.
pub fn summarize(segment_stats: &[AggregateRecord], df: &DataFrame) -> Result<InsightSummary> {
    let best = stats::arg_max(segment_stats.iter().map(|r| r.avg_rating));

    let discounts = float_values(df.column(DISCOUNT_PERCENT)?)?;
    let ratings = float_values(df.column(RATINGS)?)?;

    Ok(InsightSummary {
        best_segment: best.map(|(index, _)| segment_stats[index].key.clone()),
        best_rating: best.map(|(_, rating)| rating),
        avg_discount_percent: column_mean(df, DISCOUNT_PERCENT)?,
        discount_rating_correlation: stats::pearson(discounts.into_iter().zip(ratings)),
    })
}

/// Reading of a correlation coefficient for the insight text.
pub fn describe_correlation(coefficient: Option<f64>) -> &'static str {
    match coefficient {
        None => "cannot be measured on this data",
        Some(r) if r.abs() < 0.3 => "show no strong relationship with ratings",
        Some(r) if r > 0.0 => "tend to come with higher ratings",
        Some(_) => "tend to come with lower ratings",
    }
}
