use crate::error::Result;
use crate::models::{AggregateRecord, PriceSegment};
use crate::processor::frame::{
    ACTUAL_PRICE, MAIN_CATEGORY, PRICE_SEGMENT, RATINGS, SUB_CATEGORY, float_values, string_values,
};
use polars::prelude::*;
use tracing::debug;

/// Sub-categories surfaced downstream.
pub const TOP_SUB_CATEGORIES: usize = 10;

const AVG_PRICE: &str = "avg_price";
const AVG_RATING: &str = "avg_rating";
const PRODUCT_COUNT: &str = "product_count";

/// Whether an aggregate reports the mean actual price.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PriceColumn {
    Include,
    Omit,
}

/// Group a cleaned frame by `key`, skipping rows whose key is null. Means
/// skip nulls; an all-null group has a null mean.
///
/// Result is sorted by `product_count` descending, equal counts by key
/// ascending, full ties in order of first appearance.
pub fn aggregate_by(df: &DataFrame, key: &str, price: PriceColumn) -> Result<Vec<AggregateRecord>> {
    let mut aggregations = vec![
        col(RATINGS).mean().alias(AVG_RATING),
        len().alias(PRODUCT_COUNT),
    ];
    if price == PriceColumn::Include {
        aggregations.push(col(ACTUAL_PRICE).mean().alias(AVG_PRICE));
    }

    let grouped = df
        .clone()
        .lazy()
        .filter(col(key).is_not_null())
        .group_by_stable([col(key)])
        .agg(aggregations)
        .sort_by_exprs(
            [col(PRODUCT_COUNT), col(key)],
            SortMultipleOptions::default()
                .with_order_descending_multi([true, false])
                .with_maintain_order(true),
        )
        .collect()?;

    debug!("{} groups for {}", grouped.height(), key);
    records_from_frame(&grouped, key)
}

fn records_from_frame(grouped: &DataFrame, key: &str) -> Result<Vec<AggregateRecord>> {
    let keys = string_values(grouped.column(key)?)?;
    let ratings = float_values(grouped.column(AVG_RATING)?)?;
    let prices = match grouped.column(AVG_PRICE) {
        Ok(column) => float_values(column)?,
        Err(_) => vec![None; grouped.height()],
    };
    let counts: Vec<Option<u64>> = grouped
        .column(PRODUCT_COUNT)?
        .cast(&DataType::UInt64)?
        .u64()?
        .into_iter()
        .collect();

    let records = (0..grouped.height())
        .map(|i| AggregateRecord {
            key: keys[i].clone().unwrap_or_default(),
            avg_price: prices[i],
            avg_rating: ratings[i],
            product_count: counts[i].unwrap_or(0) as usize,
        })
        .collect();

    Ok(records)
}

pub fn by_category(df: &DataFrame) -> Result<Vec<AggregateRecord>> {
    aggregate_by(df, MAIN_CATEGORY, PriceColumn::Include)
}

/// Sub-category table truncated to the `limit` largest groups.
pub fn by_sub_category(df: &DataFrame, limit: usize) -> Result<Vec<AggregateRecord>> {
    let mut records = aggregate_by(df, SUB_CATEGORY, PriceColumn::Include)?;
    records.truncate(limit);
    Ok(records)
}

/// One row per segment in bucket order, empty buckets included with a zero
/// count and a null rating.
pub fn by_price_segment(df: &DataFrame) -> Result<Vec<AggregateRecord>> {
    let observed = aggregate_by(df, PRICE_SEGMENT, PriceColumn::Omit)?;

    let records = PriceSegment::ALL
        .iter()
        .map(|segment| {
            observed
                .iter()
                .find(|record| record.key == segment.label())
                .cloned()
                .unwrap_or_else(|| AggregateRecord {
                    key: segment.label().to_string(),
                    avg_price: None,
                    avg_rating: None,
                    product_count: 0,
                })
        })
        .collect();

    Ok(records)
}
