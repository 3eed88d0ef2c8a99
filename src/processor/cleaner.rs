use crate::error::Result;
use crate::processor::frame::{
    ACTUAL_PRICE, DISCOUNT_PRICE, RATINGS, REQUIRED_COLUMNS, require_columns, string_values,
};
use polars::prelude::*;
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::str::FromStr;
use tracing::{info, warn};

/// Currency symbols, thousands separators and stray whitespace.
const PRICE_NOISE_PATTERN: &str = r"[\p{Sc},\s]";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ColumnNullCount {
    pub column: String,
    pub nulls: usize,
}

/// Output of the cleaning step: an independent copy of the data plus the
/// observations shown in the cleaning summary.
#[derive(Debug, Clone)]
pub struct CleanedDataset {
    pub df: DataFrame,
    pub duplicates_removed: usize,
    pub null_counts: Vec<ColumnNullCount>,
}

pub struct DataCleaner {
    price_noise: Regex,
}

impl DataCleaner {
    pub fn new() -> Result<Self> {
        Ok(DataCleaner {
            price_noise: Regex::new(PRICE_NOISE_PATTERN)?,
        })
    }

    pub fn clean(&self, raw: &DataFrame) -> Result<CleanedDataset> {
        require_columns(raw, &REQUIRED_COLUMNS)?;

        let (mut df, duplicates_removed) = self.drop_duplicates(raw)?;
        info!("Removed {} duplicate rows", duplicates_removed);

        self.normalize_price_column(&mut df, ACTUAL_PRICE)?;
        self.normalize_price_column(&mut df, DISCOUNT_PRICE)?;
        self.normalize_rating_column(&mut df, RATINGS)?;

        let null_counts = df
            .get_columns()
            .iter()
            .map(|column| ColumnNullCount {
                column: column.name().to_string(),
                nulls: column.null_count(),
            })
            .collect();

        Ok(CleanedDataset {
            df,
            duplicates_removed,
            null_counts,
        })
    }

    /// Keep the first occurrence of every distinct row, in input order.
    /// Nulls compare equal to each other.
    fn drop_duplicates(&self, df: &DataFrame) -> Result<(DataFrame, usize)> {
        let deduped = df
            .clone()
            .lazy()
            .unique_stable(None, UniqueKeepStrategy::First)
            .collect()?;

        let removed = df.height() - deduped.height();
        Ok((deduped, removed))
    }

    fn normalize_price_column(&self, df: &mut DataFrame, col_name: &str) -> Result<()> {
        let values = string_values(df.column(col_name)?)?;
        let normalized: Vec<Option<f64>> = values
            .iter()
            .map(|value| value.as_deref().and_then(|s| self.parse_price(s)))
            .collect();

        report_coercions(col_name, &values, &normalized);
        df.with_column(Series::new(col_name.into(), normalized))?;
        Ok(())
    }

    fn normalize_rating_column(&self, df: &mut DataFrame, col_name: &str) -> Result<()> {
        let values = string_values(df.column(col_name)?)?;
        let normalized: Vec<Option<f64>> = values
            .iter()
            .map(|value| value.as_deref().and_then(parse_number))
            .collect();

        report_coercions(col_name, &values, &normalized);
        df.with_column(Series::new(col_name.into(), normalized))?;
        Ok(())
    }

    /// "₹32,999" -> 32999.0. Negative or non-numeric prices are missing.
    pub fn parse_price(&self, text: &str) -> Option<f64> {
        let cleaned = self.price_noise.replace_all(text, "");
        parse_number(&cleaned).filter(|price| *price >= 0.0)
    }
}

fn parse_number(text: &str) -> Option<f64> {
    f64::from_str(text.trim()).ok().filter(|v| v.is_finite())
}

fn report_coercions(col_name: &str, before: &[Option<String>], after: &[Option<f64>]) {
    let coerced = before
        .iter()
        .zip(after)
        .filter(|(raw, parsed)| raw.is_some() && parsed.is_none())
        .count();
    if coerced > 0 {
        warn!("{}: {} values could not be parsed and were set to null", col_name, coerced);
    }
}
