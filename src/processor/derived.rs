use crate::error::Result;
use crate::models::PriceSegment;
use crate::processor::frame::{
    ACTUAL_PRICE, DISCOUNT_PERCENT, DISCOUNT_PRICE, PRICE_SEGMENT, float_values,
};
use polars::prelude::*;
use tracing::debug;

/// Price reduction as a percentage of the actual price. Null when either price
/// is missing or the actual price is zero.
pub fn discount_percent(actual_price: Option<f64>, discount_price: Option<f64>) -> Option<f64> {
    let (actual, discount) = (actual_price?, discount_price?);
    if actual == 0.0 {
        return None;
    }
    Some((actual - discount) / actual * 100.0)
}

/// Append `discount_percent` and `price_segment` to a cleaned frame.
pub fn add_derived_columns(df: &mut DataFrame) -> Result<()> {
    let actual = float_values(df.column(ACTUAL_PRICE)?)?;
    let discount = float_values(df.column(DISCOUNT_PRICE)?)?;

    let percents: Vec<Option<f64>> = actual
        .iter()
        .zip(&discount)
        .map(|(a, d)| discount_percent(*a, *d))
        .collect();
    let segments: Vec<Option<&str>> = actual
        .iter()
        .map(|price| PriceSegment::from_price(*price).map(|s| s.label()))
        .collect();

    let unsegmented = segments.iter().filter(|s| s.is_none()).count();
    debug!("{} rows fall outside every price segment", unsegmented);

    df.with_column(Series::new(DISCOUNT_PERCENT.into(), percents))?;
    df.with_column(Series::new(PRICE_SEGMENT.into(), segments))?;
    Ok(())
}
