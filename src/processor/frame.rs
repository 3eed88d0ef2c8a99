use crate::error::{DashboardError, Result};
use crate::models::{PriceSegment, Product};
use polars::prelude::*;

pub const NAME: &str = "name";
pub const MAIN_CATEGORY: &str = "main_category";
pub const SUB_CATEGORY: &str = "sub_category";
pub const ACTUAL_PRICE: &str = "actual_price";
pub const DISCOUNT_PRICE: &str = "discount_price";
pub const RATINGS: &str = "ratings";
pub const LINK: &str = "link";
pub const DISCOUNT_PERCENT: &str = "discount_percent";
pub const PRICE_SEGMENT: &str = "price_segment";

/// Columns every source file must provide.
pub const REQUIRED_COLUMNS: [&str; 7] = [
    NAME,
    MAIN_CATEGORY,
    SUB_CATEGORY,
    ACTUAL_PRICE,
    DISCOUNT_PRICE,
    RATINGS,
    LINK,
];

pub fn require_columns(df: &DataFrame, columns: &[&str]) -> Result<()> {
    let present = df.get_column_names();
    for column in columns {
        if !present.iter().any(|name| name.as_str() == *column) {
            return Err(DashboardError::Schema {
                column: column.to_string(),
            });
        }
    }
    Ok(())
}

/// Column values rendered as text, nulls preserved.
pub fn string_values(column: &Column) -> Result<Vec<Option<String>>> {
    let as_text = column.cast(&DataType::String)?;
    let values = as_text
        .str()?
        .into_iter()
        .map(|value| value.map(str::to_string))
        .collect();
    Ok(values)
}

/// Column values as floats. Values that do not cast become null.
pub fn float_values(column: &Column) -> Result<Vec<Option<f64>>> {
    let as_float = column.cast(&DataType::Float64)?;
    Ok(as_float.f64()?.into_iter().collect())
}

/// Mean of the non-null values of a numeric column; `None` when every value
/// is null.
pub fn column_mean(df: &DataFrame, name: &str) -> Result<Option<f64>> {
    let as_float = df.column(name)?.cast(&DataType::Float64)?;
    Ok(as_float.f64()?.mean())
}

/// Typed view of a cleaned frame. Derived columns are read when present.
pub fn products_from_frame(df: &DataFrame) -> Result<Vec<Product>> {
    require_columns(df, &REQUIRED_COLUMNS)?;

    let names = string_values(df.column(NAME)?)?;
    let main_categories = string_values(df.column(MAIN_CATEGORY)?)?;
    let sub_categories = string_values(df.column(SUB_CATEGORY)?)?;
    let actual_prices = float_values(df.column(ACTUAL_PRICE)?)?;
    let discount_prices = float_values(df.column(DISCOUNT_PRICE)?)?;
    let ratings = float_values(df.column(RATINGS)?)?;
    let links = string_values(df.column(LINK)?)?;
    let discount_percents = match df.column(DISCOUNT_PERCENT) {
        Ok(column) => float_values(column)?,
        Err(_) => vec![None; df.height()],
    };

    let products = (0..df.height())
        .map(|i| Product {
            name: names[i].clone(),
            main_category: main_categories[i].clone(),
            sub_category: sub_categories[i].clone(),
            actual_price: actual_prices[i],
            discount_price: discount_prices[i],
            ratings: ratings[i],
            link: links[i].clone(),
            discount_percent: discount_percents[i],
            price_segment: PriceSegment::from_price(actual_prices[i]),
        })
        .collect();

    Ok(products)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_require_columns_reports_first_missing() {
        let df = df!("name" => ["a"], "ratings" => [4.0]).unwrap();
        assert!(require_columns(&df, &["name", "ratings"]).is_ok());

        match require_columns(&df, &["name", "link", "actual_price"]) {
            Err(DashboardError::Schema { column }) => assert_eq!(column, "link"),
            other => panic!("expected schema error, got {:?}", other),
        }
    }

    #[test]
    fn test_value_extraction_keeps_nulls() {
        let df = df!(
            "text" => [Some("x"), None],
            "number" => [Some(1.5), None]
        )
        .unwrap();

        assert_eq!(
            string_values(df.column("text").unwrap()).unwrap(),
            vec![Some("x".to_string()), None]
        );
        assert_eq!(
            float_values(df.column("number").unwrap()).unwrap(),
            vec![Some(1.5), None]
        );
    }

    #[test]
    fn test_column_mean_skips_nulls() {
        let df = df!(
            "ratings" => [Some(4.0), None, Some(5.0)],
            "empty" => [None::<f64>, None, None]
        )
        .unwrap();

        assert_eq!(column_mean(&df, "ratings").unwrap(), Some(4.5));
        assert_eq!(column_mean(&df, "empty").unwrap(), None);
    }
}
