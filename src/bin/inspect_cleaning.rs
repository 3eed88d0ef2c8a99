use anyhow::Result;
use sales_dashboard::config::{DEFAULT_DATA_PATH, ENV_DATA_PATH};
use sales_dashboard::loader::load_csv;
use sales_dashboard::processor::frame::{ACTUAL_PRICE, DISCOUNT_PERCENT, DISCOUNT_PRICE, RATINGS};
use sales_dashboard::processor::{DataCleaner, add_derived_columns};
use std::path::PathBuf;

fn main() -> Result<()> {
    dotenv::dotenv().ok();

    let path = PathBuf::from(std::env::var(ENV_DATA_PATH).unwrap_or_else(|_| DEFAULT_DATA_PATH.to_string()));
    println!("=== INSPECTING DATA CLEANING: {} ===\n", path.display());

    let raw = load_csv(&path)?;
    println!("1. Raw dataset:");
    println!("   Rows: {}, columns: {}", raw.height(), raw.width());
    println!("   Columns: {:?}", raw.get_column_names());
    println!("{}", raw.head(Some(5)));

    let cleaner = DataCleaner::new()?;
    let cleaned = cleaner.clean(&raw)?;
    let mut df = cleaned.df;
    add_derived_columns(&mut df)?;

    println!("\n2. After cleaning:");
    println!("   Duplicate rows removed: {}", cleaned.duplicates_removed);
    println!("   Rows: {}", df.height());
    println!("{}", df.head(Some(5)));

    println!("\n3. Numeric columns:");
    for col_name in [ACTUAL_PRICE, DISCOUNT_PRICE, RATINGS, DISCOUNT_PERCENT] {
        if let Ok(column) = df.column(col_name) {
            let non_null_count = column.len() - column.null_count();
            println!(
                "   {}: {}/{} non-null values (type: {:?})",
                col_name,
                non_null_count,
                column.len(),
                column.dtype()
            );
        }
    }

    println!("\n4. Missing values per column after conversion:");
    for count in &cleaned.null_counts {
        println!("   {}: {}", count.column, count.nulls);
    }

    Ok(())
}
